//! Brewery Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::validation;

/// Brewery entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Brewery {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub location: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub website: Option<String>,
    pub opening_hours: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
}

/// Brewery with its aggregated review score
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreweryDetail {
    #[serde(flatten)]
    pub brewery: Brewery,
    /// Mean rating, `None` when the brewery has no reviews yet
    pub average_rating: Option<f64>,
    pub review_count: i64,
}

/// Create brewery payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreweryCreate {
    pub name: String,
    pub description: String,
    pub location: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub website: Option<String>,
    pub opening_hours: Option<String>,
    pub image_url: Option<String>,
}

impl BreweryCreate {
    pub fn validate(&self) -> AppResult<()> {
        validation::required_text("name", &self.name, 100)?;
        validation::required_text("description", &self.description, 10_000)?;
        validation::required_text("location", &self.location, 200)?;
        validate_contact(
            self.latitude,
            self.longitude,
            self.contact_email.as_deref(),
            self.contact_phone.as_deref(),
            self.website.as_deref(),
            self.image_url.as_deref(),
        )
    }
}

/// Update brewery payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BreweryUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub website: Option<String>,
    pub opening_hours: Option<String>,
    pub image_url: Option<String>,
    pub is_active: Option<bool>,
}

impl BreweryUpdate {
    pub fn validate(&self) -> AppResult<()> {
        if let Some(name) = &self.name {
            validation::required_text("name", name, 100)?;
        }
        if let Some(description) = &self.description {
            validation::required_text("description", description, 10_000)?;
        }
        if let Some(location) = &self.location {
            validation::required_text("location", location, 200)?;
        }
        validate_contact(
            self.latitude,
            self.longitude,
            self.contact_email.as_deref(),
            self.contact_phone.as_deref(),
            self.website.as_deref(),
            self.image_url.as_deref(),
        )
    }
}

fn validate_contact(
    latitude: Option<f64>,
    longitude: Option<f64>,
    email: Option<&str>,
    phone: Option<&str>,
    website: Option<&str>,
    image_url: Option<&str>,
) -> AppResult<()> {
    if let Some(lat) = latitude {
        validation::in_range("latitude", lat, -90.0, 90.0)?;
    }
    if let Some(lng) = longitude {
        validation::in_range("longitude", lng, -180.0, 180.0)?;
    }
    if let Some(email) = email {
        validation::email("contact_email", email)?;
    }
    validation::optional_text("contact_phone", phone, 20)?;
    validation::optional_text("website", website, 200)?;
    validation::optional_text("image_url", image_url, 500)?;
    Ok(())
}

/// Query filters for the public brewery listing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BreweryQuery {
    /// Case-insensitive substring match on the location
    pub location: Option<String>,
    /// Case-insensitive substring match on the name
    pub search: Option<String>,
}
