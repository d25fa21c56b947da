//! Tour Model

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::brewery::Brewery;
use crate::error::{AppError, AppResult, ErrorCode};
use crate::validation;

/// Largest amount a `NUMERIC(10,2)` money column holds (99,999,999.99)
pub fn max_money() -> Decimal {
    Decimal::new(9_999_999_999, 2)
}

/// Tour entity offered by a brewery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Tour {
    pub id: i64,
    pub brewery_id: i64,
    pub name: String,
    pub description: String,
    /// Duration in minutes
    pub duration: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub max_participants: i32,
    /// Dates the tour runs on; empty means any date
    #[serde(default)]
    pub available_dates: Vec<NaiveDate>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
}

impl Tour {
    /// Whether the tour runs on `date`
    pub fn runs_on(&self, date: NaiveDate) -> bool {
        self.available_dates.is_empty() || self.available_dates.contains(&date)
    }

    /// Price for `participants` people, rejected when it exceeds [`max_money`]
    pub fn quote(&self, participants: i32) -> AppResult<Decimal> {
        let total = self
            .price
            .checked_mul(Decimal::from(participants))
            .filter(|total| *total <= max_money());
        total.ok_or_else(|| {
            AppError::invalid_field(
                ErrorCode::ValueOutOfRange,
                "total_price",
                format!("must be at most {}", max_money()),
            )
            .with_detail("tour_id", self.id)
            .with_detail("participants", participants)
        })
    }

    /// Ensure the tour accepts new bookings on `date`
    pub fn ensure_bookable(&self, date: NaiveDate) -> AppResult<()> {
        if !self.is_active {
            return Err(AppError::new(ErrorCode::TourInactive).with_detail("tour_id", self.id));
        }
        if !self.runs_on(date) {
            return Err(AppError::new(ErrorCode::TourDateUnavailable)
                .with_detail("tour_id", self.id)
                .with_detail("date", date.to_string()));
        }
        Ok(())
    }
}

/// Tour with its owning brewery embedded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TourView {
    #[serde(flatten)]
    pub tour: Tour,
    pub brewery: Option<Brewery>,
}

/// Create tour payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TourCreate {
    pub brewery_id: i64,
    pub name: String,
    pub description: String,
    pub duration: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub max_participants: i32,
    #[serde(default)]
    pub available_dates: Vec<NaiveDate>,
    pub image_url: Option<String>,
}

impl TourCreate {
    pub fn validate(&self) -> AppResult<()> {
        validation::required_text("name", &self.name, 100)?;
        validation::required_text("description", &self.description, 10_000)?;
        validation::at_least("duration", self.duration, 1)?;
        validation::in_range("price", self.price, Decimal::ZERO, max_money())?;
        validation::at_least("max_participants", self.max_participants, 1)?;
        validation::optional_text("image_url", self.image_url.as_deref(), 500)?;
        Ok(())
    }
}

/// Update tour payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TourUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub duration: Option<i32>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    pub max_participants: Option<i32>,
    pub available_dates: Option<Vec<NaiveDate>>,
    pub image_url: Option<String>,
    pub is_active: Option<bool>,
}

impl TourUpdate {
    pub fn validate(&self) -> AppResult<()> {
        if let Some(name) = &self.name {
            validation::required_text("name", name, 100)?;
        }
        if let Some(description) = &self.description {
            validation::required_text("description", description, 10_000)?;
        }
        if let Some(duration) = self.duration {
            validation::at_least("duration", duration, 1)?;
        }
        if let Some(price) = self.price {
            validation::in_range("price", price, Decimal::ZERO, max_money())?;
        }
        if let Some(max) = self.max_participants {
            validation::at_least("max_participants", max, 1)?;
        }
        validation::optional_text("image_url", self.image_url.as_deref(), 500)?;
        Ok(())
    }
}

/// Query filters for the public tour listing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TourQuery {
    pub brewery_id: Option<i64>,
    /// Only tours running on this date
    pub date: Option<NaiveDate>,
}

/// Remaining capacity of a tour on one calendar date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Availability {
    pub tour_id: i64,
    pub date: NaiveDate,
    pub runs_on_date: bool,
    pub max_participants: i32,
    pub booked: i64,
    pub remaining: i64,
}

impl Availability {
    pub fn new(tour: &Tour, date: NaiveDate, booked: i64) -> Self {
        let runs_on_date = tour.is_active && tour.runs_on(date);
        let remaining = if runs_on_date {
            (i64::from(tour.max_participants) - booked).max(0)
        } else {
            0
        };
        Self {
            tour_id: tour.id,
            date,
            runs_on_date,
            max_participants: tour.max_participants,
            booked,
            remaining,
        }
    }
}
