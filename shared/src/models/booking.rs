//! Booking Model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::tour::{Tour, TourView};
use super::user::User;
use crate::error::{AppError, AppResult, ErrorCode};
use crate::validation;

/// Booking lifecycle
///
/// A booking starts `confirmed` and may move once, to either terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(type_name = "text", rename_all = "lowercase"))]
pub enum BookingStatus {
    #[default]
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }

    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        matches!(
            (self, next),
            (Self::Confirmed, Self::Cancelled) | (Self::Confirmed, Self::Completed)
        )
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Booking entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Booking {
    pub id: i64,
    pub user_id: i64,
    pub tour_id: i64,
    pub booking_date: DateTime<Utc>,
    pub participants: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
    pub special_requests: Option<String>,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    /// Move to `next`, rejecting anything but confirmed → cancelled/completed
    pub fn transition(&mut self, next: BookingStatus) -> AppResult<()> {
        check_transition(self.status, next)?;
        self.status = next;
        Ok(())
    }
}

pub fn check_transition(current: BookingStatus, next: BookingStatus) -> AppResult<()> {
    if !current.can_transition_to(next) {
        return Err(AppError::with_message(
            ErrorCode::InvalidStatusTransition,
            format!("Cannot change booking from {current} to {next}"),
        )
        .with_detail("from", current.as_str())
        .with_detail("to", next.as_str()));
    }
    Ok(())
}

/// Capacity rule for a new booking
///
/// `already_booked` is the participant total of confirmed bookings for the
/// same tour and calendar date.
pub fn check_capacity(tour: &Tour, already_booked: i64, requested: i32) -> AppResult<()> {
    let max = i64::from(tour.max_participants);
    if i64::from(requested) > max {
        return Err(AppError::with_message(
            ErrorCode::CapacityExceeded,
            format!("Tour allows at most {max} participants per booking"),
        )
        .with_detail("max_participants", max)
        .with_detail("requested", requested));
    }
    let remaining = max - already_booked;
    if i64::from(requested) > remaining {
        return Err(AppError::with_message(
            ErrorCode::CapacityExceeded,
            format!("Only {} places left on this date", remaining.max(0)),
        )
        .with_detail("remaining", remaining.max(0))
        .with_detail("requested", requested));
    }
    Ok(())
}

/// Booking with its tour (and the tour's brewery) and user embedded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingView {
    #[serde(flatten)]
    pub booking: Booking,
    pub tour: Option<TourView>,
    pub user: Option<User>,
}

/// Create booking payload
///
/// The user comes from the access token and the price is computed server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingCreate {
    pub tour_id: i64,
    pub booking_date: DateTime<Utc>,
    #[serde(default = "default_participants")]
    pub participants: i32,
    pub special_requests: Option<String>,
}

fn default_participants() -> i32 {
    1
}

impl BookingCreate {
    pub fn validate(&self, now: DateTime<Utc>) -> AppResult<()> {
        validation::at_least("participants", self.participants, 1)?;
        validation::optional_text("special_requests", self.special_requests.as_deref(), 1000)?;
        if self.booking_date.date_naive() < now.date_naive() {
            return Err(AppError::invalid_field(
                ErrorCode::BookingDateInPast,
                "booking_date",
                "must not be in the past",
            ));
        }
        Ok(())
    }
}

/// Insert-ready booking; the price is computed against the locked tour row
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub user_id: i64,
    pub tour_id: i64,
    pub booking_date: DateTime<Utc>,
    pub participants: i32,
    pub special_requests: Option<String>,
}

impl NewBooking {
    pub fn new(user_id: i64, create: BookingCreate) -> Self {
        Self {
            user_id,
            tour_id: create.tour_id,
            booking_date: create.booking_date,
            participants: create.participants,
            special_requests: create.special_requests,
        }
    }
}

/// Price quote request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub tour_id: i64,
    #[serde(default = "default_participants")]
    pub participants: i32,
}

/// Price quote for a tour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub tour_id: i64,
    pub participants: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
    pub currency: String,
}

impl Quote {
    pub fn for_tour(tour: &Tour, participants: i32) -> AppResult<Self> {
        validation::at_least("participants", participants, 1)?;
        Ok(Self {
            tour_id: tour.id,
            participants,
            unit_price: tour.price,
            total_price: tour.quote(participants)?,
            currency: "KES".to_string(),
        })
    }
}
