//! Booking queries
//!
//! Creating a booking and changing its status both run inside a transaction
//! that holds a row lock, so concurrent requests for the same tour are
//! serialized and capacity is checked against committed state.

use chrono::NaiveDate;
use shared::error::{AppError, ErrorCode};
use shared::models::{Booking, BookingStatus, NewBooking, check_capacity};
use sqlx::{PgExecutor, PgPool};

use super::tours;
use crate::error::ServiceResult;

/// Insert a confirmed booking if the tour still has room on that date
///
/// The tour row is locked with `FOR UPDATE` before the confirmed
/// participants are summed, and `total_price` is computed from the locked
/// tour's price.
pub async fn create(pool: &PgPool, booking: &NewBooking) -> ServiceResult<Booking> {
    let mut tx = pool.begin().await?;

    let tour = tours::lock(&mut *tx, booking.tour_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::TourNotFound).with_detail("tour_id", booking.tour_id))?;

    let date = booking.booking_date.date_naive();
    tour.ensure_bookable(date)?;

    let booked = booked_participants(&mut *tx, tour.id, date).await?;
    check_capacity(&tour, booked, booking.participants)?;
    let total_price = tour.quote(booking.participants)?;

    let created: Booking = sqlx::query_as(
        r#"
        INSERT INTO bookings (user_id, tour_id, booking_date, participants, total_price,
                              special_requests, status)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(booking.user_id)
    .bind(tour.id)
    .bind(booking.booking_date)
    .bind(booking.participants)
    .bind(total_price)
    .bind(&booking.special_requests)
    .bind(BookingStatus::Confirmed)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(
        booking_id = created.id,
        tour_id = created.tour_id,
        user_id = created.user_id,
        participants = created.participants,
        %date,
        "Booking confirmed"
    );
    Ok(created)
}

/// Confirmed participants on `tour_id` for one calendar date (UTC)
pub async fn booked_participants<'e, E: PgExecutor<'e>>(
    executor: E,
    tour_id: i64,
    date: NaiveDate,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        SELECT COALESCE(SUM(participants), 0)::BIGINT
        FROM bookings
        WHERE tour_id = $1
          AND status = $2
          AND (booking_date AT TIME ZONE 'UTC')::DATE = $3
        "#,
    )
    .bind(tour_id)
    .bind(BookingStatus::Confirmed)
    .bind(date)
    .fetch_one(executor)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Booking>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM bookings WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn list_by_user(pool: &PgPool, user_id: i64) -> Result<Vec<Booking>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM bookings WHERE user_id = $1 ORDER BY booking_date DESC, id DESC")
        .bind(user_id)
        .fetch_all(pool)
        .await
}

pub async fn list_all(pool: &PgPool) -> Result<Vec<Booking>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM bookings ORDER BY booking_date DESC, id DESC")
        .fetch_all(pool)
        .await
}

/// Move a booking to `next`
///
/// With `owner` set, bookings of other users are reported as not found.
pub async fn update_status(
    pool: &PgPool,
    id: i64,
    next: BookingStatus,
    owner: Option<i64>,
) -> ServiceResult<Booking> {
    let mut tx = pool.begin().await?;

    let mut booking: Booking = sqlx::query_as("SELECT * FROM bookings WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .filter(|b: &Booking| owner.is_none_or(|uid| b.user_id == uid))
        .ok_or_else(|| AppError::new(ErrorCode::BookingNotFound).with_detail("booking_id", id))?;

    let previous = booking.status;
    booking.transition(next)?;

    sqlx::query("UPDATE bookings SET status = $1 WHERE id = $2")
        .bind(booking.status)
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!(booking_id = id, from = %previous, to = %next, "Booking status changed");
    Ok(booking)
}
