//! Nested view assembly
//!
//! Related rows are fetched in one batch per entity type and stitched onto
//! their parents by id.

use std::collections::HashMap;

use shared::models::{Booking, BookingView, Brewery, Review, ReviewView, Tour, TourView, User};
use sqlx::PgPool;

use super::{breweries, tours, users};

fn unique_ids(ids: impl Iterator<Item = i64>) -> Vec<i64> {
    let mut ids: Vec<i64> = ids.collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

async fn breweries_by_id(pool: &PgPool, ids: Vec<i64>) -> Result<HashMap<i64, Brewery>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows = breweries::find_by_ids(pool, &ids).await?;
    Ok(rows.into_iter().map(|b| (b.id, b)).collect())
}

async fn users_by_id(pool: &PgPool, ids: Vec<i64>) -> Result<HashMap<i64, User>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows = users::find_by_ids(pool, &ids).await?;
    Ok(rows.into_iter().map(|u| (u.id, u)).collect())
}

pub async fn tour_view(pool: &PgPool, tour: Tour) -> Result<TourView, sqlx::Error> {
    let brewery = breweries::find_by_id(pool, tour.brewery_id).await?;
    Ok(TourView { tour, brewery })
}

pub async fn tour_views(pool: &PgPool, tours: Vec<Tour>) -> Result<Vec<TourView>, sqlx::Error> {
    let breweries = breweries_by_id(pool, unique_ids(tours.iter().map(|t| t.brewery_id))).await?;
    Ok(tours
        .into_iter()
        .map(|tour| TourView {
            brewery: breweries.get(&tour.brewery_id).cloned(),
            tour,
        })
        .collect())
}

pub async fn booking_view(pool: &PgPool, booking: Booking) -> Result<BookingView, sqlx::Error> {
    let mut views = booking_views(pool, vec![booking]).await?;
    match views.pop() {
        Some(view) => Ok(view),
        None => Err(sqlx::Error::RowNotFound),
    }
}

pub async fn booking_views(
    pool: &PgPool,
    bookings: Vec<Booking>,
) -> Result<Vec<BookingView>, sqlx::Error> {
    let tour_ids = unique_ids(bookings.iter().map(|b| b.tour_id));
    let tour_rows = if tour_ids.is_empty() {
        Vec::new()
    } else {
        tours::find_by_ids(pool, &tour_ids).await?
    };
    let tours: HashMap<i64, TourView> = tour_views(pool, tour_rows)
        .await?
        .into_iter()
        .map(|v| (v.tour.id, v))
        .collect();
    let users = users_by_id(pool, unique_ids(bookings.iter().map(|b| b.user_id))).await?;

    Ok(bookings
        .into_iter()
        .map(|booking| BookingView {
            tour: tours.get(&booking.tour_id).cloned(),
            user: users.get(&booking.user_id).cloned(),
            booking,
        })
        .collect())
}

pub async fn review_views(pool: &PgPool, reviews: Vec<Review>) -> Result<Vec<ReviewView>, sqlx::Error> {
    let users = users_by_id(pool, unique_ids(reviews.iter().map(|r| r.user_id))).await?;
    Ok(reviews
        .into_iter()
        .map(|review| ReviewView {
            user: users.get(&review.user_id).cloned(),
            review,
        })
        .collect())
}
