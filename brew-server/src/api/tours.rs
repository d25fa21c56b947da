//! Public tour endpoints

use axum::extract::{Path, Query, State};
use chrono::NaiveDate;
use serde::Deserialize;
use shared::error::{ApiResponse, AppError, ErrorCode};
use shared::models::{Availability, TourQuery, TourView};

use super::ApiResult;
use crate::db;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub date: NaiveDate,
}

/// GET /api/tours
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<TourQuery>,
) -> ApiResult<Vec<TourView>> {
    let tours = db::tours::list(&state.pool, &query).await?;
    Ok(ApiResponse::success(db::views::tour_views(&state.pool, tours).await?))
}

/// GET /api/tours/{id}
pub async fn get(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<TourView> {
    let tour = db::tours::find_by_id(&state.pool, id)
        .await?
        .filter(|t| t.is_active)
        .ok_or_else(|| AppError::new(ErrorCode::TourNotFound).with_detail("tour_id", id))?;
    Ok(ApiResponse::success(db::views::tour_view(&state.pool, tour).await?))
}

/// GET /api/tours/{id}/availability?date=YYYY-MM-DD
pub async fn availability(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<AvailabilityQuery>,
) -> ApiResult<Availability> {
    let tour = db::tours::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::TourNotFound).with_detail("tour_id", id))?;
    let booked = db::bookings::booked_participants(&state.pool, id, query.date).await?;
    Ok(ApiResponse::success(Availability::new(&tour, query.date, booked)))
}
