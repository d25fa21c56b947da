//! Booking endpoints for the authenticated caller

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::Utc;
use shared::error::{ApiResponse, AppError, ErrorCode};
use shared::models::{BookingCreate, BookingStatus, BookingView, NewBooking};

use super::{ApiResult, CreatedResult, created, load_active};
use crate::auth::CurrentUser;
use crate::db;
use crate::state::AppState;

/// POST /api/bookings
pub async fn create(
    user: CurrentUser,
    State(state): State<AppState>,
    Json(req): Json<BookingCreate>,
) -> CreatedResult<BookingView> {
    req.validate(Utc::now())?;
    load_active(&state, &user).await?;
    let booking = db::bookings::create(&state.pool, &NewBooking::new(user.id, req)).await?;
    Ok(created(db::views::booking_view(&state.pool, booking).await?))
}

/// GET /api/bookings
pub async fn list(user: CurrentUser, State(state): State<AppState>) -> ApiResult<Vec<BookingView>> {
    let bookings = db::bookings::list_by_user(&state.pool, user.id).await?;
    Ok(ApiResponse::success(db::views::booking_views(&state.pool, bookings).await?))
}

/// GET /api/bookings/{id}
pub async fn get(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<BookingView> {
    let booking = db::bookings::find_by_id(&state.pool, id)
        .await?
        .filter(|b| user.can_access(b.user_id))
        .ok_or_else(|| AppError::new(ErrorCode::BookingNotFound).with_detail("booking_id", id))?;
    Ok(ApiResponse::success(db::views::booking_view(&state.pool, booking).await?))
}

/// POST /api/bookings/{id}/cancel
pub async fn cancel(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<BookingView> {
    load_active(&state, &user).await?;
    let owner = (!user.is_admin).then_some(user.id);
    let booking =
        db::bookings::update_status(&state.pool, id, BookingStatus::Cancelled, owner).await?;
    Ok(ApiResponse::success(db::views::booking_view(&state.pool, booking).await?))
}
