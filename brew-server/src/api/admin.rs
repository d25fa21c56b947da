//! Admin endpoints: catalogue management, users and bookings
//!
//! Every route here sits behind `require_auth` + `require_admin`.

use axum::{
    Json,
    extract::{Path, State},
};
use shared::error::{ApiResponse, AppError, ErrorCode};
use shared::models::{
    Brewery, BreweryCreate, BreweryUpdate, BookingStatus, BookingView, TourCreate, TourUpdate,
    TourView, User,
};

use super::{ApiResult, CreatedResult, created};
use crate::auth::CurrentUser;
use crate::db;
use crate::state::AppState;

fn brewery_not_found(id: i64) -> AppError {
    AppError::new(ErrorCode::BreweryNotFound).with_detail("brewery_id", id)
}

fn tour_not_found(id: i64) -> AppError {
    AppError::new(ErrorCode::TourNotFound).with_detail("tour_id", id)
}

// ── Breweries ──

/// POST /api/admin/breweries
pub async fn create_brewery(
    admin: CurrentUser,
    State(state): State<AppState>,
    Json(req): Json<BreweryCreate>,
) -> CreatedResult<Brewery> {
    req.validate()?;
    let brewery = db::breweries::create(&state.pool, &req).await?;
    tracing::info!(brewery_id = brewery.id, admin = %admin.username, "Brewery created");
    Ok(created(brewery))
}

/// PUT /api/admin/breweries/{id}
pub async fn update_brewery(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<BreweryUpdate>,
) -> ApiResult<Brewery> {
    req.validate()?;
    let brewery = db::breweries::update(&state.pool, id, &req)
        .await?
        .ok_or_else(|| brewery_not_found(id))?;
    Ok(ApiResponse::success(brewery))
}

/// POST /api/admin/breweries/{id}/deactivate
pub async fn deactivate_brewery(
    admin: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<()> {
    if !db::breweries::set_active(&state.pool, id, false).await? {
        return Err(brewery_not_found(id).into());
    }
    tracing::info!(brewery_id = id, admin = %admin.username, "Brewery deactivated");
    Ok(ApiResponse::ok())
}

// ── Tours ──

/// POST /api/admin/tours
pub async fn create_tour(
    admin: CurrentUser,
    State(state): State<AppState>,
    Json(req): Json<TourCreate>,
) -> CreatedResult<TourView> {
    req.validate()?;
    // Missing brewery surfaces as ReferenceNotFound via the FK
    let tour = db::tours::create(&state.pool, &req).await?;
    tracing::info!(tour_id = tour.id, brewery_id = tour.brewery_id, admin = %admin.username, "Tour created");
    Ok(created(db::views::tour_view(&state.pool, tour).await?))
}

/// PUT /api/admin/tours/{id}
pub async fn update_tour(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<TourUpdate>,
) -> ApiResult<TourView> {
    req.validate()?;
    let tour = db::tours::update(&state.pool, id, &req)
        .await?
        .ok_or_else(|| tour_not_found(id))?;
    Ok(ApiResponse::success(db::views::tour_view(&state.pool, tour).await?))
}

/// POST /api/admin/tours/{id}/deactivate
pub async fn deactivate_tour(
    admin: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<()> {
    if !db::tours::set_active(&state.pool, id, false).await? {
        return Err(tour_not_found(id).into());
    }
    tracing::info!(tour_id = id, admin = %admin.username, "Tour deactivated");
    Ok(ApiResponse::ok())
}

// ── Users ──

/// GET /api/admin/users
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Vec<User>> {
    Ok(ApiResponse::success(db::users::list(&state.pool).await?))
}

/// POST /api/admin/users/{id}/deactivate
pub async fn deactivate_user(
    admin: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<()> {
    if admin.id == id {
        return Err(AppError::invalid_request("Admins cannot deactivate their own account").into());
    }
    if !db::users::set_active(&state.pool, id, false).await? {
        return Err(AppError::new(ErrorCode::UserNotFound)
            .with_detail("user_id", id)
            .into());
    }
    tracing::info!(user_id = id, admin = %admin.username, "User deactivated");
    Ok(ApiResponse::ok())
}

// ── Bookings ──

/// GET /api/admin/bookings
pub async fn list_bookings(State(state): State<AppState>) -> ApiResult<Vec<BookingView>> {
    let bookings = db::bookings::list_all(&state.pool).await?;
    Ok(ApiResponse::success(db::views::booking_views(&state.pool, bookings).await?))
}

/// POST /api/admin/bookings/{id}/complete
pub async fn complete_booking(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<BookingView> {
    let booking =
        db::bookings::update_status(&state.pool, id, BookingStatus::Completed, None).await?;
    Ok(ApiResponse::success(db::views::booking_view(&state.pool, booking).await?))
}
