//! Public brewery endpoints and reviews

use axum::{
    Json,
    extract::{Path, Query, State},
};
use shared::error::{ApiResponse, AppError, ErrorCode};
use shared::models::{Brewery, BreweryDetail, BreweryQuery, ReviewCreate, ReviewView, TourView};

use super::{ApiResult, CreatedResult, created, load_active};
use crate::auth::CurrentUser;
use crate::db;
use crate::error::ServiceResult;
use crate::state::AppState;

fn not_found(id: i64) -> AppError {
    AppError::new(ErrorCode::BreweryNotFound).with_detail("brewery_id", id)
}

/// Active brewery or `BreweryNotFound`
async fn active_brewery(state: &AppState, id: i64) -> ServiceResult<Brewery> {
    db::breweries::find_by_id(&state.pool, id)
        .await?
        .filter(|b| b.is_active)
        .ok_or_else(|| not_found(id).into())
}

/// GET /api/breweries
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<BreweryQuery>,
) -> ApiResult<Vec<Brewery>> {
    let breweries = db::breweries::list(&state.pool, &query).await?;
    Ok(ApiResponse::success(breweries))
}

/// GET /api/breweries/{id}
pub async fn get(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<BreweryDetail> {
    let brewery = active_brewery(&state, id).await?;
    let (average_rating, review_count) = db::reviews::average_rating(&state.pool, id).await?;
    Ok(ApiResponse::success(BreweryDetail {
        brewery,
        average_rating,
        review_count,
    }))
}

/// GET /api/breweries/{id}/tours
pub async fn tours(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Vec<TourView>> {
    active_brewery(&state, id).await?;
    let tours = db::tours::list_by_brewery(&state.pool, id).await?;
    Ok(ApiResponse::success(db::views::tour_views(&state.pool, tours).await?))
}

/// GET /api/breweries/{id}/reviews
pub async fn list_reviews(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Vec<ReviewView>> {
    active_brewery(&state, id).await?;
    let reviews = db::reviews::list_by_brewery(&state.pool, id).await?;
    Ok(ApiResponse::success(db::views::review_views(&state.pool, reviews).await?))
}

/// POST /api/breweries/{id}/reviews
pub async fn create_review(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<ReviewCreate>,
) -> CreatedResult<ReviewView> {
    let rating = req.validate()?;
    let author = load_active(&state, &user).await?;

    let brewery = db::breweries::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    if !brewery.is_active {
        return Err(AppError::new(ErrorCode::BreweryInactive)
            .with_detail("brewery_id", id)
            .into());
    }

    let review =
        db::reviews::create(&state.pool, user.id, id, rating, req.comment.as_deref()).await?;
    tracing::info!(review_id = review.id, brewery_id = id, user_id = user.id, %rating, "Review posted");

    Ok(created(ReviewView {
        review,
        user: Some(author),
    }))
}
