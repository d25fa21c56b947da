//! Payment quotes
//!
//! Only pricing is exposed; no payment provider is contacted.

use axum::{Json, extract::State};
use shared::error::{ApiResponse, AppError, ErrorCode};
use shared::models::{Quote, QuoteRequest};

use super::ApiResult;
use crate::db;
use crate::state::AppState;

/// POST /api/payments/quote
pub async fn quote(State(state): State<AppState>, Json(req): Json<QuoteRequest>) -> ApiResult<Quote> {
    let tour = db::tours::find_by_id(&state.pool, req.tour_id)
        .await?
        .filter(|t| t.is_active)
        .ok_or_else(|| AppError::new(ErrorCode::TourNotFound).with_detail("tour_id", req.tour_id))?;
    Ok(ApiResponse::success(Quote::for_tour(&tour, req.participants)?))
}
