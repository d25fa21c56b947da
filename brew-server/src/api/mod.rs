//! API routes for brew-server

pub mod admin;
pub mod auth;
pub mod bookings;
pub mod breweries;
pub mod health;
pub mod payments;
pub mod tours;
pub mod uploads;

use std::path::Path;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post, put};
use axum::{Router, middleware};
use http::StatusCode;
use shared::error::{ApiResponse, AppError, ErrorCode};
use shared::models::User;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::auth::{CurrentUser, require_admin, require_auth};
use crate::db;
use crate::error::{ServiceError, ServiceResult};
use crate::state::AppState;
use crate::storage::{MAX_FILE_SIZE, PUBLIC_PREFIX};

/// Handler result wrapped in the `ApiResponse` envelope
pub type ApiResult<T> = Result<ApiResponse<T>, ServiceError>;

/// Handler result for endpoints that create a resource
pub type CreatedResult<T> = Result<(StatusCode, ApiResponse<T>), ServiceError>;

pub(crate) fn created<T>(data: T) -> (StatusCode, ApiResponse<T>) {
    (StatusCode::CREATED, ApiResponse::success(data))
}

/// Load the caller's account, rejecting deactivated users
///
/// Tokens outlive deactivation, so every handler that writes on the caller's
/// behalf goes through here.
pub(crate) async fn load_active(state: &AppState, caller: &CurrentUser) -> ServiceResult<User> {
    let user = db::users::find_by_id(&state.pool, caller.id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;
    if !user.is_active {
        tracing::warn!(user_id = user.id, "Rejected request from deactivated account");
        return Err(AppError::new(ErrorCode::AccountDisabled).into());
    }
    Ok(user)
}

/// Multipart framing allowance on top of the file size limit
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Create the combined router
pub fn create_router(state: AppState, upload_root: &Path) -> Router {
    // Public (no auth; handlers that need a caller use the `CurrentUser` extractor)
    let public = Router::new()
        .route("/", get(health::index))
        .route("/health", get(health::health_check))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/breweries", get(breweries::list))
        .route("/api/breweries/{id}", get(breweries::get))
        .route("/api/breweries/{id}/tours", get(breweries::tours))
        .route(
            "/api/breweries/{id}/reviews",
            get(breweries::list_reviews).post(breweries::create_review),
        )
        .route("/api/tours", get(tours::list))
        .route("/api/tours/{id}", get(tours::get))
        .route("/api/tours/{id}/availability", get(tours::availability));

    // Authenticated
    let authed = Router::new()
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me).put(auth::update_me))
        .route("/api/auth/me/password", put(auth::change_password))
        .route("/api/bookings", post(bookings::create).get(bookings::list))
        .route("/api/bookings/{id}", get(bookings::get))
        .route("/api/bookings/{id}/cancel", post(bookings::cancel))
        .route("/api/payments/quote", post(payments::quote))
        .route(
            "/api/uploads/{namespace}",
            post(uploads::upload)
                .layer(DefaultBodyLimit::max(MAX_FILE_SIZE + MULTIPART_OVERHEAD)),
        )
        .layer(middleware::from_fn_with_state(state.clone(), require_auth));

    // Admin
    let admin = Router::new()
        .route("/api/admin/breweries", post(admin::create_brewery))
        .route("/api/admin/breweries/{id}", put(admin::update_brewery))
        .route(
            "/api/admin/breweries/{id}/deactivate",
            post(admin::deactivate_brewery),
        )
        .route("/api/admin/tours", post(admin::create_tour))
        .route("/api/admin/tours/{id}", put(admin::update_tour))
        .route("/api/admin/tours/{id}/deactivate", post(admin::deactivate_tour))
        .route("/api/admin/users", get(admin::list_users))
        .route("/api/admin/users/{id}/deactivate", post(admin::deactivate_user))
        .route("/api/admin/bookings", get(admin::list_bookings))
        .route("/api/admin/bookings/{id}/complete", post(admin::complete_booking))
        .layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(public)
        .merge(authed)
        .merge(admin)
        .nest_service(PUBLIC_PREFIX, ServeDir::new(upload_root))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
