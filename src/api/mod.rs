//! REST API endpoints.
//!
//! Axum-based HTTP API for attendance records, geofenced check-ins, branch
//! configuration, vacation requests and user administration.

pub mod routes;
pub mod state;

use axum::routing::{get, post};
use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            ApiError::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<crate::storage::StorageError> for ApiError {
    fn from(e: crate::storage::StorageError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

/// CORS layer for the configured origin. `"*"` stays permissive; anything
/// else restricts responses to that exact origin.
fn cors_layer(origin: &str) -> CorsLayer {
    if origin == "*" {
        return CorsLayer::permissive();
    }
    match origin.parse::<HeaderValue>() {
        Ok(value) => CorsLayer::new()
            .allow_origin(AllowOrigin::exact(value))
            .allow_methods(Any)
            .allow_headers(Any),
        Err(_) => {
            warn!(
                "cors_origin {:?} is not a valid origin; keeping permissive CORS",
                origin
            );
            CorsLayer::permissive()
        }
    }
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.cors_origin);
    Router::new()
        .route("/api/login", post(routes::auth::login))
        .route(
            "/api/records",
            get(routes::records::list_records).post(routes::records::create_record),
        )
        .route(
            "/api/records/:id",
            axum::routing::patch(routes::records::correct_record)
                .delete(routes::records::delete_record),
        )
        .route("/api/checkin", post(routes::checkin::check_in))
        .route(
            "/api/users",
            get(routes::users::list_users).post(routes::users::create_user),
        )
        .route(
            "/api/users/:id",
            axum::routing::patch(routes::users::update_user).delete(routes::users::delete_user),
        )
        .route(
            "/api/users/:id/branches",
            get(routes::branches::get_branches).put(routes::branches::put_branches),
        )
        .route(
            "/api/locations/resolve",
            post(routes::branches::resolve_location),
        )
        .route(
            "/api/vacations",
            get(routes::vacations::list_vacations).post(routes::vacations::create_vacation),
        )
        .route(
            "/api/vacations/:id/decision",
            post(routes::vacations::decide_vacation),
        )
        .route("/api/export", get(routes::export::export_csv))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
