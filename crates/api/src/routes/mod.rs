//! API route definitions.

use axum::{
    Json, Router,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{AppState, middleware::AuthUser, middleware::auth::auth_middleware};
use registra_shared::{AppError, StaffRole};

pub mod assignments;
pub mod enrollments;
pub mod grades;
pub mod health;
pub mod payments;

/// Creates the API router with protected routes that need state for middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Protected routes that require authentication
    let protected_routes = Router::new()
        .merge(grades::routes())
        .merge(enrollments::routes())
        .merge(payments::routes())
        .merge(assignments::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Combine public and protected routes
    Router::new()
        .merge(health::routes())
        .merge(protected_routes)
}

/// Checks that the caller holds one of the allowed roles.
///
/// An unparseable role claim fails closed.
#[allow(clippy::result_large_err)]
pub(crate) fn require_role(auth: &AuthUser, allowed: &[StaffRole]) -> Result<StaffRole, Response> {
    match auth.staff_role() {
        Some(role) if allowed.contains(&role) => Ok(role),
        _ => {
            let e = AppError::Forbidden(format!(
                "role '{}' may not perform this operation",
                auth.role()
            ));
            Err(domain_error_response(
                e.status_code(),
                e.error_code(),
                e.to_string(),
            ))
        }
    }
}

/// Maps a domain error carrying `status_code()`/`error_code()` to a response.
pub(crate) fn domain_error_response(
    status_code: u16,
    error_code: &str,
    message: String,
) -> Response {
    let status =
        StatusCode::from_u16(status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(json!({ "error": error_code, "message": message })),
    )
        .into_response()
}
