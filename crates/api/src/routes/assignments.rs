//! Instructor course assignment routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::routes::{domain_error_response, require_role};
use crate::{AppState, middleware::AuthUser};
use registra_db::{
    CourseAssignmentRepository, entities::course_assignments,
    repositories::{AssignmentError, CreateAssignmentInput},
};
use registra_shared::StaffRole;

/// Creates the course assignment routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/course-assignments", post(create_assignment))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for assigning an instructor to a course offering.
#[derive(Debug, Deserialize)]
pub struct CreateAssignmentRequest {
    /// The instructor being assigned.
    pub staff_id: Uuid,
    /// The course offering.
    pub course_offering_id: Uuid,
    /// Section label (e.g. "BSCS-2A").
    pub section: String,
    /// Day of week (e.g. "monday").
    pub day: String,
    /// Class start time, "HH:MM" or "HH:MM:SS".
    pub start_time: String,
    /// Class end time, "HH:MM" or "HH:MM:SS".
    pub end_time: String,
}

/// Response for a created assignment.
#[derive(Debug, Serialize)]
pub struct AssignmentResponse {
    /// Assignment ID.
    pub id: Uuid,
    /// Instructor.
    pub staff_id: Uuid,
    /// Course offering.
    pub course_offering_id: Uuid,
    /// Section label.
    pub section: String,
    /// Day of week, lowercase.
    pub day: String,
    /// Class start time.
    pub start_time: String,
    /// Class end time.
    pub end_time: String,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/course-assignments` - Assign an instructor to a course offering.
async fn create_assignment(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateAssignmentRequest>,
) -> impl IntoResponse {
    if let Err(response) = require_role(&auth, &[StaffRole::ProgramHead, StaffRole::Admin]) {
        return response;
    }

    let start_time = match parse_time(&payload.start_time) {
        Ok(t) => t,
        Err(response) => return response,
    };
    let end_time = match parse_time(&payload.end_time) {
        Ok(t) => t,
        Err(response) => return response,
    };

    let repo = CourseAssignmentRepository::new((*state.db).clone());

    let input = CreateAssignmentInput {
        staff_id: payload.staff_id,
        course_offering_id: payload.course_offering_id,
        section: payload.section,
        day: payload.day,
        start_time,
        end_time,
    };

    match repo.create(input).await {
        Ok(assignment) => {
            info!(
                assignment_id = %assignment.id,
                staff_id = %assignment.staff_id,
                course_offering_id = %assignment.course_offering_id,
                "Course assignment created"
            );

            (
                StatusCode::CREATED,
                Json(assignment_to_response(assignment)),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "Course assignment failed");
            assignment_error_response(&e)
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

#[allow(clippy::result_large_err)]
fn parse_time(s: &str) -> Result<NaiveTime, axum::response::Response> {
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .map_err(|_| {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "INVALID_TIME",
                    "message": format!("Invalid time value: {s}")
                })),
            )
                .into_response()
        })
}

fn assignment_to_response(a: course_assignments::Model) -> AssignmentResponse {
    AssignmentResponse {
        id: a.id,
        staff_id: a.staff_id,
        course_offering_id: a.course_offering_id,
        section: a.section,
        day: a.day,
        start_time: a.start_time.format("%H:%M:%S").to_string(),
        end_time: a.end_time.format("%H:%M:%S").to_string(),
    }
}

fn assignment_error_response(e: &AssignmentError) -> axum::response::Response {
    domain_error_response(e.status_code(), e.error_code(), e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_time_formats() {
        assert!(parse_time("08:00").is_ok());
        assert!(parse_time("08:00:00").is_ok());
        assert!(parse_time("8am").is_err());
    }
}
