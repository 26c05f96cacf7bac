//! Grade approval workflow routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::routes::domain_error_response;
use crate::{AppState, middleware::AuthUser};
use registra_core::approval::{ApprovalAction, ApprovalError};
use registra_db::{GradeApprovalRepository, entities::grades};

/// Creates the grade routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/grades/approve", post(approve_grade))
        .route("/grades/approve-class", post(approve_class))
        .route("/grades/{grade_id}", get(get_grade))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for a single-grade approval action.
#[derive(Debug, Deserialize)]
pub struct ApproveGradeRequest {
    /// Grade to act on.
    pub grade_id: Uuid,
    /// Action name: registrar_approve, dean_approve, final_approve, reject.
    pub action: String,
    /// Optional reviewer comments (logged, not stored).
    pub comments: Option<String>,
}

/// Request body for a class-wide approval action.
#[derive(Debug, Deserialize)]
pub struct ApproveClassRequest {
    /// Course offering whose grades are acted on.
    pub course_offering_id: Uuid,
    /// Action name: registrar_approve, dean_approve, final_approve, reject.
    pub action: String,
}

/// Response for a grade with its approval trail.
#[derive(Debug, Serialize)]
pub struct GradeResponse {
    /// Grade ID.
    pub id: Uuid,
    /// Student ID.
    pub student_id: Uuid,
    /// Course offering ID.
    pub course_offering_id: Uuid,
    /// Final grade, if encoded.
    pub final_grade: Option<String>,
    /// Current approval status.
    pub approval_status: String,
    /// Registrar who approved, if any.
    pub registrar_approved_by: Option<Uuid>,
    /// When the registrar approved.
    pub registrar_approved_at: Option<String>,
    /// Dean who approved, if any.
    pub dean_approved_by: Option<Uuid>,
    /// When the dean approved.
    pub dean_approved_at: Option<String>,
    /// When the grade was finalized.
    pub final_approved_at: Option<String>,
    /// Created at timestamp.
    pub created_at: String,
    /// Updated at timestamp.
    pub updated_at: String,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/grades/approve` - Apply one approval action to one grade.
async fn approve_grade(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<ApproveGradeRequest>,
) -> impl IntoResponse {
    let Some(action) = ApprovalAction::parse(&payload.action) else {
        let e = ApprovalError::UnknownAction(payload.action);
        return approval_error_response(&e);
    };

    let Some(role) = auth.staff_role() else {
        let e = ApprovalError::RoleNotPermitted {
            role: auth.role().to_string(),
            action,
        };
        return approval_error_response(&e);
    };

    let repo = GradeApprovalRepository::new((*state.db).clone());

    match repo
        .apply_action(payload.grade_id, action, auth.staff_id(), role)
        .await
    {
        Ok(applied) => {
            info!(
                grade_id = %payload.grade_id,
                action = %action,
                actor = %auth.staff_id(),
                comments = payload.comments.as_deref().unwrap_or(""),
                "Grade approval action applied"
            );

            (
                StatusCode::OK,
                Json(json!({
                    "success": true,
                    "message": format!("Action '{action}' applied"),
                    "grade_id": applied.grade.id,
                    "previous_status": applied.previous_status.as_str(),
                    "new_status": applied.new_status.as_str(),
                })),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, grade_id = %payload.grade_id, "Grade approval failed");
            approval_error_response(&e)
        }
    }
}

/// POST `/grades/approve-class` - Apply one action to every grade of an
/// offering.
async fn approve_class(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<ApproveClassRequest>,
) -> impl IntoResponse {
    let Some(action) = ApprovalAction::parse(&payload.action) else {
        let e = ApprovalError::UnknownAction(payload.action);
        return approval_error_response(&e);
    };

    let Some(role) = auth.staff_role() else {
        let e = ApprovalError::RoleNotPermitted {
            role: auth.role().to_string(),
            action,
        };
        return approval_error_response(&e);
    };

    let repo = GradeApprovalRepository::new((*state.db).clone());

    match repo
        .apply_action_to_offering(payload.course_offering_id, action, auth.staff_id(), role)
        .await
    {
        Ok(updated_count) => {
            info!(
                course_offering_id = %payload.course_offering_id,
                action = %action,
                updated_count,
                "Class-wide approval action applied"
            );

            (
                StatusCode::OK,
                Json(json!({
                    "success": true,
                    "message": format!("Action '{action}' applied to {updated_count} grade(s)"),
                    "updated_count": updated_count,
                })),
            )
                .into_response()
        }
        Err(e) => {
            error!(
                error = %e,
                course_offering_id = %payload.course_offering_id,
                "Class-wide approval failed"
            );
            approval_error_response(&e)
        }
    }
}

/// GET `/grades/{grade_id}` - Fetch a grade with its approval trail.
async fn get_grade(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(grade_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = GradeApprovalRepository::new((*state.db).clone());

    match repo.get_grade(grade_id).await {
        Ok(grade) => (StatusCode::OK, Json(grade_to_response(grade))).into_response(),
        Err(e) => {
            error!(error = %e, grade_id = %grade_id, "Failed to get grade");
            approval_error_response(&e)
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn grade_to_response(grade: grades::Model) -> GradeResponse {
    use registra_db::entities::sea_orm_active_enums::GradeApprovalStatus;

    let approval_status = match grade.approval_status {
        GradeApprovalStatus::Pending => "pending",
        GradeApprovalStatus::RegistrarApproved => "registrar_approved",
        GradeApprovalStatus::DeanApproved => "dean_approved",
        GradeApprovalStatus::Final => "final",
    }
    .to_string();

    GradeResponse {
        id: grade.id,
        student_id: grade.student_id,
        course_offering_id: grade.course_offering_id,
        final_grade: grade.final_grade.map(|g| g.to_string()),
        approval_status,
        registrar_approved_by: grade.registrar_approved_by,
        registrar_approved_at: grade.registrar_approved_at.map(|t| t.to_rfc3339()),
        dean_approved_by: grade.dean_approved_by,
        dean_approved_at: grade.dean_approved_at.map(|t| t.to_rfc3339()),
        final_approved_at: grade.final_approved_at.map(|t| t.to_rfc3339()),
        created_at: grade.created_at.to_rfc3339(),
        updated_at: grade.updated_at.to_rfc3339(),
    }
}

fn approval_error_response(e: &ApprovalError) -> axum::response::Response {
    domain_error_response(e.status_code(), e.error_code(), e.to_string())
}
