//! Enrollment verification and status routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use serde::Serialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::routes::{domain_error_response, require_role};
use crate::{AppState, middleware::AuthUser};
use registra_core::payment::PaymentError;
use registra_db::{EnrollmentRepository, entities::payment_transactions};
use registra_shared::StaffRole;

/// Creates the enrollment routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/enrollments/{enrollment_id}/verify", put(verify_enrollment))
        .route("/enrollments/{enrollment_id}/receipt", post(submit_receipt))
        .route("/enrollments/{enrollment_id}/confirm", post(confirm_enrollment))
        .route("/enrollments/{enrollment_id}/payments", get(list_payments))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Response for a payment transaction.
#[derive(Debug, Serialize)]
pub struct PaymentTransactionResponse {
    /// Transaction ID.
    pub id: Uuid,
    /// Enrollment ID.
    pub enrollment_id: Uuid,
    /// Student ID.
    pub student_id: Uuid,
    /// Amount paid in this transaction.
    pub amount_paid: String,
    /// Payment timestamp.
    pub payment_date: String,
    /// Payment method.
    pub payment_method: String,
    /// Reference number.
    pub reference_number: String,
    /// Payment status after this transaction.
    pub payment_status: String,
    /// Staff member who recorded the payment.
    pub processed_by: Uuid,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// PUT `/enrollments/{enrollment_id}/verify` - Verify an enrollment and
/// attach its fee schedule.
async fn verify_enrollment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(enrollment_id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(response) = require_role(&auth, &[StaffRole::Registrar, StaffRole::Admin]) {
        return response;
    }

    let repo = EnrollmentRepository::new((*state.db).clone());

    match repo.verify(enrollment_id).await {
        Ok(enrollment) => {
            info!(
                enrollment_id = %enrollment_id,
                total_fee = %enrollment.total_fee.unwrap_or_default(),
                actor = %auth.staff_id(),
                "Enrollment verified"
            );

            (
                StatusCode::OK,
                Json(json!({
                    "success": true,
                    "message": "Enrollment verified"
                })),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, enrollment_id = %enrollment_id, "Enrollment verification failed");
            payment_error_response(&e)
        }
    }
}

/// POST `/enrollments/{enrollment_id}/receipt` - Move a verified
/// enrollment to For Payment.
async fn submit_receipt(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(enrollment_id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(response) = require_role(
        &auth,
        &[StaffRole::Cashier, StaffRole::Registrar, StaffRole::Admin],
    ) {
        return response;
    }

    let repo = EnrollmentRepository::new((*state.db).clone());

    match repo.submit_receipt(enrollment_id).await {
        Ok(_) => {
            info!(enrollment_id = %enrollment_id, actor = %auth.staff_id(), "Receipt submitted");

            (
                StatusCode::OK,
                Json(json!({
                    "success": true,
                    "message": "Enrollment moved to For Payment"
                })),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, enrollment_id = %enrollment_id, "Receipt submission failed");
            payment_error_response(&e)
        }
    }
}

/// POST `/enrollments/{enrollment_id}/confirm` - Confirm full payment and
/// promote to Officially Enrolled.
async fn confirm_enrollment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(enrollment_id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(response) = require_role(&auth, &[StaffRole::Registrar, StaffRole::Admin]) {
        return response;
    }

    let repo = EnrollmentRepository::new((*state.db).clone());

    match repo.mark_officially_enrolled(enrollment_id).await {
        Ok(_) => {
            info!(
                enrollment_id = %enrollment_id,
                actor = %auth.staff_id(),
                "Enrollment confirmed as Officially Enrolled"
            );

            (
                StatusCode::OK,
                Json(json!({
                    "success": true,
                    "message": "Enrollment is now Officially Enrolled"
                })),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, enrollment_id = %enrollment_id, "Enrollment confirmation failed");
            payment_error_response(&e)
        }
    }
}

/// GET `/enrollments/{enrollment_id}/payments` - Payment history, newest
/// first.
async fn list_payments(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(enrollment_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = EnrollmentRepository::new((*state.db).clone());

    match repo.list_payments(enrollment_id).await {
        Ok(transactions) => {
            let items: Vec<PaymentTransactionResponse> = transactions
                .into_iter()
                .map(transaction_to_response)
                .collect();

            (StatusCode::OK, Json(json!({ "data": items }))).into_response()
        }
        Err(e) => {
            error!(error = %e, enrollment_id = %enrollment_id, "Failed to list payments");
            payment_error_response(&e)
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn transaction_to_response(tx: payment_transactions::Model) -> PaymentTransactionResponse {
    use registra_db::entities::sea_orm_active_enums::PaymentStatus;

    let payment_status = match tx.payment_status {
        PaymentStatus::Unpaid => "Unpaid",
        PaymentStatus::Partial => "Partial",
        PaymentStatus::FullyPaid => "Fully Paid",
    }
    .to_string();

    PaymentTransactionResponse {
        id: tx.id,
        enrollment_id: tx.enrollment_id,
        student_id: tx.student_id,
        amount_paid: tx.amount_paid.to_string(),
        payment_date: tx.payment_date.to_rfc3339(),
        payment_method: tx.payment_method,
        reference_number: tx.reference_number,
        payment_status,
        processed_by: tx.processed_by,
    }
}

pub(crate) fn payment_error_response(e: &PaymentError) -> axum::response::Response {
    domain_error_response(e.status_code(), e.error_code(), e.to_string())
}
