//! Counter payment routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::routes::{enrollments::payment_error_response, require_role};
use crate::{AppState, middleware::AuthUser};
use registra_db::{EnrollmentRepository, repositories::RecordPaymentInput};
use registra_shared::StaffRole;

/// Creates the payment routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/payments/counter", post(record_counter_payment))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for recording a counter payment.
#[derive(Debug, Deserialize)]
pub struct CounterPaymentRequest {
    /// Enrollment to pay against.
    pub enrollment_id: Uuid,
    /// Payment amount; accepts both a JSON number and a decimal string.
    pub amount_paid: Decimal,
    /// Payment method (e.g. "cash", "gcash", "bank_transfer").
    pub payment_method: String,
    /// Caller-supplied reference number; generated when absent.
    pub reference_number: Option<String>,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/payments/counter` - Record a counter payment.
async fn record_counter_payment(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CounterPaymentRequest>,
) -> impl IntoResponse {
    if let Err(response) = require_role(
        &auth,
        &[StaffRole::Cashier, StaffRole::Registrar, StaffRole::Admin],
    ) {
        return response;
    }

    let amount = payload.amount_paid;
    let repo = EnrollmentRepository::new((*state.db).clone());

    let input = RecordPaymentInput {
        amount,
        payment_method: payload.payment_method,
        reference_number: payload.reference_number,
        processed_by: auth.staff_id(),
    };

    match repo.record_payment(payload.enrollment_id, input).await {
        Ok(recorded) => {
            info!(
                enrollment_id = %payload.enrollment_id,
                transaction_id = %recorded.transaction_id,
                reference_number = %recorded.reference_number,
                amount = %amount,
                actor = %auth.staff_id(),
                "Counter payment recorded"
            );

            (
                StatusCode::OK,
                Json(json!({
                    "success": true,
                    "transaction_id": recorded.transaction_id,
                    "reference_number": recorded.reference_number,
                    "payment_status": recorded.payment_status.as_str(),
                    "remaining_balance": recorded.remaining_balance.to_string(),
                })),
            )
                .into_response()
        }
        Err(e) => {
            error!(
                error = %e,
                enrollment_id = %payload.enrollment_id,
                "Counter payment failed"
            );
            payment_error_response(&e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_accepts_numeric_json() {
        let request: CounterPaymentRequest = serde_json::from_value(json!({
            "enrollment_id": Uuid::new_v4(),
            "amount_paid": 4000,
            "payment_method": "cash",
        }))
        .expect("numeric amount");
        assert_eq!(request.amount_paid, Decimal::from(4000));
        assert!(request.reference_number.is_none());
    }

    #[test]
    fn amount_accepts_decimal_string_json() {
        let request: CounterPaymentRequest = serde_json::from_value(json!({
            "enrollment_id": Uuid::new_v4(),
            "amount_paid": "2500.50",
            "payment_method": "gcash",
            "reference_number": "OR-1234",
        }))
        .expect("string amount");
        assert_eq!(request.amount_paid, Decimal::new(250050, 2));
    }
}
