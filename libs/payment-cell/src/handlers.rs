use std::sync::Arc;

use axum::{
    extract::{Extension, State},
    Json,
};
use serde_json::{json, Value};
use tracing::warn;

use notification_cell::Mailer;
use shared_database::AppState;
use shared_models::error::AppError;

use crate::models::{ConfirmPaymentRequest, CreatePaymentRequest, PaymentError};
use crate::services::confirmation::ConfirmationService;
use crate::services::stripe::StripeClient;

fn map_payment_error(e: PaymentError) -> AppError {
    match e {
        PaymentError::BookingNotFound => AppError::NotFound("Booking not found".to_string()),
        PaymentError::NotComplete(status) => AppError::PaymentNotComplete(format!(
            "Payment has not completed: intent status is '{}'",
            status
        )),
        PaymentError::ValidationError(msg) => AppError::ValidationError(msg),
        PaymentError::StripeApi(msg) => AppError::ExternalService(msg),
        PaymentError::Transport(e) => AppError::ExternalService(e.to_string()),
        PaymentError::DatabaseError(msg) => AppError::Database(msg),
    }
}

#[axum::debug_handler]
pub async fn create_payment(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreatePaymentRequest>,
) -> Result<Json<Value>, AppError> {
    let service = ConfirmationService::new(
        state.pool.clone(),
        StripeClient::new(&state.config),
    );

    let intent = service
        .create_intent(request.booking_id, request.amount, request.currency)
        .await
        .map_err(map_payment_error)?;

    Ok(Json(json!({
        "clientSecret": intent.client_secret,
        "paymentIntentId": intent.id
    })))
}

#[axum::debug_handler]
pub async fn confirm_payment(
    State(state): State<Arc<AppState>>,
    Extension(mailer): Extension<Arc<Mailer>>,
    Json(request): Json<ConfirmPaymentRequest>,
) -> Result<Json<Value>, AppError> {
    let service = ConfirmationService::new(
        state.pool.clone(),
        StripeClient::new(&state.config),
    );

    let outcome = service
        .confirm(request.booking_id, &request.payment_id)
        .await
        .map_err(map_payment_error)?;

    // Best-effort notifications, only when this call actually flipped the
    // booking to paid.
    if outcome.newly_confirmed {
        let details = outcome.booking.email_details();
        let payment_id = request.payment_id.clone();
        tokio::spawn(async move {
            if let Err(e) = mailer.send_payment_confirmation(&details).await {
                warn!(
                    "Failed to send payment confirmation for booking {}: {}",
                    details.booking_id, e
                );
            }
            if let Err(e) = mailer
                .send_admin_payment_notice(details.booking_id, &payment_id)
                .await
            {
                warn!(
                    "Failed to send admin payment notice for booking {}: {}",
                    details.booking_id, e
                );
            }
        });
    }

    Ok(Json(json!({
        "booking": outcome.booking,
        "message": "Payment confirmed!"
    })))
}
