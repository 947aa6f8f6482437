use serde::{Deserialize, Serialize};
use thiserror::Error;

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentRequest {
    pub booking_id: i64,
    /// Amount in major currency units (pounds). Converted to minor units
    /// before it reaches Stripe.
    pub amount: f64,
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmPaymentRequest {
    pub booking_id: i64,
    pub payment_id: String,
}

/// The subset of Stripe's PaymentIntent object this service reads.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PaymentIntent {
    pub id: String,
    pub status: String,
    pub client_secret: Option<String>,
    pub amount: i64,
    pub currency: String,
}

/// Stripe error envelope: `{"error": {"message": ...}}`.
#[derive(Debug, Deserialize)]
pub struct StripeErrorBody {
    pub error: StripeErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct StripeErrorDetail {
    pub message: Option<String>,
    #[serde(rename = "type")]
    pub error_type: Option<String>,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("Booking not found")]
    BookingNotFound,

    #[error("Payment has not completed: intent status is '{0}'")]
    NotComplete(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Stripe API error: {0}")]
    StripeApi(String),

    #[error("Stripe request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for PaymentError {
    fn from(e: sqlx::Error) -> Self {
        PaymentError::DatabaseError(e.to_string())
    }
}
