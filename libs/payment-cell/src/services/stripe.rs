use reqwest::Client;
use tracing::{debug, error, info};

use shared_config::AppConfig;

use crate::models::{PaymentError, PaymentIntent, StripeErrorBody};

pub const DEFAULT_CURRENCY: &str = "gbp";

/// Stripe PaymentIntents client.
/// Based on: https://docs.stripe.com/api/payment_intents
///
/// The base URL comes from configuration so tests can point it at a mock
/// server. Stripe takes form-encoded bodies, not JSON.
pub struct StripeClient {
    client: Client,
    secret_key: String,
    base_url: String,
}

impl StripeClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            secret_key: config.stripe_secret_key.clone(),
            base_url: config.stripe_api_base_url.clone(),
        }
    }

    /// Create a payment intent for a booking.
    /// POST /v1/payment_intents
    ///
    /// `amount` is in major units; Stripe wants minor units (pence).
    pub async fn create_intent(
        &self,
        booking_id: i64,
        amount: f64,
        currency: &str,
    ) -> Result<PaymentIntent, PaymentError> {
        let minor_units = (amount * 100.0).round() as i64;
        info!(
            "Creating payment intent for booking {} ({} {})",
            booking_id, minor_units, currency
        );

        let url = format!("{}/v1/payment_intents", self.base_url);
        let params = [
            ("amount", minor_units.to_string()),
            ("currency", currency.to_string()),
            ("metadata[booking_id]", booking_id.to_string()),
        ];

        debug!("Sending payment intent request to: {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.secret_key)
            .form(&params)
            .send()
            .await?;

        let intent = Self::parse_response(response).await?;
        info!("Created payment intent {} for booking {}", intent.id, booking_id);
        Ok(intent)
    }

    /// Retrieve an existing payment intent to check its status.
    /// GET /v1/payment_intents/{id}
    pub async fn retrieve_intent(&self, payment_id: &str) -> Result<PaymentIntent, PaymentError> {
        debug!("Retrieving payment intent {}", payment_id);

        let url = format!("{}/v1/payment_intents/{}", self.base_url, payment_id);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.secret_key)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    async fn parse_response(response: reqwest::Response) -> Result<PaymentIntent, PaymentError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<StripeErrorBody>(&body)
                .ok()
                .and_then(|e| e.error.message)
                .unwrap_or_else(|| format!("HTTP {}", status));
            error!("Stripe request failed: {} - {}", status, message);
            return Err(PaymentError::StripeApi(message));
        }

        serde_json::from_str(&body).map_err(|e| {
            error!("Unparseable Stripe response: {}", e);
            PaymentError::StripeApi(format!("Failed to parse intent response: {}", e))
        })
    }
}
