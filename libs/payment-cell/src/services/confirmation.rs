use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{info, warn};

use booking_cell::{BlockedDateService, Booking, PaymentStatus};

use crate::models::{PaymentError, PaymentIntent};
use crate::services::stripe::{StripeClient, DEFAULT_CURRENCY};

/// Outcome of a confirmation. `newly_confirmed` is false when the booking
/// was already paid, so callers can skip duplicate notifications.
#[derive(Debug)]
pub struct ConfirmOutcome {
    pub booking: Booking,
    pub newly_confirmed: bool,
}

/// Coordinates Stripe payment intents with booking state. Confirmation is
/// the point where a booking's blocked window materializes.
pub struct ConfirmationService {
    pool: SqlitePool,
    stripe: StripeClient,
}

impl ConfirmationService {
    pub fn new(pool: SqlitePool, stripe: StripeClient) -> Self {
        Self { pool, stripe }
    }

    /// Create a Stripe intent for an existing booking. No booking state
    /// changes here; the booking stays Pending until confirmation.
    pub async fn create_intent(
        &self,
        booking_id: i64,
        amount: f64,
        currency: Option<String>,
    ) -> Result<PaymentIntent, PaymentError> {
        if amount <= 0.0 {
            return Err(PaymentError::ValidationError(
                "amount must be positive".to_string(),
            ));
        }

        let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM bookings WHERE id = ?")
            .bind(booking_id)
            .fetch_optional(&self.pool)
            .await?;
        if exists.is_none() {
            return Err(PaymentError::BookingNotFound);
        }

        let currency = currency.unwrap_or_else(|| DEFAULT_CURRENCY.to_string());
        self.stripe.create_intent(booking_id, amount, &currency).await
    }

    /// Verify the intent with Stripe and, if it succeeded, mark the booking
    /// paid and lay down its blocked window. Stripe rejection leaves the
    /// database untouched. Confirming an already-paid booking is a no-op
    /// success so client retries cannot double-block or double-mail.
    pub async fn confirm(
        &self,
        booking_id: i64,
        payment_id: &str,
    ) -> Result<ConfirmOutcome, PaymentError> {
        let intent = self.stripe.retrieve_intent(payment_id).await?;
        if intent.status != "succeeded" {
            warn!(
                "Payment {} for booking {} not complete: status '{}'",
                payment_id, booking_id, intent.status
            );
            return Err(PaymentError::NotComplete(intent.status));
        }

        let mut tx = self.pool.begin().await?;

        let booking = sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = ?")
            .bind(booking_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(PaymentError::BookingNotFound)?;

        if booking.payment_status == PaymentStatus::Completed {
            info!("Booking {} already confirmed, skipping", booking_id);
            return Ok(ConfirmOutcome {
                booking,
                newly_confirmed: false,
            });
        }

        sqlx::query(
            "UPDATE bookings SET payment_status = ?, payment_id = ?, updated_at = ? WHERE id = ?",
        )
        .bind(PaymentStatus::Completed.as_str())
        .bind(payment_id)
        .bind(Utc::now())
        .bind(booking_id)
        .execute(&mut *tx)
        .await?;

        BlockedDateService::block_around(&mut tx, booking_id, booking.date)
            .await
            .map_err(|e| PaymentError::DatabaseError(e.to_string()))?;

        let booking = sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = ?")
            .bind(booking_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(
            "Booking {} confirmed with payment {}, window blocked around {}",
            booking_id, payment_id, booking.date
        );
        Ok(ConfirmOutcome {
            booking,
            newly_confirmed: true,
        })
    }
}
