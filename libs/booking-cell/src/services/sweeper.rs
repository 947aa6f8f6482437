use chrono::{DateTime, Duration, Utc};
use sqlx::SqlitePool;
use tracing::{debug, error, info};

use crate::models::BookingError;

/// How often the sweep runs.
pub const SWEEP_INTERVAL: std::time::Duration = std::time::Duration::from_secs(60);

/// How long an unpaid booking may sit before it is reclaimed.
pub const EXPIRY_THRESHOLD_MINUTES: i64 = 5;

/// Deletes pending bookings created before the cutoff. The delete is
/// conditional on the row still being Pending, so a payment confirmed
/// between scan and delete survives. No blocked dates exist pre-payment,
/// so nothing else needs compensating.
pub async fn sweep_expired(
    pool: &SqlitePool,
    cutoff: DateTime<Utc>,
) -> Result<u64, BookingError> {
    let result = sqlx::query(
        "DELETE FROM bookings WHERE payment_status = 'Pending' AND created_at < ?",
    )
    .bind(cutoff)
    .execute(pool)
    .await?;

    let removed = result.rows_affected();
    if removed > 0 {
        info!("Sweeper removed {} expired pending bookings", removed);
    } else {
        debug!("Sweeper found no expired pending bookings");
    }
    Ok(removed)
}

/// Background loop: one sweep per tick, each in its own statement, errors
/// logged and retried on the next tick.
pub async fn run(pool: SqlitePool) {
    info!(
        "Starting expiration sweeper (every {:?}, threshold {} min)",
        SWEEP_INTERVAL, EXPIRY_THRESHOLD_MINUTES
    );

    let mut ticker = tokio::time::interval(SWEEP_INTERVAL);
    loop {
        ticker.tick().await;
        let cutoff = Utc::now() - Duration::minutes(EXPIRY_THRESHOLD_MINUTES);
        if let Err(e) = sweep_expired(&pool, cutoff).await {
            error!("Sweep failed: {}", e);
        }
    }
}
