use chrono::{Duration, NaiveDate, NaiveTime};
use sqlx::SqlitePool;
use tracing::debug;

use crate::models::BookingError;

/// The fixed daily time grid: 09:00 through 16:30 in 30-minute steps.
pub fn slot_catalog() -> Vec<NaiveTime> {
    let mut slots = Vec::with_capacity(16);
    let mut current = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
    let last = NaiveTime::from_hms_opt(16, 30, 0).unwrap();
    loop {
        slots.push(current);
        if current == last {
            break;
        }
        current += Duration::minutes(30);
    }
    slots
}

/// Derives free slots for a date by subtracting booked times from the fixed
/// catalog. Bookings are the single source of truth; canceled ones do not
/// occupy a slot.
pub struct AvailabilityService {
    pool: SqlitePool,
}

impl AvailabilityService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn available_times(&self, date: NaiveDate) -> Result<Vec<NaiveTime>, BookingError> {
        debug!("Computing available slots for {}", date);

        let booked: Vec<NaiveTime> = sqlx::query_scalar(
            "SELECT time FROM bookings WHERE date = ? AND status <> 'Canceled'",
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        let free = slot_catalog()
            .into_iter()
            .filter(|slot| !booked.contains(slot))
            .collect();

        Ok(free)
    }
}
