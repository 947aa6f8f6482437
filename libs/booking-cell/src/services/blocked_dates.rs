use chrono::{Duration, NaiveDate};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::models::{BlockedDate, BookingError};

/// Maintains the 3-day blocked window around a paid booking. Every mutation
/// is keyed by the owning booking id so overlapping windows of different
/// bookings never interfere.
pub struct BlockedDateService;

impl BlockedDateService {
    /// The blocked window for a booking date: the day before, the day
    /// itself, and the day after.
    pub fn window(date: NaiveDate) -> [NaiveDate; 3] {
        [date - Duration::days(1), date, date + Duration::days(1)]
    }

    /// Inserts the three window rows for a booking. Re-running for the same
    /// booking is a no-op thanks to the (booking_id, date) uniqueness.
    pub async fn block_around(
        conn: &mut SqliteConnection,
        booking_id: i64,
        date: NaiveDate,
    ) -> Result<(), BookingError> {
        for day in Self::window(date) {
            sqlx::query("INSERT OR IGNORE INTO blocked_dates (date, booking_id) VALUES (?, ?)")
                .bind(day)
                .bind(booking_id)
                .execute(&mut *conn)
                .await?;
        }
        debug!("Blocked window around {} for booking {}", date, booking_id);
        Ok(())
    }

    /// Removes only the rows owned by this booking, never by date value.
    pub async fn unblock_around(
        conn: &mut SqliteConnection,
        booking_id: i64,
    ) -> Result<u64, BookingError> {
        let result = sqlx::query("DELETE FROM blocked_dates WHERE booking_id = ?")
            .bind(booking_id)
            .execute(&mut *conn)
            .await?;
        debug!(
            "Removed {} blocked dates for booking {}",
            result.rows_affected(),
            booking_id
        );
        Ok(result.rows_affected())
    }

    pub async fn list(pool: &SqlitePool) -> Result<Vec<BlockedDate>, BookingError> {
        let rows = sqlx::query_as::<_, BlockedDate>(
            "SELECT id, date, booking_id FROM blocked_dates ORDER BY date, booking_id",
        )
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn window_spans_the_neighbor_days() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let window = BlockedDateService::window(date);
        assert_eq!(window[0], NaiveDate::from_ymd_opt(2025, 3, 9).unwrap());
        assert_eq!(window[1], date);
        assert_eq!(window[2], NaiveDate::from_ymd_opt(2025, 3, 11).unwrap());
    }

    #[test]
    fn window_crosses_month_boundaries() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let window = BlockedDateService::window(date);
        assert_eq!(window[0], NaiveDate::from_ymd_opt(2025, 2, 28).unwrap());
        assert_eq!(window[2], NaiveDate::from_ymd_opt(2025, 3, 2).unwrap());
    }
}
