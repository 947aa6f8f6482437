use chrono::{NaiveDate, NaiveTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info, warn};

use crate::models::{Booking, BookingError, BookingStatus, CreateBookingRequest, PaymentStatus};
use crate::services::blocked_dates::BlockedDateService;

/// Owns the create/reschedule/cancel transitions for bookings. Slot
/// uniqueness is ultimately enforced by the partial unique index on
/// (date, time) for non-canceled rows; the in-transaction checks here exist
/// to produce precise errors before the index fires.
pub struct BookingService {
    pool: SqlitePool,
}

impl BookingService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, request: CreateBookingRequest) -> Result<i64, BookingError> {
        if request.name.trim().is_empty()
            || request.email.trim().is_empty()
            || request.phone.trim().is_empty()
        {
            return Err(BookingError::ValidationError(
                "name, email and phone are required".to_string(),
            ));
        }

        let mut tx = self.pool.begin().await?;

        if Self::slot_taken(&mut tx, request.date, request.time, None).await? {
            return Err(BookingError::SlotConflict);
        }

        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO bookings \
             (dentist_name, patient_name, email, phone, address, date, time, \
              payment_status, status, user_id, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&request.name)
        .bind(&request.patient_name)
        .bind(&request.email)
        .bind(&request.phone)
        .bind(&request.address)
        .bind(request.date)
        .bind(request.time)
        .bind(PaymentStatus::Pending.as_str())
        .bind(BookingStatus::Active.as_str())
        .bind(request.user_id)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        let booking_id = result.last_insert_rowid();
        info!("Booking {} created for {} {}", booking_id, request.date, request.time);
        Ok(booking_id)
    }

    /// Moves a booking to a new slot. The destination is re-validated against
    /// non-canceled bookings, the old blocked window is dropped, and a new
    /// window is laid down only when the booking is already paid (unpaid
    /// bookings have no window until payment confirmation).
    pub async fn reschedule(
        &self,
        booking_id: i64,
        new_date: NaiveDate,
        new_time: NaiveTime,
    ) -> Result<Booking, BookingError> {
        let mut tx = self.pool.begin().await?;

        let booking = Self::fetch(&mut tx, booking_id)
            .await?
            .ok_or(BookingError::NotFound)?;

        if booking.status == BookingStatus::Canceled {
            return Err(BookingError::AlreadyCanceled);
        }

        if Self::slot_taken(&mut tx, new_date, new_time, Some(booking_id)).await? {
            warn!(
                "Reschedule of booking {} to {} {} rejected: slot taken",
                booking_id, new_date, new_time
            );
            return Err(BookingError::SlotConflict);
        }

        BlockedDateService::unblock_around(&mut tx, booking_id).await?;

        sqlx::query(
            "UPDATE bookings SET date = ?, time = ?, status = ?, updated_at = ? WHERE id = ?",
        )
        .bind(new_date)
        .bind(new_time)
        .bind(BookingStatus::Rescheduled.as_str())
        .bind(Utc::now())
        .bind(booking_id)
        .execute(&mut *tx)
        .await?;

        if booking.payment_status == PaymentStatus::Completed {
            BlockedDateService::block_around(&mut tx, booking_id, new_date).await?;
        }

        let updated = Self::fetch(&mut tx, booking_id)
            .await?
            .ok_or(BookingError::NotFound)?;

        tx.commit().await?;

        info!(
            "Booking {} rescheduled from {} {} to {} {}",
            booking_id, booking.date, booking.time, new_date, new_time
        );
        Ok(updated)
    }

    /// Soft-deletes a booking: the row is kept with status Canceled for
    /// audit, and its blocked window is removed.
    pub async fn cancel(&self, booking_id: i64) -> Result<Booking, BookingError> {
        let mut tx = self.pool.begin().await?;

        let booking = Self::fetch(&mut tx, booking_id)
            .await?
            .ok_or(BookingError::NotFound)?;

        if booking.status == BookingStatus::Canceled {
            return Err(BookingError::AlreadyCanceled);
        }

        sqlx::query("UPDATE bookings SET status = ?, updated_at = ? WHERE id = ?")
            .bind(BookingStatus::Canceled.as_str())
            .bind(Utc::now())
            .bind(booking_id)
            .execute(&mut *tx)
            .await?;

        BlockedDateService::unblock_around(&mut tx, booking_id).await?;

        tx.commit().await?;

        info!("Booking {} canceled", booking_id);
        Ok(booking)
    }

    pub async fn get(&self, booking_id: i64) -> Result<Booking, BookingError> {
        let booking =
            sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = ?")
                .bind(booking_id)
                .fetch_optional(&self.pool)
                .await?;
        booking.ok_or(BookingError::NotFound)
    }

    pub async fn list(&self) -> Result<Vec<Booking>, BookingError> {
        let bookings =
            sqlx::query_as::<_, Booking>("SELECT * FROM bookings ORDER BY date, time")
                .fetch_all(&self.pool)
                .await?;
        Ok(bookings)
    }

    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<Booking>, BookingError> {
        let bookings = sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE user_id = ? ORDER BY date, time",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(bookings)
    }

    /// Drops the blocked window owned by a booking, outside of any larger
    /// transition (DELETE /booking/blocked/{id}).
    pub async fn unblock(&self, booking_id: i64) -> Result<u64, BookingError> {
        let mut conn = self.pool.acquire().await?;
        BlockedDateService::unblock_around(&mut conn, booking_id).await
    }

    async fn fetch(
        conn: &mut SqliteConnection,
        booking_id: i64,
    ) -> Result<Option<Booking>, BookingError> {
        let booking = sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = ?")
            .bind(booking_id)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(booking)
    }

    async fn slot_taken(
        conn: &mut SqliteConnection,
        date: NaiveDate,
        time: NaiveTime,
        exclude_booking_id: Option<i64>,
    ) -> Result<bool, BookingError> {
        let existing: Option<i64> = sqlx::query_scalar(
            "SELECT id FROM bookings \
             WHERE date = ? AND time = ? AND status <> 'Canceled' AND id <> ? \
             LIMIT 1",
        )
        .bind(date)
        .bind(time)
        .bind(exclude_booking_id.unwrap_or(-1))
        .fetch_optional(&mut *conn)
        .await?;

        debug!(
            "Slot check for {} {}: {}",
            date,
            time,
            if existing.is_some() { "taken" } else { "free" }
        );
        Ok(existing.is_some())
    }
}
