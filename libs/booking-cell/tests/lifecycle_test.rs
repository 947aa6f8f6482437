use assert_matches::assert_matches;
use chrono::{NaiveDate, NaiveTime};
use sqlx::SqlitePool;

use booking_cell::models::CreateBookingRequest;
use booking_cell::{BlockedDateService, Booking, BookingError, BookingService, BookingStatus, PaymentStatus};
use shared_utils::test_utils::memory_pool;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn request(day: NaiveDate, at: NaiveTime) -> CreateBookingRequest {
    CreateBookingRequest {
        name: "Dr. Molar".to_string(),
        email: "pat@example.com".to_string(),
        phone: "07000000000".to_string(),
        date: day,
        time: at,
        patient_name: Some("Pat Example".to_string()),
        address: Some("1 High St".to_string()),
        user_id: None,
    }
}

async fn blocked_dates_for(pool: &SqlitePool, booking_id: i64) -> Vec<NaiveDate> {
    BlockedDateService::list(pool)
        .await
        .unwrap()
        .into_iter()
        .filter(|b| b.booking_id == booking_id)
        .map(|b| b.date)
        .collect()
}

/// Marks a booking paid the way payment confirmation does, so reschedule
/// tests can exercise the paid path.
async fn mark_paid_and_blocked(pool: &SqlitePool, booking: &Booking) {
    sqlx::query("UPDATE bookings SET payment_status = 'Completed' WHERE id = ?")
        .bind(booking.id)
        .execute(pool)
        .await
        .unwrap();
    let mut conn = pool.acquire().await.unwrap();
    BlockedDateService::block_around(&mut conn, booking.id, booking.date)
        .await
        .unwrap();
}

#[tokio::test]
async fn create_returns_id_and_persists_a_pending_booking() {
    let pool = memory_pool().await;
    let service = BookingService::new(pool.clone());

    let id = service
        .create(request(date(2025, 3, 10), time(10, 0)))
        .await
        .unwrap();

    let booking = service.get(id).await.unwrap();
    assert_eq!(booking.payment_status, PaymentStatus::Pending);
    assert_eq!(booking.status, BookingStatus::Active);
    assert_eq!(booking.date, date(2025, 3, 10));
    assert_eq!(booking.time, time(10, 0));
    // No blocked dates until payment confirmation.
    assert!(blocked_dates_for(&pool, id).await.is_empty());
}

#[tokio::test]
async fn second_booking_at_the_same_slot_is_a_conflict() {
    let pool = memory_pool().await;
    let service = BookingService::new(pool.clone());

    service
        .create(request(date(2025, 3, 10), time(10, 0)))
        .await
        .unwrap();
    let second = service.create(request(date(2025, 3, 10), time(10, 0))).await;

    assert_matches!(second, Err(BookingError::SlotConflict));

    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM bookings WHERE date = ? AND time = ? AND status <> 'Canceled'",
    )
    .bind(date(2025, 3, 10))
    .bind(time(10, 0))
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn same_time_on_another_day_is_fine() {
    let pool = memory_pool().await;
    let service = BookingService::new(pool);

    service.create(request(date(2025, 3, 10), time(10, 0))).await.unwrap();
    service.create(request(date(2025, 3, 11), time(10, 0))).await.unwrap();
}

#[tokio::test]
async fn create_requires_contact_fields() {
    let pool = memory_pool().await;
    let service = BookingService::new(pool);

    let mut bad = request(date(2025, 3, 10), time(10, 0));
    bad.name = "  ".to_string();

    assert_matches!(
        service.create(bad).await,
        Err(BookingError::ValidationError(_))
    );
}

#[tokio::test]
async fn canceled_slot_can_be_rebooked() {
    let pool = memory_pool().await;
    let service = BookingService::new(pool);

    let id = service.create(request(date(2025, 3, 10), time(10, 0))).await.unwrap();
    service.cancel(id).await.unwrap();

    // Soft-deleted booking no longer occupies the slot.
    service.create(request(date(2025, 3, 10), time(10, 0))).await.unwrap();
}

#[tokio::test]
async fn cancel_soft_deletes_and_unblocks() {
    let pool = memory_pool().await;
    let service = BookingService::new(pool.clone());

    let id = service.create(request(date(2025, 3, 10), time(10, 0))).await.unwrap();
    let booking = service.get(id).await.unwrap();
    mark_paid_and_blocked(&pool, &booking).await;
    assert_eq!(blocked_dates_for(&pool, id).await.len(), 3);

    service.cancel(id).await.unwrap();

    let canceled = service.get(id).await.unwrap();
    assert_eq!(canceled.status, BookingStatus::Canceled);
    assert!(blocked_dates_for(&pool, id).await.is_empty());
}

#[tokio::test]
async fn cancel_twice_is_rejected() {
    let pool = memory_pool().await;
    let service = BookingService::new(pool);

    let id = service.create(request(date(2025, 3, 10), time(10, 0))).await.unwrap();
    service.cancel(id).await.unwrap();

    assert_matches!(service.cancel(id).await, Err(BookingError::AlreadyCanceled));
}

#[tokio::test]
async fn cancel_unknown_booking_is_not_found() {
    let pool = memory_pool().await;
    let service = BookingService::new(pool);

    assert_matches!(service.cancel(999).await, Err(BookingError::NotFound));
}

#[tokio::test]
async fn reschedule_updates_slot_and_status() {
    let pool = memory_pool().await;
    let service = BookingService::new(pool);

    let id = service.create(request(date(2025, 3, 10), time(10, 0))).await.unwrap();
    let updated = service
        .reschedule(id, date(2025, 3, 12), time(11, 30))
        .await
        .unwrap();

    assert_eq!(updated.date, date(2025, 3, 12));
    assert_eq!(updated.time, time(11, 30));
    assert_eq!(updated.status, BookingStatus::Rescheduled);
}

#[tokio::test]
async fn reschedule_revalidates_the_destination_slot() {
    let pool = memory_pool().await;
    let service = BookingService::new(pool);

    let first = service.create(request(date(2025, 3, 10), time(10, 0))).await.unwrap();
    service.create(request(date(2025, 3, 11), time(9, 30))).await.unwrap();

    assert_matches!(
        service.reschedule(first, date(2025, 3, 11), time(9, 30)).await,
        Err(BookingError::SlotConflict)
    );

    // The failed attempt must not have moved the booking.
    let booking = service.get(first).await.unwrap();
    assert_eq!(booking.date, date(2025, 3, 10));
    assert_eq!(booking.status, BookingStatus::Active);
}

#[tokio::test]
async fn reschedule_onto_its_own_slot_is_allowed() {
    let pool = memory_pool().await;
    let service = BookingService::new(pool);

    let id = service.create(request(date(2025, 3, 10), time(10, 0))).await.unwrap();
    service.reschedule(id, date(2025, 3, 10), time(10, 0)).await.unwrap();
}

#[tokio::test]
async fn reschedule_moves_a_paid_bookings_blocked_window() {
    let pool = memory_pool().await;
    let service = BookingService::new(pool.clone());

    let id = service.create(request(date(2025, 3, 10), time(10, 0))).await.unwrap();
    let booking = service.get(id).await.unwrap();
    mark_paid_and_blocked(&pool, &booking).await;

    service.reschedule(id, date(2025, 3, 20), time(14, 0)).await.unwrap();

    let dates = blocked_dates_for(&pool, id).await;
    assert_eq!(dates, vec![date(2025, 3, 19), date(2025, 3, 20), date(2025, 3, 21)]);
}

#[tokio::test]
async fn reschedule_of_an_unpaid_booking_creates_no_window() {
    let pool = memory_pool().await;
    let service = BookingService::new(pool.clone());

    let id = service.create(request(date(2025, 3, 10), time(10, 0))).await.unwrap();
    service.reschedule(id, date(2025, 3, 20), time(14, 0)).await.unwrap();

    assert!(blocked_dates_for(&pool, id).await.is_empty());
}

#[tokio::test]
async fn reschedule_unknown_booking_is_not_found() {
    let pool = memory_pool().await;
    let service = BookingService::new(pool);

    assert_matches!(
        service.reschedule(999, date(2025, 3, 10), time(10, 0)).await,
        Err(BookingError::NotFound)
    );
}

#[tokio::test]
async fn list_returns_all_bookings_in_calendar_order() {
    let pool = memory_pool().await;
    let service = BookingService::new(pool);

    service.create(request(date(2025, 3, 12), time(9, 0))).await.unwrap();
    service.create(request(date(2025, 3, 10), time(16, 30))).await.unwrap();
    service.create(request(date(2025, 3, 10), time(9, 0))).await.unwrap();

    let bookings = service.list().await.unwrap();
    let slots: Vec<(NaiveDate, NaiveTime)> =
        bookings.iter().map(|b| (b.date, b.time)).collect();
    assert_eq!(
        slots,
        vec![
            (date(2025, 3, 10), time(9, 0)),
            (date(2025, 3, 10), time(16, 30)),
            (date(2025, 3, 12), time(9, 0)),
        ]
    );
}
