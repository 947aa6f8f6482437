use chrono::{NaiveDate, NaiveTime, Utc};
use sqlx::SqlitePool;

use booking_cell::BlockedDateService;
use shared_utils::test_utils::{memory_pool, seed_booking};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

async fn blocked_count(pool: &SqlitePool, booking_id: i64) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM blocked_dates WHERE booking_id = ?")
        .bind(booking_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

#[tokio::test]
async fn block_around_creates_exactly_three_owned_rows() {
    let pool = memory_pool().await;
    let day = date(2025, 3, 10);
    let id = seed_booking(&pool, day, time(10, 0), "Completed", "Active", Utc::now()).await;

    let mut conn = pool.acquire().await.unwrap();
    BlockedDateService::block_around(&mut conn, id, day).await.unwrap();
    drop(conn);

    let rows = BlockedDateService::list(&pool).await.unwrap();
    let dates: Vec<NaiveDate> = rows.iter().map(|b| b.date).collect();
    assert_eq!(dates, vec![date(2025, 3, 9), day, date(2025, 3, 11)]);
    assert!(rows.iter().all(|b| b.booking_id == id));
}

#[tokio::test]
async fn block_around_is_idempotent() {
    let pool = memory_pool().await;
    let day = date(2025, 3, 10);
    let id = seed_booking(&pool, day, time(10, 0), "Completed", "Active", Utc::now()).await;

    let mut conn = pool.acquire().await.unwrap();
    BlockedDateService::block_around(&mut conn, id, day).await.unwrap();
    BlockedDateService::block_around(&mut conn, id, day).await.unwrap();
    drop(conn);

    assert_eq!(blocked_count(&pool, id).await, 3);
}

#[tokio::test]
async fn unblock_removes_only_the_owning_bookings_rows() {
    let pool = memory_pool().await;
    // Two bookings one day apart: their windows overlap on March 10/11.
    let first = seed_booking(&pool, date(2025, 3, 10), time(10, 0), "Completed", "Active", Utc::now()).await;
    let second = seed_booking(&pool, date(2025, 3, 11), time(10, 0), "Completed", "Active", Utc::now()).await;

    let mut conn = pool.acquire().await.unwrap();
    BlockedDateService::block_around(&mut conn, first, date(2025, 3, 10)).await.unwrap();
    BlockedDateService::block_around(&mut conn, second, date(2025, 3, 11)).await.unwrap();

    let removed = BlockedDateService::unblock_around(&mut conn, first).await.unwrap();
    drop(conn);

    assert_eq!(removed, 3);
    assert_eq!(blocked_count(&pool, first).await, 0);
    // The overlapping window of the second booking is untouched.
    assert_eq!(blocked_count(&pool, second).await, 3);
    let remaining = BlockedDateService::list(&pool).await.unwrap();
    let dates: Vec<NaiveDate> = remaining.iter().map(|b| b.date).collect();
    assert_eq!(dates, vec![date(2025, 3, 10), date(2025, 3, 11), date(2025, 3, 12)]);
}

#[tokio::test]
async fn deleting_a_booking_cascades_its_blocked_rows() {
    let pool = memory_pool().await;
    let day = date(2025, 3, 10);
    let id = seed_booking(&pool, day, time(10, 0), "Completed", "Active", Utc::now()).await;

    let mut conn = pool.acquire().await.unwrap();
    BlockedDateService::block_around(&mut conn, id, day).await.unwrap();
    drop(conn);

    sqlx::query("DELETE FROM bookings WHERE id = ?")
        .bind(id)
        .execute(&pool)
        .await
        .unwrap();

    assert_eq!(blocked_count(&pool, id).await, 0);
}
