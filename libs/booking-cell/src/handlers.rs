use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use serde_json::{json, Value};
use tracing::warn;

use notification_cell::Mailer;
use shared_database::AppState;
use shared_models::error::AppError;

use crate::models::{AvailabilityQuery, BookingError, CreateBookingRequest, RescheduleRequest};
use crate::services::availability::AvailabilityService;
use crate::services::blocked_dates::BlockedDateService;
use crate::services::lifecycle::BookingService;

#[axum::debug_handler]
pub async fn get_available_slots(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AvailabilityQuery>,
) -> Result<Json<Value>, AppError> {
    let availability = AvailabilityService::new(state.pool.clone());

    let times = availability
        .available_times(params.date)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(json!(times)))
}

#[axum::debug_handler]
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateBookingRequest>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(state.pool.clone());

    let booking_id = service.create(request).await.map_err(|e| match e {
        BookingError::SlotConflict => {
            AppError::SlotConflict("Slot is already booked".to_string())
        }
        BookingError::ValidationError(msg) => AppError::ValidationError(msg),
        _ => AppError::Internal(e.to_string()),
    })?;

    Ok(Json(json!({
        "bookingId": booking_id,
        "message": "Booking confirmed!"
    })))
}

#[axum::debug_handler]
pub async fn get_bookings(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(state.pool.clone());

    let bookings = service
        .list()
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(json!(bookings)))
}

#[axum::debug_handler]
pub async fn get_booking_details(
    State(state): State<Arc<AppState>>,
    Path(booking_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(state.pool.clone());

    let booking = service.get(booking_id).await.map_err(|e| match e {
        BookingError::NotFound => AppError::NotFound("Booking not found".to_string()),
        _ => AppError::Internal(e.to_string()),
    })?;

    Ok(Json(json!(booking)))
}

#[axum::debug_handler]
pub async fn reschedule_booking(
    State(state): State<Arc<AppState>>,
    Extension(mailer): Extension<Arc<Mailer>>,
    Path(booking_id): Path<i64>,
    Json(request): Json<RescheduleRequest>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(state.pool.clone());

    let booking = service
        .reschedule(booking_id, request.date, request.time)
        .await
        .map_err(|e| match e {
            BookingError::NotFound => AppError::NotFound("Booking not found".to_string()),
            BookingError::SlotConflict => {
                AppError::SlotConflict("The new slot is already booked".to_string())
            }
            BookingError::AlreadyCanceled => {
                AppError::BadRequest("Booking is already canceled".to_string())
            }
            _ => AppError::Internal(e.to_string()),
        })?;

    // Best-effort notification, dispatched after the transaction committed.
    let details = booking.email_details();
    tokio::spawn(async move {
        if let Err(e) = mailer.send_reschedule_notice(&details).await {
            warn!(
                "Failed to send reschedule notice for booking {}: {}",
                details.booking_id, e
            );
        }
    });

    Ok(Json(json!({
        "booking": booking,
        "message": "Booking rescheduled successfully!"
    })))
}

#[axum::debug_handler]
pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    Extension(mailer): Extension<Arc<Mailer>>,
    Path(booking_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(state.pool.clone());

    let booking = service.cancel(booking_id).await.map_err(|e| match e {
        BookingError::NotFound => AppError::NotFound("Booking not found".to_string()),
        BookingError::AlreadyCanceled => {
            AppError::BadRequest("Booking is already canceled".to_string())
        }
        _ => AppError::Internal(e.to_string()),
    })?;

    let details = booking.email_details();
    tokio::spawn(async move {
        if let Err(e) = mailer.send_cancellation_notice(&details).await {
            warn!(
                "Failed to send cancellation notice for booking {}: {}",
                details.booking_id, e
            );
        }
    });

    Ok(Json(json!({ "message": "Booking canceled successfully!" })))
}

#[axum::debug_handler]
pub async fn unblock_blocked_dates(
    State(state): State<Arc<AppState>>,
    Path(booking_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(state.pool.clone());

    let removed = service
        .unblock(booking_id)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(json!({
        "removed": removed,
        "message": "Blocked dates removed"
    })))
}

#[axum::debug_handler]
pub async fn get_blocked_dates(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, AppError> {
    let blocked = BlockedDateService::list(&state.pool)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(json!(blocked)))
}
