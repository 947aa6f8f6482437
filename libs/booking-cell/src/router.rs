use std::sync::Arc;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use shared_database::AppState;

use crate::handlers;

pub fn booking_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/available", get(handlers::get_available_slots))
        .route("/booking", post(handlers::create_booking))
        .route("/bookings", get(handlers::get_bookings))
        .route("/reschedule/{booking_id}", patch(handlers::reschedule_booking))
        .route("/cancel/{booking_id}", delete(handlers::cancel_booking))
        .route("/blocked/{booking_id}", delete(handlers::unblock_blocked_dates))
        .route("/block", get(handlers::get_blocked_dates))
        .route("/{booking_id}", get(handlers::get_booking_details))
        .with_state(state)
}
