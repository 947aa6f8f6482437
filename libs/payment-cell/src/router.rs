use std::sync::Arc;

use axum::{routing::post, Router};

use shared_database::AppState;

use crate::handlers;

pub fn payment_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/createPayment", post(handlers::create_payment))
        .route("/confirmPayment", post(handlers::confirm_payment))
        .with_state(state)
}
