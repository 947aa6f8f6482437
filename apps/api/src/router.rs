use std::sync::Arc;

use axum::{extract::Extension, routing::get, Router};
use tower_http::services::ServeDir;

use booking_cell::router::booking_routes;
use notification_cell::Mailer;
use payment_cell::router::payment_routes;
use shared_database::AppState;
use user_cell::router::user_routes;

pub fn create_router(state: Arc<AppState>) -> Router {
    let mailer = Arc::new(Mailer::new(&state.config));

    Router::new()
        .route("/", get(|| async { "DNH Dental API is running!" }))
        .nest("/booking", booking_routes(state.clone()))
        .nest("/payment", payment_routes(state.clone()))
        .nest("/users", user_routes(state.clone()))
        .nest_service("/uploads", ServeDir::new(&state.config.upload_dir))
        .layer(Extension(mailer))
}
