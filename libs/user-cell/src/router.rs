use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_database::AppState;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn user_routes(state: Arc<AppState>) -> Router {
    let protected = Router::new()
        .route("/profile", get(handlers::get_profile))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/register", post(handlers::register_user))
        .route("/login", post(handlers::login_user))
        .route("/", get(handlers::get_users))
        .route("/{user_id}", get(handlers::get_user))
        .route("/{user_id}/bookings", get(handlers::get_user_bookings))
        .merge(protected)
        .with_state(state)
}
