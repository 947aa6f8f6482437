use std::sync::Arc;

use axum::{
    extract::{Extension, Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use tracing::warn;

use booking_cell::BookingService;
use shared_database::AppState;
use shared_models::auth::AuthUser;
use shared_models::error::AppError;

use crate::models::{LoginRequest, NewUser, UserError};
use crate::services::account::AccountService;
use crate::services::avatar::{AvatarStore, DEFAULT_AVATAR};

fn map_user_error(e: UserError) -> AppError {
    match e {
        UserError::NotFound => AppError::NotFound("User not found".to_string()),
        UserError::EmailTaken => AppError::BadRequest("Email is already registered".to_string()),
        UserError::InvalidCredentials => {
            AppError::BadRequest("Invalid email or password".to_string())
        }
        UserError::ValidationError(msg) => AppError::ValidationError(msg),
        UserError::UnsupportedFileType(name) => {
            AppError::BadRequest(format!("Unsupported avatar file type: {}", name))
        }
        other => AppError::Internal(other.to_string()),
    }
}

#[axum::debug_handler]
pub async fn register_user(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let avatars = AvatarStore::new(&state.config.upload_dir);
    let mut form = NewUser::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "name" => form.name = read_text(field).await?,
            "email" => form.email = read_text(field).await?,
            "password" => form.password = read_text(field).await?,
            "role" => form.role = read_text(field).await?,
            "overview" => form.overview = Some(read_text(field).await?),
            "avatar" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Invalid avatar upload: {}", e)))?;
                if !file_name.is_empty() && !data.is_empty() {
                    let path = avatars
                        .save(&file_name, &data)
                        .await
                        .map_err(map_user_error)?;
                    form.avatar = Some(path);
                }
            }
            other => warn!("Ignoring unexpected registration field '{}'", other),
        }
    }

    if form.avatar.is_none() {
        form.avatar = Some(DEFAULT_AVATAR.to_string());
    }

    let service = AccountService::new(state.pool.clone());
    let user = service.register(form).await.map_err(map_user_error)?;

    Ok((StatusCode::CREATED, Json(json!(user))))
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart field: {}", e)))
}

#[axum::debug_handler]
pub async fn login_user(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<Value>, AppError> {
    let service = AccountService::new(state.pool.clone());

    let token = service
        .login(&request.email, &request.password, &state.config.jwt_secret)
        .await
        .map_err(map_user_error)?;

    Ok(Json(json!({ "token": token })))
}

#[axum::debug_handler]
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
) -> Result<Json<Value>, AppError> {
    let user_id: i64 = caller
        .id
        .parse()
        .map_err(|_| AppError::Auth("Invalid token subject".to_string()))?;

    let service = AccountService::new(state.pool.clone());
    let user = service.get(user_id).await.map_err(map_user_error)?;

    Ok(Json(json!(user)))
}

#[axum::debug_handler]
pub async fn get_users(State(state): State<Arc<AppState>>) -> Result<Json<Value>, AppError> {
    let service = AccountService::new(state.pool.clone());
    let users = service.list().await.map_err(map_user_error)?;
    Ok(Json(json!(users)))
}

#[axum::debug_handler]
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let service = AccountService::new(state.pool.clone());
    let user = service.get(user_id).await.map_err(map_user_error)?;
    Ok(Json(json!(user)))
}

#[axum::debug_handler]
pub async fn get_user_bookings(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let accounts = AccountService::new(state.pool.clone());
    accounts.get(user_id).await.map_err(map_user_error)?;

    let bookings = BookingService::new(state.pool.clone())
        .list_for_user(user_id)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(json!(bookings)))
}
