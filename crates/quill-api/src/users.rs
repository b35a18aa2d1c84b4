use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;

use quill_db::models::UserChanges;
use quill_types::ObjectId;
use quill_types::api::{
    CreateUserRequest, DeleteResponse, UpdateUserRequest, UpdateUserResponse, UserListResponse,
};

use crate::error::ApiError;
use crate::rows::user_from_row;
use crate::state::{AppState, blocking};

/// Hash a password with Argon2id and a fresh random salt, as a PHC string.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ApiError::Internal(format!("password hashing failed: {}", e)))?;
    Ok(hash.to_string())
}

pub async fn list_users(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let rows = blocking(move || Ok(state.db.list_users()?)).await?;

    Ok(Json(UserListResponse {
        users: rows.into_iter().map(user_from_row).collect(),
    }))
}

pub async fn get_user(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(raw_id) = path?;
    let id = ObjectId::parse(&raw_id)?.to_hex();

    let row = blocking(move || Ok(state.db.get_user(&id)?))
        .await?
        .ok_or_else(|| ApiError::not_found("user", raw_id))?;

    Ok(Json(user_from_row(row)))
}

/// POST /users — the password is hashed before it reaches the store.
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let id = req.id.unwrap_or_default();

    let row = blocking(move || {
        let password_hash = hash_password(&req.password)?;
        Ok(state
            .db
            .create_user(&id.to_hex(), &req.username, &password_hash)?)
    })
    .await?;

    info!("User {} created ({})", row.id, row.username);
    Ok((StatusCode::CREATED, Json(user_from_row(row))))
}

/// PUT /users/{id} — partial update; a new password is re-hashed.
pub async fn update_user(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(raw_id) = path?;
    let id = ObjectId::parse(&raw_id)?.to_hex();
    let Json(req) = payload?;

    let row = blocking(move || {
        let password_hash = req.password.as_deref().map(hash_password).transpose()?;
        let changes = UserChanges {
            username: req.username.as_deref(),
            password_hash: password_hash.as_deref(),
        };
        Ok(state.db.update_user(&id, changes)?)
    })
    .await?
    .ok_or_else(|| ApiError::not_found("user", raw_id))?;

    Ok(Json(UpdateUserResponse {
        user: user_from_row(row),
    }))
}

/// DELETE /users/{id} — the user's messages are left in place.
pub async fn delete_user(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(raw_id) = path?;
    let id = ObjectId::parse(&raw_id)?.to_hex();

    let removed = blocking(move || Ok(state.db.delete_user(&id)?)).await?;
    if !removed {
        return Err(ApiError::not_found("user", raw_id));
    }

    info!("User {} deleted", raw_id);
    Ok(Json(DeleteResponse::new(raw_id)))
}
