use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;

use quill_db::models::MessageChanges;
use quill_types::ObjectId;
use quill_types::api::{
    CreateMessageRequest, DeleteResponse, MessageListResponse, MessageQuery, UpdateMessageRequest,
    UpdateMessageResponse,
};

use crate::error::ApiError;
use crate::rows::message_from_row;
use crate::state::{AppState, blocking};

/// GET /messages — every message, optionally filtered by `?author=`.
/// Always an array, possibly empty.
pub async fn list_messages(
    State(state): State<AppState>,
    query: Result<Query<MessageQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(query) = query?;
    let author = query.author.map(|a| a.to_hex());

    let rows = blocking(move || Ok(state.db.list_messages(author.as_deref())?)).await?;

    Ok(Json(MessageListResponse {
        messages: rows.into_iter().map(message_from_row).collect(),
    }))
}

/// GET /messages/{id} — the bare message document.
pub async fn get_message(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(raw_id) = path?;
    let id = ObjectId::parse(&raw_id)?.to_hex();

    let row = blocking(move || Ok(state.db.get_message(&id)?))
        .await?
        .ok_or_else(|| ApiError::not_found("message", raw_id))?;

    Ok(Json(message_from_row(row)))
}

/// POST /messages — `_id` is optional; one is generated when absent.
pub async fn create_message(
    State(state): State<AppState>,
    payload: Result<Json<CreateMessageRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let id = req.id.unwrap_or_default();

    let row = blocking(move || {
        Ok(state
            .db
            .insert_message(&id.to_hex(), &req.title, &req.body, &req.author.to_hex())?)
    })
    .await?;

    info!("Message {} created by {}", row.id, row.author);
    Ok((StatusCode::CREATED, Json(message_from_row(row))))
}

/// PUT /messages/{id} — partial update; omitted fields keep their values.
pub async fn update_message(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<UpdateMessageRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(raw_id) = path?;
    let id = ObjectId::parse(&raw_id)?.to_hex();
    let Json(req) = payload?;

    let row = blocking(move || {
        let author = req.author.map(|a| a.to_hex());
        let changes = MessageChanges {
            title: req.title.as_deref(),
            body: req.body.as_deref(),
            author: author.as_deref(),
        };
        Ok(state.db.update_message(&id, changes)?)
    })
    .await?
    .ok_or_else(|| ApiError::not_found("message", raw_id))?;

    Ok(Json(UpdateMessageResponse {
        message: message_from_row(row),
    }))
}

/// DELETE /messages/{id} — echoes the id exactly as it appeared in the path.
pub async fn delete_message(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(raw_id) = path?;
    let id = ObjectId::parse(&raw_id)?.to_hex();

    let removed = blocking(move || Ok(state.db.delete_message(&id)?)).await?;
    if !removed {
        return Err(ApiError::not_found("message", raw_id));
    }

    info!("Message {} deleted", raw_id);
    Ok(Json(DeleteResponse::new(raw_id)))
}
