use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Serialize;
use tracing::{error, info};

use super::AppState;
use super::error::{AppError, AppResult};
use crate::core::Item;

#[derive(Debug, Serialize)]
pub struct ApiMessage {
    pub message: String,
}

pub async fn healthcheck() -> Json<ApiMessage> {
    Json(ApiMessage {
        message: "ok".to_string(),
    })
}

pub async fn list_items(State(state): State<AppState>) -> AppResult<Json<Vec<Item>>> {
    Ok(Json(state.service.find_all().await?))
}

pub async fn create_item(
    State(state): State<AppState>,
    Json(payload): Json<Item>,
) -> AppResult<(StatusCode, Json<Item>)> {
    validate_payload(&payload)?;

    let created = state.service.save(payload).await?;
    info!(item_id = ?created.id, "created item");

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> AppResult<Json<Item>> {
    let item = state
        .service
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("item not found"))?;

    Ok(Json(item))
}

pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(mut payload): Json<Item>,
) -> AppResult<Json<Item>> {
    validate_payload(&payload)?;

    if state.service.find_by_id(id).await?.is_none() {
        return Err(AppError::not_found("item not found"));
    }

    // The path id wins over whatever the payload carries.
    payload.id = Some(id);
    let updated = state.service.save(payload).await?;
    info!(item_id = id, "updated item");

    Ok(Json(updated))
}

pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> AppResult<StatusCode> {
    if !state.service.delete_by_id(id).await? {
        return Err(AppError::not_found("item not found"));
    }

    info!(item_id = id, "deleted item");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn process_items(State(state): State<AppState>) -> AppResult<Json<Vec<Item>>> {
    let items = state.service.process_items().await.map_err(|err| {
        error!(error = %err, "batch orchestration task failed");
        AppError::internal()
    })?;

    Ok(Json(items))
}

fn validate_payload(payload: &Item) -> AppResult<()> {
    let errors = payload.validate();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::validation(errors.join("; ")))
    }
}
