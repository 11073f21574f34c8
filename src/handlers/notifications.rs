use axum::extract::{Path, State};
use serde_json::{json, Value};
use tracing::info;

use crate::app::AppState;
use crate::error::ApiError;
use crate::filter::{Condition, Filter};
use crate::middleware::{ApiResponse, ApiResult};
use crate::resources::collections::NOTIFICATIONS;
use crate::resources::{Resource, StoredResource};
use crate::types::Document;

fn mark_read() -> Document {
    let mut changes = Document::new();
    changes.insert("read".to_string(), Value::Bool(true));
    changes
}

/// PATCH /api/notifications/:id/read
pub async fn mark_one_read(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Document> {
    let filter = Filter::matching(Condition::eq("notificationId", id));
    let doc = state
        .store
        .update_one(&NOTIFICATIONS, &filter, mark_read())
        .await?
        .ok_or_else(|| ApiError::not_found("Not found"))?;
    Ok(ApiResponse::success(doc))
}

/// PATCH /api/notifications/read-all
pub async fn mark_all_read(State(state): State<AppState>) -> ApiResult<Value> {
    let touched = state.store.update_many(&NOTIFICATIONS, &Filter::all(), mark_read()).await?;
    info!(touched, "notifications marked as read");
    Ok(ApiResponse::success(json!({ "message": "All notifications marked as read" })))
}

/// GET /api/notifications/read-all - the static segment shadows the item route, so look it up as an id
pub async fn read_all_as_item(State(state): State<AppState>) -> ApiResult<Document> {
    let descriptor = state
        .registry
        .get("notifications")
        .ok_or_else(|| ApiError::not_found("Not found"))?;
    let doc = StoredResource::new(descriptor, state.store.clone()).get_one("read-all").await?;
    Ok(ApiResponse::success(doc))
}
