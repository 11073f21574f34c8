// handlers/crud.rs - the five generic operations for every registered resource
//
// Each route carries its descriptor as an `Extension`, so one set of handlers
// serves the whole registry.

use std::sync::Arc;

use axum::extract::{Extension, Path, State};
use serde_json::{json, Value};
use tracing::info;

use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult, JsonBody, MaybeCaller};
use crate::resources::{Resource, ResourceDescriptor, StoredResource};
use crate::types::Document;

fn resource(state: &AppState, descriptor: Arc<ResourceDescriptor>) -> StoredResource {
    StoredResource::new(descriptor, state.store.clone())
}

/// GET /api/:resource
pub async fn list(
    State(state): State<AppState>,
    Extension(descriptor): Extension<Arc<ResourceDescriptor>>,
) -> ApiResult<Vec<Document>> {
    let docs = resource(&state, descriptor).list().await?;
    Ok(ApiResponse::success(docs))
}

/// GET /api/:resource/:id
pub async fn get_one(
    State(state): State<AppState>,
    Extension(descriptor): Extension<Arc<ResourceDescriptor>>,
    Path(id): Path<String>,
) -> ApiResult<Document> {
    let doc = resource(&state, descriptor).get_one(&id).await?;
    Ok(ApiResponse::success(doc))
}

/// POST /api/:resource
pub async fn create(
    State(state): State<AppState>,
    Extension(descriptor): Extension<Arc<ResourceDescriptor>>,
    caller: MaybeCaller,
    JsonBody(payload): JsonBody<Document>,
) -> ApiResult<Document> {
    let name = descriptor.name;
    let doc = resource(&state, descriptor).create(payload).await?;
    info!(resource = name, caller = %caller.describe(), "created record");
    Ok(ApiResponse::created(doc))
}

/// PUT /api/:resource/:id
pub async fn update(
    State(state): State<AppState>,
    Extension(descriptor): Extension<Arc<ResourceDescriptor>>,
    caller: MaybeCaller,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<Document>,
) -> ApiResult<Document> {
    let name = descriptor.name;
    let doc = resource(&state, descriptor).update(&id, payload).await?;
    info!(resource = name, id = %id, caller = %caller.describe(), "updated record");
    Ok(ApiResponse::success(doc))
}

/// DELETE /api/:resource/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(descriptor): Extension<Arc<ResourceDescriptor>>,
    caller: MaybeCaller,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    let name = descriptor.name;
    resource(&state, descriptor).delete(&id).await?;
    info!(resource = name, id = %id, caller = %caller.describe(), "deleted record");
    Ok(ApiResponse::success(json!({ "message": "Deleted successfully" })))
}
