use axum::extract::{Path, State};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::app::AppState;
use crate::error::ApiError;
use crate::filter::{Condition, Filter};
use crate::middleware::{ApiResponse, ApiResult, JsonBody, MaybeCaller};
use crate::resources::collections::TRADES;
use crate::types::Document;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChange {
    pub status: Option<String>,
    pub approver: Option<String>,
    pub failure_reason: Option<String>,
}

impl StatusChange {
    /// Empty approver or failure reason leaves the stored value alone.
    fn into_changes(self) -> Result<Document, ApiError> {
        let status = self
            .status
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| ApiError::bad_request("status is required"))?;

        let mut changes = Document::new();
        changes.insert("status".to_string(), Value::String(status));
        if let Some(approver) = self.approver.filter(|a| !a.is_empty()) {
            changes.insert("approver".to_string(), Value::String(approver));
        }
        if let Some(reason) = self.failure_reason.filter(|r| !r.is_empty()) {
            changes.insert("failureReason".to_string(), Value::String(reason));
        }
        Ok(changes)
    }
}

/// PATCH /api/trades/:id/status - approve / execute / settle / fail
pub async fn update_status(
    State(state): State<AppState>,
    caller: MaybeCaller,
    Path(trade_id): Path<String>,
    JsonBody(body): JsonBody<StatusChange>,
) -> ApiResult<Document> {
    let changes = body.into_changes()?;
    let status = changes.get("status").cloned().unwrap_or(Value::Null);
    let filter = Filter::matching(Condition::eq("tradeId", trade_id.as_str()));

    let trade = state
        .store
        .update_one(&TRADES, &filter, changes)
        .await?
        .ok_or_else(|| ApiError::not_found("Trade not found"))?;

    info!(trade_id = %trade_id, status = %status, caller = %caller.describe(), "trade status changed");
    Ok(ApiResponse::success(trade))
}
