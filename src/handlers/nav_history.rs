use axum::extract::{Query, State};
use serde::Deserialize;

use crate::app::AppState;
use crate::filter::{Condition, Filter, SortDirection};
use crate::middleware::{ApiResponse, ApiResult};
use crate::resources::collections::NAV_HISTORY;
use crate::types::Document;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavHistoryQuery {
    pub fund_id: Option<String>,
}

/// GET /api/nav-history?fundId=... - all funds when the filter is absent or empty
pub async fn list(State(state): State<AppState>, Query(query): Query<NavHistoryQuery>) -> ApiResult<Vec<Document>> {
    let filter = match query.fund_id.filter(|id| !id.is_empty()) {
        Some(fund_id) => Filter::matching(Condition::eq("fundId", fund_id)),
        None => Filter::all(),
    }
    .order_by("date", SortDirection::Asc);

    let docs = state.store.find(&NAV_HISTORY, &filter).await?;
    Ok(ApiResponse::success(docs))
}
