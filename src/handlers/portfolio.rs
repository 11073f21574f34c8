// Per-portfolio views over positions and trades

use axum::extract::{Path, State};

use crate::app::AppState;
use crate::filter::{Condition, Filter, SortDirection};
use crate::middleware::{ApiResponse, ApiResult};
use crate::resources::collections::{POSITIONS, TRADES};
use crate::types::Document;

/// GET /api/positions/portfolio/:portfolioId
pub async fn positions(State(state): State<AppState>, Path(portfolio_id): Path<String>) -> ApiResult<Vec<Document>> {
    let filter = Filter::matching(Condition::eq("portfolioId", portfolio_id));
    let docs = state.store.find(&POSITIONS, &filter).await?;
    Ok(ApiResponse::success(docs))
}

/// GET /api/trades/portfolio/:portfolioId - newest trade date first
pub async fn trades(State(state): State<AppState>, Path(portfolio_id): Path<String>) -> ApiResult<Vec<Document>> {
    let filter = Filter::matching(Condition::eq("portfolioId", portfolio_id)).order_by("tradeDate", SortDirection::Desc);
    let docs = state.store.find(&TRADES, &filter).await?;
    Ok(ApiResponse::success(docs))
}
