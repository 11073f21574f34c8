use axum::extract::State;

use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{DashboardMetrics, DashboardService};

/// GET /api/dashboard/metrics
pub async fn metrics(State(state): State<AppState>) -> ApiResult<DashboardMetrics> {
    let metrics = DashboardService::metrics(state.store.as_ref(), &state.config.dashboard).await?;
    Ok(ApiResponse::success(metrics))
}
