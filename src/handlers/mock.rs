// handlers/mock.rs - /api/mock/* canned external-service endpoints

use axum::{extract::Path, Json};
use serde_json::Value;

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, JsonBody};
use crate::services::mock::{self, StrCheckRequest, StrCheckResult};

pub async fn ngx_market_data() -> Json<Value> {
    Json(mock::ngx_market_data())
}

pub async fn ngx_quote(Path(ticker): Path<String>) -> ApiResult<Value> {
    mock::ngx_quote(&ticker)
        .map(ApiResponse::success)
        .ok_or_else(|| ApiError::not_found(format!("Ticker {} not found", ticker)))
}

pub async fn fmdq_bond_prices() -> Json<Value> {
    Json(mock::fmdq_bond_prices())
}

pub async fn cbn_tbill_rates() -> Json<Value> {
    Json(mock::cbn_tbill_rates())
}

pub async fn cscs_settlement_status(Path(trade_ref): Path<String>) -> Json<Value> {
    Json(mock::cscs_settlement_status(&trade_ref))
}

pub async fn sec_regulatory_calendar() -> Json<Value> {
    Json(mock::sec_regulatory_calendar())
}

pub async fn nfiu_str_check(JsonBody(request): JsonBody<StrCheckRequest>) -> ApiResult<StrCheckResult> {
    Ok(ApiResponse::success(mock::nfiu_str_check(request)))
}

pub async fn fx_rates() -> Json<Value> {
    Json(mock::fx_rates())
}
