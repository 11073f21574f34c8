use serde::Serialize;
use serde_json::json;
use tracing::debug;

use crate::config::DashboardConfig;
use crate::filter::Filter;
use crate::resources::collections::{
    AUM_TREND, CLIENTS, COMPLIANCE_EVENTS, FUNDS, PORTFOLIOS, RECONCILIATION_BREAKS, REGULATORY_SUBMISSIONS,
    SETTLEMENTS, TRADES,
};
use crate::store::{DocumentStore, StoreError};
use crate::types::Document;

/// Cross-collection summary served at `/api/dashboard/metrics`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub total_aum: f64,
    pub aum_growth_mtd: f64,
    pub aum_growth_pct: f64,
    pub total_clients: u64,
    pub active_portfolios: u64,
    pub total_funds: u64,
    pub ytd_revenue: f64,
    pub pending_trades: u64,
    pub failed_settlements: u64,
    pub open_reconciliation_breaks: u64,
    pub open_compliance_breaches: u64,
    /// Counts open submissions by status only; no due-date window is applied.
    pub regulatory_deadlines_this_month: u64,
    /// Last inserted aum-trend record, not the latest by month.
    pub latest_aum_snapshot: Option<Document>,
}

pub struct DashboardService;

impl DashboardService {
    /// Run every sub-query concurrently. Any failure fails the whole summary.
    pub async fn metrics(store: &dyn DocumentStore, figures: &DashboardConfig) -> Result<DashboardMetrics, StoreError> {
        let all = Filter::all();
        let active = Filter::parse(&json!({ "status": "Active" }))?;
        let pending_trades = Filter::parse(&json!({ "status": { "$in": ["Submitted", "Approved", "Executed"] } }))?;
        let failed = Filter::parse(&json!({ "status": "Failed" }))?;
        let unresolved = Filter::parse(&json!({ "status": { "$ne": "Resolved" } }))?;
        let open_breaches = Filter::parse(&json!({ "status": { "$in": ["Escalated", "Under Review", "Open"] } }))?;
        let open_submissions = Filter::parse(&json!({ "status": { "$in": ["In Progress", "Not Started"] } }))?;

        let (
            total_clients,
            active_portfolios,
            total_funds,
            pending_trades,
            failed_settlements,
            open_reconciliation_breaks,
            open_compliance_breaches,
            regulatory_deadlines_this_month,
            total_aum,
            latest_aum_snapshot,
        ) = futures::try_join!(
            store.count(&CLIENTS, &all),
            store.count(&PORTFOLIOS, &active),
            store.count(&FUNDS, &active),
            store.count(&TRADES, &pending_trades),
            store.count(&SETTLEMENTS, &failed),
            store.count(&RECONCILIATION_BREAKS, &unresolved),
            store.count(&COMPLIANCE_EVENTS, &open_breaches),
            store.count(&REGULATORY_SUBMISSIONS, &open_submissions),
            store.sum(&FUNDS, "aum", &all),
            store.latest(&AUM_TREND),
        )?;

        debug!(total_clients, pending_trades, "dashboard metrics computed");

        Ok(DashboardMetrics {
            total_aum,
            aum_growth_mtd: figures.aum_growth_mtd,
            aum_growth_pct: figures.aum_growth_pct,
            total_clients,
            active_portfolios,
            total_funds,
            ytd_revenue: figures.ytd_revenue,
            pending_trades,
            failed_settlements,
            open_reconciliation_breaks,
            open_compliance_breaches,
            regulatory_deadlines_this_month,
            latest_aum_snapshot,
        })
    }
}
