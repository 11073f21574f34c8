//! Collection schemas: required fields, unique keys and write-time defaults.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::store::{Collection, FieldDefault};

use FieldDefault::{EmptyList, EmptyObject, Flag, Number, Text};

pub static USERS: Collection = Collection::new("users")
    .required(&["userId", "name", "email", "role", "department", "passwordHash"])
    .unique(&[&["userId"], &["email"]])
    .defaults(&[("status", Text("Active")), ("mfaEnabled", Flag(false))]);

pub static CLIENTS: Collection = Collection::new("clients")
    .required(&["clientId", "name", "type"])
    .unique(&[&["clientId"]])
    .defaults(&[
        ("aum", Number(0.0)),
        ("relationship", Text("Active")),
        ("kyc", Text("Pending")),
        ("portfolios", EmptyList),
    ]);

pub static FUNDS: Collection = Collection::new("funds")
    .required(&["fundId", "name"])
    .unique(&[&["fundId"]])
    .defaults(&[("currency", Text("NGN")), ("status", Text("Active"))]);

pub static PORTFOLIOS: Collection = Collection::new("portfolios")
    .required(&["portfolioId", "name", "clientId"])
    .unique(&[&["portfolioId"]])
    .defaults(&[
        ("currency", Text("NGN")),
        ("status", Text("Active")),
        ("allocation", EmptyObject),
    ]);

pub static SECURITIES: Collection = Collection::new("securities")
    .required(&["securityId", "ticker", "name"])
    .unique(&[&["securityId"], &["ticker"]])
    .defaults(&[("currency", Text("NGN"))]);

pub static TRADES: Collection = Collection::new("trades")
    .required(&["tradeId"])
    .unique(&[&["tradeId"]])
    .defaults(&[("status", Text("Draft"))]);

pub static SETTLEMENTS: Collection = Collection::new("settlements")
    .required(&["settlementId"])
    .unique(&[&["settlementId"]])
    .defaults(&[("status", Text("Pending"))]);

pub static POSITIONS: Collection = Collection::new("positions")
    .required(&["positionId"])
    .unique(&[&["positionId"]]);

pub static RECONCILIATION_BREAKS: Collection = Collection::new("reconciliation_breaks")
    .required(&["breakId"])
    .unique(&[&["breakId"]])
    .defaults(&[("status", Text("Open"))]);

pub static COMPLIANCE_EVENTS: Collection = Collection::new("compliance_events")
    .required(&["eventId"])
    .unique(&[&["eventId"]])
    .defaults(&[("status", Text("Open"))]);

pub static REGULATORY_SUBMISSIONS: Collection = Collection::new("regulatory_submissions")
    .required(&["submissionId"])
    .unique(&[&["submissionId"]])
    .defaults(&[("status", Text("Not Started"))]);

pub static FEE_RECORDS: Collection = Collection::new("fee_records")
    .required(&["feeId"])
    .unique(&[&["feeId"]])
    .defaults(&[("status", Text("Pending"))]);

pub static AUDIT_LOGS: Collection = Collection::new("audit_logs")
    .required(&["logId"])
    .unique(&[&["logId"]]);

pub static NOTIFICATIONS: Collection = Collection::new("notifications")
    .required(&["notificationId"])
    .unique(&[&["notificationId"]])
    .defaults(&[("read", Flag(false))]);

pub static DOCUMENTS: Collection = Collection::new("documents")
    .required(&["documentId"])
    .unique(&[&["documentId"]])
    .defaults(&[("status", Text("Active"))]);

pub static CORPORATE_ACTIONS: Collection = Collection::new("corporate_actions")
    .required(&["actionId"])
    .unique(&[&["actionId"]])
    .defaults(&[
        ("currency", Text("NGN")),
        ("status", Text("Upcoming")),
        ("affectedPortfolios", EmptyList),
    ]);

pub static JOURNAL_ENTRIES: Collection = Collection::new("journal_entries")
    .required(&["entryId"])
    .unique(&[&["entryId"]]);

pub static TRIAL_BALANCE: Collection = Collection::new("trial_balance")
    .defaults(&[("period", Text("2026-02"))]);

pub static PERFORMANCE_RECORDS: Collection = Collection::new("performance_records")
    .required(&["portfolioId"])
    .unique(&[&["portfolioId"]]);

pub static AUM_TREND: Collection = Collection::new("aum_trend")
    .required(&["month"])
    .unique(&[&["month"]]);

pub static NAV_HISTORY: Collection = Collection::new("nav_history")
    .unique(&[&["fundId", "date"]]);

pub static RECON_SUMMARY: Collection = Collection::new("recon_summary")
    .required(&["date"])
    .unique(&[&["date"]]);

/// Every collection the application owns, in seeding order.
pub static ALL: &[&Collection] = &[
    &USERS,
    &CLIENTS,
    &FUNDS,
    &PORTFOLIOS,
    &SECURITIES,
    &TRADES,
    &SETTLEMENTS,
    &POSITIONS,
    &RECONCILIATION_BREAKS,
    &COMPLIANCE_EVENTS,
    &REGULATORY_SUBMISSIONS,
    &FEE_RECORDS,
    &AUDIT_LOGS,
    &NOTIFICATIONS,
    &DOCUMENTS,
    &CORPORATE_ACTIONS,
    &JOURNAL_ENTRIES,
    &TRIAL_BALANCE,
    &PERFORMANCE_RECORDS,
    &AUM_TREND,
    &NAV_HISTORY,
    &RECON_SUMMARY,
];

static BY_NAME: Lazy<HashMap<&'static str, &'static Collection>> =
    Lazy::new(|| ALL.iter().map(|c| (c.name, *c)).collect());

/// Look up a collection by its storage name.
pub fn by_name(name: &str) -> Option<&'static Collection> {
    BY_NAME.get(name).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn collection_names_are_unique() {
        let names: HashSet<&str> = ALL.iter().map(|c| c.name).collect();
        assert_eq!(names.len(), ALL.len());
    }

    #[test]
    fn lookup_by_name() {
        assert_eq!(by_name("fee_records").map(|c| c.name), Some("fee_records"));
        assert!(by_name("fees").is_none());
    }

    #[test]
    fn nav_history_has_compound_key() {
        assert_eq!(NAV_HISTORY.unique, &[&["fundId", "date"][..]][..]);
    }
}
