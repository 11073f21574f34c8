//! Canned responses standing in for exchange, regulator and custodian feeds.

use std::collections::HashMap;

use chrono::Utc;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Transactions above this amount are flagged for a suspicious transaction report.
pub const STR_THRESHOLD: f64 = 100_000_000.0;

const NGX_AS_OF: &str = "2026-02-23 16:00:00 WAT";

static QUOTES: Lazy<HashMap<&'static str, Value>> = Lazy::new(|| {
    HashMap::from([
        ("DANGCEM", json!({ "ticker": "DANGCEM", "name": "Dangote Cement PLC", "open": 497.50, "high": 512.00, "low": 496.20, "close": 510.00, "prevClose": 497.50, "volume": 4820000, "vwap": 505.40, "trades": 342 })),
        ("GTCO", json!({ "ticker": "GTCO", "name": "Guaranty Trust Holding Co.", "open": 48.80, "high": 49.20, "low": 48.10, "close": 48.50, "prevClose": 48.80, "volume": 18350000, "vwap": 48.65, "trades": 1284 })),
        ("ZENITHBANK", json!({ "ticker": "ZENITHBANK", "name": "Zenith Bank PLC", "open": 36.50, "high": 37.50, "low": 36.30, "close": 37.20, "prevClose": 36.50, "volume": 22100000, "vwap": 36.90, "trades": 1567 })),
        ("MTNN", json!({ "ticker": "MTNN", "name": "MTN Nigeria", "open": 195.00, "high": 199.50, "low": 194.50, "close": 198.00, "prevClose": 195.00, "volume": 3200000, "vwap": 197.20, "trades": 425 })),
        ("SEPLAT", json!({ "ticker": "SEPLAT", "name": "Seplat Energy PLC", "open": 4100.00, "high": 4280.00, "low": 4080.00, "close": 4250.00, "prevClose": 4100.00, "volume": 185000, "vwap": 4200.00, "trades": 89 })),
    ])
});

static CSCS_SETTLEMENTS: Lazy<HashMap<&'static str, Value>> = Lazy::new(|| {
    HashMap::from([
        ("TRD-2026-0248", json!({ "tradeRef": "TRD-2026-0248", "cscsRef": "CSCS-2026-88412", "status": "Settled", "dvpStatus": "Matched", "settledDate": "2026-02-24", "shares": 50000, "consideration": 25678500, "custodianBank": "Stanbic IBTC" })),
        ("TRD-2026-0247", json!({ "tradeRef": "TRD-2026-0247", "cscsRef": "CSCS-2026-88415", "status": "Pending", "dvpStatus": "Awaiting Match", "settledDate": null, "shares": 500000000, "consideration": 492496125, "custodianBank": "HSBC Nigeria" })),
        ("TRD-2026-0242", json!({ "tradeRef": "TRD-2026-0242", "cscsRef": "CSCS-2026-88390", "status": "Failed", "dvpStatus": "Rejected", "settledDate": null, "failureReason": "Insufficient bond allocation", "shares": 250000000, "consideration": 256378125 })),
    ])
});

/// Prepend source attribution to a canned record.
fn attributed(source: &str, as_of: &str, record: &Value) -> Value {
    let mut out = json!({ "source": source, "asOf": as_of });
    if let (Some(out_map), Some(fields)) = (out.as_object_mut(), record.as_object()) {
        out_map.extend(fields.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    out
}

pub fn ngx_market_data() -> Value {
    json!({
        "source": "NGX (Mock)",
        "asOf": NGX_AS_OF,
        "indexName": "All-Share Index",
        "indexValue": 107245.82,
        "indexChange": 1245.30,
        "indexChangePct": 1.18,
        "marketCap": "62,480,000,000,000",
        "volume": 485200000,
        "value": 12850000000u64,
        "advancers": 32,
        "decliners": 18,
        "unchanged": 12,
        "topGainers": [
            { "ticker": "SEPLAT", "price": 4250.00, "change": 150.00, "changePct": 3.66 },
            { "ticker": "DANGCEM", "price": 510.00, "change": 12.50, "changePct": 2.51 },
            { "ticker": "ZENITHBANK", "price": 37.20, "change": 0.70, "changePct": 1.92 },
        ],
        "topLosers": [
            { "ticker": "AIRTELAFRI", "price": 1890.00, "change": -20.00, "changePct": -1.05 },
            { "ticker": "GTCO", "price": 48.50, "change": -0.30, "changePct": -0.61 },
            { "ticker": "UBA", "price": 23.50, "change": -0.10, "changePct": -0.42 },
        ],
    })
}

/// Quote lookup is case-insensitive on the ticker.
pub fn ngx_quote(ticker: &str) -> Option<Value> {
    QUOTES
        .get(ticker.to_ascii_uppercase().as_str())
        .map(|quote| attributed("NGX (Mock)", NGX_AS_OF, quote))
}

pub fn fmdq_bond_prices() -> Value {
    json!({
        "source": "FMDQ (Mock)",
        "asOf": "2026-02-23 15:00:00 WAT",
        "bonds": [
            { "isin": "NGFGN2704A7", "ticker": "FGN-APR-27", "coupon": 13.98, "maturity": "2027-04-23", "bidPrice": 98.30, "askPrice": 98.60, "midPrice": 98.45, "yieldBid": 14.60, "yieldAsk": 14.44, "duration": 1.17 },
            { "isin": "NGFGN2902A9", "ticker": "FGN-FEB-29", "coupon": 14.55, "maturity": "2029-02-14", "bidPrice": 97.05, "askPrice": 97.35, "midPrice": 97.20, "yieldBid": 15.25, "yieldAsk": 15.11, "duration": 2.75 },
            { "isin": "NGFGN3206B2", "ticker": "FGN-JUN-32", "coupon": 16.25, "maturity": "2032-06-18", "bidPrice": 102.30, "askPrice": 102.70, "midPrice": 102.50, "yieldBid": 15.95, "yieldAsk": 15.83, "duration": 5.12 },
            { "isin": "NGFGN3503C5", "ticker": "FGN-MAR-35", "coupon": 17.00, "maturity": "2035-03-26", "bidPrice": 101.60, "askPrice": 102.00, "midPrice": 101.80, "yieldBid": 16.78, "yieldAsk": 16.66, "duration": 7.44 },
        ],
    })
}

pub fn cbn_tbill_rates() -> Value {
    json!({
        "source": "CBN (Mock)",
        "asOf": "2026-02-20",
        "auctionDate": "2026-02-19",
        "results": [
            { "tenor": "91-day", "stopRate": 22.50, "amountOffered": 100000000000u64, "amountAllotted": 89500000000u64, "bidToOffer": 2.45 },
            { "tenor": "182-day", "stopRate": 23.10, "amountOffered": 100000000000u64, "amountAllotted": 92100000000u64, "bidToOffer": 2.78 },
            { "tenor": "364-day", "stopRate": 23.75, "amountOffered": 100000000000u64, "amountAllotted": 95400000000u64, "bidToOffer": 3.12 },
        ],
        "mprRate": 27.50,
        "cashReserveRatio": 50.00,
        "inflationRate": 33.20,
        "exchangeRate": { "usdNgn": 1580.00, "source": "CBN Official" },
    })
}

/// Unknown references get a not-found status body rather than an error.
pub fn cscs_settlement_status(trade_ref: &str) -> Value {
    match CSCS_SETTLEMENTS.get(trade_ref) {
        Some(record) => {
            let as_of = Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
            attributed("CSCS (Mock)", &as_of, record)
        }
        None => json!({ "tradeRef": trade_ref, "status": "Not Found at CSCS" }),
    }
}

pub fn sec_regulatory_calendar() -> Value {
    json!({
        "source": "SEC Nigeria (Mock)",
        "calendar": [
            { "returnType": "Quarterly Return", "period": "Q4 2025", "dueDate": "2026-02-28", "status": "Due", "filingGuide": "SEC Form QR-2025", "penaltyForLate": "₦500,000 per day" },
            { "returnType": "Annual Return", "period": "FY 2025", "dueDate": "2026-06-30", "status": "Upcoming", "filingGuide": "SEC Form AR-2025", "penaltyForLate": "₦1,000,000 per day" },
            { "returnType": "AML/CFT Compliance Report", "period": "H1 2026", "dueDate": "2026-07-31", "status": "Upcoming", "filingGuide": "NFIU Form AML-H1" },
        ],
        "notices": [
            { "date": "2026-02-15", "title": "Circular on Updated Capital Adequacy Requirements", "refNo": "SEC/CDIR/01/2026" },
            { "date": "2026-02-10", "title": "Guidelines on ESG Reporting for Fund Managers", "refNo": "SEC/CDIR/02/2026" },
        ],
    })
}

pub fn fx_rates() -> Value {
    json!({
        "source": "CBN / Reuters (Mock)",
        "asOf": "2026-02-23 15:30:00 WAT",
        "rates": [
            { "pair": "USD/NGN", "bid": 1578.50, "ask": 1581.50, "mid": 1580.00, "source": "CBN Official" },
            { "pair": "EUR/NGN", "bid": 1710.20, "ask": 1714.80, "mid": 1712.50, "source": "Interbank" },
            { "pair": "GBP/NGN", "bid": 2005.40, "ask": 2010.60, "mid": 2008.00, "source": "Interbank" },
        ],
    })
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrCheckRequest {
    pub transaction_amt: Option<f64>,
    pub client_name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrCheckResult {
    pub source: &'static str,
    pub client_name: Option<String>,
    pub transaction_amt: Option<f64>,
    pub threshold: f64,
    pub flagged: bool,
    pub recommendation: &'static str,
    pub reference_id: String,
}

pub fn nfiu_str_check(request: StrCheckRequest) -> StrCheckResult {
    let flagged = request.transaction_amt.is_some_and(|amt| amt > STR_THRESHOLD);
    StrCheckResult {
        source: "NFIU (Mock)",
        client_name: request.client_name,
        transaction_amt: request.transaction_amt,
        threshold: STR_THRESHOLD,
        flagged,
        recommendation: if flagged {
            "Suspicious Transaction — File STR with NFIU within 72 hours"
        } else {
            "Transaction within normal parameters — no STR required"
        },
        reference_id: format!("NFIU-CHK-{}", Utc::now().timestamp_millis()),
    }
}
