mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

use backoffice_api::resources::collections;
use backoffice_api::store::DocumentStore;

use common::TestServer;

#[tokio::test]
async fn nav_history_filters_by_fund_and_sorts_by_date() -> Result<()> {
    let server = TestServer::spawn().await?;
    // nav history is read-only over HTTP
    for (fund, date) in [("F001", "2026-02-21"), ("F002", "2025-08-31"), ("F001", "2025-08-31"), ("F001", "2025-09-30")] {
        let doc = common::object(json!({ "fundId": fund, "date": date, "nav": 100.0 }));
        server.store.insert(&collections::NAV_HISTORY, doc).await?;
    }

    let (status, list) = server.get("/api/nav-history?fundId=F001").await?;
    assert_eq!(status, StatusCode::OK);
    let dates: Vec<&str> = list
        .as_array()
        .map(|docs| docs.iter().filter_map(|d| d["date"].as_str()).collect())
        .unwrap_or_default();
    assert_eq!(dates, vec!["2025-08-31", "2025-09-30", "2026-02-21"]);

    let (_, all) = server.get("/api/nav-history").await?;
    assert_eq!(all.as_array().map(Vec::len), Some(4));

    let (_, blank) = server.get("/api/nav-history?fundId=").await?;
    assert_eq!(blank.as_array().map(Vec::len), Some(4));

    let (_, none) = server.get("/api/nav-history?fundId=F404").await?;
    assert_eq!(none, json!([]));

    Ok(())
}

#[tokio::test]
async fn portfolio_positions_and_trades() -> Result<()> {
    let server = TestServer::spawn().await?;
    server.post("/api/positions", &json!({ "positionId": "POS1", "portfolioId": "P001" })).await?;
    server.post("/api/positions", &json!({ "positionId": "POS2", "portfolioId": "P002" })).await?;
    server.post("/api/trades", &json!({ "tradeId": "T1", "portfolioId": "P001", "tradeDate": "2026-02-18" })).await?;
    server.post("/api/trades", &json!({ "tradeId": "T2", "portfolioId": "P001", "tradeDate": "2026-02-21" })).await?;
    server.post("/api/trades", &json!({ "tradeId": "T3", "portfolioId": "P002", "tradeDate": "2026-02-20" })).await?;

    let (_, positions) = server.get("/api/positions/portfolio/P001").await?;
    assert_eq!(positions.as_array().map(Vec::len), Some(1));
    assert_eq!(positions[0]["positionId"], "POS1");

    let (_, trades) = server.get("/api/trades/portfolio/P001").await?;
    let ids: Vec<&str> = trades
        .as_array()
        .map(|docs| docs.iter().filter_map(|d| d["tradeId"].as_str()).collect())
        .unwrap_or_default();
    assert_eq!(ids, vec!["T2", "T1"]);

    let (status, empty) = server.get("/api/positions/portfolio/P404").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(empty, json!([]));

    Ok(())
}

#[tokio::test]
async fn trade_status_transition() -> Result<()> {
    let server = TestServer::spawn().await?;
    server.post("/api/trades", &json!({ "tradeId": "TRD-1", "status": "Submitted" })).await?;

    let (status, trade) = server
        .patch("/api/trades/TRD-1/status", &json!({ "status": "Approved", "approver": "Emeka Nwachukwu" }))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(trade["status"], "Approved");
    assert_eq!(trade["approver"], "Emeka Nwachukwu");

    let (status, trade) = server
        .patch("/api/trades/TRD-1/status", &json!({ "status": "Failed", "failureReason": "CSCS rejection" }))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(trade["failureReason"], "CSCS rejection");
    assert_eq!(trade["approver"], "Emeka Nwachukwu");

    let (status, body) = server.patch("/api/trades/TRD-404/status", &json!({ "status": "Approved" })).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Trade not found");

    let (status, _) = server.patch("/api/trades/TRD-1/status", &json!({ "approver": "x" })).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn notifications_mark_read() -> Result<()> {
    let server = TestServer::spawn().await?;
    for id in ["N001", "N002", "N003"] {
        let (_, created) = server.post("/api/notifications", &json!({ "notificationId": id })).await?;
        assert_eq!(created["read"], false);
    }

    let (status, one) = server.patch("/api/notifications/N001/read", &json!({})).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(one["read"], true);

    let (_, fetched) = server.get("/api/notifications/N002").await?;
    assert_eq!(fetched["read"], false);

    let (status, body) = server.patch("/api/notifications/read-all", &json!({})).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "All notifications marked as read");

    let (_, list) = server.get("/api/notifications").await?;
    let all_read = list
        .as_array()
        .map(|docs| docs.iter().all(|d| d["read"] == true))
        .unwrap_or(false);
    assert!(all_read);

    let (status, _) = server.patch("/api/notifications/N404/read", &json!({})).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = server.get("/api/notifications/read-all").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "message": "Not found" }));

    Ok(())
}

#[tokio::test]
async fn mock_market_data_endpoints() -> Result<()> {
    let server = TestServer::spawn().await?;

    let (status, quote) = server.get("/api/mock/ngx/quote/dangcem").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(quote["ticker"], "DANGCEM");
    assert_eq!(quote["source"], "NGX (Mock)");

    let (status, _) = server.get("/api/mock/ngx/quote/NOPE").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, cscs) = server.get("/api/mock/cscs/settlement-status/TRD-0000").await?;
    assert_eq!(cscs["status"], "Not Found at CSCS");

    for path in ["/api/mock/ngx/market-data", "/api/mock/fmdq/bond-prices", "/api/mock/cbn/tbill-rates", "/api/mock/sec/regulatory-calendar", "/api/mock/fx/rates"] {
        let (status, body) = server.get(path).await?;
        assert_eq!(status, StatusCode::OK, "{}", path);
        assert!(body["source"].is_string(), "{} has no source: {}", path, body);
    }

    Ok(())
}

#[tokio::test]
async fn nfiu_str_check_flags_large_transactions() -> Result<()> {
    let server = TestServer::spawn().await?;

    let (status, flagged) = server
        .post("/api/mock/nfiu/str-check", &json!({ "transactionAmt": 125000000, "clientName": "Alhaji Musa Dangiwa" }))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(flagged["flagged"], true);
    assert_eq!(flagged["clientName"], "Alhaji Musa Dangiwa");

    let (_, clear) = server.post("/api/mock/nfiu/str-check", &json!({ "transactionAmt": 5000000 })).await?;
    assert_eq!(clear["flagged"], false);

    Ok(())
}
