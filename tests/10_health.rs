mod common;

use anyhow::Result;
use reqwest::StatusCode;

use common::TestServer;

#[tokio::test]
async fn health_reports_ok_and_service_name() -> Result<()> {
    let server = TestServer::spawn().await?;

    let (status, body) = server.get("/api/health").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "backoffice-api");
    assert!(body["timestamp"].is_string(), "timestamp missing: {}", body);

    Ok(())
}

#[tokio::test]
async fn cors_allows_configured_origin() -> Result<()> {
    let server = TestServer::spawn().await?;
    let origin = server.config.security.cors_origins[0].clone();

    let res = server
        .client
        .get(server.url("/api/health"))
        .header("Origin", &origin)
        .send()
        .await?;

    assert_eq!(
        res.headers().get("access-control-allow-origin").and_then(|v| v.to_str().ok()),
        Some(origin.as_str())
    );
    assert_eq!(
        res.headers().get("access-control-allow-credentials").and_then(|v| v.to_str().ok()),
        Some("true")
    );

    Ok(())
}
