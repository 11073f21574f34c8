#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};

use backoffice_api::auth::hash_password_with_cost;
use backoffice_api::config::AppConfig;
use backoffice_api::resources::{collections, ResourceRegistry};
use backoffice_api::store::{DocumentStore, MemoryStore};
use backoffice_api::types::Document;
use backoffice_api::{app, AppState};

pub const TEST_PASSWORD: &str = "ValuAlliance2026!";

/// One in-process server per test, backed by its own empty memory store.
pub struct TestServer {
    pub base_url: String,
    pub client: reqwest::Client,
    pub store: Arc<MemoryStore>,
    pub config: AppConfig,
}

impl TestServer {
    pub async fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let mut config = AppConfig::testing();
        config.server.port = port;

        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(store.clone(), ResourceRegistry::standard(), config.clone());

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test port")?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app(state)).await;
        });

        let server = Self { base_url, client: reqwest::Client::new(), store, config };
        server.wait_ready(Duration::from_secs(5)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Ok(resp) = self.client.get(self.url("/api/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get(&self, path: &str) -> Result<(StatusCode, Value)> {
        let res = self.client.get(self.url(path)).send().await?;
        Ok((res.status(), res.json().await?))
    }

    pub async fn post(&self, path: &str, body: &Value) -> Result<(StatusCode, Value)> {
        let res = self.client.post(self.url(path)).json(body).send().await?;
        Ok((res.status(), res.json().await?))
    }

    pub async fn put(&self, path: &str, body: &Value) -> Result<(StatusCode, Value)> {
        let res = self.client.put(self.url(path)).json(body).send().await?;
        Ok((res.status(), res.json().await?))
    }

    pub async fn patch(&self, path: &str, body: &Value) -> Result<(StatusCode, Value)> {
        let res = self.client.patch(self.url(path)).json(body).send().await?;
        Ok((res.status(), res.json().await?))
    }

    pub async fn delete(&self, path: &str) -> Result<(StatusCode, Value)> {
        let res = self.client.delete(self.url(path)).send().await?;
        Ok((res.status(), res.json().await?))
    }

    /// Users have no create route; insert straight into the store with a cheap hash.
    pub async fn insert_user(&self, user_id: &str, email: &str) -> Result<Document> {
        let hash = hash_password_with_cost(TEST_PASSWORD, 4)?;
        let doc = object(json!({
            "userId": user_id,
            "name": "Adaeze Okonkwo",
            "email": email,
            "role": "Portfolio Manager",
            "department": "Investments",
            "initials": "AO",
            "passwordHash": hash,
        }));
        Ok(self.store.insert(&collections::USERS, doc).await?)
    }
}

pub fn object(value: Value) -> Document {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {}", other),
    }
}
