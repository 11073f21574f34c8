use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, patch, post, MethodRouter},
    Extension, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::warn;

use crate::config::AppConfig;
use crate::handlers;
use crate::resources::{ResourceDescriptor, ResourceRegistry};
use crate::store::DocumentStore;

/// Shared dependencies handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub registry: Arc<ResourceRegistry>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, registry: ResourceRegistry, config: AppConfig) -> Self {
        Self {
            store,
            registry: Arc::new(registry),
            config: Arc::new(config),
        }
    }
}

pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        .route("/api/health", get(handlers::health::health))
        .merge(auth_routes())
        .merge(special_routes())
        .merge(resource_routes(&state.registry))
        .nest("/api/mock", mock_routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn auth_routes() -> Router<AppState> {
    use handlers::auth;

    Router::new()
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/me", get(auth::me))
}

/// Operations outside the generic five. Static segments win over `:id` captures.
fn special_routes() -> Router<AppState> {
    use handlers::{dashboard, nav_history, notifications, portfolio, trades};

    Router::new()
        .route("/api/dashboard/metrics", get(dashboard::metrics))
        .route("/api/nav-history", get(nav_history::list))
        .route("/api/positions/portfolio/:portfolio_id", get(portfolio::positions))
        .route("/api/trades/portfolio/:portfolio_id", get(portfolio::trades))
        .route("/api/trades/:id/status", patch(trades::update_status))
        .route(
            "/api/notifications/read-all",
            get(notifications::read_all_as_item).patch(notifications::mark_all_read),
        )
        .route("/api/notifications/:id/read", patch(notifications::mark_one_read))
}

/// One collection route and one item route per registered resource.
fn resource_routes(registry: &ResourceRegistry) -> Router<AppState> {
    use handlers::crud;

    let mut router = Router::new();
    for descriptor in registry.iter() {
        let ops = descriptor.operations;

        let mut collection: MethodRouter<AppState> = MethodRouter::new();
        if ops.list {
            collection = collection.get(crud::list);
        }
        if ops.create {
            collection = collection.post(crud::create);
        }

        let mut item: MethodRouter<AppState> = MethodRouter::new();
        if ops.get {
            item = item.get(crud::get_one);
        }
        if ops.update {
            item = item.put(crud::update);
        }
        if ops.delete {
            item = item.delete(crud::delete);
        }

        let path = descriptor.path();
        router = router
            .route(&path, collection.layer(extension(descriptor)))
            .route(&format!("{}/:id", path), item.layer(extension(descriptor)));
    }
    router
}

fn extension(descriptor: &Arc<ResourceDescriptor>) -> Extension<Arc<ResourceDescriptor>> {
    Extension(descriptor.clone())
}

fn mock_routes() -> Router<AppState> {
    use handlers::mock;

    Router::new()
        .route("/ngx/market-data", get(mock::ngx_market_data))
        .route("/ngx/quote/:ticker", get(mock::ngx_quote))
        .route("/fmdq/bond-prices", get(mock::fmdq_bond_prices))
        .route("/cbn/tbill-rates", get(mock::cbn_tbill_rates))
        .route("/cscs/settlement-status/:trade_ref", get(mock::cscs_settlement_status))
        .route("/sec/regulatory-calendar", get(mock::sec_regulatory_calendar))
        .route("/nfiu/str-check", post(mock::nfiu_str_check))
        .route("/fx/rates", get(mock::fx_rates))
}

/// Explicit origin list with credentials; unparseable origins are skipped.
fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn test_app() -> Router {
        let state = AppState::new(Arc::new(MemoryStore::new()), ResourceRegistry::standard(), AppConfig::testing());
        app(state)
    }

    async fn status_of(method: &str, uri: &str) -> StatusCode {
        let request = Request::builder().method(method).uri(uri).body(Body::empty()).unwrap();
        test_app().oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn health_reports_ok_with_memory_store() {
        assert_eq!(status_of("GET", "/api/health").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_record_is_404() {
        assert_eq!(status_of("GET", "/api/clients/C999").await, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn users_have_no_create_or_delete_route() {
        assert_eq!(status_of("DELETE", "/api/users/U001").await, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(status_of("GET", "/api/users").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn unknown_resource_is_routing_404() {
        assert_eq!(status_of("GET", "/api/widgets").await, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn read_all_is_not_captured_as_an_id() {
        assert_eq!(status_of("PATCH", "/api/notifications/read-all").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn get_read_all_is_an_item_lookup() {
        let request = Request::builder()
            .uri("/api/notifications/read-all")
            .body(Body::empty())
            .unwrap();
        let response = test_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, serde_json::json!({ "message": "Not found" }));
    }
}
