use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub backend: StoreBackend,
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub cors_origins: Vec<String>,
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
}

/// Dashboard figures with no derivation in the data; served as configured values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    pub aum_growth_mtd: f64,
    pub aum_growth_pct: f64,
    pub ytd_revenue: f64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            aum_growth_mtd: 3_300_000_000.0,
            aum_growth_pct: 4.02,
            ytd_revenue: 486_250_000.0,
        }
    }
}

const DEV_JWT_SECRET: &str = "backoffice-dev-secret";

fn local_origins() -> Vec<String> {
    ["http://localhost:5000", "http://localhost:3000", "http://localhost:5173"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("BACKEND_HOST") {
            self.server.host = v;
        }
        if let Ok(v) = env::var("BACKEND_PORT") {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_BACKEND") {
            self.database.backend = match v.to_ascii_lowercase().as_str() {
                "memory" => StoreBackend::Memory,
                "postgres" | "postgresql" => StoreBackend::Postgres,
                _ => self.database.backend,
            };
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = Some(v);
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }
        if let Ok(v) = env::var("FRONTEND_URL") {
            if !self.security.cors_origins.contains(&v) {
                self.security.cors_origins.push(v);
            }
        }
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("SECURITY_JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }

        // Dashboard overrides
        if let Ok(v) = env::var("DASHBOARD_AUM_GROWTH_MTD") {
            self.dashboard.aum_growth_mtd = v.parse().unwrap_or(self.dashboard.aum_growth_mtd);
        }
        if let Ok(v) = env::var("DASHBOARD_AUM_GROWTH_PCT") {
            self.dashboard.aum_growth_pct = v.parse().unwrap_or(self.dashboard.aum_growth_pct);
        }
        if let Ok(v) = env::var("DASHBOARD_YTD_REVENUE") {
            self.dashboard.ytd_revenue = v.parse().unwrap_or(self.dashboard.ytd_revenue);
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "localhost".to_string(),
                port: 4000,
            },
            database: DatabaseConfig {
                backend: StoreBackend::Postgres,
                url: None,
                max_connections: 10,
                connection_timeout: 30,
            },
            security: SecurityConfig {
                cors_origins: local_origins(),
                jwt_secret: DEV_JWT_SECRET.to_string(),
                jwt_expiry_hours: 24,
            },
            dashboard: DashboardConfig::default(),
        }
    }

    /// In-memory store on an ephemeral port; used by the integration tests.
    pub fn testing() -> Self {
        let mut config = Self::development();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = 0;
        config.database.backend = StoreBackend::Memory;
        config
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 4000,
            },
            database: DatabaseConfig {
                backend: StoreBackend::Postgres,
                url: None,
                max_connections: 20,
                connection_timeout: 10,
            },
            security: SecurityConfig {
                cors_origins: local_origins(),
                jwt_secret: DEV_JWT_SECRET.to_string(),
                jwt_expiry_hours: 24,
            },
            dashboard: DashboardConfig::default(),
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 4000,
            },
            database: DatabaseConfig {
                backend: StoreBackend::Postgres,
                url: None,
                max_connections: 50,
                connection_timeout: 5,
            },
            security: SecurityConfig {
                cors_origins: Vec::new(),
                // Must come from JWT_SECRET
                jwt_secret: String::new(),
                jwt_expiry_hours: 24,
            },
            dashboard: DashboardConfig::default(),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.server.port, 4000);
        assert_eq!(config.database.backend, StoreBackend::Postgres);
        assert_eq!(config.security.cors_origins.len(), 3);
        assert_eq!(config.security.jwt_expiry_hours, 24);
        assert!(!config.is_production());
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert_eq!(config.server.host, "0.0.0.0");
        assert!(config.security.jwt_secret.is_empty());
        assert!(config.is_production());
    }

    #[test]
    fn test_dashboard_defaults() {
        let dashboard = DashboardConfig::default();
        assert_eq!(dashboard.aum_growth_mtd, 3_300_000_000.0);
        assert_eq!(dashboard.aum_growth_pct, 4.02);
        assert_eq!(dashboard.ytd_revenue, 486_250_000.0);
    }

    #[test]
    fn test_testing_config_uses_memory_store() {
        let config = AppConfig::testing();
        assert_eq!(config.database.backend, StoreBackend::Memory);
        assert_eq!(config.bind_address(), "127.0.0.1:0");
    }
}
