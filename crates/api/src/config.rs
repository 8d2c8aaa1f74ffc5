use std::time::Duration;

use doorway_control::ControllerConfig;
use doorway_core::session::{SessionContext, StoreIdentity};

/// Default gateway base URL (the production door-control service).
pub const DEFAULT_GATEWAY_BASE_URL: &str = "https://openpath-api-prod.azurewebsites.net";

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development. In production,
/// override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Door-control gateway base URL.
    pub gateway_base_url: String,
    /// Per-request gateway timeout in seconds (default: `10`).
    pub gateway_timeout_secs: u64,
    /// Auto-relock grace period in seconds (default: `5`).
    pub relock_grace_secs: u64,
    /// Display name recorded as `RequestedBy`.
    pub session_user_name: String,
    /// Stores the session may operate; the first is selected on startup.
    pub stores: Vec<StoreIdentity>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `GATEWAY_BASE_URL`     | production gateway         |
    /// | `GATEWAY_TIMEOUT_SECS` | `10`                       |
    /// | `RELOCK_GRACE_SECS`    | `5`                        |
    /// | `SESSION_USER_NAME`    | `Unknown`                  |
    /// | `SESSION_STORES`       | JSON array of stores; overrides `STORE_*` |
    /// | `STORE_ID`, `STORE_NAME`, `STORE_TENANT_KEY`, `STORE_ENTRY_ID`, `STORE_ADDRESS` | empty |
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Panics on malformed values so misconfiguration fails fast at startup.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str, default: &str| var(key).unwrap_or_else(|| default.to_string());

        let host = get("HOST", "0.0.0.0");

        let port: u16 = get("PORT", "3000")
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = get("CORS_ORIGINS", "http://localhost:5173")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = get("REQUEST_TIMEOUT_SECS", "30")
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let gateway_base_url = get("GATEWAY_BASE_URL", DEFAULT_GATEWAY_BASE_URL);

        let gateway_timeout_secs: u64 = get("GATEWAY_TIMEOUT_SECS", "10")
            .parse()
            .expect("GATEWAY_TIMEOUT_SECS must be a valid u64");

        let relock_grace_secs: u64 = get("RELOCK_GRACE_SECS", "5")
            .parse()
            .expect("RELOCK_GRACE_SECS must be a valid u64");

        let session_user_name = get("SESSION_USER_NAME", "Unknown");

        let stores = match var("SESSION_STORES") {
            Some(json) => serde_json::from_str(&json)
                .expect("SESSION_STORES must be a JSON array of stores"),
            None => Self::single_store(&get),
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            gateway_base_url,
            gateway_timeout_secs,
            relock_grace_secs,
            session_user_name,
            stores,
        }
    }

    /// Build the session the controller operates under.
    pub fn session(&self) -> SessionContext {
        SessionContext::new(self.session_user_name.clone(), self.stores.clone())
    }

    pub fn controller_config(&self) -> ControllerConfig {
        ControllerConfig {
            relock_grace: Duration::from_secs(self.relock_grace_secs),
            ..Default::default()
        }
    }

    pub fn gateway_timeout(&self) -> Duration {
        Duration::from_secs(self.gateway_timeout_secs)
    }

    /// The store described by `STORE_*`, if any of its identifiers is set.
    fn single_store(get: &impl Fn(&str, &str) -> String) -> Vec<StoreIdentity> {
        let store = StoreIdentity {
            id: get("STORE_ID", "1"),
            name: get("STORE_NAME", ""),
            tenant_key: get("STORE_TENANT_KEY", ""),
            entry_id: get("STORE_ENTRY_ID", ""),
            address: get("STORE_ADDRESS", ""),
        };
        if store.tenant_key.is_empty() && store.entry_id.is_empty() {
            Vec::new()
        } else {
            vec![store]
        }
    }
}
