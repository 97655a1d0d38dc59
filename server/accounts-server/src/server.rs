//! Server state and startup configuration.

use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use account_core::{AccountService, MemoryUserStore, UserStore};
use account_crypto::{PasswordHasher, TokenConfig, TokenSigner, SALT_WORK_FACTOR};
use document_store::PostgresUserStore;

/// Main accounts server state, shared by every handler.
#[derive(Clone)]
pub struct AccountsServer {
    /// Server configuration.
    pub config: ServerConfig,
    /// User management core.
    pub service: Arc<AccountService>,
    /// Process start time, for uptime reporting.
    pub started_at: DateTime<Utc>,
}

/// Server configuration, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server name.
    pub name: String,
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Token signing secret and lifetime.
    pub token: TokenConfig,
    /// bcrypt work factor.
    pub hash_cost: u32,
}

impl ServerConfig {
    /// Read configuration from the environment, with development defaults.
    pub fn from_env() -> Self {
        let token_secret = std::env::var("AUTH_TOKEN_SECRET").unwrap_or_else(|_| {
            warn!("AUTH_TOKEN_SECRET not set, using a development secret");
            TokenConfig::default().secret
        });
        let ttl_seconds = std::env::var("AUTH_TOKEN_TTL_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(|| TokenConfig::default().ttl_seconds);
        let hash_cost = std::env::var("AUTH_HASH_COST")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(SALT_WORK_FACTOR);

        Self {
            name: "Accounts Engine".to_string(),
            host: std::env::var("ACCOUNTS_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("ACCOUNTS_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10014),
            token: TokenConfig {
                secret: token_secret,
                ttl_seconds,
            },
            hash_cost,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "Accounts Engine".to_string(),
            host: "0.0.0.0".to_string(),
            port: 10014,
            token: TokenConfig::default(),
            hash_cost: SALT_WORK_FACTOR,
        }
    }
}

impl AccountsServer {
    /// Create a server instance, picking the store from the environment:
    /// a Postgres store when `DATABASE_URL` is set, the in-memory store
    /// otherwise.
    pub async fn new(config: ServerConfig) -> Result<Self> {
        let store: Arc<dyn UserStore> = match std::env::var("DATABASE_URL") {
            Ok(url) => {
                let store = PostgresUserStore::connect(&url)
                    .await
                    .map_err(|e| anyhow::anyhow!("database connection failed: {e}"))?;
                store
                    .ensure_schema()
                    .await
                    .map_err(|e| anyhow::anyhow!("schema setup failed: {e}"))?;
                info!("using Postgres user store");
                Arc::new(store)
            }
            Err(_) => {
                warn!("DATABASE_URL not set, using the in-memory user store");
                Arc::new(MemoryUserStore::new())
            }
        };
        Ok(Self::with_store(config, store))
    }

    /// Create a server instance around an explicit store.
    /// This is useful for testing.
    pub fn with_store(config: ServerConfig, store: Arc<dyn UserStore>) -> Self {
        let service = AccountService::new(
            store,
            PasswordHasher::new(config.hash_cost),
            TokenSigner::new(&config.token),
        );
        Self {
            config,
            service: Arc::new(service),
            started_at: Utc::now(),
        }
    }

    /// Seconds since the server instance was created.
    pub fn uptime_seconds(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds()
    }
}

impl std::fmt::Debug for AccountsServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountsServer")
            .field("config", &self.config)
            .field("started_at", &self.started_at)
            .finish_non_exhaustive()
    }
}
