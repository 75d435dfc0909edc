//! Shared application state: stores, token codec, and server settings.
//!
//! The stores are explicitly constructed here and passed into handlers via
//! an `Extension<Arc<AppState>>`; nothing lives in module-level statics, so
//! tests can build isolated states freely.

use secrecy::SecretString;
use std::path::PathBuf;
use tokio::sync::RwLock;

use crate::api::handlers::auth::TokenCodec;
use crate::store::{AuditLog, PersistenceError, UserStore};

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Admin dashboard origin allowed by CORS.
    pub frontend_url: String,
    /// Upstream identity service base URL; `None` disables proxying.
    pub trust_api: Option<String>,
    /// Enables `/api/dev/*` routes.
    pub dev_routes: bool,
    /// JSON file backing the user store; `None` means in-memory seed data.
    pub data_file: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            frontend_url: "http://localhost:3000".to_string(),
            trust_api: None,
            dev_routes: false,
            data_file: None,
        }
    }
}

#[derive(Debug)]
pub struct AppState {
    pub users: RwLock<UserStore>,
    pub audit: RwLock<AuditLog>,
    pub codec: TokenCodec,
    pub config: ServerConfig,
}

impl AppState {
    /// Build state for the given settings, opening the data file when one
    /// is configured.
    ///
    /// # Errors
    ///
    /// Returns a [`PersistenceError`] when a configured data file exists but
    /// cannot be read or parsed. A malformed file fails startup; it is never
    /// silently replaced with seed data.
    pub fn new(jwt_secret: SecretString, config: ServerConfig) -> Result<Self, PersistenceError> {
        let users = match &config.data_file {
            Some(path) => UserStore::open(path)?,
            None => UserStore::from_seed(),
        };
        Ok(Self::with_store(users, jwt_secret, config))
    }

    /// Build state over an explicit store. Used by tests and seed tooling.
    #[must_use]
    pub fn with_store(users: UserStore, jwt_secret: SecretString, config: ServerConfig) -> Self {
        Self {
            users: RwLock::new(users),
            audit: RwLock::new(AuditLog::new()),
            codec: TokenCodec::new(jwt_secret),
            config,
        }
    }
}
