use sqlx::SqlitePool;
use std::sync::Arc;

use crate::api::{PayloadError, PayloadSchemas};
use crate::auth::{key_source_from_config, KeySource, TokenVerifier};
use crate::config::{AppConfig, AuthConfig};
use crate::database::DrinkRepository;

/// Shared application state handed to every handler and permission layer.
#[derive(Clone)]
pub struct AppState {
    pub drinks: DrinkRepository,
    pub verifier: Arc<TokenVerifier>,
    pub payloads: Arc<PayloadSchemas>,
}

impl AppState {
    /// State for a deployment: keys come from the configured well-known URL.
    pub fn new(config: &AppConfig, pool: SqlitePool) -> Result<Self, PayloadError> {
        Self::with_key_source(&config.auth, pool, key_source_from_config(&config.auth))
    }

    pub fn with_key_source(
        auth: &AuthConfig,
        pool: SqlitePool,
        keys: Arc<dyn KeySource>,
    ) -> Result<Self, PayloadError> {
        Ok(Self {
            drinks: DrinkRepository::new(pool),
            verifier: Arc::new(TokenVerifier::new(auth, keys)),
            payloads: Arc::new(PayloadSchemas::new()?),
        })
    }
}
