use async_trait::async_trait;
use jsonwebtoken::jwk::JwkSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::RwLock;

use crate::config::AuthConfig;

#[derive(Debug, Error)]
pub enum KeySetError {
    #[error("key set request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Somewhere a JSON Web Key Set can be obtained from.
#[async_trait]
pub trait KeySource: Send + Sync {
    async fn fetch(&self) -> Result<JwkSet, KeySetError>;
}

/// Fetches the key set over HTTP on every call.
pub struct RemoteJwks {
    client: reqwest::Client,
    url: String,
}

impl RemoteJwks {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl KeySource for RemoteJwks {
    async fn fetch(&self) -> Result<JwkSet, KeySetError> {
        let request_error = |source| KeySetError::Request {
            url: self.url.clone(),
            source,
        };

        let jwks = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(request_error)?
            .json::<JwkSet>()
            .await
            .map_err(request_error)?;

        tracing::debug!("Fetched {} signing keys from {}", jwks.keys.len(), self.url);
        Ok(jwks)
    }
}

/// Keeps a fetched key set for `ttl` before asking the inner source again.
pub struct CachedJwks {
    inner: Arc<dyn KeySource>,
    ttl: Duration,
    cached: RwLock<Option<(Instant, JwkSet)>>,
}

impl CachedJwks {
    pub fn new(inner: Arc<dyn KeySource>, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            cached: RwLock::new(None),
        }
    }
}

#[async_trait]
impl KeySource for CachedJwks {
    async fn fetch(&self) -> Result<JwkSet, KeySetError> {
        {
            let cached = self.cached.read().await;
            if let Some((fetched_at, jwks)) = cached.as_ref() {
                if fetched_at.elapsed() < self.ttl {
                    return Ok(jwks.clone());
                }
            }
        }

        let jwks = self.inner.fetch().await?;
        *self.cached.write().await = Some((Instant::now(), jwks.clone()));
        Ok(jwks)
    }
}

/// A fixed key set, for offline deployments and tests.
pub struct StaticJwks(pub JwkSet);

#[async_trait]
impl KeySource for StaticJwks {
    async fn fetch(&self) -> Result<JwkSet, KeySetError> {
        Ok(self.0.clone())
    }
}

/// Builds the key source described by the auth settings. Without a cache
/// lifetime every permission check fetches the key set again.
pub fn key_source_from_config(auth: &AuthConfig) -> Arc<dyn KeySource> {
    let remote: Arc<dyn KeySource> = Arc::new(RemoteJwks::new(auth.jwks_url()));
    if auth.jwks_cache_ttl_secs == 0 {
        return remote;
    }
    Arc::new(CachedJwks::new(
        remote,
        Duration::from_secs(auth.jwks_cache_ttl_secs),
    ))
}
