use jsonwebtoken::Algorithm;
use std::env;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

/// Identity provider settings used to verify bearer tokens.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Identity domain, e.g. `coffee.eu.auth0.com`
    pub domain: String,
    pub audience: String,
    pub algorithms: Vec<Algorithm>,
    /// Overrides the well-known key set URL derived from `domain`
    pub jwks_url: Option<String>,
    /// Lifetime of a fetched key set; 0 fetches on every check
    pub jwks_cache_ttl_secs: u64,
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing configuration: {0}")]
    Missing(&'static str),

    #[error("No accepted signing algorithms configured")]
    NoAlgorithms,
}

impl AuthConfig {
    /// Expected `iss` claim for tokens minted by the configured domain.
    pub fn issuer(&self) -> String {
        format!("https://{}/", self.domain)
    }

    pub fn jwks_url(&self) -> String {
        match &self.jwks_url {
            Some(url) => url.clone(),
            None => format!("https://{}/.well-known/jwks.json", self.domain),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    /// Checks the settings the server cannot start without.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.domain.trim().is_empty() {
            return Err(ConfigError::Missing("AUTH0_DOMAIN"));
        }
        if self.auth.audience.trim().is_empty() {
            return Err(ConfigError::Missing("API_AUDIENCE"));
        }
        if self.auth.algorithms.is_empty() {
            return Err(ConfigError::NoAlgorithms);
        }
        if self.database.url.trim().is_empty() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }
        Ok(())
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Some(port) = env::var("API_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
        {
            self.server.port = port;
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = v;
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // Auth overrides
        if let Ok(v) = env::var("AUTH0_DOMAIN") {
            self.auth.domain = v.trim().trim_end_matches('/').to_string();
        }
        if let Ok(v) = env::var("API_AUDIENCE") {
            self.auth.audience = v;
        }
        if let Ok(v) = env::var("ALGORITHMS") {
            match parse_algorithms(&v) {
                Ok(algorithms) => self.auth.algorithms = algorithms,
                Err(bad) => tracing::warn!("Ignoring ALGORITHMS, unknown algorithm '{}'", bad),
            }
        }
        if let Ok(v) = env::var("AUTH0_WELL_KNOWN") {
            self.auth.jwks_url = Some(v);
        }
        if let Ok(v) = env::var("JWKS_CACHE_TTL_SECS") {
            self.auth.jwks_cache_ttl_secs = v.parse().unwrap_or(self.auth.jwks_cache_ttl_secs);
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig { port: 5000 },
            database: DatabaseConfig {
                url: "sqlite://database.db?mode=rwc".to_string(),
                max_connections: 5,
                connection_timeout: 30,
            },
            auth: AuthConfig::unconfigured(),
            security: SecurityConfig {
                enable_cors: true,
                // Empty list means any origin
                cors_origins: Vec::new(),
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig { port: 5000 },
            database: DatabaseConfig {
                url: "sqlite://database.db?mode=rwc".to_string(),
                max_connections: 10,
                connection_timeout: 10,
            },
            auth: AuthConfig::unconfigured(),
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://staging.example.com".to_string()],
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig { port: 8080 },
            database: DatabaseConfig {
                url: "sqlite://database.db?mode=rwc".to_string(),
                max_connections: 20,
                connection_timeout: 5,
            },
            auth: AuthConfig::unconfigured(),
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://app.example.com".to_string()],
            },
        }
    }
}

impl AuthConfig {
    fn unconfigured() -> Self {
        Self {
            domain: String::new(),
            audience: String::new(),
            algorithms: vec![Algorithm::RS256],
            jwks_url: None,
            jwks_cache_ttl_secs: 0,
        }
    }
}

/// Parses a comma separated algorithm list such as `RS256,RS384`.
/// Returns the first unrecognised name on failure.
fn parse_algorithms(raw: &str) -> Result<Vec<Algorithm>, String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|name| Algorithm::from_str(name).map_err(|_| name.to_string()))
        .collect()
}
