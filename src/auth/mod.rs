//! Bearer token verification against an identity provider's published key set.
//!
//! A permission check runs five steps in order and stops at the first failure:
//! read the `Authorization` header, fetch the key set, pick the key named by the
//! token's `kid`, verify signature and claims, then look for the permission.

pub mod jwks;

use axum::http::{header::AUTHORIZATION, HeaderMap, StatusCode};
use jsonwebtoken::{decode, decode_header, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use thiserror::Error;

use crate::config::AuthConfig;
pub use jwks::{key_source_from_config, CachedJwks, KeySetError, KeySource, RemoteJwks, StaticJwks};

/// Decoded token payload. Everything except `permissions` is kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl Claims {
    pub fn subject(&self) -> Option<&str> {
        self.other.get("sub").and_then(Value::as_str)
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Authorization header is expected.")]
    HeaderMissing,

    #[error("{0}")]
    HeaderMalformed(&'static str),

    #[error(transparent)]
    KeySetUnavailable(#[from] KeySetError),

    #[error("Unable to find the appropriate key.")]
    KeyNotFound,

    #[error("Token expired.")]
    TokenExpired,

    #[error("incorrect claims, please check the audience and issuer")]
    InvalidClaims,

    #[error("Unable to parse authentication token.")]
    Unparseable,

    #[error("Permissions not included in JWT")]
    PermissionsMissing,

    #[error("Permission not found")]
    PermissionNotFound,
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::HeaderMissing
            | AuthError::HeaderMalformed(_)
            | AuthError::KeyNotFound
            | AuthError::TokenExpired
            | AuthError::InvalidClaims
            | AuthError::Unparseable => StatusCode::UNAUTHORIZED,
            AuthError::PermissionsMissing => StatusCode::BAD_REQUEST,
            AuthError::PermissionNotFound => StatusCode::FORBIDDEN,
            AuthError::KeySetUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable failure category
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::HeaderMissing => "AUTH_HEADER_MISSING",
            AuthError::HeaderMalformed(_) => "AUTH_HEADER_MALFORMED",
            AuthError::KeySetUnavailable(_) => "JWKS_UNAVAILABLE",
            AuthError::KeyNotFound | AuthError::Unparseable => "INVALID_HEADER",
            AuthError::TokenExpired => "TOKEN_EXPIRED",
            AuthError::InvalidClaims | AuthError::PermissionsMissing => "INVALID_CLAIMS",
            AuthError::PermissionNotFound => "UNAUTHORIZED",
        }
    }
}

/// Pulls the raw token out of an `Authorization: Bearer <token>` header.
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let header = headers.get(AUTHORIZATION).ok_or(AuthError::HeaderMissing)?;

    let value = header
        .to_str()
        .map_err(|_| AuthError::HeaderMalformed("Authorization header must be bearer token."))?;

    if !value.starts_with("Bearer ") {
        return Err(AuthError::HeaderMalformed(
            "Authorization header must start with \"Bearer\".",
        ));
    }

    let parts: Vec<&str> = value.split(' ').collect();
    match parts.as_slice() {
        [_, token] if !token.is_empty() => Ok(*token),
        [_, _] => Err(AuthError::HeaderMalformed("Token not found.")),
        _ => Err(AuthError::HeaderMalformed(
            "Authorization header must be bearer token.",
        )),
    }
}

/// Requires `permission` to appear in the token's `permissions` claim.
pub fn check_permissions(permission: &str, claims: &Claims) -> Result<(), AuthError> {
    let granted = claims
        .permissions
        .as_ref()
        .ok_or(AuthError::PermissionsMissing)?;

    if granted.iter().any(|p| p == permission) {
        Ok(())
    } else {
        Err(AuthError::PermissionNotFound)
    }
}

/// Verifies tokens issued by one identity domain for one audience.
pub struct TokenVerifier {
    keys: Arc<dyn KeySource>,
    algorithms: Vec<Algorithm>,
    audience: String,
    issuer: String,
}

impl TokenVerifier {
    pub fn new(auth: &AuthConfig, keys: Arc<dyn KeySource>) -> Self {
        Self {
            keys,
            algorithms: auth.algorithms.clone(),
            audience: auth.audience.clone(),
            issuer: auth.issuer(),
        }
    }

    /// Runs the full check for one request and returns the decoded claims.
    pub async fn check_permission(
        &self,
        headers: &HeaderMap,
        permission: &str,
    ) -> Result<Claims, AuthError> {
        let token = extract_bearer_token(headers)?;
        let claims = self.verify_token(token).await?;
        check_permissions(permission, &claims)?;
        Ok(claims)
    }

    /// Checks signature, expiry, audience and issuer.
    pub async fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        let jwks = self.keys.fetch().await?;

        let header = decode_header(token).map_err(|e| {
            tracing::debug!("Undecodable token header: {}", e);
            AuthError::Unparseable
        })?;

        let jwk = header
            .kid
            .as_deref()
            .and_then(|kid| jwks.find(kid))
            .ok_or(AuthError::KeyNotFound)?;

        let key = DecodingKey::from_jwk(jwk).map_err(|e| {
            tracing::warn!("Signing key {:?} is unusable: {}", header.kid, e);
            AuthError::Unparseable
        })?;

        let mut validation = Validation::new(self.algorithms.first().copied().unwrap_or(Algorithm::RS256));
        validation.algorithms = self.algorithms.clone();
        validation.set_audience(&[&self.audience]);
        validation.set_issuer(&[&self.issuer]);
        validation.set_required_spec_claims(&["exp", "iss", "aud"]);
        validation.leeway = 0;

        let data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            ErrorKind::InvalidAudience | ErrorKind::InvalidIssuer => AuthError::InvalidClaims,
            ErrorKind::MissingRequiredClaim(claim) if claim == "iss" || claim == "aud" => {
                AuthError::InvalidClaims
            }
            other => {
                tracing::debug!("Token rejected: {:?}", other);
                AuthError::Unparseable
            }
        })?;

        Ok(data.claims)
    }
}
