use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::auth::TokenVerifier;
use crate::error::ApiError;

/// Permission a route demands, paired with the verifier that checks it.
/// Used as the state of [`require_permission`].
#[derive(Clone)]
pub struct RequiredPermission {
    verifier: Arc<TokenVerifier>,
    permission: &'static str,
}

impl RequiredPermission {
    pub fn new(verifier: Arc<TokenVerifier>, permission: &'static str) -> Self {
        Self { verifier, permission }
    }
}

/// Rejects the request unless its bearer token grants the route's permission.
/// On success the decoded [`Claims`](crate::auth::Claims) are placed in the
/// request extensions.
pub async fn require_permission(
    State(required): State<RequiredPermission>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = required
        .verifier
        .check_permission(request.headers(), required.permission)
        .await
        .map_err(|err| {
            tracing::warn!(
                "Denied {} {} (needs '{}'): {} [{}]",
                request.method(),
                request.uri().path(),
                required.permission,
                err,
                err.code()
            );
            ApiError::from(err)
        })?;

    tracing::debug!(
        "Granted '{}' to {}",
        required.permission,
        claims.subject().unwrap_or("<no subject>")
    );

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}
