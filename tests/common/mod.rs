#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    body::{to_bytes, Body},
    http::{header::AUTHORIZATION, header::CONTENT_TYPE, Method, Request, StatusCode},
    Router,
};
use jsonwebtoken::{encode, jwk::JwkSet, Algorithm, EncodingKey, Header};
use serde_json::{json, Value};
use tower::ServiceExt;
use tower_http::cors::CorsLayer;

use coffee_shop_api::auth::{KeySource, StaticJwks};
use coffee_shop_api::config::AuthConfig;
use coffee_shop_api::database::models::{Drink, Ingredient, NewDrink};
use coffee_shop_api::database::{DatabaseManager, DrinkRepository};
use coffee_shop_api::AppState;

pub const KID: &str = "test-key-1";
pub const DOMAIN: &str = "coffee-test.auth0.com";
pub const AUDIENCE: &str = "drinks";

const SIGNING_KEY: &[u8] = include_bytes!("../fixtures/test_rsa.pem");
const JWKS: &str = include_str!("../fixtures/jwks.json");

pub const ALL_PERMISSIONS: &[&str] = &[
    "get:drinks-detail",
    "post:drinks",
    "patch:drinks",
    "delete:drinks",
];

pub fn auth_config() -> AuthConfig {
    AuthConfig {
        domain: DOMAIN.to_string(),
        audience: AUDIENCE.to_string(),
        algorithms: vec![Algorithm::RS256],
        jwks_url: None,
        jwks_cache_ttl_secs: 0,
    }
}

pub fn jwks() -> JwkSet {
    serde_json::from_str(JWKS).expect("fixture key set parses")
}

pub fn static_keys() -> Arc<dyn KeySource> {
    Arc::new(StaticJwks(jwks()))
}

/// Claims a real identity provider would put in an access token.
pub fn claims_with(permissions: &[&str]) -> Value {
    let now = chrono::Utc::now().timestamp();
    json!({
        "iss": format!("https://{}/", DOMAIN),
        "sub": "auth0|barista",
        "aud": AUDIENCE,
        "iat": now,
        "exp": now + 3600,
        "permissions": permissions,
    })
}

pub fn sign_with_kid(claims: &Value, kid: &str) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some(kid.to_string());
    let key = EncodingKey::from_rsa_pem(SIGNING_KEY).expect("fixture key parses");
    encode(&header, claims, &key).expect("token signs")
}

pub fn sign(claims: &Value) -> String {
    sign_with_kid(claims, KID)
}

pub fn token_for(permissions: &[&str]) -> String {
    sign(&claims_with(permissions))
}

pub fn manager_token() -> String {
    token_for(ALL_PERMISSIONS)
}

pub fn water() -> Vec<Ingredient> {
    vec![Ingredient {
        name: "water".to_string(),
        color: "blue".to_string(),
        parts: 1.into(),
    }]
}

/// Router over a private in-memory store, trusting the fixture key set.
pub struct TestApp {
    pub router: Router,
    pub drinks: DrinkRepository,
}

impl TestApp {
    pub async fn new() -> Result<Self> {
        Self::with_keys(static_keys()).await
    }

    pub async fn with_keys(keys: Arc<dyn KeySource>) -> Result<Self> {
        let pool = DatabaseManager::connect_in_memory()
            .await
            .context("failed to open in-memory store")?;
        let state = AppState::with_key_source(&auth_config(), pool, keys)?;
        let drinks = state.drinks.clone();
        let router = coffee_shop_api::app(state, CorsLayer::permissive());
        Ok(Self { router, drinks })
    }

    pub async fn seed(&self, title: &str) -> Result<Drink> {
        Ok(self
            .drinks
            .insert(NewDrink {
                title: title.to_string(),
                recipe: water(),
            })
            .await?)
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<(StatusCode, Value)> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match body {
            Some(value) => {
                builder = builder.header(CONTENT_TYPE, "application/json");
                Body::from(serde_json::to_vec(&value)?)
            }
            None => Body::empty(),
        };

        self.send(builder.body(body)?).await
    }

    pub async fn send(&self, request: Request<Body>) -> Result<(StatusCode, Value)> {
        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };
        Ok((status, body))
    }
}
