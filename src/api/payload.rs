//! Request body checks for the drink endpoints.
//!
//! Bodies are parsed as JSON, matched against a compiled JSON schema, and only
//! then turned into typed payloads. Any failure is a 400.

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use jsonschema::Validator;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::database::models::Ingredient;
use crate::error::ApiError;

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("Invalid payload schema '{name}': {reason}")]
    SchemaCompile { name: &'static str, reason: String },
}

#[derive(Debug, Deserialize)]
pub struct CreateDrink {
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

/// Partial update; absent fields are left untouched.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateDrink {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub recipe: Option<Vec<Ingredient>>,
}

fn ingredient_list_schema() -> Value {
    json!({
        "type": "array",
        "items": {
            "type": "object",
            "properties": {
                "name": {"type": "string"},
                "color": {"type": "string"},
                "parts": {"type": "number"}
            },
            "required": ["name", "color", "parts"]
        }
    })
}

fn create_drink_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "title": {"type": "string"},
            "recipe": ingredient_list_schema()
        },
        "required": ["title", "recipe"]
    })
}

fn update_drink_schema() -> Value {
    json!({
        "type": "object",
        "anyOf": [
            {
                "properties": {"title": {"type": "string"}},
                "required": ["title"]
            },
            {
                "properties": {"recipe": ingredient_list_schema()},
                "required": ["recipe"]
            }
        ]
    })
}

/// Compiled validators for the create and update bodies.
pub struct PayloadSchemas {
    create: Validator,
    update: Validator,
}

impl PayloadSchemas {
    pub fn new() -> Result<Self, PayloadError> {
        Ok(Self {
            create: compile("create_drink", &create_drink_schema())?,
            update: compile("update_drink", &update_drink_schema())?,
        })
    }

    pub fn create_drink(&self, body: Value) -> Result<CreateDrink, ApiError> {
        check(&self.create, &body)?;
        typed(body)
    }

    pub fn update_drink(&self, body: Value) -> Result<UpdateDrink, ApiError> {
        check(&self.update, &body)?;
        typed(body)
    }
}

fn compile(name: &'static str, schema: &Value) -> Result<Validator, PayloadError> {
    jsonschema::validator_for(schema).map_err(|e| PayloadError::SchemaCompile {
        name,
        reason: e.to_string(),
    })
}

/// Reports the first violation, like a single-error validator would.
fn check(validator: &Validator, body: &Value) -> Result<(), ApiError> {
    match validator.iter_errors(body).next() {
        Some(violation) => Err(ApiError::bad_request(violation.to_string())),
        None => Ok(()),
    }
}

fn typed<T: for<'de> Deserialize<'de>>(body: Value) -> Result<T, ApiError> {
    serde_json::from_value(body).map_err(|e| ApiError::bad_request(e.to_string()))
}

/// Any JSON document; non-JSON bodies are answered with a plain 400.
pub struct JsonBody(pub Value);

#[async_trait]
impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state).await.map_err(|rejection| {
            tracing::debug!("Rejected request body: {}", rejection.body_text());
            ApiError::bad_request("bad request")
        })?;
        Ok(Self(value))
    }
}
