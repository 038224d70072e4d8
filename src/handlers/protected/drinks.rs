use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde_json::Value;
use std::slice;

use crate::api::{deleted_to_api_value, drinks_to_api_value, DrinkView, JsonBody};
use crate::auth::Claims;
use crate::database::models::NewDrink;
use crate::error::ApiError;
use crate::state::AppState;

/// Route ids are integers; anything else names no drink.
fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>().map_err(|_| ApiError::not_found())
}

fn caller(claims: &Claims) -> &str {
    claims.subject().unwrap_or("<no subject>")
}

/// GET /drinks-detail - Every drink in the long view
pub async fn detail(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let drinks = state.drinks.select_all().await?;

    if drinks.is_empty() {
        return Err(ApiError::not_found());
    }

    Ok(Json(drinks_to_api_value(&drinks, DrinkView::Long)))
}

/// POST /drinks - Create a drink with a title no other drink has
pub async fn create(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    JsonBody(body): JsonBody,
) -> Result<Json<Value>, ApiError> {
    let payload = state.payloads.create_drink(body)?;

    if state.drinks.select_title(&payload.title).await?.is_some() {
        return Err(ApiError::conflict());
    }

    let drink = state
        .drinks
        .insert(NewDrink {
            title: payload.title,
            recipe: payload.recipe,
        })
        .await?;

    tracing::info!("Drink {} '{}' created by {}", drink.id, drink.title, caller(&claims));
    Ok(Json(drinks_to_api_value(slice::from_ref(&drink), DrinkView::Long)))
}

/// PATCH /drinks/:id - Replace the title and/or recipe of one drink
pub async fn update(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody,
) -> Result<Json<Value>, ApiError> {
    let payload = state.payloads.update_drink(body)?;
    let id = parse_id(&id)?;

    let mut drink = state
        .drinks
        .select_id(id)
        .await?
        .ok_or_else(ApiError::not_found)?;

    if let Some(title) = payload.title {
        drink.title = title;
    }
    if let Some(recipe) = payload.recipe {
        drink.recipe = recipe;
    }

    state.drinks.update(&drink).await?;

    tracing::info!("Drink {} updated by {}", drink.id, caller(&claims));
    Ok(Json(drinks_to_api_value(slice::from_ref(&drink), DrinkView::Long)))
}

/// DELETE /drinks/:id - Remove one drink
pub async fn delete(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id)?;

    if state.drinks.select_id(id).await?.is_none() {
        return Err(ApiError::not_found());
    }

    // A concurrent delete between the lookup and here still reads as missing
    if !state.drinks.delete(id).await? {
        return Err(ApiError::not_found());
    }

    tracing::info!("Drink {} deleted by {}", id, caller(&claims));
    Ok(Json(deleted_to_api_value(id)))
}
