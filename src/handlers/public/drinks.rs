use axum::{extract::State, Json};
use serde_json::Value;

use crate::api::{drinks_to_api_value, DrinkView};
use crate::error::ApiError;
use crate::state::AppState;

/// GET /drinks - Every drink in the short view
pub async fn list(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let drinks = state.drinks.select_all().await?;

    if drinks.is_empty() {
        return Err(ApiError::not_found());
    }

    Ok(Json(drinks_to_api_value(&drinks, DrinkView::Short)))
}
