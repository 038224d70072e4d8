use serde_json::{json, Value};

use crate::database::models::Drink;

/// Which projection of a drink a response exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrinkView {
    Short,
    Long,
}

/// `{ "drinks": [...] }` in the requested projection
pub fn drinks_to_api_value(drinks: &[Drink], view: DrinkView) -> Value {
    let items: Vec<Value> = drinks
        .iter()
        .map(|drink| match view {
            DrinkView::Short => json!(drink.short()),
            DrinkView::Long => json!(drink),
        })
        .collect();

    json!({ "drinks": items })
}

pub fn deleted_to_api_value(id: i64) -> Value {
    json!({ "delete": id })
}
