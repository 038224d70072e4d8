use serde::{Deserialize, Serialize};
use serde_json::Number;
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub color: String,
    /// Kept as sent so `1` stays `1` and `2.5` stays `2.5`.
    pub parts: Number,
}

/// A drink with its full recipe. Serializes as the long view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Drink {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

/// Public projection: ingredient names are left out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrinkShort {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<ShortIngredient>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShortIngredient {
    pub color: String,
    pub parts: Number,
}

/// Fields for a drink that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDrink {
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

/// Row as stored; `recipe` holds the JSON encoded ingredient list.
#[derive(Debug, Clone, FromRow)]
pub struct DrinkRow {
    pub id: i64,
    pub title: String,
    pub recipe: String,
}

impl Drink {
    pub fn short(&self) -> DrinkShort {
        DrinkShort {
            id: self.id,
            title: self.title.clone(),
            recipe: self
                .recipe
                .iter()
                .map(|i| ShortIngredient {
                    color: i.color.clone(),
                    parts: i.parts.clone(),
                })
                .collect(),
        }
    }
}

impl TryFrom<DrinkRow> for Drink {
    type Error = serde_json::Error;

    fn try_from(row: DrinkRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            title: row.title,
            recipe: serde_json::from_str(&row.recipe)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn matcha() -> Drink {
        Drink {
            id: 7,
            title: "matcha shake".to_string(),
            recipe: vec![
                Ingredient { name: "milk".into(), color: "grey".into(), parts: 1.into() },
                Ingredient { name: "matcha".into(), color: "green".into(), parts: 3.into() },
            ],
        }
    }

    #[test]
    fn short_view_drops_ingredient_names() {
        let value = serde_json::to_value(matcha().short()).unwrap();
        assert_eq!(
            value,
            json!({
                "id": 7,
                "title": "matcha shake",
                "recipe": [
                    {"color": "grey", "parts": 1},
                    {"color": "green", "parts": 3}
                ]
            })
        );
    }

    #[test]
    fn long_view_keeps_everything() {
        let value = serde_json::to_value(matcha()).unwrap();
        assert_eq!(value["recipe"][1]["name"], "matcha");
        assert_eq!(value["recipe"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn row_with_bad_recipe_is_rejected() {
        let row = DrinkRow { id: 1, title: "broken".into(), recipe: "not json".into() };
        assert!(Drink::try_from(row).is_err());
    }

    #[test]
    fn row_recipe_is_decoded_in_order() {
        let row = DrinkRow {
            id: 1,
            title: "water".into(),
            recipe: r#"[{"name": "water", "color": "blue", "parts": 1}]"#.into(),
        };
        let drink = Drink::try_from(row).unwrap();
        assert_eq!(drink.recipe[0].name, "water");
        assert_eq!(drink.recipe[0].parts, Number::from(1));
    }

    #[test]
    fn recipe_numbers_round_trip_as_written() {
        let stored = r#"[{"name":"water","color":"blue","parts":1},{"name":"milk","color":"white","parts":2.5}]"#;
        let row = DrinkRow { id: 1, title: "latte".into(), recipe: stored.into() };
        let drink = Drink::try_from(row).unwrap();

        assert_eq!(serde_json::to_string(&drink.recipe).unwrap(), stored);
        assert_eq!(
            serde_json::to_value(drink.short()).unwrap()["recipe"],
            json!([{"color": "blue", "parts": 1}, {"color": "white", "parts": 2.5}])
        );
    }
}
