pub mod drink;

pub use drink::{Drink, DrinkRow, DrinkShort, Ingredient, NewDrink, ShortIngredient};
