pub mod format;
pub mod payload;

pub use format::{deleted_to_api_value, drinks_to_api_value, DrinkView};
pub use payload::{CreateDrink, JsonBody, PayloadError, PayloadSchemas, UpdateDrink};
