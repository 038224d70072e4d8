pub mod auth;
pub mod response;

pub use auth::{require_permission, RequiredPermission};
pub use response::{cors_layer, json_method_not_allowed, not_found_fallback};
