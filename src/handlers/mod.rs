// handlers/mod.rs - Two-tier handler layout
//
// Public (no auth) → Protected (bearer token + route permission)
pub mod protected;
pub mod public;

/// Permission strings the protected routes demand
pub mod permissions {
    pub const GET_DRINKS_DETAIL: &str = "get:drinks-detail";
    pub const POST_DRINKS: &str = "post:drinks";
    pub const PATCH_DRINKS: &str = "patch:drinks";
    pub const DELETE_DRINKS: &str = "delete:drinks";
}
