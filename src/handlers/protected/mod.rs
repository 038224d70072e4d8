// handlers/protected/mod.rs - Protected handlers (bearer token required)
//
// Security Level: JWT with a per-route permission
// Routes:
//   GET    /drinks-detail  get:drinks-detail
//   POST   /drinks         post:drinks
//   PATCH  /drinks/:id     patch:drinks
//   DELETE /drinks/:id     delete:drinks
//
// The permission layer runs before any extractor, so an unauthorized caller
// never reaches body validation. Handlers can rely on `Extension<Claims>`.

pub mod drinks;

pub use drinks::create as drinks_create;
pub use drinks::delete as drinks_delete;
pub use drinks::detail as drinks_detail;
pub use drinks::update as drinks_update;
