pub mod api;
pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod state;

use axum::{
    middleware::{from_fn_with_state, map_response},
    routing::{delete, get, patch, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{permissions, protected, public};
use crate::middleware::{json_method_not_allowed, not_found_fallback, require_permission, RequiredPermission};
pub use crate::state::AppState;

/// Builds the full router: public and protected drink routes, JSON error
/// fallbacks, CORS and request tracing.
pub fn app(state: AppState, cors: CorsLayer) -> Router {
    let verifier = state.verifier.clone();
    let gate = |permission: &'static str| {
        from_fn_with_state(
            RequiredPermission::new(verifier.clone(), permission),
            require_permission,
        )
    };

    Router::new()
        // Public
        .route("/health", get(public::health_get))
        .route(
            "/drinks",
            get(public::drinks_list)
                .merge(post(protected::drinks_create).route_layer(gate(permissions::POST_DRINKS))),
        )
        // Protected
        .route(
            "/drinks-detail",
            get(protected::drinks_detail).route_layer(gate(permissions::GET_DRINKS_DETAIL)),
        )
        .route(
            "/drinks/:id",
            patch(protected::drinks_update)
                .route_layer(gate(permissions::PATCH_DRINKS))
                .merge(delete(protected::drinks_delete).route_layer(gate(permissions::DELETE_DRINKS))),
        )
        .fallback(not_found_fallback)
        .with_state(state)
        // Global middleware
        .layer(map_response(json_method_not_allowed))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
