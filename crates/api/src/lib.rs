//! HTTP API layer with Axum routes.
//!
//! Every action answers with the uniform envelope from
//! `contara_shared::envelope`, success and failure alike.

pub mod response;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use contara_core::engine::AccountingEngine;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The multi-organization accounting engine.
    pub engine: Arc<AccountingEngine>,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
