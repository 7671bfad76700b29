//! Route registration.

use axum::Router;

use crate::AppState;

pub mod accounts;
pub mod entries;
pub mod events;
pub mod health;
pub mod mappings;
pub mod organizations;
pub mod periods;
pub mod reports;
pub mod rules;

/// All API routes under one router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(organizations::routes())
        .merge(accounts::routes())
        .merge(mappings::routes())
        .merge(rules::routes())
        .merge(events::routes())
        .merge(entries::routes())
        .merge(periods::routes())
        .merge(reports::routes())
}
