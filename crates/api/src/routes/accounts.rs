//! Chart of accounts routes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;
use tracing::info;

use contara_core::registry::NewAccount;
use contara_shared::types::{AccountId, OrganizationId};

use crate::response::{respond, respond_ok};
use crate::AppState;

/// Creates the account registry routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/organizations/{org_id}/accounts", post(create_account))
        .route("/organizations/{org_id}/accounts", get(account_tree))
        .route(
            "/organizations/{org_id}/accounts/by-code/{code}",
            get(resolve_by_code),
        )
        .route(
            "/organizations/{org_id}/accounts/{account_id}",
            delete(deactivate_account),
        )
}

/// POST `/organizations/{org_id}/accounts` - Create an account.
async fn create_account(
    State(state): State<AppState>,
    Path(org_id): Path<OrganizationId>,
    Json(payload): Json<NewAccount>,
) -> impl IntoResponse {
    let result = state.engine.create_account(org_id, payload);
    if let Ok(account) = &result {
        info!(org_id = %org_id, code = %account.code, "Account created");
    }
    respond(StatusCode::CREATED, result)
}

/// List filter for the chart of accounts.
#[derive(Debug, Deserialize)]
pub struct AccountListQuery {
    /// When set, keep only accounts with this active flag.
    pub active: Option<bool>,
}

/// GET `/organizations/{org_id}/accounts` - The chart of accounts in
/// preorder: by code, parents before children.
async fn account_tree(
    State(state): State<AppState>,
    Path(org_id): Path<OrganizationId>,
    Query(query): Query<AccountListQuery>,
) -> impl IntoResponse {
    let result = state.engine.account_tree(org_id).map(|accounts| {
        accounts
            .into_iter()
            .filter(|a| query.active.map_or(true, |active| a.is_active == active))
            .collect::<Vec<_>>()
    });
    respond_ok(result)
}

/// GET `/organizations/{org_id}/accounts/by-code/{code}` - Resolve an
/// account by its code.
async fn resolve_by_code(
    State(state): State<AppState>,
    Path((org_id, code)): Path<(OrganizationId, String)>,
) -> impl IntoResponse {
    respond_ok(state.engine.resolve_by_code(org_id, &code))
}

/// DELETE `/organizations/{org_id}/accounts/{account_id}` - Deactivate
/// an account. Refused while journal lines or rules reference it.
async fn deactivate_account(
    State(state): State<AppState>,
    Path((org_id, account_id)): Path<(OrganizationId, AccountId)>,
) -> impl IntoResponse {
    let result = state.engine.deactivate_account(org_id, account_id);
    if result.is_ok() {
        info!(org_id = %org_id, account_id = %account_id, "Account deactivated");
    }
    respond_ok(result)
}
