//! Automation rule routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post, put},
    Json, Router,
};
use serde::Deserialize;
use tracing::info;

use contara_core::rules::NewRule;
use contara_shared::types::{OrganizationId, RuleId};

use crate::response::{respond, respond_ok};
use crate::AppState;

/// Creates the automation rule routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/organizations/{org_id}/rules", post(create_rule))
        .route("/organizations/{org_id}/rules", get(list_rules))
        .route("/organizations/{org_id}/rules/{rule_id}", put(update_rule))
        .route(
            "/organizations/{org_id}/rules/{rule_id}/active",
            patch(set_active),
        )
}

/// Request body for toggling a rule.
#[derive(Debug, Deserialize)]
pub struct SetActiveRequest {
    /// Whether the rule should fire.
    pub is_active: bool,
}

/// POST `/organizations/{org_id}/rules` - Create a rule. Condition and
/// formula texts are parsed and the rule is trial-balanced before it
/// is stored.
async fn create_rule(
    State(state): State<AppState>,
    Path(org_id): Path<OrganizationId>,
    Json(payload): Json<NewRule>,
) -> impl IntoResponse {
    let result = state.engine.create_rule(org_id, payload);
    if let Ok(rule) = &result {
        info!(org_id = %org_id, rule_id = %rule.id, name = %rule.name, "Rule created");
    }
    respond(StatusCode::CREATED, result)
}

/// PUT `/organizations/{org_id}/rules/{rule_id}` - Replace a rule's
/// definition. The new definition goes through the same parsing and
/// trial-balancing as creation; the rule keeps its id and active flag.
async fn update_rule(
    State(state): State<AppState>,
    Path((org_id, rule_id)): Path<(OrganizationId, RuleId)>,
    Json(payload): Json<NewRule>,
) -> impl IntoResponse {
    let result = state.engine.update_rule(org_id, rule_id, payload);
    if let Ok(rule) = &result {
        info!(org_id = %org_id, rule_id = %rule.id, name = %rule.name, "Rule updated");
    }
    respond_ok(result)
}

/// GET `/organizations/{org_id}/rules` - Rules by priority.
async fn list_rules(
    State(state): State<AppState>,
    Path(org_id): Path<OrganizationId>,
) -> impl IntoResponse {
    respond_ok(state.engine.list_rules(org_id))
}

/// PATCH `/organizations/{org_id}/rules/{rule_id}/active` - Activate or
/// deactivate a rule.
async fn set_active(
    State(state): State<AppState>,
    Path((org_id, rule_id)): Path<(OrganizationId, RuleId)>,
    Json(payload): Json<SetActiveRequest>,
) -> impl IntoResponse {
    respond_ok(state.engine.set_rule_active(org_id, rule_id, payload.is_active))
}
