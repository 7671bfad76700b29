//! Organization management routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
    Json, Router,
};
use serde::Deserialize;
use tracing::info;

use contara_core::registry::Country;
use contara_shared::types::OrganizationId;

use crate::response::{respond, respond_ok};
use crate::AppState;

/// Creates the organization routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/organizations", post(create_organization))
        .route("/organizations", get(list_organizations))
        .route("/organizations/{org_id}", get(get_organization))
        .route("/organizations/{org_id}/settings", patch(update_settings))
}

/// Request body for creating an organization.
#[derive(Debug, Deserialize)]
pub struct CreateOrganizationRequest {
    /// Display name.
    pub name: String,
    /// Country of incorporation.
    pub country: Country,
    /// Base currency code (ISO 4217).
    pub base_currency: String,
    /// First month of the fiscal year (1-12).
    pub fiscal_year_start_month: u32,
}

/// Request body for updating organization settings.
#[derive(Debug, Deserialize)]
pub struct UpdateSettingsRequest {
    /// Require a reversal instead of direct cancellation of posted
    /// entries.
    pub require_approval: bool,
}

/// POST `/organizations` - Register an organization.
async fn create_organization(
    State(state): State<AppState>,
    Json(payload): Json<CreateOrganizationRequest>,
) -> impl IntoResponse {
    let result = state.engine.create_organization(
        payload.name,
        payload.country,
        payload.base_currency,
        payload.fiscal_year_start_month,
    );
    if let Ok(org) = &result {
        info!(org_id = %org.id, country = %org.country, "Organization created");
    }
    respond(StatusCode::CREATED, result)
}

/// GET `/organizations` - Every registered organization.
async fn list_organizations(State(state): State<AppState>) -> impl IntoResponse {
    respond_ok(Ok(state.engine.list_organizations()))
}

/// GET `/organizations/{org_id}` - Fetch an organization.
async fn get_organization(
    State(state): State<AppState>,
    Path(org_id): Path<OrganizationId>,
) -> impl IntoResponse {
    respond_ok(state.engine.get_organization(org_id))
}

/// PATCH `/organizations/{org_id}/settings` - Update accounting settings.
async fn update_settings(
    State(state): State<AppState>,
    Path(org_id): Path<OrganizationId>,
    Json(payload): Json<UpdateSettingsRequest>,
) -> impl IntoResponse {
    respond_ok(
        state
            .engine
            .set_require_approval(org_id, payload.require_approval),
    )
}
