//! Official catalog mapping routes.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tracing::info;

use contara_core::catalog::{CatalogType, OfficialCatalog};
use contara_shared::types::{AccountId, OrganizationId, PageRequest, PageResponse};

use crate::response::{error_response, respond, respond_ok, respond_paginated};
use crate::AppState;

/// Creates the catalog mapping routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/organizations/{org_id}/catalogs", post(load_catalog))
        .route(
            "/organizations/{org_id}/catalogs/{catalog_type}/auto-map",
            post(auto_map),
        )
        .route(
            "/organizations/{org_id}/catalogs/{catalog_type}/mappings",
            get(list_mappings),
        )
        .route(
            "/organizations/{org_id}/catalogs/{catalog_type}/mappings/{account_id}",
            get(get_mapping).put(set_manual_mapping),
        )
        .route(
            "/organizations/{org_id}/catalogs/{catalog_type}/mappings/export",
            get(export_csv),
        )
        .route(
            "/organizations/{org_id}/catalogs/{catalog_type}/mappings/import",
            post(import_csv),
        )
}

/// Request body for pinning a manual mapping.
#[derive(Debug, serde::Deserialize)]
pub struct ManualMappingRequest {
    /// Official catalog code to map the account to.
    pub official_code: String,
}

/// POST `/organizations/{org_id}/catalogs` - Load an official catalog.
async fn load_catalog(
    State(state): State<AppState>,
    Path(org_id): Path<OrganizationId>,
    Json(catalog): Json<OfficialCatalog>,
) -> impl IntoResponse {
    let catalog_type = catalog.catalog_type;
    let result = state.engine.load_catalog(org_id, catalog);
    if result.is_ok() {
        info!(org_id = %org_id, ?catalog_type, "Official catalog loaded");
    }
    respond(StatusCode::CREATED, result)
}

/// POST `/organizations/{org_id}/catalogs/{catalog_type}/auto-map` -
/// Run an auto-mapping pass.
async fn auto_map(
    State(state): State<AppState>,
    Path((org_id, catalog_type)): Path<(OrganizationId, CatalogType)>,
) -> impl IntoResponse {
    let result = state.engine.auto_map_catalog(org_id, catalog_type).map(|o| {
        serde_json::json!({
            "created": o.created,
            "unmapped": o.unmapped,
        })
    });
    respond_ok(result)
}

/// GET `.../mappings` - List mappings for one catalog type, paginated.
async fn list_mappings(
    State(state): State<AppState>,
    Path((org_id, catalog_type)): Path<(OrganizationId, CatalogType)>,
    Query(page): Query<PageRequest>,
) -> impl IntoResponse {
    let result = state.engine.list_mappings(org_id, catalog_type).map(|all| {
        let total = all.len() as u64;
        let items: Vec<_> = all
            .into_iter()
            .skip(page.offset())
            .take(page.limit())
            .collect();
        PageResponse::new(items, page.page, page.per_page, total)
    });
    respond_paginated(result)
}

/// GET `.../mappings/{account_id}` - Current mapping for one account.
async fn get_mapping(
    State(state): State<AppState>,
    Path((org_id, catalog_type, account_id)): Path<(OrganizationId, CatalogType, AccountId)>,
) -> impl IntoResponse {
    respond_ok(state.engine.get_mapping(org_id, account_id, catalog_type))
}

/// PUT `.../mappings/{account_id}` - Pin a manual mapping.
async fn set_manual_mapping(
    State(state): State<AppState>,
    Path((org_id, catalog_type, account_id)): Path<(OrganizationId, CatalogType, AccountId)>,
    Json(payload): Json<ManualMappingRequest>,
) -> impl IntoResponse {
    let result =
        state
            .engine
            .set_manual_mapping(org_id, account_id, catalog_type, &payload.official_code);
    if result.is_ok() {
        info!(org_id = %org_id, account_id = %account_id, "Manual mapping pinned");
    }
    respond_ok(result)
}

/// GET `.../mappings/export` - Mapping CSV download.
async fn export_csv(
    State(state): State<AppState>,
    Path((org_id, catalog_type)): Path<(OrganizationId, CatalogType)>,
) -> impl IntoResponse {
    match state.engine.export_mapping_csv(org_id, catalog_type) {
        Ok(csv) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
            csv,
        )
            .into_response(),
        Err(err) => error_response(&err),
    }
}

/// POST `.../mappings/import` - Import a mapping CSV as manual
/// mappings. A malformed row rejects the whole file.
async fn import_csv(
    State(state): State<AppState>,
    Path((org_id, catalog_type)): Path<(OrganizationId, CatalogType)>,
    body: String,
) -> impl IntoResponse {
    let result = state.engine.import_mapping_csv(org_id, catalog_type, &body);
    if let Ok(imported) = &result {
        info!(org_id = %org_id, count = imported.len(), "Mapping CSV imported");
    }
    respond(StatusCode::CREATED, result)
}
