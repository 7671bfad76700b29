//! Journal entry routes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;

use contara_core::ledger::{EntryStatus, EntryType, JournalLine};
use contara_shared::types::{JournalEntryId, OrganizationId, PageRequest, PageResponse, UserId};

use crate::response::{respond, respond_ok, respond_paginated};
use crate::AppState;

/// Creates the journal entry routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/organizations/{org_id}/entries", post(create_draft))
        .route("/organizations/{org_id}/entries", get(list_entries))
        .route("/organizations/{org_id}/entries/{entry_id}", get(get_entry))
        .route(
            "/organizations/{org_id}/entries/{entry_id}/post",
            post(post_entry),
        )
        .route(
            "/organizations/{org_id}/entries/{entry_id}/approve",
            post(approve_entry),
        )
        .route(
            "/organizations/{org_id}/entries/{entry_id}/cancel",
            post(cancel_entry),
        )
        .route(
            "/organizations/{org_id}/entries/{entry_id}/reverse",
            post(reverse_entry),
        )
}

/// Request body for a draft entry.
#[derive(Debug, Deserialize)]
pub struct CreateDraftRequest {
    /// Accounting date; decides the fiscal period.
    pub entry_date: NaiveDate,
    /// Entry description.
    #[serde(default)]
    pub description: String,
    /// Balanced lines, at least two.
    pub lines: Vec<JournalLine>,
}

/// Request body for posting.
#[derive(Debug, Deserialize)]
pub struct PostEntryRequest {
    /// The posting user.
    pub user_id: UserId,
}

/// Request body for approving.
#[derive(Debug, Deserialize)]
pub struct ApproveEntryRequest {
    /// The approving user.
    pub user_id: UserId,
}

/// List filters: period, status, and entry type are all optional.
#[derive(Debug, Deserialize)]
pub struct EntryListQuery {
    /// Period year.
    pub year: Option<i32>,
    /// Period month.
    pub month: Option<u32>,
    /// Lifecycle status filter.
    pub status: Option<EntryStatus>,
    /// Entry type filter.
    pub entry_type: Option<EntryType>,
    /// Pagination.
    #[serde(flatten)]
    pub page: PageRequest,
}

/// POST `/organizations/{org_id}/entries` - Create a manual draft.
async fn create_draft(
    State(state): State<AppState>,
    Path(org_id): Path<OrganizationId>,
    Json(payload): Json<CreateDraftRequest>,
) -> impl IntoResponse {
    let result = state.engine.create_draft(
        org_id,
        payload.entry_date,
        payload.description,
        payload.lines,
    );
    if let Ok(entry) = &result {
        info!(org_id = %org_id, entry_id = %entry.id, number = entry.entry_number, "Draft created");
    }
    respond(StatusCode::CREATED, result)
}

/// GET `/organizations/{org_id}/entries` - Entries in creation order,
/// optionally filtered to one period.
async fn list_entries(
    State(state): State<AppState>,
    Path(org_id): Path<OrganizationId>,
    Query(query): Query<EntryListQuery>,
) -> impl IntoResponse {
    let period = match (query.year, query.month) {
        (Some(y), Some(m)) => Some((y, m)),
        _ => None,
    };
    let page = query.page;
    let result = state.engine.list_entries(org_id, period).map(|all| {
        let filtered: Vec<_> = all
            .into_iter()
            .filter(|e| query.status.map_or(true, |s| e.status == s))
            .filter(|e| query.entry_type.map_or(true, |t| e.entry_type == t))
            .collect();
        let total = filtered.len() as u64;
        let items: Vec<_> = filtered
            .into_iter()
            .skip(page.offset())
            .take(page.limit())
            .collect();
        PageResponse::new(items, page.page, page.per_page, total)
    });
    respond_paginated(result)
}

/// GET `/organizations/{org_id}/entries/{entry_id}` - One entry.
async fn get_entry(
    State(state): State<AppState>,
    Path((org_id, entry_id)): Path<(OrganizationId, JournalEntryId)>,
) -> impl IntoResponse {
    respond_ok(state.engine.get_entry(org_id, entry_id))
}

/// POST `.../post` - Post a draft into an open period.
async fn post_entry(
    State(state): State<AppState>,
    Path((org_id, entry_id)): Path<(OrganizationId, JournalEntryId)>,
    Json(payload): Json<PostEntryRequest>,
) -> impl IntoResponse {
    let result = state.engine.post_entry(org_id, entry_id, payload.user_id);
    if result.is_ok() {
        info!(org_id = %org_id, entry_id = %entry_id, "Entry posted");
    }
    respond_ok(result)
}

/// POST `.../approve` - Approve a posted entry, recording the approver.
async fn approve_entry(
    State(state): State<AppState>,
    Path((org_id, entry_id)): Path<(OrganizationId, JournalEntryId)>,
    Json(payload): Json<ApproveEntryRequest>,
) -> impl IntoResponse {
    respond_ok(state.engine.approve_entry(org_id, entry_id, payload.user_id))
}

/// POST `.../cancel` - Cancel an entry where the lifecycle allows it.
async fn cancel_entry(
    State(state): State<AppState>,
    Path((org_id, entry_id)): Path<(OrganizationId, JournalEntryId)>,
) -> impl IntoResponse {
    let result = state.engine.cancel_entry(org_id, entry_id);
    if result.is_ok() {
        info!(org_id = %org_id, entry_id = %entry_id, "Entry cancelled");
    }
    respond_ok(result)
}

/// POST `.../reverse` - Create the mirrored reversal draft.
async fn reverse_entry(
    State(state): State<AppState>,
    Path((org_id, entry_id)): Path<(OrganizationId, JournalEntryId)>,
) -> impl IntoResponse {
    let result = state.engine.reverse_entry(org_id, entry_id);
    if let Ok(reversal) = &result {
        info!(
            org_id = %org_id,
            original = %entry_id,
            reversal = %reversal.id,
            "Reversal created"
        );
    }
    respond(StatusCode::CREATED, result)
}
