//! Fiscal period routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use tracing::{info, warn};

use contara_core::fiscal::ClosingTask;
use contara_shared::types::{OrganizationId, UserId};

use crate::response::{respond, respond_ok};
use crate::AppState;

/// Creates the fiscal period routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/organizations/{org_id}/periods", post(open_period))
        .route("/organizations/{org_id}/periods", get(list_periods))
        .route(
            "/organizations/{org_id}/periods/{year}/{month}/checklist",
            put(complete_task),
        )
        .route(
            "/organizations/{org_id}/periods/{year}/{month}/close",
            post(close_period),
        )
        .route(
            "/organizations/{org_id}/periods/{year}/{month}/lock",
            post(lock_period),
        )
        .route(
            "/organizations/{org_id}/periods/{year}/{month}/unlock",
            post(unlock_period),
        )
        .route("/organizations/{org_id}/audit-log", get(audit_log))
}

/// Request body for opening a period.
#[derive(Debug, Deserialize)]
pub struct OpenPeriodRequest {
    /// Calendar year.
    pub year: i32,
    /// Calendar month, 1-12.
    pub month: u32,
}

/// Request body for ticking a closing task.
#[derive(Debug, Deserialize)]
pub struct CompleteTaskRequest {
    /// The task that finished.
    pub task: ClosingTask,
}

/// Request body naming the acting user.
#[derive(Debug, Deserialize)]
pub struct ActorRequest {
    /// Who performs the transition.
    pub user_id: UserId,
}

/// Request body for the audited unlock override.
#[derive(Debug, Deserialize)]
pub struct UnlockRequest {
    /// Who performs the unlock.
    pub user_id: UserId,
    /// Stated justification, kept in the audit log.
    pub reason: String,
}

/// POST `/organizations/{org_id}/periods` - Open a period (idempotent).
async fn open_period(
    State(state): State<AppState>,
    Path(org_id): Path<OrganizationId>,
    Json(payload): Json<OpenPeriodRequest>,
) -> impl IntoResponse {
    respond(
        StatusCode::CREATED,
        state.engine.open_period(org_id, payload.year, payload.month),
    )
}

/// GET `/organizations/{org_id}/periods` - Periods by year and month.
async fn list_periods(
    State(state): State<AppState>,
    Path(org_id): Path<OrganizationId>,
) -> impl IntoResponse {
    respond_ok(state.engine.list_periods(org_id))
}

/// PUT `.../checklist` - Mark a closing task done.
async fn complete_task(
    State(state): State<AppState>,
    Path((org_id, year, month)): Path<(OrganizationId, i32, u32)>,
    Json(payload): Json<CompleteTaskRequest>,
) -> impl IntoResponse {
    respond_ok(
        state
            .engine
            .complete_closing_task(org_id, year, month, payload.task),
    )
}

/// POST `.../close` - Close a period; the checklist must be complete.
async fn close_period(
    State(state): State<AppState>,
    Path((org_id, year, month)): Path<(OrganizationId, i32, u32)>,
    Json(payload): Json<ActorRequest>,
) -> impl IntoResponse {
    let result = state
        .engine
        .close_period(org_id, year, month, payload.user_id);
    if result.is_ok() {
        info!(org_id = %org_id, year, month, "Period closed");
    }
    respond_ok(result)
}

/// POST `.../lock` - Lock a closed period.
async fn lock_period(
    State(state): State<AppState>,
    Path((org_id, year, month)): Path<(OrganizationId, i32, u32)>,
    Json(payload): Json<ActorRequest>,
) -> impl IntoResponse {
    let result = state
        .engine
        .lock_period(org_id, year, month, payload.user_id);
    if result.is_ok() {
        info!(org_id = %org_id, year, month, "Period locked");
    }
    respond_ok(result)
}

/// POST `.../unlock` - Audited admin override reopening a locked
/// period.
async fn unlock_period(
    State(state): State<AppState>,
    Path((org_id, year, month)): Path<(OrganizationId, i32, u32)>,
    Json(payload): Json<UnlockRequest>,
) -> impl IntoResponse {
    let result =
        state
            .engine
            .unlock_period(org_id, year, month, payload.user_id, payload.reason);
    if result.is_ok() {
        warn!(org_id = %org_id, year, month, "Locked period reopened by admin override");
    }
    respond_ok(result)
}

/// GET `/organizations/{org_id}/audit-log` - The audit trail.
async fn audit_log(
    State(state): State<AppState>,
    Path(org_id): Path<OrganizationId>,
) -> impl IntoResponse {
    respond_ok(state.engine.audit_log(org_id))
}
