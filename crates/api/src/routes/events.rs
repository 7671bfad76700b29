//! Business event ingestion.

use std::collections::BTreeMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{error, info};

use contara_core::rules::{BusinessEvent, PayloadValue, TriggerEvent};
use contara_shared::types::{EventId, OrganizationId};

use crate::response::{error_response, respond};
use crate::AppState;

/// Creates the event ingestion routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/organizations/{org_id}/events", post(apply_event))
}

/// Request body for a business event.
///
/// The client supplies the event id; together with each rule's id it
/// forms the idempotency key, so resubmitting the same event is safe.
#[derive(Debug, Deserialize)]
pub struct ApplyEventRequest {
    /// Client-assigned event identifier.
    pub id: EventId,
    /// The event kind.
    pub event_type: TriggerEvent,
    /// Accounting date for the generated entries.
    pub date: NaiveDate,
    /// Typed payload fields.
    #[serde(default)]
    pub payload: BTreeMap<String, PayloadValue>,
}

/// POST `/organizations/{org_id}/events` - Apply a business event; one
/// draft entry per matching rule. Replays are benign no-ops.
async fn apply_event(
    State(state): State<AppState>,
    Path(org_id): Path<OrganizationId>,
    Json(payload): Json<ApplyEventRequest>,
) -> impl IntoResponse {
    let event = BusinessEvent {
        id: payload.id,
        organization_id: org_id,
        event_type: payload.event_type,
        payload: payload.payload,
    };

    match state.engine.apply_event(org_id, &event, payload.date) {
        Ok(outcome) => {
            info!(
                org_id = %org_id,
                event_id = %event.id,
                created = outcome.created.len(),
                replayed = outcome.replayed.len(),
                "Business event applied"
            );
            respond(
                StatusCode::OK,
                Ok::<_, contara_core::engine::EngineError>(serde_json::json!({
                    "created": outcome.created,
                    "replayed": outcome.replayed,
                })),
            )
        }
        Err(err) => {
            error!(org_id = %org_id, event_id = %event.id, error = %err, "Rule application failed");
            error_response(&err)
        }
    }
}
