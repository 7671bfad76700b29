//! Financial statement routes.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use serde::Deserialize;

use contara_shared::types::OrganizationId;

use crate::response::{error_response, respond_ok};
use crate::AppState;

/// Creates the financial statement routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/organizations/{org_id}/reports/{year}/{month}/trial-balance",
            get(trial_balance),
        )
        .route(
            "/organizations/{org_id}/reports/{year}/{month}/trial-balance.txt",
            get(trial_balance_txt),
        )
        .route(
            "/organizations/{org_id}/reports/{year}/{month}/balance-sheet",
            get(balance_sheet),
        )
        .route(
            "/organizations/{org_id}/reports/{year}/{month}/income-statement",
            get(income_statement),
        )
        .route(
            "/organizations/{org_id}/reports/{year}/{month}/cash-flow",
            get(cash_flow),
        )
}

/// GET `.../trial-balance` - Trial balance for one period.
async fn trial_balance(
    State(state): State<AppState>,
    Path((org_id, year, month)): Path<(OrganizationId, i32, u32)>,
) -> impl IntoResponse {
    respond_ok(state.engine.trial_balance(org_id, year, month))
}

/// GET `.../trial-balance.txt` - Trial balance in the pipe-delimited
/// interchange format.
async fn trial_balance_txt(
    State(state): State<AppState>,
    Path((org_id, year, month)): Path<(OrganizationId, i32, u32)>,
) -> impl IntoResponse {
    match state.engine.export_balance_lines(org_id, year, month) {
        Ok(text) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            text,
        )
            .into_response(),
        Err(err) => error_response(&err),
    }
}

/// GET `.../balance-sheet` - Balance sheet as of a period's end.
async fn balance_sheet(
    State(state): State<AppState>,
    Path((org_id, year, month)): Path<(OrganizationId, i32, u32)>,
) -> impl IntoResponse {
    respond_ok(state.engine.balance_sheet(org_id, year, month))
}

/// Optional range start for statements that cover several periods. The
/// path's year and month are the range end; without these the statement
/// covers that single period.
#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    /// Range start year.
    pub from_year: Option<i32>,
    /// Range start month.
    pub from_month: Option<u32>,
}

impl RangeQuery {
    fn resolve(&self, year: i32, month: u32) -> ((i32, u32), (i32, u32)) {
        let from = (
            self.from_year.unwrap_or(year),
            self.from_month.unwrap_or(month),
        );
        (from, (year, month))
    }
}

/// GET `.../income-statement` - Income statement ending at the path
/// period, optionally starting at `from_year`/`from_month`.
async fn income_statement(
    State(state): State<AppState>,
    Path((org_id, year, month)): Path<(OrganizationId, i32, u32)>,
    Query(range): Query<RangeQuery>,
) -> impl IntoResponse {
    let (from, to) = range.resolve(year, month);
    respond_ok(state.engine.income_statement(org_id, from, to))
}

/// GET `.../cash-flow` - Indirect-method cash flow ending at the path
/// period, optionally starting at `from_year`/`from_month`.
async fn cash_flow(
    State(state): State<AppState>,
    Path((org_id, year, month)): Path<(OrganizationId, i32, u32)>,
    Query(range): Query<RangeQuery>,
) -> impl IntoResponse {
    let (from, to) = range.resolve(year, month);
    respond_ok(state.engine.cash_flow(org_id, from, to))
}
