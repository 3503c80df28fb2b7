use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::api::pay::PayResponse;
use crate::api::{parse_as_of, parse_month, AppState};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollQuery {
    pub month: Option<String>,
    pub as_of: Option<String>,
}

/// Every employee's breakdown for the month, ordered by employee id.
pub async fn get_payroll(
    Query(params): Query<PayrollQuery>,
    State(state): State<AppState>,
) -> Result<Json<Vec<PayResponse>>, AppError> {
    let month = parse_month(params.month.as_deref())?;
    let today = parse_as_of(params.as_of.as_deref())?;

    let breakdowns = state.payroll.payroll(month, today).await?;
    tracing::info!(%month, employees = breakdowns.len(), "computed payroll");

    Ok(Json(breakdowns.iter().map(PayResponse::from).collect()))
}
