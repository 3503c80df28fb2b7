use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::{parse_as_of, parse_month, AppState};
use crate::engine::BucketStatus;
use crate::error::AppError;
use crate::orchestration::CompetitionStanding;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitionsQuery {
    pub month: Option<String>,
    pub as_of: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitionEntry {
    pub competition: String,
    pub status: BucketStatus,
    /// Best count (or sales total for the top-seller race).
    pub max_value: String,
    pub prize: String,
    pub winners: Vec<String>,
    pub share_per_winner: String,
}

impl From<&CompetitionStanding> for CompetitionEntry {
    fn from(standing: &CompetitionStanding) -> Self {
        let result = &standing.result;
        CompetitionEntry {
            competition: result.competition.to_string(),
            status: standing.status,
            max_value: result.max_value.to_canonical_string(),
            prize: result.prize.to_money_string(),
            winners: result.outcome.winners().to_vec(),
            share_per_winner: result.share().to_money_string(),
        }
    }
}

pub async fn get_competitions(
    Query(params): Query<CompetitionsQuery>,
    State(state): State<AppState>,
) -> Result<Json<Vec<CompetitionEntry>>, AppError> {
    let month = parse_month(params.month.as_deref())?;
    let today = parse_as_of(params.as_of.as_deref())?;

    let standings = state.payroll.standings(month, today).await?;
    Ok(Json(standings.iter().map(CompetitionEntry::from).collect()))
}
