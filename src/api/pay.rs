use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::{parse_as_of, parse_employee_id, parse_month, AppState};
use crate::engine::{
    BonusShare, BucketStatus, DataStatus, MatchRule, PayBreakdown, Standing,
};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayQuery {
    pub employee_id: Option<String>,
    pub month: Option<String>,
    pub as_of: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BonusShareResponse {
    pub competition: String,
    pub amount: String,
    pub tie_count: usize,
    pub status: BucketStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub standing: Option<Standing>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayResponse {
    pub employee_id: i64,
    pub employee_name: String,
    pub month: String,
    pub has_sales_data: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ledger_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_rule: Option<MatchRule>,
    pub commission_rate: String,
    pub total_sales: String,
    pub transaction_count: u32,
    pub base_commission: String,
    pub bonuses: Vec<BonusShareResponse>,
    pub supplemental_bonus: String,
    pub total_bonuses: String,
    pub deductions: String,
    pub deductions_available: bool,
    pub draw: String,
    pub grand_total: String,
    pub check_amount: String,
    pub draw_shortfall: String,
}

impl From<&BonusShare> for BonusShareResponse {
    fn from(share: &BonusShare) -> Self {
        BonusShareResponse {
            competition: share.competition.to_string(),
            amount: share.amount.to_money_string(),
            tie_count: share.tie_count,
            status: share.status,
            standing: share.standing,
        }
    }
}

impl From<&PayBreakdown> for PayResponse {
    fn from(pay: &PayBreakdown) -> Self {
        let has_sales_data = pay.status == DataStatus::Matched;
        PayResponse {
            employee_id: pay.employee_id,
            employee_name: pay.employee_name.clone(),
            month: pay.month.to_string(),
            has_sales_data,
            message: (!has_sales_data).then(|| "no matching sales data".to_string()),
            ledger_name: pay.matched.as_ref().map(|m| m.name.clone()),
            match_rule: pay.matched.as_ref().map(|m| m.rule),
            commission_rate: pay.rate.to_canonical_string(),
            total_sales: pay.total_sales.to_money_string(),
            transaction_count: pay.transaction_count,
            base_commission: pay.base_commission.to_money_string(),
            bonuses: pay.bonuses.iter().map(BonusShareResponse::from).collect(),
            supplemental_bonus: pay.supplemental_bonus.to_money_string(),
            total_bonuses: pay.total_bonuses.to_money_string(),
            deductions: pay.deductions.to_money_string(),
            deductions_available: pay.deductions_available,
            draw: pay.draw.to_money_string(),
            grand_total: pay.grand_total.to_money_string(),
            check_amount: pay.check_amount.to_money_string(),
            draw_shortfall: pay.draw_shortfall.to_money_string(),
        }
    }
}

pub async fn get_pay(
    Query(params): Query<PayQuery>,
    State(state): State<AppState>,
) -> Result<Json<PayResponse>, AppError> {
    let employee_id = parse_employee_id(params.employee_id.as_deref())?;
    let month = parse_month(params.month.as_deref())?;
    let today = parse_as_of(params.as_of.as_deref())?;

    let pay = state
        .payroll
        .pay_for_employee(employee_id, month, today)
        .await?;

    Ok(Json(PayResponse::from(&pay)))
}
