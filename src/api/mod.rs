pub mod competitions;
pub mod health;
pub mod pay;
pub mod payroll;

use crate::domain::{parse_ledger_date, Month};
use crate::error::AppError;
use crate::orchestration::PayrollService;
use axum::{routing::get, Router};
use chrono::NaiveDate;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub payroll: Arc<PayrollService>,
}

impl AppState {
    pub fn new(payroll: Arc<PayrollService>) -> Self {
        Self { payroll }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/v1/pay", get(pay::get_pay))
        .route("/v1/payroll", get(payroll::get_payroll))
        .route("/v1/competitions", get(competitions::get_competitions))
        .layer(cors)
        .with_state(state)
}

pub(crate) fn parse_month(raw: Option<&str>) -> Result<Month, AppError> {
    let raw = raw.ok_or_else(|| AppError::BadRequest("month is required".to_string()))?;
    raw.parse::<Month>()
        .map_err(|e| AppError::BadRequest(e.to_string()))
}

pub(crate) fn parse_employee_id(raw: Option<&str>) -> Result<i64, AppError> {
    let raw = raw.ok_or_else(|| AppError::BadRequest("employeeId is required".to_string()))?;
    raw.trim()
        .parse::<i64>()
        .map_err(|_| AppError::BadRequest(format!("invalid employeeId: {}", raw)))
}

/// `asOf` override for "today"; defaults to the local date.
pub(crate) fn parse_as_of(raw: Option<&str>) -> Result<NaiveDate, AppError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(chrono::Local::now().date_naive()),
        Some(s) => parse_ledger_date(s)
            .ok_or_else(|| AppError::BadRequest(format!("invalid asOf date: {}", s))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_month_requires_value() {
        assert!(matches!(parse_month(None), Err(AppError::BadRequest(_))));
        assert!(matches!(
            parse_month(Some("2026-1x")),
            Err(AppError::BadRequest(_))
        ));
        assert_eq!(parse_month(Some("2026-10")).unwrap().to_string(), "2026-10");
    }

    #[test]
    fn test_parse_employee_id() {
        assert_eq!(parse_employee_id(Some("42")).unwrap(), 42);
        assert!(matches!(parse_employee_id(None), Err(AppError::BadRequest(_))));
        assert!(matches!(
            parse_employee_id(Some("abc")),
            Err(AppError::BadRequest(msg)) if msg == "invalid employeeId: abc"
        ));
    }

    #[test]
    fn test_parse_as_of() {
        assert_eq!(
            parse_as_of(Some("2026-10-17")).unwrap(),
            NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
        );
        assert!(parse_as_of(Some("yesterday")).is_err());
        assert!(parse_as_of(None).is_ok());
    }
}
