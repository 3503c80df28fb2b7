//! Fetch-then-compute orchestration for the pay view.
//!
//! A request takes one snapshot of the ledger (the month plus the prior month
//! for chargebacks), builds the shared [`MonthContext`] once, and derives
//! every breakdown from it without touching the store again.

use crate::datasource::{DataSourceError, EmployeeDirectory, RecordStore, SalesLedgerReader};
use crate::domain::{Decimal, Employee, Month, SalesRecord};
use crate::engine::{
    aggregate_month, classify, refund_totals, resolve, resolve_competitions, Aggregates,
    BucketStatus, CommissionPlan, CompetitionResult, CompetitionResults, Deductions,
    PayBreakdown, PayCalculator,
};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum PayrollError {
    #[error("record store read failed: {0}")]
    Fetch(#[from] DataSourceError),
    #[error("employee {0} not found")]
    EmployeeNotFound(i64),
}

/// Immutable rows for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthSnapshot {
    pub month: Month,
    pub sales: Vec<SalesRecord>,
    /// Prior month's rows; `None` when that read failed.
    pub prior_sales: Option<Vec<SalesRecord>>,
}

/// A competition together with its state as of `today`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompetitionStanding {
    pub result: CompetitionResult,
    pub status: BucketStatus,
}

/// Everything derived once per month and shared by all breakdowns.
#[derive(Debug, Clone)]
pub struct MonthContext {
    month: Month,
    aggregates: Aggregates,
    competitions: CompetitionResults,
    /// Prior month's refunds per ledger name; `None` when that read failed.
    prior_refunds: Option<BTreeMap<String, Decimal>>,
}

impl MonthContext {
    pub fn build(snapshot: &MonthSnapshot, plan: &CommissionPlan) -> Self {
        let aggregates = aggregate_month(&snapshot.sales, snapshot.month);
        let competitions = resolve_competitions(&aggregates, &plan.prizes);
        let prior_refunds = snapshot
            .prior_sales
            .as_ref()
            .map(|rows| refund_totals(&aggregate_month(rows, snapshot.month.previous())));

        MonthContext {
            month: snapshot.month,
            aggregates,
            competitions,
            prior_refunds,
        }
    }

    pub fn month(&self) -> Month {
        self.month
    }

    pub fn aggregates(&self) -> &Aggregates {
        &self.aggregates
    }

    pub fn competitions(&self) -> &CompetitionResults {
        &self.competitions
    }

    /// Last month's refunds recorded against this employee's ledger name.
    pub fn deductions_for(&self, employee: &Employee) -> Deductions {
        let Some(prior) = &self.prior_refunds else {
            return Deductions::unavailable();
        };
        let amount = resolve(&employee.name, prior.keys().map(String::as_str))
            .and_then(|m| prior.get(&m.name).copied())
            .unwrap_or_default();
        Deductions::new(amount)
    }

    pub fn breakdown(
        &self,
        plan: &CommissionPlan,
        employee: &Employee,
        today: NaiveDate,
    ) -> PayBreakdown {
        let matched = resolve(&employee.name, self.aggregates.keys().map(String::as_str));
        if matched.is_none() {
            info!(employee_id = employee.id, employee = %employee.name, month = %self.month,
                "no ledger name matches employee");
        }
        let calculator =
            PayCalculator::new(plan, &self.aggregates, &self.competitions, self.month, today);
        calculator.calculate(employee, matched, self.deductions_for(employee))
    }

    pub fn standings(&self, today: NaiveDate) -> Vec<CompetitionStanding> {
        self.competitions
            .iter()
            .map(|result| CompetitionStanding {
                result: result.clone(),
                status: classify(result.competition, self.month, today),
            })
            .collect()
    }
}

/// Entry point used by the HTTP layer.
#[derive(Debug, Clone)]
pub struct PayrollService {
    ledger: SalesLedgerReader,
    directory: EmployeeDirectory,
    plan: CommissionPlan,
}

impl PayrollService {
    pub fn new(store: Arc<dyn RecordStore>, plan: CommissionPlan) -> Self {
        Self {
            ledger: SalesLedgerReader::new(store.clone()),
            directory: EmployeeDirectory::new(store),
            plan,
        }
    }

    pub fn plan(&self) -> &CommissionPlan {
        &self.plan
    }

    /// Read the month and the prior month concurrently.
    ///
    /// A failed prior-month read only costs the deductions; a failed
    /// current-month read fails the request.
    pub async fn snapshot(&self, month: Month) -> Result<MonthSnapshot, PayrollError> {
        let (sales, prior) = tokio::join!(
            self.ledger.fetch_month(month),
            self.ledger.fetch_month(month.previous())
        );
        let sales = sales?;
        let prior_sales = match prior {
            Ok(rows) => Some(rows),
            Err(e) => {
                warn!(%month, error = %e, "prior-month ledger unavailable; deductions assumed zero");
                None
            }
        };

        Ok(MonthSnapshot {
            month,
            sales,
            prior_sales,
        })
    }

    pub async fn context(&self, month: Month) -> Result<MonthContext, PayrollError> {
        let snapshot = self.snapshot(month).await?;
        Ok(MonthContext::build(&snapshot, &self.plan))
    }

    pub async fn pay_for_employee(
        &self,
        employee_id: i64,
        month: Month,
        today: NaiveDate,
    ) -> Result<PayBreakdown, PayrollError> {
        let (employee, context) =
            tokio::try_join!(self.employee(employee_id), self.context(month))?;
        Ok(context.breakdown(&self.plan, &employee, today))
    }

    /// Breakdowns for every employee, from one shared month context.
    pub async fn payroll(
        &self,
        month: Month,
        today: NaiveDate,
    ) -> Result<Vec<PayBreakdown>, PayrollError> {
        let (employees, context) = tokio::try_join!(
            async { self.directory.list().await.map_err(PayrollError::from) },
            self.context(month)
        )?;

        Ok(employees
            .iter()
            .map(|employee| context.breakdown(&self.plan, employee, today))
            .collect())
    }

    pub async fn standings(
        &self,
        month: Month,
        today: NaiveDate,
    ) -> Result<Vec<CompetitionStanding>, PayrollError> {
        Ok(self.context(month).await?.standings(today))
    }

    pub async fn employee_count(&self) -> Result<usize, PayrollError> {
        Ok(self.directory.list().await?.len())
    }

    async fn employee(&self, employee_id: i64) -> Result<Employee, PayrollError> {
        self.directory
            .get(employee_id)
            .await?
            .ok_or(PayrollError::EmployeeNotFound(employee_id))
    }
}
