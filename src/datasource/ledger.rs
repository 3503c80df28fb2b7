//! Typed readers over the generic record store.

use super::{DataSourceError, DateRangeFilter, RecordStore, Row, EMPLOYEES_TABLE, SALES_TABLE};
use crate::domain::{Employee, Month, SalesRecord};
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Reads a month of sales rows. No business logic beyond decoding.
#[derive(Debug, Clone)]
pub struct SalesLedgerReader {
    store: Arc<dyn RecordStore>,
}

impl SalesLedgerReader {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// All rows whose `date_paid` falls inside `month`.
    pub async fn fetch_month(&self, month: Month) -> Result<Vec<SalesRecord>, DataSourceError> {
        let filter = DateRangeFilter::month("date_paid", month);
        let rows = self.store.fetch_records(SALES_TABLE, Some(&filter)).await?;
        tracing::debug!(%month, rows = rows.len(), "fetched sales ledger rows");
        decode_rows(rows)
    }
}

/// Employee lookups backed by the `employees` table.
#[derive(Debug, Clone)]
pub struct EmployeeDirectory {
    store: Arc<dyn RecordStore>,
}

impl EmployeeDirectory {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// All employees, ordered by id.
    pub async fn list(&self) -> Result<Vec<Employee>, DataSourceError> {
        let rows = self.store.fetch_records(EMPLOYEES_TABLE, None).await?;
        let mut employees: Vec<Employee> = decode_rows(rows)?;
        employees.sort_by_key(|e| e.id);
        Ok(employees)
    }

    pub async fn get(&self, id: i64) -> Result<Option<Employee>, DataSourceError> {
        Ok(self.list().await?.into_iter().find(|e| e.id == id))
    }
}

fn decode_rows<T: DeserializeOwned>(rows: Vec<Row>) -> Result<Vec<T>, DataSourceError> {
    rows.into_iter()
        .enumerate()
        .map(|(idx, row)| {
            serde_json::from_value(serde_json::Value::Object(row))
                .map_err(|e| DataSourceError::ParseError(format!("row {}: {}", idx, e)))
        })
        .collect()
}
