//! In-memory record store for tests.

use super::{DataSourceError, DateRangeFilter, RecordStore, Row, EMPLOYEES_TABLE, SALES_TABLE};
use crate::domain::{parse_ledger_date, Employee, SalesRecord};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashSet};

/// Record store backed by in-memory tables.
#[derive(Debug, Clone, Default)]
pub struct MockRecordStore {
    tables: BTreeMap<String, Vec<Row>>,
    failing_ranges: HashSet<(String, String)>,
}

impl MockRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a raw row to a table.
    pub fn with_row(mut self, table: &str, row: Row) -> Self {
        self.tables.entry(table.to_string()).or_default().push(row);
        self
    }

    pub fn with_sale(self, record: SalesRecord) -> Self {
        let row = to_row(&record);
        self.with_row(SALES_TABLE, row)
    }

    pub fn with_sales(self, records: Vec<SalesRecord>) -> Self {
        records.into_iter().fold(self, |store, r| store.with_sale(r))
    }

    pub fn with_employee(self, employee: Employee) -> Self {
        let row = to_row(&employee);
        self.with_row(EMPLOYEES_TABLE, row)
    }

    /// Make reads of `table` whose range starts at `from` fail.
    pub fn failing_from(mut self, table: &str, from: chrono::NaiveDate) -> Self {
        self.failing_ranges
            .insert((table.to_string(), from.to_string()));
        self
    }
}

fn to_row<T: serde::Serialize>(value: &T) -> Row {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::Object(map)) => map,
        _ => Row::new(),
    }
}

#[async_trait]
impl RecordStore for MockRecordStore {
    async fn fetch_records(
        &self,
        table: &str,
        filter: Option<&DateRangeFilter>,
    ) -> Result<Vec<Row>, DataSourceError> {
        if let Some(f) = filter {
            if self
                .failing_ranges
                .contains(&(table.to_string(), f.from.to_string()))
            {
                return Err(DataSourceError::NetworkError("mock outage".to_string()));
            }
        }

        let rows = self.tables.get(table).cloned().unwrap_or_default();
        let Some(f) = filter else {
            return Ok(rows);
        };

        Ok(rows
            .into_iter()
            .filter(|row| {
                row.get(&f.column)
                    .and_then(|v| v.as_str())
                    .and_then(parse_ledger_date)
                    .is_some_and(|d| d >= f.from && d < f.until)
            })
            .collect())
    }
}
