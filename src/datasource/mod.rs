//! Record-store abstraction: the read-only seam to the hosted data store.

use async_trait::async_trait;
use crate::domain::Month;
use chrono::NaiveDate;
use std::fmt;

pub mod csv_import;
pub mod ledger;
pub mod mock;
pub mod rest;

pub use csv_import::{parse_sales_csv, CsvImportError};
pub use ledger::{EmployeeDirectory, SalesLedgerReader};
pub use mock::MockRecordStore;
pub use rest::RestRecordStore;

pub const SALES_TABLE: &str = "sales";
pub const EMPLOYEES_TABLE: &str = "employees";

/// One row as returned by the store: column name to JSON value.
pub type Row = serde_json::Map<String, serde_json::Value>;

/// Half-open date filter on one column: `from <= value < until`.
///
/// The exclusive end keeps timestamp-valued columns whole on the last day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRangeFilter {
    pub column: String,
    pub from: NaiveDate,
    pub until: NaiveDate,
}

impl DateRangeFilter {
    pub fn new(column: impl Into<String>, from: NaiveDate, until: NaiveDate) -> Self {
        Self {
            column: column.into(),
            from,
            until,
        }
    }

    /// Every day of `month`.
    pub fn month(column: impl Into<String>, month: Month) -> Self {
        Self::new(column, month.first_day(), month.next().first_day())
    }
}

/// Generic table reader.
///
/// Implementations own transport concerns (retries, auth, pooling). The
/// engine issues one call per table per request and never writes.
#[async_trait]
pub trait RecordStore: Send + Sync + fmt::Debug {
    /// Fetch all rows of `table`, optionally restricted to a date range.
    ///
    /// # Arguments
    /// * `table` - Table name (`sales`, `employees`)
    /// * `filter` - Half-open date range on a date column
    async fn fetch_records(
        &self,
        table: &str,
        filter: Option<&DateRangeFilter>,
    ) -> Result<Vec<Row>, DataSourceError>;
}

/// Error type for record-store operations.
#[derive(Debug, Clone)]
pub enum DataSourceError {
    /// Network error (e.g., connection timeout, DNS failure)
    NetworkError(String),
    /// HTTP error (e.g., 429 rate limit, 5xx server error)
    HttpError { status: u16, message: String },
    /// Malformed response or row
    ParseError(String),
    /// Rate limit exceeded
    RateLimited,
    /// The store does not know the requested table or column
    UnknownTable(String),
    /// Other error
    Other(String),
}

impl fmt::Display for DataSourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSourceError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            DataSourceError::HttpError { status, message } => {
                write!(f, "HTTP error {}: {}", status, message)
            }
            DataSourceError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            DataSourceError::RateLimited => write!(f, "Rate limited"),
            DataSourceError::UnknownTable(table) => write!(f, "Unknown table: {}", table),
            DataSourceError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for DataSourceError {}

impl From<sqlx::Error> for DataSourceError {
    fn from(err: sqlx::Error) -> Self {
        DataSourceError::Other(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_datasource_error_display() {
        let err = DataSourceError::NetworkError("connection timeout".to_string());
        assert_eq!(err.to_string(), "Network error: connection timeout");

        let err = DataSourceError::HttpError {
            status: 429,
            message: "Too many requests".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP error 429: Too many requests");

        let err = DataSourceError::UnknownTable("payroll".to_string());
        assert_eq!(err.to_string(), "Unknown table: payroll");

        let err = DataSourceError::RateLimited;
        assert_eq!(err.to_string(), "Rate limited");
    }
}
