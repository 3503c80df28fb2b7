//! Repository layer over the local SQLite record store.
//!
//! Mirrors the hosted store's `sales` and `employees` tables so the service
//! can run (and be tested) without network access.

mod sales;

use crate::datasource::{DataSourceError, DateRangeFilter, RecordStore, Row, EMPLOYEES_TABLE, SALES_TABLE};
use crate::domain::Employee;
use async_trait::async_trait;
use sqlx::sqlite::SqlitePool;
use sqlx::Row as _;

/// Columns of `sales` that accept a date-range filter.
const SALES_DATE_COLUMNS: [&str; 2] = ["date_paid", "same_day_doc_date"];

/// Repository for database operations.
#[derive(Debug)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Repository { pool }
    }

    /// Insert or replace an employee.
    ///
    /// # Errors
    /// Returns an error if the write fails.
    pub async fn upsert_employee(&self, employee: &Employee) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO employees (id, name, is_remote_worker)
            VALUES (?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                is_remote_worker = excluded.is_remote_worker
            "#,
        )
        .bind(employee.id)
        .bind(employee.name.as_str())
        .bind(employee.is_remote_worker)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn query_employees(&self) -> Result<Vec<Row>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, is_remote_worker
            FROM employees
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                let mut out = Row::new();
                out.insert("id".into(), row.try_get::<i64, _>("id")?.into());
                out.insert("name".into(), row.try_get::<String, _>("name")?.into());
                out.insert(
                    "is_remote_worker".into(),
                    (row.try_get::<i64, _>("is_remote_worker")? != 0).into(),
                );
                Ok(out)
            })
            .collect()
    }
}

#[async_trait]
impl RecordStore for Repository {
    async fn fetch_records(
        &self,
        table: &str,
        filter: Option<&DateRangeFilter>,
    ) -> Result<Vec<Row>, DataSourceError> {
        match (table, filter) {
            (SALES_TABLE, None) => Ok(self.query_sales(None).await?),
            (SALES_TABLE, Some(f)) => {
                let column = SALES_DATE_COLUMNS
                    .iter()
                    .find(|c| **c == f.column)
                    .ok_or_else(|| {
                        DataSourceError::UnknownTable(format!("{}.{}", SALES_TABLE, f.column))
                    })?;
                Ok(self.query_sales(Some((*column, f))).await?)
            }
            (EMPLOYEES_TABLE, None) => Ok(self.query_employees().await?),
            (EMPLOYEES_TABLE, Some(f)) => Err(DataSourceError::UnknownTable(format!(
                "{}.{}",
                EMPLOYEES_TABLE, f.column
            ))),
            (other, _) => Err(DataSourceError::UnknownTable(other.to_string())),
        }
    }
}
