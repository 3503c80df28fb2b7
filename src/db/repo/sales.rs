//! Sales ledger operations.

use super::Repository;
use crate::datasource::{DateRangeFilter, Row};
use crate::domain::SalesRecord;
use sqlx::Row as _;

impl Repository {
    /// Insert multiple ledger rows in a single transaction.
    ///
    /// Rows are keyed by their position in `records` and their contents, so
    /// importing the same batch again is a no-op. Returns the number of rows
    /// actually inserted.
    ///
    /// # Errors
    /// Returns an error if the transaction fails.
    pub async fn insert_sales_batch(&self, records: &[SalesRecord]) -> Result<usize, sqlx::Error> {
        if records.is_empty() {
            return Ok(0);
        }

        let mut inserted = 0usize;
        let mut tx = self.pool.begin().await?;
        for (ordinal, record) in records.iter().enumerate() {
            let result = sqlx::query(
                r#"
                INSERT INTO sales (
                    row_key, consultant_name, fee_paid, fee_type, date_paid,
                    same_day_doc_date, bonus_commission_amount, refund_amount
                )
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                ON CONFLICT(row_key) DO NOTHING
                "#,
            )
            .bind(record.row_key(ordinal))
            .bind(record.consultant_name.as_str())
            .bind(record.fee_paid.to_canonical_string())
            .bind(record.fee_type.as_str())
            .bind(record.date_paid.to_string())
            .bind(record.same_day_doc_date.map(|d| d.to_string()))
            .bind(record.bonus_commission_amount.to_canonical_string())
            .bind(record.refund_amount.to_canonical_string())
            .execute(&mut *tx)
            .await?;
            inserted += result.rows_affected() as usize;
        }
        tx.commit().await?;

        Ok(inserted)
    }

    /// Query ledger rows, optionally within a half-open date range on a
    /// whitelisted column. Rows come back in insertion order.
    pub(super) async fn query_sales(
        &self,
        range: Option<(&str, &DateRangeFilter)>,
    ) -> Result<Vec<Row>, sqlx::Error> {
        let mut sql = String::from(
            r#"
            SELECT consultant_name, fee_paid, fee_type, date_paid,
                   same_day_doc_date, bonus_commission_amount, refund_amount
            FROM sales
            "#,
        );
        if let Some((column, _)) = range {
            // Stored values may carry a time part; compare on the date prefix.
            sql.push_str(&format!(
                "WHERE substr({column}, 1, 10) >= ? AND substr({column}, 1, 10) < ?\n"
            ));
        }
        sql.push_str("ORDER BY id ASC");

        let mut query = sqlx::query(&sql);
        if let Some((_, filter)) = range {
            query = query.bind(filter.from.to_string()).bind(filter.until.to_string());
        }
        let rows = query.fetch_all(&self.pool).await?;

        rows.iter()
            .map(|row| {
                let mut out = Row::new();
                for column in ["consultant_name", "fee_paid", "fee_type", "date_paid"] {
                    out.insert(column.into(), row.try_get::<String, _>(column)?.into());
                }
                out.insert(
                    "same_day_doc_date".into(),
                    row.try_get::<Option<String>, _>("same_day_doc_date")?.into(),
                );
                for column in ["bonus_commission_amount", "refund_amount"] {
                    out.insert(column.into(), row.try_get::<String, _>(column)?.into());
                }
                Ok(out)
            })
            .collect()
    }
}
