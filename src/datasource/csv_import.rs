//! Parsing ledger exports for seeding the local store.

use crate::domain::{parse_ledger_date, Decimal, SalesRecord};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CsvImportError {
    #[error("csv parse error: {0}")]
    Csv(String),
    #[error("line {line}: invalid {field}: {value}")]
    Field {
        line: usize,
        field: &'static str,
        value: String,
    },
}

/// Parse a CSV export with header
/// `consultant_name,fee_paid,fee_type,date_paid,same_day_doc_date,bonus_commission_amount,refund_amount`.
///
/// Optional columns may be empty or missing.
pub fn parse_sales_csv(csv_bytes: &[u8]) -> Result<Vec<SalesRecord>, CsvImportError> {
    #[derive(Debug, serde::Deserialize)]
    struct CsvRow {
        consultant_name: String,
        fee_paid: String,
        #[serde(default)]
        fee_type: String,
        date_paid: String,
        #[serde(default)]
        same_day_doc_date: Option<String>,
        #[serde(default)]
        bonus_commission_amount: Option<String>,
        #[serde(default)]
        refund_amount: Option<String>,
    }

    fn amount(line: usize, field: &'static str, raw: &str) -> Result<Decimal, CsvImportError> {
        if raw.trim().is_empty() {
            return Ok(Decimal::zero());
        }
        Decimal::from_str_canonical(raw).map_err(|_| CsvImportError::Field {
            line,
            field,
            value: raw.to_string(),
        })
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(csv_bytes);

    let mut records = Vec::new();
    for (idx, result) in reader.deserialize::<CsvRow>().enumerate() {
        // Header is line 1.
        let line = idx + 2;
        let row = result.map_err(|e| CsvImportError::Csv(e.to_string()))?;

        let date_paid = parse_ledger_date(&row.date_paid).ok_or_else(|| CsvImportError::Field {
            line,
            field: "date_paid",
            value: row.date_paid.clone(),
        })?;
        let same_day_doc_date = match row.same_day_doc_date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(parse_ledger_date(raw).ok_or_else(|| CsvImportError::Field {
                line,
                field: "same_day_doc_date",
                value: raw.to_string(),
            })?),
        };

        records.push(SalesRecord {
            consultant_name: row.consultant_name,
            fee_paid: amount(line, "fee_paid", &row.fee_paid)?,
            fee_type: row.fee_type,
            date_paid,
            same_day_doc_date,
            bonus_commission_amount: amount(
                line,
                "bonus_commission_amount",
                row.bonus_commission_amount.as_deref().unwrap_or(""),
            )?,
            refund_amount: amount(
                line,
                "refund_amount",
                row.refund_amount.as_deref().unwrap_or(""),
            )?,
        });
    }

    Ok(records)
}
