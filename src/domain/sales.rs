//! Sales-ledger rows and the employee records they are matched against.

use crate::domain::decimal::{deserialize_nullable, Decimal};
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

/// One row of the external sales ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesRecord {
    /// Free-text consultant name as typed into the ledger.
    pub consultant_name: String,
    /// Gross amount collected.
    pub fee_paid: Decimal,
    #[serde(default)]
    pub fee_type: String,
    #[serde(deserialize_with = "deserialize_ledger_date")]
    pub date_paid: NaiveDate,
    /// Set when the doc fee was collected on the day of the sale.
    #[serde(default, deserialize_with = "deserialize_optional_ledger_date")]
    pub same_day_doc_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub bonus_commission_amount: Decimal,
    /// Chargeback recorded against this sale.
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub refund_amount: Decimal,
}

impl SalesRecord {
    pub fn new(
        consultant_name: impl Into<String>,
        fee_paid: Decimal,
        fee_type: impl Into<String>,
        date_paid: NaiveDate,
    ) -> Self {
        SalesRecord {
            consultant_name: consultant_name.into(),
            fee_paid,
            fee_type: fee_type.into(),
            date_paid,
            same_day_doc_date: None,
            bonus_commission_amount: Decimal::zero(),
            refund_amount: Decimal::zero(),
        }
    }

    pub fn with_same_day_doc_date(mut self, date: NaiveDate) -> Self {
        self.same_day_doc_date = Some(date);
        self
    }

    pub fn with_bonus_commission(mut self, amount: Decimal) -> Self {
        self.bonus_commission_amount = amount;
        self
    }

    pub fn with_refund(mut self, amount: Decimal) -> Self {
        self.refund_amount = amount;
        self
    }

    pub fn is_doc_fee(&self) -> bool {
        is_doc_fee_type(&self.fee_type)
    }

    /// Stable dedup key for storing this row as the `ordinal`-th row of an
    /// import. Identical rows at different positions stay distinct.
    pub fn row_key(&self, ordinal: usize) -> String {
        use sha2::{Digest, Sha256};

        fn hash_var(hasher: &mut Sha256, data: &str) {
            hasher.update((data.len() as u64).to_le_bytes());
            hasher.update(data.as_bytes());
        }

        let mut hasher = Sha256::new();
        hasher.update((ordinal as u64).to_le_bytes());
        hash_var(&mut hasher, &self.consultant_name);
        hash_var(&mut hasher, &self.fee_paid.to_canonical_string());
        hash_var(&mut hasher, &self.fee_type);
        hash_var(&mut hasher, &self.date_paid.to_string());
        match self.same_day_doc_date {
            Some(date) => hash_var(&mut hasher, &date.to_string()),
            None => hasher.update([0u8]),
        }
        hash_var(&mut hasher, &self.bonus_commission_amount.to_canonical_string());
        hash_var(&mut hasher, &self.refund_amount.to_canonical_string());
        let hash = hasher.finalize();
        format!("row:{}", hex::encode(&hash[..16]))
    }
}

/// "Doc Fee", "doc_fee", "DOCFEE" and "Documentation Fee" all count.
pub fn is_doc_fee_type(fee_type: &str) -> bool {
    let normalized: String = fee_type
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect();
    normalized.starts_with("doc")
}

/// Parse `YYYY-MM-DD` or an RFC 3339 timestamp, keeping the date part.
pub fn parse_ledger_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
        .or_else(|| s.get(..10).and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()))
}

fn deserialize_ledger_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_ledger_date(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid ledger date: {raw}")))
}

fn deserialize_optional_ledger_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => parse_ledger_date(&raw)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid ledger date: {raw}"))),
    }
}

/// Portal employee; only the fields the pay view needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub is_remote_worker: bool,
}

impl Employee {
    pub fn new(id: i64, name: impl Into<String>, is_remote_worker: bool) -> Self {
        Employee {
            id,
            name: name.into(),
            is_remote_worker,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_doc_fee_classification() {
        assert!(is_doc_fee_type("Doc Fee"));
        assert!(is_doc_fee_type("doc_fee"));
        assert!(is_doc_fee_type("DOCFEE"));
        assert!(is_doc_fee_type("Documentation Fee"));
        assert!(!is_doc_fee_type("Service Fee"));
        assert!(!is_doc_fee_type(""));
    }

    #[test]
    fn test_decodes_hosted_store_row() {
        let row = json!({
            "consultant_name": "Maria Lopez",
            "fee_paid": 249.5,
            "fee_type": "Doc Fee",
            "date_paid": "2026-10-04T15:30:00+00:00",
            "same_day_doc_date": "2026-10-04",
            "bonus_commission_amount": "12.50",
            "refund_amount": null
        });
        let record: SalesRecord = serde_json::from_value(row).unwrap();
        assert_eq!(record.consultant_name, "Maria Lopez");
        assert_eq!(record.fee_paid.to_canonical_string(), "249.5");
        assert_eq!(record.date_paid, NaiveDate::from_ymd_opt(2026, 10, 4).unwrap());
        assert!(record.same_day_doc_date.is_some());
        assert_eq!(record.bonus_commission_amount.to_money_string(), "12.50");
        assert!(record.refund_amount.is_zero());
        assert!(record.is_doc_fee());
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let row = json!({
            "consultant_name": "Sam",
            "fee_paid": "100",
            "date_paid": "2026-10-21"
        });
        let record: SalesRecord = serde_json::from_value(row).unwrap();
        assert_eq!(record.same_day_doc_date, None);
        assert!(record.bonus_commission_amount.is_zero());
        assert!(!record.is_doc_fee());
    }

    #[test]
    fn test_bad_date_is_rejected() {
        let row = json!({
            "consultant_name": "Sam",
            "fee_paid": "100",
            "date_paid": "last tuesday"
        });
        assert!(serde_json::from_value::<SalesRecord>(row).is_err());
    }

    #[test]
    fn test_employee_remote_flag_defaults_false() {
        let employee: Employee =
            serde_json::from_value(json!({"id": 7, "name": "Dana Cole"})).unwrap();
        assert!(!employee.is_remote_worker);
    }

    #[test]
    fn test_row_key_is_stable_and_positional() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 3).unwrap();
        let a = SalesRecord::new("Ana", Decimal::from_units(100), "Doc Fee", date);
        let b = SalesRecord::new("Ana", Decimal::from_scaled(10000, 2), "Doc Fee", date);

        // Same contents at the same position, whatever the decimal scale.
        assert_eq!(a.row_key(0), b.row_key(0));
        assert!(a.row_key(0).starts_with("row:"));
        // Duplicate rows elsewhere in the file are separate sales.
        assert_ne!(a.row_key(0), a.row_key(1));
        assert_ne!(a.row_key(0), a.clone().with_refund(Decimal::from_units(5)).row_key(0));
        assert_ne!(
            a.row_key(0),
            a.clone().with_same_day_doc_date(date).row_key(0)
        );
    }
}
