//! Domain types for the commission engine.
//!
//! This module provides:
//! - Lossless money handling via the Decimal wrapper
//! - Ledger rows (`SalesRecord`) and portal employees
//! - Calendar months, intra-month buckets and the competition set

pub mod decimal;
pub mod period;
pub mod sales;

pub use decimal::Decimal;
pub use period::{Competition, Month, MonthParseError, PeriodBucket};
pub use sales::{is_doc_fee_type, parse_ledger_date, Employee, SalesRecord};
