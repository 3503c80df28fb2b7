//! Request-level orchestration: read the snapshot, then run the engine.

pub mod payroll;

pub use payroll::{CompetitionStanding, MonthContext, MonthSnapshot, PayrollError, PayrollService};
