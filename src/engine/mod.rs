//! Pure computation engine for consultant commission.
//!
//! Flow: ledger rows -> [`aggregate`] -> [`competition`] -> [`pay`], with
//! [`identity`] supplying the ledger name and [`period`] labelling bonus state.

pub mod aggregate;
pub mod competition;
pub mod identity;
pub mod pay;
pub mod period;

pub use aggregate::{aggregate_month, refund_totals, Aggregates, ConsultantAggregate};
pub use competition::{
    resolve_competitions, CompetitionResult, CompetitionResults, Outcome, PrizeSchedule,
};
pub use identity::{resolve, MatchRule, MatchedName};
pub use pay::{
    reconcile_draw, BonusShare, CommissionPlan, DataStatus, Deductions, PayBreakdown,
    PayCalculator, PayProfile,
};
pub use period::{classify, BucketStatus, Standing};
