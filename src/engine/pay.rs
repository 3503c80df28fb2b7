//! Final pay breakdown for one consultant.
//!
//! Everything here is a pure function of the month's aggregates, the
//! competition results and the prior month's refunds. Amounts are kept exact;
//! rounding to cents happens only when rendering.

use super::aggregate::Aggregates;
use super::competition::{CompetitionResults, PrizeSchedule};
use super::identity::MatchedName;
use super::period::{classify, BucketStatus, Standing};
use crate::domain::{Competition, Decimal, Employee, Month};
use chrono::NaiveDate;

/// Rates, draws and prizes in force for a pay period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommissionPlan {
    pub in_office_rate: Decimal,
    pub remote_rate: Decimal,
    pub in_office_draw: Decimal,
    pub remote_draw: Decimal,
    pub prizes: PrizeSchedule,
}

impl Default for CommissionPlan {
    fn default() -> Self {
        CommissionPlan {
            in_office_rate: Decimal::from_scaled(14, 2),
            remote_rate: Decimal::from_scaled(10, 2),
            in_office_draw: Decimal::from_units(4000),
            remote_draw: Decimal::from_units(1700),
            prizes: PrizeSchedule::default(),
        }
    }
}

impl CommissionPlan {
    pub fn profile(&self, employee: &Employee) -> PayProfile {
        if employee.is_remote_worker {
            PayProfile {
                rate: self.remote_rate,
                draw: self.remote_draw,
                supplemental_eligible: false,
            }
        } else {
            PayProfile {
                rate: self.in_office_rate,
                draw: self.in_office_draw,
                supplemental_eligible: true,
            }
        }
    }
}

/// The employee-specific terms derived from the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayProfile {
    pub rate: Decimal,
    pub draw: Decimal,
    /// Remote workers are excluded from the supplemental bonus pool.
    pub supplemental_eligible: bool,
}

/// Prior-month chargebacks applied this month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deductions {
    pub amount: Decimal,
    /// False when the prior-month lookup failed and zero was assumed.
    pub available: bool,
}

impl Deductions {
    pub fn new(amount: Decimal) -> Self {
        Deductions {
            amount,
            available: true,
        }
    }

    pub fn unavailable() -> Self {
        Deductions {
            amount: Decimal::zero(),
            available: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataStatus {
    Matched,
    NoMatchingSalesData,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BonusShare {
    pub competition: Competition,
    pub amount: Decimal,
    /// Number of winners the prize was split between; zero if not a winner.
    pub tie_count: usize,
    pub status: BucketStatus,
    /// Set only when this consultant is among the winners.
    pub standing: Option<Standing>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayBreakdown {
    pub employee_id: i64,
    pub employee_name: String,
    pub month: Month,
    pub status: DataStatus,
    pub matched: Option<MatchedName>,
    pub rate: Decimal,
    pub total_sales: Decimal,
    pub transaction_count: u32,
    pub base_commission: Decimal,
    pub bonuses: Vec<BonusShare>,
    pub supplemental_bonus: Decimal,
    pub total_bonuses: Decimal,
    pub deductions: Decimal,
    pub deductions_available: bool,
    pub draw: Decimal,
    /// Not floored; may be negative when chargebacks exceed earnings.
    pub grand_total: Decimal,
    pub check_amount: Decimal,
    /// How far earnings fell short of the draw. Informational only.
    pub draw_shortfall: Decimal,
}

/// Computes breakdowns against one month's shared competition results.
pub struct PayCalculator<'a> {
    plan: &'a CommissionPlan,
    aggregates: &'a Aggregates,
    competitions: &'a CompetitionResults,
    month: Month,
    today: NaiveDate,
}

impl<'a> PayCalculator<'a> {
    pub fn new(
        plan: &'a CommissionPlan,
        aggregates: &'a Aggregates,
        competitions: &'a CompetitionResults,
        month: Month,
        today: NaiveDate,
    ) -> Self {
        Self {
            plan,
            aggregates,
            competitions,
            month,
            today,
        }
    }

    /// Breakdown for `employee`. `matched` is the ledger identity for the
    /// month; `None` yields a no-data breakdown rather than an error.
    pub fn calculate(
        &self,
        employee: &Employee,
        matched: Option<MatchedName>,
        deductions: Deductions,
    ) -> PayBreakdown {
        let profile = self.plan.profile(employee);
        let Some(matched) = matched else {
            return self.no_data(employee, profile);
        };

        let aggregate = self.aggregates.get(&matched.name).cloned().unwrap_or_default();

        let base_commission = aggregate.total_sales * profile.rate;
        let supplemental_bonus = if profile.supplemental_eligible {
            aggregate.bonus_commission
        } else {
            Decimal::zero()
        };

        let bonuses = self.bonus_shares(Some(&matched.name));
        let competition_total: Decimal = bonuses.iter().map(|b| b.amount).sum();
        let total_bonuses = competition_total + supplemental_bonus;

        let grand_total = base_commission + total_bonuses - deductions.amount;
        let (check_amount, draw_shortfall) = reconcile_draw(grand_total, profile.draw);

        PayBreakdown {
            employee_id: employee.id,
            employee_name: employee.name.clone(),
            month: self.month,
            status: DataStatus::Matched,
            matched: Some(matched),
            rate: profile.rate,
            total_sales: aggregate.total_sales,
            transaction_count: aggregate.transaction_count,
            base_commission,
            bonuses,
            supplemental_bonus,
            total_bonuses,
            deductions: deductions.amount,
            deductions_available: deductions.available,
            draw: profile.draw,
            grand_total,
            check_amount,
            draw_shortfall,
        }
    }

    fn no_data(&self, employee: &Employee, profile: PayProfile) -> PayBreakdown {
        let (check_amount, draw_shortfall) = reconcile_draw(Decimal::zero(), profile.draw);
        PayBreakdown {
            employee_id: employee.id,
            employee_name: employee.name.clone(),
            month: self.month,
            status: DataStatus::NoMatchingSalesData,
            matched: None,
            rate: profile.rate,
            total_sales: Decimal::zero(),
            transaction_count: 0,
            base_commission: Decimal::zero(),
            bonuses: self.bonus_shares(None),
            supplemental_bonus: Decimal::zero(),
            total_bonuses: Decimal::zero(),
            deductions: Decimal::zero(),
            deductions_available: true,
            draw: profile.draw,
            grand_total: Decimal::zero(),
            check_amount,
            draw_shortfall,
        }
    }

    fn bonus_shares(&self, name: Option<&str>) -> Vec<BonusShare> {
        self.competitions
            .iter()
            .map(|result| {
                let status = classify(result.competition, self.month, self.today);
                let won = name.is_some_and(|n| result.outcome.includes(n));
                if won {
                    BonusShare {
                        competition: result.competition,
                        amount: result.share(),
                        tie_count: result.outcome.winner_count(),
                        status,
                        standing: Some(status.standing()),
                    }
                } else {
                    BonusShare {
                        competition: result.competition,
                        amount: Decimal::zero(),
                        tie_count: 0,
                        status,
                        standing: None,
                    }
                }
            })
            .collect()
    }
}

/// The draw is an advance: the check is whatever earnings exceed it.
pub fn reconcile_draw(grand_total: Decimal, draw: Decimal) -> (Decimal, Decimal) {
    let check = (grand_total - draw).floor_zero();
    let shortfall = (draw - grand_total).floor_zero();
    (check, shortfall)
}
