//! Per-consultant reduction of a month's ledger rows.

use crate::domain::{Competition, Decimal, Month, PeriodBucket, SalesRecord};
use std::collections::BTreeMap;

/// Month-to-date totals for one ledger name. Rebuilt on every request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsultantAggregate {
    pub total_sales: Decimal,
    /// Doc-fee counts indexed by `PeriodBucket::index`.
    pub doc_fee_counts: [u32; 3],
    /// Same-day doc-fee counts, bucketed by `date_paid`.
    pub same_day_counts: [u32; 3],
    pub bonus_commission: Decimal,
    pub refunds: Decimal,
    pub transaction_count: u32,
}

impl ConsultantAggregate {
    pub fn doc_fees(&self, bucket: PeriodBucket) -> u32 {
        self.doc_fee_counts[bucket.index()]
    }

    pub fn same_day(&self, bucket: PeriodBucket) -> u32 {
        self.same_day_counts[bucket.index()]
    }

    /// The value a competition compares, as an exact decimal.
    pub fn competition_value(&self, competition: Competition) -> Decimal {
        match competition.window() {
            None => self.total_sales,
            Some(bucket) if competition.is_same_day() => {
                Decimal::from_units(i64::from(self.same_day(bucket)))
            }
            Some(bucket) => Decimal::from_units(i64::from(self.doc_fees(bucket))),
        }
    }

    fn add(&mut self, record: &SalesRecord) {
        self.total_sales += record.fee_paid;
        self.bonus_commission += record.bonus_commission_amount;
        self.refunds += record.refund_amount;
        self.transaction_count += 1;

        if record.is_doc_fee() {
            let bucket = PeriodBucket::for_date(record.date_paid);
            self.doc_fee_counts[bucket.index()] += 1;
            if record.same_day_doc_date.is_some() {
                self.same_day_counts[bucket.index()] += 1;
            }
        }
    }
}

/// Aggregates keyed by trimmed ledger name, in sorted order.
pub type Aggregates = BTreeMap<String, ConsultantAggregate>;

/// Reduce every consultant's rows for `month`. Rows outside the month are skipped.
pub fn aggregate_month(records: &[SalesRecord], month: Month) -> Aggregates {
    let mut aggregates = Aggregates::new();
    let mut skipped = 0usize;

    for record in records {
        if !month.contains(record.date_paid) {
            skipped += 1;
            continue;
        }
        let name = record.consultant_name.trim();
        if name.is_empty() {
            tracing::warn!(date_paid = %record.date_paid, "ledger row without consultant name");
            continue;
        }
        aggregates.entry(name.to_string()).or_default().add(record);
    }

    if skipped > 0 {
        tracing::debug!(%month, skipped, "ignored ledger rows outside the month");
    }

    aggregates
}

/// Refund totals per ledger name; the basis for next month's deductions.
pub fn refund_totals(aggregates: &Aggregates) -> BTreeMap<String, Decimal> {
    aggregates
        .iter()
        .map(|(name, agg)| (name.clone(), agg.refunds))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    fn october() -> Month {
        Month::new(2026, 10).unwrap()
    }

    fn amount(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    #[test]
    fn test_every_row_counts_toward_sales() {
        let rows = vec![
            SalesRecord::new("Maria", amount("100"), "Doc Fee", day(3)),
            SalesRecord::new("Maria", amount("900"), "Service", day(4)),
        ];
        let aggs = aggregate_month(&rows, october());
        let maria = &aggs["Maria"];
        assert_eq!(maria.total_sales, amount("1000"));
        assert_eq!(maria.transaction_count, 2);
        assert_eq!(maria.doc_fees(PeriodBucket::FastStart), 1);
    }

    #[test]
    fn test_bucket_boundaries_follow_date_paid() {
        let rows: Vec<_> = [10, 11, 20, 21]
            .into_iter()
            .map(|d| SalesRecord::new("Sam", amount("10"), "Doc Fee", day(d)))
            .collect();
        let sam = &aggregate_month(&rows, october())["Sam"];
        assert_eq!(sam.doc_fee_counts, [1, 2, 1]);
    }

    #[test]
    fn test_same_day_bucket_tracks_date_paid_not_doc_date() {
        let rows = vec![
            SalesRecord::new("Sam", amount("10"), "Doc Fee", day(12)).with_same_day_doc_date(day(2)),
            SalesRecord::new("Sam", amount("10"), "Service", day(12)).with_same_day_doc_date(day(12)),
        ];
        let sam = &aggregate_month(&rows, october())["Sam"];
        assert_eq!(sam.same_day_counts, [0, 1, 0]);
        assert_eq!(sam.doc_fee_counts, [0, 1, 0]);
    }

    #[test]
    fn test_bonus_and_refunds_summed_unconditionally() {
        let rows = vec![
            SalesRecord::new("Sam", amount("10"), "Service", day(1))
                .with_bonus_commission(amount("5.25"))
                .with_refund(amount("40")),
            SalesRecord::new("Sam", amount("10"), "Doc Fee", day(30))
                .with_bonus_commission(amount("4.75")),
        ];
        let aggs = aggregate_month(&rows, october());
        assert_eq!(aggs["Sam"].bonus_commission, amount("10"));
        assert_eq!(refund_totals(&aggs)["Sam"], amount("40"));
    }

    #[test]
    fn test_rows_outside_month_and_blank_names_are_ignored() {
        let rows = vec![
            SalesRecord::new(
                "Sam",
                amount("10"),
                "Doc Fee",
                NaiveDate::from_ymd_opt(2026, 9, 30).unwrap(),
            ),
            SalesRecord::new("   ", amount("10"), "Doc Fee", day(2)),
            SalesRecord::new(" Sam ", amount("10"), "Doc Fee", day(2)),
        ];
        let aggs = aggregate_month(&rows, october());
        assert_eq!(aggs.len(), 1);
        assert_eq!(aggs["Sam"].transaction_count, 1);
    }

    #[test]
    fn test_competition_value_selects_field() {
        let rows = vec![
            SalesRecord::new("Sam", amount("300"), "Doc Fee", day(25)).with_same_day_doc_date(day(25)),
        ];
        let sam = &aggregate_month(&rows, october())["Sam"];
        assert_eq!(sam.competition_value(Competition::TopSeller), amount("300"));
        assert_eq!(sam.competition_value(Competition::FastFinish), amount("1"));
        assert_eq!(sam.competition_value(Competition::SameDayFastFinish), amount("1"));
        assert!(sam.competition_value(Competition::FastStart).is_zero());
    }
}
