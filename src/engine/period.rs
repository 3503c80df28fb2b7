//! Whether a competition is still running for the month being viewed.

use crate::domain::{Competition, Month, PeriodBucket};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BucketStatus {
    Ended,
    Active,
    Future,
}

/// How a winning position is labelled. Never affects amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Standing {
    Leading,
    Won,
}

impl BucketStatus {
    pub fn standing(&self) -> Standing {
        match self {
            BucketStatus::Ended => Standing::Won,
            BucketStatus::Active | BucketStatus::Future => Standing::Leading,
        }
    }
}

pub fn classify(competition: Competition, month: Month, today: NaiveDate) -> BucketStatus {
    let current = Month::of(today);
    if month < current {
        return BucketStatus::Ended;
    }
    if month > current {
        return BucketStatus::Future;
    }

    let day = today.day();
    match competition.window() {
        Some(PeriodBucket::FastStart) if day > 10 => BucketStatus::Ended,
        Some(PeriodBucket::FastStart) => BucketStatus::Active,
        Some(PeriodBucket::FastMiddle) if day > 20 => BucketStatus::Ended,
        Some(PeriodBucket::FastMiddle) if day > 10 => BucketStatus::Active,
        Some(PeriodBucket::FastMiddle) => BucketStatus::Future,
        // The last window and the month-long race close with the month.
        Some(PeriodBucket::FastFinish) | None => BucketStatus::Active,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oct(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, day).unwrap()
    }

    fn month(s: &str) -> Month {
        s.parse().unwrap()
    }

    #[test]
    fn test_past_month_is_ended_everywhere() {
        for c in Competition::ALL {
            assert_eq!(classify(c, month("2026-09"), oct(1)), BucketStatus::Ended);
        }
    }

    #[test]
    fn test_future_month_is_future_everywhere() {
        for c in Competition::ALL {
            assert_eq!(classify(c, month("2026-11"), oct(31)), BucketStatus::Future);
        }
    }

    #[test]
    fn test_fast_start_closes_after_day_ten() {
        let m = month("2026-10");
        assert_eq!(classify(Competition::FastStart, m, oct(10)), BucketStatus::Active);
        assert_eq!(classify(Competition::FastStart, m, oct(11)), BucketStatus::Ended);
        assert_eq!(
            classify(Competition::SameDayFastStart, m, oct(11)),
            BucketStatus::Ended
        );
    }

    #[test]
    fn test_fast_middle_lifecycle() {
        let m = month("2026-10");
        assert_eq!(classify(Competition::FastMiddle, m, oct(10)), BucketStatus::Future);
        assert_eq!(classify(Competition::FastMiddle, m, oct(11)), BucketStatus::Active);
        assert_eq!(classify(Competition::FastMiddle, m, oct(20)), BucketStatus::Active);
        assert_eq!(
            classify(Competition::SameDayFastMiddle, m, oct(21)),
            BucketStatus::Ended
        );
    }

    #[test]
    fn test_finish_and_top_seller_run_all_month() {
        let m = month("2026-10");
        for day in [1, 15, 31] {
            assert_eq!(classify(Competition::FastFinish, m, oct(day)), BucketStatus::Active);
            assert_eq!(classify(Competition::TopSeller, m, oct(day)), BucketStatus::Active);
        }
    }

    #[test]
    fn test_standing_labels() {
        assert_eq!(BucketStatus::Ended.standing(), Standing::Won);
        assert_eq!(BucketStatus::Active.standing(), Standing::Leading);
    }
}
