//! Calendar months, intra-month buckets and the competition set.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid month {0:?}, expected YYYY-MM")]
pub struct MonthParseError(pub String);

/// A calendar month, e.g. `2026-10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month {
    year: i32,
    month: u32,
}

impl Month {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| Month { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Month {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn last_day(&self) -> NaiveDate {
        self.next()
            .first_day()
            .pred_opt()
            .unwrap_or(NaiveDate::MAX)
    }

    pub fn previous(&self) -> Self {
        if self.month == 1 {
            Month {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Month {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            Month {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Month {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Month {
    type Err = MonthParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || MonthParseError(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(err)?;
        if year.len() != 4 || month.is_empty() || month.len() > 2 {
            return Err(err());
        }
        let year = year.parse::<i32>().map_err(|_| err())?;
        let month = month.parse::<u32>().map_err(|_| err())?;
        Month::new(year, month).ok_or_else(err)
    }
}

/// Ten-day-ish competition window within a month, keyed by day-of-month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PeriodBucket {
    FastStart,
    FastMiddle,
    FastFinish,
}

impl PeriodBucket {
    pub const ALL: [PeriodBucket; 3] = [
        PeriodBucket::FastStart,
        PeriodBucket::FastMiddle,
        PeriodBucket::FastFinish,
    ];

    /// Days 1-10, 11-20, 21-end.
    pub fn for_day(day: u32) -> Self {
        match day {
            0..=10 => PeriodBucket::FastStart,
            11..=20 => PeriodBucket::FastMiddle,
            _ => PeriodBucket::FastFinish,
        }
    }

    pub fn for_date(date: NaiveDate) -> Self {
        Self::for_day(date.day())
    }

    pub fn index(&self) -> usize {
        match self {
            PeriodBucket::FastStart => 0,
            PeriodBucket::FastMiddle => 1,
            PeriodBucket::FastFinish => 2,
        }
    }
}

/// The seven competitions decided each month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Competition {
    FastStart,
    FastMiddle,
    FastFinish,
    SameDayFastStart,
    SameDayFastMiddle,
    SameDayFastFinish,
    TopSeller,
}

impl Competition {
    pub const ALL: [Competition; 7] = [
        Competition::FastStart,
        Competition::FastMiddle,
        Competition::FastFinish,
        Competition::SameDayFastStart,
        Competition::SameDayFastMiddle,
        Competition::SameDayFastFinish,
        Competition::TopSeller,
    ];

    /// The intra-month window this competition covers; `None` for the whole month.
    pub fn window(&self) -> Option<PeriodBucket> {
        match self {
            Competition::FastStart | Competition::SameDayFastStart => Some(PeriodBucket::FastStart),
            Competition::FastMiddle | Competition::SameDayFastMiddle => {
                Some(PeriodBucket::FastMiddle)
            }
            Competition::FastFinish | Competition::SameDayFastFinish => {
                Some(PeriodBucket::FastFinish)
            }
            Competition::TopSeller => None,
        }
    }

    pub fn is_same_day(&self) -> bool {
        matches!(
            self,
            Competition::SameDayFastStart
                | Competition::SameDayFastMiddle
                | Competition::SameDayFastFinish
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Competition::FastStart => "fastStart",
            Competition::FastMiddle => "fastMiddle",
            Competition::FastFinish => "fastFinish",
            Competition::SameDayFastStart => "sameDayFastStart",
            Competition::SameDayFastMiddle => "sameDayFastMiddle",
            Competition::SameDayFastFinish => "sameDayFastFinish",
            Competition::TopSeller => "topSeller",
        }
    }
}

impl fmt::Display for Competition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
