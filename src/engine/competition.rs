//! Monthly competitions: who has the top value in each bucket, and how the
//! prize is split between ties.

use super::aggregate::Aggregates;
use crate::domain::{Competition, Decimal};
use serde::Serialize;

/// Fixed prize per competition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrizeSchedule {
    pub fast_start: Decimal,
    pub fast_middle: Decimal,
    pub fast_finish: Decimal,
    pub same_day_fast_start: Decimal,
    pub same_day_fast_middle: Decimal,
    pub same_day_fast_finish: Decimal,
    pub top_seller: Decimal,
}

impl PrizeSchedule {
    pub fn prize(&self, competition: Competition) -> Decimal {
        match competition {
            Competition::FastStart => self.fast_start,
            Competition::FastMiddle => self.fast_middle,
            Competition::FastFinish => self.fast_finish,
            Competition::SameDayFastStart => self.same_day_fast_start,
            Competition::SameDayFastMiddle => self.same_day_fast_middle,
            Competition::SameDayFastFinish => self.same_day_fast_finish,
            Competition::TopSeller => self.top_seller,
        }
    }
}

impl Default for PrizeSchedule {
    fn default() -> Self {
        PrizeSchedule {
            fast_start: Decimal::from_units(225),
            fast_middle: Decimal::from_units(225),
            fast_finish: Decimal::from_units(225),
            same_day_fast_start: Decimal::from_units(100),
            same_day_fast_middle: Decimal::from_units(100),
            same_day_fast_finish: Decimal::from_units(100),
            top_seller: Decimal::from_units(500),
        }
    }
}

/// Who took a competition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "names", rename_all = "camelCase")]
pub enum Outcome {
    NoWinner,
    SingleWinner(String),
    TiedWinners(Vec<String>),
}

impl Outcome {
    fn from_winners(mut winners: Vec<String>) -> Self {
        match winners.len() {
            0 => Outcome::NoWinner,
            1 => Outcome::SingleWinner(winners.remove(0)),
            _ => Outcome::TiedWinners(winners),
        }
    }

    pub fn winner_count(&self) -> usize {
        match self {
            Outcome::NoWinner => 0,
            Outcome::SingleWinner(_) => 1,
            Outcome::TiedWinners(names) => names.len(),
        }
    }

    pub fn winners(&self) -> &[String] {
        match self {
            Outcome::NoWinner => &[],
            Outcome::SingleWinner(name) => std::slice::from_ref(name),
            Outcome::TiedWinners(names) => names,
        }
    }

    pub fn includes(&self, name: &str) -> bool {
        self.winners().iter().any(|w| w == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompetitionResult {
    pub competition: Competition,
    /// Highest value observed; zero when nobody scored.
    pub max_value: Decimal,
    pub prize: Decimal,
    pub outcome: Outcome,
}

impl CompetitionResult {
    /// Each winner's even share of the prize; zero with no winner.
    pub fn share(&self) -> Decimal {
        self.prize.split(self.outcome.winner_count())
    }

    /// Share owed to `name`, if `name` is among the winners.
    pub fn share_for(&self, name: &str) -> Decimal {
        if self.outcome.includes(name) {
            self.share()
        } else {
            Decimal::zero()
        }
    }
}

/// Results for all seven competitions, in `Competition::ALL` order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompetitionResults {
    results: Vec<CompetitionResult>,
}

impl CompetitionResults {
    pub fn iter(&self) -> impl Iterator<Item = &CompetitionResult> {
        self.results.iter()
    }

    pub fn get(&self, competition: Competition) -> Option<&CompetitionResult> {
        self.results.iter().find(|r| r.competition == competition)
    }
}

/// Decide every competition over the full consultant set.
///
/// Comparisons are exact. A bucket whose best value is not positive has no
/// winner; otherwise every consultant equal to the best value wins.
pub fn resolve_competitions(aggregates: &Aggregates, prizes: &PrizeSchedule) -> CompetitionResults {
    let results = Competition::ALL
        .into_iter()
        .map(|competition| resolve_one(aggregates, competition, prizes.prize(competition)))
        .collect();
    CompetitionResults { results }
}

fn resolve_one(aggregates: &Aggregates, competition: Competition, prize: Decimal) -> CompetitionResult {
    let max_value = aggregates
        .values()
        .map(|agg| agg.competition_value(competition))
        .max()
        .unwrap_or_default();

    let winners = if max_value.is_positive() {
        aggregates
            .iter()
            .filter(|(_, agg)| agg.competition_value(competition) == max_value)
            .map(|(name, _)| name.clone())
            .collect()
    } else {
        Vec::new()
    };

    CompetitionResult {
        competition,
        max_value: max_value.floor_zero(),
        prize,
        outcome: Outcome::from_winners(winners),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::aggregate::ConsultantAggregate;

    fn amount(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    fn agg(doc_fees: [u32; 3], sales: &str) -> ConsultantAggregate {
        ConsultantAggregate {
            doc_fee_counts: doc_fees,
            total_sales: amount(sales),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_ledger_has_no_winners() {
        let results = resolve_competitions(&Aggregates::new(), &PrizeSchedule::default());
        assert_eq!(results.iter().count(), 7);
        for result in results.iter() {
            assert_eq!(result.outcome, Outcome::NoWinner);
            assert!(result.share().is_zero());
        }
    }

    #[test]
    fn test_two_way_tie_splits_prize() {
        let aggs = Aggregates::from([
            ("A".to_string(), agg([5, 0, 0], "100")),
            ("B".to_string(), agg([5, 1, 0], "200")),
        ]);
        let results = resolve_competitions(&aggs, &PrizeSchedule::default());
        let fast_start = results.get(Competition::FastStart).unwrap();
        assert_eq!(
            fast_start.outcome,
            Outcome::TiedWinners(vec!["A".to_string(), "B".to_string()])
        );
        assert_eq!(fast_start.share(), amount("112.5"));
        assert_eq!(fast_start.share_for("A"), amount("112.5"));

        let middle = results.get(Competition::FastMiddle).unwrap();
        assert_eq!(middle.outcome, Outcome::SingleWinner("B".to_string()));
        assert!(middle.share_for("A").is_zero());

        let top = results.get(Competition::TopSeller).unwrap();
        assert_eq!(top.outcome, Outcome::SingleWinner("B".to_string()));
        assert_eq!(top.max_value, amount("200"));
    }

    #[test]
    fn test_shares_sum_to_prize_for_any_tie_size() {
        for n in 1..=7usize {
            let aggs: Aggregates = (0..n)
                .map(|i| (format!("C{i}"), agg([0, 0, 3], "50")))
                .collect();
            let results = resolve_competitions(&aggs, &PrizeSchedule::default());
            for result in results.iter().filter(|r| r.outcome.winner_count() > 0) {
                let total: Decimal = result
                    .outcome
                    .winners()
                    .iter()
                    .map(|w| result.share_for(w))
                    .sum();
                let diff = (total - result.prize).inner().abs();
                assert!(diff < amount("0.01").inner(), "n={n} diff={diff}");
            }
        }
    }

    #[test]
    fn test_sales_ties_compare_exactly() {
        let aggs = Aggregates::from([
            ("A".to_string(), agg([0, 0, 0], "1000.10")),
            ("B".to_string(), agg([0, 0, 0], "1000.1")),
            ("C".to_string(), agg([0, 0, 0], "1000.09")),
        ]);
        let results = resolve_competitions(&aggs, &PrizeSchedule::default());
        let top = results.get(Competition::TopSeller).unwrap();
        assert_eq!(top.outcome.winner_count(), 2);
        assert!(!top.outcome.includes("C"));
    }

    #[test]
    fn test_non_positive_sales_never_win() {
        let aggs = Aggregates::from([("A".to_string(), agg([0, 0, 0], "-30"))]);
        let results = resolve_competitions(&aggs, &PrizeSchedule::default());
        let top = results.get(Competition::TopSeller).unwrap();
        assert_eq!(top.outcome, Outcome::NoWinner);
        assert!(top.max_value.is_zero());
    }
}
