//! Mapping portal employees onto free-text ledger names.
//!
//! The ledger is not keyed by employee id, so the pay view has to guess which
//! consultant name belongs to an employee. Rules are tried in priority order
//! and the first rule with any candidate wins. Candidates are examined in
//! sorted order so that the answer never depends on ledger row order.

use serde::Serialize;
use std::collections::BTreeSet;

/// Matching rules, highest priority first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchRule {
    ExactFullName,
    ExactFirstName,
    LedgerContainsFirstName,
    FullNameContainsLedger,
    /// Last resort. A ledger name whose first token equals the employee's
    /// first name always contains it, so `LedgerContainsFirstName` claims
    /// such a candidate first; this rule never decides a match on its own.
    FirstTokenEquality,
}

impl MatchRule {
    pub const PRIORITY: [MatchRule; 5] = [
        MatchRule::ExactFullName,
        MatchRule::ExactFirstName,
        MatchRule::LedgerContainsFirstName,
        MatchRule::FullNameContainsLedger,
        MatchRule::FirstTokenEquality,
    ];

    fn matches(&self, employee: &NormalizedName, ledger: &NormalizedName) -> bool {
        match self {
            MatchRule::ExactFullName => employee.full == ledger.full,
            MatchRule::ExactFirstName => employee.first == ledger.full,
            MatchRule::LedgerContainsFirstName => ledger.full.contains(&employee.first),
            MatchRule::FullNameContainsLedger => employee.full.contains(&ledger.full),
            MatchRule::FirstTokenEquality => employee.first == ledger.first,
        }
    }
}

/// A ledger name chosen for an employee, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedName {
    pub name: String,
    pub rule: MatchRule,
}

struct NormalizedName {
    full: String,
    first: String,
}

impl NormalizedName {
    fn new(raw: &str) -> Option<Self> {
        let full = raw
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();
        let first = full.split(' ').next()?.to_string();
        if first.is_empty() {
            return None;
        }
        Some(NormalizedName { full, first })
    }
}

/// Resolve `employee_name` against the distinct ledger names of a period.
pub fn resolve<'a, I>(employee_name: &str, candidates: I) -> Option<MatchedName>
where
    I: IntoIterator<Item = &'a str>,
{
    let employee = NormalizedName::new(employee_name)?;

    let ordered: BTreeSet<&str> = candidates
        .into_iter()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .collect();
    let normalized: Vec<(&str, NormalizedName)> = ordered
        .into_iter()
        .filter_map(|c| NormalizedName::new(c).map(|n| (c, n)))
        .collect();

    for rule in MatchRule::PRIORITY {
        let mut hits = normalized
            .iter()
            .filter(|(_, ledger)| rule.matches(&employee, ledger));
        if let Some((name, _)) = hits.next() {
            if hits.next().is_some() {
                tracing::debug!(
                    employee = employee_name,
                    rule = ?rule,
                    chosen = name,
                    "several ledger names match; taking the first in sorted order"
                );
            }
            return Some(MatchedName {
                name: (*name).to_string(),
                rule,
            });
        }
    }

    None
}
