// Enrichment - left join contestants against the state income table

use crate::census::StateIncomeRecord;
use crate::records::ContestantRecord;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A contestant plus the median household income of their home state.
///
/// Income is None when the contestant has no parsed state or the state has
/// no row in the income table. Unmatched states pass through silently; the
/// join never drops or fails a record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichedRecord {
    #[serde(flatten)]
    pub contestant: ContestantRecord,
    pub median_household_income: Option<f64>,
}

impl EnrichedRecord {
    pub fn state(&self) -> Option<&str> {
        self.contestant.state.as_deref()
    }

    pub fn age(&self) -> Option<u32> {
        self.contestant.age
    }

    pub fn eliminated_week1(&self) -> bool {
        self.contestant.eliminated_week1()
    }
}

/// Left join on state name, preserving input order. Every contestant
/// appears exactly once in the output.
pub fn enrich(
    contestants: &[ContestantRecord],
    incomes: &[StateIncomeRecord],
) -> Vec<EnrichedRecord> {
    let by_state: HashMap<&str, f64> = incomes
        .iter()
        .map(|r| (r.state.as_str(), r.median_household_income))
        .collect();

    let enriched: Vec<EnrichedRecord> = contestants
        .iter()
        .map(|c| {
            let income = c.state.as_deref().and_then(|s| by_state.get(s).copied());
            EnrichedRecord {
                contestant: c.clone(),
                median_household_income: income,
            }
        })
        .collect();

    let matched = enriched
        .iter()
        .filter(|r| r.median_household_income.is_some())
        .count();
    debug!(
        "Enriched {} contestants ({} with income data)",
        enriched.len(),
        matched
    );

    enriched
}

// ============================================================================
// TESTS
// ============================================================================
