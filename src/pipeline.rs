// Analysis pipeline - one pure pass over pre-fetched inputs

use crate::buckets::BucketScheme;
use crate::census::StateIncomeRecord;
use crate::enrich::{enrich, EnrichedRecord};
use crate::error::Result;
use crate::records::ContestantRecord;
use crate::stats::{compute_elimination_stats, BucketStat, ComputeOptions};
use chrono::{DateTime, Utc};
use log::info;
use serde::Serialize;

/// Everything one run produces: the enriched table, the week-1 subset, and
/// the three bucket views. Recomputed per run, never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub contestants: Vec<EnrichedRecord>,
    pub week1_eliminations: Vec<EnrichedRecord>,
    pub by_state: Vec<BucketStat>,
    pub by_age: Vec<BucketStat>,
    pub by_income: Vec<BucketStat>,
    pub generated_at: DateTime<Utc>,
}

/// The full transformation, with file reads and the Census fetch injected
/// as already-materialized tables. No I/O happens here, so the pipeline
/// can run repeatedly in one process and is testable without fixtures.
pub struct Pipeline {
    age_scheme: BucketScheme,
    income_scheme: BucketScheme,
    options: ComputeOptions,
}

impl Pipeline {
    pub fn new() -> Result<Self> {
        Self::with_options(ComputeOptions::default())
    }

    pub fn with_options(options: ComputeOptions) -> Result<Self> {
        Ok(Pipeline {
            age_scheme: BucketScheme::default_age_ranges()?,
            income_scheme: BucketScheme::default_income_ranges()?,
            options,
        })
    }

    pub fn run(
        &self,
        contestants: &[ContestantRecord],
        incomes: &[StateIncomeRecord],
    ) -> Result<AnalysisReport> {
        info!(
            "Running analysis: {} contestants, {} income rows",
            contestants.len(),
            incomes.len()
        );

        let enriched = enrich(contestants, incomes);

        let by_state =
            compute_elimination_stats(&enriched, &BucketScheme::ByState, &self.options)?;
        let by_age = compute_elimination_stats(&enriched, &self.age_scheme, &self.options)?;
        let by_income = compute_elimination_stats(&enriched, &self.income_scheme, &self.options)?;

        let week1_eliminations: Vec<EnrichedRecord> = enriched
            .iter()
            .filter(|r| r.eliminated_week1())
            .cloned()
            .collect();

        Ok(AnalysisReport {
            contestants: enriched,
            week1_eliminations,
            by_state,
            by_age,
            by_income,
            generated_at: Utc::now(),
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================
