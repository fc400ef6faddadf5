// Elimination rate computer - week-1 elimination share per bucket

use crate::buckets::BucketScheme;
use crate::enrich::EnrichedRecord;
use crate::error::{AnalysisError, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Week-1 elimination share for one bucket of records. Derived per run,
/// never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketStat {
    pub label: String,
    pub total_count: usize,
    pub eliminated_week1_count: usize,
    pub percent_eliminated_week1: f64,
    pub percent_remaining: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    /// Highest week-1 elimination rate first.
    RateDescending,
    /// The scheme's own bucket order (range schemes: low to high).
    SchemeOrder,
}

#[derive(Debug, Clone, Default)]
pub struct ComputeOptions {
    /// Keep buckets with zero week-1 eliminations instead of dropping them.
    ///
    /// The dashboard views have always dropped such buckets rather than
    /// showing them at 0%, so dropping is the default.
    pub keep_zero_buckets: bool,

    /// Override the scheme's default display order.
    pub sort: Option<SortOrder>,
}

/// Partition records by the scheme's bucket label and compute the share of
/// each bucket eliminated in week 1.
///
/// Records the scheme cannot label (missing or out-of-range key) are
/// skipped for that scheme. Empty groups cannot occur: a bucket exists
/// only when at least one record landed in it, so the percentage division
/// is always over a positive count.
pub fn compute_elimination_stats(
    records: &[EnrichedRecord],
    scheme: &BucketScheme,
    options: &ComputeOptions,
) -> Result<Vec<BucketStat>> {
    if records.is_empty() {
        return Err(AnalysisError::EmptyInput);
    }

    info!(
        "Computing week-1 elimination rates for {} records by {}",
        records.len(),
        scheme.name()
    );

    // Partition: label -> (total, eliminated week 1)
    let mut groups: HashMap<String, (usize, usize)> = HashMap::new();
    let mut skipped = 0usize;

    for record in records {
        match scheme.label_for(record) {
            Some(label) => {
                let entry = groups.entry(label).or_insert((0, 0));
                entry.0 += 1;
                if record.eliminated_week1() {
                    entry.1 += 1;
                }
            }
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        debug!(
            "{} records had no {} key and were skipped",
            skipped,
            scheme.name()
        );
    }

    let mut stats: Vec<BucketStat> = groups
        .into_iter()
        .filter(|(_, (_, eliminated))| options.keep_zero_buckets || *eliminated > 0)
        .map(|(label, (total, eliminated))| {
            let percent = eliminated as f64 / total as f64 * 100.0;
            BucketStat {
                label,
                total_count: total,
                eliminated_week1_count: eliminated,
                percent_eliminated_week1: percent,
                percent_remaining: 100.0 - percent,
            }
        })
        .collect();

    let sort = options.sort.unwrap_or(match scheme.fixed_order() {
        Some(_) => SortOrder::SchemeOrder,
        None => SortOrder::RateDescending,
    });

    match sort {
        SortOrder::RateDescending => {
            stats.sort_by(|a, b| {
                b.percent_eliminated_week1
                    .partial_cmp(&a.percent_eliminated_week1)
                    .unwrap_or(Ordering::Equal)
                    .then_with(|| a.label.cmp(&b.label))
            });
        }
        SortOrder::SchemeOrder => match scheme.fixed_order() {
            Some(order) => {
                stats.sort_by_key(|s| {
                    order
                        .iter()
                        .position(|label| label == &s.label)
                        .unwrap_or(usize::MAX)
                });
            }
            None => stats.sort_by(|a, b| a.label.cmp(&b.label)),
        },
    }

    Ok(stats)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrich::EnrichedRecord;
    use crate::records::ContestantRecord;

    fn enriched(
        hometown: &str,
        age: Option<u32>,
        income: Option<f64>,
        elim_week: Option<u32>,
    ) -> EnrichedRecord {
        let mut contestant = ContestantRecord {
            name: "Test".to_string(),
            age,
            occupation: String::new(),
            hometown: hometown.to_string(),
            elim_week,
            season: 12,
            city: None,
            state: None,
        };
        contestant.derive_hometown_fields();
        EnrichedRecord {
            contestant,
            median_household_income: income,
        }
    }

    fn by_state(records: &[EnrichedRecord], options: &ComputeOptions) -> Vec<BucketStat> {
        compute_elimination_stats(records, &BucketScheme::ByState, options).unwrap()
    }

    fn find<'a>(stats: &'a [BucketStat], label: &str) -> &'a BucketStat {
        stats
            .iter()
            .find(|s| s.label == label)
            .unwrap_or_else(|| panic!("no bucket labeled {}", label))
    }

    #[test]
    fn test_empty_input() {
        let result =
            compute_elimination_stats(&[], &BucketScheme::ByState, &ComputeOptions::default());
        assert!(matches!(result, Err(AnalysisError::EmptyInput)));
    }

    #[test]
    fn test_state_grouping_toy_dataset() {
        // Two from Texas (one eliminated week 1), two from California (both)
        let records = vec![
            enriched("Dallas, Texas", None, None, Some(1)),
            enriched("Austin, Texas", None, None, Some(5)),
            enriched("Fresno, California", None, None, Some(1)),
            enriched("San Diego, California", None, None, Some(1)),
        ];

        let stats = by_state(&records, &ComputeOptions::default());
        assert_eq!(stats.len(), 2);

        let texas = find(&stats, "Texas");
        assert_eq!(texas.total_count, 2);
        assert_eq!(texas.eliminated_week1_count, 1);
        assert!((texas.percent_eliminated_week1 - 50.0).abs() < 1e-9);

        let california = find(&stats, "California");
        assert_eq!(california.total_count, 2);
        assert_eq!(california.eliminated_week1_count, 2);
        assert!((california.percent_eliminated_week1 - 100.0).abs() < 1e-9);

        // Default sort for ByState: rate descending
        assert_eq!(stats[0].label, "California");
    }

    #[test]
    fn test_percentages_sum_to_100() {
        let records = vec![
            enriched("Dallas, Texas", None, None, Some(1)),
            enriched("Austin, Texas", None, None, Some(2)),
            enriched("Waco, Texas", None, None, None),
        ];

        let stats = by_state(&records, &ComputeOptions::default());
        for stat in &stats {
            assert!(stat.eliminated_week1_count <= stat.total_count);
            let sum = stat.percent_eliminated_week1 + stat.percent_remaining;
            assert!((sum - 100.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_zero_elimination_buckets_dropped_by_default() {
        let records = vec![
            enriched("Dallas, Texas", None, None, Some(1)),
            enriched("Denver, Colorado", None, None, Some(4)),
            enriched("Boulder, Colorado", None, None, None),
        ];

        let stats = by_state(&records, &ComputeOptions::default());
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].label, "Texas");
    }

    #[test]
    fn test_zero_elimination_buckets_kept_on_request() {
        let records = vec![
            enriched("Dallas, Texas", None, None, Some(1)),
            enriched("Denver, Colorado", None, None, Some(4)),
        ];

        let options = ComputeOptions {
            keep_zero_buckets: true,
            ..Default::default()
        };
        let stats = by_state(&records, &options);
        assert_eq!(stats.len(), 2);

        let colorado = find(&stats, "Colorado");
        assert_eq!(colorado.eliminated_week1_count, 0);
        assert_eq!(colorado.percent_eliminated_week1, 0.0);
        assert_eq!(colorado.percent_remaining, 100.0);
    }

    #[test]
    fn test_total_counts_cover_all_labeled_records() {
        let records = vec![
            enriched("Dallas, Texas", Some(24), None, Some(1)),
            enriched("Austin, Texas", Some(26), None, Some(1)),
            enriched("Denver, Colorado", Some(31), None, Some(1)),
            // No age: skipped by the age scheme
            enriched("Fresno, California", None, None, Some(1)),
            // Out of range: skipped by the age scheme
            enriched("Tulsa, Oklahoma", Some(55), None, Some(1)),
        ];

        let scheme = BucketScheme::default_age_ranges().unwrap();
        let options = ComputeOptions {
            keep_zero_buckets: true,
            ..Default::default()
        };
        let stats = compute_elimination_stats(&records, &scheme, &options).unwrap();

        let total: usize = stats.iter().map(|s| s.total_count).sum();
        assert_eq!(total, 3); // 5 records minus 2 without an age bucket
    }

    #[test]
    fn test_age_scheme_keeps_interval_order() {
        let records = vec![
            enriched("A, Texas", Some(40), None, Some(1)),
            enriched("B, Texas", Some(24), None, Some(1)),
            enriched("C, Texas", Some(27), None, Some(1)),
        ];

        let scheme = BucketScheme::default_age_ranges().unwrap();
        let stats =
            compute_elimination_stats(&records, &scheme, &ComputeOptions::default()).unwrap();

        let labels: Vec<&str> = stats.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["Below 26", "26-29", "40+"]);
    }

    #[test]
    fn test_sort_override_rate_descending() {
        let records = vec![
            enriched("A, Texas", Some(24), None, None),
            enriched("B, Texas", Some(24), None, Some(1)),
            enriched("C, Texas", Some(27), None, Some(1)),
        ];

        let scheme = BucketScheme::default_age_ranges().unwrap();
        let options = ComputeOptions {
            keep_zero_buckets: false,
            sort: Some(SortOrder::RateDescending),
        };
        let stats = compute_elimination_stats(&records, &scheme, &options).unwrap();

        // 26-29 is 1/1 = 100%, Below 26 is 1/2 = 50%
        assert_eq!(stats[0].label, "26-29");
        assert_eq!(stats[1].label, "Below 26");
    }

    #[test]
    fn test_missing_income_excluded_from_income_buckets() {
        let records = vec![
            enriched("Dallas, Texas", None, Some(73_035.0), Some(1)),
            enriched("Calgary, Alberta", None, None, Some(1)),
        ];

        let scheme = BucketScheme::default_income_ranges().unwrap();
        let stats =
            compute_elimination_stats(&records, &scheme, &ComputeOptions::default()).unwrap();

        let total: usize = stats.iter().map(|s| s.total_count).sum();
        assert_eq!(total, 1);

        // The same record still shows up under state bucketing
        let state_stats = by_state(&records, &ComputeOptions::default());
        assert_eq!(
            state_stats.iter().map(|s| s.total_count).sum::<usize>(),
            2
        );
    }
}
