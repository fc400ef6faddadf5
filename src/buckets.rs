// Bucketing schemes - how records map to named buckets

use crate::enrich::EnrichedRecord;
use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};

/// Sentinel bucket for records with no parsed home state.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Half-open `[lower, upper)` intervals with one label per interval.
///
/// Boundaries must be strictly increasing; the last boundary may be
/// `f64::INFINITY` for an unbounded top bucket. Intervals are exhaustive
/// and non-overlapping over `[first, last)` by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeSpec {
    boundaries: Vec<f64>,
    labels: Vec<String>,
}

impl RangeSpec {
    pub fn new(boundaries: Vec<f64>, labels: Vec<String>) -> Result<Self> {
        if boundaries.len() < 2 {
            return Err(AnalysisError::InvalidBucketSpec(
                "at least two boundaries are required".to_string(),
            ));
        }

        if labels.len() != boundaries.len() - 1 {
            return Err(AnalysisError::InvalidBucketSpec(format!(
                "{} intervals but {} labels",
                boundaries.len() - 1,
                labels.len()
            )));
        }

        if !boundaries.windows(2).all(|w| w[0] < w[1]) {
            return Err(AnalysisError::InvalidBucketSpec(
                "boundaries must be strictly increasing".to_string(),
            ));
        }

        Ok(RangeSpec { boundaries, labels })
    }

    /// Label for a value, or None when the value falls outside every
    /// interval. Lower bounds are inclusive, upper bounds exclusive.
    pub fn label_for(&self, value: f64) -> Option<&str> {
        for (i, window) in self.boundaries.windows(2).enumerate() {
            if value >= window[0] && value < window[1] {
                return Some(&self.labels[i]);
            }
        }
        None
    }

    /// Interval labels in boundary order (low to high).
    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

/// One bucketing scheme per dashboard view. All three are instantiations
/// of the same label function, not separate code paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BucketScheme {
    /// Raw categorical value: the contestant's home state.
    ByState,
    /// Fixed age ranges.
    ByAgeRange(RangeSpec),
    /// Fixed household income ranges.
    ByIncomeRange(RangeSpec),
}

impl BucketScheme {
    /// The age ranges used across the dashboard views.
    pub fn default_age_ranges() -> Result<Self> {
        Ok(BucketScheme::ByAgeRange(RangeSpec::new(
            vec![23.0, 26.0, 29.0, 34.0, 39.0, 42.0],
            vec!["Below 26", "26-29", "30-34", "35-39", "40+"]
                .into_iter()
                .map(String::from)
                .collect(),
        )?))
    }

    /// The household income ranges used across the dashboard views.
    pub fn default_income_ranges() -> Result<Self> {
        Ok(BucketScheme::ByIncomeRange(RangeSpec::new(
            vec![0.0, 40_000.0, 60_000.0, 80_000.0, 100_000.0, f64::INFINITY],
            vec![
                "Low (<$40k)",
                "$40k-$60k",
                "$60k-$80k",
                "$80k-$100k",
                "High (>$100k)",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        )?))
    }

    /// Human-readable name for display
    pub fn name(&self) -> &str {
        match self {
            BucketScheme::ByState => "Home State",
            BucketScheme::ByAgeRange(_) => "Age Range",
            BucketScheme::ByIncomeRange(_) => "Household Income",
        }
    }

    /// Bucket label for one record.
    ///
    /// ByState is total: a record without a parsed state lands in the
    /// "Unknown" bucket. Range schemes return None for records whose key
    /// is missing or outside the configured boundaries; the computer skips
    /// those records for that scheme.
    pub fn label_for(&self, record: &EnrichedRecord) -> Option<String> {
        match self {
            BucketScheme::ByState => Some(
                record
                    .state()
                    .map(str::to_string)
                    .unwrap_or_else(|| UNKNOWN_LABEL.to_string()),
            ),
            BucketScheme::ByAgeRange(spec) => record
                .age()
                .and_then(|age| spec.label_for(f64::from(age)))
                .map(str::to_string),
            BucketScheme::ByIncomeRange(spec) => record
                .median_household_income
                .and_then(|income| spec.label_for(income))
                .map(str::to_string),
        }
    }

    /// Fixed display order for the scheme's buckets, when it has one.
    /// Range schemes keep their interval order; ByState has none.
    pub fn fixed_order(&self) -> Option<&[String]> {
        match self {
            BucketScheme::ByState => None,
            BucketScheme::ByAgeRange(spec) | BucketScheme::ByIncomeRange(spec) => {
                Some(spec.labels())
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::ContestantRecord;

    fn enriched(hometown: &str, age: Option<u32>, income: Option<f64>) -> EnrichedRecord {
        let mut contestant = ContestantRecord {
            name: "Test".to_string(),
            age,
            occupation: String::new(),
            hometown: hometown.to_string(),
            elim_week: None,
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

    #[test]
    fn test_range_spec_rejects_non_monotonic_boundaries() {
        let result = RangeSpec::new(
            vec![23.0, 29.0, 26.0],
            vec!["a".to_string(), "b".to_string()],
        );
        assert!(matches!(result, Err(AnalysisError::InvalidBucketSpec(_))));
    }

    #[test]
    fn test_range_spec_rejects_duplicate_boundaries() {
        let result = RangeSpec::new(
            vec![23.0, 26.0, 26.0],
            vec!["a".to_string(), "b".to_string()],
        );
        assert!(matches!(result, Err(AnalysisError::InvalidBucketSpec(_))));
    }

    #[test]
    fn test_range_spec_rejects_label_mismatch() {
        let result = RangeSpec::new(vec![23.0, 26.0, 29.0], vec!["only one".to_string()]);
        assert!(matches!(result, Err(AnalysisError::InvalidBucketSpec(_))));
    }

    #[test]
    fn test_range_spec_rejects_too_few_boundaries() {
        let result = RangeSpec::new(vec![23.0], vec![]);
        assert!(matches!(result, Err(AnalysisError::InvalidBucketSpec(_))));
    }

    #[test]
    fn test_age_boundaries_are_half_open() {
        let scheme = BucketScheme::default_age_ranges().unwrap();

        // Lower bound inclusive: exactly 26 is "26-29", not "Below 26"
        assert_eq!(
            scheme.label_for(&enriched("Dallas, Texas", Some(26), None)),
            Some("26-29".to_string())
        );
        assert_eq!(
            scheme.label_for(&enriched("Dallas, Texas", Some(25), None)),
            Some("Below 26".to_string())
        );
        assert_eq!(
            scheme.label_for(&enriched("Dallas, Texas", Some(40), None)),
            Some("40+".to_string())
        );
    }

    #[test]
    fn test_age_out_of_range_is_skipped() {
        let scheme = BucketScheme::default_age_ranges().unwrap();
        assert_eq!(scheme.label_for(&enriched("Dallas, Texas", Some(22), None)), None);
        assert_eq!(scheme.label_for(&enriched("Dallas, Texas", Some(55), None)), None);
        assert_eq!(scheme.label_for(&enriched("Dallas, Texas", None, None)), None);
    }

    #[test]
    fn test_income_boundaries_are_half_open() {
        let scheme = BucketScheme::default_income_ranges().unwrap();

        // Exactly 40000 is "$40k-$60k", not "Low (<$40k)"
        assert_eq!(
            scheme.label_for(&enriched("Dallas, Texas", None, Some(40_000.0))),
            Some("$40k-$60k".to_string())
        );
        assert_eq!(
            scheme.label_for(&enriched("Dallas, Texas", None, Some(39_999.0))),
            Some("Low (<$40k)".to_string())
        );

        // Top bucket is unbounded
        assert_eq!(
            scheme.label_for(&enriched("Dallas, Texas", None, Some(250_000.0))),
            Some("High (>$100k)".to_string())
        );
    }

    #[test]
    fn test_missing_income_is_skipped() {
        let scheme = BucketScheme::default_income_ranges().unwrap();
        assert_eq!(scheme.label_for(&enriched("Dallas, Texas", None, None)), None);
    }

    #[test]
    fn test_state_scheme_is_total() {
        let scheme = BucketScheme::ByState;
        assert_eq!(
            scheme.label_for(&enriched("Dallas, Texas", None, None)),
            Some("Texas".to_string())
        );
        // No comma, no parsed state: sentinel bucket rather than a skip
        assert_eq!(
            scheme.label_for(&enriched("Toronto", None, None)),
            Some(UNKNOWN_LABEL.to_string())
        );
    }

    #[test]
    fn test_fixed_order() {
        assert!(BucketScheme::ByState.fixed_order().is_none());

        let scheme = BucketScheme::default_age_ranges().unwrap();
        let order = scheme.fixed_order().unwrap();
        assert_eq!(order.first().map(String::as_str), Some("Below 26"));
        assert_eq!(order.last().map(String::as_str), Some("40+"));
    }
}
