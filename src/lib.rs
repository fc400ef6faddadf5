// Rose Report - Core Library
// Exposes all modules for use in the CLI, the web server, and tests

pub mod buckets;
pub mod census;
pub mod enrich;
pub mod error;
pub mod pipeline;
pub mod records;
pub mod stats;

// Re-export commonly used types
pub use buckets::{BucketScheme, RangeSpec, UNKNOWN_LABEL};
pub use census::{
    parse_income_rows, CensusClient, IncomeSnapshot, StateIncomeRecord, DEFAULT_ACS_YEAR,
};
pub use enrich::{enrich, EnrichedRecord};
pub use error::AnalysisError;
pub use pipeline::{AnalysisReport, Pipeline};
pub use records::{load_contestants, ContestantRecord};
pub use stats::{compute_elimination_stats, BucketStat, ComputeOptions, SortOrder};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
