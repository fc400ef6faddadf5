// Census API client - median household income by state
//
// Talks to the ACS 5-year estimates endpoint. The payload is a JSON array
// of arrays whose first row is the header row; every value arrives as a
// string (or null).

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// ACS variable for median household income in the past 12 months.
const ACS5_INCOME_VARIABLE: &str = "B19013_001E";

/// Latest ACS 5-year release this tool was written against.
pub const DEFAULT_ACS_YEAR: u16 = 2022;

const CENSUS_BASE_URL: &str = "https://api.census.gov/data";

/// Median household income for one state. Immutable for the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateIncomeRecord {
    pub state: String,
    pub median_household_income: f64,
}

/// The full per-state income table plus fetch provenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeSnapshot {
    pub records: Vec<StateIncomeRecord>,
    pub acs_year: u16,
    pub fetched_at: DateTime<Utc>,
}

pub struct CensusClient {
    client: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
}

impl CensusClient {
    pub fn new(api_key: &str) -> Self {
        Self::with_base_url(api_key, CENSUS_BASE_URL)
    }

    /// Point the client at a different endpoint (tests, mirrors).
    pub fn with_base_url(api_key: &str, base_url: &str) -> Self {
        CensusClient {
            client: reqwest::blocking::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Fetch median household income for every state from the given ACS
    /// 5-year release. One request per run; no retries.
    pub fn fetch_state_incomes(&self, year: u16) -> Result<IncomeSnapshot> {
        let url = format!("{}/{}/acs/acs5", self.base_url, year);
        debug!("GET {} for=state:* get=NAME,{}", url, ACS5_INCOME_VARIABLE);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("get", format!("NAME,{}", ACS5_INCOME_VARIABLE)),
                ("for", "state:*".to_string()),
                ("key", self.api_key.clone()),
            ])
            .send()
            .context("Census API request failed")?;

        if !response.status().is_success() {
            bail!("Census API returned HTTP {}", response.status());
        }

        let rows: Vec<Vec<Value>> = response
            .json()
            .context("Failed to parse Census API response")?;

        let records = parse_income_rows(&rows);
        if records.is_empty() {
            bail!("Census API response contained no usable income rows");
        }

        Ok(IncomeSnapshot {
            records,
            acs_year: year,
            fetched_at: Utc::now(),
        })
    }
}

/// Parse the array-of-arrays payload into income records.
///
/// Skips the header row, rows that are too short or null, and the Census
/// negative sentinel values (e.g. -666666666 for "not available").
pub fn parse_income_rows(rows: &[Vec<Value>]) -> Vec<StateIncomeRecord> {
    let mut records = Vec::new();

    for row in rows.iter().skip(1) {
        let (name, income) = match (row.first(), row.get(1)) {
            (Some(Value::String(name)), Some(income)) => (name, income),
            _ => continue,
        };

        let income = match income {
            Value::String(s) => s.parse::<f64>().ok(),
            Value::Number(n) => n.as_f64(),
            _ => None,
        };

        match income {
            Some(value) if value >= 0.0 => records.push(StateIncomeRecord {
                state: name.clone(),
                median_household_income: value,
            }),
            Some(sentinel) => {
                warn!("Skipping {}: sentinel income value {}", name, sentinel);
            }
            None => {
                warn!("Skipping {}: unparseable income value", name);
            }
        }
    }

    records
}

// ============================================================================
// TESTS
// ============================================================================
