// Contestant records - CSV loading and hometown parsing

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One contestant as exported in the season CSVs.
///
/// Core columns are immutable once loaded. `city` and `state` are derived
/// from the raw `Hometown` column ("City, State") at load time; a hometown
/// without a comma leaves both unset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContestantRecord {
    #[serde(rename = "Name")]
    pub name: String,

    /// Blank in the export for a handful of early seasons.
    #[serde(rename = "Age")]
    pub age: Option<u32>,

    #[serde(rename = "Occupation", default)]
    pub occupation: String,

    /// Raw "City, State" string as exported.
    #[serde(rename = "Hometown")]
    pub hometown: String,

    /// Week the contestant was eliminated. Blank means they were never
    /// eliminated in an observed week (winners, runners-up).
    #[serde(rename = "ElimWeek")]
    pub elim_week: Option<u32>,

    #[serde(rename = "Season")]
    pub season: u32,

    // Derived fields - populated by derive_hometown_fields(), never read
    // from the CSV.
    #[serde(skip_deserializing)]
    pub city: Option<String>,

    #[serde(skip_deserializing)]
    pub state: Option<String>,
}

impl ContestantRecord {
    /// Split `hometown` on the first ", " into city and state.
    pub fn derive_hometown_fields(&mut self) {
        match self.hometown.split_once(", ") {
            Some((city, state)) => {
                self.city = Some(city.to_string());
                self.state = Some(state.to_string());
            }
            None => {
                self.city = None;
                self.state = None;
            }
        }
    }

    pub fn eliminated_week1(&self) -> bool {
        self.elim_week == Some(1)
    }
}

/// Load the contestant CSV and derive the hometown fields for every row.
///
/// Column headers: Name, Age, Occupation, Hometown, ElimWeek, Season.
/// Blank Age/ElimWeek cells deserialize to None.
pub fn load_contestants(csv_path: &Path) -> Result<Vec<ContestantRecord>> {
    let mut rdr = csv::Reader::from_path(csv_path).context("Failed to open contestant CSV")?;

    let mut records = Vec::new();

    for result in rdr.deserialize() {
        let mut record: ContestantRecord =
            result.context("Failed to deserialize contestant row")?;
        record.derive_hometown_fields();
        records.push(record);
    }

    Ok(records)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn record(hometown: &str) -> ContestantRecord {
        ContestantRecord {
            name: "Test".to_string(),
            age: Some(27),
            occupation: "Engineer".to_string(),
            hometown: hometown.to_string(),
            elim_week: None,
            season: 12,
            city: None,
            state: None,
        }
    }

    #[test]
    fn test_hometown_split() {
        let mut r = record("Dallas, Texas");
        r.derive_hometown_fields();
        assert_eq!(r.city.as_deref(), Some("Dallas"));
        assert_eq!(r.state.as_deref(), Some("Texas"));
    }

    #[test]
    fn test_hometown_split_first_comma_only() {
        // Only the first ", " separates city from state.
        let mut r = record("Winston-Salem, North Carolina");
        r.derive_hometown_fields();
        assert_eq!(r.city.as_deref(), Some("Winston-Salem"));
        assert_eq!(r.state.as_deref(), Some("North Carolina"));
    }

    #[test]
    fn test_hometown_without_comma() {
        let mut r = record("Toronto");
        r.derive_hometown_fields();
        assert_eq!(r.city, None);
        assert_eq!(r.state, None);
    }

    #[test]
    fn test_eliminated_week1() {
        let mut r = record("Austin, Texas");
        assert!(!r.eliminated_week1());
        r.elim_week = Some(1);
        assert!(r.eliminated_week1());
        r.elim_week = Some(3);
        assert!(!r.eliminated_week1());
    }

    #[test]
    fn test_load_contestants() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Name,Age,Occupation,Hometown,ElimWeek,Season").unwrap();
        writeln!(file, "Amanda R.,27,Teacher,\"Austin, Texas\",1,12").unwrap();
        writeln!(file, "Jordan R.,27,Former Pro Quarterback,\"Chico, California\",,12").unwrap();
        writeln!(file, "Nick B.,,Software Sales,\"Orlando, Florida\",4,12").unwrap();
        file.flush().unwrap();

        let records = load_contestants(file.path()).unwrap();
        assert_eq!(records.len(), 3);

        assert_eq!(records[0].state.as_deref(), Some("Texas"));
        assert!(records[0].eliminated_week1());

        // Blank ElimWeek: never eliminated in an observed week
        assert_eq!(records[1].elim_week, None);

        // Blank Age
        assert_eq!(records[2].age, None);
        assert_eq!(records[2].city.as_deref(), Some("Orlando"));
    }

    #[test]
    fn test_load_contestants_missing_file() {
        let result = load_contestants(Path::new("no_such_file.csv"));
        assert!(result.is_err());
    }
}
