//! CSV roster loader.
//!
//! # CSV format
//!
//! One row per person.  `location` is the name of the location the person
//! starts at; rows for the same location keep their file order.
//!
//! ```csv
//! location,pid,susceptibility,vaccinated,infection_state
//! L0,1,0.8,0,0
//! L0,2,0.5,1,uninfected
//! L1,3,0.9,0,infectious
//! ```
//!
//! **`vaccinated`**: `0`/`1` or `false`/`true`.
//!
//! **`infection_state`**: numeric code `0..=5` or the state name
//! (see [`InfectionState`]).
//!
//! Both timestamps of a loaded person start at tick 0.

use std::io::Read;
use std::path::Path;

use log::debug;
use serde::Deserialize;

use epi_core::{EpiError, EpiResult, PersonId};

use crate::{InfectionState, Person};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct RosterRecord {
    location:        String,
    pid:             u64,
    susceptibility:  f64,
    vaccinated:      String,
    infection_state: String,
}

/// One roster row: a person and the name of its starting location.
#[derive(Clone, Debug, PartialEq)]
pub struct RosterEntry {
    pub location: String,
    pub person:   Person,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load roster entries from a CSV file.
pub fn load_roster_csv(path: &Path) -> EpiResult<Vec<RosterEntry>> {
    let file = std::fs::File::open(path)?;
    load_roster_reader(file)
}

/// Like [`load_roster_csv`] but accepts any `Read` source.
pub fn load_roster_reader<R: Read>(reader: R) -> EpiResult<Vec<RosterEntry>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut entries = Vec::new();

    for (line, result) in csv_reader.deserialize::<RosterRecord>().enumerate() {
        let row = result.map_err(|e| EpiError::Parse(e.to_string()))?;
        let vaccinated = parse_flag(&row.vaccinated)
            .map_err(|msg| EpiError::Parse(format!("roster row {}: {msg}", line + 1)))?;
        let state = row
            .infection_state
            .parse::<InfectionState>()
            .map_err(|e| EpiError::Parse(format!("roster row {}: {e}", line + 1)))?;

        entries.push(RosterEntry {
            location: row.location.trim().to_string(),
            person:   Person::new(PersonId(row.pid), row.susceptibility, vaccinated, state),
        });
    }

    debug!("loaded {} roster entries", entries.len());
    Ok(entries)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn parse_flag(s: &str) -> Result<bool, String> {
    match s.trim() {
        "1" | "true" | "TRUE" | "True" => Ok(true),
        "0" | "false" | "FALSE" | "False" => Ok(false),
        other => Err(format!("invalid vaccination flag {other:?}: expected 0/1 or true/false")),
    }
}
