//! Roster files
//!
//! A match is created from a TOML or JSON file naming both squads:
//!
//! ```toml
//! overs_per_innings = 20   # optional, falls back to default_overs
//!
//! [team1]
//! name = "Falcons"
//! roster = [
//!     { id = "fal-1", name = "A. Opener", role = "batter" },
//!     { id = "fal-2", name = "B. Keeper", role = "keeper" },
//! ]
//!
//! [team2]
//! name = "Herons"
//! roster = [ ... ]
//! ```

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::domain::{MatchFormat, Team};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RosterFile {
    overs_per_innings: Option<u32>,
    team1: Team,
    team2: Team,
}

/// Reads a roster file and builds a validated match format
pub fn load_roster(path: &Path, default_overs: u32) -> Result<MatchFormat> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read roster file: {}", path.display()))?;

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    let file: RosterFile = match extension.as_str() {
        "toml" => toml::from_str(&content)
            .with_context(|| format!("Failed to parse roster file: {}", path.display()))?,
        "json" => serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse roster file: {}", path.display()))?,
        other => bail!(
            "Unsupported roster file type '{}': expected .toml or .json",
            other
        ),
    };

    let format = MatchFormat {
        overs_per_innings: file.overs_per_innings.unwrap_or(default_overs),
        team1: file.team1,
        team2: file.team2,
    };
    format.validate()?;
    Ok(format)
}
