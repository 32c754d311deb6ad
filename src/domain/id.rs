//! Identifiers for players and matches
//!
//! ID Format:
//! - Player IDs: any non-empty token without whitespace, supplied by the
//!   roster (e.g., `falcons-07`). They are stable across renames.
//! - Match IDs: `m-{7-char-hash}` (e.g., `m-7f2b4c1`)
//!
//! Match hashes are derived from both team names + creation timestamp, so the
//! same fixture scheduled twice gets two different IDs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum IdError {
    #[error("Invalid player ID: expected a non-empty token without whitespace, got '{0}'")]
    InvalidPlayerId(String),

    #[error("Invalid match ID format: expected 'm-{{7-char-hash}}', got '{0}'")]
    InvalidMatchId(String),
}

/// Generates a 7-character hash from the fixture and timestamp
fn generate_hash(team1: &str, team2: &str, timestamp: DateTime<Utc>) -> String {
    let input = format!(
        "{}|{}|{}",
        team1,
        team2,
        timestamp.timestamp_nanos_opt().unwrap_or(0)
    );
    let hash = blake3::hash(input.as_bytes());
    let hex = hash.to_hex();
    hex[..7].to_string()
}

/// Stable player identifier
///
/// Stats and dismissals are keyed by this, never by display name, so two
/// players called "R. Sharma" never share a row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlayerId(String);

impl PlayerId {
    /// Creates a player ID, validating its format
    pub fn new(raw: impl Into<String>) -> Result<Self, IdError> {
        let raw = raw.into();
        if raw.is_empty() || raw.chars().any(char::is_whitespace) {
            return Err(IdError::InvalidPlayerId(raw));
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for PlayerId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.trim())
    }
}

impl TryFrom<String> for PlayerId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PlayerId> for String {
    fn from(id: PlayerId) -> Self {
        id.0
    }
}

/// Match ID in the format `m-{7-char-hash}`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MatchId {
    hash: String,
}

impl MatchId {
    /// Creates a new match ID for a fixture scheduled at `timestamp`
    pub fn new(team1: &str, team2: &str, timestamp: DateTime<Utc>) -> Self {
        Self {
            hash: generate_hash(team1, team2, timestamp),
        }
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m-{}", self.hash)
    }
}

impl FromStr for MatchId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let Some(hash) = s.strip_prefix("m-") else {
            return Err(IdError::InvalidMatchId(s.to_string()));
        };

        if hash.len() != 7 || !hash.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(IdError::InvalidMatchId(s.to_string()));
        }

        Ok(Self {
            hash: hash.to_string(),
        })
    }
}

impl TryFrom<String> for MatchId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MatchId> for String {
    fn from(id: MatchId) -> Self {
        id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_id_format() {
        let id = MatchId::new("Falcons", "Herons", Utc::now());
        let s = id.to_string();

        assert!(s.starts_with("m-"));
        assert_eq!(s.len(), 9);
        assert!(s[2..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn match_id_parse_roundtrip() {
        let id = MatchId::new("Falcons", "Herons", Utc::now());
        let parsed: MatchId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn same_fixture_different_times_differ() {
        let t1 = Utc::now();
        let t2 = t1 + chrono::Duration::milliseconds(1);

        assert_ne!(
            MatchId::new("Falcons", "Herons", t1),
            MatchId::new("Falcons", "Herons", t2)
        );
    }

    #[test]
    fn invalid_match_ids() {
        assert!("m-123".parse::<MatchId>().is_err());
        assert!("x-1234567".parse::<MatchId>().is_err());
        assert!("m-zzzzzzz".parse::<MatchId>().is_err());
        assert!("".parse::<MatchId>().is_err());
    }

    #[test]
    fn player_id_rejects_blank_and_whitespace() {
        assert!(PlayerId::new("").is_err());
        assert!(PlayerId::new("two words").is_err());
        assert_eq!(PlayerId::new("fal-01").unwrap().as_str(), "fal-01");
    }

    #[test]
    fn player_id_serde_validates() {
        let ok: PlayerId = serde_json::from_str("\"her-11\"").unwrap();
        assert_eq!(ok.to_string(), "her-11");

        let bad: Result<PlayerId, _> = serde_json::from_str("\"her 11\"");
        assert!(bad.is_err());
    }
}
