//! Persistence contract
//!
//! [`snapshot`] turns a state into the record the storage layer keeps;
//! [`restore`] turns it back, re-checking everything a hand-edited or
//! truncated record could break.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::state::MatchState;

/// Bumped whenever the record layout changes incompatibly
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Error, PartialEq)]
pub enum RestoreError {
    #[error("Unsupported snapshot version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("Snapshot violates match invariants: {0}")]
    Invalid(String),
}

/// Rates shown to viewers; recomputed from the state, ignored on restore
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DerivedView {
    pub overs: String,
    pub current_run_rate: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_run_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializableMatchState {
    pub schema_version: u32,
    #[serde(flatten)]
    pub state: MatchState,
    #[serde(default)]
    pub derived: DerivedView,
}

pub fn snapshot(state: &MatchState) -> SerializableMatchState {
    SerializableMatchState {
        schema_version: SNAPSHOT_VERSION,
        state: state.clone(),
        derived: DerivedView {
            overs: state.position().to_string(),
            current_run_rate: state.current_run_rate(),
            required_run_rate: state.required_run_rate(),
            result: state.result.as_ref().map(|r| r.describe()),
        },
    }
}

pub fn restore(serialized: SerializableMatchState) -> Result<MatchState, RestoreError> {
    if serialized.schema_version != SNAPSHOT_VERSION {
        return Err(RestoreError::UnsupportedVersion {
            found: serialized.schema_version,
            expected: SNAPSHOT_VERSION,
        });
    }

    let state = serialized.state;
    state
        .format
        .validate()
        .map_err(|e| RestoreError::Invalid(e.to_string()))?;
    state.check_invariants().map_err(RestoreError::Invalid)?;
    Ok(state)
}
