//! Engine error taxonomy

use thiserror::Error;

use super::command::WicketKind;
use super::id::PlayerId;

/// Why a scoring command was rejected
///
/// A rejected command never changes the state it was applied to.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoringError {
    #[error("'{command}' is not allowed: {reason}")]
    InvalidCommandForState {
        command: &'static str,
        reason: String,
    },

    #[error("Duplicate player selection: {0}")]
    DuplicatePlayerSelection(String),

    #[error("No eligible batter left in {team}")]
    RosterExhausted { team: String },

    #[error("Invalid runs for {context}: {runs} (allowed {min}..={max})")]
    InvalidRuns {
        context: &'static str,
        runs: u8,
        min: u8,
        max: u8,
    },

    #[error("Player {player} is not in the {team} squad")]
    UnknownPlayer { player: PlayerId, team: String },

    #[error("{0} bowled the previous over and cannot bowl the next one")]
    ConsecutiveOvers(PlayerId),

    #[error("'{0}' cannot dismiss a batter on a free hit")]
    DismissalNotAllowedOnFreeHit(WicketKind),

    #[error("Invalid match format: {0}")]
    InvalidFormat(String),
}

impl ScoringError {
    pub(crate) fn invalid(command: &'static str, reason: impl Into<String>) -> Self {
        ScoringError::InvalidCommandForState {
            command,
            reason: reason.into(),
        }
    }
}
