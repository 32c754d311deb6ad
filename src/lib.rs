//! scorebook - ball-by-ball cricket scoring
//!
//! The [`domain`] module is a pure scoring engine: a match state plus a
//! scoring command gives a new match state. [`storage`] keeps versioned
//! match records on disk and [`cli`] drives both from the terminal.

pub mod cli;
pub mod domain;
pub mod storage;

pub use domain::{apply, create_match, start_match, MatchId, MatchState, PlayerId, ScoringCommand, ScoringError};
