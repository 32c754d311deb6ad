//! Scoring engine
//!
//! Contains the match rules without any I/O concerns. Everything here is a
//! pure function of its inputs: [`apply`] takes a state and a command and
//! returns a new state.

mod ball;
mod command;
mod commentary;
mod error;
mod id;
mod innings;
mod machine;
mod over;
mod roster;
mod scoreboard;
mod snapshot;
mod state;
mod stats;

pub use command::{BowlingHand, ExtraKind, ScoringCommand, WicketKind, MAX_PENALTY_EXTRA_RUNS, MAX_RUNS};
pub use commentary::{Commentary, CommentaryEntry};
pub use error::ScoringError;
pub use id::{IdError, MatchId, PlayerId};
pub use innings::{InningsController, InningsEnd};
pub use machine::{apply, create_match, start_match, Applied, MatchStateMachine, Openers};
pub use over::{BallPosition, OverStep, OverTracker, BALLS_PER_OVER};
pub use roster::{
    MatchFormat, Player, PlayerRole, Team, TeamSide, Toss, TossDecision, MAX_OVERS_PER_INNINGS,
};
pub use scoreboard::{how_out, BatterLine, BowlerLine, InningsCard, Scoreboard, Scorecard};
pub use snapshot::{restore, snapshot, DerivedView, RestoreError, SerializableMatchState, SNAPSHOT_VERSION};
pub use state::{Extras, FallOfWicket, InningsScore, Margin, MatchResult, MatchState, MatchStatus};
pub use stats::{BattingEvent, BattingStat, BowlingEvent, BowlingStat, Dismissal, StatDelta, StatLedger};
