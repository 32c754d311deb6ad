//! Match lifecycle and the top-level reducer
//!
//! ```text
//! NotStarted --start_match--> Live --innings closes--> InningsBreak
//!     InningsBreak --openers + bowler--> Live --match ends--> Completed
//! ```
//!
//! `Completed` is terminal. Every transition goes through [`apply`], which
//! takes the state by reference and returns a new one.

use serde::Serialize;

use super::ball::BallProcessor;
use super::command::ScoringCommand;
use super::commentary::CommentaryEntry;
use super::error::ScoringError;
use super::id::PlayerId;
use super::roster::{MatchFormat, Toss};
use super::state::{MatchState, MatchStatus};
use super::stats::StatDelta;

/// Outcome of a successfully applied command
#[derive(Debug, Clone, Serialize)]
pub struct Applied {
    pub state: MatchState,
    pub deltas: Vec<StatDelta>,
    /// Entries this command appended, oldest first
    pub commentary: Vec<CommentaryEntry>,
}

/// The opening pair, striker first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Openers {
    pub striker: PlayerId,
    pub non_striker: PlayerId,
}

impl Openers {
    pub fn new(striker: PlayerId, non_striker: PlayerId) -> Self {
        Self {
            striker,
            non_striker,
        }
    }
}

/// Schedules a match; nothing can be scored until [`start_match`]
pub fn create_match(format: MatchFormat, toss: Toss) -> Result<MatchState, ScoringError> {
    format.validate()?;
    Ok(MatchState::new(format, toss))
}

/// Puts the openers in and the opening bowler on
pub fn start_match(
    state: &MatchState,
    openers: Openers,
    bowler: PlayerId,
) -> Result<MatchState, ScoringError> {
    if state.status != MatchStatus::NotStarted {
        return Err(ScoringError::invalid(
            "start",
            format!("match is already {}", state.status),
        ));
    }

    let batting = state.batting_team();
    if batting.roster.len() < 2 {
        return Err(ScoringError::RosterExhausted {
            team: batting.name.clone(),
        });
    }
    if openers.striker == openers.non_striker {
        return Err(ScoringError::DuplicatePlayerSelection(format!(
            "{} cannot open at both ends",
            state.format.name_of(&openers.striker)
        )));
    }
    for id in [&openers.striker, &openers.non_striker] {
        if !batting.contains(id) {
            return Err(ScoringError::UnknownPlayer {
                player: id.clone(),
                team: batting.name.clone(),
            });
        }
    }
    let fielding = state.bowling_team();
    if !fielding.contains(&bowler) {
        return Err(ScoringError::UnknownPlayer {
            player: bowler,
            team: fielding.name.clone(),
        });
    }

    let mut next = state.clone();
    next.status = MatchStatus::Live;
    next.ledger.register_batter(&openers.striker);
    next.ledger.register_batter(&openers.non_striker);
    next.ledger.register_bowler(&bowler);

    let text = format!(
        "{} won the toss and chose to {}. {} and {} open for {}, {} to bowl",
        next.format.team(next.toss.winner).name,
        next.toss.decision,
        next.format.name_of(&openers.striker),
        next.format.name_of(&openers.non_striker),
        next.batting_team().name,
        next.format.name_of(&bowler),
    );
    let at = next.position();
    next.commentary.push(CommentaryEntry::note(at, text));

    next.striker = Some(openers.striker);
    next.non_striker = Some(openers.non_striker);
    next.bowler = Some(bowler);

    tracing::debug!(batting = %next.batting_team().name, "match started");
    Ok(next)
}

/// Applies one scoring command
///
/// Either the whole command takes effect in the returned state or an error
/// comes back and `state` is untouched.
pub fn apply(state: &MatchState, command: &ScoringCommand) -> Result<Applied, ScoringError> {
    command.validate_runs()?;
    MatchStateMachine::permits(state.status, command)?;

    let mut next = state.clone();
    let mut deltas = Vec::new();
    let logged = next.commentary.len();

    {
        let mut processor = BallProcessor::new(&mut next, &mut deltas);
        match command {
            ScoringCommand::Runs { runs } => processor.runs(*runs)?,
            ScoringCommand::Wicket {
                kind,
                fielders,
                dismissed,
            } => processor.wicket(*kind, fielders, dismissed.as_ref())?,
            ScoringCommand::Extra { kind, runs } => processor.extra(*kind, *runs)?,
            ScoringCommand::ChangeBowler {
                player,
                hand,
                style,
            } => processor.change_bowler(player, *hand, style.as_deref())?,
            ScoringCommand::ChangeBatter { player } => processor.change_batter(player)?,
            ScoringCommand::SwapBatters => processor.swap_batters()?,
            ScoringCommand::EndInnings => processor.end_innings(),
            ScoringCommand::EndMatch => processor.end_match(),
        }
    }

    debug_assert_eq!(next.check_invariants(), Ok(()));
    tracing::trace!(
        command = command.name(),
        score = %next.current().summary(),
        status = %next.status,
        "command applied"
    );

    let commentary = next.commentary.since(logged).to_vec();
    Ok(Applied {
        state: next,
        deltas,
        commentary,
    })
}

/// Which commands each status accepts
pub struct MatchStateMachine;

impl MatchStateMachine {
    pub fn permits(status: MatchStatus, command: &ScoringCommand) -> Result<(), ScoringError> {
        let allowed = match status {
            MatchStatus::NotStarted => false,
            MatchStatus::Live => true,
            MatchStatus::InningsBreak => matches!(
                command,
                ScoringCommand::ChangeBatter { .. }
                    | ScoringCommand::ChangeBowler { .. }
                    | ScoringCommand::EndMatch
            ),
            MatchStatus::Completed => false,
        };

        if allowed {
            Ok(())
        } else {
            Err(ScoringError::invalid(
                command.name(),
                format!("match is {}", status),
            ))
        }
    }
}
