//! Scoring CLI commands
//!
//! Every invocation loads the latest version, applies exactly one command
//! and saves the result against the version it loaded.

use anyhow::Result;
use clap::{Args, Subcommand};

use super::match_cmd::parse_match_id;
use super::output::Output;
use super::render;
use crate::domain::{apply, BowlingHand, ExtraKind, PlayerId, ScoringCommand, Scoreboard, WicketKind};
use crate::storage::{Project, SaveMeta};

#[derive(Args)]
pub struct ScoreArgs {
    /// Match ID
    pub id: String,

    /// Refuse to save unless the match is still at this version
    #[arg(long)]
    pub expect_version: Option<u64>,

    #[command(subcommand)]
    pub action: ScoreAction,
}

#[derive(Subcommand)]
pub enum ScoreAction {
    /// Runs off the bat (0 for a dot ball)
    Runs {
        runs: u8,
    },

    /// A dismissal
    ///
    /// Examples:
    ///   scorebook score m-1a2b3c4 wicket bowled
    ///   scorebook score m-1a2b3c4 wicket caught --fielder her-4
    ///   scorebook score m-1a2b3c4 wicket run-out --fielder her-2 --batter fal-2
    Wicket {
        /// bowled, caught, lbw, run-out, stumped, hit-wicket
        kind: WicketKind,

        /// Fielder involved (repeat for relay run outs)
        #[arg(long = "fielder")]
        fielders: Vec<PlayerId>,

        /// Batter dismissed, if not the striker (run outs only)
        #[arg(long)]
        batter: Option<PlayerId>,
    },

    /// Wide; runs include the one-run penalty
    Wide {
        #[arg(default_value = "1")]
        runs: u8,
    },

    /// No-ball; runs include the one-run penalty
    NoBall {
        #[arg(default_value = "1")]
        runs: u8,
    },

    /// Byes
    Bye {
        runs: u8,
    },

    /// Leg byes
    LegBye {
        runs: u8,
    },

    /// Bring on a bowler
    Bowler {
        player: PlayerId,

        /// left or right
        #[arg(long)]
        hand: Option<BowlingHand>,

        /// Free-form style, e.g. "off-spin"
        #[arg(long)]
        style: Option<String>,
    },

    /// Send in the next batter
    Batter {
        player: PlayerId,
    },

    /// Swap striker and non-striker
    Swap,

    /// Close the current innings
    EndInnings,

    /// Close the match
    EndMatch,
}

impl ScoreAction {
    fn into_command(self) -> ScoringCommand {
        match self {
            ScoreAction::Runs { runs } => ScoringCommand::runs(runs),
            ScoreAction::Wicket {
                kind,
                fielders,
                batter,
            } => ScoringCommand::Wicket {
                kind,
                fielders,
                dismissed: batter,
            },
            ScoreAction::Wide { runs } => ScoringCommand::extra(ExtraKind::Wide, runs),
            ScoreAction::NoBall { runs } => ScoringCommand::extra(ExtraKind::NoBall, runs),
            ScoreAction::Bye { runs } => ScoringCommand::extra(ExtraKind::Bye, runs),
            ScoreAction::LegBye { runs } => ScoringCommand::extra(ExtraKind::LegBye, runs),
            ScoreAction::Bowler {
                player,
                hand,
                style,
            } => ScoringCommand::ChangeBowler {
                player,
                hand,
                style,
            },
            ScoreAction::Batter { player } => ScoringCommand::change_batter(player),
            ScoreAction::Swap => ScoringCommand::SwapBatters,
            ScoreAction::EndInnings => ScoringCommand::EndInnings,
            ScoreAction::EndMatch => ScoringCommand::EndMatch,
        }
    }
}

pub fn run(args: ScoreArgs, output: &Output) -> Result<()> {
    let id = parse_match_id(&args.id)?;
    let project = Project::open_current()?;
    let store = project.match_store();

    let latest = store.load_latest(&id)?;
    let expected = args.expect_version.unwrap_or(latest.version);
    let state = latest.state()?;

    let command = args.action.into_command();
    output.verbose_ctx(
        "score",
        &format!("Applying {} to {} version {}", command.name(), id, latest.version),
    );
    let applied = apply(&state, &command)?;

    let scorer = project.scorer();
    let record = store.save(
        &id,
        expected,
        &applied.state,
        SaveMeta {
            saved_by: &scorer,
            command: Some(&command),
            note: None,
        },
    )?;

    let board = Scoreboard::from_state(&applied.state);
    if output.is_json() {
        output.data(&serde_json::json!({
            "id": id.to_string(),
            "version": record.version,
            "commentary": applied.commentary,
            "deltas": applied.deltas,
            "scoreboard": board,
        }));
    } else {
        render::commentary(&applied.commentary);
        render::scoreboard(&board);
    }

    Ok(())
}
