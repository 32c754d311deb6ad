//! Match CLI commands

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Subcommand;

use super::output::Output;
use super::render;
use crate::domain::{
    create_match, start_match, MatchId, MatchStatus, Openers, PlayerId, Scoreboard, Scorecard,
    TeamSide, Toss, TossDecision,
};
use crate::storage::{load_roster, Project, SaveMeta};

#[derive(Subcommand)]
pub enum MatchCommands {
    /// Create a match from a roster file
    ///
    /// Examples:
    ///   scorebook match new --roster squads.toml --toss-winner team1 --decision bat
    New {
        /// Roster file (.toml or .json) naming both squads
        #[arg(long)]
        roster: PathBuf,

        /// Side that won the toss (team1 or team2)
        #[arg(long)]
        toss_winner: TeamSide,

        /// What the toss winner chose (bat or bowl)
        #[arg(long)]
        decision: TossDecision,
    },

    /// Send out the openers and the opening bowler
    Start {
        /// Match ID
        id: String,

        #[arg(long)]
        striker: PlayerId,

        #[arg(long)]
        non_striker: PlayerId,

        #[arg(long)]
        bowler: PlayerId,
    },

    /// List matches in this project
    List,

    /// Show the live scoreboard
    Show {
        /// Match ID
        id: String,
    },

    /// Show the full scorecard
    Scorecard {
        /// Match ID
        id: String,
    },

    /// Show ball-by-ball commentary, newest first
    Commentary {
        /// Match ID
        id: String,

        /// Number of entries (defaults to commentary_limit from config)
        #[arg(long)]
        limit: Option<usize>,

        /// Show every entry
        #[arg(long, conflicts_with = "limit")]
        all: bool,
    },

    /// Show saved versions
    History {
        /// Match ID
        id: String,
    },

    /// Revert the latest change
    Undo {
        /// Match ID
        id: String,
    },

    /// Print the latest snapshot as JSON
    Export {
        /// Match ID
        id: String,
    },
}

pub fn run(cmd: MatchCommands, output: &Output) -> Result<()> {
    match cmd {
        MatchCommands::New {
            roster,
            toss_winner,
            decision,
        } => new_match(output, &roster, toss_winner, decision),
        MatchCommands::Start {
            id,
            striker,
            non_striker,
            bowler,
        } => start(output, &id, striker, non_striker, bowler),
        MatchCommands::List => list_matches(output),
        MatchCommands::Show { id } => show_match(output, &id),
        MatchCommands::Scorecard { id } => show_scorecard(output, &id),
        MatchCommands::Commentary { id, limit, all } => show_commentary(output, &id, limit, all),
        MatchCommands::History { id } => show_history(output, &id),
        MatchCommands::Undo { id } => undo(output, &id),
        MatchCommands::Export { id } => export(output, &id),
    }
}

pub(crate) fn parse_match_id(raw: &str) -> Result<MatchId> {
    raw.parse::<MatchId>()
        .with_context(|| format!("Invalid match ID: {}", raw))
}

fn new_match(
    output: &Output,
    roster: &std::path::Path,
    toss_winner: TeamSide,
    decision: TossDecision,
) -> Result<()> {
    let project = Project::open_current()?;
    let store = project.match_store();

    output.verbose_ctx("match", &format!("Loading roster: {}", roster.display()));
    let format = load_roster(roster, project.config().project.default_overs)?;
    let id = MatchId::new(&format.team1.name, &format.team2.name, Utc::now());
    let state = create_match(format, Toss::new(toss_winner, decision))?;

    let scorer = project.scorer();
    let record = store.create(
        &id,
        &state,
        SaveMeta {
            saved_by: &scorer,
            command: None,
            note: Some("created"),
        },
    )?;

    let batting = state.batting_team().name.clone();
    if output.is_json() {
        output.data(&serde_json::json!({
            "id": id.to_string(),
            "version": record.version,
            "team1": state.format.team1.name,
            "team2": state.format.team2.name,
            "overs_per_innings": state.format.overs_per_innings,
            "batting_first": batting,
        }));
    } else {
        output.success(&format!(
            "Created match {}: {} vs {} ({} overs), {} bat first",
            id, state.format.team1.name, state.format.team2.name, state.format.overs_per_innings, batting
        ));
    }

    Ok(())
}

fn start(
    output: &Output,
    id_str: &str,
    striker: PlayerId,
    non_striker: PlayerId,
    bowler: PlayerId,
) -> Result<()> {
    let id = parse_match_id(id_str)?;
    let project = Project::open_current()?;
    let store = project.match_store();

    let latest = store.load_latest(&id)?;
    let state = latest.state()?;
    let next = start_match(&state, Openers::new(striker, non_striker), bowler)?;

    let scorer = project.scorer();
    let record = store.save(
        &id,
        latest.version,
        &next,
        SaveMeta {
            saved_by: &scorer,
            command: None,
            note: Some("started"),
        },
    )?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "id": id.to_string(),
            "version": record.version,
            "scoreboard": Scoreboard::from_state(&next),
        }));
    } else {
        output.success(&format!("Started match {}", id));
        render::scoreboard(&Scoreboard::from_state(&next));
    }

    Ok(())
}

fn list_matches(output: &Output) -> Result<()> {
    let project = Project::open_current()?;
    let store = project.match_store();

    let ids = store.list()?;
    output.verbose_ctx("match", &format!("Found {} match file(s)", ids.len()));

    let mut rows = Vec::with_capacity(ids.len());
    for id in ids {
        let record = store.load_latest(&id)?;
        let state = record.state()?;
        rows.push((id, record.version, state));
    }

    if output.is_json() {
        let items: Vec<_> = rows
            .iter()
            .map(|(id, version, state)| {
                serde_json::json!({
                    "id": id.to_string(),
                    "version": version,
                    "status": state.status,
                    "team1": state.format.team1.name,
                    "team2": state.format.team2.name,
                    "score": state.current().summary(),
                    "result": state.result.as_ref().map(|r| r.describe()),
                })
            })
            .collect();
        output.data(&items);
    } else if rows.is_empty() {
        println!("No matches yet. Create one with 'scorebook match new'.");
    } else {
        output.row(&["ID", "STATUS", "FIXTURE", "SCORE"]);
        for (id, _, state) in &rows {
            let fixture = format!("{} v {}", state.format.team1.name, state.format.team2.name);
            let score = match (&state.result, state.status) {
                (Some(result), _) => result.describe(),
                (None, MatchStatus::NotStarted) => "-".to_string(),
                (None, _) => format!("{} {}", state.batting_team().name, state.current().summary()),
            };
            output.row(&[id.to_string().as_str(), state.status.label(), fixture.as_str(), score.as_str()]);
        }
    }

    Ok(())
}

fn show_match(output: &Output, id_str: &str) -> Result<()> {
    let id = parse_match_id(id_str)?;
    let project = Project::open_current()?;
    let record = project.match_store().load_latest(&id)?;
    let state = record.state()?;
    let limit = project.config().project.commentary_limit;

    let board = Scoreboard::from_state(&state);
    if output.is_json() {
        let recent: Vec<_> = state.commentary.recent(limit).collect();
        output.data(&serde_json::json!({
            "id": id.to_string(),
            "version": record.version,
            "scoreboard": board,
            "commentary": recent,
        }));
    } else {
        println!(
            "{} v {}  ({}, version {})",
            state.format.team1.name, state.format.team2.name, id, record.version
        );
        render::scoreboard(&board);
        if !state.commentary.is_empty() {
            output.blank();
            render::commentary(state.commentary.recent(limit));
        }
    }

    Ok(())
}

fn show_scorecard(output: &Output, id_str: &str) -> Result<()> {
    let id = parse_match_id(id_str)?;
    let project = Project::open_current()?;
    let state = project.match_store().load_latest(&id)?.state()?;

    let card = Scorecard::from_state(&state);
    if output.is_json() {
        output.data(&card);
    } else {
        render::scorecard(&card);
    }

    Ok(())
}

fn show_commentary(output: &Output, id_str: &str, limit: Option<usize>, all: bool) -> Result<()> {
    let id = parse_match_id(id_str)?;
    let project = Project::open_current()?;
    let state = project.match_store().load_latest(&id)?.state()?;

    let limit = if all {
        state.commentary.len()
    } else {
        limit.unwrap_or(project.config().project.commentary_limit)
    };

    if output.is_json() {
        let entries: Vec<_> = state.commentary.recent(limit).collect();
        output.data(&entries);
    } else if state.commentary.is_empty() {
        println!("No commentary yet");
    } else {
        render::commentary(state.commentary.recent(limit));
    }

    Ok(())
}

fn show_history(output: &Output, id_str: &str) -> Result<()> {
    let id = parse_match_id(id_str)?;
    let project = Project::open_current()?;
    let records = project.match_store().history(&id)?;

    if output.is_json() {
        let items: Vec<_> = records
            .iter()
            .map(|r| {
                serde_json::json!({
                    "version": r.version,
                    "parent": r.parent,
                    "saved_at": r.saved_at,
                    "saved_by": r.saved_by,
                    "command": r.command,
                    "note": r.note,
                    "overs": r.snapshot.derived.overs,
                })
            })
            .collect();
        output.data(&items);
    } else {
        output.row(&["VERSION", "SAVED", "BY", "CHANGE", "OVERS"]);
        for r in &records {
            let change = match (&r.command, &r.note) {
                (Some(command), _) => command.name().to_string(),
                (None, Some(note)) => note.clone(),
                (None, None) => "-".to_string(),
            };
            output.row(&[
                r.version.to_string().as_str(),
                r.saved_at.format("%Y-%m-%d %H:%M:%S").to_string().as_str(),
                r.saved_by.as_str(),
                change.as_str(),
                r.snapshot.derived.overs.as_str(),
            ]);
        }
    }

    Ok(())
}

fn undo(output: &Output, id_str: &str) -> Result<()> {
    let id = parse_match_id(id_str)?;
    let project = Project::open_current()?;
    let store = project.match_store();

    let latest = store.load_latest(&id)?;
    let record = store.undo(&id, latest.version, &project.scorer())?;
    let state = record.state()?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "id": id.to_string(),
            "version": record.version,
            "note": record.note,
            "scoreboard": Scoreboard::from_state(&state),
        }));
    } else {
        output.success(&format!(
            "Undid version {} of {} ({})",
            latest.version,
            id,
            record.note.as_deref().unwrap_or("reverted")
        ));
        render::scoreboard(&Scoreboard::from_state(&state));
    }

    Ok(())
}

fn export(output: &Output, id_str: &str) -> Result<()> {
    let id = parse_match_id(id_str)?;
    let project = Project::open_current()?;
    let record = project.match_store().load_latest(&id)?;

    output.data(&record.snapshot);
    Ok(())
}
