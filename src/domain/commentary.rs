//! Ball-by-ball commentary
//!
//! The log is append-only; readers display it newest first.

use serde::{Deserialize, Serialize};

use super::command::{ExtraKind, WicketKind};
use super::over::BallPosition;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentaryEntry {
    pub over: u32,
    /// Ball within the over, 1-based for deliveries
    pub ball: u8,
    pub text: String,
    pub is_ball_event: bool,
}

impl CommentaryEntry {
    /// A delivery, labelled with the ball it was bowled as
    pub fn delivery(at: BallPosition, counted: bool, text: String) -> Self {
        let ball = if counted { at.ball + 1 } else { at.ball };
        Self {
            over: at.over,
            ball,
            text,
            is_ball_event: true,
        }
    }

    /// An off-field note (bowler change, new batter, innings break)
    pub fn note(at: BallPosition, text: String) -> Self {
        Self {
            over: at.over,
            ball: at.ball,
            text,
            is_ball_event: false,
        }
    }

    pub fn label(&self) -> String {
        format!("{}.{}", self.over, self.ball)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Commentary(Vec<CommentaryEntry>);

impl Commentary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: CommentaryEntry) {
        self.0.push(entry);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries in arrival order
    pub fn iter(&self) -> impl Iterator<Item = &CommentaryEntry> {
        self.0.iter()
    }

    /// Newest first, at most `limit` entries
    pub fn recent(&self, limit: usize) -> impl Iterator<Item = &CommentaryEntry> {
        self.0.iter().rev().take(limit)
    }

    /// Entries appended after the first `since`
    pub fn since(&self, since: usize) -> &[CommentaryEntry] {
        self.0.get(since..).unwrap_or(&[])
    }
}

pub(crate) fn runs_text(bowler: &str, striker: &str, runs: u8, free_hit: bool) -> String {
    let call = match runs {
        0 => "no run".to_string(),
        1 => "1 run".to_string(),
        4 => "FOUR".to_string(),
        6 => "SIX".to_string(),
        n => format!("{} runs", n),
    };
    if free_hit {
        format!("{} to {}, {} (free hit)", bowler, striker, call)
    } else {
        format!("{} to {}, {}", bowler, striker, call)
    }
}

pub(crate) fn extra_text(bowler: &str, striker: &str, kind: ExtraKind, runs: u8) -> String {
    let label = kind.label();
    let call = if runs == 1 {
        label.to_string()
    } else {
        format!("{} {}s", runs, label)
    };
    match kind {
        ExtraKind::NoBall => format!("{} to {}, {}, free hit next", bowler, striker, call),
        _ => format!("{} to {}, {}", bowler, striker, call),
    }
}

pub(crate) fn wicket_text(
    bowler: &str,
    batter: &str,
    kind: WicketKind,
    fielders: &[String],
    score: (u32, u32),
) -> String {
    let how = match (kind, fielders.first()) {
        (WicketKind::Caught, Some(f)) => format!("caught by {}", f),
        (WicketKind::Stumped, Some(f)) => format!("stumped by {}", f),
        (WicketKind::RunOut, Some(_)) => format!("run out ({})", fielders.join("/")),
        (kind, _) => kind.label().to_string(),
    };
    format!(
        "{} to {}, OUT! {}. {}/{}",
        bowler, batter, how, score.0, score.1
    )
}
