//! Scoring commands
//!
//! One command describes one thing that happened on the field. Commands are
//! plain data; [`crate::domain::apply`] decides whether they are legal.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::ScoringError;
use super::id::PlayerId;

/// Most runs a single scoring shot can add
pub const MAX_RUNS: u8 = 6;

/// Most runs a wide or no-ball can add, penalty included
pub const MAX_PENALTY_EXTRA_RUNS: u8 = 7;

/// How a batter got out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WicketKind {
    Bowled,
    Caught,
    Lbw,
    RunOut,
    Stumped,
    HitWicket,
}

impl WicketKind {
    /// Whether the bowler is credited with the wicket
    pub fn credits_bowler(&self) -> bool {
        !matches!(self, WicketKind::RunOut)
    }

    /// Whether the dismissal stands on a free hit
    pub fn allowed_on_free_hit(&self) -> bool {
        matches!(self, WicketKind::RunOut)
    }

    pub fn label(&self) -> &'static str {
        match self {
            WicketKind::Bowled => "bowled",
            WicketKind::Caught => "caught",
            WicketKind::Lbw => "lbw",
            WicketKind::RunOut => "run out",
            WicketKind::Stumped => "stumped",
            WicketKind::HitWicket => "hit wicket",
        }
    }
}

impl fmt::Display for WicketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for WicketKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['_', ' '], "-").as_str() {
            "bowled" | "b" => Ok(WicketKind::Bowled),
            "caught" | "c" => Ok(WicketKind::Caught),
            "lbw" => Ok(WicketKind::Lbw),
            "run-out" | "runout" => Ok(WicketKind::RunOut),
            "stumped" | "st" => Ok(WicketKind::Stumped),
            "hit-wicket" | "hw" => Ok(WicketKind::HitWicket),
            other => Err(format!("unknown dismissal '{}'", other)),
        }
    }
}

/// Runs not scored off the bat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtraKind {
    Wide,
    NoBall,
    Bye,
    LegBye,
}

impl ExtraKind {
    /// Legal deliveries count toward the over
    pub fn is_legal_delivery(&self) -> bool {
        matches!(self, ExtraKind::Bye | ExtraKind::LegBye)
    }

    /// Whether the runs go against the bowler's figures
    pub fn charged_to_bowler(&self) -> bool {
        matches!(self, ExtraKind::Wide | ExtraKind::NoBall)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExtraKind::Wide => "wide",
            ExtraKind::NoBall => "no ball",
            ExtraKind::Bye => "bye",
            ExtraKind::LegBye => "leg bye",
        }
    }

    fn run_range(&self) -> (u8, u8) {
        if self.charged_to_bowler() {
            (1, MAX_PENALTY_EXTRA_RUNS)
        } else {
            (1, MAX_RUNS)
        }
    }
}

/// Bowling arm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BowlingHand {
    Left,
    Right,
}

impl FromStr for BowlingHand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" | "l" => Ok(BowlingHand::Left),
            "right" | "r" => Ok(BowlingHand::Right),
            other => Err(format!("expected 'left' or 'right', got '{}'", other)),
        }
    }
}

/// A single scoring event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScoringCommand {
    /// Runs off the bat (0 is a dot ball)
    Runs { runs: u8 },

    /// A dismissal; `dismissed` defaults to the striker
    Wicket {
        kind: WicketKind,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        fielders: Vec<PlayerId>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        dismissed: Option<PlayerId>,
    },

    /// Extras; `runs` includes the one-run penalty for wides and no-balls
    Extra { kind: ExtraKind, runs: u8 },

    ChangeBowler {
        player: PlayerId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        hand: Option<BowlingHand>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        style: Option<String>,
    },

    ChangeBatter { player: PlayerId },

    SwapBatters,

    EndInnings,

    EndMatch,
}

impl ScoringCommand {
    pub fn runs(runs: u8) -> Self {
        ScoringCommand::Runs { runs }
    }

    pub fn extra(kind: ExtraKind, runs: u8) -> Self {
        ScoringCommand::Extra { kind, runs }
    }

    pub fn wicket(kind: WicketKind) -> Self {
        ScoringCommand::Wicket {
            kind,
            fielders: Vec::new(),
            dismissed: None,
        }
    }

    pub fn change_bowler(player: PlayerId) -> Self {
        ScoringCommand::ChangeBowler {
            player,
            hand: None,
            style: None,
        }
    }

    pub fn change_batter(player: PlayerId) -> Self {
        ScoringCommand::ChangeBatter { player }
    }

    /// Short name used in error messages and logs
    pub fn name(&self) -> &'static str {
        match self {
            ScoringCommand::Runs { .. } => "runs",
            ScoringCommand::Wicket { .. } => "wicket",
            ScoringCommand::Extra { .. } => "extra",
            ScoringCommand::ChangeBowler { .. } => "change bowler",
            ScoringCommand::ChangeBatter { .. } => "change batter",
            ScoringCommand::SwapBatters => "swap batters",
            ScoringCommand::EndInnings => "end innings",
            ScoringCommand::EndMatch => "end match",
        }
    }

    /// Rejects run values outside what the command allows
    pub fn validate_runs(&self) -> Result<(), ScoringError> {
        match self {
            ScoringCommand::Runs { runs } if *runs > MAX_RUNS => Err(ScoringError::InvalidRuns {
                context: "runs",
                runs: *runs,
                min: 0,
                max: MAX_RUNS,
            }),
            ScoringCommand::Extra { kind, runs } => {
                let (min, max) = kind.run_range();
                if *runs < min || *runs > max {
                    return Err(ScoringError::InvalidRuns {
                        context: kind.label(),
                        runs: *runs,
                        min,
                        max,
                    });
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seven_runs_rejected() {
        assert!(ScoringCommand::runs(6).validate_runs().is_ok());
        assert_eq!(
            ScoringCommand::runs(7).validate_runs(),
            Err(ScoringError::InvalidRuns {
                context: "runs",
                runs: 7,
                min: 0,
                max: 6
            })
        );
    }

    #[test]
    fn extras_need_at_least_one_run() {
        assert!(ScoringCommand::extra(ExtraKind::Wide, 0).validate_runs().is_err());
        assert!(ScoringCommand::extra(ExtraKind::Bye, 0).validate_runs().is_err());
        assert!(ScoringCommand::extra(ExtraKind::NoBall, 7).validate_runs().is_ok());
        assert!(ScoringCommand::extra(ExtraKind::LegBye, 7).validate_runs().is_err());
    }

    #[test]
    fn run_out_is_the_only_free_hit_dismissal() {
        assert!(WicketKind::RunOut.allowed_on_free_hit());
        assert!(!WicketKind::Bowled.allowed_on_free_hit());
        assert!(!WicketKind::RunOut.credits_bowler());
        assert!(WicketKind::Stumped.credits_bowler());
    }

    #[test]
    fn commands_serialize_tagged() {
        let json = serde_json::to_string(&ScoringCommand::runs(4)).unwrap();
        assert_eq!(json, r#"{"type":"runs","runs":4}"#);

        let parsed: ScoringCommand =
            serde_json::from_str(r#"{"type":"extra","kind":"no_ball","runs":1}"#).unwrap();
        assert_eq!(parsed, ScoringCommand::extra(ExtraKind::NoBall, 1));
    }

    #[test]
    fn fractional_runs_fail_to_parse() {
        let parsed: Result<ScoringCommand, _> = serde_json::from_str(r#"{"type":"runs","runs":1.5}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn wicket_kind_parsing() {
        assert_eq!("run_out".parse::<WicketKind>().unwrap(), WicketKind::RunOut);
        assert_eq!("LBW".parse::<WicketKind>().unwrap(), WicketKind::Lbw);
        assert!("timed-out".parse::<WicketKind>().is_err());
    }
}
