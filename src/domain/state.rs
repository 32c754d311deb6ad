//! Match state aggregate
//!
//! [`MatchState`] is a plain value. The engine never mutates a state it was
//! handed; `apply` works on a copy and returns it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::commentary::Commentary;
use super::id::PlayerId;
use super::over::{BallPosition, BALLS_PER_OVER};
use super::roster::{MatchFormat, Player, Team, TeamSide, Toss};
use super::stats::StatLedger;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    NotStarted,
    Live,
    InningsBreak,
    Completed,
}

impl MatchStatus {
    pub fn label(&self) -> &'static str {
        match self {
            MatchStatus::NotStarted => "not started",
            MatchStatus::Live => "live",
            MatchStatus::InningsBreak => "innings break",
            MatchStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Extras conceded in an innings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extras {
    pub wides: u32,
    pub no_balls: u32,
    pub byes: u32,
    pub leg_byes: u32,
}

impl Extras {
    pub fn total(&self) -> u32 {
        self.wides + self.no_balls + self.byes + self.leg_byes
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallOfWicket {
    pub wicket: u32,
    pub runs: u32,
    pub batter: PlayerId,
    pub at: BallPosition,
}

/// Score for one innings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InningsScore {
    pub batting_team: TeamSide,
    pub runs: u32,
    pub wickets: u32,
    pub overs: u32,
    pub balls: u8,
    #[serde(default)]
    pub extras: Extras,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fall_of_wickets: Vec<FallOfWicket>,
}

impl InningsScore {
    pub fn new(batting_team: TeamSide) -> Self {
        Self {
            batting_team,
            runs: 0,
            wickets: 0,
            overs: 0,
            balls: 0,
            extras: Extras::default(),
            fall_of_wickets: Vec::new(),
        }
    }

    pub fn position(&self) -> BallPosition {
        BallPosition {
            over: self.overs,
            ball: self.balls,
        }
    }

    pub fn set_position(&mut self, position: BallPosition) {
        self.overs = position.over;
        self.balls = position.ball;
    }

    pub fn legal_balls(&self) -> u32 {
        self.position().legal_balls()
    }

    /// Runs per six legal balls, 0 before the first legal ball
    pub fn run_rate(&self) -> f64 {
        let legal = self.legal_balls();
        if legal == 0 {
            return 0.0;
        }
        f64::from(self.runs) / f64::from(legal) * 6.0
    }

    /// e.g. `19/1 (2.0)`
    pub fn summary(&self) -> String {
        format!("{}/{} ({})", self.runs, self.wickets, self.position())
    }
}

/// How a result was won
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "by", content = "value", rename_all = "snake_case")]
pub enum Margin {
    Runs(u32),
    Wickets(u32),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MatchResult {
    Won {
        winner: TeamSide,
        team: String,
        margin: Margin,
    },
    Tie,
    NoResult,
}

impl MatchResult {
    pub fn describe(&self) -> String {
        match self {
            MatchResult::Won { team, margin, .. } => {
                let (n, unit) = match margin {
                    Margin::Runs(n) => (*n, "run"),
                    Margin::Wickets(n) => (*n, "wicket"),
                };
                let plural = if n == 1 { "" } else { "s" };
                format!("{} won by {} {}{}", team, n, unit, plural)
            }
            MatchResult::Tie => "Match tied".to_string(),
            MatchResult::NoResult => "No result".to_string(),
        }
    }
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// Root aggregate of a match in progress
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchState {
    pub status: MatchStatus,
    pub innings: u8,
    pub format: MatchFormat,
    pub toss: Toss,
    pub per_innings: [InningsScore; 2],
    pub striker: Option<PlayerId>,
    pub non_striker: Option<PlayerId>,
    pub bowler: Option<PlayerId>,
    /// Bowler of the last completed over
    pub previous_bowler: Option<PlayerId>,
    pub is_free_hit: bool,
    pub target: Option<u32>,
    pub dismissed_batters: BTreeSet<PlayerId>,
    pub awaiting_bowler_change: bool,
    pub awaiting_new_batter: bool,
    pub ledger: StatLedger,
    pub commentary: Commentary,
    pub result: Option<MatchResult>,
}

impl MatchState {
    pub(crate) fn new(format: MatchFormat, toss: Toss) -> Self {
        Self {
            status: MatchStatus::NotStarted,
            innings: 1,
            per_innings: [
                InningsScore::new(toss.batting_first),
                InningsScore::new(toss.fielding_first),
            ],
            format,
            toss,
            striker: None,
            non_striker: None,
            bowler: None,
            previous_bowler: None,
            is_free_hit: false,
            target: None,
            dismissed_batters: BTreeSet::new(),
            awaiting_bowler_change: false,
            awaiting_new_batter: false,
            ledger: StatLedger::new(),
            commentary: Commentary::new(),
            result: None,
        }
    }

    /// The innings being scored into
    pub fn current(&self) -> &InningsScore {
        &self.per_innings[self.innings_index()]
    }

    pub(crate) fn current_mut(&mut self) -> &mut InningsScore {
        let idx = self.innings_index();
        &mut self.per_innings[idx]
    }

    fn innings_index(&self) -> usize {
        usize::from(self.innings.clamp(1, 2) - 1)
    }

    pub fn batting_side(&self) -> TeamSide {
        self.current().batting_team
    }

    pub fn bowling_side(&self) -> TeamSide {
        self.batting_side().other()
    }

    pub fn batting_team(&self) -> &Team {
        self.format.team(self.batting_side())
    }

    pub fn bowling_team(&self) -> &Team {
        self.format.team(self.bowling_side())
    }

    pub fn over(&self) -> u32 {
        self.current().overs
    }

    pub fn ball(&self) -> u8 {
        self.current().balls
    }

    pub fn position(&self) -> BallPosition {
        self.current().position()
    }

    pub fn current_run_rate(&self) -> f64 {
        self.current().run_rate()
    }

    pub fn remaining_balls(&self) -> u32 {
        self.format
            .total_balls()
            .saturating_sub(self.current().legal_balls())
    }

    /// Runs still needed in the chase
    pub fn runs_needed(&self) -> Option<u32> {
        if self.innings != 2 {
            return None;
        }
        self.target
            .map(|target| target.saturating_sub(self.current().runs))
    }

    /// Runs needed per over from here, second innings only
    ///
    /// Zero once nothing is needed or no balls remain.
    pub fn required_run_rate(&self) -> Option<f64> {
        let needed = self.runs_needed()?;
        let remaining = self.remaining_balls();
        if needed == 0 || remaining == 0 {
            return Some(0.0);
        }
        Some(f64::from(needed) / f64::from(remaining) * f64::from(BALLS_PER_OVER))
    }

    pub fn is_at_crease(&self, id: &PlayerId) -> bool {
        self.striker.as_ref() == Some(id) || self.non_striker.as_ref() == Some(id)
    }

    /// Batting-side players who may still walk in
    pub fn eligible_batters(&self) -> Vec<&Player> {
        self.batting_team()
            .roster
            .iter()
            .filter(|p| !self.dismissed_batters.contains(&p.id) && !self.is_at_crease(&p.id))
            .collect()
    }

    pub fn is_all_out(&self) -> bool {
        self.current().wickets >= self.batting_team().all_out_at()
    }

    pub fn is_completed(&self) -> bool {
        self.status == MatchStatus::Completed
    }

    /// Checks the structural invariants every reachable state satisfies
    pub fn check_invariants(&self) -> Result<(), String> {
        if !(1..=2).contains(&self.innings) {
            return Err(format!("innings must be 1 or 2, got {}", self.innings));
        }
        for (n, score) in self.per_innings.iter().enumerate() {
            if score.balls >= BALLS_PER_OVER {
                return Err(format!("innings {} ball pointer {} out of range", n + 1, score.balls));
            }
            let all_out = self.format.team(score.batting_team).all_out_at();
            if score.wickets > all_out {
                return Err(format!(
                    "innings {} has {} wickets, more than {}",
                    n + 1,
                    score.wickets,
                    all_out
                ));
            }
        }
        if self.per_innings[0].batting_team == self.per_innings[1].batting_team {
            return Err("both innings have the same batting side".to_string());
        }
        if let (Some(s), Some(n)) = (&self.striker, &self.non_striker) {
            if s == n {
                return Err(format!("{} is both striker and non-striker", s));
            }
        }
        for id in [&self.striker, &self.non_striker].into_iter().flatten() {
            if self.dismissed_batters.contains(id) {
                return Err(format!("dismissed batter {} is at the crease", id));
            }
        }
        if self.target.is_some() != (self.innings == 2) {
            return Err("target must be set exactly when the second innings is on".to_string());
        }
        if self.status == MatchStatus::NotStarted && self.innings != 1 {
            return Err("a match that has not started is in its first innings".to_string());
        }
        if self.result.is_some() != (self.status == MatchStatus::Completed) {
            return Err("a result is recorded exactly when the match is completed".to_string());
        }
        Ok(())
    }
}
