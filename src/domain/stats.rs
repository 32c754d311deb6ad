//! Per-player batting and bowling figures
//!
//! Rows are keyed by [`PlayerId`] and created lazily on first involvement.
//! Strike rate and economy are derived on read and never stored.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::command::WicketKind;
use super::id::PlayerId;

/// How and to whom a batter was dismissed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dismissal {
    pub kind: WicketKind,
    pub bowler: PlayerId,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fielders: Vec<PlayerId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattingStat {
    pub runs: u32,
    pub balls: u32,
    pub fours: u32,
    pub sixes: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dismissal: Option<Dismissal>,
}

impl BattingStat {
    /// Runs per hundred balls, 0 before the first ball faced
    pub fn strike_rate(&self) -> f64 {
        if self.balls == 0 {
            return 0.0;
        }
        f64::from(self.runs) / f64::from(self.balls) * 100.0
    }

    pub fn is_out(&self) -> bool {
        self.dismissal.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BowlingStat {
    pub balls: u32,
    pub runs_conceded: u32,
    pub wickets: u32,
    #[serde(default)]
    pub wides: u32,
    #[serde(default)]
    pub no_balls: u32,
}

impl BowlingStat {
    /// Runs conceded per six legal balls, 0 before the first legal ball
    pub fn economy(&self) -> f64 {
        if self.balls == 0 {
            return 0.0;
        }
        f64::from(self.runs_conceded) / f64::from(self.balls) * 6.0
    }

    /// Overs bowled in `O.B` notation
    pub fn overs(&self) -> String {
        format!("{}.{}", self.balls / 6, self.balls % 6)
    }
}

/// One delivery's effect on a batter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattingEvent {
    pub runs: u32,
    pub ball_faced: bool,
    pub four: bool,
    pub six: bool,
}

impl BattingEvent {
    /// Runs off the bat, boundaries flagged from the run value
    pub fn off_bat(runs: u8, ball_faced: bool) -> Self {
        Self {
            runs: u32::from(runs),
            ball_faced,
            four: runs == 4,
            six: runs == 6,
        }
    }

    pub fn faced(ball_faced: bool) -> Self {
        Self {
            ball_faced,
            ..Self::default()
        }
    }
}

/// One delivery's effect on a bowler
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BowlingEvent {
    pub runs_conceded: u32,
    pub ball_bowled: bool,
    pub wicket: bool,
    pub wide: bool,
    pub no_ball: bool,
}

/// A change to a ledger row, reported back to the caller of `apply`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StatDelta {
    Batting {
        player: PlayerId,
        #[serde(flatten)]
        event: BattingEvent,
    },
    Bowling {
        player: PlayerId,
        #[serde(flatten)]
        event: BowlingEvent,
    },
    Dismissal {
        player: PlayerId,
        dismissal: Dismissal,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatLedger {
    pub batting: BTreeMap<PlayerId, BattingStat>,
    pub bowling: BTreeMap<PlayerId, BowlingStat>,
}

impl StatLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensures a batting row exists (a batter who faces nothing still bats)
    pub fn register_batter(&mut self, id: &PlayerId) {
        self.batting.entry(id.clone()).or_default();
    }

    pub fn register_bowler(&mut self, id: &PlayerId) {
        self.bowling.entry(id.clone()).or_default();
    }

    pub fn record_batting(&mut self, id: &PlayerId, event: BattingEvent) -> StatDelta {
        let row = self.batting.entry(id.clone()).or_default();
        row.runs += event.runs;
        if event.ball_faced {
            row.balls += 1;
        }
        if event.four {
            row.fours += 1;
        }
        if event.six {
            row.sixes += 1;
        }
        StatDelta::Batting {
            player: id.clone(),
            event,
        }
    }

    pub fn record_bowling(&mut self, id: &PlayerId, event: BowlingEvent) -> StatDelta {
        let row = self.bowling.entry(id.clone()).or_default();
        row.runs_conceded += event.runs_conceded;
        if event.ball_bowled {
            row.balls += 1;
        }
        if event.wicket {
            row.wickets += 1;
        }
        if event.wide {
            row.wides += 1;
        }
        if event.no_ball {
            row.no_balls += 1;
        }
        StatDelta::Bowling {
            player: id.clone(),
            event,
        }
    }

    pub fn record_dismissal(&mut self, id: &PlayerId, dismissal: Dismissal) -> StatDelta {
        let row = self.batting.entry(id.clone()).or_default();
        row.dismissal = Some(dismissal.clone());
        StatDelta::Dismissal {
            player: id.clone(),
            dismissal,
        }
    }

    pub fn is_out(&self, id: &PlayerId) -> bool {
        self.batting.get(id).is_some_and(BattingStat::is_out)
    }

    pub fn batting(&self, id: &PlayerId) -> Option<&BattingStat> {
        self.batting.get(id)
    }

    pub fn bowling(&self, id: &PlayerId) -> Option<&BowlingStat> {
        self.bowling.get(id)
    }
}
