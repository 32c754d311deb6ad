//! Rosters, match format and toss
//!
//! These are supplied by the fixture organiser before the match and are
//! read-only to the scoring engine.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use super::error::ScoringError;
use super::id::PlayerId;
use super::over::BALLS_PER_OVER;

/// Longest limited-overs innings the engine will host
pub const MAX_OVERS_PER_INNINGS: u32 = 50;

/// Playing role, informational only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PlayerRole {
    #[default]
    Batter,
    Bowler,
    AllRounder,
    Keeper,
}

/// A squad member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    #[serde(default)]
    pub role: PlayerRole,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>, role: PlayerRole) -> Self {
        Self {
            id,
            name: name.into(),
            role,
        }
    }
}

/// Which of the two fixture sides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamSide {
    Team1,
    Team2,
}

impl TeamSide {
    /// Returns the opposing side
    pub fn other(self) -> Self {
        match self {
            TeamSide::Team1 => TeamSide::Team2,
            TeamSide::Team2 => TeamSide::Team1,
        }
    }
}

impl FromStr for TeamSide {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "team1" | "1" => Ok(TeamSide::Team1),
            "team2" | "2" => Ok(TeamSide::Team2),
            other => Err(format!("expected 'team1' or 'team2', got '{}'", other)),
        }
    }
}

/// A named side and its squad
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    pub roster: Vec<Player>,
}

impl Team {
    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.roster.iter().find(|p| &p.id == id)
    }

    pub fn contains(&self, id: &PlayerId) -> bool {
        self.player(id).is_some()
    }

    /// Wickets that end the innings: the last batter cannot bat alone
    pub fn all_out_at(&self) -> u32 {
        self.roster.len().saturating_sub(1) as u32
    }
}

/// Immutable match setup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchFormat {
    pub overs_per_innings: u32,
    pub team1: Team,
    pub team2: Team,
}

impl MatchFormat {
    /// Checks the format can host a match
    pub fn validate(&self) -> Result<(), ScoringError> {
        if self.overs_per_innings == 0 {
            return Err(ScoringError::InvalidFormat(
                "overs per innings must be at least 1".to_string(),
            ));
        }
        if self.overs_per_innings > MAX_OVERS_PER_INNINGS {
            return Err(ScoringError::InvalidFormat(format!(
                "overs per innings must be at most {}, got {}",
                MAX_OVERS_PER_INNINGS, self.overs_per_innings
            )));
        }

        let mut seen = HashSet::new();
        for team in [&self.team1, &self.team2] {
            if team.name.trim().is_empty() {
                return Err(ScoringError::InvalidFormat(
                    "team names must not be empty".to_string(),
                ));
            }
            if team.roster.len() < 2 {
                return Err(ScoringError::InvalidFormat(format!(
                    "{} needs at least 2 players, has {}",
                    team.name,
                    team.roster.len()
                )));
            }
            for player in &team.roster {
                if !seen.insert(player.id.clone()) {
                    return Err(ScoringError::InvalidFormat(format!(
                        "player id {} appears more than once",
                        player.id
                    )));
                }
            }
        }

        if self.team1.name == self.team2.name {
            return Err(ScoringError::InvalidFormat(
                "both sides have the same name".to_string(),
            ));
        }

        Ok(())
    }

    pub fn team(&self, side: TeamSide) -> &Team {
        match side {
            TeamSide::Team1 => &self.team1,
            TeamSide::Team2 => &self.team2,
        }
    }

    /// Looks a player up in either squad
    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.team1.player(id).or_else(|| self.team2.player(id))
    }

    /// Display name for commentary, falling back to the id
    pub fn name_of(&self, id: &PlayerId) -> String {
        self.player(id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    pub fn total_balls(&self) -> u32 {
        self.overs_per_innings.saturating_mul(u32::from(BALLS_PER_OVER))
    }
}

/// What the toss winner chose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TossDecision {
    Bat,
    Bowl,
}

impl FromStr for TossDecision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bat" => Ok(TossDecision::Bat),
            "bowl" | "field" => Ok(TossDecision::Bowl),
            other => Err(format!("expected 'bat' or 'bowl', got '{}'", other)),
        }
    }
}

impl fmt::Display for TossDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TossDecision::Bat => f.write_str("bat"),
            TossDecision::Bowl => f.write_str("bowl"),
        }
    }
}

/// Toss outcome, fixed for the whole match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toss {
    pub winner: TeamSide,
    pub decision: TossDecision,
    pub batting_first: TeamSide,
    pub fielding_first: TeamSide,
}

impl Toss {
    pub fn new(winner: TeamSide, decision: TossDecision) -> Self {
        let batting_first = match decision {
            TossDecision::Bat => winner,
            TossDecision::Bowl => winner.other(),
        };
        Self {
            winner,
            decision,
            batting_first,
            fielding_first: batting_first.other(),
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Builds a squad of `size` players with ids `{prefix}-{n}`
    pub fn team(name: &str, prefix: &str, size: usize) -> Team {
        Team {
            name: name.to_string(),
            roster: (1..=size)
                .map(|n| {
                    Player::new(
                        PlayerId::new(format!("{}-{}", prefix, n)).unwrap(),
                        format!("{} {}", name, n),
                        PlayerRole::AllRounder,
                    )
                })
                .collect(),
        }
    }

    pub fn format(overs: u32, squad: usize) -> MatchFormat {
        MatchFormat {
            overs_per_innings: overs,
            team1: team("Falcons", "fal", squad),
            team2: team("Herons", "her", squad),
        }
    }

    pub fn pid(raw: &str) -> PlayerId {
        PlayerId::new(raw).unwrap()
    }
}
