//! Read-only views derived from a match state

use serde::Serialize;

use super::command::WicketKind;
use super::id::PlayerId;
use super::roster::MatchFormat;
use super::state::{InningsScore, MatchState, MatchStatus};
use super::stats::{BattingStat, BowlingStat, Dismissal};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatterLine {
    pub id: PlayerId,
    pub name: String,
    pub runs: u32,
    pub balls: u32,
    pub fours: u32,
    pub sixes: u32,
    pub strike_rate: f64,
    pub how_out: String,
}

impl BatterLine {
    fn new(format: &MatchFormat, id: &PlayerId, stat: &BattingStat) -> Self {
        Self {
            id: id.clone(),
            name: format.name_of(id),
            runs: stat.runs,
            balls: stat.balls,
            fours: stat.fours,
            sixes: stat.sixes,
            strike_rate: stat.strike_rate(),
            how_out: stat
                .dismissal
                .as_ref()
                .map(|d| how_out(format, d))
                .unwrap_or_else(|| "not out".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BowlerLine {
    pub id: PlayerId,
    pub name: String,
    pub overs: String,
    pub runs: u32,
    pub wickets: u32,
    pub wides: u32,
    pub no_balls: u32,
    pub economy: f64,
}

impl BowlerLine {
    fn new(format: &MatchFormat, id: &PlayerId, stat: &BowlingStat) -> Self {
        Self {
            id: id.clone(),
            name: format.name_of(id),
            overs: stat.overs(),
            runs: stat.runs_conceded,
            wickets: stat.wickets,
            wides: stat.wides,
            no_balls: stat.no_balls,
            economy: stat.economy(),
        }
    }
}

/// Scorecard notation for a dismissal, e.g. `c Smith b Jones`
pub fn how_out(format: &MatchFormat, dismissal: &Dismissal) -> String {
    let bowler = format.name_of(&dismissal.bowler);
    let fielder = dismissal.fielders.first().map(|f| format.name_of(f));
    match (dismissal.kind, fielder) {
        (WicketKind::Bowled, _) => format!("b {}", bowler),
        (WicketKind::Lbw, _) => format!("lbw b {}", bowler),
        (WicketKind::HitWicket, _) => format!("hit wicket b {}", bowler),
        (WicketKind::Caught, Some(f)) if f == bowler => format!("c & b {}", bowler),
        (WicketKind::Caught, Some(f)) => format!("c {} b {}", f, bowler),
        (WicketKind::Caught, None) => format!("c ? b {}", bowler),
        (WicketKind::Stumped, Some(f)) => format!("st {} b {}", f, bowler),
        (WicketKind::Stumped, None) => format!("st ? b {}", bowler),
        (WicketKind::RunOut, _) if dismissal.fielders.is_empty() => "run out".to_string(),
        (WicketKind::RunOut, _) => {
            let names: Vec<String> = dismissal.fielders.iter().map(|f| format.name_of(f)).collect();
            format!("run out ({})", names.join("/"))
        }
    }
}

/// The live view a viewer sees
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scoreboard {
    pub status: MatchStatus,
    pub innings: u8,
    pub batting_team: String,
    pub bowling_team: String,
    pub runs: u32,
    pub wickets: u32,
    pub overs: String,
    pub current_run_rate: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runs_needed: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_run_rate: Option<f64>,
    pub balls_remaining: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub striker: Option<BatterLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub non_striker: Option<BatterLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bowler: Option<BowlerLine>,
    pub free_hit: bool,
    /// Selections the scorer must make before the next delivery
    pub waiting_for: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
}

impl Scoreboard {
    pub fn from_state(state: &MatchState) -> Self {
        let score = state.current();
        let batter = |id: &Option<PlayerId>| {
            id.as_ref().map(|id| {
                let stat = state.ledger.batting(id).cloned().unwrap_or_default();
                BatterLine::new(&state.format, id, &stat)
            })
        };
        let bowler = state.bowler.as_ref().map(|id| {
            let stat = state.ledger.bowling(id).cloned().unwrap_or_default();
            BowlerLine::new(&state.format, id, &stat)
        });

        let mut waiting_for = Vec::new();
        if state.status == MatchStatus::InningsBreak {
            if state.striker.is_none() || state.non_striker.is_none() {
                waiting_for.push("opening batters");
            }
            if state.bowler.is_none() {
                waiting_for.push("opening bowler");
            }
        }
        if state.awaiting_new_batter {
            waiting_for.push("new batter");
        }
        if state.awaiting_bowler_change {
            waiting_for.push("next bowler");
        }

        Self {
            status: state.status,
            innings: state.innings,
            batting_team: state.batting_team().name.clone(),
            bowling_team: state.bowling_team().name.clone(),
            runs: score.runs,
            wickets: score.wickets,
            overs: score.position().to_string(),
            current_run_rate: state.current_run_rate(),
            target: state.target,
            runs_needed: state.runs_needed(),
            required_run_rate: state.required_run_rate(),
            balls_remaining: state.remaining_balls(),
            striker: batter(&state.striker),
            non_striker: batter(&state.non_striker),
            bowler,
            free_hit: state.is_free_hit,
            waiting_for,
            result: state.result.as_ref().map(|r| r.describe()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InningsCard {
    pub number: u8,
    pub batting_team: String,
    pub runs: u32,
    pub wickets: u32,
    pub overs: String,
    pub extras: u32,
    pub extras_detail: String,
    pub batting: Vec<BatterLine>,
    pub bowling: Vec<BowlerLine>,
    pub fall_of_wickets: Vec<String>,
}

impl InningsCard {
    fn new(state: &MatchState, number: u8, score: &InningsScore) -> Self {
        let format = &state.format;
        let batting_team = format.team(score.batting_team);
        let bowling_team = format.team(score.batting_team.other());

        let batting = batting_team
            .roster
            .iter()
            .filter_map(|p| {
                state
                    .ledger
                    .batting(&p.id)
                    .map(|stat| BatterLine::new(format, &p.id, stat))
            })
            .collect();
        let bowling = bowling_team
            .roster
            .iter()
            .filter_map(|p| {
                state
                    .ledger
                    .bowling(&p.id)
                    .map(|stat| BowlerLine::new(format, &p.id, stat))
            })
            .collect();
        let fall_of_wickets = score
            .fall_of_wickets
            .iter()
            .map(|f| format!("{}-{} ({}, {})", f.wicket, f.runs, format.name_of(&f.batter), f.at))
            .collect();

        let e = &score.extras;
        Self {
            number,
            batting_team: batting_team.name.clone(),
            runs: score.runs,
            wickets: score.wickets,
            overs: score.position().to_string(),
            extras: e.total(),
            extras_detail: format!("w {}, nb {}, b {}, lb {}", e.wides, e.no_balls, e.byes, e.leg_byes),
            batting,
            bowling,
            fall_of_wickets,
        }
    }
}

/// Full card for both innings played so far
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scorecard {
    pub innings: Vec<InningsCard>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
}

impl Scorecard {
    pub fn from_state(state: &MatchState) -> Self {
        let played = match state.status {
            MatchStatus::NotStarted => 0,
            MatchStatus::Live | MatchStatus::Completed => state.innings,
            // the chase has not begun
            MatchStatus::InningsBreak => 1,
        };

        let innings = state
            .per_innings
            .iter()
            .take(usize::from(played))
            .zip(1u8..)
            .map(|(score, n)| InningsCard::new(state, n, score))
            .collect();

        Self {
            innings,
            result: state.result.as_ref().map(|r| r.describe()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::command::ScoringCommand;
    use crate::domain::machine::{apply, create_match, start_match, Openers};
    use crate::domain::roster::fixtures::{format, pid};
    use crate::domain::roster::{TeamSide, Toss, TossDecision};

    fn started() -> MatchState {
        let state = create_match(format(2, 11), Toss::new(TeamSide::Team1, TossDecision::Bat)).unwrap();
        start_match(&state, Openers::new(pid("fal-1"), pid("fal-2")), pid("her-1")).unwrap()
    }

    #[test]
    fn scoreboard_shows_crease_and_bowler() {
        let state = apply(&started(), &ScoringCommand::runs(4)).unwrap().state;
        let board = Scoreboard::from_state(&state);

        assert_eq!(board.runs, 4);
        assert_eq!(board.overs, "0.1");
        assert_eq!(board.striker.as_ref().unwrap().runs, 4);
        assert_eq!(board.non_striker.as_ref().unwrap().balls, 0);
        assert_eq!(board.bowler.as_ref().unwrap().overs, "0.1");
        assert!(board.waiting_for.is_empty());
        assert_eq!(board.target, None);
    }

    #[test]
    fn scoreboard_lists_pending_selections() {
        let mut state = started();
        for _ in 0..5 {
            state = apply(&state, &ScoringCommand::runs(0)).unwrap().state;
        }
        state = apply(&state, &ScoringCommand::wicket(WicketKind::Bowled)).unwrap().state;

        let board = Scoreboard::from_state(&state);
        assert_eq!(board.waiting_for, vec!["new batter", "next bowler"]);
    }

    #[test]
    fn caught_and_bowled_notation() {
        let f = format(2, 11);
        let d = Dismissal {
            kind: WicketKind::Caught,
            bowler: pid("her-1"),
            fielders: vec![pid("her-1")],
        };
        assert_eq!(how_out(&f, &d), "c & b Herons 1");

        let st = Dismissal {
            kind: WicketKind::Stumped,
            bowler: pid("her-2"),
            fielders: vec![pid("her-3")],
        };
        assert_eq!(how_out(&f, &st), "st Herons 3 b Herons 2");
    }

    #[test]
    fn scorecard_has_one_innings_during_break() {
        let state = apply(&started(), &ScoringCommand::runs(2)).unwrap().state;
        let state = apply(&state, &ScoringCommand::EndInnings).unwrap().state;

        let card = Scorecard::from_state(&state);
        assert_eq!(card.innings.len(), 1);
        assert_eq!(card.innings[0].runs, 2);
        assert_eq!(card.innings[0].batting.len(), 2);
        assert_eq!(card.innings[0].batting[0].how_out, "not out");
        assert_eq!(card.innings[0].bowling.len(), 1);
    }
}
