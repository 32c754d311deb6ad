//! Innings boundaries and match result

use super::commentary::CommentaryEntry;
use super::state::{Margin, MatchResult, MatchState, MatchStatus};

/// Why an innings closed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InningsEnd {
    TargetReached,
    AllOut,
    OversExhausted,
    /// Closed by the scorer
    Closed,
}

impl InningsEnd {
    fn label(&self) -> &'static str {
        match self {
            InningsEnd::TargetReached => "target reached",
            InningsEnd::AllOut => "all out",
            InningsEnd::OversExhausted => "overs complete",
            InningsEnd::Closed => "innings closed",
        }
    }
}

pub struct InningsController;

impl InningsController {
    /// Returns why the current innings must end, if it must
    pub fn check(state: &MatchState) -> Option<InningsEnd> {
        let score = state.current();
        if state.innings == 2 && state.target.is_some_and(|t| score.runs >= t) {
            return Some(InningsEnd::TargetReached);
        }
        if state.is_all_out() {
            return Some(InningsEnd::AllOut);
        }
        if score.legal_balls() >= state.format.total_balls() {
            return Some(InningsEnd::OversExhausted);
        }
        None
    }

    /// Closes the innings when an end condition holds
    pub(crate) fn close_if_finished(state: &mut MatchState) -> bool {
        match Self::check(state) {
            Some(reason) => {
                Self::end_innings(state, reason);
                true
            }
            None => false,
        }
    }

    pub(crate) fn end_innings(state: &mut MatchState, reason: InningsEnd) {
        if state.innings == 1 {
            Self::start_break(state, reason);
        } else {
            let result = Self::result(state);
            Self::complete(state, result, reason.label());
        }
    }

    /// Ends the match outright
    ///
    /// A chase in progress is decided on the scores as they stand; anything
    /// earlier has no result.
    pub(crate) fn end_match(state: &mut MatchState) {
        if state.innings == 2 && state.status == MatchStatus::Live {
            let result = Self::result(state);
            Self::complete(state, result, "match ended");
        } else {
            Self::complete(state, MatchResult::NoResult, "match abandoned");
        }
    }

    /// Goes live again once the new openers and opening bowler are in
    pub(crate) fn resume_if_ready(state: &mut MatchState) {
        if state.status != MatchStatus::InningsBreak {
            return;
        }
        if state.striker.is_none() || state.non_striker.is_none() || state.bowler.is_none() {
            return;
        }

        state.status = MatchStatus::Live;
        let text = format!(
            "{} need {} off {} balls",
            state.batting_team().name,
            state.runs_needed().unwrap_or_default(),
            state.remaining_balls()
        );
        tracing::debug!(innings = state.innings, "second innings under way");
        let at = state.position();
        state.commentary.push(CommentaryEntry::note(at, text));
    }

    /// Result of a completed chase
    ///
    /// The side batting second must pass `target - 1` to win; level scores
    /// are a tie.
    pub fn result(state: &MatchState) -> MatchResult {
        let Some(target) = state.target else {
            return MatchResult::NoResult;
        };
        let first = &state.per_innings[0];
        let second = &state.per_innings[1];
        let first_total = target.saturating_sub(1);

        if second.runs > first_total {
            let team = state.format.team(second.batting_team);
            MatchResult::Won {
                winner: second.batting_team,
                team: team.name.clone(),
                margin: Margin::Wickets(team.all_out_at().saturating_sub(second.wickets)),
            }
        } else if second.runs == first_total {
            MatchResult::Tie
        } else {
            MatchResult::Won {
                winner: first.batting_team,
                team: state.format.team(first.batting_team).name.clone(),
                margin: Margin::Runs(first_total - second.runs),
            }
        }
    }

    fn start_break(state: &mut MatchState, reason: InningsEnd) {
        let first = state.current().clone();
        let target = first.runs + 1;
        let batting = state.batting_team().name.clone();
        let chasing = state.bowling_team().name.clone();

        tracing::debug!(runs = first.runs, wickets = first.wickets, target, "first innings closed");

        let text = format!(
            "End of innings ({}): {} {}. {} need {} to win",
            reason.label(),
            batting,
            first.summary(),
            chasing,
            target
        );
        state
            .commentary
            .push(CommentaryEntry::note(first.position(), text));

        state.innings = 2;
        state.target = Some(target);
        state.status = MatchStatus::InningsBreak;
        state.striker = None;
        state.non_striker = None;
        state.bowler = None;
        state.previous_bowler = None;
        state.is_free_hit = false;
        state.awaiting_bowler_change = false;
        state.awaiting_new_batter = false;
    }

    fn complete(state: &mut MatchState, result: MatchResult, why: &str) {
        tracing::debug!(result = %result, why, "match completed");

        let text = format!("{} ({}). {}", state.current().summary(), why, result);
        let at = state.position();
        state.commentary.push(CommentaryEntry::note(at, text));

        state.status = MatchStatus::Completed;
        state.result = Some(result);
        state.is_free_hit = false;
        state.awaiting_bowler_change = false;
        state.awaiting_new_batter = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::roster::fixtures::format;
    use crate::domain::roster::{TeamSide, Toss, TossDecision};
    use crate::domain::state::MatchState;

    fn chase(target: u32, runs: u32, wickets: u32) -> MatchState {
        let mut s = MatchState::new(format(2, 11), Toss::new(TeamSide::Team1, TossDecision::Bat));
        s.status = MatchStatus::Live;
        s.innings = 2;
        s.target = Some(target);
        s.per_innings[0].runs = target - 1;
        s.per_innings[1].runs = runs;
        s.per_innings[1].wickets = wickets;
        s
    }

    #[test]
    fn chasing_side_wins_by_wickets_in_hand() {
        let result = InningsController::result(&chase(20, 20, 3));
        assert_eq!(result.describe(), "Herons won by 7 wickets");
    }

    #[test]
    fn defending_side_wins_by_runs() {
        let result = InningsController::result(&chase(20, 12, 10));
        assert_eq!(result.describe(), "Falcons won by 7 runs");
    }

    #[test]
    fn level_scores_tie() {
        assert_eq!(InningsController::result(&chase(20, 19, 10)), MatchResult::Tie);
    }

    #[test]
    fn target_reached_ends_second_innings() {
        assert_eq!(InningsController::check(&chase(20, 21, 0)), Some(InningsEnd::TargetReached));
        assert_eq!(InningsController::check(&chase(20, 18, 0)), None);
    }

    #[test]
    fn end_of_first_innings_sets_target() {
        let mut s = MatchState::new(format(2, 11), Toss::new(TeamSide::Team2, TossDecision::Bat));
        s.status = MatchStatus::Live;
        s.per_innings[0].runs = 45;

        InningsController::end_innings(&mut s, InningsEnd::Closed);

        assert_eq!(s.status, MatchStatus::InningsBreak);
        assert_eq!(s.innings, 2);
        assert_eq!(s.target, Some(46));
        assert_eq!(s.batting_side(), TeamSide::Team1);
        assert!(s.check_invariants().is_ok());
    }

    #[test]
    fn abandoning_during_break_is_no_result() {
        let mut s = chase(20, 0, 0);
        s.status = MatchStatus::InningsBreak;
        InningsController::end_match(&mut s);
        assert_eq!(s.result, Some(MatchResult::NoResult));
        assert!(s.is_completed());
    }
}
