//! End-to-end scoring scenarios against the engine API
//!
//! These drive whole innings through `apply` and check the scoreboard a
//! viewer would see at the end.

use scorebook::domain::{
    apply, create_match, restore, snapshot, start_match, ExtraKind, MatchFormat, MatchResult,
    MatchState, MatchStatus, Openers, Player, PlayerId, PlayerRole, ScoringCommand, ScoringError,
    Team, TeamSide, Toss, TossDecision, WicketKind, BALLS_PER_OVER,
};

fn pid(raw: &str) -> PlayerId {
    PlayerId::new(raw).unwrap()
}

fn team(name: &str, prefix: &str, size: usize) -> Team {
    Team {
        name: name.to_string(),
        roster: (1..=size)
            .map(|n| Player::new(pid(&format!("{}-{}", prefix, n)), format!("{} {}", name, n), PlayerRole::Batter))
            .collect(),
    }
}

fn new_match(overs: u32, squad: usize) -> MatchState {
    let format = MatchFormat {
        overs_per_innings: overs,
        team1: team("Falcons", "fal", squad),
        team2: team("Herons", "her", squad),
    };
    let state = create_match(format, Toss::new(TeamSide::Team1, TossDecision::Bat)).unwrap();
    start_match(&state, Openers::new(pid("fal-1"), pid("fal-2")), pid("her-1")).unwrap()
}

fn play(state: MatchState, commands: &[ScoringCommand]) -> MatchState {
    commands.iter().fold(state, |state, command| {
        apply(&state, command)
            .unwrap_or_else(|e| panic!("{:?} failed: {}", command, e))
            .state
    })
}

fn runs(values: &[u8]) -> Vec<ScoringCommand> {
    values.iter().map(|r| ScoringCommand::runs(*r)).collect()
}

/// 2 overs: 4,4,W,1,6,0 then six singles
fn first_innings() -> MatchState {
    let mut commands = runs(&[4, 4]);
    commands.push(ScoringCommand::wicket(WicketKind::Bowled));
    commands.push(ScoringCommand::change_batter(pid("fal-3")));
    commands.extend(runs(&[1, 6, 0]));
    commands.push(ScoringCommand::change_bowler(pid("her-2")));
    commands.extend(runs(&[1, 1, 1, 1, 1, 1]));
    play(new_match(2, 11), &commands)
}

#[test]
fn first_innings_closes_with_target() {
    let state = first_innings();
    let score = &state.per_innings[0];

    assert_eq!(score.runs, 21);
    assert_eq!(score.wickets, 1);
    assert_eq!(score.position().to_string(), "2.0");
    assert_eq!(state.status, MatchStatus::InningsBreak);
    assert_eq!(state.innings, 2);
    assert_eq!(state.target, Some(22));

    let opener = state.ledger.batting(&pid("fal-1")).unwrap();
    assert_eq!((opener.runs, opener.balls), (8, 2));
    assert!(opener.is_out());
    assert_eq!(state.ledger.batting(&pid("fal-2")).unwrap().runs, 9);
    assert_eq!(state.ledger.batting(&pid("fal-3")).unwrap().runs, 4);

    let bowler = state.ledger.bowling(&pid("her-1")).unwrap();
    assert_eq!((bowler.balls, bowler.runs_conceded, bowler.wickets), (6, 15, 1));
    assert_eq!(state.ledger.bowling(&pid("her-2")).unwrap().runs_conceded, 6);
}

#[test]
fn free_hit_after_no_ball_is_single_use() {
    let state = new_match(2, 11);
    let state = play(state, &[ScoringCommand::extra(ExtraKind::NoBall, 1)]);
    assert!(state.is_free_hit);

    let state = play(state, &[ScoringCommand::runs(6)]);
    assert!(!state.is_free_hit);
    assert_eq!(state.current().runs, 7);

    let striker = state.ledger.batting(&pid("fal-1")).unwrap();
    assert_eq!(striker.runs, 6);
    assert_eq!(striker.balls, 0);
}

#[test]
fn chase_completes_as_soon_as_target_is_reached() {
    let state = play(
        first_innings(),
        &[
            ScoringCommand::change_batter(pid("her-1")),
            ScoringCommand::change_batter(pid("her-2")),
            ScoringCommand::change_bowler(pid("fal-1")),
        ],
    );
    assert_eq!(state.status, MatchStatus::Live);

    let mut commands = runs(&[6, 6, 0, 0, 0, 0]);
    commands.push(ScoringCommand::change_bowler(pid("fal-2")));
    commands.extend(runs(&[4, 4, 0, 0, 2]));
    let state = play(state, &commands);

    assert_eq!(state.status, MatchStatus::Completed);
    assert_eq!(state.current().runs, 22);
    assert_eq!(state.current().position().to_string(), "1.5");
    assert!(matches!(state.result, Some(MatchResult::Won { winner: TeamSide::Team2, .. })));
    assert_eq!(
        state.result.as_ref().map(|r| r.describe()).as_deref(),
        Some("Herons won by 10 wickets")
    );

    let err = apply(&state, &ScoringCommand::runs(1)).unwrap_err();
    assert!(matches!(err, ScoringError::InvalidCommandForState { .. }));
}

#[test]
fn last_wicket_ends_innings_without_new_batter() {
    let state = play(
        new_match(5, 3),
        &[
            ScoringCommand::runs(2),
            ScoringCommand::wicket(WicketKind::Bowled),
            ScoringCommand::change_batter(pid("fal-3")),
            ScoringCommand::wicket(WicketKind::Lbw),
        ],
    );

    assert_eq!(state.per_innings[0].wickets, 2);
    assert_eq!(state.status, MatchStatus::InningsBreak);
    assert!(!state.awaiting_new_batter);
    assert_eq!(state.target, Some(3));
}

#[test]
fn failed_command_leaves_state_untouched() {
    let state = new_match(2, 11);
    let before = state.clone();

    assert!(apply(&state, &ScoringCommand::runs(9)).is_err());
    assert!(apply(&state, &ScoringCommand::change_batter(pid("fal-5"))).is_err());
    assert_eq!(state, before);
}

mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn delivery() -> impl Strategy<Value = ScoringCommand> {
        prop_oneof![
            6 => (0u8..=6).prop_map(ScoringCommand::runs),
            1 => (1u8..=3).prop_map(|r| ScoringCommand::extra(ExtraKind::Wide, r)),
            1 => (1u8..=5).prop_map(|r| ScoringCommand::extra(ExtraKind::NoBall, r)),
            1 => (1u8..=4).prop_map(|r| ScoringCommand::extra(ExtraKind::Bye, r)),
            1 => (1u8..=4).prop_map(|r| ScoringCommand::extra(ExtraKind::LegBye, r)),
            1 => Just(ScoringCommand::wicket(WicketKind::Bowled)),
            1 => Just(ScoringCommand::wicket(WicketKind::RunOut)),
            1 => Just(ScoringCommand::SwapBatters),
        ]
    }

    /// Makes whatever selections the scorer would be prompted for
    fn settle(mut state: MatchState) -> MatchState {
        loop {
            let command = if state.is_completed() {
                return state;
            } else if state.awaiting_new_batter
                || (state.status == MatchStatus::InningsBreak
                    && (state.striker.is_none() || state.non_striker.is_none()))
            {
                let next = state.eligible_batters()[0].id.clone();
                ScoringCommand::change_batter(next)
            } else if state.bowler.is_none() {
                let next = state
                    .bowling_team()
                    .roster
                    .iter()
                    .find(|p| state.previous_bowler.as_ref() != Some(&p.id))
                    .map(|p| p.id.clone())
                    .unwrap();
                ScoringCommand::change_bowler(next)
            } else {
                return state;
            };
            state = apply(&state, &command).unwrap().state;
        }
    }

    proptest! {
        #[test]
        fn reachable_states_hold_invariants(commands in prop::collection::vec(delivery(), 1..120)) {
            let mut state = new_match(3, 6);

            for command in &commands {
                if state.is_completed() {
                    break;
                }
                let before = state.clone();
                let was_free_hit = state.is_free_hit;

                match apply(&state, command) {
                    Ok(applied) => state = settle(applied.state),
                    Err(_) => {
                        prop_assert_eq!(&state, &before);
                        continue;
                    }
                }

                prop_assert_eq!(state.check_invariants(), Ok(()));
                prop_assert!(state.current().balls < BALLS_PER_OVER);
                prop_assert!(state.current().legal_balls() <= state.format.total_balls());
                if let (Some(s), Some(n)) = (&state.striker, &state.non_striker) {
                    prop_assert_ne!(s, n);
                }
                for batter in &state.dismissed_batters {
                    prop_assert!(!state.is_at_crease(batter));
                }

                let penalty = matches!(
                    command,
                    ScoringCommand::Extra { kind: ExtraKind::Wide | ExtraKind::NoBall, .. }
                );
                if penalty && state.innings == before.innings {
                    prop_assert_eq!(state.position(), before.position());
                }

                let no_ball = matches!(
                    command,
                    ScoringCommand::Extra { kind: ExtraKind::NoBall, .. }
                );
                let delivery = !matches!(command, ScoringCommand::SwapBatters);
                if delivery && !no_ball {
                    prop_assert!(!state.is_free_hit);
                }
                if !delivery {
                    prop_assert_eq!(state.is_free_hit, was_free_hit);
                }
            }
        }

        #[test]
        fn ball_pointer_counts_legal_deliveries(balls in prop::collection::vec(0u8..=6, 1..18)) {
            let mut state = new_match(3, 11);
            for (n, runs) in balls.iter().enumerate() {
                state = settle(apply(&state, &ScoringCommand::runs(*runs)).unwrap().state);

                let legal = n as u32 + 1;
                prop_assert_eq!(state.current().legal_balls(), legal);
                prop_assert_eq!(state.over(), legal / 6);
                prop_assert_eq!(u32::from(state.ball()), legal % 6);
            }
        }

        #[test]
        fn snapshot_restores_any_reachable_state(commands in prop::collection::vec(delivery(), 0..60)) {
            let mut state = new_match(2, 5);
            for command in &commands {
                if let Ok(applied) = apply(&state, command) {
                    state = settle(applied.state);
                }
            }

            let json = serde_json::to_string(&snapshot(&state)).unwrap();
            let restored = restore(serde_json::from_str(&json).unwrap()).unwrap();
            prop_assert_eq!(restored, state);
        }
    }
}
