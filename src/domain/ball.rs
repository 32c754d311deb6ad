//! Ball-by-ball state transitions
//!
//! [`BallProcessor`] mutates a working copy of the match state. The caller
//! (`apply`) owns the copy and discards it when any step fails, so a
//! rejected command never leaks a partial update.

use super::command::{BowlingHand, ExtraKind, WicketKind};
use super::commentary::{self, CommentaryEntry};
use super::error::ScoringError;
use super::id::PlayerId;
use super::innings::{InningsController, InningsEnd};
use super::over::{OverStep, OverTracker};
use super::state::{FallOfWicket, MatchState, MatchStatus};
use super::stats::{BattingEvent, BowlingEvent, Dismissal, StatDelta};

pub(crate) struct BallProcessor<'a> {
    state: &'a mut MatchState,
    deltas: &'a mut Vec<StatDelta>,
}

/// Crease pair and bowler for the next delivery
struct Delivery {
    striker: PlayerId,
    bowler: PlayerId,
}

impl<'a> BallProcessor<'a> {
    pub(crate) fn new(state: &'a mut MatchState, deltas: &'a mut Vec<StatDelta>) -> Self {
        Self { state, deltas }
    }

    pub(crate) fn runs(&mut self, runs: u8) -> Result<(), ScoringError> {
        let delivery = self.ready_for_delivery("runs")?;
        let free_hit = self.state.is_free_hit;
        let at = self.state.position();

        self.state.current_mut().runs += u32::from(runs);
        let step = self.advance(free_hit, true);

        let batting = self
            .state
            .ledger
            .record_batting(&delivery.striker, BattingEvent::off_bat(runs, step.counted));
        let bowling = self.state.ledger.record_bowling(
            &delivery.bowler,
            BowlingEvent {
                runs_conceded: u32::from(runs),
                ball_bowled: step.counted,
                ..Default::default()
            },
        );
        self.deltas.extend([batting, bowling]);

        let text = commentary::runs_text(
            &self.name(&delivery.bowler),
            &self.name(&delivery.striker),
            runs,
            free_hit,
        );
        self.state
            .commentary
            .push(CommentaryEntry::delivery(at, step.counted, text));

        self.rotate_strike(runs % 2 == 1, step.over_completed);
        self.finish_delivery(step, &delivery, false);
        Ok(())
    }

    pub(crate) fn wicket(
        &mut self,
        kind: WicketKind,
        fielders: &[PlayerId],
        dismissed: Option<&PlayerId>,
    ) -> Result<(), ScoringError> {
        let delivery = self.ready_for_delivery("wicket")?;
        let free_hit = self.state.is_free_hit;

        if free_hit && !kind.allowed_on_free_hit() {
            return Err(ScoringError::DismissalNotAllowedOnFreeHit(kind));
        }

        let out = match dismissed {
            None => delivery.striker.clone(),
            Some(id) if *id == delivery.striker => id.clone(),
            Some(id) if kind == WicketKind::RunOut && self.state.is_at_crease(id) => id.clone(),
            Some(id) if kind == WicketKind::RunOut => {
                return Err(ScoringError::invalid(
                    "wicket",
                    format!("{} is not at the crease", self.name(id)),
                ));
            }
            Some(_) => {
                return Err(ScoringError::invalid(
                    "wicket",
                    format!("only a run out can dismiss the non-striker ({})", kind),
                ));
            }
        };

        for fielder in fielders {
            if !self.state.bowling_team().contains(fielder) {
                return Err(ScoringError::UnknownPlayer {
                    player: fielder.clone(),
                    team: self.state.bowling_team().name.clone(),
                });
            }
        }

        let wickets = self.state.current().wickets + 1;
        let all_out = wickets >= self.state.batting_team().all_out_at();
        if !all_out && self.state.eligible_batters().is_empty() {
            return Err(ScoringError::RosterExhausted {
                team: self.state.batting_team().name.clone(),
            });
        }

        let at = self.state.position();
        self.state.current_mut().wickets = wickets;
        let step = self.advance(free_hit, true);

        let faced = self
            .state
            .ledger
            .record_batting(&delivery.striker, BattingEvent::faced(step.counted));
        let bowling = self.state.ledger.record_bowling(
            &delivery.bowler,
            BowlingEvent {
                ball_bowled: step.counted,
                wicket: kind.credits_bowler(),
                ..Default::default()
            },
        );
        let dismissal = self.state.ledger.record_dismissal(
            &out,
            Dismissal {
                kind,
                bowler: delivery.bowler.clone(),
                fielders: fielders.to_vec(),
            },
        );
        self.deltas.extend([faced, bowling, dismissal]);

        self.state.dismissed_batters.insert(out.clone());
        let runs = self.state.current().runs;
        self.state.current_mut().fall_of_wickets.push(FallOfWicket {
            wicket: wickets,
            runs,
            batter: out.clone(),
            at: step.position,
        });
        if self.state.striker.as_ref() == Some(&out) {
            self.state.striker = None;
        } else {
            self.state.non_striker = None;
        }

        let fielder_names: Vec<String> = fielders.iter().map(|f| self.name(f)).collect();
        let text = commentary::wicket_text(
            &self.name(&delivery.bowler),
            &self.name(&out),
            kind,
            &fielder_names,
            (runs, wickets),
        );
        self.state
            .commentary
            .push(CommentaryEntry::delivery(at, step.counted, text));

        if !all_out {
            self.state.awaiting_new_batter = true;
        }

        self.rotate_strike(false, step.over_completed);
        self.finish_delivery(step, &delivery, false);
        Ok(())
    }

    pub(crate) fn extra(&mut self, kind: ExtraKind, runs: u8) -> Result<(), ScoringError> {
        let delivery = self.ready_for_delivery("extra")?;
        let free_hit = self.state.is_free_hit;
        let at = self.state.position();
        let added = u32::from(runs);

        {
            let score = self.state.current_mut();
            score.runs += added;
            match kind {
                ExtraKind::Wide => score.extras.wides += added,
                ExtraKind::NoBall => score.extras.no_balls += added,
                ExtraKind::Bye => score.extras.byes += added,
                ExtraKind::LegBye => score.extras.leg_byes += added,
            }
        }

        let step = self.advance(free_hit, kind.is_legal_delivery());

        let bowling = self.state.ledger.record_bowling(
            &delivery.bowler,
            BowlingEvent {
                runs_conceded: if kind.charged_to_bowler() { added } else { 0 },
                ball_bowled: step.counted,
                wicket: false,
                wide: kind == ExtraKind::Wide,
                no_ball: kind == ExtraKind::NoBall,
            },
        );
        self.deltas.push(bowling);
        if kind.is_legal_delivery() {
            let faced = self
                .state
                .ledger
                .record_batting(&delivery.striker, BattingEvent::faced(step.counted));
            self.deltas.push(faced);
        }

        let text = commentary::extra_text(
            &self.name(&delivery.bowler),
            &self.name(&delivery.striker),
            kind,
            runs,
        );
        self.state
            .commentary
            .push(CommentaryEntry::delivery(at, step.counted, text));

        // The penalty run is not run between the wickets
        let run_between = if kind.charged_to_bowler() { runs - 1 } else { runs };
        self.rotate_strike(run_between % 2 == 1, step.over_completed);

        // Only a no-ball earns a free hit, and only for the next delivery
        self.finish_delivery(step, &delivery, kind == ExtraKind::NoBall);
        Ok(())
    }

    pub(crate) fn change_bowler(
        &mut self,
        player: &PlayerId,
        hand: Option<BowlingHand>,
        style: Option<&str>,
    ) -> Result<(), ScoringError> {
        let fielding = self.state.bowling_team();
        if !fielding.contains(player) {
            return Err(ScoringError::UnknownPlayer {
                player: player.clone(),
                team: fielding.name.clone(),
            });
        }
        if self.state.bowler.as_ref() == Some(player) {
            return Err(ScoringError::DuplicatePlayerSelection(format!(
                "{} is already bowling",
                self.name(player)
            )));
        }
        if self.state.previous_bowler.as_ref() == Some(player) {
            return Err(ScoringError::ConsecutiveOvers(player.clone()));
        }

        self.state.bowler = Some(player.clone());
        self.state.awaiting_bowler_change = false;
        self.state.ledger.register_bowler(player);

        let action = match (hand, style) {
            (Some(hand), Some(style)) => format!("{}-arm {}", hand_label(hand), style),
            (Some(hand), None) => format!("{}-arm", hand_label(hand)),
            (None, Some(style)) => style.to_string(),
            (None, None) => String::new(),
        };
        let text = if action.is_empty() {
            format!("{} comes into the attack", self.name(player))
        } else {
            format!("{} ({}) comes into the attack", self.name(player), action)
        };
        let at = self.state.position();
        self.state.commentary.push(CommentaryEntry::note(at, text));

        InningsController::resume_if_ready(self.state);
        Ok(())
    }

    pub(crate) fn change_batter(&mut self, player: &PlayerId) -> Result<(), ScoringError> {
        match self.state.status {
            MatchStatus::Live if !self.state.awaiting_new_batter => {
                return Err(ScoringError::invalid(
                    "change batter",
                    "no batter is waiting to come in",
                ));
            }
            MatchStatus::InningsBreak
                if self.state.striker.is_some() && self.state.non_striker.is_some() =>
            {
                return Err(ScoringError::invalid(
                    "change batter",
                    "both openers are already selected",
                ));
            }
            _ => {}
        }

        let batting = self.state.batting_team();
        if !batting.contains(player) {
            return Err(ScoringError::UnknownPlayer {
                player: player.clone(),
                team: batting.name.clone(),
            });
        }
        if self.state.dismissed_batters.contains(player) {
            return Err(ScoringError::DuplicatePlayerSelection(format!(
                "{} is already out",
                self.name(player)
            )));
        }
        if self.state.is_at_crease(player) {
            return Err(ScoringError::DuplicatePlayerSelection(format!(
                "{} is already batting",
                self.name(player)
            )));
        }

        if self.state.striker.is_none() {
            self.state.striker = Some(player.clone());
        } else {
            self.state.non_striker = Some(player.clone());
        }
        self.state.awaiting_new_batter = false;
        self.state.ledger.register_batter(player);

        let text = format!("{} comes to the crease", self.name(player));
        let at = self.state.position();
        self.state.commentary.push(CommentaryEntry::note(at, text));

        InningsController::resume_if_ready(self.state);
        Ok(())
    }

    pub(crate) fn swap_batters(&mut self) -> Result<(), ScoringError> {
        if self.state.striker.is_none() || self.state.non_striker.is_none() {
            return Err(ScoringError::invalid(
                "swap batters",
                "both batters must be at the crease",
            ));
        }
        std::mem::swap(&mut self.state.striker, &mut self.state.non_striker);

        let on_strike = self
            .state
            .striker
            .as_ref()
            .map(|id| self.name(id))
            .unwrap_or_default();
        let text = format!("Batters cross, {} on strike", on_strike);
        let at = self.state.position();
        self.state.commentary.push(CommentaryEntry::note(at, text));
        Ok(())
    }

    pub(crate) fn end_innings(&mut self) {
        InningsController::end_innings(self.state, InningsEnd::Closed);
    }

    pub(crate) fn end_match(&mut self) {
        InningsController::end_match(self.state);
    }

    /// Gating shared by every delivery
    fn ready_for_delivery(&self, command: &'static str) -> Result<Delivery, ScoringError> {
        if self.state.awaiting_new_batter {
            return Err(ScoringError::invalid(command, "waiting for a new batter"));
        }
        if self.state.awaiting_bowler_change {
            return Err(ScoringError::invalid(command, "waiting for the next over's bowler"));
        }
        match (&self.state.striker, &self.state.non_striker, &self.state.bowler) {
            (Some(striker), Some(_), Some(bowler)) => Ok(Delivery {
                striker: striker.clone(),
                bowler: bowler.clone(),
            }),
            _ => Err(ScoringError::invalid(
                command,
                "both batters and a bowler must be selected",
            )),
        }
    }

    fn advance(&mut self, free_hit: bool, legal: bool) -> OverStep {
        let step = OverTracker::advance(self.state.position(), free_hit, legal);
        self.state.current_mut().set_position(step.position);
        step
    }

    /// Ends change at the end of an over; otherwise odd runs cross the batters.
    /// Both together are still a single change of ends.
    fn rotate_strike(&mut self, odd_runs: bool, over_completed: bool) {
        if over_completed || odd_runs {
            std::mem::swap(&mut self.state.striker, &mut self.state.non_striker);
        }
    }

    fn finish_delivery(&mut self, step: OverStep, delivery: &Delivery, free_hit_next: bool) {
        self.state.is_free_hit = free_hit_next;

        if step.over_completed {
            let score = self.state.current().summary();
            self.state.previous_bowler = Some(delivery.bowler.clone());
            self.state.bowler = None;
            self.state.awaiting_bowler_change = true;
            let text = format!("End of over {}: {}", step.position.over, score);
            self.state
                .commentary
                .push(CommentaryEntry::note(step.position, text));
        }

        InningsController::close_if_finished(self.state);
    }

    fn name(&self, id: &PlayerId) -> String {
        self.state.format.name_of(id)
    }
}

fn hand_label(hand: BowlingHand) -> &'static str {
    match hand {
        BowlingHand::Left => "left",
        BowlingHand::Right => "right",
    }
}
