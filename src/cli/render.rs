//! Text rendering for scoreboards, scorecards and commentary

use crate::domain::{BatterLine, BowlerLine, CommentaryEntry, InningsCard, Scoreboard, Scorecard};

pub fn scoreboard(board: &Scoreboard) {
    println!(
        "{} {}/{} ({} ov)  CRR {:.2}  [{}, innings {}]",
        board.batting_team,
        board.runs,
        board.wickets,
        board.overs,
        board.current_run_rate,
        board.status,
        board.innings
    );

    if let (Some(target), Some(needed)) = (board.target, board.runs_needed) {
        let rrr = board
            .required_run_rate
            .map(|r| format!("  RRR {:.2}", r))
            .unwrap_or_default();
        println!(
            "Target {}: need {} off {} balls{}",
            target, needed, board.balls_remaining, rrr
        );
    }

    if let Some(striker) = &board.striker {
        println!("  * {}", batter_summary(striker));
    }
    if let Some(non_striker) = &board.non_striker {
        println!("    {}", batter_summary(non_striker));
    }
    if let Some(bowler) = &board.bowler {
        println!("  {} vs {}", bowler_summary(bowler), board.bowling_team);
    }

    if board.free_hit {
        println!("FREE HIT");
    }
    if !board.waiting_for.is_empty() {
        println!("Waiting for: {}", board.waiting_for.join(", "));
    }
    if let Some(result) = &board.result {
        println!("Result: {}", result);
    }
}

pub fn scorecard(card: &Scorecard) {
    if card.innings.is_empty() {
        println!("No innings played yet");
    }
    for (i, innings) in card.innings.iter().enumerate() {
        if i > 0 {
            println!();
        }
        innings_card(innings);
    }
    if let Some(result) = &card.result {
        println!();
        println!("Result: {}", result);
    }
}

fn innings_card(card: &InningsCard) {
    println!(
        "Innings {}: {} {}/{} ({} ov)",
        card.number, card.batting_team, card.runs, card.wickets, card.overs
    );
    println!("{}", "-".repeat(60));
    println!(
        "{:<20} {:<24} {:>4} {:>4} {:>3} {:>3} {:>7}",
        "BATTER", "", "R", "B", "4s", "6s", "SR"
    );
    for line in &card.batting {
        println!(
            "{:<20} {:<24} {:>4} {:>4} {:>3} {:>3} {:>7.2}",
            line.name, line.how_out, line.runs, line.balls, line.fours, line.sixes, line.strike_rate
        );
    }
    println!("Extras {} ({})", card.extras, card.extras_detail);
    println!();

    println!(
        "{:<20} {:>5} {:>4} {:>3} {:>3} {:>3} {:>6}",
        "BOWLER", "O", "R", "W", "WD", "NB", "ECON"
    );
    for line in &card.bowling {
        println!(
            "{:<20} {:>5} {:>4} {:>3} {:>3} {:>3} {:>6.2}",
            line.name, line.overs, line.runs, line.wickets, line.wides, line.no_balls, line.economy
        );
    }

    if !card.fall_of_wickets.is_empty() {
        println!();
        println!("Fall of wickets: {}", card.fall_of_wickets.join(", "));
    }
}

pub fn commentary<'a>(entries: impl IntoIterator<Item = &'a CommentaryEntry>) {
    for entry in entries {
        if entry.is_ball_event {
            println!("{:>5}  {}", entry.label(), entry.text);
        } else {
            println!("{:>5}  -- {}", "", entry.text);
        }
    }
}

fn batter_summary(line: &BatterLine) -> String {
    format!("{} {} ({})", line.name, line.runs, line.balls)
}

fn bowler_summary(line: &BowlerLine) -> String {
    format!(
        "{} {}-{}-{}",
        line.name, line.overs, line.runs, line.wickets
    )
}
