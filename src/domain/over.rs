//! Over and ball counting
//!
//! Only legal deliveries move the pointer. A free hit is scored but does not
//! move it either, so the delivery is effectively bowled again.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Legal deliveries per over
pub const BALLS_PER_OVER: u8 = 6;

/// Completed overs plus balls into the current over
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BallPosition {
    pub over: u32,
    pub ball: u8,
}

impl BallPosition {
    pub fn new(over: u32, ball: u8) -> Self {
        debug_assert!(ball < BALLS_PER_OVER);
        Self { over, ball }
    }

    pub fn from_legal_balls(legal: u32) -> Self {
        let per_over = u32::from(BALLS_PER_OVER);
        Self {
            over: legal / per_over,
            ball: (legal % per_over) as u8,
        }
    }

    pub fn legal_balls(&self) -> u32 {
        self.over * u32::from(BALLS_PER_OVER) + u32::from(self.ball)
    }
}

impl fmt::Display for BallPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.over, self.ball)
    }
}

/// Result of bowling one delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverStep {
    pub position: BallPosition,
    /// True when this delivery was the sixth legal ball of the over
    pub over_completed: bool,
    /// True when the delivery counted toward the over
    pub counted: bool,
}

pub struct OverTracker;

impl OverTracker {
    /// Moves the pointer for one delivery
    pub fn advance(position: BallPosition, is_free_hit: bool, is_legal: bool) -> OverStep {
        if !is_legal || is_free_hit {
            return OverStep {
                position,
                over_completed: false,
                counted: false,
            };
        }

        let next = position.ball + 1;
        if next >= BALLS_PER_OVER {
            OverStep {
                position: BallPosition::new(position.over + 1, 0),
                over_completed: true,
                counted: true,
            }
        } else {
            OverStep {
                position: BallPosition::new(position.over, next),
                over_completed: false,
                counted: true,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legal_ball_advances() {
        let step = OverTracker::advance(BallPosition::new(0, 2), false, true);
        assert_eq!(step.position, BallPosition::new(0, 3));
        assert!(!step.over_completed);
        assert!(step.counted);
    }

    #[test]
    fn sixth_ball_rolls_over() {
        let step = OverTracker::advance(BallPosition::new(3, 5), false, true);
        assert_eq!(step.position, BallPosition::new(4, 0));
        assert!(step.over_completed);
    }

    #[test]
    fn illegal_delivery_holds_position() {
        let step = OverTracker::advance(BallPosition::new(1, 5), false, false);
        assert_eq!(step.position, BallPosition::new(1, 5));
        assert!(!step.over_completed);
        assert!(!step.counted);
    }

    #[test]
    fn free_hit_holds_position() {
        let step = OverTracker::advance(BallPosition::new(1, 5), true, true);
        assert_eq!(step.position, BallPosition::new(1, 5));
        assert!(!step.counted);
    }

    #[test]
    fn legal_ball_conversion() {
        let pos = BallPosition::from_legal_balls(17);
        assert_eq!(pos, BallPosition::new(2, 5));
        assert_eq!(pos.legal_balls(), 17);
        assert_eq!(pos.to_string(), "2.5");
    }
}
