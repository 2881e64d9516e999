//! Player representation

use crate::core::PlayerId;
use serde::{Deserialize, Serialize};

/// Maximum CC a player can hold.
pub const CC_CAP: u32 = 10;

/// CC granted at the start of a normal turn.
pub const CC_PER_TURN: u32 = 2;

/// Reduced grant for the first player's very first turn.
pub const FIRST_TURN_CC: u32 = 1;

/// Maximum unopposed strikes one player may land per turn.
pub const UNOPPOSED_STRIKES_PER_TURN: u32 = 1;

/// A player in the game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,

    pub name: String,

    /// Resource counter. Always in 0..=CC_CAP.
    pub cc: u32,

    /// Unopposed strikes landed this turn; reset at turn start.
    pub unopposed_strikes_this_turn: u32,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Player {
            id,
            name: name.into(),
            cc: 0,
            unopposed_strikes_this_turn: 0,
        }
    }

    /// Add CC, clamped to the cap.
    pub fn gain_cc(&mut self, amount: u32) {
        self.cc = (self.cc + amount).min(CC_CAP);
    }

    /// Spend CC. Returns false (and leaves the balance untouched) if the
    /// balance is insufficient; the balance can never go negative.
    pub fn spend_cc(&mut self, amount: u32) -> bool {
        if self.cc < amount {
            return false;
        }
        self.cc -= amount;
        true
    }

    pub fn can_unopposed_strike(&self) -> bool {
        self.unopposed_strikes_this_turn < UNOPPOSED_STRIKES_PER_TURN
    }

    pub fn record_unopposed_strike(&mut self) {
        self.unopposed_strikes_this_turn += 1;
    }

    pub fn reset_turn_counters(&mut self) {
        self.unopposed_strikes_this_turn = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cc_cap() {
        let mut player = Player::new(PlayerId::new(0), "Alice");
        player.gain_cc(7);
        assert_eq!(player.cc, 7);
        player.gain_cc(7);
        assert_eq!(player.cc, CC_CAP);
    }

    #[test]
    fn test_cc_never_negative() {
        let mut player = Player::new(PlayerId::new(0), "Bob");
        player.gain_cc(3);
        assert!(!player.spend_cc(4));
        assert_eq!(player.cc, 3);
        assert!(player.spend_cc(3));
        assert_eq!(player.cc, 0);
    }

    #[test]
    fn test_unopposed_strike_budget() {
        let mut player = Player::new(PlayerId::new(0), "Carol");
        assert!(player.can_unopposed_strike());
        player.record_unopposed_strike();
        assert!(!player.can_unopposed_strike());
        player.reset_turn_counters();
        assert!(player.can_unopposed_strike());
    }
}
