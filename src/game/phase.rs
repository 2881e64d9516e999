//! Turn phases and the turn structure

use crate::core::PlayerId;
use serde::{Deserialize, Serialize};

/// The four phase states of the turn machine.
///
/// Start -> Main -> End -> Start(next player), with an unconditional
/// short-circuit to Finished the moment a winner is recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Start,
    Main,
    End,
    Finished,
}

/// Current turn bookkeeping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnStructure {
    /// Turn number (starts at 1)
    pub turn_number: u32,

    pub phase: Phase,

    /// Whose turn it is
    pub active_player: PlayerId,

    /// Who took the very first turn. The first-turn CC reduction keys off
    /// this.
    pub first_player: PlayerId,
}

impl TurnStructure {
    pub fn new(first_player: PlayerId) -> Self {
        TurnStructure {
            turn_number: 1,
            phase: Phase::Start,
            active_player: first_player,
            first_player,
        }
    }

    /// Is this the opening turn of the whole game?
    pub fn is_opening_turn(&self) -> bool {
        self.turn_number == 1 && self.active_player == self.first_player
    }
}
