//! Main game state structure

use crate::core::{Card, CardId, EntityStore, Player, PlayerId, CC_PER_TURN, FIRST_TURN_CC};
use crate::game::{GameLog, Phase, TurnStructure};
use crate::zones::{PlayerZones, Zone};
use crate::{Result, TussleError};
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use serde::{Deserialize, Serialize};

/// Complete game state.
///
/// Central structure holding all game information for one isolated game
/// instance. Everything needed for identical reconstruction serializes
/// with it; effect objects are never stored, only their authoritative
/// description strings on the cards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// All card instances in the game
    pub cards: EntityStore<Card>,

    /// Both players (Vec for stable ordering)
    pub players: Vec<Player>,

    /// The three zones of each player
    pub player_zones: Vec<(PlayerId, PlayerZones)>,

    /// Turn structure
    pub turn: TurnStructure,

    /// Set exactly once; the game is frozen afterwards
    pub winner: Option<PlayerId>,

    /// Append-only event log
    pub log: GameLog,

    /// RNG for deck setup and demo actors. The rules engine itself never
    /// draws from it, so identical action sequences replay identically.
    pub rng: ChaCha12Rng,
}

impl GameState {
    /// Create an empty two-player game. Player 1 takes the first turn.
    pub fn new_two_player(player1_name: String, player2_name: String) -> Self {
        let p1_id = PlayerId::new(0);
        let p2_id = PlayerId::new(1);

        GameState {
            cards: EntityStore::new(),
            players: vec![Player::new(p1_id, player1_name), Player::new(p2_id, player2_name)],
            player_zones: vec![(p1_id, PlayerZones::new(p1_id)), (p2_id, PlayerZones::new(p2_id))],
            turn: TurnStructure::new(p1_id),
            winner: None,
            log: GameLog::new(),
            rng: ChaCha12Rng::seed_from_u64(0),
        }
    }

    /// Reseed the setup RNG for reproducible games.
    pub fn seed_rng(&mut self, seed: u64) {
        self.rng = ChaCha12Rng::seed_from_u64(seed);
    }

    pub fn is_finished(&self) -> bool {
        self.winner.is_some()
    }

    pub fn get_player(&self, id: PlayerId) -> Result<&Player> {
        self.players
            .iter()
            .find(|p| p.id == id)
            .ok_or(TussleError::EntityNotFound(id.as_u8() as u32))
    }

    pub fn get_player_mut(&mut self, id: PlayerId) -> Result<&mut Player> {
        self.players
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(TussleError::EntityNotFound(id.as_u8() as u32))
    }

    /// The other player in this two-player game.
    pub fn opponent_of(&self, id: PlayerId) -> Result<PlayerId> {
        self.players
            .iter()
            .find(|p| p.id != id)
            .map(|p| p.id)
            .ok_or(TussleError::EntityNotFound(id.as_u8() as u32))
    }

    pub fn zones(&self, player_id: PlayerId) -> Result<&PlayerZones> {
        self.player_zones
            .iter()
            .find(|(id, _)| *id == player_id)
            .map(|(_, zones)| zones)
            .ok_or(TussleError::EntityNotFound(player_id.as_u8() as u32))
    }

    pub fn zones_mut(&mut self, player_id: PlayerId) -> Result<&mut PlayerZones> {
        self.player_zones
            .iter_mut()
            .find(|(id, _)| *id == player_id)
            .map(|(_, zones)| zones)
            .ok_or(TussleError::EntityNotFound(player_id.as_u8() as u32))
    }

    /// Move a card to `to`, out of whichever of its controller's zones
    /// currently holds it. The single zone-transition primitive: keeps
    /// `card.zone` and the zone lists consistent, so a card can never be
    /// in two zones at once.
    pub fn move_card(&mut self, card_id: CardId, to: Zone) -> Result<()> {
        let (from, controller) = {
            let card = self.cards.get(card_id)?;
            (card.zone, card.controller)
        };

        let removed = self.zones_mut(controller)?.get_zone_mut(from).remove(card_id);
        if !removed {
            return Err(TussleError::InvariantViolation(format!(
                "card {card_id} has zone {from:?} but is missing from {controller}'s list"
            )));
        }

        self.zones_mut(controller)?.get_zone_mut(to).add(card_id);
        self.cards.get_mut(card_id)?.zone = to;
        self.log.detail(format!("{card_id} moved {from:?} -> {to:?}"));
        Ok(())
    }

    /// Transfer control of a field card to `new_controller`, re-homing it
    /// into the new controller's field zone in the same step.
    pub fn transfer_control(&mut self, card_id: CardId, new_controller: PlayerId) -> Result<()> {
        let (zone, old_controller, name) = {
            let card = self.cards.get(card_id)?;
            (card.zone, card.controller, card.name.clone())
        };
        if old_controller == new_controller {
            return Ok(());
        }
        if zone != Zone::Field {
            return Err(TussleError::StaleTarget(format!(
                "control transfer target {card_id} is not on the field"
            )));
        }

        let removed = self
            .zones_mut(old_controller)?
            .get_zone_mut(Zone::Field)
            .remove(card_id);
        if !removed {
            return Err(TussleError::InvariantViolation(format!(
                "field card {card_id} missing from {old_controller}'s field list"
            )));
        }
        self.zones_mut(new_controller)?
            .get_zone_mut(Zone::Field)
            .add(card_id);
        self.cards.get_mut(card_id)?.controller = new_controller;
        self.log
            .event(format!("{name} {card_id} is now controlled by {new_controller}"));
        Ok(())
    }

    /// CC to grant the active player at the start of this turn.
    pub fn turn_cc_grant(&self) -> u32 {
        if self.turn.is_opening_turn() {
            FIRST_TURN_CC
        } else {
            CC_PER_TURN
        }
    }

    /// Start phase: grant CC (clamped), reset per-turn counters, run the
    /// checker, then hand control to Main.
    pub fn begin_turn(&mut self) -> Result<()> {
        if self.is_finished() {
            return Ok(());
        }
        let grant = self.turn_cc_grant();
        let active = self.turn.active_player;
        let turn_number = self.turn.turn_number;
        {
            let player = self.get_player_mut(active)?;
            player.gain_cc(grant);
            player.reset_turn_counters();
        }
        let cc = self.get_player(active)?.cc;
        self.log
            .event(format!("Turn {turn_number}: {active} gains {grant} CC ({cc} total)"));

        crate::game::checker::run_state_based_actions(self)?;
        if !self.is_finished() {
            self.turn.phase = Phase::Main;
        }
        Ok(())
    }

    /// End the active player's turn and begin the opponent's: End phase,
    /// turn counter bump, player swap, then the next Start phase.
    pub fn advance_phase(&mut self) -> Result<()> {
        if self.is_finished() {
            return Err(TussleError::IllegalAction("game is finished".to_string()));
        }
        if self.turn.phase != Phase::Main {
            return Err(TussleError::IllegalAction(format!(
                "cannot end turn during {:?} phase",
                self.turn.phase
            )));
        }

        self.turn.phase = Phase::End;
        let next = self.opponent_of(self.turn.active_player)?;
        self.log
            .event(format!("{} ends turn {}", self.turn.active_player, self.turn.turn_number));

        crate::game::checker::run_state_based_actions(self)?;
        if self.is_finished() {
            return Ok(());
        }

        self.turn.turn_number += 1;
        self.turn.active_player = next;
        self.turn.phase = Phase::Start;
        self.begin_turn()
    }

    /// Record the winner and freeze the game. Idempotent on the first
    /// winner: later calls with a different player are a defect.
    pub fn set_winner(&mut self, winner: PlayerId) -> Result<()> {
        match self.winner {
            None => {
                self.winner = Some(winner);
                self.turn.phase = Phase::Finished;
                self.log.event(format!("{winner} wins the game"));
                Ok(())
            }
            Some(existing) if existing == winner => Ok(()),
            Some(existing) => Err(TussleError::InvariantViolation(format!(
                "winner already recorded as {existing}, cannot set {winner}"
            ))),
        }
    }

    /// Debug/test helper: verify the cross-structure invariants hold.
    pub fn check_invariants(&self) -> Result<()> {
        for (card_id, card) in self.cards.iter() {
            let mut holders = 0;
            for (player_id, zones) in &self.player_zones {
                for zone in [Zone::Hand, Zone::Field, Zone::Inactive] {
                    if zones.get_zone(zone).contains(*card_id) {
                        holders += 1;
                        if zone != card.zone || *player_id != card.controller {
                            return Err(TussleError::InvariantViolation(format!(
                                "card {card_id} tagged {:?}/{} but held by {player_id}'s {zone:?}",
                                card.zone, card.controller
                            )));
                        }
                    }
                }
            }
            if holders != 1 {
                return Err(TussleError::InvariantViolation(format!(
                    "card {card_id} held by {holders} zones"
                )));
            }
            if card.current_stamina < 0 {
                return Err(TussleError::InvariantViolation(format!(
                    "card {card_id} has negative stamina"
                )));
            }
        }
        for player in &self.players {
            if player.cc > crate::core::CC_CAP {
                return Err(TussleError::InvariantViolation(format!(
                    "{} holds {} CC, above the cap",
                    player.id, player.cc
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with_card() -> (GameState, CardId) {
        let mut game = GameState::new_two_player("P1".to_string(), "P2".to_string());
        let p1 = game.players[0].id;
        let id = game.cards.next_id();
        let card = Card::new(id, "Test".to_string(), p1);
        game.cards.insert(id, card);
        game.zones_mut(p1).unwrap().hand.add(id);
        (game, id)
    }

    #[test]
    fn test_move_card_keeps_invariants() {
        let (mut game, id) = state_with_card();
        game.check_invariants().unwrap();

        game.move_card(id, Zone::Field).unwrap();
        assert_eq!(game.cards.get(id).unwrap().zone, Zone::Field);
        game.check_invariants().unwrap();

        game.move_card(id, Zone::Inactive).unwrap();
        assert_eq!(game.cards.get(id).unwrap().zone, Zone::Inactive);
        game.check_invariants().unwrap();
    }

    #[test]
    fn test_transfer_control_rehomes_field_card() {
        let (mut game, id) = state_with_card();
        let p1 = game.players[0].id;
        let p2 = game.players[1].id;

        game.move_card(id, Zone::Field).unwrap();
        game.transfer_control(id, p2).unwrap();

        assert_eq!(game.cards.get(id).unwrap().controller, p2);
        assert!(game.zones(p2).unwrap().field.contains(id));
        assert!(!game.zones(p1).unwrap().field.contains(id));
        game.check_invariants().unwrap();
    }

    #[test]
    fn test_transfer_control_from_hand_is_stale() {
        let (mut game, id) = state_with_card();
        let p2 = game.players[1].id;
        assert!(matches!(
            game.transfer_control(id, p2),
            Err(TussleError::StaleTarget(_))
        ));
    }

    #[test]
    fn test_first_turn_cc_reduction() {
        let game = GameState::new_two_player("P1".to_string(), "P2".to_string());
        assert_eq!(game.turn_cc_grant(), FIRST_TURN_CC);

        let mut later = game.clone();
        later.turn.turn_number = 2;
        later.turn.active_player = later.players[1].id;
        assert_eq!(later.turn_cc_grant(), CC_PER_TURN);
    }

    #[test]
    fn test_winner_freeze() {
        let mut game = GameState::new_two_player("P1".to_string(), "P2".to_string());
        let p1 = game.players[0].id;
        let p2 = game.players[1].id;

        game.set_winner(p1).unwrap();
        assert_eq!(game.turn.phase, Phase::Finished);
        assert!(game.set_winner(p1).is_ok());
        assert!(matches!(
            game.set_winner(p2),
            Err(TussleError::InvariantViolation(_))
        ));
        assert!(matches!(
            game.advance_phase(),
            Err(TussleError::IllegalAction(_))
        ));
    }
}
