//! Game initialization from deck lists
//!
//! Builds a ready-to-play two-player game from a template set and two
//! deck lists. All ability strings are validated up front so a malformed
//! description is a configuration error that blocks game start, never a
//! mid-game surprise.

use crate::core::PlayerId;
use crate::effects;
use crate::game::GameState;
use crate::loader::CardTemplate;
use crate::zones::Zone;
use crate::{Result, TussleError};

/// Game builder over a set of card templates
pub struct GameInitializer<'a> {
    templates: &'a [CardTemplate],
}

impl<'a> GameInitializer<'a> {
    pub fn new(templates: &'a [CardTemplate]) -> Self {
        GameInitializer { templates }
    }

    /// Initialize a two-player game from two deck lists (template names).
    /// Every card lands in its owner's hand; player 1 takes the first
    /// turn, and the game is handed back already in its Main phase.
    pub fn init_game(
        &self,
        player1_name: String,
        player1_deck: &[&str],
        player2_name: String,
        player2_deck: &[&str],
        seed: Option<u64>,
    ) -> Result<GameState> {
        self.validate_set()?;

        let mut game = GameState::new_two_player(player1_name, player2_name);
        if let Some(seed) = seed {
            game.seed_rng(seed);
        }

        let player1_id = game.players[0].id;
        let player2_id = game.players[1].id;
        self.load_deck_into_game(&mut game, player1_id, player1_deck)?;
        self.load_deck_into_game(&mut game, player2_id, player2_deck)?;

        if seed.is_some() {
            for player_id in [player1_id, player2_id] {
                let mut rng = game.rng.clone();
                game.zones_mut(player_id)?.hand.shuffle(&mut rng);
                game.rng = rng;
            }
        }

        game.begin_turn()?;
        Ok(game)
    }

    /// Reject the whole set if any template carries an ability string the
    /// registry does not recognize.
    fn validate_set(&self) -> Result<()> {
        for template in self.templates {
            effects::validate_description(&template.ability).map_err(|e| match e {
                TussleError::UnrecognizedEffectKind { token, .. } => {
                    TussleError::UnrecognizedEffectKind {
                        description: format!("{}: {}", template.name, template.ability),
                        token,
                    }
                }
                other => other,
            })?;
        }
        Ok(())
    }

    fn load_deck_into_game(
        &self,
        game: &mut GameState,
        player_id: PlayerId,
        deck: &[&str],
    ) -> Result<()> {
        for name in deck {
            let template = self
                .templates
                .iter()
                .find(|t| t.name == *name)
                .ok_or_else(|| {
                    TussleError::InvalidDeckFormat(format!("unknown card name '{name}'"))
                })?;

            let card_id = game.cards.next_id();
            let card = template.instantiate(card_id, player_id);
            game.cards.insert(card_id, card);
            game.zones_mut(player_id)?.get_zone_mut(Zone::Hand).add(card_id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Phase;
    use crate::loader::sets;

    #[test]
    fn test_init_starter_game() {
        let set = sets::starter_set().unwrap();
        let init = GameInitializer::new(&set);
        let game = init
            .init_game(
                "Alice".to_string(),
                sets::DEMO_DECK,
                "Bob".to_string(),
                sets::DEMO_DECK,
                None,
            )
            .unwrap();

        assert_eq!(game.turn.phase, Phase::Main);
        assert_eq!(game.turn.turn_number, 1);
        for player in &game.players {
            assert_eq!(game.zones(player.id).unwrap().hand.len(), sets::DEMO_DECK.len());
            assert!(game.zones(player.id).unwrap().field.is_empty());
        }
        // Opening-turn CC reduction applies to the first player.
        assert_eq!(game.players[0].cc, crate::core::FIRST_TURN_CC);
        game.check_invariants().unwrap();
    }

    #[test]
    fn test_unknown_deck_entry_rejected() {
        let set = sets::starter_set().unwrap();
        let init = GameInitializer::new(&set);
        let result = init.init_game(
            "Alice".to_string(),
            &["No Such Card"],
            "Bob".to_string(),
            sets::DEMO_DECK,
            None,
        );
        assert!(matches!(result, Err(TussleError::InvalidDeckFormat(_))));
    }

    #[test]
    fn test_malformed_ability_blocks_start() {
        let mut set = sets::starter_set().unwrap();
        set[0].ability = "cont explode +3 own-field".to_string();
        let init = GameInitializer::new(&set);
        let result = init.init_game(
            "Alice".to_string(),
            sets::DEMO_DECK,
            "Bob".to_string(),
            sets::DEMO_DECK,
            None,
        );
        assert!(matches!(
            result,
            Err(TussleError::UnrecognizedEffectKind { .. })
        ));
    }

    #[test]
    fn test_seeded_shuffle_is_reproducible() {
        let set = sets::starter_set().unwrap();
        let init = GameInitializer::new(&set);
        let build = |seed| {
            init.init_game(
                "Alice".to_string(),
                sets::DEMO_DECK,
                "Bob".to_string(),
                sets::DEMO_DECK,
                Some(seed),
            )
            .unwrap()
        };
        let a = build(42);
        let b = build(42);
        let p1 = a.players[0].id;
        assert_eq!(a.zones(p1).unwrap().hand.cards, b.zones(p1).unwrap().hand.cards);
    }
}
