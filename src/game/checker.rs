//! State-based action checker
//!
//! Runs after every mutating action and every phase transition, repeating
//! until a fixed point so chained defeats cascade correctly. Check order
//! is fixed: defeat sweeps first, then the victory condition.

use crate::core::{CardId, Stat};
use crate::effects::{self, Ability, TriggerEvent};
use crate::game::GameState;
use crate::stats;
use crate::zones::Zone;
use crate::Result;

/// Run the automatic checks to a fixed point. Safe to call redundantly;
/// a no-op on an already-settled or finished state.
pub fn run_state_based_actions(state: &mut GameState) -> Result<()> {
    loop {
        if state.is_finished() {
            return Ok(());
        }

        clamp_to_effective_stamina(state)?;
        let defeated = sweep_defeated(state)?;
        for card_id in &defeated {
            fire_defeat_triggers(state, *card_id)?;
        }

        let winner_found = check_victory(state)?;

        // Fixed point: nothing moved and nobody won.
        if defeated.is_empty() && !winner_found {
            state.log.detail("checker pass: no change".to_string());
            return Ok(());
        }
    }
}

/// Pull every field card's current stamina back under its effective
/// stamina. The cap moves whenever a continuous stamina contribution
/// appears or disappears (a buff's source leaving the field, a debuff
/// entering); cards clamped to zero are picked up by the defeat sweep in
/// the same pass.
fn clamp_to_effective_stamina(state: &mut GameState) -> Result<()> {
    let player_ids: Vec<_> = state.players.iter().map(|p| p.id).collect();
    for player_id in player_ids {
        let field: Vec<CardId> = state.zones(player_id)?.field.cards.clone();
        for card_id in field {
            let cap = stats::effective_stat(state, card_id, Stat::Stamina)?.max(0);
            let clamped = {
                let card = state.cards.get_mut(card_id)?;
                if card.current_stamina > cap {
                    card.current_stamina = cap;
                    true
                } else {
                    false
                }
            };
            if clamped {
                state
                    .log
                    .detail(format!("{card_id} stamina clamped to {cap}"));
            }
        }
    }
    Ok(())
}

/// Move every field card at zero stamina to its controller's Inactive
/// zone. Returns the swept cards so their on-defeat triggers can fire.
fn sweep_defeated(state: &mut GameState) -> Result<Vec<CardId>> {
    let mut defeated = Vec::new();
    let player_ids: Vec<_> = state.players.iter().map(|p| p.id).collect();
    for player_id in player_ids {
        let at_zero: Vec<CardId> = state
            .zones(player_id)?
            .field
            .cards
            .iter()
            .copied()
            .filter(|&id| {
                state
                    .cards
                    .get(id)
                    .map(|c| c.current_stamina <= 0)
                    .unwrap_or(false)
            })
            .collect();
        for card_id in at_zero {
            let name = state.cards.get(card_id)?.name.clone();
            state.move_card(card_id, Zone::Inactive)?;
            state.log.event(format!("{name} {card_id} is defeated"));
            defeated.push(card_id);
        }
    }
    Ok(defeated)
}

/// Broadcast the defeat of `subject` to every card's triggered abilities.
/// A card's own triggers still fire for its own defeat even though it has
/// just left the field.
fn fire_defeat_triggers(state: &mut GameState, subject: CardId) -> Result<()> {
    let mut to_fire = Vec::new();
    let card_ids: Vec<CardId> = state.cards.iter().map(|(id, _)| *id).collect();
    for card_id in card_ids {
        let card = state.cards.get(card_id)?;
        // Triggers listen from the field, or from the defeated card itself.
        if card.zone != Zone::Field && card_id != subject {
            continue;
        }
        for ability in effects::abilities_for_card(card)? {
            if let Ability::Triggered(trigger) = ability {
                if trigger.event != TriggerEvent::OnDefeat {
                    continue;
                }
                if trigger.self_only && subject != card_id {
                    continue;
                }
                to_fire.push((card_id, card.controller, trigger));
            }
        }
    }

    // Deterministic firing order: card id.
    to_fire.sort_by_key(|(id, _, _)| *id);
    for (card_id, controller, trigger) in to_fire {
        state
            .log
            .detail(format!("on-defeat trigger of {card_id} fires"));
        trigger.action.apply(state, card_id, controller, &[])?;
    }
    Ok(())
}

/// A player with an empty hand and an empty field immediately loses.
fn check_victory(state: &mut GameState) -> Result<bool> {
    let player_ids: Vec<_> = state.players.iter().map(|p| p.id).collect();
    for player_id in player_ids {
        let zones = state.zones(player_id)?;
        if zones.hand.is_empty() && zones.field.is_empty() {
            let opponent = state.opponent_of(player_id)?;
            state
                .log
                .event(format!("{player_id} has no cards left in hand or field"));
            state.set_winner(opponent)?;
            return Ok(true);
        }
    }
    Ok(false)
}
