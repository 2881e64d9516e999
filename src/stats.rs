//! Stat and cost resolution
//!
//! Effective values are computed fresh on every query by folding the
//! continuous contributions of every card currently on either field over
//! the card's base stat and its instance modification list. All
//! contributions are additive integer deltas, so application order is
//! never rule-significant; introducing a multiplicative or clamping
//! contribution would require an explicit ordering rule first.

use crate::core::{CardId, PlayerId, Stat};
use crate::effects::{self, Ability, ContinuousEffect, ContinuousOp, TargetSel, TargetScope};
use crate::game::GameState;
use crate::zones::Zone;
use crate::Result;

/// Effective value of one stat for one card. Pure and re-entrant: two
/// calls with no intervening mutation return the same value.
pub fn effective_stat(state: &GameState, card_id: CardId, stat: Stat) -> Result<i32> {
    let card = state.cards.get(card_id)?;
    let mut value = card.base_stat(stat) + card.stat_mod_total(stat);

    for continuous in active_continuous_effects(state)? {
        if let ContinuousOp::StatDelta {
            stat: delta_stat,
            amount,
            target,
            per_inactive,
        } = continuous.op
        {
            if delta_stat != stat {
                continue;
            }
            if !covers(state, &continuous, target, card_id)? {
                continue;
            }
            value += scaled(state, &continuous, amount, per_inactive)?;
        }
    }

    Ok(value)
}

/// Effective CC cost to play `card_id` from hand, or None when a cost
/// modifier's own precondition makes the play illegal right now. Folds
/// the card's own cost-modifying continuous effects (active from hand)
/// and floors at zero.
pub fn effective_cost(state: &GameState, card_id: CardId) -> Result<Option<u32>> {
    let card = state.cards.get(card_id)?;
    let mut cost = card.base_cost as i32;

    for ability in effects::abilities_for_card(card)? {
        if let Ability::Continuous(ContinuousEffect {
            op:
                ContinuousOp::CostDelta {
                    amount,
                    per_inactive,
                    not_turn_one,
                },
            ..
        }) = ability
        {
            if not_turn_one && state.turn.turn_number == 1 {
                return Ok(None);
            }
            let scale = if per_inactive {
                state.zones(card.controller)?.inactive.len() as i32
            } else {
                1
            };
            cost += amount * scale;
        }
    }

    Ok(Some(cost.max(0) as u32))
}

/// All continuous effects whose source card is currently on a field.
pub fn active_continuous_effects(state: &GameState) -> Result<Vec<ContinuousEffect>> {
    let mut out = Vec::new();
    for player in &state.players {
        for &card_id in &state.zones(player.id)?.field.cards {
            let card = state.cards.get(card_id)?;
            for ability in effects::abilities_for_card(card)? {
                if let Ability::Continuous(continuous) = ability {
                    out.push(continuous);
                }
            }
        }
    }
    Ok(out)
}

/// Does an active continuous effect of `source` with tussle-override
/// semantics apply? Consulted by the combat resolver.
pub fn has_active_op(state: &GameState, card_id: CardId, wanted: ContinuousOp) -> Result<bool> {
    let card = state.cards.get(card_id)?;
    if card.zone != Zone::Field {
        return Ok(false);
    }
    for ability in effects::abilities_for_card(card)? {
        if let Ability::Continuous(ContinuousEffect { op, .. }) = ability {
            if op == wanted {
                return Ok(true);
            }
        }
    }
    Ok(false)
}

fn covers(
    state: &GameState,
    continuous: &ContinuousEffect,
    target: TargetSel,
    card_id: CardId,
) -> Result<bool> {
    let source_controller = state.cards.get(continuous.source)?.controller;
    let card = state.cards.get(card_id)?;
    Ok(match target {
        TargetSel::SelfCard => card_id == continuous.source,
        TargetSel::AllIn(TargetScope::OwnField) => {
            card.zone == Zone::Field && card.controller == source_controller
        }
        TargetSel::AllIn(TargetScope::EnemyField) => {
            card.zone == Zone::Field && card.controller != source_controller
        }
        TargetSel::AllIn(TargetScope::AnyField) => card.zone == Zone::Field,
        // Continuous deltas never cover hands, inactive zones, or
        // caller-chosen selections.
        _ => false,
    })
}

fn scaled(
    state: &GameState,
    continuous: &ContinuousEffect,
    amount: i32,
    per_inactive: bool,
) -> Result<i32> {
    if !per_inactive {
        return Ok(amount);
    }
    let controller: PlayerId = state.cards.get(continuous.source)?.controller;
    Ok(amount * state.zones(controller)?.inactive.len() as i32)
}
