//! Tussle resolution
//!
//! One attack between two field cards, or an unopposed strike against an
//! empty field. Rule overrides (tussle-win) and their immunity counter
//! (tussle-guard) are consulted through the effect registry; the resolver
//! never checks card identities.

use crate::core::{CardId, PlayerId, Stat};
use crate::effects::{self, Ability, ContinuousEffect, ContinuousOp, StrikePickRule};
use crate::game::GameState;
use crate::stats;
use crate::zones::Zone;
use crate::{Result, TussleError};
use smallvec::SmallVec;

/// Speed bonus for the attacker, only on its controller's own turn.
pub const INITIATIVE_BONUS: i32 = 1;

/// Cards whose stamina reached zero during a tussle, in strike order.
/// Handed to the state-based action checker for zone transitions.
#[derive(Debug, Clone, Default)]
pub struct TussleOutcome {
    pub defeated: SmallVec<[CardId; 2]>,
}

/// Pure prediction of an opposed tussle, used by the validator's
/// quality-of-decision filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TusslePrediction {
    pub attacker_defeated: bool,
    pub defender_defeated: bool,
}

/// Effective speed for strike ordering. The initiative bonus applies only
/// to the attacker, and only when the tussle happens on its controller's
/// turn - never to a defender.
pub fn effective_speed(state: &GameState, card_id: CardId, is_attacker: bool) -> Result<i32> {
    let base = stats::effective_stat(state, card_id, Stat::Speed)?;
    let controller = state.cards.get(card_id)?.controller;
    let bonus = if is_attacker && state.turn.active_player == controller {
        INITIATIVE_BONUS
    } else {
        0
    };
    Ok(base + bonus)
}

/// Does the attacker strike strictly first by rule override?
///
/// A tussle-win effect only bites on its controller's own turn, and an
/// opposing tussle-guard explicitly defeats it.
fn attacker_wins_by_override(
    state: &GameState,
    attacker: CardId,
    defender: CardId,
) -> Result<bool> {
    let attacker_controller = state.cards.get(attacker)?.controller;
    if state.turn.active_player != attacker_controller {
        return Ok(false);
    }
    if !stats::has_active_op(state, attacker, ContinuousOp::TussleWin)? {
        return Ok(false);
    }
    if stats::has_active_op(state, defender, ContinuousOp::TussleGuard)? {
        return Ok(false);
    }
    Ok(true)
}

/// Strike order decided for one tussle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StrikeOrder {
    AttackerFirst,
    DefenderFirst,
    Simultaneous,
}

fn strike_order(state: &GameState, attacker: CardId, defender: CardId) -> Result<StrikeOrder> {
    if attacker_wins_by_override(state, attacker, defender)? {
        return Ok(StrikeOrder::AttackerFirst);
    }
    let attacker_speed = effective_speed(state, attacker, true)?;
    let defender_speed = effective_speed(state, defender, false)?;
    Ok(match attacker_speed.cmp(&defender_speed) {
        std::cmp::Ordering::Greater => StrikeOrder::AttackerFirst,
        std::cmp::Ordering::Less => StrikeOrder::DefenderFirst,
        std::cmp::Ordering::Equal => StrikeOrder::Simultaneous,
    })
}

/// Damage one striker would deal right now: its effective strength, but
/// only if that strength is strictly positive.
fn strike_damage(state: &GameState, striker: CardId) -> Result<i32> {
    let strength = stats::effective_stat(state, striker, Stat::Strength)?;
    Ok(strength.max(0))
}

fn apply_damage(state: &mut GameState, receiver: CardId, damage: i32) -> Result<bool> {
    let (name, remaining) = {
        let card = state.cards.get_mut(receiver)?;
        card.current_stamina = (card.current_stamina - damage).max(0);
        (card.name.clone(), card.current_stamina)
    };
    state.log.event(format!(
        "{name} {receiver} takes {damage} tussle damage ({remaining} stamina left)"
    ));
    Ok(remaining == 0)
}

/// Resolve one opposed tussle. Preconditions (attacker on the active
/// player's field, positive strength) are the validator's to enforce;
/// this re-checks the cheap structural ones and trusts the rest.
pub fn resolve_tussle(
    state: &mut GameState,
    attacker: CardId,
    defender: CardId,
) -> Result<TussleOutcome> {
    let attacker_card = state.cards.get(attacker)?;
    if attacker_card.zone != Zone::Field {
        return Err(TussleError::StaleTarget(format!(
            "attacker {attacker} is not on the field"
        )));
    }
    if state.cards.get(defender)?.zone != Zone::Field {
        return Err(TussleError::StaleTarget(format!(
            "defender {defender} is not on the field"
        )));
    }

    let attacker_name = state.cards.get(attacker)?.name.clone();
    let defender_name = state.cards.get(defender)?.name.clone();
    state.log.event(format!(
        "{attacker_name} {attacker} tussles with {defender_name} {defender}"
    ));

    let order = strike_order(state, attacker, defender)?;
    let mut outcome = TussleOutcome::default();

    match order {
        StrikeOrder::Simultaneous => {
            // Both damage values come from pre-strike stats; neither side
            // sees the other's damage already applied.
            let to_defender = strike_damage(state, attacker)?;
            let to_attacker = strike_damage(state, defender)?;
            if apply_damage(state, defender, to_defender)? {
                outcome.defeated.push(defender);
            }
            if apply_damage(state, attacker, to_attacker)? {
                outcome.defeated.push(attacker);
            }
        }
        StrikeOrder::AttackerFirst | StrikeOrder::DefenderFirst => {
            let (first, second) = match order {
                StrikeOrder::AttackerFirst => (attacker, defender),
                _ => (defender, attacker),
            };
            let damage = strike_damage(state, first)?;
            let second_down = apply_damage(state, second, damage)?;
            if second_down {
                outcome.defeated.push(second);
            } else {
                // Survivor strikes back, with stats as they stand now.
                let damage = strike_damage(state, second)?;
                if apply_damage(state, first, damage)? {
                    outcome.defeated.push(first);
                }
            }
        }
    }

    Ok(outcome)
}

/// Pure dry run of [`resolve_tussle`]: same arithmetic, no mutation.
pub fn predict(state: &GameState, attacker: CardId, defender: CardId) -> Result<TusslePrediction> {
    let order = strike_order(state, attacker, defender)?;
    let attacker_stamina = state.cards.get(attacker)?.current_stamina;
    let defender_stamina = state.cards.get(defender)?.current_stamina;
    let attacker_damage = strike_damage(state, attacker)?;
    let defender_damage = strike_damage(state, defender)?;

    Ok(match order {
        StrikeOrder::Simultaneous => TusslePrediction {
            attacker_defeated: attacker_stamina <= defender_damage,
            defender_defeated: defender_stamina <= attacker_damage,
        },
        StrikeOrder::AttackerFirst => {
            let defender_defeated = defender_stamina <= attacker_damage;
            TusslePrediction {
                attacker_defeated: !defender_defeated && attacker_stamina <= defender_damage,
                defender_defeated,
            }
        }
        StrikeOrder::DefenderFirst => {
            let attacker_defeated = attacker_stamina <= defender_damage;
            TusslePrediction {
                attacker_defeated,
                defender_defeated: !attacker_defeated && defender_stamina <= attacker_damage,
            }
        }
    })
}

/// Which hand card an unopposed strike forces out of `defender`'s hand.
/// Defaults to the front of the ordered hand; a strike-pick continuous op
/// on the attacker selects differently.
fn pick_struck_hand_card(
    state: &GameState,
    attacker: CardId,
    defender: PlayerId,
) -> Result<Option<CardId>> {
    let hand = &state.zones(defender)?.hand;
    if hand.is_empty() {
        return Ok(None);
    }

    let mut rule = StrikePickRule::First;
    for ability in effects::abilities_for_card(state.cards.get(attacker)?)? {
        if let Ability::Continuous(ContinuousEffect {
            op: ContinuousOp::StrikePick(r),
            ..
        }) = ability
        {
            rule = r;
        }
    }

    Ok(match rule {
        StrikePickRule::First => hand.front(),
        StrikePickRule::Costliest => {
            let mut best: Option<(CardId, u32)> = None;
            for &id in &hand.cards {
                let cost = state.cards.get(id)?.base_cost;
                if best.map_or(true, |(_, c)| cost > c) {
                    best = Some((id, cost));
                }
            }
            best.map(|(id, _)| id)
        }
    })
}

/// Resolve an unopposed strike: no stat arithmetic, one card forced out
/// of the defending player's hand to Inactive. Legal only when the
/// defender controls zero field cards, and budgeted per attacking player
/// per turn.
pub fn resolve_unopposed_strike(state: &mut GameState, attacker: CardId) -> Result<Option<CardId>> {
    let attacker_controller = state.cards.get(attacker)?.controller;
    let defender = state.opponent_of(attacker_controller)?;

    if !state.zones(defender)?.field.is_empty() {
        return Err(TussleError::IllegalAction(
            "unopposed strike requires an empty defending field".to_string(),
        ));
    }
    if !state.get_player(attacker_controller)?.can_unopposed_strike() {
        return Err(TussleError::IllegalAction(
            "unopposed strike budget for this turn is spent".to_string(),
        ));
    }

    let struck = pick_struck_hand_card(state, attacker, defender)?;
    state
        .get_player_mut(attacker_controller)?
        .record_unopposed_strike();

    if let Some(card_id) = struck {
        let name = state.cards.get(card_id)?.name.clone();
        state.move_card(card_id, Zone::Inactive)?;
        state.log.event(format!(
            "unopposed strike forces {name} {card_id} out of {defender}'s hand"
        ));
    } else {
        state
            .log
            .event(format!("unopposed strike against {defender} finds an empty hand"));
    }

    Ok(struck)
}
