//! Action executor
//!
//! Performs exactly one previously validated candidate. Everything is
//! re-checked against current state before the first mutation: the
//! candidate against a fresh enumeration (IllegalAction on mismatch) and
//! the chosen targets against the effect's current target spec
//! (StaleTarget on mismatch). No rollback machinery exists because
//! nothing mutates until validation has fully passed.

use crate::core::{CardCategory, CardId, PlayerId, Stat};
use crate::effects::{self, Ability, TargetSpec, TriggerEvent};
use crate::game::{checker, combat, validator, Candidate, GameState};
use crate::stats;
use crate::zones::Zone;
use crate::{Result, TussleError};

/// What one successful execution did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionReport {
    /// Human-readable description, also appended to the game log
    pub description: String,

    /// Field cards defeated as a consequence (including checker
    /// cascades). Cards that leave play without being defeated, like a
    /// resolved instantaneous or a hand card forced out by an unopposed
    /// strike, are not listed.
    pub defeated: Vec<CardId>,

    /// Winner, if this action ended the game
    pub winner: Option<PlayerId>,
}

/// Execute one candidate for the active player. Not idempotent: each
/// successful call mutates state exactly once. After any failure the
/// caller must re-enumerate before retrying.
pub fn execute(
    state: &mut GameState,
    candidate: &Candidate,
    chosen_targets: &[CardId],
) -> Result<ExecutionReport> {
    if state.is_finished() {
        return Err(TussleError::IllegalAction("game is finished".to_string()));
    }
    let acting_player = state.turn.active_player;

    // Fresh enumeration is the only legality authority. The fresh twin
    // also carries current derived data (effective cost, target spec),
    // which is what actually gets charged and checked.
    let fresh = validator::enumerate_legal_actions(state, acting_player)?
        .into_iter()
        .find(|c| c.same_move(candidate))
        .ok_or_else(|| {
            TussleError::IllegalAction(format!("candidate {candidate:?} is not currently legal"))
        })?;

    let fields_before = field_cards(state)?;

    let description = match &fresh {
        Candidate::PlayCard {
            card_id,
            effective_cost,
            targeting,
        } => {
            validate_targets(targeting.as_ref(), chosen_targets)?;
            play_card(state, acting_player, *card_id, *effective_cost, chosen_targets)?
        }
        Candidate::Tussle { attacker, defender } => {
            if !chosen_targets.is_empty() {
                return Err(TussleError::StaleTarget(
                    "tussle candidates do not take chosen targets".to_string(),
                ));
            }
            match defender {
                Some(defender) => {
                    combat::resolve_tussle(state, *attacker, *defender)?;
                    format!("{attacker} tussles with {defender}")
                }
                None => {
                    combat::resolve_unopposed_strike(state, *attacker)?;
                    format!("{attacker} lands an unopposed strike")
                }
            }
        }
        Candidate::Activate {
            card_id,
            ability_index,
            cost,
            targeting,
        } => {
            validate_targets(targeting.as_ref(), chosen_targets)?;
            activate_ability(
                state,
                acting_player,
                *card_id,
                *ability_index,
                *cost,
                chosen_targets,
            )?
        }
        Candidate::EndTurn => {
            state.advance_phase()?;
            return Ok(ExecutionReport {
                description: "turn ended".to_string(),
                defeated: Vec::new(),
                winner: state.winner,
            });
        }
    };

    checker::run_state_based_actions(state)?;
    state.check_invariants()?;

    Ok(ExecutionReport {
        description,
        defeated: defeated_since(state, &fields_before)?,
        winner: state.winner,
    })
}

/// Chosen targets must match the candidate's current spec exactly: all
/// drawn from the legal set, within min..=max, no duplicates.
fn validate_targets(spec: Option<&TargetSpec>, chosen: &[CardId]) -> Result<()> {
    match spec {
        None => {
            if chosen.is_empty() {
                Ok(())
            } else {
                Err(TussleError::StaleTarget(
                    "targets supplied for an untargeted action".to_string(),
                ))
            }
        }
        Some(spec) => {
            if chosen.len() < spec.min || chosen.len() > spec.max {
                return Err(TussleError::StaleTarget(format!(
                    "expected {}..={} targets, got {}",
                    spec.min,
                    spec.max,
                    chosen.len()
                )));
            }
            for (i, target) in chosen.iter().enumerate() {
                if !spec.legal.contains(target) {
                    return Err(TussleError::StaleTarget(format!(
                        "target {target} is no longer valid"
                    )));
                }
                if chosen[..i].contains(target) {
                    return Err(TussleError::StaleTarget(format!(
                        "target {target} chosen twice"
                    )));
                }
            }
            Ok(())
        }
    }
}

fn spend_validated_cc(state: &mut GameState, player: PlayerId, cost: u32) -> Result<()> {
    // The fresh enumeration already proved the balance sufficient, so a
    // failed spend here is a validator/executor contract breach.
    if !state.get_player_mut(player)?.spend_cc(cost) {
        return Err(TussleError::InvariantViolation(format!(
            "validated candidate cost {cost} exceeds {player}'s CC balance"
        )));
    }
    Ok(())
}

fn play_card(
    state: &mut GameState,
    player: PlayerId,
    card_id: CardId,
    cost: u32,
    chosen_targets: &[CardId],
) -> Result<String> {
    spend_validated_cc(state, player, cost)?;

    let (name, category) = {
        let card = state.cards.get(card_id)?;
        (card.name.clone(), card.category)
    };

    let description = match category {
        CardCategory::Field => {
            state.move_card(card_id, Zone::Field)?;
            // Enters at full effective stamina, other cards' continuous
            // buffs included.
            let cap = stats::effective_stat(state, card_id, Stat::Stamina)?;
            state.cards.get_mut(card_id)?.current_stamina = cap;
            format!("{player} plays {name} {card_id} to the field ({cost} CC)")
        }
        CardCategory::Instantaneous => {
            // Resolve the instant effect, then the card deactivates.
            let abilities = effects::abilities_for_card(state.cards.get(card_id)?)?;
            for ability in &abilities {
                if let Ability::Instant(instant) = ability {
                    instant.action.apply(state, card_id, player, chosen_targets)?;
                }
            }
            state.move_card(card_id, Zone::Inactive)?;
            format!("{player} resolves {name} {card_id} ({cost} CC)")
        }
    };

    state.log.event(description.clone());
    fire_play_triggers(state, card_id)?;
    Ok(description)
}

/// Broadcast the play event to triggered abilities listening for it.
fn fire_play_triggers(state: &mut GameState, subject: CardId) -> Result<()> {
    let mut to_fire = Vec::new();
    let card_ids: Vec<CardId> = state.cards.iter().map(|(id, _)| *id).collect();
    for card_id in card_ids {
        let card = state.cards.get(card_id)?;
        if card.zone != Zone::Field {
            continue;
        }
        for ability in effects::abilities_for_card(card)? {
            if let Ability::Triggered(trigger) = ability {
                if trigger.event != TriggerEvent::OnPlay {
                    continue;
                }
                if trigger.self_only && subject != card_id {
                    continue;
                }
                to_fire.push((card_id, card.controller, trigger));
            }
        }
    }
    to_fire.sort_by_key(|(id, _, _)| *id);
    for (card_id, controller, trigger) in to_fire {
        state.log.detail(format!("on-play trigger of {card_id} fires"));
        trigger.action.apply(state, card_id, controller, &[])?;
    }
    Ok(())
}

fn activate_ability(
    state: &mut GameState,
    player: PlayerId,
    card_id: CardId,
    ability_index: usize,
    cost: u32,
    chosen_targets: &[CardId],
) -> Result<String> {
    let abilities = effects::abilities_for_card(state.cards.get(card_id)?)?;
    let activated = match abilities.get(ability_index) {
        Some(Ability::Activated(a)) => *a,
        _ => {
            return Err(TussleError::IllegalAction(format!(
                "card {card_id} has no activated ability at index {ability_index}"
            )))
        }
    };

    spend_validated_cc(state, player, cost)?;
    activated.action.apply(state, card_id, player, chosen_targets)?;

    let name = state.cards.get(card_id)?.name.clone();
    let description = format!("{player} activates {name} {card_id} ({cost} CC)");
    state.log.event(description.clone());
    Ok(description)
}

fn field_cards(state: &GameState) -> Result<Vec<CardId>> {
    let mut out = Vec::new();
    for player in &state.players {
        out.extend_from_slice(&state.zones(player.id)?.field.cards);
    }
    Ok(out)
}

/// Defeated means: was on a field when the action started, sits in an
/// Inactive zone now.
fn defeated_since(state: &GameState, fields_before: &[CardId]) -> Result<Vec<CardId>> {
    let mut out = Vec::new();
    for &id in fields_before {
        if state.cards.get(id)?.zone == Zone::Inactive {
            out.push(id);
        }
    }
    Ok(out)
}
