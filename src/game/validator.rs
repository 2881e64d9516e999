//! Action validator
//!
//! The single authoritative source of legal moves. The human-facing
//! frontend and the automated actor both call
//! [`enumerate_legal_actions`]; neither has a private legality path, so
//! the two can never diverge on rule interpretation. Pure: safe to call
//! repeatedly and speculatively.

use crate::core::{CardId, PlayerId, Stat};
use crate::effects::{self, Ability, TargetSpec};
use crate::game::{combat, GameState, Phase};
use crate::stats;
use crate::Result;

/// One legal move the acting player could submit to the executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidate {
    /// Play a card from hand, paying its effective cost. Targeting is
    /// attached when the card's resolved ability needs targets.
    PlayCard {
        card_id: CardId,
        effective_cost: u32,
        targeting: Option<TargetSpec>,
    },

    /// Initiate a tussle. `defender: None` is an unopposed strike,
    /// offered only against an empty defending field.
    Tussle {
        attacker: CardId,
        defender: Option<CardId>,
    },

    /// Pay an activated ability's cost and resolve it. Repeatable within
    /// a turn while CC lasts; re-enumerate after each execution.
    Activate {
        card_id: CardId,
        ability_index: usize,
        cost: u32,
        targeting: Option<TargetSpec>,
    },

    /// Hand the turn to the opponent.
    EndTurn,
}

impl Candidate {
    /// Same move modulo derived data (cost, target sets)? Used by the
    /// executor to match a submitted candidate against a fresh
    /// enumeration.
    pub fn same_move(&self, other: &Candidate) -> bool {
        match (self, other) {
            (
                Candidate::PlayCard { card_id: a, .. },
                Candidate::PlayCard { card_id: b, .. },
            ) => a == b,
            (
                Candidate::Tussle {
                    attacker: a,
                    defender: ad,
                },
                Candidate::Tussle {
                    attacker: b,
                    defender: bd,
                },
            ) => a == b && ad == bd,
            (
                Candidate::Activate {
                    card_id: a,
                    ability_index: ai,
                    ..
                },
                Candidate::Activate {
                    card_id: b,
                    ability_index: bi,
                    ..
                },
            ) => a == b && ai == bi,
            (Candidate::EndTurn, Candidate::EndTurn) => true,
            _ => false,
        }
    }
}

/// Enumerate everything `acting_player` may legally do right now.
///
/// Empty when the game is finished, when it is not the acting player's
/// turn, or outside the Main phase - those callers have nothing legal to
/// submit. Otherwise the list always contains at least EndTurn.
pub fn enumerate_legal_actions(state: &GameState, acting_player: PlayerId) -> Result<Vec<Candidate>> {
    if state.is_finished()
        || state.turn.active_player != acting_player
        || state.turn.phase != Phase::Main
    {
        return Ok(Vec::new());
    }

    let mut candidates = Vec::new();
    collect_play_candidates(state, acting_player, &mut candidates)?;
    collect_tussle_candidates(state, acting_player, &mut candidates)?;
    collect_activation_candidates(state, acting_player, &mut candidates)?;
    candidates.push(Candidate::EndTurn);
    Ok(candidates)
}

fn collect_play_candidates(
    state: &GameState,
    player: PlayerId,
    out: &mut Vec<Candidate>,
) -> Result<()> {
    let cc = state.get_player(player)?.cc;
    for &card_id in &state.zones(player)?.hand.cards {
        // Cost modifiers may veto the play outright (e.g. not on turn 1).
        let effective_cost = match stats::effective_cost(state, card_id)? {
            Some(cost) => cost,
            None => continue,
        };
        if cc < effective_cost {
            continue;
        }

        let targeting = play_targeting(state, card_id, player)?;
        // A targeting play with no legal targets is not offered.
        if let Some(Some(spec)) = &targeting {
            if spec.legal.len() < spec.min {
                continue;
            }
        }

        out.push(Candidate::PlayCard {
            card_id,
            effective_cost,
            targeting: targeting.flatten(),
        });
    }
    Ok(())
}

/// Targeting requirement for playing `card_id`: `None` when the card has
/// no resolving ability, `Some(None)` when it resolves untargeted,
/// `Some(Some(spec))` when the caller must choose.
fn play_targeting(
    state: &GameState,
    card_id: CardId,
    player: PlayerId,
) -> Result<Option<Option<TargetSpec>>> {
    let card = state.cards.get(card_id)?;
    if !card.is_instantaneous() {
        return Ok(None);
    }
    for ability in effects::abilities_for_card(card)? {
        if let Ability::Instant(_) = ability {
            return Ok(Some(ability.target_spec(state, player)?));
        }
    }
    Ok(None)
}

fn collect_tussle_candidates(
    state: &GameState,
    player: PlayerId,
    out: &mut Vec<Candidate>,
) -> Result<()> {
    let opponent = state.opponent_of(player)?;
    let enemy_field: Vec<CardId> = state.zones(opponent)?.field.cards.clone();
    let own_field: Vec<CardId> = state.zones(player)?.field.cards.clone();

    for attacker in own_field {
        // The resolver's own precondition: no strength, no tussle.
        if stats::effective_stat(state, attacker, Stat::Strength)? <= 0 {
            continue;
        }

        if enemy_field.is_empty() {
            if state.get_player(player)?.can_unopposed_strike() {
                out.push(Candidate::Tussle {
                    attacker,
                    defender: None,
                });
            }
            continue;
        }

        for &defender in &enemy_field {
            // Quality-of-decision filter, not a legality rule: suppress
            // tussles the resolver's arithmetic proves pointless (the
            // attacker dies, the defender walks away).
            let prediction = combat::predict(state, attacker, defender)?;
            if prediction.attacker_defeated && !prediction.defender_defeated {
                continue;
            }
            out.push(Candidate::Tussle {
                attacker,
                defender: Some(defender),
            });
        }
    }
    Ok(())
}

fn collect_activation_candidates(
    state: &GameState,
    player: PlayerId,
    out: &mut Vec<Candidate>,
) -> Result<()> {
    let cc = state.get_player(player)?.cc;
    for &card_id in &state.zones(player)?.field.cards {
        let card = state.cards.get(card_id)?;
        for (ability_index, ability) in effects::abilities_for_card(card)?.iter().enumerate() {
            let activated = match ability {
                Ability::Activated(a) => a,
                _ => continue,
            };
            if cc < activated.cost {
                continue;
            }
            let targeting = ability.target_spec(state, player)?;
            if let Some(spec) = &targeting {
                if spec.legal.len() < spec.min {
                    continue;
                }
            }
            out.push(Candidate::Activate {
                card_id,
                ability_index,
                cost: activated.cost,
                targeting,
            });
        }
    }
    Ok(())
}
