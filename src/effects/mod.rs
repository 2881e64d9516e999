//! Card effects and the ability composition system
//!
//! Every card behavior is expressed through the closed [`Ability`] enum:
//! Continuous, Triggered, Instant, Activated. Each consumption site (stat
//! query, event broadcast, instantaneous resolution, activation) matches
//! exhaustively on this enum; there are no per-card type checks anywhere
//! in the engine.

pub mod registry;

use crate::core::{CardCategory, CardId, PlayerId, Stat};
use crate::game::GameState;
use crate::zones::Zone;
use crate::{Result, TussleError};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

pub use registry::{abilities_for_card, parse, validate_description};

/// Where an effect looks for the cards it touches, relative to its caster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetScope {
    OwnField,
    EnemyField,
    AnyField,
    OwnInactive,
}

/// How an effect picks the cards it applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetSel {
    /// Applies to the effect's own source card.
    SelfCard,
    /// Applies to the caster (player-level ops like GainCc).
    Owner,
    /// Caller must choose exactly one card from the scope.
    Chosen(TargetScope),
    /// Applies to every card in the scope, no choice involved.
    AllIn(TargetScope),
}

/// A mutating operation an effect can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectOp {
    /// Subtract from current stamina, floored at zero.
    Damage { amount: i32 },
    /// Add to current stamina, capped at effective stamina.
    Restore { amount: i32 },
    /// Add a sourced entry to the target's stat-modification list.
    ModifyStat { stat: Stat, amount: i32 },
    /// Move a defeated field card from Inactive back to the field.
    Revive,
    /// Grant CC to the caster, clamped at the cap.
    GainCc { amount: u32 },
    /// Transfer control of the target to the caster.
    TakeControl,
    /// Materialize the target's ability description onto the source card.
    CopyAbility,
}

/// One op plus its selection rule. Triggered, Instant and Activated
/// abilities all carry one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectAction {
    pub op: EffectOp,
    pub target: TargetSel,
}

/// Selection rule for which hand card an unopposed strike forces out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrikePickRule {
    /// Front of the ordered hand (the default).
    First,
    /// Highest base cost; ties broken by hand order.
    Costliest,
}

/// Passive contributions, consulted every time a stat, cost, or tussle
/// rule is queried. Never "fires".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContinuousOp {
    /// Additive stat delta over a scope, optionally scaled by the number
    /// of cards in the caster's Inactive zone.
    StatDelta {
        stat: Stat,
        amount: i32,
        target: TargetSel,
        per_inactive: bool,
    },
    /// Additive delta to this card's own play cost, optionally scaled by
    /// the caster's Inactive count. `not_turn_one` additionally forbids
    /// playing the card on turn 1.
    CostDelta {
        amount: i32,
        per_inactive: bool,
        not_turn_one: bool,
    },
    /// Rule override: this card wins strike order in tussles initiated on
    /// its controller's turn.
    TussleWin,
    /// Counter-effect: this card is immune to tussle rule overrides.
    TussleGuard,
    /// Card-specific unopposed-strike hand selection.
    StrikePick(StrikePickRule),
}

/// Events the engine broadcasts to triggered abilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerEvent {
    /// A field card's stamina reached zero and it moved to Inactive.
    OnDefeat,
    /// A card was played from hand.
    OnPlay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContinuousEffect {
    pub source: CardId,
    pub op: ContinuousOp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggeredEffect {
    pub source: CardId,
    pub event: TriggerEvent,
    /// Predicate over the event payload: fire only when the subject is
    /// this effect's own card. All current cards want this; `any` in the
    /// grammar turns it off.
    pub self_only: bool,
    pub action: EffectAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstantEffect {
    pub source: CardId,
    pub action: EffectAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivatedEffect {
    pub source: CardId,
    /// CC cost, payable repeatedly within one turn while resources allow.
    pub cost: u32,
    pub action: EffectAction,
}

/// The closed set of ability timings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ability {
    Continuous(ContinuousEffect),
    Triggered(TriggeredEffect),
    Instant(InstantEffect),
    Activated(ActivatedEffect),
}

/// The exact legal target set for one effect, plus how many targets the
/// caller must pick. Attached to validator candidates so callers never
/// have to guess.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetSpec {
    pub legal: Vec<CardId>,
    pub min: usize,
    pub max: usize,
}

impl Ability {
    pub fn action(&self) -> Option<&EffectAction> {
        match self {
            Ability::Continuous(_) => None,
            Ability::Triggered(t) => Some(&t.action),
            Ability::Instant(i) => Some(&i.action),
            Ability::Activated(a) => Some(&a.action),
        }
    }

    /// Does resolving this ability need caller-chosen targets?
    pub fn requires_targets(&self) -> bool {
        matches!(
            self.action(),
            Some(EffectAction {
                target: TargetSel::Chosen(_),
                ..
            })
        )
    }

    /// Compute the current legal target set, or None for untargeted
    /// abilities. Pure: never mutates state.
    pub fn target_spec(&self, state: &GameState, caster: PlayerId) -> Result<Option<TargetSpec>> {
        let action = match self.action() {
            Some(a) => a,
            None => return Ok(None),
        };
        match action.target {
            TargetSel::Chosen(scope) => {
                let legal = enumerate_scope(state, caster, scope, action.op)?;
                Ok(Some(TargetSpec {
                    legal,
                    min: 1,
                    max: 1,
                }))
            }
            _ => Ok(None),
        }
    }
}

/// List the cards in `scope` from `caster`'s perspective that `op` can
/// legally touch.
pub fn enumerate_scope(
    state: &GameState,
    caster: PlayerId,
    scope: TargetScope,
    op: EffectOp,
) -> Result<Vec<CardId>> {
    let opponent = state.opponent_of(caster)?;
    let mut out = Vec::new();
    let mut push_zone = |ids: &[CardId]| out.extend_from_slice(ids);

    match scope {
        TargetScope::OwnField => push_zone(&state.zones(caster)?.field.cards),
        TargetScope::EnemyField => push_zone(&state.zones(opponent)?.field.cards),
        TargetScope::AnyField => {
            push_zone(&state.zones(caster)?.field.cards);
            push_zone(&state.zones(opponent)?.field.cards);
        }
        TargetScope::OwnInactive => push_zone(&state.zones(caster)?.inactive.cards),
    }

    // Op-specific restrictions on what counts as a legal target.
    if matches!(op, EffectOp::Revive) {
        let mut filtered = Vec::new();
        for id in out {
            if state.cards.get(id)?.category == CardCategory::Field {
                filtered.push(id);
            }
        }
        out = filtered;
    }

    Ok(out)
}

impl EffectAction {
    /// Apply this action for `source` (cast/controlled by `actor`), with
    /// `chosen` already validated against [`Ability::target_spec`].
    pub fn apply(
        &self,
        state: &mut GameState,
        source: CardId,
        actor: PlayerId,
        chosen: &[CardId],
    ) -> Result<()> {
        let targets: SmallVec<[CardId; 4]> = match self.target {
            TargetSel::SelfCard => SmallVec::from_slice(&[source]),
            TargetSel::Owner => SmallVec::new(),
            TargetSel::Chosen(_) => SmallVec::from_slice(chosen),
            TargetSel::AllIn(scope) => {
                SmallVec::from_vec(enumerate_scope(state, actor, scope, self.op)?)
            }
        };

        if matches!(self.target, TargetSel::Owner) {
            return apply_player_op(state, self.op, actor);
        }

        for target in targets {
            apply_card_op(state, self.op, source, actor, target)?;
        }
        Ok(())
    }
}

fn apply_player_op(state: &mut GameState, op: EffectOp, actor: PlayerId) -> Result<()> {
    match op {
        EffectOp::GainCc { amount } => {
            state.get_player_mut(actor)?.gain_cc(amount);
            state.log.event(format!("{actor} gains {amount} CC"));
            Ok(())
        }
        other => Err(TussleError::InvariantViolation(format!(
            "player-scoped application of card op {other:?}"
        ))),
    }
}

/// The single dispatch point for card-mutating ops.
fn apply_card_op(
    state: &mut GameState,
    op: EffectOp,
    source: CardId,
    actor: PlayerId,
    target: CardId,
) -> Result<()> {
    match op {
        EffectOp::Damage { amount } => {
            let name = {
                let card = state.cards.get_mut(target)?;
                card.current_stamina = (card.current_stamina - amount).max(0);
                card.name.clone()
            };
            state
                .log
                .event(format!("{name} {target} takes {amount} damage"));
        }
        EffectOp::Restore { amount } => {
            let cap = crate::stats::effective_stat(state, target, Stat::Stamina)?;
            let name = {
                let card = state.cards.get_mut(target)?;
                card.current_stamina = (card.current_stamina + amount).min(cap);
                card.name.clone()
            };
            state
                .log
                .event(format!("{name} {target} restores {amount} stamina"));
        }
        EffectOp::ModifyStat { stat, amount } => {
            state.cards.get_mut(target)?.add_stat_mod(stat, amount, source);
            // A stamina buff raises current stamina with it; a debuff may
            // drop the effective cap below current, so re-clamp.
            if stat == Stat::Stamina {
                if amount > 0 {
                    state.cards.get_mut(target)?.current_stamina += amount;
                }
                let cap = crate::stats::effective_stat(state, target, Stat::Stamina)?;
                let card = state.cards.get_mut(target)?;
                card.current_stamina = card.current_stamina.min(cap).max(0);
            }
            state
                .log
                .event(format!("{target} gets {amount:+} {stat:?} from {source}"));
        }
        EffectOp::Revive => {
            if state.cards.get(target)?.zone != Zone::Inactive {
                return Err(TussleError::StaleTarget(format!(
                    "revive target {target} is not in the Inactive zone"
                )));
            }
            state.move_card(target, Zone::Field)?;
            // The cap includes field-dependent continuous contributions,
            // so it can only be measured once the card is back. A card
            // that would return with no stamina stays down; otherwise an
            // on-defeat revive would defeat and revive it forever.
            let cap = crate::stats::effective_stat(state, target, Stat::Stamina)?;
            if cap <= 0 {
                state.move_card(target, Zone::Inactive)?;
                state
                    .log
                    .detail(format!("{target} cannot return with no stamina"));
                return Ok(());
            }
            let name = {
                let card = state.cards.get_mut(target)?;
                card.current_stamina = cap;
                card.name.clone()
            };
            state.log.event(format!("{name} {target} is revived"));
        }
        EffectOp::GainCc { .. } => {
            return apply_player_op(state, op, actor);
        }
        EffectOp::TakeControl => {
            state.transfer_control(target, actor)?;
        }
        EffectOp::CopyAbility => {
            // Only description strings can be copied. An empty string
            // (vanilla card, or behavior living in the bespoke table)
            // copies nothing rather than shadowing the copier's own
            // ability with an empty list.
            let copied = state.cards.get(target)?.effective_ability().to_string();
            if copied.is_empty() {
                state
                    .log
                    .event(format!("{source} finds nothing to copy on {target}"));
            } else {
                let name = {
                    let card = state.cards.get_mut(source)?;
                    card.copied_ability = Some(copied);
                    card.name.clone()
                };
                state
                    .log
                    .event(format!("{name} {source} copies the ability of {target}"));
            }
        }
    }
    Ok(())
}
