//! Effect registry and factory
//!
//! Turns a card's ability description string into typed [`Ability`]
//! values. Source precedence for a card: materialized copied ability >
//! the card's own description string > the bespoke fallback table. First
//! match wins; sources are never merged.
//!
//! Grammar: clauses separated by `;`, whitespace-separated tokens.
//!
//! ```text
//! cont <stat> +N|-N self|own-field|enemy-field [per-inactive]
//! cont cost -N [per-inactive] [not-turn-1]
//! cont tussle-win
//! cont tussle-guard
//! cont strike-pick first|costliest
//! trig on-defeat|on-play [any] <op> [<selection>]
//! inst <op> [<selection>]
//! act <cc-cost> <op> [<selection>]
//!
//! op        := damage N | restore N | mod <stat> +N|-N | revive
//!            | gain-cc N | take-control | copy-ability
//! selection := target <scope> | all <scope> | self
//! scope     := own-field | enemy-field | any-field | own-inactive
//! ```
//!
//! Any token outside this grammar is `UnrecognizedEffectKind`: a fatal,
//! configuration-time condition detected before the game starts.

use crate::core::{Card, CardId, Stat};
use crate::effects::{
    Ability, ActivatedEffect, ContinuousEffect, ContinuousOp, EffectAction, EffectOp,
    InstantEffect, StrikePickRule, TargetScope, TargetSel, TriggerEvent, TriggeredEffect,
};
use crate::{Result, TussleError};
use smallvec::SmallVec;

pub type AbilityList = SmallVec<[Ability; 2]>;

/// Parse an ability description into its ordered effect list.
pub fn parse(description: &str, source: CardId) -> Result<AbilityList> {
    let mut abilities = AbilityList::new();
    for clause in description.split(';') {
        let clause = clause.trim();
        if clause.is_empty() {
            continue;
        }
        abilities.push(parse_clause(description, clause, source)?);
    }
    Ok(abilities)
}

/// Check a description at load time. Malformed text must block game
/// start, never surface mid-game.
pub fn validate_description(description: &str) -> Result<()> {
    parse(description, CardId::new(0)).map(|_| ())
}

/// The effective ability list for a card, honoring source precedence.
pub fn abilities_for_card(card: &Card) -> Result<AbilityList> {
    if let Some(copied) = &card.copied_ability {
        return parse(copied, card.id);
    }
    if !card.ability.is_empty() {
        return parse(&card.ability, card.id);
    }
    if let Some(bespoke) = bespoke_abilities(&card.name, card.id) {
        return Ok(bespoke);
    }
    Ok(AbilityList::new())
}

/// Legacy per-name fallback for behavior too irregular for the grammar.
/// Entries are expressed through the same [`Ability`] type, so every call
/// site stays uniform. Migrate cards out of here into declarative
/// descriptions whenever the grammar grows to cover them.
///
/// Because these cards have no description string, copy effects have
/// nothing to materialize from them: bespoke behavior is not copyable.
fn bespoke_abilities(name: &str, source: CardId) -> Option<AbilityList> {
    match name {
        // Pre-grammar boss card: wins strike order at home and lashes out
        // at the whole enemy field when it goes down.
        "Grimfang Alpha" => {
            let mut list = AbilityList::new();
            list.push(Ability::Continuous(ContinuousEffect {
                source,
                op: ContinuousOp::TussleWin,
            }));
            list.push(Ability::Triggered(TriggeredEffect {
                source,
                event: TriggerEvent::OnDefeat,
                self_only: true,
                action: EffectAction {
                    op: EffectOp::Damage { amount: 1 },
                    target: TargetSel::AllIn(TargetScope::EnemyField),
                },
            }));
            Some(list)
        }
        _ => None,
    }
}

fn parse_clause(description: &str, clause: &str, source: CardId) -> Result<Ability> {
    let tokens: Vec<&str> = clause.split_whitespace().collect();
    let mut cursor = Cursor {
        description,
        tokens: &tokens,
        pos: 0,
    };

    let head = cursor.next()?;
    match head {
        "cont" => parse_continuous(&mut cursor, source),
        "trig" => parse_triggered(&mut cursor, source),
        "inst" => {
            let action = parse_action(&mut cursor)?;
            cursor.finish()?;
            Ok(Ability::Instant(InstantEffect { source, action }))
        }
        "act" => {
            let cost = cursor.next()?.parse::<u32>().map_err(|_| cursor.unrecognized())?;
            let action = parse_action(&mut cursor)?;
            cursor.finish()?;
            Ok(Ability::Activated(ActivatedEffect {
                source,
                cost,
                action,
            }))
        }
        _ => Err(cursor.unrecognized()),
    }
}

fn parse_continuous(cursor: &mut Cursor, source: CardId) -> Result<Ability> {
    let op = match cursor.next()? {
        "cost" => {
            let amount = parse_signed(cursor)?;
            let mut per_inactive = false;
            let mut not_turn_one = false;
            while let Some(flag) = cursor.peek() {
                match flag {
                    "per-inactive" => per_inactive = true,
                    "not-turn-1" => not_turn_one = true,
                    _ => return Err(cursor.unrecognized()),
                }
                cursor.advance();
            }
            ContinuousOp::CostDelta {
                amount,
                per_inactive,
                not_turn_one,
            }
        }
        "tussle-win" => ContinuousOp::TussleWin,
        "tussle-guard" => ContinuousOp::TussleGuard,
        "strike-pick" => {
            let rule = match cursor.next()? {
                "first" => StrikePickRule::First,
                "costliest" => StrikePickRule::Costliest,
                _ => return Err(cursor.unrecognized()),
            };
            ContinuousOp::StrikePick(rule)
        }
        stat_token => {
            let stat = parse_stat(cursor, stat_token)?;
            let amount = parse_signed(cursor)?;
            let target = match cursor.next()? {
                "self" => TargetSel::SelfCard,
                "own-field" => TargetSel::AllIn(TargetScope::OwnField),
                "enemy-field" => TargetSel::AllIn(TargetScope::EnemyField),
                _ => return Err(cursor.unrecognized()),
            };
            let per_inactive = match cursor.peek() {
                Some("per-inactive") => {
                    cursor.advance();
                    true
                }
                Some(_) => return Err(cursor.unrecognized()),
                None => false,
            };
            ContinuousOp::StatDelta {
                stat,
                amount,
                target,
                per_inactive,
            }
        }
    };
    cursor.finish()?;
    Ok(Ability::Continuous(ContinuousEffect { source, op }))
}

fn parse_triggered(cursor: &mut Cursor, source: CardId) -> Result<Ability> {
    let event = match cursor.next()? {
        "on-defeat" => TriggerEvent::OnDefeat,
        "on-play" => TriggerEvent::OnPlay,
        _ => return Err(cursor.unrecognized()),
    };
    let self_only = match cursor.peek() {
        Some("any") => {
            cursor.advance();
            false
        }
        _ => true,
    };
    let action = parse_action(cursor)?;
    cursor.finish()?;
    Ok(Ability::Triggered(TriggeredEffect {
        source,
        event,
        self_only,
        action,
    }))
}

fn parse_action(cursor: &mut Cursor) -> Result<EffectAction> {
    let op = match cursor.next()? {
        "damage" => EffectOp::Damage {
            amount: parse_unsigned(cursor)? as i32,
        },
        "restore" => EffectOp::Restore {
            amount: parse_unsigned(cursor)? as i32,
        },
        "mod" => {
            let stat_token = cursor.next()?;
            let stat = parse_stat(cursor, stat_token)?;
            let amount = parse_signed(cursor)?;
            EffectOp::ModifyStat { stat, amount }
        }
        "revive" => EffectOp::Revive,
        "gain-cc" => EffectOp::GainCc {
            amount: parse_unsigned(cursor)?,
        },
        "take-control" => EffectOp::TakeControl,
        "copy-ability" => EffectOp::CopyAbility,
        _ => return Err(cursor.unrecognized()),
    };

    let target = match cursor.peek() {
        Some("target") => {
            cursor.advance();
            TargetSel::Chosen(parse_scope(cursor)?)
        }
        Some("all") => {
            cursor.advance();
            TargetSel::AllIn(parse_scope(cursor)?)
        }
        Some("self") => {
            cursor.advance();
            TargetSel::SelfCard
        }
        Some(_) => return Err(cursor.unrecognized()),
        // No selection clause: player ops land on the caster, card ops on
        // the source card.
        None => match op {
            EffectOp::GainCc { .. } => TargetSel::Owner,
            _ => TargetSel::SelfCard,
        },
    };

    Ok(EffectAction { op, target })
}

fn parse_scope(cursor: &mut Cursor) -> Result<TargetScope> {
    match cursor.next()? {
        "own-field" => Ok(TargetScope::OwnField),
        "enemy-field" => Ok(TargetScope::EnemyField),
        "any-field" => Ok(TargetScope::AnyField),
        "own-inactive" => Ok(TargetScope::OwnInactive),
        _ => Err(cursor.unrecognized()),
    }
}

fn parse_stat(cursor: &Cursor, token: &str) -> Result<Stat> {
    match token {
        "speed" => Ok(Stat::Speed),
        "strength" => Ok(Stat::Strength),
        "stamina" => Ok(Stat::Stamina),
        _ => Err(cursor.unrecognized_token(token)),
    }
}

fn parse_signed(cursor: &mut Cursor) -> Result<i32> {
    let token = cursor.next()?;
    if !(token.starts_with('+') || token.starts_with('-')) {
        return Err(cursor.unrecognized_token(token));
    }
    token
        .trim_start_matches('+')
        .parse::<i32>()
        .map_err(|_| cursor.unrecognized_token(token))
}

fn parse_unsigned(cursor: &mut Cursor) -> Result<u32> {
    let token = cursor.next()?;
    token
        .parse::<u32>()
        .map_err(|_| cursor.unrecognized_token(token))
}

/// Token cursor over one clause. Tracks position so errors can name the
/// offending token.
struct Cursor<'a> {
    description: &'a str,
    tokens: &'a [&'a str],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn next(&mut self) -> Result<&'a str> {
        let token = self
            .tokens
            .get(self.pos)
            .copied()
            .ok_or_else(|| self.unrecognized_token("<end of clause>"))?;
        self.pos += 1;
        Ok(token)
    }

    fn peek(&self) -> Option<&'a str> {
        self.tokens.get(self.pos).copied()
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn finish(&self) -> Result<()> {
        match self.peek() {
            None => Ok(()),
            Some(_) => Err(self.unrecognized()),
        }
    }

    fn unrecognized(&self) -> TussleError {
        let token = self
            .tokens
            .get(self.pos)
            .copied()
            .unwrap_or("<end of clause>");
        self.unrecognized_token(token)
    }

    fn unrecognized_token(&self, token: &str) -> TussleError {
        TussleError::UnrecognizedEffectKind {
            description: self.description.to_string(),
            token: token.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PlayerId;

    fn parse_one(text: &str) -> Ability {
        let list = parse(text, CardId::new(5)).unwrap();
        assert_eq!(list.len(), 1);
        list[0]
    }

    #[test]
    fn test_parse_continuous_stat_delta() {
        let ability = parse_one("cont strength +1 own-field");
        match ability {
            Ability::Continuous(ContinuousEffect {
                op:
                    ContinuousOp::StatDelta {
                        stat,
                        amount,
                        target,
                        per_inactive,
                    },
                ..
            }) => {
                assert_eq!(stat, Stat::Strength);
                assert_eq!(amount, 1);
                assert_eq!(target, TargetSel::AllIn(TargetScope::OwnField));
                assert!(!per_inactive);
            }
            other => panic!("unexpected ability: {other:?}"),
        }
    }

    #[test]
    fn test_parse_cost_modifier() {
        let ability = parse_one("cont cost -1 per-inactive");
        match ability {
            Ability::Continuous(ContinuousEffect {
                op:
                    ContinuousOp::CostDelta {
                        amount,
                        per_inactive,
                        not_turn_one,
                    },
                ..
            }) => {
                assert_eq!(amount, -1);
                assert!(per_inactive);
                assert!(!not_turn_one);
            }
            other => panic!("unexpected ability: {other:?}"),
        }
    }

    #[test]
    fn test_parse_instant_with_target() {
        let ability = parse_one("inst damage 3 target enemy-field");
        assert!(ability.requires_targets());
        match ability {
            Ability::Instant(InstantEffect { action, .. }) => {
                assert_eq!(action.op, EffectOp::Damage { amount: 3 });
                assert_eq!(action.target, TargetSel::Chosen(TargetScope::EnemyField));
            }
            other => panic!("unexpected ability: {other:?}"),
        }
    }

    #[test]
    fn test_parse_activated_and_trigger() {
        let list = parse(
            "act 2 revive target own-inactive; trig on-defeat damage 1 all enemy-field",
            CardId::new(9),
        )
        .unwrap();
        assert_eq!(list.len(), 2);
        assert!(matches!(list[0], Ability::Activated(_)));
        assert!(matches!(
            list[1],
            Ability::Triggered(TriggeredEffect {
                event: TriggerEvent::OnDefeat,
                self_only: true,
                ..
            })
        ));
    }

    #[test]
    fn test_unrecognized_token_is_fatal() {
        let err = parse("cont explode +3 own-field", CardId::new(1)).unwrap_err();
        match err {
            TussleError::UnrecognizedEffectKind { token, .. } => {
                assert_eq!(token, "explode");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(validate_description("inst fizzle").is_err());
        assert!(validate_description("inst damage 2 target enemy-field").is_ok());
    }

    #[test]
    fn test_precedence_copied_over_own_over_bespoke() {
        let mut card = Card::new(CardId::new(3), "Grimfang Alpha".to_string(), PlayerId::new(0));

        // No strings at all: bespoke table supplies the list.
        let bespoke = abilities_for_card(&card).unwrap();
        assert_eq!(bespoke.len(), 2);

        // Own description string wins over bespoke.
        card.ability = "cont tussle-guard".to_string();
        let own = abilities_for_card(&card).unwrap();
        assert_eq!(own.len(), 1);
        assert!(matches!(
            own[0],
            Ability::Continuous(ContinuousEffect {
                op: ContinuousOp::TussleGuard,
                ..
            })
        ));

        // Copied string wins over both.
        card.copied_ability = Some("cont speed +2 self".to_string());
        let copied = abilities_for_card(&card).unwrap();
        assert_eq!(copied.len(), 1);
        assert!(matches!(
            copied[0],
            Ability::Continuous(ContinuousEffect {
                op: ContinuousOp::StatDelta { .. },
                ..
            })
        ));
    }

    #[test]
    fn test_unknown_card_without_ability_has_no_effects() {
        let card = Card::new(CardId::new(3), "Vanilla".to_string(), PlayerId::new(0));
        assert!(abilities_for_card(&card).unwrap().is_empty());
    }
}
