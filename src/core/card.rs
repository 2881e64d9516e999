//! Card instance types

use crate::core::{CardId, PlayerId};
use crate::zones::Zone;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// The two card categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardCategory {
    /// Persistent card with combat stats; lives on the field.
    Field,
    /// One-shot card: resolves its effect, then goes straight to Inactive.
    Instantaneous,
}

/// The three combat stats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stat {
    Speed,
    Strength,
    Stamina,
}

/// One additive delta on a card's stat, tagged with the card that caused it.
///
/// Keeping the source lets an effect remove exactly its own contribution
/// later, and makes the modification list fully reconstructible from a
/// snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatModifier {
    pub stat: Stat,
    pub amount: i32,
    pub source: CardId,
}

/// A card instance during gameplay.
///
/// Many instances can share one template name; the CardId is what makes an
/// instance unique. Created once at deck construction and never destroyed,
/// only moved between zones and mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    /// Unique id for this instance
    pub id: CardId,

    /// Template name (e.g., "Ember Whelp")
    pub name: String,

    pub category: CardCategory,

    /// CC cost to play from hand (before continuous cost modifiers)
    pub base_cost: u32,

    pub base_speed: i32,
    pub base_strength: i32,
    pub base_stamina: i32,

    /// Current stamina; always in 0..=effective stamina
    pub current_stamina: i32,

    /// Which zone currently holds this card. Mirrors the owning zone list;
    /// `zone == Field` iff the controller's field zone contains the id.
    pub zone: Zone,

    /// The player whose deck this card came from. Immutable.
    pub owner: PlayerId,

    /// Whoever currently controls the card; changes via control-transfer
    /// effects.
    pub controller: PlayerId,

    /// Authoritative ability description string. Effects are always parsed
    /// from this (or from `copied_ability`), never persisted as objects.
    pub ability: String,

    /// Description string duplicated from another card, if an ability-copy
    /// effect hit this card. Takes precedence over `ability` when present.
    pub copied_ability: Option<String>,

    /// Additive per-instance stat deltas from specific sources.
    /// Treated copy-on-write: mutation builds a new list, never aliases.
    pub stat_mods: SmallVec<[StatModifier; 2]>,
}

impl Card {
    pub fn new(id: CardId, name: String, owner: PlayerId) -> Self {
        Card {
            id,
            name,
            category: CardCategory::Field,
            base_cost: 0,
            base_speed: 0,
            base_strength: 0,
            base_stamina: 0,
            current_stamina: 0,
            zone: Zone::Hand,
            owner,
            controller: owner,
            ability: String::new(),
            copied_ability: None,
            stat_mods: SmallVec::new(),
        }
    }

    pub fn is_field_card(&self) -> bool {
        self.category == CardCategory::Field
    }

    pub fn is_instantaneous(&self) -> bool {
        self.category == CardCategory::Instantaneous
    }

    /// Base value of a stat, before continuous effects and modifiers.
    pub fn base_stat(&self, stat: Stat) -> i32 {
        match stat {
            Stat::Speed => self.base_speed,
            Stat::Strength => self.base_strength,
            Stat::Stamina => self.base_stamina,
        }
    }

    /// Sum of instance modification entries for one stat.
    pub fn stat_mod_total(&self, stat: Stat) -> i32 {
        self.stat_mods
            .iter()
            .filter(|m| m.stat == stat)
            .map(|m| m.amount)
            .sum()
    }

    /// Record an additive delta from `source`. Builds a replacement list
    /// rather than patching entries in place, so no other owner can be
    /// aliasing the old one.
    pub fn add_stat_mod(&mut self, stat: Stat, amount: i32, source: CardId) {
        let mut mods: SmallVec<[StatModifier; 2]> = self.stat_mods.clone();
        mods.push(StatModifier {
            stat,
            amount,
            source,
        });
        self.stat_mods = mods;
    }

    /// Drop every modification entry contributed by `source`.
    pub fn remove_stat_mods_from(&mut self, source: CardId) {
        let mods: SmallVec<[StatModifier; 2]> = self
            .stat_mods
            .iter()
            .copied()
            .filter(|m| m.source != source)
            .collect();
        self.stat_mods = mods;
    }

    /// The description string effects are built from, honoring the
    /// copied-ability override.
    pub fn effective_ability(&self) -> &str {
        self.copied_ability.as_deref().unwrap_or(&self.ability)
    }
}
