//! Card template loader (.txt format)
//!
//! Parses `Key:Value` card texts into templates that can be instantiated
//! into game cards any number of times.

use crate::core::{Card, CardCategory, CardId, PlayerId};
use crate::{Result, TussleError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Card template (not yet instantiated in a game)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardTemplate {
    pub name: String,
    pub category: CardCategory,
    pub cost: u32,
    pub speed: i32,
    pub strength: i32,
    pub stamina: i32,
    /// Ability description string; empty means no printed ability.
    pub ability: String,
}

impl CardTemplate {
    /// Load a template from a .txt file
    pub fn load_from_file(path: &Path) -> Result<CardTemplate> {
        let content = fs::read_to_string(path).map_err(TussleError::IoError)?;
        Self::parse(&content)
    }

    /// Parse a template from its text content.
    ///
    /// ```text
    /// Name:Ember Whelp
    /// Category:Field
    /// Cost:1
    /// Stats:3/2/2
    /// Ability:...
    /// ```
    ///
    /// `Stats` is speed/strength/stamina and is required for Field cards
    /// only. Blank lines and `#` comments are skipped.
    pub fn parse(content: &str) -> Result<CardTemplate> {
        let mut name = None;
        let mut category = None;
        let mut cost = None;
        let mut stats = None;
        let mut ability = String::new();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (key, value) = line.split_once(':').ok_or_else(|| {
                TussleError::InvalidCardFormat(format!("expected Key:Value, got '{line}'"))
            })?;
            let key = key.trim();
            let value = value.trim();

            match key {
                "Name" => name = Some(value.to_string()),
                "Category" => {
                    category = Some(match value {
                        "Field" => CardCategory::Field,
                        "Instantaneous" => CardCategory::Instantaneous,
                        other => {
                            return Err(TussleError::InvalidCardFormat(format!(
                                "unknown category '{other}'"
                            )))
                        }
                    })
                }
                "Cost" => {
                    cost = Some(value.parse().map_err(|_| {
                        TussleError::InvalidCardFormat(format!("bad cost '{value}'"))
                    })?)
                }
                "Stats" => stats = Some(Self::parse_stats(value)?),
                "Ability" => ability = value.to_string(),
                _ => {} // Ignore other fields for now
            }
        }

        let name =
            name.ok_or_else(|| TussleError::InvalidCardFormat("missing card name".to_string()))?;
        let category = category.ok_or_else(|| {
            TussleError::InvalidCardFormat(format!("{name}: missing category"))
        })?;
        let cost = cost
            .ok_or_else(|| TussleError::InvalidCardFormat(format!("{name}: missing cost")))?;

        let (speed, strength, stamina) = match (category, stats) {
            (CardCategory::Field, Some(s)) => {
                // A field card that enters at zero stamina would be
                // defeated the moment it resolves.
                if s.2 <= 0 {
                    return Err(TussleError::InvalidCardFormat(format!(
                        "{name}: field card with non-positive stamina"
                    )));
                }
                s
            }
            (CardCategory::Field, None) => {
                return Err(TussleError::InvalidCardFormat(format!(
                    "{name}: field card without stats"
                )))
            }
            (CardCategory::Instantaneous, None) => (0, 0, 0),
            (CardCategory::Instantaneous, Some(_)) => {
                return Err(TussleError::InvalidCardFormat(format!(
                    "{name}: instantaneous card with stats"
                )))
            }
        };

        Ok(CardTemplate {
            name,
            category,
            cost,
            speed,
            strength,
            stamina,
            ability,
        })
    }

    fn parse_stats(value: &str) -> Result<(i32, i32, i32)> {
        let mut parts = value.split('/');
        let mut next = || -> Result<i32> {
            parts
                .next()
                .and_then(|p| p.trim().parse().ok())
                .ok_or_else(|| {
                    TussleError::InvalidCardFormat(format!("bad stats line '{value}'"))
                })
        };
        let speed = next()?;
        let strength = next()?;
        let stamina = next()?;
        if parts.next().is_some() {
            return Err(TussleError::InvalidCardFormat(format!(
                "bad stats line '{value}'"
            )));
        }
        Ok((speed, strength, stamina))
    }

    /// Create a game card instance of this template.
    pub fn instantiate(&self, id: CardId, owner: PlayerId) -> Card {
        let mut card = Card::new(id, self.name.clone(), owner);
        card.category = self.category;
        card.base_cost = self.cost;
        card.base_speed = self.speed;
        card.base_strength = self.strength;
        card.base_stamina = self.stamina;
        card.current_stamina = self.stamina;
        card.ability = self.ability.clone();
        card
    }
}
