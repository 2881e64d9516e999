//! Core game types and entities

pub mod entity;
pub mod card;
pub mod player;

pub use card::{Card, CardCategory, Stat, StatModifier};
pub use entity::{CardId, EntityStore, PlayerId};
pub use player::{Player, CC_CAP, CC_PER_TURN, FIRST_TURN_CC, UNOPPOSED_STRIKES_PER_TURN};
