//! Entity identifiers and the central card store

use crate::Result;
use crate::TussleError;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique per-game identifier for a card instance.
///
/// Distinct from the card's template name: two copies of the same template
/// get different ids. Ids are contiguous, stable for the whole game, and
/// never reused - cards move between zones but are never destroyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardId(u32);

impl CardId {
    pub fn new(id: u32) -> Self {
        CardId(id)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifier for one of the two players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(u8);

impl PlayerId {
    pub fn new(id: u8) -> Self {
        PlayerId(id)
    }

    pub fn as_u8(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// Central storage for card instances.
///
/// Fast lookup by CardId via FxHashMap. Entries are inserted at deck
/// construction and persist for the whole game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityStore<T> {
    entities: FxHashMap<CardId, T>,
    next_id: u32,
}

impl<T> EntityStore<T> {
    pub fn new() -> Self {
        EntityStore {
            entities: FxHashMap::default(),
            next_id: 0,
        }
    }

    /// Allocate a fresh CardId.
    pub fn next_id(&mut self) -> CardId {
        let id = CardId::new(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn insert(&mut self, id: CardId, entity: T) {
        self.entities.insert(id, entity);
    }

    pub fn get(&self, id: CardId) -> Result<&T> {
        self.entities
            .get(&id)
            .ok_or(TussleError::EntityNotFound(id.as_u32()))
    }

    pub fn get_mut(&mut self, id: CardId) -> Result<&mut T> {
        self.entities
            .get_mut(&id)
            .ok_or(TussleError::EntityNotFound(id.as_u32()))
    }

    pub fn contains(&self, id: CardId) -> bool {
        self.entities.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CardId, &T)> {
        self.entities.iter()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl<T> Default for EntityStore<T> {
    fn default() -> Self {
        Self::new()
    }
}
