//! Game zones (Hand, Field, Inactive)

use crate::core::{CardId, PlayerId};
use serde::{Deserialize, Serialize};

/// The zones a card can occupy. Exactly one holds any given instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    Hand,
    Field,
    Inactive,
}

/// A zone containing cards.
///
/// Hand order is rule-relevant (the default unopposed-strike selection
/// takes the front card); Field and Inactive are semantically unordered
/// but kept as Vecs so iteration order stays deterministic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardZone {
    pub zone_type: Zone,

    /// Owner of this zone (each player has their own three zones)
    pub owner: PlayerId,

    pub cards: Vec<CardId>,
}

impl CardZone {
    pub fn new(zone_type: Zone, owner: PlayerId) -> Self {
        CardZone {
            zone_type,
            owner,
            cards: Vec::new(),
        }
    }

    pub fn add(&mut self, card_id: CardId) {
        self.cards.push(card_id);
    }

    pub fn remove(&mut self, card_id: CardId) -> bool {
        if let Some(pos) = self.cards.iter().position(|&id| id == card_id) {
            // Position-preserving removal: swap_remove would perturb
            // iteration order and break determinism between identical games.
            self.cards.remove(pos);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, card_id: CardId) -> bool {
        self.cards.contains(&card_id)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Front card (the default unopposed-strike pick for hands).
    pub fn front(&self) -> Option<CardId> {
        self.cards.first().copied()
    }

    pub fn shuffle(&mut self, rng: &mut impl rand::Rng) {
        use rand::seq::SliceRandom;
        self.cards.shuffle(rng);
    }
}

/// The three zones belonging to one player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerZones {
    pub hand: CardZone,
    pub field: CardZone,
    pub inactive: CardZone,
}

impl PlayerZones {
    pub fn new(player_id: PlayerId) -> Self {
        PlayerZones {
            hand: CardZone::new(Zone::Hand, player_id),
            field: CardZone::new(Zone::Field, player_id),
            inactive: CardZone::new(Zone::Inactive, player_id),
        }
    }

    pub fn get_zone(&self, zone: Zone) -> &CardZone {
        match zone {
            Zone::Hand => &self.hand,
            Zone::Field => &self.field,
            Zone::Inactive => &self.inactive,
        }
    }

    pub fn get_zone_mut(&mut self, zone: Zone) -> &mut CardZone {
        match zone {
            Zone::Hand => &mut self.hand,
            Zone::Field => &mut self.field,
            Zone::Inactive => &mut self.inactive,
        }
    }
}
