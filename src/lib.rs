//! Tussle - rules engine for a two-player, perfect-information card game
//!
//! The engine owns all card state, resolves combat ("tussles"), composes
//! card abilities from declarative description strings, and is the single
//! arbiter of move legality. A human-facing frontend and an automated
//! actor both consume the same enumerate/execute pipeline, so the two
//! callers can never diverge on rule interpretation.

pub mod core;
pub mod effects;
pub mod game;
pub mod stats;
pub mod zones;
pub mod loader;
pub mod error;

pub use error::{TussleError, Result};
