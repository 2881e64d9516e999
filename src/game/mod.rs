//! Game state and rules engine
//!
//! The engine is a pipeline over one mutable `GameState`:
//! `validator::enumerate_legal_actions` produces candidates,
//! `executor::execute` performs exactly one of them, and
//! `checker::run_state_based_actions` settles the consequences.

pub mod checker;
pub mod combat;
pub mod executor;
pub mod log;
pub mod phase;
pub mod state;
pub mod validator;

pub use combat::{TussleOutcome, TusslePrediction, INITIATIVE_BONUS};
pub use executor::{execute, ExecutionReport};
pub use log::{GameLog, LogEntry, VerbosityLevel};
pub use phase::{Phase, TurnStructure};
pub use state::GameState;
pub use validator::{enumerate_legal_actions, Candidate};
