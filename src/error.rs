//! Error types for the Tussle engine

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TussleError {
    /// Configuration-time failure: an ability description contained a token
    /// the registry does not recognize. Detected at load time and blocks
    /// game start; never a runtime path.
    #[error("Unrecognized effect kind in ability '{description}': {token}")]
    UnrecognizedEffectKind { description: String, token: String },

    #[error("Invalid card format: {0}")]
    InvalidCardFormat(String),

    #[error("Invalid deck format: {0}")]
    InvalidDeckFormat(String),

    #[error("Entity not found: {0}")]
    EntityNotFound(u32),

    /// The submitted candidate is not currently legal. Recoverable: the
    /// caller must re-enumerate and resubmit; the engine never substitutes
    /// a different action.
    #[error("Illegal action: {0}")]
    IllegalAction(String),

    /// A chosen target is no longer valid at execution time. Recoverable:
    /// the caller re-validates and resubmits.
    #[error("Stale target: {0}")]
    StaleTarget(String),

    /// A rule invariant was broken (negative CC, card in two zones, ...).
    /// Indicates a defect in the validator/executor contract, not a
    /// user-facing condition.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type Result<T> = std::result::Result<T, TussleError>;
