//! Error types for the style engine.

use thiserror::Error;

/// Result type for style operations.
pub type Result<T> = std::result::Result<T, StyleError>;

/// Errors that can occur while mutating style state or scheduling transitions.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StyleError {
    /// The key is not part of the recognized property set.
    #[error("unknown style property: {0}")]
    UnknownProperty(String),

    /// Text was supplied for a property that only accepts numbers.
    #[error("property `{property}` expects a number, got {value:?}")]
    ExpectedNumber { property: String, value: String },

    /// A number was supplied for a property that only accepts text.
    #[error("property `{property}` expects text, got {value}")]
    ExpectedText { property: String, value: f64 },

    /// NaN and infinities never reach the style state.
    #[error("property `{property}` expects a finite number, got {value}")]
    NonFiniteNumber { property: String, value: f64 },

    /// Explicit durations must be finite and non-negative.
    #[error("invalid transition duration: {0}")]
    InvalidDuration(f64),

    /// Speed must be finite and positive.
    #[error("invalid transition speed: {0}")]
    InvalidSpeed(f64),

    /// A timer was requested outside of an async runtime.
    #[error("no async runtime available to schedule the completion timer")]
    NoRuntime,

    /// The render target went away while a session waited on it.
    #[error("render target detached while a transition was pending")]
    TargetDetached,
}
