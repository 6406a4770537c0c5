//! Rune Motion: style state and animated transitions for host UI components.
//!
//! This facade re-exports the style engine (`rune-style`) together with its
//! configuration loader (`rune-config`).

pub use rune_config as config;
pub use rune_style as style;

pub use rune_config::StyleConfig;
pub use rune_style::{
    ComponentBinding, RenderTarget, StyleChanges, StyleError, StyleObserver, StyleState,
    StyleValue, TransitionCoordinator, TransitionOutcome,
};
