//! Style state and animated transitions for host UI components.
//!
//! This crate provides:
//! - **StyleState**: a property bag plus unit table that derives a render-ready
//!   style map or CSS declaration text
//! - **TransitionCoordinator**: immediate and timed mutations, with a single
//!   in-flight transition session, interruption, and event- or timer-based
//!   completion detection
//! - **ComponentBinding**: the host component lifecycle (mount, prop updates,
//!   target attach/detach, unmount)
//!
//! # Architecture
//!
//! ```text
//! ComponentBinding
//!   └── TransitionCoordinator
//!         ├── StyleState (values, units, custom overlay)
//!         ├── TransitionSession (restore descriptor, CompletionWatcher)
//!         └── StyleObserver / RenderTarget (weak, host-owned)
//! ```

pub mod changes;
pub mod coordinator;
pub mod error;
pub mod host;
pub mod observer;
pub mod property;
pub mod state;
pub mod target;
pub mod units;
pub mod value;
pub mod watcher;

pub use changes::{DURATION_KEY, StyleChanges};
pub use coordinator::{
    CoordinatorState, DISPLAY_NONE, DISPLAY_VISIBLE, SessionInfo, TransitionCoordinator,
    TransitionEndSink, TransitionFuture, TransitionOutcome, transition_descriptor,
};
pub use error::{Result, StyleError};
pub use host::{ComponentBinding, ComponentPhase};
pub use observer::StyleObserver;
pub use property::{Property, ValueKind, css_name};
pub use state::{DerivedStyle, StyleState, TRANSFORM_KEY};
pub use target::{RenderTarget, TargetId, TransitionEndEvent};
pub use units::UnitTable;
pub use value::StyleValue;
pub use watcher::{CompletionWatcher, WatchMode};
