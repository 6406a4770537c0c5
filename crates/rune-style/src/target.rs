//! Render targets and their transition-end events.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identity of a render target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetId(pub u64);

impl TargetId {
    /// Generate a new unique target ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for TargetId {
    fn default() -> Self {
        Self::new()
    }
}

/// A live element the host paints the derived style into.
///
/// The host owns the target; the coordinator only keeps a weak reference to
/// it, writes style text into it when configured to, and watches for its
/// transition-end events.
pub trait RenderTarget: Send + Sync + Debug {
    fn id(&self) -> TargetId;

    /// Replace the target's inline style with `css_text`.
    fn write_style(&self, css_text: &str);
}

/// A transition finished on some element.
///
/// `target` is the element the transition ran on. Events bubble, so a
/// coordinator watching a target may also see events whose origin is one of
/// its descendants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionEndEvent {
    pub target: TargetId,
    /// CSS property whose transition ended.
    pub property: String,
}

impl TransitionEndEvent {
    pub fn new(target: TargetId, property: impl Into<String>) -> Self {
        Self {
            target,
            property: property.into(),
        }
    }
}
