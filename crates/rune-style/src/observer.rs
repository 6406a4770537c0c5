//! Outbound notifications to the host component.

use crate::error::StyleError;
use crate::state::DerivedStyle;

/// Receives the derived style after every non-silent change.
///
/// Calls are made synchronously, after the coordinator has released its
/// internal lock, so an observer may call back into the coordinator.
pub trait StyleObserver: Send + Sync {
    fn on_style_changed(&self, style: &DerivedStyle);

    /// Internal housekeeping failures land here instead of failing a
    /// transition future.
    fn on_diagnostic(&self, error: &StyleError) {
        tracing::error!(%error, "style transition housekeeping failed");
    }
}
