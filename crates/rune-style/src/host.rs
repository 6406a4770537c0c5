//! Host component binding.
//!
//! Adapts a component's lifecycle to a [`TransitionCoordinator`]: the initial
//! property bag on mount, merged prop updates while mounted, render target
//! attach/detach, and teardown on unmount.

use std::sync::Arc;

use tracing::debug;

use crate::changes::StyleChanges;
use crate::coordinator::{TransitionCoordinator, TransitionEndSink};
use crate::observer::StyleObserver;
use crate::target::RenderTarget;

/// Lifecycle phase of the bound component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentPhase {
    Created,
    Mounted,
    Unmounted,
}

/// Binds one host component to its style coordinator.
#[derive(Debug)]
pub struct ComponentBinding {
    coordinator: TransitionCoordinator,
    phase: ComponentPhase,
}

impl ComponentBinding {
    pub fn new<O: StyleObserver + 'static>(
        coordinator: TransitionCoordinator,
        observer: &Arc<O>,
    ) -> Self {
        coordinator.attach_observer(observer);
        Self {
            coordinator,
            phase: ComponentPhase::Created,
        }
    }

    pub fn coordinator(&self) -> &TransitionCoordinator {
        &self.coordinator
    }

    pub fn phase(&self) -> ComponentPhase {
        self.phase
    }

    /// Read the initial property bag and publish exactly one snapshot.
    ///
    /// Mounting twice, or after unmount, does nothing.
    pub fn mount(&mut self, initial: Option<&StyleChanges>) {
        if self.phase != ComponentPhase::Created {
            return;
        }
        if let Some(initial) = initial {
            self.coordinator.apply_immediate(initial, true);
        }
        self.coordinator.publish();
        self.phase = ComponentPhase::Mounted;
        debug!("style component mounted");
    }

    /// Merge a props update: only keys present in `update` are touched.
    ///
    /// Returns whether anything changed. Ignored unless mounted.
    pub fn receive_props(&self, update: &StyleChanges) -> bool {
        if self.phase != ComponentPhase::Mounted {
            return false;
        }
        self.coordinator.apply_immediate(update, false)
    }

    /// Attach the live element; returns the sink its transition-end events
    /// should be routed to.
    pub fn attach_target<T: RenderTarget + 'static>(&self, target: &Arc<T>) -> TransitionEndSink {
        self.coordinator.attach_target(target);
        self.coordinator.transition_end_sink()
    }

    pub fn detach_target(&self) {
        self.coordinator.detach_target();
    }

    /// Tear the coordinator down. Pending transitions settle as detached and
    /// nothing is published afterwards.
    pub fn unmount(&mut self) {
        if self.phase == ComponentPhase::Unmounted {
            return;
        }
        self.coordinator.tear_down();
        self.phase = ComponentPhase::Unmounted;
        debug!("style component unmounted");
    }
}
