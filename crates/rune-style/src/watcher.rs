//! Completion detection for a transition session.
//!
//! A session is watched by exactly one mechanism, chosen when the session is
//! armed: a timer task, or a subscription to the render target's
//! transition-end event. Replacing a session cancels its watcher first, so
//! two sources can never both resolve the same wait.
//!
//! An event watch carries a liveness task that settles the session when the
//! host drops the target without detaching it first.

use std::fmt;

use tokio::task::JoinHandle;

use crate::target::{TargetId, TransitionEndEvent};

/// How a session detects that its transition finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchMode {
    /// A timer armed for the resolved duration.
    Timer,
    /// The render target's own transition-end event.
    Event,
}

impl fmt::Display for WatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timer => f.write_str("timer"),
            Self::Event => f.write_str("event"),
        }
    }
}

/// The single active completion mechanism of a session.
#[derive(Debug)]
pub enum CompletionWatcher {
    /// Timer task that completes the session when it wakes.
    Timer(JoinHandle<()>),
    /// Waiting for one transition-end event raised by `target` itself.
    /// `liveness` is absent when no runtime was available to spawn it.
    Event {
        target: TargetId,
        liveness: Option<JoinHandle<()>>,
    },
}

impl CompletionWatcher {
    pub fn mode(&self) -> WatchMode {
        match self {
            Self::Timer(_) => WatchMode::Timer,
            Self::Event { .. } => WatchMode::Event,
        }
    }

    /// Whether `event` completes this watch.
    ///
    /// Events bubbled up from descendants carry another origin and are
    /// rejected. Timer watches accept no events.
    pub fn accepts(&self, event: &TransitionEndEvent) -> bool {
        match self {
            Self::Timer(_) => false,
            Self::Event { target, .. } => event.target == *target,
        }
    }

    /// Whether this watch depends on `target` staying attached.
    pub fn watches(&self, target: TargetId) -> bool {
        matches!(self, Self::Event { target: t, .. } if *t == target)
    }

    /// Disarm the watcher. Its timer or liveness task is aborted, and an
    /// event subscription stops matching once the watcher is gone.
    pub fn cancel(self) {
        match self {
            Self::Timer(handle) => handle.abort(),
            Self::Event {
                liveness: Some(handle),
                ..
            } => handle.abort(),
            Self::Event { liveness: None, .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    #[test]
    fn event_watch_rejects_bubbled_events() {
        let own = TargetId::new();
        let child = TargetId::new();
        let watcher = CompletionWatcher::Event {
            target: own,
            liveness: None,
        };

        assert!(watcher.accepts(&TransitionEndEvent::new(own, "transform")));
        assert!(!watcher.accepts(&TransitionEndEvent::new(child, "transform")));
        assert!(watcher.watches(own));
        assert_eq!(watcher.mode(), WatchMode::Event);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_aborts_timer_task() {
        let fired = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&fired);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            flag.store(true, Ordering::SeqCst);
        });
        let watcher = CompletionWatcher::Timer(handle);
        assert!(!watcher.accepts(&TransitionEndEvent::new(TargetId::new(), "transform")));
        assert_eq!(watcher.mode(), WatchMode::Timer);

        watcher.cancel();
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!fired.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_aborts_event_liveness_task() {
        let fired = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&fired);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            flag.store(true, Ordering::SeqCst);
        });
        let watcher = CompletionWatcher::Event {
            target: TargetId::new(),
            liveness: Some(handle),
        };

        watcher.cancel();
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!fired.load(Ordering::SeqCst));
    }
}
