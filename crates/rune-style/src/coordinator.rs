//! Transition coordinator.
//!
//! The `TransitionCoordinator` owns a [`StyleState`] and applies property
//! changes to it, either immediately or as a timed transition. After every
//! non-silent change it pushes the newly derived style outward, either to a
//! [`StyleObserver`] or, in direct-mutation mode, as style text written into
//! the attached [`RenderTarget`].
//!
//! # State machine
//!
//! ```text
//!            transition_to                 transition_to (interrupt)
//!   Idle ─────────────────▶ Transitioning ◀──────────────┐
//!    ▲                          │  └─────────────────────┘
//!    └──────────────────────────┘
//!      timer fired / own transition-end event / detach
//! ```
//!
//! At most one session is in flight. Each session is watched by exactly one
//! [`CompletionWatcher`]: the render target's transition-end event when a
//! target is attached and something changed, a timer otherwise. A session's
//! future settles exactly once, with [`TransitionOutcome::Completed`],
//! [`TransitionOutcome::Interrupted`] or [`TransitionOutcome::Detached`].
//!
//! # Usage
//!
//! ```ignore
//! let coordinator = TransitionCoordinator::new();
//! coordinator.attach_observer(&observer);
//!
//! let changes = StyleChanges::new().with(Property::X, 120.0)?;
//! let outcome = coordinator.transition_to(&changes).await;
//! ```

use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::future::{Future, Ready};
use std::pin::Pin;
use std::sync::{Arc, Weak};
use std::task::{Context, Poll, ready};
use std::time::Duration;

use rune_config::StyleConfig;
use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use crate::changes::StyleChanges;
use crate::error::{Result, StyleError};
use crate::observer::StyleObserver;
use crate::property::Property;
use crate::state::{DerivedStyle, StyleState};
use crate::target::{RenderTarget, TargetId, TransitionEndEvent};
use crate::value::StyleValue;
use crate::watcher::{CompletionWatcher, WatchMode};

/// How often an event watch checks that its target is still alive.
const TARGET_LIVENESS_INTERVAL: Duration = Duration::from_millis(100);

/// Display value set by [`TransitionCoordinator::show`].
pub const DISPLAY_VISIBLE: &str = "visible";
/// Display value set by [`TransitionCoordinator::hide`].
pub const DISPLAY_NONE: &str = "none";

/// Transition descriptor installed for the duration of a session.
pub fn transition_descriptor(duration_ms: u64) -> String {
    format!("transform {duration_ms}ms linear")
}

/// How a transition session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The transition ran to completion.
    Completed,
    /// A newer transition replaced this one before it finished.
    Interrupted,
    /// The coordinator was torn down, or the watched target detached.
    Detached,
}

/// Coarse coordinator state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinatorState {
    Idle,
    Transitioning,
}

/// Snapshot of the in-flight session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionInfo {
    pub id: u64,
    pub duration_ms: u64,
    pub mode: WatchMode,
    pub changes: StyleChanges,
}

#[derive(Debug)]
struct TransitionSession {
    id: u64,
    changes: StyleChanges,
    duration_ms: u64,
    /// Descriptor to put back when the session ends. `Clear` when there was none.
    restore_transition: StyleValue,
    resolve: oneshot::Sender<TransitionOutcome>,
    watcher: CompletionWatcher,
}

impl TransitionSession {
    fn settle(self, outcome: TransitionOutcome) {
        self.watcher.cancel();
        // The waiter may have dropped its future; nothing to resolve then.
        let _ = self.resolve.send(outcome);
    }
}

#[derive(Debug)]
struct AttachedTarget {
    id: TargetId,
    target: Weak<dyn RenderTarget>,
}

#[derive(Debug)]
struct Inner {
    state: StyleState,
    speed: f64,
    mutate_target: bool,
    scale_duration_ms: u64,
    observer: Option<Weak<dyn StyleObserver>>,
    target: Option<AttachedTarget>,
    session: Option<TransitionSession>,
    next_session_id: u64,
    torn_down: bool,
}

impl Inner {
    fn new() -> Self {
        Self {
            state: StyleState::new(),
            speed: rune_config::DEFAULT_SPEED,
            mutate_target: false,
            scale_duration_ms: rune_config::DEFAULT_SCALE_DURATION_MS,
            observer: None,
            target: None,
            session: None,
            next_session_id: 1,
            torn_down: false,
        }
    }

    fn observer(&self) -> Option<Arc<dyn StyleObserver>> {
        self.observer.as_ref().and_then(Weak::upgrade)
    }

    fn live_target(&self) -> Option<Arc<dyn RenderTarget>> {
        self.target.as_ref().and_then(|attached| attached.target.upgrade())
    }

    /// What to push outward for the current state, per the configured mode.
    fn publication(&self) -> Option<Publication> {
        if self.mutate_target {
            return self
                .live_target()
                .map(|target| Publication::Target(target, self.state.derive_style_text()));
        }
        self.observer()
            .map(|observer| Publication::Observer(observer, self.state.derive_style()))
    }

    /// Implicit durations follow the 2D distance travelled at `speed`.
    fn resolve_duration(&self, changes: &StyleChanges) -> u64 {
        if let Some(duration_ms) = changes.duration_ms() {
            return duration_ms;
        }
        let axis = |property: Property| {
            let current = self.state.number(property).unwrap_or(0.0);
            let target = changes
                .get(property)
                .map_or(current, |value| value.as_f64().unwrap_or(0.0));
            current - target
        };
        let distance = axis(Property::X).hypot(axis(Property::Y));
        (distance / self.speed).floor() as u64
    }

    /// End the session `session_id` if it is still the active one.
    fn complete(&mut self, session_id: u64, outcome: TransitionOutcome) -> bool {
        let Some(session) = self.session.take_if(|s| s.id == session_id) else {
            warn!(session = session_id, "completion for a session that is no longer active");
            return false;
        };
        // Silent restore: the descriptor change alone must not animate.
        self.state
            .assign(Property::Transition, session.restore_transition.clone());
        debug!(session = session_id, ?outcome, "transition finished");
        session.settle(outcome);
        true
    }
}

enum Publication {
    Observer(Arc<dyn StyleObserver>, DerivedStyle),
    Target(Arc<dyn RenderTarget>, String),
}

/// Side effects collected under the lock and delivered after releasing it.
#[derive(Default)]
struct Outbox {
    publication: Option<Publication>,
    diagnostics: Vec<(Option<Arc<dyn StyleObserver>>, StyleError)>,
}

impl Outbox {
    fn report(&mut self, observer: Option<Arc<dyn StyleObserver>>, error: StyleError) {
        self.diagnostics.push((observer, error));
    }

    fn deliver(self) {
        match self.publication {
            Some(Publication::Observer(observer, style)) => observer.on_style_changed(&style),
            Some(Publication::Target(target, css_text)) => target.write_style(&css_text),
            None => {}
        }
        for (observer, error) in self.diagnostics {
            match observer {
                Some(observer) => observer.on_diagnostic(&error),
                None => tracing::error!(%error, "style transition housekeeping failed"),
            }
        }
    }
}

fn arm_timer(
    shared: &Arc<Mutex<Inner>>,
    session_id: u64,
    duration_ms: u64,
) -> Result<JoinHandle<()>> {
    let runtime = tokio::runtime::Handle::try_current().map_err(|_| StyleError::NoRuntime)?;
    let shared = Arc::downgrade(shared);
    Ok(runtime.spawn(async move {
        tokio::time::sleep(Duration::from_millis(duration_ms)).await;
        if let Some(shared) = shared.upgrade() {
            shared.lock().complete(session_id, TransitionOutcome::Completed);
        }
    }))
}

/// Settle `session_id` as detached once the host drops `target` without
/// detaching it. Returns `None` outside a runtime; the event watch then relies
/// on an explicit detach.
fn watch_target_liveness(
    shared: &Arc<Mutex<Inner>>,
    session_id: u64,
    target: Weak<dyn RenderTarget>,
) -> Option<JoinHandle<()>> {
    let runtime = tokio::runtime::Handle::try_current().ok()?;
    let shared = Arc::downgrade(shared);
    Some(runtime.spawn(async move {
        let mut ticks = tokio::time::interval(TARGET_LIVENESS_INTERVAL);
        while target.strong_count() > 0 {
            ticks.tick().await;
        }
        let Some(shared) = shared.upgrade() else {
            return;
        };
        let mut outbox = Outbox::default();
        {
            let mut inner = shared.lock();
            if inner.complete(session_id, TransitionOutcome::Detached) {
                warn!(
                    session = session_id,
                    "render target dropped while a transition was pending"
                );
                outbox.report(inner.observer(), StyleError::TargetDetached);
            }
        }
        outbox.deliver();
    }))
}

/// Future returned by [`TransitionCoordinator::transition_to`].
///
/// Always settles, and never with an error: housekeeping failures go to the
/// observer's diagnostic hook instead.
#[derive(Debug)]
pub struct TransitionFuture {
    wait: oneshot::Receiver<TransitionOutcome>,
    outcome: Option<TransitionOutcome>,
}

/// Outcome for a session whose sender went away without settling it.
fn dropped_session() -> TransitionOutcome {
    debug!("transition session dropped without settling");
    TransitionOutcome::Detached
}

impl TransitionFuture {
    fn new(wait: oneshot::Receiver<TransitionOutcome>) -> Self {
        Self {
            wait,
            outcome: None,
        }
    }

    fn settled(outcome: TransitionOutcome) -> Self {
        let (resolve, wait) = oneshot::channel();
        let _ = resolve.send(outcome);
        Self::new(wait)
    }

    /// Outcome if the session has already settled. The future stays usable
    /// and resolves to the same outcome when awaited.
    pub fn try_outcome(&mut self) -> Option<TransitionOutcome> {
        if self.outcome.is_none() {
            self.outcome = match self.wait.try_recv() {
                Ok(outcome) => Some(outcome),
                Err(TryRecvError::Empty) => None,
                Err(TryRecvError::Closed) => Some(dropped_session()),
            };
        }
        self.outcome
    }
}

impl Future for TransitionFuture {
    type Output = TransitionOutcome;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if let Some(outcome) = self.outcome {
            return Poll::Ready(outcome);
        }
        let outcome = match ready!(Pin::new(&mut self.wait).poll(cx)) {
            Ok(outcome) => outcome,
            Err(_) => dropped_session(),
        };
        self.outcome = Some(outcome);
        Poll::Ready(outcome)
    }
}

/// Delivers a render target's transition-end events to its coordinator.
///
/// Holds only a weak reference; events arriving after the coordinator is
/// gone are dropped.
#[derive(Debug, Clone)]
pub struct TransitionEndSink {
    shared: Weak<Mutex<Inner>>,
}

impl TransitionEndSink {
    /// Offer an event. Returns whether it completed the active session.
    pub fn dispatch(&self, event: &TransitionEndEvent) -> bool {
        let Some(shared) = self.shared.upgrade() else {
            return false;
        };
        let mut inner = shared.lock();
        let session_id = match &inner.session {
            Some(session) if session.watcher.accepts(event) => session.id,
            _ => {
                trace!(
                    origin = event.target.0,
                    property = %event.property,
                    "ignoring transition end not raised by the watched target"
                );
                return false;
            }
        };
        inner.complete(session_id, TransitionOutcome::Completed)
    }
}

/// Applies style changes, optionally animated, and publishes the result.
#[derive(Debug)]
pub struct TransitionCoordinator {
    shared: Arc<Mutex<Inner>>,
}

impl Default for TransitionCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl TransitionCoordinator {
    /// Create a coordinator with default speed, units and notification mode.
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Mutex::new(Inner::new())),
        }
    }

    /// Create a coordinator from a loaded configuration.
    pub fn with_config(config: &StyleConfig) -> Result<Self> {
        let coordinator = Self::new();
        coordinator.set_speed(config.speed)?;
        let mut units = Vec::with_capacity(config.units.len());
        for (name, unit) in &config.units {
            units.push((name.parse::<Property>()?, unit.clone()));
        }
        {
            let mut inner = coordinator.shared.lock();
            inner.mutate_target = config.mutate_target;
            inner.scale_duration_ms = config.scale_duration_ms;
            inner.state.set_units(units);
        }
        Ok(coordinator)
    }

    /// Register the observer. Only a weak reference is kept.
    pub fn attach_observer<O: StyleObserver + 'static>(&self, observer: &Arc<O>) {
        let observer = Arc::downgrade(observer);
        let observer: Weak<dyn StyleObserver> = observer;
        self.shared.lock().observer = Some(observer);
    }

    pub fn detach_observer(&self) {
        self.shared.lock().observer = None;
    }

    /// Associate a live render target. Only a weak reference is kept.
    pub fn attach_target<T: RenderTarget + 'static>(&self, target: &Arc<T>) {
        let id = target.id();
        let target = Arc::downgrade(target);
        let target: Weak<dyn RenderTarget> = target;
        self.shared.lock().target = Some(AttachedTarget { id, target });
    }

    /// Drop the render target association.
    ///
    /// A session waiting on this target's transition-end event can no longer
    /// complete normally; it settles as detached and the failure is reported
    /// as a diagnostic.
    pub fn detach_target(&self) {
        let mut outbox = Outbox::default();
        {
            let mut inner = self.shared.lock();
            let Some(attached) = inner.target.take() else {
                return;
            };
            let waiting = inner
                .session
                .as_ref()
                .filter(|session| session.watcher.watches(attached.id))
                .map(|session| session.id);
            if let Some(session_id) = waiting {
                inner.complete(session_id, TransitionOutcome::Detached);
                outbox.report(inner.observer(), StyleError::TargetDetached);
            }
        }
        outbox.deliver();
    }

    /// Handle for routing the target's transition-end events back here.
    pub fn transition_end_sink(&self) -> TransitionEndSink {
        TransitionEndSink {
            shared: Arc::downgrade(&self.shared),
        }
    }

    pub fn derive_style(&self) -> DerivedStyle {
        self.shared.lock().state.derive_style()
    }

    pub fn derive_style_text(&self) -> String {
        self.shared.lock().state.derive_style_text()
    }

    /// Current value of `property`.
    pub fn value(&self, property: Property) -> Option<StyleValue> {
        self.shared.lock().state.get(property).cloned()
    }

    /// Change a unit suffix. Never notifies.
    pub fn set_unit(&self, property: Property, unit: impl Into<String>) {
        self.shared.lock().state.set_unit(property, unit);
    }

    /// Change several unit suffixes. Never notifies.
    pub fn set_units<I, S>(&self, units: I)
    where
        I: IntoIterator<Item = (Property, S)>,
        S: Into<String>,
    {
        self.shared.lock().state.set_units(units);
    }

    pub fn speed(&self) -> f64 {
        self.shared.lock().speed
    }

    /// Set the distance-per-millisecond divisor for implicit durations.
    pub fn set_speed(&self, speed: f64) -> Result<()> {
        if !speed.is_finite() || speed <= 0.0 {
            return Err(StyleError::InvalidSpeed(speed));
        }
        self.shared.lock().speed = speed;
        Ok(())
    }

    /// Apply `changes` with no transition bookkeeping.
    ///
    /// Publishes once if anything changed, unless `silent`.
    pub fn apply_immediate(&self, changes: &StyleChanges, silent: bool) -> bool {
        let mut outbox = Outbox::default();
        let changed = {
            let mut inner = self.shared.lock();
            let changed = inner.state.set_properties(changes);
            if changed && !silent {
                outbox.publication = inner.publication();
            }
            changed
        };
        outbox.deliver();
        changed
    }

    /// Set a single property, validating its value kind first.
    pub fn set_property(
        &self,
        property: Property,
        value: impl Into<StyleValue>,
        silent: bool,
    ) -> Result<bool> {
        let changes = StyleChanges::new().with(property, value)?;
        Ok(self.apply_immediate(&changes, silent))
    }

    /// Replace the custom style overlay.
    pub fn set_custom_style(&self, style: BTreeMap<String, StyleValue>, silent: bool) -> bool {
        let mut outbox = Outbox::default();
        let changed = {
            let mut inner = self.shared.lock();
            let changed = inner.state.set_custom_style(style);
            if changed && !silent {
                outbox.publication = inner.publication();
            }
            changed
        };
        outbox.deliver();
        changed
    }

    pub fn set_position(&self, x: f64, y: f64, silent: bool) -> Result<bool> {
        let changes = StyleChanges::new()
            .with(Property::X, x)?
            .with(Property::Y, y)?;
        Ok(self.apply_immediate(&changes, silent))
    }

    pub fn set_dimensions(&self, width: f64, height: f64, silent: bool) -> Result<bool> {
        let changes = StyleChanges::new()
            .with(Property::Width, width)?
            .with(Property::Height, height)?;
        Ok(self.apply_immediate(&changes, silent))
    }

    pub fn set_width(&self, width: f64, silent: bool) -> Result<bool> {
        self.set_property(Property::Width, width, silent)
    }

    pub fn set_height(&self, height: f64, silent: bool) -> Result<bool> {
        self.set_property(Property::Height, height, silent)
    }

    pub fn set_scale(&self, scale: f64, silent: bool) -> Result<bool> {
        self.set_property(Property::Scale, scale, silent)
    }

    pub fn set_rotation(&self, rotation: f64, silent: bool) -> Result<bool> {
        self.set_property(Property::Rotation, rotation, silent)
    }

    pub fn set_opacity(&self, opacity: f64, silent: bool) -> Result<bool> {
        self.set_property(Property::Opacity, opacity, silent)
    }

    pub fn set_transition(&self, transition: impl Into<String>, silent: bool) -> Result<bool> {
        self.set_property(Property::Transition, transition.into(), silent)
    }

    /// Push the current derived style regardless of whether anything changed.
    pub fn publish(&self) {
        let outbox = Outbox {
            publication: self.shared.lock().publication(),
            ..Outbox::default()
        };
        outbox.deliver();
    }

    /// Animate towards `changes`.
    ///
    /// The duration is `changes.duration_ms()` when given, otherwise the 2D
    /// distance to the target position divided by the configured speed. A
    /// session already in flight is interrupted: its future settles with
    /// [`TransitionOutcome::Interrupted`] and its saved descriptor carries
    /// over as the one to restore.
    pub fn transition_to(&self, changes: &StyleChanges) -> TransitionFuture {
        let mut outbox = Outbox::default();
        let future = {
            let mut inner = self.shared.lock();
            if inner.torn_down {
                return TransitionFuture::settled(TransitionOutcome::Detached);
            }
            let duration_ms = inner.resolve_duration(changes);

            let restore_transition = match inner.session.take() {
                Some(previous) => {
                    debug!(session = previous.id, "interrupting transition");
                    let restore = previous.restore_transition.clone();
                    previous.settle(TransitionOutcome::Interrupted);
                    restore
                }
                None => inner
                    .state
                    .get(Property::Transition)
                    .cloned()
                    .unwrap_or(StyleValue::Clear),
            };

            inner.state.assign(
                Property::Transition,
                StyleValue::Text(transition_descriptor(duration_ms)),
            );
            let changed = inner.state.set_properties(changes);
            if changed {
                outbox.publication = inner.publication();
            }

            let session_id = inner.next_session_id;
            inner.next_session_id += 1;

            let watched_target = inner
                .target
                .as_ref()
                .filter(|attached| changed && attached.target.strong_count() > 0)
                .map(|attached| (attached.id, attached.target.clone()));
            let watcher = match watched_target {
                Some((target, weak)) => Ok(CompletionWatcher::Event {
                    target,
                    liveness: watch_target_liveness(&self.shared, session_id, weak),
                }),
                None => {
                    arm_timer(&self.shared, session_id, duration_ms).map(CompletionWatcher::Timer)
                }
            };

            match watcher {
                Ok(watcher) => {
                    debug!(
                        session = session_id,
                        duration_ms,
                        mode = %watcher.mode(),
                        changed,
                        "transition started"
                    );
                    let (resolve, wait) = oneshot::channel();
                    inner.session = Some(TransitionSession {
                        id: session_id,
                        changes: changes.clone(),
                        duration_ms,
                        restore_transition,
                        resolve,
                        watcher,
                    });
                    TransitionFuture::new(wait)
                }
                Err(error) => {
                    // Nothing can wake the session; finish it on the spot.
                    inner
                        .state
                        .assign(Property::Transition, restore_transition);
                    outbox.report(inner.observer(), error);
                    TransitionFuture::settled(TransitionOutcome::Completed)
                }
            }
        };
        outbox.deliver();
        future
    }

    /// Timed scale change. Uses the configured default duration when
    /// `duration_ms` is `None`.
    pub fn scale_to(&self, scale: f64, duration_ms: Option<u64>) -> Result<TransitionFuture> {
        let duration_ms = duration_ms.unwrap_or_else(|| self.shared.lock().scale_duration_ms);
        let changes = StyleChanges::new()
            .with(Property::Scale, scale)?
            .with_duration(duration_ms);
        Ok(self.transition_to(&changes))
    }

    /// Make the component visible. The returned future is already resolved
    /// once the change has been applied; nothing is animated.
    pub fn show(&self, silent: bool) -> Ready<()> {
        self.set_display(DISPLAY_VISIBLE, silent);
        std::future::ready(())
    }

    /// Hide the component. Returns whether the display value changed.
    pub fn hide(&self, silent: bool) -> bool {
        self.set_display(DISPLAY_NONE, silent)
    }

    fn set_display(&self, display: &str, silent: bool) -> bool {
        let mut outbox = Outbox::default();
        let changed = {
            let mut inner = self.shared.lock();
            let changed = inner
                .state
                .assign(Property::Display, StyleValue::from(display));
            if changed && !silent {
                outbox.publication = inner.publication();
            }
            changed
        };
        outbox.deliver();
        changed
    }

    pub fn state(&self) -> CoordinatorState {
        if self.shared.lock().session.is_some() {
            CoordinatorState::Transitioning
        } else {
            CoordinatorState::Idle
        }
    }

    pub fn is_transitioning(&self) -> bool {
        self.state() == CoordinatorState::Transitioning
    }

    pub fn session_info(&self) -> Option<SessionInfo> {
        self.shared.lock().session.as_ref().map(|session| SessionInfo {
            id: session.id,
            duration_ms: session.duration_ms,
            mode: session.watcher.mode(),
            changes: session.changes.clone(),
        })
    }

    /// Detach from the host.
    ///
    /// Drops the observer and target, settles a pending session as detached
    /// and disarms its watcher. Nothing is published afterwards, and later
    /// transitions settle immediately.
    pub fn tear_down(&self) {
        let mut inner = self.shared.lock();
        inner.torn_down = true;
        inner.observer = None;
        inner.target = None;
        if let Some(session_id) = inner.session.as_ref().map(|session| session.id) {
            inner.complete(session_id, TransitionOutcome::Detached);
        }
    }

    pub fn is_torn_down(&self) -> bool {
        self.shared.lock().torn_down
    }
}

impl Drop for TransitionCoordinator {
    fn drop(&mut self) {
        self.tear_down();
    }
}
