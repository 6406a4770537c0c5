mod common;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use rune_style::{
    ComponentBinding, ComponentPhase, Property, RenderTarget, StyleChanges, StyleValue,
    TransitionCoordinator, TransitionEndEvent, TransitionOutcome,
};

use common::{FakeTarget, RecordingObserver, init_tracing};

fn binding() -> (ComponentBinding, Arc<RecordingObserver>) {
    init_tracing();
    let observer = Arc::new(RecordingObserver::default());
    let binding = ComponentBinding::new(TransitionCoordinator::new(), &observer);
    (binding, observer)
}

#[test]
fn mount_publishes_initial_bag_once() -> Result<()> {
    let (mut binding, observer) = binding();
    let initial = StyleChanges::from_pairs([
        ("x", StyleValue::Number(10.0)),
        ("y", StyleValue::Number(20.0)),
        ("opacity", StyleValue::Number(0.5)),
    ])?;

    binding.mount(Some(&initial));
    assert_eq!(binding.phase(), ComponentPhase::Mounted);
    assert_eq!(observer.count(), 1);
    let style = observer.last().expect("published style");
    assert_eq!(style.get("transform"), Some("translate3d(10px,20px,0px)"));
    assert_eq!(style.get("opacity"), Some("0.5"));

    binding.mount(Some(&initial));
    assert_eq!(observer.count(), 1);
    Ok(())
}

#[test]
fn mount_without_props_still_publishes() {
    let (mut binding, observer) = binding();
    binding.mount(None);
    assert_eq!(observer.count(), 1);
    assert!(observer.last().expect("published style").is_empty());
}

#[test]
fn prop_updates_merge_into_prior_state() -> Result<()> {
    let (mut binding, observer) = binding();
    let initial = StyleChanges::from_pairs([("width", 100.0), ("height", 50.0)])?;
    binding.mount(Some(&initial));

    let update = StyleChanges::from_pairs([("height", 80.0)])?;
    assert!(binding.receive_props(&update));
    assert_eq!(observer.count(), 2);
    let style = observer.last().expect("published style");
    assert_eq!(style.get("width"), Some("100px"));
    assert_eq!(style.get("height"), Some("80px"));

    // Same values again: nothing to publish.
    assert!(!binding.receive_props(&update));
    assert_eq!(observer.count(), 2);
    Ok(())
}

#[test]
fn props_before_mount_are_ignored() -> Result<()> {
    let (binding, observer) = binding();
    let update = StyleChanges::from_pairs([("opacity", 1.0)])?;
    assert!(!binding.receive_props(&update));
    assert_eq!(binding.coordinator().value(Property::Opacity), None);
    assert_eq!(observer.count(), 0);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn unmount_settles_pending_transition_and_silences_updates() -> Result<()> {
    let (mut binding, observer) = binding();
    binding.mount(None);
    let target = Arc::new(FakeTarget::new());
    let sink = binding.attach_target(&target);

    let changes = StyleChanges::new().with(Property::X, 30.0)?.with_duration(40);
    let future = binding.coordinator().transition_to(&changes);
    assert_eq!(observer.count(), 2);

    binding.unmount();
    assert_eq!(binding.phase(), ComponentPhase::Unmounted);
    assert_eq!(future.await, TransitionOutcome::Detached);

    // A late event from the element finds nothing to complete.
    assert!(!sink.dispatch(&TransitionEndEvent::new(target.id(), "transform")));
    tokio::time::sleep(Duration::from_millis(100)).await;

    let update = StyleChanges::from_pairs([("opacity", 0.2)])?;
    assert!(!binding.receive_props(&update));
    assert_eq!(observer.count(), 2);
    Ok(())
}
