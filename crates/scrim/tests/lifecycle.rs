//! End-to-end lifecycle scenarios through the public API: callbacks,
//! auto-dismiss timing, gestures, and keyboard avoidance.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use scrim::{
    AnimationKind, Coordinator, Edge, KeyboardEvent, KeyboardInfo, MaskStyle, OverlayConfig,
    Point, Rect, RenderHost,
};
use scrim_core::test_host::StubHost;

fn setup() -> (Rc<StubHost>, Coordinator) {
    let host = Rc::new(StubHost::new());
    host.make_container(300.0, 600.0);
    let coordinator = Coordinator::new(host.clone() as Rc<dyn RenderHost>);
    (host, coordinator)
}

fn toast_frame() -> Rect {
    Rect::new(10.0, 20.0, 100.0, 50.0)
}

#[test]
fn lifecycle_callbacks_fire_in_order() {
    let (host, coordinator) = setup();
    let log: Rc<RefCell<Vec<&'static str>>> = Rc::new(RefCell::new(Vec::new()));

    let push = |tag: &'static str, log: &Rc<RefCell<Vec<&'static str>>>| {
        let log = log.clone();
        move |_: &scrim::OverlayHandle| log.borrow_mut().push(tag)
    };
    let config = OverlayConfig::new()
        .on_will_show(push("will_show", &log))
        .on_did_show(push("did_show", &log))
        .on_will_hide(push("will_hide", &log))
        .on_did_hide(push("did_hide", &log));

    let view = host.make_view(toast_frame());
    let handle = coordinator.show(view, config).unwrap();
    assert_eq!(*log.borrow(), vec!["will_show"]);

    host.settle();
    assert_eq!(*log.borrow(), vec!["will_show", "did_show"]);

    coordinator.hide(&handle);
    host.settle();
    assert_eq!(
        *log.borrow(),
        vec!["will_show", "did_show", "will_hide", "did_hide"]
    );
}

#[test]
fn callbacks_attached_after_show_still_fire() {
    let (host, coordinator) = setup();
    let hidden = Rc::new(std::cell::Cell::new(false));

    let view = host.make_view(toast_frame());
    let handle = coordinator.show(view, OverlayConfig::new()).unwrap();
    host.settle();

    let flag = hidden.clone();
    handle.update_config(|config| {
        config.on_did_hide = Some(Rc::new(move |_: &scrim::OverlayHandle| flag.set(true)));
    });

    coordinator.hide(&handle);
    host.settle();
    assert!(hidden.get());
}

#[test]
fn auto_dismiss_fires_once_at_the_deadline() {
    let (host, coordinator) = setup();
    let hidden = Rc::new(std::cell::Cell::new(0u32));

    let h = hidden.clone();
    let config = OverlayConfig::new()
        .auto_dismiss_after(Duration::from_secs(2))
        .on_did_hide(move |_| h.set(h.get() + 1));
    let view = host.make_view(toast_frame());
    let handle = coordinator.show(view, config).unwrap();
    host.settle();

    host.advance(Duration::from_millis(1999));
    assert!(handle.is_displaying());

    host.advance(Duration::from_millis(1));
    host.settle();
    assert_eq!(hidden.get(), 1);
    assert!(coordinator.is_empty());

    // No stray re-fire.
    host.advance(Duration::from_secs(10));
    host.settle();
    assert_eq!(hidden.get(), 1);
}

#[test]
fn manual_hide_beats_the_auto_dismiss_timer() {
    let (host, coordinator) = setup();
    let hidden = Rc::new(std::cell::Cell::new(0u32));

    let h = hidden.clone();
    let config = OverlayConfig::new()
        .auto_dismiss_after(Duration::from_secs(2))
        .on_did_hide(move |_| h.set(h.get() + 1));
    let view = host.make_view(toast_frame());
    let handle = coordinator.show(view, config).unwrap();
    host.settle();

    coordinator.hide(&handle);
    host.settle();
    host.advance(Duration::from_secs(5));
    host.settle();
    assert_eq!(hidden.get(), 1);
}

#[test]
fn swipe_to_dismiss_commits_past_the_threshold() {
    let (host, coordinator) = setup();
    let config = OverlayConfig::new()
        .mask_style(MaskStyle::None)
        .animation(AnimationKind::Directional(Edge::Bottom))
        .interactive_dismiss(true);
    let view = host.make_view(toast_frame());
    let handle = coordinator.show(view, config).unwrap();
    host.settle();

    // Height 50 at the default 0.5 threshold: 24 snaps back, 26 commits.
    handle.pan_changed(Point::new(0.0, 24.0));
    handle.pan_ended(Point::new(0.0, 24.0));
    host.settle();
    assert!(handle.is_displaying());
    assert_eq!(host.frame(view), toast_frame());

    handle.pan_changed(Point::new(0.0, 26.0));
    handle.pan_ended(Point::new(0.0, 26.0));
    host.settle();
    assert!(!handle.is_displaying());
    assert!(coordinator.is_empty());
}

#[test]
fn backdrop_tap_dismisses_when_enabled() {
    let (host, coordinator) = setup();
    let view = host.make_view(toast_frame());
    let handle = coordinator
        .show(view, OverlayConfig::new().dismiss_on_backdrop_tap(true))
        .unwrap();
    host.settle();

    handle.backdrop_tapped();
    host.settle();
    assert!(coordinator.is_empty());

    // Disabled: a tap is inert.
    let view = host.make_view(toast_frame());
    let handle = coordinator.show(view, OverlayConfig::new()).unwrap();
    host.settle();
    handle.backdrop_tapped();
    host.settle();
    assert!(handle.is_displaying());
}

#[test]
fn keyboard_avoidance_through_the_coordinator_hub() {
    let (host, coordinator) = setup();
    let events: Rc<RefCell<Vec<&'static str>>> = Rc::new(RefCell::new(Vec::new()));

    let e = events.clone();
    let e2 = events.clone();
    let config = OverlayConfig::new()
        .track_keyboard(true)
        .keyboard_gap(8.0)
        .on_keyboard_will_show(move || e.borrow_mut().push("will_show"))
        .on_keyboard_did_hide(move || e2.borrow_mut().push("did_hide"));

    // Bottom edge at y = 570.
    let view = host.make_view(Rect::new(10.0, 520.0, 100.0, 50.0));
    coordinator.show(view, config).unwrap();
    host.settle();

    let info = KeyboardInfo {
        begin_frame: Rect::new(0.0, 600.0, 300.0, 0.0),
        end_frame: Rect::new(0.0, 400.0, 300.0, 200.0),
        duration: Duration::from_millis(250),
    };
    let hub = coordinator.keyboard_hub();
    hub.emit(KeyboardEvent::WillShow, &info);
    // Occluded by 170, plus the 8-point gap.
    assert_eq!(host.frame(view).center(), Point::new(60.0, 545.0 - 178.0));

    hub.emit(KeyboardEvent::WillHide, &info);
    hub.emit(KeyboardEvent::DidHide, &info);
    assert_eq!(host.frame(view), Rect::new(10.0, 520.0, 100.0, 50.0));
    assert_eq!(*events.borrow(), vec!["will_show", "did_hide"]);
}

#[test]
fn keyboard_clear_of_the_overlay_moves_nothing() {
    let (host, coordinator) = setup();
    let frame = Rect::new(10.0, 20.0, 100.0, 50.0); // bottom edge at 70
    let view = host.make_view(frame);
    coordinator
        .show(view, OverlayConfig::new().track_keyboard(true))
        .unwrap();
    host.settle();

    let info = KeyboardInfo {
        begin_frame: Rect::new(0.0, 600.0, 300.0, 0.0),
        end_frame: Rect::new(0.0, 400.0, 300.0, 200.0),
        duration: Duration::from_millis(250),
    };
    coordinator.keyboard_hub().emit(KeyboardEvent::WillShow, &info);
    assert_eq!(host.frame(view), frame);
}

#[test]
fn frame_change_events_are_forwarded_verbatim() {
    let (host, coordinator) = setup();
    let seen = Rc::new(RefCell::new(None));

    let s = seen.clone();
    let config = OverlayConfig::new()
        .track_keyboard(true)
        .on_keyboard_frame_will_change(move |begin, end, duration| {
            *s.borrow_mut() = Some((begin, end, duration));
        });
    let view = host.make_view(toast_frame());
    coordinator.show(view, config).unwrap();
    host.settle();

    let info = KeyboardInfo {
        begin_frame: Rect::new(0.0, 400.0, 300.0, 200.0),
        end_frame: Rect::new(0.0, 350.0, 300.0, 250.0),
        duration: Duration::from_millis(150),
    };
    coordinator
        .keyboard_hub()
        .emit(KeyboardEvent::WillChangeFrame, &info);
    assert_eq!(
        *seen.borrow(),
        Some((info.begin_frame, info.end_frame, info.duration))
    );
}

#[test]
fn destroyed_overlay_stops_tracking_the_keyboard() {
    let (host, coordinator) = setup();
    let view = host.make_view(Rect::new(10.0, 520.0, 100.0, 50.0));
    let handle = coordinator
        .show(view, OverlayConfig::new().track_keyboard(true))
        .unwrap();
    host.settle();

    let hub = coordinator.keyboard_hub();
    assert_eq!(hub.subscriber_count(), 1);
    coordinator.hide(&handle);
    host.settle();
    assert_eq!(hub.subscriber_count(), 0);
}
