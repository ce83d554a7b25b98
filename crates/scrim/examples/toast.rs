//! Drive a toast and an alert through a full lifecycle against the
//! in-memory stub host, logging every transition.
//!
//! ```sh
//! cargo run -p scrim --example toast
//! ```

use std::rc::Rc;
use std::time::Duration;

use scrim::{
    AnimationKind, Coordinator, Edge, MaskStyle, OverlayConfig, Priority, Rect, RenderHost,
};
use scrim_core::test_host::StubHost;

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .init();

    let host = Rc::new(StubHost::new());
    let screen = host.make_container(300.0, 600.0);
    let coordinator = Coordinator::new(host.clone() as Rc<dyn RenderHost>);

    // A toast sliding up from the bottom, gone after two seconds.
    let toast = host.make_view(Rect::new(50.0, 520.0, 200.0, 40.0));
    coordinator
        .show(
            toast,
            OverlayConfig::new()
                .mask_style(MaskStyle::None)
                .priority(Priority::Low)
                .animation(AnimationKind::Directional(Edge::Bottom))
                .auto_dismiss_after(Duration::from_secs(2))
                .on_did_show(|_| println!("toast visible"))
                .on_did_hide(|_| println!("toast gone")),
        )
        .expect("stub host always has a container");

    // A dimmed alert above it, dismissed by tapping the backdrop.
    let alert = host.make_view(Rect::new(50.0, 220.0, 200.0, 140.0));
    let alert_handle = coordinator
        .show(
            alert,
            OverlayConfig::new()
                .priority(Priority::High)
                .animation(AnimationKind::Scale)
                .dismiss_on_backdrop_tap(true),
        )
        .expect("stub host always has a container");

    host.settle();
    println!(
        "stacking (bottom → top): {:?}",
        host.stacking(screen)
            .iter()
            .map(|v| v.raw())
            .collect::<Vec<_>>()
    );

    alert_handle.backdrop_tapped();
    host.settle();

    host.advance(Duration::from_secs(3));
    host.settle();
    assert!(coordinator.is_empty());
    println!("all overlays dismissed");
}
