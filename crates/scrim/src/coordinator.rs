#![forbid(unsafe_code)]

//! The overlay coordinator: a z-ordered queue of live overlay records
//! over one [`RenderHost`] and one [`KeyboardHub`].
//!
//! # Invariants
//!
//! 1. The queue holds exactly the live (not yet destroyed) records,
//!    ordered by z: bottom-most first, front-most last. Higher priority
//!    tiers sit above lower ones; within a tier, later shows sit above
//!    earlier ones.
//! 2. A record leaves the queue only when its dismissal completes —
//!    never while its exit animation is still running.
//! 3. `show` mutates nothing when container resolution fails.
//!
//! # Failure Modes
//!
//! - [`Coordinator::show`] returns [`Error::NoContainerAvailable`] when
//!   the config names no container and the host has no default. Every
//!   hide flavor is a silent no-op on records that are not dismissable.

use std::cell::RefCell;
use std::rc::Rc;

use scrim_core::error::{Error, Result};
use scrim_core::host::{Completion, RenderHost, ViewId};
use scrim_core::keyboard::KeyboardHub;

use crate::config::{DismissOption, OverlayConfig};
use crate::record::{OverlayHandle, OverlayRecord};

pub(crate) struct CoordinatorInner {
    host: Rc<dyn RenderHost>,
    keyboard: KeyboardHub,
    /// Live records, bottom → top.
    queue: RefCell<Vec<Rc<OverlayRecord>>>,
}

impl CoordinatorInner {
    fn remove(&self, rec: &Rc<OverlayRecord>) {
        self.queue.borrow_mut().retain(|q| !Rc::ptr_eq(q, rec));
    }

    fn removal_completion(inner: &Rc<Self>, rec: &Rc<OverlayRecord>) -> Completion {
        let weak = Rc::downgrade(inner);
        let target = rec.clone();
        Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.remove(&target);
            }
        })
    }

    /// Dismiss `rec` and remove it from the queue once the dismissal
    /// completes. Idempotent through the record's lifecycle guard.
    pub(crate) fn hide_record(inner: &Rc<Self>, rec: Rc<OverlayRecord>, animated: bool) {
        let done = Self::removal_completion(inner, &rec);
        rec.dismiss(animated, Some(done));
    }

    /// Tear down every queued record without animation, including any
    /// still animating in.
    fn hide_all(inner: &Rc<Self>) {
        let records: Vec<_> = inner.queue.borrow().clone();
        tracing::debug!(count = records.len(), "hiding all overlays");
        for rec in records {
            let done = Self::removal_completion(inner, &rec);
            rec.force_dismiss(Some(done));
        }
    }
}

/// Handle to an overlay coordinator. Cheap to clone; clones share the
/// same queue, host, and keyboard hub.
#[derive(Clone)]
pub struct Coordinator {
    inner: Rc<CoordinatorInner>,
}

impl Coordinator {
    pub fn new(host: Rc<dyn RenderHost>) -> Self {
        Self {
            inner: Rc::new(CoordinatorInner {
                host,
                keyboard: KeyboardHub::new(),
                queue: RefCell::new(Vec::new()),
            }),
        }
    }

    /// The hub the platform glue feeds keyboard notifications into.
    pub fn keyboard_hub(&self) -> KeyboardHub {
        self.inner.keyboard.clone()
    }

    /// Present `view` as an overlay per `config`.
    ///
    /// Resolves the container (explicit, else the host's default),
    /// builds the record with its mask, slots it at its priority's
    /// z-position, and starts the entrance animation. With
    /// `config.exclusive` every existing overlay is cleared first,
    /// without animation.
    pub fn show(&self, view: ViewId, config: OverlayConfig) -> Result<OverlayHandle> {
        let container = config
            .container
            .or_else(|| self.inner.host.default_container())
            .ok_or(Error::NoContainerAvailable)?;

        if config.exclusive {
            CoordinatorInner::hide_all(&self.inner);
        }

        let rec = OverlayRecord::new(
            view,
            config,
            container,
            self.inner.host.clone(),
            &self.inner.keyboard,
            Rc::downgrade(&self.inner),
        );

        // Slot below the first strictly-higher-priority record, so ties
        // stack in show order and higher tiers stay on top. The anchor
        // is that record's mask when it has one, else its view.
        let (below, index) = {
            let queue = self.inner.queue.borrow();
            match queue.iter().position(|q| q.priority() > rec.priority()) {
                Some(i) => (Some(queue[i].sibling_anchor()), i),
                None => (None, queue.len()),
            }
        };
        rec.attach(below);
        self.inner.queue.borrow_mut().insert(index, rec.clone());
        tracing::debug!(
            view = view.raw(),
            priority = ?rec.priority(),
            z = index,
            depth = self.inner.queue.borrow().len(),
            "overlay shown"
        );

        rec.present(None);
        Ok(OverlayHandle { rec })
    }

    /// Dismiss one overlay (animated). No-op unless it is displayed.
    pub fn hide(&self, handle: &OverlayHandle) {
        CoordinatorInner::hide_record(&self.inner, handle.rec.clone(), true);
    }

    /// Dismiss every overlay presenting `view`.
    pub fn hide_view(&self, view: ViewId) {
        let matches: Vec<_> = self
            .inner
            .queue
            .borrow()
            .iter()
            .filter(|rec| rec.view() == view)
            .cloned()
            .collect();
        for rec in matches {
            CoordinatorInner::hide_record(&self.inner, rec, true);
        }
    }

    /// Bulk dismissal: bottom-most, front-most, or everything (the
    /// latter without animation).
    pub fn hide_where(&self, option: DismissOption) {
        match option {
            DismissOption::First => {
                let first = self.inner.queue.borrow().first().cloned();
                if let Some(rec) = first {
                    CoordinatorInner::hide_record(&self.inner, rec, true);
                }
            }
            DismissOption::Last => {
                let last = self.inner.queue.borrow().last().cloned();
                if let Some(rec) = last {
                    CoordinatorInner::hide_record(&self.inner, rec, true);
                }
            }
            DismissOption::All => CoordinatorInner::hide_all(&self.inner),
        }
    }

    /// Number of live overlays.
    pub fn depth(&self) -> usize {
        self.inner.queue.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.queue.borrow().is_empty()
    }

    /// Front-most overlay, if any.
    pub fn top(&self) -> Option<OverlayHandle> {
        self.inner
            .queue
            .borrow()
            .last()
            .map(|rec| OverlayHandle { rec: rec.clone() })
    }

    /// Live overlays, bottom → top.
    pub fn overlays(&self) -> Vec<OverlayHandle> {
        self.inner
            .queue
            .borrow()
            .iter()
            .map(|rec| OverlayHandle { rec: rec.clone() })
            .collect()
    }
}

impl core::fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Coordinator")
            .field("depth", &self.depth())
            .finish()
    }
}

thread_local! {
    static DEFAULT: RefCell<Option<Coordinator>> = const { RefCell::new(None) };
}

/// Install (or clear, with `None`) the thread's default coordinator
/// used by the free [`show`]/[`hide_view`] functions.
pub fn set_default(coordinator: Option<Coordinator>) {
    DEFAULT.with(|slot| *slot.borrow_mut() = coordinator);
}

fn default_coordinator() -> Result<Coordinator> {
    DEFAULT
        .with(|slot| slot.borrow().clone())
        .ok_or(Error::NoDefaultCoordinator)
}

/// [`Coordinator::show`] against the thread's default coordinator.
pub fn show(view: ViewId, config: OverlayConfig) -> Result<OverlayHandle> {
    default_coordinator()?.show(view, config)
}

/// [`Coordinator::hide_view`] against the thread's default coordinator.
pub fn hide_view(view: ViewId) -> Result<()> {
    default_coordinator()?.hide_view(view);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Priority;
    use scrim_core::geometry::Rect;
    use scrim_core::host::MaskStyle;
    use scrim_core::test_host::StubHost;
    use std::time::Duration;

    fn setup() -> (Rc<StubHost>, Coordinator, ViewId) {
        let host = Rc::new(StubHost::new());
        let container = host.make_container(300.0, 600.0);
        let coordinator = Coordinator::new(host.clone() as Rc<dyn RenderHost>);
        (host, coordinator, container)
    }

    fn view(host: &StubHost) -> ViewId {
        host.make_view(Rect::new(10.0, 20.0, 100.0, 50.0))
    }

    fn unmasked() -> OverlayConfig {
        OverlayConfig::new().mask_style(MaskStyle::None)
    }

    #[test]
    fn show_without_any_container_errors() {
        let host = Rc::new(StubHost::new());
        let coordinator = Coordinator::new(host.clone() as Rc<dyn RenderHost>);
        let v = view(&host);
        let err = coordinator.show(v, OverlayConfig::new()).unwrap_err();
        assert!(matches!(err, Error::NoContainerAvailable));
        assert!(coordinator.is_empty());
        assert!(!host.is_attached(v));
    }

    #[test]
    fn explicit_container_overrides_default() {
        let (host, coordinator, default) = setup();
        let other = host.make_view(Rect::new(0.0, 0.0, 200.0, 200.0));
        let v = view(&host);
        coordinator
            .show(v, unmasked().container(other))
            .unwrap();
        assert_eq!(host.stacking(other), vec![v]);
        assert!(host.stacking(default).is_empty());
    }

    #[test]
    fn equal_priority_stacks_in_show_order() {
        let (host, coordinator, container) = setup();
        let a = view(&host);
        let b = view(&host);
        coordinator.show(a, unmasked()).unwrap();
        coordinator.show(b, unmasked()).unwrap();
        assert_eq!(host.stacking(container), vec![a, b]);
        assert_eq!(coordinator.top().unwrap().view(), b);
    }

    #[test]
    fn lower_priority_slots_below_higher() {
        let (host, coordinator, container) = setup();
        let high = view(&host);
        let low = view(&host);
        coordinator
            .show(high, unmasked().priority(Priority::High))
            .unwrap();
        coordinator
            .show(low, unmasked().priority(Priority::Low))
            .unwrap();
        assert_eq!(host.stacking(container), vec![low, high]);
        assert_eq!(coordinator.top().unwrap().view(), high);
    }

    #[test]
    fn lower_priority_slots_below_a_masked_higher_record() {
        let (host, coordinator, container) = setup();
        let high = view(&host);
        let low = view(&host);
        let handle = coordinator
            .show(high, OverlayConfig::new().priority(Priority::High))
            .unwrap();
        let mask = handle.mask().unwrap();
        coordinator
            .show(low, unmasked().priority(Priority::Low))
            .unwrap();
        // The newcomer lands below the higher record's mask too.
        assert_eq!(host.stacking(container), vec![low, mask, high]);
    }

    #[test]
    fn hide_removes_only_after_dismiss_completes() {
        let (host, coordinator, _) = setup();
        let handle = coordinator.show(view(&host), unmasked()).unwrap();
        host.settle();
        assert!(handle.is_displaying());

        coordinator.hide(&handle);
        assert_eq!(coordinator.depth(), 1, "still queued while animating out");
        host.settle();
        assert!(coordinator.is_empty());
        assert!(!host.is_attached(handle.view()));
    }

    #[test]
    fn hide_is_idempotent_mid_animation() {
        let (host, coordinator, _) = setup();
        let hidden = Rc::new(std::cell::Cell::new(0u32));
        let h = hidden.clone();
        let config = unmasked().on_did_hide(move |_| h.set(h.get() + 1));
        let handle = coordinator.show(view(&host), config).unwrap();
        host.settle();

        coordinator.hide(&handle);
        coordinator.hide(&handle);
        coordinator.hide(&handle);
        host.settle();
        assert_eq!(hidden.get(), 1);
        assert!(coordinator.is_empty());
    }

    #[test]
    fn hide_view_targets_every_matching_record() {
        let (host, coordinator, _) = setup();
        let shared = view(&host);
        let other = view(&host);
        coordinator.show(shared, unmasked()).unwrap();
        coordinator.show(other, unmasked()).unwrap();
        host.settle();

        coordinator.hide_view(shared);
        host.settle();
        assert_eq!(coordinator.depth(), 1);
        assert_eq!(coordinator.top().unwrap().view(), other);
    }

    #[test]
    fn hide_where_first_and_last() {
        let (host, coordinator, _) = setup();
        let a = view(&host);
        let b = view(&host);
        let c = view(&host);
        coordinator.show(a, unmasked()).unwrap();
        coordinator.show(b, unmasked()).unwrap();
        coordinator.show(c, unmasked()).unwrap();
        host.settle();

        coordinator.hide_where(DismissOption::First);
        host.settle();
        let remaining: Vec<_> = coordinator.overlays().iter().map(|h| h.view()).collect();
        assert_eq!(remaining, vec![b, c]);

        coordinator.hide_where(DismissOption::Last);
        host.settle();
        let remaining: Vec<_> = coordinator.overlays().iter().map(|h| h.view()).collect();
        assert_eq!(remaining, vec![b]);
    }

    #[test]
    fn hide_all_is_synchronous_and_cancels_timers() {
        let (host, coordinator, _) = setup();
        for _ in 0..3 {
            coordinator
                .show(
                    view(&host),
                    unmasked().auto_dismiss_after(Duration::from_secs(2)),
                )
                .unwrap();
        }
        host.settle();
        assert_eq!(host.scheduled_tasks(), 3);

        coordinator.hide_where(DismissOption::All);
        // Animation suppressed: no settle needed.
        assert!(coordinator.is_empty());
        assert_eq!(host.scheduled_tasks(), 0);
    }

    #[test]
    fn hide_all_clears_overlays_still_presenting() {
        let (host, coordinator, container) = setup();
        let handle = coordinator.show(view(&host), unmasked()).unwrap();
        assert!(!handle.is_displaying(), "still animating in");

        coordinator.hide_where(DismissOption::All);
        assert!(coordinator.is_empty());
        assert!(host.stacking(container).is_empty());
        // The orphaned entrance completion must not resurrect it.
        host.settle();
        assert!(!handle.is_displaying());
        assert!(coordinator.is_empty());
    }

    #[test]
    fn exclusive_show_clears_the_queue_first() {
        let (host, coordinator, container) = setup();
        let a = view(&host);
        let b = view(&host);
        coordinator.show(a, unmasked()).unwrap();
        coordinator.show(b, unmasked()).unwrap();
        host.settle();

        let solo = view(&host);
        coordinator.show(solo, unmasked().exclusive(true)).unwrap();
        assert_eq!(coordinator.depth(), 1);
        assert_eq!(host.stacking(container), vec![solo]);
    }

    #[test]
    fn failed_exclusive_show_leaves_queue_untouched() {
        let host = Rc::new(StubHost::new());
        let container = host.make_container(300.0, 600.0);
        let coordinator = Coordinator::new(host.clone() as Rc<dyn RenderHost>);
        coordinator.show(view(&host), unmasked()).unwrap();
        host.settle();

        host.set_default_container(None);
        let err = coordinator
            .show(view(&host), unmasked().exclusive(true))
            .unwrap_err();
        assert!(matches!(err, Error::NoContainerAvailable));
        assert_eq!(coordinator.depth(), 1);
        assert_eq!(host.stacking(container).len(), 1);
    }

    #[test]
    fn handle_request_hide_routes_through_coordinator() {
        let (host, coordinator, _) = setup();
        let handle = coordinator.show(view(&host), unmasked()).unwrap();
        host.settle();

        handle.request_hide();
        host.settle();
        assert!(coordinator.is_empty());
    }

    #[test]
    fn custom_hide_overrides_coordinator_removal() {
        let (host, coordinator, _) = setup();
        let called = Rc::new(std::cell::Cell::new(false));
        let c = called.clone();
        let config = unmasked().on_custom_hide(move |_| c.set(true));
        let handle = coordinator.show(view(&host), config).unwrap();
        host.settle();

        handle.request_hide();
        host.settle();
        assert!(called.get());
        // The callback owns dismissal; nothing was removed for it.
        assert_eq!(coordinator.depth(), 1);
        assert!(handle.is_displaying());
    }

    #[test]
    fn default_coordinator_free_functions() {
        let (host, coordinator, container) = setup();
        set_default(Some(coordinator.clone()));
        let v = view(&host);
        let handle = show(v, unmasked()).unwrap();
        host.settle();
        assert!(handle.is_displaying());
        assert_eq!(host.stacking(container), vec![v]);

        hide_view(v).unwrap();
        host.settle();
        assert!(coordinator.is_empty());

        set_default(None);
        assert!(matches!(
            show(view(&host), unmasked()),
            Err(Error::NoDefaultCoordinator)
        ));
        assert!(matches!(hide_view(v), Err(Error::NoDefaultCoordinator)));
    }
}
