#![forbid(unsafe_code)]

//! Keyboard notification dispatch.
//!
//! The platform glue observes its native keyboard notifications and
//! feeds them into a [`KeyboardHub`]; overlay records subscribe for
//! their lifetime and drop the [`KeyboardSubscription`] guard on
//! destruction. Explicit handles replace notification-center observer
//! bookkeeping: unsubscription is deterministic, not tied to
//! finalization order.
//!
//! # Invariants
//!
//! 1. Handlers are notified in subscription order.
//! 2. Dropping a subscription removes its handler before the next
//!    `emit`.
//! 3. Subscribing or unsubscribing from inside a handler never
//!    invalidates the in-flight dispatch (handlers are snapshotted
//!    before the cycle).

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use ahash::AHashMap;

use crate::geometry::Rect;

/// Keyboard lifecycle notification kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyboardEvent {
    WillShow,
    DidShow,
    WillChangeFrame,
    DidChangeFrame,
    WillHide,
    DidHide,
}

/// Geometry and timing reported alongside a keyboard notification.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct KeyboardInfo {
    /// Keyboard frame before the transition.
    pub begin_frame: Rect,
    /// Keyboard frame after the transition.
    pub end_frame: Rect,
    /// The platform's own animation duration for the transition.
    pub duration: Duration,
}

type Handler = Rc<dyn Fn(KeyboardEvent, &KeyboardInfo)>;

#[derive(Default)]
struct HubInner {
    handlers: AHashMap<u64, Handler>,
    order: Vec<u64>,
    next_id: u64,
}

/// Single-threaded keyboard notification dispatcher.
///
/// Cheap to clone; clones share the same registry.
#[derive(Clone, Default)]
pub struct KeyboardHub {
    inner: Rc<RefCell<HubInner>>,
}

impl KeyboardHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for every keyboard event until the returned
    /// guard is dropped.
    pub fn subscribe(
        &self,
        handler: impl Fn(KeyboardEvent, &KeyboardInfo) + 'static,
    ) -> KeyboardSubscription {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.handlers.insert(id, Rc::new(handler));
        inner.order.push(id);
        tracing::trace!(subscription = id, "keyboard handler subscribed");
        KeyboardSubscription {
            hub: Rc::downgrade(&self.inner),
            id,
        }
    }

    /// Dispatch one notification to every live handler.
    pub fn emit(&self, event: KeyboardEvent, info: &KeyboardInfo) {
        // Snapshot so handlers may subscribe/unsubscribe re-entrantly.
        let snapshot: Vec<Handler> = {
            let inner = self.inner.borrow();
            inner
                .order
                .iter()
                .filter_map(|id| inner.handlers.get(id).cloned())
                .collect()
        };
        tracing::trace!(?event, handlers = snapshot.len(), "keyboard event");
        for handler in snapshot {
            handler(event, info);
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().handlers.len()
    }
}

impl core::fmt::Debug for KeyboardHub {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("KeyboardHub")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// RAII guard for a [`KeyboardHub`] subscription; unsubscribes on drop.
pub struct KeyboardSubscription {
    hub: Weak<RefCell<HubInner>>,
    id: u64,
}

impl Drop for KeyboardSubscription {
    fn drop(&mut self) {
        if let Some(hub) = self.hub.upgrade() {
            let mut inner = hub.borrow_mut();
            inner.handlers.remove(&self.id);
            inner.order.retain(|id| *id != self.id);
            tracing::trace!(subscription = self.id, "keyboard handler unsubscribed");
        }
    }
}

impl core::fmt::Debug for KeyboardSubscription {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("KeyboardSubscription")
            .field("id", &self.id)
            .finish()
    }
}
