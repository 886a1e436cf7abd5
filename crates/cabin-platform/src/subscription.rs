//! Broadcast-listener registrations as scoped resources.
//!
//! External listeners (the original's broadcast receivers) are modeled as
//! subscribe-with-handle: a controller acquires a [`ListenerHandle`] while
//! started and releases it on the symmetric teardown path. The hub counts
//! live registrations, so an unbalanced register/deregister pair is
//! directly observable in tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use cabin_core::prelude::*;
use cabin_core::EventTopic;

type SubscriptionId = u64;

#[derive(Debug, Default)]
struct HubInner {
    next_id: SubscriptionId,
    active: HashMap<SubscriptionId, EventTopic>,
}

/// Registry of active broadcast subscriptions for one shell.
///
/// Single-threaded; handles are exclusively owned by the controller that
/// acquired them.
#[derive(Debug, Clone, Default)]
pub struct ListenerHub {
    inner: Rc<RefCell<HubInner>>,
}

impl ListenerHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register interest in a topic. The registration stays active until
    /// the returned handle is released or dropped.
    pub fn subscribe(&self, topic: EventTopic) -> ListenerHandle {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.active.insert(id, topic);
        debug!(?topic, id, "listener registered");
        ListenerHandle {
            id,
            topic,
            hub: Rc::downgrade(&self.inner),
        }
    }

    /// Number of live registrations across all topics.
    pub fn active_count(&self) -> usize {
        self.inner.borrow().active.len()
    }

    /// Number of live registrations for one topic.
    pub fn active_count_for(&self, topic: EventTopic) -> usize {
        self.inner
            .borrow()
            .active
            .values()
            .filter(|t| **t == topic)
            .count()
    }
}

/// Scoped broadcast registration. Deregisters on [`release`](Self::release)
/// or drop, whichever comes first.
#[derive(Debug)]
pub struct ListenerHandle {
    id: SubscriptionId,
    topic: EventTopic,
    hub: Weak<RefCell<HubInner>>,
}

impl ListenerHandle {
    pub fn topic(&self) -> EventTopic {
        self.topic
    }

    /// Whether this registration is still live and covers `topic`.
    pub fn matches(&self, topic: EventTopic) -> bool {
        self.topic == topic && self.is_active()
    }

    pub fn is_active(&self) -> bool {
        self.hub
            .upgrade()
            .map(|inner| inner.borrow().active.contains_key(&self.id))
            .unwrap_or(false)
    }

    /// Deregister now. Idempotent.
    pub fn release(&mut self) {
        if let Some(inner) = self.hub.upgrade() {
            if inner.borrow_mut().active.remove(&self.id).is_some() {
                debug!(topic = ?self.topic, id = self.id, "listener released");
            }
        }
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        self.release();
    }
}
