//! Events, handlers and the per-target listener store.

use std::cell::Cell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use super::HostNode;

/// An event callback. Identity (for removal) is the `Rc` pointer.
pub type Handler = Rc<dyn Fn(&Event)>;

/// Wrap a closure as a [`Handler`].
pub fn handler(f: impl Fn(&Event) + 'static) -> Handler {
    Rc::new(f)
}

/// Parameters for a synthesized event.
#[derive(Debug, Clone, PartialEq)]
pub struct EventInit {
    pub event_type: String,
    pub bubbles: bool,
    pub cancelable: bool,
    /// `KeyboardEvent.key`
    pub key: Option<String>,
    /// `CustomEvent.detail`
    pub detail: Option<serde_json::Value>,
}

impl EventInit {
    /// A bubbling, cancelable event.
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            bubbles: true,
            cancelable: true,
            key: None,
            detail: None,
        }
    }

    pub fn with_bubbles(mut self, bubbles: bool) -> Self {
        self.bubbles = bubbles;
        self
    }

    pub fn with_cancelable(mut self, cancelable: bool) -> Self {
        self.cancelable = cancelable;
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.detail = Some(detail);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventPhase {
    AtTarget,
    Bubbling,
}

/// An event in flight.
#[derive(Debug)]
pub struct Event {
    init: EventInit,
    target: HostNode,
    current_target: Cell<HostNode>,
    phase: Cell<EventPhase>,
    time_stamp: Duration,
    default_prevented: Cell<bool>,
    propagation_stopped: Cell<bool>,
    immediate_propagation_stopped: Cell<bool>,
}

impl Event {
    pub(crate) fn new(init: EventInit, target: HostNode, time_stamp: Duration) -> Self {
        Self {
            init,
            target,
            current_target: Cell::new(target),
            phase: Cell::new(EventPhase::AtTarget),
            time_stamp,
            default_prevented: Cell::new(false),
            propagation_stopped: Cell::new(false),
            immediate_propagation_stopped: Cell::new(false),
        }
    }

    pub fn event_type(&self) -> &str {
        &self.init.event_type
    }

    /// The node the event was dispatched to.
    pub fn target(&self) -> HostNode {
        self.target
    }

    /// The node whose listener is running.
    pub fn current_target(&self) -> HostNode {
        self.current_target.get()
    }

    pub fn phase(&self) -> EventPhase {
        self.phase.get()
    }

    pub fn bubbles(&self) -> bool {
        self.init.bubbles
    }

    pub fn cancelable(&self) -> bool {
        self.init.cancelable
    }

    pub fn key(&self) -> Option<&str> {
        self.init.key.as_deref()
    }

    pub fn detail(&self) -> Option<&serde_json::Value> {
        self.init.detail.as_ref()
    }

    /// Virtual time at dispatch.
    pub fn time_stamp(&self) -> Duration {
        self.time_stamp
    }

    /// Cancel the default action. Ignored for non-cancelable events.
    pub fn prevent_default(&self) {
        if self.init.cancelable {
            self.default_prevented.set(true);
        }
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }

    /// Stop after the listeners of the current target.
    pub fn stop_propagation(&self) {
        self.propagation_stopped.set(true);
    }

    /// Stop before the next listener, even on the current target.
    pub fn stop_immediate_propagation(&self) {
        self.propagation_stopped.set(true);
        self.immediate_propagation_stopped.set(true);
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped.get()
    }

    pub(crate) fn is_immediate_propagation_stopped(&self) -> bool {
        self.immediate_propagation_stopped.get()
    }

    pub(crate) fn enter(&self, current: HostNode, phase: EventPhase) {
        self.current_target.set(current);
        self.phase.set(phase);
    }
}

#[derive(Clone)]
pub(crate) struct Listener {
    pub handler: Handler,
    pub once: bool,
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener").field("once", &self.once).finish()
    }
}

#[derive(Debug, Default)]
pub(crate) struct ListenerStore {
    map: HashMap<HostNode, HashMap<String, Vec<Listener>>>,
}

impl ListenerStore {
    /// Register a listener. A handler already registered for the same
    /// target and event is not added twice.
    pub fn add(&mut self, target: HostNode, event: &str, handler: Handler, once: bool) -> bool {
        let listeners = self
            .map
            .entry(target)
            .or_default()
            .entry(event.to_string())
            .or_default();
        if listeners.iter().any(|l| Rc::ptr_eq(&l.handler, &handler)) {
            return false;
        }
        listeners.push(Listener { handler, once });
        true
    }

    pub fn remove(&mut self, target: HostNode, event: &str, handler: &Handler) -> bool {
        let Some(events) = self.map.get_mut(&target) else {
            return false;
        };
        let Some(listeners) = events.get_mut(event) else {
            return false;
        };

        let Some(pos) = listeners
            .iter()
            .position(|l| Rc::ptr_eq(&l.handler, handler))
        else {
            return false;
        };

        listeners.remove(pos);
        if listeners.is_empty() {
            events.remove(event);
        }
        if events.is_empty() {
            self.map.remove(&target);
        }
        true
    }

    /// Snapshot of the listeners for one target and event.
    pub fn get(&self, target: HostNode, event: &str) -> Vec<Listener> {
        self.map
            .get(&target)
            .and_then(|events| events.get(event))
            .cloned()
            .unwrap_or_default()
    }

    pub fn count(&self, target: HostNode, event: &str) -> usize {
        self.map
            .get(&target)
            .and_then(|events| events.get(event))
            .map_or(0, Vec::len)
    }
}
