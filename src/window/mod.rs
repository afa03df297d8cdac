//! Headless host environment.
//!
//! A [`Window`] owns one document plus everything a page script would reach
//! through `window`: listeners, timers and animation frames on a virtual
//! clock, the document ready state, and a layout provider. It is a cheap
//! `Rc` handle; callbacks hold a [`WeakWindow`] to avoid cycles.

mod events;
mod scheduler;

use std::cell::{Cell, Ref, RefCell, RefMut};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::rc::{Rc, Weak};
use std::time::Duration;

pub use events::{Event, EventInit, EventPhase, Handler, handler};
pub use scheduler::{PendingTimer, TaskKind, TimerId};

use events::ListenerStore;
use scheduler::Scheduler;

use crate::dom::{Dom, NodeId, parse_html};
use crate::error::{Error, Result};
use crate::util::{decode_text, extract_meta_charset};

/// Anything events can be dispatched to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostNode {
    /// The window itself.
    Window,
    /// The document or a node in it.
    Node(NodeId),
}

impl HostNode {
    /// The DOM node, unless this is the window.
    pub fn node_id(self) -> Option<NodeId> {
        match self {
            HostNode::Node(id) => Some(id),
            HostNode::Window => None,
        }
    }
}

impl From<NodeId> for HostNode {
    fn from(id: NodeId) -> Self {
        HostNode::Node(id)
    }
}

/// Window configuration.
#[derive(Debug, Clone)]
pub struct WindowConfig {
    /// Document URL, informational.
    pub url: String,
    /// Whether `request_animation_frame` is available. Animations are
    /// no-ops without it.
    pub animation_frames: bool,
    /// Virtual time between animation frames.
    pub frame_interval: Duration,
    /// Start with the ready state at `Complete`.
    pub start_loaded: bool,
    /// Maximum callbacks one `advance_time`/`flush` call may run.
    pub timer_step_limit: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            url: "about:blank".to_string(),
            animation_frames: true,
            frame_interval: Duration::from_millis(16),
            start_loaded: true,
            timer_step_limit: 10_000,
        }
    }
}

/// `document.readyState`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyState {
    Loading,
    Interactive,
    Complete,
}

/// Geometry provider. There is no layout engine, so sizes come from here.
pub trait Layout {
    /// `Element.scrollHeight` in CSS pixels.
    fn scroll_height(&self, dom: &Dom, id: NodeId) -> f64;
}

/// Reports zero for everything, like a headless DOM.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLayout;

impl Layout for NoLayout {
    fn scroll_height(&self, _dom: &Dom, _id: NodeId) -> f64 {
        0.0
    }
}

impl<F> Layout for F
where
    F: Fn(&Dom, NodeId) -> f64,
{
    fn scroll_height(&self, dom: &Dom, id: NodeId) -> f64 {
        self(dom, id)
    }
}

struct Inner {
    config: WindowConfig,
    dom: RefCell<Dom>,
    listeners: RefCell<ListenerStore>,
    scheduler: RefCell<Scheduler>,
    ready_state: Cell<ReadyState>,
    saved_display: RefCell<HashMap<NodeId, String>>,
    layout: RefCell<Rc<dyn Layout>>,
}

/// Handle to a headless window.
#[derive(Clone)]
pub struct Window(Rc<Inner>);

/// Non-owning window handle for callbacks.
#[derive(Clone)]
pub struct WeakWindow(Weak<Inner>);

impl WeakWindow {
    pub fn upgrade(&self) -> Option<Window> {
        self.0.upgrade().map(Window)
    }
}

impl fmt::Debug for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Window")
            .field("url", &self.0.config.url)
            .field("ready_state", &self.0.ready_state.get())
            .finish()
    }
}

impl fmt::Debug for WeakWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WeakWindow")
    }
}

impl Default for Window {
    fn default() -> Self {
        Self::new()
    }
}

impl Window {
    /// A window with an empty document.
    pub fn new() -> Self {
        Self::from_html("")
    }

    /// A window showing the given markup.
    pub fn from_html(html: &str) -> Self {
        Self::with_config(html, WindowConfig::default())
    }

    pub fn with_config(html: &str, config: WindowConfig) -> Self {
        Self::from_dom(parse_html(html), config)
    }

    /// Wrap an already-built DOM.
    pub fn from_dom(dom: Dom, config: WindowConfig) -> Self {
        let ready_state = if config.start_loaded {
            ReadyState::Complete
        } else {
            ReadyState::Loading
        };
        Self(Rc::new(Inner {
            scheduler: RefCell::new(Scheduler::new(config.frame_interval)),
            config,
            dom: RefCell::new(dom),
            listeners: RefCell::new(ListenerStore::default()),
            ready_state: Cell::new(ready_state),
            saved_display: RefCell::new(HashMap::new()),
            layout: RefCell::new(Rc::new(NoLayout)),
        }))
    }

    /// Load an HTML file, sniffing its encoding.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let html = decode_text(&bytes, extract_meta_charset(&bytes));
        let config = WindowConfig {
            url: format!("file://{}", path.display()),
            ..WindowConfig::default()
        };
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "loading document");
        Ok(Self::with_config(&html, config))
    }

    pub fn downgrade(&self) -> WeakWindow {
        WeakWindow(Rc::downgrade(&self.0))
    }

    /// Whether both handles refer to the same window.
    pub fn ptr_eq(&self, other: &Window) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn config(&self) -> &WindowConfig {
        &self.0.config
    }

    pub fn url(&self) -> &str {
        &self.0.config.url
    }

    /// Borrow the document. Do not hold the borrow across calls that run
    /// callbacks (dispatch, timers).
    pub fn dom(&self) -> Ref<'_, Dom> {
        self.0.dom.borrow()
    }

    /// Mutably borrow the document.
    pub fn dom_mut(&self) -> RefMut<'_, Dom> {
        self.0.dom.borrow_mut()
    }

    /// The document node.
    pub fn document(&self) -> NodeId {
        self.dom().document()
    }

    /// The `<body>` element, if the document has one.
    pub fn body(&self) -> Option<NodeId> {
        let dom = self.dom();
        let html = dom.first_element_child(dom.document())?;
        dom.element_children(html)
            .find(|&c| dom.local_name(c) == Some("body"))
    }

    // ------------------------------------------------------------------
    // Layout
    // ------------------------------------------------------------------

    /// Replace the layout provider.
    pub fn set_layout(&self, layout: impl Layout + 'static) {
        *self.0.layout.borrow_mut() = Rc::new(layout);
    }

    /// `Element.scrollHeight` from the layout provider.
    pub fn scroll_height(&self, id: NodeId) -> f64 {
        let layout = self.0.layout.borrow().clone();
        layout.scroll_height(&self.dom(), id)
    }

    // ------------------------------------------------------------------
    // Remembered display values for show/hide
    // ------------------------------------------------------------------

    pub(crate) fn remember_display(&self, id: NodeId, display: &str) {
        self.0
            .saved_display
            .borrow_mut()
            .insert(id, display.to_string());
    }

    pub(crate) fn remembered_display(&self, id: NodeId) -> Option<String> {
        self.0.saved_display.borrow().get(&id).cloned()
    }

    // ------------------------------------------------------------------
    // Timers
    // ------------------------------------------------------------------

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.0.scheduler.borrow().now()
    }

    pub fn set_timeout(&self, delay: Duration, callback: impl FnOnce() + 'static) -> TimerId {
        self.0
            .scheduler
            .borrow_mut()
            .schedule(delay, Box::new(callback))
    }

    pub fn clear_timeout(&self, id: TimerId) -> bool {
        self.0.scheduler.borrow_mut().cancel(id)
    }

    /// Queue a callback for the next frame. Returns `None` when the window
    /// has no animation frames.
    pub fn request_animation_frame(&self, callback: impl FnOnce() + 'static) -> Option<TimerId> {
        if !self.0.config.animation_frames {
            return None;
        }
        Some(
            self.0
                .scheduler
                .borrow_mut()
                .schedule_frame(Box::new(callback)),
        )
    }

    pub fn cancel_animation_frame(&self, id: TimerId) -> bool {
        self.clear_timeout(id)
    }

    /// Queued timers and frames in run order.
    pub fn pending_timers(&self) -> Vec<PendingTimer> {
        self.0.scheduler.borrow().pending_timers()
    }

    /// Move the clock forward, running everything that falls due on the way.
    pub fn advance_time(&self, delta: Duration) -> Result<usize> {
        let target = self.now().saturating_add(delta);
        let ran = self.run_timer_queue(Some(target))?;
        self.0.scheduler.borrow_mut().set_now(target);
        tracing::trace!(?delta, ran, "advanced clock");
        Ok(ran)
    }

    /// Run the callbacks already due without moving the clock.
    pub fn run_due_timers(&self) -> Result<usize> {
        let now = self.now();
        self.run_timer_queue(Some(now))
    }

    /// Run queued callbacks until none are left, jumping the clock as needed.
    pub fn flush(&self) -> Result<usize> {
        self.run_timer_queue(None)
    }

    fn run_timer_queue(&self, due_limit: Option<Duration>) -> Result<usize> {
        let limit = self.0.config.timer_step_limit;
        let mut steps = 0usize;
        loop {
            let task = self.0.scheduler.borrow_mut().pop_next(due_limit);
            let Some(task) = task else {
                break;
            };
            steps += 1;
            if steps > limit {
                return Err(Error::TimerStepLimit(limit));
            }
            task();
        }
        Ok(steps)
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    /// `addEventListener`. Returns false if the handler was already there.
    pub fn add_listener(&self, target: HostNode, event: &str, handler: Handler) -> bool {
        self.0
            .listeners
            .borrow_mut()
            .add(target, event, handler, false)
    }

    /// `addEventListener` with `{ once: true }`.
    pub fn add_listener_once(&self, target: HostNode, event: &str, handler: Handler) -> bool {
        self.0
            .listeners
            .borrow_mut()
            .add(target, event, handler, true)
    }

    /// `removeEventListener`. Needs the same handler value.
    pub fn remove_listener(&self, target: HostNode, event: &str, handler: &Handler) -> bool {
        self.0
            .listeners
            .borrow_mut()
            .remove(target, event, handler)
    }

    /// Number of listeners for one target and event.
    pub fn listener_count(&self, target: HostNode, event: &str) -> usize {
        self.0.listeners.borrow().count(target, event)
    }

    /// Dispatch an event. Returns false if a listener cancelled it.
    pub fn dispatch_event(&self, target: HostNode, init: EventInit) -> bool {
        let path = self.propagation_path(target, init.bubbles);
        let event = Event::new(init, target, self.now());
        tracing::trace!(event = event.event_type(), ?target, "dispatch");

        for (index, current) in path.into_iter().enumerate() {
            if event.is_propagation_stopped() {
                break;
            }
            let phase = if index == 0 {
                EventPhase::AtTarget
            } else {
                EventPhase::Bubbling
            };
            event.enter(current, phase);

            let listeners = self.0.listeners.borrow().get(current, event.event_type());
            for listener in listeners {
                if event.is_immediate_propagation_stopped() {
                    break;
                }
                if listener.once {
                    self.remove_listener(current, event.event_type(), &listener.handler);
                }
                (listener.handler)(&event);
            }
        }

        !event.default_prevented()
    }

    /// Target first, then ancestors up to the document, then the window.
    fn propagation_path(&self, target: HostNode, bubbles: bool) -> Vec<HostNode> {
        let HostNode::Node(id) = target else {
            return vec![HostNode::Window];
        };
        if !bubbles {
            return vec![target];
        }

        let dom = self.dom();
        let mut path = vec![target];
        let mut current = id;
        while let Some(parent) = dom.parent(current) {
            path.push(HostNode::Node(parent));
            current = parent;
        }
        if current == dom.document() {
            path.push(HostNode::Window);
        }
        path
    }

    // ------------------------------------------------------------------
    // Document lifecycle
    // ------------------------------------------------------------------

    pub fn ready_state(&self) -> ReadyState {
        self.0.ready_state.get()
    }

    /// Finish loading: fire `DOMContentLoaded` on the document, then `load`
    /// on the window. Does nothing once complete.
    pub fn finish_loading(&self) {
        if self.ready_state() == ReadyState::Complete {
            return;
        }
        self.0.ready_state.set(ReadyState::Interactive);
        let document = self.document();
        self.dispatch_event(
            HostNode::Node(document),
            EventInit::new("DOMContentLoaded").with_cancelable(false),
        );

        self.0.ready_state.set(ReadyState::Complete);
        self.dispatch_event(
            HostNode::Window,
            EventInit::new("load")
                .with_bubbles(false)
                .with_cancelable(false),
        );
    }

    // ------------------------------------------------------------------
    // User actions
    // ------------------------------------------------------------------

    /// Simulate a click, including the checkbox/radio default action.
    pub fn click(&self, id: NodeId) {
        let toggle = self.checkable_state(id);
        if let Some(was_checked) = toggle {
            self.set_checked(id, !was_checked || self.is_radio(id));
        }

        let proceed = self.dispatch_event(HostNode::Node(id), EventInit::new("click"));

        match toggle {
            Some(was_checked) if !proceed => self.set_checked(id, was_checked),
            Some(was_checked) if was_checked != self.is_checked(id) => {
                self.dispatch_event(
                    HostNode::Node(id),
                    EventInit::new("input").with_cancelable(false),
                );
                self.dispatch_event(
                    HostNode::Node(id),
                    EventInit::new("change").with_cancelable(false),
                );
            }
            _ => {}
        }
    }

    /// Simulate a double click: two clicks, then `dblclick`.
    pub fn dblclick(&self, id: NodeId) {
        self.click(id);
        self.click(id);
        self.dispatch_event(HostNode::Node(id), EventInit::new("dblclick"));
    }

    /// Move focus to an element, blurring the previous one first.
    pub fn focus(&self, id: NodeId) {
        let previous = {
            let dom = self.dom();
            if !dom.is_element(id) || dom.focused() == Some(id) {
                return;
            }
            dom.focused()
        };

        if let Some(previous) = previous {
            self.dom_mut().set_focused(None);
            self.dispatch_focus_event(previous, "blur", "focusout");
        }
        self.dom_mut().set_focused(Some(id));
        self.dispatch_focus_event(id, "focus", "focusin");
    }

    /// Remove focus from an element if it has it.
    pub fn blur(&self, id: NodeId) {
        if self.dom().focused() != Some(id) {
            return;
        }
        self.dom_mut().set_focused(None);
        self.dispatch_focus_event(id, "blur", "focusout");
    }

    fn dispatch_focus_event(&self, id: NodeId, plain: &str, bubbling: &str) {
        let target = HostNode::Node(id);
        self.dispatch_event(
            target,
            EventInit::new(plain)
                .with_bubbles(false)
                .with_cancelable(false),
        );
        self.dispatch_event(target, EventInit::new(bubbling).with_cancelable(false));
    }

    fn is_radio(&self, id: NodeId) -> bool {
        self.dom()
            .get_attr(id, "type")
            .is_some_and(|t| t.eq_ignore_ascii_case("radio"))
    }

    fn is_checked(&self, id: NodeId) -> bool {
        self.dom().has_attr(id, "checked")
    }

    /// Checked state of a checkbox or radio input, `None` for anything else.
    fn checkable_state(&self, id: NodeId) -> Option<bool> {
        let dom = self.dom();
        if dom.local_name(id) != Some("input") || dom.has_attr(id, "disabled") {
            return None;
        }
        let kind = dom.get_attr(id, "type")?.to_ascii_lowercase();
        matches!(kind.as_str(), "checkbox" | "radio").then(|| dom.has_attr(id, "checked"))
    }

    /// Set `checked`, unchecking the rest of a radio group.
    pub(crate) fn set_checked(&self, id: NodeId, checked: bool) {
        let mut dom = self.dom_mut();
        if !checked {
            dom.remove_attr(id, "checked");
            return;
        }
        dom.set_attr(id, "checked", "");

        let is_radio = dom
            .get_attr(id, "type")
            .is_some_and(|t| t.eq_ignore_ascii_case("radio"));
        let Some(group) = dom.get_attr(id, "name").map(str::to_string) else {
            return;
        };
        if !is_radio || group.is_empty() {
            return;
        }
        let others: Vec<NodeId> = dom
            .descendants(dom.document())
            .filter(|&n| {
                n != id
                    && dom.local_name(n) == Some("input")
                    && dom.get_attr(n, "name") == Some(group.as_str())
                    && dom
                        .get_attr(n, "type")
                        .is_some_and(|t| t.eq_ignore_ascii_case("radio"))
            })
            .collect();
        for other in others {
            dom.remove_attr(other, "checked");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn log_handler(log: &Rc<RefCell<Vec<String>>>, label: &'static str) -> Handler {
        let log = log.clone();
        handler(move |event| {
            log.borrow_mut()
                .push(format!("{label}:{}", event.event_type()))
        })
    }

    #[test]
    fn test_bubbling_path_reaches_window() {
        let window = Window::from_html(r#"<div id="outer"><p id="inner">x</p></div>"#);
        let (outer, inner) = {
            let dom = window.dom();
            (dom.get_by_id("outer").unwrap(), dom.get_by_id("inner").unwrap())
        };
        let log = Rc::new(RefCell::new(Vec::new()));
        window.add_listener(HostNode::Node(inner), "ping", log_handler(&log, "inner"));
        window.add_listener(HostNode::Node(outer), "ping", log_handler(&log, "outer"));
        window.add_listener(
            HostNode::Node(window.document()),
            "ping",
            log_handler(&log, "doc"),
        );
        window.add_listener(HostNode::Window, "ping", log_handler(&log, "win"));

        window.dispatch_event(HostNode::Node(inner), EventInit::new("ping"));
        assert_eq!(
            *log.borrow(),
            vec!["inner:ping", "outer:ping", "doc:ping", "win:ping"]
        );
    }

    #[test]
    fn test_stop_propagation_and_prevent_default() {
        let window = Window::from_html(r#"<div id="outer"><p id="inner">x</p></div>"#);
        let (outer, inner) = {
            let dom = window.dom();
            (dom.get_by_id("outer").unwrap(), dom.get_by_id("inner").unwrap())
        };
        let log = Rc::new(RefCell::new(Vec::new()));
        window.add_listener(
            HostNode::Node(inner),
            "click",
            handler(|e| {
                e.stop_propagation();
                e.prevent_default();
            }),
        );
        window.add_listener(HostNode::Node(outer), "click", log_handler(&log, "outer"));

        let proceed = window.dispatch_event(HostNode::Node(inner), EventInit::new("click"));
        assert!(!proceed);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_once_listener_and_handler_reentrancy() {
        let window = Window::from_html("<p id='p'></p>");
        let p = window.dom().get_by_id("p").unwrap();
        let weak = window.downgrade();
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        window.add_listener_once(
            HostNode::Node(p),
            "go",
            handler(move |_| {
                c.set(c.get() + 1);
                // Handlers may touch the window while running
                if let Some(w) = weak.upgrade() {
                    w.dom_mut().set_attr(p, "data-seen", "1");
                }
            }),
        );
        window.dispatch_event(HostNode::Node(p), EventInit::new("go"));
        window.dispatch_event(HostNode::Node(p), EventInit::new("go"));
        assert_eq!(count.get(), 1);
        assert_eq!(window.dom().get_attr(p, "data-seen"), Some("1"));
    }

    #[test]
    fn test_detached_target_does_not_reach_window() {
        let window = Window::new();
        let orphan = window.dom_mut().create_html_element("div");
        let log = Rc::new(RefCell::new(Vec::new()));
        window.add_listener(HostNode::Window, "ping", log_handler(&log, "win"));
        window.dispatch_event(HostNode::Node(orphan), EventInit::new("ping"));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_timers_run_in_order_with_clock() {
        let window = Window::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        for (delay, label) in [(30u64, "b"), (10, "a"), (30, "c")] {
            let log = log.clone();
            let weak = window.downgrade();
            window.set_timeout(Duration::from_millis(delay), move || {
                let now = weak.upgrade().map(|w| w.now().as_millis()).unwrap_or(0);
                log.borrow_mut().push(format!("{label}@{now}"));
            });
        }

        assert_eq!(window.advance_time(Duration::from_millis(20)).unwrap(), 1);
        assert_eq!(window.now(), Duration::from_millis(20));
        window.flush().unwrap();
        assert_eq!(*log.borrow(), vec!["a@10", "b@30", "c@30"]);
    }

    #[test]
    fn test_timer_step_limit() {
        fn reschedule(window: &Window) {
            let weak = window.downgrade();
            window.set_timeout(Duration::from_millis(1), move || {
                if let Some(w) = weak.upgrade() {
                    reschedule(&w);
                }
            });
        }

        let config = WindowConfig {
            timer_step_limit: 5,
            ..WindowConfig::default()
        };
        let window = Window::with_config("", config);
        reschedule(&window);
        assert!(matches!(window.flush(), Err(Error::TimerStepLimit(5))));
    }

    #[test]
    fn test_animation_frames_can_be_disabled() {
        let config = WindowConfig {
            animation_frames: false,
            ..WindowConfig::default()
        };
        let window = Window::with_config("", config);
        assert!(window.request_animation_frame(|| {}).is_none());
        assert!(Window::new().request_animation_frame(|| {}).is_some());
    }

    #[test]
    fn test_finish_loading_fires_in_order() {
        let config = WindowConfig {
            start_loaded: false,
            ..WindowConfig::default()
        };
        let window = Window::with_config("<p></p>", config);
        assert_eq!(window.ready_state(), ReadyState::Loading);

        let log = Rc::new(RefCell::new(Vec::new()));
        window.add_listener(
            HostNode::Node(window.document()),
            "DOMContentLoaded",
            log_handler(&log, "doc"),
        );
        window.add_listener(HostNode::Window, "load", log_handler(&log, "win"));

        window.finish_loading();
        window.finish_loading();
        assert_eq!(window.ready_state(), ReadyState::Complete);
        assert_eq!(*log.borrow(), vec!["doc:DOMContentLoaded", "win:load"]);
    }

    #[test]
    fn test_click_toggles_checkbox_and_fires_change() {
        let window = Window::from_html(r#"<input id="c" type="checkbox">"#);
        let c = window.dom().get_by_id("c").unwrap();
        let log = Rc::new(RefCell::new(Vec::new()));
        window.add_listener(HostNode::Node(c), "change", log_handler(&log, "c"));

        window.click(c);
        assert!(window.dom().has_attr(c, "checked"));
        window.click(c);
        assert!(!window.dom().has_attr(c, "checked"));
        assert_eq!(log.borrow().len(), 2);
    }

    #[test]
    fn test_prevented_click_reverts_checkbox() {
        let window = Window::from_html(r#"<input id="c" type="checkbox">"#);
        let c = window.dom().get_by_id("c").unwrap();
        window.add_listener(HostNode::Node(c), "click", handler(|e| e.prevent_default()));
        window.click(c);
        assert!(!window.dom().has_attr(c, "checked"));
    }

    #[test]
    fn test_radio_group() {
        let window = Window::from_html(
            r#"<input id="a" type="radio" name="g" checked><input id="b" type="radio" name="g">"#,
        );
        let (a, b) = {
            let dom = window.dom();
            (dom.get_by_id("a").unwrap(), dom.get_by_id("b").unwrap())
        };
        window.click(b);
        assert!(window.dom().has_attr(b, "checked"));
        assert!(!window.dom().has_attr(a, "checked"));
    }

    #[test]
    fn test_focus_moves_and_blurs() {
        let window = Window::from_html(r#"<input id="a"><input id="b">"#);
        let (a, b) = {
            let dom = window.dom();
            (dom.get_by_id("a").unwrap(), dom.get_by_id("b").unwrap())
        };
        let log = Rc::new(RefCell::new(Vec::new()));
        for (id, label) in [(a, "a"), (b, "b")] {
            window.add_listener(HostNode::Node(id), "focus", log_handler(&log, label));
            window.add_listener(HostNode::Node(id), "blur", log_handler(&log, label));
        }

        window.focus(a);
        window.focus(b);
        window.blur(a);
        window.blur(b);
        assert_eq!(
            *log.borrow(),
            vec!["a:focus", "a:blur", "b:focus", "b:blur"]
        );
        assert_eq!(window.dom().focused(), None);
    }

    #[test]
    fn test_layout_closure() {
        let window = Window::from_html("<div id='d'></div>");
        let d = window.dom().get_by_id("d").unwrap();
        assert_eq!(window.scroll_height(d), 0.0);
        window.set_layout(|_: &Dom, _: NodeId| 120.0);
        assert_eq!(window.scroll_height(d), 120.0);
    }

    #[test]
    fn test_open_sniffs_encoding() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.html");
        std::fs::write(
            &path,
            b"<meta charset=\"iso-8859-1\"><p id=\"p\">caf\xe9</p>".as_slice(),
        )
        .unwrap();

        let window = Window::open(&path).unwrap();
        let dom = window.dom();
        let p = dom.get_by_id("p").unwrap();
        assert_eq!(dom.text_content(p), "café");
        assert!(window.url().starts_with("file://"));
    }
}
