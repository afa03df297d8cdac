//! Listener registration, synthetic dispatch and user-action triggers.

use super::Selection;
use crate::window::{EventInit, Handler, HostNode, ReadyState, handler};

/// Generates `on_<event>` shorthands over [`Selection::on`].
macro_rules! event_binders {
    ($($method:ident => $event:literal),* $(,)?) => {
        impl Selection {
            $(
                #[doc = concat!("Shorthand for `on(\"", $event, "\", handler)`.")]
                pub fn $method(&self, handler: &Handler) -> &Self {
                    self.on($event, handler)
                }
            )*
        }
    };
}

event_binders! {
    on_click => "click",
    on_dblclick => "dblclick",
    on_mousedown => "mousedown",
    on_mouseup => "mouseup",
    on_mousemove => "mousemove",
    on_mouseenter => "mouseenter",
    on_mouseleave => "mouseleave",
    on_mouseover => "mouseover",
    on_mouseout => "mouseout",
    on_keydown => "keydown",
    on_keyup => "keyup",
    on_keypress => "keypress",
    on_touchstart => "touchstart",
    on_touchend => "touchend",
    on_touchmove => "touchmove",
    on_touchcancel => "touchcancel",
    on_submit => "submit",
    on_change => "change",
    on_input => "input",
    on_focus => "focus",
    on_blur => "blur",
    on_scroll => "scroll",
    on_resize => "resize",
}

impl Selection {
    /// Register a handler on every member, the window and document included.
    pub fn on(&self, event: &str, handler: &Handler) -> &Self {
        if let Some(window) = self.window() {
            for &node in self.iter() {
                window.add_listener(node, event, handler.clone());
            }
        }
        self
    }

    /// Unregister a handler previously passed to [`Selection::on`].
    pub fn off(&self, event: &str, handler: &Handler) -> &Self {
        if let Some(window) = self.window() {
            for &node in self.iter() {
                window.remove_listener(node, event, handler);
            }
        }
        self
    }

    /// Dispatch a bubbling, cancelable event of this type on every member.
    pub fn trigger(&self, event: &str) -> &Self {
        self.dispatch(EventInit::new(event))
    }

    /// Dispatch a configured event on every member.
    pub fn dispatch(&self, init: EventInit) -> &Self {
        if let Some(window) = self.window() {
            for &node in self.iter() {
                window.dispatch_event(node, init.clone());
            }
        }
        self
    }

    /// Simulate a click on every element, with checkbox/radio toggling.
    pub fn click(&self) -> &Self {
        if let Some(window) = self.window() {
            for id in self.elements() {
                window.click(id);
            }
        }
        self
    }

    pub fn dblclick(&self) -> &Self {
        if let Some(window) = self.window() {
            for id in self.elements() {
                window.dblclick(id);
            }
        }
        self
    }

    /// Focus each element in turn; the last one keeps focus.
    pub fn focus(&self) -> &Self {
        if let Some(window) = self.window() {
            for id in self.elements() {
                window.focus(id);
            }
        }
        self
    }

    pub fn blur(&self) -> &Self {
        if let Some(window) = self.window() {
            for id in self.elements() {
                window.blur(id);
            }
        }
        self
    }

    /// Call `handler` on `keydown` when the key matches `target`, ignoring
    /// case. Returns the registered wrapper for use with `off("keydown")`.
    pub fn pressed_key(&self, target: &str, handler: Handler) -> Handler {
        let target = target.to_string();
        let wrapper = crate::window::handler(move |event| {
            if event
                .key()
                .is_some_and(|key| key.eq_ignore_ascii_case(&target))
            {
                handler(event);
            }
        });
        self.on("keydown", &wrapper);
        wrapper
    }

    /// Run `f` once the document has been parsed.
    pub fn ready(&self, f: impl FnOnce() + 'static) -> &Self {
        let Some(window) = self.window() else {
            return self;
        };
        if window.ready_state() != ReadyState::Loading {
            f();
            return self;
        }

        let pending = std::cell::Cell::new(Some(f));
        let document = HostNode::Node(window.document());
        window.add_listener_once(
            document,
            "DOMContentLoaded",
            handler(move |_| {
                if let Some(f) = pending.take() {
                    f();
                }
            }),
        );
        self
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use crate::selection::Selection;
    use crate::window::{EventInit, HostNode, Window, WindowConfig, handler};

    fn counter() -> (Rc<Cell<usize>>, crate::window::Handler) {
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        (count, handler(move |_| c.set(c.get() + 1)))
    }

    #[test]
    fn test_on_off_and_trigger() {
        let window = Window::from_html(r#"<button>a</button><button>b</button>"#);
        let buttons = Selection::from_input("button", Some(&window));
        let (count, h) = counter();

        buttons.on("click", &h).on("click", &h);
        buttons.trigger("click");
        assert_eq!(count.get(), 2, "one registration per member");

        buttons.off("click", &h).trigger("click");
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn test_binders_are_shorthands() {
        let window = Window::from_html(r#"<input id="i">"#);
        let input = Selection::from_input("#i", Some(&window));
        let (count, h) = counter();
        input.on_input(&h).on_change(&h).on_keyup(&h);
        input.trigger("input").trigger("change").trigger("keyup");
        assert_eq!(count.get(), 3);
    }

    #[test]
    fn test_events_bubble_to_window_selection() {
        let window = Window::from_html(r#"<div><span id="s"></span></div>"#);
        let (count, h) = counter();
        Selection::from_input(HostNode::Window, Some(&window)).on("ping", &h);
        Selection::from_input("#s", Some(&window)).trigger("ping");
        Selection::from_input("#s", Some(&window))
            .dispatch(EventInit::new("ping").with_bubbles(false));
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_click_action_toggles_checkbox() {
        let window = Window::from_html(r#"<input type="checkbox">"#);
        let boxes = Selection::from_input("input", Some(&window));
        let (changes, h) = counter();
        boxes.on_change(&h).click();
        assert!(boxes.is_checked());
        assert_eq!(changes.get(), 1);
    }

    #[test]
    fn test_dblclick_action_clicks_twice_first() {
        let window = Window::from_html(r#"<input type="checkbox" id="c">"#);
        let input = Selection::from_input("#c", Some(&window));
        let log = Rc::new(RefCell::new(Vec::new()));
        let l = log.clone();
        let record = handler(move |event| l.borrow_mut().push(event.event_type().to_string()));

        input.on_click(&record).on_dblclick(&record).dblclick();
        assert_eq!(*log.borrow(), vec!["click", "click", "dblclick"]);
        assert!(!input.is_checked(), "the two clicks cancel out");
    }

    #[test]
    fn test_focus_and_blur() {
        let window = Window::from_html(r#"<input id="a"><input id="b">"#);
        let (blurs, h) = counter();
        let a = Selection::from_input("#a", Some(&window));
        a.on_blur(&h).focus();
        Selection::from_input("#b", Some(&window)).focus();
        assert_eq!(blurs.get(), 1);
        assert_eq!(Selection::from_input(":focus", Some(&window)).attr("id").as_deref(), Some("b"));
    }

    #[test]
    fn test_pressed_key_matches_case_insensitively() {
        let window = Window::from_html(r#"<input id="i">"#);
        let input = Selection::from_input("#i", Some(&window));
        let (count, h) = counter();
        let wrapper = input.pressed_key("Enter", h);

        input.dispatch(EventInit::new("keydown").with_key("enter"));
        input.dispatch(EventInit::new("keydown").with_key("Escape"));
        assert_eq!(count.get(), 1);

        input.off("keydown", &wrapper);
        input.dispatch(EventInit::new("keydown").with_key("Enter"));
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_ready_runs_now_or_on_content_loaded() {
        let loaded = Window::from_html("");
        let ran = Rc::new(RefCell::new(Vec::new()));
        let r = ran.clone();
        Selection::from_input(loaded.document(), Some(&loaded)).ready(move || r.borrow_mut().push("now"));
        assert_eq!(*ran.borrow(), vec!["now"]);

        let config = WindowConfig {
            start_loaded: false,
            ..WindowConfig::default()
        };
        let loading = Window::with_config("", config);
        let r = ran.clone();
        Selection::from_input(loading.document(), Some(&loading)).ready(move || r.borrow_mut().push("later"));
        assert_eq!(ran.borrow().len(), 1);
        loading.finish_loading();
        assert_eq!(*ran.borrow(), vec!["now", "later"]);
    }
}
