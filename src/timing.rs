//! Rate limiting callbacks on a window's clock.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use crate::window::{TimerId, WeakWindow, Window};

struct DebounceState<A> {
    window: WeakWindow,
    wait: Duration,
    f: Box<dyn Fn(A)>,
    pending: Cell<Option<TimerId>>,
}

/// A callback that runs `wait` after the most recent call.
pub struct Debounced<A> {
    state: Rc<DebounceState<A>>,
}

impl<A> Clone for Debounced<A> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

impl<A> fmt::Debug for Debounced<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Debounced")
            .field("wait", &self.state.wait)
            .field("pending", &self.state.pending.get())
            .finish()
    }
}

/// Delay `f` until `wait` has passed without another call. Only the last
/// argument is delivered.
pub fn debounce<A: 'static>(window: &Window, wait: Duration, f: impl Fn(A) + 'static) -> Debounced<A> {
    Debounced {
        state: Rc::new(DebounceState {
            window: window.downgrade(),
            wait,
            f: Box::new(f),
            pending: Cell::new(None),
        }),
    }
}

impl<A: 'static> Debounced<A> {
    pub fn call(&self, arg: A) {
        let Some(window) = self.state.window.upgrade() else {
            return;
        };
        if let Some(previous) = self.state.pending.take() {
            window.clear_timeout(previous);
        }
        let state = self.state.clone();
        let id = window.set_timeout(self.state.wait, move || {
            state.pending.set(None);
            (state.f)(arg);
        });
        self.state.pending.set(Some(id));
    }

    /// Drop a pending call. Returns whether one was pending.
    pub fn cancel(&self) -> bool {
        let Some(id) = self.state.pending.take() else {
            return false;
        };
        self.state
            .window
            .upgrade()
            .is_some_and(|window| window.clear_timeout(id))
    }

    pub fn is_pending(&self) -> bool {
        self.state.pending.get().is_some()
    }
}

struct ThrottleState<A> {
    window: WeakWindow,
    wait: Duration,
    f: Box<dyn Fn(A)>,
    blocked: Cell<bool>,
}

/// A callback that runs at most once per `wait`.
pub struct Throttled<A> {
    state: Rc<ThrottleState<A>>,
}

impl<A> Clone for Throttled<A> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

impl<A> fmt::Debug for Throttled<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Throttled")
            .field("wait", &self.state.wait)
            .field("blocked", &self.state.blocked.get())
            .finish()
    }
}

/// Run `f` on the leading call, then ignore calls until `wait` has passed.
pub fn throttle<A: 'static>(window: &Window, wait: Duration, f: impl Fn(A) + 'static) -> Throttled<A> {
    Throttled {
        state: Rc::new(ThrottleState {
            window: window.downgrade(),
            wait,
            f: Box::new(f),
            blocked: Cell::new(false),
        }),
    }
}

impl<A: 'static> Throttled<A> {
    /// Returns whether `f` ran.
    pub fn call(&self, arg: A) -> bool {
        if self.state.blocked.get() {
            return false;
        }
        let Some(window) = self.state.window.upgrade() else {
            return false;
        };
        self.state.blocked.set(true);
        let state = self.state.clone();
        window.set_timeout(self.state.wait, move || state.blocked.set(false));
        (self.state.f)(arg);
        true
    }
}
