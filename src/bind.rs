//! Entry points that tie a factory to a window.

use crate::http::HttpClient;
use crate::selection::{Selection, SelectorInput};
use crate::window::Window;

/// A selection factory bound to one window, plus the HTTP helpers.
#[derive(Debug, Clone)]
pub struct Bound {
    window: Option<Window>,
    pub http: HttpClient,
}

impl Bound {
    /// Build a selection in the bound window.
    pub fn select(&self, input: impl Into<SelectorInput>) -> Selection {
        Selection::from_input(input, self.window.as_ref())
    }

    /// Alias of [`Bound::select`].
    pub fn query(&self, input: impl Into<SelectorInput>) -> Selection {
        self.select(input)
    }

    pub fn window(&self) -> Option<&Window> {
        self.window.as_ref()
    }

    /// Run `f` once the bound document has been parsed.
    pub fn ready(&self, f: impl FnOnce() + 'static) -> &Self {
        if let Some(window) = &self.window {
            self.select(window.document()).ready(f);
        }
        self
    }
}

/// A factory scoped to `window`.
pub fn bind(window: &Window) -> Bound {
    Bound {
        window: Some(window.clone()),
        http: HttpClient::new(),
    }
}

/// Set up the library for a host window. Call once per window.
pub fn init(window: Window) -> Bound {
    tracing::debug!(url = window.url(), ready_state = ?window.ready_state(), "initializing");
    bind(&window)
}

/// A factory with no environment: every selection is empty.
pub fn unbound() -> Bound {
    Bound {
        window: None,
        http: HttpClient::new(),
    }
}
