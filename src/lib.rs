//! # domq
//!
//! jQuery-style selections over a headless HTML document.
//!
//! A [`Window`] owns a parsed document together with listeners, a virtual
//! clock for timers and animation frames, and a layout seam. A [`Selection`]
//! is an ordered, immutable list of nodes in that window with chainable
//! methods for traversal, class and style changes, events, mutation and
//! simple slide/fade animations.
//!
//! ## Quick Start
//!
//! ```
//! use domq::{Window, bind};
//!
//! let window = Window::from_html(r#"<ul><li>a</li><li class="on">b</li></ul>"#);
//! let dq = bind(&window);
//!
//! dq.select("li").not(".on").add_class("off");
//! dq.select("ul").append("<li>c</li>");
//!
//! assert_eq!(dq.select("li").len(), 3);
//! assert_eq!(dq.select(".off").text(), "a");
//! ```
//!
//! ## Time
//!
//! Nothing runs in the background. Timers, animation frames, debounced and
//! throttled callbacks run when the host advances the clock:
//!
//! ```
//! use std::time::Duration;
//! use domq::{AnimationOptions, Window, bind};
//!
//! let window = Window::from_html(r#"<div id="panel"></div>"#);
//! let dq = bind(&window);
//! dq.select("#panel").fade_out(AnimationOptions::default());
//!
//! window.advance_time(Duration::from_millis(300)).unwrap();
//! assert_eq!(dq.select("#panel").css("display").as_deref(), Some("none"));
//! ```

pub mod bind;
pub mod data;
pub mod dom;
pub mod error;
pub mod http;
pub mod selection;
pub mod selector;
pub mod style;
pub mod timing;
pub(crate) mod util;
pub mod window;

pub use bind::{Bound, bind, init, unbound};
pub use dom::{Dom, NodeId};
pub use error::{Error, Result};
pub use http::{HttpClient, RequestOptions};
pub use selection::{AnimationOptions, Content, Matcher, Selection, SelectorInput, SlideDirection};
pub use selector::Selector;
pub use timing::{debounce, throttle};
pub use window::{
    Event, EventInit, Handler, HostNode, Layout, ReadyState, Window, WindowConfig, handler,
};
