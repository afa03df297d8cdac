//! Slide and fade helpers driven by CSS transitions.
//!
//! Each helper writes the start state now, the end state on the next
//! animation frame, and cleans up after the duration. Nothing is tracked or
//! cancellable. Without animation frames every helper is a no-op.

use std::time::Duration;

use super::Selection;
use super::class_style::{conceal, is_hidden, reveal};
use crate::dom::NodeId;
use crate::style::computed_value;
use crate::window::Window;

pub const DEFAULT_DURATION: Duration = Duration::from_millis(300);

/// Edge a horizontal slide leaves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlideDirection {
    #[default]
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationOptions {
    pub duration: Duration,
    pub direction: SlideDirection,
}

impl Default for AnimationOptions {
    fn default() -> Self {
        Self {
            duration: DEFAULT_DURATION,
            direction: SlideDirection::Left,
        }
    }
}

impl AnimationOptions {
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_direction(mut self, direction: SlideDirection) -> Self {
        self.direction = direction;
        self
    }

    fn millis(&self) -> u128 {
        self.duration.as_millis()
    }
}

impl Selection {
    /// The window, if it can run animations.
    fn animation_window(&self) -> Option<&Window> {
        self.window().filter(|w| w.config().animation_frames)
    }

    fn animate_each(&self, mut f: impl FnMut(&Window, NodeId)) -> &Self {
        if let Some(window) = self.animation_window() {
            for id in self.elements() {
                f(window, id);
            }
        }
        self
    }

    /// Slide horizontally into place.
    pub fn slide_in(&self, options: AnimationOptions) -> &Self {
        self.animate_each(|window, id| slide_horizontal(window, id, options, true))
    }

    /// Slide horizontally out through `options.direction`.
    pub fn slide_out(&self, options: AnimationOptions) -> &Self {
        self.animate_each(|window, id| slide_horizontal(window, id, options, false))
    }

    /// Slide in elements that are out, and out everything else.
    pub fn slide_toggle(&self, options: AnimationOptions) -> &Self {
        self.animate_each(|window, id| {
            let is_out = window.dom().get_attr(id, SLIDE_STATE) == Some("out");
            slide_horizontal(window, id, options, is_out);
        })
    }

    /// Reveal hidden elements by growing their height from zero.
    pub fn slide_down(&self, options: AnimationOptions) -> &Self {
        self.animate_each(|window, id| {
            if is_hidden(window, id) {
                slide_down(window, id, options);
            }
        })
    }

    /// Collapse elements to zero height, then hide them.
    pub fn slide_up(&self, options: AnimationOptions) -> &Self {
        self.animate_each(|window, id| slide_up(window, id, options))
    }

    pub fn slide_vertical_toggle(&self, options: AnimationOptions) -> &Self {
        self.animate_each(|window, id| {
            if is_hidden(window, id) {
                slide_down(window, id, options);
            } else {
                slide_up(window, id, options);
            }
        })
    }

    pub fn fade_in(&self, options: AnimationOptions) -> &Self {
        self.animate_each(|window, id| fade_in(window, id, options))
    }

    pub fn fade_out(&self, options: AnimationOptions) -> &Self {
        self.animate_each(|window, id| fade_out(window, id, options))
    }

    /// Fade in hidden or transparent elements, fade out the rest.
    pub fn fade_toggle(&self, options: AnimationOptions) -> &Self {
        self.animate_each(|window, id| {
            let transparent = computed_value(&window.dom(), id, "opacity")
                .is_some_and(|o| o.parse::<f64>().is_ok_and(|v| v == 0.0));
            if is_hidden(window, id) || transparent {
                fade_in(window, id, options);
            } else {
                fade_out(window, id, options);
            }
        })
    }
}

const SLIDE_STATE: &str = "data-slide-state";

/// Run `f` on the next frame if the window is still alive.
fn on_next_frame(window: &Window, f: impl FnOnce(&Window) + 'static) {
    let weak = window.downgrade();
    window.request_animation_frame(move || {
        if let Some(window) = weak.upgrade() {
            f(&window);
        }
    });
}

/// Run `f` once the animation has finished. Never fires before the first
/// frame, even for very short durations.
fn on_finish(window: &Window, options: AnimationOptions, f: impl FnOnce(&Window) + 'static) {
    let delay = options.duration.max(window.config().frame_interval);
    let weak = window.downgrade();
    window.set_timeout(delay, move || {
        if let Some(window) = weak.upgrade() {
            f(&window);
        }
    });
}

fn slide_horizontal(window: &Window, id: NodeId, options: AnimationOptions, inward: bool) {
    {
        let mut dom = window.dom_mut();
        dom.set_style_property(
            id,
            "transition",
            &format!("transform {}ms ease", options.millis()),
        );
        dom.set_attr(id, SLIDE_STATE, if inward { "in" } else { "out" });
    }
    let transform = match (inward, options.direction) {
        (true, _) => "translateX(0%)",
        (false, SlideDirection::Left) => "translateX(-100%)",
        (false, SlideDirection::Right) => "translateX(100%)",
    };
    on_next_frame(window, move |window| {
        window
            .dom_mut()
            .set_style_property(id, "transform", transform);
    });
}

fn slide_down(window: &Window, id: NodeId, options: AnimationOptions) {
    reveal(window, id);
    {
        let mut dom = window.dom_mut();
        dom.set_style_property(id, "overflow", "hidden");
        dom.set_style_property(id, "height", "0px");
        dom.set_style_property(
            id,
            "transition",
            &format!("height {}ms ease", options.millis()),
        );
    }
    on_next_frame(window, move |window| {
        let height = window.scroll_height(id);
        window
            .dom_mut()
            .set_style_property(id, "height", &format!("{height}px"));
    });
    on_finish(window, options, move |window| {
        let mut dom = window.dom_mut();
        for property in ["height", "overflow", "transition"] {
            dom.remove_style_property(id, property);
        }
    });
}

fn slide_up(window: &Window, id: NodeId, options: AnimationOptions) {
    let height = window.scroll_height(id);
    {
        let mut dom = window.dom_mut();
        dom.set_style_property(id, "height", &format!("{height}px"));
        dom.set_style_property(id, "overflow", "hidden");
        dom.set_style_property(
            id,
            "transition",
            &format!("height {}ms ease", options.millis()),
        );
    }
    on_next_frame(window, move |window| {
        window.dom_mut().set_style_property(id, "height", "0px");
    });
    on_finish(window, options, move |window| {
        conceal(window, id);
        let mut dom = window.dom_mut();
        for property in ["height", "overflow", "transition"] {
            dom.remove_style_property(id, property);
        }
    });
}

fn fade_in(window: &Window, id: NodeId, options: AnimationOptions) {
    reveal(window, id);
    {
        let mut dom = window.dom_mut();
        dom.set_style_property(id, "opacity", "0");
        dom.set_style_property(
            id,
            "transition",
            &format!("opacity {}ms ease", options.millis()),
        );
    }
    on_next_frame(window, move |window| {
        window.dom_mut().set_style_property(id, "opacity", "1");
    });
    on_finish(window, options, move |window| {
        window.dom_mut().remove_style_property(id, "transition");
        // An earlier fade-out may have hidden it in the meantime
        reveal(window, id);
    });
}

fn fade_out(window: &Window, id: NodeId, options: AnimationOptions) {
    window.dom_mut().set_style_property(
        id,
        "transition",
        &format!("opacity {}ms ease", options.millis()),
    );
    on_next_frame(window, move |window| {
        window.dom_mut().set_style_property(id, "opacity", "0");
    });
    on_finish(window, options, move |window| {
        conceal(window, id);
        window.dom_mut().remove_style_property(id, "transition");
    });
}
