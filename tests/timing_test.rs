//! Clock-driven behavior through the public API: debounce, throttle and
//! animations.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use domq::{AnimationOptions, Window, WindowConfig, bind, debounce, throttle};

#[test]
fn test_debounced_resize_handler() {
    let window = Window::new();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let s = seen.clone();
    let w = window.downgrade();
    let on_resize = debounce(&window, Duration::from_millis(100), move |width: u32| {
        let now = w.upgrade().map(|w| w.now()).unwrap_or_default();
        s.borrow_mut().push((width, now));
    });

    for width in [800, 820, 840] {
        on_resize.call(width);
        window.advance_time(Duration::from_millis(50)).unwrap();
    }
    window.flush().unwrap();

    assert_eq!(*seen.borrow(), vec![(840, Duration::from_millis(200))]);
}

#[test]
fn test_throttled_scroll_handler() {
    let window = Window::new();
    let seen = Rc::new(RefCell::new(0));
    let s = seen.clone();
    let on_scroll = throttle(&window, Duration::from_millis(50), move |_: ()| *s.borrow_mut() += 1);

    for _ in 0..10 {
        on_scroll.call(());
        window.advance_time(Duration::from_millis(10)).unwrap();
    }
    assert_eq!(*seen.borrow(), 2);
}

#[test]
fn test_unbounded_wait_never_fires_early() {
    let window = Window::new();
    let seen = Rc::new(RefCell::new(0));
    let s = seen.clone();
    let on_input = debounce(&window, Duration::MAX, move |_: ()| *s.borrow_mut() += 1);

    on_input.call(());
    window.advance_time(Duration::from_secs(3600)).unwrap();
    assert_eq!(*seen.borrow(), 0);
    assert_eq!(window.pending_timers().len(), 1);
}

#[test]
fn test_fade_out_then_in_leaves_element_visible() {
    let window = Window::from_html(r#"<div id="toast">saved</div>"#);
    let dq = bind(&window);
    let toast = dq.select("#toast");

    toast
        .fade_out(AnimationOptions::default())
        .fade_in(AnimationOptions::default());
    window.advance_time(Duration::from_millis(400)).unwrap();

    assert_eq!(toast.css("display").as_deref(), Some("block"));
    assert!(window.pending_timers().is_empty());
}

#[test]
fn test_animations_need_frames() {
    let config = WindowConfig {
        animation_frames: false,
        ..WindowConfig::default()
    };
    let window = Window::with_config(r#"<div id="d"></div>"#, config);
    let dq = bind(&window);
    dq.select("#d").slide_up(AnimationOptions::default());
    window.flush().unwrap();
    assert_eq!(dq.select("#d").css("display").as_deref(), Some("block"));
}
