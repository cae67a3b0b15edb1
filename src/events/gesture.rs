use crate::frame::Clock;
use lead_core::{Modifiers, Session};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

// Wheel and gesture handlers call preventDefault, so they must not be passive
fn non_passive() -> web::AddEventListenerOptions {
    let opts = web::AddEventListenerOptions::new();
    opts.set_passive(false);
    opts
}

/// Two-finger scroll on the surface: distance, shift: motion, ctrl: room.
pub fn wire_wheel(canvas: &web::HtmlCanvasElement, session: Rc<RefCell<Session>>, clock: Clock) {
    let closure = Closure::wrap(Box::new(move |ev: web::WheelEvent| {
        let mods = Modifiers {
            ctrl: ev.ctrl_key(),
            shift: ev.shift_key(),
        };
        session
            .borrow_mut()
            .wheel(ev.delta_y() as f32, mods, clock.now());
        ev.prevent_default();
    }) as Box<dyn FnMut(_)>);
    _ = canvas.add_event_listener_with_callback_and_add_event_listener_options(
        "wheel",
        closure.as_ref().unchecked_ref(),
        &non_passive(),
    );
    closure.forget();
}

// Safari's GestureEvent is not in web-sys; read `scale` off the raw event
fn gesture_scale(ev: &web::Event) -> f32 {
    js_sys::Reflect::get(ev, &JsValue::from_str("scale"))
        .ok()
        .and_then(|v| v.as_f64())
        .filter(|s| *s != 0.0)
        .unwrap_or(1.0) as f32
}

/// Trackpad pinch (Safari gesture events): room.
pub fn wire_pinch_handlers(session: Rc<RefCell<Session>>, clock: Clock) {
    let Some(window) = web::window() else {
        return;
    };

    let s = session.clone();
    let on_start = Closure::wrap(Box::new(move |ev: web::Event| {
        s.borrow_mut().pinch_start(clock.now());
        ev.prevent_default();
    }) as Box<dyn FnMut(_)>);

    let s = session.clone();
    let on_change = Closure::wrap(Box::new(move |ev: web::Event| {
        s.borrow_mut().pinch_change(gesture_scale(&ev), clock.now());
        ev.prevent_default();
    }) as Box<dyn FnMut(_)>);

    let on_end = Closure::wrap(Box::new(move |ev: web::Event| {
        session.borrow_mut().pinch_end(clock.now());
        ev.prevent_default();
    }) as Box<dyn FnMut(_)>);

    let opts = non_passive();
    for (name, closure) in [
        ("gesturestart", &on_start),
        ("gesturechange", &on_change),
        ("gestureend", &on_end),
    ] {
        _ = window.add_event_listener_with_callback_and_add_event_listener_options(
            name,
            closure.as_ref().unchecked_ref(),
            &opts,
        );
    }
    on_start.forget();
    on_change.forget();
    on_end.forget();
}
