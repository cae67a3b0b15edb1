use crate::frame::Clock;
use glam::Vec2;
use lead_core::{Session, SurfaceLayout};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

#[derive(Clone)]
pub struct InputWiring {
    pub canvas: web::HtmlCanvasElement,
    pub session: Rc<RefCell<Session>>,
    pub clock: Clock,
    /// Pointer that owns the current drag; other pointers are ignored.
    pub active_pointer: Rc<Cell<Option<i32>>>,
}

pub fn wire_input_handlers(w: InputWiring) {
    wire_pointerdown(&w);
    wire_pointermove(&w);
    wire_pointerup(&w, "pointerup");
    wire_pointerup(&w, "pointercancel");
}

// Pointer position in CSS px relative to the canvas, plus the matching layout
#[inline]
fn surface_point(ev: &web::PointerEvent, canvas: &web::HtmlCanvasElement) -> (Vec2, SurfaceLayout) {
    let rect = canvas.get_bounding_client_rect();
    let p = Vec2::new(
        ev.client_x() as f32 - rect.left() as f32,
        ev.client_y() as f32 - rect.top() as f32,
    );
    (p, SurfaceLayout::new(rect.width() as f32, rect.height() as f32))
}

fn wire_pointerdown(w: &InputWiring) {
    let w = w.clone();
    let canvas_for_listener = w.canvas.clone();

    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        let (p, layout) = surface_point(&ev, &w.canvas);
        let hit = w
            .session
            .borrow_mut()
            .pointer_down(p, &layout, w.clock.now());
        if let Some(target) = hit {
            log::info!("[pointer] grab {:?} at ({:.0},{:.0})", target, p.x, p.y);
            w.active_pointer.set(Some(ev.pointer_id()));
            _ = w.canvas.set_pointer_capture(ev.pointer_id());
            ev.prevent_default();
        }
    }) as Box<dyn FnMut(_)>);
    _ = canvas_for_listener
        .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
    closure.forget();
}

fn wire_pointermove(w: &InputWiring) {
    let w = w.clone();
    let canvas_for_listener = w.canvas.clone();

    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        if w.active_pointer.get() != Some(ev.pointer_id()) {
            return;
        }
        let (p, layout) = surface_point(&ev, &w.canvas);
        let moved = w
            .session
            .borrow_mut()
            .pointer_move(p, &layout, w.clock.now());
        if moved {
            ev.prevent_default();
        }
    }) as Box<dyn FnMut(_)>);
    _ = canvas_for_listener
        .add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
    closure.forget();
}

fn wire_pointerup(w: &InputWiring, event: &str) {
    let w = w.clone();
    let canvas_for_listener = w.canvas.clone();

    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        if w.active_pointer.get() != Some(ev.pointer_id()) {
            return;
        }
        w.active_pointer.set(None);
        w.session.borrow_mut().pointer_up();
    }) as Box<dyn FnMut(_)>);
    _ = canvas_for_listener.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
    closure.forget();
}
