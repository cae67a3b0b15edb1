#![cfg(target_arch = "wasm32")]
use crate::constants::*;
use crate::overlay::DebugPanel;
use lead_core::{map_parameters, AudioEnergyReading, Session, SessionConfig};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

mod audio;
mod constants;
mod dom;
mod events;
mod frame;
mod overlay;
mod render;

// One session per page; a failed start releases the guard so START can retry
static STARTED: AtomicBool = AtomicBool::new(false);

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("lead-web starting");

    if let Err(e) = init() {
        log::error!("init error: {:?}", e);
    }
    Ok(())
}

fn init() -> anyhow::Result<()> {
    let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
    let canvas: web::HtmlCanvasElement = document
        .get_element_by_id(CANVAS_ID)
        .ok_or_else(|| anyhow::anyhow!("missing #{}", CANVAS_ID))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
    dom::suppress_context_menu(&canvas);

    let panel = Rc::new(RefCell::new(DebugPanel::new(document.clone())));
    panel.borrow_mut().push("Ready. Press START.");

    let doc = document.clone();
    dom::add_click_listener(&document, START_BUTTON_ID, move || {
        if STARTED.swap(true, Ordering::SeqCst) {
            return;
        }
        let (document, canvas, panel) = (doc.clone(), canvas.clone(), panel.clone());
        spawn_local(async move {
            if let Err(e) = run_session(&document, canvas, &panel).await {
                log::error!("[start] {:#}", e);
                panel.borrow_mut().push(&format!("FATAL: {:#}", e));
                overlay::set_status(&document, STATUS_FAILED);
                STARTED.store(false, Ordering::SeqCst);
            }
        });
    });
    Ok(())
}

async fn run_session(
    document: &web::Document,
    canvas: web::HtmlCanvasElement,
    panel: &Rc<RefCell<DebugPanel>>,
) -> anyhow::Result<()> {
    {
        let mut p = panel.borrow_mut();
        p.clear();
        p.push("START pressed.");
    }
    overlay::set_status(document, STATUS_LOADING);

    let audio_ctx = web::AudioContext::new()
        .map_err(|e| anyhow::anyhow!("AudioContext: {}", dom::js_reason(&e)))?;
    if let Ok(promise) = audio_ctx.resume() {
        _ = JsFuture::from(promise).await;
    }
    panel
        .borrow_mut()
        .push(&format!("AudioContext state={:?} sr={}", audio_ctx.state(), audio_ctx.sample_rate()));

    let (session, graph, renderer) = match build_session(&audio_ctx, document, canvas.clone(), panel).await {
        Ok(parts) => parts,
        Err(e) => {
            // a retry opens a fresh context; release this one
            if let Ok(promise) = audio_ctx.close() {
                _ = JsFuture::from(promise).await;
            }
            return Err(e);
        }
    };

    overlay::hide(document);
    overlay::set_status(document, STATUS_PLAYING);
    panel.borrow_mut().push("Running.");

    let session = Rc::new(RefCell::new(session));
    let clock = frame::Clock::new();

    events::wire_input_handlers(events::InputWiring {
        canvas: canvas.clone(),
        session: session.clone(),
        clock,
        active_pointer: Rc::new(Cell::new(None)),
    });
    events::wire_wheel(&canvas, session.clone(), clock);
    events::wire_pinch_handlers(session.clone(), clock);

    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext::new(
        session, graph, renderer, clock,
    )));
    frame::start_loop(frame_ctx);
    Ok(())
}

async fn build_session(
    audio_ctx: &web::AudioContext,
    document: &web::Document,
    canvas: web::HtmlCanvasElement,
    panel: &Rc<RefCell<DebugPanel>>,
) -> anyhow::Result<(Session, audio::AudioGraph, render::Renderer)> {
    let session = Session::new(SessionConfig::default())?;
    let graph = audio::AudioGraph::build(audio_ctx.clone(), &session, panel).await?;
    graph.apply(&map_parameters(
        session.controls(),
        &AudioEnergyReading::default(),
    ));
    let renderer = render::Renderer::new(document, canvas)?;
    Ok((session, graph, renderer))
}
