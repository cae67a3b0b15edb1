use crate::audio::AudioGraph;
use crate::render::Renderer;
use instant::Instant;
use lead_core::{AudioEnergyReading, Session};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Session time in seconds, shared by the frame loop and input handlers.
#[derive(Clone, Copy, Debug)]
pub struct Clock {
    origin: Instant,
}

impl Clock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    #[inline]
    pub fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

pub struct FrameContext {
    pub session: Rc<RefCell<Session>>,
    pub graph: AudioGraph,
    pub renderer: Renderer,
    pub clock: Clock,
    freq: Vec<u8>,
    time: Vec<u8>,
}

impl FrameContext {
    pub fn new(
        session: Rc<RefCell<Session>>,
        graph: AudioGraph,
        renderer: Renderer,
        clock: Clock,
    ) -> Self {
        let bins = graph.analyser().frequency_bin_count() as usize;
        let samples = graph.analyser().fft_size() as usize;
        Self {
            session,
            graph,
            renderer,
            clock,
            freq: vec![0; bins],
            time: vec![128; samples],
        }
    }

    /// Analyse, tick, apply, draw.
    pub fn frame(&mut self) {
        let analyser = self.graph.analyser();
        analyser.get_byte_frequency_data(&mut self.freq);
        analyser.get_byte_time_domain_data(&mut self.time);
        let energy = AudioEnergyReading::from_analyser(&self.freq, &self.time);

        let frame = self.session.borrow_mut().tick(self.clock.now(), energy);
        self.graph.apply(&frame.params);

        let session = self.session.borrow();
        self.renderer.draw(&frame, &session, &self.freq, &self.time);
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let frame_ctx_tick = frame_ctx.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx_tick.borrow_mut().frame();
        if let (Some(w), Some(cb)) = (web::window(), tick_clone.borrow().as_ref()) {
            _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut()>));
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
