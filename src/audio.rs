use crate::constants::*;
use crate::dom::js_reason;
use crate::overlay::DebugPanel;
use lead_core::{
    ImpulseResponseBuffer, ParameterVector, Session, StartupError, VoiceChannelParams,
};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

// Node construction failures mean the device cannot host the graph
fn device<T>(r: Result<T, JsValue>, label: &str) -> Result<T, StartupError> {
    r.map_err(|e| {
        log::error!("{} error: {:?}", label, e);
        StartupError::DeviceUnavailable(format!("{}: {}", label, js_reason(&e)))
    })
}

fn create_gain(
    audio_ctx: &web::AudioContext,
    value: f32,
    label: &str,
) -> Result<web::GainNode, StartupError> {
    let g = device(web::GainNode::new(audio_ctx), label)?;
    g.gain().set_value(value);
    Ok(g)
}

fn create_filter(
    audio_ctx: &web::AudioContext,
    kind: web::BiquadFilterType,
    hz: f32,
    label: &str,
) -> Result<web::BiquadFilterNode, StartupError> {
    let f = device(web::BiquadFilterNode::new(audio_ctx), label)?;
    f.set_type(kind);
    f.frequency().set_value(hz);
    Ok(f)
}

fn create_delay(
    audio_ctx: &web::AudioContext,
    max_sec: f64,
    initial_sec: f32,
    label: &str,
) -> Result<web::DelayNode, StartupError> {
    let d = device(audio_ctx.create_delay_with_max_delay_time(max_sec), label)?;
    d.delay_time().set_value(initial_sec);
    Ok(d)
}

fn create_compressor(
    audio_ctx: &web::AudioContext,
    s: &CompressorSettings,
    label: &str,
) -> Result<web::DynamicsCompressorNode, StartupError> {
    let c = device(web::DynamicsCompressorNode::new(audio_ctx), label)?;
    c.threshold().set_value(s.threshold_db);
    c.knee().set_value(s.knee_db);
    c.ratio().set_value(s.ratio);
    c.attack().set_value(s.attack_sec);
    c.release().set_value(s.release_sec);
    Ok(c)
}

fn create_panner(
    audio_ctx: &web::AudioContext,
    pan: f32,
    label: &str,
) -> Result<web::StereoPannerNode, StartupError> {
    let p = device(web::StereoPannerNode::new(audio_ctx), label)?;
    p.pan().set_value(pan);
    Ok(p)
}

/// gain -> compressor -> limiter -> analyser -> destination
pub struct MasterChain {
    pub gain: web::GainNode,
    pub analyser: web::AnalyserNode,
}

impl MasterChain {
    fn build(audio_ctx: &web::AudioContext) -> Result<Self, StartupError> {
        let gain = create_gain(audio_ctx, MASTER_INITIAL_GAIN, "Master")?;
        let comp = create_compressor(audio_ctx, &MASTER_COMPRESSOR, "Master compressor")?;
        let limit = create_compressor(audio_ctx, &MASTER_LIMITER, "Master limiter")?;
        let analyser = device(web::AnalyserNode::new(audio_ctx), "AnalyserNode")?;
        analyser.set_fft_size(ANALYSER_FFT_SIZE);
        analyser.set_smoothing_time_constant(ANALYSER_SMOOTHING);

        _ = gain.connect_with_audio_node(&comp);
        _ = comp.connect_with_audio_node(&limit);
        _ = limit.connect_with_audio_node(&analyser);
        _ = analyser.connect_with_audio_node(&audio_ctx.destination());
        Ok(Self { gain, analyser })
    }
}

/// Shared stereo reverb: predelay -> HP -> LP -> convolver -> post LP ->
/// decorrelated L/R -> wet gain.
pub struct RoomBus {
    pub input: web::GainNode,
    predelay: web::DelayNode,
    highpass: web::BiquadFilterNode,
    lowpass: web::BiquadFilterNode,
    wet: web::GainNode,
}

impl RoomBus {
    fn build(
        audio_ctx: &web::AudioContext,
        ir: &ImpulseResponseBuffer,
    ) -> Result<Self, StartupError> {
        let input = create_gain(audio_ctx, 1.0, "Room in")?;
        let predelay = create_delay(
            audio_ctx,
            ROOM_PREDELAY_MAX_SEC,
            ROOM_PREDELAY_INITIAL_SEC,
            "Room predelay",
        )?;
        let highpass = create_filter(
            audio_ctx,
            web::BiquadFilterType::Highpass,
            ROOM_HP_INITIAL_HZ,
            "Room HP",
        )?;
        let lowpass = create_filter(
            audio_ctx,
            web::BiquadFilterType::Lowpass,
            ROOM_LP_INITIAL_HZ,
            "Room LP",
        )?;

        let convolver = device(web::ConvolverNode::new(audio_ctx), "ConvolverNode")?;
        convolver.set_normalize(true);
        let kernel = device(
            audio_ctx.create_buffer(2, ir.len() as u32, ir.sample_rate()),
            "IR buffer",
        )?;
        for ch in 0..2 {
            if let Some(data) = ir.channel(ch) {
                let mut data = data.to_vec();
                _ = kernel.copy_to_channel(&mut data, ch as i32);
            }
        }
        convolver.set_buffer(Some(&kernel));

        let post_lp = create_filter(
            audio_ctx,
            web::BiquadFilterType::Lowpass,
            ROOM_POST_LP_HZ,
            "Room post LP",
        )?;
        let wet = create_gain(audio_ctx, ROOM_WET_INITIAL, "Room wet")?;

        let splitter = device(
            audio_ctx.create_channel_splitter_with_number_of_outputs(2),
            "ChannelSplitter",
        )?;
        let merger = device(
            audio_ctx.create_channel_merger_with_number_of_inputs(2),
            "ChannelMerger",
        )?;
        let delay_l = create_delay(audio_ctx, DECORR_MAX_SEC, DECORR_LEFT_SEC, "Decorr L")?;
        let delay_r = create_delay(audio_ctx, DECORR_MAX_SEC, DECORR_RIGHT_SEC, "Decorr R")?;
        let gain_l = create_gain(audio_ctx, DECORR_GAIN, "Decorr L gain")?;
        let gain_r = create_gain(audio_ctx, DECORR_GAIN, "Decorr R gain")?;

        _ = input.connect_with_audio_node(&predelay);
        _ = predelay.connect_with_audio_node(&highpass);
        _ = highpass.connect_with_audio_node(&lowpass);
        _ = lowpass.connect_with_audio_node(&convolver);
        _ = convolver.connect_with_audio_node(&post_lp);
        _ = post_lp.connect_with_audio_node(&splitter);
        _ = splitter.connect_with_audio_node_and_output(&delay_l, 0);
        _ = splitter.connect_with_audio_node_and_output(&delay_r, 1);
        _ = delay_l.connect_with_audio_node(&gain_l);
        _ = delay_r.connect_with_audio_node(&gain_r);
        _ = gain_l.connect_with_audio_node_and_output_and_input(&merger, 0, 0);
        _ = gain_r.connect_with_audio_node_and_output_and_input(&merger, 0, 1);
        _ = merger.connect_with_audio_node(&wet);

        Ok(Self {
            input,
            predelay,
            highpass,
            lowpass,
            wet,
        })
    }
}

/// One looping stem: pre -> focus EQ -> LP, which feeds the panned dry path,
/// the room send and the Haas side pair. A sine LFO wobbles the panner.
pub struct StemChain {
    focus_eq: web::BiquadFilterNode,
    lowpass: web::BiquadFilterNode,
    pan: web::StereoPannerNode,
    level: web::GainNode,
    dry: web::GainNode,
    send: web::GainNode,
    side_l: web::GainNode,
    side_r: web::GainNode,
    side_delay: web::DelayNode,
    lfo: web::OscillatorNode,
    lfo_depth: web::GainNode,
    // keeps the looping source reachable for the life of the graph
    _source: web::AudioBufferSourceNode,
}

impl StemChain {
    fn build(
        audio_ctx: &web::AudioContext,
        buffer: &web::AudioBuffer,
        master: &web::GainNode,
        room_in: &web::GainNode,
    ) -> Result<Self, StartupError> {
        let source = device(web::AudioBufferSourceNode::new(audio_ctx), "BufferSource")?;
        source.set_buffer(Some(buffer));
        source.set_loop(true);

        let pre = create_gain(audio_ctx, STEM_PRE_GAIN, "Stem pre")?;
        let focus_eq = create_filter(
            audio_ctx,
            web::BiquadFilterType::Peaking,
            FOCUS_EQ_INITIAL_HZ,
            "Focus EQ",
        )?;
        focus_eq.q().set_value(FOCUS_EQ_Q);
        focus_eq.gain().set_value(FOCUS_EQ_INITIAL_DB);
        let lowpass = create_filter(
            audio_ctx,
            web::BiquadFilterType::Lowpass,
            STEM_LP_INITIAL_HZ,
            "Stem LP",
        )?;
        lowpass.q().set_value(STEM_LP_Q);

        let pan = create_panner(audio_ctx, 0.0, "Stem pan")?;
        let level = create_gain(audio_ctx, 1.0, "Stem level")?;
        let dry = create_gain(audio_ctx, 1.0, "Stem dry")?;
        let send = create_gain(audio_ctx, 0.0, "Stem send")?;

        let side_l = create_gain(audio_ctx, 0.0, "Side L")?;
        let side_r = create_gain(audio_ctx, 0.0, "Side R")?;
        let hard_l = create_panner(audio_ctx, -1.0, "Side pan L")?;
        let hard_r = create_panner(audio_ctx, 1.0, "Side pan R")?;
        let side_delay = create_delay(
            audio_ctx,
            SIDE_DELAY_MAX_SEC,
            SIDE_DELAY_INITIAL_SEC,
            "Side delay",
        )?;

        let lfo = device(web::OscillatorNode::new(audio_ctx), "LFO")?;
        lfo.set_type(web::OscillatorType::Sine);
        lfo.frequency().set_value(LFO_INITIAL_HZ);
        let lfo_depth = create_gain(audio_ctx, 0.0, "LFO depth")?;
        _ = lfo.connect_with_audio_node(&lfo_depth);
        _ = lfo_depth.connect_with_audio_param(&pan.pan());

        _ = source.connect_with_audio_node(&pre);
        _ = pre.connect_with_audio_node(&focus_eq);
        _ = focus_eq.connect_with_audio_node(&lowpass);

        _ = lowpass.connect_with_audio_node(&pan);
        _ = pan.connect_with_audio_node(&level);
        _ = level.connect_with_audio_node(&dry);
        _ = dry.connect_with_audio_node(master);

        _ = lowpass.connect_with_audio_node(&send);
        _ = send.connect_with_audio_node(room_in);

        _ = lowpass.connect_with_audio_node(&side_l);
        _ = lowpass.connect_with_audio_node(&side_delay);
        _ = side_delay.connect_with_audio_node(&side_r);
        _ = side_l.connect_with_audio_node(&hard_l);
        _ = side_r.connect_with_audio_node(&hard_r);
        _ = hard_l.connect_with_audio_node(master);
        _ = hard_r.connect_with_audio_node(master);

        device(lfo.start(), "LFO start")?;
        device(source.start(), "Source start")?;

        Ok(Self {
            focus_eq,
            lowpass,
            pan,
            level,
            dry,
            send,
            side_l,
            side_r,
            side_delay,
            lfo,
            lfo_depth,
            _source: source,
        })
    }

    fn apply(&self, v: &VoiceChannelParams) {
        self.level.gain().set_value(v.level);
        self.pan.pan().set_value(v.pan);
        self.dry.gain().set_value(v.dry_gain);
        self.send.gain().set_value(v.send_gain);
        self.lowpass.frequency().set_value(v.tone_hz);
        self.focus_eq.frequency().set_value(v.focus_hz);
        self.focus_eq.gain().set_value(v.focus_gain_db);
        self.side_l.gain().set_value(v.side_gain);
        self.side_r.gain().set_value(v.side_gain);
        self.side_delay.delay_time().set_value(v.haas_delay_sec);
        self.lfo.frequency().set_value(v.lfo_rate_hz);
        self.lfo_depth.gain().set_value(v.lfo_depth);
    }
}

pub struct AudioGraph {
    _ctx: web::AudioContext,
    master: MasterChain,
    room: RoomBus,
    stems: Vec<StemChain>,
}

impl AudioGraph {
    /// Build the master chain and room bus, then fetch, decode and start every
    /// stem in the session config.
    pub async fn build(
        audio_ctx: web::AudioContext,
        session: &Session,
        panel: &Rc<RefCell<DebugPanel>>,
    ) -> Result<Self, StartupError> {
        let master = MasterChain::build(&audio_ctx)?;
        let ir = session.synthesize_ir(audio_ctx.sample_rate(), &mut rand::thread_rng());
        let room = RoomBus::build(&audio_ctx, &ir)?;
        _ = room.wet.connect_with_audio_node(&master.gain);

        let mut buffers = Vec::with_capacity(session.config().stems.len());
        for stem in &session.config().stems {
            buffers.push(load_buffer(&audio_ctx, &stem.url, panel).await?);
        }
        let stems = buffers
            .iter()
            .map(|b| StemChain::build(&audio_ctx, b, &master.gain, &room.input))
            .collect::<Result<Vec<_>, _>>()?;
        log::info!("[audio] graph ready: {} stems", stems.len());

        Ok(Self {
            _ctx: audio_ctx,
            master,
            room,
            stems,
        })
    }

    pub fn analyser(&self) -> &web::AnalyserNode {
        &self.master.analyser
    }

    /// Push one frame's parameter vector onto the live nodes.
    pub fn apply(&self, p: &ParameterVector) {
        self.master.gain.gain().set_value(p.master_gain);
        self.room.wet.gain().set_value(p.room.wet_gain);
        self.room.predelay.delay_time().set_value(p.room.predelay_sec);
        self.room.lowpass.frequency().set_value(p.room.lowpass_hz);
        self.room.highpass.frequency().set_value(p.room.highpass_hz);
        for (stem, v) in self.stems.iter().zip(&p.voices) {
            stem.apply(v);
        }
    }
}

/// Fetch (no-cache) and decode one stem, logging each step to the panel.
pub async fn load_buffer(
    audio_ctx: &web::AudioContext,
    url: &str,
    panel: &Rc<RefCell<DebugPanel>>,
) -> Result<web::AudioBuffer, StartupError> {
    let say = |msg: String| panel.borrow_mut().push(&msg);
    say(format!("fetch: {}", url));

    let fetch_err = |e: JsValue| {
        let reason = js_reason(&e);
        say(format!("fetch error: {} :: {}", url, reason));
        StartupError::Fetch {
            url: url.to_string(),
            reason,
        }
    };
    let window = web::window().ok_or_else(|| fetch_err(JsValue::from_str("no window")))?;
    let opts = web::RequestInit::new();
    opts.set_cache(web::RequestCache::NoCache);
    let resp: web::Response = JsFuture::from(window.fetch_with_str_and_init(url, &opts))
        .await
        .and_then(|v| v.dyn_into::<web::Response>())
        .map_err(fetch_err)?;

    say(format!(
        "HTTP: {} {} :: {}",
        resp.status(),
        resp.status_text(),
        url
    ));
    if !resp.ok() {
        return Err(StartupError::Http {
            url: url.to_string(),
            status: resp.status(),
            status_text: resp.status_text(),
        });
    }

    let body = JsFuture::from(resp.array_buffer().map_err(fetch_err)?)
        .await
        .and_then(|v| v.dyn_into::<js_sys::ArrayBuffer>())
        .map_err(fetch_err)?;

    let decode_err = |e: JsValue| {
        let reason = js_reason(&e);
        say(format!("decode FAIL: {} :: {}", url, reason));
        StartupError::Decode {
            url: url.to_string(),
            reason,
        }
    };
    let buffer = JsFuture::from(audio_ctx.decode_audio_data(&body).map_err(decode_err)?)
        .await
        .and_then(|v| v.dyn_into::<web::AudioBuffer>())
        .map_err(decode_err)?;
    say(format!(
        "decode OK: {} (ch={}, len={})",
        url,
        buffer.number_of_channels(),
        buffer.length()
    ));
    Ok(buffer)
}
