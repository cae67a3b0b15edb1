//! Canvas 2D renderer for the visual layers.
//!
//! Layer scalars come precomputed in [`VizParams`]; this module owns the
//! per-frame animation state (particles, the waterfall history) and applies
//! the strobe and flow phase.

use crate::constants::*;
use crate::dom;
use glam::Vec2;
use lead_core::viz::VizParams;
use lead_core::{Frame, Session, SurfaceLayout};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::TAU;
use wasm_bindgen::JsCast;
use web_sys as web;

struct Particle {
    pos: Vec2,
    vel: Vec2,
    size: f32,
    alpha: f32,
}

pub struct Renderer {
    canvas: web::HtmlCanvasElement,
    g: web::CanvasRenderingContext2d,
    waterfall: web::HtmlCanvasElement,
    wg: web::CanvasRenderingContext2d,
    /// Surface size in CSS px.
    size: Vec2,
    particles: Vec<Particle>,
    rng: StdRng,
}

fn context_2d(canvas: &web::HtmlCanvasElement) -> anyhow::Result<web::CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .map_err(|e| anyhow::anyhow!("getContext: {}", dom::js_reason(&e)))?
        .ok_or_else(|| anyhow::anyhow!("2d context unavailable"))?
        .dyn_into::<web::CanvasRenderingContext2d>()
        .map_err(|e| anyhow::anyhow!("{:?}", e))
}

#[inline]
fn white(alpha: f32) -> String {
    format!("rgba(255,255,255,{})", alpha)
}

impl Renderer {
    pub fn new(document: &web::Document, canvas: web::HtmlCanvasElement) -> anyhow::Result<Self> {
        let g = context_2d(&canvas)?;
        let waterfall = document
            .create_element("canvas")
            .map_err(|e| anyhow::anyhow!("create canvas: {}", dom::js_reason(&e)))?
            .dyn_into::<web::HtmlCanvasElement>()
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        let wg = context_2d(&waterfall)?;
        let mut r = Self {
            canvas,
            g,
            waterfall,
            wg,
            size: Vec2::ZERO,
            particles: Vec::new(),
            rng: StdRng::from_entropy(),
        };
        r.sync_size();
        Ok(r)
    }

    /// Re-fit the backing store and rebuild caches when the CSS size changed.
    fn sync_size(&mut self) {
        let rect = self.canvas.get_bounding_client_rect();
        let css = Vec2::new(rect.width() as f32, rect.height() as f32);
        if css == self.size {
            return;
        }
        let (_, _, dpr) = dom::sync_canvas_backing_size(&self.canvas);
        _ = self.g.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0);
        self.size = css;

        self.waterfall.set_width(css.x.max(1.0) as u32);
        self.waterfall.set_height(css.y.max(1.0) as u32);

        let n = ((css.x * css.y) / PARTICLE_AREA_PX) as usize;
        let rng = &mut self.rng;
        self.particles = (0..n)
            .map(|_| Particle {
                pos: Vec2::new(rng.gen::<f32>() * css.x, rng.gen::<f32>() * css.y),
                vel: Vec2::ZERO,
                size: 0.7 + rng.gen::<f32>() * 1.8,
                alpha: 0.20 + rng.gen::<f32>() * 0.70,
            })
            .collect();
        log::info!(
            "[render] surface {:.0}x{:.0} dpr={:.2} particles={}",
            css.x,
            css.y,
            dpr,
            n
        );
    }

    pub fn draw(&mut self, frame: &Frame, session: &Session, freq: &[u8], time: &[u8]) {
        self.sync_size();
        let v = &frame.params.viz;
        let strobe = frame.strobe;
        let t = frame.phase;
        let (w, h) = (self.size.x as f64, self.size.y as f64);

        // persistence: distance thickens the fog
        self.g.set_fill_style_str(&format!("rgba(0,0,0,{})", v.fog_fade));
        self.g.fill_rect(0.0, 0.0, w, h);
        if strobe > STROBE_FLASH_MIN {
            self.g.set_fill_style_str(&white(strobe * STROBE_FLASH_ALPHA));
            self.g.fill_rect(0.0, 0.0, w, h);
        }

        self.draw_grid(v, strobe, t);
        self.draw_waterfall(v, strobe, freq);
        self.draw_particles(v, frame.energy.high, strobe, t);
        self.draw_scope(v, session.controls().motion(), strobe, t, time);
        self.draw_glitch(v, strobe, t);

        let layout = SurfaceLayout::new(self.size.x, self.size.y);
        self.draw_actors(v, session, &layout, strobe, t);
        self.draw_cube(v, &layout, strobe, t);
    }

    fn line(&self, x0: f64, y0: f64, x1: f64, y1: f64) {
        self.g.begin_path();
        self.g.move_to(x0, y0);
        self.g.line_to(x1, y1);
        self.g.stroke();
    }

    fn draw_grid(&self, v: &VizParams, strobe: f32, t: f64) {
        let g = &self.g;
        let (w, h) = (self.size.x as f64, self.size.y as f64);
        g.save();
        _ = g.set_global_composite_operation("lighter");

        let spacing = (w / v.grid.line_count.max(1) as f64).clamp(18.0, 52.0);
        let wob = (v.grid.wobble * (0.12 + strobe * 0.9)) as f64;
        g.set_line_width(1.0);
        g.set_stroke_style_str(&white(v.grid.line_alpha));

        let mut x = 0.0;
        while x <= w {
            let xx = x + (x * 0.02 + t * 2.0).sin() * wob;
            self.line(xx, 0.0, xx, h);
            x += spacing;
        }
        let mut y = 0.0;
        while y <= h {
            let yy = y + (y * 0.02 + t * 1.6).cos() * wob;
            self.line(0.0, yy, w, yy);
            y += spacing;
        }

        let fx = w * v.grid.focus_x as f64;
        g.set_line_width(2.0);
        g.set_stroke_style_str(&white(v.grid.focus_alpha));
        self.line(fx, 0.0, fx, h);
        g.restore();
    }

    fn draw_waterfall(&mut self, v: &VizParams, strobe: f32, freq: &[u8]) {
        let ww = self.waterfall.width() as f64;
        let wh = self.waterfall.height() as f64;

        // scroll history down one row
        if let Ok(img) = self.wg.get_image_data(0.0, 0.0, ww, wh) {
            _ = self.wg.put_image_data(&img, 0.0, 1.0);
        }
        self.wg.set_fill_style_str(&format!("rgba(0,0,0,{})", WATERFALL_FADE_ALPHA));
        self.wg.fill_rect(0.0, 0.0, ww, 1.0);

        let n = freq.len();
        let cols = ww as usize;
        if n > 0 && cols > 0 {
            let step = (n / cols).max(1);
            for x in 0..cols {
                let Some(&bin) = freq.get(x * step) else {
                    break;
                };
                let a = (0.09 + bin as f32 / 255.0 * 0.62) * v.waterfall.row_gain;
                let split = v.waterfall.rgb_split && strobe > 0.14 && self.rng.gen::<f32>() < 0.08;
                let xf = x as f64;
                if split {
                    self.wg.set_fill_style_str(&format!("rgba(255,0,0,{})", a * 0.8));
                    self.wg.fill_rect(xf - 1.0, 0.0, 1.0, 1.0);
                    self.wg.set_fill_style_str(&format!("rgba(0,255,255,{})", a * 0.8));
                    self.wg.fill_rect(xf + 1.0, 0.0, 1.0, 1.0);
                } else {
                    self.wg.set_fill_style_str(&white(a));
                    self.wg.fill_rect(xf, 0.0, 1.0, 1.0);
                }
            }
        }

        let g = &self.g;
        g.save();
        _ = g.set_global_composite_operation("lighter");
        g.set_global_alpha((v.waterfall.alpha + strobe * 0.16) as f64);
        let block_h = self.size.y as f64 * v.waterfall.block_height as f64;
        let y0 = self.size.y as f64 * 0.08;
        _ = g.draw_image_with_html_canvas_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
            &self.waterfall,
            0.0,
            0.0,
            ww,
            block_h,
            0.0,
            y0,
            self.size.x as f64,
            block_h,
        );
        g.restore();
    }

    fn draw_particles(&mut self, v: &VizParams, high: f32, strobe: f32, t: f64) {
        let p = &v.particles;
        let (w, h) = (self.size.x, self.size.y);
        let focus = Vec2::new(w * p.focus_x, h * 0.5);
        let speed = p.speed * (0.6 + strobe * 1.35);
        let t = t as f32;

        self.g.save();
        _ = self.g.set_global_composite_operation("lighter");

        for q in self.particles.iter_mut() {
            let n = q.pos / Vec2::new(w, h) - 0.5;
            let ang = (n.x * 6.0 + t * 1.7).sin() + (n.y * 7.0 - t * 1.25).cos() + p.heading_bias;
            q.vel += Vec2::new(ang.cos(), ang.sin()) * 0.06 * speed;
            q.vel.x += (focus.x - q.pos.x) * p.pull;
            q.vel.y += (focus.y - q.pos.y) * p.pull * 0.58;
            q.vel *= 0.90;
            let jitter = Vec2::new(self.rng.gen::<f32>() - 0.5, self.rng.gen::<f32>() - 0.5);
            q.pos += q.vel + jitter * p.jitter;

            // wrap with a 20px margin
            if q.pos.x < -20.0 {
                q.pos.x = w + 20.0;
            } else if q.pos.x > w + 20.0 {
                q.pos.x = -20.0;
            }
            if q.pos.y < -20.0 {
                q.pos.y = h + 20.0;
            } else if q.pos.y > h + 20.0 {
                q.pos.y = -20.0;
            }

            let alpha = (0.055 + q.alpha * 0.16 + p.alpha_boost) * (0.8 + strobe * 1.1);
            let size = (q.size * p.size_gain) as f64;
            self.g.set_fill_style_str(&white(alpha));
            self.g.fill_rect(q.pos.x as f64, q.pos.y as f64, size, size);
        }

        if (p.links_enabled || strobe > 0.25) && !self.particles.is_empty() {
            self.g
                .set_stroke_style_str(&white(0.03 + high * 0.08 + strobe * 0.10));
            self.g.set_line_width(1.0);
            let max_d2 = p.link_radius * p.link_radius;
            for _ in 0..p.link_count {
                let a = self.rng.gen_range(0..self.particles.len());
                let b = self.rng.gen_range(0..self.particles.len());
                let (pa, pb) = (self.particles[a].pos, self.particles[b].pos);
                if pa.distance_squared(pb) < max_d2 {
                    self.line(pa.x as f64, pa.y as f64, pb.x as f64, pb.y as f64);
                }
            }
        }
        self.g.restore();
    }

    fn trace(&self, time: &[u8], phase: usize, step: usize, half_w: f64, amp: f64, off: f64) {
        let n = time.len();
        let g = &self.g;
        g.begin_path();
        for i in (0..n).step_by(step) {
            let v1 = (time[i] as f64 - 128.0) / 128.0;
            let v2 = (time[(i + phase) % n] as f64 - 128.0) / 128.0;
            let (x, y) = (v1 * half_w + off, v2 * amp);
            if i == 0 {
                g.move_to(x, y);
            } else {
                g.line_to(x, y);
            }
        }
        g.stroke();
    }

    fn draw_scope(&self, v: &VizParams, motion: f32, strobe: f32, t: f64, time: &[u8]) {
        let n = time.len();
        if n == 0 {
            return;
        }
        let s = &v.scope;
        let g = &self.g;
        g.save();
        _ = g.set_global_composite_operation("lighter");
        _ = g.translate(self.size.x as f64 * 0.5, self.size.y as f64 * 0.73);
        _ = g.rotate((s.rotation_depth + strobe * 0.25) as f64 * (t * 0.7).sin());

        let half_w = self.size.x as f64 * s.x_scale as f64 * 0.5;
        let amp = s.amplitude as f64;
        let step = (n / 900).max(1);
        let phase = s.phase_offset as usize;

        g.set_stroke_style_str(&white(s.alpha + strobe * 0.16));
        g.set_line_width(s.line_width as f64);
        self.trace(time, phase, step, half_w, amp, 0.0);

        // ghost traces
        if strobe > 0.12 || motion > 0.5 {
            g.set_global_alpha(0.55);
            g.set_stroke_style_str(&white(0.06 + strobe * 0.10));
            g.set_line_width(1.0);
            for (k, sign) in [-1.0, 1.0].into_iter().enumerate() {
                self.trace(
                    time,
                    phase + 30,
                    step,
                    half_w,
                    amp * (0.92 + k as f64 * 0.06),
                    sign * s.ghost_offset as f64,
                );
            }
        }
        g.restore();
    }

    fn draw_glitch(&mut self, v: &VizParams, strobe: f32, t: f64) {
        let gl = &v.glitch;
        let (w, h) = (self.size.x as f64, self.size.y as f64);

        self.g.save();
        _ = self.g.set_global_composite_operation("overlay");
        self.g.set_stroke_style_str(&white(gl.scanline_alpha));
        self.g.set_line_width(1.0);
        let lines = gl.scanline_count.max(1);
        for i in 0..lines {
            let y = (i as f64 / lines as f64) * h
                + (t * 2.0 + i as f64).sin() * gl.scanline_wobble as f64;
            self.line(0.0, y, w, y);
        }
        self.g.restore();

        // occasional RGB-split slice
        let chance = gl.slice_chance + strobe * 0.06;
        if h < 1.0 || self.rng.gen::<f32>() >= chance {
            return;
        }
        let y = self.rng.gen_range(0..h as i32) as f64;
        let sh = self.rng.gen_range(8..26) as f64;
        let dx = self.rng.gen_range(-18..18) as f64 * gl.slice_shift as f64;
        let Ok(img) = self.g.get_image_data(0.0, y, w, sh) else {
            return;
        };
        self.g.save();
        _ = self.g.set_global_composite_operation("lighter");
        _ = self.g.put_image_data(&img, dx - 2.0, y);
        self.g.set_fill_style_str("rgba(255,0,0,0.08)");
        self.g.fill_rect(0.0, y, w, sh);
        _ = self.g.put_image_data(&img, dx + 2.0, y);
        self.g.set_fill_style_str("rgba(0,255,255,0.08)");
        self.g.fill_rect(0.0, y, w, sh);
        self.g.restore();
    }

    fn draw_actors(
        &self,
        v: &VizParams,
        session: &Session,
        layout: &SurfaceLayout,
        strobe: f32,
        t: f64,
    ) {
        let controls = session.controls();
        let names = &session.config().stems;
        let g = &self.g;
        g.save();
        _ = g.set_global_composite_operation("lighter");
        g.set_font(LABEL_FONT);

        for (i, (voice, node)) in controls.voices().iter().zip(&v.actors).enumerate() {
            let c = layout.actor_center(voice, i, controls.motion(), t);
            let fi = i as f64;
            let orbit = node.orbit as f64;
            let x = c.x as f64 + (t * node.orbit_rate[0] as f64 + fi).cos() * orbit;
            let y = c.y as f64 + (t * node.orbit_rate[1] as f64 + fi).sin() * orbit;
            let r = node.radius as f64;
            let alpha = node.alpha + strobe * 0.12;

            g.set_stroke_style_str(&white(alpha));
            g.set_line_width(1.0);
            g.begin_path();
            _ = g.arc(x, y, r * node.halo_scale as f64, 0.0, TAU);
            g.stroke();

            g.set_fill_style_str(&white(alpha * 1.2));
            g.begin_path();
            _ = g.arc(x, y, r, 0.0, TAU);
            g.fill();

            let label = names
                .get(i)
                .map(|s| s.name.clone())
                .unwrap_or_else(|| format!("STEM {}", i));
            g.set_fill_style_str(&white(0.22 + alpha * 0.25));
            _ = g.fill_text(&label, x + 10.0, y - 10.0);
        }
        g.restore();
    }

    fn quad(&self, pts: &[Vec2; 4]) {
        let g = &self.g;
        g.begin_path();
        g.move_to(pts[0].x as f64, pts[0].y as f64);
        for p in &pts[1..] {
            g.line_to(p.x as f64, p.y as f64);
        }
        g.close_path();
    }

    fn draw_cube(&self, v: &VizParams, layout: &SurfaceLayout, strobe: f32, t: f64) {
        let cr = layout.cube_rect();
        let c = cr.center();
        let cube = &v.cube;
        let s = cr.size.x * 0.28 * cube.scale;
        let z = s * cube.depth;
        let wob = cube.wobble * (0.25 + strobe * 0.9);
        let off = Vec2::new(
            z + (t * 1.1).sin() as f32 * wob,
            -z + (t * 0.9).cos() as f32 * wob,
        );

        let front = [
            c + Vec2::new(-s, -s),
            c + Vec2::new(s, -s),
            c + Vec2::new(s, s),
            c + Vec2::new(-s, s),
        ];
        let back = front.map(|p| p + off);

        let g = &self.g;
        g.save();
        _ = g.set_global_composite_operation("lighter");
        g.set_stroke_style_str(&white(cube.glow + strobe * 0.10));
        g.set_line_width(1.5);

        self.quad(&front);
        g.stroke();
        self.quad(&back);
        g.stroke();

        g.begin_path();
        for (a, b) in front.iter().zip(&back) {
            g.move_to(a.x as f64, a.y as f64);
            g.line_to(b.x as f64, b.y as f64);
        }
        g.stroke();

        g.set_fill_style_str(&white(cube.fill_alpha + strobe * 0.04));
        self.quad(&back);
        g.fill();

        g.set_fill_style_str(&white(0.30));
        g.set_font(CUBE_LABEL_FONT);
        _ = g.fill_text("ROOM (cube)", cr.min.x as f64, cr.min.y as f64 - 10.0);
        g.restore();
    }
}
