use super::{smoothstep, FrameContext, System};
use crate::canvas::{stop, Canvas2d, Color, Composite, Paint, Stops};
use crate::constants::*;
use glam::Vec2;
use rand::rngs::StdRng;
use rand::Rng;
use smallvec::smallvec;
use std::f32::consts::TAU;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Beam {
    pub x: f32,
    pub width: f32,
    pub speed: f32,
    pub phase: f32,
    pub alpha: f32,
    pub hue: f32,
}

/// Stage spotlights: cones of light drifting down the page with a pulsing alpha.
pub struct StageBeams {
    beams: Vec<Beam>,
    rng: StdRng,
    time: f32,
}

impl StageBeams {
    pub fn new(rng: StdRng) -> Self {
        Self {
            beams: Vec::new(),
            rng,
            time: 0.0,
        }
    }

    pub fn beam_count(intensity: f32) -> usize {
        (BEAMS_PER_INTENSITY * intensity)
            .clamp(BEAMS_MIN, BEAMS_MAX)
            .floor() as usize
    }

    pub fn beams(&self) -> &[Beam] {
        &self.beams
    }

    fn draw_arena(canvas: &mut dyn Canvas2d, w: f32, h: f32) {
        let stops: Stops = smallvec![
            stop(0.0, Color::rgba(59, 130, 246, 0.18)),
            stop(0.4, Color::rgba(34, 211, 238, 0.10)),
            stop(0.75, Color::rgba(168, 85, 247, 0.05)),
            stop(1.0, Color::TRANSPARENT),
        ];
        canvas.set_fill(&Paint::Radial {
            center: Vec2::new(w * 0.58, h * 0.38),
            radius: w.max(h) * 0.85,
            stops,
        });
        canvas.fill_rect(0.0, 0.0, w, h);
    }

    fn draw_beam(&self, canvas: &mut dyn Canvas2d, b: &Beam, h: f32) {
        let y = (self.time * BEAM_DRIFT_PX_PER_SEC * b.speed) % (h + 320.0) - 220.0;
        let pulse = 0.6 + 0.4 * (self.time * BEAM_PULSE_RATE + b.phase).sin();
        let a = b.alpha * pulse;

        canvas.set_fill(&Paint::Linear {
            from: Vec2::new(b.x - b.width, y),
            to: Vec2::new(b.x + b.width, y + h * 0.92),
            stops: smallvec![
                stop(0.0, Color::hsla(b.hue, 98.0, 62.0, 0.0)),
                stop(0.42, Color::hsla(b.hue, 98.0, 62.0, a)),
                stop(1.0, Color::hsla(b.hue, 98.0, 62.0, 0.0)),
            ],
        });
        canvas.fill_polygon(&[
            Vec2::new(b.x, y),
            Vec2::new(b.x - b.width * 1.3, y + h * 0.98),
            Vec2::new(b.x + b.width * 1.3, y + h * 0.98),
        ]);

        // core
        canvas.set_fill(&Paint::Radial {
            center: Vec2::new(b.x, y + h * 0.56),
            radius: b.width,
            stops: smallvec![
                stop(0.0, Color::hsla(b.hue, 100.0, 70.0, a * 0.55)),
                stop(1.0, Color::hsla(b.hue, 100.0, 70.0, 0.0)),
            ],
        });
        canvas.fill_rect(
            b.x - b.width * 1.35,
            y + h * 0.18,
            b.width * 2.7,
            h * 0.86,
        );
    }
}

impl System for StageBeams {
    fn name(&self) -> &'static str {
        "stage-beams"
    }

    fn on_resize(&mut self, ctx: &FrameContext) {
        let count = Self::beam_count(ctx.intensity);
        let rng = &mut self.rng;
        self.beams = (0..count)
            .map(|i| Beam {
                x: (i as f32 / count as f32) * ctx.width + rng.gen_range(-50.0..50.0),
                width: rng.gen_range(44.0..160.0),
                speed: rng.gen_range(0.035..0.13),
                phase: rng.gen_range(0.0..TAU),
                alpha: rng.gen_range(0.05..0.14),
                hue: rng.gen_range(195.0..214.0),
            })
            .collect();
    }

    fn update(&mut self, _ctx: &FrameContext, dt: f32) {
        self.time += dt;
    }

    fn draw(&self, canvas: &mut dyn Canvas2d, ctx: &FrameContext) {
        let (w, h) = (ctx.width, ctx.height);
        canvas.save();
        canvas.set_composite(Composite::Screen);

        Self::draw_arena(canvas, w, h);
        for b in &self.beams {
            self.draw_beam(canvas, b, h);
        }

        // power line
        let line = smoothstep(0.0, 1.0, 0.5 + 0.5 * (self.time * POWER_LINE_RATE).sin());
        canvas.set_global_alpha(0.10 + line * 0.10);
        canvas.set_fill(&Paint::Solid(Color::WHITE));
        canvas.fill_rect(0.0, h * 0.80, w, 1.0);

        canvas.restore();
    }

    fn population(&self) -> usize {
        self.beams.len()
    }
}
