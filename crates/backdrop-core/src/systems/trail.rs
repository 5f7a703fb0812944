use super::{FrameContext, System};
use crate::canvas::{stop, Canvas2d, Color, Composite, Paint};
use crate::constants::{
    TRAIL_BASE_RADIUS, TRAIL_CAPACITY, TRAIL_FADE_SEC, TRAIL_MIN_STEP, TRAIL_SPEED_RADIUS,
};
use glam::Vec2;
use smallvec::smallvec;
use std::collections::VecDeque;

#[derive(Clone, Copy, Debug)]
struct TrailPoint {
    position: Vec2,
    age: f32,
}

/// Fading glow following the smoothed pointer. Only installed when the
/// pointer feed is active.
#[derive(Default)]
pub struct CursorTrail {
    points: VecDeque<TrailPoint>,
    head_speed: f32,
}

impl CursorTrail {
    pub const HEAD_GLOW: Color = Color::hsla(198.0, 100.0, 72.0, 0.22);

    pub fn new() -> Self {
        Self::default()
    }
}

impl System for CursorTrail {
    fn name(&self) -> &'static str {
        "cursor-trail"
    }

    fn on_resize(&mut self, _ctx: &FrameContext) {}

    fn update(&mut self, ctx: &FrameContext, dt: f32) {
        for p in &mut self.points {
            p.age += dt;
        }
        while self.points.front().is_some_and(|p| p.age > TRAIL_FADE_SEC) {
            self.points.pop_front();
        }
        if let Some(sample) = ctx.pointer {
            self.head_speed = sample.speed();
            let moved = self.points.back().map_or(true, |last| {
                last.position.distance_squared(sample.position)
                    >= TRAIL_MIN_STEP * TRAIL_MIN_STEP
            });
            if moved {
                self.points.push_back(TrailPoint {
                    position: sample.position,
                    age: 0.0,
                });
                if self.points.len() > TRAIL_CAPACITY {
                    self.points.pop_front();
                }
            }
        }
    }

    fn draw(&self, canvas: &mut dyn Canvas2d, _ctx: &FrameContext) {
        let Some(head) = self.points.back() else {
            return;
        };
        canvas.save();
        canvas.set_composite(Composite::Lighter);

        for p in &self.points {
            let fade = (1.0 - p.age / TRAIL_FADE_SEC).clamp(0.0, 1.0);
            let radius = TRAIL_BASE_RADIUS * (0.35 + 0.65 * fade);
            glow(canvas, p.position, radius, Color::hsla(205.0, 100.0, 66.0, 0.10 * fade));
        }

        let head_radius = TRAIL_BASE_RADIUS + (self.head_speed * TRAIL_SPEED_RADIUS).min(40.0);
        glow(canvas, head.position, head_radius, Self::HEAD_GLOW);

        canvas.restore();
    }

    fn population(&self) -> usize {
        self.points.len()
    }
}

fn glow(canvas: &mut dyn Canvas2d, at: Vec2, radius: f32, color: Color) {
    let transparent = match color {
        Color::Hsla { h, s, l, .. } => Color::hsla(h, s, l, 0.0),
        Color::Rgba(_) => Color::TRANSPARENT,
    };
    canvas.set_fill(&Paint::Radial {
        center: at,
        radius,
        stops: smallvec![stop(0.0, color), stop(1.0, transparent)],
    });
    canvas.fill_rect(at.x - radius, at.y - radius, radius * 2.0, radius * 2.0);
}
