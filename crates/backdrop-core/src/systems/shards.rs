use super::{FrameContext, System};
use crate::canvas::{Canvas2d, Color, Composite, Paint};
use crate::constants::*;
use glam::Vec2;
use rand::rngs::StdRng;
use rand::Rng;
use std::f32::consts::TAU;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shard {
    pub position: Vec2,
    pub velocity: Vec2,
    pub rotation: f32,
    pub angular_velocity: f32,
    pub size: Vec2,
    pub age: f32,
    pub max_life: f32,
    pub hue: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Spawn {
    /// Uniformly over the surface, used when repopulating after resize.
    Initial,
    /// Steady-state replenishment, usually entering from an edge.
    Ambient,
    /// Fast short-lived glitch shard.
    Burst,
    /// Burst centred on the pointer.
    BurstAt(Vec2),
}

/// Glowing rotating shards: the dust layer of the backdrop.
pub struct Shards {
    shards: Vec<Shard>,
    rng: StdRng,
    width: f32,
    height: f32,
}

impl Shards {
    pub fn new(rng: StdRng) -> Self {
        Self {
            shards: Vec::new(),
            rng,
            width: 0.0,
            height: 0.0,
        }
    }

    pub fn initial_count(intensity: f32) -> usize {
        (SHARDS_PER_INTENSITY * intensity)
            .clamp(SHARDS_MIN, SHARDS_INITIAL_MAX)
            .floor() as usize
    }

    pub fn target_count(intensity: f32) -> usize {
        (SHARDS_PER_INTENSITY * intensity)
            .clamp(SHARDS_MIN, SHARDS_TARGET_MAX)
            .floor() as usize
    }

    /// Hard population cap after any update.
    pub fn max_population(intensity: f32) -> usize {
        Self::target_count(intensity) + SHARD_OVERFLOW
    }

    pub fn shards(&self) -> &[Shard] {
        &self.shards
    }

    fn uniform(&mut self, lo: f32, hi: f32) -> f32 {
        lo + self.rng.gen::<f32>() * (hi - lo)
    }

    fn chance(&mut self, p: f32) -> bool {
        self.rng.gen::<f32>() < p
    }

    fn make_shard(&mut self, spawn: Spawn) -> Shard {
        let (w, h) = (self.width, self.height);
        let burst = matches!(spawn, Spawn::Burst | Spawn::BurstAt(_));

        let mut position = match spawn {
            Spawn::BurstAt(p) => p,
            _ => Vec2::new(self.uniform(0.0, w), self.uniform(0.0, h)),
        };
        let from_edge = matches!(spawn, Spawn::Ambient | Spawn::Burst)
            && self.chance(SHARD_EDGE_SPAWN_CHANCE);
        if from_edge {
            let edge = self.rng.gen_range(0..4);
            position = match edge {
                0 => Vec2::new(-SHARD_EDGE_OFFSET, self.uniform(0.0, h)),
                1 => Vec2::new(w + SHARD_EDGE_OFFSET, self.uniform(0.0, h)),
                2 => Vec2::new(self.uniform(0.0, w), -SHARD_EDGE_OFFSET),
                _ => Vec2::new(self.uniform(0.0, w), h + SHARD_EDGE_OFFSET),
            };
        }

        let speed = if burst {
            self.uniform(1.3, 3.0)
        } else {
            self.uniform(0.22, 1.15)
        };
        let angle = self.uniform(0.0, TAU);
        let mut hue = self.uniform(190.0, 206.0);
        if self.chance(SHARD_VIOLET_CHANCE) {
            hue += SHARD_VIOLET_HUE_SHIFT;
        }

        Shard {
            position,
            velocity: Vec2::new(angle.cos(), angle.sin()) * speed,
            rotation: self.uniform(0.0, TAU),
            angular_velocity: self.uniform(-0.022, 0.022),
            size: Vec2::new(self.uniform(8.0, 30.0), self.uniform(2.6, 11.0)),
            age: 0.0,
            max_life: if burst {
                self.uniform(2.0, 3.2)
            } else {
                self.uniform(3.0, 7.2)
            },
            hue,
        }
    }

    fn spawn(&mut self, spawn: Spawn, count: usize) {
        for _ in 0..count {
            let s = self.make_shard(spawn);
            self.shards.push(s);
        }
    }
}

#[inline]
fn out_of_bounds(p: Vec2, w: f32, h: f32) -> bool {
    p.x < -SHARD_BOUNDS_MARGIN
        || p.x > w + SHARD_BOUNDS_MARGIN
        || p.y < -SHARD_BOUNDS_MARGIN
        || p.y > h + SHARD_BOUNDS_MARGIN
}

impl System for Shards {
    fn name(&self) -> &'static str {
        "shards"
    }

    fn on_resize(&mut self, ctx: &FrameContext) {
        self.width = ctx.width;
        self.height = ctx.height;
        self.shards.clear();
        self.spawn(Spawn::Initial, Self::initial_count(ctx.intensity));
    }

    fn update(&mut self, ctx: &FrameContext, dt: f32) {
        if let Some(p) = ctx.pointer {
            if p.speed() > POINTER_BURST_SPEED && self.chance(POINTER_BURST_CHANCE * ctx.intensity)
            {
                self.spawn(Spawn::BurstAt(p.position), POINTER_BURST_SIZE);
            }
        }
        if self.chance(GLITCH_BURST_CHANCE * ctx.intensity) {
            self.spawn(Spawn::Burst, GLITCH_BURST_SIZE);
        }

        let k = dt * REFERENCE_FPS;
        let damping = SHARD_DAMPING_PER_FRAME.powf(k);
        for s in &mut self.shards {
            s.age += dt;
            s.position += s.velocity * k;
            s.rotation += s.angular_velocity * k;
            s.velocity *= damping;
        }
        let (w, h) = (self.width, self.height);
        self.shards
            .retain(|s| s.age <= s.max_life && !out_of_bounds(s.position, w, h));

        let target = Self::target_count(ctx.intensity);
        if self.shards.len() < target {
            self.spawn(Spawn::Ambient, target - self.shards.len());
        }
        let cap = target + SHARD_OVERFLOW;
        if self.shards.len() > cap {
            let excess = self.shards.len() - cap;
            self.shards.drain(..excess);
        }
    }

    fn draw(&self, canvas: &mut dyn Canvas2d, _ctx: &FrameContext) {
        canvas.save();
        canvas.set_composite(Composite::Lighter);

        for s in &self.shards {
            let k = (1.0 - s.age / s.max_life).clamp(0.0, 1.0);
            let alpha = 0.05 + 0.22 * k;
            let (w, h) = (s.size.x, s.size.y);

            canvas.save();
            canvas.translate(s.position.x, s.position.y);
            canvas.rotate(s.rotation);

            // glow
            canvas.set_fill(&Paint::Solid(Color::hsla(s.hue + 8.0, 96.0, 72.0, alpha * 0.55)));
            canvas.fill_round_rect(-w * 0.62, -h * 0.62, w * 1.24, h * 1.24, w.min(h) * 0.45);

            canvas.set_fill(&Paint::Solid(Color::hsla(s.hue, 96.0, 62.0, alpha)));
            canvas.fill_round_rect(-w / 2.0, -h / 2.0, w, h, w.min(h) * 0.35);

            // highlight
            canvas.set_fill(&Paint::Solid(Color::rgba(255, 255, 255, 0.04 * k)));
            canvas.fill_rect(-w * 0.18, -h * 0.08, w * 0.36, h * 0.16);

            canvas.restore();
        }

        canvas.restore();
    }

    fn population(&self) -> usize {
        self.shards.len()
    }
}
