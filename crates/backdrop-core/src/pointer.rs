use crate::constants::{POINTER_FOLLOW_RETAIN, POINTER_VELOCITY_RETAIN, REFERENCE_FPS};
use glam::Vec2;

/// Smoothed pointer state handed to systems each frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerSample {
    pub position: Vec2,
    /// Logical pixels per reference frame.
    pub velocity: Vec2,
}

impl PointerSample {
    /// Manhattan speed, matching how burst thresholds are tuned.
    #[inline]
    pub fn speed(&self) -> f32 {
        self.velocity.x.abs() + self.velocity.y.abs()
    }
}

/// Turns raw pointer-move events into a smoothed position/velocity signal.
#[derive(Clone, Debug, Default)]
pub struct PointerFeed {
    target: Option<Vec2>,
    position: Vec2,
    velocity: Vec2,
}

impl PointerFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_move(&mut self, x: f32, y: f32) {
        if !(x.is_finite() && y.is_finite()) {
            return;
        }
        let p = Vec2::new(x, y);
        if self.target.is_none() {
            self.position = p;
            self.velocity = Vec2::ZERO;
        }
        self.target = Some(p);
    }

    pub fn step(&mut self, dt: f32) {
        let Some(target) = self.target else {
            return;
        };
        if dt <= 0.0 {
            return;
        }
        let k = dt * REFERENCE_FPS;
        let follow = 1.0 - POINTER_FOLLOW_RETAIN.powf(k);
        let prev = self.position;
        self.position += (target - self.position) * follow;
        let frame_velocity = (self.position - prev) / k;
        let retain = POINTER_VELOCITY_RETAIN.powf(k);
        self.velocity = self.velocity * retain + frame_velocity * (1.0 - retain);
    }

    /// None until the first pointer event arrives.
    pub fn sample(&self) -> Option<PointerSample> {
        self.target.map(|_| PointerSample {
            position: self.position,
            velocity: self.velocity,
        })
    }
}
