//! Emitter systems: independent simulated populations that update and draw
//! themselves each frame.

mod beams;
mod shards;
mod trail;

pub use beams::{Beam, StageBeams};
pub use shards::{Shard, Shards};
pub use trail::CursorTrail;

use crate::canvas::Canvas2d;
use crate::pointer::PointerSample;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Read-only view of engine state for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameContext {
    pub width: f32,
    pub height: f32,
    /// Simulated seconds since start.
    pub time: f32,
    /// Sanitized intensity.
    pub intensity: f32,
    pub pointer: Option<PointerSample>,
}

pub trait System {
    fn name(&self) -> &'static str;
    /// Called after every applied surface change, before the next update.
    fn on_resize(&mut self, ctx: &FrameContext);
    fn update(&mut self, ctx: &FrameContext, dt: f32);
    fn draw(&self, canvas: &mut dyn Canvas2d, ctx: &FrameContext);
    /// Number of live elements, for diagnostics.
    fn population(&self) -> usize {
        0
    }
}

/// Per-system RNG stream. Seeded runs are reproducible; unseeded ones draw
/// from OS entropy.
pub(crate) fn system_rng(seed: Option<u64>, stream: u64) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s ^ stream.wrapping_mul(0x9E37_79B9_7F4A_7C15)),
        None => StdRng::from_entropy(),
    }
}

#[inline]
pub(crate) fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
