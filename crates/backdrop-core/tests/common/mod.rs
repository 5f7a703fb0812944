// Recording Canvas2d fake shared by the host-side tests.

#![allow(dead_code)]

use backdrop_core::{
    BackdropConfig, BackdropError, Canvas2d, Composite, Environment, LayerId, Paint, Viewport,
};
use glam::Vec2;
use std::collections::HashMap;

#[derive(Clone, Debug, PartialEq)]
pub enum Op {
    Save,
    Restore,
    Translate,
    Rotate,
    Composite(Composite),
    Alpha(f32),
    Fill(Paint),
    ClearRect,
    FillRect,
    Polygon(usize),
    RoundRect,
    Snapshot(LayerId),
    Blur(LayerId, LayerId, f32),
    DrawLayer(LayerId),
}

impl Op {
    pub fn is_draw(&self) -> bool {
        matches!(
            self,
            Op::ClearRect | Op::FillRect | Op::Polygon(_) | Op::RoundRect | Op::DrawLayer(_)
        )
    }
}

#[derive(Default)]
pub struct RecordingCanvas {
    pub ops: Vec<Op>,
    pub backing: (u32, u32),
    pub backing_changes: usize,
    pub display: (f32, f32),
    pub transform: [f32; 6],
    pub layers: HashMap<LayerId, (u32, u32)>,
    pub layers_created: usize,
    pub fail_layers: bool,
    next_layer: u32,
}

impl RecordingCanvas {
    pub fn failing_layers() -> Self {
        Self {
            fail_layers: true,
            ..Self::default()
        }
    }

    pub fn draw_calls(&self) -> usize {
        self.ops.iter().filter(|op| op.is_draw()).count()
    }

    pub fn ops_since(&self, mark: usize) -> &[Op] {
        &self.ops[mark.min(self.ops.len())..]
    }

    pub fn radial_fills_since(&self, mark: usize) -> Vec<&Paint> {
        self.ops_since(mark)
            .iter()
            .filter_map(|op| match op {
                Op::Fill(p @ Paint::Radial { .. }) => Some(p),
                _ => None,
            })
            .collect()
    }
}

impl Canvas2d for RecordingCanvas {
    fn set_backing_size(&mut self, width: u32, height: u32) {
        self.backing = (width, height);
        self.backing_changes += 1;
    }

    fn set_display_size(&mut self, width: f32, height: f32) {
        self.display = (width, height);
    }

    fn set_transform(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        self.transform = [a, b, c, d, e, f];
    }

    fn save(&mut self) {
        self.ops.push(Op::Save);
    }

    fn restore(&mut self) {
        self.ops.push(Op::Restore);
    }

    fn translate(&mut self, _x: f32, _y: f32) {
        self.ops.push(Op::Translate);
    }

    fn rotate(&mut self, _radians: f32) {
        self.ops.push(Op::Rotate);
    }

    fn set_composite(&mut self, op: Composite) {
        self.ops.push(Op::Composite(op));
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.ops.push(Op::Alpha(alpha));
    }

    fn set_fill(&mut self, paint: &Paint) {
        self.ops.push(Op::Fill(paint.clone()));
    }

    fn clear_rect(&mut self, _x: f32, _y: f32, _w: f32, _h: f32) {
        self.ops.push(Op::ClearRect);
    }

    fn fill_rect(&mut self, _x: f32, _y: f32, _w: f32, _h: f32) {
        self.ops.push(Op::FillRect);
    }

    fn fill_polygon(&mut self, points: &[Vec2]) {
        self.ops.push(Op::Polygon(points.len()));
    }

    fn fill_round_rect(&mut self, _x: f32, _y: f32, _w: f32, _h: f32, _radius: f32) {
        self.ops.push(Op::RoundRect);
    }

    fn create_layer(&mut self, width: u32, height: u32) -> Result<LayerId, BackdropError> {
        if self.fail_layers {
            return Err(BackdropError::LayerUnavailable { width, height });
        }
        let id = LayerId(self.next_layer);
        self.next_layer += 1;
        self.layers_created += 1;
        self.layers.insert(id, (width, height));
        Ok(id)
    }

    fn resize_layer(&mut self, layer: LayerId, width: u32, height: u32) -> Result<(), BackdropError> {
        match self.layers.get_mut(&layer) {
            Some(size) => {
                *size = (width, height);
                Ok(())
            }
            None => Err(BackdropError::UnknownLayer(layer)),
        }
    }

    fn release_layer(&mut self, layer: LayerId) {
        self.layers.remove(&layer);
    }

    fn snapshot_into(&mut self, layer: LayerId) {
        self.ops.push(Op::Snapshot(layer));
    }

    fn blur_layer(&mut self, src: LayerId, dst: LayerId, radius: f32) {
        self.ops.push(Op::Blur(src, dst, radius));
    }

    fn draw_layer(&mut self, layer: LayerId, _x: f32, _y: f32, _w: f32, _h: f32) {
        self.ops.push(Op::DrawLayer(layer));
    }
}

pub fn desktop() -> Environment {
    Environment::desktop(Viewport::new(1440.0, 900.0, 1.0))
}

pub fn touch() -> Environment {
    Environment::touch(Viewport::new(390.0, 844.0, 3.0))
}

pub fn seeded(intensity: f32) -> BackdropConfig {
    BackdropConfig {
        intensity,
        seed: Some(7),
        ..BackdropConfig::default()
    }
}

/// Drive `frames` ticks of `frame_ms` each, starting after `start_ms`.
/// Returns the timestamp of the last tick.
pub fn run_frames<C: Canvas2d>(
    engine: &mut backdrop_core::Engine<C>,
    start_ms: f64,
    frames: usize,
    frame_ms: f64,
) -> f64 {
    let mut now = start_ms;
    for _ in 0..frames {
        now += frame_ms;
        engine.tick(now);
    }
    now
}
