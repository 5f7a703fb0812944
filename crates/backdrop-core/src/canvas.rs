//! Drawing seam between the simulation and a concrete 2D backend.
//!
//! Systems and passes only ever talk to [`Canvas2d`]. The web frontend
//! implements it over `CanvasRenderingContext2d`; host tests implement it with
//! a recorder. Coordinates are logical (CSS) pixels unless stated otherwise.

use crate::error::BackdropError;
use glam::Vec2;
use serde::Deserialize;
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    #[serde(default = "opaque")]
    pub a: f32,
}

fn opaque() -> f32 {
    1.0
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 1.0);

    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Color {
    Rgba(Rgba),
    /// Hue in degrees, saturation and lightness in percent.
    Hsla { h: f32, s: f32, l: f32, a: f32 },
}

impl Color {
    pub const TRANSPARENT: Color = Color::Rgba(Rgba::new(0, 0, 0, 0.0));
    pub const WHITE: Color = Color::Rgba(Rgba::new(255, 255, 255, 1.0));

    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Color::Rgba(Rgba::new(r, g, b, a))
    }

    #[inline]
    pub const fn hsla(h: f32, s: f32, l: f32, a: f32) -> Self {
        Color::Hsla { h, s, l, a }
    }

    pub fn alpha(&self) -> f32 {
        match *self {
            Color::Rgba(c) => c.a,
            Color::Hsla { a, .. } => a,
        }
    }

    /// CSS colour string understood by canvas fill styles.
    pub fn to_css(&self) -> String {
        match *self {
            Color::Rgba(c) => format!("rgba({},{},{},{:.4})", c.r, c.g, c.b, c.a.clamp(0.0, 1.0)),
            Color::Hsla { h, s, l, a } => {
                format!("hsla({:.2},{:.1}%,{:.1}%,{:.4})", h, s, l, a.clamp(0.0, 1.0))
            }
        }
    }
}

impl From<Rgba> for Color {
    fn from(c: Rgba) -> Self {
        Color::Rgba(c)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorStop {
    pub offset: f32,
    pub color: Color,
}

pub type Stops = SmallVec<[ColorStop; 4]>;

#[inline]
pub fn stop(offset: f32, color: Color) -> ColorStop {
    ColorStop { offset, color }
}

/// Fill style. Radial gradients always start from a zero-radius centre.
#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
    Solid(Color),
    Linear { from: Vec2, to: Vec2, stops: Stops },
    Radial { center: Vec2, radius: f32, stops: Stops },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Composite {
    SourceOver,
    Screen,
    Lighter,
}

impl Composite {
    pub fn as_css(&self) -> &'static str {
        match self {
            Composite::SourceOver => "source-over",
            Composite::Screen => "screen",
            Composite::Lighter => "lighter",
        }
    }
}

/// Handle to an offscreen buffer owned by the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LayerId(pub u32);

pub trait Canvas2d {
    /// Resize the backing store in device pixels. Clears content and state.
    fn set_backing_size(&mut self, width: u32, height: u32);
    /// On-page size in logical pixels; the backing store is stretched to it.
    fn set_display_size(&mut self, width: f32, height: f32);
    fn set_transform(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32);

    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, x: f32, y: f32);
    fn rotate(&mut self, radians: f32);
    fn set_composite(&mut self, op: Composite);
    fn set_global_alpha(&mut self, alpha: f32);
    fn set_fill(&mut self, paint: &Paint);

    fn clear_rect(&mut self, x: f32, y: f32, w: f32, h: f32);
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32);
    fn fill_polygon(&mut self, points: &[Vec2]);
    fn fill_round_rect(&mut self, x: f32, y: f32, w: f32, h: f32, radius: f32);

    /// Allocate an offscreen buffer of `width` x `height` pixels.
    fn create_layer(&mut self, width: u32, height: u32) -> Result<LayerId, BackdropError>;
    fn resize_layer(&mut self, layer: LayerId, width: u32, height: u32) -> Result<(), BackdropError>;
    fn release_layer(&mut self, layer: LayerId);
    /// Clear `layer` and copy the whole main surface into it, scaled to fit.
    fn snapshot_into(&mut self, layer: LayerId);
    /// Clear `dst` and draw `src` into it through a gaussian blur.
    fn blur_layer(&mut self, src: LayerId, dst: LayerId, radius: f32);
    /// Draw `layer` onto the main surface using the current state.
    fn draw_layer(&mut self, layer: LayerId, x: f32, y: f32, w: f32, h: f32);
}
