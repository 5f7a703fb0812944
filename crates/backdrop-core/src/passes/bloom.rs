use super::Pass;
use crate::canvas::{Canvas2d, Composite, LayerId};
use crate::constants::*;
use crate::error::BackdropError;
use crate::surface::Surface;
use crate::systems::FrameContext;

/// Blur-and-screen glow around bright regions.
///
/// Holds two offscreen layers: `capture` receives a copy of the frame and
/// `blurred` the filtered result, which is composited back twice.
pub struct Bloom {
    strength: f32,
    radius: f32,
    layers: Option<(LayerId, LayerId)>,
    layer_size: (u32, u32),
}

impl Bloom {
    pub fn new(strength: f32, radius: f32) -> Self {
        Self {
            strength: strength.clamp(0.0, BLOOM_STRENGTH_MAX),
            radius: radius.clamp(BLOOM_RADIUS_MIN, BLOOM_RADIUS_MAX),
            layers: None,
            layer_size: (0, 0),
        }
    }

    #[inline]
    pub fn strength(&self) -> f32 {
        self.strength
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn layer_size(&self) -> Option<(u32, u32)> {
        self.layers.map(|_| self.layer_size)
    }
}

impl Pass for Bloom {
    fn name(&self) -> &'static str {
        "bloom"
    }

    fn on_resize(
        &mut self,
        canvas: &mut dyn Canvas2d,
        surface: &Surface,
    ) -> Result<(), BackdropError> {
        let (w, h) = surface.layer_size();
        match self.layers {
            None => {
                let capture = canvas.create_layer(w, h)?;
                let blurred = match canvas.create_layer(w, h) {
                    Ok(l) => l,
                    Err(e) => {
                        canvas.release_layer(capture);
                        return Err(e);
                    }
                };
                self.layers = Some((capture, blurred));
            }
            Some((capture, blurred)) if self.layer_size != (w, h) => {
                canvas.resize_layer(capture, w, h)?;
                canvas.resize_layer(blurred, w, h)?;
            }
            Some(_) => {}
        }
        self.layer_size = (w, h);
        Ok(())
    }

    fn apply(&mut self, canvas: &mut dyn Canvas2d, ctx: &FrameContext) {
        let Some((capture, blurred)) = self.layers else {
            return;
        };
        canvas.snapshot_into(capture);
        canvas.blur_layer(capture, blurred, self.radius);

        canvas.save();
        canvas.set_composite(Composite::Screen);
        canvas.set_global_alpha(0.18 + 0.22 * self.strength);
        canvas.draw_layer(blurred, 0.0, 0.0, ctx.width, ctx.height);
        canvas.set_global_alpha(0.10 + 0.10 * self.strength);
        canvas.draw_layer(blurred, 0.0, 0.0, ctx.width, ctx.height);
        canvas.restore();
    }

    fn release(&mut self, canvas: &mut dyn Canvas2d) {
        if let Some((capture, blurred)) = self.layers.take() {
            canvas.release_layer(capture);
            canvas.release_layer(blurred);
        }
    }
}
