use super::Pass;
use crate::canvas::{stop, Canvas2d, Color, Composite, Paint};
use crate::error::BackdropError;
use crate::surface::Surface;
use crate::systems::FrameContext;
use glam::Vec2;
use smallvec::smallvec;

/// Darkens the edges with a radial gradient centred slightly above middle.
pub struct Vignette {
    strength: f32,
}

impl Vignette {
    pub fn new(strength: f32) -> Self {
        Self {
            strength: strength.clamp(0.0, 1.0),
        }
    }

    #[inline]
    pub fn strength(&self) -> f32 {
        self.strength
    }
}

impl Pass for Vignette {
    fn name(&self) -> &'static str {
        "vignette"
    }

    fn on_resize(&mut self, _: &mut dyn Canvas2d, _: &Surface) -> Result<(), BackdropError> {
        Ok(())
    }

    fn apply(&mut self, canvas: &mut dyn Canvas2d, ctx: &FrameContext) {
        let (w, h) = (ctx.width, ctx.height);
        let s = self.strength;
        canvas.save();
        canvas.set_composite(Composite::SourceOver);
        canvas.set_fill(&Paint::Radial {
            center: Vec2::new(w * 0.5, h * 0.42),
            radius: w.max(h) * 0.88,
            stops: smallvec![
                stop(0.0, Color::TRANSPARENT),
                stop(0.68, Color::rgba(0, 0, 0, 0.46 * s)),
                stop(1.0, Color::rgba(0, 0, 0, 0.92 * s)),
            ],
        });
        canvas.fill_rect(0.0, 0.0, w, h);
        canvas.restore();
    }

    fn release(&mut self, _: &mut dyn Canvas2d) {}
}
