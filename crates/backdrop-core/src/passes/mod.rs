//! Post-processing passes applied to the fully composed frame.

mod bloom;
mod vignette;

pub use bloom::Bloom;
pub use vignette::Vignette;

use crate::canvas::Canvas2d;
use crate::error::BackdropError;
use crate::surface::Surface;
use crate::systems::FrameContext;

pub trait Pass {
    fn name(&self) -> &'static str;
    /// (Re)allocate offscreen buffers for the new surface.
    fn on_resize(&mut self, canvas: &mut dyn Canvas2d, surface: &Surface)
        -> Result<(), BackdropError>;
    fn apply(&mut self, canvas: &mut dyn Canvas2d, ctx: &FrameContext);
    /// Release every buffer the pass owns. Safe to call more than once.
    fn release(&mut self, canvas: &mut dyn Canvas2d);
}
