/// Raw page measurements taken on mount and on every window resize.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    /// Full scrollable height; the surface covers it when taller than the viewport.
    pub document_height: f32,
    pub device_pixel_ratio: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32, device_pixel_ratio: f32) -> Self {
        Self {
            width,
            height,
            document_height: height,
            device_pixel_ratio,
        }
    }
}

/// Render surface geometry owned by the frame clock.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Surface {
    pub width: f32,
    pub height: f32,
    pub dpr: f32,
    pub quality_scale: f32,
}

impl Surface {
    pub fn measure(viewport: &Viewport, dpr_cap: f32, quality_scale: f32) -> Self {
        let dpr = if viewport.device_pixel_ratio.is_finite() {
            viewport.device_pixel_ratio.clamp(1.0, dpr_cap.max(1.0))
        } else {
            1.0
        };
        let width = non_negative(viewport.width);
        let height = non_negative(viewport.height).max(non_negative(viewport.document_height));
        Self {
            width,
            height,
            dpr,
            quality_scale,
        }
    }

    /// Backing store size in device pixels.
    pub fn backing_size(&self) -> (u32, u32) {
        let k = self.dpr * self.quality_scale;
        (px(self.width * k), px(self.height * k))
    }

    /// Offscreen layer size used by post-processing passes.
    pub fn layer_size(&self) -> (u32, u32) {
        (
            px(self.width * self.quality_scale),
            px(self.height * self.quality_scale),
        )
    }

    /// Uniform scale mapping logical pixels onto the backing store.
    #[inline]
    pub fn pixel_scale(&self) -> f32 {
        self.dpr * self.quality_scale
    }
}

#[inline]
fn px(v: f32) -> u32 {
    (v.floor() as u32).max(1)
}

#[inline]
fn non_negative(v: f32) -> f32 {
    if v.is_finite() {
        v.max(0.0)
    } else {
        0.0
    }
}
