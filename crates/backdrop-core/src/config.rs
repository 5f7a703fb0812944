use crate::canvas::Rgba;
use crate::constants::*;
use crate::surface::Viewport;
use serde::Deserialize;

/// Host-supplied configuration. Never trusted as-is: the engine only stores
/// the result of [`BackdropConfig::sanitized`].
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BackdropConfig {
    pub intensity: f32,
    pub dpr_cap: f32,
    pub background: Rgba,
    /// Bloom strength before it is multiplied by intensity.
    pub bloom_strength: f32,
    pub bloom_radius: f32,
    pub vignette_strength: f32,
    pub seed: Option<u64>,
}

impl Default for BackdropConfig {
    fn default() -> Self {
        Self {
            intensity: DEFAULT_INTENSITY,
            dpr_cap: DEFAULT_DPR_CAP,
            background: Rgba::BLACK,
            bloom_strength: DEFAULT_BLOOM_STRENGTH,
            bloom_radius: DEFAULT_BLOOM_RADIUS,
            vignette_strength: DEFAULT_VIGNETTE_STRENGTH,
            seed: None,
        }
    }
}

impl BackdropConfig {
    pub fn with_intensity(intensity: f32) -> Self {
        Self {
            intensity,
            ..Self::default()
        }
    }

    pub fn sanitized(&self) -> Self {
        Self {
            intensity: clamp_intensity(self.intensity),
            dpr_cap: finite_or(self.dpr_cap, DEFAULT_DPR_CAP).clamp(1.0, DPR_CAP_MAX),
            background: Rgba {
                a: finite_or(self.background.a, 1.0).clamp(0.0, 1.0),
                ..self.background
            },
            bloom_strength: finite_or(self.bloom_strength, DEFAULT_BLOOM_STRENGTH)
                .clamp(0.0, BLOOM_STRENGTH_MAX),
            bloom_radius: finite_or(self.bloom_radius, DEFAULT_BLOOM_RADIUS)
                .clamp(BLOOM_RADIUS_MIN, BLOOM_RADIUS_MAX),
            vignette_strength: finite_or(self.vignette_strength, DEFAULT_VIGNETTE_STRENGTH)
                .clamp(0.0, 1.0),
            seed: self.seed,
        }
    }
}

#[inline]
pub fn clamp_intensity(intensity: f32) -> f32 {
    finite_or(intensity, DEFAULT_INTENSITY).clamp(INTENSITY_MIN, INTENSITY_MAX)
}

#[inline]
fn finite_or(v: f32, fallback: f32) -> f32 {
    if v.is_finite() {
        v
    } else {
        fallback
    }
}

/// Signals read from the hosting page once at mount.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Environment {
    pub viewport: Viewport,
    pub coarse_pointer: bool,
    pub reduced_motion: bool,
    pub save_data: bool,
}

impl Environment {
    pub fn desktop(viewport: Viewport) -> Self {
        Self {
            viewport,
            coarse_pointer: false,
            reduced_motion: false,
            save_data: false,
        }
    }

    pub fn touch(viewport: Viewport) -> Self {
        Self {
            coarse_pointer: true,
            ..Self::desktop(viewport)
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MotionPolicy {
    /// Track the pointer, spawn pointer bursts and draw the cursor trail.
    pub pointer_feed: bool,
    /// Hold render quality at a fixed tier instead of adapting it.
    pub pin_quality: bool,
}

impl MotionPolicy {
    pub fn from_environment(env: &Environment) -> Self {
        Self {
            pointer_feed: !env.coarse_pointer && !env.reduced_motion && !env.save_data,
            pin_quality: env.coarse_pointer,
        }
    }
}
