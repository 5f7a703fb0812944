//! Adaptive render-resolution control.
//!
//! Frame rate is smoothed with an exponential moving average and evaluated on
//! a fixed cadence. Distinct down/up thresholds plus a short hold after each
//! change keep the tier from oscillating on noise.

use crate::constants::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QualityTier {
    High,
    Medium,
    Low,
}

impl QualityTier {
    /// Tier used when adaptation is disabled (touch devices).
    pub const PINNED: QualityTier = QualityTier::Medium;

    pub fn scale(&self) -> f32 {
        QUALITY_TIERS[self.index()]
    }

    #[inline]
    fn index(&self) -> usize {
        match self {
            QualityTier::High => 0,
            QualityTier::Medium => 1,
            QualityTier::Low => 2,
        }
    }

    pub fn lower(&self) -> Option<QualityTier> {
        match self {
            QualityTier::High => Some(QualityTier::Medium),
            QualityTier::Medium => Some(QualityTier::Low),
            QualityTier::Low => None,
        }
    }

    pub fn higher(&self) -> Option<QualityTier> {
        match self {
            QualityTier::High => None,
            QualityTier::Medium => Some(QualityTier::High),
            QualityTier::Low => Some(QualityTier::Medium),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QualityChange {
    pub from: QualityTier,
    pub to: QualityTier,
}

impl QualityChange {
    pub fn is_downgrade(&self) -> bool {
        self.to.scale() < self.from.scale()
    }
}

#[derive(Clone, Debug)]
pub struct QualityController {
    tier: QualityTier,
    pinned: bool,
    smoothed_fps: f32,
    since_eval: f32,
    hold: u32,
}

impl QualityController {
    pub fn adaptive() -> Self {
        Self {
            tier: QualityTier::High,
            pinned: false,
            smoothed_fps: FPS_INITIAL,
            since_eval: 0.0,
            hold: 0,
        }
    }

    pub fn pinned() -> Self {
        Self {
            tier: QualityTier::PINNED,
            pinned: true,
            ..Self::adaptive()
        }
    }

    #[inline]
    pub fn tier(&self) -> QualityTier {
        self.tier
    }

    #[inline]
    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    #[inline]
    pub fn smoothed_fps(&self) -> f32 {
        self.smoothed_fps
    }

    /// Feed one frame's wall time; evaluates every `QUALITY_EVAL_INTERVAL_SEC`.
    pub fn record_frame(&mut self, raw_dt: f32) -> Option<QualityChange> {
        if !(raw_dt.is_finite() && raw_dt > 0.0) {
            return None;
        }
        let instant_fps = (1.0 / raw_dt).min(240.0);
        self.smoothed_fps =
            FPS_EMA_RETAIN * self.smoothed_fps + (1.0 - FPS_EMA_RETAIN) * instant_fps;
        self.since_eval += raw_dt;
        if self.since_eval < QUALITY_EVAL_INTERVAL_SEC {
            return None;
        }
        self.since_eval = 0.0;
        self.evaluate(self.smoothed_fps)
    }

    /// Apply the hysteresis rule to one smoothed frame-rate value.
    pub fn evaluate(&mut self, smoothed_fps: f32) -> Option<QualityChange> {
        if self.pinned {
            return None;
        }
        if self.hold > 0 {
            self.hold -= 1;
            return None;
        }
        let next = if smoothed_fps < FPS_LOW {
            self.tier.lower()
        } else if smoothed_fps > FPS_HIGH {
            self.tier.higher()
        } else {
            None
        }?;
        let change = QualityChange {
            from: self.tier,
            to: next,
        };
        self.tier = next;
        self.hold = QUALITY_HOLD_EVALS;
        log::info!(
            "[quality] {:?} -> {:?} at {:.1} fps (scale {:.2})",
            change.from,
            change.to,
            smoothed_fps,
            next.scale()
        );
        Some(change)
    }
}
