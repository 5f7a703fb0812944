use crate::constants::MAX_FRAME_DT_SEC;

/// Loop lifecycle. `Stopped` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    Idle,
    Running,
    Suspended,
    Stopped,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameDelta {
    /// Simulation step in seconds, clamped to `[0, MAX_FRAME_DT_SEC]`.
    pub dt: f32,
    /// Unclamped wall time since the previous frame, for rate measurement.
    pub raw_dt: f32,
}

/// Owns frame timing and the start/stop state machine.
#[derive(Clone, Debug)]
pub struct FrameClock {
    lifecycle: Lifecycle,
    last_ms: f64,
    time: f32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            lifecycle: Lifecycle::Idle,
            last_ms: 0.0,
            time: 0.0,
        }
    }

    #[inline]
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Seconds of simulated time since start.
    #[inline]
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Returns true if the clock transitioned into `Running`.
    pub fn start(&mut self, now_ms: f64) -> bool {
        if self.lifecycle != Lifecycle::Idle {
            return false;
        }
        self.lifecycle = Lifecycle::Running;
        self.last_ms = now_ms;
        true
    }

    /// Returns true on the first call only.
    pub fn stop(&mut self) -> bool {
        if self.lifecycle == Lifecycle::Stopped {
            return false;
        }
        self.lifecycle = Lifecycle::Stopped;
        true
    }

    pub fn suspend(&mut self) -> bool {
        if self.lifecycle != Lifecycle::Running {
            return false;
        }
        self.lifecycle = Lifecycle::Suspended;
        true
    }

    /// Resume after suspension, rebasing so the hidden interval is not simulated.
    pub fn resume(&mut self, now_ms: f64) -> bool {
        if self.lifecycle != Lifecycle::Suspended {
            return false;
        }
        self.lifecycle = Lifecycle::Running;
        self.last_ms = now_ms;
        true
    }

    pub fn advance(&mut self, now_ms: f64) -> Option<FrameDelta> {
        if self.lifecycle != Lifecycle::Running {
            return None;
        }
        let raw_dt = ((now_ms - self.last_ms) / 1000.0) as f32;
        self.last_ms = now_ms;
        let dt = if raw_dt.is_finite() {
            raw_dt.clamp(0.0, MAX_FRAME_DT_SEC)
        } else {
            0.0
        };
        self.time += dt;
        Some(FrameDelta { dt, raw_dt })
    }
}
