//! Frame loop owner: surface, clock, quality control, systems and passes.
//!
//! The engine is driven from outside: the host calls [`Engine::tick`] once per
//! animation frame and stops scheduling frames once it returns
//! [`FrameStatus::Halted`]. Within a tick every system updates before any
//! system draws, and every draw happens before the first pass.

use crate::canvas::{Canvas2d, Paint};
use crate::clock::{FrameClock, Lifecycle};
use crate::config::{BackdropConfig, Environment, MotionPolicy};
use crate::error::BackdropError;
use crate::passes::{Bloom, Pass, Vignette};
use crate::pointer::PointerFeed;
use crate::quality::{QualityController, QualityTier};
use crate::surface::{Surface, Viewport};
use crate::systems::{system_rng, CursorTrail, FrameContext, Shards, StageBeams, System};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameStatus {
    /// Schedule another frame.
    Continue,
    /// Not running; do not schedule another frame.
    Halted,
}

pub struct Engine<C: Canvas2d> {
    canvas: C,
    config: BackdropConfig,
    policy: MotionPolicy,
    clock: FrameClock,
    quality: QualityController,
    pointer: Option<PointerFeed>,
    viewport: Viewport,
    surface: Surface,
    systems: Vec<Box<dyn System>>,
    passes: Vec<Box<dyn Pass>>,
}

impl<C: Canvas2d> Engine<C> {
    /// Bare engine with no systems or passes; the surface is applied at once.
    pub fn new(canvas: C, config: &BackdropConfig, env: &Environment) -> Self {
        let config = config.sanitized();
        let policy = MotionPolicy::from_environment(env);
        let quality = if policy.pin_quality {
            QualityController::pinned()
        } else {
            QualityController::adaptive()
        };
        let surface = Surface::measure(&env.viewport, config.dpr_cap, quality.tier().scale());
        let mut engine = Self {
            canvas,
            config,
            policy,
            clock: FrameClock::new(),
            quality,
            pointer: policy.pointer_feed.then(PointerFeed::new),
            viewport: env.viewport,
            surface,
            systems: Vec::new(),
            passes: Vec::new(),
        };
        engine.configure_canvas();
        log::info!(
            "[backdrop] intensity={:.2} pointer_feed={} quality={:?}{}",
            engine.config.intensity,
            policy.pointer_feed,
            engine.quality.tier(),
            if policy.pin_quality { " (pinned)" } else { "" }
        );
        engine
    }

    /// Engine with the standard scene: beams, shards, the cursor trail when
    /// the pointer feed is active, then bloom and vignette.
    pub fn with_default_scene(
        canvas: C,
        config: &BackdropConfig,
        env: &Environment,
    ) -> Result<Self, BackdropError> {
        let mut engine = Self::new(canvas, config, env);
        let cfg = engine.config.clone();
        engine.add_system(Box::new(StageBeams::new(system_rng(cfg.seed, 0))));
        engine.add_system(Box::new(Shards::new(system_rng(cfg.seed, 1))));
        if engine.pointer.is_some() {
            engine.add_system(Box::new(CursorTrail::new()));
        }
        engine.add_pass(Box::new(Bloom::new(
            cfg.bloom_strength * cfg.intensity,
            cfg.bloom_radius,
        )))?;
        engine.add_pass(Box::new(Vignette::new(cfg.vignette_strength)))?;
        Ok(engine)
    }

    pub fn add_system(&mut self, mut system: Box<dyn System>) {
        if self.clock.lifecycle() == Lifecycle::Stopped {
            return;
        }
        system.on_resize(&self.frame_context());
        self.systems.push(system);
    }

    pub fn add_pass(&mut self, mut pass: Box<dyn Pass>) -> Result<(), BackdropError> {
        if self.clock.lifecycle() == Lifecycle::Stopped {
            return Ok(());
        }
        pass.on_resize(&mut self.canvas, &self.surface)?;
        self.passes.push(pass);
        Ok(())
    }

    /// Begin running. Returns true if the host should request the first frame.
    pub fn start(&mut self, now_ms: f64) -> bool {
        self.clock.start(now_ms)
    }

    /// Stop for good and release every pass buffer. Idempotent.
    pub fn stop(&mut self) {
        if !self.clock.stop() {
            return;
        }
        for pass in &mut self.passes {
            pass.release(&mut self.canvas);
        }
        self.passes.clear();
        self.systems.clear();
        self.pointer = None;
        log::info!("[backdrop] stopped");
    }

    /// Page visibility change. Returns true if the lifecycle changed; after a
    /// change to visible the host should request a frame.
    pub fn set_visible(&mut self, visible: bool, now_ms: f64) -> bool {
        let changed = if visible {
            self.clock.resume(now_ms)
        } else {
            self.clock.suspend()
        };
        if changed {
            log::debug!("[backdrop] visible={visible}");
        }
        changed
    }

    /// Window resize. Repeated calls with an unchanged viewport are no-ops.
    pub fn resize(&mut self, viewport: Viewport) {
        if self.clock.lifecycle() == Lifecycle::Stopped {
            return;
        }
        self.viewport = viewport;
        if let Err(e) = self.apply_surface() {
            log::warn!("[surface] resize failed: {e}");
        }
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        if let Some(p) = &mut self.pointer {
            p.on_move(x, y);
        }
    }

    pub fn tick(&mut self, now_ms: f64) -> FrameStatus {
        let Some(delta) = self.clock.advance(now_ms) else {
            return FrameStatus::Halted;
        };
        if self.quality.record_frame(delta.raw_dt).is_some() {
            if let Err(e) = self.apply_surface() {
                log::warn!("[quality] surface re-allocation failed: {e}");
            }
        }
        if let Some(p) = &mut self.pointer {
            p.step(delta.dt);
        }

        let ctx = self.frame_context();
        for system in &mut self.systems {
            system.update(&ctx, delta.dt);
        }

        let (w, h) = (ctx.width, ctx.height);
        self.canvas.clear_rect(0.0, 0.0, w, h);
        self.canvas
            .set_fill(&Paint::Solid(self.config.background.into()));
        self.canvas.fill_rect(0.0, 0.0, w, h);
        for system in &self.systems {
            system.draw(&mut self.canvas, &ctx);
        }
        for pass in &mut self.passes {
            pass.apply(&mut self.canvas, &ctx);
        }
        FrameStatus::Continue
    }

    fn frame_context(&self) -> FrameContext {
        FrameContext {
            width: self.surface.width,
            height: self.surface.height,
            time: self.clock.time(),
            intensity: self.config.intensity,
            pointer: self.pointer.as_ref().and_then(PointerFeed::sample),
        }
    }

    fn configure_canvas(&mut self) {
        let (bw, bh) = self.surface.backing_size();
        let k = self.surface.pixel_scale();
        self.canvas.set_backing_size(bw, bh);
        self.canvas
            .set_display_size(self.surface.width, self.surface.height);
        self.canvas.set_transform(k, 0.0, 0.0, k, 0.0, 0.0);
    }

    /// Re-measure at the current quality tier and re-allocate on change.
    /// Systems are notified only when the logical size changed.
    fn apply_surface(&mut self) -> Result<(), BackdropError> {
        let next = Surface::measure(
            &self.viewport,
            self.config.dpr_cap,
            self.quality.tier().scale(),
        );
        if next == self.surface {
            return Ok(());
        }
        let resized = next.width != self.surface.width || next.height != self.surface.height;
        self.surface = next;
        self.configure_canvas();
        log::debug!(
            "[surface] {:.0}x{:.0} dpr={:.2} scale={:.2} backing={:?}",
            next.width,
            next.height,
            next.dpr,
            next.quality_scale,
            next.backing_size()
        );

        // a quality-only change keeps the simulation; only buffers follow it
        if resized {
            let ctx = self.frame_context();
            for system in &mut self.systems {
                system.on_resize(&ctx);
            }
        }
        let mut result = Ok(());
        for pass in &mut self.passes {
            if let Err(e) = pass.on_resize(&mut self.canvas, &next) {
                log::warn!("[surface] pass {} failed to resize: {e}", pass.name());
                result = Err(e);
            }
        }
        result
    }

    // ---------------- accessors ----------------

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn config(&self) -> &BackdropConfig {
        &self.config
    }

    pub fn policy(&self) -> MotionPolicy {
        self.policy
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Simulated seconds since start.
    pub fn time(&self) -> f32 {
        self.clock.time()
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.clock.lifecycle()
    }

    pub fn quality_tier(&self) -> QualityTier {
        self.quality.tier()
    }

    pub fn quality(&self) -> &QualityController {
        &self.quality
    }

    pub fn pointer_active(&self) -> bool {
        self.pointer.is_some()
    }

    pub fn system_names(&self) -> Vec<&'static str> {
        self.systems.iter().map(|s| s.name()).collect()
    }

    pub fn pass_names(&self) -> Vec<&'static str> {
        self.passes.iter().map(|p| p.name()).collect()
    }

    pub fn population(&self, system: &str) -> Option<usize> {
        self.systems
            .iter()
            .find(|s| s.name() == system)
            .map(|s| s.population())
    }
}
