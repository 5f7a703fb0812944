// Host-side tests for the engine lifecycle, surface management and frame ordering.

mod common;

use backdrop_core::{
    BackdropConfig, BackdropError, Canvas2d, CursorTrail, Engine, Environment, FrameContext,
    FrameStatus, Lifecycle, Paint, Pass, QualityTier, Surface, System, Viewport,
};
use common::*;
use std::cell::RefCell;
use std::rc::Rc;

fn default_engine() -> Engine<RecordingCanvas> {
    Engine::with_default_scene(RecordingCanvas::default(), &seeded(1.15), &desktop())
        .expect("default scene")
}

#[test]
fn mount_applies_surface_and_allocates_bloom_layers() {
    let engine = default_engine();
    let canvas = engine.canvas();
    assert_eq!(canvas.backing, (1440, 900));
    assert_eq!(canvas.display, (1440.0, 900.0));
    assert_eq!(canvas.transform, [1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
    assert_eq!(canvas.layers.len(), 2);
    assert!(canvas.layers.values().all(|&size| size == (1440, 900)));
    assert_eq!(engine.pass_names(), vec!["bloom", "vignette"]);
    assert_eq!(engine.lifecycle(), Lifecycle::Idle);
}

#[test]
fn tick_before_start_draws_nothing() {
    let mut engine = default_engine();
    assert_eq!(engine.tick(16.0), FrameStatus::Halted);
    assert_eq!(engine.canvas().draw_calls(), 0);
}

#[test]
fn start_is_idempotent() {
    let mut engine = default_engine();
    assert!(engine.start(0.0));
    assert!(!engine.start(5.0));
    assert_eq!(engine.tick(16.0), FrameStatus::Continue);
    assert!(engine.canvas().draw_calls() > 0);
}

#[test]
fn stop_halts_frames_and_releases_everything() {
    let mut engine = default_engine();
    engine.start(0.0);
    let now = run_frames(&mut engine, 0.0, 5, 16.0);

    engine.stop();
    assert_eq!(engine.lifecycle(), Lifecycle::Stopped);
    assert!(engine.canvas().layers.is_empty());
    assert!(engine.system_names().is_empty());
    assert!(engine.pass_names().is_empty());
    assert!(!engine.pointer_active());

    let draws = engine.canvas().draw_calls();
    assert_eq!(engine.tick(now + 16.0), FrameStatus::Halted);
    assert_eq!(engine.canvas().draw_calls(), draws);

    // second stop and late start are harmless
    engine.stop();
    assert!(!engine.start(now + 32.0));
    assert_eq!(engine.tick(now + 48.0), FrameStatus::Halted);
    assert_eq!(engine.canvas().draw_calls(), draws);
}

#[test]
fn stop_before_start_is_safe() {
    let mut engine = default_engine();
    engine.stop();
    engine.stop();
    assert!(!engine.start(0.0));
    assert!(engine.canvas().layers.is_empty());
}

#[test]
fn resize_with_same_viewport_is_idempotent() {
    let mut engine = default_engine();
    let viewport = Viewport {
        width: 1280.0,
        height: 720.0,
        document_height: 2400.0,
        device_pixel_ratio: 1.5,
    };
    engine.resize(viewport);
    let surface = *engine.surface();
    let backing = engine.canvas().backing;
    let layers = engine.canvas().layers.clone();
    let changes = engine.canvas().backing_changes;

    engine.resize(viewport);
    assert_eq!(*engine.surface(), surface);
    assert_eq!(engine.canvas().backing, backing);
    assert_eq!(engine.canvas().layers, layers);
    assert_eq!(engine.canvas().backing_changes, changes);
    assert_eq!(engine.canvas().layers_created, 2);
}

#[test]
fn resize_covers_document_height_and_caps_dpr() {
    let mut engine = default_engine();
    engine.resize(Viewport {
        width: 1000.0,
        height: 600.0,
        document_height: 3000.0,
        device_pixel_ratio: 4.0,
    });
    let surface = engine.surface();
    assert_eq!(surface.height, 3000.0);
    assert_eq!(surface.dpr, 2.0);
    assert_eq!(engine.canvas().backing, (2000, 6000));
    assert_eq!(engine.canvas().display, (1000.0, 3000.0));
    assert_eq!(engine.canvas().transform[0], 2.0);
    // layers follow in place, in logical pixels
    assert_eq!(engine.canvas().layers_created, 2);
    assert!(engine.canvas().layers.values().all(|&s| s == (1000, 3000)));
}

#[test]
fn surface_measure_handles_degenerate_viewports() {
    let s = Surface::measure(
        &Viewport {
            width: f32::NAN,
            height: -5.0,
            document_height: 0.0,
            device_pixel_ratio: f32::INFINITY,
        },
        2.0,
        1.0,
    );
    assert_eq!(s.dpr, 1.0);
    assert_eq!(s.backing_size(), (1, 1));
    assert_eq!(s.layer_size(), (1, 1));
}

#[test]
fn hidden_page_pauses_and_resume_rebases_clock() {
    let mut engine = default_engine();
    engine.start(0.0);
    run_frames(&mut engine, 0.0, 10, 16.0);
    let t_before = engine.time();

    assert!(engine.set_visible(false, 160.0));
    let draws = engine.canvas().draw_calls();
    assert_eq!(engine.tick(176.0), FrameStatus::Halted);
    assert_eq!(engine.canvas().draw_calls(), draws);

    // a minute later the tab comes back
    assert!(engine.set_visible(true, 60_000.0));
    assert_eq!(engine.tick(60_016.0), FrameStatus::Continue);
    let advanced = engine.time() - t_before;
    assert!((advanced - 0.016).abs() < 1e-4, "advanced {advanced}");
}

#[test]
fn visibility_changes_are_ignored_outside_running_states() {
    let mut engine = default_engine();
    assert!(!engine.set_visible(false, 0.0));
    assert!(!engine.set_visible(true, 0.0));
    engine.start(0.0);
    assert!(!engine.set_visible(true, 10.0));
    engine.stop();
    assert!(!engine.set_visible(true, 20.0));
    assert_eq!(engine.lifecycle(), Lifecycle::Stopped);
}

#[test]
fn frame_step_is_clamped_after_stalls() {
    let mut engine = default_engine();
    engine.start(0.0);
    engine.tick(2_000.0);
    assert!((engine.time() - 0.05).abs() < 1e-6);
}

#[test]
fn desktop_mount_tracks_pointer_and_draws_trail() {
    let mut engine = default_engine();
    assert!(engine.pointer_active());
    assert!(engine.system_names().contains(&"cursor-trail"));
    assert_eq!(engine.population("stage-beams"), Some(11));

    engine.start(0.0);
    let mut now = 0.0;
    let mut mark = 0;
    for i in 0..30 {
        engine.pointer_move(300.0 + i as f32 * 12.0, 420.0);
        mark = engine.canvas().ops.len();
        now += 16.0;
        engine.tick(now);
    }
    assert!(engine.population("cursor-trail").unwrap() > 0);
    let head_drawn = engine
        .canvas()
        .radial_fills_since(mark)
        .iter()
        .any(|p| matches!(p, Paint::Radial { stops, .. } if stops[0].color == CursorTrail::HEAD_GLOW));
    assert!(head_drawn, "cursor head glow not drawn in the last frame");

    let shards = engine.population("shards").unwrap();
    assert!((89..=169).contains(&shards), "shards={shards}");
    assert_eq!(engine.population("stage-beams"), Some(11));
}

#[test]
fn touch_mount_disables_pointer_and_pins_quality() {
    let mut engine =
        Engine::with_default_scene(RecordingCanvas::default(), &seeded(1.15), &touch())
            .expect("default scene");
    assert!(!engine.pointer_active());
    assert!(!engine.system_names().contains(&"cursor-trail"));
    assert_eq!(engine.quality_tier(), QualityTier::Medium);
    assert!(engine.quality().is_pinned());

    engine.start(0.0);
    engine.pointer_move(100.0, 100.0);
    // 10 fps for ten seconds
    run_frames(&mut engine, 0.0, 100, 100.0);
    assert_eq!(engine.quality_tier(), QualityTier::Medium);
    assert_eq!(engine.surface().quality_scale, 0.85);
    assert_eq!(engine.surface().dpr, 2.0);
    assert!(!engine.pointer_active());
}

#[test]
fn reduced_motion_and_save_data_disable_pointer_feed_only() {
    let vp = Viewport::new(1200.0, 800.0, 1.0);
    for env in [
        Environment {
            reduced_motion: true,
            ..Environment::desktop(vp)
        },
        Environment {
            save_data: true,
            ..Environment::desktop(vp)
        },
    ] {
        let engine =
            Engine::with_default_scene(RecordingCanvas::default(), &seeded(1.0), &env).unwrap();
        assert!(!engine.pointer_active());
        assert!(!engine.quality().is_pinned());
        assert_eq!(engine.quality_tier(), QualityTier::High);
    }
}

#[test]
fn slow_frames_lower_resolution_and_fast_frames_restore_it() {
    let mut engine = default_engine();
    engine.start(0.0);

    // 25 fps for five seconds
    let now = run_frames(&mut engine, 0.0, 125, 40.0);
    assert_eq!(engine.quality_tier(), QualityTier::Low);
    assert_eq!(engine.surface().quality_scale, 0.7);
    assert_eq!(engine.canvas().backing, (1008, 630));
    assert!(engine.canvas().layers.values().all(|&s| s == (1008, 630)));
    assert_eq!(engine.canvas().layers_created, 2);

    // 100 fps for six seconds
    run_frames(&mut engine, now, 600, 10.0);
    assert_eq!(engine.quality_tier(), QualityTier::High);
    assert_eq!(engine.canvas().backing, (1440, 900));
}

#[test]
fn layer_allocation_failure_fails_mount() {
    let result =
        Engine::with_default_scene(RecordingCanvas::failing_layers(), &seeded(1.0), &desktop());
    assert!(matches!(
        result,
        Err(BackdropError::LayerUnavailable {
            width: 1440,
            height: 900
        })
    ));
}

#[test]
fn passes_run_after_all_draws_in_each_frame() {
    let mut engine = default_engine();
    engine.start(0.0);
    let mark = engine.canvas().ops.len();
    engine.tick(16.0);
    let ops = engine.canvas().ops_since(mark);

    let first_snapshot = ops
        .iter()
        .position(|op| matches!(op, Op::Snapshot(_)))
        .expect("bloom captured the frame");
    let last_shard = ops
        .iter()
        .rposition(|op| matches!(op, Op::RoundRect))
        .expect("shards drawn");
    let last_beam = ops
        .iter()
        .rposition(|op| matches!(op, Op::Polygon(3)))
        .expect("beams drawn");
    assert!(last_shard < first_snapshot);
    assert!(last_beam < first_snapshot);
    assert_eq!(ops.first(), Some(&Op::ClearRect));
}

// ---------------- isolation with recording systems ----------------

type Log = Rc<RefCell<Vec<String>>>;

struct Recorder {
    name: &'static str,
    log: Log,
}

impl System for Recorder {
    fn name(&self) -> &'static str {
        self.name
    }

    fn on_resize(&mut self, ctx: &FrameContext) {
        self.log
            .borrow_mut()
            .push(format!("{}:resize:{}x{}", self.name, ctx.width, ctx.height));
    }

    fn update(&mut self, ctx: &FrameContext, _dt: f32) {
        assert!(ctx.pointer.is_none());
        self.log.borrow_mut().push(format!("{}:update", self.name));
    }

    fn draw(&self, _canvas: &mut dyn Canvas2d, _ctx: &FrameContext) {
        self.log.borrow_mut().push(format!("{}:draw", self.name));
    }
}

struct RecorderPass {
    log: Log,
}

impl Pass for RecorderPass {
    fn name(&self) -> &'static str {
        "recorder"
    }

    fn on_resize(
        &mut self,
        _canvas: &mut dyn Canvas2d,
        surface: &Surface,
    ) -> Result<(), BackdropError> {
        self.log
            .borrow_mut()
            .push(format!("pass:resize:{:?}", surface.layer_size()));
        Ok(())
    }

    fn apply(&mut self, _canvas: &mut dyn Canvas2d, _ctx: &FrameContext) {
        self.log.borrow_mut().push("pass:apply".to_string());
    }

    fn release(&mut self, _canvas: &mut dyn Canvas2d) {
        self.log.borrow_mut().push("pass:release".to_string());
    }
}

#[test]
fn systems_update_then_draw_then_passes_apply() {
    let log: Log = Rc::default();
    let env = Environment::touch(Viewport::new(800.0, 600.0, 1.0));
    let mut engine = Engine::new(RecordingCanvas::default(), &BackdropConfig::default(), &env);
    engine.add_system(Box::new(Recorder {
        name: "a",
        log: log.clone(),
    }));
    engine.add_system(Box::new(Recorder {
        name: "b",
        log: log.clone(),
    }));
    engine
        .add_pass(Box::new(RecorderPass { log: log.clone() }))
        .unwrap();
    assert_eq!(
        *log.borrow(),
        vec!["a:resize:800x600", "b:resize:800x600", "pass:resize:(680, 510)"]
    );

    log.borrow_mut().clear();
    engine.start(0.0);
    engine.tick(16.0);
    assert_eq!(
        *log.borrow(),
        vec!["a:update", "b:update", "a:draw", "b:draw", "pass:apply"]
    );

    log.borrow_mut().clear();
    engine.stop();
    engine.stop();
    assert_eq!(*log.borrow(), vec!["pass:release"]);
}

fn resizes(log: &Log) -> Vec<String> {
    log.borrow()
        .iter()
        .filter(|entry| entry.contains(":resize:"))
        .cloned()
        .collect()
}

#[test]
fn quality_change_reallocates_buffers_without_resetting_systems() {
    let log: Log = Rc::default();
    let mut engine = default_engine();
    engine.add_system(Box::new(Recorder {
        name: "recorder",
        log: log.clone(),
    }));
    assert_eq!(resizes(&log), vec!["recorder:resize:1440x900"]);

    engine.start(0.0);
    let mut now = 0.0;
    while engine.quality_tier() == QualityTier::High && now < 10_000.0 {
        now += 40.0;
        engine.tick(now);
    }
    assert_eq!(engine.quality_tier(), QualityTier::Medium);

    // buffers follow the new scale, the page size does not change
    assert_eq!(engine.canvas().backing, (1224, 765));
    assert!(engine.canvas().layers.values().all(|&s| s == (1224, 765)));
    assert_eq!(engine.canvas().display, (1440.0, 900.0));
    assert_eq!(engine.canvas().layers_created, 2);

    // no system was asked to rebuild its population
    assert_eq!(resizes(&log), vec!["recorder:resize:1440x900"]);
    assert_eq!(engine.population("stage-beams"), Some(11));

    // a real size change still reaches the systems
    engine.resize(Viewport::new(1280.0, 720.0, 1.0));
    assert_eq!(
        resizes(&log),
        vec!["recorder:resize:1440x900", "recorder:resize:1280x720"]
    );
    assert_eq!(engine.canvas().display, (1280.0, 720.0));
}
