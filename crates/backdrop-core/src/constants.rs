// Tuning constants for the backdrop engine.
//
// Velocities and angular velocities are expressed per reference frame
// (1/60 s) and scaled by `dt * REFERENCE_FPS` when integrating.

pub const REFERENCE_FPS: f32 = 60.0;

// Frame clock
pub const MAX_FRAME_DT_SEC: f32 = 0.05; // cap after stalls / tab switches

// Configuration ranges
pub const INTENSITY_MIN: f32 = 0.5;
pub const INTENSITY_MAX: f32 = 2.0;
pub const DEFAULT_INTENSITY: f32 = 1.15;
pub const DEFAULT_DPR_CAP: f32 = 2.0;
pub const DPR_CAP_MAX: f32 = 3.0;

// Beams
pub const BEAMS_PER_INTENSITY: f32 = 10.0;
pub const BEAMS_MIN: f32 = 8.0;
pub const BEAMS_MAX: f32 = 18.0;
pub const BEAM_DRIFT_PX_PER_SEC: f32 = 120.0;
pub const BEAM_PULSE_RATE: f32 = 2.2;
pub const POWER_LINE_RATE: f32 = 1.15;

// Shards
pub const SHARDS_PER_INTENSITY: f32 = 78.0;
pub const SHARDS_MIN: f32 = 55.0;
pub const SHARDS_INITIAL_MAX: f32 = 130.0;
pub const SHARDS_TARGET_MAX: f32 = 150.0;
pub const SHARD_OVERFLOW: usize = 80; // hard cap = target + overflow
pub const SHARD_BOUNDS_MARGIN: f32 = 260.0;
pub const SHARD_EDGE_OFFSET: f32 = 120.0;
pub const SHARD_EDGE_SPAWN_CHANCE: f32 = 0.65;
pub const SHARD_DAMPING_PER_FRAME: f32 = 0.995;
pub const SHARD_VIOLET_CHANCE: f32 = 0.18;
pub const SHARD_VIOLET_HUE_SHIFT: f32 = 38.0;

// Burst triggers
pub const POINTER_BURST_SPEED: f32 = 24.0; // |vx| + |vy|, px per reference frame
pub const POINTER_BURST_CHANCE: f32 = 0.12; // scaled by intensity
pub const POINTER_BURST_SIZE: usize = 2;
pub const GLITCH_BURST_CHANCE: f32 = 0.02; // scaled by intensity
pub const GLITCH_BURST_SIZE: usize = 6;

// Pointer smoothing (fraction of the gap left after one reference frame)
pub const POINTER_FOLLOW_RETAIN: f32 = 0.78;
pub const POINTER_VELOCITY_RETAIN: f32 = 0.8;

// Cursor trail
pub const TRAIL_CAPACITY: usize = 24;
pub const TRAIL_FADE_SEC: f32 = 0.45;
pub const TRAIL_BASE_RADIUS: f32 = 22.0;
pub const TRAIL_SPEED_RADIUS: f32 = 1.6;
pub const TRAIL_MIN_STEP: f32 = 0.5; // px; a resting pointer adds no points

// Bloom
pub const DEFAULT_BLOOM_STRENGTH: f32 = 0.95; // multiplied by intensity
pub const BLOOM_STRENGTH_MAX: f32 = 2.0;
pub const DEFAULT_BLOOM_RADIUS: f32 = 12.0;
pub const BLOOM_RADIUS_MIN: f32 = 6.0;
pub const BLOOM_RADIUS_MAX: f32 = 26.0;

// Vignette
pub const DEFAULT_VIGNETTE_STRENGTH: f32 = 0.78;

// Adaptive quality
pub const QUALITY_TIERS: [f32; 3] = [1.0, 0.85, 0.7];
pub const FPS_EMA_RETAIN: f32 = 0.92;
pub const FPS_INITIAL: f32 = 60.0;
pub const FPS_LOW: f32 = 48.0;
pub const FPS_HIGH: f32 = 57.0;
pub const QUALITY_EVAL_INTERVAL_SEC: f32 = 0.5;
pub const QUALITY_HOLD_EVALS: u32 = 2;
