pub mod canvas;
pub mod clock;
pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod passes;
pub mod pointer;
pub mod quality;
pub mod surface;
pub mod systems;

pub use canvas::*;
pub use clock::{FrameClock, Lifecycle};
pub use config::*;
pub use engine::{Engine, FrameStatus};
pub use error::BackdropError;
pub use passes::{Bloom, Pass, Vignette};
pub use pointer::{PointerFeed, PointerSample};
pub use quality::{QualityChange, QualityController, QualityTier};
pub use surface::{Surface, Viewport};
pub use systems::{CursorTrail, FrameContext, Shards, StageBeams, System};
