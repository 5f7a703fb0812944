use crate::canvas::LayerId;

/// Failures the engine can surface to its host.
///
/// Everything else (slow frames, reduced motion, touch input) is handled as
/// policy and never becomes an error.
#[derive(Debug, thiserror::Error)]
pub enum BackdropError {
    #[error("2D drawing context not available")]
    ContextUnavailable,
    #[error("offscreen layer {width}x{height} could not be allocated")]
    LayerUnavailable { width: u32, height: u32 },
    #[error("unknown offscreen layer {0:?}")]
    UnknownLayer(LayerId),
}
