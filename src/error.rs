/// Errors that abort a navigation build
///
/// Per-region and per-waypoint failures are never reported here; they are
/// counted in [`crate::pipeline::PipelineReport`] instead.
#[derive(Debug, thiserror::Error)]
pub enum NavError {
    #[error("water mask is empty ({width}x{height})")]
    EmptyMask { width: usize, height: usize },

    #[error("mask size mismatch: expected {expected} cells, got {actual}")]
    MaskSize { expected: usize, actual: usize },

    #[error("region {index} has a vertex outside the {width}x{height} mask")]
    RegionOutOfBounds {
        index: usize,
        width: usize,
        height: usize,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NavError>;
