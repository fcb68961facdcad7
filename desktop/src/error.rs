use std::path::PathBuf;

use oledgif_core::{animation::AnimationError, composite::CompositeError, scrape::ScrapeError};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Malformed frame JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No valid frame data found in input file")]
    NoFrames,

    #[error("Frame {index} not available (only {count} frames)")]
    FrameOutOfRange { index: usize, count: usize },

    #[error("{width}x{height} scaled by {scale} does not fit in an image")]
    Scale { width: u32, height: u32, scale: u32 },

    #[error(transparent)]
    Scrape(#[from] ScrapeError),

    #[error(transparent)]
    Composite(#[from] CompositeError),

    #[error(transparent)]
    Animation(#[from] AnimationError),

    #[error("GIF encoding failed: {0}")]
    Gif(#[from] gif::EncodingError),

    #[error("Image encoding failed: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = core::result::Result<T, Error>;
