//! File handling and encoders shared by the desktop tools.

pub mod document;
pub mod encode;
pub mod error;
pub mod files;
pub mod render;
pub mod settings;

pub use document::Document;
pub use error::{Error, Result};

/// Logger setup shared by the binaries; `RUST_LOG` overrides the default.
pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}
