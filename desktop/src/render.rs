use std::path::{Path, PathBuf};

use image::{
    ExtendedColorType, GrayImage, ImageEncoder, Luma,
    codecs::png::PngEncoder,
    imageops::{self, FilterType},
};
use log::{debug, info, warn};

use oledgif_core::grid::PixelGrid;

use crate::{Error, Result, files};

/// Largest side an upscaled image may have, the same limit GIF frames have.
pub const MAX_SCALED_SIDE: u32 = u16::MAX as u32;

/// Black for off, white for on.
pub fn to_luma(grid: &PixelGrid) -> GrayImage {
    GrayImage::from_fn(grid.width(), grid.height(), |x, y| {
        Luma([if grid.is_on(x, y) { 255 } else { 0 }])
    })
}

/// Nearest-neighbour upscale by a whole factor.
pub fn upscale(image: &GrayImage, scale: u32) -> Result<GrayImage> {
    if scale <= 1 {
        return Ok(image.clone());
    }
    let too_large = || Error::Scale {
        width: image.width(),
        height: image.height(),
        scale,
    };
    let scaled = |side: u32| {
        side.checked_mul(scale)
            .filter(|&side| side <= MAX_SCALED_SIDE)
            .ok_or_else(too_large)
    };
    let (width, height) = (scaled(image.width())?, scaled(image.height())?);
    Ok(imageops::resize(image, width, height, FilterType::Nearest))
}

pub fn save_png(image: &GrayImage, path: &Path) -> Result<()> {
    debug!(
        "Saving {}x{} PNG to {}",
        image.width(),
        image.height(),
        path.display()
    );
    files::write_atomic(path, |w| {
        PngEncoder::new(w).write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::L8,
        )?;
        Ok(())
    })
}

/// Writes `preview_frame_<index>.png` and its upscaled copy into `dir`.
///
/// A scale too large for an image only skips the upscaled copy.
pub fn save_preview(image: &GrayImage, dir: &Path, index: usize, scale: u32) -> Result<PathBuf> {
    let path = dir.join(format!("preview_frame_{index}.png"));
    save_png(image, &path)?;
    info!("Wrote {}", path.display());

    let scaled_path = dir.join(format!("preview_frame_{index}_scaled.png"));
    match upscale(image, scale) {
        Ok(scaled) => {
            save_png(&scaled, &scaled_path)?;
            info!("Wrote {}", scaled_path.display());
        }
        Err(e) => warn!("Skipping {}: {e}", scaled_path.display()),
    }
    Ok(path)
}
