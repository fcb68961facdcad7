use std::{borrow::Cow, io::Write};

use embedded_graphics::prelude::Size;
use gif::{DisposalMethod, Encoder, Frame, Repeat};
use log::{debug, info, warn};

use oledgif_core::animation::Animation;

use crate::{
    Error, Result,
    render::{to_luma, upscale},
};

/// Index 0 is off, index 1 is on.
pub const PALETTE: [u8; 6] = [0, 0, 0, 255, 255, 255];

fn gif_size(size: Size, scale: u32) -> Option<(u16, u16)> {
    let width = size.width.checked_mul(scale)?;
    let height = size.height.checked_mul(scale)?;
    Some((u16::try_from(width).ok()?, u16::try_from(height).ok()?))
}

/// GIF delays are in hundredths of a second.
fn centiseconds(delay_ms: u32) -> u16 {
    u16::try_from(delay_ms / 10).unwrap_or(u16::MAX)
}

fn repeat(loop_count: u16) -> Repeat {
    match loop_count {
        0 => Repeat::Infinite,
        n => Repeat::Finite(n),
    }
}

/// Writes `animation` as a two-colour GIF, upscaled `scale` times.
///
/// A scale that would exceed the GIF size limit falls back to the unscaled
/// canvas.
pub fn encode_gif<W: Write>(animation: &Animation, scale: u32, writer: W) -> Result<()> {
    let size = animation.size();
    let too_large = Error::Scale {
        width: size.width,
        height: size.height,
        scale: 1,
    };
    let (scale, (width, height)) = match gif_size(size, scale.max(1)) {
        Some(dims) => (scale.max(1), dims),
        None => {
            warn!(
                "Cannot scale {}x{} by {scale}, writing unscaled frames",
                size.width, size.height
            );
            (1, gif_size(size, 1).ok_or(too_large)?)
        }
    };
    info!(
        "Encoding {} frames at {width}x{height}",
        animation.frames().len()
    );

    let mut encoder = Encoder::new(writer, width, height, &PALETTE)?;
    encoder.set_repeat(repeat(animation.loop_count()))?;
    for (index, frame) in animation.frames().iter().enumerate() {
        let indices = upscale(&to_luma(&frame.image), scale)?
            .into_raw()
            .into_iter()
            .map(|luma| u8::from(luma >= 128))
            .collect::<Vec<_>>();
        debug!("Frame {index}: {} ms", frame.delay_ms);
        encoder.write_frame(&Frame {
            width,
            height,
            buffer: Cow::Owned(indices),
            delay: centiseconds(frame.delay_ms),
            dispose: DisposalMethod::Background,
            ..Frame::default()
        })?;
    }
    encoder.into_inner()?;
    Ok(())
}
