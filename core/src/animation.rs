use alloc::vec::Vec;
use core::fmt;

use embedded_graphics::prelude::Size;
use log::{debug, warn};

use crate::{
    composite::{CompositeError, Placement, composite},
    grid::PixelGrid,
    scrape::{DEFAULT_FRAME_DELAY, DEFAULT_FRAME_HEIGHT, DEFAULT_FRAME_WIDTH},
    unpack::{Packing, unpack},
};

/// One frame as it appears in the firmware, still packed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFrame {
    pub data: Vec<u8>,
    pub delay_ms: u32,
}

impl RawFrame {
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data,
            delay_ms: DEFAULT_FRAME_DELAY,
        }
    }

    pub fn with_delay(data: Vec<u8>, delay_ms: u32) -> Self {
        Self { data, delay_ms }
    }
}

/// How packed frames turn into display images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLayout {
    pub frame_size: Size,
    pub placement: Placement,
    pub packing: Packing,
}

impl Default for FrameLayout {
    fn default() -> Self {
        Self {
            frame_size: Size::new(DEFAULT_FRAME_WIDTH, DEFAULT_FRAME_HEIGHT),
            placement: Placement::default(),
            packing: Packing::Horizontal,
        }
    }
}

impl FrameLayout {
    pub fn expected_len(&self) -> usize {
        self.packing
            .frame_len(self.frame_size.width, self.frame_size.height)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationFrame {
    pub image: PixelGrid,
    pub delay_ms: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationError {
    Empty,
    Composite { frame: usize, error: CompositeError },
}

impl fmt::Display for AnimationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnimationError::Empty => f.write_str("animation has no frames"),
            AnimationError::Composite { frame, error } => write!(f, "frame {frame}: {error}"),
        }
    }
}

impl core::error::Error for AnimationError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            AnimationError::Composite { error, .. } => Some(error),
            AnimationError::Empty => None,
        }
    }
}

/// Display-sized frames ready for encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Animation {
    frames: Vec<AnimationFrame>,
    /// 0 loops forever.
    loop_count: u16,
}

impl Animation {
    pub fn new(frames: Vec<AnimationFrame>, loop_count: u16) -> Result<Self, AnimationError> {
        match frames.len() {
            0 => return Err(AnimationError::Empty),
            1 => warn!("Animation has a single frame"),
            _ => {}
        }
        Ok(Self { frames, loop_count })
    }

    /// Decodes and places every raw frame, keeping their order.
    pub fn compose(
        raw: &[RawFrame],
        layout: &FrameLayout,
        loop_count: u16,
    ) -> Result<Self, AnimationError> {
        if raw.is_empty() {
            return Err(AnimationError::Empty);
        }
        let expected = layout.expected_len();
        let frames = raw
            .iter()
            .enumerate()
            .map(|(index, frame)| -> Result<AnimationFrame, AnimationError> {
                if frame.data.len() != expected {
                    warn!("Frame {index} has {} bytes, expected {expected}", frame.data.len());
                }
                debug!("Composing frame {}/{}", index + 1, raw.len());
                let image = render_frame(&frame.data, layout)
                    .map_err(|error| AnimationError::Composite { frame: index, error })?;
                Ok(AnimationFrame {
                    image,
                    delay_ms: frame.delay_ms,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(frames, loop_count)
    }

    pub fn frames(&self) -> &[AnimationFrame] {
        &self.frames
    }

    pub fn loop_count(&self) -> u16 {
        self.loop_count
    }

    /// Canvas size shared by every frame.
    pub fn size(&self) -> Size {
        let first = &self.frames[0].image;
        Size::new(first.width(), first.height())
    }
}

/// Decodes one packed frame and places it on the display canvas.
pub fn render_frame(data: &[u8], layout: &FrameLayout) -> Result<PixelGrid, CompositeError> {
    let frame = unpack(
        data,
        layout.frame_size.width,
        layout.frame_size.height,
        layout.packing,
    );
    composite(&frame, &layout.placement)
}
