use embedded_graphics::prelude::{Point, Size};
use log::debug;

use oledgif_core::{animation::FrameLayout, composite::Placement, unpack::Packing};

use crate::document::Metadata;

/// Layout values given on the command line.
///
/// Each field wins over the document metadata, which in turn wins over the
/// built-in defaults.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LayoutOverrides {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub frame_width: Option<u32>,
    pub frame_height: Option<u32>,
    pub x_offset: Option<i32>,
    pub y_offset: Option<i32>,
}

impl LayoutOverrides {
    pub fn resolve(&self, metadata: &Metadata, packing: Packing) -> FrameLayout {
        let defaults = FrameLayout::default();
        let pick =
            |flag: Option<u32>, meta: Option<u32>, default: u32| flag.or(meta).unwrap_or(default);

        let canvas = defaults.placement.canvas;
        let canvas = Size::new(
            pick(self.width, metadata.display_width, canvas.width),
            pick(self.height, metadata.display_height, canvas.height),
        );
        let frame = defaults.frame_size;
        let frame_size = Size::new(
            pick(self.frame_width, metadata.frame_width, frame.width),
            pick(self.frame_height, metadata.frame_height, frame.height),
        );
        let offset = Point::new(
            self.x_offset.unwrap_or(defaults.placement.offset.x),
            self.y_offset.unwrap_or(defaults.placement.offset.y),
        );

        let layout = FrameLayout {
            frame_size,
            placement: Placement::new(canvas, offset),
            packing,
        };
        debug!("Resolved layout {layout:?}");
        layout
    }
}
