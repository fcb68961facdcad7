use core::fmt;

use embedded_graphics::prelude::{Point, Size};

use crate::grid::PixelGrid;

/// Where a decoded frame sits on the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub canvas: Size,
    pub offset: Point,
}

impl Placement {
    pub const fn new(canvas: Size, offset: Point) -> Self {
        Self { canvas, offset }
    }
}

impl Default for Placement {
    /// A 32x32 frame centered on a 128x64 panel.
    fn default() -> Self {
        Self::new(Size::new(128, 64), Point::new(48, 16))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositeError {
    NegativeOffset { offset: Point },
    /// The frame does not fit on the canvas at the requested offset.
    OutOfBounds { frame: Size, offset: Point, canvas: Size },
}

impl fmt::Display for CompositeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompositeError::NegativeOffset { offset } => {
                write!(f, "negative frame offset ({}, {})", offset.x, offset.y)
            }
            CompositeError::OutOfBounds {
                frame,
                offset,
                canvas,
            } => write!(
                f,
                "{}x{} frame at ({}, {}) does not fit on a {}x{} canvas",
                frame.width, frame.height, offset.x, offset.y, canvas.width, canvas.height
            ),
        }
    }
}

impl core::error::Error for CompositeError {}

/// Copies `frame` onto a blank canvas at the placement offset.
pub fn composite(frame: &PixelGrid, placement: &Placement) -> Result<PixelGrid, CompositeError> {
    let Placement { canvas, offset } = *placement;
    if offset.x < 0 || offset.y < 0 {
        return Err(CompositeError::NegativeOffset { offset });
    }
    let right = offset.x as u64 + frame.width() as u64;
    let bottom = offset.y as u64 + frame.height() as u64;
    if right > canvas.width as u64 || bottom > canvas.height as u64 {
        return Err(CompositeError::OutOfBounds {
            frame: Size::new(frame.width(), frame.height()),
            offset,
            canvas,
        });
    }

    let mut out = PixelGrid::new(canvas.width, canvas.height);
    for y in 0..frame.height() {
        for x in 0..frame.width() {
            out.set_pixel(offset.x + x as i32, offset.y + y as i32, frame.pixel(x, y));
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unpack::{Packing, unpack};
    use alloc::vec::Vec;
    use embedded_graphics::{
        pixelcolor::BinaryColor,
        prelude::*,
        primitives::{PrimitiveStyle, Triangle},
    };

    #[test]
    fn pasted_region_matches_source() {
        let data: Vec<u8> = (0..128u32).map(|i| (i * 29 % 256) as u8).collect();
        let frame = unpack(&data, 32, 32, Packing::Horizontal);
        let canvas = composite(&frame, &Placement::default()).unwrap();

        assert_eq!(canvas.size(), Size::new(128, 64));
        assert_eq!(canvas.count_on(), frame.count_on());
        for y in 0..64 {
            for x in 0..128 {
                let inside = (48..80).contains(&x) && (16..48).contains(&y);
                if inside {
                    assert_eq!(canvas.pixel(x, y), frame.pixel(x - 48, y - 16));
                } else {
                    assert!(!canvas.is_on(x, y), "({x}, {y}) should be off");
                }
            }
        }
    }

    #[test]
    fn drawn_shape_is_translated() {
        let mut frame = PixelGrid::new(10, 10);
        Triangle::new(Point::new(0, 0), Point::new(9, 0), Point::new(0, 9))
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(&mut frame)
            .unwrap();
        let placement = Placement::new(Size::new(20, 20), Point::new(10, 10));
        let canvas = composite(&frame, &placement).unwrap();
        assert!(canvas.is_on(10, 10));
        assert!(!canvas.is_on(0, 0));
        assert_eq!(canvas.count_on(), frame.count_on());
    }

    #[test]
    fn frame_filling_canvas() {
        let frame = unpack(&[0xFF; 8], 8, 8, Packing::PageMsb);
        let placement = Placement::new(Size::new(8, 8), Point::zero());
        assert_eq!(composite(&frame, &placement).unwrap(), frame);
    }

    #[test]
    fn negative_offset_is_rejected() {
        let frame = PixelGrid::new(4, 4);
        let placement = Placement::new(Size::new(16, 16), Point::new(-1, 2));
        assert_eq!(
            composite(&frame, &placement),
            Err(CompositeError::NegativeOffset {
                offset: Point::new(-1, 2)
            })
        );
    }

    #[test]
    fn overflow_is_rejected() {
        let frame = PixelGrid::new(32, 32);
        let placement = Placement::new(Size::new(128, 64), Point::new(100, 16));
        assert!(matches!(
            composite(&frame, &placement),
            Err(CompositeError::OutOfBounds { .. })
        ));
        let placement = Placement::new(Size::new(128, 64), Point::new(0, 33));
        assert!(composite(&frame, &placement).is_err());
    }
}
