//! Packed-bit frame layouts.
//!
//! Frames scraped from firmware are plain byte arrays. How those bytes map
//! onto pixels depends on the display controller and on the tool that
//! generated the array, so every layout seen in the wild is kept here as its
//! own [`Packing`] variant. The layouts are not interchangeable.

use alloc::{vec, vec::Vec};
use core::{fmt, str::FromStr};
use embedded_graphics::pixelcolor::BinaryColor;

use crate::grid::PixelGrid;

/// Byte-to-pixel layout of a packed frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Packing {
    /// Pages of 8 rows, one byte per column, bit 7 is the top row.
    PageMsb,
    /// Pages of 8 rows, one byte per column, bit 0 is the top row.
    PageLsb,
    /// One byte per 8 horizontal pixels, bit 7 is the leftmost pixel.
    Horizontal,
    /// Columns stored one after another, bit 0 is the top row of each group.
    ColumnMajor,
    /// Page layout read through a bit-reversed byte.
    ///
    /// Reversing the byte and then taking bit 0 as the top row is the same as
    /// [`Packing::PageMsb`], so both render identically.
    PageReversed,
}

impl Packing {
    /// Every layout in the order the debug tool renders them.
    pub const ALL: [Packing; 5] = [
        Packing::PageMsb,
        Packing::PageLsb,
        Packing::Horizontal,
        Packing::ColumnMajor,
        Packing::PageReversed,
    ];

    pub fn repr(self) -> &'static str {
        match self {
            Packing::PageMsb => "page-msb",
            Packing::PageLsb => "page-lsb",
            Packing::Horizontal => "horizontal",
            Packing::ColumnMajor => "column-major",
            Packing::PageReversed => "page-reversed",
        }
    }

    /// Number of bytes a frame of the given size occupies in this layout.
    pub fn frame_len(self, width: u32, height: u32) -> usize {
        let (width, height) = (width as usize, height as usize);
        match self {
            Packing::PageMsb | Packing::PageLsb | Packing::PageReversed => (height / 8) * width,
            Packing::Horizontal => (width / 8) * height,
            Packing::ColumnMajor => width * (height / 8),
        }
    }

    /// Maps byte `index`, bit `bit` (0 = least significant) of the byte as
    /// seen by the layout to a pixel.
    fn position(self, width: u32, height: u32, index: usize, bit: u32) -> (u32, u32) {
        let index = index as u32;
        match self {
            Packing::PageMsb => (index % width, (index / width) * 8 + (7 - bit)),
            Packing::PageLsb | Packing::PageReversed => (index % width, (index / width) * 8 + bit),
            Packing::Horizontal => {
                let bytes_per_row = width / 8;
                ((index % bytes_per_row) * 8 + (7 - bit), index / bytes_per_row)
            }
            Packing::ColumnMajor => {
                let bytes_per_column = height / 8;
                (index / bytes_per_column, (index % bytes_per_column) * 8 + bit)
            }
        }
    }

    /// The byte as the layout reads it.
    fn view(self, byte: u8) -> u8 {
        match self {
            Packing::PageReversed => byte.reverse_bits(),
            _ => byte,
        }
    }
}

impl fmt::Display for Packing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.repr())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPacking;

impl fmt::Display for UnknownPacking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unknown packing, expected one of: ")?;
        for (i, packing) in Packing::ALL.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(packing.repr())?;
        }
        Ok(())
    }
}

impl core::error::Error for UnknownPacking {}

impl FromStr for Packing {
    type Err = UnknownPacking;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Packing::ALL
            .into_iter()
            .find(|packing| packing.repr().eq_ignore_ascii_case(s.trim()))
            .ok_or(UnknownPacking)
    }
}

/// Decodes `data` into a `width` x `height` grid.
///
/// Never fails: bytes past the end of `data` are treated as absent and leave
/// their pixels off, and bits that land outside the grid are dropped.
pub fn unpack(data: &[u8], width: u32, height: u32, packing: Packing) -> PixelGrid {
    let mut grid = PixelGrid::new(width, height);
    if width == 0 || height == 0 {
        return grid;
    }
    let len = packing.frame_len(width, height).min(data.len());
    for (index, &byte) in data[..len].iter().enumerate() {
        let byte = packing.view(byte);
        for bit in 0..8 {
            if (byte >> bit) & 1 == 0 {
                continue;
            }
            let (x, y) = packing.position(width, height, index, bit);
            if x < width && y < height {
                grid.set_pixel(x as i32, y as i32, BinaryColor::On);
            }
        }
    }
    grid
}

/// Encodes `grid` in the given layout; the inverse of [`unpack`].
pub fn pack(grid: &PixelGrid, packing: Packing) -> Vec<u8> {
    let (width, height) = (grid.width(), grid.height());
    let mut data = vec![0u8; packing.frame_len(width, height)];
    for (index, byte) in data.iter_mut().enumerate() {
        let mut seen = 0u8;
        for bit in 0..8 {
            let (x, y) = packing.position(width, height, index, bit);
            if grid.is_on(x, y) {
                seen |= 1 << bit;
            }
        }
        // `view` is its own inverse
        *byte = packing.view(seen);
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use embedded_graphics::{
        prelude::*,
        primitives::{Circle, Line, PrimitiveStyle, Rectangle},
    };

    fn sample(width: u32, height: u32) -> PixelGrid {
        let mut grid = PixelGrid::new(width, height);
        Circle::new(Point::new(3, 2), 9)
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
            .draw(&mut grid)
            .unwrap();
        Line::new(Point::new(0, 0), Point::new(width as i32 - 1, height as i32 - 1))
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
            .draw(&mut grid)
            .unwrap();
        Rectangle::new(Point::new(width as i32 - 4, 1), Size::new(3, 3))
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(&mut grid)
            .unwrap();
        grid
    }

    #[test]
    fn page_msb_top_bit_is_top_row() {
        // 8x8: one page, byte x covers column x
        let mut data = [0u8; 8];
        data[0] = 0b1000_0000;
        data[3] = 0b0000_0001;
        let grid = unpack(&data, 8, 8, Packing::PageMsb);
        assert!(grid.is_on(0, 0));
        assert!(grid.is_on(3, 7));
        assert_eq!(grid.count_on(), 2);
    }

    #[test]
    fn page_lsb_low_bit_is_top_row() {
        let mut data = [0u8; 8];
        data[0] = 0b0000_0001;
        data[3] = 0b1000_0000;
        let grid = unpack(&data, 8, 8, Packing::PageLsb);
        assert!(grid.is_on(0, 0));
        assert!(grid.is_on(3, 7));
        assert_eq!(grid.count_on(), 2);
    }

    #[test]
    fn page_second_page() {
        // 4 wide, 16 high: byte 4 is column 0 of page 1
        let mut data = [0u8; 8];
        data[5] = 0b1000_0000;
        let grid = unpack(&data, 4, 16, Packing::PageMsb);
        assert!(grid.is_on(1, 8));
        assert_eq!(grid.count_on(), 1);
    }

    #[test]
    fn horizontal_msb_is_leftmost() {
        // 16 wide: two bytes per row
        let data = [0b1000_0000, 0b0000_0001, 0, 0, 0b0100_0000, 0];
        let grid = unpack(&data, 16, 3, Packing::Horizontal);
        assert!(grid.is_on(0, 0));
        assert!(grid.is_on(15, 0));
        assert!(grid.is_on(1, 2));
        assert_eq!(grid.count_on(), 3);
    }

    #[test]
    fn column_major_groups_rows() {
        // 2 wide, 16 high: bytes 0,1 are column 0; bytes 2,3 column 1
        let data = [0b0000_0001, 0, 0, 0b1000_0000];
        let grid = unpack(&data, 2, 16, Packing::ColumnMajor);
        assert!(grid.is_on(0, 0));
        assert!(grid.is_on(1, 15));
        assert_eq!(grid.count_on(), 2);
    }

    #[test]
    fn conventions_disagree() {
        let data = [0x80, 0x01, 0x00, 0x3C, 0x00, 0x00, 0x00, 0x00];
        let page = unpack(&data, 8, 8, Packing::PageMsb);
        let horizontal = unpack(&data, 8, 8, Packing::Horizontal);
        let lsb = unpack(&data, 8, 8, Packing::PageLsb);
        assert_ne!(page, horizontal);
        assert_ne!(page, lsb);
    }

    #[test]
    fn reversed_page_matches_page_msb() {
        let data: Vec<u8> = (0..128u32).map(|i| (i * 37 % 251) as u8).collect();
        assert_eq!(
            unpack(&data, 32, 32, Packing::PageReversed),
            unpack(&data, 32, 32, Packing::PageMsb)
        );
    }

    #[test]
    fn full_frame_is_deterministic() {
        let data: Vec<u8> = (0..128u32).map(|i| (i * 73 % 256) as u8).collect();
        let first = unpack(&data, 32, 32, Packing::PageMsb);
        let second = unpack(&data, 32, 32, Packing::PageMsb);
        assert_eq!(first.iter().count(), 32 * 32);
        assert_eq!(first, second);
        let bits: usize = data.iter().map(|b| b.count_ones() as usize).sum();
        assert_eq!(first.count_on(), bits);
    }

    #[test]
    fn pack_unpack_round_trip() {
        let grid = sample(32, 32);
        assert!(grid.count_on() > 0);
        for packing in Packing::ALL {
            let data = pack(&grid, packing);
            assert_eq!(data.len(), 128, "{packing}");
            assert_eq!(unpack(&data, 32, 32, packing), grid, "{packing}");
        }
    }

    #[test]
    fn short_frame_leaves_rest_off() {
        let data = vec![0xFF; 10];
        for packing in Packing::ALL {
            let grid = unpack(&data, 32, 32, packing);
            assert_eq!(grid.count_on(), 80, "{packing}");
        }
        let grid = unpack(&data, 32, 32, Packing::PageMsb);
        assert!(grid.is_on(9, 7));
        assert!(!grid.is_on(10, 0));
        assert!(!grid.is_on(0, 8));
    }

    #[test]
    fn empty_and_oversized_input() {
        assert_eq!(unpack(&[], 32, 32, Packing::Horizontal).count_on(), 0);
        let data = vec![0xFF; 1000];
        assert_eq!(unpack(&data, 16, 16, Packing::Horizontal).count_on(), 256);
        assert_eq!(unpack(&data, 0, 16, Packing::PageMsb).count_on(), 0);
    }

    #[test]
    fn height_not_multiple_of_eight() {
        // only full pages are decoded, the trailing rows stay off
        let data = vec![0xFF; 64];
        let grid = unpack(&data, 8, 12, Packing::PageMsb);
        assert_eq!(grid.count_on(), 64);
        assert!(!grid.is_on(0, 8));
    }

    #[test]
    fn parse_packing() {
        assert_eq!("horizontal".parse::<Packing>(), Ok(Packing::Horizontal));
        assert_eq!(" Page-LSB ".parse::<Packing>(), Ok(Packing::PageLsb));
        assert_eq!("diagonal".parse::<Packing>(), Err(UnknownPacking));
        for packing in Packing::ALL {
            assert_eq!(packing.repr().parse::<Packing>(), Ok(packing));
        }
    }
}
