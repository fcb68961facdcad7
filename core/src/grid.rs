use alloc::{vec, vec::Vec};
use embedded_graphics::{
    Pixel,
    pixelcolor::BinaryColor,
    prelude::{DrawTarget, OriginDimensions, Size},
};

/// A monochrome image, packed row-major with the most significant bit first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl PixelGrid {
    /// Creates a grid with every pixel off.
    pub fn new(width: u32, height: u32) -> Self {
        let len = (width as usize * height as usize).div_ceil(8);
        Self {
            width,
            height,
            pixels: vec![0; len],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> BinaryColor {
        if self.is_on(x, y) {
            BinaryColor::On
        } else {
            BinaryColor::Off
        }
    }

    pub fn is_on(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let (byte_index, bit_index) = self.locate(x, y);
        (self.pixels[byte_index] >> bit_index) & 1 == 1
    }

    /// Number of pixels that are on.
    pub fn count_on(&self) -> usize {
        self.pixels.iter().map(|b| b.count_ones() as usize).sum()
    }

    /// Row-major iterator over every pixel, top-left first.
    pub fn iter(&self) -> impl Iterator<Item = BinaryColor> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| self.pixel(x, y)))
    }

    pub(crate) fn set_pixel(&mut self, x: i32, y: i32, color: BinaryColor) {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return;
        }
        let (byte_index, bit_index) = self.locate(x as u32, y as u32);
        match color {
            BinaryColor::On => self.pixels[byte_index] |= 1 << bit_index,
            BinaryColor::Off => self.pixels[byte_index] &= !(1 << bit_index),
        }
    }

    fn locate(&self, x: u32, y: u32) -> (usize, u32) {
        let index = y as usize * self.width as usize + x as usize;
        (index / 8, 7 - (index % 8) as u32)
    }
}

impl OriginDimensions for PixelGrid {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for PixelGrid {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            self.set_pixel(coord.x, coord.y, color);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::{
        prelude::*,
        primitives::{PrimitiveStyle, Rectangle},
    };

    #[test]
    fn new_grid_is_blank() {
        let grid = PixelGrid::new(13, 7);
        assert_eq!(grid.size(), Size::new(13, 7));
        assert_eq!(grid.count_on(), 0);
        assert_eq!(grid.iter().count(), 13 * 7);
    }

    #[test]
    fn draw_rectangle() {
        let mut grid = PixelGrid::new(16, 16);
        Rectangle::new(Point::new(2, 3), Size::new(4, 5))
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(&mut grid)
            .unwrap();

        assert_eq!(grid.count_on(), 20);
        assert!(grid.is_on(2, 3));
        assert!(grid.is_on(5, 7));
        assert!(!grid.is_on(6, 7));
        assert!(!grid.is_on(2, 8));
    }

    #[test]
    fn out_of_range_is_off_and_ignored() {
        let mut grid = PixelGrid::new(8, 8);
        grid.set_pixel(-1, 0, BinaryColor::On);
        grid.set_pixel(8, 0, BinaryColor::On);
        grid.set_pixel(0, 8, BinaryColor::On);
        assert_eq!(grid.count_on(), 0);
        assert_eq!(grid.pixel(100, 100), BinaryColor::Off);
    }

    #[test]
    fn pixels_can_be_cleared() {
        let mut grid = PixelGrid::new(3, 3);
        grid.set_pixel(1, 1, BinaryColor::On);
        assert!(grid.is_on(1, 1));
        grid.set_pixel(1, 1, BinaryColor::Off);
        assert!(!grid.is_on(1, 1));
    }
}
