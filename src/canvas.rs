/*
 *  canvas.rs
 *
 *  wxpaper - weather on paper
 *	(c) 2020-26 Stuart Hunter
 *
 *	This program is free software: you can redistribute it and/or modify
 *	it under the terms of the GNU General Public License as published by
 *	the Free Software Foundation, either version 3 of the License, or
 *	(at your option) any later version.
 *
 *	This program is distributed in the hope that it will be useful,
 *	but WITHOUT ANY WARRANTY; without even the implied warranty of
 *	MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *	GNU General Public License for more details.
 *
 *	See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *	Public License.
 *
 */

use core::convert::Infallible;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

/// Panel width in pixels.
pub const CANVAS_WIDTH: u32 = 800;
/// Panel height in pixels.
pub const CANVAS_HEIGHT: u32 = 480;

/// 1-bit drawing surface. `BinaryColor::Off` is paper, `On` is ink.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    buf: Vec<BinaryColor>,
    w: usize,
    h: usize,
}

impl Canvas {
    /// A blank (all white) canvas.
    pub fn new(width: u32, height: u32) -> Self {
        let (w, h) = (width as usize, height as usize);
        Self {
            buf: vec![BinaryColor::Off; w * h],
            w,
            h,
        }
    }

    /// Blank canvas sized for the 7.5" panel.
    pub fn dashboard() -> Self {
        Self::new(CANVAS_WIDTH, CANVAS_HEIGHT)
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn height(&self) -> usize {
        self.h
    }

    pub fn as_slice(&self) -> &[BinaryColor] {
        &self.buf
    }

    #[inline]
    fn idx(&self, p: Point) -> Option<usize> {
        if p.x >= 0 && p.y >= 0 {
            let (x, y) = (p.x as usize, p.y as usize);
            if x < self.w && y < self.h {
                return Some(y * self.w + x);
            }
        }
        None
    }

    /// Colour at `p`, paper when out of bounds.
    pub fn pixel(&self, p: Point) -> BinaryColor {
        self.idx(p).map(|i| self.buf[i]).unwrap_or(BinaryColor::Off)
    }

    pub fn set_pixel(&mut self, p: Point, color: BinaryColor) {
        if let Some(i) = self.idx(p) {
            self.buf[i] = color;
        }
    }

    /// Number of inked pixels inside `area` (clipped to the canvas).
    pub fn ink_in(&self, area: &Rectangle) -> usize {
        area.points()
            .filter(|&p| self.pixel(p) == BinaryColor::On)
            .count()
    }

    pub fn ink_count(&self) -> usize {
        self.buf.iter().filter(|c| c.is_on()).count()
    }

    /// Bytes per packed row; rows are padded to a whole byte.
    pub fn row_stride(&self) -> usize {
        self.w.div_ceil(8)
    }

    /// Pack rows MSB first, 8 pixels per byte.
    ///
    /// A set bit is white paper. `invert` flips that for panels that want
    /// set bits as ink.
    pub fn to_packed_bytes(&self, invert: bool) -> Vec<u8> {
        let stride = self.row_stride();
        let mut bytes = vec![0u8; stride * self.h];
        for (y, row) in self.buf.chunks(self.w.max(1)).enumerate() {
            for (x, &pixel) in row.iter().enumerate() {
                let white = pixel.is_off();
                if white != invert {
                    bytes[y * stride + x / 8] |= 0x80 >> (x % 8);
                }
            }
        }
        bytes
    }
}

impl OriginDimensions for Canvas {
    fn size(&self) -> Size {
        Size::new(self.w as u32, self.h as u32)
    }
}

impl DrawTarget for Canvas {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(p, c) in pixels {
            self.set_pixel(p, c);
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.buf.fill(color);
        Ok(())
    }
}
