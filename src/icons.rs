/*
 *  icons.rs
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

use std::path::{Path, PathBuf};

use embedded_graphics::image::{Image, ImageRaw};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use log::{debug, warn};
use tiny_skia::{Color, FilterQuality, Pixmap, PixmapPaint, Transform};

use crate::canvas::Canvas;
use crate::error::RenderError;

/// Luminance below this becomes ink.
const LUMA_THRESHOLD: f32 = 128.0;

/// An icon scaled and thresholded to 1 bit, packed MSB first (set = ink).
#[derive(Debug, Clone, PartialEq)]
pub struct IconImage {
    width: u32,
    height: u32,
    bits: Vec<u8>,
}

impl IconImage {
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Paste at `origin`, overwriting the covered area (white included).
    pub fn draw(&self, canvas: &mut Canvas, origin: Point) {
        let raw = ImageRaw::<BinaryColor>::new(&self.bits, self.width);
        let _ = Image::new(&raw, origin).draw(canvas);
    }

    /// Decode a PNG and fit it to `size`.
    pub fn load(path: &Path, size: Size) -> Result<Self, RenderError> {
        let decode_err = |reason: String| RenderError::IconDecode {
            path: path.display().to_string(),
            reason,
        };
        let source = Pixmap::load_png(path).map_err(|e| decode_err(e.to_string()))?;
        let mut scaled = Pixmap::new(size.width, size.height)
            .ok_or_else(|| decode_err(format!("cannot allocate {}x{} pixmap", size.width, size.height)))?;
        scaled.fill(Color::WHITE);

        let transform = Transform::from_scale(
            size.width as f32 / source.width() as f32,
            size.height as f32 / source.height() as f32,
        );
        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..PixmapPaint::default()
        };
        scaled.draw_pixmap(0, 0, source.as_ref(), &paint, transform, None);

        let stride = size.width.div_ceil(8) as usize;
        let mut bits = vec![0u8; stride * size.height as usize];
        scaled
            .pixels()
            .chunks(size.width as usize)
            .enumerate()
            .for_each(|(y, row)| {
                row.iter().enumerate().for_each(|(x, p)| {
                    // composited over opaque white, so premultiplied == straight
                    let luminance = 0.299 * p.red() as f32 + 0.587 * p.green() as f32 + 0.114 * p.blue() as f32;
                    if luminance < LUMA_THRESHOLD {
                        bits[y * stride + x / 8] |= 0x80 >> (x % 8);
                    }
                });
            });

        debug!("Icon {} scaled to {}x{}", path.display(), size.width, size.height);
        Ok(Self {
            width: size.width,
            height: size.height,
            bits,
        })
    }
}

/// Directory of `<name>.png` icon files.
#[derive(Debug, Clone)]
pub struct IconStore {
    dir: PathBuf,
}

impl IconStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, code: &str) -> PathBuf {
        self.dir.join(format!("{}.png", code))
    }

    /// Icon for a feed icon code. A missing file is `Ok(None)`; a file
    /// that exists but will not decode is an error.
    pub fn lookup_icon(&self, code: &str, size: Size) -> Result<Option<IconImage>, RenderError> {
        let path = self.path_for(code);
        if !path.is_file() {
            debug!("No icon for code {:?} at {}", code, path.display());
            return Ok(None);
        }
        IconImage::load(&path, size).map(Some)
    }

    /// A bundled icon file (wind, humidity, sunrise, sunset). Missing is an error.
    pub fn load_asset(&self, file_name: &str, size: Size) -> Result<IconImage, RenderError> {
        let path = self.dir.join(file_name);
        if !path.is_file() {
            warn!("Bundled icon {} is missing", path.display());
            return Err(RenderError::MissingAsset(path.display().to_string()));
        }
        IconImage::load(&path, size)
    }
}
