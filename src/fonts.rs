/*
 *  fonts.rs
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
//! Sized text faces.
//!
//! An outline font is loaded once and rasterized per point size. All text is
//! anchored at its top-left corner and thresholded to pure ink.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use embedded_graphics::mono_font::{MonoFont, MonoTextStyle, iso_8859_1};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};
use fontdue::{Font, FontSettings};
use log::info;

use crate::canvas::Canvas;
use crate::error::RenderError;

/// Point sizes the dashboard draws with.
pub const DASHBOARD_SIZES: [u32; 5] = [18, 20, 22, 30, 80];

/// Anti-aliased coverage at or above this is ink.
const INK_THRESHOLD: u8 = 128;

#[derive(Clone)]
pub enum Face {
    Outline { font: Arc<Font>, px: f32 },
    Builtin(&'static MonoFont<'static>),
}

impl std::fmt::Debug for Face {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Face::Outline { px, .. } => write!(f, "Face::Outline({}px)", px),
            Face::Builtin(font) => write!(f, "Face::Builtin({}x{})", font.character_size.width, font.character_size.height),
        }
    }
}

impl Face {
    /// Advance width of `text` in pixels.
    pub fn text_width(&self, text: &str) -> u32 {
        match self {
            Face::Outline { font, px } => {
                let (_, advance) = pen_positions(font, *px, text);
                advance.round().max(0.0) as u32
            }
            Face::Builtin(font) => {
                let n = text.chars().count() as u32;
                if n == 0 {
                    0
                } else {
                    n * font.character_size.width + (n - 1) * font.character_spacing
                }
            }
        }
    }

    /// Horizontal ink extent `(left, right)` of `text` relative to the draw
    /// origin, right exclusive. Side bearings are not counted for outline
    /// faces; a mono face covers its whole cells.
    pub fn ink_span(&self, text: &str) -> (i32, i32) {
        match self {
            Face::Outline { font, px } => {
                let (glyphs, _) = pen_positions(font, *px, text);
                glyphs
                    .iter()
                    .filter_map(|&(ch, pen)| {
                        let m = font.metrics(ch, *px);
                        (m.width > 0).then(|| {
                            let left = pen.round() as i32 + m.xmin;
                            (left, left + m.width as i32)
                        })
                    })
                    .reduce(|(l0, r0), (l1, r1)| (l0.min(l1), r0.max(r1)))
                    .unwrap_or((0, 0))
            }
            Face::Builtin(_) => (0, self.text_width(text) as i32),
        }
    }

    /// Draw `text` with its top-left corner at `origin`.
    pub fn draw(&self, canvas: &mut Canvas, text: &str, origin: Point, color: BinaryColor) {
        match self {
            Face::Outline { font, px } => draw_outline(font, *px, canvas, text, origin, color),
            Face::Builtin(font) => {
                let style = MonoTextStyle::new(*font, color);
                let _ = Text::with_baseline(text, origin, style, Baseline::Top).draw(canvas);
            }
        }
    }
}

/// Pen x of every glyph relative to the origin, kerning applied, and the
/// total advance.
fn pen_positions(font: &Font, px: f32, text: &str) -> (Vec<(char, f32)>, f32) {
    let mut pen = 0.0f32;
    let mut prev: Option<char> = None;
    let mut glyphs = Vec::with_capacity(text.len());
    for ch in text.chars() {
        if let Some(left) = prev {
            pen += font.horizontal_kern(left, ch, px).unwrap_or(0.0);
        }
        glyphs.push((ch, pen));
        pen += font.metrics(ch, px).advance_width;
        prev = Some(ch);
    }
    (glyphs, pen)
}

fn draw_outline(font: &Font, px: f32, canvas: &mut Canvas, text: &str, origin: Point, color: BinaryColor) {
    let ascent = font
        .horizontal_line_metrics(px)
        .map(|m| m.ascent)
        .unwrap_or(px);
    let baseline = origin.y + ascent.round() as i32;
    let (glyphs, _) = pen_positions(font, px, text);

    for (ch, pen) in glyphs {
        let (metrics, coverage) = font.rasterize(ch, px);
        if metrics.width == 0 {
            continue;
        }
        let gx = origin.x + pen.round() as i32 + metrics.xmin;
        let gy = baseline - (metrics.ymin + metrics.height as i32);
        for (row, line) in coverage.chunks(metrics.width).enumerate() {
            for (col, &alpha) in line.iter().enumerate() {
                if alpha >= INK_THRESHOLD {
                    canvas.set_pixel(Point::new(gx + col as i32, gy + row as i32), color);
                }
            }
        }
    }
}

/// Faces keyed by point size.
#[derive(Debug, Clone, Default)]
pub struct FontTable {
    faces: HashMap<u32, Face>,
}

impl FontTable {
    /// Load the outline font at `path` and size it for each of `sizes`.
    pub fn load(path: &Path, sizes: &[u32]) -> Result<Self, RenderError> {
        let data = std::fs::read(path).map_err(|source| RenderError::FontRead {
            path: path.display().to_string(),
            source,
        })?;
        let font = Font::from_bytes(data.as_slice(), FontSettings::default()).map_err(|reason| {
            RenderError::FontParse {
                path: path.display().to_string(),
                reason: reason.to_string(),
            }
        })?;
        let font = Arc::new(font);
        let faces = sizes
            .iter()
            .map(|&size| {
                (
                    size,
                    Face::Outline {
                        font: Arc::clone(&font),
                        px: size as f32,
                    },
                )
            })
            .collect();
        info!("Loaded font {} at sizes {:?}", path.display(), sizes);
        Ok(Self { faces })
    }

    /// Bitmap faces standing in for the outline font, for previews and tests.
    pub fn builtin() -> Self {
        let faces = DASHBOARD_SIZES
            .iter()
            .map(|&size| {
                let font: &'static MonoFont<'static> = if size <= 18 {
                    &iso_8859_1::FONT_9X18
                } else {
                    &iso_8859_1::FONT_10X20
                };
                (size, Face::Builtin(font))
            })
            .collect();
        Self { faces }
    }

    pub fn face(&self, size: u32) -> Result<&Face, RenderError> {
        self.faces.get(&size).ok_or(RenderError::MissingFace(size))
    }
}
