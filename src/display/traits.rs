/*
 *  display/traits.rs
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

use crate::canvas::{CANVAS_HEIGHT, CANVAS_WIDTH, Canvas};
use crate::display::error::DisplayError;

/// Anything that can show a finished dashboard.
///
/// One call is one complete refresh; there is no partial update.
pub trait DisplaySink {
    /// Short name used in log lines
    fn name(&self) -> &'static str;

    /// Panel size as (width, height)
    fn dimensions(&self) -> (u32, u32) {
        (CANVAS_WIDTH, CANVAS_HEIGHT)
    }

    /// Push `canvas` to the panel
    fn display(&mut self, canvas: &Canvas) -> Result<(), DisplayError>;

    /// Reject a canvas that does not fit the panel exactly
    fn check_size(&self, canvas: &Canvas) -> Result<(), DisplayError> {
        let actual = (canvas.width() as u32, canvas.height() as u32);
        let expected = self.dimensions();
        if actual != expected {
            return Err(DisplayError::SizeMismatch { expected, actual });
        }
        Ok(())
    }
}
