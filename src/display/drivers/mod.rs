/*
 *  display/drivers/mod.rs
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

// Image file output, always available
pub mod pbm;

// Waveshare 7.5" V2 over SPI
#[cfg(feature = "waveshare")]
pub mod epd7in5v2;

// Mock sink for testing
#[cfg(test)]
pub mod mock;
