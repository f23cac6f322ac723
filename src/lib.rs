/*
 *  lib.rs
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
//! Weather dashboard for 800x480 e-paper panels.
//!
//! Pulls a citypage weather XML document, logs the readings to CSV and
//! draws a one-bit dashboard for a PBM file or a Waveshare 7.5" V2 panel.

pub mod canvas;
pub mod citypage;
pub mod config;
pub mod display;
pub mod error;
pub mod feed;
pub mod fonts;
pub mod history;
pub mod icons;
pub mod localtime;
pub mod logging;
pub mod pipeline;
pub mod render;
pub mod weather;

pub use canvas::Canvas;
pub use error::DashboardError;
pub use render::RenderContext;
pub use weather::WeatherReport;
