/*
 *  display/factory.rs
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

use crate::config::{DisplayConfig, DriverKind};
use crate::display::drivers::pbm::PbmSink;
use crate::display::error::DisplayError;
use crate::display::traits::DisplaySink;
use log::info;

#[cfg(feature = "waveshare")]
use crate::display::drivers::epd7in5v2::Epd7in5V2Sink;

/// Type alias for boxed display sink trait objects
pub type BoxedSink = Box<dyn DisplaySink>;

/// Builds the configured display sink
pub struct DisplaySinkFactory;

impl DisplaySinkFactory {
    /// Create a display sink from configuration
    ///
    /// A panel driver that was not compiled in is a configuration error.
    pub fn create_from_config(config: &DisplayConfig) -> Result<BoxedSink, DisplayError> {
        let sink: BoxedSink = match config.driver() {
            DriverKind::Pbm => Box::new(PbmSink::new(config.output())),

            #[cfg(feature = "waveshare")]
            DriverKind::Waveshare7in5V2 => Box::new(Epd7in5V2Sink::new(&config.bus(), config.invert())?),

            #[cfg(not(feature = "waveshare"))]
            DriverKind::Waveshare7in5V2 => {
                return Err(DisplayError::InvalidConfiguration(
                    "waveshare7in5v2 driver not enabled. Enable with --features waveshare".to_string(),
                ));
            }
        };
        info!("Using {} display sink", sink.name());
        Ok(sink)
    }
}
