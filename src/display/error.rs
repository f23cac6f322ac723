/*
 *  display/error.rs
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

use std::error::Error;
use std::fmt;

/// Unified error type for all display sinks
#[derive(Debug)]
pub enum DisplayError {
    /// Panel initialization failed
    InitializationFailed(String),

    /// SPI communication error
    SpiError(String),

    /// GPIO pin error
    GpioError(String),

    /// Invalid configuration
    InvalidConfiguration(String),

    /// Canvas does not match the panel
    SizeMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    /// Writing the image file failed
    Io {
        path: String,
        source: std::io::Error,
    },

    /// Generic error with message
    Other(String),
}

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayError::InitializationFailed(msg) =>
                write!(f, "Display initialization failed: {}", msg),
            DisplayError::SpiError(msg) =>
                write!(f, "SPI communication error: {}", msg),
            DisplayError::GpioError(msg) =>
                write!(f, "GPIO error: {}", msg),
            DisplayError::InvalidConfiguration(msg) =>
                write!(f, "Invalid configuration: {}", msg),
            DisplayError::SizeMismatch { expected, actual } =>
                write!(f, "Canvas size mismatch: panel is {}x{}, canvas is {}x{}",
                       expected.0, expected.1, actual.0, actual.1),
            DisplayError::Io { path, source } =>
                write!(f, "Failed to write {}: {}", path, source),
            DisplayError::Other(msg) =>
                write!(f, "{}", msg),
        }
    }
}

impl Error for DisplayError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DisplayError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(feature = "waveshare")]
impl From<linux_embedded_hal::SPIError> for DisplayError {
    fn from(err: linux_embedded_hal::SPIError) -> Self {
        DisplayError::SpiError(format!("{:?}", err))
    }
}
