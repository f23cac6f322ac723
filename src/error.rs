/*
 *  error.rs
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

use thiserror::Error;

pub use crate::display::error::DisplayError;

/// Network or transport failure while pulling the feed.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP client setup failed: {0}")]
    Client(reqwest::Error),
    #[error("feed request failed: {0}")]
    Transport(reqwest::Error),
    #[error("feed server answered {status} for {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },
}

/// The document cannot yield a record set at all.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("feed document is not well-formed XML: {0}")]
    Malformed(#[from] roxmltree::Error),
    #[error("feed document has no <currentConditions> element")]
    MissingCurrentConditions,
}

/// Malformed timestamp text.
#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("expected a 12 digit YYYYMMDDHHMM UTC stamp, got {0:?}")]
    CompactTimestamp(String),
    #[error("expected a MM/DD/YYYY hh:mm AM/PM stamp, got {0:?}")]
    LocalTimestamp(String),
}

/// History logging failure. Never fatal to a pass.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("history I/O error on {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("history CSV error on {path}: {source}")]
    Csv {
        path: String,
        source: csv::Error,
    },
}

/// Failure while composing the canvas.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("font file {path} could not be read: {source}")]
    FontRead {
        path: String,
        source: std::io::Error,
    },
    #[error("font file {path} could not be parsed: {reason}")]
    FontParse { path: String, reason: String },
    #[error("no face loaded for point size {0}")]
    MissingFace(u32),
    #[error("bundled icon {0} is missing")]
    MissingAsset(String),
    #[error("icon {path} could not be decoded: {reason}")]
    IconDecode { path: String, reason: String },
    #[error("field {field} holds non-numeric value {value:?}")]
    InvalidNumber { field: &'static str, value: String },
    #[error(transparent)]
    Timestamp(#[from] ParseError),
}

/// Anything that aborts a pass. History failures are logged, not returned.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Display(#[from] DisplayError),
}
