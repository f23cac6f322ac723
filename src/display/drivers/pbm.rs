/*
 *  display/drivers/pbm.rs
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

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::info;

use crate::canvas::Canvas;
use crate::display::error::DisplayError;
use crate::display::traits::DisplaySink;

/// Writes each refresh as a binary PBM (P4) image.
///
/// Stands in for the panel on machines without one.
#[derive(Debug, Clone)]
pub struct PbmSink {
    path: PathBuf,
    refreshes: usize,
}

impl PbmSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            refreshes: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn refreshes(&self) -> usize {
        self.refreshes
    }

    fn write(&self, canvas: &Canvas) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("pbm.tmp");
        {
            let mut out = BufWriter::new(File::create(&tmp)?);
            write!(out, "P4\n{} {}\n", canvas.width(), canvas.height())?;
            // PBM sets a bit for black
            out.write_all(&canvas.to_packed_bytes(true))?;
            out.flush()?;
        }
        fs::rename(&tmp, &self.path)
    }
}

impl DisplaySink for PbmSink {
    fn name(&self) -> &'static str {
        "pbm"
    }

    fn display(&mut self, canvas: &Canvas) -> Result<(), DisplayError> {
        self.check_size(canvas)?;
        self.write(canvas).map_err(|source| DisplayError::Io {
            path: self.path.display().to_string(),
            source,
        })?;
        self.refreshes += 1;
        info!("Image written to {}", self.path.display());
        Ok(())
    }
}
