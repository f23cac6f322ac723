/*
 *  history.rs
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
//! Append-only CSV history of current conditions and hourly forecasts.
//!
//! Files carry no header row. The current-conditions file is rewritten
//! after every append so each observation stamp appears once.

use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Terminator, WriterBuilder};
use log::{error, info};

use crate::error::PersistError;
use crate::weather::WeatherReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryKind {
    Current,
    Hourly,
}

impl HistoryKind {
    pub fn file_name(&self) -> &'static str {
        match self {
            HistoryKind::Current => "current_conditions_records.csv",
            HistoryKind::Hourly => "hourly_forecast_records.csv",
        }
    }
}

/// Both history files, kept under one directory.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    dir: PathBuf,
}

fn io_error(path: &Path, source: std::io::Error) -> PersistError {
    PersistError::Io {
        path: path.display().to_string(),
        source,
    }
}

fn csv_error(path: &Path, source: csv::Error) -> PersistError {
    PersistError::Csv {
        path: path.display().to_string(),
        source,
    }
}

impl HistoryStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self, kind: HistoryKind) -> PathBuf {
        self.dir.join(kind.file_name())
    }

    /// Append `rows` to the file for `kind`, creating it when absent.
    ///
    /// Appending to the current-conditions file also runs
    /// [`dedup_current`](Self::dedup_current).
    pub fn append(&self, kind: HistoryKind, rows: &[Vec<String>]) -> Result<(), PersistError> {
        self.write_rows(kind, rows)?;
        if kind == HistoryKind::Current {
            self.dedup_current()?;
        }
        Ok(())
    }

    fn write_rows(&self, kind: HistoryKind, rows: &[Vec<String>]) -> Result<(), PersistError> {
        if rows.is_empty() {
            return Ok(());
        }
        let path = self.path(kind);
        if !self.dir.as_os_str().is_empty() {
            fs::create_dir_all(&self.dir).map_err(|e| io_error(&self.dir, e))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| io_error(&path, e))?;
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .flexible(true)
            .terminator(Terminator::CRLF)
            .from_writer(file);
        for row in rows {
            writer.write_record(row).map_err(|e| csv_error(&path, e))?;
        }
        writer.flush().map_err(|e| io_error(&path, e))?;
        Ok(())
    }

    /// Every row currently stored for `kind`, empty when the file is absent.
    pub fn load(&self, kind: HistoryKind) -> Result<Vec<Vec<String>>, PersistError> {
        let path = self.path(kind);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&path)
            .map_err(|e| csv_error(&path, e))?;
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| csv_error(&path, e))?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        Ok(rows)
    }

    /// Collapse the current-conditions file to one row per observation stamp.
    ///
    /// The last row seen for a stamp wins and keeps the position of the first
    /// one. Rows with no content at all are dropped; an empty stamp is an
    /// ordinary key.
    pub fn dedup_current(&self) -> Result<usize, PersistError> {
        let path = self.path(HistoryKind::Current);
        let rows = self.load(HistoryKind::Current)?;
        let before = rows.len();

        let mut order: Vec<Vec<String>> = Vec::with_capacity(rows.len());
        let mut index: HashMap<String, usize> = HashMap::new();
        for row in rows {
            if row.iter().all(|cell| cell.is_empty()) {
                continue;
            }
            let stamp = row.first().cloned().unwrap_or_default();
            match index.get(&stamp) {
                Some(&slot) => order[slot] = row,
                None => {
                    index.insert(stamp, order.len());
                    order.push(row);
                }
            }
        }

        if order.len() == before {
            return Ok(order.len());
        }

        let tmp = path.with_extension("csv.tmp");
        {
            let mut writer = WriterBuilder::new()
                .has_headers(false)
                .flexible(true)
                .terminator(Terminator::CRLF)
                .from_path(&tmp)
                .map_err(|e| csv_error(&tmp, e))?;
            for row in &order {
                writer.write_record(row).map_err(|e| csv_error(&tmp, e))?;
            }
            writer.flush().map_err(|e| io_error(&tmp, e))?;
        }
        fs::rename(&tmp, &path).map_err(|e| io_error(&path, e))?;
        info!(
            "Removed {} duplicate rows from {}",
            before - order.len(),
            path.display()
        );
        Ok(order.len())
    }

    /// Append the report to both files and dedup the current one.
    pub fn save(&self, report: &WeatherReport) -> Result<(), PersistError> {
        self.append(HistoryKind::Current, &[report.current.history_row()])?;
        let hourly: Vec<Vec<String>> = report.hourly.iter().map(|h| h.history_row()).collect();
        self.append(HistoryKind::Hourly, &hourly)?;
        info!("Weather history saved to {}", self.dir.display());
        Ok(())
    }

    /// [`save`](Self::save), logging instead of propagating failures.
    pub fn record(&self, report: &WeatherReport) {
        if let Err(e) = self.save(report) {
            error!("Failed to save weather history: {}", e);
        }
    }
}
