/*
 *  logging.rs
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
//! Console plus activity-file logging on top of `env_logger`.

use chrono::Local;
use env_logger::{Env, Target};
use log::{SetLoggerError, warn};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Size at which the activity log is rolled over on startup.
pub const MAX_LOG_BYTES: u64 = 1_000_000;
/// Rolled files kept next to the live one, `.1` being the newest.
pub const LOG_BACKUPS: usize = 3;

const LINE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn backup_path(path: &Path, n: usize) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(format!(".{}", n));
    PathBuf::from(name)
}

/// Shift `path` to `path.1` (and older backups up by one) when it is larger
/// than `max_bytes`. Returns whether a rollover happened.
pub fn rotate(path: &Path, max_bytes: u64, backups: usize) -> io::Result<bool> {
    let len = match fs::metadata(path) {
        Ok(meta) => meta.len(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e),
    };
    if len <= max_bytes {
        return Ok(false);
    }
    if backups == 0 {
        fs::remove_file(path)?;
        return Ok(true);
    }

    let oldest = backup_path(path, backups);
    if oldest.exists() {
        fs::remove_file(&oldest)?;
    }
    for n in (1..backups).rev() {
        let from = backup_path(path, n);
        if from.exists() {
            fs::rename(&from, backup_path(path, n + 1))?;
        }
    }
    fs::rename(path, backup_path(path, 1))?;
    Ok(true)
}

/// Writes every formatted line to stderr and, when open, the activity file.
struct Tee {
    file: Option<File>,
}

impl Write for Tee {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stderr().write_all(buf)?;
        if let Some(file) = self.file.as_mut() {
            file.write_all(buf)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()?;
        if let Some(file) = self.file.as_mut() {
            file.flush()?;
        }
        Ok(())
    }
}

/// Install the global logger. `RUST_LOG` still wins over `level`.
///
/// A log file that cannot be rotated or opened is reported on the console
/// and the run carries on without it.
pub fn init(level: &str, log_file: &Path) -> Result<(), SetLoggerError> {
    let rotated = rotate(log_file, MAX_LOG_BYTES, LOG_BACKUPS);
    let file = OpenOptions::new().create(true).append(true).open(log_file);

    let mut problems = Vec::new();
    if let Err(e) = &rotated {
        problems.push(format!("could not rotate {}: {}", log_file.display(), e));
    }
    let file = match file {
        Ok(f) => Some(f),
        Err(e) => {
            problems.push(format!("could not open {}: {}", log_file.display(), e));
            None
        }
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(level))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} - {} - {}",
                Local::now().format(LINE_TIME_FORMAT),
                record.level(),
                record.args()
            )
        })
        .target(Target::Pipe(Box::new(Tee { file })))
        .try_init()?;

    for p in problems {
        warn!("Activity log disabled, {}", p);
    }
    Ok(())
}
