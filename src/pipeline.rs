/*
 *  pipeline.rs
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
//! One refresh: fetch, parse, persist, render, display.
//!
//! History failures are logged and swallowed; every other stage aborts
//! the pass with its error.

use log::{debug, error, info};

use crate::citypage;
use crate::config::{Config, PLACEHOLDER_LOCATION};
use crate::display::DisplaySink;
use crate::error::DashboardError;
use crate::feed::fetch_feed;
use crate::history::HistoryStore;
use crate::render::RenderContext;
use crate::weather::WeatherReport;

/// Full pass against the configured feed URL.
pub async fn run_pass(
    config: &Config,
    ctx: &RenderContext,
    sink: &mut dyn DisplaySink,
) -> Result<(), DashboardError> {
    let document = fetch_feed(config.feed_url()).await?;
    present(&document, config, ctx, sink)?;
    Ok(())
}

/// Everything after the fetch, for a document already in hand.
pub fn present(
    document: &str,
    config: &Config,
    ctx: &RenderContext,
    sink: &mut dyn DisplaySink,
) -> Result<WeatherReport, DashboardError> {
    let mut report = citypage::parse(document).map_err(|e| {
        error!("Error processing weather data: {}", e);
        e
    })?;
    report.label_location(config.location(), PLACEHOLDER_LOCATION);

    if config.history_enabled() {
        HistoryStore::new(config.history_dir()).record(&report);
    } else {
        debug!("History disabled, skipping CSV logs");
    }

    let canvas = ctx.render(&report.current, &report.forecasts, &report.hourly)?;

    sink.display(&canvas).map_err(|e| {
        error!("Error updating {} display: {}", sink.name(), e);
        e
    })?;
    info!("Weather display updated.");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HistoryConfig;
    use crate::display::drivers::mock::MockSink;
    use crate::error::{FetchError, SchemaError};
    use crate::fonts::FontTable;
    use crate::history::HistoryKind;
    use crate::icons::IconStore;
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::time::{SystemTime, UNIX_EPOCH};
    use tiny_skia::{Color, Pixmap};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const SAMPLE: &str = include_str!("../tests/data/citypage_sample.xml");

    fn scratch_dir(tag: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("wxpaper-pipeline-{}-{}-{}", tag, std::process::id(), nanos));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn context(dir: &Path) -> RenderContext {
        let icons = dir.join("icons");
        fs::create_dir_all(&icons).unwrap();
        let mut pixmap = Pixmap::new(8, 8).unwrap();
        pixmap.fill(Color::BLACK);
        for name in ["wind_icon", "humidity_icon", "sunrise_icon", "sunset_icon", "16", "33", "00", "30", "02", "10"] {
            pixmap.save_png(icons.join(format!("{}.png", name))).unwrap();
        }
        RenderContext::new(FontTable::builtin(), IconStore::new(icons))
    }

    fn config(dir: &Path, location: Option<&str>) -> Config {
        Config {
            location: location.map(str::to_string),
            history: Some(HistoryConfig {
                enabled: Some(true),
                dir: Some(dir.to_path_buf()),
            }),
            ..Config::default()
        }
    }

    /// Answer a single HTTP request with `status` and `body`.
    async fn serve_once(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 4096];
            let _ = socket.read(&mut request).await;
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: text/xml; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });
        format!("http://{}/citypage.xml", addr)
    }

    #[test]
    fn test_present_labels_persists_and_displays() {
        let dir = scratch_dir("present");
        let ctx = context(&dir);
        let mut sink = MockSink::new();
        let state = sink.state();

        let report = present(SAMPLE, &config(&dir, None), &ctx, &mut sink).unwrap();

        assert_eq!(report.current.location.as_deref(), Some("Ottawa (Kanata - Orléans)"));
        assert_eq!(state.lock().unwrap().display_count, 1);

        let store = HistoryStore::new(&dir);
        let current = store.load(HistoryKind::Current).unwrap();
        assert_eq!(current.len(), 1);
        assert_eq!(current[0][0], "03/10/2025 14:00");
        assert_eq!(store.load(HistoryKind::Hourly).unwrap().len(), 9);
        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_configured_location_wins() {
        let dir = scratch_dir("label");
        let ctx = context(&dir);
        let mut sink = MockSink::new();
        let report = present(SAMPLE, &config(&dir, Some("Kanata")), &ctx, &mut sink).unwrap();
        assert_eq!(report.current.location.as_deref(), Some("Kanata"));
        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_placeholder_when_nothing_names_the_site() {
        let dir = scratch_dir("placeholder");
        let ctx = context(&dir);
        let mut sink = MockSink::new();
        let report = present("<siteData><currentConditions/></siteData>", &config(&dir, None), &ctx, &mut sink).unwrap();
        assert_eq!(report.current.location.as_deref(), Some(PLACEHOLDER_LOCATION));
        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_repeat_pass_keeps_one_current_row() {
        let dir = scratch_dir("repeat");
        let ctx = context(&dir);
        let mut sink = MockSink::new();
        let cfg = config(&dir, None);
        present(SAMPLE, &cfg, &ctx, &mut sink).unwrap();
        present(SAMPLE, &cfg, &ctx, &mut sink).unwrap();

        let store = HistoryStore::new(&dir);
        assert_eq!(store.load(HistoryKind::Current).unwrap().len(), 1);
        assert_eq!(store.load(HistoryKind::Hourly).unwrap().len(), 18);
        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_history_failure_does_not_stop_display() {
        let dir = scratch_dir("nohist");
        let ctx = context(&dir);
        // a file where the history directory should be
        let blocker = dir.join("blocker");
        fs::write(&blocker, "x").unwrap();
        let mut cfg = config(&dir, None);
        cfg.history = Some(HistoryConfig {
            enabled: Some(true),
            dir: Some(blocker),
        });
        let mut sink = MockSink::new();
        let state = sink.state();
        assert!(present(SAMPLE, &cfg, &ctx, &mut sink).is_ok());
        assert_eq!(state.lock().unwrap().display_count, 1);
        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_history_disabled_writes_nothing() {
        let dir = scratch_dir("off");
        let ctx = context(&dir);
        let mut cfg = config(&dir, None);
        cfg.history = Some(HistoryConfig {
            enabled: Some(false),
            dir: Some(dir.clone()),
        });
        let mut sink = MockSink::new();
        present(SAMPLE, &cfg, &ctx, &mut sink).unwrap();
        assert!(!HistoryStore::new(&dir).path(HistoryKind::Current).exists());
        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_schema_error_skips_display() {
        let dir = scratch_dir("schema");
        let ctx = context(&dir);
        let mut sink = MockSink::new();
        let state = sink.state();
        let err = present("<siteData/>", &config(&dir, None), &ctx, &mut sink).unwrap_err();
        assert!(matches!(err, DashboardError::Schema(SchemaError::MissingCurrentConditions)));
        assert_eq!(state.lock().unwrap().display_count, 0);
        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_display_failure_surfaces() {
        let dir = scratch_dir("fail");
        let ctx = context(&dir);
        let mut sink = MockSink::new();
        sink.fail_next();
        let err = present(SAMPLE, &config(&dir, None), &ctx, &mut sink).unwrap_err();
        assert!(matches!(err, DashboardError::Display(_)));
        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_render_failure_surfaces() {
        let dir = scratch_dir("render");
        let ctx = context(&dir);
        let mut sink = MockSink::new();
        let state = sink.state();
        let xml = "<siteData><currentConditions><temperature>warm</temperature></currentConditions></siteData>";
        let err = present(xml, &config(&dir, None), &ctx, &mut sink).unwrap_err();
        assert!(matches!(err, DashboardError::Render(_)));
        assert_eq!(state.lock().unwrap().display_count, 0);
        fs::remove_dir_all(dir).ok();
    }

    #[tokio::test]
    async fn test_run_pass_over_http() {
        let dir = scratch_dir("http");
        let ctx = context(&dir);
        let mut cfg = config(&dir, None);
        cfg.feed_url = Some(serve_once("200 OK", SAMPLE).await);
        let mut sink = MockSink::new();
        let state = sink.state();

        run_pass(&cfg, &ctx, &mut sink).await.unwrap();

        let state = state.lock().unwrap();
        assert_eq!(state.display_count, 1);
        assert!(state.last_canvas.as_ref().unwrap().ink_count() > 0);
        fs::remove_dir_all(dir).ok();
    }

    #[tokio::test]
    async fn test_run_pass_http_status_is_fetch_error() {
        let dir = scratch_dir("404");
        let ctx = context(&dir);
        let mut cfg = config(&dir, None);
        cfg.feed_url = Some(serve_once("404 Not Found", "gone").await);
        let mut sink = MockSink::new();
        let state = sink.state();

        let err = run_pass(&cfg, &ctx, &mut sink).await.unwrap_err();
        assert!(matches!(err, DashboardError::Fetch(FetchError::Status { .. })));
        assert_eq!(state.lock().unwrap().display_count, 0);
        assert!(!HistoryStore::new(&dir).path(HistoryKind::Current).exists());
        fs::remove_dir_all(dir).ok();
    }
}
