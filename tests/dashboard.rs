// End-to-end checks against the library API with a recorded citypage document.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use tiny_skia::{Color, Pixmap};

use wxpaper::canvas::{CANVAS_HEIGHT, CANVAS_WIDTH};
use wxpaper::citypage;
use wxpaper::config::{Config, DisplayConfig, DriverKind, HistoryConfig};
use wxpaper::display::{DisplaySink, DisplaySinkFactory, PbmSink};
use wxpaper::fonts::{DASHBOARD_SIZES, FontTable};
use wxpaper::history::{HistoryKind, HistoryStore};
use wxpaper::icons::IconStore;
use wxpaper::pipeline::present;
use wxpaper::render::{self, RenderContext};

const SAMPLE: &str = include_str!("data/citypage_sample.xml");

fn scratch_dir(tag: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("wxpaper-it-{}-{}-{}", tag, std::process::id(), nanos));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn icon_set(dir: &Path, codes: &[&str]) -> IconStore {
    let icons = dir.join("icons");
    fs::create_dir_all(&icons).unwrap();
    let mut pixmap = Pixmap::new(12, 12).unwrap();
    pixmap.fill(Color::BLACK);
    for name in ["wind_icon", "humidity_icon", "sunrise_icon", "sunset_icon"].iter().chain(codes) {
        pixmap.save_png(icons.join(format!("{}.png", name))).unwrap();
    }
    IconStore::new(icons)
}

fn fully_inked(canvas: &wxpaper::Canvas, origin: Point, size: u32) -> bool {
    canvas.ink_in(&Rectangle::new(origin, Size::new(size, size))) == (size * size) as usize
}

#[test]
fn sample_document_parses() {
    let report = citypage::parse(SAMPLE).unwrap();
    let current = &report.current;

    assert_eq!(current.observed_stamp().as_deref(), Some("03/10/2025 14:00"));
    assert_eq!(current.location.as_deref(), Some("Ottawa (Kanata - Orléans)"));
    assert_eq!(current.temperature.as_deref(), Some("-3.6"));
    assert_eq!(current.wind_chill.as_deref(), Some("-9"));
    assert_eq!(current.humidity.as_deref(), Some("71"));
    assert_eq!(current.wind_speed.as_deref(), Some("14"));
    assert_eq!(current.wind_direction.as_deref(), Some("NW"));
    assert_eq!(current.condition.as_deref(), Some("Light Snow"));
    assert_eq!(current.icon_code.as_deref(), Some("16"));
    assert_eq!(current.sunrise.as_deref(), Some("07:23 am"));
    assert_eq!(current.sunset.as_deref(), Some("07:05 pm"));
    assert_eq!(
        current.alerts.as_deref(),
        Some("SNOWFALL WARNING IN EFFECT, SPECIAL WEATHER STATEMENT IN EFFECT")
    );

    assert_eq!(report.forecasts.len(), 6);
    assert_eq!(report.forecasts[1].period.as_deref(), Some("Monday night"));
    assert_eq!(report.forecasts[1].pop, None);
    assert_eq!(report.forecasts[0].wind_chill.as_deref(), Some("-12"));

    assert_eq!(report.hourly.len(), 9);
    assert_eq!(report.hourly[0].time.as_deref(), Some("03/10/2025 03:00 PM"));
    assert_eq!(report.hourly[5].time.as_deref(), Some("03/10/2025 08:00 PM"));
    assert_eq!(report.hourly[0].uv_index.as_deref(), Some("1"));
}

#[test]
fn sample_renders_grid_and_hourly_column() {
    let dir = scratch_dir("render");
    let ctx = RenderContext::new(FontTable::builtin(), icon_set(&dir, &["16", "33", "00", "30", "02", "10"]));
    let report = citypage::parse(SAMPLE).unwrap();

    let canvas = ctx.render(&report.current, &report.forecasts, &report.hourly).unwrap();
    assert_eq!((canvas.width() as u32, canvas.height() as u32), (CANVAS_WIDTH, CANVAS_HEIGHT));

    // source periods 1..=4 fill the 2x2 grid
    for (column, row) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
        assert!(fully_inked(&canvas, render::forecast_cell_origin(column, row), 40));
    }
    // eight hourly rows, the ninth entry is dropped
    for i in 0..8 {
        let icon = render::hourly_row_origin(i) + Point::new(90, -5);
        assert!(fully_inked(&canvas, icon, 40), "hourly row {}", i);
    }
    let ninth = render::hourly_row_origin(8) + Point::new(90, -5);
    assert_eq!(canvas.ink_in(&Rectangle::new(ninth, Size::new(40, 40))), 0);
    fs::remove_dir_all(dir).ok();
}

#[test]
fn outline_header_is_right_aligned_under_its_line() {
    let dir = scratch_dir("outline");
    let font = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data/DejaVuSans.ttf");
    let fonts = FontTable::load(&font, &DASHBOARD_SIZES).unwrap();
    let ctx = RenderContext::new(fonts, icon_set(&dir, &[]));
    let report = citypage::parse(SAMPLE).unwrap();

    let canvas = ctx.render(&report.current, &report.forecasts, &report.hourly).unwrap();

    let header_band = |x: i32, y: i32, w: u32, h: u32| canvas.ink_in(&Rectangle::new(Point::new(x, y), Size::new(w, h)));
    // nothing past the right margin, nothing above the date line
    assert_eq!(header_band(render::HEADER_RIGHT + 1, 0, 24, 100), 0);
    assert_eq!(header_band(500, 0, 300, render::HEADER_DATE_Y as u32), 0);
    // date and location both reach the margin
    assert!(header_band(render::HEADER_RIGHT - 5, render::HEADER_DATE_Y, 6, 30) > 0);
    assert!(header_band(render::HEADER_RIGHT - 5, render::HEADER_LOCATION_Y, 6, 30) > 0);
    // 80px temperature hangs from its origin
    let t = render::TEMPERATURE_ORIGIN;
    assert_eq!(header_band(t.x, 0, 200, t.y as u32), 0);
    assert!(header_band(t.x, t.y, 200, 80) > 0);
    fs::remove_dir_all(dir).ok();
}

#[test]
fn pass_writes_pbm_and_history() {
    let dir = scratch_dir("pass");
    let ctx = RenderContext::new(FontTable::builtin(), icon_set(&dir, &["16", "33"]));
    let output = dir.join("out").join("dashboard.pbm");

    let config = Config {
        location: Some("Kanata".to_string()),
        history: Some(HistoryConfig {
            enabled: Some(true),
            dir: Some(dir.clone()),
        }),
        display: Some(DisplayConfig {
            driver: Some(DriverKind::Pbm),
            output: Some(output.clone()),
            ..DisplayConfig::default()
        }),
        ..Config::default()
    };

    let mut sink = DisplaySinkFactory::create_from_config(&config.display()).unwrap();
    assert_eq!(sink.name(), "pbm");
    let report = present(SAMPLE, &config, &ctx, sink.as_mut()).unwrap();
    assert_eq!(report.current.location.as_deref(), Some("Kanata"));

    let bytes = fs::read(&output).unwrap();
    let header = b"P4\n800 480\n";
    assert_eq!(&bytes[..header.len()], header);
    assert_eq!(bytes.len(), header.len() + 800 * 480 / 8);
    assert!(bytes[header.len()..].iter().any(|&b| b != 0));

    let store = HistoryStore::new(&dir);
    let current = store.load(HistoryKind::Current).unwrap();
    assert_eq!(current.len(), 1);
    assert_eq!(current[0][0], "03/10/2025 14:00");
    assert_eq!(current[0][1], "Kanata");
    assert_eq!(current[0][2], "-3.6");
    let hourly = store.load(HistoryKind::Hourly).unwrap();
    assert_eq!(hourly.len(), 9);
    assert_eq!(hourly[0], vec!["03/10/2025 03:00 PM", "-3", "70", "-9", "1"]);
    fs::remove_dir_all(dir).ok();
}

#[test]
fn pbm_sink_counts_refreshes() {
    let dir = scratch_dir("pbm");
    let mut sink = PbmSink::new(dir.join("a.pbm"));
    let canvas = wxpaper::Canvas::dashboard();
    sink.display(&canvas).unwrap();
    sink.display(&canvas).unwrap();
    assert_eq!(sink.refreshes(), 2);
    assert!(!dir.join("a.pbm.tmp").exists());
    fs::remove_dir_all(dir).ok();
}
