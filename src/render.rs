/*
 *  render.rs
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
//! Dashboard composition.
//!
//! Every element sits at a fixed position on the 800x480 panel. A field that
//! is `None` simply leaves its region blank; a field that is present but not
//! a number fails the whole render.

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use log::{error, info};

use crate::canvas::{CANVAS_WIDTH, Canvas};
use crate::error::RenderError;
use crate::fonts::FontTable;
use crate::icons::IconStore;
use crate::localtime::hour_of_local_display;
use crate::weather::{CurrentConditions, ForecastPeriod, HourlyForecast};

/// Right edge of the header text.
pub const HEADER_RIGHT: i32 = CANVAS_WIDTH as i32 - 25;
pub const HEADER_DATE_Y: i32 = 25;
pub const HEADER_LOCATION_Y: i32 = 60;

pub const ALERTS_ORIGIN: Point = Point::new(45, 210);

pub const CURRENT_ICON_ORIGIN: Point = Point::new(40, 10);
pub const CURRENT_ICON_SIZE: Size = Size::new(150, 150);
pub const TEMPERATURE_ORIGIN: Point = Point::new(240, 20);
pub const WIND_CHILL_ORIGIN: Point = Point::new(240, 110);
pub const CONDITION_ORIGIN: Point = Point::new(240, 155);

pub const ROW_ICON_SIZE: Size = Size::new(35, 35);
/// Row value text sits this far right of its icon.
pub const ROW_VALUE_INDENT: i32 = 40;

pub const GRID_ORIGIN: Point = Point::new(220, 270);
pub const GRID_COLUMN_SHIFT: i32 = 190;
pub const GRID_ROW_SPACING: i32 = 100;
pub const GRID_ICON_SIZE: Size = Size::new(40, 40);
/// Forecast periods shown, starting after "today".
pub const GRID_SLOTS: usize = 4;
/// Extra drop applied to the pop line when a wind chill line is drawn.
pub const WIND_CHILL_SHIFT: i32 = 20;

pub const HOURLY_ORIGIN: Point = Point::new(605, 130);
pub const HOURLY_SPACING: i32 = 42;
pub const HOURLY_ROWS: usize = 8;
pub const HOURLY_ICON_SIZE: Size = Size::new(40, 40);

const HEADER_SIZE: u32 = 30;
const ALERTS_SIZE: u32 = 18;
const TEMPERATURE_SIZE: u32 = 80;
const WIND_CHILL_SIZE: u32 = 30;
const BODY_SIZE: u32 = 22;
const SMALL_SIZE: u32 = 20;

const HEADER_STAMP_FORMAT: &str = "%m/%d/%Y %I:%M %p";

/// Ink and paper colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub ink: BinaryColor,
    pub paper: BinaryColor,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            ink: BinaryColor::On,
            paper: BinaryColor::Off,
        }
    }
}

/// Read-only drawing resources, loaded once at startup.
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub fonts: FontTable,
    pub icons: IconStore,
    pub palette: Palette,
}

/// One of the icon + value rows down the left side.
struct DetailRow {
    icon: &'static str,
    origin: Point,
    value: fn(&CurrentConditions) -> Option<&str>,
    field: &'static str,
    /// numeric rows carry a unit and render to one decimal
    unit: Option<&'static str>,
}

fn wind_speed(c: &CurrentConditions) -> Option<&str> {
    c.wind_speed.as_deref()
}
fn humidity(c: &CurrentConditions) -> Option<&str> {
    c.humidity.as_deref()
}
fn sunrise(c: &CurrentConditions) -> Option<&str> {
    c.sunrise.as_deref()
}
fn sunset(c: &CurrentConditions) -> Option<&str> {
    c.sunset.as_deref()
}

const DETAIL_ROWS: [DetailRow; 4] = [
    DetailRow {
        icon: "wind_icon.png",
        origin: Point::new(40, 420),
        value: wind_speed,
        field: "wind_speed",
        unit: Some(" km/h"),
    },
    DetailRow {
        icon: "humidity_icon.png",
        origin: Point::new(40, 270),
        value: humidity,
        field: "humidity",
        unit: Some("%"),
    },
    DetailRow {
        icon: "sunrise_icon.png",
        origin: Point::new(40, 320),
        value: sunrise,
        field: "sunrise",
        unit: None,
    },
    DetailRow {
        icon: "sunset_icon.png",
        origin: Point::new(40, 370),
        value: sunset,
        field: "sunset",
        unit: None,
    },
];

fn number(field: &'static str, value: &str) -> Result<f64, RenderError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| RenderError::InvalidNumber {
            field,
            value: value.to_string(),
        })
}

/// `"-3.6"` -> `"-4°C"`
pub fn format_temp(field: &'static str, value: &str) -> Result<String, RenderError> {
    Ok(format!("{:.0}°C", number(field, value)?))
}

/// Abbreviated period label: `"Monday night"` -> `"Mon night"`, `"Tuesday"` -> `"Tue"`.
pub fn period_label(period: &str) -> Option<String> {
    let first = period.split_whitespace().next()?;
    let abbr: String = first.chars().take(3).collect();
    if period.to_lowercase().contains("night") {
        Some(format!("{} night", abbr))
    } else {
        Some(abbr)
    }
}

/// Grid (column, row) for a forecast at `source_index`; index 0 and anything
/// past the fourth shown period have no slot.
pub fn forecast_slot(source_index: usize) -> Option<(usize, usize)> {
    if source_index == 0 || source_index > GRID_SLOTS {
        return None;
    }
    let slot = source_index - 1;
    Some((slot % 2, slot / 2))
}

/// Top-left of the forecast cell at grid `(column, row)`.
pub fn forecast_cell_origin(column: usize, row: usize) -> Point {
    GRID_ORIGIN + Point::new(column as i32 * GRID_COLUMN_SHIFT, row as i32 * GRID_ROW_SPACING)
}

/// Top-left of hourly row `i`.
pub fn hourly_row_origin(i: usize) -> Point {
    HOURLY_ORIGIN + Point::new(0, i as i32 * HOURLY_SPACING)
}

impl RenderContext {
    pub fn new(fonts: FontTable, icons: IconStore) -> Self {
        Self {
            fonts,
            icons,
            palette: Palette::default(),
        }
    }

    fn text(&self, canvas: &mut Canvas, size: u32, text: &str, origin: Point) -> Result<(), RenderError> {
        self.fonts.face(size)?.draw(canvas, text, origin, self.palette.ink);
        Ok(())
    }

    fn text_right(&self, canvas: &mut Canvas, size: u32, text: &str, right: i32, y: i32) -> Result<(), RenderError> {
        let face = self.fonts.face(size)?;
        // the ink, not the advance, ends at `right`
        let (_, ink_right) = face.ink_span(text);
        let x = right - ink_right;
        face.draw(canvas, text, Point::new(x, y), self.palette.ink);
        Ok(())
    }

    fn icon(&self, canvas: &mut Canvas, code: Option<&str>, origin: Point, size: Size) -> Result<(), RenderError> {
        let Some(code) = code else {
            return Ok(());
        };
        if let Some(icon) = self.icons.lookup_icon(code, size)? {
            icon.draw(canvas, origin);
        }
        Ok(())
    }

    /// Compose the full dashboard.
    pub fn render(
        &self,
        current: &CurrentConditions,
        forecasts: &[ForecastPeriod],
        hourly: &[HourlyForecast],
    ) -> Result<Canvas, RenderError> {
        match self.compose(current, forecasts, hourly) {
            Ok(canvas) => {
                info!("Display image generated successfully.");
                Ok(canvas)
            }
            Err(e) => {
                error!("Error generating display image: {}", e);
                Err(e)
            }
        }
    }

    fn compose(
        &self,
        current: &CurrentConditions,
        forecasts: &[ForecastPeriod],
        hourly: &[HourlyForecast],
    ) -> Result<Canvas, RenderError> {
        let mut canvas = Canvas::dashboard();
        canvas.clear(self.palette.paper).ok();

        self.draw_header(&mut canvas, current)?;
        self.draw_alerts(&mut canvas, current)?;
        self.draw_current(&mut canvas, current)?;
        self.draw_detail_rows(&mut canvas, current)?;
        self.draw_forecast_grid(&mut canvas, forecasts)?;
        self.draw_hourly(&mut canvas, hourly)?;
        Ok(canvas)
    }

    fn draw_header(&self, canvas: &mut Canvas, current: &CurrentConditions) -> Result<(), RenderError> {
        if let Some(observed) = current.observed {
            let stamp = observed.format(HEADER_STAMP_FORMAT).to_string().to_lowercase();
            self.text_right(canvas, HEADER_SIZE, &stamp, HEADER_RIGHT, HEADER_DATE_Y)?;
        }
        if let Some(location) = current.location.as_deref() {
            self.text_right(canvas, HEADER_SIZE, location, HEADER_RIGHT, HEADER_LOCATION_Y)?;
        }
        Ok(())
    }

    fn draw_alerts(&self, canvas: &mut Canvas, current: &CurrentConditions) -> Result<(), RenderError> {
        let text = match current.alerts.as_deref() {
            Some(alerts) => format!("Alert(s): {}", alerts),
            None => "No active alerts".to_string(),
        };
        self.text(canvas, ALERTS_SIZE, &text, ALERTS_ORIGIN)
    }

    fn draw_current(&self, canvas: &mut Canvas, current: &CurrentConditions) -> Result<(), RenderError> {
        self.icon(canvas, current.icon_code.as_deref(), CURRENT_ICON_ORIGIN, CURRENT_ICON_SIZE)?;

        if let Some(temperature) = current.temperature.as_deref() {
            let text = format_temp("temperature", temperature)?;
            self.text(canvas, TEMPERATURE_SIZE, &text, TEMPERATURE_ORIGIN)?;
        }
        // falls back to the air temperature when there is no wind chill
        if let Some(chill) = current.wind_chill.as_deref().or(current.temperature.as_deref()) {
            let text = format!("Wind chill: {}", format_temp("wind_chill", chill)?);
            self.text(canvas, WIND_CHILL_SIZE, &text, WIND_CHILL_ORIGIN)?;
        }
        if let Some(condition) = current.condition.as_deref() {
            self.text(canvas, BODY_SIZE, condition, CONDITION_ORIGIN)?;
        }
        Ok(())
    }

    fn draw_detail_rows(&self, canvas: &mut Canvas, current: &CurrentConditions) -> Result<(), RenderError> {
        for row in &DETAIL_ROWS {
            self.icons.load_asset(row.icon, ROW_ICON_SIZE)?.draw(canvas, row.origin);

            let Some(value) = (row.value)(current) else {
                continue;
            };
            let text = match row.unit {
                Some(unit) => format!("{:.1}{}", number(row.field, value)?, unit),
                None => value.to_string(),
            };
            self.text(canvas, BODY_SIZE, &text, row.origin + Point::new(ROW_VALUE_INDENT, 0))?;
        }
        Ok(())
    }

    fn draw_forecast_grid(&self, canvas: &mut Canvas, forecasts: &[ForecastPeriod]) -> Result<(), RenderError> {
        for (index, period) in forecasts.iter().enumerate() {
            let Some((column, row)) = forecast_slot(index) else {
                continue;
            };
            let origin = forecast_cell_origin(column, row);
            self.icon(canvas, period.icon_code.as_deref(), origin, GRID_ICON_SIZE)?;

            if let Some(label) = period.period.as_deref().and_then(period_label) {
                self.text(canvas, BODY_SIZE, &label, origin + Point::new(50, 5))?;
            }
            if let Some(temperature) = period.temperature.as_deref() {
                let text = format!("Temp: {}", format_temp("forecast temperature", temperature)?);
                self.text(canvas, SMALL_SIZE, &text, origin + Point::new(50, 30))?;
            }
            let mut pop_y = 50;
            if let Some(chill) = period.wind_chill.as_deref() {
                let text = format!("W. Chill: {}", format_temp("forecast wind_chill", chill)?);
                self.text(canvas, SMALL_SIZE, &text, origin + Point::new(50, 50))?;
                pop_y += WIND_CHILL_SHIFT;
            }
            if let Some(pop) = period.pop.as_deref() {
                let text = format!("{:.0}%", number("pop", pop)?);
                self.text(canvas, SMALL_SIZE, &text, origin + Point::new(50, pop_y))?;
            }
        }
        Ok(())
    }

    fn draw_hourly(&self, canvas: &mut Canvas, hourly: &[HourlyForecast]) -> Result<(), RenderError> {
        for (i, hour) in hourly.iter().take(HOURLY_ROWS).enumerate() {
            let origin = hourly_row_origin(i);
            if let Some(time) = hour.time.as_deref() {
                self.text(canvas, SMALL_SIZE, &hour_of_local_display(time)?, origin)?;
            }
            self.icon(canvas, hour.icon_code.as_deref(), origin + Point::new(90, -5), HOURLY_ICON_SIZE)?;
            if let Some(temperature) = hour.temperature.as_deref() {
                let text = format_temp("hourly temperature", temperature)?;
                self.text(canvas, SMALL_SIZE, &text, origin + Point::new(135, 0))?;
            }
        }
        Ok(())
    }
}
