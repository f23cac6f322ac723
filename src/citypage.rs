/*
 *  citypage.rs
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
//! Citypage weather XML -> [`WeatherReport`].
//!
//! Only `<currentConditions>` is mandatory. Every other lookup goes through
//! [`FeedNode::find_text`] which turns a missing node into `None`.

use chrono::{NaiveDate, NaiveDateTime};
use encoding_rs::{Encoding, UTF_8};
use log::{debug, info, warn};
use roxmltree::{Document, Node};

use crate::error::SchemaError;
use crate::localtime::{format_time_of_day, parse_local_time_summary, utc_to_local};
use crate::weather::{CurrentConditions, ForecastPeriod, HourlyForecast, WeatherReport};

/// Thin wrapper over an element that answers slash separated path queries.
#[derive(Debug, Clone, Copy)]
pub struct FeedNode<'a, 'input> {
    node: Node<'a, 'input>,
}

impl<'a, 'input> FeedNode<'a, 'input> {
    pub fn new(node: Node<'a, 'input>) -> Self {
        Self { node }
    }

    pub fn name(&self) -> &str {
        self.node.tag_name().name()
    }

    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.node.attribute(name)
    }

    /// Direct element children called `name`, in document order.
    pub fn children(self, name: &'a str) -> impl Iterator<Item = FeedNode<'a, 'input>> + 'a {
        self.node
            .children()
            .filter(move |n| n.is_element() && n.tag_name().name() == name)
            .map(FeedNode::new)
    }

    /// First element matching `path` (e.g. `wind/speed`), searching every
    /// branch in document order.
    pub fn find(&self, path: &str) -> Option<FeedNode<'a, 'input>> {
        let mut steps = path.split('/').filter(|s| !s.is_empty());
        match steps.next() {
            None => Some(*self),
            Some(first) => {
                let rest: Vec<&str> = steps.collect();
                let rest = rest.join("/");
                self.node
                    .children()
                    .filter(|n| n.is_element() && n.tag_name().name() == first)
                    .find_map(|n| FeedNode::new(n).find(&rest))
            }
        }
    }

    /// Trimmed element text; empty text counts as absent.
    pub fn text(&self) -> Option<String> {
        self.node
            .text()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
    }

    pub fn find_text(&self, path: &str) -> Option<String> {
        self.find(path).and_then(|n| n.text())
    }

    /// `<dateTime name=".." zone="..">` children not stamped in UTC.
    fn local_date_time(&self, name: &str) -> Option<FeedNode<'a, 'input>> {
        self.children("dateTime")
            .find(|dt| dt.attr("name") == Some(name) && dt.attr("zone").is_some_and(|z| z != "UTC"))
    }
}

/// Encoding named by the `<?xml ... encoding="..."?>` prolog, if any.
fn declared_encoding(bytes: &[u8]) -> Option<&'static Encoding> {
    let head = String::from_utf8_lossy(&bytes[..bytes.len().min(256)]);
    let head = head.trim_start_matches('\u{feff}').trim_start();
    if !head.starts_with("<?xml") {
        return None;
    }
    let prolog = &head[..head.find("?>")?];
    let after = &prolog[prolog.find("encoding")? + "encoding".len()..];
    let value = after.trim_start().strip_prefix('=')?.trim_start();
    let quote = value.chars().next().filter(|q| *q == '"' || *q == '\'')?;
    let value = &value[1..];
    let label = &value[..value.find(quote)?];
    Encoding::for_label(label.as_bytes())
}

/// Decode a raw feed body to text.
///
/// A byte order mark wins, then the prolog's declared encoding, then UTF-8.
pub fn decode_document(bytes: &[u8]) -> String {
    let declared = declared_encoding(bytes).unwrap_or(UTF_8);
    let (text, used, had_errors) = declared.decode(bytes);
    if had_errors {
        warn!("Feed body had bytes invalid in {}, replaced", used.name());
    } else {
        debug!("Feed body decoded as {}", used.name());
    }
    text.into_owned()
}

/// Parse a citypage document into the normalized record set.
pub fn parse(document: &str) -> Result<WeatherReport, SchemaError> {
    let doc = Document::parse(document)?;
    let root = FeedNode::new(doc.root_element());

    let conditions = root
        .find("currentConditions")
        .ok_or(SchemaError::MissingCurrentConditions)?;

    let mut current = parse_current(root, conditions);
    current.alerts = parse_alerts(root);
    if let Some(rise_set) = root.find("riseSet") {
        current.sunrise = rise_set_time(rise_set, "sunrise");
        current.sunset = rise_set_time(rise_set, "sunset");
    }

    let forecasts: Vec<ForecastPeriod> = root
        .find("forecastGroup")
        .map(|group| group.children("forecast").map(parse_forecast).collect())
        .unwrap_or_default();

    let hourly: Vec<HourlyForecast> = root
        .find("hourlyForecastGroup")
        .map(|group| group.children("hourlyForecast").map(parse_hourly).collect())
        .unwrap_or_default();

    info!(
        "Weather data processed successfully: {} forecast periods, {} hourly entries.",
        forecasts.len(),
        hourly.len()
    );

    Ok(WeatherReport {
        current,
        forecasts,
        hourly,
    })
}

fn parse_current(root: FeedNode, conditions: FeedNode) -> CurrentConditions {
    CurrentConditions {
        observed: conditions
            .local_date_time("observation")
            .and_then(observation_stamp),
        location: root.find_text("location/name"),
        temperature: conditions.find_text("temperature"),
        wind_chill: conditions.find_text("windChill"),
        pressure: conditions.find_text("pressure"),
        humidity: conditions.find_text("relativeHumidity"),
        wind_speed: conditions.find_text("wind/speed"),
        wind_direction: conditions.find_text("wind/direction"),
        condition: conditions.find_text("condition"),
        icon_code: conditions.find_text("iconCode"),
        ..Default::default()
    }
}

/// Build the observation stamp from the year/month/day/hour/minute children.
fn observation_stamp(date_time: FeedNode) -> Option<NaiveDateTime> {
    let part = |name: &str| -> Option<u32> { date_time.find_text(name)?.parse().ok() };
    let year = date_time.find_text("year")?.parse::<i32>().ok()?;
    let stamp = NaiveDate::from_ymd_opt(year, part("month")?, part("day")?)
        .and_then(|d| d.and_hms_opt(part("hour")?, part("minute")?, 0));
    if stamp.is_none() {
        warn!("Observation dateTime present but not a valid date");
    }
    stamp
}

/// Warning descriptions joined with ", ", `None` when there are none.
fn parse_alerts(root: FeedNode) -> Option<String> {
    let warnings = root.find("warnings")?;
    let descriptions: Vec<&str> = warnings
        .children("event")
        .filter_map(|event| event.attr("description"))
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .collect();
    if descriptions.is_empty() {
        None
    } else {
        Some(descriptions.join(", "))
    }
}

fn rise_set_time(rise_set: FeedNode, name: &str) -> Option<String> {
    let summary = rise_set.local_date_time(name)?.find_text("textSummary")?;
    match parse_local_time_summary(&summary) {
        Some(time) => Some(format_time_of_day(time)),
        None => {
            debug!("Unreadable {} summary {:?}", name, summary);
            None
        }
    }
}

fn parse_forecast(forecast: FeedNode) -> ForecastPeriod {
    ForecastPeriod {
        period: forecast.find_text("period"),
        summary: forecast.find_text("cloudPrecip/textSummary"),
        temperature: forecast.find_text("temperatures/temperature"),
        precipitation_type: forecast.find_text("precipitation/precipType"),
        accumulation: forecast.find_text("precipitation/accumulation/amount"),
        pop: forecast.find_text("abbreviatedForecast/pop"),
        icon_code: forecast.find_text("abbreviatedForecast/iconCode"),
        wind_chill: forecast.find_text("windChill/calculated"),
    }
}

fn parse_hourly(hour: FeedNode) -> HourlyForecast {
    let time = hour.attr("dateTimeUTC").and_then(|utc| match utc_to_local(utc) {
        Ok(local) => Some(local),
        Err(e) => {
            warn!("Hourly entry kept without a time: {}", e);
            None
        }
    });
    HourlyForecast {
        time,
        temperature: hour.find_text("temperature"),
        lop: hour.find_text("lop"),
        icon_code: hour.find_text("iconCode"),
        wind_chill: hour.find_text("windChill"),
        uv_index: hour.find_text("uv/index"),
    }
}
