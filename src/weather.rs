/*
 *  weather.rs
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

use chrono::NaiveDateTime;

/// Observation stamp layout, also the first column of the current history log.
pub const OBSERVED_FORMAT: &str = "%m/%d/%Y %H:%M";

/// Current conditions block of the feed.
///
/// Values are kept as the feed spells them; numeric parsing happens when a
/// value is drawn. A `None` means the document had no such node.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct CurrentConditions {
    pub observed: Option<NaiveDateTime>,
    pub location: Option<String>,
    pub temperature: Option<String>,
    pub wind_chill: Option<String>,
    pub pressure: Option<String>,
    pub humidity: Option<String>,
    pub wind_speed: Option<String>,
    pub wind_direction: Option<String>,
    pub condition: Option<String>,
    pub icon_code: Option<String>,
    pub sunrise: Option<String>,
    pub sunset: Option<String>,
    pub alerts: Option<String>,
}

/// One named period of the multi-day forecast ("Monday", "Monday night").
#[derive(Default, Debug, Clone, PartialEq)]
pub struct ForecastPeriod {
    pub period: Option<String>,
    pub summary: Option<String>,
    pub temperature: Option<String>,
    pub precipitation_type: Option<String>,
    pub accumulation: Option<String>,
    /// probability of precipitation, percent
    pub pop: Option<String>,
    pub icon_code: Option<String>,
    pub wind_chill: Option<String>,
}

/// One hour of the hourly forecast.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct HourlyForecast {
    /// local time, `MM/DD/YYYY hh:mm AM/PM`
    pub time: Option<String>,
    pub temperature: Option<String>,
    /// likelihood of precipitation, percent
    pub lop: Option<String>,
    pub icon_code: Option<String>,
    pub wind_chill: Option<String>,
    pub uv_index: Option<String>,
}

/// Everything one fetch yields, in document order.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub current: CurrentConditions,
    pub forecasts: Vec<ForecastPeriod>,
    pub hourly: Vec<HourlyForecast>,
}

fn cell(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

impl CurrentConditions {
    pub fn observed_stamp(&self) -> Option<String> {
        self.observed.map(|t| t.format(OBSERVED_FORMAT).to_string())
    }

    /// Row for `current_conditions_records.csv`.
    pub fn history_row(&self) -> Vec<String> {
        vec![
            self.observed_stamp().unwrap_or_default(),
            cell(&self.location),
            cell(&self.temperature),
            cell(&self.wind_chill),
            cell(&self.humidity),
            cell(&self.wind_speed),
            cell(&self.wind_direction),
            cell(&self.sunrise),
            cell(&self.sunset),
            cell(&self.pressure),
        ]
    }
}

impl HourlyForecast {
    /// Row for `hourly_forecast_records.csv`.
    pub fn history_row(&self) -> Vec<String> {
        vec![
            cell(&self.time),
            cell(&self.temperature),
            cell(&self.lop),
            cell(&self.wind_chill),
            cell(&self.uv_index),
        ]
    }
}

impl WeatherReport {
    /// Apply the display label: configured label first, then whatever the
    /// feed called the site, then `fallback`.
    pub fn label_location(&mut self, configured: Option<&str>, fallback: &str) {
        let label = configured
            .map(str::to_string)
            .or_else(|| self.current.location.take())
            .unwrap_or_else(|| fallback.to_string());
        self.current.location = Some(label);
    }
}
