/*
 *  feed.rs
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
use log::{error, info};
use reqwest::{Client, header};
use std::time::Duration;

use crate::citypage::decode_document;
use crate::error::FetchError;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), " v", env!("CARGO_PKG_VERSION"));

fn client() -> Result<Client, FetchError> {
    let mut headers = header::HeaderMap::new();
    headers.insert("Accept", header::HeaderValue::from_static("application/xml, text/xml"));
    headers.insert("Connection", header::HeaderValue::from_static("close"));

    Client::builder()
        .user_agent(USER_AGENT)
        .connect_timeout(Duration::from_secs(10))
        .default_headers(headers)
        .timeout(Duration::from_secs(30))
        .build()
        .map_err(FetchError::Client)
}

async fn get(url: &str) -> Result<String, FetchError> {
    let response = client()?
        .get(url)
        .send()
        .await
        .map_err(FetchError::Transport)?;

    let status = response.status();
    let response = response.error_for_status().map_err(|_| FetchError::Status {
        status,
        url: url.to_string(),
    })?;

    // decoded here rather than by reqwest so the prolog's encoding is honoured
    let body = response.bytes().await.map_err(FetchError::Transport)?;
    Ok(decode_document(&body))
}

/// Pull the citypage document body. One attempt, no retry.
pub async fn fetch_feed(url: &str) -> Result<String, FetchError> {
    match get(url).await {
        Ok(body) => {
            info!("Weather data fetched successfully.");
            Ok(body)
        }
        Err(e) => {
            error!("Failed to fetch weather data: {}", e);
            Err(e)
        }
    }
}
