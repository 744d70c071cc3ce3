/*
 *  icons.rs
 *
 *  PhotoGallery - responsive grid, banner aware
 *  (c) 2020-26 Stuart Hunter
 *
 *  Thumbnail url lookup for catalog items
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use log::{debug, info};
use mini_moka::sync::Cache;
use reqwest::{header, Client};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::catalog::MenuItem;

pub const DEFAULT_ICON_ENDPOINT: &str = "http://wko.boolint.com:8080/WeatherService/WeatherInfo/ThumbKr.jsp";
pub const DEFAULT_USER_AGENT: &str = "WeatherApp(Android)";

/// api option -> thumbnail url
pub type IconMap = HashMap<String, String>;

#[derive(Debug, Error)]
pub enum IconLookupError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("HTTP {0}")]
    Status(u16),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct ThumbResponse {
    #[serde(default)]
    files: Vec<ThumbFile>,
}

#[derive(Debug, Deserialize)]
struct ThumbFile {
    #[serde(default)]
    argument: String,
    #[serde(default)]
    url: String,
}

/// Build the lookup map from the thumbnail service body.
/// Entries missing either key are skipped; a body without `files` is empty.
pub fn parse_icon_map(body: &str) -> Result<IconMap, IconLookupError> {
    let resp: ThumbResponse = serde_json::from_str(body)?;
    Ok(resp
        .files
        .into_iter()
        .filter(|f| !f.argument.is_empty() && !f.url.is_empty())
        .map(|f| (f.argument, f.url))
        .collect())
}

/// Fill `icon_url` on every item whose api option has an entry.
/// Returns how many items were updated.
pub fn apply_icon_urls(items: &mut [MenuItem], map: &IconMap) -> usize {
    let mut updated = 0;
    for item in items.iter_mut() {
        if let Some(url) = map.get(&item.api_option) {
            item.icon_url = url.clone();
            updated += 1;
        }
    }
    updated
}

#[derive(Debug, Clone)]
pub struct IconClientOptions {
    pub endpoint: String,
    pub user_agent: String,
    pub connect_timeout: Duration,
    pub timeout: Duration,

    /// How long a fetched map is reused; the service rotates its image
    /// signatures every five minutes
    pub cache_ttl: Duration,
}

impl Default for IconClientOptions {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ICON_ENDPOINT.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            connect_timeout: Duration::from_secs(10),
            timeout: Duration::from_secs(15),
            cache_ttl: Duration::from_secs(300),
        }
    }
}

#[derive(Clone)]
pub struct IconClient {
    client: Client,
    endpoint: String,
    cache: Arc<Cache<String, Arc<IconMap>>>,
}

impl IconClient {
    pub fn new(options: &IconClientOptions) -> Result<Self, IconLookupError> {
        let mut headers = header::HeaderMap::new();
        if let Ok(ua) = header::HeaderValue::from_str(&options.user_agent) {
            headers.insert(header::USER_AGENT, ua);
        }
        headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .connect_timeout(options.connect_timeout)
            .default_headers(headers)
            .timeout(options.timeout)
            .build()?;

        let cache = Cache::builder()
            .max_capacity(8)
            .time_to_live(options.cache_ttl)
            .build();

        Ok(Self {
            client,
            endpoint: options.endpoint.clone(),
            cache: Arc::new(cache),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Map from the last successful fetch, while it is still fresh
    pub fn cached(&self) -> Option<Arc<IconMap>> {
        self.cache.get(&self.endpoint)
    }

    /// Cached map if fresh, otherwise fetch from the service
    pub async fn lookup(&self) -> Result<Arc<IconMap>, IconLookupError> {
        if let Some(map) = self.cached() {
            debug!("Icon urls served from cache ({} entries)", map.len());
            return Ok(map);
        }

        let response = self.client.get(&self.endpoint).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(IconLookupError::Status(status.as_u16()));
        }
        let body = response.text().await?;
        let map = Arc::new(parse_icon_map(&body)?);
        info!("Fetched {} icon urls from {}", map.len(), self.endpoint);
        self.cache.insert(self.endpoint.clone(), Arc::clone(&map));
        Ok(map)
    }
}
