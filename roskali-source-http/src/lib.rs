//! Bin source backed by a JSON telemetry feed over HTTP.
//!
//! Expects a feed exposing `GET {base_url}/bins` returning
//! `{"taken_at": "...", "data": [{"id": "...", "lat": .., "lon": .., "fill_level": ..}]}`.
//! `taken_at` is optional; when the feed omits it the snapshot is stamped
//! with the fetch time.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use roskali_core::{
    model::{BinId, BinRecord, BinSnapshot, SourceId, SourceMeta},
    plugin::SourcePlugin,
    ports::{BinSource, PortError},
};

/// Response wrapper from /bins
#[derive(Debug, Deserialize)]
struct BinsResponse {
    #[serde(default)]
    taken_at: Option<DateTime<Utc>>,
    data: Vec<BinEntry>,
}

/// Single bin reading from /bins
#[derive(Debug, Deserialize)]
struct BinEntry {
    id: String,
    lat: f64,
    lon: f64,
    fill_level: f64,
}

/// Configuration for one telemetry feed.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Stable identifier for this feed (used as the source id).
    pub id: String,
    /// Display name shown for this source.
    pub name: String,
    /// Base URL of the feed, without a trailing slash.
    pub base_url: String,
}

/// Bin source that fetches snapshots from a telemetry feed.
pub struct HttpSource {
    client: Client,
    meta: SourceMeta,
    base_url: String,
}

impl HttpSource {
    /// Create a new source bound to the given HTTP client and feed.
    #[must_use]
    pub fn new(client: Client, config: FeedConfig) -> Self {
        Self {
            client,
            meta: source_meta(&config),
            base_url: config.base_url,
        }
    }
}

#[async_trait]
impl BinSource for HttpSource {
    fn source(&self) -> &SourceMeta {
        &self.meta
    }

    async fn snapshot(&self) -> Result<BinSnapshot, PortError> {
        let req = self.client.get(format!("{}/bins", self.base_url));
        let resp = fetch_json::<BinsResponse>(req).await?;

        let bins = resp.data.into_iter().map(to_record).collect();

        Ok(BinSnapshot {
            taken_at: resp.taken_at.unwrap_or_else(Utc::now),
            bins,
        })
    }
}

/// Build the plugin bundle for a telemetry feed.
#[must_use]
pub fn plugin(client: Client, config: FeedConfig) -> SourcePlugin {
    let meta = source_meta(&config);
    SourcePlugin {
        meta,
        bin_source: Arc::new(HttpSource::new(client, config)),
    }
}

fn source_meta(config: &FeedConfig) -> SourceMeta {
    SourceMeta {
        id: SourceId(config.id.clone()),
        name: config.name.clone(),
    }
}

fn to_record(entry: BinEntry) -> BinRecord {
    BinRecord {
        id: BinId(entry.id),
        latitude: entry.lat,
        longitude: entry.lon,
        fill_level: entry.fill_level,
    }
}

// Small helper to fetch and decode JSON with status handling.
async fn fetch_json<T: DeserializeOwned>(req: RequestBuilder) -> Result<T, PortError> {
    req.send()
        .await
        .map_err(PortError::from)?
        .error_for_status()
        .map_err(PortError::from)?
        .json()
        .await
        .map_err(PortError::from)
}
