//! HTTP access to the song server.
//!
//! Two endpoints are consumed: `GET /songs` for the listing and
//! `GET /stream/{title}` as the audio source handed to the player.

use std::time::Duration;

use thiserror::Error;

use crate::config::ServerSettings;

use super::model::Track;

/// Failure while loading the track listing.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("server answered with status {0}")]
    Status(u16),
    #[error("malformed song listing: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Something that can produce the ordered track listing.
pub trait SongService {
    fn list_songs(&self) -> Result<Vec<Track>, FetchError>;
}

/// URL builder for the server endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base_url: String,
    encode_titles: bool,
}

impl Endpoints {
    pub fn new(base_url: &str, encode_titles: bool) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            encode_titles,
        }
    }

    pub fn from_settings(server: &ServerSettings) -> Self {
        Self::new(&server.base_url, server.encode_titles)
    }

    /// Listing endpoint.
    pub fn songs(&self) -> String {
        format!("{}/songs", self.base_url)
    }

    /// Streaming endpoint for `title`.
    ///
    /// The title goes into the path as-is unless `encode_titles` is set, in
    /// which case reserved characters (`/`, `?`, `#`, ...) are percent-encoded.
    pub fn stream(&self, title: &str) -> String {
        if self.encode_titles {
            format!("{}/stream/{}", self.base_url, urlencoding::encode(title))
        } else {
            format!("{}/stream/{}", self.base_url, title)
        }
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::from_settings(&ServerSettings::default())
    }
}

/// Parse the JSON body returned by `/songs`.
pub fn parse_listing(body: &[u8]) -> Result<Vec<Track>, FetchError> {
    Ok(serde_json::from_slice(body)?)
}

/// Blocking HTTP client for the song server.
pub struct HttpLibrary {
    client: reqwest::blocking::Client,
    endpoints: Endpoints,
}

impl HttpLibrary {
    pub fn new(server: &ServerSettings) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(server.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoints: Endpoints::from_settings(server),
        })
    }
}

impl SongService for HttpLibrary {
    fn list_songs(&self) -> Result<Vec<Track>, FetchError> {
        let url = self.endpoints.songs();
        tracing::debug!(%url, "fetching song listing");

        let response = self.client.get(&url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.bytes()?;
        let tracks = parse_listing(&body)?;
        tracing::info!(count = tracks.len(), "song listing loaded");
        Ok(tracks)
    }
}
