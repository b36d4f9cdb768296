//! Remote photo source.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::photo::Photo;
use crate::config::SourceConfig;

/// Errors from fetching the photo list.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Transport failure (DNS, connect, timeout, TLS).
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Source answered with a non-success status.
    #[error("source returned HTTP {0}")]
    Status(reqwest::StatusCode),

    /// Body was not a JSON array of photos.
    #[error("malformed photo list: {0}")]
    Decode(#[from] serde_json::Error),

    /// Source is unavailable for another reason.
    #[error("source unavailable: {0}")]
    Unavailable(String),
}

/// Something that can produce the full, ordered photo list.
#[async_trait]
pub trait PhotoSource: Send + Sync {
    /// Fetch the whole list. Every call is a full refresh.
    async fn fetch(&self) -> Result<Vec<Photo>, FetchError>;
}

/// Photo source backed by an HTTP JSON endpoint.
pub struct HttpPhotoSource {
    client: reqwest::Client,
    url: String,
    limit: usize,
}

impl HttpPhotoSource {
    /// Build a source from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &SourceConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            url: config.url(),
            limit: config.limit,
        })
    }

    /// Endpoint this source reads from.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl PhotoSource for HttpPhotoSource {
    async fn fetch(&self) -> Result<Vec<Photo>, FetchError> {
        tracing::debug!(url = %self.url, "fetching photos");

        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response.bytes().await?;
        let mut photos: Vec<Photo> = serde_json::from_slice(&body)?;
        if self.limit > 0 {
            photos.truncate(self.limit);
        }

        tracing::info!(count = photos.len(), "fetched photos");
        Ok(photos)
    }
}

/// In-memory source returning a fixed list or a fixed failure.
///
/// Counts fetches so callers can tell whether a view re-fetched.
pub struct FixedPhotoSource {
    result: Mutex<Result<Vec<Photo>, String>>,
    fetches: AtomicUsize,
}

impl FixedPhotoSource {
    /// Source that always returns `photos`.
    #[must_use]
    pub fn new(photos: Vec<Photo>) -> Self {
        Self {
            result: Mutex::new(Ok(photos)),
            fetches: AtomicUsize::new(0),
        }
    }

    /// Source that always fails with `reason`.
    #[must_use]
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            result: Mutex::new(Err(reason.into())),
            fetches: AtomicUsize::new(0),
        }
    }

    /// Replace the list returned by subsequent fetches.
    pub fn set_photos(&self, photos: Vec<Photo>) {
        *self.result.lock() = Ok(photos);
    }

    /// Make subsequent fetches fail.
    pub fn fail(&self, reason: impl Into<String>) {
        *self.result.lock() = Err(reason.into());
    }

    /// Number of fetches served so far.
    #[must_use]
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PhotoSource for FixedPhotoSource {
    async fn fetch(&self) -> Result<Vec<Photo>, FetchError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.result.lock().clone().map_err(FetchError::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::photo::photo;

    #[tokio::test]
    async fn fixed_source_serves_and_counts() {
        let source = FixedPhotoSource::new(vec![photo(1, 1, "a")]);
        assert_eq!(source.fetch().await.unwrap().len(), 1);
        assert_eq!(source.fetch_count(), 1);

        source.fail("offline");
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, FetchError::Unavailable(ref r) if r == "offline"));
        assert_eq!(source.fetch_count(), 2);
    }

    #[test]
    fn http_source_uses_configured_url() {
        let config = SourceConfig {
            url: Some("http://127.0.0.1:9/photos".to_string()),
            ..SourceConfig::default()
        };
        let source = HttpPhotoSource::new(&config).unwrap();
        assert_eq!(source.url(), "http://127.0.0.1:9/photos");
    }
}
