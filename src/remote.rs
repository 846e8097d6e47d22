//! Remote collaborators: the manifest service and the thumbnail service.
//!
//! The pipeline never talks to the network directly. It depends on two
//! traits, [`ManifestFetcher`] and [`FrameSource`], so callers can inject
//! their own transport (or an in-memory fake in tests). [`RemoteClient`]
//! implements both on top of a shared [`reqwest::Client`].

use async_trait::async_trait;
use image::DynamicImage;
use reqwest::{Client, StatusCode};

use crate::error::ThumbsError;

/// Fetches manifest documents as text.
#[async_trait]
pub trait ManifestFetcher: Send + Sync {
    /// GET `url` and return the body.
    ///
    /// Implementations must return [`ThumbsError::ManifestFetch`] for any
    /// non-200 response so the status reaches the caller unchanged.
    async fn fetch_text(&self, url: &str) -> Result<String, ThumbsError>;
}

/// Fetches and decodes one thumbnail image.
#[async_trait]
pub trait FrameSource: Send + Sync {
    /// GET `url` and decode the body into an image.
    async fn fetch_frame(&self, url: &str) -> Result<DynamicImage, ThumbsError>;
}

/// HTTP implementation of both collaborator traits.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Debug, Clone, Default)]
pub struct RemoteClient {
    client: Client,
}

impl RemoteClient {
    /// Create a client with reqwest's default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing, preconfigured [`reqwest::Client`].
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ManifestFetcher for RemoteClient {
    async fn fetch_text(&self, url: &str) -> Result<String, ThumbsError> {
        log::debug!("Fetching manifest {url}");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(ThumbsError::ManifestFetch {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.text().await?)
    }
}

#[async_trait]
impl FrameSource for RemoteClient {
    async fn fetch_frame(&self, url: &str) -> Result<DynamicImage, ThumbsError> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let bytes = response.bytes().await?;
        Ok(image::load_from_memory(&bytes)?)
    }
}
