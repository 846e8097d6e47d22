//! Error types for the `stream-thumbs` crate.
//!
//! This module defines [`ThumbsError`], the unified error type returned by all
//! fallible operations in the crate. Errors carry enough context to tell
//! which pipeline stage failed: manifest URLs and status codes, the sampled
//! timestamp of a frame, or the offending configuration value.

use std::io::Error as IoError;

use image::ImageError;
use thiserror::Error;

/// The unified error type for all `stream-thumbs` operations.
///
/// Every public method that can fail returns `Result<T, ThumbsError>`.
/// None of these are recovered internally: a manifest error fails the whole
/// request, a frame or composition error fails the format being rendered.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ThumbsError {
    /// The manifest service answered with a non-success status.
    #[error("Manifest request to {url} failed with status {status}")]
    ManifestFetch {
        /// The manifest URL that was requested.
        url: String,
        /// HTTP status code returned by the service.
        status: u16,
    },

    /// A manifest was fetched but its structure was not usable.
    #[error("Failed to parse manifest: {0}")]
    ManifestParse(String),

    /// A sampled frame could not be fetched or decoded.
    ///
    /// Frame loading is all-or-nothing, so a single failure fails every
    /// frame of the request.
    #[error("Failed to load frame at {time:.3}s: {reason}")]
    FrameFetch {
        /// Sampled timestamp of the failed frame, in seconds.
        time: f64,
        /// Underlying reason the request failed.
        reason: String,
    },

    /// Drawing into or encoding a sprite page failed.
    #[error("Failed to compose sprite page: {0}")]
    Composition(String),

    /// The request or its options are unusable (missing stream id,
    /// a format larger than the page bound, a non-positive interval).
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// The operation was cancelled via a [`CancellationToken`](crate::CancellationToken).
    #[error("Operation cancelled")]
    Cancelled,

    /// A transport-level HTTP failure (connection, TLS, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// An error from the `image` crate.
    #[error("Image processing error: {0}")]
    Image(#[from] ImageError),

    /// An I/O error occurred while writing artifacts.
    #[error("I/O error: {0}")]
    Io(#[from] IoError),
}
