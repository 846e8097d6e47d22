//! URL templates for the remote delivery service.
//!
//! The delivery service exposes two resources per stream: HLS manifests
//! under `{base}/{id}/manifest/` and on-demand thumbnails under
//! `{base}/{id}/thumbnails/thumbnail.{jpg|gif}`. [`DeliveryEndpoint`] owns
//! the service root so tests and mirrors can point the pipeline elsewhere,
//! and [`ThumbnailRequest`] renders thumbnail URLs with only the parameters
//! that were actually set.
//!
//! # Example
//!
//! ```
//! use stream_thumbs::{DeliveryEndpoint, ThumbnailFit, ThumbnailRequest};
//!
//! let endpoint = DeliveryEndpoint::default();
//! let url = ThumbnailRequest::at_seconds(12.5)
//!     .with_height(180)
//!     .with_fit(ThumbnailFit::Crop)
//!     .url(&endpoint, "abc123");
//! assert_eq!(
//!     url,
//!     "https://videodelivery.net/abc123/thumbnails/thumbnail.jpg?time=12.5s&height=180&fit=crop",
//! );
//! ```

use std::fmt::{Display, Formatter, Result as FmtResult};

/// Root URL of the public delivery service.
pub const DEFAULT_DELIVERY_BASE: &str = "https://videodelivery.net";

/// File name of the master playlist every stream exposes.
pub const MASTER_MANIFEST_NAME: &str = "video.m3u8";

/// The service root that manifests and thumbnails are fetched from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryEndpoint {
    base: String,
}

impl Default for DeliveryEndpoint {
    fn default() -> Self {
        Self::new(DEFAULT_DELIVERY_BASE)
    }
}

impl DeliveryEndpoint {
    /// Use `base` (e.g. `"http://127.0.0.1:8080"`) as the service root.
    ///
    /// A trailing slash is ignored.
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    /// The service root without a trailing slash.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// URL of the stream's master manifest.
    pub fn master_manifest_url(&self, stream_id: &str) -> String {
        self.manifest_url(stream_id, MASTER_MANIFEST_NAME)
    }

    /// URL of a manifest relative to the stream's manifest directory.
    ///
    /// Variant URIs listed in the master playlist are resolved through this.
    pub fn manifest_url(&self, stream_id: &str, endpoint: &str) -> String {
        format!("{}/{stream_id}/manifest/{endpoint}", self.base)
    }
}

/// How the thumbnail service fits the source frame into the requested box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThumbnailFit {
    /// Fill the box, cropping the overflow.
    Crop,
    /// Fit inside the box without upscaling.
    Clip,
    /// Stretch to the box.
    Scale,
    /// Fit inside the box and pad the remainder.
    Fill,
}

impl Display for ThumbnailFit {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ThumbnailFit::Crop => write!(f, "crop"),
            ThumbnailFit::Clip => write!(f, "clip"),
            ThumbnailFit::Scale => write!(f, "scale"),
            ThumbnailFit::Fill => write!(f, "fill"),
        }
    }
}

/// Parameters for one thumbnail URL.
///
/// Unset parameters are left out of the query string. Setting an animation
/// duration switches the resource from a JPEG still to an animated GIF.
#[derive(Debug, Clone, Default, PartialEq)]
#[must_use]
pub struct ThumbnailRequest {
    /// Position in the video, in the service's syntax (`"8s"`, `"1h2m3s"`).
    pub time: Option<String>,
    /// Output height in pixels.
    pub height: Option<u32>,
    /// Output width in pixels.
    pub width: Option<u32>,
    /// Fit mode.
    pub fit: Option<ThumbnailFit>,
    /// Animation length (animated thumbnails only), e.g. `"5s"`.
    pub duration: Option<String>,
    /// Animation frame rate (animated thumbnails only).
    pub fps: Option<u32>,
}

impl ThumbnailRequest {
    /// A request with no parameters set.
    pub fn new() -> Self {
        Self::default()
    }

    /// A still at `seconds` into the video.
    pub fn at_seconds(seconds: f64) -> Self {
        Self::new().with_time(format!("{seconds}s"))
    }

    /// Set the position using the service's time syntax.
    pub fn with_time(mut self, time: impl Into<String>) -> Self {
        self.time = Some(time.into());
        self
    }

    /// Set the output height.
    pub fn with_height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    /// Set the output width.
    pub fn with_width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    /// Set the fit mode.
    pub fn with_fit(mut self, fit: ThumbnailFit) -> Self {
        self.fit = Some(fit);
        self
    }

    /// Request an animated GIF of the given length.
    pub fn with_duration(mut self, duration: impl Into<String>) -> Self {
        self.duration = Some(duration.into());
        self
    }

    /// Set the animation frame rate.
    pub fn with_fps(mut self, fps: u32) -> Self {
        self.fps = Some(fps);
        self
    }

    /// `true` when this request yields an animated GIF.
    pub fn is_animated(&self) -> bool {
        self.duration.is_some()
    }

    /// Render the full URL for `stream_id`.
    pub fn url(&self, endpoint: &DeliveryEndpoint, stream_id: &str) -> String {
        let extension = if self.is_animated() { "gif" } else { "jpg" };
        let resource = format!(
            "{}/{stream_id}/thumbnails/thumbnail.{extension}",
            endpoint.base()
        );

        let params: Vec<String> = [
            ("time", self.time.clone()),
            ("height", self.height.map(|v| v.to_string())),
            ("width", self.width.map(|v| v.to_string())),
            ("fit", self.fit.map(|v| v.to_string())),
            ("duration", self.duration.clone()),
            ("fps", self.fps.map(|v| v.to_string())),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|value| format!("{key}={value}")))
        .collect();

        if params.is_empty() {
            resource
        } else {
            format!("{resource}?{}", params.join("&"))
        }
    }
}
