//! Preview generation options.
//!
//! [`PreviewOptions`] is a builder that carries the sampling constraints,
//! output formats, encoding quality, and operational settings (progress,
//! cancellation, service endpoint) through the pipeline. Every default is a
//! named constant so per-call overrides can be reasoned about in isolation.
//!
//! # Example
//!
//! ```
//! use stream_thumbs::{FormatSpec, PreviewOptions};
//!
//! let options = PreviewOptions::new()
//!     .with_seconds_per_frame(50.0)
//!     .with_max_square(800)
//!     .with_formats(vec![FormatSpec::new(320, 180).with_prefix("@2x")]);
//! assert_eq!(options.max_square(), 800);
//! ```

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use crate::delivery::DeliveryEndpoint;
use crate::progress::{CancellationToken, NoOpProgress, ProgressCallback};

/// Upper bound, in pixels, on each side of one composited page.
pub const DEFAULT_MAX_SQUARE: u32 = 2000;

/// Lower bound on the automatically chosen sampling interval, in seconds.
pub const DEFAULT_MIN_SECONDS_PER_FRAME: f64 = 2.0;

/// JPEG quality (0-100) used for sprite pages.
pub const DEFAULT_JPEG_QUALITY: u8 = 40;

/// One output geometry: the size of each thumbnail cell plus an optional
/// file-name prefix.
///
/// Every requested format gets its own [`SamplingPlan`](crate::SamplingPlan),
/// sprite pages, and VTT file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatSpec {
    /// Cell width in pixels.
    pub width: u32,
    /// Cell height in pixels.
    pub height: u32,
    /// Inserted between the stream id and the page suffix in file names
    /// (e.g. `"@2x"`).
    pub prefix: Option<String>,
}

impl FormatSpec {
    /// Create a format with the given cell size and no prefix.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            prefix: None,
        }
    }

    /// Set the file-name prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// The prefix, or an empty string when none is set.
    pub fn prefix_str(&self) -> &str {
        self.prefix.as_deref().unwrap_or("")
    }
}

/// The formats used when the caller does not request any: a 320×180 `@2x`
/// sheet and a 144×120 sheet.
pub fn default_formats() -> Vec<FormatSpec> {
    vec![
        FormatSpec::new(320, 180).with_prefix("@2x"),
        FormatSpec::new(144, 120),
    ]
}

/// Options for a preview generation request.
///
/// All fields have defaults; a default-constructed value samples
/// automatically, bounds pages at [`DEFAULT_MAX_SQUARE`], renders the
/// [`default_formats`], and talks to the public delivery service.
#[derive(Clone)]
pub struct PreviewOptions {
    /// Fixed sampling interval. `None` derives it from the duration.
    pub(crate) seconds_per_frame: Option<f64>,
    /// Floor applied to the derived sampling interval.
    pub(crate) min_seconds_per_frame: f64,
    /// Page bound in pixels.
    pub(crate) max_square: u32,
    /// Requested formats. `None` means [`default_formats`].
    pub(crate) formats: Option<Vec<FormatSpec>>,
    /// JPEG quality for sprite pages.
    pub(crate) jpeg_quality: u8,
    /// Where manifests and thumbnails are fetched from.
    pub(crate) endpoint: DeliveryEndpoint,
    /// Progress callback. Defaults to a no-op.
    pub(crate) progress: Arc<dyn ProgressCallback>,
    /// Cancellation token. `None` means never cancelled.
    pub(crate) cancellation: Option<CancellationToken>,
    /// How often to fire the progress callback (every N items).
    pub(crate) batch_size: u64,
}

impl Debug for PreviewOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("PreviewOptions")
            .field("seconds_per_frame", &self.seconds_per_frame)
            .field("min_seconds_per_frame", &self.min_seconds_per_frame)
            .field("max_square", &self.max_square)
            .field("formats", &self.formats)
            .field("jpeg_quality", &self.jpeg_quality)
            .field("endpoint", &self.endpoint)
            .field("has_cancellation", &self.cancellation.is_some())
            .field("batch_size", &self.batch_size)
            .finish()
    }
}

impl Default for PreviewOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl PreviewOptions {
    /// Create options with every default applied.
    pub fn new() -> Self {
        Self {
            seconds_per_frame: None,
            min_seconds_per_frame: DEFAULT_MIN_SECONDS_PER_FRAME,
            max_square: DEFAULT_MAX_SQUARE,
            formats: None,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            endpoint: DeliveryEndpoint::default(),
            progress: Arc::new(NoOpProgress),
            cancellation: None,
            batch_size: 1,
        }
    }

    /// Sample one frame every `seconds` instead of deriving the interval.
    #[must_use]
    pub fn with_seconds_per_frame(mut self, seconds: f64) -> Self {
        self.seconds_per_frame = Some(seconds);
        self
    }

    /// Set the floor for the derived sampling interval.
    ///
    /// Ignored when [`with_seconds_per_frame`](Self::with_seconds_per_frame)
    /// is set.
    #[must_use]
    pub fn with_min_seconds_per_frame(mut self, seconds: f64) -> Self {
        self.min_seconds_per_frame = seconds;
        self
    }

    /// Bound each side of a composited page to `pixels`.
    #[must_use]
    pub fn with_max_square(mut self, pixels: u32) -> Self {
        self.max_square = pixels;
        self
    }

    /// Render exactly these formats.
    #[must_use]
    pub fn with_formats(mut self, formats: Vec<FormatSpec>) -> Self {
        self.formats = Some(formats);
        self
    }

    /// Render a single format.
    #[must_use]
    pub fn with_format(self, format: FormatSpec) -> Self {
        self.with_formats(vec![format])
    }

    /// Shorthand for a single unprefixed `width`×`height` format.
    #[must_use]
    pub fn with_size(self, width: u32, height: u32) -> Self {
        self.with_format(FormatSpec::new(width, height))
    }

    /// Set the JPEG quality (clamped to 1-100).
    #[must_use]
    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }

    /// Fetch manifests and thumbnails from a different service root.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: DeliveryEndpoint) -> Self {
        self.endpoint = endpoint;
        self
    }

    /// Attach a progress callback.
    #[must_use]
    pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = callback;
        self
    }

    /// Attach a cancellation token.
    ///
    /// When the token is cancelled, frame loading and page composition stop
    /// and return [`ThumbsError::Cancelled`](crate::ThumbsError::Cancelled).
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Set how often the progress callback fires. Clamped to a minimum of 1.
    #[must_use]
    pub fn with_batch_size(mut self, size: u64) -> Self {
        self.batch_size = size.max(1);
        self
    }

    /// The fixed sampling interval, if one was set.
    pub fn seconds_per_frame(&self) -> Option<f64> {
        self.seconds_per_frame
    }

    /// The floor for the derived sampling interval.
    pub fn min_seconds_per_frame(&self) -> f64 {
        self.min_seconds_per_frame
    }

    /// The page bound in pixels.
    pub fn max_square(&self) -> u32 {
        self.max_square
    }

    /// The JPEG quality for sprite pages.
    pub fn jpeg_quality(&self) -> u8 {
        self.jpeg_quality
    }

    /// The service endpoint.
    pub fn endpoint(&self) -> &DeliveryEndpoint {
        &self.endpoint
    }

    /// The formats this request renders, with defaults applied.
    pub fn resolved_formats(&self) -> Vec<FormatSpec> {
        self.formats.clone().unwrap_or_else(default_formats)
    }

    /// Returns `true` if cancellation has been requested.
    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(|token| token.is_cancelled())
    }
}
