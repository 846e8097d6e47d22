//! # stream-thumbs
//!
//! Generate scrubbing previews for hosted video streams: grid-packed sprite
//! sheets of thumbnail frames plus a WebVTT file mapping playback time to
//! sprite rectangles, from nothing but a stream identifier.
//!
//! A request runs as a short pipeline:
//!
//! 1. **Duration**: the stream's HLS master manifest is fetched, then its
//!    first variant playlist, and the segment durations are summed.
//! 2. **Layout**: for each requested [`FormatSpec`] a [`SamplingPlan`]
//!    decides the sampling interval, frame count, grid, and page count.
//! 3. **Frames**: one thumbnail per sampling interval is fetched from the
//!    thumbnail service, all concurrently.
//! 4. **Pages**: frames are center-cropped into grid cells and encoded as
//!    JPEG sprite pages.
//! 5. **Cues**: a WebVTT document addresses each frame's page and
//!    rectangle with `#xywh=` fragments.
//!
//! ## Quick Start
//!
//! ```no_run
//! use stream_thumbs::{PreviewOptions, ThumbsError};
//!
//! # async fn example() -> Result<(), ThumbsError> {
//! // One frame every 50 seconds, pages no larger than 800px.
//! let options = PreviewOptions::new()
//!     .with_seconds_per_frame(50.0)
//!     .with_max_square(800);
//!
//! let output = stream_thumbs::generate("5d5bc37ffcf54c9b82e996823bffbb81", &options).await?;
//! for format in output.into_vec() {
//!     format.save_all(".")?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Collaborators
//!
//! The pipeline reaches the outside world only through three traits:
//! [`ManifestFetcher`] and [`FrameSource`] (implemented over HTTP by
//! [`RemoteClient`]) and [`RenderBackend`] (implemented with the `image`
//! crate by [`ImageBackend`]). Supply your own through
//! [`PreviewGenerator::with_collaborators`].
//!
//! ### Optional Features
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `rayon` | Compose sprite pages in parallel |
//! | `full` | Enables all of the above |

pub mod artifact;
pub mod compositor;
pub mod configuration;
pub mod delivery;
pub mod duration;
pub mod error;
pub mod layout;
pub mod loader;
pub mod manifest;
pub mod naming;
pub mod pipeline;
pub mod progress;
pub mod remote;
pub mod render;
pub mod vtt;

pub use artifact::{ArtifactData, FormatResult, PreviewArtifact, PreviewOutput};
pub use compositor::{CropWindow, render_page, render_pages};
pub use configuration::{
    DEFAULT_JPEG_QUALITY, DEFAULT_MAX_SQUARE, DEFAULT_MIN_SECONDS_PER_FRAME, FormatSpec,
    PreviewOptions, default_formats,
};
pub use delivery::{DeliveryEndpoint, ThumbnailFit, ThumbnailRequest};
pub use duration::resolve_duration;
pub use error::ThumbsError;
pub use layout::{
    FramePlacement, SamplingPlan, derive_seconds_per_frame, plan_formats, plan_layout,
};
pub use loader::load_frames;
pub use naming::{page_file_name, vtt_file_name};
pub use pipeline::{OutputMode, PreviewGenerator, generate, generate_preview, generate_vtt};
pub use progress::{CancellationToken, OperationType, ProgressCallback, ProgressInfo};
pub use remote::{FrameSource, ManifestFetcher, RemoteClient};
pub use render::{ImageBackend, Rect, RenderBackend};
pub use vtt::{VttCue, render_vtt};
