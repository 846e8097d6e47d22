//! Request orchestration.
//!
//! [`PreviewGenerator`] runs one request end to end: resolve the duration
//! once, plan every requested format, then load frames and compose pages,
//! emit VTT cues, or both, depending on the [`OutputMode`]. The generator
//! holds only its collaborators; all request state lives on the stack of a
//! single call.
//!
//! # Example
//!
//! ```no_run
//! use stream_thumbs::{PreviewGenerator, PreviewOptions, PreviewOutput, ThumbsError};
//!
//! # async fn example() -> Result<(), ThumbsError> {
//! let generator = PreviewGenerator::new();
//! let options = PreviewOptions::new().with_size(160, 90);
//! if let PreviewOutput::Single(result) = generator.generate("abc123", &options).await? {
//!     result.save_all("previews")?;
//! }
//! # Ok(())
//! # }
//! ```

use crate::artifact::{FormatResult, PreviewOutput};
use crate::compositor::render_pages;
use crate::configuration::PreviewOptions;
use crate::duration::resolve_duration;
use crate::error::ThumbsError;
use crate::layout::plan_formats;
use crate::loader::load_frames;
use crate::remote::{FrameSource, ManifestFetcher, RemoteClient};
use crate::render::{ImageBackend, RenderBackend};
use crate::vtt::render_vtt;

/// Which artifacts a request produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Sprite pages only.
    Preview,
    /// The VTT document only. No frames are fetched.
    Vtt,
    /// The VTT document followed by sprite pages.
    #[default]
    Both,
}

impl OutputMode {
    fn includes_pages(self) -> bool {
        matches!(self, OutputMode::Preview | OutputMode::Both)
    }

    fn includes_vtt(self) -> bool {
        matches!(self, OutputMode::Vtt | OutputMode::Both)
    }
}

/// Runs preview requests against a set of collaborators.
///
/// `M` fetches manifests, `S` fetches frames, `B` draws and encodes pages.
/// [`PreviewGenerator::new`] wires the HTTP client and the `image` backend.
#[derive(Debug, Clone)]
pub struct PreviewGenerator<M = RemoteClient, S = RemoteClient, B = ImageBackend> {
    manifests: M,
    frames: S,
    backend: B,
}

impl PreviewGenerator {
    /// A generator that talks HTTP and renders with the `image` crate.
    pub fn new() -> Self {
        let client = RemoteClient::new();
        Self::with_collaborators(client.clone(), client, ImageBackend::new())
    }
}

impl Default for PreviewGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl<M, S, B> PreviewGenerator<M, S, B>
where
    M: ManifestFetcher,
    S: FrameSource,
    B: RenderBackend,
{
    /// A generator over caller-supplied collaborators.
    pub fn with_collaborators(manifests: M, frames: S, backend: B) -> Self {
        Self {
            manifests,
            frames,
            backend,
        }
    }

    /// Produce sprite pages and VTT cues for every requested format.
    ///
    /// # Errors
    ///
    /// Any error from duration resolution, planning, frame loading, or
    /// composition. A failure yields no partial output.
    pub async fn generate(
        &self,
        stream_id: &str,
        options: &PreviewOptions,
    ) -> Result<PreviewOutput, ThumbsError> {
        self.generate_with_mode(stream_id, options, OutputMode::Both)
            .await
    }

    /// Produce sprite pages only.
    ///
    /// # Errors
    ///
    /// Same as [`generate`](Self::generate).
    pub async fn generate_preview(
        &self,
        stream_id: &str,
        options: &PreviewOptions,
    ) -> Result<PreviewOutput, ThumbsError> {
        self.generate_with_mode(stream_id, options, OutputMode::Preview)
            .await
    }

    /// Produce VTT documents only. No frames are fetched.
    ///
    /// # Errors
    ///
    /// Any error from duration resolution or planning.
    pub async fn generate_vtt(
        &self,
        stream_id: &str,
        options: &PreviewOptions,
    ) -> Result<PreviewOutput, ThumbsError> {
        self.generate_with_mode(stream_id, options, OutputMode::Vtt)
            .await
    }

    /// Resolve the duration, then render in the given mode.
    ///
    /// # Errors
    ///
    /// [`ThumbsError::Configuration`] for an empty stream id, then any error
    /// from [`render`](Self::render).
    pub async fn generate_with_mode(
        &self,
        stream_id: &str,
        options: &PreviewOptions,
        mode: OutputMode,
    ) -> Result<PreviewOutput, ThumbsError> {
        if stream_id.trim().is_empty() {
            return Err(ThumbsError::Configuration("stream id required".into()));
        }
        let duration = resolve_duration(&self.manifests, &options.endpoint, stream_id).await?;
        self.render(stream_id, duration, options, mode).await
    }

    /// Render a stream whose duration is already known.
    ///
    /// Frames are fetched once per request, at the tallest requested cell
    /// height, and shared by every format: all formats sample the same
    /// timestamps.
    ///
    /// # Errors
    ///
    /// Planning, frame loading, and composition errors.
    pub async fn render(
        &self,
        stream_id: &str,
        duration: f64,
        options: &PreviewOptions,
        mode: OutputMode,
    ) -> Result<PreviewOutput, ThumbsError> {
        if stream_id.trim().is_empty() {
            return Err(ThumbsError::Configuration("stream id required".into()));
        }
        let plans = plan_formats(duration, options)?;
        log::debug!(
            "Rendering {stream_id} ({duration:.3}s) in {mode:?} mode for {} formats",
            plans.len()
        );

        let frames = match plans.first() {
            Some((_, plan)) if mode.includes_pages() => {
                let height = plans
                    .iter()
                    .map(|(format, _)| format.height)
                    .max()
                    .unwrap_or_default();
                load_frames(&self.frames, stream_id, plan, height, options).await?
            }
            _ => Vec::new(),
        };

        let mut results = Vec::with_capacity(plans.len());
        for (format, plan) in plans {
            let mut content = Vec::with_capacity(plan.page_count as usize + 1);
            if mode.includes_vtt() {
                content.push(render_vtt(&plan, &format, stream_id));
            }
            if mode.includes_pages() {
                content.extend(render_pages(
                    &self.backend,
                    &plan,
                    &format,
                    stream_id,
                    &frames,
                    options,
                )?);
            }
            results.push(FormatResult {
                format,
                plan,
                duration,
                stream_id: stream_id.to_string(),
                content,
            });
        }

        Ok(PreviewOutput::from_results(results))
    }
}

/// Sprite pages and VTT cues over HTTP with the default backend.
///
/// # Errors
///
/// See [`PreviewGenerator::generate`].
pub async fn generate(
    stream_id: &str,
    options: &PreviewOptions,
) -> Result<PreviewOutput, ThumbsError> {
    PreviewGenerator::new().generate(stream_id, options).await
}

/// Sprite pages only, over HTTP with the default backend.
///
/// # Errors
///
/// See [`PreviewGenerator::generate_preview`].
pub async fn generate_preview(
    stream_id: &str,
    options: &PreviewOptions,
) -> Result<PreviewOutput, ThumbsError> {
    PreviewGenerator::new()
        .generate_preview(stream_id, options)
        .await
}

/// VTT documents only, over HTTP.
///
/// # Errors
///
/// See [`PreviewGenerator::generate_vtt`].
pub async fn generate_vtt(
    stream_id: &str,
    options: &PreviewOptions,
) -> Result<PreviewOutput, ThumbsError> {
    PreviewGenerator::new().generate_vtt(stream_id, options).await
}
