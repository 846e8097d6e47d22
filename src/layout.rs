//! Frame sampling and page layout.
//!
//! A [`SamplingPlan`] is a pure function of the stream duration, the
//! request options, and one [`FormatSpec`]. It decides how often to sample,
//! how many frames that yields, and how those frames are packed into
//! grid pages. Both the compositor and the VTT emitter address frames
//! exclusively through [`SamplingPlan::placement`], so the pixels drawn and
//! the rectangles referenced by cues cannot drift apart.
//!
//! # Example
//!
//! ```
//! use stream_thumbs::{FormatSpec, PreviewOptions, plan_layout};
//!
//! let options = PreviewOptions::new().with_max_square(800);
//! let plan = plan_layout(125.0, &options, &FormatSpec::new(320, 180))?;
//! assert_eq!((plan.frames_across, plan.frames_down), (2, 4));
//! assert_eq!(plan.frames_per_page, 8);
//! # Ok::<(), stream_thumbs::ThumbsError>(())
//! ```

use std::ops::Range;

use crate::configuration::{FormatSpec, PreviewOptions};
use crate::error::ThumbsError;

/// Largest page side a baseline JPEG can hold.
pub const MAX_PAGE_SIDE: u32 = u16::MAX as u32;

/// How a stream is sliced into thumbnails and packed into pages for one
/// format.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct SamplingPlan {
    /// Length of each sampling interval, in seconds.
    pub seconds_per_frame: f64,
    /// Number of sampled frames: `floor(duration / seconds_per_frame)`.
    pub frame_count: u32,
    /// Grid columns per page.
    pub frames_across: u32,
    /// Grid rows per page.
    pub frames_down: u32,
    /// `frames_across * frames_down`.
    pub frames_per_page: u32,
    /// `ceil(frame_count / frames_per_page)`; zero when there are no frames.
    pub page_count: u32,
    /// Width of one grid cell in pixels.
    pub cell_width: u32,
    /// Height of one grid cell in pixels.
    pub cell_height: u32,
}

/// Where one sampled frame lives in the sprite output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramePlacement {
    /// Zero-based page index.
    pub page: u32,
    /// Cell index within the page.
    pub cell: u32,
    /// Left edge of the cell in page pixels.
    pub x: u32,
    /// Top edge of the cell in page pixels.
    pub y: u32,
    /// Cell width.
    pub width: u32,
    /// Cell height.
    pub height: u32,
}

impl SamplingPlan {
    /// Pixel size of one page, `(frames_across * width, frames_down * height)`.
    ///
    /// Every page, including a partially filled last one, has this size.
    pub fn page_dimensions(&self) -> (u32, u32) {
        (
            self.frames_across * self.cell_width,
            self.frames_down * self.cell_height,
        )
    }

    /// Timestamp to sample for frame `index`: the midpoint of its interval.
    pub fn sample_time(&self, index: u32) -> f64 {
        (index as f64 + 0.5) * self.seconds_per_frame
    }

    /// Sample timestamps of every frame, in order.
    pub fn sample_times(&self) -> Vec<f64> {
        (0..self.frame_count).map(|i| self.sample_time(i)).collect()
    }

    /// End of frame `index`'s interval, in seconds.
    pub fn interval_end(&self, index: u32) -> f64 {
        (index as f64 + 1.0) * self.seconds_per_frame
    }

    /// Page, cell, and pixel rectangle of frame `index`.
    pub fn placement(&self, index: u32) -> FramePlacement {
        let page = index / self.frames_per_page;
        let cell = index % self.frames_per_page;
        FramePlacement {
            page,
            cell,
            x: (index % self.frames_across) * self.cell_width,
            y: ((index / self.frames_across) % self.frames_down) * self.cell_height,
            width: self.cell_width,
            height: self.cell_height,
        }
    }

    /// Frame indices drawn on `page`.
    ///
    /// Empty for pages at or past [`page_count`](Self::page_count).
    pub fn page_frames(&self, page: u32) -> Range<u32> {
        let start = page.saturating_mul(self.frames_per_page).min(self.frame_count);
        let end = start.saturating_add(self.frames_per_page).min(self.frame_count);
        start..end
    }
}

/// The sampling interval for `duration` under `options`.
///
/// A caller-supplied interval wins. Otherwise the interval grows by half a
/// second per full minute of video, starting at one second, and never drops
/// below the configured minimum.
pub fn derive_seconds_per_frame(duration: f64, options: &PreviewOptions) -> f64 {
    options.seconds_per_frame.unwrap_or_else(|| {
        let derived = 1.0 + 0.5 * (duration / 60.0).floor();
        derived.max(options.min_seconds_per_frame)
    })
}

/// Compute the [`SamplingPlan`] for one format.
///
/// # Errors
///
/// Returns [`ThumbsError::Configuration`] if the duration is negative or
/// not finite, the sampling interval is not positive, the format has a zero
/// dimension, a cell does not fit inside `max_square` in either
/// direction, or the resulting grid is too large for one page (more cells
/// than a `u32` holds, or a side past [`MAX_PAGE_SIDE`]).
pub fn plan_layout(
    duration: f64,
    options: &PreviewOptions,
    format: &FormatSpec,
) -> Result<SamplingPlan, ThumbsError> {
    if !duration.is_finite() || duration < 0.0 {
        return Err(ThumbsError::Configuration(format!(
            "duration must be a non-negative number of seconds, got {duration}"
        )));
    }

    let seconds_per_frame = derive_seconds_per_frame(duration, options);
    if !seconds_per_frame.is_finite() || seconds_per_frame <= 0.0 {
        return Err(ThumbsError::Configuration(format!(
            "seconds per frame must be positive, got {seconds_per_frame}"
        )));
    }

    if format.width == 0 || format.height == 0 {
        return Err(ThumbsError::Configuration(format!(
            "format {}x{} has a zero dimension",
            format.width, format.height
        )));
    }

    let max_square = options.max_square;
    let frames_across = max_square / format.width;
    let frames_down = max_square / format.height;
    if frames_across == 0 || frames_down == 0 {
        return Err(ThumbsError::Configuration(format!(
            "format {}x{} does not fit in a {max_square}px page",
            format.width, format.height
        )));
    }

    let frames_per_page = frames_across.checked_mul(frames_down).ok_or_else(|| {
        ThumbsError::Configuration(format!(
            "a {frames_across}x{frames_down} grid of {}x{} cells has too many cells per page",
            format.width, format.height
        ))
    })?;

    // frames * cell never exceeds max_square, so only the encoder limit applies.
    let page_width = frames_across * format.width;
    let page_height = frames_down * format.height;
    if page_width > MAX_PAGE_SIDE || page_height > MAX_PAGE_SIDE {
        return Err(ThumbsError::Configuration(format!(
            "{page_width}x{page_height} page exceeds the {MAX_PAGE_SIDE}px JPEG limit"
        )));
    }

    let frame_count = (duration / seconds_per_frame).floor() as u32;
    let page_count = frame_count.div_ceil(frames_per_page);

    log::debug!(
        "Planned {}x{}{}: {frame_count} frames every {seconds_per_frame}s, {frames_across}x{frames_down} grid, {page_count} pages",
        format.width,
        format.height,
        format.prefix_str(),
    );

    Ok(SamplingPlan {
        seconds_per_frame,
        frame_count,
        frames_across,
        frames_down,
        frames_per_page,
        page_count,
        cell_width: format.width,
        cell_height: format.height,
    })
}

/// Plan every format the request asks for.
///
/// All plans share the same duration and frame count; only the grid
/// geometry differs.
///
/// # Errors
///
/// Returns [`ThumbsError::Configuration`] if no formats were requested, or
/// any error from [`plan_layout`].
pub fn plan_formats(
    duration: f64,
    options: &PreviewOptions,
) -> Result<Vec<(FormatSpec, SamplingPlan)>, ThumbsError> {
    let formats = options.resolved_formats();
    if formats.is_empty() {
        return Err(ThumbsError::Configuration(
            "at least one format is required".into(),
        ));
    }

    formats
        .into_iter()
        .map(|format| {
            let plan = plan_layout(duration, options, &format)?;
            Ok((format, plan))
        })
        .collect()
}
