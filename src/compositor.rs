//! Sprite page composition.
//!
//! Frames are packed row-major into pages of `frames_across`×`frames_down`
//! cells. Each frame is scaled uniformly to cover its cell and cropped
//! around the center. The crop window is computed once, from the first
//! frame of the sequence, and reused for every frame so that frames of the
//! same source resolution line up exactly from cell to cell.

#[cfg(feature = "rayon")]
use std::sync::Mutex;

use image::DynamicImage;
#[cfg(feature = "rayon")]
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::artifact::{ArtifactData, PreviewArtifact};
use crate::configuration::{FormatSpec, PreviewOptions};
use crate::error::ThumbsError;
use crate::layout::SamplingPlan;
use crate::naming::page_file_name;
use crate::progress::{OperationType, ProgressTracker};
use crate::render::{Rect, RenderBackend};

/// Background of unpopulated cells.
pub const BACKGROUND: [u8; 3] = [0, 0, 0];

/// The centered source region drawn into every cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropWindow {
    /// Left edge in source pixels.
    pub x: u32,
    /// Top edge in source pixels.
    pub y: u32,
    /// Width in source pixels.
    pub width: u32,
    /// Height in source pixels.
    pub height: u32,
}

impl CropWindow {
    /// Compute the crop for a `source_width`×`source_height` frame drawn into
    /// a `cell_width`×`cell_height` cell.
    ///
    /// The scale ratio `r = max(cell_w / src_w, cell_h / src_h)` makes the
    /// frame cover the cell; the window `round(cell / r)` is then centered
    /// on the frame.
    ///
    /// # Errors
    ///
    /// Returns [`ThumbsError::Composition`] if any dimension is zero.
    ///
    /// ```
    /// use stream_thumbs::CropWindow;
    ///
    /// // A 4:3 frame into a 16:9 cell loses its top and bottom.
    /// let crop = CropWindow::covering(640, 480, 320, 180)?;
    /// assert_eq!((crop.x, crop.y, crop.width, crop.height), (0, 60, 640, 360));
    /// # Ok::<(), stream_thumbs::ThumbsError>(())
    /// ```
    pub fn covering(
        source_width: u32,
        source_height: u32,
        cell_width: u32,
        cell_height: u32,
    ) -> Result<Self, ThumbsError> {
        if source_width == 0 || source_height == 0 || cell_width == 0 || cell_height == 0 {
            return Err(ThumbsError::Composition(format!(
                "cannot crop a {source_width}x{source_height} frame into a {cell_width}x{cell_height} cell"
            )));
        }

        let source_width_f = source_width as f64;
        let source_height_f = source_height as f64;
        let ratio = (cell_width as f64 / source_width_f).max(cell_height as f64 / source_height_f);
        let crop_width_f = cell_width as f64 / ratio;
        let crop_height_f = cell_height as f64 / ratio;

        Ok(Self {
            x: ((source_width_f - crop_width_f) / 2.0).round().max(0.0) as u32,
            y: ((source_height_f - crop_height_f) / 2.0).round().max(0.0) as u32,
            width: (crop_width_f.round() as u32).clamp(1, source_width),
            height: (crop_height_f.round() as u32).clamp(1, source_height),
        })
    }

    /// Crop for `frame` drawn into the plan's cells.
    pub fn for_frame(frame: &DynamicImage, plan: &SamplingPlan) -> Result<Self, ThumbsError> {
        Self::covering(
            frame.width(),
            frame.height(),
            plan.cell_width,
            plan.cell_height,
        )
    }

    fn as_rect(&self) -> Rect {
        Rect {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }
}

/// Draw and encode sprite page `page`.
///
/// `frames` is the full frame sequence of the request; only the frames
/// that [`SamplingPlan::page_frames`] assigns to `page` are drawn. The page
/// is always allocated at full grid size and background-filled, so a short
/// last page keeps the same dimensions as the others.
///
/// # Errors
///
/// Returns [`ThumbsError::Composition`] if the sequence is shorter than the
/// page needs, or any drawing / encoding error from the backend.
#[allow(clippy::too_many_arguments)]
pub fn render_page<B: RenderBackend>(
    backend: &B,
    plan: &SamplingPlan,
    format: &FormatSpec,
    stream_id: &str,
    frames: &[DynamicImage],
    page: u32,
    crop: CropWindow,
    quality: u8,
) -> Result<PreviewArtifact, ThumbsError> {
    let indices = plan.page_frames(page);
    if indices.end as usize > frames.len() {
        return Err(ThumbsError::Composition(format!(
            "page {page} needs frames {indices:?} but only {} were loaded",
            frames.len()
        )));
    }

    let (page_width, page_height) = plan.page_dimensions();
    let mut surface = backend.create_surface(page_width, page_height)?;
    backend.fill(&mut surface, BACKGROUND);

    let source = crop.as_rect();
    for index in indices {
        let placement = plan.placement(index);
        let destination = Rect {
            x: placement.x,
            y: placement.y,
            width: placement.width,
            height: placement.height,
        };
        backend.draw_image(&mut surface, &frames[index as usize], source, destination)?;
    }

    let bytes = backend.encode_jpeg(&surface, quality)?;
    Ok(PreviewArtifact {
        page_index: Some(page),
        name: page_file_name(stream_id, format, page),
        data: ArtifactData::Image(bytes),
    })
}

/// Draw and encode every page of `plan`, in page order.
///
/// With the `rayon` feature pages are composed in parallel; the result
/// order is the same either way.
///
/// # Errors
///
/// Returns [`ThumbsError::Composition`] if the plan has pages but `frames`
/// holds fewer than `plan.frame_count` frames, [`ThumbsError::Cancelled`]
/// if the request is cancelled before a page starts, or the first error
/// from [`render_page`].
pub fn render_pages<B: RenderBackend>(
    backend: &B,
    plan: &SamplingPlan,
    format: &FormatSpec,
    stream_id: &str,
    frames: &[DynamicImage],
    options: &PreviewOptions,
) -> Result<Vec<PreviewArtifact>, ThumbsError> {
    if plan.page_count == 0 {
        return Ok(Vec::new());
    }
    let first = match frames.first() {
        Some(first) if frames.len() >= plan.frame_count as usize => first,
        _ => {
            return Err(ThumbsError::Composition(format!(
                "{} pages need {} frames but only {} were loaded",
                plan.page_count,
                plan.frame_count,
                frames.len()
            )));
        }
    };

    log::debug!(
        "Composing {} pages of {}x{} cells for {stream_id}{}",
        plan.page_count,
        plan.cell_width,
        plan.cell_height,
        format.prefix_str()
    );

    let crop = CropWindow::for_frame(first, plan)?;
    if frames
        .iter()
        .any(|f| f.width() != first.width() || f.height() != first.height())
    {
        log::warn!(
            "Frames for {stream_id} differ in size; reusing the crop of the first {}x{} frame",
            first.width(),
            first.height()
        );
    }

    let tracker = ProgressTracker::new(
        options.progress.clone(),
        OperationType::PageComposition,
        Some(plan.page_count as u64),
        options.batch_size,
    );
    let quality = options.jpeg_quality;

    #[cfg(feature = "rayon")]
    let pages = {
        let tracker = Mutex::new(tracker);
        let pages = (0..plan.page_count)
            .into_par_iter()
            .map(|page| {
                if options.is_cancelled() {
                    return Err(ThumbsError::Cancelled);
                }
                let artifact =
                    render_page(backend, plan, format, stream_id, frames, page, crop, quality)?;
                if let Ok(mut tracker) = tracker.lock() {
                    tracker.advance(None, Some(page));
                }
                Ok(artifact)
            })
            .collect::<Result<Vec<_>, ThumbsError>>()?;
        if let Ok(mut tracker) = tracker.into_inner() {
            tracker.finish();
        }
        pages
    };

    #[cfg(not(feature = "rayon"))]
    let pages = {
        let mut tracker = tracker;
        let mut pages = Vec::with_capacity(plan.page_count as usize);
        for page in 0..plan.page_count {
            if options.is_cancelled() {
                return Err(ThumbsError::Cancelled);
            }
            pages.push(render_page(
                backend, plan, format, stream_id, frames, page, crop, quality,
            )?);
            tracker.advance(None, Some(page));
        }
        tracker.finish();
        pages
    };

    Ok(pages)
}
