//! Sampled frame loading.
//!
//! Every frame of a [`SamplingPlan`] is requested from the thumbnail
//! service at the midpoint of its sampling interval. All requests are in
//! flight at once; the stage succeeds only when every frame has arrived,
//! and the first failure drops the remaining requests.

use std::time::Duration;

use futures_util::stream::{FuturesUnordered, StreamExt};
use image::DynamicImage;

use crate::configuration::PreviewOptions;
use crate::delivery::ThumbnailRequest;
use crate::error::ThumbsError;
use crate::layout::SamplingPlan;
use crate::progress::{OperationType, ProgressTracker};
use crate::remote::FrameSource;

/// Thumbnail URL for frame `index` of `plan`, requested at `height` pixels.
pub fn frame_url(
    options: &PreviewOptions,
    stream_id: &str,
    plan: &SamplingPlan,
    index: u32,
    height: u32,
) -> String {
    ThumbnailRequest::at_seconds(plan.sample_time(index))
        .with_height(height)
        .url(&options.endpoint, stream_id)
}

/// Fetch every sampled frame of `plan`, returned in frame order.
///
/// # Errors
///
/// - [`ThumbsError::FrameFetch`] for the first frame that fails, carrying
///   its sample time. No partial result is returned.
/// - [`ThumbsError::Cancelled`] if the request is cancelled while frames
///   are in flight.
pub async fn load_frames<S>(
    source: &S,
    stream_id: &str,
    plan: &SamplingPlan,
    height: u32,
    options: &PreviewOptions,
) -> Result<Vec<DynamicImage>, ThumbsError>
where
    S: FrameSource + ?Sized,
{
    let count = plan.frame_count;
    if count == 0 {
        return Ok(Vec::new());
    }
    if options.is_cancelled() {
        return Err(ThumbsError::Cancelled);
    }
    log::debug!("Loading {count} frames of {stream_id} at height {height}");

    let mut pending: FuturesUnordered<_> = (0..count)
        .map(|index| {
            let time = plan.sample_time(index);
            let url = frame_url(options, stream_id, plan, index, height);
            async move {
                let result = source.fetch_frame(&url).await;
                (index, time, result)
            }
        })
        .collect();

    let mut tracker = ProgressTracker::new(
        options.progress.clone(),
        OperationType::FrameLoading,
        Some(count as u64),
        options.batch_size,
    );
    let mut frames: Vec<Option<DynamicImage>> = (0..count).map(|_| None).collect();

    while let Some((index, time, result)) = pending.next().await {
        let image = result.map_err(|error| match error {
            ThumbsError::FrameFetch { .. } | ThumbsError::Cancelled => error,
            other => ThumbsError::FrameFetch {
                time,
                reason: other.to_string(),
            },
        })?;
        frames[index as usize] = Some(image);

        if options.is_cancelled() {
            return Err(ThumbsError::Cancelled);
        }
        tracker.advance(Some(Duration::from_secs_f64(time)), None);
    }
    tracker.finish();

    frames
        .into_iter()
        .enumerate()
        .map(|(index, frame)| {
            frame.ok_or_else(|| ThumbsError::FrameFetch {
                time: plan.sample_time(index as u32),
                reason: "frame request never completed".into(),
            })
        })
        .collect()
}
