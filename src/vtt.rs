//! WebVTT thumbnail cues.
//!
//! Each sampled frame becomes one cue spanning its sampling interval and
//! pointing at the sprite page and rectangle the compositor draws it into,
//! using the media-fragment syntax `page.jpg#xywh=x,y,w,h`. Cues are
//! contiguous: every cue starts exactly where the previous one ended.
//!
//! # Example
//!
//! ```
//! use stream_thumbs::{FormatSpec, PreviewOptions, plan_layout, vtt};
//!
//! let format = FormatSpec::new(320, 180);
//! let options = PreviewOptions::new().with_seconds_per_frame(50.0);
//! let plan = plan_layout(125.0, &options, &format)?;
//! let cues = vtt::build_cues(&plan, &format, "abc");
//! assert_eq!(cues[1].start, "00:00:50.000");
//! assert_eq!(cues[1].end, "00:01:40.000");
//! # Ok::<(), stream_thumbs::ThumbsError>(())
//! ```

use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::artifact::{ArtifactData, PreviewArtifact};
use crate::configuration::FormatSpec;
use crate::layout::SamplingPlan;
use crate::naming::{page_file_name, vtt_file_name};

/// First line of every WebVTT document.
pub const VTT_HEADER: &str = "WEBVTT";

/// One thumbnail cue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VttCue {
    /// One-based cue number.
    pub index: u32,
    /// Start timestamp, `HH:MM:SS.mmm`.
    pub start: String,
    /// End timestamp, `HH:MM:SS.mmm`.
    pub end: String,
    /// Sprite page the frame is drawn on.
    pub page_file_name: String,
    /// Left edge of the frame's rectangle.
    pub x: u32,
    /// Top edge of the frame's rectangle.
    pub y: u32,
    /// Rectangle width.
    pub width: u32,
    /// Rectangle height.
    pub height: u32,
}

impl Display for VttCue {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "{}\n{} --> {}\n{}#xywh={},{},{},{}",
            self.index,
            self.start,
            self.end,
            self.page_file_name,
            self.x,
            self.y,
            self.width,
            self.height
        )
    }
}

/// Format seconds as a WebVTT timestamp (`HH:MM:SS.mmm`).
///
/// The value is rounded to the nearest millisecond, not truncated:
/// `0.0015` formats as `00:00:00.002`, and accumulated floating-point error
/// (e.g. `3.0 * 1.1`) does not drop a millisecond. Negative and non-finite
/// inputs format as zero.
///
/// ```
/// use stream_thumbs::vtt::format_vtt_timestamp;
///
/// assert_eq!(format_vtt_timestamp(100.0), "00:01:40.000");
/// assert_eq!(format_vtt_timestamp(3725.25), "01:02:05.250");
/// ```
pub fn format_vtt_timestamp(seconds: f64) -> String {
    let total_millis = if seconds.is_finite() && seconds > 0.0 {
        (seconds * 1000.0).round() as u64
    } else {
        0
    };
    let hours = total_millis / 3_600_000;
    let minutes = (total_millis / 60_000) % 60;
    let secs = (total_millis / 1000) % 60;
    let millis = total_millis % 1000;
    format!("{hours:02}:{minutes:02}:{secs:02}.{millis:03}")
}

/// Build one cue per sampled frame, in time order.
pub fn build_cues(plan: &SamplingPlan, format: &FormatSpec, stream_id: &str) -> Vec<VttCue> {
    let mut cues = Vec::with_capacity(plan.frame_count as usize);
    let mut start = format_vtt_timestamp(0.0);

    for index in 0..plan.frame_count {
        let end = format_vtt_timestamp(plan.interval_end(index));
        let placement = plan.placement(index);
        cues.push(VttCue {
            index: index + 1,
            start: std::mem::replace(&mut start, end.clone()),
            end,
            page_file_name: page_file_name(stream_id, format, placement.page),
            x: placement.x,
            y: placement.y,
            width: placement.width,
            height: placement.height,
        });
    }

    cues
}

/// Serialise cues into a WebVTT document.
///
/// The header and each cue are separated by a blank line; a document
/// without cues is just the header.
pub fn render_vtt_text(cues: &[VttCue]) -> String {
    let mut blocks = Vec::with_capacity(cues.len() + 1);
    blocks.push(VTT_HEADER.to_string());
    blocks.extend(cues.iter().map(VttCue::to_string));
    blocks.join("\n\n")
}

/// Render the VTT artifact for one format.
pub fn render_vtt(plan: &SamplingPlan, format: &FormatSpec, stream_id: &str) -> PreviewArtifact {
    log::debug!(
        "Rendering {} VTT cues for {}",
        plan.frame_count,
        vtt_file_name(stream_id, format)
    );
    let cues = build_cues(plan, format, stream_id);
    PreviewArtifact {
        page_index: None,
        name: vtt_file_name(stream_id, format),
        data: ArtifactData::Text(render_vtt_text(&cues)),
    }
}
