//! Artifact file names.
//!
//! Sprite pages and the VTT document that references them must agree on
//! page file names character for character, so both are produced here.

use crate::configuration::FormatSpec;

/// File name of sprite page `page` (zero-based):
/// `{stream}{prefix}-{page + 1, five digits}.jpg`.
///
/// # Example
///
/// ```
/// use stream_thumbs::{FormatSpec, page_file_name};
///
/// let format = FormatSpec::new(320, 180).with_prefix("@2x");
/// assert_eq!(page_file_name("abc", &format, 0), "abc@2x-00001.jpg");
/// ```
pub fn page_file_name(stream_id: &str, format: &FormatSpec, page: u32) -> String {
    format!("{stream_id}{}-{:05}.jpg", format.prefix_str(), page + 1)
}

/// File name of the VTT document: `{stream}{prefix}.vtt`.
pub fn vtt_file_name(stream_id: &str, format: &FormatSpec) -> String {
    format!("{stream_id}{}.vtt", format.prefix_str())
}
