//! HLS playlist parsing.
//!
//! The delivery service describes each stream with a two-level HLS
//! manifest: a master playlist listing variant streams
//! (`#EXT-X-STREAM-INF` followed by a URI line), and per-variant media
//! playlists listing segments (`#EXTINF:<duration>,` followed by a URI
//! line). Only the parts the preview pipeline needs are modelled here.
//!
//! # Example
//!
//! ```
//! use stream_thumbs::manifest::{MasterPlaylist, MediaPlaylist};
//!
//! let master = MasterPlaylist::parse(
//!     "#EXTM3U\n#EXT-X-STREAM-INF:BANDWIDTH=800000,RESOLUTION=640x360\nstream_640.m3u8\n",
//! )?;
//! assert_eq!(master.first_variant()?.uri, "stream_640.m3u8");
//!
//! let media = MediaPlaylist::parse("#EXTM3U\n#EXTINF:4.0,\nseg0.ts\n#EXTINF:2.5,\nseg1.ts\n")?;
//! assert_eq!(media.total_duration(), 6.5);
//! # Ok::<(), stream_thumbs::ThumbsError>(())
//! ```

use crate::error::ThumbsError;

const HEADER: &str = "#EXTM3U";
const STREAM_INF: &str = "#EXT-X-STREAM-INF:";
const EXTINF: &str = "#EXTINF:";
const TARGET_DURATION: &str = "#EXT-X-TARGETDURATION:";

/// One variant stream listed in a master playlist.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantStream {
    /// URI of the variant's media playlist, relative to the manifest directory.
    pub uri: String,
    /// Peak bandwidth in bits per second, if declared.
    pub bandwidth: Option<u64>,
    /// Declared `(width, height)`, if any.
    pub resolution: Option<(u32, u32)>,
}

/// A master playlist: the list of variant streams.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MasterPlaylist {
    /// Variants in declaration order.
    pub variants: Vec<VariantStream>,
}

impl MasterPlaylist {
    /// Parse a master playlist.
    ///
    /// # Errors
    ///
    /// Returns [`ThumbsError::ManifestParse`] if the `#EXTM3U` header is
    /// missing or a `#EXT-X-STREAM-INF` tag is not followed by a URI.
    pub fn parse(contents: &str) -> Result<Self, ThumbsError> {
        check_header(contents)?;

        let mut variants = Vec::new();
        let mut pending: Option<Vec<(String, String)>> = None;

        for line in contents.lines().map(str::trim) {
            if let Some(attributes) = line.strip_prefix(STREAM_INF) {
                if pending.is_some() {
                    return Err(ThumbsError::ManifestParse(
                        "#EXT-X-STREAM-INF without a stream URI".into(),
                    ));
                }
                pending = Some(parse_attributes(attributes));
            } else if line.is_empty() || line.starts_with('#') {
                continue;
            } else if let Some(attributes) = pending.take() {
                variants.push(VariantStream {
                    uri: line.to_string(),
                    bandwidth: attribute(&attributes, "BANDWIDTH").and_then(|v| v.parse().ok()),
                    resolution: attribute(&attributes, "RESOLUTION").and_then(parse_resolution),
                });
            }
        }

        if pending.is_some() {
            return Err(ThumbsError::ManifestParse(
                "#EXT-X-STREAM-INF without a stream URI".into(),
            ));
        }

        Ok(Self { variants })
    }

    /// The first declared variant.
    ///
    /// # Errors
    ///
    /// Returns [`ThumbsError::ManifestParse`] if the playlist lists no
    /// variant streams.
    pub fn first_variant(&self) -> Result<&VariantStream, ThumbsError> {
        self.variants.first().ok_or_else(|| {
            ThumbsError::ManifestParse("master playlist has no variant streams".into())
        })
    }
}

/// One media segment of a variant playlist.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    /// Declared duration in seconds.
    pub duration: f64,
    /// Segment URI.
    pub uri: String,
}

/// A media (variant) playlist: the list of segments.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MediaPlaylist {
    /// `#EXT-X-TARGETDURATION`, if declared.
    pub target_duration: Option<f64>,
    /// Segments in playback order.
    pub segments: Vec<Segment>,
}

impl MediaPlaylist {
    /// Parse a media playlist.
    ///
    /// A playlist with no segments is valid and has zero duration.
    ///
    /// # Errors
    ///
    /// Returns [`ThumbsError::ManifestParse`] if the header is missing or an
    /// `#EXTINF` duration is not a finite, non-negative number.
    pub fn parse(contents: &str) -> Result<Self, ThumbsError> {
        check_header(contents)?;

        let mut target_duration = None;
        let mut segments = Vec::new();
        let mut pending_duration: Option<f64> = None;

        for line in contents.lines().map(str::trim) {
            if let Some(value) = line.strip_prefix(TARGET_DURATION) {
                target_duration = value.trim().parse().ok();
            } else if let Some(value) = line.strip_prefix(EXTINF) {
                pending_duration = Some(parse_extinf(value)?);
            } else if line.is_empty() || line.starts_with('#') {
                continue;
            } else if let Some(duration) = pending_duration.take() {
                segments.push(Segment {
                    duration,
                    uri: line.to_string(),
                });
            }
        }

        Ok(Self {
            target_duration,
            segments,
        })
    }

    /// Sum of every segment duration, in seconds.
    pub fn total_duration(&self) -> f64 {
        self.segments.iter().map(|segment| segment.duration).sum()
    }
}

fn check_header(contents: &str) -> Result<(), ThumbsError> {
    if contents.trim_start().starts_with(HEADER) {
        Ok(())
    } else {
        Err(ThumbsError::ManifestParse("missing #EXTM3U header".into()))
    }
}

/// Parse the duration of an `#EXTINF:<duration>[,<title>]` tag.
fn parse_extinf(value: &str) -> Result<f64, ThumbsError> {
    let raw = value.split(',').next().unwrap_or_default().trim();
    match raw.parse::<f64>() {
        Ok(duration) if duration.is_finite() && duration >= 0.0 => Ok(duration),
        _ => Err(ThumbsError::ManifestParse(format!(
            "invalid #EXTINF duration: {raw:?}"
        ))),
    }
}

/// Split an attribute list (`KEY=value,KEY="quoted,value"`) into pairs.
///
/// Quoted values may contain commas; surrounding quotes are removed.
fn parse_attributes(input: &str) -> Vec<(String, String)> {
    let mut attributes = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in input.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                current.push(c);
            }
            ',' if !in_quotes => attributes.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    if !current.is_empty() {
        attributes.push(current);
    }

    attributes
        .into_iter()
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            Some((
                key.trim().to_ascii_uppercase(),
                value.trim().trim_matches('"').to_string(),
            ))
        })
        .collect()
}

fn attribute<'a>(attributes: &'a [(String, String)], key: &str) -> Option<&'a str> {
    attributes
        .iter()
        .find(|(name, _)| name == key)
        .map(|(_, value)| value.as_str())
}

fn parse_resolution(value: &str) -> Option<(u32, u32)> {
    let (width, height) = value.split_once(['x', 'X'])?;
    Some((width.parse().ok()?, height.parse().ok()?))
}
