//! In-memory collaborators shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use image::{DynamicImage, Rgb, RgbImage};
use stream_thumbs::{
    FrameSource, ImageBackend, ManifestFetcher, PreviewGenerator, ThumbsError,
};

pub const STREAM_ID: &str = "abc";
pub const MASTER_URL: &str = "https://videodelivery.net/abc/manifest/video.m3u8";
pub const VARIANT_URL: &str = "https://videodelivery.net/abc/manifest/stream_360.m3u8";

pub const MASTER_PLAYLIST: &str = "#EXTM3U
#EXT-X-VERSION:6
#EXT-X-STREAM-INF:BANDWIDTH=800000,RESOLUTION=640x360,CODECS=\"avc1.4d401e,mp4a.40.2\"
stream_360.m3u8
#EXT-X-STREAM-INF:BANDWIDTH=2400000,RESOLUTION=1280x720
stream_720.m3u8
";

/// A media playlist whose segments add up to `seconds`.
pub fn media_playlist(segments: &[f64]) -> String {
    let mut text = String::from("#EXTM3U\n#EXT-X-TARGETDURATION:25\n");
    for (index, duration) in segments.iter().enumerate() {
        text.push_str(&format!("#EXTINF:{duration},\nseg{index}.ts\n"));
    }
    text.push_str("#EXT-X-ENDLIST\n");
    text
}

/// Serves manifests from a map; unknown URLs answer 404.
#[derive(Clone, Default)]
pub struct FakeManifests {
    documents: HashMap<String, String>,
    pub requests: Arc<Mutex<Vec<String>>>,
}

impl FakeManifests {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, url: &str, body: impl Into<String>) -> Self {
        self.documents.insert(url.to_string(), body.into());
        self
    }

    /// Master plus a variant playlist of `segments`.
    pub fn for_stream(segments: &[f64]) -> Self {
        Self::new()
            .with_document(MASTER_URL, MASTER_PLAYLIST)
            .with_document(VARIANT_URL, media_playlist(segments))
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ManifestFetcher for FakeManifests {
    async fn fetch_text(&self, url: &str) -> Result<String, ThumbsError> {
        self.requests.lock().unwrap().push(url.to_string());
        self.documents
            .get(url)
            .cloned()
            .ok_or_else(|| ThumbsError::ManifestFetch {
                url: url.to_string(),
                status: 404,
            })
    }
}

/// Serves solid-colour frames; URLs containing `fail_on` error out.
#[derive(Clone)]
pub struct FakeFrames {
    pub width: u32,
    pub height: u32,
    pub color: [u8; 3],
    pub fail_on: Option<String>,
    pub requests: Arc<Mutex<Vec<String>>>,
}

impl FakeFrames {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            color: [220, 20, 20],
            fail_on: None,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing_on(mut self, fragment: &str) -> Self {
        self.fail_on = Some(fragment.to_string());
        self
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn urls(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl FrameSource for FakeFrames {
    async fn fetch_frame(&self, url: &str) -> Result<DynamicImage, ThumbsError> {
        self.requests.lock().unwrap().push(url.to_string());
        if self.fail_on.as_deref().is_some_and(|f| url.contains(f)) {
            return Err(ThumbsError::Composition("thumbnail service said no".into()));
        }
        Ok(solid_frame(self.width, self.height, self.color))
    }
}

pub fn solid_frame(width: u32, height: u32, color: [u8; 3]) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb(color)))
}

pub fn generator(
    manifests: FakeManifests,
    frames: FakeFrames,
) -> PreviewGenerator<FakeManifests, FakeFrames, ImageBackend> {
    PreviewGenerator::with_collaborators(manifests, frames, ImageBackend::new())
}
