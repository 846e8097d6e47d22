//! Drawing surfaces.
//!
//! The compositor needs four primitives: allocate a surface, fill it, draw a
//! cropped region of a source image scaled into a destination rectangle,
//! and encode the result. [`RenderBackend`] names exactly that capability
//! set; [`ImageBackend`] implements it with the `image` crate.

use std::io::Cursor;

use image::{
    DynamicImage, GenericImage, Rgb, RgbImage, codecs::jpeg::JpegEncoder,
    imageops::FilterType,
};

use crate::error::ThumbsError;

/// A rectangle in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width.
    pub width: u32,
    /// Height.
    pub height: u32,
}

/// The drawing primitives sprite composition depends on.
///
/// Implementations must be [`Sync`] so pages can be composed in parallel.
pub trait RenderBackend: Send + Sync {
    /// A drawable, encodable pixel surface.
    type Surface: Send;

    /// Allocate a `width`×`height` surface.
    fn create_surface(&self, width: u32, height: u32) -> Result<Self::Surface, ThumbsError>;

    /// Fill the whole surface with `color`.
    fn fill(&self, surface: &mut Self::Surface, color: [u8; 3]);

    /// Draw the `source` region of `image`, scaled to `destination`.
    fn draw_image(
        &self,
        surface: &mut Self::Surface,
        image: &DynamicImage,
        source: Rect,
        destination: Rect,
    ) -> Result<(), ThumbsError>;

    /// Encode the surface as JPEG at `quality` (1-100).
    fn encode_jpeg(&self, surface: &Self::Surface, quality: u8) -> Result<Vec<u8>, ThumbsError>;
}

/// [`RenderBackend`] backed by an in-memory [`RgbImage`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageBackend {
    filter: Option<FilterType>,
}

impl ImageBackend {
    /// Create a backend that scales with a triangle (bilinear) filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different resampling filter.
    #[must_use]
    pub fn with_filter(mut self, filter: FilterType) -> Self {
        self.filter = Some(filter);
        self
    }

    fn filter(&self) -> FilterType {
        self.filter.unwrap_or(FilterType::Triangle)
    }
}

impl RenderBackend for ImageBackend {
    type Surface = RgbImage;

    fn create_surface(&self, width: u32, height: u32) -> Result<RgbImage, ThumbsError> {
        if width == 0 || height == 0 {
            return Err(ThumbsError::Composition(format!(
                "cannot allocate a {width}x{height} surface"
            )));
        }
        Ok(RgbImage::new(width, height))
    }

    fn fill(&self, surface: &mut RgbImage, color: [u8; 3]) {
        for pixel in surface.pixels_mut() {
            *pixel = Rgb(color);
        }
    }

    fn draw_image(
        &self,
        surface: &mut RgbImage,
        image: &DynamicImage,
        source: Rect,
        destination: Rect,
    ) -> Result<(), ThumbsError> {
        // crop_imm clamps to the image bounds, which covers frames smaller
        // than the one the crop window was computed from.
        let cropped = image.crop_imm(source.x, source.y, source.width, source.height);
        if cropped.width() == 0 || cropped.height() == 0 {
            return Err(ThumbsError::Composition(format!(
                "crop {source:?} is outside a {}x{} frame",
                image.width(),
                image.height()
            )));
        }
        let scaled = cropped
            .resize_exact(destination.width, destination.height, self.filter())
            .to_rgb8();
        surface
            .copy_from(&scaled, destination.x, destination.y)
            .map_err(|e| ThumbsError::Composition(format!("failed to place frame: {e}")))
    }

    fn encode_jpeg(&self, surface: &RgbImage, quality: u8) -> Result<Vec<u8>, ThumbsError> {
        let mut buffer = Cursor::new(Vec::new());
        let mut encoder = JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100));
        encoder.encode_image(surface)?;
        Ok(buffer.into_inner())
    }
}
