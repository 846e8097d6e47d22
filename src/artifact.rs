//! Pipeline outputs.
//!
//! Every requested format produces a [`FormatResult`]: the format, its
//! [`SamplingPlan`], the stream duration, and the ordered list of
//! [`PreviewArtifact`]s (the VTT document first when one was requested,
//! then sprite pages in page order). Requests with exactly one format are
//! returned as [`PreviewOutput::Single`].

use std::path::{Path, PathBuf};

use crate::configuration::FormatSpec;
use crate::error::ThumbsError;
use crate::layout::SamplingPlan;

/// The payload of an artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactData {
    /// An encoded sprite page (JPEG).
    Image(Vec<u8>),
    /// A WebVTT document.
    Text(String),
}

impl ArtifactData {
    /// The payload as raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            ArtifactData::Image(bytes) => bytes,
            ArtifactData::Text(text) => text.as_bytes(),
        }
    }

    /// The payload as text, if it is a text artifact.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ArtifactData::Text(text) => Some(text),
            ArtifactData::Image(_) => None,
        }
    }
}

/// One named output buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewArtifact {
    /// Zero-based page index for sprite pages; `None` for the VTT document.
    pub page_index: Option<u32>,
    /// File name the artifact is meant to be stored under.
    pub name: String,
    /// Encoded contents.
    pub data: ArtifactData,
}

impl PreviewArtifact {
    /// Write the artifact into `directory` under its own name.
    ///
    /// Returns the written path.
    ///
    /// # Errors
    ///
    /// Returns [`ThumbsError::Io`] if the file cannot be written.
    pub fn save_in<P: AsRef<Path>>(&self, directory: P) -> Result<PathBuf, ThumbsError> {
        let path = directory.as_ref().join(&self.name);
        std::fs::write(&path, self.data.as_bytes())?;
        Ok(path)
    }
}

/// Everything produced for one format.
#[derive(Debug, Clone)]
pub struct FormatResult {
    /// The format that was rendered.
    pub format: FormatSpec,
    /// The layout the artifacts were rendered with.
    pub plan: SamplingPlan,
    /// Stream duration in seconds.
    pub duration: f64,
    /// Stream identifier.
    pub stream_id: String,
    /// Produced artifacts, VTT first, then pages in order.
    pub content: Vec<PreviewArtifact>,
}

impl FormatResult {
    /// The VTT document, if one was produced.
    pub fn vtt(&self) -> Option<&PreviewArtifact> {
        self.content.iter().find(|a| a.page_index.is_none())
    }

    /// Sprite pages in page order.
    pub fn pages(&self) -> impl Iterator<Item = &PreviewArtifact> {
        self.content.iter().filter(|a| a.page_index.is_some())
    }

    /// Write every artifact into `directory`.
    ///
    /// # Errors
    ///
    /// Returns [`ThumbsError::Io`] on the first failed write.
    pub fn save_all<P: AsRef<Path>>(&self, directory: P) -> Result<Vec<PathBuf>, ThumbsError> {
        self.content
            .iter()
            .map(|artifact| artifact.save_in(directory.as_ref()))
            .collect()
    }
}

/// The result of a request.
///
/// A request that named exactly one format yields [`Single`](Self::Single);
/// anything else yields [`Multiple`](Self::Multiple) in request order.
#[derive(Debug, Clone)]
pub enum PreviewOutput {
    /// The only requested format.
    Single(FormatResult),
    /// One result per requested format.
    Multiple(Vec<FormatResult>),
}

impl PreviewOutput {
    /// Wrap per-format results, unwrapping a one-element list.
    pub(crate) fn from_results(mut results: Vec<FormatResult>) -> Self {
        if results.len() == 1 {
            PreviewOutput::Single(results.remove(0))
        } else {
            PreviewOutput::Multiple(results)
        }
    }

    /// All results as a list, regardless of shape.
    pub fn into_vec(self) -> Vec<FormatResult> {
        match self {
            PreviewOutput::Single(result) => vec![result],
            PreviewOutput::Multiple(results) => results,
        }
    }

    /// The single result, if exactly one format was requested.
    pub fn single(&self) -> Option<&FormatResult> {
        match self {
            PreviewOutput::Single(result) => Some(result),
            PreviewOutput::Multiple(_) => None,
        }
    }

    /// Number of format results.
    pub fn len(&self) -> usize {
        match self {
            PreviewOutput::Single(_) => 1,
            PreviewOutput::Multiple(results) => results.len(),
        }
    }

    /// `true` when there are no format results.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
