use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::imaging::border::FillColor;

/// Which normalization to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformKind {
    PadToSquare,
    DownscaleToTarget { target: u32 },
}

impl TransformKind {
    pub fn name(&self) -> &'static str {
        match self {
            TransformKind::PadToSquare => "pad-to-square",
            TransformKind::DownscaleToTarget { .. } => "downscale",
        }
    }
}

/// One transform of one file, created per call.
///
/// `path` must already be validated by the caller; it is read and then
/// overwritten in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformRequest {
    path: PathBuf,
    kind: TransformKind,
}

impl TransformRequest {
    pub fn pad_to_square(path: impl Into<PathBuf>) -> Self {
        TransformRequest { path: path.into(), kind: TransformKind::PadToSquare }
    }

    pub fn downscale_to_target(path: impl Into<PathBuf>, target: u32) -> Self {
        TransformRequest { path: path.into(), kind: TransformKind::DownscaleToTarget { target } }
    }

    pub fn path(&self) -> &Path { &self.path }
    pub fn kind(&self) -> TransformKind { self.kind }
}

/// Encoded output of an in-memory transform.
#[derive(Debug, Clone)]
pub struct TransformResult {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Set for padding only.
    pub fill_color: Option<FillColor>,
}

impl TransformResult {
    pub fn outcome(&self) -> TransformOutcome {
        TransformOutcome { width: self.width, height: self.height, fill_color: self.fill_color }
    }
}

/// Geometry reported back to the caller once the file has been written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformOutcome {
    pub width: u32,
    pub height: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<FillColor>,
}

/// Lifecycle of one request. Any stage may move to `Failed`; only the write
/// inside `Transformed -> Written` is ever retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Received,
    Decoded,
    FillColorEstimated,
    Transformed,
    Written,
    Done,
    /// Terminal; the reason travels as the `TransformError` beside it.
    Failed,
}
