use std::path::Path;

use crate::error::{Result, TransformError};
use crate::imaging::downscale::downscale_to_target;
use crate::imaging::handle::{ImageHandle, PixelFormat};
use crate::imaging::pad::pad_to_square;
use crate::persist::durable_writer::DurableWriter;
use crate::transform::request::{Stage, TransformKind, TransformOutcome, TransformRequest, TransformResult};

/// Runs normalization transforms against files on disk.
///
/// Holds no per-request state; one instance can serve any number of threads.
/// Two requests on the same path at once are not coordinated.
#[derive(Debug, Clone, Default)]
pub struct Transformer {
    writer: DurableWriter,
}

impl Transformer {
    pub fn new(writer: DurableWriter) -> Self {
        Transformer { writer }
    }

    /// Reads `path`, pads it to a square and writes it back as PNG.
    pub fn pad_to_square(&self, path: &Path) -> Result<TransformOutcome> {
        self.run(&TransformRequest::pad_to_square(path))
    }

    /// Reads `path`, shrinks it to `target x target` and writes it back as PNG.
    pub fn downscale_to_target(&self, path: &Path, target: u32) -> Result<TransformOutcome> {
        self.run(&TransformRequest::downscale_to_target(path, target))
    }

    /// Executes one request. The file is only touched once the whole
    /// transform has succeeded in memory.
    pub fn run(&self, request: &TransformRequest) -> Result<TransformOutcome> {
        self.run_tracked(request).0
    }

    /// Like `run`, also returning the terminal stage: `Done` on success,
    /// `Failed` otherwise (the reason is the returned error).
    pub fn run_tracked(&self, request: &TransformRequest) -> (Result<TransformOutcome>, Stage) {
        let mut stage = Stage::Received;
        match self.run_stages(request, &mut stage) {
            Ok(outcome) => {
                log::info!(
                    "{} {} -> {}x{}",
                    request.kind().name(),
                    request.path().display(),
                    outcome.width,
                    outcome.height
                );
                (Ok(outcome), stage)
            }
            Err(e) => {
                log::warn!(
                    "{} {} failed after {:?}: {}",
                    request.kind().name(),
                    request.path().display(),
                    stage,
                    e
                );
                advance(&mut stage, Stage::Failed);
                (Err(e), stage)
            }
        }
    }

    fn run_stages(&self, request: &TransformRequest, stage: &mut Stage) -> Result<TransformOutcome> {
        let path = request.path();
        let bytes = std::fs::read(path)
            .map_err(|source| TransformError::Read { path: path.to_path_buf(), source })?;

        let handle = ImageHandle::decode(&bytes)?;
        advance(stage, Stage::Decoded);

        let result = transform(handle, request.kind(), stage)?;
        advance(stage, Stage::Transformed);

        self.writer.write(path, &result.bytes)?;
        advance(stage, Stage::Written);

        advance(stage, Stage::Done);
        Ok(result.outcome())
    }
}

/// Applies `kind` to a decoded image entirely in memory.
pub fn apply(handle: ImageHandle, kind: TransformKind) -> Result<TransformResult> {
    let mut stage = Stage::Decoded;
    transform(handle, kind, &mut stage)
}

fn transform(handle: ImageHandle, kind: TransformKind, stage: &mut Stage) -> Result<TransformResult> {
    match kind {
        TransformKind::PadToSquare => {
            let padded = pad_to_square(handle)?;
            let fill = padded.fill;
            advance(stage, Stage::FillColorEstimated);
            log::debug!("fill color: {}", fill.as_str());

            let (width, height) = padded.image.dimensions();
            let square = ImageHandle::from_raw(width, height, PixelFormat::Rgb8, padded.image.into_raw())?;
            Ok(TransformResult { bytes: square.encode_png()?, width, height, fill_color: Some(fill) })
        }
        TransformKind::DownscaleToTarget { target } => {
            let small = downscale_to_target(handle, target)?;
            let (width, height) = (small.width(), small.height());
            Ok(TransformResult { bytes: small.encode_png()?, width, height, fill_color: None })
        }
    }
}

fn advance(stage: &mut Stage, next: Stage) {
    log::debug!("stage {:?} -> {:?}", stage, next);
    *stage = next;
}
