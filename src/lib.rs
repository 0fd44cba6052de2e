pub mod error;
pub mod imaging;
pub mod persist;
pub mod transform;

// Convenience re-exports
pub use error::{PreconditionError, TransformError};
pub use imaging::border::{estimate_fill_color, FillColor};
pub use imaging::handle::{ImageHandle, PixelFormat};
pub use persist::durable_writer::{DurableWriter, RetryPolicy};
pub use transform::request::{Stage, TransformKind, TransformOutcome, TransformRequest, TransformResult};
pub use transform::transformer::{apply, Transformer};
