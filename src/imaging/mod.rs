pub mod border;
pub mod downscale;
pub mod handle;
pub mod pad;
