pub mod files;
pub mod transform;
