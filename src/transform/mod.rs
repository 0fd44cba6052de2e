pub mod request;
pub mod transformer;
