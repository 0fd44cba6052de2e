pub mod form;
pub mod paths;
