pub mod durable_writer;
