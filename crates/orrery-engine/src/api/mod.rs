pub mod error;
pub mod sinks;
pub mod types;
