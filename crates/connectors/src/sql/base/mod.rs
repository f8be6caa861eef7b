pub mod context;
pub mod encoder;
pub mod error;
pub mod loader;
pub mod query;
