pub mod coercion;
pub mod connect;
pub mod encoder;
pub mod loader;
pub mod payload;
pub mod quote;
