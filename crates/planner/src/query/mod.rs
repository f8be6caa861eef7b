pub mod ast;
pub mod builder;
pub mod dialect;
pub mod renderer;
