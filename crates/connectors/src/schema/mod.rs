pub mod field;
pub mod kind;
pub mod model;
