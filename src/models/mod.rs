pub mod entity;
pub mod outcome;

pub use entity::*;
pub use outcome::*;
