pub mod board;
pub mod config;
pub mod entity;
pub mod geometry;

pub use board::*;
pub use config::*;
pub use entity::*;
pub use geometry::*;
