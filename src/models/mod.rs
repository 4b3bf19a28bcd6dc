//! Data models

mod clone_behaviour;
mod image;

pub use clone_behaviour::*;
pub use image::*;
