//! Safe 3D bounding box types and functions.

mod common;

pub use cuboid::*;
pub mod cuboid;

pub use extent::*;
pub mod extent;

pub use into_cuboid::*;
pub mod into_cuboid;
