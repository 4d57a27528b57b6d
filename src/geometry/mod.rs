mod aabb;
mod color;
mod pose;
mod section;

pub use aabb::Aabb;
pub use color::Color;
pub use pose::CameraPose;
pub use section::{HalfSpace, SectionVolume};
