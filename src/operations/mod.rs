pub mod bounds;
pub mod camera;
pub mod section;
