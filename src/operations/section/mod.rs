mod padding;
mod section_box;
mod section_plane;

pub use padding::{PaddingMode, PaddingPolicy};
pub use section_box::SectionBox;
pub use section_plane::SectionPlane;
