pub mod clash;
pub mod error;
pub mod geometry;
pub mod host;
pub mod math;
pub mod operations;
pub mod pipeline;

pub use error::{ClashViewError, Result};
