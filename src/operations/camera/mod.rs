mod frame;
mod look_at;
mod orbit;

pub use frame::{EyeSource, FrameTarget, Framer, FramingMode, FramingOutcome, LookAtFraming};
pub use look_at::LookAt;
pub use orbit::{OrbitEye, ViewDistance};
