/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Minimum eye-to-target distance for a look-at to be well defined.
pub const VIEW_EPSILON: f64 = 1e-4;

/// Default world up axis (Z-up model space).
#[must_use]
pub fn world_up() -> Vector3 {
    Vector3::z()
}
