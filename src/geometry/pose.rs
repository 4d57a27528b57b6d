use crate::math::{Point3, Vector3};

/// Camera position and orientation.
///
/// The orientation is a right-handed orthonormal basis `(right, up, back)`;
/// the camera looks along `-back`, which [`CameraPose::view_direction`]
/// returns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    /// Eye position in world space.
    pub position: Point3,
    /// Camera-local +X axis.
    pub right: Vector3,
    /// Camera-local +Y axis.
    pub up: Vector3,
    /// Camera-local +Z axis, opposite to the view direction.
    pub back: Vector3,
}

impl CameraPose {
    /// Direction the camera is looking in.
    #[must_use]
    pub fn view_direction(&self) -> Vector3 {
        -self.back
    }

    /// Returns `true` if the basis vectors are unit length and mutually
    /// orthogonal within `eps`.
    #[must_use]
    pub fn is_orthonormal(&self, eps: f64) -> bool {
        let unit = [self.right, self.up, self.back]
            .iter()
            .all(|v| (v.norm() - 1.0).abs() <= eps);
        unit && self.right.dot(&self.up).abs() <= eps
            && self.right.dot(&self.back).abs() <= eps
            && self.up.dot(&self.back).abs() <= eps
    }
}

impl Default for CameraPose {
    /// Camera at the origin looking down world -Z with +Y up.
    fn default() -> Self {
        Self {
            position: Point3::origin(),
            right: Vector3::x(),
            up: Vector3::y(),
            back: Vector3::z(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn default_pose_is_orthonormal() {
        let pose = CameraPose::default();
        assert!(pose.is_orthonormal(1e-12));
        assert_relative_eq!(pose.view_direction(), -Vector3::z());
    }

    #[test]
    fn skewed_basis_is_rejected() {
        let pose = CameraPose {
            up: Vector3::new(0.1, 1.0, 0.0),
            ..CameraPose::default()
        };
        assert!(!pose.is_orthonormal(1e-6));
    }
}
