use crate::error::GeometryError;
use crate::geometry::CameraPose;
use crate::math::{world_up, Point3, Vector3, VIEW_EPSILON};

/// `|forward × up|` below this means the two are treated as parallel.
const PARALLEL_TOLERANCE: f64 = 1e-6;

/// Builds a camera pose at `eye` looking at `target`.
///
/// The basis is right-handed: `right = forward × up`, `up' = right × forward`
/// and the camera's local +Z is `-forward`.
pub struct LookAt {
    eye: Point3,
    target: Point3,
    world_up: Vector3,
}

impl LookAt {
    /// Creates a new `LookAt` using the default Z-up world.
    #[must_use]
    pub fn new(eye: Point3, target: Point3) -> Self {
        Self {
            eye,
            target,
            world_up: world_up(),
        }
    }

    /// Overrides the preferred world up direction.
    #[must_use]
    pub fn with_world_up(mut self, up: Vector3) -> Self {
        self.world_up = up;
        self
    }

    /// Executes the construction.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::DegenerateView`] if eye and target are closer
    /// than [`VIEW_EPSILON`].
    pub fn execute(&self) -> Result<CameraPose, GeometryError> {
        let delta = self.target - self.eye;
        let distance = delta.norm();
        if distance.is_nan() || distance < VIEW_EPSILON {
            return Err(GeometryError::DegenerateView { distance });
        }
        let forward = delta / distance;

        // Fall back to +Y, then +X, when looking straight along the up axis.
        let right = [self.world_up, Vector3::y(), Vector3::x()]
            .iter()
            .map(|up| forward.cross(up))
            .find(|r| r.norm() > PARALLEL_TOLERANCE)
            .ok_or(GeometryError::ZeroVector)?
            .normalize();
        let up = right.cross(&forward).normalize();

        Ok(CameraPose {
            position: self.eye,
            right,
            up,
            back: -forward,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn assert_basis(pose: &CameraPose) {
        for v in [pose.right, pose.up, pose.back] {
            assert_relative_eq!(v.norm(), 1.0, epsilon = 1e-6);
        }
        assert!(pose.right.dot(&pose.up).abs() < 1e-6);
        assert!(pose.right.dot(&pose.view_direction()).abs() < 1e-6);
        assert!(pose.up.dot(&pose.view_direction()).abs() < 1e-6);
        assert_relative_eq!(pose.right.cross(&pose.up), pose.back, epsilon = 1e-9);
    }

    #[test]
    fn looking_along_x() {
        let pose = LookAt::new(p(0.0, 0.0, 0.0), p(10.0, 0.0, 0.0)).execute().unwrap();
        assert_relative_eq!(pose.view_direction(), Vector3::x());
        assert_relative_eq!(pose.up, Vector3::z());
        assert_relative_eq!(pose.right, -Vector3::y());
        assert_basis(&pose);
    }

    #[test]
    fn eye_equal_to_target_is_degenerate() {
        let err = LookAt::new(p(5.0, 5.0, 5.0), p(5.0, 5.0, 5.0)).execute().unwrap_err();
        assert!(matches!(err, GeometryError::DegenerateView { .. }));
    }

    #[test]
    fn nearly_coincident_is_degenerate() {
        let result = LookAt::new(p(1.0, 1.0, 1.0), p(1.0, 1.0, 1.0 + 5e-5)).execute();
        assert!(matches!(result, Err(GeometryError::DegenerateView { .. })));
    }

    #[test]
    fn looking_straight_down_falls_back_to_y_up() {
        let pose = LookAt::new(p(0.0, 0.0, 10.0), p(0.0, 0.0, 0.0)).execute().unwrap();
        assert_relative_eq!(pose.view_direction(), -Vector3::z());
        assert_basis(&pose);
        assert!(pose.up.dot(&Vector3::y()).abs() > 0.99);
    }

    #[test]
    fn oblique_view_keeps_up_vertical() {
        let pose = LookAt::new(p(10.0, 10.0, 10.0), p(0.0, 0.0, 0.0)).execute().unwrap();
        assert_basis(&pose);
        // Right stays horizontal, up leans towards +Z.
        assert!(pose.right.z.abs() < 1e-9);
        assert!(pose.up.z > 0.0);
    }

    #[test]
    fn custom_world_up() {
        let pose = LookAt::new(p(0.0, 0.0, 0.0), p(0.0, 0.0, -5.0))
            .with_world_up(Vector3::y())
            .execute()
            .unwrap();
        assert_relative_eq!(pose.up, Vector3::y());
        assert_basis(&pose);
    }
}
