use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::geometry::Aabb;
use crate::math::{Point3, Vector3};

/// Eye distance as a function of clash size.
///
/// `distance = max(max_dimension * multiplier, min_distance)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewDistance {
    pub multiplier: f64,
    pub min_distance: f64,
}

impl ViewDistance {
    /// Close-up framing for small clashes.
    #[must_use]
    pub fn tight() -> Self {
        Self {
            multiplier: 2.0,
            min_distance: 0.5,
        }
    }

    /// Framing with surrounding context visible.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            multiplier: 2.5,
            min_distance: 10.0,
        }
    }

    /// Eye distance for a target box.
    #[must_use]
    pub fn for_bounds(&self, bounds: &Aabb) -> f64 {
        (bounds.max_dimension() * self.multiplier).max(self.min_distance)
    }
}

impl Default for ViewDistance {
    fn default() -> Self {
        Self::standard()
    }
}

/// Synthesizes an eye position orbiting a target box.
///
/// The eye sits at `center + distance * dir`, with `dir` given by an azimuth
/// (from +X towards +Y) and an elevation (above the XY plane), in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitEye {
    pub distance: ViewDistance,
    pub azimuth_deg: f64,
    pub elevation_deg: f64,
}

impl Default for OrbitEye {
    fn default() -> Self {
        Self {
            distance: ViewDistance::standard(),
            azimuth_deg: 45.0,
            elevation_deg: 35.0,
        }
    }
}

impl OrbitEye {
    /// Unit direction from the target towards the eye.
    #[must_use]
    pub fn direction(&self) -> Vector3 {
        let az = self.azimuth_deg.to_radians();
        let el = self.elevation_deg.to_radians();
        Vector3::new(el.cos() * az.cos(), el.cos() * az.sin(), el.sin())
    }

    /// Eye position for `bounds`. An empty box orbits the origin at the
    /// minimum distance.
    #[must_use]
    pub fn execute(&self, bounds: &Aabb) -> Point3 {
        let target = if bounds.is_empty() {
            Point3::origin()
        } else {
            bounds.center()
        };
        target + self.direction() * self.distance.for_bounds(bounds)
    }

    /// # Errors
    ///
    /// Returns an error if the distance parameters are not positive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ViewDistance {
            multiplier,
            min_distance,
        } = self.distance;
        if !(multiplier.is_finite() && multiplier >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "view distance multiplier must be non-negative, got {multiplier}"
            )));
        }
        if !(min_distance.is_finite() && min_distance > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "minimum view distance must be positive, got {min_distance}"
            )));
        }
        if !(self.azimuth_deg.is_finite() && self.elevation_deg.is_finite()) {
            return Err(ConfigError::Invalid("orbit angles must be finite".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn distance_has_floor() {
        let small = Aabb::new(Point3::origin(), Point3::new(0.1, 0.1, 0.1));
        assert_relative_eq!(ViewDistance::tight().for_bounds(&small), 0.5);
        assert_relative_eq!(ViewDistance::standard().for_bounds(&small), 10.0);

        let large = Aabb::new(Point3::origin(), Point3::new(8.0, 2.0, 1.0));
        assert_relative_eq!(ViewDistance::tight().for_bounds(&large), 16.0);
        assert_relative_eq!(ViewDistance::standard().for_bounds(&large), 20.0);
    }

    #[test]
    fn direction_is_unit() {
        let orbit = OrbitEye::default();
        assert_relative_eq!(orbit.direction().norm(), 1.0, epsilon = 1e-12);
        let flat = OrbitEye {
            azimuth_deg: 90.0,
            elevation_deg: 0.0,
            ..OrbitEye::default()
        };
        assert_relative_eq!(flat.direction(), Vector3::y(), epsilon = 1e-12);
    }

    #[test]
    fn eye_sits_at_distance_from_center() {
        let bounds = Aabb::new(Point3::new(10.0, 10.0, 0.0), Point3::new(12.0, 12.0, 2.0));
        let orbit = OrbitEye {
            distance: ViewDistance::tight(),
            azimuth_deg: 45.0,
            elevation_deg: 45.0,
        };
        let eye = orbit.execute(&bounds);
        assert_relative_eq!((eye - bounds.center()).norm(), 4.0, epsilon = 1e-9);
        assert!(eye.x > 11.0 && eye.y > 11.0 && eye.z > 1.0);
    }

    #[test]
    fn validate_rejects_zero_floor() {
        let orbit = OrbitEye {
            distance: ViewDistance {
                multiplier: 2.0,
                min_distance: 0.0,
            },
            ..OrbitEye::default()
        };
        assert!(orbit.validate().is_err());
        assert!(OrbitEye::default().validate().is_ok());
    }
}
