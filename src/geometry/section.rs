use crate::math::{Point3, Vector3};

use super::Aabb;

/// A half-space bounded by a plane.
///
/// Points satisfying `normal · p + offset <= 0` are kept; everything on the
/// positive side of the plane is cut away.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HalfSpace {
    /// Unit outward normal of the bounding plane.
    pub normal: Vector3,
    /// Plane offset, so that the plane is `normal · p + offset = 0`.
    pub offset: f64,
}

impl HalfSpace {
    /// Creates a half-space whose boundary plane passes through `point`.
    ///
    /// `normal` is expected to be unit length.
    #[must_use]
    pub fn through_point(normal: Vector3, point: &Point3) -> Self {
        Self {
            normal,
            offset: -normal.dot(&point.coords),
        }
    }

    /// Signed distance from `point` to the boundary plane (negative inside).
    #[must_use]
    pub fn signed_distance(&self, point: &Point3) -> f64 {
        self.normal.dot(&point.coords) + self.offset
    }

    /// Returns `true` if `point` is kept by this half-space.
    #[must_use]
    pub fn contains(&self, point: &Point3, tolerance: f64) -> bool {
        self.signed_distance(point) <= tolerance
    }
}

/// The cutaway applied to the viewport while a result is captured.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SectionVolume {
    /// No active section.
    #[default]
    Disabled,
    /// Six half-spaces bounding a box, ordered `+X, -X, +Y, -Y, +Z, -Z`.
    Box([HalfSpace; 6]),
    /// A single cutting plane.
    SinglePlane(HalfSpace),
}

impl SectionVolume {
    /// Builds a box volume from the faces of `bounds`.
    #[must_use]
    pub fn from_box(bounds: &Aabb) -> Self {
        let (min, max) = (bounds.min, bounds.max);
        SectionVolume::Box([
            HalfSpace::through_point(Vector3::x(), &max),
            HalfSpace::through_point(-Vector3::x(), &min),
            HalfSpace::through_point(Vector3::y(), &max),
            HalfSpace::through_point(-Vector3::y(), &min),
            HalfSpace::through_point(Vector3::z(), &max),
            HalfSpace::through_point(-Vector3::z(), &min),
        ])
    }

    /// The active planes, empty when disabled.
    #[must_use]
    pub fn planes(&self) -> &[HalfSpace] {
        match self {
            SectionVolume::Disabled => &[],
            SectionVolume::Box(planes) => planes,
            SectionVolume::SinglePlane(plane) => std::slice::from_ref(plane),
        }
    }

    /// Returns `true` if no plane is active.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        matches!(self, SectionVolume::Disabled)
    }

    /// Returns `true` if `point` survives every active plane.
    #[must_use]
    pub fn contains(&self, point: &Point3, tolerance: f64) -> bool {
        self.planes().iter().all(|plane| plane.contains(point, tolerance))
    }

    /// Recovers the box described by a [`SectionVolume::Box`].
    #[must_use]
    pub fn as_box(&self) -> Option<Aabb> {
        let SectionVolume::Box(planes) = self else {
            return None;
        };
        let max = Point3::new(-planes[0].offset, -planes[2].offset, -planes[4].offset);
        let min = Point3::new(planes[1].offset, planes[3].offset, planes[5].offset);
        Some(Aabb { min, max })
    }
}
