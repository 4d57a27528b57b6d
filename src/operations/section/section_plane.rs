use crate::geometry::{HalfSpace, SectionVolume};
use crate::math::{world_up, Point3};

/// Builds a single horizontal cutting plane.
///
/// Only the vertical axis is constrained: everything above the reference
/// point's elevation is cut away, giving a plan-style view of the clash.
pub struct SectionPlane {
    reference: Point3,
}

impl SectionPlane {
    /// Plane through the elevation of `reference`.
    #[must_use]
    pub fn horizontal(reference: Point3) -> Self {
        Self { reference }
    }

    /// Executes the operation, returning a [`SectionVolume::SinglePlane`].
    #[must_use]
    pub fn execute(&self) -> SectionVolume {
        SectionVolume::SinglePlane(HalfSpace::through_point(world_up(), &self.reference))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn plane_at_reference_elevation() {
        let volume = SectionPlane::horizontal(Point3::new(3.0, -2.0, 7.5)).execute();
        let SectionVolume::SinglePlane(plane) = volume else {
            panic!("expected a single plane, got {volume:?}");
        };
        assert_relative_eq!(plane.normal, world_up());
        assert_relative_eq!(plane.offset, -7.5);
    }

    #[test]
    fn only_vertical_axis_is_constrained() {
        let volume = SectionPlane::horizontal(Point3::new(0.0, 0.0, 1.0)).execute();
        assert!(volume.contains(&Point3::new(1e6, -1e6, 0.9), 0.0));
        assert!(!volume.contains(&Point3::new(0.0, 0.0, 1.1), 0.0));
        assert_eq!(volume.planes().len(), 1);
    }
}
