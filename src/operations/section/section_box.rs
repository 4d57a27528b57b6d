use crate::geometry::{Aabb, SectionVolume};
use crate::math::Point3;

use super::PaddingPolicy;

/// Builds a six-plane section box around a clash.
///
/// The box is grown symmetrically by the padding policy, so even a
/// zero-size or empty input yields a volume with positive extent on every
/// axis. An empty input is centered on the origin.
pub struct SectionBox {
    bounds: Aabb,
    padding: PaddingPolicy,
}

impl SectionBox {
    /// Creates a new `SectionBox` operation.
    #[must_use]
    pub fn new(bounds: Aabb, padding: PaddingPolicy) -> Self {
        Self { bounds, padding }
    }

    /// The padded box the section planes enclose.
    #[must_use]
    pub fn padded_bounds(&self) -> Aabb {
        let base = if self.bounds.is_empty() {
            Aabb::from_point(Point3::origin())
        } else {
            self.bounds
        };
        base.expanded_per_axis(&self.padding.padding_for(&base))
    }

    /// Executes the operation, returning a [`SectionVolume::Box`].
    #[must_use]
    pub fn execute(&self) -> SectionVolume {
        SectionVolume::from_box(&self.padded_bounds())
    }
}
