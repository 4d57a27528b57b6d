use crate::math::{Point3, Vector3, TOLERANCE};

/// An axis-aligned bounding box.
///
/// The empty box is represented with inverted infinite corners so that
/// folding it with [`Aabb::union`] is the identity. Callers must check
/// [`Aabb::is_empty`] before reading `min`/`max` of a box that may have
/// come out of an aggregation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box.
    pub min: Point3,
    /// Maximum corner of the bounding box.
    pub max: Point3,
}

impl Aabb {
    /// Creates a box from two corners, reordering components as needed.
    #[must_use]
    pub fn new(a: Point3, b: Point3) -> Self {
        Self {
            min: a.inf(&b),
            max: a.sup(&b),
        }
    }

    /// Returns the empty box, the identity for [`Aabb::union`].
    #[must_use]
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Returns a zero-size box at `point`.
    #[must_use]
    pub fn from_point(point: Point3) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    /// Returns `true` if no valid geometry was combined into this box.
    ///
    /// Boxes with non-finite corners are treated as empty as well.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        let finite = self.min.iter().chain(self.max.iter()).all(|v| v.is_finite());
        !finite || self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Returns `true` if the box is non-empty but has zero extent on every axis.
    #[must_use]
    pub fn is_point(&self) -> bool {
        !self.is_empty() && self.max_dimension() <= TOLERANCE
    }

    /// Center of the box. Meaningless for the empty box.
    #[must_use]
    pub fn center(&self) -> Point3 {
        nalgebra::center(&self.min, &self.max)
    }

    /// Extent along each axis, zero for the empty box.
    #[must_use]
    pub fn size(&self) -> Vector3 {
        if self.is_empty() {
            return Vector3::zeros();
        }
        self.max - self.min
    }

    /// Largest extent across the three axes.
    #[must_use]
    pub fn max_dimension(&self) -> f64 {
        self.size().max()
    }

    /// Smallest box containing both `self` and `other`.
    #[must_use]
    pub fn union(&self, other: &Aabb) -> Aabb {
        if other.is_empty() {
            return *self;
        }
        if self.is_empty() {
            return *other;
        }
        Aabb {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }

    /// Grows the box to contain `point`.
    pub fn include_point(&mut self, point: &Point3) {
        *self = self.union(&Aabb::from_point(*point));
    }

    /// Folds an iterator of boxes, skipping empty ones.
    #[must_use]
    pub fn union_all<'a>(boxes: impl IntoIterator<Item = &'a Aabb>) -> Aabb {
        boxes
            .into_iter()
            .fold(Aabb::empty(), |acc, b| acc.union(b))
    }

    /// Returns the box grown by `padding` on every side.
    #[must_use]
    pub fn expanded(&self, padding: f64) -> Aabb {
        self.expanded_per_axis(&Vector3::repeat(padding))
    }

    /// Returns the box grown by `padding[i]` on both sides of axis `i`.
    #[must_use]
    pub fn expanded_per_axis(&self, padding: &Vector3) -> Aabb {
        Aabb {
            min: self.min - *padding,
            max: self.max + *padding,
        }
    }

    /// Returns `true` if `point` lies inside or on the boundary of the box.
    #[must_use]
    pub fn contains(&self, point: &Point3) -> bool {
        !self.is_empty()
            && (0..3).all(|i| point[i] >= self.min[i] && point[i] <= self.max[i])
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn empty_is_union_identity() {
        let b = Aabb::new(p(0.0, 0.0, 0.0), p(1.0, 2.0, 3.0));
        assert!(Aabb::empty().is_empty());
        assert_eq!(Aabb::empty().union(&b), b);
        assert_eq!(b.union(&Aabb::empty()), b);
    }

    #[test]
    fn union_all_skips_empty_boxes() {
        let none: [Aabb; 0] = [];
        assert!(Aabb::union_all(&none).is_empty());
        assert!(Aabb::union_all(&[Aabb::empty(), Aabb::empty()]).is_empty());

        let boxes = [
            Aabb::new(p(0.0, 0.0, 0.0), p(1.0, 1.0, 1.0)),
            Aabb::empty(),
            Aabb::new(p(-1.0, 2.0, 0.0), p(2.0, 3.0, 5.0)),
        ];
        let u = Aabb::union_all(&boxes);
        assert_eq!(u.min, p(-1.0, 0.0, 0.0));
        assert_eq!(u.max, p(2.0, 3.0, 5.0));
    }

    #[test]
    fn union_takes_componentwise_extremes() {
        let a = Aabb::new(p(0.0, 0.0, 0.0), p(1.0, 1.0, 1.0));
        let b = Aabb::new(p(-1.0, 2.0, 0.0), p(2.0, 3.0, 5.0));
        let u = a.union(&b);
        assert_eq!(u.min, p(-1.0, 0.0, 0.0));
        assert_eq!(u.max, p(2.0, 3.0, 5.0));
    }

    #[test]
    fn new_reorders_corners() {
        let b = Aabb::new(p(2.0, -1.0, 4.0), p(0.0, 3.0, 1.0));
        assert_eq!(b.min, p(0.0, -1.0, 1.0));
        assert_eq!(b.max, p(2.0, 3.0, 4.0));
    }

    #[test]
    fn center_and_size() {
        let b = Aabb::new(p(-1.0, 0.0, 2.0), p(3.0, 2.0, 2.0));
        assert_relative_eq!(b.center(), p(1.0, 1.0, 2.0));
        assert_relative_eq!(b.size(), Vector3::new(4.0, 2.0, 0.0));
        assert_relative_eq!(b.max_dimension(), 4.0);
        assert_relative_eq!(Aabb::empty().max_dimension(), 0.0);
    }

    #[test]
    fn non_finite_corner_is_empty() {
        let b = Aabb {
            min: p(0.0, f64::NAN, 0.0),
            max: p(1.0, 1.0, 1.0),
        };
        assert!(b.is_empty());
        assert!(!b.contains(&p(0.5, 0.5, 0.5)));
    }

    #[test]
    fn include_point_grows_from_empty() {
        let mut b = Aabb::empty();
        b.include_point(&p(1.0, 1.0, 1.0));
        assert!(b.is_point());
        b.include_point(&p(-1.0, 2.0, 0.0));
        assert_eq!(b.min, p(-1.0, 1.0, 0.0));
        assert_eq!(b.max, p(1.0, 2.0, 1.0));
        assert!(b.contains(&p(0.0, 1.5, 0.5)));
    }

    #[test]
    fn expanded_per_axis() {
        let b = Aabb::from_point(p(0.0, 0.0, 0.0)).expanded_per_axis(&Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(b.min, p(-1.0, -2.0, -3.0));
        assert_eq!(b.max, p(1.0, 2.0, 3.0));
    }
}
