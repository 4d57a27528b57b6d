use crate::clash::ItemId;
use crate::geometry::Aabb;
use crate::host::{HostResult, ViewportHost};

/// Computes the combined axis-aligned bounding box of a set of items.
///
/// Items without geometry, or whose box is empty, are ignored. If no item
/// contributes a valid box the result is [`Aabb::empty`]; that is a signal
/// for the caller, not an error.
pub struct UnionBounds {
    items: Vec<ItemId>,
}

impl UnionBounds {
    /// Creates a new `UnionBounds` query.
    #[must_use]
    pub fn new(items: Vec<ItemId>) -> Self {
        Self { items }
    }

    /// Executes the query against the host's item geometry.
    ///
    /// # Errors
    ///
    /// Returns an error if the host cannot resolve an item reference.
    pub fn execute(&self, host: &dyn ViewportHost) -> HostResult<Aabb> {
        let mut boxes = Vec::with_capacity(self.items.len());
        for &item in &self.items {
            boxes.extend(host.item_bounds(item)?);
        }
        Ok(Aabb::union_all(&boxes))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::host::memory::ModelDocument;
    use crate::math::Point3;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn empty_input_is_empty() {
        let doc = ModelDocument::new();
        let bounds = UnionBounds::new(vec![]).execute(&doc).unwrap();
        assert!(bounds.is_empty());
    }

    #[test]
    fn union_of_two_items() {
        let mut doc = ModelDocument::new();
        let a = doc.add_item("a", Some(Aabb::new(p(0.0, 0.0, 0.0), p(1.0, 1.0, 1.0))));
        let b = doc.add_item("b", Some(Aabb::new(p(-1.0, 2.0, 0.0), p(2.0, 3.0, 5.0))));

        let bounds = UnionBounds::new(vec![a, b]).execute(&doc).unwrap();
        assert_eq!(bounds.min, p(-1.0, 0.0, 0.0));
        assert_eq!(bounds.max, p(2.0, 3.0, 5.0));
    }

    #[test]
    fn items_without_geometry_are_ignored() {
        let mut doc = ModelDocument::new();
        let solid = doc.add_item("solid", Some(Aabb::new(p(0.0, 0.0, 0.0), p(1.0, 1.0, 1.0))));
        let bare = doc.add_item("bare", None);
        let degenerate = doc.add_item("degenerate", Some(Aabb::empty()));

        let bounds = UnionBounds::new(vec![bare, solid, degenerate]).execute(&doc).unwrap();
        assert_eq!(bounds.min, p(0.0, 0.0, 0.0));
        assert_eq!(bounds.max, p(1.0, 1.0, 1.0));

        let nothing = UnionBounds::new(vec![bare, degenerate]).execute(&doc).unwrap();
        assert!(nothing.is_empty());
    }

    #[test]
    fn unresolved_item_is_an_error() {
        let mut other = ModelDocument::new();
        let foreign = other.add_item("x", None);
        let doc = ModelDocument::new();
        assert!(UnionBounds::new(vec![foreign]).execute(&doc).is_err());
    }
}
