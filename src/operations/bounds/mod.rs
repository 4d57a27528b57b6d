mod union_bounds;

pub use union_bounds::UnionBounds;
