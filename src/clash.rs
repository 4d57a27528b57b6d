//! Clash results as supplied by the external clash engine.
//!
//! These types are read-only to the pipeline: results are produced by a
//! [`ClashSource`](crate::host::ClashSource) and never mutated here.

use std::fmt;

use serde::{Deserialize, Serialize};

slotmap::new_key_type! {
    /// Opaque reference to a model item held by the viewport host.
    pub struct ItemId;
}

/// Review status of a clash result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClashStatus {
    New,
    Active,
    Reviewed,
    Approved,
    Resolved,
}

impl fmt::Display for ClashStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ClashStatus::New => "New",
            ClashStatus::Active => "Active",
            ClashStatus::Reviewed => "Reviewed",
            ClashStatus::Approved => "Approved",
            ClashStatus::Resolved => "Resolved",
        };
        f.write_str(name)
    }
}

/// A single interference between up to two model items.
#[derive(Debug, Clone, PartialEq)]
pub struct ClashResult {
    /// Identifier assigned by the clash engine.
    pub id: String,
    /// Human readable name, used in saved viewpoint names.
    pub display_name: String,
    pub status: ClashStatus,
    pub item1: Option<ItemId>,
    pub item2: Option<ItemId>,
}

impl ClashResult {
    /// Creates a result with no items attached.
    #[must_use]
    pub fn new(id: impl Into<String>, display_name: impl Into<String>, status: ClashStatus) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            status,
            item1: None,
            item2: None,
        }
    }

    /// Attaches the clashing items.
    #[must_use]
    pub fn with_items(mut self, item1: Option<ItemId>, item2: Option<ItemId>) -> Self {
        self.item1 = item1;
        self.item2 = item2;
        self
    }

    /// The items that are present, in `item1, item2` order.
    #[must_use]
    pub fn items(&self) -> Vec<ItemId> {
        self.item1.into_iter().chain(self.item2).collect()
    }
}

/// A named clash test with its results in engine order.
#[derive(Debug, Clone, PartialEq)]
pub struct ClashTest {
    pub name: String,
    pub results: Vec<ClashResult>,
}

impl ClashTest {
    #[must_use]
    pub fn new(name: impl Into<String>, results: Vec<ClashResult>) -> Self {
        Self {
            name: name.into(),
            results,
        }
    }
}

/// Restricts which results of a test are processed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    /// Every result, regardless of status.
    #[default]
    All,
    /// Only results whose status is listed.
    Only(Vec<ClashStatus>),
}

impl StatusFilter {
    /// Filter for results still needing attention (`New` and `Active`).
    #[must_use]
    pub fn open() -> Self {
        StatusFilter::Only(vec![ClashStatus::New, ClashStatus::Active])
    }

    /// Returns `true` if a result with `status` passes the filter.
    #[must_use]
    pub fn matches(&self, status: ClashStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(statuses) => statuses.contains(&status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[test]
    fn items_skips_missing_references() {
        let mut keys: SlotMap<ItemId, ()> = SlotMap::with_key();
        let a = keys.insert(());
        let b = keys.insert(());

        let both = ClashResult::new("1", "A", ClashStatus::New).with_items(Some(a), Some(b));
        assert_eq!(both.items(), vec![a, b]);

        let second_only = ClashResult::new("2", "B", ClashStatus::New).with_items(None, Some(b));
        assert_eq!(second_only.items(), vec![b]);

        assert!(ClashResult::new("3", "C", ClashStatus::New).items().is_empty());
    }

    #[test]
    fn status_filter_matches() {
        assert!(StatusFilter::All.matches(ClashStatus::Resolved));
        let open = StatusFilter::open();
        assert!(open.matches(ClashStatus::New));
        assert!(open.matches(ClashStatus::Active));
        assert!(!open.matches(ClashStatus::Approved));
    }
}
