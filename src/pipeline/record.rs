use std::fmt;

use crate::clash::ItemId;
use crate::error::HostError;
use crate::geometry::{CameraPose, SectionVolume};

/// A saved viewpoint, handed to the [`ViewpointStore`](crate::host::ViewpointStore).
#[derive(Debug, Clone, PartialEq)]
pub struct ViewpointRecord {
    pub name: String,
    pub pose: CameraPose,
    /// Section active when the viewpoint was captured.
    pub section: SectionVolume,
    pub highlighted_items: Vec<ItemId>,
}

/// Steps of the per-result pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    CollectItems,
    ComputeBounds,
    ApplySection,
    Isolate,
    Highlight,
    Select,
    Frame,
    Capture,
    Reset,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::CollectItems => "collect_items",
            Step::ComputeBounds => "compute_bounds",
            Step::ApplySection => "apply_section",
            Step::Isolate => "isolate",
            Step::Highlight => "highlight",
            Step::Select => "select",
            Step::Frame => "frame",
            Step::Capture => "capture",
            Step::Reset => "reset",
        };
        f.write_str(name)
    }
}

/// Why a result was skipped rather than processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Neither clash item is present.
    NoItems,
    /// None of the items has usable geometry, or together they collapse to
    /// a single point.
    EmptyGeometry,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoItems => f.write_str("no items"),
            SkipReason::EmptyGeometry => f.write_str("empty geometry"),
        }
    }
}

/// Classification of one processed result.
#[derive(Debug, Clone)]
pub enum ResultOutcome {
    /// A viewpoint was saved. `framed` is `false` when the view was
    /// degenerate and the camera was left where it was.
    Saved { name: String, framed: bool },
    Skipped(SkipReason),
    Failed { step: Step, error: HostError },
}

impl ResultOutcome {
    #[must_use]
    pub fn is_saved(&self) -> bool {
        matches!(self, ResultOutcome::Saved { .. })
    }
}
