//! In-memory collaborators.
//!
//! [`ModelDocument`] is a small self-contained viewport: items live in a
//! slot map, every call is counted, and individual calls can be made to
//! fail. Together with [`MemoryClashSource`] and [`MemoryViewpointStore`] it
//! is enough to drive a full batch without a real host application.

use std::cell::RefCell;
use std::collections::HashMap;

use slotmap::SlotMap;

use crate::clash::{ClashResult, ClashTest, ItemId, StatusFilter};
use crate::error::HostError;
use crate::geometry::{Aabb, CameraPose, Color, SectionVolume};
use crate::operations::bounds::UnionBounds;
use crate::operations::camera::{LookAt, OrbitEye};
use crate::pipeline::ViewpointRecord;

use super::{ClashSource, FolderRef, HostCapabilities, HostResult, ViewpointStore, ViewportHost};

/// Collaborator operations, used to count calls and inject failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostOp {
    ItemBounds,
    Highlight,
    SetSelection,
    ClearSelection,
    EnableSection,
    DisableSection,
    FrameToSelection,
    SetCameraPose,
    CurrentCameraPose,
    SetHidden,
    ResetAllHidden,
    ResetColorOverrides,
    OrderedResults,
    CreateFolder,
    SaveViewpoint,
}

impl HostOp {
    /// Operation name as reported in [`HostError::operation`].
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            HostOp::ItemBounds => "item_bounds",
            HostOp::Highlight => "highlight",
            HostOp::SetSelection => "set_selection",
            HostOp::ClearSelection => "clear_selection",
            HostOp::EnableSection => "enable_section",
            HostOp::DisableSection => "disable_section",
            HostOp::FrameToSelection => "frame_to_selection",
            HostOp::SetCameraPose => "set_camera_pose",
            HostOp::CurrentCameraPose => "current_camera_pose",
            HostOp::SetHidden => "set_hidden",
            HostOp::ResetAllHidden => "reset_all_hidden",
            HostOp::ResetColorOverrides => "reset_color_overrides",
            HostOp::OrderedResults => "ordered_results",
            HostOp::CreateFolder => "create_folder",
            HostOp::SaveViewpoint => "save_viewpoint",
        }
    }
}

/// Call counter with optional injected failures.
///
/// A failure is keyed by operation and 1-based call number: registering
/// `(Highlight, 3)` makes the third `highlight` call fail. Counts sit
/// behind a `RefCell` so read-only host queries are counted too.
#[derive(Debug, Default)]
pub struct CallLog {
    counts: RefCell<HashMap<HostOp, usize>>,
    failures: Vec<(HostOp, usize)>,
}

impl CallLog {
    /// Number of times `op` has been called.
    #[must_use]
    pub fn count(&self, op: HostOp) -> usize {
        self.counts.borrow().get(&op).copied().unwrap_or(0)
    }

    /// Makes the `call`-th invocation of `op` fail.
    pub fn fail_on(&mut self, op: HostOp, call: usize) {
        self.failures.push((op, call));
    }

    fn record(&self, op: HostOp) -> HostResult<()> {
        let n = {
            let mut counts = self.counts.borrow_mut();
            let n = counts.entry(op).or_insert(0);
            *n += 1;
            *n
        };
        if self.failures.contains(&(op, n)) {
            return Err(HostError::new(op.name(), format!("injected failure on call {n}")));
        }
        Ok(())
    }
}

/// A model item held by a [`ModelDocument`].
#[derive(Debug, Clone)]
pub struct ItemData {
    pub name: String,
    /// World-space bounds, `None` for items without geometry.
    pub bounds: Option<Aabb>,
    pub hidden: bool,
    pub color_override: Option<Color>,
}

/// In-memory viewport and document.
#[derive(Debug)]
pub struct ModelDocument {
    items: SlotMap<ItemId, ItemData>,
    selection: Vec<ItemId>,
    section: SectionVolume,
    camera: CameraPose,
    capabilities: HostCapabilities,
    calls: CallLog,
}

impl Default for ModelDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelDocument {
    /// Creates an empty document supporting every capability.
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: SlotMap::with_key(),
            selection: Vec::new(),
            section: SectionVolume::Disabled,
            camera: CameraPose::default(),
            capabilities: HostCapabilities::all(),
            calls: CallLog::default(),
        }
    }

    /// Restricts the capabilities this document reports.
    #[must_use]
    pub fn with_capabilities(mut self, capabilities: HostCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Adds an item and returns its reference.
    pub fn add_item(&mut self, name: impl Into<String>, bounds: Option<Aabb>) -> ItemId {
        self.items.insert(ItemData {
            name: name.into(),
            bounds,
            hidden: false,
            color_override: None,
        })
    }

    /// Returns the item data, if the reference is live.
    #[must_use]
    pub fn item(&self, id: ItemId) -> Option<&ItemData> {
        self.items.get(id)
    }

    #[must_use]
    pub fn selection(&self) -> &[ItemId] {
        &self.selection
    }

    #[must_use]
    pub fn section(&self) -> &SectionVolume {
        &self.section
    }

    #[must_use]
    pub fn camera(&self) -> &CameraPose {
        &self.camera
    }

    /// Call counts and failure injection.
    #[must_use]
    pub fn calls(&self) -> &CallLog {
        &self.calls
    }

    pub fn calls_mut(&mut self) -> &mut CallLog {
        &mut self.calls
    }

    /// Returns `true` if any item is hidden or carries a color override.
    #[must_use]
    pub fn has_overrides(&self) -> bool {
        self.items
            .values()
            .any(|item| item.hidden || item.color_override.is_some())
    }

    fn resolve(&self, op: HostOp, items: &[ItemId]) -> HostResult<()> {
        match items.iter().find(|id| !self.items.contains_key(**id)) {
            Some(_) => Err(HostError::new(op.name(), "unknown item reference")),
            None => Ok(()),
        }
    }

    fn unsupported(op: HostOp) -> HostError {
        HostError::new(op.name(), "not supported by this host")
    }
}

impl ViewportHost for ModelDocument {
    fn capabilities(&self) -> HostCapabilities {
        self.capabilities
    }

    fn item_bounds(&self, item: ItemId) -> HostResult<Option<Aabb>> {
        self.calls.record(HostOp::ItemBounds)?;
        self.items
            .get(item)
            .map(|data| data.bounds)
            .ok_or_else(|| HostError::new(HostOp::ItemBounds.name(), "unknown item reference"))
    }

    fn model_items(&self) -> Vec<ItemId> {
        self.items.keys().collect()
    }

    fn highlight(&mut self, items: &[ItemId], color: Color) -> HostResult<()> {
        self.calls.record(HostOp::Highlight)?;
        self.resolve(HostOp::Highlight, items)?;
        for id in items {
            if let Some(item) = self.items.get_mut(*id) {
                item.color_override = Some(color);
            }
        }
        Ok(())
    }

    fn set_selection(&mut self, items: &[ItemId]) -> HostResult<()> {
        self.calls.record(HostOp::SetSelection)?;
        self.resolve(HostOp::SetSelection, items)?;
        self.selection = items.to_vec();
        Ok(())
    }

    fn clear_selection(&mut self) -> HostResult<()> {
        self.calls.record(HostOp::ClearSelection)?;
        self.selection.clear();
        Ok(())
    }

    fn enable_section(&mut self, volume: &SectionVolume) -> HostResult<()> {
        self.calls.record(HostOp::EnableSection)?;
        if !self.capabilities.sectioning {
            return Err(Self::unsupported(HostOp::EnableSection));
        }
        self.section = *volume;
        Ok(())
    }

    fn disable_section(&mut self) -> HostResult<()> {
        self.calls.record(HostOp::DisableSection)?;
        self.section = SectionVolume::Disabled;
        Ok(())
    }

    fn frame_to_selection(&mut self) -> HostResult<()> {
        self.calls.record(HostOp::FrameToSelection)?;
        if !self.capabilities.frame_to_selection {
            return Err(Self::unsupported(HostOp::FrameToSelection));
        }
        let bounds = UnionBounds::new(self.selection.clone()).execute(&*self)?;
        if bounds.is_empty() {
            return Err(HostError::new(
                HostOp::FrameToSelection.name(),
                "selection has no geometry",
            ));
        }
        let target = bounds.center();
        let eye = OrbitEye::default().execute(&bounds);
        self.camera = LookAt::new(eye, target)
            .execute()
            .map_err(|e| HostError::new(HostOp::FrameToSelection.name(), e.to_string()))?;
        Ok(())
    }

    fn set_camera_pose(&mut self, pose: &CameraPose) -> HostResult<()> {
        self.calls.record(HostOp::SetCameraPose)?;
        if !self.capabilities.camera_control {
            return Err(Self::unsupported(HostOp::SetCameraPose));
        }
        self.camera = *pose;
        Ok(())
    }

    fn current_camera_pose(&self) -> HostResult<CameraPose> {
        self.calls.record(HostOp::CurrentCameraPose)?;
        Ok(self.camera)
    }

    fn set_hidden(&mut self, items: &[ItemId], hidden: bool) -> HostResult<()> {
        self.calls.record(HostOp::SetHidden)?;
        if !self.capabilities.hiding {
            return Err(Self::unsupported(HostOp::SetHidden));
        }
        self.resolve(HostOp::SetHidden, items)?;
        for id in items {
            if let Some(item) = self.items.get_mut(*id) {
                item.hidden = hidden;
            }
        }
        Ok(())
    }

    fn reset_all_hidden(&mut self) -> HostResult<()> {
        self.calls.record(HostOp::ResetAllHidden)?;
        for item in self.items.values_mut() {
            item.hidden = false;
        }
        Ok(())
    }

    fn reset_color_overrides(&mut self, items: &[ItemId]) -> HostResult<()> {
        self.calls.record(HostOp::ResetColorOverrides)?;
        for id in items {
            if let Some(item) = self.items.get_mut(*id) {
                item.color_override = None;
            }
        }
        Ok(())
    }
}

/// Clash source over a fixed list of tests.
///
/// `select_test` picks the candidate named by [`MemoryClashSource::prefer`],
/// or the first candidate otherwise.
#[derive(Debug, Default)]
pub struct MemoryClashSource {
    preferred: Option<String>,
    fail_listing: bool,
}

impl MemoryClashSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects the test with this name when offered.
    #[must_use]
    pub fn prefer(mut self, name: impl Into<String>) -> Self {
        self.preferred = Some(name.into());
        self
    }

    /// Makes `ordered_results` fail.
    #[must_use]
    pub fn failing(mut self) -> Self {
        self.fail_listing = true;
        self
    }
}

impl ClashSource for MemoryClashSource {
    fn select_test(&mut self, candidates: &[ClashTest]) -> Option<ClashTest> {
        match &self.preferred {
            Some(name) => candidates.iter().find(|t| &t.name == name).cloned(),
            None => candidates.first().cloned(),
        }
    }

    fn ordered_results(
        &mut self,
        test: &ClashTest,
        filter: &StatusFilter,
    ) -> HostResult<Vec<ClashResult>> {
        if self.fail_listing {
            return Err(HostError::new(
                HostOp::OrderedResults.name(),
                "clash engine unavailable",
            ));
        }
        Ok(test
            .results
            .iter()
            .filter(|r| filter.matches(r.status))
            .cloned()
            .collect())
    }
}

/// Viewpoint store keeping every folder and record in memory.
#[derive(Debug, Default)]
pub struct MemoryViewpointStore {
    folders: Vec<(FolderRef, Vec<ViewpointRecord>)>,
    calls: CallLog,
}

impl MemoryViewpointStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Folders in creation order.
    pub fn folders(&self) -> impl Iterator<Item = &FolderRef> {
        self.folders.iter().map(|(folder, _)| folder)
    }

    /// Records saved under `folder`, in save order.
    #[must_use]
    pub fn viewpoints(&self, folder: &str) -> &[ViewpointRecord] {
        self.folders
            .iter()
            .find(|(f, _)| f.name == folder)
            .map_or(&[], |(_, records)| records.as_slice())
    }

    #[must_use]
    pub fn calls(&self) -> &CallLog {
        &self.calls
    }

    pub fn calls_mut(&mut self) -> &mut CallLog {
        &mut self.calls
    }
}

impl ViewpointStore for MemoryViewpointStore {
    fn create_folder(&mut self, name: &str) -> HostResult<FolderRef> {
        self.calls.record(HostOp::CreateFolder)?;
        let folder = FolderRef {
            name: name.to_string(),
        };
        self.folders.push((folder.clone(), Vec::new()));
        Ok(folder)
    }

    fn save_viewpoint(&mut self, folder: &FolderRef, record: &ViewpointRecord) -> HostResult<()> {
        self.calls.record(HostOp::SaveViewpoint)?;
        let (_, records) = self
            .folders
            .iter_mut()
            .find(|(f, _)| f == folder)
            .ok_or_else(|| HostError::new(HostOp::SaveViewpoint.name(), "unknown folder"))?;
        records.push(record.clone());
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::clash::ClashStatus;
    use crate::math::Point3;

    fn cube(x: f64) -> Option<Aabb> {
        Some(Aabb::new(Point3::new(x, 0.0, 0.0), Point3::new(x + 1.0, 1.0, 1.0)))
    }

    #[test]
    fn injected_failure_hits_only_that_call() {
        let mut doc = ModelDocument::new();
        let a = doc.add_item("a", cube(0.0));
        doc.calls_mut().fail_on(HostOp::Highlight, 2);

        assert!(doc.highlight(&[a], Color::RED).is_ok());
        let err = doc.highlight(&[a], Color::RED).unwrap_err();
        assert_eq!(err.operation, "highlight");
        assert!(doc.highlight(&[a], Color::RED).is_ok());
        assert_eq!(doc.calls().count(HostOp::Highlight), 3);
    }

    #[test]
    fn read_only_queries_are_counted() {
        let mut doc = ModelDocument::new();
        let a = doc.add_item("a", cube(0.0));
        doc.calls_mut().fail_on(HostOp::ItemBounds, 2);
        doc.calls_mut().fail_on(HostOp::CurrentCameraPose, 1);

        assert!(doc.item_bounds(a).is_ok());
        assert_eq!(doc.item_bounds(a).unwrap_err().operation, "item_bounds");
        assert_eq!(
            doc.current_camera_pose().unwrap_err().operation,
            "current_camera_pose"
        );
        assert!(doc.current_camera_pose().is_ok());
        assert_eq!(doc.calls().count(HostOp::ItemBounds), 2);
        assert_eq!(doc.calls().count(HostOp::CurrentCameraPose), 2);
    }

    #[test]
    fn frame_to_selection_looks_at_selection() {
        let mut doc = ModelDocument::new();
        let a = doc.add_item("a", cube(10.0));
        doc.set_selection(&[a]).unwrap();
        doc.frame_to_selection().unwrap();

        let pose = doc.current_camera_pose().unwrap();
        assert!(pose.is_orthonormal(1e-9));
        let to_target = (Point3::new(10.5, 0.5, 0.5) - pose.position).normalize();
        assert!((to_target.dot(&pose.view_direction()) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn frame_to_empty_selection_fails() {
        let mut doc = ModelDocument::new();
        doc.add_item("no geometry", None);
        assert!(doc.frame_to_selection().is_err());
    }

    #[test]
    fn unknown_item_is_rejected() {
        let mut other = ModelDocument::new();
        let foreign = other.add_item("x", cube(0.0));
        let mut doc = ModelDocument::new();
        assert!(doc.item_bounds(foreign).is_err());
        assert!(doc.set_selection(&[foreign]).is_err());
    }

    #[test]
    fn source_filters_by_status() {
        let test = ClashTest::new(
            "T",
            vec![
                ClashResult::new("1", "a", ClashStatus::New),
                ClashResult::new("2", "b", ClashStatus::Resolved),
                ClashResult::new("3", "c", ClashStatus::Active),
            ],
        );
        let mut source = MemoryClashSource::new();
        let open = source.ordered_results(&test, &StatusFilter::open()).unwrap();
        let ids: Vec<_> = open.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["1", "3"]);
    }

    #[test]
    fn source_prefers_named_test() {
        let tests = [ClashTest::new("A", vec![]), ClashTest::new("B", vec![])];
        assert_eq!(MemoryClashSource::new().select_test(&tests).unwrap().name, "A");
        let mut source = MemoryClashSource::new().prefer("B");
        assert_eq!(source.select_test(&tests).unwrap().name, "B");
        let mut missing = MemoryClashSource::new().prefer("C");
        assert!(missing.select_test(&tests).is_none());
    }
}
