//! Capability traits for the collaborators the pipeline drives.
//!
//! The clash engine, the interactive viewport, viewpoint persistence and
//! progress UI all live outside this crate. The pipeline only ever talks to
//! them through these traits, passed in explicitly as [`Hosts`].

pub mod memory;
pub mod progress;

use crate::clash::{ClashResult, ClashTest, ItemId, StatusFilter};
use crate::error::HostError;
use crate::geometry::{Aabb, CameraPose, Color, SectionVolume};
use crate::pipeline::{BatchSummary, ViewpointRecord};

/// Result type for collaborator calls.
pub type HostResult<T> = std::result::Result<T, HostError>;

/// Supplies clash tests and their results.
pub trait ClashSource {
    /// Picks the test to process from `candidates`, or `None` if the user
    /// declined or nothing is suitable.
    fn select_test(&mut self, candidates: &[ClashTest]) -> Option<ClashTest>;

    /// Returns the results of `test` that pass `filter`, in engine order.
    ///
    /// # Errors
    ///
    /// Returns an error if the clash engine cannot enumerate the results.
    fn ordered_results(
        &mut self,
        test: &ClashTest,
        filter: &StatusFilter,
    ) -> HostResult<Vec<ClashResult>>;
}

/// Optional features a viewport host may or may not provide.
///
/// Queried once per batch; the pipeline never probes by trial and error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct HostCapabilities {
    /// `frame_to_selection` is available.
    pub frame_to_selection: bool,
    /// `set_camera_pose` is available.
    pub camera_control: bool,
    /// `enable_section` / `disable_section` are available.
    pub sectioning: bool,
    /// `set_hidden` / `reset_all_hidden` are available.
    pub hiding: bool,
}

impl HostCapabilities {
    /// A host supporting every optional feature.
    #[must_use]
    pub fn all() -> Self {
        Self {
            frame_to_selection: true,
            camera_control: true,
            sectioning: true,
            hiding: true,
        }
    }
}

/// The interactive 3D document: model items, selection, section, camera.
pub trait ViewportHost {
    fn capabilities(&self) -> HostCapabilities;

    /// Bounding box of `item`, or `None` if it has no geometry.
    ///
    /// # Errors
    ///
    /// Returns an error if the item reference cannot be resolved.
    fn item_bounds(&self, item: ItemId) -> HostResult<Option<Aabb>>;

    /// Every item in the model, used by isolation and global cleanup.
    fn model_items(&self) -> Vec<ItemId>;

    /// Overrides the display color of `items`.
    ///
    /// # Errors
    ///
    /// Returns an error if the host rejects the override.
    fn highlight(&mut self, items: &[ItemId], color: Color) -> HostResult<()>;

    /// Replaces the current selection with `items`.
    ///
    /// # Errors
    ///
    /// Returns an error if the host rejects the selection.
    fn set_selection(&mut self, items: &[ItemId]) -> HostResult<()>;

    /// # Errors
    ///
    /// Returns an error if the host cannot clear the selection.
    fn clear_selection(&mut self) -> HostResult<()>;

    /// Activates `volume` as the current section.
    ///
    /// # Errors
    ///
    /// Returns an error if the host cannot apply the section.
    fn enable_section(&mut self, volume: &SectionVolume) -> HostResult<()>;

    /// # Errors
    ///
    /// Returns an error if the host cannot remove the section.
    fn disable_section(&mut self) -> HostResult<()>;

    /// Zooms the camera to fit the current selection.
    ///
    /// # Errors
    ///
    /// Returns an error if framing fails or nothing is selected.
    fn frame_to_selection(&mut self) -> HostResult<()>;

    /// # Errors
    ///
    /// Returns an error if the host rejects the pose.
    fn set_camera_pose(&mut self, pose: &CameraPose) -> HostResult<()>;

    /// # Errors
    ///
    /// Returns an error if the camera cannot be read.
    fn current_camera_pose(&self) -> HostResult<CameraPose>;

    /// # Errors
    ///
    /// Returns an error if the host cannot change visibility.
    fn set_hidden(&mut self, items: &[ItemId], hidden: bool) -> HostResult<()>;

    /// # Errors
    ///
    /// Returns an error if the host cannot reset visibility.
    fn reset_all_hidden(&mut self) -> HostResult<()>;

    /// Removes color overrides from `items`.
    ///
    /// # Errors
    ///
    /// Returns an error if the host cannot reset the overrides.
    fn reset_color_overrides(&mut self, items: &[ItemId]) -> HostResult<()>;
}

/// Handle to a viewpoint folder created by a [`ViewpointStore`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FolderRef {
    pub name: String,
}

/// Persists saved viewpoints.
pub trait ViewpointStore {
    /// # Errors
    ///
    /// Returns an error if the folder cannot be created.
    fn create_folder(&mut self, name: &str) -> HostResult<FolderRef>;

    /// # Errors
    ///
    /// Returns an error if the viewpoint cannot be saved.
    fn save_viewpoint(&mut self, folder: &FolderRef, record: &ViewpointRecord) -> HostResult<()>;
}

/// Receives batch progress and answers cancellation polls.
pub trait ProgressSink {
    fn begin(&mut self, total: usize);

    /// Reports that result `current` (1-based) of `total` is starting.
    fn update(&mut self, current: usize, total: usize, label: &str);

    /// Polled before each result; `true` stops the batch.
    fn cancel_requested(&mut self) -> bool;

    fn end(&mut self, summary: &BatchSummary);
}

/// The set of collaborators one batch runs against.
pub struct Hosts<'a> {
    pub source: &'a mut dyn ClashSource,
    pub viewport: &'a mut dyn ViewportHost,
    pub store: &'a mut dyn ViewpointStore,
    pub progress: &'a mut dyn ProgressSink,
}
