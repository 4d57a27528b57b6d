use crate::clash::{ClashResult, ItemId};
use crate::error::HostError;
use crate::geometry::{Aabb, SectionVolume};
use crate::host::{FolderRef, HostResult, ViewpointStore, ViewportHost};
use crate::operations::bounds::UnionBounds;
use crate::operations::camera::{FrameTarget, Framer, FramingMode, FramingOutcome};
use crate::operations::section::{SectionBox, SectionPlane};

use super::config::{IsolationMode, PipelineConfig, PlaneAnchor, SectionMode};
use super::naming::viewpoint_name;
use super::record::{ResultOutcome, SkipReason, Step, ViewpointRecord};

/// Viewport state touched by one result, undone by the reset step.
#[derive(Debug, Default)]
struct Applied {
    hidden: bool,
    faded: Vec<ItemId>,
}

type StepResult<T> = std::result::Result<T, (Step, HostError)>;

fn at(step: Step) -> impl FnOnce(HostError) -> (Step, HostError) {
    move |error| (step, error)
}

/// Runs a single clash result through the viewpoint pipeline.
///
/// Every step that touches the viewport may fail on its own. Failures are
/// caught here, classified with the step that raised them, and never
/// propagate further. The reset step runs on every exit path.
pub struct ClashResultProcessor<'a> {
    config: &'a PipelineConfig,
    framing: FramingMode,
    folder: &'a FolderRef,
}

impl<'a> ClashResultProcessor<'a> {
    /// Creates a processor saving into `folder` with an already resolved
    /// framing strategy.
    #[must_use]
    pub fn new(config: &'a PipelineConfig, framing: FramingMode, folder: &'a FolderRef) -> Self {
        Self {
            config,
            framing,
            folder,
        }
    }

    /// Processes `result` as the `ordinal`-th (1-based) attempted result.
    pub fn process(
        &self,
        ordinal: usize,
        result: &ClashResult,
        viewport: &mut dyn ViewportHost,
        store: &mut dyn ViewpointStore,
    ) -> ResultOutcome {
        let span = tracing::debug_span!("clash_result", ordinal, clash_id = %result.id);
        let _enter = span.enter();

        let items = result.items();
        let mut applied = Applied::default();
        let outcome = match self.run_steps(ordinal, result, &items, viewport, store, &mut applied) {
            Ok(outcome) => outcome,
            Err((step, error)) => {
                tracing::error!(%step, %error, "Clash result failed");
                ResultOutcome::Failed { step, error }
            }
        };
        self.reset(&items, &applied, viewport);
        outcome
    }

    fn run_steps(
        &self,
        ordinal: usize,
        result: &ClashResult,
        items: &[ItemId],
        viewport: &mut dyn ViewportHost,
        store: &mut dyn ViewpointStore,
        applied: &mut Applied,
    ) -> StepResult<ResultOutcome> {
        if items.is_empty() {
            tracing::warn!(step = %Step::CollectItems, "Skipping clash result without items");
            return Ok(ResultOutcome::Skipped(SkipReason::NoItems));
        }

        let bounds = UnionBounds::new(items.to_vec())
            .execute(&*viewport)
            .map_err(at(Step::ComputeBounds))?;
        if bounds.is_empty() || bounds.is_point() {
            tracing::warn!(step = %Step::ComputeBounds, "Skipping clash result without geometry");
            return Ok(ResultOutcome::Skipped(SkipReason::EmptyGeometry));
        }
        tracing::debug!(?bounds, "Computed clash bounds");

        let section = self
            .apply_section(&bounds, items, viewport)
            .map_err(at(Step::ApplySection))?;

        self.isolate(items, viewport, applied)
            .map_err(at(Step::Isolate))?;

        viewport
            .highlight(items, self.config.highlight_color)
            .map_err(at(Step::Highlight))?;

        viewport.set_selection(items).map_err(at(Step::Select))?;

        let target = self
            .frame_target(&bounds, items, &*viewport)
            .map_err(at(Step::Frame))?;
        let framing = Framer::new(self.framing, target)
            .execute(viewport)
            .map_err(at(Step::Frame))?;
        let framed = framing != FramingOutcome::DegenerateView;
        if !framed {
            tracing::warn!(step = %Step::Frame, "Degenerate view, capturing current camera");
        }

        let name = viewpoint_name(ordinal, &result.display_name);
        let pose = viewport.current_camera_pose().map_err(at(Step::Capture))?;
        let record = ViewpointRecord {
            name: name.clone(),
            pose,
            section,
            highlighted_items: items.to_vec(),
        };
        store
            .save_viewpoint(self.folder, &record)
            .map_err(at(Step::Capture))?;
        tracing::debug!(%name, "Saved viewpoint");

        Ok(ResultOutcome::Saved { name, framed })
    }

    fn apply_section(
        &self,
        bounds: &Aabb,
        items: &[ItemId],
        viewport: &mut dyn ViewportHost,
    ) -> HostResult<SectionVolume> {
        let volume = match self.config.section {
            SectionMode::None => return Ok(SectionVolume::Disabled),
            SectionMode::Box(padding) => SectionBox::new(*bounds, padding).execute(),
            SectionMode::SinglePlane { anchor } => {
                let reference = match anchor {
                    PlaneAnchor::FirstItemCenter => first_item_bounds(items, &*viewport)?
                        .unwrap_or(*bounds)
                        .center(),
                    PlaneAnchor::BoundsCenter => bounds.center(),
                };
                SectionPlane::horizontal(reference).execute()
            }
        };
        viewport.enable_section(&volume)?;
        Ok(volume)
    }

    fn isolate(
        &self,
        items: &[ItemId],
        viewport: &mut dyn ViewportHost,
        applied: &mut Applied,
    ) -> HostResult<()> {
        match self.config.isolation {
            IsolationMode::None => Ok(()),
            IsolationMode::HideOthers => {
                let bystanders = others(items, &*viewport);
                applied.hidden = true;
                viewport.set_hidden(&bystanders, true)
            }
            IsolationMode::FadeTemplate { color } => {
                applied.faded = others(items, &*viewport);
                viewport.highlight(&applied.faded, color)
            }
        }
    }

    fn frame_target(
        &self,
        bounds: &Aabb,
        items: &[ItemId],
        viewport: &dyn ViewportHost,
    ) -> HostResult<Aabb> {
        Ok(match self.config.frame_target {
            FrameTarget::CombinedBounds => *bounds,
            FrameTarget::FirstItem => first_item_bounds(items, viewport)?.unwrap_or(*bounds),
        })
    }

    /// Undoes everything the steps may have applied. Each call is attempted
    /// independently; failures are logged and do not change the outcome.
    fn reset(&self, items: &[ItemId], applied: &Applied, viewport: &mut dyn ViewportHost) {
        if !matches!(self.config.section, SectionMode::None) {
            log_reset_failure(viewport.disable_section());
        }
        if applied.hidden {
            log_reset_failure(viewport.reset_all_hidden());
        }
        let overridden: Vec<ItemId> = items.iter().chain(&applied.faded).copied().collect();
        log_reset_failure(viewport.reset_color_overrides(&overridden));
        log_reset_failure(viewport.clear_selection());
    }
}

fn log_reset_failure(result: HostResult<()>) {
    if let Err(error) = result {
        tracing::warn!(step = %Step::Reset, %error, "Reset call failed");
    }
}

/// Bounds of the first item, if it has usable geometry.
fn first_item_bounds(items: &[ItemId], viewport: &dyn ViewportHost) -> HostResult<Option<Aabb>> {
    let Some(&first) = items.first() else {
        return Ok(None);
    };
    Ok(viewport.item_bounds(first)?.filter(|b| !b.is_empty()))
}

/// Every model item not in `items`.
fn others(items: &[ItemId], viewport: &dyn ViewportHost) -> Vec<ItemId> {
    viewport
        .model_items()
        .into_iter()
        .filter(|id| !items.contains(id))
        .collect()
}
