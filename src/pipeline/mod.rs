//! Turning clash results into saved viewpoints.
//!
//! [`BatchRunner`] walks the results of a clash test and hands each one to
//! a [`ClashResultProcessor`], which bounds, sections, highlights and
//! frames it before saving a [`ViewpointRecord`].

mod batch;
mod config;
mod naming;
mod processor;
mod record;

pub use batch::{BatchRunner, BatchSummary, FailureRecord, SkipRecord};
pub use config::{IsolationMode, PipelineConfig, PlaneAnchor, SectionMode, DEFAULT_FOLDER_PREFIX};
pub use naming::{folder_name, viewpoint_name};
pub use processor::ClashResultProcessor;
pub use record::{ResultOutcome, SkipReason, Step, ViewpointRecord};
