use std::sync::atomic::{AtomicBool, Ordering};

use chrono::NaiveDateTime;

use crate::clash::{ClashTest, StatusFilter};
use crate::error::{ConfigError, SetupError};
use crate::host::{Hosts, ViewportHost};

use super::config::PipelineConfig;
use super::naming::folder_name;
use super::processor::ClashResultProcessor;
use super::record::{ResultOutcome, SkipReason, Step};

/// A result that ended in an error, with enough detail to diagnose it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureRecord {
    pub ordinal: usize,
    pub clash_id: String,
    pub display_name: String,
    pub step: Step,
    pub message: String,
}

/// A result that was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkipRecord {
    pub ordinal: usize,
    pub clash_id: String,
    pub reason: SkipReason,
}

/// Outcome of one batch run.
///
/// `success + skipped + error` equals the number of attempted results;
/// whatever remains of `total` was not attempted because of cancellation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub success: usize,
    pub skipped: usize,
    pub error: usize,
    /// Number of results the batch was started with.
    pub total: usize,
    pub folder_name: String,
    pub cancelled: bool,
    pub failures: Vec<FailureRecord>,
    pub skips: Vec<SkipRecord>,
}

impl BatchSummary {
    #[must_use]
    pub fn attempted(&self) -> usize {
        self.success + self.skipped + self.error
    }

    #[must_use]
    pub fn unattempted(&self) -> usize {
        self.total - self.attempted()
    }
}

/// Releases the in-flight flag when dropped.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, SetupError> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| SetupError::AlreadyRunning)?;
        Ok(Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Drives a clash test through the viewpoint pipeline.
///
/// Only one batch may run per runner at a time; a nested call returns
/// [`SetupError::AlreadyRunning`].
#[derive(Debug)]
pub struct BatchRunner {
    config: PipelineConfig,
    timestamp: Option<NaiveDateTime>,
    in_flight: AtomicBool,
}

impl BatchRunner {
    /// Creates a runner for a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: PipelineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            timestamp: None,
            in_flight: AtomicBool::new(false),
        })
    }

    /// Fixes the timestamp used in the output folder name instead of the
    /// local time at the start of each batch.
    #[must_use]
    pub fn at(mut self, timestamp: NaiveDateTime) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Lets the clash source pick a test from `candidates`, then runs it
    /// with the configured status filter.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::NoTest`] if no test is selected, otherwise as
    /// [`BatchRunner::run_batch`].
    pub fn run_selected(
        &self,
        hosts: Hosts<'_>,
        candidates: &[ClashTest],
    ) -> Result<BatchSummary, SetupError> {
        let test = hosts
            .source
            .select_test(candidates)
            .ok_or(SetupError::NoTest)?;
        let filter = self.config.status_filter.clone();
        self.run_batch(hosts, &test, &filter)
    }

    /// Runs every result of `test` that passes `filter`.
    ///
    /// Per-result failures are counted in the summary; only setup problems
    /// are returned as errors, before any result is touched.
    ///
    /// # Errors
    ///
    /// Returns an error if another batch is running, the host lacks a
    /// required capability, the test has no matching results, or the
    /// results or output folder cannot be obtained.
    pub fn run_batch(
        &self,
        hosts: Hosts<'_>,
        test: &ClashTest,
        filter: &StatusFilter,
    ) -> Result<BatchSummary, SetupError> {
        let _guard = InFlight::acquire(&self.in_flight)?;
        let Hosts {
            source,
            viewport,
            store,
            progress,
        } = hosts;

        let framing = self.config.resolve_for(&viewport.capabilities())?;
        let results = source.ordered_results(test, filter)?;
        if results.is_empty() {
            return Err(SetupError::NoResults {
                test: test.name.clone(),
            });
        }

        let timestamp = self
            .timestamp
            .unwrap_or_else(|| chrono::Local::now().naive_local());
        let folder = store.create_folder(&folder_name(
            &self.config.folder_prefix,
            &test.name,
            &timestamp,
        ))?;

        let total = results.len();
        tracing::info!(
            test = %test.name,
            total,
            folder = %folder.name,
            framing = framing.name(),
            "Starting clash batch"
        );

        let mut summary = BatchSummary {
            total,
            folder_name: folder.name.clone(),
            ..BatchSummary::default()
        };
        let processor = ClashResultProcessor::new(&self.config, framing, &folder);

        progress.begin(total);
        for (index, result) in results.iter().enumerate() {
            if progress.cancel_requested() {
                tracing::info!(attempted = index, total, "Clash batch cancelled");
                summary.cancelled = true;
                break;
            }
            let ordinal = index + 1;
            progress.update(ordinal, total, &result.display_name);

            match processor.process(ordinal, result, viewport, store) {
                ResultOutcome::Saved { .. } => summary.success += 1,
                ResultOutcome::Skipped(reason) => {
                    summary.skipped += 1;
                    summary.skips.push(SkipRecord {
                        ordinal,
                        clash_id: result.id.clone(),
                        reason,
                    });
                }
                ResultOutcome::Failed { step, error } => {
                    summary.error += 1;
                    summary.failures.push(FailureRecord {
                        ordinal,
                        clash_id: result.id.clone(),
                        display_name: result.display_name.clone(),
                        step,
                        message: error.to_string(),
                    });
                }
            }
        }

        cleanup(viewport);

        tracing::info!(
            success = summary.success,
            skipped = summary.skipped,
            error = summary.error,
            total,
            cancelled = summary.cancelled,
            "Finished clash batch"
        );
        progress.end(&summary);
        Ok(summary)
    }
}

/// Clears any viewport state a batch may have left behind.
fn cleanup(viewport: &mut dyn ViewportHost) {
    let caps = viewport.capabilities();
    let mut calls = Vec::new();
    if caps.sectioning {
        calls.push(viewport.disable_section());
    }
    if caps.hiding {
        calls.push(viewport.reset_all_hidden());
    }
    let items = viewport.model_items();
    calls.push(viewport.reset_color_overrides(&items));
    calls.push(viewport.clear_selection());

    for error in calls.into_iter().filter_map(Result::err) {
        tracing::warn!(%error, "Cleanup call failed");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn in_flight_guard_blocks_reentry() {
        let flag = AtomicBool::new(false);
        let guard = InFlight::acquire(&flag).unwrap();
        assert!(matches!(
            InFlight::acquire(&flag),
            Err(SetupError::AlreadyRunning)
        ));
        drop(guard);
        assert!(InFlight::acquire(&flag).is_ok());
    }

    #[test]
    fn summary_accounts_for_unattempted() {
        let summary = BatchSummary {
            success: 1,
            skipped: 1,
            error: 1,
            total: 5,
            cancelled: true,
            ..BatchSummary::default()
        };
        assert_eq!(summary.attempted(), 3);
        assert_eq!(summary.unattempted(), 2);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = PipelineConfig {
            framing: Vec::new(),
            ..PipelineConfig::default()
        };
        assert!(BatchRunner::new(config).is_err());
    }
}
