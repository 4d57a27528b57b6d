//! Runs a clash batch against the in-memory document and prints the summary.
//!
//! Usage:
//! ```text
//! cargo run --example batch                       # default pipeline
//! cargo run --example batch -- config.toml        # pipeline from a TOML file
//! RUST_LOG=clashview=debug cargo run --example batch
//! ```

use clashview::clash::{ClashResult, ClashStatus, ClashTest};
use clashview::geometry::Aabb;
use clashview::host::memory::{MemoryClashSource, MemoryViewpointStore, ModelDocument};
use clashview::host::progress::{CancelToken, LoggingProgress};
use clashview::host::Hosts;
use clashview::math::Point3;
use clashview::pipeline::{BatchRunner, PipelineConfig};
use clashview::ClashViewError;

fn load_config() -> clashview::Result<PipelineConfig> {
    match std::env::args().nth(1) {
        Some(path) => {
            let source = std::fs::read_to_string(&path).map_err(|e| {
                ClashViewError::Config(clashview::error::ConfigError::Invalid(format!(
                    "cannot read {path}: {e}"
                )))
            })?;
            Ok(PipelineConfig::from_toml_str(&source)?)
        }
        None => Ok(PipelineConfig::default()),
    }
}

fn cuboid(min: [f64; 3], max: [f64; 3]) -> Option<Aabb> {
    Some(Aabb::new(
        Point3::new(min[0], min[1], min[2]),
        Point3::new(max[0], max[1], max[2]),
    ))
}

fn build_model(doc: &mut ModelDocument) -> ClashTest {
    let duct_a = doc.add_item("Duct A", cuboid([0.0, 0.0, 3.0], [12.0, 0.6, 3.4]));
    let duct_b = doc.add_item("Duct B", cuboid([0.0, 4.0, 3.0], [12.0, 4.6, 3.4]));
    let beam_1 = doc.add_item("Beam 1", cuboid([2.0, -1.0, 3.2], [2.3, 6.0, 3.8]));
    let beam_2 = doc.add_item("Beam 2", cuboid([8.0, -1.0, 3.2], [8.3, 6.0, 3.8]));
    let sleeve = doc.add_item("Sleeve (no geometry)", None);
    doc.add_item("Slab", cuboid([-2.0, -2.0, 3.8], [14.0, 8.0, 4.0]));

    ClashTest::new(
        "Ducts vs Beams",
        vec![
            ClashResult::new("c-001", "Clash1", ClashStatus::New)
                .with_items(Some(duct_a), Some(beam_1)),
            ClashResult::new("c-002", "Clash2", ClashStatus::Active)
                .with_items(Some(duct_a), Some(beam_2)),
            ClashResult::new("c-003", "Clash3", ClashStatus::Reviewed)
                .with_items(Some(duct_b), Some(beam_1)),
            ClashResult::new("c-004", "Clash4", ClashStatus::New)
                .with_items(Some(sleeve), None),
            ClashResult::new("c-005", "Clash5", ClashStatus::Resolved)
                .with_items(Some(duct_b), Some(beam_2)),
        ],
    )
}

fn main() -> clashview::Result<()> {
    // Default: WARN for everything, INFO for clashview.
    // Override with RUST_LOG env var (e.g. RUST_LOG=clashview=debug).
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("batch=info".parse().unwrap_or_default())
        .add_directive("clashview=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = load_config()?;
    let runner = BatchRunner::new(config)?;

    let mut doc = ModelDocument::new();
    let test = build_model(&mut doc);
    let mut source = MemoryClashSource::new();
    let mut store = MemoryViewpointStore::new();
    let token = CancelToken::new();
    let mut progress = LoggingProgress::new(token.clone());

    let summary = runner.run_selected(
        Hosts {
            source: &mut source,
            viewport: &mut doc,
            store: &mut store,
            progress: &mut progress,
        },
        std::slice::from_ref(&test),
    )?;

    println!(
        "{}: {} saved, {} skipped, {} failed of {}{}",
        summary.folder_name,
        summary.success,
        summary.skipped,
        summary.error,
        summary.total,
        if summary.cancelled { " (cancelled)" } else { "" }
    );
    for record in store.viewpoints(&summary.folder_name) {
        let eye = record.pose.position;
        println!(
            "  {:<14} eye ({:.2}, {:.2}, {:.2})  section planes: {}",
            record.name,
            eye.x,
            eye.y,
            eye.z,
            record.section.planes().len()
        );
    }
    for skip in &summary.skips {
        println!("  skipped #{} {}: {}", skip.ordinal, skip.clash_id, skip.reason);
    }
    for failure in &summary.failures {
        println!(
            "  failed #{} {} at {}: {}",
            failure.ordinal, failure.clash_id, failure.step, failure.message
        );
    }
    Ok(())
}
