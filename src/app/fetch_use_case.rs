use crate::common::error::{Result, ScraperError};
use crate::config::{load_config, validate_entry, EventEntry};
use crate::domain::{Defaults, OutputTarget};
use crate::pipeline::executor::FetchExecutor;
use crate::pipeline::expander::{expand, expand_all};
use crate::pipeline::planner::FetchPlan;
use crate::pipeline::summary::RunSummary;
use std::path::Path;
use tracing::info;

/// What `fetch-all` produced.
#[derive(Debug)]
pub enum FetchAllOutcome {
    /// Dry run: the plan, nothing fetched or written.
    Planned(FetchPlan),
    Completed(RunSummary),
}

/// Load, expand and plan a config document. Pure apart from reading the file.
pub fn plan_config(config_path: &Path) -> Result<FetchPlan> {
    let config = load_config(config_path)?;
    info!(
        "Loaded {} event entr{} from {}",
        config.events.len(),
        if config.events.len() == 1 { "y" } else { "ies" },
        config_path.display()
    );
    let resolved = expand_all(&config.defaults, &config.events)?;
    FetchPlan::build(resolved)
}

/// Plan a single event from command-line fields.
///
/// `out` is an explicit output file; without it the deterministic file name
/// is used under the entry's folder (or the base data directory).
pub fn plan_single(entry: &EventEntry, out: Option<&Path>) -> Result<FetchPlan> {
    let mut raw = validate_entry(entry)?;
    if let Some(out) = out {
        raw.output = Some(OutputTarget::File(out.to_string_lossy().into_owned()));
    }
    let mut resolved = expand(&Defaults::default(), &raw)?;
    match resolved.pop() {
        Some(spec) if resolved.is_empty() => Ok(FetchPlan::single(spec)),
        _ => Err(ScraperError::config("a single fetch takes exactly one season")),
    }
}

/// `fetch-all`: configuration errors abort before anything is fetched.
pub async fn fetch_all(
    executor: &FetchExecutor,
    config_path: &Path,
    dry_run: bool,
) -> Result<FetchAllOutcome> {
    let plan = plan_config(config_path)?;
    if dry_run {
        info!("Dry run: {} item(s) planned, nothing fetched", plan.len());
        return Ok(FetchAllOutcome::Planned(plan));
    }
    Ok(FetchAllOutcome::Completed(executor.run(&plan).await))
}

/// `fetch`: one event through the same resolution and execution path.
pub async fn fetch_one(
    executor: &FetchExecutor,
    entry: &EventEntry,
    out: Option<&Path>,
) -> Result<RunSummary> {
    let plan = plan_single(entry, out)?;
    Ok(executor.run(&plan).await)
}
