// Event-fetch pipeline: expansion, path resolution, planning, execution

pub mod executor;
pub mod expander;
pub mod paths;
pub mod planner;
pub mod source_url;
pub mod summary;

// Re-export key types and functions from each stage
pub use executor::FetchExecutor;
pub use expander::{expand, expand_all};
pub use paths::{event_file_name, normalize_path, resolve_output_path};
pub use planner::{FetchPlan, FetchPlanItem, PlanAction};
pub use source_url::build_event_url;
pub use summary::{FetchOutcome, FetchResult, RunSummary};
