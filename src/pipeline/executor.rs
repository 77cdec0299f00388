use crate::app::ports::{PageFetcher, TableParser};
use crate::common::error::{Result, ScraperError};
use crate::config::Settings;
use crate::domain::ResolvedEventSpec;
use crate::infra::csv_output::write_rows;
use crate::observability::FetchMetrics;
use crate::pipeline::planner::{FetchPlan, FetchPlanItem, PlanAction};
use crate::pipeline::source_url::build_event_url;
use crate::pipeline::summary::{FetchOutcome, FetchResult, RunSummary};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, instrument};

/// Runs plan items one at a time against a fetcher and parser.
pub struct FetchExecutor {
    fetcher: Arc<dyn PageFetcher>,
    parser: Arc<dyn TableParser>,
    settings: Settings,
}

impl FetchExecutor {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        parser: Arc<dyn TableParser>,
        settings: Settings,
    ) -> Self {
        Self {
            fetcher,
            parser,
            settings,
        }
    }

    /// Execute every item in order. A failing item is recorded and the run
    /// moves on to the next one.
    #[instrument(skip(self, plan), fields(items = plan.len()))]
    pub async fn run(&self, plan: &FetchPlan) -> RunSummary {
        let mut summary = RunSummary::default();
        let total = plan.fetch_count();
        info!("Starting run: {} to fetch, {} duplicate(s)", total, plan.skip_count());

        for item in plan.items() {
            match self.execute_item(item).await {
                Some(result) => summary.record(result),
                None => summary.record_skip(),
            }
        }

        info!(
            "Run finished: {} succeeded, {} failed, {} skipped",
            summary.succeeded(),
            summary.failed(),
            summary.skipped
        );
        summary
    }

    /// Execute one item. Skip-duplicate items do nothing and yield `None`.
    #[instrument(skip(self, item), fields(event = %item.spec.key))]
    pub async fn execute_item(&self, item: &FetchPlanItem) -> Option<FetchResult> {
        if item.action == PlanAction::SkipDuplicate {
            debug!("Skipping duplicate");
            FetchMetrics::record_skipped();
            return None;
        }

        let started = Instant::now();
        let outcome = match self.fetch_and_write(&item.spec).await {
            Ok(rows) => {
                FetchMetrics::record_success(rows, started.elapsed().as_secs_f64());
                info!("Wrote {} rows to {}", rows, item.spec.output_path.display());
                FetchOutcome::Written { rows }
            }
            Err(e) => {
                let kind = e.kind();
                FetchMetrics::record_error(kind, started.elapsed().as_secs_f64());
                error!("Failed to fetch {}: {}", item.spec.key, e);
                FetchOutcome::Failed {
                    kind,
                    message: e.to_string(),
                }
            }
        };

        Some(FetchResult {
            key: item.spec.key.clone(),
            output_path: item.spec.output_path.clone(),
            outcome,
        })
    }

    async fn fetch_and_write(&self, spec: &ResolvedEventSpec) -> Result<usize> {
        let url = build_event_url(&self.settings.base_url, spec);
        let timeout = self.settings.timeout;
        info!("Fetching {}", url);

        // Bound every fetcher, not only ones that honour the timeout argument
        let fetched = tokio::time::timeout(timeout, self.fetcher.fetch(&url, timeout)).await;
        let page = match fetched {
            Ok(result) => result?,
            Err(_) => {
                return Err(ScraperError::Timeout {
                    url,
                    secs: timeout.as_secs_f64(),
                })
            }
        };

        let rows = self.parser.parse(&page)?;
        write_rows(&spec.output_path, &rows)
    }
}
