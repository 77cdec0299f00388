use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use swimmeet_scraper::app::fetch_use_case::{self, FetchAllOutcome};
use swimmeet_scraper::common::constants::{
    DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, ENV_BASE_URL, ENV_TIMEOUT_SECS, EXIT_CONFIG_ERROR,
    EXIT_OK,
};
use swimmeet_scraper::config::{EventEntry, Settings};
use swimmeet_scraper::infra::ReqwestFetcher;
use swimmeet_scraper::observability::init_logging;
use swimmeet_scraper::parser::ResultsParser;
use swimmeet_scraper::pipeline::{FetchExecutor, RunSummary};
use tracing::error;

#[derive(Parser)]
#[command(name = "swimmeet_scraper")]
#[command(about = "Fetch swim meet results and write them to CSV")]
#[command(version)]
struct Cli {
    /// Base URL for the swim meet data service
    #[arg(long, global = true, env = ENV_BASE_URL, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Request timeout in seconds
    #[arg(long, global = true, env = ENV_TIMEOUT_SECS, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: f64,

    /// Enable debug logging
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a single event
    Fetch(FetchArgs),
    /// Fetch every event defined in a config file
    FetchAll {
        /// Path to a YAML, JSON or TOML config file
        #[arg(long)]
        config: PathBuf,
        /// Print the plan without fetching or writing anything
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Args)]
struct FetchArgs {
    /// Season identifier (e.g. 2024-2025)
    #[arg(long)]
    season: String,
    /// Season phase (prelims or finals)
    #[arg(long)]
    phase: String,
    /// Gender category (girls or boys)
    #[arg(long)]
    gender: String,
    /// Division identifier (e.g. d1)
    #[arg(long)]
    division: String,
    /// Event slug (e.g. 50-freestyle)
    #[arg(long)]
    event_slug: String,
    /// State abbreviation or name
    #[arg(long)]
    state: String,
    /// Output CSV path; defaults to the deterministic name under the folder
    #[arg(long)]
    out: Option<PathBuf>,
    /// Output folder used when --out is omitted (default: _data)
    #[arg(long)]
    folder: Option<String>,
    /// Fetch from a named meet instead of the state compilation
    #[arg(long)]
    meet_slug: Option<String>,
    /// Remote file extension (default: xml)
    #[arg(long)]
    extension: Option<String>,
}

impl FetchArgs {
    fn to_entry(&self) -> EventEntry {
        EventEntry {
            season: Some(self.season.clone()),
            phase: Some(self.phase.clone()),
            gender: Some(self.gender.clone()),
            division: Some(self.division.clone()),
            event_slug: Some(self.event_slug.clone()),
            state: Some(self.state.clone()),
            folder: self.folder.clone(),
            meet_slug: self.meet_slug.clone(),
            extension: self.extension.clone(),
            ..Default::default()
        }
    }
}

fn print_summary(summary: &RunSummary) {
    if summary.has_failures() {
        println!("\n⚠️  Run finished with errors:");
    } else {
        println!("\n✅ Run finished");
    }
    print!("{}", summary.render());
}

async fn run(cli: Cli) -> anyhow::Result<u8> {
    let settings = Settings::new(&cli.base_url, cli.timeout).context("invalid settings")?;
    let executor = FetchExecutor::new(
        Arc::new(ReqwestFetcher::new()),
        Arc::new(ResultsParser::new()),
        settings,
    );

    match cli.command {
        Commands::Fetch(args) => {
            let summary =
                fetch_use_case::fetch_one(&executor, &args.to_entry(), args.out.as_deref())
                    .await
                    .context("invalid event")?;
            print_summary(&summary);
            Ok(summary.exit_code())
        }
        Commands::FetchAll { config, dry_run } => {
            let outcome = fetch_use_case::fetch_all(&executor, &config, dry_run)
                .await
                .with_context(|| format!("could not plan {}", config.display()))?;
            match outcome {
                FetchAllOutcome::Planned(plan) => {
                    print!("{}", plan.render_report());
                    Ok(EXIT_OK)
                }
                FetchAllOutcome::Completed(summary) => {
                    print_summary(&summary);
                    Ok(summary.exit_code())
                }
            }
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Load environment variables before flags so env fallbacks apply
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    let _log_guard = init_logging(cli.verbose);

    match run(cli).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(EXIT_CONFIG_ERROR)
        }
    }
}
