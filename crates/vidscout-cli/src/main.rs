use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use vidscout_client::{DriveConfig, DriveUploader, YouTubeClient, YouTubeConfig};
use vidscout_core::aggregate::AggregatorConfig;
use vidscout_core::error::PipelineError;
use vidscout_core::export::ExportOutcome;
use vidscout_core::models::ItemId;
use vidscout_core::pipeline::{ReportService, RunReport, is_auth_failure};
use vidscout_core::traits::{NullUploader, Uploader};
use vidscout_core::util::timestamped;

#[derive(Parser)]
#[command(name = "vidscout", version, about = "YouTube search statistics exporter")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search videos by keyword and export their statistics
    Search {
        /// Keyword to search for (prompted for when omitted)
        query: Option<String>,

        /// Number of search hits to enrich (1-50)
        #[arg(short = 'n', long, default_value_t = 50)]
        max_results: u32,

        #[command(flatten)]
        api: ApiArgs,

        #[command(flatten)]
        export: ExportArgs,
    },

    /// Export statistics for explicit video ids
    Details {
        /// Video id (repeatable)
        #[arg(long = "id", required = true)]
        ids: Vec<String>,

        #[command(flatten)]
        api: ApiArgs,

        #[command(flatten)]
        export: ExportArgs,
    },
}

#[derive(Args)]
struct ApiArgs {
    /// YouTube Data API key
    #[arg(short = 'k', long, env = "YOUTUBE_API_KEY", hide_env_values = true)]
    api_key: String,

    /// YouTube Data API base URL
    #[arg(
        long,
        env = "YOUTUBE_API_URL",
        default_value = "https://www.googleapis.com/youtube/v3"
    )]
    api_url: String,

    /// Per-request timeout in seconds
    #[arg(long, env = "VIDSCOUT_TIMEOUT_SECS", default_value_t = 30)]
    timeout: u64,

    /// Maximum concurrent detail lookups
    #[arg(short, long, env = "VIDSCOUT_MAX_CONCURRENCY", default_value_t = 50)]
    concurrency: usize,
}

#[derive(Args)]
struct ExportArgs {
    /// Destination CSV file (".csv" is appended when missing)
    #[arg(short, long, default_value = "youtube_videos.csv")]
    output: PathBuf,

    /// Append the current date and time to the file name
    #[arg(long, default_value_t = false)]
    timestamp: bool,

    /// Upload the export to Google Drive (requires GOOGLE_DRIVE_TOKEN)
    #[arg(long, default_value_t = false)]
    upload: bool,
}

enum Job {
    Search { query: String, max_results: u32 },
    Ids(Vec<ItemId>),
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Setup tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("vidscout=info".parse()?))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Search {
            query,
            max_results,
            api,
            export,
        } => {
            let query = match query {
                Some(q) if !q.trim().is_empty() => q,
                _ => prompt_query()?,
            };
            cmd_run(&api, &export, Job::Search { query, max_results }).await?;
        }
        Commands::Details { ids, api, export } => {
            let ids = ids.into_iter().map(ItemId::from).collect();
            cmd_run(&api, &export, Job::Ids(ids)).await?;
        }
    }

    Ok(())
}

/// Ask for the search keyword on stdin.
fn prompt_query() -> Result<String> {
    eprint!("Search keyword: ");
    io::stderr().flush()?;

    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .context("Failed to read search keyword")?;

    let query = line.trim().to_string();
    if query.is_empty() {
        bail!("No search keyword given");
    }
    Ok(query)
}

async fn cmd_run(api: &ApiArgs, export: &ExportArgs, job: Job) -> Result<()> {
    let config = YouTubeConfig::new(api.api_key.as_str())?
        .with_base_url(api.api_url.as_str())
        .with_timeout(Duration::from_secs(api.timeout));
    let client = YouTubeClient::new(config).context("Failed to create HTTP client")?;
    let aggregator = AggregatorConfig::new(api.concurrency).context("Invalid --concurrency")?;

    let destination = if export.timestamp {
        timestamped(&export.output, &chrono::Local::now())
    } else {
        export.output.clone()
    };

    let outcome = if export.upload {
        let drive = DriveUploader::new(DriveConfig::from_env()?)
            .context("Failed to create Drive client")?;
        let svc = ReportService::with_uploader(client.clone(), client, aggregator, drive);
        dispatch(&svc, job, &destination).await
    } else {
        let svc = ReportService::<_, _, NullUploader>::new(client.clone(), client, aggregator);
        dispatch(&svc, job, &destination).await
    };

    match outcome {
        Ok(report) => {
            print_report(&report);
            Ok(())
        }
        Err(e) => {
            if is_auth_failure(&e) {
                tracing::error!("Drive rejected the access token; refresh GOOGLE_DRIVE_TOKEN");
            }
            Err(e.into())
        }
    }
}

async fn dispatch<U: Uploader>(
    svc: &ReportService<YouTubeClient, YouTubeClient, U>,
    job: Job,
    destination: &Path,
) -> Result<RunReport, PipelineError> {
    match job {
        Job::Search { query, max_results } => svc.run(&query, max_results, destination).await,
        Job::Ids(ids) => svc.run_ids(ids, destination).await,
    }
}

fn print_report(report: &RunReport) {
    if let Some(query) = &report.query {
        println!(
            "Search \"{}\": {} results ({} without a video id)",
            query, report.found, report.skipped
        );
    } else if report.skipped > 0 {
        println!("Ignored {} blank video ids", report.skipped);
    }

    match &report.export {
        ExportOutcome::NoData => {
            println!("No video data to export; no file written.");
        }
        ExportOutcome::Written { path, rows } => {
            println!("Saved {} videos to {}", rows, path.display());
        }
    }

    if report.failed > 0 || report.unavailable > 0 {
        println!(
            "  {} lookups failed, {} videos had no details",
            report.failed, report.unavailable
        );
    }

    if let Some(id) = &report.remote_id {
        println!("Uploaded to Google Drive with ID: {id}");
    }
}
