//! Command-line front end for the movie catalog extractor
//!
//! ```text
//! movies-extract <genre> <count> [csv]
//! ```
//!
//! Writes `output.json` (default) or `output.csv` into the output directory
//! and appends timestamped log lines to `extract.log`.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Context;
use clap::error::ErrorKind;
use clap::Parser;
use movies_core::extractor::{DEFAULT_BASE_URL, DEFAULT_PAGE_SIZE};
use movies_core::{save, ClientConfig, ExtractorConfig, MovieExtractor, OutputFormat, RunOutcome};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LOG_FILE: &str = "extract.log";

#[derive(Parser, Debug)]
#[command(
    name = "movies-extract",
    version,
    about = "Extract movie metadata from a paginated catalog",
    after_help = "Example: movies-extract comedy 50 csv"
)]
struct Cli {
    /// Catalog genre, passed verbatim into the listing query
    genre: String,

    /// Number of records to collect
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    count: u32,

    /// "csv" writes CSV; anything else (or nothing) writes JSON
    format: Option<String>,

    /// Catalog origin
    #[arg(long, env = "MOVIES_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Directory receiving output.json / output.csv
    #[arg(long, env = "MOVIES_OUTPUT_DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Log file, appended to
    #[arg(long, env = "MOVIES_LOG_FILE", default_value = DEFAULT_LOG_FILE)]
    log_file: PathBuf,

    /// Pause before each detail request, in milliseconds
    #[arg(long, env = "MOVIES_DETAIL_DELAY_MS", default_value_t = 200)]
    delay_ms: u64,
}

impl Cli {
    fn output_format(&self) -> OutputFormat {
        match self.format.as_deref() {
            Some("csv") => OutputFormat::Csv,
            _ => OutputFormat::Json,
        }
    }

    fn extractor_config(&self) -> ExtractorConfig {
        ExtractorConfig {
            base_url: self.base_url.clone(),
            page_size: DEFAULT_PAGE_SIZE,
            detail_delay: Duration::from_millis(self.delay_ms),
            client: ClientConfig::default(),
        }
    }
}

/// Log to stdout and append the same lines to `log_file`.
fn init_logging(log_file: &Path) -> anyhow::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("cannot open log file {}", log_file.display()))?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(fmt::layer())
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .init();

    Ok(())
}

/// Log file used before arguments are parsed, so usage errors are recorded.
fn startup_log_file() -> PathBuf {
    std::env::var_os("MOVIES_LOG_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE))
}

/// Message worth logging for a parse failure; help and version output are not errors.
fn usage_failure(err: &clap::Error) -> Option<String> {
    match err.kind() {
        ErrorKind::DisplayHelp
        | ErrorKind::DisplayVersion
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => None,
        _ => Some(err.render().to_string().trim_end().to_string()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let parsed = Cli::try_parse();
    let log_file = match &parsed {
        Ok(cli) => cli.log_file.clone(),
        Err(_) => startup_log_file(),
    };
    init_logging(&log_file)?;

    let cli = match parsed {
        Ok(cli) => cli,
        Err(e) => {
            if let Some(message) = usage_failure(&e) {
                error!("{}", message);
            }
            e.exit()
        }
    };

    let format = cli.output_format();
    let extractor = MovieExtractor::with_config(cli.extractor_config())?;

    info!("Extracting up to {} '{}' movies as {}", cli.count, cli.genre, format);
    let run = extractor.extract(&cli.genre, cli.count as usize).await?;

    if let RunOutcome::Aborted { page, reason } = &run.outcome {
        warn!(
            "Run stopped at list page {} ({}); keeping {} records",
            page,
            reason,
            run.records.len()
        );
    }

    match save(&run.records, format, &cli.output_dir) {
        Ok(path) => {
            info!("File saved to {}", path.display());
            Ok(())
        }
        Err(e) => {
            error!("Failed to save file: {}", e);
            Err(e.into())
        }
    }
}
