//! TypeMatchup - Pokémon type damage multiplier aggregator
//!
//! A CLI tool that fetches type damage relations from PokeAPI,
//! multiplies them across the queried types and reports every
//! non-neutral multiplier grouped by value.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Any error (invalid arguments, config, fetch failure, output)

mod analysis;
mod cli;
mod config;
mod models;
mod report;
mod source;

use anyhow::{Context, Result};
use cli::Args;
use config::{Config, CONFIG_FILE_NAME};
use indicatif::{ProgressBar, ProgressStyle};
use report::MatchupReport;
use source::{DirectoryTypeSource, PokeApiClient, TypeSource};
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    init_logging(&args);

    info!("TypeMatchup v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run(args).await {
        error!("Matchup failed: {:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .typematchup.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "{} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("Created {} with default settings.", CONFIG_FILE_NAME);
    Ok(())
}

/// Initialize logging based on verbosity settings.
///
/// `RUST_LOG` overrides the level chosen by `--verbose`/`--quiet`.
/// Logs go to stderr so a report written to stdout stays clean.
fn init_logging(args: &Args) {
    let level = LevelFilter::from_level(args.log_level());
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(level.into()));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Fetch, aggregate, render and write one matchup.
async fn run(args: Args) -> Result<()> {
    let start_time = Instant::now();

    let mut config = load_config(&args)?;
    config.merge_with_args(&args);
    config.validate().context("Invalid configuration")?;

    let types = args.type_names();
    let source = build_source(&config)?;

    let spinner = (!args.quiet).then(|| fetch_spinner(types.len()));

    let result = analysis::damage_relations_for_types(source.as_ref(), &types).await;

    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    let relations = match result {
        Ok(relations) => relations,
        Err(e) => {
            error!("Fetching type '{}' failed", e.type_name());
            return Err(e).context("Failed to fetch type damage relations");
        }
    };
    info!(
        "Computed matchup for {} type(s) in {:.2}s",
        types.len(),
        start_time.elapsed().as_secs_f64()
    );

    let report = MatchupReport::new(types, relations);
    let output = report::render_report(&report, &config.report)?;

    match config.general.output {
        Some(ref path) => {
            std::fs::write(path, &output)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            info!("Report saved to {}", path.display());
        }
        None => print!("{}", output),
    }

    Ok(())
}

/// Pick the record source: saved records if configured, PokeAPI otherwise.
fn build_source(config: &Config) -> Result<Box<dyn TypeSource>> {
    if let Some(ref dir) = config.api.records_dir {
        info!("Using saved records in {}", dir.display());
        return Ok(Box::new(DirectoryTypeSource::new(dir.clone())));
    }

    let client = PokeApiClient::new(&config.api).context("Failed to create HTTP client")?;
    Ok(Box::new(client))
}

fn fetch_spinner(count: usize) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!("Fetching {} type record(s)...", count));
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", CONFIG_FILE_NAME);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
