//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::config::OutputFormat;
use clap::Parser;
use std::path::PathBuf;

/// TypeMatchup - aggregate Pokémon type damage multipliers
///
/// Fetches the damage relations of every given type from PokeAPI,
/// multiplies them together and lists which types deal or take
/// non-neutral damage.
///
/// Examples:
///   typematchup fire
///   typematchup flying ground --format markdown
///   typematchup water,ground --records-dir ./saved/types
///   typematchup --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Type names to combine (space- or comma-separated)
    #[arg(
        value_name = "TYPES",
        value_delimiter = ',',
        required_unless_present = "init_config"
    )]
    pub types: Vec<String>,

    /// PokeAPI base URL
    ///
    /// Defaults to https://pokeapi.co/api/v2 or the config file value.
    #[arg(long, value_name = "URL", env = "TYPEMATCHUP_API_URL")]
    pub api_url: Option<String>,

    /// Read type records from DIR/<type>.json instead of PokeAPI
    #[arg(long, value_name = "DIR")]
    pub records_dir: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Output format (text, markdown, html, json)
    #[arg(short, long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Write the report to FILE instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .typematchup.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .typematchup.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if self.types.is_empty() {
            return Err("At least one type name is required".to_string());
        }

        if self.types.iter().any(|t| t.trim().is_empty()) {
            return Err("Type names must not be empty".to_string());
        }

        if let Some(ref url) = self.api_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err("API URL must start with 'http://' or 'https://'".to_string());
            }
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        if let Some(ref dir) = self.records_dir {
            if !dir.exists() {
                return Err(format!("Records directory does not exist: {}", dir.display()));
            }
            if !dir.is_dir() {
                return Err(format!(
                    "Records path is not a directory: {}",
                    dir.display()
                ));
            }
        }

        Ok(())
    }

    /// Type names trimmed and lower-cased, in the order given.
    pub fn type_names(&self) -> Vec<String> {
        self.types
            .iter()
            .map(|t| t.trim().to_lowercase())
            .collect()
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
