//! riskview CLI - normalize and score risk assessment payloads

#![deny(warnings)]

// Global invariants enforced:
// - Payload order is preserved unless sorting is enabled by --sort or config
// - Logs go to stderr; stdout carries only rendered output

use anyhow::Context;
use clap::{Parser, Subcommand};
use riskview_core::config::{self, ResolvedConfig};
use riskview_core::{
    apply_filters, normalize_str_with_thresholds, normalize_with_config, render_json,
    render_jsonl, render_summary_text, render_text, summarize, AssessmentViewModel,
    FilterOptions, FilterOverrides,
};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "riskview")]
#[command(about = "Normalize risk assessment payloads into scored, display-ready rows")]
#[command(version = env!("RISKVIEW_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize assessment payloads (file, directory, or - for stdin)
    Normalize {
        /// Path to payload file or directory, or - to read stdin
        path: PathBuf,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,

        /// Show only top N results (overrides config file)
        #[arg(long)]
        top: Option<usize>,

        /// Minimum risk score (overrides config file)
        #[arg(long)]
        min_score: Option<i64>,

        /// Only show these statuses (repeatable, overrides config file)
        #[arg(long = "status")]
        statuses: Vec<String>,

        /// Sort by risk score, highest first (overrides config file)
        #[arg(long, conflicts_with = "no_sort")]
        sort: bool,

        /// Keep payload order even if the config file enables sorting
        #[arg(long)]
        no_sort: bool,

        /// Print a summary after the rows (text format only)
        #[arg(long)]
        summary: bool,

        /// Path to config file (default: auto-discover)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Summarize assessment payloads
    Summary {
        /// Path to payload file or directory, or - to read stdin
        path: PathBuf,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: OutputFormat,

        /// Path to config file (default: auto-discover)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Validate or show configuration
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Validate a config file without normalizing anything
    Validate {
        /// Path to config file (default: auto-discover from current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Show the resolved configuration (merged defaults + config file)
    Show {
        /// Path to config file (default: auto-discover from current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, PartialEq, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Jsonl,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Normalize {
            path,
            format,
            top,
            min_score,
            statuses,
            sort,
            no_sort,
            summary,
            config: config_path,
        } => {
            let resolved_config = load_config_for(&path, config_path.as_deref())?;

            // CLI flags override config file values
            let options = resolved_config.filter_options().with_overrides(FilterOverrides {
                min_score,
                statuses,
                top_n: top,
                sort_by_score: match (sort, no_sort) {
                    (true, _) => Some(true),
                    (_, true) => Some(false),
                    _ => None,
                },
            });

            let view_models = load_view_models(&path, &options, &resolved_config)?;

            match format {
                OutputFormat::Text => {
                    print!("{}", render_text(&view_models));
                    if summary {
                        println!();
                        print!("{}", render_summary_text(&summarize(&view_models)));
                    }
                }
                OutputFormat::Json => {
                    println!("{}", render_json(&view_models));
                }
                OutputFormat::Jsonl => {
                    print!("{}", render_jsonl(&view_models));
                }
            }
            if summary && format != OutputFormat::Text {
                tracing::warn!("--summary is ignored for non-text formats");
            }
        }
        Commands::Summary {
            path,
            format,
            config: config_path,
        } => {
            let resolved_config = load_config_for(&path, config_path.as_deref())?;
            let options = resolved_config.filter_options();
            let view_models = load_view_models(&path, &options, &resolved_config)?;
            let summary = summarize(&view_models);

            match format {
                OutputFormat::Text => print!("{}", render_summary_text(&summary)),
                OutputFormat::Json => {
                    let json = serde_json::to_string_pretty(&summary)
                        .context("failed to serialize summary to JSON")?;
                    println!("{}", json);
                }
                OutputFormat::Jsonl => {
                    anyhow::bail!("JSONL format is not supported for summaries");
                }
            }
        }
        Commands::Config { action } => match action {
            ConfigAction::Validate { path } => {
                let project_root = std::env::current_dir()?;
                match config::load_and_resolve(&project_root, path.as_deref()) {
                    Ok(config) => {
                        if let Some(ref p) = config.config_path {
                            println!("Config valid: {}", p.display());
                        } else {
                            println!("No config file found. Using defaults.");
                        }
                    }
                    Err(e) => {
                        eprintln!("Config validation failed: {:#}", e);
                        std::process::exit(1);
                    }
                }
            }
            ConfigAction::Show { path } => {
                let project_root = std::env::current_dir()?;
                let resolved = config::load_and_resolve(&project_root, path.as_deref())
                    .context("failed to load configuration")?;
                print_config(&resolved);
            }
        },
    }

    Ok(())
}

/// Whether the path argument means "read stdin"
fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}

/// Load configuration from the payload's project directory (or cwd for stdin)
fn load_config_for(path: &Path, config_path: Option<&Path>) -> anyhow::Result<ResolvedConfig> {
    let project_root = if is_stdin(path) {
        std::env::current_dir()?
    } else {
        let normalized = if path.is_relative() {
            std::env::current_dir()?.join(path)
        } else {
            path.to_path_buf()
        };
        if !normalized.exists() {
            anyhow::bail!("Path does not exist: {}", normalized.display());
        }
        if normalized.is_dir() {
            normalized
        } else {
            normalized
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or(normalized)
        }
    };

    config::load_and_resolve(&project_root, config_path).context("failed to load configuration")
}

/// Read and normalize payloads from stdin or the filesystem
fn load_view_models(
    path: &Path,
    options: &FilterOptions,
    resolved_config: &ResolvedConfig,
) -> anyhow::Result<Vec<AssessmentViewModel>> {
    if is_stdin(path) {
        let mut input = String::new();
        std::io::stdin()
            .read_to_string(&mut input)
            .context("failed to read payload from stdin")?;
        let view_models = normalize_str_with_thresholds(&input, &resolved_config.thresholds)?;
        Ok(apply_filters(view_models, options))
    } else {
        normalize_with_config(path, options, Some(resolved_config))
    }
}

fn print_config(resolved: &ResolvedConfig) {
    println!("Configuration:");
    if let Some(ref p) = resolved.config_path {
        println!("  Source: {}", p.display());
    } else {
        println!("  Source: defaults (no config file found)");
    }
    println!();
    println!("Thresholds:");
    println!("  risk_high: {}", resolved.thresholds.risk_high);
    println!("  risk_medium: {}", resolved.thresholds.risk_medium);
    println!("  ordinal_high: {}", resolved.thresholds.ordinal_high);
    println!("  ordinal_medium: {}", resolved.thresholds.ordinal_medium);
    println!();
    println!("Filters:");
    println!(
        "  min_score: {}",
        resolved
            .min_score
            .map(|v| v.to_string())
            .unwrap_or_else(|| "none".to_string())
    );
    println!(
        "  statuses: {}",
        if resolved.statuses.is_empty() {
            "all".to_string()
        } else {
            resolved.statuses.join(", ")
        }
    );
    println!(
        "  top: {}",
        resolved
            .top_n
            .map(|v| v.to_string())
            .unwrap_or_else(|| "none".to_string())
    );
    println!("  sort: {}", if resolved.sort_by_score { "score" } else { "input order" });
    println!(
        "  include: {}",
        if resolved.include.is_some() {
            "custom patterns"
        } else {
            "all .json files"
        }
    );
}
