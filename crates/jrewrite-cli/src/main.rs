//! jrewrite CLI - Java import reconciliation
//!
//! Adds and removes imports across Java source trees. Each file gets one
//! import session: requested imports are merged with the existing ones,
//! grouped by the configured order and folded into on-demand imports past
//! the configured thresholds, with comments kept on their declarations.

mod config;
mod output;
mod process;

use anyhow::Result;
use clap::Parser;
use colored::*;
use jrewrite_core::logging;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use config::{Config, ImportOverrides};
use jrewrite_imports::ImportConfig;
use output::{EditSite, OutputFormat, Report};
use process::{process_file, write_file, ImportRequest};

#[derive(Parser)]
#[command(name = "jrewrite")]
#[command(version)]
#[command(about = "Reconcile the imports of Java source files")]
struct Cli {
    /// Files or directories to process
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Import to add (qualified type or `pkg.*`), repeatable
    #[arg(long, value_name = "NAME")]
    add_import: Vec<String>,

    /// Static import to add, as `Type.member`, repeatable
    #[arg(long, value_name = "TYPE.MEMBER")]
    add_static_import: Vec<String>,

    /// Import to remove, repeatable
    #[arg(long, value_name = "NAME")]
    remove_import: Vec<String>,

    /// Static import to remove, as `Type.member` or `Type.*`, repeatable
    #[arg(long, value_name = "TYPE.MEMBER")]
    remove_static_import: Vec<String>,

    /// Group order, e.g. `java;javax;;#` (overrides config file)
    #[arg(long, value_name = "LIST")]
    order: Option<String>,

    /// Single imports of one package that trigger an on-demand import
    #[arg(long, value_name = "N")]
    threshold: Option<usize>,

    /// Static imports of one type that trigger an on-demand static import
    #[arg(long, value_name = "N")]
    static_threshold: Option<usize>,

    /// Rebuild the import block from the requested imports only
    #[arg(long)]
    no_restore: bool,

    /// Apply changes to files (check only by default)
    #[arg(long)]
    fix: bool,

    /// Output format: text, json, diff
    #[arg(long, value_name = "FORMAT")]
    format: Option<String>,

    /// Path to config file (default: auto-detect .jrewrite.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Ignore config files
    #[arg(long, conflicts_with = "config")]
    no_config: bool,

    /// Write a timestamped decision log to this file
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Show verbose output
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() -> ExitCode {
    let code = match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red(), e);
            ExitCode::from(2)
        }
    };
    logging::shutdown();
    code
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    if let Some(log_file) = &cli.log_file {
        let path = logging::init_logger(Some(log_file))?;
        if cli.verbose {
            println!("{}: {}", "Logging to".bold(), path.display());
        }
    }

    // Load config file
    let (config, config_path) = if cli.no_config {
        (Config::default(), None)
    } else if let Some(config_path) = &cli.config {
        (Config::load_path(config_path)?, Some(config_path.clone()))
    } else {
        match Config::load()? {
            Some((cfg, path)) => (cfg, Some(path)),
            None => (Config::default(), None),
        }
    };

    // Determine output format: command line, then config file, then text
    let format_name = cli
        .format
        .clone()
        .or_else(|| config.output.format.clone())
        .unwrap_or_else(|| "text".to_string());
    let output_format: OutputFormat = format_name.parse().map_err(anyhow::Error::msg)?;
    let text_output = output_format == OutputFormat::Text;

    if cli.verbose && text_output {
        if let Some(path) = &config_path {
            println!("{}: {}", "Using config".bold(), path.display());
        }
    }

    let request = ImportRequest {
        add: cli.add_import.clone(),
        add_static: cli.add_static_import.clone(),
        remove: cli.remove_import.clone(),
        remove_static: cli.remove_static_import.clone(),
        restore_existing: !cli.no_restore,
    };
    if request.is_empty() && request.restore_existing {
        if text_output {
            println!("{}", "No imports requested, nothing to do".yellow());
        }
        return Ok(ExitCode::SUCCESS);
    }

    let overrides = ImportOverrides {
        order: cli.order.clone(),
        threshold: cli.threshold,
        static_threshold: cli.static_threshold,
    };
    let imports = config.effective_imports(&overrides);

    let fix_mode = cli.fix;
    let check_mode = !fix_mode;

    if cli.verbose && text_output {
        println!("{}: {}", "Mode".bold(), if fix_mode { "fix" } else { "check" });
        println!(
            "{}: {} / {} (static)",
            "Thresholds".bold(),
            imports.on_demand_threshold,
            imports.static_on_demand_threshold
        );
        println!();
    }

    logging::section(&format!(
        "jrewrite run at {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    ));

    let (file_paths, missing_paths) = collect_files(&cli.paths, &config);

    // Process files in parallel
    let results: Vec<FileOutcome> = file_paths
        .par_iter()
        .map(|path| process_file_to_outcome(path, &request, &imports))
        .collect();

    // Sort results by path for deterministic output
    let mut sorted_results: Vec<_> = results.into_iter().zip(file_paths.iter()).collect();
    sorted_results.sort_by(|a, b| a.1.cmp(b.1));

    let mut report = Report::new(output_format, cli.verbose);

    for path in &missing_paths {
        if text_output {
            eprintln!("{}: Path does not exist: {}", "Warning".yellow(), path.display());
        }
    }

    for (outcome, path) in sorted_results {
        report_outcome(path, outcome, fix_mode, &mut report)?;
    }

    let totals = report.totals();
    let exit_code = if totals.failed > 0 {
        ExitCode::from(2)
    } else if check_mode && totals.changed > 0 {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    };

    report.finish()?;

    Ok(exit_code)
}

/// Java files under the given paths, and the paths that do not exist
fn collect_files(paths: &[PathBuf], config: &Config) -> (Vec<PathBuf>, Vec<PathBuf>) {
    let mut file_paths: Vec<PathBuf> = Vec::new();
    let mut missing_paths: Vec<PathBuf> = Vec::new();

    for path in paths {
        if path.is_file() {
            file_paths.push(path.clone());
        } else if path.is_dir() {
            for entry in walkdir::WalkDir::new(path)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.path().extension().is_some_and(|ext| ext == "java"))
            {
                let file_path = entry.path();
                if !config.should_exclude(file_path) {
                    file_paths.push(file_path.to_path_buf());
                }
            }
        } else {
            missing_paths.push(path.clone());
        }
    }

    (file_paths, missing_paths)
}

/// Result of processing a single file (for parallel processing)
enum FileOutcome {
    /// File had no changes
    NoChanges,
    /// File has changes to report/apply
    HasChanges {
        edits: Vec<EditSite>,
        old_source: String,
        new_source: String,
    },
    /// Reading or rewriting failed
    Error(String),
}

/// Process a file and return an outcome (no output, suitable for parallel execution)
fn process_file_to_outcome(path: &Path, request: &ImportRequest, imports: &ImportConfig) -> FileOutcome {
    match process_file(path, request, imports) {
        Ok(result) => match result.new_source {
            Some(new_source) if !result.edits.is_empty() => FileOutcome::HasChanges {
                edits: result.edits,
                old_source: result.old_source,
                new_source,
            },
            _ => FileOutcome::NoChanges,
        },
        Err(e) => FileOutcome::Error(format!("{:#}", e)),
    }
}

/// Report a file outcome and optionally apply fixes
fn report_outcome(path: &Path, outcome: FileOutcome, fix_mode: bool, report: &mut Report) -> Result<()> {
    match outcome {
        FileOutcome::NoChanges => {
            report.clean(path);
        }
        FileOutcome::HasChanges {
            edits,
            old_source,
            new_source,
        } => {
            if fix_mode {
                write_file(path, &new_source)?;
            }
            report.changed(path, edits, &old_source, &new_source, fix_mode);
        }
        FileOutcome::Error(msg) => {
            report.failed(path, &msg);
        }
    }
    Ok(())
}
