//! goenum CLI - list enum-like constant groups in Go packages.
//!
//! Features:
//! - Go-style package patterns (`dir`, `dir/...`, `file.go`)
//! - No Go toolchain required; constants are resolved in-process
//! - Rayon-powered parallel loading
//! - Plain text or JSON reports, optional per-package merging

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};

use goenum_core::{
    init_plain_logging, init_structured_logging, load_config, load_config_file, print_json,
    print_plain, CarryPolicy, EnumTypeSpec, ExtractConfig, GoenumConfig, Goenum, ScanResult,
    DEFAULT_PATTERN,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "List enum-like constant groups in Go packages")]
pub struct Cli {
    /// Package patterns: DIR, DIR/... or FILE.go
    #[arg(default_value = DEFAULT_PATTERN)]
    patterns: Vec<String>,

    /// Directory patterns are resolved against
    #[arg(short = 'C', long = "dir", default_value = ".")]
    dir: PathBuf,

    /// Enum type to collect, as NAME or NAME:BASE (repeatable)
    #[arg(short = 't', long = "type", value_name = "NAME[:BASE]")]
    types: Vec<EnumTypeSpec>,

    /// Also collect every named type over a basic string or integer type
    #[arg(long)]
    discover: bool,

    /// Only discover types whose name matches this regex
    #[arg(long, value_name = "REGEX")]
    discover_pattern: Option<String>,

    /// What an unregistered explicit type does to the active enum: clear or retain
    #[arg(long, value_name = "POLICY")]
    carry_policy: Option<CarryPolicy>,

    /// Include _test.go files
    #[arg(long)]
    include_tests: bool,

    /// Directory names to skip while scanning (repeatable)
    #[arg(long, value_name = "DIR")]
    exclude: Vec<String>,

    /// Config file (defaults to goenum.toml in --dir, if present)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output results in JSON format
    #[arg(long)]
    json: bool,

    /// Omit files and types without members
    #[arg(long)]
    skip_empty: bool,

    /// Report the files that loaded even if others failed
    #[arg(long)]
    keep_going: bool,

    /// Combine the files of each package into one result
    #[arg(long)]
    merge_packages: bool,

    /// Emit logs as JSON on stderr
    #[arg(long)]
    log_json: bool,
}

/// Effective settings after merging the config file and the flags.
#[derive(Debug, PartialEq)]
struct Settings {
    extract: ExtractConfig,
    include_tests: bool,
    exclude: Vec<String>,
    json: bool,
}

/// Flags win over the config file; list options accumulate.
fn merge_settings(cli: &Cli, cfg: Option<GoenumConfig>) -> Settings {
    let cfg = cfg.unwrap_or_default();
    let mut extract = cfg.extract_config();

    if !cli.types.is_empty() {
        extract.types = cli.types.clone();
    }
    if let Some(policy) = cli.carry_policy {
        extract.carry_policy = policy;
    }
    if cli.discover_pattern.is_some() {
        extract.discover_pattern = cli.discover_pattern.clone();
    }
    extract.discover |= cli.discover || cli.discover_pattern.is_some();

    if extract.types.is_empty() && !extract.discover {
        tracing::info!("no enum types given, discovering them");
        extract.discover = true;
    }

    let mut exclude = cfg.exclude.clone().unwrap_or_default();
    exclude.extend(cli.exclude.iter().cloned());

    Settings {
        extract,
        include_tests: cli.include_tests || cfg.include_tests.unwrap_or(false),
        exclude,
        json: cli.json || cfg.wants_json(),
    }
}

fn read_config(cli: &Cli) -> Result<Option<GoenumConfig>> {
    match &cli.config {
        Some(path) => load_config_file(path).map(Some),
        None => load_config(&cli.dir),
    }
}

fn run(cli: &Cli, settings: Settings) -> Result<ScanResult> {
    Goenum::new(&cli.dir)
        .patterns(cli.patterns.iter().cloned())
        .with_config(settings.extract)
        .include_tests(settings.include_tests)
        .exclude_dirs(settings.exclude)
        .keep_going(cli.keep_going)
        .analyze()
        .with_context(|| format!("Failed to scan {}", display_dir(&cli.dir)))
}

fn display_dir(dir: &Path) -> String {
    if dir.as_os_str().is_empty() {
        ".".to_string()
    } else {
        dir.display().to_string()
    }
}

fn main() -> Result<()> {
    // Global panic guard
    std::panic::set_hook(Box::new(|info| {
        eprintln!("[PANIC] goenum internal error: {}", info);
        eprintln!("[PANIC] The process will exit with code 2.");
        std::process::exit(2);
    }));

    let cli = Cli::parse();

    if cli.log_json {
        init_structured_logging();
    } else {
        init_plain_logging();
    }

    let cfg = read_config(&cli)?;
    let settings = merge_settings(&cli, cfg);
    let json = settings.json;

    let result = run(&cli, settings)?;

    // Diagnostics go to stderr, compiler style
    for failure in &result.failures {
        eprintln!("{}", failure.error);
    }
    if result.has_failures() && !cli.keep_going {
        std::process::exit(1);
    }

    let files = if cli.merge_packages {
        result.merge_packages()?
    } else {
        result.files
    };

    if json {
        print_json(&files, cli.skip_empty);
    } else {
        print_plain(&files, cli.skip_empty);
    }

    Ok(())
}
