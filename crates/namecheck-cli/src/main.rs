//! namecheck CLI tool.
//!
//! Usage:
//! ```bash
//! namecheck --rules rules.json dumps/
//! namecheck --rules rules.json unit1.json unit2.json
//! ```
//!
//! Targets are unit dump files produced by an analysis front-end; see the
//! `namecheck_core::syntax` module for the expected shape.

use anyhow::{Context, Result};
use clap::Parser;
use namecheck_core::{Analyzer, RuleSet};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod load;

/// Naming-convention linter for resolved syntax unit dumps
#[derive(Parser)]
#[command(name = "namecheck")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON file with naming convention rules
    #[arg(short, long)]
    rules: PathBuf,

    /// Print per-unit progress
    #[arg(short, long)]
    verbose: bool,

    /// Print detailed match-cache activity
    #[arg(long)]
    debug: bool,

    /// Unit dump files, or directories scanned for `*.json` dumps
    #[arg(required = true)]
    targets: Vec<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.debug {
        EnvFilter::new("debug")
    } else if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let emitted = run(&cli)?;
    if emitted > 0 {
        std::process::exit(1);
    }
    Ok(())
}

/// Runs the full pipeline; returns the number of diagnostics printed.
fn run(cli: &Cli) -> Result<usize> {
    let raw = load::rules_from_file(&cli.rules)?;
    let rules = RuleSet::compile(&raw)
        .with_context(|| format!("compile rules from {}", cli.rules.display()))?;
    let analyzer = Analyzer::new(rules);
    tracing::info!("loaded {} rules", analyzer.rules().len());

    let mut units = Vec::new();
    for file in load::expand_targets(&cli.targets)? {
        // A dump that fails to load is reported and skipped; sibling
        // dumps still run.
        match load::units_from_file(&file) {
            Ok(mut loaded) => units.append(&mut loaded),
            Err(err) => tracing::warn!("skipping {}: {err:#}", file.display()),
        }
    }

    let mut emitted = 0;
    for diagnostic in analyzer.check_units(&units) {
        println!("{diagnostic}");
        emitted += 1;
    }
    Ok(emitted)
}
