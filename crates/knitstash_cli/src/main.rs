//! knitstash CLI
//!
//! One-shot migration and validation of a stash file. The file is
//! renamed to a timestamped backup first, then the migrated document
//! is written back to the original path. A failed run leaves only the
//! backup behind; the original path is never overwritten with a
//! partially processed document.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use knitstash_core::{backup, store, MigrationReport, Migrator};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Migrate and validate a knitstash stash file in place.
#[derive(Parser)]
#[command(name = "knitstash")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the stash file to process
    file: PathBuf,

    /// Validate and report only, write nothing to disk
    #[arg(long)]
    dry_run: bool,

    /// Seed for id generation, for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut migrator = Migrator::new(rng);

    if cli.dry_run {
        info!("dry run, nothing will be written");
        let mut doc = store::load_document(&cli.file)?;
        let report = migrator.migrate(&mut doc)?;
        print_report(&report);
        println!("✓ Dry run complete, no changes written");
        return Ok(());
    }

    // Rename first so no failure past this point can destroy data.
    let backup_path = backup::create_backup(&cli.file)?;
    println!("Backup created: {}", backup_path.display());

    let mut doc = store::load_document(&backup_path)?;
    let report = migrator.migrate(&mut doc)?;
    print_report(&report);

    store::persist_document(&cli.file, &doc)?;
    println!("✓ Updated data saved to {}", cli.file.display());

    Ok(())
}

fn print_report(report: &MigrationReport) {
    if report.renamed_legacy_key {
        println!("Info: legacy attribute 'usages' renamed to 'assignments'");
    }

    for warning in &report.warnings {
        println!("Validation warning: {warning}");
    }

    if report.new_id_count > 0 {
        println!(
            "Info: {} assignment(s) received a new random id",
            report.new_id_count
        );
    } else {
        println!("Info: no new ids needed");
    }

    if !report.duplicate_ids.is_empty() {
        println!(
            "Warning: found {} duplicate id(s) in the file: {:?}",
            report.duplicate_ids.len(),
            report.duplicate_ids
        );
    }
}
