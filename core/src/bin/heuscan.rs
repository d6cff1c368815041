use clap::Parser;
use heuclass_core::inventory::{scan_directory, write_dicominfo};
use log::{error, info};
use std::path::PathBuf;
use std::process;

/// CLI tool writing a dicominfo.tsv inventory for a directory of DICOM files
#[derive(Parser, Debug)]
#[command(name = "heuscan")]
#[command(about = "Inventory the DICOM series of a directory into dicominfo.tsv")]
#[command(version)]
struct Cli {
    /// Directory containing DICOM files
    #[arg(value_name = "DIRECTORY")]
    directory: PathBuf,

    /// Output file (default: <DIRECTORY>/dicominfo.tsv)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    // Setup logging
    setup_logging(cli.verbose);

    // Verify directory exists
    if !cli.directory.is_dir() {
        eprintln!("Error: {} is not a directory", cli.directory.display());
        process::exit(1);
    }

    info!("Processing directory: {}", cli.directory.display());

    let records = match scan_directory(&cli.directory) {
        Ok(records) => records,
        Err(e) => {
            error!("Failed to scan directory: {}", e);
            eprintln!("Error: Failed to scan directory: {}", e);
            process::exit(1);
        }
    };

    if records.is_empty() {
        eprintln!("Error: No DICOM series found in directory");
        process::exit(1);
    }

    let output = output_path(&cli);
    if let Err(e) = write_dicominfo(&output, &records) {
        error!("Failed to write {}: {}", output.display(), e);
        eprintln!("Error: Failed to write {}: {}", output.display(), e);
        process::exit(1);
    }

    info!("Wrote {} series to {}", records.len(), output.display());
}

fn setup_logging(verbose: bool) {
    if verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }
}

fn output_path(cli: &Cli) -> PathBuf {
    cli.output
        .clone()
        .unwrap_or_else(|| cli.directory.join("dicominfo.tsv"))
}
