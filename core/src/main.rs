use clap::Parser;
use heuclass_core::cli::{run, Cli};
use heuclass_core::Heuristic;
use log::error;
use std::io::{self, Write};
use std::process;

fn main() {
    let cli = Cli::parse();

    // Setup logging
    setup_logging(cli.verbose);

    if cli.list_sites {
        for site in Heuristic::builtin_sites() {
            println!("{}", site);
        }
        return;
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match run(&cli, &mut out) {
        Ok(complete) => {
            let _ = out.flush();
            if cli.rejects_incomplete(complete) {
                eprintln!("Error: some declared keys received no series");
                process::exit(1);
            }
        }
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            if e.is_configuration_error() {
                eprintln!("Check the heuristic file, or run with --list-sites to see built-in sites");
            }
            process::exit(1);
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();
}
