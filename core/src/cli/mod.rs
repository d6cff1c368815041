pub mod report;

use crate::classification::Heuristic;
use crate::error::{HeuclassError, Result};
use crate::inventory::load_records;
use clap::{Parser, ValueEnum};
use log::{info, warn};
use report::TextReport;
use std::io::Write;
use std::path::PathBuf;

/// Command-line arguments for heuclass
#[derive(Parser, Debug)]
#[command(name = "heuclass")]
#[command(about = "Classify acquired DICOM series into BIDS output keys")]
#[command(version)]
pub struct Cli {
    /// dicominfo.tsv file or directory of DICOM files
    #[arg(value_name = "INPUT", required_unless_present = "list_sites")]
    pub input: Option<PathBuf>,

    /// Heuristic JSON file (overrides --site)
    #[arg(long, value_name = "FILE")]
    pub heuristic: Option<PathBuf>,

    /// Built-in site heuristic
    #[arg(short, long, default_value = "generic")]
    pub site: String,

    /// Subject label used to render output paths
    #[arg(long)]
    pub subject: Option<String>,

    /// Session label used to render output paths
    #[arg(long)]
    pub session: Option<String>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Fail when a declared key received no series
    #[arg(long)]
    pub require_all: bool,

    /// List built-in site heuristics and exit
    #[arg(long)]
    pub list_sites: bool,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format
    Text,
    /// JSON format
    Json,
    /// Destination and series ids of matched keys (one per line)
    Paths,
}

impl Cli {
    /// Loads the chosen heuristic: `--heuristic` if given, else the `--site` built-in
    pub fn load_heuristic(&self) -> Result<Heuristic> {
        match &self.heuristic {
            Some(path) => Heuristic::from_file(path),
            None => Heuristic::builtin(&self.site),
        }
    }

    /// Whether an incomplete classification should fail the run
    pub fn rejects_incomplete(&self, complete: bool) -> bool {
        self.require_all && !complete
    }
}

/// Classifies the input and writes the report in the chosen format
///
/// Returns whether every declared key received at least one series.
pub fn run<W: Write>(cli: &Cli, out: &mut W) -> Result<bool> {
    let heuristic = cli.load_heuristic()?;

    let input = cli
        .input
        .as_ref()
        .ok_or_else(|| HeuclassError::InvalidValue("no input given".to_string()))?;
    info!("Reading series from {}", input.display());

    let records = load_records(input)?;
    if records.is_empty() {
        warn!("No series found in {}", input.display());
    }

    let result = heuristic.classify(&records)?;

    for key in result.missing_keys() {
        warn!(
            "No series for key '{}'",
            heuristic.name_of(key).unwrap_or(key.template())
        );
    }

    let report = TextReport::new(&heuristic, &result)
        .with_subject(cli.subject.as_deref(), cli.session.as_deref());

    match cli.format {
        OutputFormat::Text => writeln!(out, "{}", report)?,
        OutputFormat::Paths => report.write_paths(out)?,
        OutputFormat::Json => writeln!(out, "{}", report.to_json()?)?,
    }

    let complete = result.missing_keys().next().is_none();
    Ok(complete)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const SESSION_TSV: &str = "series_id\tseries_description\tprotocol_name\tseries_files\n\
                               3-t1_mprage\tt1_mprage_cor_ND\tt1_mprage\t192\n\
                               4-localizer\tlocalizer\t\t3\n";

    fn session_dir() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dicominfo.tsv");
        fs::write(&path, SESSION_TSV).unwrap();
        (dir, path)
    }

    fn run_to_string(args: &[&str]) -> (Result<bool>, String) {
        let cli = Cli::try_parse_from(args.iter().copied()).unwrap();
        let mut out = Vec::new();
        let complete = run(&cli, &mut out);
        (complete, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_parse_defaults() {
        let cli = Cli::try_parse_from(["heuclass", "dicominfo.tsv"]).unwrap();
        assert_eq!(cli.input, Some(PathBuf::from("dicominfo.tsv")));
        assert_eq!(cli.site, "generic");
        assert!(cli.heuristic.is_none());
        assert!(matches!(cli.format, OutputFormat::Text));
        assert!(!cli.require_all);
    }

    #[test]
    fn test_parse_full() {
        let cli = Cli::try_parse_from([
            "heuclass",
            "raw/sub-01",
            "--site",
            "hchs",
            "--subject",
            "01",
            "--session",
            "2",
            "-f",
            "paths",
            "--require-all",
        ])
        .unwrap();
        assert_eq!(cli.site, "hchs");
        assert_eq!(cli.subject.as_deref(), Some("01"));
        assert_eq!(cli.session.as_deref(), Some("2"));
        assert!(matches!(cli.format, OutputFormat::Paths));
        assert!(cli.require_all);
    }

    #[test]
    fn test_input_required_unless_listing() {
        assert!(Cli::try_parse_from(["heuclass"]).is_err());
        let cli = Cli::try_parse_from(["heuclass", "--list-sites"]).unwrap();
        assert!(cli.list_sites);
        assert!(cli.input.is_none());
    }

    #[test]
    fn test_run_json_reports_missing_key() {
        let (_dir, tsv) = session_dir();
        let tsv = tsv.to_str().unwrap();
        let (complete, output) = run_to_string(&[
            "heuclass", tsv, "--site", "hchs_hno", "--subject", "01", "--session", "1", "-f",
            "json",
        ]);

        assert!(!complete.unwrap());
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        let names: Vec<&str> = value["keys"]
            .as_array()
            .unwrap()
            .iter()
            .map(|k| k["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, ["t1w", "flair"]);
        assert_eq!(value["keys"][0]["series_ids"], serde_json::json!(["3-t1_mprage"]));
        assert_eq!(value["keys"][1]["series_ids"], serde_json::json!([]));
        assert_eq!(
            value["keys"][1]["destination"],
            "sub-01/ses-1/anat/sub-01_ses-1_FLAIR"
        );
    }

    #[test]
    fn test_run_text_and_paths() {
        let (_dir, tsv) = session_dir();
        let tsv = tsv.to_str().unwrap();

        let (complete, text) = run_to_string(&["heuclass", tsv, "--site", "hchs_hno"]);
        assert!(!complete.unwrap());
        assert!(text.contains("flair: sub-{subject}/{session}/anat/sub-{subject}_{session}_FLAIR\n  Not found"));

        let (_, paths) = run_to_string(&[
            "heuclass", tsv, "--site", "hchs_hno", "--subject", "sub-01", "-f", "paths",
        ]);
        assert_eq!(paths, "sub-01/{session}/anat/sub-01_{session}_T1w\t3-t1_mprage\n");
    }

    #[test]
    fn test_require_all_rejects_missing_key() {
        let (_dir, tsv) = session_dir();
        let tsv = tsv.to_str().unwrap();

        let strict = Cli::try_parse_from(["heuclass", tsv, "--site", "hchs_hno", "--require-all"])
            .unwrap();
        let complete = run(&strict, &mut Vec::new()).unwrap();
        assert!(strict.rejects_incomplete(complete));

        let lenient = Cli::try_parse_from(["heuclass", tsv, "--site", "hchs_hno"]).unwrap();
        assert!(!lenient.rejects_incomplete(complete));
        assert!(!strict.rejects_incomplete(true));
    }

    #[test]
    fn test_run_complete_when_every_key_matches() {
        let dir = TempDir::new().unwrap();
        let tsv = dir.path().join("dicominfo.tsv");
        fs::write(
            &tsv,
            "series_id\tseries_description\n3-t1\tt1_mprage_cor_ND\n7-flair\tt2_spc_da-fl_sag_ND\n",
        )
        .unwrap();

        let (complete, _) =
            run_to_string(&["heuclass", tsv.to_str().unwrap(), "--site", "hchs_hno"]);
        assert!(complete.unwrap());
    }

    #[test]
    fn test_run_unknown_site_is_configuration_error() {
        let (_dir, tsv) = session_dir();
        let (complete, output) =
            run_to_string(&["heuclass", tsv.to_str().unwrap(), "--site", "nowhere"]);

        let err = complete.unwrap_err();
        assert!(matches!(err, HeuclassError::UnknownSite(_)));
        assert!(err.is_configuration_error());
        assert!(output.is_empty());
    }
}
