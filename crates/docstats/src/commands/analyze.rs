//! CLI command for analyzing a document collection

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use docstats_core::analyze::{AnalysisReport, AnalyzeConfig, Analyzer};
use docstats_core::progress::{AnalyzeProgress, format_number};
use docstats_core::render::{write_json, write_json_envelope, write_table};
use docstats_core::source::{DynSource, InputFormat, open_path, open_stdin};
use tracing::info;

use crate::error::CliError;

/// Arguments for the analyze command
pub struct AnalyzeArgs {
    /// Input file, `-` for stdin
    pub input: PathBuf,
    /// Input encoding (detected from the extension if not provided)
    pub format: Option<InputFormat>,
    /// Deepest level to gather statistics for (0 for unlimited)
    pub depth: usize,
    /// Emit JSON instead of a table
    pub json: bool,
    /// Wrap JSON output with the run totals
    pub envelope: bool,
    /// Output file path (stdout if not provided)
    pub output: Option<PathBuf>,
    /// Stop after this many records (0 for all)
    pub sample_size: usize,
    /// Abort on the first invalid record
    pub strict: bool,
    /// Show a progress bar on stderr
    pub progress: bool,
    /// Expected record count for the progress bar
    pub estimated_count: Option<u64>,
}

/// Handle the analyze command
///
/// The report is written even when the run ends early; the error is
/// returned afterwards so the process can exit non-zero.
pub fn handle_analyze(args: &AnalyzeArgs) -> Result<(), CliError> {
    let mut source = open_source(&args.input, args.format)?;

    let config = AnalyzeConfig::builder()
        .max_depth(args.depth)
        .sample_size(args.sample_size)
        .stop_on_invalid(args.strict)
        .build();

    let estimate = args.estimated_count.or_else(|| source.estimated_count());
    if let Some(count) = estimate {
        eprintln!("Estimated object count: {}", format_number(count));
    }
    let progress = if args.progress {
        AnalyzeProgress::new(estimate)
    } else {
        AnalyzeProgress::hidden()
    };

    let mut analyzer = Analyzer::with_config(config);
    let error = analyzer
        .run_with_progress(&mut source, |processed| progress.update(processed))
        .err();

    match &error {
        None => progress.finish_success(&format!(
            "Analyzed {} records",
            format_number(analyzer.record_count())
        )),
        Some(e) => progress.finish_error(&e.to_string()),
    }

    let report = analyzer.finish(error);
    write_report(&report, args)?;

    match report.error {
        Some(error) => Err(error.into()),
        None => Ok(()),
    }
}

fn open_source(input: &Path, format: Option<InputFormat>) -> Result<DynSource, CliError> {
    if input == Path::new("-") {
        return Ok(open_stdin(format.unwrap_or_default())?);
    }
    open_path(input, format).map_err(|e| CliError::FileReadError(input.to_path_buf(), e.to_string()))
}

fn write_report(report: &AnalysisReport, args: &AnalyzeArgs) -> Result<(), CliError> {
    let mut buf = Vec::new();
    if !args.json {
        write_table(&mut buf, &report.stats, &report.state)?;
    } else if args.envelope {
        write_json_envelope(&mut buf, &report.stats, &report.state)?;
    } else {
        write_json(&mut buf, &report.stats)?;
    }

    match &args.output {
        Some(path) => {
            fs::write(path, &buf).map_err(|e| CliError::FileWriteError(path.clone(), e.to_string()))?;
            info!(path = %path.display(), "Report written");
            eprintln!("Report written to: {}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(&buf)
                .and_then(|_| stdout.flush())
                .map_err(|e| CliError::FileWriteError(PathBuf::from("<stdout>"), e.to_string()))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use docstats_core::analyze::AnalyzeError;
    use serde_json::Value;
    use std::fs::File;
    use tempfile::TempDir;

    fn args(input: PathBuf, output: PathBuf) -> AnalyzeArgs {
        AnalyzeArgs {
            input,
            format: None,
            depth: 0,
            json: false,
            envelope: false,
            output: Some(output),
            sample_size: 0,
            strict: false,
            progress: false,
            estimated_count: None,
        }
    }

    fn write_input(dir: &TempDir, name: &str, lines: &[&str]) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = File::create(&path).unwrap();
        for line in lines {
            writeln!(file, "{line}").unwrap();
        }
        path
    }

    #[test]
    fn test_table_output() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, "in.jsonl", &[r#"{"a": "x", "b": {"c": 1}}"#, r#"{"a": "y"}"#]);
        let output = dir.path().join("out.txt");

        handle_analyze(&args(input, output.clone())).unwrap();

        let table = fs::read_to_string(&output).unwrap();
        assert!(table.starts_with("Document Analysis\n"));
        assert!(table.contains("  > c "));
        assert!(table.contains("Total objects: 2"));
        assert!(table.contains("Max depth: 2"));
    }

    #[test]
    fn test_json_envelope_output() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, "in.json", &[r#"[{"a": 1}, {"a": 2}, {"a": 3}]"#]);
        let output = dir.path().join("out.json");

        let mut args = args(input, output.clone());
        args.json = true;
        args.envelope = true;
        args.sample_size = 2;
        handle_analyze(&args).unwrap();

        let report: Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(report["totalObjects"], 2);
        assert_eq!(report["stats"]["a"][0]["Count"], 2);
    }

    #[test]
    fn test_depth_flag_limits_statistics() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, "in.jsonl", &[r#"{"b": {"c": 1}}"#]);
        let output = dir.path().join("out.json");

        let mut args = args(input, output.clone());
        args.json = true;
        args.depth = 1;
        handle_analyze(&args).unwrap();

        let report: Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(report["b"][0]["Props"], serde_json::json!({}));
    }

    #[test]
    fn test_strict_mode_writes_partial_report_then_fails() {
        let dir = TempDir::new().unwrap();
        let input = write_input(
            &dir,
            "in.jsonl",
            &[
                r#"{"a": 1}"#,
                r####"{"a": {"$binary": {"base64": "###", "subType": "00"}}}"####,
                r#"{"a": 3}"#,
            ],
        );
        let output = dir.path().join("out.txt");

        let mut args = args(input, output.clone());
        args.strict = true;
        let err = handle_analyze(&args).unwrap_err();

        assert!(matches!(
            err,
            CliError::AnalysisError(AnalyzeError::InvalidRecord { .. })
        ));
        assert!(err.user_message().contains("--strict"));
        let table = fs::read_to_string(&output).unwrap();
        assert!(table.contains("Total objects: 2"));
    }

    #[test]
    fn test_lenient_mode_counts_invalid_records() {
        let dir = TempDir::new().unwrap();
        let input = write_input(
            &dir,
            "in.jsonl",
            &[r#"{"a": 1}"#, r####"{"a": {"$binary": {"base64": "###", "subType": "00"}}}"####],
        );
        let output = dir.path().join("out.txt");

        handle_analyze(&args(input, output.clone())).unwrap();

        let table = fs::read_to_string(&output).unwrap();
        assert!(table.contains("Invalid objects: 1"));
    }

    #[test]
    fn test_missing_input() {
        let dir = TempDir::new().unwrap();
        let err = handle_analyze(&args(dir.path().join("nope.jsonl"), dir.path().join("out.txt")))
            .unwrap_err();
        assert!(matches!(err, CliError::FileReadError(..)));
    }
}
