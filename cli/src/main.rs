//! Alert Propagation Simulator CLI
//!
//! Runs a scenario file through the propagation engine and prints the
//! transcript, one line per event.
//!
//! # Example
//!
//! ```bash
//! # Scenario path as an argument
//! alertsim scenarios/fire.txt
//!
//! # Scenario path read from stdin
//! echo scenarios/fire.txt | alertsim
//!
//! # JSON transcript, with debug logging on stderr
//! RUST_LOG=alert_propagation_core=debug alertsim --json scenarios/fire.txt
//! ```

use alert_propagation_core::{
    load_scenario, Engine, ScenarioError, SimulationConfig, SimulationError, Transcript,
};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Printed instead of a transcript when the scenario file does not exist
const FILE_NOT_FOUND: &str = "FILE NOT FOUND";

/// Alert Propagation Simulator
///
/// Deterministic: the same scenario always yields the same transcript.
#[derive(Parser, Debug)]
#[command(name = "alertsim")]
#[command(version, about, long_about = None)]
struct Args {
    /// Scenario file. When omitted, the path is read from the first line of stdin.
    input: Option<PathBuf>,

    /// Print the transcript as a JSON array instead of text lines
    #[arg(long)]
    json: bool,

    /// Print the SHA-256 of the transcript to stderr after the run
    #[arg(long)]
    digest: bool,

    /// Abort after dispatching this many events (guards zero-delay cycles)
    #[arg(long)]
    max_events: Option<usize>,
}

/// What the caller sees once a scenario has been handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    /// Transcript printed
    Completed,
    /// Sentinel printed, nothing simulated
    NotFound,
    /// Error reported on stderr, no transcript
    Failed,
}

impl Status {
    fn is_success(self) -> bool {
        !matches!(self, Status::Failed)
    }
}

impl From<Status> for ExitCode {
    fn from(status: Status) -> Self {
        if status.is_success() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }
}

fn main() -> ExitCode {
    // Logs go to stderr; stdout carries only the transcript
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let path = match args.input.clone() {
        Some(path) => path,
        None => match read_path_from_stdin() {
            Ok(path) => path,
            Err(err) => {
                error!(%err, "Failed to read scenario path from stdin");
                return ExitCode::FAILURE;
            }
        },
    };

    let mut stdout = io::stdout().lock();
    execute(&args, &path, &mut stdout).into()
}

/// Load, simulate and print one scenario
fn execute(args: &Args, path: &Path, out: &mut impl Write) -> Status {
    let config = match load_scenario(path) {
        Ok(config) => config,
        Err(ScenarioError::NotFound(_)) => {
            return match writeln!(out, "{FILE_NOT_FOUND}") {
                Ok(()) => Status::NotFound,
                Err(err) => {
                    error!(%err, "Failed to write output");
                    Status::Failed
                }
            };
        }
        Err(err) => {
            eprintln!("error: {err}");
            return Status::Failed;
        }
    };

    info!(
        path = %path.display(),
        horizon = config.horizon,
        initial_events = config.initial_events.len(),
        "Starting simulation"
    );

    let transcript = match simulate(config, args.max_events) {
        Ok(transcript) => transcript,
        Err(err) => {
            eprintln!("error: {err}");
            return Status::Failed;
        }
    };

    if let Err(err) = write_transcript(out, &transcript, args.json) {
        error!(%err, "Failed to write transcript");
        return Status::Failed;
    }

    if args.digest {
        eprintln!("digest: {}", transcript.digest());
    }

    Status::Completed
}

fn write_transcript(out: &mut impl Write, transcript: &Transcript, json: bool) -> io::Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut *out, transcript)?;
        writeln!(out)
    } else {
        transcript
            .entries()
            .iter()
            .try_for_each(|entry| writeln!(out, "{entry}"))
    }
}

fn simulate(
    config: SimulationConfig,
    max_events: Option<usize>,
) -> Result<Transcript, SimulationError> {
    let mut engine = Engine::new(config)?;
    if let Some(limit) = max_events {
        engine = engine.with_event_limit(limit);
    }
    engine.run()
}

/// First line of stdin, trimmed, as a path
fn read_path_from_stdin() -> io::Result<PathBuf> {
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(PathBuf::from(line.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: &str = "LENGTH 100\nPROPAGATE 1 2 3\nALERT 1 fire 0\n";

    /// Write `contents` to a file unique to this test process
    fn scratch_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "alertsim_cli_{}_{}.txt",
            std::process::id(),
            name
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn run(argv: &[&str], path: &Path) -> (Status, String) {
        let args = Args::parse_from(std::iter::once("alertsim").chain(argv.iter().copied()));
        let mut out = Vec::new();
        let status = execute(&args, path, &mut out);
        (status, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_missing_file_prints_sentinel_and_succeeds() {
        let path = std::env::temp_dir().join(format!(
            "alertsim_cli_{}_absent.txt",
            std::process::id()
        ));

        let (status, out) = run(&[], &path);

        assert_eq!(status, Status::NotFound);
        assert_eq!(out, "FILE NOT FOUND\n");
        assert!(status.is_success());
    }

    #[test]
    fn test_transcript_printed_line_by_line() {
        let path = scratch_file("text", SCENARIO);
        let (status, out) = run(&[], &path);
        std::fs::remove_file(&path).unwrap();

        assert_eq!(status, Status::Completed);
        assert_eq!(
            out,
            "@0: #1 SENT ALERT TO #2: fire\n@3: #2 RECEIVED ALERT FROM #1: fire\n@100: END\n"
        );
    }

    #[test]
    fn test_json_output() {
        let path = scratch_file("json", SCENARIO);
        let (status, out) = run(&["--json"], &path);
        std::fs::remove_file(&path).unwrap();

        assert_eq!(status, Status::Completed);
        let entries: serde_json::Value = serde_json::from_str(&out).unwrap();
        let entries = entries.as_array().unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0]["type"], "sent_alert");
        assert_eq!(entries[2], serde_json::json!({ "type": "end", "time": 100 }));
    }

    #[test]
    fn test_malformed_scenario_fails_without_output() {
        let path = scratch_file("malformed", "LENGTH 10\nPROPAGATE 1 two 3\n");
        let (status, out) = run(&[], &path);
        std::fs::remove_file(&path).unwrap();

        assert_eq!(status, Status::Failed);
        assert!(out.is_empty());
        assert!(!status.is_success());
    }

    #[test]
    fn test_event_limit_fails_without_partial_transcript() {
        let cycle = "LENGTH 10\nPROPAGATE 1 2 0\nPROPAGATE 2 1 0\nCANCEL 1 x 0\n";
        let path = scratch_file("limit", cycle);
        let (status, out) = run(&["--max-events", "20"], &path);
        std::fs::remove_file(&path).unwrap();

        assert_eq!(status, Status::Failed);
        assert!(out.is_empty());
    }
}
