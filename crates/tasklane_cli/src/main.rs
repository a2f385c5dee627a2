//! CLI entry point.
//!
//! # Responsibility
//! - Verify `tasklane_core` linkage with a deterministic ping.
//! - Replay recorded drag scripts and print the resulting report as JSON.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tasklane_core::{default_log_level, init_logging, replay_script, DragScript};

#[derive(Parser)]
#[command(name = "tasklane", version, about = "Touch reorder core runner")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print core health and version.
    Ping,

    /// Replay a JSON drag script and print the report.
    Replay {
        /// Path to the drag script.
        file: PathBuf,
        /// Absolute directory for rolling log files. Logging stays off without it.
        #[arg(long)]
        log_dir: Option<String>,
        /// trace | debug | info | warn | error.
        #[arg(long)]
        log_level: Option<String>,
        /// Pretty-print the report.
        #[arg(long)]
        pretty: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match cli.command {
        Commands::Ping => {
            println!("tasklane_core ping={}", tasklane_core::ping());
            println!("tasklane_core version={}", tasklane_core::core_version());
            ExitCode::SUCCESS
        }
        Commands::Replay {
            file,
            log_dir,
            log_level,
            pretty,
        } => match run_replay(&file, log_dir.as_deref(), log_level.as_deref(), pretty) {
            Ok(()) => ExitCode::SUCCESS,
            Err(message) => {
                eprintln!("error: {message}");
                ExitCode::FAILURE
            }
        },
    }
}

fn run_replay(
    file: &Path,
    log_dir: Option<&str>,
    log_level: Option<&str>,
    pretty: bool,
) -> Result<(), String> {
    if let Some(dir) = log_dir {
        let level = log_level.unwrap_or(default_log_level());
        init_logging(level, dir).map_err(|err| err.to_string())?;
    }

    let rendered = render_replay(file, pretty)?;
    println!("{rendered}");
    Ok(())
}

/// Reads, replays and serializes one drag script.
fn render_replay(file: &Path, pretty: bool) -> Result<String, String> {
    let source = std::fs::read_to_string(file)
        .map_err(|err| format!("failed to read `{}`: {err}", file.display()))?;
    let script = DragScript::from_json(&source).map_err(|err| err.to_string())?;
    let report = replay_script(&script).map_err(|err| err.to_string())?;
    log::info!(
        "event=replay module=cli status=ok steps={} drops={}",
        script.steps.len(),
        report.drops.len()
    );

    if pretty {
        serde_json::to_string_pretty(&report)
    } else {
        serde_json::to_string(&report)
    }
    .map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::{render_replay, run_replay};
    use std::path::Path;

    const DEMO_SCRIPT: &str = concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/../../demos/reorder_after_b.json"
    );

    #[test]
    fn demo_script_renders_committed_report() {
        let rendered = render_replay(Path::new(DEMO_SCRIPT), false).unwrap();
        let report: serde_json::Value = serde_json::from_str(&rendered).unwrap();

        assert_eq!(report["drops"][0]["committed"], true);
        assert_eq!(report["tasks"][0]["text"], "Call plumber");
        assert_eq!(report["tasks"][1]["text"], "Buy milk");
        assert_eq!(report["haptics"][3], "heavy");
    }

    #[test]
    fn replay_initializes_logging_with_default_level() {
        let dir = tempfile::tempdir().unwrap();
        let log_dir = dir.path().to_str().unwrap().to_string();

        run_replay(Path::new(DEMO_SCRIPT), Some(&log_dir), None, true).unwrap();

        let (level, active_dir) = tasklane_core::logging_status().unwrap();
        assert_eq!(level, tasklane_core::default_log_level());
        assert_eq!(active_dir, dir.path());
    }

    #[test]
    fn unreadable_or_misconfigured_input_is_reported() {
        let missing = render_replay(Path::new("/nonexistent/drag.json"), false).unwrap_err();
        assert!(missing.contains("failed to read"));

        let relative = run_replay(Path::new(DEMO_SCRIPT), Some("logs"), Some("info"), false)
            .unwrap_err();
        assert!(relative.contains("absolute"));
    }
}
