//! Event Unpacker CLI
//!
//! Command-line frontend for the profile-driven event unpacking
//! orchestrator. The profile list in the help text is generated from the
//! registry, so new profiles show up without touching this file.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::{CommandFactory, FromArgMatches, Parser};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use unpack_core::{
    JsonlSinkFactory, MidasFileOpener, ProfileRegistry, RunEnv, RunOptions,
    StandardPipelineBuilder, UnpackerApp,
};

#[derive(Parser)]
#[command(
    name = "unpack-events",
    version,
    about = "Unpack binary event files into a tabular output",
    long_about = "Read a framed binary event file, run every event through the \
                  profile's decoding pipeline, and commit one output row per \
                  successfully extracted event. Events the profile cannot \
                  extract are skipped, not fatal."
)]
struct Cli {
    /// Input event file
    input: PathBuf,

    /// Cap on the number of events to process
    #[arg(value_parser = clap::value_parser!(u64).range(1..))]
    max_events: Option<u64>,

    /// Cap on the number of events to process (flag form of the positional)
    #[arg(
        long = "max-events",
        value_name = "N",
        conflicts_with = "max_events",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    max_events_flag: Option<u64>,

    /// Pipeline profile key (case-insensitive)
    #[arg(short, long)]
    profile: Option<String>,

    /// Output table path
    #[arg(short, long, default_value = "unpacked.jsonl")]
    output: PathBuf,

    /// Directory the profiles' pipeline config paths are resolved against
    #[arg(long, default_value = ".")]
    config_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Help footer listing every registered profile and its aliases
fn profile_help(registry: &ProfileRegistry) -> String {
    let mut help = String::from("PROFILES:\n");
    for summary in registry.profile_summaries() {
        help.push_str("  ");
        help.push_str(&summary);
        help.push('\n');
    }
    help.push_str("  Default: ");
    help.push_str(registry.default_profile_key());
    help.push_str(
        "\n\nEXAMPLES:\n  \
         # Unpack a whole run with the default profile\n  \
         unpack-events run00123.mid\n\n  \
         # First 1000 events with the HDSoC profile\n  \
         unpack-events run00123.mid 1000 --profile hdsoc\n\n  \
         # Explicit output path and config location\n  \
         unpack-events run00123.mid --output run00123.jsonl --config-dir /data/daq",
    );
    help
}

fn init_logging(verbose: bool) -> Result<()> {
    // Progress and summary lines go to stdout; keep the log channel quiet
    // unless asked for
    let level = if verbose { Level::DEBUG } else { Level::WARN };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;
    Ok(())
}

fn main() -> Result<()> {
    let registry = ProfileRegistry::new();

    let command = Cli::command().after_help(profile_help(&registry));
    let cli = Cli::from_arg_matches(&command.get_matches())?;

    init_logging(cli.verbose)?;

    let options = RunOptions {
        input: cli.input,
        max_events: cli.max_events.or(cli.max_events_flag),
        profile_key: cli
            .profile
            .unwrap_or_else(|| registry.default_profile_key().to_string()),
        output: cli.output,
    };

    let app = UnpackerApp::new(&registry, cli.config_dir);
    let env = RunEnv {
        sources: &MidasFileOpener,
        pipelines: &StandardPipelineBuilder,
        sinks: &JsonlSinkFactory,
    };

    app.run(&options, &env)?;
    Ok(())
}
