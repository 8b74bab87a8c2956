//! EEG Report - band power and Hjorth features as JSON
//!
//! Usage: `eeg-report [config.json] [signal.json]`
//!
//! Without a configuration the OpenBCI 16-channel preset is used; without a
//! signal a synthetic recording is generated.

mod report;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Extract EEG band power and Hjorth features as JSON")]
struct Args {
    /// Feature configuration JSON (OpenBCI preset when omitted)
    config: Option<PathBuf>,

    /// Recording JSON, one channel or nested channel rows (simulated when omitted)
    signal: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let features = report::run(args.config.as_deref(), args.signal.as_deref())?;
    println!("{}", features.to_json()?);

    Ok(())
}
