//! Command-line argument parsing for the script runner
//!
//! Supports:
//! - Replaying a YAML script against the reference host
//! - Text or JSON output
//! - An explicit config file instead of the default location
//! - The OS clipboard instead of an in-memory one

use clap::Parser;
use std::path::PathBuf;

/// Replay multi-caret command scripts
#[derive(Parser, Debug)]
#[command(
    name = "multicaret",
    version,
    about = "Replay multi-caret command scripts against an in-memory editor"
)]
pub struct CliArgs {
    /// Script to replay (YAML)
    #[arg(value_name = "SCRIPT")]
    pub script: PathBuf,

    /// Print the outcome as JSON
    #[arg(long)]
    pub json: bool,

    /// Config file to use instead of ~/.config/multicaret/config.yaml
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Use the OS clipboard
    #[arg(long)]
    pub system_clipboard: bool,
}
