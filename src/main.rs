//! multicaret - replay command scripts across multiple selections
//!
//! Usage:
//!   multicaret script.yaml
//!   multicaret --json --config custom.yaml script.yaml

use anyhow::{Context, Result};
use clap::Parser;

use multicaret::cli::CliArgs;
use multicaret::clipboard::SystemClipboard;
use multicaret::config::MultiCaretConfig;
use multicaret::script::Script;

fn main() -> Result<()> {
    multicaret::tracing::init();

    let args = CliArgs::parse();

    let config = match &args.config {
        Some(path) => MultiCaretConfig::load_from(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => MultiCaretConfig::load(),
    };

    let script = Script::load(&args.script)
        .with_context(|| format!("Failed to load script {}", args.script.display()))?;

    let outcome = if args.system_clipboard {
        script.run_with(&config, SystemClipboard::new)
    } else {
        script.run(&config)
    }
    .with_context(|| format!("Failed to run script {}", args.script.display()))?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&outcome).context("Failed to serialize outcome")?
        );
    } else {
        print!("{}", outcome.render());
    }

    Ok(())
}
