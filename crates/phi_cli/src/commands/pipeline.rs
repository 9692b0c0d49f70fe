//! `pipeline` subcommand: validate a batch-pipeline configuration and
//! summarize what an external driver would run.

use std::path::PathBuf;

use clap::Args;

use crate::config::PipelineConfig;
use crate::error::CliError;

#[derive(Args, Debug)]
pub struct PipelineArgs {
    /// Pipeline configuration YAML file
    pub config: PathBuf,
}

pub fn run(args: PipelineArgs) -> Result<(), CliError> {
    let config = PipelineConfig::load(&args.config)?;
    let enabled = config.enabled_test_sets().count();
    let disabled = config.test_sets.len() - enabled;
    println!(
        "{}: {} test set(s) enabled, {} disabled",
        args.config.display(),
        enabled,
        disabled
    );
    for ts in config.enabled_test_sets() {
        let excluded = if ts.exclude.is_empty() {
            String::new()
        } else {
            format!(" (excluding {})", ts.exclude.join(", "))
        };
        println!("  {}{}", ts.eo.display(), excluded);
    }
    Ok(())
}
