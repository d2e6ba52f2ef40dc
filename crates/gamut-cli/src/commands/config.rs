//! Config command.
//!
//! Writes the merged parameter set (config file plus flags) as YAML.

use anyhow::{Context, Result};
use tracing::{info, trace};

use super::resolve_params;
use crate::ConfigArgs;

pub fn run(args: ConfigArgs, verbose: u8) -> Result<()> {
    trace!(output = ?args.output, "config::run");
    let params = resolve_params(&args.params)?;

    match &args.output {
        Some(path) => {
            params
                .save(path)
                .with_context(|| format!("Failed to save: {}", path.display()))?;
            info!(path = %path.display(), "Saved parameters");
            if verbose > 0 {
                println!("Saved: {}", path.display());
            }
        }
        None => print!("{}", params.to_yaml_string()?),
    }

    Ok(())
}
