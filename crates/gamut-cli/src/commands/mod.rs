//! CLI command implementations

pub mod apply;
pub mod calibrate;
pub mod config;
pub mod curve;

use anyhow::{bail, Context, Result};
use tracing::debug;

use gamut_compress::GamutCompressParams;

use crate::ParamArgs;

/// Merge `--config` and the individual flags into a validated parameter set.
///
/// Precedence: built-in defaults < config file < `--headroom` < per-channel flags.
pub fn resolve_params(args: &ParamArgs) -> Result<GamutCompressParams> {
    let mut params = match &args.config {
        Some(path) => GamutCompressParams::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => GamutCompressParams::default(),
    };

    if let Some(threshold) = args.threshold {
        params.threshold = threshold;
    }
    if let Some(headroom) = args.headroom {
        params = params.with_headroom([headroom; 3]);
    }
    if let Some(cyan) = args.cyan {
        params.cyan = cyan;
    }
    if let Some(magenta) = args.magenta {
        params.magenta = magenta;
    }
    if let Some(yellow) = args.yellow {
        params.yellow = yellow;
    }
    if let Some(method) = args.method {
        params.method = method;
    }
    if args.invert {
        params.invert = true;
    } else if args.no_invert {
        params.invert = false;
    }

    params.validate().context("Invalid gamut compression parameters")?;
    debug!(?params, "Resolved parameters");
    Ok(params)
}

/// Parse one `R G B [A]` line. Commas and whitespace both separate values.
pub fn parse_pixel(line: &str) -> Result<Vec<f32>> {
    let values = line
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<f32>().with_context(|| format!("Invalid number '{}'", s)))
        .collect::<Result<Vec<_>>>()?;

    if !(3..=4).contains(&values.len()) {
        bail!("Expected 3 or 4 values (R G B [A]), got {}", values.len());
    }
    Ok(values)
}

/// Format values space-separated with fixed precision.
pub fn format_values(values: &[f32], precision: usize) -> String {
    values
        .iter()
        .map(|v| format!("{:.*}", precision, v))
        .collect::<Vec<_>>()
        .join(" ")
}
