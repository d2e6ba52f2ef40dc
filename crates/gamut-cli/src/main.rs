//! gamut - parametric gamut compression from the command line
//!
//! Calibrates compression curves, applies them to RGB(A) values and samples
//! them for plotting.

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use gamut_compress::Method;

mod commands;

#[derive(Parser)]
#[command(name = "gamut")]
#[command(author, version, about = "Parametric gamut compression")]
#[command(long_about = "
Compress out-of-gamut RGB values toward the gamut boundary with a choice of
five roll-off curves, or expand them back.

Examples:
  gamut calibrate --method tanh                 # Show solved curve limits
  gamut apply 1.0 0.4 -0.2                      # Compress one color
  gamut apply 1.0 0.4 -0.2 --invert             # Expand it back
  gamut apply --method atan < pixels.txt        # One 'R G B [A]' per line
  gamut curve --method exp --max 2 --steps 40   # Sample the curve
  gamut config --cyan 0.1 -o look.yaml          # Save parameters
  gamut apply --config look.yaml 1.0 0.1 -0.3   # Reuse them
  gamut apply --config look.yaml --no-invert    # Force compression
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve and print the per-channel curve limits
    #[command(visible_alias = "cal")]
    Calibrate(CalibrateArgs),

    /// Apply the transform to colors from arguments or stdin
    #[command(visible_alias = "a")]
    Apply(ApplyArgs),

    /// Print a table of the curve for plotting
    Curve(CurveArgs),

    /// Write the effective parameters as YAML
    Config(ConfigArgs),
}

/// Parameters shared by every command.
#[derive(Args, Debug, Clone, Default)]
struct ParamArgs {
    /// YAML parameter file (flags override its values)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Fraction of the gamut to compress, in [0, 1)
    #[arg(short, long)]
    threshold: Option<f32>,

    /// Headroom for all three channels at once
    #[arg(long)]
    headroom: Option<f32>,

    /// Headroom toward cyan (red channel)
    #[arg(long)]
    cyan: Option<f32>,

    /// Headroom toward magenta (green channel)
    #[arg(long)]
    magenta: Option<f32>,

    /// Headroom toward yellow (blue channel)
    #[arg(long)]
    yellow: Option<f32>,

    /// Curve: log, reinhard, exp, atan, tanh
    #[arg(short, long)]
    method: Option<Method>,

    /// Expand instead of compress
    #[arg(short, long, overrides_with = "no_invert")]
    invert: bool,

    /// Compress even if the config file says invert
    #[arg(long, overrides_with = "invert")]
    no_invert: bool,
}

/// Arguments for the `calibrate` command.
#[derive(Args)]
struct CalibrateArgs {
    #[command(flatten)]
    params: ParamArgs,

    /// Calibrate every method with the same headroom
    #[arg(long)]
    all: bool,
}

/// Arguments for the `apply` command.
#[derive(Args)]
struct ApplyArgs {
    #[command(flatten)]
    params: ParamArgs,

    /// R G B [A] values; reads lines from stdin when omitted
    #[arg(allow_negative_numbers = true, num_args = 0..=4)]
    values: Vec<f32>,

    /// Decimal places in the output
    #[arg(short, long, default_value = "6")]
    precision: usize,
}

/// Arguments for the `curve` command.
#[derive(Args)]
struct CurveArgs {
    #[command(flatten)]
    params: ParamArgs,

    /// Channel whose limit is used
    #[arg(short, long, value_enum, default_value = "cyan")]
    channel: Channel,

    /// Largest distance sampled
    #[arg(long, default_value = "2.0")]
    max: f32,

    /// Number of samples
    #[arg(short, long, default_value = "20")]
    steps: usize,
}

/// Arguments for the `config` command.
#[derive(Args)]
struct ConfigArgs {
    #[command(flatten)]
    params: ParamArgs,

    /// Output file (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// Distance channel selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Channel {
    /// Red channel distance
    #[value(alias = "c", alias = "r")]
    Cyan,
    /// Green channel distance
    #[value(alias = "m", alias = "g")]
    Magenta,
    /// Blue channel distance
    #[value(alias = "y", alias = "b")]
    Yellow,
}

impl Channel {
    fn index(self) -> usize {
        match self {
            Channel::Cyan => 0,
            Channel::Magenta => 1,
            Channel::Yellow => 2,
        }
    }
}

/// Install the tracing subscriber. `RUST_LOG` wins over `-v`.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Configure thread pool
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    match cli.command {
        Commands::Calibrate(args) => commands::calibrate::run(args, cli.verbose),
        Commands::Apply(args) => commands::apply::run(args, cli.verbose),
        Commands::Curve(args) => commands::curve::run(args, cli.verbose),
        Commands::Config(args) => commands::config::run(args, cli.verbose),
    }
}
