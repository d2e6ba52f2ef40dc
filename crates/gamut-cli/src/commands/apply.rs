//! Apply command.
//!
//! Transforms colors given on the command line or read from stdin, one
//! `R G B [A]` per line. Stdin input is gathered into one RGBA buffer and
//! processed in parallel.

use std::io::{self, BufRead, BufWriter, Write};

use anyhow::{bail, Context, Result};
use tracing::{debug, info, trace};

use gamut_compress::{apply, parallel, CompressionContext};

use super::{format_values, parse_pixel, resolve_params};
use crate::ApplyArgs;

pub fn run(args: ApplyArgs, verbose: u8) -> Result<()> {
    trace!(values = args.values.len(), "apply::run");
    let params = resolve_params(&args.params)?;
    let ctx = CompressionContext::new(&params);
    info!(method = %params.method, invert = params.invert, "Applying gamut compression");

    if !args.values.is_empty() {
        if !(3..=4).contains(&args.values.len()) {
            bail!("Expected 3 or 4 values (R G B [A]), got {}", args.values.len());
        }
        let mut pixel = args.values.clone();
        let rgb = apply::compress_rgb(&ctx, [pixel[0], pixel[1], pixel[2]]);
        pixel[..3].copy_from_slice(&rgb);
        if verbose > 0 {
            eprintln!("{} -> {}", format_values(&args.values, args.precision), format_values(&pixel, args.precision));
        }
        println!("{}", format_values(&pixel, args.precision));
        return Ok(());
    }

    let stdin = io::stdin();
    let (mut buffer, widths) = read_pixels(stdin.lock())?;
    debug!(pixels = widths.len(), "Read pixels from stdin");

    parallel::apply_gamut_compress_rgba(&ctx, &mut buffer);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for (pixel, width) in buffer.chunks_exact(4).zip(&widths) {
        writeln!(out, "{}", format_values(&pixel[..*width], args.precision))?;
    }
    out.flush()?;
    Ok(())
}

/// Read `R G B [A]` lines into a packed RGBA buffer.
///
/// Blank lines and `#` comments are skipped. Missing alpha is stored as 1 and
/// the original width of each line is returned so output can mirror it.
fn read_pixels<R: BufRead>(reader: R) -> Result<(Vec<f32>, Vec<usize>)> {
    let mut buffer = Vec::new();
    let mut widths = Vec::new();

    for (n, line) in reader.lines().enumerate() {
        let line = line.context("Failed to read stdin")?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let values = parse_pixel(line).with_context(|| format!("Line {}", n + 1))?;
        buffer.extend_from_slice(&values[..3]);
        buffer.push(values.get(3).copied().unwrap_or(1.0));
        widths.push(values.len());
    }

    Ok((buffer, widths))
}
