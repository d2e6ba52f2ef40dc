//! Curve command.
//!
//! Samples the selected curve for one channel as a whitespace table:
//! `dist out back`, where `back` runs `out` through the opposite direction.

use anyhow::{bail, Result};
use tracing::trace;

use gamut_compress::{apply, CompressionContext};

use super::resolve_params;
use crate::CurveArgs;

pub fn run(args: CurveArgs, verbose: u8) -> Result<()> {
    trace!(channel = ?args.channel, max = args.max, steps = args.steps, "curve::run");
    if args.steps == 0 {
        bail!("--steps must be at least 1");
    }
    if !args.max.is_finite() || args.max <= 0.0 {
        bail!("--max must be a positive number, got {}", args.max);
    }

    let params = resolve_params(&args.params)?;
    let ctx = CompressionContext::new(&params);
    let back_ctx = ctx.with_direction(ctx.direction().inverse());
    let c = args.channel.index();

    if verbose > 0 {
        println!(
            "# method {} {:?} thr {:.6} lim {:.6}",
            ctx.method(),
            ctx.direction(),
            ctx.thr(),
            ctx.limits()[c]
        );
    }
    println!("{:>10} {:>10} {:>10}", "dist", "out", "back");

    for i in 0..=args.steps {
        let dist = args.max * i as f32 / args.steps as f32;
        let out = apply::compress_distance(&ctx, c, dist);
        let back = apply::compress_distance(&back_ctx, c, out);
        println!("{:>10.6} {:>10.6} {:>10.6}", dist, out, back);
    }

    Ok(())
}
