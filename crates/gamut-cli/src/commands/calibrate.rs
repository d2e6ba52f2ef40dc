//! Calibrate command.
//!
//! Solves the per-channel curve limits and reports how each was obtained.

use anyhow::Result;
use tracing::{info, trace};

use gamut_compress::{Calibration, CalibrationOutcome, CompressionContext, Method};

use super::resolve_params;
use crate::CalibrateArgs;

const CHANNELS: [&str; 3] = ["cyan", "magenta", "yellow"];

pub fn run(args: CalibrateArgs, verbose: u8) -> Result<()> {
    trace!(all = args.all, "calibrate::run");
    let params = resolve_params(&args.params)?;

    let methods: Vec<Method> = if args.all {
        Method::ALL.to_vec()
    } else {
        vec![params.method]
    };

    for (i, method) in methods.into_iter().enumerate() {
        let ctx = CompressionContext::new(&params.with_method(method));
        info!(%method, thr = ctx.thr(), "Calibrated");

        if i > 0 {
            println!();
        }
        println!("method: {}  direction: {:?}", method, ctx.direction());
        println!("thr:    {:.6}", ctx.thr());
        let headroom = params.headroom();
        for (c, cal) in ctx.calibrations().iter().enumerate() {
            println!(
                "{:<8} headroom {:.4}  lim {:>11.6}  {}",
                CHANNELS[c],
                headroom[c],
                cal.limit,
                describe(cal)
            );
        }
        if verbose > 0 {
            for (c, lim) in ctx.limits().iter().enumerate() {
                let crossing = method.inverse(1.0, ctx.thr(), *lim);
                println!("  {} crosses the boundary at distance {:.6}", CHANNELS[c], crossing);
            }
        }
    }

    Ok(())
}

fn describe(cal: &Calibration) -> String {
    match cal.outcome {
        CalibrationOutcome::ClosedForm => "closed form".to_string(),
        CalibrationOutcome::Converged => format!("converged in {} iterations", cal.iterations),
        CalibrationOutcome::IterationCap => {
            format!("iteration cap ({}), best estimate", cal.iterations)
        }
        CalibrationOutcome::BracketFallback => "no root in bracket, fallback".to_string(),
    }
}
