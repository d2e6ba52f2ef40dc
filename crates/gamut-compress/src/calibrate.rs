//! Limit calibration.
//!
//! Four of the five curves are parameterized implicitly: their `lim` is not
//! the distance at which the curve crosses the gamut boundary. Given a target
//! distance `k = headroom + 1`, the calibrator finds the `lim` for which the
//! forward curve evaluates to exactly 1 at `k`.
//!
//! The equation solved is `f(x, k) = inverse_x(1) - k = 0`, i.e. the distance
//! whose compressed value is 1 under limit `x`, minus the target. It is solved
//! by bisection inside a fixed per-method bracket.
//!
//! Calibration runs three times per context (once per channel), never per
//! pixel. It never fails: a bracket without a sign change yields a fallback
//! limit, and running out of iterations yields the last midpoint.

use std::f64::consts::PI;

use tracing::{debug, trace, warn};

use crate::types::Method;

/// Stop when `|f(c)|` is at or below this.
pub const TOLERANCE: f64 = 1e-4;

/// Iteration cap for the bisection loop.
pub const MAX_ITERATIONS: usize = 100;

/// How a calibrated limit was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationOutcome {
    /// Direct formula, no search.
    ClosedForm,
    /// Bisection reached the tolerance.
    Converged,
    /// Iteration cap hit; the limit is the last midpoint.
    IterationCap,
    /// The bracket had no sign change; the limit is the method's fallback.
    BracketFallback,
}

/// A calibrated per-channel limit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    /// Curve limit to feed the compression function.
    pub limit: f32,
    /// Bisection iterations spent (0 for closed form and fallback).
    pub iterations: usize,
    /// How the limit was obtained.
    pub outcome: CalibrationOutcome,
}

/// Result of a successful bracket search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bisection {
    /// Last midpoint.
    pub root: f64,
    /// Residual at `root`.
    pub residual: f64,
    /// Midpoints evaluated.
    pub iterations: usize,
}

impl Bisection {
    /// Whether the residual is within `tol`.
    #[inline]
    pub fn converged(&self, tol: f64) -> bool {
        self.residual.abs() <= tol
    }
}

/// Bisection root search of `f` on `[a, b]`.
///
/// Returns `None` when `f(a)` or `f(b)` is not finite, or when they do not
/// differ in sign. Otherwise
/// halves the bracket until `|f(c)| <= tol` or `max_iter` midpoints past the
/// first have been tried, and returns the last midpoint.
pub fn bisect<F>(f: F, mut a: f64, mut b: f64, tol: f64, max_iter: usize) -> Option<Bisection>
where
    F: Fn(f64) -> f64,
{
    let mut fa = f(a);
    let fb = f(b);

    if !fa.is_finite() || !fb.is_finite() {
        return None;
    }
    if fa == 0.0 {
        return Some(Bisection { root: a, residual: 0.0, iterations: 0 });
    }
    if fb == 0.0 {
        return Some(Bisection { root: b, residual: 0.0, iterations: 0 });
    }
    if fa.signum() == fb.signum() {
        return None;
    }

    let mut c = 0.5 * (a + b);
    let mut y = f(c);
    let mut n = 1;

    while y.abs() > tol && n <= max_iter {
        if y.signum() == fa.signum() {
            a = c;
            fa = y;
        } else {
            b = c;
        }
        c = 0.5 * (a + b);
        y = f(c);
        n += 1;
    }

    Some(Bisection { root: c, residual: y, iterations: n })
}

impl Method {
    /// Residual `f(x, k)` whose root is the limit placing the boundary
    /// crossing at distance `k`.
    ///
    /// `None` for Reinhard, whose limit is `k` itself.
    pub fn residual(self, x: f64, thr: f64, k: f64) -> Option<f64> {
        let inverse_at_one = match self {
            Method::Reinhard => return None,
            Method::Log => {
                let span = 1.0 - x;
                thr * span * ((1.0 - thr) / (thr * span)).exp() + x * thr
            }
            Method::Exponential => thr - ((1.0 - x) / (thr - x)).ln() * (x - thr),
            Method::Arctangent => {
                2.0 * (PI * (1.0 - thr) / (2.0 * (x - thr))).tan() * (x - thr) / PI + thr
            }
            Method::Tanh => atanh((1.0 - thr) / (x - thr)) * (x - thr) + thr,
        };
        Some(inverse_at_one - k)
    }

    /// Initial bisection bracket. `None` for closed-form methods.
    pub fn bracket(self) -> Option<(f64, f64)> {
        match self {
            // lim ranges from -inf (linear) up to 1 (clip)
            Method::Log => Some((-5.0, 0.96)),
            Method::Reinhard => None,
            // lim ranges from 1 (clip) up to inf (linear)
            Method::Exponential | Method::Arctangent => Some((1.0001, 5.0)),
            Method::Tanh => Some((1.000001, 5.0)),
        }
    }

    /// Limit used when the bracket has no sign change.
    pub fn fallback_limit(self) -> f64 {
        match self {
            Method::Log => -100.0,
            Method::Reinhard => 1.0,
            Method::Exponential | Method::Arctangent | Method::Tanh => 1.999999,
        }
    }
}

#[inline]
fn atanh(x: f64) -> f64 {
    ((1.0 + x) / (1.0 - x)).ln() * 0.5
}

/// Find the limit for `method` so the forward curve reaches 1 at `target`.
///
/// `thr` is the protected threshold and `target` the requested boundary
/// crossing distance (`headroom + 1`).
pub fn calibrate(method: Method, thr: f32, target: f32) -> Calibration {
    let Some((a, b)) = method.bracket() else {
        return Calibration {
            limit: target,
            iterations: 0,
            outcome: CalibrationOutcome::ClosedForm,
        };
    };

    let thr = thr as f64;
    let k = target as f64;
    trace!(%method, thr, k, a, b, "calibrate");

    let f = |x| method.residual(x, thr, k).unwrap_or(f64::NAN);
    match bisect(f, a, b, TOLERANCE, MAX_ITERATIONS) {
        Some(result) if result.converged(TOLERANCE) => Calibration {
            limit: result.root as f32,
            iterations: result.iterations,
            outcome: CalibrationOutcome::Converged,
        },
        Some(result) => {
            debug!(
                %method, thr, k,
                limit = result.root,
                residual = result.residual,
                "Calibration hit iteration cap"
            );
            Calibration {
                limit: result.root as f32,
                iterations: result.iterations,
                outcome: CalibrationOutcome::IterationCap,
            }
        }
        None => {
            let limit = method.fallback_limit();
            warn!(%method, thr, k, limit, "No root in calibration bracket, using fallback limit");
            Calibration {
                limit: limit as f32,
                iterations: 0,
                outcome: CalibrationOutcome::BracketFallback,
            }
        }
    }
}
