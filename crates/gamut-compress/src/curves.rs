//! Compression curve family.
//!
//! Each curve maps a distance from the achromatic axis `d` to a compressed
//! distance `cd`. Below the threshold `thr` every curve is the identity. Above
//! it the curve leaves `thr` with unit slope and bends toward the boundary at
//! a rate set by the per-channel limit `lim`.
//!
//! # Formulas (d >= thr)
//!
//! ```text
//! log        cd = thr + thr(1-lim) ln((d/thr - lim) / (1-lim))
//! reinhard   cd = thr + 1 / (1/(d-thr) + 1/(1-thr) - 1/(lim-thr))
//! exp        cd = lim - (lim-thr) exp(-(d-thr)/(lim-thr))
//! atan       cd = thr + (lim-thr) 2/pi atan(pi/2 (d-thr)/(lim-thr))
//! tanh       cd = thr + (lim-thr) tanh((d-thr)/(lim-thr))
//! ```
//!
//! The inverse of each is its exact algebraic inverse for the same `thr` and
//! `lim`. Both are evaluated in f64 and rounded to f32 once at the end.

use std::f64::consts::{FRAC_2_PI, FRAC_PI_2};

use crate::types::{Direction, Method};

impl Method {
    /// Compress a distance.
    #[inline]
    pub fn forward(self, dist: f32, thr: f32, lim: f32) -> f32 {
        if dist < thr {
            return dist;
        }
        let (d, thr, lim) = (dist as f64, thr as f64, lim as f64);
        let cd = match self {
            Method::Log => {
                let span = 1.0 - lim;
                thr + thr * span * ((d / thr - lim) / span).ln()
            }
            Method::Reinhard => {
                thr + 1.0 / (1.0 / (d - thr) + 1.0 / (1.0 - thr) - 1.0 / (lim - thr))
            }
            Method::Exponential => {
                let span = lim - thr;
                lim - span * (-(d - thr) / span).exp()
            }
            Method::Arctangent => {
                let span = lim - thr;
                thr + span * FRAC_2_PI * (FRAC_PI_2 * (d - thr) / span).atan()
            }
            Method::Tanh => {
                let span = lim - thr;
                thr + span * ((d - thr) / span).tanh()
            }
        };
        cd as f32
    }

    /// Expand a compressed distance back out.
    ///
    /// Distances at or past the forward curve's asymptote have no preimage
    /// and are returned unchanged.
    #[inline]
    pub fn inverse(self, dist: f32, thr: f32, lim: f32) -> f32 {
        if dist < thr {
            return dist;
        }
        if let Some(asymptote) = self.asymptote(thr, lim) {
            if dist >= asymptote {
                return dist;
            }
        }
        let (d, thr, lim) = (dist as f64, thr as f64, lim as f64);
        let out = match self {
            Method::Log => {
                let span = 1.0 - lim;
                thr * span * ((d - thr) / (thr * span)).exp() + lim * thr
            }
            Method::Reinhard => {
                thr + 1.0 / (1.0 / (d - thr) - 1.0 / (1.0 - thr) + 1.0 / (lim - thr))
            }
            Method::Exponential => thr - ((d - lim) / (thr - lim)).ln() * (lim - thr),
            Method::Arctangent => {
                let span = lim - thr;
                thr + span * FRAC_2_PI * (FRAC_PI_2 * (d - thr) / span).tan()
            }
            Method::Tanh => {
                let span = lim - thr;
                thr + span * ((d - thr) / span).atanh()
            }
        };
        out as f32
    }

    /// Apply the curve in the given direction.
    #[inline]
    pub fn apply(self, direction: Direction, dist: f32, thr: f32, lim: f32) -> f32 {
        match direction {
            Direction::Forward => self.forward(dist, thr, lim),
            Direction::Inverse => self.inverse(dist, thr, lim),
        }
    }

    /// Derivative of the forward curve at `dist`.
    ///
    /// 1 in the identity region. Near 0 the curve is flat, and the inverse
    /// magnifies any rounding of the compressed value by `1 / slope`.
    pub fn slope(self, dist: f32, thr: f32, lim: f32) -> f32 {
        if dist <= thr {
            return 1.0;
        }
        let (d, thr, lim) = (dist as f64, thr as f64, lim as f64);
        let x = d - thr;
        let slope = match self {
            Method::Log => (1.0 - lim) / (d / thr - lim),
            Method::Reinhard => {
                let a = 1.0 / (1.0 - thr) - 1.0 / (lim - thr);
                1.0 / ((1.0 + a * x) * (1.0 + a * x))
            }
            Method::Exponential => (-x / (lim - thr)).exp(),
            Method::Arctangent => {
                let z = FRAC_PI_2 * x / (lim - thr);
                1.0 / (1.0 + z * z)
            }
            Method::Tanh => {
                let c = (x / (lim - thr)).cosh();
                1.0 / (c * c)
            }
        };
        slope as f32
    }

    /// Value the forward curve approaches as the distance goes to infinity.
    ///
    /// `None` when the curve is unbounded (log, or reinhard with no
    /// compression).
    pub fn asymptote(self, thr: f32, lim: f32) -> Option<f32> {
        match self {
            Method::Log => None,
            Method::Reinhard => {
                let (thr, lim) = (thr as f64, lim as f64);
                let denom = 1.0 / (1.0 - thr) - 1.0 / (lim - thr);
                (denom > 0.0).then(|| (thr + 1.0 / denom) as f32)
            }
            Method::Exponential | Method::Arctangent | Method::Tanh => Some(lim),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const THR: f32 = 0.8;

    /// Representative limits: log wants lim < 1, the rest lim > 1.
    fn sample_limit(method: Method) -> f32 {
        match method {
            Method::Log => 0.5,
            Method::Reinhard => 1.2,
            Method::Exponential | Method::Arctangent | Method::Tanh => 1.3,
        }
    }

    #[test]
    fn test_identity_below_threshold() {
        for method in Method::ALL {
            let lim = sample_limit(method);
            for i in 0..80 {
                let d = i as f32 * 0.01;
                assert_eq!(method.forward(d, THR, lim), d, "{} forward", method);
                assert_eq!(method.inverse(d, THR, lim), d, "{} inverse", method);
            }
            // Negative distances (channel above the anchor never happens, but
            // the curve must not care).
            assert_eq!(method.forward(-0.3, THR, lim), -0.3);
        }
    }

    #[test]
    fn test_continuous_at_threshold() {
        for method in Method::ALL {
            let lim = sample_limit(method);
            assert_abs_diff_eq!(method.forward(THR, THR, lim), THR, epsilon = 1e-6);
            assert_abs_diff_eq!(method.inverse(THR, THR, lim), THR, epsilon = 1e-6);
            // Unit slope just above the threshold
            let d = THR + 1e-3;
            assert_abs_diff_eq!(method.forward(d, THR, lim), d, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_forward_monotonic() {
        for method in Method::ALL {
            let lim = sample_limit(method);
            let mut prev = method.forward(THR, THR, lim);
            for i in 1..=400 {
                let d = THR + i as f32 * 0.01;
                let cd = method.forward(d, THR, lim);
                // ulp-level wobble is allowed where the curve saturates
                assert!(cd >= prev - 1e-6, "{} not monotonic at d={}: {} < {}", method, d, cd, prev);
                prev = cd;
            }
        }
    }

    #[test]
    fn test_forward_compresses() {
        for method in Method::ALL {
            let lim = sample_limit(method);
            for i in 1..=100 {
                let d = THR + i as f32 * 0.02;
                assert!(method.forward(d, THR, lim) <= d + 1e-6, "{} expanded at {}", method, d);
            }
        }
    }

    #[test]
    fn test_roundtrip() {
        for method in Method::ALL {
            let lim = sample_limit(method);
            for i in 0..=70 {
                let d = THR + i as f32 * 0.01;
                let cd = method.forward(d, THR, lim);
                let back = method.inverse(cd, THR, lim);
                assert_abs_diff_eq!(back, d, epsilon = 1e-3);
            }
        }
    }

    #[test]
    fn test_reinhard_reaches_boundary_at_limit() {
        for lim in [1.05_f32, 1.2, 1.5, 2.0] {
            assert_abs_diff_eq!(Method::Reinhard.forward(lim, THR, lim), 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_reinhard_zero_headroom_is_identity() {
        for i in 0..50 {
            let d = THR + i as f32 * 0.05;
            assert_abs_diff_eq!(Method::Reinhard.forward(d, THR, 1.0), d, epsilon = 1e-4);
        }
        assert_eq!(Method::Reinhard.asymptote(THR, 1.0), None);
    }

    #[test]
    fn test_asymptotic_methods_stay_below_limit() {
        for method in [Method::Exponential, Method::Arctangent, Method::Tanh] {
            let lim = sample_limit(method);
            let cd = method.forward(50.0, THR, lim);
            assert!(cd <= lim + 1e-6, "{}: {} > {}", method, cd, lim);
            assert!(cd > 1.0);
        }
    }

    #[test]
    fn test_inverse_past_asymptote_passthrough() {
        for method in [Method::Reinhard, Method::Exponential, Method::Arctangent, Method::Tanh] {
            let lim = sample_limit(method);
            let asymptote = method.asymptote(THR, lim).unwrap();
            let past = asymptote + 0.5;
            assert_eq!(method.inverse(past, THR, lim), past);
            assert_eq!(method.inverse(asymptote, THR, lim), asymptote);
        }
    }

    #[test]
    fn test_reinhard_asymptote() {
        // thr + 1/(1/(1-thr) - 1/(lim-thr)) = 0.8 + 1/(5 - 2.5) = 1.2
        let a = Method::Reinhard.asymptote(0.8, 1.2).unwrap();
        assert_abs_diff_eq!(a, 1.2, epsilon = 1e-5);
        assert!(Method::Reinhard.forward(1000.0, 0.8, 1.2) < a);
    }

    #[test]
    fn test_slope_matches_finite_difference() {
        let h = 1e-3_f32;
        for method in Method::ALL {
            let lim = sample_limit(method);
            for i in 1..=30 {
                let d = THR + i as f32 * 0.05;
                let numeric = (method.forward(d + h, THR, lim) - method.forward(d - h, THR, lim)) / (2.0 * h);
                assert_abs_diff_eq!(method.slope(d, THR, lim), numeric, epsilon = 2e-3);
            }
        }
    }

    #[test]
    fn test_slope_identity_region_and_decay() {
        for method in Method::ALL {
            let lim = sample_limit(method);
            assert_eq!(method.slope(0.5, THR, lim), 1.0);
            assert_eq!(method.slope(THR, THR, lim), 1.0);
            assert!(method.slope(THR + 2.0, THR, lim) < method.slope(THR + 0.1, THR, lim));
        }
        // A tanh curve squeezed against the boundary is almost flat there
        assert!(Method::Tanh.slope(2.0, 0.8, 1.0000025) < 1e-4);
    }

    #[test]
    fn test_apply_dispatches_direction() {
        let (thr, lim) = (THR, 1.2);
        let d = 1.1;
        assert_eq!(
            Method::Reinhard.apply(Direction::Forward, d, thr, lim),
            Method::Reinhard.forward(d, thr, lim)
        );
        assert_eq!(
            Method::Reinhard.apply(Direction::Inverse, d, thr, lim),
            Method::Reinhard.inverse(d, thr, lim)
        );
    }
}
