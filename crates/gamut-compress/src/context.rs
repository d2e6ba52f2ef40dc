//! Precomputed per-pass compression state.
//!
//! A [`CompressionContext`] is built once from [`GamutCompressParams`]
//! before any pixel is processed. Building it runs the limit calibration for
//! each channel; after that it is read-only and cheap to share across
//! threads (`Copy`, no interior mutability).

use tracing::debug;

use crate::calibrate::{calibrate, Calibration, CalibrationOutcome};
use crate::config::GamutCompressParams;
use crate::types::{Direction, Method};

/// Lower bound for the protected threshold (keeps `d / thr` finite).
pub const MIN_THR: f32 = 1e-4;

/// Upper bound for the protected threshold (keeps `1 / (1 - thr)` finite).
pub const MAX_THR: f32 = 1.0 - 1e-4;

/// Smallest headroom fed to the calibrator for iterative methods.
pub const MIN_HEADROOM: f32 = 1e-4;

/// Immutable compression state for one evaluation pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressionContext {
    thr: f32,
    limits: [f32; 3],
    calibrations: [Calibration; 3],
    method: Method,
    direction: Direction,
}

impl CompressionContext {
    /// Build the context, calibrating each channel's limit.
    pub fn new(params: &GamutCompressParams) -> Self {
        let threshold = if params.threshold.is_nan() {
            GamutCompressParams::default().threshold
        } else {
            params.threshold
        };
        let thr = (1.0 - threshold).clamp(MIN_THR, MAX_THR);
        let method = params.method;

        let calibrations = params.headroom().map(|headroom| {
            if method.is_closed_form() {
                calibrate(method, thr, headroom.max(0.0) + 1.0)
            } else {
                calibrate(method, thr, headroom.max(MIN_HEADROOM) + 1.0)
            }
        });
        let limits = calibrations.map(|c| c.limit);

        debug!(
            %method,
            thr,
            lim_cyan = limits[0],
            lim_magenta = limits[1],
            lim_yellow = limits[2],
            invert = params.invert,
            "Built gamut compression context"
        );

        Self {
            thr,
            limits,
            calibrations,
            method,
            direction: params.direction(),
        }
    }

    /// Build a context from already known limits, skipping calibration.
    ///
    /// `thr` is used as given; the caller is responsible for keeping
    /// `lim != thr`.
    pub fn from_limits(thr: f32, limits: [f32; 3], method: Method, direction: Direction) -> Self {
        let calibrations = limits.map(|limit| Calibration {
            limit,
            iterations: 0,
            outcome: CalibrationOutcome::ClosedForm,
        });
        Self { thr, limits, calibrations, method, direction }
    }

    /// Same limits, other direction. No recalibration.
    #[inline]
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Protected threshold `thr`.
    #[inline]
    pub fn thr(&self) -> f32 {
        self.thr
    }

    /// Calibrated limits `[cyan, magenta, yellow]`.
    #[inline]
    pub fn limits(&self) -> [f32; 3] {
        self.limits
    }

    /// Per-channel calibration details.
    #[inline]
    pub fn calibrations(&self) -> [Calibration; 3] {
        self.calibrations
    }

    /// Selected curve.
    #[inline]
    pub fn method(&self) -> Method {
        self.method
    }

    /// Selected direction.
    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }
}

impl Default for CompressionContext {
    fn default() -> Self {
        Self::new(&GamutCompressParams::default())
    }
}
