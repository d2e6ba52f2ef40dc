//! # gamut-compress
//!
//! Parametric gamut compression for scene-linear RGB.
//!
//! Out-of-gamut colors are pulled back toward the gamut boundary along the
//! line to the pixel's achromatic anchor (its largest channel), while colors
//! inside a protected core are left alone. The roll-off is one of five
//! curves, and each curve is calibrated so that a user-chosen distance past
//! the boundary lands exactly on it.
//!
//! # Modules
//!
//! - [`curves`] - forward/inverse compression curves
//! - [`calibrate`] - bisection solver for the curve limits
//! - [`context`] - once-per-pass precomputed state
//! - [`apply`] - per-pixel transform and buffer helpers
//! - [`config`] - parameters and YAML config files
//! - [`parallel`] - Rayon buffer helpers (feature `parallel`)
//!
//! # Example
//!
//! ```rust
//! use gamut_compress::{apply, CompressionContext, GamutCompressParams, Method};
//!
//! let params = GamutCompressParams::default()
//!     .with_method(Method::Tanh)
//!     .with_headroom([0.15, 0.2, 0.25]);
//!
//! // Calibrates the per-channel limits once
//! let ctx = CompressionContext::new(&params);
//!
//! // Negative blue is pulled back toward the red anchor
//! let out = apply::compress_rgba(&ctx, [1.0, 0.4, -0.2, 1.0]);
//! assert!(out[2] > -0.2);
//! assert_eq!(out[3], 1.0);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
mod types;
pub mod apply;
pub mod calibrate;
pub mod config;
pub mod context;
pub mod curves;

#[cfg(feature = "parallel")]
pub mod parallel;

pub use error::{GamutError, GamutResult};
pub use types::{Direction, Method};
pub use calibrate::{calibrate, Calibration, CalibrationOutcome};
pub use config::GamutCompressParams;
pub use context::CompressionContext;
pub use apply::{apply_gamut_compress, apply_gamut_compress_rgba, compress_rgb, compress_rgba};
