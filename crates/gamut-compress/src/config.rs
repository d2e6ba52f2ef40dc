//! Gamut compression parameters and YAML config files.
//!
//! ```yaml
//! threshold: 0.2
//! cyan: 0.2
//! magenta: 0.2
//! yellow: 0.2
//! method: tanh
//! invert: false
//! ```
//!
//! Missing keys take their defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::context::CompressionContext;
use crate::types::{Direction, Method};
use crate::{GamutError, GamutResult};

/// Smallest forward-curve slope accepted where a channel crosses the gamut
/// boundary.
///
/// Expanding a compressed value moves it by about `ulp / slope`, so flatter
/// curves cannot be inverted to within 1e-3 from f32 data.
pub const MIN_BOUNDARY_SLOPE: f32 = 1e-4;

/// User-facing parameter set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GamutCompressParams {
    /// Fraction of the gamut, measured in from the boundary, that is
    /// compressed. Range `[0, 1)`; the protected core is `1 - threshold`.
    pub threshold: f32,
    /// Headroom past the boundary toward cyan (red channel distance).
    pub cyan: f32,
    /// Headroom past the boundary toward magenta (green channel distance).
    pub magenta: f32,
    /// Headroom past the boundary toward yellow (blue channel distance).
    pub yellow: f32,
    /// Compression curve.
    pub method: Method,
    /// Expand instead of compress.
    pub invert: bool,
}

impl Default for GamutCompressParams {
    fn default() -> Self {
        Self {
            threshold: 0.2,
            cyan: 0.2,
            magenta: 0.2,
            yellow: 0.2,
            method: Method::default(),
            invert: false,
        }
    }
}

impl GamutCompressParams {
    /// Per-channel headroom as `[cyan, magenta, yellow]`.
    #[inline]
    pub fn headroom(&self) -> [f32; 3] {
        [self.cyan, self.magenta, self.yellow]
    }

    /// Direction selected by the `invert` flag.
    #[inline]
    pub fn direction(&self) -> Direction {
        Direction::from_invert(self.invert)
    }

    /// Set the curve.
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Set the threshold.
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the per-channel headroom `[cyan, magenta, yellow]`.
    pub fn with_headroom(mut self, headroom: [f32; 3]) -> Self {
        [self.cyan, self.magenta, self.yellow] = headroom;
        self
    }

    /// Set the invert flag.
    pub fn with_invert(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    /// Check ranges.
    ///
    /// Context construction clamps instead of failing; this is for callers
    /// that want to reject bad input up front (config files, CLI flags).
    ///
    /// Besides the plain ranges, each channel's calibrated curve must still
    /// have a slope of at least [`MIN_BOUNDARY_SLOPE`] at its crossing
    /// distance `headroom + 1`. Large headrooms with a hard shoulder (tanh at
    /// a low threshold, for example) squeeze the curve flat against its
    /// asymptote and fail this check.
    pub fn validate(&self) -> GamutResult<()> {
        if !self.threshold.is_finite() || !(0.0..1.0).contains(&self.threshold) {
            return Err(GamutError::InvalidParameter(format!(
                "threshold must be in [0, 1), got {}",
                self.threshold
            )));
        }
        let names = ["cyan", "magenta", "yellow"];
        for (name, value) in names.into_iter().zip(self.headroom()) {
            if !value.is_finite() || value < 0.0 {
                return Err(GamutError::InvalidParameter(format!(
                    "{} must be a finite value >= 0, got {}",
                    name, value
                )));
            }
        }

        let ctx = CompressionContext::new(self);
        for ((name, headroom), lim) in names.into_iter().zip(self.headroom()).zip(ctx.limits()) {
            let slope = self.method.slope(headroom + 1.0, ctx.thr(), lim);
            if !(slope >= MIN_BOUNDARY_SLOPE) {
                return Err(GamutError::InvalidParameter(format!(
                    "{} headroom {} is too large for {} at threshold {}: \
                     the curve is flat at the gamut boundary (slope {:.1e})",
                    name, headroom, self.method, self.threshold, slope
                )));
            }
        }
        Ok(())
    }

    /// Parse and validate parameters from a YAML string.
    pub fn from_yaml_str(yaml: &str) -> GamutResult<Self> {
        let params: Self = serde_yaml::from_str(yaml)?;
        params.validate()?;
        Ok(params)
    }

    /// Load and validate parameters from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> GamutResult<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading gamut compression config");
        let text = fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    /// Serialize to YAML.
    pub fn to_yaml_string(&self) -> GamutResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Write to a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> GamutResult<()> {
        fs::write(path, self.to_yaml_string()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let p = GamutCompressParams::default();
        assert_eq!(p.threshold, 0.2);
        assert_eq!(p.headroom(), [0.2, 0.2, 0.2]);
        assert_eq!(p.method, Method::Reinhard);
        assert_eq!(p.direction(), Direction::Forward);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let p = GamutCompressParams::default()
            .with_method(Method::Tanh)
            .with_threshold(0.3)
            .with_headroom([0.1, 0.2, 0.3])
            .with_invert(true);
        assert_eq!(p.method, Method::Tanh);
        assert_eq!(p.threshold, 0.3);
        assert_eq!([p.cyan, p.magenta, p.yellow], [0.1, 0.2, 0.3]);
        assert_eq!(p.direction(), Direction::Inverse);
    }

    #[test]
    fn test_yaml_partial_uses_defaults() {
        let p = GamutCompressParams::from_yaml_str("method: atan\ncyan: 0.5\n").unwrap();
        assert_eq!(p.method, Method::Arctangent);
        assert_eq!(p.cyan, 0.5);
        assert_eq!(p.magenta, 0.2);
        assert_eq!(p.threshold, 0.2);
        assert!(!p.invert);
    }

    #[test]
    fn test_yaml_method_aliases() {
        for (text, method) in [
            ("logarithmic", Method::Log),
            ("exponential", Method::Exponential),
            ("arctangent", Method::Arctangent),
            ("hyperbolic-tangent", Method::Tanh),
            ("reinhard", Method::Reinhard),
        ] {
            let yaml = format!("method: {}", text);
            let p = GamutCompressParams::from_yaml_str(&yaml).unwrap();
            assert_eq!(p.method, method, "alias {}", text);
        }
    }

    #[test]
    fn test_yaml_roundtrip() {
        let p = GamutCompressParams::default()
            .with_method(Method::Exponential)
            .with_headroom([0.1, 0.25, 0.4])
            .with_invert(true);
        let yaml = p.to_yaml_string().unwrap();
        assert!(yaml.contains("method: exp"));
        let back = GamutCompressParams::from_yaml_str(&yaml).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn test_yaml_rejects_unknown_method() {
        let err = GamutCompressParams::from_yaml_str("method: spline").unwrap_err();
        assert!(matches!(err, GamutError::Yaml(_)));
    }

    #[test]
    fn test_validate_ranges() {
        let bad_threshold = GamutCompressParams::default().with_threshold(1.0);
        assert!(matches!(bad_threshold.validate(), Err(GamutError::InvalidParameter(_))));

        let negative = GamutCompressParams::default().with_threshold(-0.1);
        assert!(negative.validate().is_err());

        let bad_headroom = GamutCompressParams::default().with_headroom([0.2, -0.1, 0.2]);
        let err = bad_headroom.validate().unwrap_err();
        assert!(err.to_string().contains("magenta"));

        let nan = GamutCompressParams::default().with_headroom([f32::NAN, 0.2, 0.2]);
        assert!(nan.validate().is_err());

        let zero = GamutCompressParams::default().with_threshold(0.0).with_headroom([0.0; 3]);
        assert!(zero.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_flat_boundary() {
        let flat = GamutCompressParams::default()
            .with_method(Method::Tanh)
            .with_threshold(0.2)
            .with_headroom([0.2, 1.0, 0.2]);
        let err = flat.validate().unwrap_err();
        assert!(matches!(err, GamutError::InvalidParameter(_)));
        assert!(err.to_string().contains("magenta"), "{}", err);

        // Same curve with less headroom keeps enough slope
        assert!(flat.with_headroom([0.2, 0.8, 0.2]).validate().is_ok());

        // Other curves take the same headroom without trouble
        for method in [Method::Reinhard, Method::Log, Method::Arctangent] {
            assert!(flat.with_method(method).validate().is_ok(), "{}", method);
        }
    }

    #[test]
    fn test_yaml_validation_applies() {
        assert!(GamutCompressParams::from_yaml_str("threshold: 1.5").is_err());
        assert!(GamutCompressParams::from_yaml_str("method: tanh\nthreshold: 0.3\nyellow: 1.5\n").is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gamut.yaml");
        let p = GamutCompressParams::default().with_method(Method::Log).with_threshold(0.25);
        p.save(&path).unwrap();
        let back = GamutCompressParams::load(&path).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = GamutCompressParams::load(dir.path().join("missing.yaml")).unwrap_err();
        assert!(matches!(err, GamutError::Io(_)));
    }
}
