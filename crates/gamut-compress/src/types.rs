//! Method and direction selectors.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{GamutError, GamutResult};

/// Compression curve family.
///
/// Every method leaves distances below the threshold untouched and reshapes
/// the rest so that a distance of `headroom + 1` lands on the gamut boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// Natural logarithm shoulder. Unbounded, grows slowly past the boundary.
    #[serde(alias = "logarithmic", alias = "ln")]
    Log,
    /// Rational (Reinhard-style) curve. Limit is a closed form of the headroom.
    #[default]
    Reinhard,
    /// Natural exponent with a horizontal asymptote at the limit.
    #[serde(rename = "exp", alias = "exponential")]
    Exponential,
    /// Arctangent with a horizontal asymptote at the limit.
    #[serde(rename = "atan", alias = "arctangent")]
    Arctangent,
    /// Hyperbolic tangent with a horizontal asymptote at the limit.
    #[serde(alias = "hyperbolic-tangent")]
    Tanh,
}

impl Method {
    /// All methods in selector order.
    pub const ALL: [Method; 5] = [
        Method::Log,
        Method::Reinhard,
        Method::Exponential,
        Method::Arctangent,
        Method::Tanh,
    ];

    /// Short name used in config files and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Method::Log => "log",
            Method::Reinhard => "reinhard",
            Method::Exponential => "exp",
            Method::Arctangent => "atan",
            Method::Tanh => "tanh",
        }
    }

    /// Whether the limit is derived directly from the headroom (no search).
    #[inline]
    pub fn is_closed_form(self) -> bool {
        matches!(self, Method::Reinhard)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Method {
    type Err = GamutError;

    fn from_str(s: &str) -> GamutResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "log" | "ln" | "logarithmic" => Ok(Method::Log),
            "reinhard" | "rational" => Ok(Method::Reinhard),
            "exp" | "exponential" => Ok(Method::Exponential),
            "atan" | "arctan" | "arctangent" => Ok(Method::Arctangent),
            "tanh" | "hyperbolic-tangent" => Ok(Method::Tanh),
            other => Err(GamutError::InvalidParameter(format!(
                "unknown method '{}' (expected log, reinhard, exp, atan, tanh)",
                other
            ))),
        }
    }
}

/// Transform application direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    /// Compress out-of-gamut distances toward the boundary.
    #[default]
    Forward,
    /// Expand previously compressed distances back out.
    Inverse,
}

impl Direction {
    /// Map the host's `invert` flag to a direction.
    #[inline]
    pub fn from_invert(invert: bool) -> Self {
        if invert { Self::Inverse } else { Self::Forward }
    }

    /// Returns the opposite direction.
    #[inline]
    pub fn inverse(self) -> Self {
        match self {
            Self::Forward => Self::Inverse,
            Self::Inverse => Self::Forward,
        }
    }

    /// True for [`Direction::Inverse`].
    #[inline]
    pub fn is_inverse(self) -> bool {
        self == Self::Inverse
    }
}
