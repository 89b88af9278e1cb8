//! Error types for explosion parameter validation.

use std::error::Error;
use std::fmt;

/// Precondition violations rejected synchronously at ignition, before
/// any work is scheduled.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ParameterError {
    /// `end_radius` is smaller than `start_radius`.
    EmptyRadiusRange {
        /// The configured start radius.
        start: u32,
        /// The configured end radius.
        end: u32,
    },
    /// `max_height` is zero; the shockwave would have no vertical reach.
    ZeroMaxHeight,
    /// The power curve produced a non-finite or non-positive power.
    InvalidPower {
        /// The radius at which the curve was sampled.
        radius: u32,
        /// The offending power value.
        power: f64,
    },
}

impl fmt::Display for ParameterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyRadiusRange { start, end } => {
                write!(f, "end radius {end} is smaller than start radius {start}")
            }
            Self::ZeroMaxHeight => write!(f, "max_height must be at least 1"),
            Self::InvalidPower { radius, power } => {
                write!(
                    f,
                    "power curve yields {power} at radius {radius}; must be finite and positive"
                )
            }
        }
    }
}

impl Error for ParameterError {}
