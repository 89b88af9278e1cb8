//! Error types for engine configuration and ignition.

use std::error::Error;
use std::fmt;

use shockfront_core::ParameterError;

/// Errors detected during [`ShockwaveConfig::validate()`](crate::config::ShockwaveConfig::validate).
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// The ring-job channel capacity is zero.
    ZeroJobCapacity,
    /// The mutation-batch channel capacity is zero.
    ZeroBatchCapacity,
    /// The per-tick budget is NaN, infinite, zero, or negative.
    InvalidTickBudget {
        /// The invalid value, in milliseconds.
        value: f64,
    },
    /// The backpressure send timeout is zero; producers could deadlock.
    ZeroSendTimeout,
    /// An impact scale is NaN or negative.
    InvalidImpactScale {
        /// Which scale was invalid.
        field: &'static str,
        /// The invalid value.
        value: f64,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroJobCapacity => write!(f, "job_channel_capacity must be at least 1"),
            Self::ZeroBatchCapacity => write!(f, "batch_channel_capacity must be at least 1"),
            Self::InvalidTickBudget { value } => {
                write!(f, "tick budget must be finite and positive, got {value} ms")
            }
            Self::ZeroSendTimeout => write!(f, "send_timeout_ms must be at least 1"),
            Self::InvalidImpactScale { field, value } => {
                write!(f, "impact scale {field} must be finite and >= 0, got {value}")
            }
        }
    }
}

impl Error for ConfigError {}

/// Errors rejected synchronously by [`Shockwave::ignite`](crate::Shockwave::ignite).
///
/// Nothing is scheduled when ignition fails: no threads, no channels,
/// no world access.
#[derive(Debug)]
pub enum IgniteError {
    /// The explosion parameters violate a precondition.
    Parameter(ParameterError),
    /// The engine configuration is invalid.
    Config(ConfigError),
    /// A background worker thread could not be spawned.
    ThreadSpawnFailed {
        /// Which thread failed, and the OS reason.
        reason: String,
    },
}

impl fmt::Display for IgniteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parameter(e) => write!(f, "invalid explosion parameters: {e}"),
            Self::Config(e) => write!(f, "invalid engine configuration: {e}"),
            Self::ThreadSpawnFailed { reason } => write!(f, "thread spawn failed: {reason}"),
        }
    }
}

impl Error for IgniteError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parameter(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::ThreadSpawnFailed { .. } => None,
        }
    }
}

impl From<ParameterError> for IgniteError {
    fn from(e: ParameterError) -> Self {
        Self::Parameter(e)
    }
}

impl From<ConfigError> for IgniteError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_offending_field() {
        let e = ConfigError::InvalidTickBudget { value: f64::NAN };
        assert!(format!("{e}").contains("tick budget"));

        let e = IgniteError::from(ParameterError::ZeroMaxHeight);
        assert!(format!("{e}").contains("max_height"));
    }

    #[test]
    fn ignite_error_exposes_source() {
        let e = IgniteError::from(ParameterError::ZeroMaxHeight);
        assert!(e.source().is_some());
        let e = IgniteError::ThreadSpawnFailed {
            reason: "resource limit".into(),
        };
        assert!(e.source().is_none());
    }
}
