//! Explosion parameters, power falloff curves, and the tick budget.

use crate::error::ParameterError;
use crate::pos::BlockPos;

/// Blast-power falloff over the radius range of one explosion.
///
/// The curve shape and its constants are product tuning, not engine
/// contract, so they live in parameters rather than code.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PowerCurve {
    /// The same power at every radius.
    Constant(f64),
    /// Linear interpolation from `start` (at the start radius) down to
    /// `end` (at the end radius).
    Linear {
        /// Power at the start radius.
        start: f64,
        /// Power at the end radius.
        end: f64,
    },
    /// `peak / (1 + r)^2`, clamped below by `floor`.
    InverseSquare {
        /// Power at radius 0.
        peak: f64,
        /// Minimum power at any radius.
        floor: f64,
    },
}

impl PowerCurve {
    /// Sample the curve at `radius` within `[start_radius, end_radius]`.
    pub fn sample(&self, radius: u32, start_radius: u32, end_radius: u32) -> f64 {
        match *self {
            Self::Constant(p) => p,
            Self::Linear { start, end } => {
                let span = end_radius.saturating_sub(start_radius);
                if span == 0 {
                    return start;
                }
                let t = f64::from(radius.saturating_sub(start_radius)) / f64::from(span);
                start + (end - start) * t
            }
            Self::InverseSquare { peak, floor } => {
                let r = f64::from(radius);
                (peak / ((1.0 + r) * (1.0 + r))).max(floor)
            }
        }
    }
}

/// Everything that defines one explosion instance.
///
/// Immutable and freely copyable; owns nothing external. Validated
/// synchronously before any work is scheduled.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExplosionParameters {
    /// Center of the shockwave.
    pub center: BlockPos,
    /// First ring radius (inclusive). Radius 0 destroys the center.
    pub start_radius: u32,
    /// Last ring radius (inclusive).
    pub end_radius: u32,
    /// Vertical reach above the center; columns are clamped to
    /// `center.y + max_height`.
    pub max_height: u32,
    /// Blast-power falloff over the radius range.
    pub power_curve: PowerCurve,
}

impl ExplosionParameters {
    /// Check all preconditions.
    ///
    /// # Errors
    ///
    /// Rejects an empty radius range, a zero height, and any curve that
    /// produces a non-finite or non-positive power at either end of the
    /// range.
    pub fn validate(&self) -> Result<(), ParameterError> {
        if self.end_radius < self.start_radius {
            return Err(ParameterError::EmptyRadiusRange {
                start: self.start_radius,
                end: self.end_radius,
            });
        }
        if self.max_height == 0 {
            return Err(ParameterError::ZeroMaxHeight);
        }
        for radius in [self.start_radius, self.end_radius] {
            let power = self
                .power_curve
                .sample(radius, self.start_radius, self.end_radius);
            if !power.is_finite() || power <= 0.0 {
                return Err(ParameterError::InvalidPower { radius, power });
            }
        }
        Ok(())
    }

    /// Power at the given radius.
    pub fn power_at(&self, radius: u32) -> f64 {
        self.power_curve
            .sample(radius, self.start_radius, self.end_radius)
    }
}

/// The wall-clock budget for the mutation-application step of one host
/// tick.
///
/// Read each tick; mutable only through configuration. Budget is
/// enforced at batch granularity: the batch in progress always
/// completes, even when that overruns the budget.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickBudget {
    /// Maximum milliseconds the applier may spend per tick.
    pub max_millis_per_tick: f64,
}

impl Default for TickBudget {
    fn default() -> Self {
        // At 20 Hz host ticks a 5 ms slice leaves the bulk of the tick
        // to the rest of the simulation.
        Self {
            max_millis_per_tick: 5.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(curve: PowerCurve) -> ExplosionParameters {
        ExplosionParameters {
            center: BlockPos::new(0, 64, 0),
            start_radius: 0,
            end_radius: 10,
            max_height: 100,
            power_curve: curve,
        }
    }

    #[test]
    fn linear_curve_hits_both_endpoints() {
        let curve = PowerCurve::Linear {
            start: 5.0,
            end: 2.0,
        };
        assert_eq!(curve.sample(0, 0, 10), 5.0);
        assert_eq!(curve.sample(10, 0, 10), 2.0);
        let mid = curve.sample(5, 0, 10);
        assert!((mid - 3.5).abs() < 1e-12, "midpoint lerp, got {mid}");
    }

    #[test]
    fn linear_curve_degenerate_span_returns_start() {
        let curve = PowerCurve::Linear {
            start: 4.0,
            end: 1.0,
        };
        assert_eq!(curve.sample(3, 3, 3), 4.0);
    }

    #[test]
    fn inverse_square_clamps_to_floor() {
        let curve = PowerCurve::InverseSquare {
            peak: 8.0,
            floor: 1.5,
        };
        assert_eq!(curve.sample(0, 0, 100), 8.0);
        assert_eq!(curve.sample(100, 0, 100), 1.5);
    }

    #[test]
    fn validate_accepts_canonical_parameters() {
        assert!(params(PowerCurve::Linear {
            start: 5.0,
            end: 2.0
        })
        .validate()
        .is_ok());
    }

    #[test]
    fn validate_rejects_inverted_radius_range() {
        let mut p = params(PowerCurve::Constant(8.0));
        p.start_radius = 5;
        p.end_radius = 2;
        match p.validate() {
            Err(ParameterError::EmptyRadiusRange { start: 5, end: 2 }) => {}
            other => panic!("expected EmptyRadiusRange, got {other:?}"),
        }
    }

    #[test]
    fn validate_rejects_zero_height() {
        let mut p = params(PowerCurve::Constant(8.0));
        p.max_height = 0;
        match p.validate() {
            Err(ParameterError::ZeroMaxHeight) => {}
            other => panic!("expected ZeroMaxHeight, got {other:?}"),
        }
    }

    #[test]
    fn validate_rejects_non_positive_power() {
        let p = params(PowerCurve::Linear {
            start: 5.0,
            end: -1.0,
        });
        match p.validate() {
            Err(ParameterError::InvalidPower { radius: 10, .. }) => {}
            other => panic!("expected InvalidPower at end radius, got {other:?}"),
        }
    }

    #[test]
    fn validate_rejects_nan_power() {
        let p = params(PowerCurve::Constant(f64::NAN));
        assert!(matches!(
            p.validate(),
            Err(ParameterError::InvalidPower { .. })
        ));
    }
}
