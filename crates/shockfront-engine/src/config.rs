//! Engine configuration and validation.
//!
//! Every product-tuning constant of the pipeline lives here: channel
//! capacities, worker counts, the tick budget, backpressure limits, and
//! the entity-impact scales. Nothing in the engine hardcodes them.

use shockfront_core::TickBudget;

use crate::error::ConfigError;

/// Entity-impact tuning.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImpactConfig {
    /// Ticks between a batch being committed and its entity impact
    /// running, to stay in sync with host-side visual effects.
    pub delay_ticks: u64,
    /// Per-axis half extents of the entity query box around each
    /// mutated column.
    pub half_extent: (i32, i32, i32),
    /// Damage dealt per unit of blast power.
    pub damage_per_power: f64,
    /// Knockback speed per unit of blast power.
    pub knockback_per_power: f64,
}

impl Default for ImpactConfig {
    fn default() -> Self {
        Self {
            delay_ticks: 4,
            half_extent: (3, 2, 3),
            damage_per_power: 4.0,
            knockback_per_power: 2.0,
        }
    }
}

/// Complete configuration for one shockwave pipeline.
#[derive(Clone, Debug, PartialEq)]
pub struct ShockwaveConfig {
    /// Processor pool size. `None` = auto-detect
    /// (`available_parallelism`, clamped to `[1, 16]`).
    pub processor_count: Option<usize>,
    /// Bounded capacity of the ring-job channel
    /// (generation → processing). Fullness blocks the generator.
    pub job_channel_capacity: usize,
    /// Bounded capacity of the mutation-batch channel
    /// (processing → application). Fullness blocks the processors.
    pub batch_channel_capacity: usize,
    /// Maximum milliseconds a producer may block on a full channel
    /// before the explosion escalates to cancellation.
    pub send_timeout_ms: u64,
    /// Wall-clock budget for the applier per host tick.
    pub tick_budget: TickBudget,
    /// Entity-impact tuning.
    pub impact: ImpactConfig,
    /// Base seed for the material classifier's RNG streams.
    pub classifier_seed: u64,
}

impl Default for ShockwaveConfig {
    fn default() -> Self {
        Self {
            processor_count: None,
            job_channel_capacity: 16,
            batch_channel_capacity: 32,
            send_timeout_ms: 2_000,
            tick_budget: TickBudget::default(),
            impact: ImpactConfig::default(),
            classifier_seed: 0x5F0C_7F2A,
        }
    }
}

impl ShockwaveConfig {
    /// Check all structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.job_channel_capacity == 0 {
            return Err(ConfigError::ZeroJobCapacity);
        }
        if self.batch_channel_capacity == 0 {
            return Err(ConfigError::ZeroBatchCapacity);
        }
        let budget = self.tick_budget.max_millis_per_tick;
        if !budget.is_finite() || budget <= 0.0 {
            return Err(ConfigError::InvalidTickBudget { value: budget });
        }
        if self.send_timeout_ms == 0 {
            return Err(ConfigError::ZeroSendTimeout);
        }
        for (field, value) in [
            ("damage_per_power", self.impact.damage_per_power),
            ("knockback_per_power", self.impact.knockback_per_power),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidImpactScale { field, value });
            }
        }
        Ok(())
    }

    /// Resolve the processor pool size, applying auto-detection if
    /// `processor_count` is `None`.
    ///
    /// Explicit values are clamped to `[1, 64]`; a zero-worker pool
    /// would strand every ring job.
    pub fn resolved_processor_count(&self) -> usize {
        match self.processor_count {
            Some(n) => n.clamp(1, 64),
            None => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4)
                .clamp(1, 16),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(ShockwaveConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_capacities_are_rejected() {
        let mut cfg = ShockwaveConfig::default();
        cfg.job_channel_capacity = 0;
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroJobCapacity));

        let mut cfg = ShockwaveConfig::default();
        cfg.batch_channel_capacity = 0;
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroBatchCapacity));
    }

    #[test]
    fn non_positive_budget_is_rejected() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let mut cfg = ShockwaveConfig::default();
            cfg.tick_budget = TickBudget {
                max_millis_per_tick: bad,
            };
            match cfg.validate() {
                Err(ConfigError::InvalidTickBudget { .. }) => {}
                other => panic!("expected InvalidTickBudget for {bad}, got {other:?}"),
            }
        }
    }

    #[test]
    fn zero_send_timeout_is_rejected() {
        let mut cfg = ShockwaveConfig::default();
        cfg.send_timeout_ms = 0;
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroSendTimeout));
    }

    #[test]
    fn negative_impact_scale_is_rejected() {
        let mut cfg = ShockwaveConfig::default();
        cfg.impact.damage_per_power = -1.0;
        match cfg.validate() {
            Err(ConfigError::InvalidImpactScale {
                field: "damage_per_power",
                ..
            }) => {}
            other => panic!("expected InvalidImpactScale, got {other:?}"),
        }
    }

    #[test]
    fn processor_count_clamps() {
        let mut cfg = ShockwaveConfig::default();
        cfg.processor_count = Some(0);
        assert_eq!(cfg.resolved_processor_count(), 1);
        cfg.processor_count = Some(1_000);
        assert_eq!(cfg.resolved_processor_count(), 64);
        cfg.processor_count = None;
        let auto = cfg.resolved_processor_count();
        assert!((1..=16).contains(&auto), "auto count {auto} out of [1,16]");
    }
}
