//! Shockwave propagation and tick-budgeted mutation engine.
//!
//! The pipeline for one explosion: a generation worker samples
//! terrain-following destruction rings at growing radii, a processor
//! pool expands them into deduplicated per-voxel mutation batches, and
//! the host-driven [`TickBudgetedApplier`] commits those batches to the
//! world under a hard per-tick time budget, deferring the remainder to
//! the next tick.
//!
//! Entry point: [`Shockwave::ignite`]. Hand the returned handle to a
//! [`TickBudgetedApplier`] and call
//! [`run_one_tick`](TickBudgetedApplier::run_one_tick) from the host's
//! fixed-rate loop.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod applier;
pub mod column;
pub mod config;
pub mod error;
pub mod impact;
pub mod metrics;
mod pipeline;
pub mod processed;
pub mod processor;
mod reorder;

mod orchestrator;

pub use applier::TickBudgetedApplier;
pub use config::{ImpactConfig, ShockwaveConfig};
pub use error::{ConfigError, IgniteError};
pub use impact::EntityImpactApplier;
pub use metrics::{MetricsSnapshot, ShockwaveMetrics};
pub use orchestrator::{BatchPoll, Phase, Shockwave, ShockwaveControl};
pub use processed::ProcessedSet;
