//! Per-explosion pipeline counters.
//!
//! One [`ShockwaveMetrics`] is shared by every worker of one explosion
//! instance, so the fields are relaxed atomics. [`MetricsSnapshot`] is
//! the plain read-out for telemetry and tests; it is the only state
//! that survives an explosion.

use std::sync::atomic::{AtomicU64, Ordering};

/// Atomic counters updated concurrently by the pipeline workers and the
/// applier.
#[derive(Debug, Default)]
pub struct ShockwaveMetrics {
    /// Ring jobs produced by the generation worker.
    pub rings_generated: AtomicU64,
    /// Terrain-following columns produced, including interpolated
    /// bridge samples.
    pub columns_generated: AtomicU64,
    /// Voxels tested by the mutation processor.
    pub voxels_considered: AtomicU64,
    /// Voxels skipped because an earlier ring already decided them.
    pub dedup_skips: AtomicU64,
    /// Mutations emitted into batches.
    pub mutations_emitted: AtomicU64,
    /// Batches fully applied to the world.
    pub batches_applied: AtomicU64,
    /// Mutations committed to the world.
    pub mutations_applied: AtomicU64,
    /// Batches that carried no mutations but were applied for ordering.
    pub empty_batches: AtomicU64,
    /// Ticks where a single batch alone exceeded the budget.
    pub tick_overruns: AtomicU64,
    /// Entity impact dispatches that ran.
    pub impacts_dispatched: AtomicU64,
    /// Entities damaged across all impacts.
    pub entities_hit: AtomicU64,
    /// Cancellations escalated from channel backpressure timeouts.
    pub backpressure_cancellations: AtomicU64,
}

impl ShockwaveMetrics {
    /// Relaxed add; counters are monotone and independently read.
    pub fn add(counter: &AtomicU64, n: u64) {
        counter.fetch_add(n, Ordering::Relaxed);
    }

    /// Read all counters into a plain struct.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            rings_generated: self.rings_generated.load(Ordering::Relaxed),
            columns_generated: self.columns_generated.load(Ordering::Relaxed),
            voxels_considered: self.voxels_considered.load(Ordering::Relaxed),
            dedup_skips: self.dedup_skips.load(Ordering::Relaxed),
            mutations_emitted: self.mutations_emitted.load(Ordering::Relaxed),
            batches_applied: self.batches_applied.load(Ordering::Relaxed),
            mutations_applied: self.mutations_applied.load(Ordering::Relaxed),
            empty_batches: self.empty_batches.load(Ordering::Relaxed),
            tick_overruns: self.tick_overruns.load(Ordering::Relaxed),
            impacts_dispatched: self.impacts_dispatched.load(Ordering::Relaxed),
            entities_hit: self.entities_hit.load(Ordering::Relaxed),
            backpressure_cancellations: self.backpressure_cancellations.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`ShockwaveMetrics`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[allow(missing_docs)] // field names mirror ShockwaveMetrics
pub struct MetricsSnapshot {
    pub rings_generated: u64,
    pub columns_generated: u64,
    pub voxels_considered: u64,
    pub dedup_skips: u64,
    pub mutations_emitted: u64,
    pub batches_applied: u64,
    pub mutations_applied: u64,
    pub empty_batches: u64,
    pub tick_overruns: u64,
    pub impacts_dispatched: u64,
    pub entities_hit: u64,
    pub backpressure_cancellations: u64,
}
