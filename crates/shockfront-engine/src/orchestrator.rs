//! Per-explosion orchestration: worker spawning, the phase machine,
//! and the handle the host drives.
//!
//! One [`Shockwave`] is created per explosion event, drives its
//! pipeline to completion or cancellation, and is then discarded.
//! Nothing outlives it except its metrics snapshot.
//!
//! # Architecture
//!
//! ```text
//! Host thread                Generation thread        Processor pool (N)
//!     |                            |                        |
//!     | Shockwave::ignite() -----> | per radius:            |
//!     |                            |   sample ring columns  |
//!     |                            |   job_tx.send_timeout  |
//!     |                            |        [bounded] ----> | job_rx.recv()
//!     |                            |                        | expand neighborhood
//!     |                            |                        | dedup via ProcessedSet
//!     |                            |                        | reorder.release()
//!     | poll_batch() <------------------------------------- |   [bounded, radius-ordered]
//!     |   (applier drains under the tick budget)            |
//! ```

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::{Receiver, TryRecvError};

use shockfront_core::{ExplosionParameters, MutationBatch};
use shockfront_rules::TransformationRules;
use shockfront_world::{EntityId, WorldReader};

use crate::config::ShockwaveConfig;
use crate::error::IgniteError;
use crate::metrics::{MetricsSnapshot, ShockwaveMetrics};
use crate::pipeline;
use crate::processed::ProcessedSet;
use crate::reorder::ReorderBuffer;

// ── Phase machine ────────────────────────────────────────────────

/// Lifecycle phase of one explosion instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Phase {
    /// Created, workers not yet running.
    Idle = 0,
    /// The generation worker is producing ring jobs.
    Generating = 1,
    /// All ring jobs are enqueued; processors and the applier are
    /// draining in-flight work.
    Draining = 2,
    /// Every batch has been handed to the applier. Terminal.
    Completed = 3,
    /// Cooperatively cancelled. In-flight work finished, nothing new
    /// was scheduled. Terminal.
    Cancelled = 4,
}

impl Phase {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => Self::Idle,
            1 => Self::Generating,
            2 => Self::Draining,
            3 => Self::Completed,
            _ => Self::Cancelled,
        }
    }

    /// Whether this phase can never transition again.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

/// Atomic phase cell enforcing the transition rules: phases only move
/// forward, terminal phases never move, and `Cancelled` is reachable
/// from any non-terminal phase.
#[derive(Debug)]
pub(crate) struct PhaseCell(AtomicU8);

impl PhaseCell {
    pub fn new() -> Self {
        Self(AtomicU8::new(Phase::Idle as u8))
    }

    pub fn load(&self) -> Phase {
        Phase::from_u8(self.0.load(Ordering::Acquire))
    }

    /// Attempt the transition; returns whether it took effect.
    pub fn advance(&self, to: Phase) -> bool {
        let mut cur = self.0.load(Ordering::Acquire);
        loop {
            let phase = Phase::from_u8(cur);
            let allowed = !phase.is_terminal()
                && (to == Phase::Cancelled || (to as u8) > cur);
            if !allowed {
                return false;
            }
            match self.0.compare_exchange_weak(
                cur,
                to as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return true,
                Err(actual) => cur = actual,
            }
        }
    }
}

// ── Shared per-explosion state ───────────────────────────────────

/// State shared between the handle, the workers, and the applier.
#[derive(Debug)]
pub(crate) struct ExplosionShared {
    pub params: ExplosionParameters,
    pub cancel: AtomicBool,
    pub phase: PhaseCell,
    pub metrics: ShockwaveMetrics,
    /// Entities already affected by this explosion's wavefront.
    /// Wrapped in a Mutex so `ExplosionShared` stays `Sync`; only the
    /// applier's single-threaded context ever locks it, so it is never
    /// contended.
    pub impact_visited: Mutex<HashSet<EntityId>>,
}

impl ExplosionShared {
    fn new(params: ExplosionParameters) -> Self {
        Self {
            params,
            cancel: AtomicBool::new(false),
            phase: PhaseCell::new(),
            metrics: ShockwaveMetrics::default(),
            impact_visited: Mutex::new(HashSet::new()),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Acquire)
    }

    /// Set the cancellation flag and move the phase machine to
    /// `Cancelled` (if not already terminal).
    pub fn request_cancel(&self) {
        self.cancel.store(true, Ordering::Release);
        if self.phase.advance(Phase::Cancelled) {
            log::debug!("shockwave at {} cancelled", self.params.center);
        }
    }
}

// ── Handle ───────────────────────────────────────────────────────

/// Result of polling a shockwave for its next mutation batch.
#[derive(Debug)]
pub enum BatchPoll {
    /// The next batch, in ascending radius order.
    Batch(MutationBatch),
    /// Workers are still running; nothing ready right now.
    Pending,
    /// Every batch has been delivered and all workers have exited.
    Finished,
}

/// A live explosion instance.
///
/// Owns the background workers and the receiving end of the batch
/// channel. Registered with a
/// [`TickBudgetedApplier`](crate::applier::TickBudgetedApplier), which
/// polls it each tick; hosts with their own scheduling can call
/// [`poll_batch`](Self::poll_batch) directly instead.
///
/// Dropping a `Shockwave` cancels it cooperatively and joins its
/// workers; already-applied mutations remain (explosions are not
/// transactional).
pub struct Shockwave {
    shared: Arc<ExplosionShared>,
    batch_rx: Option<Receiver<MutationBatch>>,
    workers: Vec<JoinHandle<()>>,
}

impl std::fmt::Debug for Shockwave {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shockwave")
            .field("workers", &self.workers.len())
            .finish()
    }
}

impl Shockwave {
    /// Validate preconditions and start the pipeline.
    ///
    /// Spawns one generation thread and a processor pool; on any
    /// failure nothing is left running and no world access happens.
    ///
    /// `world` must see a consistent, immutable view for the lifetime
    /// of the explosion; pass a
    /// [`WorldSnapshot`](shockfront_world::WorldSnapshot) when the host
    /// world is not inherently safe for concurrent reads.
    pub fn ignite(
        params: ExplosionParameters,
        world: Arc<dyn WorldReader>,
        config: &ShockwaveConfig,
    ) -> Result<Self, IgniteError> {
        config.validate()?;
        params.validate()?;

        let shared = Arc::new(ExplosionShared::new(params));
        let rules = TransformationRules::new(config.classifier_seed);
        let timeout = Duration::from_millis(config.send_timeout_ms);

        let (job_tx, job_rx) = crossbeam_channel::bounded(config.job_channel_capacity);
        let (batch_tx, batch_rx) = crossbeam_channel::bounded(config.batch_channel_capacity);

        let reorder = Arc::new(ReorderBuffer::new(batch_tx, params.start_radius, timeout));
        let processed = Arc::new(ProcessedSet::new());

        let mut workers = Vec::new();
        let spawn_result = (|| -> Result<(), IgniteError> {
            for i in 0..config.resolved_processor_count() {
                let handle = std::thread::Builder::new()
                    .name(format!("shockfront-proc-{i}"))
                    .spawn(pipeline::processor_main(
                        Arc::clone(&world),
                        Arc::clone(&shared),
                        job_rx.clone(),
                        Arc::clone(&reorder),
                        Arc::clone(&processed),
                        rules,
                    ))
                    .map_err(|e| IgniteError::ThreadSpawnFailed {
                        reason: format!("processor {i}: {e}"),
                    })?;
                workers.push(handle);
            }
            let handle = std::thread::Builder::new()
                .name("shockfront-gen".into())
                .spawn(pipeline::generation_main(
                    Arc::clone(&world),
                    Arc::clone(&shared),
                    job_tx.clone(),
                    timeout,
                ))
                .map_err(|e| IgniteError::ThreadSpawnFailed {
                    reason: format!("generation: {e}"),
                })?;
            workers.push(handle);
            Ok(())
        })();

        // The local job_tx/job_rx clones drop here. On spawn failure
        // that disconnects the job channel, so any processors that did
        // start exit on their next recv; join them before reporting.
        drop(job_tx);
        drop(job_rx);
        if let Err(e) = spawn_result {
            shared.request_cancel();
            for handle in workers {
                let _ = handle.join();
            }
            return Err(e);
        }

        shared.phase.advance(Phase::Generating);
        log::debug!(
            "shockwave ignited at {}: radii {}..={}",
            params.center,
            params.start_radius,
            params.end_radius
        );

        Ok(Self {
            shared,
            batch_rx: Some(batch_rx),
            workers,
        })
    }

    /// Non-blocking poll for the next mutation batch.
    ///
    /// Batches arrive in ascending radius order. The first
    /// [`BatchPoll::Finished`] joins the workers and settles the phase
    /// machine (`Completed`, unless the run was cancelled).
    pub fn poll_batch(&mut self) -> BatchPoll {
        let Some(rx) = self.batch_rx.as_ref() else {
            return BatchPoll::Finished;
        };
        match rx.try_recv() {
            Ok(batch) => BatchPoll::Batch(batch),
            Err(TryRecvError::Empty) => BatchPoll::Pending,
            Err(TryRecvError::Disconnected) => {
                self.finish();
                BatchPoll::Finished
            }
        }
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.shared.phase.load()
    }

    /// Request cooperative cancellation. In-flight work finishes; no
    /// new rings are generated and nothing is rolled back.
    pub fn cancel(&self) {
        self.shared.request_cancel();
    }

    /// The parameters this explosion was ignited with.
    pub fn params(&self) -> &ExplosionParameters {
        &self.shared.params
    }

    /// Snapshot of the pipeline counters.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.shared.metrics.snapshot()
    }

    /// A detached control for cancelling and observing this explosion
    /// after the handle moves into the applier.
    pub fn control(&self) -> ShockwaveControl {
        ShockwaveControl {
            shared: Arc::clone(&self.shared),
        }
    }

    pub(crate) fn shared_arc(&self) -> Arc<ExplosionShared> {
        Arc::clone(&self.shared)
    }

    fn finish(&mut self) {
        self.batch_rx = None;
        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
        if self.shared.phase.advance(Phase::Completed) {
            log::debug!(
                "shockwave at {} completed: {:?}",
                self.shared.params.center,
                self.shared.metrics.snapshot()
            );
        }
    }
}

impl Drop for Shockwave {
    fn drop(&mut self) {
        if !self.phase().is_terminal() {
            self.shared.request_cancel();
        }
        // Disconnect the batch channel first so a processor blocked on
        // a full channel exits immediately instead of waiting out its
        // send timeout.
        self.batch_rx = None;
        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
    }
}

/// Cancellation and observation handle detached from the [`Shockwave`].
#[derive(Clone)]
pub struct ShockwaveControl {
    shared: Arc<ExplosionShared>,
}

impl ShockwaveControl {
    /// Request cooperative cancellation.
    pub fn cancel(&self) {
        self.shared.request_cancel();
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.shared.phase.load()
    }

    /// Snapshot of the pipeline counters.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.shared.metrics.snapshot()
    }

    /// The parameters of the underlying explosion.
    pub fn params(&self) -> ExplosionParameters {
        self.shared.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── PhaseCell transition rules ───────────────────────────────

    #[test]
    fn phases_only_move_forward() {
        let cell = PhaseCell::new();
        assert_eq!(cell.load(), Phase::Idle);
        assert!(cell.advance(Phase::Generating));
        assert!(!cell.advance(Phase::Idle), "no going back");
        assert!(cell.advance(Phase::Draining));
        assert!(cell.advance(Phase::Completed));
        assert_eq!(cell.load(), Phase::Completed);
    }

    #[test]
    fn terminal_phases_are_sticky() {
        let cell = PhaseCell::new();
        assert!(cell.advance(Phase::Completed));
        assert!(!cell.advance(Phase::Cancelled));
        assert_eq!(cell.load(), Phase::Completed);

        let cell = PhaseCell::new();
        assert!(cell.advance(Phase::Cancelled));
        assert!(!cell.advance(Phase::Completed));
        assert!(!cell.advance(Phase::Generating));
        assert_eq!(cell.load(), Phase::Cancelled);
    }

    #[test]
    fn cancelled_is_reachable_from_every_non_terminal_phase() {
        for intermediate in [Phase::Idle, Phase::Generating, Phase::Draining] {
            let cell = PhaseCell::new();
            if intermediate != Phase::Idle {
                assert!(cell.advance(intermediate));
            }
            assert!(cell.advance(Phase::Cancelled), "from {intermediate:?}");
            assert_eq!(cell.load(), Phase::Cancelled);
        }
    }

    #[test]
    fn phase_jump_over_draining_is_allowed() {
        // A degenerate explosion can complete while the phase machine
        // still says Generating.
        let cell = PhaseCell::new();
        assert!(cell.advance(Phase::Generating));
        assert!(cell.advance(Phase::Completed));
    }
}
