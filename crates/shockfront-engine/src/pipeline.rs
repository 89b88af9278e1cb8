//! Worker thread bodies for the generation → processing pipeline.
//!
//! Both workers suspend on their bounded channels rather than polling:
//! the generator blocks when the job channel is full, processors block
//! when it is empty. Cancellation is checked at radius boundaries
//! (generation) and job boundaries (processing); a send that outlives
//! the backpressure timeout escalates to cancellation so the pipeline
//! can never deadlock against a stalled consumer.

use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{Receiver, SendTimeoutError, Sender};

use shockfront_core::RingJob;
use shockfront_rules::TransformationRules;
use shockfront_world::WorldReader;

use crate::column;
use crate::metrics::ShockwaveMetrics;
use crate::orchestrator::{ExplosionShared, Phase};
use crate::processed::ProcessedSet;
use crate::processor;
use crate::reorder::{ReleaseError, ReorderBuffer};

/// Body of the single generation worker.
///
/// Produces one ring job per radius, in ascending order, then closes
/// the job channel by dropping its sender and moves the phase machine
/// to `Draining`.
pub(crate) fn generation_main(
    world: Arc<dyn WorldReader>,
    shared: Arc<ExplosionShared>,
    job_tx: Sender<RingJob>,
    timeout: Duration,
) -> impl FnOnce() + Send + 'static {
    move || {
        let params = shared.params;
        for radius in params.start_radius..=params.end_radius {
            if shared.is_cancelled() {
                break;
            }
            let power = params.power_at(radius);
            let job = column::generate(
                world.as_ref(),
                params.center,
                radius,
                params.max_height,
                power,
            );
            ShockwaveMetrics::add(&shared.metrics.rings_generated, 1);
            ShockwaveMetrics::add(&shared.metrics.columns_generated, job.columns.len() as u64);

            match job_tx.send_timeout(job, timeout) {
                Ok(()) => {}
                Err(SendTimeoutError::Timeout(_)) => {
                    log::warn!(
                        "job channel full for {timeout:?} at radius {radius}; \
                         cancelling shockwave at {}",
                        params.center
                    );
                    ShockwaveMetrics::add(&shared.metrics.backpressure_cancellations, 1);
                    shared.request_cancel();
                    break;
                }
                // Processors are gone; the explosion is being torn down.
                Err(SendTimeoutError::Disconnected(_)) => break,
            }
        }
        // Close the job channel; processors drain in-flight jobs and
        // exit. The phase advance is a no-op when the run was cancelled
        // (terminal phase).
        drop(job_tx);
        shared.phase.advance(Phase::Draining);
    }
}

/// Body of one processor pool worker.
///
/// Competes with its siblings for ring jobs; ascending-radius order of
/// the output is restored by the shared [`ReorderBuffer`].
pub(crate) fn processor_main(
    world: Arc<dyn WorldReader>,
    shared: Arc<ExplosionShared>,
    job_rx: Receiver<RingJob>,
    reorder: Arc<ReorderBuffer>,
    processed: Arc<ProcessedSet>,
    rules: TransformationRules,
) -> impl FnOnce() + Send + 'static {
    move || {
        while let Ok(job) = job_rx.recv() {
            if shared.is_cancelled() {
                break;
            }
            let mut classifier = rules.classifier_for(job.radius);
            let batch = processor::process(
                &job,
                &processed,
                world.as_ref(),
                &mut classifier,
                &shared.metrics,
            );
            match reorder.release(batch) {
                Ok(()) => {}
                Err(ReleaseError::Stalled { radius }) => {
                    log::warn!(
                        "batch channel stalled at radius {radius}; \
                         cancelling shockwave at {}",
                        shared.params.center
                    );
                    ShockwaveMetrics::add(&shared.metrics.backpressure_cancellations, 1);
                    shared.request_cancel();
                    break;
                }
                Err(ReleaseError::Closed) => break,
            }
        }
    }
}
