//! Radius-ordered release of pooled processing results.
//!
//! The processor pool completes ring jobs in whatever order its threads
//! finish, but the batch channel must carry batches in ascending radius
//! order, which the applier relies on for the near-to-far wavefront. The
//! buffer holds early arrivals in a `BTreeMap` keyed by radius and only
//! forwards the contiguous run starting at the next expected radius.
//!
//! Forwarding happens under the buffer lock. That serializes sends from
//! concurrent workers, which is exactly the point: two workers must not
//! race their in-order runs onto the channel.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::Duration;

use crossbeam_channel::{SendTimeoutError, Sender};

use shockfront_core::MutationBatch;

/// Why a release failed.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum ReleaseError {
    /// The batch channel stayed full past the backpressure timeout.
    /// The caller escalates to cancellation.
    Stalled {
        /// Radius of the batch that could not be forwarded.
        radius: u32,
    },
    /// The consumer side is gone; the explosion is being torn down.
    Closed,
}

pub(crate) struct ReorderBuffer {
    out: Sender<MutationBatch>,
    timeout: Duration,
    inner: Mutex<Pending>,
}

struct Pending {
    next_radius: u32,
    held: BTreeMap<u32, MutationBatch>,
}

impl ReorderBuffer {
    /// `first_radius` is the radius the downstream expects first.
    pub fn new(out: Sender<MutationBatch>, first_radius: u32, timeout: Duration) -> Self {
        Self {
            out,
            timeout,
            inner: Mutex::new(Pending {
                next_radius: first_radius,
                held: BTreeMap::new(),
            }),
        }
    }

    /// Hand over a completed batch; forwards every batch that is now
    /// in order.
    pub fn release(&self, batch: MutationBatch) -> Result<(), ReleaseError> {
        let mut inner = self.inner.lock().expect("reorder buffer poisoned");
        inner.held.insert(batch.radius, batch);

        loop {
            let next = inner.next_radius;
            let Some(batch) = inner.held.remove(&next) else {
                break;
            };
            match self.out.send_timeout(batch, self.timeout) {
                Ok(()) => inner.next_radius += 1,
                Err(SendTimeoutError::Timeout(batch)) => {
                    let radius = batch.radius;
                    inner.held.insert(radius, batch);
                    return Err(ReleaseError::Stalled { radius });
                }
                Err(SendTimeoutError::Disconnected(_)) => return Err(ReleaseError::Closed),
            }
        }
        Ok(())
    }

    /// Number of batches waiting for an earlier radius.
    #[cfg(test)]
    pub fn held_len(&self) -> usize {
        self.inner.lock().expect("reorder buffer poisoned").held.len()
    }
}
