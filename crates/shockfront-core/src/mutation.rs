//! Pipeline records: ring jobs, per-voxel mutation decisions, and the
//! batches that carry them to the applier.

use crate::material::Material;
use crate::pos::BlockPos;

/// The destruction decision for a single voxel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The voxel is removed (set to air).
    Remove,
    /// The voxel is replaced with the given material.
    Replace(Material),
}

/// One decided voxel mutation.
///
/// Produced by the mutation processor, consumed exactly once by the
/// tick-budgeted applier. A coordinate appears in at most one `Mutation`
/// per explosion instance; the processed-coordinate set enforces this.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Mutation {
    /// The voxel to mutate.
    pub pos: BlockPos,
    /// What happens to it.
    pub outcome: Outcome,
}

/// The terrain-following column set for one radius of the shockwave.
///
/// Immutable after creation and safe to hand across threads. Columns are
/// ordered along the ring; consecutive columns never differ in surface
/// height by more than one voxel (the generator interpolates bridge
/// samples across larger cliffs).
#[derive(Clone, Debug)]
pub struct RingJob {
    /// Ring radius in voxels. Radius 0 is the single center column.
    pub radius: u32,
    /// Blast power at this radius, sampled from the falloff curve.
    pub power: f64,
    /// Ordered terrain-following sample positions.
    pub columns: Vec<BlockPos>,
}

/// An ordered batch of mutations for one radius.
///
/// Owned by the batch channel until the applier drains it. Batches are
/// applied whole: the applier never splits one across ticks.
#[derive(Clone, Debug)]
pub struct MutationBatch {
    /// The originating ring radius, for ordering and impact scheduling.
    pub radius: u32,
    /// Blast power at this radius.
    pub power: f64,
    /// The columns that produced this batch; the entity impact pass
    /// queries around these.
    pub columns: Vec<BlockPos>,
    /// Decided mutations, in processing order.
    pub mutations: Vec<Mutation>,
}

impl MutationBatch {
    /// An empty batch for a radius whose neighborhood was entirely
    /// excluded. Still enqueued so downstream ordering holds.
    pub fn empty(radius: u32, power: f64) -> Self {
        Self {
            radius,
            power,
            columns: Vec::new(),
            mutations: Vec::new(),
        }
    }

    /// Whether this batch carries no mutations.
    pub fn is_empty(&self) -> bool {
        self.mutations.is_empty()
    }
}
