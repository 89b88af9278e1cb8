//! Column expansion: ring jobs become deduplicated mutation batches.
//!
//! Each column grows a spherical neighborhood with two nested radii
//! derived from the ring's blast power: an inner destruction core
//! (`power / 2`) where voxels are removed, and a transform shell one
//! voxel wider where voxels are replaced by the material classifier.
//! Near-center decisions win: every coordinate is gated through the
//! shared processed set before anything else looks at it.

use shockfront_core::{BlockPos, Mutation, MutationBatch, Outcome, RingJob};
use shockfront_rules::Classifier;
use shockfront_world::WorldReader;

use crate::metrics::ShockwaveMetrics;
use crate::processed::ProcessedSet;

/// Expand one ring job into its mutation batch.
///
/// Always returns a batch, possibly empty. A silently skipped radius
/// would break the applier's ordering contract.
pub fn process(
    job: &RingJob,
    processed: &ProcessedSet,
    world: &dyn WorldReader,
    classifier: &mut Classifier,
    metrics: &ShockwaveMetrics,
) -> MutationBatch {
    let bounds = world.bounds();

    // Destruction core and transform shell. A power below 2 rounds the
    // core to nothing; the center voxel of each column is still decided.
    let inner = job.power / 2.0;
    let shell = inner + 1.0;
    let inner_sq = inner * inner;
    let shell_sq = shell * shell;
    let reach = shell.ceil() as i32;

    let mut mutations = Vec::new();
    let mut considered = 0u64;
    let mut dedup_skips = 0u64;

    for &column in &job.columns {
        for dy in -reach..=reach {
            let y = column.y + dy;
            if !bounds.contains_y(y) {
                continue;
            }
            for dx in -reach..=reach {
                for dz in -reach..=reach {
                    let dist_sq = f64::from(dx * dx + dy * dy + dz * dz);
                    if dist_sq > shell_sq {
                        continue;
                    }
                    let pos = BlockPos::new(column.x + dx, y, column.z + dz);
                    considered += 1;
                    if !processed.insert(pos) {
                        dedup_skips += 1;
                        continue;
                    }
                    let material = world.material_at(pos);
                    if material.is_air() || material.is_indestructible() || material.is_liquid() {
                        // Decided as a no-op: the coordinate stays in the
                        // processed set so later rings cannot revisit it.
                        continue;
                    }
                    let outcome = if dist_sq <= inner_sq {
                        Outcome::Remove
                    } else {
                        classifier.classify(material)
                    };
                    mutations.push(Mutation { pos, outcome });
                }
            }
        }
    }

    ShockwaveMetrics::add(&metrics.voxels_considered, considered);
    ShockwaveMetrics::add(&metrics.dedup_skips, dedup_skips);
    ShockwaveMetrics::add(&metrics.mutations_emitted, mutations.len() as u64);

    MutationBatch {
        radius: job.radius,
        power: job.power,
        columns: job.columns.clone(),
        mutations,
    }
}
