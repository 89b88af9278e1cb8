//! Delayed entity impact: damage and knockback per applied batch.

use std::collections::HashSet;

use shockfront_core::BlockPos;
use shockfront_world::{EntityBackend, EntityId};

use crate::config::ImpactConfig;

/// Applies the entity effects of one committed mutation batch.
///
/// Runs on the applier's single-threaded context, a fixed number of
/// ticks after the batch's voxels were committed, so that damage lands
/// in sync with the host's visual pass over the same columns.
#[derive(Clone, Copy, Debug)]
pub struct EntityImpactApplier {
    config: ImpactConfig,
}

impl EntityImpactApplier {
    /// Create an applier with the given tuning.
    pub fn new(config: ImpactConfig) -> Self {
        Self { config }
    }

    /// Damage and knock back entities near the batch's columns.
    ///
    /// `visited` is scoped to the whole explosion: an entity caught by
    /// the wavefront is affected once, however many rings and columns
    /// sweep past it. Returns the number of entities hit by this call.
    pub fn apply(
        &self,
        explosion_center: BlockPos,
        power: f64,
        columns: &[BlockPos],
        entities: &mut dyn EntityBackend,
        visited: &mut HashSet<EntityId>,
    ) -> u64 {
        let mut hit = 0u64;

        for &column in columns {
            for id in entities.entities_near(column, self.config.half_extent) {
                if !visited.insert(id) {
                    continue;
                }
                let Some(pos) = entities.position(id) else {
                    continue;
                };

                let dx = pos[0] - f64::from(explosion_center.x);
                let dy = pos[1] - f64::from(explosion_center.y);
                let dz = pos[2] - f64::from(explosion_center.z);
                let distance = (dx * dx + dy * dy + dz * dz).sqrt();
                if distance < 0.1 {
                    // Standing on the exact center: no direction to push.
                    entities.damage(id, power * self.config.damage_per_power);
                    hit += 1;
                    continue;
                }

                let speed = power * self.config.knockback_per_power;
                let knockback = [
                    dx / distance * speed,
                    dy / distance * speed + 0.2,
                    dz / distance * speed,
                ];
                entities.apply_knockback(id, knockback);
                entities.damage(id, power * self.config.damage_per_power);
                hit += 1;
            }
        }
        hit
    }
}
