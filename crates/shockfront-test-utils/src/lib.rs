//! Test worlds and mock backends for Shockfront development.
//!
//! Provides function-backed heightmap worlds, a write-recording world
//! wrapper, and a scripted entity backend that logs damage and
//! knockback calls for assertions.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::collections::HashMap;

use shockfront_core::{BlockPos, Material};
use shockfront_world::{EntityBackend, EntityId, WorldBounds, WorldReader, WorldWriter};

type SurfaceFn = Box<dyn Fn(i32, i32) -> Option<i32> + Send + Sync>;

/// A world whose terrain surface is a pure function of `(x, z)`.
///
/// Every voxel from the world floor up to the surface reads as the
/// configured material; everything above is air. Inherently safe for
/// concurrent reads, so pipelines can use it without a snapshot.
pub struct HeightmapWorld {
    bounds: WorldBounds,
    material: Material,
    surface: SurfaceFn,
}

impl HeightmapWorld {
    /// Surface at `f(x, z)`, solid `material` below it.
    pub fn new<F>(min_y: i32, max_y: i32, material: Material, f: F) -> Self
    where
        F: Fn(i32, i32) -> i32 + Send + Sync + 'static,
    {
        Self {
            bounds: WorldBounds { min_y, max_y },
            material,
            surface: Box::new(move |x, z| Some(f(x, z))),
        }
    }

    /// A world with no solid voxels at all.
    pub fn empty(min_y: i32, max_y: i32) -> Self {
        Self {
            bounds: WorldBounds { min_y, max_y },
            material: Material::Air,
            surface: Box::new(|_, _| None),
        }
    }

    /// A uniform flat world, the workhorse of the scenario tests.
    pub fn flat(surface_y: i32, material: Material) -> Self {
        Self::new(surface_y - 128, surface_y + 255, material, move |_, _| {
            surface_y
        })
    }
}

impl WorldReader for HeightmapWorld {
    fn bounds(&self) -> WorldBounds {
        self.bounds
    }

    fn highest_solid_y(&self, x: i32, z: i32) -> Option<i32> {
        (self.surface)(x, z).map(|y| y.clamp(self.bounds.min_y, self.bounds.max_y))
    }

    fn material_at(&self, pos: BlockPos) -> Material {
        if !self.bounds.contains_y(pos.y) {
            return Material::Air;
        }
        match self.highest_solid_y(pos.x, pos.z) {
            Some(surface) if pos.y <= surface => self.material,
            _ => Material::Air,
        }
    }
}

/// Wraps a [`WorldWriter`] and records every write, in order.
///
/// `duplicate_targets()` is the at-most-once mutation check: it returns
/// the positions written more than once across the whole run.
#[derive(Default)]
pub struct RecordingWorld {
    pub writes: Vec<(BlockPos, Material)>,
}

impl RecordingWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Positions that received more than one write.
    pub fn duplicate_targets(&self) -> Vec<BlockPos> {
        let mut counts: HashMap<BlockPos, usize> = HashMap::new();
        for (pos, _) in &self.writes {
            *counts.entry(*pos).or_default() += 1;
        }
        let mut dups: Vec<BlockPos> = counts
            .into_iter()
            .filter(|&(_, n)| n > 1)
            .map(|(pos, _)| pos)
            .collect();
        dups.sort();
        dups
    }

    /// The set of positions written at least once.
    pub fn written_positions(&self) -> Vec<BlockPos> {
        let mut positions: Vec<BlockPos> = self.writes.iter().map(|(p, _)| *p).collect();
        positions.sort();
        positions.dedup();
        positions
    }
}

impl WorldWriter for RecordingWorld {
    fn set_material(&mut self, pos: BlockPos, material: Material) {
        self.writes.push((pos, material));
    }
}

/// Scripted entity backend: fixed positions, logged effects.
#[derive(Default)]
pub struct ScriptedEntities {
    positions: HashMap<EntityId, [f64; 3]>,
    pub damage_log: Vec<(EntityId, f64)>,
    pub knockback_log: Vec<(EntityId, [f64; 3])>,
}

impl ScriptedEntities {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place an entity at a fixed position.
    pub fn spawn(&mut self, id: u64, position: [f64; 3]) -> EntityId {
        let id = EntityId(id);
        self.positions.insert(id, position);
        id
    }

    /// Total damage an entity has taken.
    pub fn total_damage(&self, id: EntityId) -> f64 {
        self.damage_log
            .iter()
            .filter(|(e, _)| *e == id)
            .map(|(_, d)| d)
            .sum()
    }
}

impl EntityBackend for ScriptedEntities {
    fn entities_near(&mut self, center: BlockPos, half_extent: (i32, i32, i32)) -> Vec<EntityId> {
        let (hx, hy, hz) = half_extent;
        let mut hits: Vec<EntityId> = self
            .positions
            .iter()
            .filter(|(_, p)| {
                (p[0] - f64::from(center.x)).abs() <= f64::from(hx)
                    && (p[1] - f64::from(center.y)).abs() <= f64::from(hy)
                    && (p[2] - f64::from(center.z)).abs() <= f64::from(hz)
            })
            .map(|(&id, _)| id)
            .collect();
        hits.sort_by_key(|id| id.0);
        hits
    }

    fn position(&self, id: EntityId) -> Option<[f64; 3]> {
        self.positions.get(&id).copied()
    }

    fn damage(&mut self, id: EntityId, amount: f64) {
        self.damage_log.push((id, amount));
    }

    fn apply_knockback(&mut self, id: EntityId, velocity: [f64; 3]) {
        self.knockback_log.push((id, velocity));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heightmap_world_reads_material_below_surface() {
        let world = HeightmapWorld::flat(64, Material::Stone);
        assert_eq!(world.highest_solid_y(10, -10), Some(64));
        assert_eq!(world.material_at(BlockPos::new(0, 64, 0)), Material::Stone);
        assert_eq!(world.material_at(BlockPos::new(0, 30, 0)), Material::Stone);
        assert_eq!(world.material_at(BlockPos::new(0, 65, 0)), Material::Air);
    }

    #[test]
    fn recording_world_finds_duplicates() {
        let mut world = RecordingWorld::new();
        world.set_material(BlockPos::new(0, 0, 0), Material::Air);
        world.set_material(BlockPos::new(1, 0, 0), Material::Air);
        world.set_material(BlockPos::new(0, 0, 0), Material::Cobblestone);
        assert_eq!(world.duplicate_targets(), vec![BlockPos::new(0, 0, 0)]);
        assert_eq!(world.written_positions().len(), 2);
    }

    #[test]
    fn scripted_entities_box_query() {
        let mut entities = ScriptedEntities::new();
        let near = entities.spawn(1, [1.0, 65.0, 1.0]);
        let far = entities.spawn(2, [30.0, 65.0, 0.0]);
        let hits = entities.entities_near(BlockPos::new(0, 64, 0), (3, 2, 3));
        assert_eq!(hits, vec![near]);
        assert!(entities.position(far).is_some());
    }
}
