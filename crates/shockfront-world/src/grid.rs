//! In-memory voxel world backed by per-column ordered maps.

use std::collections::{BTreeMap, HashMap};

use shockfront_core::{BlockPos, Material};

use crate::traits::{WorldBounds, WorldReader, WorldWriter};

/// A sparse in-memory voxel world.
///
/// Storage is one ordered map of `y -> Material` per `(x, z)` column,
/// which makes `highest_solid_y` a reverse scan over the occupied Ys of
/// a single column. Unset voxels read as air.
///
/// `GridWorld` implements both [`WorldReader`] and [`WorldWriter`]; its
/// reader side is only `Sync` behind an immutable borrow, so concurrent
/// pipelines either share it read-only for the whole run or capture a
/// [`WorldSnapshot`](crate::WorldSnapshot) first.
#[derive(Clone, Debug)]
pub struct GridWorld {
    bounds: WorldBounds,
    columns: HashMap<(i32, i32), BTreeMap<i32, Material>>,
}

impl GridWorld {
    /// Create an empty world with the given vertical limits.
    ///
    /// # Panics
    ///
    /// Panics if `min_y > max_y`.
    pub fn new(min_y: i32, max_y: i32) -> Self {
        assert!(min_y <= max_y, "min_y {min_y} must not exceed max_y {max_y}");
        Self {
            bounds: WorldBounds { min_y, max_y },
            columns: HashMap::new(),
        }
    }

    /// Fill the rectangle `[x0, x1] × [z0, z1]` with `material` at every
    /// Y in `[y0, y1]`. Test/demo convenience.
    pub fn fill_box(
        &mut self,
        (x0, y0, z0): (i32, i32, i32),
        (x1, y1, z1): (i32, i32, i32),
        material: Material,
    ) {
        for x in x0..=x1 {
            for z in z0..=z1 {
                for y in y0..=y1 {
                    self.set_material(BlockPos::new(x, y, z), material);
                }
            }
        }
    }

    /// Fill an infinite-looking flat floor: every column in the square
    /// of `half_extent` around `(0, 0)` gets `material` at exactly
    /// `surface_y`.
    pub fn flat(surface_y: i32, half_extent: i32, material: Material) -> Self {
        let mut world = Self::new(surface_y - 64, surface_y + 256);
        world.fill_box(
            (-half_extent, surface_y, -half_extent),
            (half_extent, surface_y, half_extent),
            material,
        );
        world
    }

    /// Number of non-air voxels stored.
    pub fn solid_count(&self) -> usize {
        self.columns
            .values()
            .flat_map(|col| col.values())
            .filter(|m| !m.is_air())
            .count()
    }
}

impl WorldReader for GridWorld {
    fn bounds(&self) -> WorldBounds {
        self.bounds
    }

    fn highest_solid_y(&self, x: i32, z: i32) -> Option<i32> {
        let col = self.columns.get(&(x, z))?;
        col.iter()
            .rev()
            .find(|(_, m)| m.is_solid())
            .map(|(&y, _)| y)
    }

    fn material_at(&self, pos: BlockPos) -> Material {
        if !self.bounds.contains_y(pos.y) {
            return Material::Air;
        }
        self.columns
            .get(&(pos.x, pos.z))
            .and_then(|col| col.get(&pos.y))
            .copied()
            .unwrap_or(Material::Air)
    }
}

impl WorldWriter for GridWorld {
    fn set_material(&mut self, pos: BlockPos, material: Material) {
        if !self.bounds.contains_y(pos.y) {
            return;
        }
        let col = self.columns.entry((pos.x, pos.z)).or_default();
        if material.is_air() {
            col.remove(&pos.y);
        } else {
            col.insert(pos.y, material);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_column_has_no_surface() {
        let world = GridWorld::new(0, 255);
        assert_eq!(world.highest_solid_y(3, -7), None);
        assert_eq!(world.material_at(BlockPos::new(3, 10, -7)), Material::Air);
    }

    #[test]
    fn highest_solid_skips_plants_and_liquids() {
        let mut world = GridWorld::new(0, 255);
        world.set_material(BlockPos::new(0, 60, 0), Material::Stone);
        world.set_material(BlockPos::new(0, 61, 0), Material::Water);
        world.set_material(BlockPos::new(0, 62, 0), Material::TallGrass);
        assert_eq!(world.highest_solid_y(0, 0), Some(60));
    }

    #[test]
    fn flat_world_is_uniform() {
        let world = GridWorld::flat(64, 16, Material::GrassBlock);
        for (x, z) in [(0, 0), (16, -16), (-5, 11)] {
            assert_eq!(world.highest_solid_y(x, z), Some(64), "column ({x}, {z})");
        }
        assert_eq!(
            world.material_at(BlockPos::new(2, 64, 2)),
            Material::GrassBlock
        );
    }

    #[test]
    fn set_air_clears_the_voxel() {
        let mut world = GridWorld::new(0, 255);
        let pos = BlockPos::new(1, 100, 1);
        world.set_material(pos, Material::Stone);
        assert_eq!(world.highest_solid_y(1, 1), Some(100));
        world.set_material(pos, Material::Air);
        assert_eq!(world.highest_solid_y(1, 1), None);
    }

    #[test]
    fn out_of_bounds_writes_are_ignored() {
        let mut world = GridWorld::new(0, 100);
        world.set_material(BlockPos::new(0, 101, 0), Material::Stone);
        world.set_material(BlockPos::new(0, -1, 0), Material::Stone);
        assert_eq!(world.solid_count(), 0);
    }
}
