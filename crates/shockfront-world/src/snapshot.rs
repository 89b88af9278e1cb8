//! Immutable region snapshot: the concurrent read-only cache layer.

use shockfront_core::{BlockPos, Material};

use crate::traits::{WorldBounds, WorldReader};

/// An immutable copy of the world region one explosion can reach.
///
/// Captured once on the host's world-owning thread, then shared freely
/// across the generation worker and the processor pool. Immutability is
/// what makes the concurrent access safe; there is no interior locking
/// and no invalidation. Queries outside the captured region read as air
/// (materials) or `None` (heights).
///
/// The capture region is the square of `horizontal_radius` columns
/// around the center, over the world's full vertical range. Callers
/// should pad `horizontal_radius` by the widest transform shell so the
/// edge rings see real terrain.
pub struct WorldSnapshot {
    bounds: WorldBounds,
    origin_x: i32,
    origin_z: i32,
    side: i32,
    heights: Vec<Option<i32>>,
    materials: Vec<Material>,
}

impl WorldSnapshot {
    /// Capture the square region of `horizontal_radius` columns around
    /// `center` from `reader`.
    pub fn capture(reader: &dyn WorldReader, center: BlockPos, horizontal_radius: u32) -> Self {
        let bounds = reader.bounds();
        let r = i32::try_from(horizontal_radius).unwrap_or(i32::MAX / 4);
        let side = 2 * r + 1;
        let origin_x = center.x - r;
        let origin_z = center.z - r;
        let height_span = (bounds.max_y - bounds.min_y + 1) as usize;

        let mut heights = Vec::with_capacity((side * side) as usize);
        let mut materials = vec![Material::Air; (side * side) as usize * height_span];

        for dz in 0..side {
            for dx in 0..side {
                let x = origin_x + dx;
                let z = origin_z + dz;
                heights.push(reader.highest_solid_y(x, z));
                let column_base = ((dz * side + dx) as usize) * height_span;
                for (i, y) in (bounds.min_y..=bounds.max_y).enumerate() {
                    let m = reader.material_at(BlockPos::new(x, y, z));
                    if !m.is_air() {
                        materials[column_base + i] = m;
                    }
                }
            }
        }

        Self {
            bounds,
            origin_x,
            origin_z,
            side,
            heights,
            materials,
        }
    }

    fn column_index(&self, x: i32, z: i32) -> Option<usize> {
        let dx = x - self.origin_x;
        let dz = z - self.origin_z;
        if dx < 0 || dz < 0 || dx >= self.side || dz >= self.side {
            return None;
        }
        Some((dz * self.side + dx) as usize)
    }
}

impl WorldReader for WorldSnapshot {
    fn bounds(&self) -> WorldBounds {
        self.bounds
    }

    fn highest_solid_y(&self, x: i32, z: i32) -> Option<i32> {
        self.heights[self.column_index(x, z)?]
    }

    fn material_at(&self, pos: BlockPos) -> Material {
        if !self.bounds.contains_y(pos.y) {
            return Material::Air;
        }
        match self.column_index(pos.x, pos.z) {
            Some(col) => {
                let height_span = (self.bounds.max_y - self.bounds.min_y + 1) as usize;
                let i = (pos.y - self.bounds.min_y) as usize;
                self.materials[col * height_span + i]
            }
            None => Material::Air,
        }
    }
}
