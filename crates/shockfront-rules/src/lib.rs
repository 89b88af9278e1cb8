//! Material destruction classifier.
//!
//! Maps a voxel's current material to a destruction outcome: removal,
//! or replacement drawn from a category-specific pool. Classification
//! never fails: anything that matches no category falls into the
//! generic rubble pool.
//!
//! Pool selection is random, which makes classification impure in the
//! strict sense. The RNG is injected and seeded so that tests (and
//! replays) are deterministic: a [`TransformationRules`] value carries
//! the base seed, and each ring derives its own [`Classifier`] via
//! `classifier_for(radius)` with a `seed XOR radius` derivation.
//! Identical seeds replay bit-identically regardless of which pool
//! worker classifies which ring.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use shockfront_core::{Material, Outcome};

/// Replacement pool for walls.
pub const RUINED_WALLS: &[Material] = &[Material::CobblestoneWall, Material::CrackedStoneWall];
/// Replacement pool for slabs.
pub const RUINED_SLABS: &[Material] = &[Material::CobblestoneSlab, Material::CrackedStoneSlab];
/// Replacement pool for stairs.
pub const RUINED_STAIRS: &[Material] = &[Material::CobblestoneStairs, Material::CrackedStoneStairs];
/// Replacement pool for logs.
pub const CHARRED_LOGS: &[Material] = &[Material::CharredLog];
/// Replacement pool for soil and grass covers.
pub const SCORCHED_SOIL: &[Material] = &[Material::ScorchedSoil, Material::CoarseDirt];
/// Replacement pool for plants.
pub const DEAD_PLANTS: &[Material] = &[Material::DeadBush];
/// Catch-all replacement pool.
pub const RUBBLE: &[Material] = &[Material::Cobblestone, Material::CrackedStone, Material::Scoria];

/// Seed holder for per-ring classifier derivation.
#[derive(Clone, Copy, Debug)]
pub struct TransformationRules {
    seed: u64,
}

impl TransformationRules {
    /// Create rules with the given base seed.
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Derive the classifier for one ring.
    ///
    /// Each radius gets an independent RNG stream, so the processor
    /// pool can classify rings concurrently while the whole explosion
    /// stays reproducible from the base seed.
    pub fn classifier_for(&self, radius: u32) -> Classifier {
        Classifier {
            rng: ChaCha8Rng::seed_from_u64(self.seed ^ u64::from(radius)),
        }
    }
}

/// Category-based destruction classifier with an owned RNG stream.
#[derive(Clone, Debug)]
pub struct Classifier {
    rng: ChaCha8Rng,
}

impl Classifier {
    /// Decide the transform-shell outcome for a voxel.
    ///
    /// Category dispatch, first match wins:
    /// wall → ruined wall, slab → ruined slab, stairs → ruined stairs,
    /// log → charred log, leaves/glass/frozen → remove,
    /// soil → scorched soil, plant → dead plant, anything else → rubble.
    pub fn classify(&mut self, material: Material) -> Outcome {
        if material.is_leaves() || material.is_glass() || material.is_frozen() {
            return Outcome::Remove;
        }
        let pool = if material.is_wall() {
            RUINED_WALLS
        } else if material.is_slab() {
            RUINED_SLABS
        } else if material.is_stairs() {
            RUINED_STAIRS
        } else if material.is_log() {
            CHARRED_LOGS
        } else if material.is_soil() {
            SCORCHED_SOIL
        } else if material.is_plant() {
            DEAD_PLANTS
        } else {
            RUBBLE
        };
        Outcome::Replace(self.pick(pool))
    }

    fn pick(&mut self, pool: &[Material]) -> Material {
        pool[self.rng.random_range(0..pool.len())]
    }
}
