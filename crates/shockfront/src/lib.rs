//! Shockfront: a tick-budgeted voxel shockwave destruction engine.
//!
//! This is the top-level facade crate that re-exports the public API
//! from all Shockfront sub-crates. For most users, adding `shockfront`
//! as a single dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use shockfront::prelude::*;
//! use std::sync::Arc;
//!
//! // A flat stone floor at y = 64.
//! let mut world = GridWorld::flat(64, 32, Material::Stone);
//!
//! // Capture the region the explosion can reach, so background
//! // workers read an immutable snapshot instead of the live world.
//! let center = BlockPos::new(0, 64, 0);
//! let snapshot = Arc::new(WorldSnapshot::capture(&world, center, 16));
//!
//! let params = ExplosionParameters {
//!     center,
//!     start_radius: 0,
//!     end_radius: 4,
//!     max_height: 64,
//!     power_curve: PowerCurve::Linear { start: 5.0, end: 2.0 },
//! };
//! // One processor keeps boundary claims between adjacent rings
//! // deterministic for this example's final assertion.
//! let mut config = ShockwaveConfig::default();
//! config.processor_count = Some(1);
//!
//! let mut wave = Shockwave::ignite(params, snapshot, &config).unwrap();
//!
//! // Hosts normally register the wave with a TickBudgetedApplier and
//! // call run_one_tick() from their fixed-rate loop; polling directly
//! // works too.
//! loop {
//!     match wave.poll_batch() {
//!         BatchPoll::Batch(batch) => {
//!             for m in &batch.mutations {
//!                 match m.outcome {
//!                     Outcome::Remove => world.set_material(m.pos, Material::Air),
//!                     Outcome::Replace(mat) => world.set_material(m.pos, mat),
//!                 }
//!             }
//!         }
//!         BatchPoll::Pending => std::thread::yield_now(),
//!         BatchPoll::Finished => break,
//!     }
//! }
//! assert_eq!(wave.phase(), Phase::Completed);
//! assert_eq!(world.material_at(center), Material::Air);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `shockfront-core` | Coordinates, materials, mutations, parameters |
//! | [`world`] | `shockfront-world` | World-access traits, snapshot cache, grid world |
//! | [`rules`] | `shockfront-rules` | The material destruction classifier |
//! | [`engine`] | `shockfront-engine` | Pipeline, orchestrator, tick-budgeted applier |
//! | [`command`] | (this crate) | Explosion-kind registry and command parsing |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core value types (`shockfront-core`).
pub use shockfront_core as types;

/// World-access traits and snapshot cache (`shockfront-world`).
pub use shockfront_world as world;

/// The material destruction classifier (`shockfront-rules`).
pub use shockfront_rules as rules;

/// Pipeline, orchestrator, and applier (`shockfront-engine`).
pub use shockfront_engine as engine;

pub mod command;

/// The commonly-used subset of the API.
pub mod prelude {
    pub use shockfront_core::{
        BlockPos, ExplosionParameters, Material, Mutation, MutationBatch, Outcome, PowerCurve,
        RingJob, TickBudget,
    };
    pub use shockfront_engine::{
        BatchPoll, Phase, Shockwave, ShockwaveConfig, ShockwaveControl, TickBudgetedApplier,
    };
    pub use shockfront_rules::TransformationRules;
    pub use shockfront_world::{
        EntityBackend, EntityId, GridWorld, WorldBounds, WorldReader, WorldSnapshot, WorldWriter,
    };
}
