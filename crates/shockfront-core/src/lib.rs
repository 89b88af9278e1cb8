//! Core types for the Shockfront voxel destruction engine.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the value types shared by every other Shockfront crate: voxel
//! coordinates, the material palette, mutation records, and explosion
//! parameters with their falloff curves.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod material;
pub mod mutation;
pub mod params;
pub mod pos;

pub use error::ParameterError;
pub use material::Material;
pub use mutation::{Mutation, MutationBatch, Outcome, RingJob};
pub use params::{ExplosionParameters, PowerCurve, TickBudget};
pub use pos::BlockPos;
