//! World-access seams for the Shockfront engine.
//!
//! The engine never talks to a host world directly; it goes through the
//! traits defined here. Reads ([`WorldReader`]) happen concurrently from
//! background threads and therefore require `Send + Sync`. Writes
//! ([`WorldWriter`]) and entity effects ([`EntityBackend`]) belong to
//! exactly one logical owner, the tick-budgeted applier, and are plain
//! single-threaded traits.
//!
//! Hosts whose native world API is not thread-safe capture a
//! [`WorldSnapshot`], an immutable copy of the region an explosion can
//! reach, and hand that to the engine instead. The snapshot is the
//! required read-only cache layer, not an optimization.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod grid;
pub mod snapshot;
pub mod traits;

pub use grid::GridWorld;
pub use snapshot::WorldSnapshot;
pub use traits::{EntityBackend, EntityId, WorldBounds, WorldReader, WorldWriter};
