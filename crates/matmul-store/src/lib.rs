//! # matmul-store
//!
//! Persistence for calculation inputs, per-worker task and result sets, and
//! result matrices. Backends are chosen by the caller at construction time.

pub mod fs;
pub mod memory;
pub mod store;

pub use fs::FsStore;
pub use memory::InMemoryStore;
pub use store::{ArtifactKey, ArtifactKind, ComputationStore};
