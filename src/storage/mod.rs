//! Fact storage for KinQL.
//!
//! `traits` defines the abstract store; `memory` provides the in-process,
//! thread-safe backend used by the engine and the tests.

mod memory;
mod traits;

pub use memory::InMemoryFactStore;
pub use traits::{FactStore, StorageError};
