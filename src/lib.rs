//! # KinQL - A Family Relationship Knowledge Engine
//!
//! KinQL keeps a small knowledge base of family facts stated in restricted
//! English, refuses statements that would make it contradict itself, and
//! answers questions by deriving relationships on demand.
//!
//! ## Core Concepts
//!
//! - **Fact**: a primitive assertion (gender, parent, sibling, aunt/uncle, grandparent)
//! - **Derivation**: relationships computed at query time and never stored
//! - **Validator**: read-only consistency checks run before any commit
//! - **Engine**: dispatches a normalized request and returns one response
//!
//! ## Usage
//!
//! ```rust
//! use kinql::{KinEngine, SentenceMatcher};
//!
//! let engine = KinEngine::in_memory();
//! let matcher = SentenceMatcher::new()?;
//!
//! let told = engine.dispatch(matcher.parse("John is the father of Mary.")?);
//! assert_eq!(told.to_string(), "OK! I learned something.");
//!
//! let asked = engine.dispatch(matcher.parse("Who is the father of Mary?")?);
//! assert_eq!(asked.to_string(), "The father of Mary is John.");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Core types
pub mod conflict;
pub mod error;
pub mod fact;
pub mod person;

// Knowledge engine
pub mod consistency;
pub mod derivation;
pub mod engine;
pub mod ir;
pub mod response;
pub mod storage;

// Conversation surface
pub mod config;
pub mod pattern;
pub mod seed;
pub mod session;

// Re-export primary types at crate root for convenience
pub use config::SessionConfig;
pub use conflict::Conflict;
pub use consistency::{Plan, Validator};
pub use derivation::Derivation;
pub use engine::KinEngine;
pub use error::{KinError, KinResult, SeedError, ValidationError};
pub use fact::{Fact, FactRecord};
pub use ir::{
    Arity, Claim, Command, InputKind, Operation, Query, QuestionKind, Request, Role, StatementKind,
};
pub use pattern::{PatternError, SentenceMatcher};
pub use person::{Gender, Person};
pub use response::{Enumeration, Response};
pub use seed::{Snapshot, SEED_VERSION};
pub use session::{Reply, Session};
pub use storage::{FactStore, InMemoryFactStore, StorageError};
