//! Intermediate Representation (IR) for KinQL requests.
//!
//! The sentence matcher produces a [`Request`] (operation kind plus canonical
//! names). The dispatcher validates its arity and binds the names into a typed
//! [`Command`] before anything touches the knowledge base.

mod claim;
mod operations;
mod validation;

pub use claim::{Claim, Command, Query};
pub use operations::{Arity, InputKind, Operation, QuestionKind, Request, Role, StatementKind};
