//! Conflict types for rejected statements.
//!
//! A conflict is an answer, not an error: it explains why a statement would
//! have made the knowledge base self-contradictory. The store is never touched
//! when a conflict is reported.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::person::{Gender, Person};

/// Why a statement was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Conflict {
    /// Two name slots of the statement name the same person.
    SelfReference {
        /// The repeated person.
        person: Person,
    },

    /// The subject already holds the opposite gender.
    GenderConflict {
        /// The subject.
        person: Person,
        /// The gender already on record.
        recorded: Gender,
    },

    /// The proposed descendant is already an ancestor of the proposed ancestor.
    AncestryCycle {
        /// The proposed ancestor.
        ancestor: Person,
        /// The proposed descendant.
        descendant: Person,
    },

    /// The two proposed siblings are already in a parent or grandparent relation.
    SiblingConflict {
        /// One proposed sibling.
        a: Person,
        /// The other proposed sibling.
        b: Person,
    },

    /// The store could not be read or written.
    Internal {
        /// Description of the failure.
        reason: String,
    },
}

impl Conflict {
    /// Returns the snake_case name of this conflict kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::SelfReference { .. } => "self_reference",
            Self::GenderConflict { .. } => "gender_conflict",
            Self::AncestryCycle { .. } => "ancestry_cycle",
            Self::SiblingConflict { .. } => "sibling_conflict",
            Self::Internal { .. } => "internal",
        }
    }
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SelfReference { person } => write!(f, "self_reference({person})"),
            Self::GenderConflict { person, recorded } => {
                write!(f, "gender_conflict({person} is {recorded})")
            }
            Self::AncestryCycle {
                ancestor,
                descendant,
            } => write!(f, "ancestry_cycle({descendant} is an ancestor of {ancestor})"),
            Self::SiblingConflict { a, b } => write!(f, "sibling_conflict({a}, {b})"),
            Self::Internal { reason } => write!(f, "internal({reason})"),
        }
    }
}
