//! Primitive facts and the append-only fact log.
//!
//! Primitive facts are the only things the store ever records. Every other
//! relation (brother, grandmother, aunt, related, ...) is derived from them at
//! query time.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::person::{Gender, Person};

/// A primitive, asserted fact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Fact {
    /// `person` has `gender`.
    Gender {
        /// The person.
        person: Person,
        /// Their gender.
        gender: Gender,
    },

    /// `parent` is a parent of `child`.
    Parent {
        /// The parent.
        parent: Person,
        /// The child.
        child: Person,
    },

    /// `a` and `b` are siblings. Stored in both directions.
    Sibling {
        /// One sibling.
        a: Person,
        /// The other sibling.
        b: Person,
    },

    /// `pibling` is an aunt or uncle of `nibling`.
    Pibling {
        /// The aunt or uncle.
        pibling: Person,
        /// The niece or nephew.
        nibling: Person,
    },

    /// `grandparent` is a grandparent of `grandchild`.
    Grandparent {
        /// The grandparent.
        grandparent: Person,
        /// The grandchild.
        grandchild: Person,
    },
}

impl Fact {
    /// Creates a gender fact.
    #[must_use]
    pub fn gender(person: &Person, gender: Gender) -> Self {
        Self::Gender {
            person: person.clone(),
            gender,
        }
    }

    /// Creates a parent fact.
    #[must_use]
    pub fn parent(parent: &Person, child: &Person) -> Self {
        Self::Parent {
            parent: parent.clone(),
            child: child.clone(),
        }
    }

    /// Creates a sibling fact.
    #[must_use]
    pub fn sibling(a: &Person, b: &Person) -> Self {
        Self::Sibling {
            a: a.clone(),
            b: b.clone(),
        }
    }

    /// Creates a pibling fact.
    #[must_use]
    pub fn pibling(pibling: &Person, nibling: &Person) -> Self {
        Self::Pibling {
            pibling: pibling.clone(),
            nibling: nibling.clone(),
        }
    }

    /// Creates a grandparent fact.
    #[must_use]
    pub fn grandparent(grandparent: &Person, grandchild: &Person) -> Self {
        Self::Grandparent {
            grandparent: grandparent.clone(),
            grandchild: grandchild.clone(),
        }
    }

    /// Returns the predicate name of this fact.
    #[must_use]
    pub const fn predicate(&self) -> &'static str {
        match self {
            Self::Gender { .. } => "gender",
            Self::Parent { .. } => "parent",
            Self::Sibling { .. } => "sibling",
            Self::Pibling { .. } => "pibling",
            Self::Grandparent { .. } => "grandparent",
        }
    }
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gender { person, gender } => write!(f, "{gender}({person})"),
            Self::Parent { parent, child } => write!(f, "parent({parent}, {child})"),
            Self::Sibling { a, b } => write!(f, "sibling({a}, {b})"),
            Self::Pibling { pibling, nibling } => write!(f, "pibling({pibling}, {nibling})"),
            Self::Grandparent {
                grandparent,
                grandchild,
            } => write!(f, "grandparent({grandparent}, {grandchild})"),
        }
    }
}

/// One entry of the store's append-only log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactRecord {
    /// Transaction time: when the fact was recorded.
    pub recorded_at: DateTime<Utc>,

    /// The recorded fact. Sibling facts are logged once per direction.
    pub fact: Fact,
}
