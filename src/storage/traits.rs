//! Abstract storage trait for KinQL.
//!
//! The trait is the contract the derivation engine, the validator and the
//! dispatcher work against. Every mutation is idempotent: re-asserting a fact
//! that is already present succeeds and reports that nothing was inserted.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::fact::{Fact, FactRecord};
use crate::person::{Gender, Person};

/// Errors that can occur during storage operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// The person already holds the opposite gender.
    #[error("{person} already has a different gender on record")]
    GenderConflict {
        /// The person whose gender would change.
        person: Person,
    },

    /// Backend error.
    #[error("Storage backend error: {0}")]
    BackendError(String),
}

/// Storage trait for primitive kinship facts.
///
/// All queries are pure reads. Enumerations return sorted sets so callers can
/// hand them straight to the user.
pub trait FactStore: Send + Sync {
    /// Record the gender of a person.
    ///
    /// # Errors
    /// - `GenderConflict`: the person already has the opposite gender.
    fn assert_gender(&self, person: &Person, gender: Gender) -> Result<bool, StorageError>;

    /// Record `parent` as a parent of `child`.
    fn assert_parent(&self, parent: &Person, child: &Person) -> Result<bool, StorageError>;

    /// Record `a` and `b` as siblings, in both directions.
    fn assert_sibling(&self, a: &Person, b: &Person) -> Result<bool, StorageError>;

    /// Record `pibling` as an aunt or uncle of `nibling`.
    fn assert_pibling(&self, pibling: &Person, nibling: &Person) -> Result<bool, StorageError>;

    /// Record `grandparent` as a grandparent of `grandchild`.
    fn assert_grandparent(
        &self,
        grandparent: &Person,
        grandchild: &Person,
    ) -> Result<bool, StorageError>;

    /// Record every fact of `facts`, or none of them.
    ///
    /// Returns how many facts were new.
    ///
    /// # Errors
    /// - `GenderConflict`: a gender fact contradicts the store or the batch.
    fn assert_facts(&self, facts: &[Fact]) -> Result<usize, StorageError>;

    /// Get the recorded gender of a person, if any.
    fn gender_of(&self, person: &Person) -> Result<Option<Gender>, StorageError>;

    /// Is `parent` a recorded parent of `child`?
    fn is_parent(&self, parent: &Person, child: &Person) -> Result<bool, StorageError>;

    /// Are `a` and `b` recorded siblings?
    fn is_sibling(&self, a: &Person, b: &Person) -> Result<bool, StorageError>;

    /// Is `pibling` a recorded aunt or uncle of `nibling`?
    fn is_pibling(&self, pibling: &Person, nibling: &Person) -> Result<bool, StorageError>;

    /// Is `grandparent` a recorded grandparent of `grandchild`?
    ///
    /// Only stored grandparent facts count here; the parent-of-parent path is
    /// a derivation concern.
    fn is_grandparent(&self, grandparent: &Person, grandchild: &Person)
        -> Result<bool, StorageError>;

    /// Recorded parents of `child`.
    fn parents_of(&self, child: &Person) -> Result<BTreeSet<Person>, StorageError>;

    /// Recorded children of `parent`.
    fn children_of(&self, parent: &Person) -> Result<BTreeSet<Person>, StorageError>;

    /// Recorded siblings of `person`.
    fn siblings_of(&self, person: &Person) -> Result<BTreeSet<Person>, StorageError>;

    /// Recorded aunts and uncles of `nibling`.
    fn piblings_of(&self, nibling: &Person) -> Result<BTreeSet<Person>, StorageError>;

    /// Recorded nieces and nephews of `pibling`.
    fn niblings_of(&self, pibling: &Person) -> Result<BTreeSet<Person>, StorageError>;

    /// Stored grandparents of `grandchild`.
    fn grandparents_of(&self, grandchild: &Person) -> Result<BTreeSet<Person>, StorageError>;

    /// Stored grandchildren of `grandparent`.
    fn grandchildren_of(&self, grandparent: &Person) -> Result<BTreeSet<Person>, StorageError>;

    /// Number of recorded (directed) facts.
    fn len(&self) -> Result<usize, StorageError>;

    /// The append-only fact log, oldest first.
    fn records(&self) -> Result<Vec<FactRecord>, StorageError>;

    /// True when no fact has been recorded.
    fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.len()? == 0)
    }

    /// Does `person` have `gender` on record?
    fn has_gender(&self, person: &Person, gender: Gender) -> Result<bool, StorageError> {
        Ok(self.gender_of(person)? == Some(gender))
    }

    /// Record any primitive fact.
    fn assert_fact(&self, fact: &Fact) -> Result<bool, StorageError> {
        match fact {
            Fact::Gender { person, gender } => self.assert_gender(person, *gender),
            Fact::Parent { parent, child } => self.assert_parent(parent, child),
            Fact::Sibling { a, b } => self.assert_sibling(a, b),
            Fact::Pibling { pibling, nibling } => self.assert_pibling(pibling, nibling),
            Fact::Grandparent {
                grandparent,
                grandchild,
            } => self.assert_grandparent(grandparent, grandchild),
        }
    }

    /// Is `fact` already recorded?
    fn contains(&self, fact: &Fact) -> Result<bool, StorageError> {
        match fact {
            Fact::Gender { person, gender } => self.has_gender(person, *gender),
            Fact::Parent { parent, child } => self.is_parent(parent, child),
            Fact::Sibling { a, b } => self.is_sibling(a, b),
            Fact::Pibling { pibling, nibling } => self.is_pibling(pibling, nibling),
            Fact::Grandparent {
                grandparent,
                grandchild,
            } => self.is_grandparent(grandparent, grandchild),
        }
    }
}
