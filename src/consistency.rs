//! Consistency validation for statements.
//!
//! The validator decides, before anything is written, whether committing a
//! claim would make the knowledge base contradict itself. It only reads the
//! store. On success it returns the exact primitive facts to record.

use crate::conflict::Conflict;
use crate::derivation::Derivation;
use crate::fact::Fact;
use crate::ir::Claim;
use crate::person::{Gender, Person};
use crate::storage::{FactStore, StorageError};

/// Outcome of validating a claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    /// Record these facts, in order.
    Commit(Vec<Fact>),
    /// Leave the store untouched.
    Reject(Conflict),
}

/// Read-only consistency checker.
#[derive(Clone, Copy)]
pub struct Validator<'a> {
    derive: Derivation<'a>,
}

impl<'a> Validator<'a> {
    /// Creates a validator over `store`.
    #[must_use]
    pub fn new(store: &'a dyn FactStore) -> Self {
        Self {
            derive: Derivation::new(store),
        }
    }

    fn store(&self) -> &'a dyn FactStore {
        self.derive.store()
    }

    /// Validate `claim` and produce its commit plan.
    ///
    /// Checks run in order: self-reference, gender conflict, then the
    /// relation-specific ancestry or sibling check.
    pub fn plan(&self, claim: &Claim) -> Result<Plan, StorageError> {
        if let Some(person) = claim.repeated_person() {
            return Ok(Plan::Reject(Conflict::SelfReference {
                person: person.clone(),
            }));
        }

        if let Some((subject, gender)) = claim.gendered_subject() {
            if let Some(conflict) = self.gender_conflict(subject, gender)? {
                return Ok(Plan::Reject(conflict));
            }
        }

        let conflict = match claim {
            Claim::Parent { parent, child, .. } | Claim::Offspring { child, parent, .. } => {
                self.parent_edge_conflict(parent, child)?
            }
            Claim::Parents { parents, child } => {
                match self.parent_edge_conflict(&parents[0], child)? {
                    Some(conflict) => Some(conflict),
                    None => self.parent_edge_conflict(&parents[1], child)?,
                }
            }
            Claim::Children { children, parent } => {
                let mut found = None;
                for child in children {
                    found = self.parent_edge_conflict(parent, child)?;
                    if found.is_some() {
                        break;
                    }
                }
                found
            }
            Claim::Grandparent {
                grandparent,
                grandchild,
                ..
            } => self.ancestry_conflict(grandparent, grandchild)?,
            Claim::Pibling {
                pibling, nibling, ..
            } => self.ancestry_conflict(pibling, nibling)?,
            Claim::Sibling { subject, other, .. } => self.sibling_conflict(subject, other)?,
        };

        Ok(match conflict {
            Some(conflict) => Plan::Reject(conflict),
            None => Plan::Commit(claim.facts()),
        })
    }

    /// Check a single primitive fact, as loaded from a seed file.
    ///
    /// Applies the same rules a statement introducing that fact would.
    pub fn check_fact(&self, fact: &Fact) -> Result<Option<Conflict>, StorageError> {
        let (a, b) = match fact {
            Fact::Gender { person, gender } => return self.gender_conflict(person, *gender),
            Fact::Parent { parent, child } => (parent, child),
            Fact::Sibling { a, b } => (a, b),
            Fact::Pibling { pibling, nibling } => (pibling, nibling),
            Fact::Grandparent {
                grandparent,
                grandchild,
            } => (grandparent, grandchild),
        };
        if a == b {
            return Ok(Some(Conflict::SelfReference { person: a.clone() }));
        }
        match fact {
            Fact::Parent { .. } => self.parent_edge_conflict(a, b),
            Fact::Sibling { .. } => self.sibling_conflict(a, b),
            _ => self.ancestry_conflict(a, b),
        }
    }

    fn gender_conflict(
        &self,
        person: &Person,
        gender: Gender,
    ) -> Result<Option<Conflict>, StorageError> {
        let recorded = gender.opposite();
        if self.store().has_gender(person, recorded)? {
            return Ok(Some(Conflict::GenderConflict {
                person: person.clone(),
                recorded,
            }));
        }
        Ok(None)
    }

    /// `descendant` must not already be an ancestor of `ancestor`.
    fn ancestry_conflict(
        &self,
        ancestor: &Person,
        descendant: &Person,
    ) -> Result<Option<Conflict>, StorageError> {
        if self.derive.is_ancestor(descendant, ancestor)? {
            return Ok(Some(Conflict::AncestryCycle {
                ancestor: ancestor.clone(),
                descendant: descendant.clone(),
            }));
        }
        Ok(None)
    }

    /// Ancestry check for a direct parent edge. Re-asserting a parent fact
    /// that is already recorded is always accepted.
    fn parent_edge_conflict(
        &self,
        parent: &Person,
        child: &Person,
    ) -> Result<Option<Conflict>, StorageError> {
        if self.store().is_parent(parent, child)? {
            return Ok(None);
        }
        self.ancestry_conflict(parent, child)
    }

    /// Siblings cannot already be parent/child or grandparent/grandchild.
    /// Deeper ancestry is not inspected.
    fn sibling_conflict(&self, a: &Person, b: &Person) -> Result<Option<Conflict>, StorageError> {
        let store = self.store();
        let related = store.is_parent(a, b)?
            || store.is_parent(b, a)?
            || self.derive.grandparent(a, b)?
            || self.derive.grandparent(b, a)?;
        if related {
            return Ok(Some(Conflict::SiblingConflict {
                a: a.clone(),
                b: b.clone(),
            }));
        }
        Ok(None)
    }
}
