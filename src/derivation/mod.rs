//! Derived predicates.
//!
//! [`Derivation`] answers every relation that is not a primitive fact by
//! combining store lookups at query time. Nothing derived is ever written
//! back. Reachability searches (ancestry, relatedness) are breadth-first with
//! a visited set scoped to the single query.

mod search;

use std::collections::BTreeSet;

use crate::ir::{Claim, Role};
use crate::person::{Gender, Person};
use crate::storage::{FactStore, StorageError};

/// Read-only view computing derived relations over a fact store.
#[derive(Clone, Copy)]
pub struct Derivation<'a> {
    store: &'a dyn FactStore,
}

impl<'a> Derivation<'a> {
    /// Creates a derivation view over `store`.
    #[must_use]
    pub fn new(store: &'a dyn FactStore) -> Self {
        Self { store }
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &'a dyn FactStore {
        self.store
    }

    fn with_gender(
        &self,
        people: BTreeSet<Person>,
        gender: Option<Gender>,
    ) -> Result<BTreeSet<Person>, StorageError> {
        let Some(gender) = gender else {
            return Ok(people);
        };
        let mut kept = BTreeSet::new();
        for person in people {
            if self.store.has_gender(&person, gender)? {
                kept.insert(person);
            }
        }
        Ok(kept)
    }

    /// `x` is the father of `y`.
    pub fn father(&self, x: &Person, y: &Person) -> Result<bool, StorageError> {
        Ok(self.store.is_parent(x, y)? && self.store.has_gender(x, Gender::Male)?)
    }

    /// `x` is the mother of `y`.
    pub fn mother(&self, x: &Person, y: &Person) -> Result<bool, StorageError> {
        Ok(self.store.is_parent(x, y)? && self.store.has_gender(x, Gender::Female)?)
    }

    /// `x` is a son of `y` (child first).
    pub fn son(&self, x: &Person, y: &Person) -> Result<bool, StorageError> {
        Ok(self.store.is_parent(y, x)? && self.store.has_gender(x, Gender::Male)?)
    }

    /// `x` is a daughter of `y` (child first).
    pub fn daughter(&self, x: &Person, y: &Person) -> Result<bool, StorageError> {
        Ok(self.store.is_parent(y, x)? && self.store.has_gender(x, Gender::Female)?)
    }

    /// `x` is a brother of `y`.
    pub fn brother(&self, x: &Person, y: &Person) -> Result<bool, StorageError> {
        Ok(self.store.is_sibling(x, y)? && self.store.has_gender(x, Gender::Male)?)
    }

    /// `x` is a sister of `y`.
    pub fn sister(&self, x: &Person, y: &Person) -> Result<bool, StorageError> {
        Ok(self.store.is_sibling(x, y)? && self.store.has_gender(x, Gender::Female)?)
    }

    /// `x` is a grandparent of `z`: a stored grandparent fact, or a parent of
    /// one of `z`'s parents.
    pub fn grandparent(&self, x: &Person, z: &Person) -> Result<bool, StorageError> {
        if self.store.is_grandparent(x, z)? {
            return Ok(true);
        }
        for y in self.store.children_of(x)? {
            if self.store.is_parent(&y, z)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// `x` is a grandmother of `z`.
    pub fn grandmother(&self, x: &Person, z: &Person) -> Result<bool, StorageError> {
        Ok(self.store.has_gender(x, Gender::Female)? && self.grandparent(x, z)?)
    }

    /// `x` is a grandfather of `z`.
    pub fn grandfather(&self, x: &Person, z: &Person) -> Result<bool, StorageError> {
        Ok(self.store.has_gender(x, Gender::Male)? && self.grandparent(x, z)?)
    }

    /// `x` is an aunt of `y`.
    pub fn aunt(&self, x: &Person, y: &Person) -> Result<bool, StorageError> {
        Ok(self.store.is_pibling(x, y)? && self.store.has_gender(x, Gender::Female)?)
    }

    /// `x` is an uncle of `y`.
    pub fn uncle(&self, x: &Person, y: &Person) -> Result<bool, StorageError> {
        Ok(self.store.is_pibling(x, y)? && self.store.has_gender(x, Gender::Male)?)
    }

    /// All grandparents of `z`, stored or derived.
    pub fn grandparents_of(&self, z: &Person) -> Result<BTreeSet<Person>, StorageError> {
        let mut out = self.store.grandparents_of(z)?;
        for parent in self.store.parents_of(z)? {
            out.extend(self.store.parents_of(&parent)?);
        }
        Ok(out)
    }

    /// `ancestor` reaches `descendant` through parent or stored grandparent
    /// edges, at any depth.
    pub fn is_ancestor(
        &self,
        ancestor: &Person,
        descendant: &Person,
    ) -> Result<bool, StorageError> {
        search::reaches(ancestor, descendant, |p| search::descendants_step(self.store, p))
    }

    /// `x` and `y` are distinct and connected by any chain of parent,
    /// sibling, pibling or stored grandparent edges, in either direction.
    pub fn related(&self, x: &Person, y: &Person) -> Result<bool, StorageError> {
        if x == y {
            return Ok(false);
        }
        search::reaches(x, y, |p| search::kin_step(self.store, p))
    }

    /// Does `claim` hold in the current knowledge base?
    pub fn holds(&self, claim: &Claim) -> Result<bool, StorageError> {
        match claim {
            Claim::Parent {
                parent,
                child,
                gender: Gender::Male,
            } => self.father(parent, child),
            Claim::Parent {
                parent,
                child,
                gender: Gender::Female,
            } => self.mother(parent, child),
            Claim::Offspring {
                child,
                parent,
                gender,
            } => match gender {
                Some(Gender::Male) => self.son(child, parent),
                Some(Gender::Female) => self.daughter(child, parent),
                None => self.store.is_parent(parent, child),
            },
            Claim::Sibling {
                subject,
                other,
                gender,
            } => match gender {
                Some(Gender::Male) => self.brother(subject, other),
                Some(Gender::Female) => self.sister(subject, other),
                None => self.store.is_sibling(subject, other),
            },
            Claim::Parents { parents, child } => {
                Ok(self.store.is_parent(&parents[0], child)?
                    && self.store.is_parent(&parents[1], child)?)
            }
            Claim::Children { children, parent } => {
                for child in children {
                    if !self.store.is_parent(parent, child)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Claim::Grandparent {
                grandparent,
                grandchild,
                gender: Gender::Male,
            } => self.grandfather(grandparent, grandchild),
            Claim::Grandparent {
                grandparent,
                grandchild,
                gender: Gender::Female,
            } => self.grandmother(grandparent, grandchild),
            Claim::Pibling {
                pibling,
                nibling,
                gender: Gender::Male,
            } => self.uncle(pibling, nibling),
            Claim::Pibling {
                pibling,
                nibling,
                gender: Gender::Female,
            } => self.aunt(pibling, nibling),
        }
    }

    /// Everyone holding `role` towards `subject`, sorted and deduplicated.
    pub fn members(&self, role: Role, subject: &Person) -> Result<BTreeSet<Person>, StorageError> {
        let candidates = match role {
            Role::Siblings | Role::Brothers | Role::Sisters => self.store.siblings_of(subject)?,
            Role::Parents | Role::Mother | Role::Father => self.store.parents_of(subject)?,
            Role::Children | Role::Sons | Role::Daughters => self.store.children_of(subject)?,
            Role::Grandparents | Role::Grandmothers | Role::Grandfathers => {
                self.grandparents_of(subject)?
            }
            Role::Aunts | Role::Uncles => self.store.piblings_of(subject)?,
        };
        self.with_gender(candidates, role.gender())
    }
}
