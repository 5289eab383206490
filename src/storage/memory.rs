//! In-memory storage backend.
//!
//! Thread-safe implementation of [`FactStore`]. Each directed relation is kept
//! in two adjacency maps (forward and backward) so every enumeration is a
//! single lookup, and every newly inserted fact is appended to the log.

use std::collections::{BTreeSet, HashMap};
use std::sync::RwLock;

use chrono::Utc;

use crate::fact::{Fact, FactRecord};
use crate::person::{Gender, Person};
use crate::storage::traits::{FactStore, StorageError};

fn lock_err(context: &'static str) -> StorageError {
    StorageError::BackendError(format!("poisoned lock: {context}"))
}

type Adjacency = HashMap<Person, BTreeSet<Person>>;

fn lookup(map: &Adjacency, key: &Person) -> BTreeSet<Person> {
    map.get(key).cloned().unwrap_or_default()
}

fn linked(map: &Adjacency, from: &Person, to: &Person) -> bool {
    map.get(from).is_some_and(|set| set.contains(to))
}

/// Insert `from -> to` into `forward` and `to -> from` into `backward`.
fn link(forward: &mut Adjacency, backward: &mut Adjacency, from: &Person, to: &Person) -> bool {
    let inserted = forward
        .entry(from.clone())
        .or_default()
        .insert(to.clone());
    backward
        .entry(to.clone())
        .or_default()
        .insert(from.clone());
    inserted
}

#[derive(Debug, Default)]
struct FactState {
    genders: HashMap<Person, Gender>,
    children_by_parent: Adjacency,
    parents_by_child: Adjacency,
    siblings: Adjacency,
    niblings_by_pibling: Adjacency,
    piblings_by_nibling: Adjacency,
    grandchildren_by_grandparent: Adjacency,
    grandparents_by_grandchild: Adjacency,
    log: Vec<FactRecord>,
}

impl FactState {
    fn record(&mut self, fact: Fact) {
        tracing::trace!(
            predicate = fact.predicate(),
            %fact,
            position = self.log.len(),
            "fact recorded"
        );
        self.log.push(FactRecord {
            recorded_at: Utc::now(),
            fact,
        });
    }

    /// The first gender fact in `facts` that contradicts a recorded gender or
    /// an earlier fact of the same batch.
    fn gender_clash(&self, facts: &[Fact]) -> Option<Person> {
        let mut pending: HashMap<&Person, Gender> = HashMap::new();
        for fact in facts {
            if let Fact::Gender { person, gender } = fact {
                let known = self
                    .genders
                    .get(person)
                    .copied()
                    .or_else(|| pending.get(person).copied());
                match known {
                    Some(existing) if existing != *gender => return Some(person.clone()),
                    Some(_) => {}
                    None => {
                        pending.insert(person, *gender);
                    }
                }
            }
        }
        None
    }

    /// Insert one fact whose gender, if any, has already been checked.
    fn insert(&mut self, fact: &Fact) -> bool {
        match fact {
            Fact::Gender { person, gender } => {
                if self.genders.contains_key(person) {
                    return false;
                }
                self.genders.insert(person.clone(), *gender);
            }
            Fact::Parent { parent, child } => {
                if !link(
                    &mut self.children_by_parent,
                    &mut self.parents_by_child,
                    parent,
                    child,
                ) {
                    return false;
                }
            }
            Fact::Sibling { a, b } => {
                let forward = self.siblings.entry(a.clone()).or_default().insert(b.clone());
                let backward = self.siblings.entry(b.clone()).or_default().insert(a.clone());
                if forward {
                    self.record(Fact::sibling(a, b));
                }
                if backward {
                    self.record(Fact::sibling(b, a));
                }
                return forward || backward;
            }
            Fact::Pibling { pibling, nibling } => {
                if !link(
                    &mut self.niblings_by_pibling,
                    &mut self.piblings_by_nibling,
                    pibling,
                    nibling,
                ) {
                    return false;
                }
            }
            Fact::Grandparent {
                grandparent,
                grandchild,
            } => {
                if !link(
                    &mut self.grandchildren_by_grandparent,
                    &mut self.grandparents_by_grandchild,
                    grandparent,
                    grandchild,
                ) {
                    return false;
                }
            }
        }
        self.record(fact.clone());
        true
    }

    fn apply(&mut self, facts: &[Fact]) -> Result<usize, StorageError> {
        if let Some(person) = self.gender_clash(facts) {
            return Err(StorageError::GenderConflict { person });
        }
        Ok(facts.iter().filter(|fact| self.insert(fact)).count())
    }
}

/// Thread-safe in-memory fact store.
#[derive(Debug, Default)]
pub struct InMemoryFactStore {
    state: RwLock<FactState>,
}

impl InMemoryFactStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn apply(&self, facts: &[Fact], context: &'static str) -> Result<usize, StorageError> {
        let mut state = self.state.write().map_err(|_| lock_err(context))?;
        state.apply(facts)
    }
}

impl FactStore for InMemoryFactStore {
    fn assert_gender(&self, person: &Person, gender: Gender) -> Result<bool, StorageError> {
        Ok(self.apply(&[Fact::gender(person, gender)], "fact.assert_gender")? > 0)
    }

    fn assert_parent(&self, parent: &Person, child: &Person) -> Result<bool, StorageError> {
        Ok(self.apply(&[Fact::parent(parent, child)], "fact.assert_parent")? > 0)
    }

    fn assert_sibling(&self, a: &Person, b: &Person) -> Result<bool, StorageError> {
        Ok(self.apply(&[Fact::sibling(a, b)], "fact.assert_sibling")? > 0)
    }

    fn assert_pibling(&self, pibling: &Person, nibling: &Person) -> Result<bool, StorageError> {
        Ok(self.apply(&[Fact::pibling(pibling, nibling)], "fact.assert_pibling")? > 0)
    }

    fn assert_grandparent(
        &self,
        grandparent: &Person,
        grandchild: &Person,
    ) -> Result<bool, StorageError> {
        let fact = Fact::grandparent(grandparent, grandchild);
        Ok(self.apply(&[fact], "fact.assert_grandparent")? > 0)
    }

    fn assert_facts(&self, facts: &[Fact]) -> Result<usize, StorageError> {
        self.apply(facts, "fact.assert_facts")
    }

    fn gender_of(&self, person: &Person) -> Result<Option<Gender>, StorageError> {
        let state = self.state.read().map_err(|_| lock_err("fact.gender_of"))?;
        Ok(state.genders.get(person).copied())
    }

    fn is_parent(&self, parent: &Person, child: &Person) -> Result<bool, StorageError> {
        let state = self.state.read().map_err(|_| lock_err("fact.is_parent"))?;
        Ok(linked(&state.children_by_parent, parent, child))
    }

    fn is_sibling(&self, a: &Person, b: &Person) -> Result<bool, StorageError> {
        let state = self.state.read().map_err(|_| lock_err("fact.is_sibling"))?;
        Ok(linked(&state.siblings, a, b))
    }

    fn is_pibling(&self, pibling: &Person, nibling: &Person) -> Result<bool, StorageError> {
        let state = self.state.read().map_err(|_| lock_err("fact.is_pibling"))?;
        Ok(linked(&state.niblings_by_pibling, pibling, nibling))
    }

    fn is_grandparent(
        &self,
        grandparent: &Person,
        grandchild: &Person,
    ) -> Result<bool, StorageError> {
        let state = self.state.read().map_err(|_| lock_err("fact.is_grandparent"))?;
        Ok(linked(
            &state.grandchildren_by_grandparent,
            grandparent,
            grandchild,
        ))
    }

    fn parents_of(&self, child: &Person) -> Result<BTreeSet<Person>, StorageError> {
        let state = self.state.read().map_err(|_| lock_err("fact.parents_of"))?;
        Ok(lookup(&state.parents_by_child, child))
    }

    fn children_of(&self, parent: &Person) -> Result<BTreeSet<Person>, StorageError> {
        let state = self.state.read().map_err(|_| lock_err("fact.children_of"))?;
        Ok(lookup(&state.children_by_parent, parent))
    }

    fn siblings_of(&self, person: &Person) -> Result<BTreeSet<Person>, StorageError> {
        let state = self.state.read().map_err(|_| lock_err("fact.siblings_of"))?;
        Ok(lookup(&state.siblings, person))
    }

    fn piblings_of(&self, nibling: &Person) -> Result<BTreeSet<Person>, StorageError> {
        let state = self.state.read().map_err(|_| lock_err("fact.piblings_of"))?;
        Ok(lookup(&state.piblings_by_nibling, nibling))
    }

    fn niblings_of(&self, pibling: &Person) -> Result<BTreeSet<Person>, StorageError> {
        let state = self.state.read().map_err(|_| lock_err("fact.niblings_of"))?;
        Ok(lookup(&state.niblings_by_pibling, pibling))
    }

    fn grandparents_of(&self, grandchild: &Person) -> Result<BTreeSet<Person>, StorageError> {
        let state = self.state.read().map_err(|_| lock_err("fact.grandparents_of"))?;
        Ok(lookup(&state.grandparents_by_grandchild, grandchild))
    }

    fn grandchildren_of(&self, grandparent: &Person) -> Result<BTreeSet<Person>, StorageError> {
        let state = self
            .state
            .read()
            .map_err(|_| lock_err("fact.grandchildren_of"))?;
        Ok(lookup(&state.grandchildren_by_grandparent, grandparent))
    }

    fn len(&self) -> Result<usize, StorageError> {
        let state = self.state.read().map_err(|_| lock_err("fact.len"))?;
        Ok(state.log.len())
    }

    fn records(&self) -> Result<Vec<FactRecord>, StorageError> {
        let state = self.state.read().map_err(|_| lock_err("fact.records"))?;
        Ok(state.log.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(name: &str) -> Person {
        Person::parse(name).unwrap()
    }

    fn names(set: &BTreeSet<Person>) -> Vec<&str> {
        set.iter().map(Person::as_str).collect()
    }

    #[test]
    fn test_gender_is_exclusive() {
        let store = InMemoryFactStore::new();
        assert!(store.assert_gender(&p("tom"), Gender::Male).unwrap());
        assert!(!store.assert_gender(&p("tom"), Gender::Male).unwrap());

        let err = store.assert_gender(&p("tom"), Gender::Female).unwrap_err();
        assert!(matches!(err, StorageError::GenderConflict { .. }));
        assert!(store.has_gender(&p("tom"), Gender::Male).unwrap());
        assert!(!store.has_gender(&p("tom"), Gender::Female).unwrap());
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn test_parent_indices() {
        let store = InMemoryFactStore::new();
        store.assert_parent(&p("tom"), &p("bob")).unwrap();
        store.assert_parent(&p("tom"), &p("ann")).unwrap();
        store.assert_parent(&p("eve"), &p("ann")).unwrap();

        assert!(store.is_parent(&p("tom"), &p("ann")).unwrap());
        assert!(!store.is_parent(&p("ann"), &p("tom")).unwrap());
        assert_eq!(names(&store.children_of(&p("tom")).unwrap()), vec!["Ann", "Bob"]);
        assert_eq!(names(&store.parents_of(&p("ann")).unwrap()), vec!["Eve", "Tom"]);
        assert!(store.parents_of(&p("tom")).unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_facts_are_suppressed() {
        let store = InMemoryFactStore::new();
        assert!(store.assert_parent(&p("tom"), &p("ann")).unwrap());
        assert!(!store.assert_parent(&p("tom"), &p("ann")).unwrap());
        assert!(store.assert_pibling(&p("liz"), &p("ann")).unwrap());
        assert!(!store.assert_pibling(&p("liz"), &p("ann")).unwrap());
        assert_eq!(store.len().unwrap(), 2);
    }

    #[test]
    fn test_sibling_is_symmetric() {
        let store = InMemoryFactStore::new();
        assert!(store.assert_sibling(&p("ann"), &p("bob")).unwrap());
        assert!(store.is_sibling(&p("ann"), &p("bob")).unwrap());
        assert!(store.is_sibling(&p("bob"), &p("ann")).unwrap());
        assert_eq!(store.len().unwrap(), 2);

        // Either direction is a duplicate now.
        assert!(!store.assert_sibling(&p("bob"), &p("ann")).unwrap());
        assert_eq!(store.len().unwrap(), 2);
    }

    #[test]
    fn test_pibling_and_grandparent_are_directed() {
        let store = InMemoryFactStore::new();
        store.assert_pibling(&p("liz"), &p("ann")).unwrap();
        store.assert_grandparent(&p("eve"), &p("ann")).unwrap();

        assert!(store.is_pibling(&p("liz"), &p("ann")).unwrap());
        assert!(!store.is_pibling(&p("ann"), &p("liz")).unwrap());
        assert_eq!(names(&store.piblings_of(&p("ann")).unwrap()), vec!["Liz"]);
        assert_eq!(names(&store.niblings_of(&p("liz")).unwrap()), vec!["Ann"]);

        assert!(store.is_grandparent(&p("eve"), &p("ann")).unwrap());
        assert!(!store.is_grandparent(&p("ann"), &p("eve")).unwrap());
        assert_eq!(names(&store.grandparents_of(&p("ann")).unwrap()), vec!["Eve"]);
        assert_eq!(names(&store.grandchildren_of(&p("eve")).unwrap()), vec!["Ann"]);
    }

    #[test]
    fn test_log_is_append_only_and_ordered() {
        let store = InMemoryFactStore::new();
        assert!(store.is_empty().unwrap());
        store.assert_gender(&p("tom"), Gender::Male).unwrap();
        store.assert_parent(&p("tom"), &p("ann")).unwrap();
        store.assert_parent(&p("tom"), &p("ann")).unwrap();

        let records = store.records().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].fact, Fact::gender(&p("tom"), Gender::Male));
        assert_eq!(records[1].fact, Fact::parent(&p("tom"), &p("ann")));
        assert!(records[0].recorded_at <= records[1].recorded_at);
    }

    #[test]
    fn test_assert_fact_and_contains() {
        let store = InMemoryFactStore::new();
        let facts = [
            Fact::gender(&p("ann"), Gender::Female),
            Fact::parent(&p("tom"), &p("ann")),
            Fact::sibling(&p("ann"), &p("bob")),
            Fact::pibling(&p("liz"), &p("ann")),
            Fact::grandparent(&p("eve"), &p("ann")),
        ];
        for fact in &facts {
            assert!(!store.contains(fact).unwrap());
            assert!(store.assert_fact(fact).unwrap());
            assert!(store.contains(fact).unwrap());
        }
        assert!(store.contains(&Fact::sibling(&p("bob"), &p("ann"))).unwrap());
    }

    #[test]
    fn test_assert_facts_is_all_or_nothing() {
        let store = InMemoryFactStore::new();
        store.assert_gender(&p("tom"), Gender::Male).unwrap();

        let batch = [
            Fact::parent(&p("tom"), &p("ann")),
            Fact::gender(&p("ann"), Gender::Female),
            Fact::gender(&p("tom"), Gender::Female),
        ];
        let err = store.assert_facts(&batch).unwrap_err();
        assert!(matches!(err, StorageError::GenderConflict { .. }));
        assert_eq!(store.len().unwrap(), 1);
        assert!(!store.is_parent(&p("tom"), &p("ann")).unwrap());
        assert_eq!(store.gender_of(&p("ann")).unwrap(), None);

        // A batch contradicting itself is refused as a whole too.
        let batch = [
            Fact::gender(&p("bob"), Gender::Male),
            Fact::gender(&p("bob"), Gender::Female),
        ];
        assert!(store.assert_facts(&batch).is_err());
        assert_eq!(store.gender_of(&p("bob")).unwrap(), None);
    }

    #[test]
    fn test_assert_facts_counts_new_directed_facts() {
        let store = InMemoryFactStore::new();
        store.assert_parent(&p("tom"), &p("ann")).unwrap();
        let batch = [
            Fact::parent(&p("tom"), &p("ann")),
            Fact::sibling(&p("ann"), &p("bob")),
            Fact::gender(&p("ann"), Gender::Female),
            Fact::gender(&p("ann"), Gender::Female),
        ];
        assert_eq!(store.assert_facts(&batch).unwrap(), 2);
        assert_eq!(store.len().unwrap(), 4);
    }
}
