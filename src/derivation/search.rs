//! Breadth-first reachability over store adjacency.

use std::collections::{BTreeSet, HashSet, VecDeque};

use crate::person::Person;
use crate::storage::{FactStore, StorageError};

/// Is `target` reachable from `start` in one or more steps?
pub(super) fn reaches<F>(start: &Person, target: &Person, mut step: F) -> Result<bool, StorageError>
where
    F: FnMut(&Person) -> Result<BTreeSet<Person>, StorageError>,
{
    let mut visited: HashSet<Person> = HashSet::from([start.clone()]);
    let mut queue = VecDeque::from([start.clone()]);

    while let Some(current) = queue.pop_front() {
        for next in step(&current)? {
            if &next == target {
                return Ok(true);
            }
            if visited.insert(next.clone()) {
                queue.push_back(next);
            }
        }
    }
    Ok(false)
}

pub(super) fn descendants_step(
    store: &dyn FactStore,
    person: &Person,
) -> Result<BTreeSet<Person>, StorageError> {
    let mut out = store.children_of(person)?;
    out.extend(store.grandchildren_of(person)?);
    Ok(out)
}

/// Undirected neighbourhood used by relatedness.
pub(super) fn kin_step(
    store: &dyn FactStore,
    person: &Person,
) -> Result<BTreeSet<Person>, StorageError> {
    let mut out = store.parents_of(person)?;
    out.extend(store.children_of(person)?);
    out.extend(store.siblings_of(person)?);
    out.extend(store.piblings_of(person)?);
    out.extend(store.niblings_of(person)?);
    out.extend(store.grandparents_of(person)?);
    out.extend(store.grandchildren_of(person)?);
    Ok(out)
}
