//! Command dispatcher for KinQL requests.
//!
//! [`KinEngine`] is the single entry point that turns a [`Request`] into a
//! [`Response`]. It owns the fact store through a shared handle; clones share
//! the same store and commit lock.

use std::sync::{Arc, Mutex};

use tracing::{debug, error, info, warn};

use crate::conflict::Conflict;
use crate::consistency::{Plan, Validator};
use crate::derivation::Derivation;
use crate::error::SeedError;
use crate::ir::{Claim, Command, Query, Request};
use crate::response::{Enumeration, Response};
use crate::seed::Snapshot;
use crate::storage::{FactStore, InMemoryFactStore, StorageError};

fn lock_err(context: &'static str) -> StorageError {
    StorageError::BackendError(format!("poisoned lock: {context}"))
}

/// KinQL execution engine.
#[derive(Clone)]
pub struct KinEngine {
    store: Arc<dyn FactStore>,
    commit_lock: Arc<Mutex<()>>,
}

impl Default for KinEngine {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl KinEngine {
    /// Create a new engine over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn FactStore>) -> Self {
        Self {
            store,
            commit_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Create an engine over an empty in-memory store.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryFactStore::new()))
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &dyn FactStore {
        self.store.as_ref()
    }

    /// Dispatch a request. Never fails: malformed requests and storage
    /// failures are reported as responses.
    pub fn dispatch(&self, request: Request) -> Response {
        let operation = request.operation;
        let command = match Command::try_from(request) {
            Ok(command) => command,
            Err(err) => {
                warn!(%operation, error = %err, "malformed request");
                return Response::Malformed(operation.input_kind());
            }
        };

        match self.execute(&command) {
            Ok(response) => response,
            Err(err) => {
                error!(%operation, error = %err, "storage failure");
                match &command {
                    Command::Assert(_) => Response::Rejected(Conflict::Internal {
                        reason: err.to_string(),
                    }),
                    Command::Ask(query) => unanswered(query),
                }
            }
        }
    }

    /// Execute a validated command.
    pub fn execute(&self, command: &Command) -> Result<Response, StorageError> {
        match command {
            Command::Assert(claim) => self.assert(claim),
            Command::Ask(query) => self.ask(query),
        }
    }

    /// Validate `claim` and commit its facts, or report the conflict.
    ///
    /// Validation and commit happen under the engine's commit lock, and the
    /// planned facts go to the store as one batch. A rejected claim or a failed
    /// commit leaves the store untouched.
    pub fn assert(&self, claim: &Claim) -> Result<Response, StorageError> {
        let _guard = self
            .commit_lock
            .lock()
            .map_err(|_| lock_err("engine.commit"))?;

        match Validator::new(self.store()).plan(claim)? {
            Plan::Reject(conflict) => {
                info!(kind = conflict.kind(), %conflict, "statement rejected");
                Ok(Response::Rejected(conflict))
            }
            Plan::Commit(facts) => {
                let inserted = self.store.assert_facts(&facts)?;
                debug!(facts = facts.len(), inserted, "statement committed");
                Ok(Response::Accepted)
            }
        }
    }

    /// Answer a question. Questions never write.
    pub fn ask(&self, query: &Query) -> Result<Response, StorageError> {
        let derive = Derivation::new(self.store());
        Ok(match query {
            Query::Holds(claim) => Response::YesNo(derive.holds(claim)?),
            Query::Relatives { a, b } => Response::YesNo(derive.related(a, b)?),
            Query::Who { role, subject } => Response::Enumeration(Enumeration {
                role: *role,
                subject: subject.clone(),
                members: derive.members(*role, subject)?.into_iter().collect(),
            }),
        })
    }

    /// Load the facts of `snapshot`, checking each one as the matching
    /// statement would be checked. Stops at the first conflicting fact;
    /// facts before it stay recorded.
    ///
    /// Returns the number of newly recorded facts.
    pub fn seed(&self, snapshot: &Snapshot) -> Result<usize, SeedError> {
        let _guard = self
            .commit_lock
            .lock()
            .map_err(|_| lock_err("engine.seed"))?;

        let validator = Validator::new(self.store());
        let mut inserted = 0usize;
        for fact in &snapshot.facts {
            if let Some(conflict) = validator.check_fact(fact)? {
                info!(kind = conflict.kind(), %fact, %conflict, "seed fact rejected");
                return Err(SeedError::Conflict {
                    fact: fact.clone(),
                    conflict,
                });
            }
            if self.store.assert_fact(fact)? {
                inserted += 1;
            }
        }
        info!(
            facts = snapshot.len(),
            inserted,
            recorded_through = ?snapshot.recorded_through,
            "seed loaded"
        );
        Ok(inserted)
    }

    /// Capture the current primitive facts.
    pub fn snapshot(&self) -> Result<Snapshot, StorageError> {
        Snapshot::from_store(self.store())
    }
}

/// The answer given when the store could not be read: nothing is known.
fn unanswered(query: &Query) -> Response {
    match query {
        Query::Holds(_) | Query::Relatives { .. } => Response::YesNo(false),
        Query::Who { role, subject } => Response::Enumeration(Enumeration {
            role: *role,
            subject: subject.clone(),
            members: Vec::new(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fact::Fact;
    use crate::ir::{InputKind, Operation, QuestionKind, Role, StatementKind};
    use crate::person::{Gender, Person};

    fn p(name: &str) -> Person {
        Person::parse(name).unwrap()
    }

    fn request(operation: Operation, names: &[&str]) -> Request {
        Request::new(operation, names.iter().map(|n| p(n)).collect())
    }

    fn tell(engine: &KinEngine, kind: StatementKind, names: &[&str]) -> Response {
        engine.dispatch(request(Operation::Assert(kind), names))
    }

    fn ask(engine: &KinEngine, kind: QuestionKind, names: &[&str]) -> Response {
        engine.dispatch(request(Operation::Ask(kind), names))
    }

    /// A store whose every call fails, as after lock poisoning.
    struct BrokenStore;

    macro_rules! broken {
        ($($name:ident($($arg:ident: $ty:ty),*) -> $ret:ty;)*) => {
            $(fn $name(&self, $(_: $ty),*) -> Result<$ret, StorageError> {
                Err(StorageError::BackendError("poisoned lock: test".to_string()))
            })*
        };
    }

    impl FactStore for BrokenStore {
        broken! {
            assert_gender(person: &Person, gender: Gender) -> bool;
            assert_parent(parent: &Person, child: &Person) -> bool;
            assert_sibling(a: &Person, b: &Person) -> bool;
            assert_pibling(pibling: &Person, nibling: &Person) -> bool;
            assert_grandparent(grandparent: &Person, grandchild: &Person) -> bool;
            assert_facts(facts: &[Fact]) -> usize;
            gender_of(person: &Person) -> Option<Gender>;
            is_parent(parent: &Person, child: &Person) -> bool;
            is_sibling(a: &Person, b: &Person) -> bool;
            is_pibling(pibling: &Person, nibling: &Person) -> bool;
            is_grandparent(grandparent: &Person, grandchild: &Person) -> bool;
            parents_of(child: &Person) -> std::collections::BTreeSet<Person>;
            children_of(parent: &Person) -> std::collections::BTreeSet<Person>;
            siblings_of(person: &Person) -> std::collections::BTreeSet<Person>;
            piblings_of(nibling: &Person) -> std::collections::BTreeSet<Person>;
            niblings_of(pibling: &Person) -> std::collections::BTreeSet<Person>;
            grandparents_of(grandchild: &Person) -> std::collections::BTreeSet<Person>;
            grandchildren_of(grandparent: &Person) -> std::collections::BTreeSet<Person>;
            len() -> usize;
            records() -> Vec<crate::fact::FactRecord>;
        }
    }

    #[test]
    fn test_accept_then_answer() {
        let engine = KinEngine::in_memory();
        assert_eq!(tell(&engine, StatementKind::Father, &["john", "mary"]), Response::Accepted);
        assert_eq!(ask(&engine, QuestionKind::Father, &["john", "mary"]), Response::YesNo(true));
        assert_eq!(ask(&engine, QuestionKind::Mother, &["john", "mary"]), Response::YesNo(false));
    }

    #[test]
    fn test_rejection_leaves_store_unchanged() {
        let engine = KinEngine::in_memory();
        tell(&engine, StatementKind::Father, &["john", "mary"]);
        let before = engine.store().len().unwrap();

        let response = tell(&engine, StatementKind::Mother, &["john", "sue"]);
        assert!(response.is_rejected());
        assert_eq!(engine.store().len().unwrap(), before);
        assert!(!engine.store().is_parent(&p("john"), &p("sue")).unwrap());
    }

    #[test]
    fn test_wrong_arity_is_malformed() {
        let engine = KinEngine::in_memory();
        let response = tell(&engine, StatementKind::Parents, &["tom", "ann"]);
        assert_eq!(response, Response::Malformed(InputKind::Statement));

        let response = engine.dispatch(request(Operation::Enumerate(Role::Sons), &[]));
        assert_eq!(response, Response::Malformed(InputKind::Question));
    }

    #[test]
    fn test_enumeration_is_sorted() {
        let engine = KinEngine::in_memory();
        tell(&engine, StatementKind::Children, &["clara", "anna", "bella", "diana"]);
        let response = engine.dispatch(request(Operation::Enumerate(Role::Children), &["diana"]));
        assert_eq!(response.to_string(), "The children of Diana are: Anna, Bella, Clara.");
    }

    /// Reads go to an in-memory store; batch commits always fail.
    struct FailingCommits(InMemoryFactStore);

    macro_rules! delegate {
        ($($name:ident($($arg:ident: $ty:ty),*) -> $ret:ty;)*) => {
            $(fn $name(&self, $($arg: $ty),*) -> Result<$ret, StorageError> {
                self.0.$name($($arg),*)
            })*
        };
    }

    impl FactStore for FailingCommits {
        delegate! {
            assert_gender(person: &Person, gender: Gender) -> bool;
            assert_parent(parent: &Person, child: &Person) -> bool;
            assert_sibling(a: &Person, b: &Person) -> bool;
            assert_pibling(pibling: &Person, nibling: &Person) -> bool;
            assert_grandparent(grandparent: &Person, grandchild: &Person) -> bool;
            gender_of(person: &Person) -> Option<Gender>;
            is_parent(parent: &Person, child: &Person) -> bool;
            is_sibling(a: &Person, b: &Person) -> bool;
            is_pibling(pibling: &Person, nibling: &Person) -> bool;
            is_grandparent(grandparent: &Person, grandchild: &Person) -> bool;
            parents_of(child: &Person) -> std::collections::BTreeSet<Person>;
            children_of(parent: &Person) -> std::collections::BTreeSet<Person>;
            siblings_of(person: &Person) -> std::collections::BTreeSet<Person>;
            piblings_of(nibling: &Person) -> std::collections::BTreeSet<Person>;
            niblings_of(pibling: &Person) -> std::collections::BTreeSet<Person>;
            grandparents_of(grandchild: &Person) -> std::collections::BTreeSet<Person>;
            grandchildren_of(grandparent: &Person) -> std::collections::BTreeSet<Person>;
            len() -> usize;
            records() -> Vec<crate::fact::FactRecord>;
        }

        fn assert_facts(&self, _: &[Fact]) -> Result<usize, StorageError> {
            Err(StorageError::BackendError("disk full".to_string()))
        }
    }

    #[test]
    fn test_storage_failure_rejects_statements() {
        let engine = KinEngine::new(Arc::new(BrokenStore));
        let response = tell(&engine, StatementKind::Father, &["john", "mary"]);
        assert!(matches!(response, Response::Rejected(Conflict::Internal { .. })));
        assert_eq!(response.to_string(), "That's impossible!");
    }

    #[test]
    fn test_storage_failure_leaves_questions_unanswered() {
        let engine = KinEngine::new(Arc::new(BrokenStore));
        let response = ask(&engine, QuestionKind::Relatives, &["john", "mary"]);
        assert_eq!(response, Response::YesNo(false));

        let response = engine.dispatch(request(Operation::Enumerate(Role::Father), &["mary"]));
        assert_eq!(response.to_string(), "I don't know who the father of Mary is.");
        let response = engine.dispatch(request(Operation::Enumerate(Role::Children), &["tom"]));
        assert_eq!(response.to_string(), "I don't know the children of Tom.");
    }

    #[test]
    fn test_failed_commit_records_nothing() {
        let store = FailingCommits(InMemoryFactStore::new());
        store.assert_parent(&p("tom"), &p("ann")).unwrap();
        let engine = KinEngine::new(Arc::new(store));

        let response = tell(&engine, StatementKind::Children, &["bob", "cy", "tom"]);
        assert!(matches!(response, Response::Rejected(Conflict::Internal { .. })));
        assert_eq!(engine.store().len().unwrap(), 1);
        assert!(engine.store().children_of(&p("tom")).unwrap().contains(&p("ann")));
        assert!(!engine.store().is_parent(&p("tom"), &p("bob")).unwrap());
    }

    #[test]
    fn test_clones_share_the_store() {
        let engine = KinEngine::in_memory();
        let clone = engine.clone();
        tell(&clone, StatementKind::Siblings, &["ann", "bob"]);
        assert!(engine.store().is_sibling(&p("bob"), &p("ann")).unwrap());
    }

    #[test]
    fn test_seed_and_snapshot() {
        let engine = KinEngine::in_memory();
        let snapshot = Snapshot::new(vec![
            Fact::gender(&p("tom"), Gender::Male),
            Fact::parent(&p("tom"), &p("ann")),
            Fact::sibling(&p("ann"), &p("bob")),
        ]);
        assert_eq!(engine.seed(&snapshot).unwrap(), 3);
        let taken = engine.snapshot().unwrap();
        assert_eq!(taken.facts, snapshot.facts);
        assert!(taken.recorded_through.is_some());
    }

    #[test]
    fn test_conflicting_seed_fact_aborts() {
        let engine = KinEngine::in_memory();
        let snapshot = Snapshot::new(vec![
            Fact::parent(&p("tom"), &p("ann")),
            Fact::parent(&p("ann"), &p("tom")),
        ]);
        let err = engine.seed(&snapshot).unwrap_err();
        assert!(matches!(
            err,
            SeedError::Conflict {
                conflict: Conflict::AncestryCycle { .. },
                ..
            }
        ));
    }
}
