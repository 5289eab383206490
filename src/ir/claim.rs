//! Typed commands built from validated requests.
//!
//! A [`Claim`] is a relationship statement with its name slots bound to
//! roles. The same claim is either asserted (a statement) or checked (a
//! yes/no question), so both directions share one type.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::fact::Fact;
use crate::ir::operations::{Operation, QuestionKind, Request, Role, StatementKind};
use crate::person::{Gender, Person};

/// A relationship between named people.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "claim", rename_all = "snake_case")]
pub enum Claim {
    /// father / mother: `parent` is the gendered parent of `child`.
    Parent {
        /// The parent (subject).
        parent: Person,
        /// The child.
        child: Person,
        /// Gender of the parent.
        gender: Gender,
    },

    /// son / daughter / child: `child` is a child of `parent`.
    Offspring {
        /// The child (subject).
        child: Person,
        /// The parent.
        parent: Person,
        /// Gender of the child, `None` for plain "child".
        gender: Option<Gender>,
    },

    /// brother / sister / siblings.
    Sibling {
        /// The subject.
        subject: Person,
        /// The other sibling.
        other: Person,
        /// Gender of the subject, `None` for plain "siblings".
        gender: Option<Gender>,
    },

    /// `X and Y are the parents of Z`.
    Parents {
        /// The two parents.
        parents: [Person; 2],
        /// The child.
        child: Person,
    },

    /// `A, B and C are children of P`.
    Children {
        /// The children, in sentence order.
        children: Vec<Person>,
        /// The parent.
        parent: Person,
    },

    /// grandmother / grandfather.
    Grandparent {
        /// The grandparent (subject).
        grandparent: Person,
        /// The grandchild.
        grandchild: Person,
        /// Gender of the grandparent.
        gender: Gender,
    },

    /// aunt / uncle.
    Pibling {
        /// The aunt or uncle (subject).
        pibling: Person,
        /// The niece or nephew.
        nibling: Person,
        /// Gender of the aunt or uncle.
        gender: Gender,
    },
}

/// A question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "query", rename_all = "snake_case")]
pub enum Query {
    /// Does the claim hold?
    Holds(Claim),

    /// Are the two people related?
    Relatives {
        /// First person.
        a: Person,
        /// Second person.
        b: Person,
    },

    /// Who holds `role` towards `subject`?
    Who {
        /// The enumerated role.
        role: Role,
        /// The person the role is relative to.
        subject: Person,
    },
}

/// A validated, typed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    /// Assert a claim.
    Assert(Claim),
    /// Answer a query.
    Ask(Query),
}

fn arity_error(operation: Operation, actual: usize) -> ValidationError {
    ValidationError::WrongArity {
        operation: operation.to_string(),
        expected: operation.arity().to_string(),
        actual,
    }
}

fn two(operation: Operation, names: Vec<Person>) -> Result<(Person, Person), ValidationError> {
    let [x, y] = <[Person; 2]>::try_from(names).map_err(|n| arity_error(operation, n.len()))?;
    Ok((x, y))
}

impl Claim {
    fn bind(
        operation: Operation,
        kind: StatementKind,
        mut names: Vec<Person>,
    ) -> Result<Self, ValidationError> {
        let claim = match kind {
            StatementKind::Parents => {
                let [first, second, child] = <[Person; 3]>::try_from(names)
                    .map_err(|n| arity_error(operation, n.len()))?;
                Self::Parents {
                    parents: [first, second],
                    child,
                }
            }
            StatementKind::Children => {
                let count = names.len();
                match names.pop() {
                    Some(parent) if count >= 3 => Self::Children {
                        children: names,
                        parent,
                    },
                    _ => return Err(arity_error(operation, count)),
                }
            }
            StatementKind::Father => {
                let (parent, child) = two(operation, names)?;
                Self::Parent {
                    parent,
                    child,
                    gender: Gender::Male,
                }
            }
            StatementKind::Mother => {
                let (parent, child) = two(operation, names)?;
                Self::Parent {
                    parent,
                    child,
                    gender: Gender::Female,
                }
            }
            StatementKind::Son | StatementKind::Daughter | StatementKind::Child => {
                let (child, parent) = two(operation, names)?;
                let gender = match kind {
                    StatementKind::Son => Some(Gender::Male),
                    StatementKind::Daughter => Some(Gender::Female),
                    _ => None,
                };
                Self::Offspring {
                    child,
                    parent,
                    gender,
                }
            }
            StatementKind::Brother | StatementKind::Sister | StatementKind::Siblings => {
                let (subject, other) = two(operation, names)?;
                let gender = match kind {
                    StatementKind::Brother => Some(Gender::Male),
                    StatementKind::Sister => Some(Gender::Female),
                    _ => None,
                };
                Self::Sibling {
                    subject,
                    other,
                    gender,
                }
            }
            StatementKind::Grandmother | StatementKind::Grandfather => {
                let (grandparent, grandchild) = two(operation, names)?;
                Self::Grandparent {
                    grandparent,
                    grandchild,
                    gender: if kind == StatementKind::Grandfather {
                        Gender::Male
                    } else {
                        Gender::Female
                    },
                }
            }
            StatementKind::Aunt | StatementKind::Uncle => {
                let (pibling, nibling) = two(operation, names)?;
                Self::Pibling {
                    pibling,
                    nibling,
                    gender: if kind == StatementKind::Uncle {
                        Gender::Male
                    } else {
                        Gender::Female
                    },
                }
            }
        };
        Ok(claim)
    }

    /// Every name slot of the claim, in sentence order.
    #[must_use]
    pub fn names(&self) -> Vec<&Person> {
        match self {
            Self::Parent { parent, child, .. } => vec![parent, child],
            Self::Offspring { child, parent, .. } => vec![child, parent],
            Self::Sibling { subject, other, .. } => vec![subject, other],
            Self::Parents { parents, child } => vec![&parents[0], &parents[1], child],
            Self::Children { children, parent } => {
                children.iter().chain(std::iter::once(parent)).collect()
            }
            Self::Grandparent {
                grandparent,
                grandchild,
                ..
            } => vec![grandparent, grandchild],
            Self::Pibling {
                pibling, nibling, ..
            } => vec![pibling, nibling],
        }
    }

    /// The first person named more than once, if any.
    #[must_use]
    pub fn repeated_person(&self) -> Option<&Person> {
        let mut seen = HashSet::new();
        self.names().into_iter().find(|p| !seen.insert(*p))
    }

    /// The gender-qualified subject of the claim, if the claim names a
    /// gendered role.
    #[must_use]
    pub fn gendered_subject(&self) -> Option<(&Person, Gender)> {
        match self {
            Self::Parent { parent, gender, .. } => Some((parent, *gender)),
            Self::Offspring { child, gender, .. } => gender.map(|g| (child, g)),
            Self::Sibling {
                subject, gender, ..
            } => gender.map(|g| (subject, g)),
            Self::Grandparent {
                grandparent,
                gender,
                ..
            } => Some((grandparent, *gender)),
            Self::Pibling {
                pibling, gender, ..
            } => Some((pibling, *gender)),
            Self::Parents { .. } | Self::Children { .. } => None,
        }
    }

    /// The primitive facts asserting this claim records.
    #[must_use]
    pub fn facts(&self) -> Vec<Fact> {
        let mut facts = Vec::new();
        if let Some((subject, gender)) = self.gendered_subject() {
            facts.push(Fact::gender(subject, gender));
        }
        match self {
            Self::Parent { parent, child, .. } | Self::Offspring { child, parent, .. } => {
                facts.push(Fact::parent(parent, child));
            }
            Self::Sibling { subject, other, .. } => {
                facts.push(Fact::sibling(subject, other));
            }
            Self::Parents { parents, child } => {
                facts.extend(parents.iter().map(|p| Fact::parent(p, child)));
            }
            Self::Children { children, parent } => {
                facts.extend(children.iter().map(|c| Fact::parent(parent, c)));
            }
            Self::Grandparent {
                grandparent,
                grandchild,
                ..
            } => facts.push(Fact::grandparent(grandparent, grandchild)),
            Self::Pibling {
                pibling, nibling, ..
            } => facts.push(Fact::pibling(pibling, nibling)),
        }
        facts
    }
}

impl TryFrom<Request> for Command {
    type Error = ValidationError;

    fn try_from(request: Request) -> Result<Self, Self::Error> {
        request.validate()?;
        let Request { operation, names } = request;
        Ok(match operation {
            Operation::Assert(kind) => Self::Assert(Claim::bind(operation, kind, names)?),
            Operation::Ask(QuestionKind::Relatives) => {
                let (a, b) = two(operation, names)?;
                Self::Ask(Query::Relatives { a, b })
            }
            Operation::Ask(kind) => {
                let statement = StatementKind::from_keyword(kind.keyword())
                    .ok_or(ValidationError::UnrecognizedInput)?;
                Self::Ask(Query::Holds(Claim::bind(operation, statement, names)?))
            }
            Operation::Enumerate(role) => {
                let [subject] = <[Person; 1]>::try_from(names)
                    .map_err(|n| arity_error(operation, n.len()))?;
                Self::Ask(Query::Who { role, subject })
            }
        })
    }
}
