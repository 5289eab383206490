//! Responses to one input line and their rendering.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::conflict::Conflict;
use crate::ir::{InputKind, Role};
use crate::person::Person;

/// Everyone found holding a role towards a subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enumeration {
    /// The enumerated role.
    pub role: Role,
    /// The person the role is relative to.
    pub subject: Person,
    /// Members in sorted order, without duplicates.
    pub members: Vec<Person>,
}

impl fmt::Display for Enumeration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            role,
            subject,
            members,
        } = self;
        let names: Vec<&str> = members.iter().map(Person::as_str).collect();

        match (role.is_singular(), names.is_empty()) {
            (true, true) => write!(f, "I don't know who the {role} of {subject} is."),
            (true, false) => write!(f, "The {role} of {subject} is {}.", names.join(" and ")),
            (false, true) => write!(f, "I don't know the {role} of {subject}."),
            (false, false) => write!(f, "The {role} of {subject} are: {}.", names.join(", ")),
        }
    }
}

/// Outcome of dispatching one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "response", content = "body", rename_all = "snake_case")]
pub enum Response {
    /// The statement was recorded (or was already known).
    Accepted,
    /// The statement contradicts the knowledge base.
    Rejected(Conflict),
    /// Answer to a yes/no question.
    YesNo(bool),
    /// Answer to a `Who ...` question.
    Enumeration(Enumeration),
    /// The input did not fit any sentence pattern.
    Malformed(InputKind),
}

impl Response {
    /// The knowledge base was left unchanged because of a conflict.
    #[must_use]
    pub const fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accepted => f.write_str("OK! I learned something."),
            Self::Rejected(_) => f.write_str("That's impossible!"),
            Self::YesNo(true) => f.write_str("Yes!"),
            Self::YesNo(false) => f.write_str("No!"),
            Self::Enumeration(enumeration) => write!(f, "{enumeration}"),
            Self::Malformed(kind) => {
                write!(f, "Invalid {kind}. Please follow the sentence patterns.")
            }
        }
    }
}
