//! KinQL operation kinds and the normalized request.
//!
//! A [`Request`] is what the sentence matcher hands to the dispatcher: an
//! operation kind plus the ordered list of canonical names taken from the
//! sentence's name slots.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::person::{Gender, Person};

/// Whether an input line was a statement or a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    /// A statement (no `?`).
    Statement,
    /// A question (contains `?`).
    Question,
}

impl InputKind {
    /// Classifies a raw input line.
    #[must_use]
    pub fn of(line: &str) -> Self {
        if line.contains('?') {
            Self::Question
        } else {
            Self::Statement
        }
    }
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Statement => write!(f, "statement"),
            Self::Question => write!(f, "question"),
        }
    }
}

/// How many names an operation takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arity {
    /// Exactly this many names.
    Exact(usize),
    /// This many names or more.
    AtLeast(usize),
}

impl Arity {
    /// Does `count` satisfy this arity?
    #[must_use]
    pub const fn admits(self, count: usize) -> bool {
        match self {
            Self::Exact(n) => count == n,
            Self::AtLeast(n) => count >= n,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(n) => write!(f, "{n}"),
            Self::AtLeast(n) => write!(f, "at least {n}"),
        }
    }
}

/// Statement kinds, one per statement template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementKind {
    /// `X is the father of Y.`
    Father,
    /// `X is the mother of Y.`
    Mother,
    /// `X is a son of Y.`
    Son,
    /// `X is a daughter of Y.`
    Daughter,
    /// `X is a child of Y.`
    Child,
    /// `X is a brother of Y.`
    Brother,
    /// `X is a sister of Y.`
    Sister,
    /// `X and Y are siblings.`
    Siblings,
    /// `X and Y are the parents of Z.`
    Parents,
    /// `A, B and C are children of P.`
    Children,
    /// `X is a grandmother of Y.`
    Grandmother,
    /// `X is a grandfather of Y.`
    Grandfather,
    /// `X is an aunt of Y.`
    Aunt,
    /// `X is an uncle of Y.`
    Uncle,
}

impl StatementKind {
    /// Looks up the statement kind for a relationship keyword.
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Some(match keyword {
            "father" => Self::Father,
            "mother" => Self::Mother,
            "son" => Self::Son,
            "daughter" => Self::Daughter,
            "child" => Self::Child,
            "brother" => Self::Brother,
            "sister" => Self::Sister,
            "siblings" => Self::Siblings,
            "parents" => Self::Parents,
            "children" => Self::Children,
            "grandmother" => Self::Grandmother,
            "grandfather" => Self::Grandfather,
            "aunt" => Self::Aunt,
            "uncle" => Self::Uncle,
            _ => return None,
        })
    }

    /// The relationship keyword of this kind.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Father => "father",
            Self::Mother => "mother",
            Self::Son => "son",
            Self::Daughter => "daughter",
            Self::Child => "child",
            Self::Brother => "brother",
            Self::Sister => "sister",
            Self::Siblings => "siblings",
            Self::Parents => "parents",
            Self::Children => "children",
            Self::Grandmother => "grandmother",
            Self::Grandfather => "grandfather",
            Self::Aunt => "aunt",
            Self::Uncle => "uncle",
        }
    }

    /// Number of name slots.
    #[must_use]
    pub const fn arity(self) -> Arity {
        match self {
            Self::Parents => Arity::Exact(3),
            // Two or more children, then the parent.
            Self::Children => Arity::AtLeast(3),
            _ => Arity::Exact(2),
        }
    }
}

/// Yes/no question kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    /// `Is X the father of Y?`
    Father,
    /// `Is X the mother of Y?`
    Mother,
    /// `Is X a son of Y?`
    Son,
    /// `Is X a daughter of Y?`
    Daughter,
    /// `Is X a child of Y?`
    Child,
    /// `Is X a brother of Y?`
    Brother,
    /// `Is X a sister of Y?`
    Sister,
    /// `Are X and Y siblings?`
    Siblings,
    /// `Are X and Y the parents of Z?`
    Parents,
    /// `Are A, B and C children of P?`
    Children,
    /// `Is X a grandmother of Y?`
    Grandmother,
    /// `Is X a grandfather of Y?`
    Grandfather,
    /// `Is X an aunt of Y?`
    Aunt,
    /// `Is X an uncle of Y?`
    Uncle,
    /// `Are X and Y relatives?`
    Relatives,
}

impl QuestionKind {
    /// Looks up the question kind for a relationship keyword.
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        if keyword == "relatives" {
            return Some(Self::Relatives);
        }
        StatementKind::from_keyword(keyword).map(Self::from)
    }

    /// The relationship keyword of this kind.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Father => "father",
            Self::Mother => "mother",
            Self::Son => "son",
            Self::Daughter => "daughter",
            Self::Child => "child",
            Self::Brother => "brother",
            Self::Sister => "sister",
            Self::Siblings => "siblings",
            Self::Parents => "parents",
            Self::Children => "children",
            Self::Grandmother => "grandmother",
            Self::Grandfather => "grandfather",
            Self::Aunt => "aunt",
            Self::Uncle => "uncle",
            Self::Relatives => "relatives",
        }
    }

    /// Number of name slots.
    #[must_use]
    pub const fn arity(self) -> Arity {
        match self {
            Self::Parents => Arity::Exact(3),
            Self::Children => Arity::AtLeast(3),
            _ => Arity::Exact(2),
        }
    }
}

impl From<StatementKind> for QuestionKind {
    fn from(kind: StatementKind) -> Self {
        match kind {
            StatementKind::Father => Self::Father,
            StatementKind::Mother => Self::Mother,
            StatementKind::Son => Self::Son,
            StatementKind::Daughter => Self::Daughter,
            StatementKind::Child => Self::Child,
            StatementKind::Brother => Self::Brother,
            StatementKind::Sister => Self::Sister,
            StatementKind::Siblings => Self::Siblings,
            StatementKind::Parents => Self::Parents,
            StatementKind::Children => Self::Children,
            StatementKind::Grandmother => Self::Grandmother,
            StatementKind::Grandfather => Self::Grandfather,
            StatementKind::Aunt => Self::Aunt,
            StatementKind::Uncle => Self::Uncle,
        }
    }
}

/// Roles that `Who is/are the ... of X?` can enumerate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Siblings of X.
    Siblings,
    /// Brothers of X.
    Brothers,
    /// Sisters of X.
    Sisters,
    /// Parents of X.
    Parents,
    /// Mother of X.
    Mother,
    /// Father of X.
    Father,
    /// Children of X.
    Children,
    /// Sons of X.
    Sons,
    /// Daughters of X.
    Daughters,
    /// Grandparents of X.
    Grandparents,
    /// Grandmothers of X.
    Grandmothers,
    /// Grandfathers of X.
    Grandfathers,
    /// Aunts of X.
    Aunts,
    /// Uncles of X.
    Uncles,
}

impl Role {
    /// All roles, in template order.
    pub const ALL: [Self; 14] = [
        Self::Siblings,
        Self::Brothers,
        Self::Sisters,
        Self::Parents,
        Self::Mother,
        Self::Father,
        Self::Children,
        Self::Sons,
        Self::Daughters,
        Self::Grandparents,
        Self::Grandmothers,
        Self::Grandfathers,
        Self::Aunts,
        Self::Uncles,
    ];

    /// Looks up a role by the noun used in the question.
    #[must_use]
    pub fn from_noun(noun: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.noun() == noun)
    }

    /// The noun used in questions and answers.
    #[must_use]
    pub const fn noun(self) -> &'static str {
        match self {
            Self::Siblings => "siblings",
            Self::Brothers => "brothers",
            Self::Sisters => "sisters",
            Self::Parents => "parents",
            Self::Mother => "mother",
            Self::Father => "father",
            Self::Children => "children",
            Self::Sons => "sons",
            Self::Daughters => "daughters",
            Self::Grandparents => "grandparents",
            Self::Grandmothers => "grandmothers",
            Self::Grandfathers => "grandfathers",
            Self::Aunts => "aunts",
            Self::Uncles => "uncles",
        }
    }

    /// Singular roles are asked with `Who is the ...`.
    #[must_use]
    pub const fn is_singular(self) -> bool {
        matches!(self, Self::Mother | Self::Father)
    }

    /// Gender filter applied to the members of this role, if any.
    #[must_use]
    pub const fn gender(self) -> Option<Gender> {
        match self {
            Self::Brothers | Self::Father | Self::Sons | Self::Grandfathers | Self::Uncles => {
                Some(Gender::Male)
            }
            Self::Sisters | Self::Mother | Self::Daughters | Self::Grandmothers | Self::Aunts => {
                Some(Gender::Female)
            }
            Self::Siblings | Self::Parents | Self::Children | Self::Grandparents => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.noun())
    }
}

/// All supported KinQL operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "op", content = "kind", rename_all = "snake_case")]
pub enum Operation {
    /// Assert a statement into the knowledge base.
    Assert(StatementKind),

    /// Ask a yes/no question.
    Ask(QuestionKind),

    /// Enumerate everyone holding a role towards one person.
    Enumerate(Role),
}

impl Operation {
    /// Number of name slots.
    #[must_use]
    pub const fn arity(self) -> Arity {
        match self {
            Self::Assert(kind) => kind.arity(),
            Self::Ask(kind) => kind.arity(),
            Self::Enumerate(_) => Arity::Exact(1),
        }
    }

    /// Whether this operation came from a statement or a question.
    #[must_use]
    pub const fn input_kind(self) -> InputKind {
        match self {
            Self::Assert(_) => InputKind::Statement,
            Self::Ask(_) | Self::Enumerate(_) => InputKind::Question,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Assert(kind) => write!(f, "assert:{}", kind.keyword()),
            Self::Ask(kind) => write!(f, "ask:{}", kind.keyword()),
            Self::Enumerate(role) => write!(f, "who:{role}"),
        }
    }
}

/// A normalized request: operation plus canonical names in slot order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    /// The operation to execute.
    pub operation: Operation,

    /// Canonical names, in the order they appear in the sentence.
    pub names: Vec<Person>,
}

impl Request {
    /// Creates a new request.
    #[must_use]
    pub fn new(operation: Operation, names: Vec<Person>) -> Self {
        Self { operation, names }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_kind_of() {
        assert_eq!(InputKind::of("John is the father of Mary."), InputKind::Statement);
        assert_eq!(InputKind::of("Is John the father of Mary?"), InputKind::Question);
    }

    #[test]
    fn test_arity() {
        assert!(Arity::Exact(2).admits(2));
        assert!(!Arity::Exact(2).admits(3));
        assert!(Arity::AtLeast(3).admits(4));
        assert!(!Arity::AtLeast(3).admits(2));
        assert_eq!(Arity::AtLeast(3).to_string(), "at least 3");
    }

    #[test]
    fn test_keyword_round_trip() {
        for keyword in ["father", "son", "siblings", "children", "aunt"] {
            let kind = StatementKind::from_keyword(keyword).unwrap();
            assert_eq!(kind.keyword(), keyword);
            assert_eq!(QuestionKind::from(kind).keyword(), keyword);
        }
        assert_eq!(QuestionKind::from_keyword("relatives"), Some(QuestionKind::Relatives));
        assert_eq!(StatementKind::from_keyword("relatives"), None);
        assert_eq!(StatementKind::from_keyword("cousin"), None);
    }

    #[test]
    fn test_role_lookup_and_gender() {
        assert_eq!(Role::from_noun("sisters"), Some(Role::Sisters));
        assert_eq!(Role::from_noun("cousins"), None);
        assert!(Role::Father.is_singular());
        assert!(!Role::Parents.is_singular());
        assert_eq!(Role::Uncles.gender(), Some(Gender::Male));
        assert_eq!(Role::Grandparents.gender(), None);
    }

    #[test]
    fn test_operation_arity_and_kind() {
        assert_eq!(Operation::Enumerate(Role::Children).arity(), Arity::Exact(1));
        assert_eq!(Operation::Assert(StatementKind::Parents).arity(), Arity::Exact(3));
        assert_eq!(Operation::Ask(QuestionKind::Children).arity(), Arity::AtLeast(3));
        assert_eq!(Operation::Assert(StatementKind::Son).input_kind(), InputKind::Statement);
        assert_eq!(Operation::Enumerate(Role::Sons).input_kind(), InputKind::Question);
    }

    #[test]
    fn test_operation_serialization() {
        let op = Operation::Assert(StatementKind::Father);
        let json = serde_json::to_value(op).unwrap();
        assert_eq!(json, serde_json::json!({"op": "assert", "kind": "father"}));
    }
}
