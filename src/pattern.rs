//! Sentence templates.
//!
//! [`SentenceMatcher`] turns one line of restricted English into a
//! [`Request`]. Relationship keywords are matched literally and are
//! case-sensitive; name slots are free text that must canonicalize to a
//! single-word [`Person`]. Lines containing `?` are matched against the
//! question templates, everything else against the statement templates.
//!
//! Arity is not checked here: a children list with a single name still
//! produces a request, and the dispatcher reports it as malformed.

use regex::{Captures, Regex};
use thiserror::Error;

use crate::error::{KinResult, ValidationError};
use crate::ir::{InputKind, Operation, QuestionKind, Request, Role, StatementKind};
use crate::person::Person;

/// A line that could not be turned into a request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid {kind}: {error}")]
pub struct PatternError {
    /// Statement or question, by the presence of `?`.
    pub kind: InputKind,
    /// What went wrong.
    pub error: ValidationError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Form {
    Assert,
    Ask,
    Who,
}

#[derive(Debug)]
struct Template {
    regex: Regex,
    form: Form,
    /// Keyword for templates without a `kw` group.
    keyword: Option<&'static str>,
}

const STATEMENTS: &[(&str, Option<&str>)] = &[
    (r"^(?P<a>.+?) and (?P<b>.+?) are siblings\.?$", Some("siblings")),
    (
        r"^(?P<a>.+?) and (?P<b>.+?) are the parents of (?P<c>.+?)\.?$",
        Some("parents"),
    ),
    (r"^(?P<list>.+?) are children of (?P<c>.+?)\.?$", Some("children")),
    (r"^(?P<a>.+?) is the (?P<kw>father|mother) of (?P<b>.+?)\.?$", None),
    (
        r"^(?P<a>.+?) is a (?P<kw>son|daughter|child|brother|sister|grandmother|grandfather) of (?P<b>.+?)\.?$",
        None,
    ),
    (r"^(?P<a>.+?) is an (?P<kw>aunt|uncle) of (?P<b>.+?)\.?$", None),
];

const QUESTIONS: &[(&str, Option<&str>)] = &[
    (r"^Are (?P<a>.+?) and (?P<b>.+?) (?P<kw>siblings|relatives)\?$", None),
    (
        r"^Are (?P<a>.+?) and (?P<b>.+?) the parents of (?P<c>.+?)\?$",
        Some("parents"),
    ),
    (r"^Are (?P<list>.+?) children of (?P<c>.+?)\?$", Some("children")),
    (r"^Is (?P<a>.+?) the (?P<kw>mother|father) of (?P<b>.+?)\?$", None),
    (
        r"^Is (?P<a>.+?) a (?P<kw>sister|brother|grandmother|grandfather|daughter|son|child) of (?P<b>.+?)\?$",
        None,
    ),
    (r"^Is (?P<a>.+?) an (?P<kw>aunt|uncle) of (?P<b>.+?)\?$", None),
];

const WHO: &[&str] = &[
    r"^Who is the (?P<kw>mother|father) of (?P<a>.+?)\?$",
    r"^Who are the (?P<kw>siblings|sisters|brothers|parents|daughters|sons|children|grandparents|grandmothers|grandfathers|aunts|uncles) of (?P<a>.+?)\?$",
];

/// Compiled sentence templates.
#[derive(Debug)]
pub struct SentenceMatcher {
    statements: Vec<Template>,
    questions: Vec<Template>,
}

impl SentenceMatcher {
    /// Compile every template.
    pub fn new() -> KinResult<Self> {
        let compile = |form: Form, (pattern, keyword): (&str, Option<&'static str>)| {
            Ok::<_, regex::Error>(Template {
                regex: Regex::new(pattern)?,
                form,
                keyword,
            })
        };

        let statements = STATEMENTS
            .iter()
            .map(|&t| compile(Form::Assert, t))
            .collect::<Result<Vec<_>, _>>()?;
        let questions = QUESTIONS
            .iter()
            .map(|&t| compile(Form::Ask, t))
            .chain(WHO.iter().map(|&p| compile(Form::Who, (p, None))))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            statements,
            questions,
        })
    }

    /// Parse one input line.
    pub fn parse(&self, line: &str) -> Result<Request, PatternError> {
        let line = line.trim();
        let kind = InputKind::of(line);
        let templates = match kind {
            InputKind::Statement => &self.statements,
            InputKind::Question => &self.questions,
        };

        let fail = |error| PatternError { kind, error };

        for template in templates {
            let Some(caps) = template.regex.captures(line) else {
                continue;
            };
            let operation = template
                .operation(&caps)
                .ok_or_else(|| fail(ValidationError::UnrecognizedInput))?;
            let names = slots(&caps).map_err(fail)?;
            return Ok(Request::new(operation, names));
        }
        Err(fail(ValidationError::UnrecognizedInput))
    }
}

impl Template {
    fn operation(&self, caps: &Captures<'_>) -> Option<Operation> {
        let keyword = match self.keyword {
            Some(keyword) => keyword,
            None => caps.name("kw")?.as_str(),
        };
        match self.form {
            Form::Assert => StatementKind::from_keyword(keyword).map(Operation::Assert),
            Form::Ask => QuestionKind::from_keyword(keyword).map(Operation::Ask),
            Form::Who => Role::from_noun(keyword).map(Operation::Enumerate),
        }
    }
}

/// Names in sentence order: the list (if any), then slots `a`, `b`, `c`.
fn slots(caps: &Captures<'_>) -> Result<Vec<Person>, ValidationError> {
    let mut names = Vec::new();
    if let Some(list) = caps.name("list") {
        for raw in split_list(list.as_str()) {
            names.push(Person::parse(raw)?);
        }
    }
    for slot in ["a", "b", "c"] {
        if let Some(raw) = caps.name(slot) {
            names.push(Person::parse(raw.as_str())?);
        }
    }
    Ok(names)
}

/// Split `A, B and C` into its names.
fn split_list(list: &str) -> Vec<&str> {
    list.split(" and ")
        .flat_map(|part| part.split(", "))
        .collect()
}
