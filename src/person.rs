//! Person identity and gender.
//!
//! A person has no materialized entity record: it exists as soon as a fact
//! mentions its canonical name. Canonicalization happens once, when a request
//! is built, so every other layer compares names with plain equality.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Maximum accepted length of a single name token.
pub const MAX_NAME_LEN: usize = 64;

/// A canonical person name (`"mARY"` becomes `"Mary"`).
///
/// Persons order alphabetically by their canonical name, which is the order
/// used by every enumeration answer.
///
/// # Examples
///
/// ```
/// use kinql::Person;
///
/// let p = Person::parse("  mARY ").unwrap();
/// assert_eq!(p.as_str(), "Mary");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Person(String);

impl Person {
    /// Parses and canonicalizes a raw name slot.
    ///
    /// A name is a single token that starts with a letter and otherwise holds
    /// letters, digits, `'` or `-`.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if trimmed.len() > MAX_NAME_LEN {
            return Err(ValidationError::FieldTooLong {
                field: "name".to_string(),
                max_length: MAX_NAME_LEN,
            });
        }

        let invalid = || ValidationError::InvalidName {
            name: trimmed.to_string(),
        };
        if !is_name_token(trimmed) {
            return Err(invalid());
        }

        // Case mapping can change the character set (`İ` lowercases to `i`
        // plus a combining dot), so the canonical form is checked again and
        // must map to itself.
        let canonical = capitalize(trimmed);
        if canonical.len() > MAX_NAME_LEN
            || !is_name_token(&canonical)
            || capitalize(&canonical) != canonical
        {
            return Err(invalid());
        }
        Ok(Self(canonical))
    }

    /// Returns the canonical name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_name_token(token: &str) -> bool {
    let mut chars = token.chars();
    chars.next().is_some_and(char::is_alphabetic)
        && chars.all(|c| c.is_alphanumeric() || c == '\'' || c == '-')
}

/// Lowercase everything, then uppercase the first character when it has a
/// single-character uppercase form (`ß` stays `ß`).
fn capitalize(token: &str) -> String {
    let lower = token.to_lowercase();
    let mut chars = lower.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let mut upper = first.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(head), None) => std::iter::once(head).chain(chars).collect(),
        _ => lower,
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Person {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Person> for String {
    fn from(person: Person) -> Self {
        person.0
    }
}

impl AsRef<str> for Person {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Recorded gender of a person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    /// Male.
    Male,
    /// Female.
    Female,
}

impl Gender {
    /// Returns the other gender.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Male => Self::Female,
            Self::Female => Self::Male,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Male => write!(f, "male"),
            Self::Female => write!(f, "female"),
        }
    }
}
