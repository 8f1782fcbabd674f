//! Status-code ignore directives.
//!
//! An ignore directive removes a status code from coverage accounting. Two
//! shapes are understood:
//!
//! - an exact integer, e.g. `429`
//! - a class keyed by its leading digit, e.g. `5XX` (any three-digit code
//!   starting with `5`)
//!
//! Anything else is dropped without complaint. Directives arrive as free text
//! and may pack several tokens into one string (`"429, 5XX"`).

use crate::endpoint::StatusCode;
use serde::Serialize;
use std::collections::BTreeSet;

/// Directives applied when the caller supplies none
pub const DEFAULT_IGNORE_PATTERNS: [&str; 2] = ["429", "5XX"];

/// Parsed set of ignore rules
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IgnoreRuleSet {
    codes: BTreeSet<i64>,
    classes: BTreeSet<char>,
}

impl IgnoreRuleSet {
    /// Parse directives; each string may hold several comma/space separated tokens
    pub fn new<I, S>(directives: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut rules = Self::default();
        for directive in directives {
            for token in split_patterns(directive.as_ref()) {
                rules.add_token(token);
            }
        }
        rules
    }

    /// Rules for [`DEFAULT_IGNORE_PATTERNS`]
    #[must_use]
    pub fn default_rules() -> Self {
        Self::new(DEFAULT_IGNORE_PATTERNS)
    }

    /// Register one atomic token. Returns false when the token was dropped.
    fn add_token(&mut self, token: &str) -> bool {
        if let Ok(code) = token.parse::<i64>() {
            self.codes.insert(code);
            return true;
        }
        match class_key(token) {
            Some(digit) => {
                self.classes.insert(digit);
                true
            }
            None => false,
        }
    }

    /// Whether `code` is excluded from coverage accounting
    #[must_use]
    pub fn is_ignored(&self, code: StatusCode) -> bool {
        self.matches(i64::from(code))
    }

    /// Membership test over arbitrary integers.
    ///
    /// Class rules only ever match values that render as exactly three
    /// characters with a digit first, so negatives and values above 999 can
    /// only be caught by an exact rule.
    #[must_use]
    pub fn matches(&self, code: i64) -> bool {
        if self.codes.contains(&code) {
            return true;
        }
        let rendered = code.to_string();
        rendered.len() == 3
            && rendered
                .chars()
                .next()
                .is_some_and(|first| self.classes.contains(&first))
    }

    /// Exact codes, ascending
    pub fn exact_codes(&self) -> impl Iterator<Item = i64> + '_ {
        self.codes.iter().copied()
    }

    /// Class keys (leading digits), ascending
    pub fn classes(&self) -> impl Iterator<Item = char> + '_ {
        self.classes.iter().copied()
    }

    /// Whether no rule was registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty() && self.classes.is_empty()
    }
}

/// `5XX` → `Some('5')`
fn class_key(token: &str) -> Option<char> {
    let mut chars = token.chars();
    let first = chars.next()?;
    if first.is_ascii_digit() && chars.as_str() == "XX" {
        Some(first)
    } else {
        None
    }
}

/// Split a directive string on commas and whitespace, skipping empty pieces
pub fn split_patterns(directive: &str) -> impl Iterator<Item = &str> {
    directive
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
}

/// Flatten directive strings into the individual tokens shown in reports
pub fn flatten_patterns<I, S>(directives: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    directives
        .into_iter()
        .flat_map(|directive| {
            split_patterns(directive.as_ref())
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect()
}
