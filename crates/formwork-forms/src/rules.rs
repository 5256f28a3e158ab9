//! The built-in rule vocabulary.
//!
//! Record attributes declare their rules as a comma-separated list
//! (`"required,min=3,max=20"`). [`parse_rule_list`] turns that list into
//! [`Rule`] values once, when the record's schema is compiled; malformed
//! lists are schema errors, never per-request failures.

use std::fmt;
use std::str::FromStr;

use formwork_core::{FormError, MessageSettings};

/// A single built-in validation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Fails iff the value is empty.
    Required,
    /// Fails iff the value has fewer than `N` characters.
    Min(usize),
    /// Fails iff the value has more than `N` characters.
    Max(usize),
    /// Fails iff the value does not contain `@`.
    ///
    /// Intentionally weak: full address validation is the caller's concern.
    Email,
}

impl Rule {
    /// Returns `true` if `value` satisfies this rule.
    pub fn check(&self, value: &str) -> bool {
        match *self {
            Self::Required => !value.is_empty(),
            Self::Min(n) => value.chars().count() >= n,
            Self::Max(n) => value.chars().count() <= n,
            Self::Email => value.contains('@'),
        }
    }

    /// Returns the numeric bound carried by `min=N` / `max=N`.
    pub const fn bound(&self) -> Option<usize> {
        match *self {
            Self::Min(n) | Self::Max(n) => Some(n),
            Self::Required | Self::Email => None,
        }
    }

    /// Returns the generic message template for this rule.
    pub fn default_message<'a>(&self, messages: &'a MessageSettings) -> &'a str {
        match self {
            Self::Required => &messages.required,
            Self::Min(_) => &messages.min_length,
            Self::Max(_) => &messages.max_length,
            Self::Email => &messages.email,
        }
    }

    /// Renders the error text reported when this rule fails.
    ///
    /// `declared` is the attribute's own message template, if any; the
    /// generic template from `messages` is used otherwise. The rule's bound
    /// replaces a `{}` placeholder.
    pub fn message(&self, declared: Option<&str>, messages: &MessageSettings) -> String {
        let template = declared.unwrap_or_else(|| self.default_message(messages));
        match self.bound() {
            Some(bound) => template.replace("{}", &bound.to_string()),
            None => template.to_string(),
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required => write!(f, "required"),
            Self::Min(n) => write!(f, "min={n}"),
            Self::Max(n) => write!(f, "max={n}"),
            Self::Email => write!(f, "email"),
        }
    }
}

impl FromStr for Rule {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.split_once('=') {
            Some((name, bound)) => {
                let bound: usize = bound.trim().parse().map_err(|_| {
                    FormError::Schema(format!("Rule '{s}' has a non-numeric bound"))
                })?;
                match name.trim() {
                    "min" => Ok(Self::Min(bound)),
                    "max" => Ok(Self::Max(bound)),
                    other => Err(FormError::Schema(format!("Unknown rule '{other}'"))),
                }
            }
            None => match s {
                "required" => Ok(Self::Required),
                "email" => Ok(Self::Email),
                "min" | "max" => Err(FormError::Schema(format!("Rule '{s}' requires a bound"))),
                other => Err(FormError::Schema(format!("Unknown rule '{other}'"))),
            },
        }
    }
}

/// Parses a comma-separated rule list, preserving declaration order.
///
/// Empty entries (e.g. a trailing comma) are ignored.
///
/// # Examples
///
/// ```
/// use formwork_forms::rules::{parse_rule_list, Rule};
///
/// let rules = parse_rule_list("required, min=3").unwrap();
/// assert_eq!(rules, vec![Rule::Required, Rule::Min(3)]);
/// ```
pub fn parse_rule_list(list: &str) -> Result<Vec<Rule>, FormError> {
    list.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::parse)
        .collect()
}
