//! Glob-style name patterns for selecting views and columns
//!
//! `*` and `%` match any run of characters (including none), `?` matches
//! exactly one character. Matching is anchored and case-sensitive.

use crate::view::{ColumnRef, ViewId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A glob-style name pattern
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pattern(String);

impl Pattern {
    /// Create a pattern from its textual form
    pub fn new(pattern: impl Into<String>) -> Self {
        Self(pattern.into())
    }

    /// Pattern matching every name
    pub fn any() -> Self {
        Self("*".to_string())
    }

    /// Textual form of the pattern
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check whether `text` matches this pattern
    pub fn matches(&self, text: &str) -> bool {
        if self.0.is_empty() {
            return true;
        }
        glob_match(&self.0, text)
    }
}

impl Default for Pattern {
    fn default() -> Self {
        Self::any()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Pattern {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Pattern {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Wildcard matcher with single-star backtracking
fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();

    let (mut p, mut t) = (0, 0);
    // Position of the last star seen and the text position it was tried at
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        match pattern.get(p) {
            Some('*') | Some('%') => {
                backtrack = Some((p, t));
                p += 1;
            }
            Some('?') => {
                p += 1;
                t += 1;
            }
            Some(&c) if c == text[t] => {
                p += 1;
                t += 1;
            }
            _ => match backtrack {
                Some((star_p, star_t)) => {
                    p = star_p + 1;
                    t = star_t + 1;
                    backtrack = Some((star_p, star_t + 1));
                }
                None => return false,
            },
        }
    }

    pattern[p..].iter().all(|c| matches!(c, '*' | '%'))
}

/// Selects catalog objects by package, object name and suffix
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ViewFilter {
    /// Package pattern
    #[serde(default)]
    pub package: Pattern,

    /// Object name pattern
    #[serde(default)]
    pub object: Pattern,

    /// Object suffix pattern
    #[serde(default)]
    pub suffix: Pattern,
}

impl ViewFilter {
    /// Create a new view filter
    pub fn new(package: impl Into<Pattern>, object: impl Into<Pattern>, suffix: impl Into<Pattern>) -> Self {
        Self {
            package: package.into(),
            object: object.into(),
            suffix: suffix.into(),
        }
    }

    /// Check whether a view identity matches all three patterns
    pub fn matches(&self, id: &ViewId) -> bool {
        self.package.matches(&id.package_id)
            && self.object.matches(&id.object_name)
            && self.suffix.matches(&id.object_suffix)
    }
}

impl fmt::Display for ViewFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}.{}", self.package, self.object, self.suffix)
    }
}

/// Selects base columns by schema, table and column name
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ColumnFilter {
    /// Schema pattern
    #[serde(default)]
    pub schema: Pattern,

    /// Table pattern
    #[serde(default)]
    pub table: Pattern,

    /// Column pattern
    #[serde(default)]
    pub column: Pattern,
}

impl ColumnFilter {
    /// Create a new column filter
    pub fn new(schema: impl Into<Pattern>, table: impl Into<Pattern>, column: impl Into<Pattern>) -> Self {
        Self {
            schema: schema.into(),
            table: table.into(),
            column: column.into(),
        }
    }

    /// Check whether a column reference matches all three patterns
    pub fn matches(&self, column: &ColumnRef) -> bool {
        self.schema.matches(&column.schema_name)
            && self.table.matches(&column.table_name)
            && self.column.matches(&column.column_name)
    }
}
