//! Immutable case-insensitive allow-lists (cities, product types, roles)

use std::collections::HashMap;

/// Set-membership lookup built once at startup.
///
/// Matching ignores ASCII case and surrounding whitespace. A match returns the
/// configured spelling so stored values stay canonical.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowList {
    entries: HashMap<String, String>,
}

impl AllowList {
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries = values
            .into_iter()
            .map(|v| v.as_ref().trim().to_string())
            .filter(|v| !v.is_empty())
            .map(|v| (v.to_lowercase(), v))
            .collect();
        Self { entries }
    }

    /// Parse a comma-separated list
    pub fn parse(csv: &str) -> Self {
        Self::new(csv.split(','))
    }

    /// Configured spelling of `value`, if allowed
    pub fn canonical(&self, value: &str) -> Option<&str> {
        self.entries
            .get(&value.trim().to_lowercase())
            .map(String::as_str)
    }

    pub fn contains(&self, value: &str) -> bool {
        self.canonical(value).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
