//! Field cleaning shared by the create routes.
//!
//! Strings are trimmed before they are checked and are stored trimmed.

use regex::Regex;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::sync::LazyLock;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

/// Trimmed value, or `None` when missing or blank.
pub fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Text field that treats any non-string JSON value as absent, so a mistyped
/// required field gets the same message as a missing one.
pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email)
}

/// Length check in characters, not bytes.
pub fn has_min_chars(value: &str, min: usize) -> bool {
    value.chars().count() >= min
}

/// Roles and tags arrive either as a JSON array or as the comma separated
/// text the add forms produce.
#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum StringList {
    List(Vec<String>),
    Csv(String),
}

impl StringList {
    /// Trim every entry and drop the empty ones.
    pub fn clean(self) -> Vec<String> {
        let raw: Vec<String> = match self {
            StringList::List(items) => items,
            StringList::Csv(text) => text.split(',').map(str::to_string).collect(),
        };
        raw.into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Entries of an optional list; absent or `null` is empty.
    pub fn clean_optional(list: Option<StringList>) -> Vec<String> {
        list.map(StringList::clean).unwrap_or_default()
    }
}
