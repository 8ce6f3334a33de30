use std::collections::BTreeMap;

use serde::Serialize;

use super::field::{Field, Step};

/// Field-scoped validation messages. An empty message means the field was
/// validated and is currently clean; a missing entry means it has never been
/// validated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ErrorMap {
    entries: BTreeMap<Field, String>,
}

impl ErrorMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.entries.insert(field, message.into());
    }

    /// Resets the stored message for `field` to the empty string.
    pub fn clear(&mut self, field: Field) {
        self.entries.insert(field, String::new());
    }

    /// Raw entry, `None` when the field has not been validated yet.
    pub fn entry(&self, field: Field) -> Option<&str> {
        self.entries.get(&field).map(String::as_str)
    }

    /// Non-empty message for `field`, if any.
    pub fn message(&self, field: Field) -> Option<&str> {
        self.entry(field).filter(|message| !message.is_empty())
    }

    pub fn contains(&self, field: Field) -> bool {
        self.entries.contains_key(&field)
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.entries.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when every entry holds the empty string.
    pub fn is_clean(&self) -> bool {
        self.entries.values().all(String::is_empty)
    }

    /// Fields that currently carry a message, in field order.
    pub fn failures(&self) -> impl Iterator<Item = (Field, &str)> + '_ {
        self.entries
            .iter()
            .filter(|(_, message)| !message.is_empty())
            .map(|(field, message)| (*field, message.as_str()))
    }

    /// Replaces the entries belonging to `step` with those in `result`.
    /// Entries of other steps are left untouched.
    pub fn merge_step(&mut self, step: Step, result: &ErrorMap) {
        for field in step.fields() {
            let message = result.entry(*field).unwrap_or_default();
            self.entries.insert(*field, message.to_string());
        }
    }
}

impl FromIterator<(Field, String)> for ErrorMap {
    fn from_iter<T: IntoIterator<Item = (Field, String)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
