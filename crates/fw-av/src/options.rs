//! Ordered encoder options.

use std::fmt;

/// An ordered list of `-name [value]` encoder options.
///
/// Insertion order is preserved in the rendered arguments. Setting a name
/// that is already present replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionList {
    entries: Vec<(String, Option<String>)>,
}

impl OptionList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `-name value`.
    pub fn set(mut self, name: &str, value: impl fmt::Display) -> Self {
        self.insert(name, Some(value.to_string()));
        self
    }

    /// Set a valueless `-name` flag.
    pub fn flag(mut self, name: &str) -> Self {
        self.insert(name, None);
        self
    }

    fn insert(&mut self, name: &str, value: Option<String>) {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name.to_string(), value)),
        }
    }

    /// Look up an option. `Some(None)` is a flag.
    pub fn get(&self, name: &str) -> Option<Option<&str>> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_deref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_deref()))
    }

    /// Flatten into argv form: `["-name", "value", "-flag", ...]`.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(self.entries.len() * 2);
        for (name, value) in &self.entries {
            args.push(format!("-{name}"));
            if let Some(value) = value {
                args.push(value.clone());
            }
        }
        args
    }
}
