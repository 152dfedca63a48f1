//! Validated field lists and their resolved values

use super::error::{LoggerError, Result};
use super::field::Field;
use super::field_value::FieldValue;
use super::registry::{FieldKey, FieldRegistry};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;

/// Ordered list of fields requested by one format
///
/// Validation happens once, when the set is parsed, so unknown tokens are a
/// configuration error rather than a per-emission one. Whether the set needs
/// the call site is computed at the same time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSet {
    keys: Vec<FieldKey>,
    needs_runtime: bool,
}

impl FieldSet {
    /// Validate `names` against `registry`, keeping their order
    ///
    /// # Example
    /// ```
    /// use rust_logger_fields::prelude::*;
    ///
    /// let registry = FieldRegistry::new();
    /// let fields = FieldSet::parse(&registry, ["time", "levelname", "message"]).unwrap();
    /// assert!(!fields.needs_runtime());
    ///
    /// assert!(FieldSet::parse(&registry, ["time", "colour"]).is_err());
    /// ```
    pub fn parse<'a, I>(registry: &FieldRegistry, names: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let keys = names
            .into_iter()
            .map(|name| {
                registry
                    .lookup(name)
                    .ok_or_else(|| LoggerError::unknown_field(name))
            })
            .collect::<Result<Vec<_>>>()?;
        let needs_runtime = keys.iter().any(|key| registry.key_requires_runtime(key));
        Ok(Self {
            keys,
            needs_runtime,
        })
    }

    /// Field set made of built-in fields only
    pub fn builtin(fields: &[Field]) -> Self {
        Self {
            keys: fields.iter().copied().map(FieldKey::Builtin).collect(),
            needs_runtime: fields.iter().any(Field::requires_runtime),
        }
    }

    pub fn keys(&self) -> &[FieldKey] {
        &self.keys
    }

    /// Whether emitting with this set must capture the call site
    pub fn needs_runtime(&self) -> bool {
        self.needs_runtime
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.keys.iter().any(|key| key.name() == name)
    }
}

/// Field values of one emission, in the order the field set requested them
///
/// Handed to the formatter. Serializes as a JSON object and displays as
/// space-separated `key=value` pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFields {
    entries: Vec<(FieldKey, FieldValue)>,
}

impl ResolvedFields {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Value already resolved for `key` in this emission
    pub(crate) fn find(&self, key: &FieldKey) -> Option<&FieldValue> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    pub(crate) fn push(&mut self, key: FieldKey, value: FieldValue) {
        self.entries.push((key, value));
    }

    /// First value for the token `name`
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.entries
            .iter()
            .find(|(key, _)| key.name() == name)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(key, value)| (key.name(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First occurrence of each token, in request order
    fn unique_entries(&self) -> impl Iterator<Item = &(FieldKey, FieldValue)> {
        self.entries.iter().enumerate().filter_map(move |(index, entry)| {
            let repeated = self.entries[..index].iter().any(|(key, _)| *key == entry.0);
            (!repeated).then_some(entry)
        })
    }

    /// Convert to a JSON object; a repeated token keeps a single entry
    pub fn to_json(&self) -> serde_json::Value {
        let map = self
            .unique_entries()
            .map(|(key, value)| (key.name().to_string(), value.to_json_value()))
            .collect::<serde_json::Map<_, _>>();
        serde_json::Value::Object(map)
    }

    /// Serialize to a JSON string
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Format fields as key=value pairs
    pub fn format_fields(&self) -> String {
        self.iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Serialize for ResolvedFields {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let unique = self.unique_entries().count();
        let mut map = serializer.serialize_map(Some(unique))?;
        for (key, value) in self.unique_entries() {
            map.serialize_entry(key.name(), value)?;
        }
        map.end()
    }
}

impl fmt::Display for ResolvedFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_fields())
    }
}
