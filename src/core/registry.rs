//! Field registry: which tokens exist and how each is resolved
//!
//! Built-in fields dispatch through [`Field`] with a single `match`; custom
//! fields are closures registered by name through [`FieldRegistryBuilder`].
//! Each entry carries its resolver and runtime classification together, so
//! every nameable field has exactly one of each. The registry is immutable
//! once built and is shared between loggers through `Arc`.

use super::error::{LoggerError, Result};
use super::field::Field;
use super::field_value::FieldValue;
use super::logger::Logger;
use super::record::Record;
use super::resolvers::resolve_builtin;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Resolver for a custom field
pub type FieldResolver = Arc<dyn Fn(&Logger, &Record) -> FieldValue + Send + Sync>;

/// A validated reference to a registered field
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldKey {
    Builtin(Field),
    Custom(Arc<str>),
}

impl FieldKey {
    pub fn name(&self) -> &str {
        match self {
            FieldKey::Builtin(field) => field.to_str(),
            FieldKey::Custom(name) => name,
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl From<Field> for FieldKey {
    fn from(field: Field) -> Self {
        FieldKey::Builtin(field)
    }
}

#[derive(Clone)]
struct CustomField {
    resolver: FieldResolver,
    requires_runtime: bool,
}

/// Registry of resolvable fields
#[derive(Clone, Default)]
pub struct FieldRegistry {
    custom: HashMap<Arc<str>, CustomField>,
}

impl FieldRegistry {
    /// Registry with the built-in fields only
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn builder() -> FieldRegistryBuilder {
        FieldRegistryBuilder::new()
    }

    /// Validate a token name against the registry
    pub fn lookup(&self, name: &str) -> Option<FieldKey> {
        if let Ok(field) = name.parse::<Field>() {
            return Some(FieldKey::Builtin(field));
        }
        self.custom
            .get_key_value(name)
            .map(|(key, _)| FieldKey::Custom(Arc::clone(key)))
    }

    pub fn supports_field(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Runtime classification of a token, `None` if the token is unknown
    pub fn requires_runtime(&self, name: &str) -> Option<bool> {
        self.lookup(name).map(|key| self.key_requires_runtime(&key))
    }

    pub fn key_requires_runtime(&self, key: &FieldKey) -> bool {
        match key {
            FieldKey::Builtin(field) => field.requires_runtime(),
            FieldKey::Custom(name) => self
                .custom
                .get(name)
                .is_some_and(|custom| custom.requires_runtime),
        }
    }

    /// Whether any of `names` needs the call site; unknown names count as no
    pub fn needs_runtime_capture<'a, I>(&self, names: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        names
            .into_iter()
            .any(|name| self.requires_runtime(name).unwrap_or(false))
    }

    /// Resolve a field by token name
    pub fn resolve(&self, name: &str, logger: &Logger, record: &Record) -> Result<FieldValue> {
        let key = self
            .lookup(name)
            .ok_or_else(|| LoggerError::unknown_field(name))?;
        Ok(self.resolve_key(&key, logger, record))
    }

    /// Resolve an already validated field
    ///
    /// A custom key that this registry does not know resolves to an empty
    /// string.
    pub fn resolve_key(&self, key: &FieldKey, logger: &Logger, record: &Record) -> FieldValue {
        match key {
            FieldKey::Builtin(field) => resolve_builtin(*field, logger, record),
            FieldKey::Custom(name) => match self.custom.get(name) {
                Some(custom) => (custom.resolver)(logger, record),
                None => FieldValue::Str(String::new()),
            },
        }
    }

    /// All token names, built-ins first, then custom fields in sorted order
    pub fn field_names(&self) -> Vec<&str> {
        let mut custom: Vec<&str> = self.custom.keys().map(|name| name.as_ref()).collect();
        custom.sort_unstable();

        Field::ALL
            .iter()
            .map(|field| -> &str { field.to_str() })
            .chain(custom)
            .collect()
    }
}

impl fmt::Debug for FieldRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut custom: Vec<(&str, bool)> = self
            .custom
            .iter()
            .map(|(name, field)| (name.as_ref(), field.requires_runtime))
            .collect();
        custom.sort_unstable();
        f.debug_struct("FieldRegistry")
            .field("custom", &custom)
            .finish()
    }
}

/// Builder for a [`FieldRegistry`] with custom fields
///
/// # Example
/// ```
/// use rust_logger_fields::prelude::*;
///
/// let registry = FieldRegistry::builder()
///     .custom_field("host", false, |_, _| FieldValue::from("web-01"))
///     .build()
///     .unwrap();
///
/// assert!(registry.supports_field("host"));
/// assert_eq!(registry.requires_runtime("host"), Some(false));
/// ```
#[derive(Default)]
pub struct FieldRegistryBuilder {
    custom: Vec<(String, CustomField)>,
}

impl FieldRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a custom field
    ///
    /// Set `requires_runtime` when the resolver reads the record's call-site
    /// fields, so emissions that use it capture the call site.
    #[must_use = "builder methods return a new value"]
    pub fn custom_field<F>(mut self, name: impl Into<String>, requires_runtime: bool, resolver: F) -> Self
    where
        F: Fn(&Logger, &Record) -> FieldValue + Send + Sync + 'static,
    {
        self.custom.push((
            name.into(),
            CustomField {
                resolver: Arc::new(resolver),
                requires_runtime,
            },
        ));
        self
    }

    /// Build the registry
    ///
    /// Fails if a custom name is empty, shadows a built-in field, or is
    /// registered twice.
    pub fn build(self) -> Result<FieldRegistry> {
        let mut custom: HashMap<Arc<str>, CustomField> = HashMap::with_capacity(self.custom.len());
        for (name, field) in self.custom {
            if name.is_empty() {
                return Err(LoggerError::config(
                    "FieldRegistry",
                    "custom field name must not be empty",
                ));
            }
            if name.parse::<Field>().is_ok() {
                return Err(LoggerError::config(
                    "FieldRegistry",
                    format!("custom field '{}' shadows a built-in field", name),
                ));
            }
            let name: Arc<str> = Arc::from(name);
            if custom.contains_key(&name) {
                return Err(LoggerError::config(
                    "FieldRegistry",
                    format!("custom field '{}' registered twice", name),
                ));
            }
            custom.insert(name, field);
        }
        Ok(FieldRegistry { custom })
    }
}
