//! Thread-safe property storage
//!
//! Every read and write takes the store's lock for the duration of a single
//! map operation, so concurrent targets observe last-write-wins semantics.
//! Dynamic values are returned raw; expanding them is the job of
//! [`crate::expr::Evaluator`], which runs outside the lock.

use crate::error::{PropertyError, PropertyResult};
use crate::property::validate_property_name;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

/// The stored form of a property
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    /// A fixed value
    Static(String),

    /// Raw text re-expanded on every read
    Dynamic(String),
}

impl PropertyValue {
    /// The stored text, without expansion
    pub fn text(&self) -> &str {
        match self {
            PropertyValue::Static(text) | PropertyValue::Dynamic(text) => text,
        }
    }

    /// Whether the value is re-expanded on read
    pub fn is_dynamic(&self) -> bool {
        matches!(self, PropertyValue::Dynamic(_))
    }
}

/// How a property is declared
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyOptions {
    /// Reject later assignments
    pub read_only: bool,

    /// Store the text unexpanded and expand it on each read
    pub dynamic: bool,

    /// Replace an existing value; when false an existing property is kept
    pub overwrite: bool,
}

impl Default for PropertyOptions {
    fn default() -> Self {
        PropertyOptions {
            read_only: false,
            dynamic: false,
            overwrite: true,
        }
    }
}

impl PropertyOptions {
    /// Options for a read-only property
    pub fn read_only() -> Self {
        PropertyOptions {
            read_only: true,
            ..Self::default()
        }
    }

    /// Options for a dynamic property
    pub fn dynamic() -> Self {
        PropertyOptions {
            dynamic: true,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone)]
struct Entry {
    value: PropertyValue,
    read_only: bool,
}

/// Name to value mapping shared by all targets of a build
#[derive(Debug, Default)]
pub struct PropertyStore {
    entries: RwLock<HashMap<String, Entry>>,
}

impl PropertyStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare or assign a property.
    ///
    /// Returns `Ok(false)` when the assignment was ignored because the
    /// existing property is read-only, or exists and `overwrite` is off.
    /// A `None` value is rejected with [`PropertyError::NullValue`].
    pub fn define(
        &self,
        name: &str,
        value: Option<&str>,
        options: PropertyOptions,
    ) -> PropertyResult<bool> {
        validate_property_name(name)?;
        let value = value.ok_or_else(|| PropertyError::NullValue(name.to_string()))?;

        let mut entries = self.write();

        if let Some(existing) = entries.get(name) {
            if existing.read_only {
                debug!(property = name, "ignoring assignment to read-only property");
                return Ok(false);
            }
            if !options.overwrite {
                debug!(property = name, "property already set, not overwriting");
                return Ok(false);
            }
        }

        let value = if options.dynamic {
            PropertyValue::Dynamic(value.to_string())
        } else {
            PropertyValue::Static(value.to_string())
        };

        entries.insert(
            name.to_string(),
            Entry {
                value,
                read_only: options.read_only,
            },
        );

        Ok(true)
    }

    /// Assign a plain value
    pub fn set(&self, name: &str, value: impl AsRef<str>) -> PropertyResult<bool> {
        self.define(name, Some(value.as_ref()), PropertyOptions::default())
    }

    /// Assign a value that later assignments cannot change
    pub fn set_read_only(&self, name: &str, value: impl AsRef<str>) -> PropertyResult<bool> {
        self.define(name, Some(value.as_ref()), PropertyOptions::read_only())
    }

    /// Assign raw text to be expanded on every read
    pub fn set_dynamic(&self, name: &str, text: impl AsRef<str>) -> PropertyResult<bool> {
        self.define(name, Some(text.as_ref()), PropertyOptions::dynamic())
    }

    /// Get the stored value of a property without expanding it
    pub fn raw(&self, name: &str) -> Option<PropertyValue> {
        self.read().get(name).map(|entry| entry.value.clone())
    }

    /// Check if a property is set
    pub fn contains(&self, name: &str) -> bool {
        self.read().contains_key(name)
    }

    /// Check if a property is read-only
    pub fn is_read_only(&self, name: &str) -> bool {
        self.read().get(name).map(|e| e.read_only).unwrap_or(false)
    }

    /// Check if a property is dynamic
    pub fn is_dynamic(&self, name: &str) -> bool {
        self.read()
            .get(name)
            .map(|e| e.value.is_dynamic())
            .unwrap_or(false)
    }

    /// Remove a property, read-only or not. Returns whether it existed.
    pub fn remove(&self, name: &str) -> bool {
        self.write().remove(name).is_some()
    }

    /// All property names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of properties
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Entry>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Entry>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}
