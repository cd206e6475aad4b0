/// Per-field validation errors
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// What went wrong with a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldErrorKind {
    /// A required value is missing or blank
    Required,
    /// Text shorter than the minimum length
    TooShort,
    /// Number below the minimum
    TooSmall,
    /// Number above the maximum
    TooLarge,
    /// Text that should have been a whole number
    NotANumber,
    /// Text containing characters the field doesn't allow
    InvalidCharacters,
}

/// A single field's validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Failure category
    pub kind: FieldErrorKind,
    /// Human readable message, shown next to the form field
    pub message: String,
}

impl FieldError {
    /// Create a field error
    pub fn new(kind: FieldErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Mapping from an entity's field to its first validation failure
///
/// `F` is the per-entity field enum (`AlbumField`, `UserField`). Only the first
/// failure per field is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors<F: Ord>(BTreeMap<F, FieldError>);

impl<F: Ord> ValidationErrors<F> {
    /// Empty error set
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Record a failure for `field` unless one is already recorded
    pub fn add(&mut self, field: F, kind: FieldErrorKind, message: impl Into<String>) {
        self.0
            .entry(field)
            .or_insert_with(|| FieldError::new(kind, message));
    }

    /// Merge another error set into this one, keeping existing entries
    pub fn merge(&mut self, other: Self) {
        for (field, error) in other.0 {
            self.0.entry(field).or_insert(error);
        }
    }

    /// Error recorded for `field`, if any
    pub fn get(&self, field: &F) -> Option<&FieldError> {
        self.0.get(field)
    }

    /// True when no field failed
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of failing fields
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over failing fields in field order
    pub fn iter(&self) -> impl Iterator<Item = (&F, &FieldError)> {
        self.0.iter()
    }

    /// `Ok(())` when empty, otherwise `Err(self)`
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl<F: Ord> Default for ValidationErrors<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Ord + fmt::Debug> fmt::Display for ValidationErrors<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, error) in &self.0 {
            if !first {
                write!(f, ", ")?;
            }
            first = false;
            write!(f, "{:?}: {}", field, error.message)?;
        }
        Ok(())
    }
}
