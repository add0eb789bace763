// models/src/errors.rs

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub use thiserror::Error;

/// A single local validation failure, raised before anything is sent.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("{0} must be a number")]
    NotANumber(&'static str),
    #[error("{field} is out of range: {detail}")]
    OutOfRange { field: &'static str, detail: String },
    #[error("{field}: {message}")]
    Invalid { field: &'static str, message: String },
}

impl ValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::Required(field) | ValidationError::NotANumber(field) => *field,
            ValidationError::OutOfRange { field, .. } | ValidationError::Invalid { field, .. } => *field,
        }
    }
}

/// Per-field errors of a form, keyed by field name. The first error recorded
/// for a field wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, ValidationError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: ValidationError) {
        self.0.entry(error.field()).or_insert(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&ValidationError> {
        self.0.get(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.values()
    }

    /// `Ok(value)` when nothing was recorded.
    pub fn into_result<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }

    /// Records `Required` when `value` is blank and returns the trimmed value.
    pub fn require<'a>(&mut self, field: &'static str, value: &'a str) -> &'a str {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            self.push(ValidationError::Required(field));
        }
        trimmed
    }

    /// Parses a required numeric input, recording the failure if any.
    pub fn number<T: FromStr>(&mut self, field: &'static str, value: &str) -> Option<T> {
        let trimmed = self.require(field, value);
        if trimmed.is_empty() {
            return None;
        }
        match trimmed.parse::<T>() {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                self.push(ValidationError::NotANumber(field));
                None
            }
        }
    }

    /// Parses an optional numeric input; blank is `None` without error.
    pub fn optional_number<T: FromStr>(&mut self, field: &'static str, value: &str) -> Option<T> {
        if value.trim().is_empty() {
            return None;
        }
        self.number(field, value)
    }
}

impl From<ValidationError> for FieldErrors {
    fn from(error: ValidationError) -> Self {
        let mut errors = FieldErrors::new();
        errors.push(error);
        errors
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let messages: Vec<String> = self.0.values().map(|e| e.to_string()).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for FieldErrors {}

pub type ValidationResult<T> = Result<T, FieldErrors>;
