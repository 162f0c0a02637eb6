//! Validation helpers shared by catalog entities.
//!
//! Constructors check every field of a draft before reporting, so callers can
//! surface the full set of violations in one response rather than fixing
//! fields one at a time.

use std::fmt;

use serde::Serialize;

/// A single field validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldViolation {
    field: &'static str,
    message: String,
}

impl FieldViolation {
    /// Record a violation against `field`.
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    /// The offending field path, such as `location.latitude`.
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Human-readable description of the failure.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validation errors returned by catalog entity constructors.
///
/// Carries every violation found in the rejected draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogValidationError {
    violations: Vec<FieldViolation>,
}

impl CatalogValidationError {
    pub(crate) fn new(violations: Vec<FieldViolation>) -> Self {
        Self { violations }
    }

    /// The collected field violations, in draft field order.
    pub fn violations(&self) -> &[FieldViolation] {
        self.violations.as_slice()
    }

    /// Consume the error, yielding its violations.
    pub fn into_violations(self) -> Vec<FieldViolation> {
        self.violations
    }
}

impl fmt::Display for CatalogValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation failed")?;
        for (index, violation) in self.violations.iter().enumerate() {
            let separator = if index == 0 { ": " } else { "; " };
            write!(f, "{separator}{violation}")?;
        }
        Ok(())
    }
}

impl std::error::Error for CatalogValidationError {}

/// Trim `value` and require a non-empty result.
pub(super) fn require_trimmed(value: &str, field: &'static str) -> Result<String, FieldViolation> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FieldViolation::new(field, format!("{field} must not be empty")));
    }
    Ok(trimmed.to_owned())
}

/// Trim an optional field, mapping a blank value to `None`.
pub(super) fn trim_optional(value: Option<String>) -> Option<String> {
    value.and_then(|text| {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_owned())
        }
    })
}
