//! Structured error types shared across gcool crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`VolError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (field names, offending values, etc.).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for the volume estimator.
///
/// Every fatal condition surfaces through one of these families; partial
/// volumes are never returned alongside an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum VolError {
    /// Configuration values outside their admissible range.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(ErrorInfo),
    /// Region or schedule too degenerate to define a volume.
    #[error("degenerate region: {0}")]
    DegenerateRegion(ErrorInfo),
    /// Division by zero or non-finite intermediate values.
    #[error("numeric instability: {0}")]
    NumericInstability(ErrorInfo),
    /// A sampler, schedule generator or rounding transform failed.
    #[error("collaborator failure: {0}")]
    Collaborator(ErrorInfo),
    /// Serialization and filesystem errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl VolError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            VolError::InvalidConfiguration(info)
            | VolError::DegenerateRegion(info)
            | VolError::NumericInstability(info)
            | VolError::Collaborator(info)
            | VolError::Serde(info) => info,
        }
    }

    /// Shorthand for an [`VolError::InvalidConfiguration`] naming the offending field.
    pub fn config(field: &str, message: impl Into<String>) -> Self {
        VolError::InvalidConfiguration(
            ErrorInfo::new("config-error", message).with_context("field", field),
        )
    }
}
