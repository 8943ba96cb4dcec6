//! Structured error types shared across the generator crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`SnError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (identifiers, energies, etc.).
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

/// Canonical error type for the generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum SnError {
    /// Reaction identifier encode/decode failures.
    #[error("codec error: {0}")]
    Codec(ErrorInfo),
    /// No physically valid kinematic region for the requested sample.
    #[error("kinematics error: {0}")]
    Kinematics(ErrorInfo),
    /// Rejection sampling hit its iteration cap.
    #[error("envelope error: {0}")]
    Envelope(ErrorInfo),
    /// Invalid run configuration.
    #[error("config error: {0}")]
    Config(ErrorInfo),
    /// Invalid physics provider input (tables, parameters).
    #[error("model error: {0}")]
    Model(ErrorInfo),
    /// Filesystem failures.
    #[error("io error: {0}")]
    Io(ErrorInfo),
    /// Serialization and schema errors.
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

impl SnError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            SnError::Codec(info)
            | SnError::Kinematics(info)
            | SnError::Envelope(info)
            | SnError::Config(info)
            | SnError::Model(info)
            | SnError::Io(info)
            | SnError::Serde(info) => info,
        }
    }

    /// Whether the caller may skip the affected event and carry on.
    ///
    /// An exhausted envelope means the sampler itself is mistuned, so the run
    /// has to stop.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, SnError::Envelope(_))
    }
}

/// Wraps an I/O failure with the offending path.
pub fn io_error(path: &std::path::Path, err: std::io::Error) -> SnError {
    SnError::Io(ErrorInfo::new("io", err.to_string()).with_context("path", path.display().to_string()))
}
