//! Error taxonomy for the generation pipeline.
//!
//! Errors fall into three groups:
//!
//! - **Recoverable** - [`GenerationError::EntityNotFound`] and
//!   [`GenerationError::Introspection`]. The orchestrator continues with a
//!   degraded descriptor and records a warning.
//! - **Artifact-local** - [`GenerationError::TemplateNotFound`],
//!   [`GenerationError::TemplateUnreadable`] and [`GenerationError::Write`].
//!   The failing artifact is reported as failed; its siblings in the same
//!   plan are still rendered and written.
//! - **Invocation-fatal** - everything else. These abort before any file is
//!   touched.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Errors produced while generating artifacts for an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// Bad input shape: malformed entity identifier, unsupported artifact kind
    Validation {
        /// Human-readable description of the rejected input
        message: String,
    },
    /// The metadata source has no entity for the identifier
    EntityNotFound {
        /// The identifier that could not be resolved
        entity: String,
    },
    /// Structural metadata exists but could not be read
    Introspection {
        /// The entity being described
        entity: String,
        /// Underlying cause
        message: String,
    },
    /// A remote metadata source did not answer within the configured timeout
    IntrospectionTimeout {
        /// The entity being described
        entity: String,
        /// The timeout that elapsed
        timeout: Duration,
    },
    /// Contradictory feature toggles, caught before any I/O
    Configuration {
        /// Which toggles contradict each other
        message: String,
    },
    /// A template id resolved neither in the override directory nor in the bundled set
    TemplateNotFound {
        /// The template id that was requested
        template: String,
    },
    /// An override template exists but could not be read
    TemplateUnreadable {
        /// The template id that was requested
        template: String,
        /// Path of the override file
        path: PathBuf,
        /// Underlying I/O error
        message: String,
    },
    /// Filesystem failure while persisting an artifact
    Write {
        /// Target path of the failed write
        path: PathBuf,
        /// Underlying I/O error
        message: String,
    },
    /// Two planned artifacts resolve to the same target path
    PathConflict {
        /// The contested path
        path: PathBuf,
        /// Description of the first claimant
        first: String,
        /// Description of the second claimant
        second: String,
    },
    /// Cancellation was requested between stages
    Cancelled,
}

impl GenerationError {
    /// Shorthand for a [`GenerationError::Validation`]
    pub fn validation(message: impl Into<String>) -> Self {
        GenerationError::Validation {
            message: message.into(),
        }
    }

    /// Shorthand for a [`GenerationError::Configuration`]
    pub fn configuration(message: impl Into<String>) -> Self {
        GenerationError::Configuration {
            message: message.into(),
        }
    }

    /// Shorthand for a [`GenerationError::Write`] built from an I/O error
    pub fn write(path: impl Into<PathBuf>, err: impl fmt::Display) -> Self {
        GenerationError::Write {
            path: path.into(),
            message: err.to_string(),
        }
    }

    /// Whether generation may continue with a degraded descriptor.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            GenerationError::EntityNotFound { .. } | GenerationError::Introspection { .. }
        )
    }

    /// Whether the error only invalidates the artifact it occurred on.
    pub fn is_artifact_local(&self) -> bool {
        matches!(
            self,
            GenerationError::TemplateNotFound { .. }
                | GenerationError::TemplateUnreadable { .. }
                | GenerationError::Write { .. }
        )
    }

    /// Short machine-friendly name of the error kind, used in reports.
    pub fn kind(&self) -> &'static str {
        match self {
            GenerationError::Validation { .. } => "ValidationError",
            GenerationError::EntityNotFound { .. } => "EntityNotFound",
            GenerationError::Introspection { .. } => "IntrospectionError",
            GenerationError::IntrospectionTimeout { .. } => "IntrospectionTimeout",
            GenerationError::Configuration { .. } => "ConfigurationError",
            GenerationError::TemplateNotFound { .. } => "TemplateNotFound",
            GenerationError::TemplateUnreadable { .. } => "TemplateUnreadable",
            GenerationError::Write { .. } => "WriteError",
            GenerationError::PathConflict { .. } => "PathConflictError",
            GenerationError::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationError::Validation { message } => {
                write!(f, "validation error: {message}")
            }
            GenerationError::EntityNotFound { entity } => {
                write!(f, "entity '{entity}' not found in the metadata source")
            }
            GenerationError::Introspection { entity, message } => {
                write!(f, "could not read structural metadata for '{entity}': {message}")
            }
            GenerationError::IntrospectionTimeout { entity, timeout } => {
                write!(
                    f,
                    "metadata source did not describe '{entity}' within {}ms",
                    timeout.as_millis()
                )
            }
            GenerationError::Configuration { message } => {
                write!(f, "configuration error: {message}")
            }
            GenerationError::TemplateNotFound { template } => {
                write!(
                    f,
                    "template '{template}' not found in the override directory or bundled defaults"
                )
            }
            GenerationError::TemplateUnreadable {
                template,
                path,
                message,
            } => {
                write!(
                    f,
                    "override for template '{template}' at {} could not be read: {message}",
                    path.display()
                )
            }
            GenerationError::Write { path, message } => {
                write!(f, "failed to write {}: {message}", path.display())
            }
            GenerationError::PathConflict {
                path,
                first,
                second,
            } => {
                write!(
                    f,
                    "path conflict: {first} and {second} both resolve to {}",
                    path.display()
                )
            }
            GenerationError::Cancelled => write!(f, "generation cancelled"),
        }
    }
}

impl std::error::Error for GenerationError {}
