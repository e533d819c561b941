//! Error types with secret-safe messages.
//!
//! No variant in this module carries the master password. Messages name the
//! failing step and, where relevant, the external program, but never the
//! argument vector that was passed to it.

use thiserror::Error;

/// Exit status used for validation, input, and configuration failures.
pub const EXIT_FAILURE: i32 = 1;

/// Exit status used when the external program could not be found.
pub const EXIT_NOT_FOUND: i32 = 127;

/// Exit status used when the external program exists but could not be started.
pub const EXIT_CANNOT_EXECUTE: i32 = 126;

/// Main error type for provisioning operations.
///
/// # Security
/// Error messages never include the master password or the full command line.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// The supplied password failed validation
    #[error("{message}")]
    Validation { message: String },

    /// The password line could not be read
    #[error("Failed to read input: {context}")]
    Input {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// The external cloud CLI could not be found or started
    #[error("Failed to launch '{program}': {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration or validation error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// I/O operation failed
    #[error("I/O operation failed: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// Serialization or deserialization failed
    #[error("Serialization failed: {context}")]
    Serialization {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience type alias for Results with ProvisionError
pub type Result<T> = std::result::Result<T, ProvisionError>;

impl ProvisionError {
    /// Creates a password validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Creates an input error with context
    pub fn input_failed(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Input {
            context: context.into(),
            source,
        }
    }

    /// Creates a launch error for the given program
    pub fn launch_failed(program: impl Into<String>, source: std::io::Error) -> Self {
        Self::Launch {
            program: program.into(),
            source,
        }
    }

    /// Creates a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Returns the process exit status this error maps to.
    ///
    /// A missing executable maps to 127 and an unstartable one to 126, the
    /// same codes a POSIX shell uses, so they never collide with the
    /// validation status of 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Launch { source, .. } if source.kind() == std::io::ErrorKind::NotFound => {
                EXIT_NOT_FOUND
            }
            Self::Launch { .. } => EXIT_CANNOT_EXECUTE,
            Self::Validation { .. }
            | Self::Input { .. }
            | Self::Configuration { .. }
            | Self::Io { .. }
            | Self::Serialization { .. } => EXIT_FAILURE,
        }
    }

    /// Returns true if this error was raised before the external program ran.
    pub fn is_pre_invocation(&self) -> bool {
        !matches!(self, Self::Launch { .. })
    }
}
