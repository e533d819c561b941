//! Core library for dbprovision.
//!
//! Provisions a managed database cluster by prompting for a master password
//! and handing it, together with fixed deployment parameters, to the cloud
//! CLI's `rds create-db-cluster` command.
//!
//! # Security Guarantees
//! - The master password is never logged, printed, or placed in errors
//! - Terminal input is read with echo disabled
//! - Password memory is zeroed on drop
//!
//! # Architecture
//! - `config`: named provisioning parameters with defaults and overrides
//! - `security`: password validation and input channels
//! - `request`: the argument vector for the cloud CLI
//! - `invoker`: the single-shot state machine and the process runner seam

pub mod config;
pub mod error;
pub mod invoker;
pub mod logging;
pub mod request;
pub mod security;

// Re-export commonly used types
pub use config::{ConfigOverrides, ProvisionConfig};
pub use error::{ProvisionError, Result};
pub use invoker::{
    CommandRunner, ExitOutcome, InvocationOutcome, Invoker, InvokerState, SystemRunner,
    exit_code_for,
};
pub use logging::init_logging;
pub use request::ProvisionRequest;
pub use security::{MasterPassword, PasswordSource};
