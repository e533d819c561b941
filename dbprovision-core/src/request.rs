//! The `rds create-db-cluster` invocation built from config and password.

use crate::config::ProvisionConfig;
use crate::error::Result;
use crate::security::{MasterPassword, REDACTED};
use std::fmt;

/// Flag that precedes the password in the argument vector.
pub const PASSWORD_FLAG: &str = "--master-user-password";

/// Immutable record of everything the cloud CLI receives.
///
/// Arguments borrow from the request, so the password is never copied into
/// intermediate buffers before reaching the child process.
#[derive(Clone)]
pub struct ProvisionRequest {
    config: ProvisionConfig,
    password: MasterPassword,
}

impl ProvisionRequest {
    /// Pairs a validated config with the master password.
    ///
    /// # Errors
    /// Returns a configuration error if `config` fails validation.
    pub fn new(config: ProvisionConfig, password: MasterPassword) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, password })
    }

    /// The executable to launch.
    pub fn program(&self) -> &str {
        &self.config.cli_program
    }

    /// The fixed provisioning parameters.
    pub fn config(&self) -> &ProvisionConfig {
        &self.config
    }

    /// Argument vector in the order the cloud CLI expects.
    pub fn args(&self) -> Vec<&str> {
        self.build_args(self.password.expose())
    }

    /// Argument vector with the password replaced by [`REDACTED`].
    pub fn redacted_args(&self) -> Vec<&str> {
        self.build_args(REDACTED)
    }

    /// Full command line with the password redacted, for logs and dry runs.
    pub fn redacted_command_line(&self) -> String {
        let mut line = self.program().to_string();
        for arg in self.redacted_args() {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }

    fn build_args<'a>(&'a self, password: &'a str) -> Vec<&'a str> {
        let c = &self.config;
        vec![
            "--profile",
            c.profile.as_str(),
            "rds",
            "create-db-cluster",
            "--db-cluster-identifier",
            c.cluster_identifier.as_str(),
            "--engine",
            c.engine.as_str(),
            "--engine-version",
            c.engine_version.as_str(),
            "--master-username",
            c.master_username.as_str(),
            PASSWORD_FLAG,
            password,
            "--availability-zones",
            c.availability_zone.as_str(),
            "--database-name",
            c.database_name.as_str(),
        ]
    }
}

impl fmt::Debug for ProvisionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProvisionRequest")
            .field("config", &self.config)
            .field("password", &self.password)
            .finish()
    }
}
