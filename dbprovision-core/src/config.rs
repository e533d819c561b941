//! Fixed deployment configuration for cluster provisioning.
//!
//! Everything the cloud CLI needs except the master password lives here.
//! Defaults describe the staging Aurora PostgreSQL cluster; a JSON file and
//! per-field overrides can replace any of them.

use crate::error::{ProvisionError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default cloud CLI executable.
pub const DEFAULT_CLI_PROGRAM: &str = "aws";
/// Default named credential profile.
pub const DEFAULT_PROFILE: &str = "delphis";
/// Default cluster identifier.
pub const DEFAULT_CLUSTER_IDENTIFIER: &str = "chatham-staging-aurora-pgsql";
/// Default database engine.
pub const DEFAULT_ENGINE: &str = "aurora-postgresql";
/// Default engine version.
pub const DEFAULT_ENGINE_VERSION: &str = "11.6";
/// Default master username.
pub const DEFAULT_MASTER_USERNAME: &str = "postgres";
/// Default availability zone.
pub const DEFAULT_AVAILABILITY_ZONE: &str = "us-west-2a";
/// Default initial database name.
pub const DEFAULT_DATABASE_NAME: &str = "chatham";

/// Provisioning parameters passed verbatim to the cloud CLI.
///
/// Missing fields in a config file fall back to the defaults above.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProvisionConfig {
    /// Cloud CLI executable, resolved through `PATH` when not absolute
    pub cli_program: String,
    /// Named credential profile configured for the cloud CLI
    pub profile: String,
    /// Cluster identifier
    pub cluster_identifier: String,
    /// Database engine name
    pub engine: String,
    /// Engine version string
    pub engine_version: String,
    /// Master username
    pub master_username: String,
    /// Availability zone code
    pub availability_zone: String,
    /// Name of the initial database
    pub database_name: String,
}

impl Default for ProvisionConfig {
    fn default() -> Self {
        Self {
            cli_program: DEFAULT_CLI_PROGRAM.to_string(),
            profile: DEFAULT_PROFILE.to_string(),
            cluster_identifier: DEFAULT_CLUSTER_IDENTIFIER.to_string(),
            engine: DEFAULT_ENGINE.to_string(),
            engine_version: DEFAULT_ENGINE_VERSION.to_string(),
            master_username: DEFAULT_MASTER_USERNAME.to_string(),
            availability_zone: DEFAULT_AVAILABILITY_ZONE.to_string(),
            database_name: DEFAULT_DATABASE_NAME.to_string(),
        }
    }
}

/// Optional per-field replacements, typically collected from CLI flags.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub cli_program: Option<String>,
    pub profile: Option<String>,
    pub cluster_identifier: Option<String>,
    pub engine: Option<String>,
    pub engine_version: Option<String>,
    pub master_username: Option<String>,
    pub availability_zone: Option<String>,
    pub database_name: Option<String>,
}

impl ProvisionConfig {
    /// Creates a new config with the built-in defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a config from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ProvisionError::Serialization {
            context: "Invalid provisioning config".to_string(),
            source: e,
        })
    }

    /// Loads a config from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ProvisionError::Io {
            context: format!("Failed to read config file {}", path.display()),
            source: e,
        })?;
        let config = Self::from_json_str(&contents)?;
        tracing::debug!("Loaded provisioning config from {}", path.display());
        Ok(config)
    }

    /// Builder method to set the cloud CLI executable.
    pub fn with_cli_program(mut self, program: impl Into<String>) -> Self {
        self.cli_program = program.into();
        self
    }

    /// Builder method to set the credential profile.
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = profile.into();
        self
    }

    /// Builder method to set the cluster identifier.
    pub fn with_cluster_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.cluster_identifier = identifier.into();
        self
    }

    /// Builder method to set the engine name.
    pub fn with_engine(mut self, engine: impl Into<String>) -> Self {
        self.engine = engine.into();
        self
    }

    /// Builder method to set the engine version.
    pub fn with_engine_version(mut self, version: impl Into<String>) -> Self {
        self.engine_version = version.into();
        self
    }

    /// Builder method to set the master username.
    pub fn with_master_username(mut self, username: impl Into<String>) -> Self {
        self.master_username = username.into();
        self
    }

    /// Builder method to set the availability zone.
    pub fn with_availability_zone(mut self, zone: impl Into<String>) -> Self {
        self.availability_zone = zone.into();
        self
    }

    /// Builder method to set the initial database name.
    pub fn with_database_name(mut self, name: impl Into<String>) -> Self {
        self.database_name = name.into();
        self
    }

    /// Replaces every field for which an override is present.
    pub fn apply_overrides(mut self, overrides: ConfigOverrides) -> Self {
        let ConfigOverrides {
            cli_program,
            profile,
            cluster_identifier,
            engine,
            engine_version,
            master_username,
            availability_zone,
            database_name,
        } = overrides;

        if let Some(v) = cli_program {
            self.cli_program = v;
        }
        if let Some(v) = profile {
            self.profile = v;
        }
        if let Some(v) = cluster_identifier {
            self.cluster_identifier = v;
        }
        if let Some(v) = engine {
            self.engine = v;
        }
        if let Some(v) = engine_version {
            self.engine_version = v;
        }
        if let Some(v) = master_username {
            self.master_username = v;
        }
        if let Some(v) = availability_zone {
            self.availability_zone = v;
        }
        if let Some(v) = database_name {
            self.database_name = v;
        }
        self
    }

    /// Field names paired with their values, in command-line order.
    fn named_fields(&self) -> [(&'static str, &str); 8] {
        [
            ("cli_program", self.cli_program.as_str()),
            ("profile", self.profile.as_str()),
            ("cluster_identifier", self.cluster_identifier.as_str()),
            ("engine", self.engine.as_str()),
            ("engine_version", self.engine_version.as_str()),
            ("master_username", self.master_username.as_str()),
            ("availability_zone", self.availability_zone.as_str()),
            ("database_name", self.database_name.as_str()),
        ]
    }

    /// Validates that every field can be passed to the cloud CLI as a value.
    ///
    /// # Errors
    /// Returns a configuration error for an empty field or a field starting
    /// with `-`, which the cloud CLI would parse as an option.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in self.named_fields() {
            if value.trim().is_empty() {
                return Err(ProvisionError::configuration(format!(
                    "{} must not be empty",
                    name
                )));
            }
            if name != "cli_program" && value.starts_with('-') {
                return Err(ProvisionError::configuration(format!(
                    "{} must not start with '-', got '{}'",
                    name, value
                )));
            }
        }
        Ok(())
    }
}
