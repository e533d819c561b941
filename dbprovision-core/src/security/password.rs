//! Master password container with automatic memory zeroing.
//!
//! # Security
//! - The password is stored in a `Zeroizing<String>`
//! - Memory is cleared when the value goes out of scope
//! - `Debug` output never shows the password

use crate::error::{ProvisionError, Result};
use std::fmt;
use zeroize::Zeroizing;

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_LENGTH: usize = 16;

/// Diagnostic shown to the operator when the password is rejected.
pub const PASSWORD_TOO_SHORT: &str = "Input must be 16 characters or longer";

/// Placeholder printed wherever the password would otherwise appear.
pub const REDACTED: &str = "****";

/// Validated master password for the new cluster.
///
/// Construction goes through [`MasterPassword::parse`], so every value of
/// this type is at least [`MIN_PASSWORD_LENGTH`] characters long.
///
/// # Example
///
/// ```rust
/// use dbprovision_core::security::MasterPassword;
///
/// let password = MasterPassword::parse("exactly16chars!!".to_string())?;
/// assert_eq!(password.char_len(), 16);
/// assert_eq!(format!("{:?}", password), "MasterPassword(****)");
/// # Ok::<(), dbprovision_core::ProvisionError>(())
/// ```
#[derive(Clone)]
pub struct MasterPassword {
    secret: Zeroizing<String>,
}

impl MasterPassword {
    /// Validates raw input and wraps it.
    ///
    /// Length is counted in Unicode scalar values. No character-set or
    /// complexity rules apply.
    ///
    /// # Errors
    /// Returns [`ProvisionError::Validation`] when the input is empty or
    /// shorter than [`MIN_PASSWORD_LENGTH`]. The rejected input is zeroed.
    pub fn parse(raw: impl Into<Zeroizing<String>>) -> Result<Self> {
        let secret = raw.into();
        if secret.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(ProvisionError::validation(PASSWORD_TOO_SHORT));
        }
        Ok(Self { secret })
    }

    /// Exposes the password for building the command argument.
    pub fn expose(&self) -> &str {
        &self.secret
    }

    /// Length in characters.
    pub fn char_len(&self) -> usize {
        self.secret.chars().count()
    }
}

impl fmt::Debug for MasterPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MasterPassword({})", REDACTED)
    }
}
