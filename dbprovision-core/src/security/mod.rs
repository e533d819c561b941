//! Secret handling for the master password.
//!
//! # Security Guarantees
//! - The password lives in `Zeroizing` containers and is wiped on drop
//! - Terminal input is read with echo disabled
//! - The password is never logged, printed, or included in errors
//!
//! # Module Structure
//! - `password`: validated password type with redacted `Debug`
//! - `input`: prompt and read channels for terminal and piped stdin

mod input;
mod password;

pub use input::{LineReader, PASSWORD_PROMPT, PasswordSource, TerminalPrompt, stdin_source};
pub use password::{MIN_PASSWORD_LENGTH, MasterPassword, PASSWORD_TOO_SHORT, REDACTED};

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_security_piped_input_to_validated_password() {
        let mut source = LineReader::new(Cursor::new(b"exactly16chars!!\n".to_vec()), Vec::new());
        let raw = source.read_password().unwrap();
        let password = MasterPassword::parse(raw).unwrap();
        assert_eq!(password.expose(), "exactly16chars!!");
    }

    #[test]
    fn test_security_piped_short_input_rejected() {
        let mut source = LineReader::new(Cursor::new(b"short\n".to_vec()), Vec::new());
        let raw = source.read_password().unwrap();
        assert!(MasterPassword::parse(raw).is_err());
    }
}
