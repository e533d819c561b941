//! Password input channels.
//!
//! Interactive sessions read from the terminal with echo disabled. Piped
//! input (scripts, tests) is read as a single line. Neither channel ever
//! writes the password back out.

use crate::error::{ProvisionError, Result};
use std::io::{self, BufRead, IsTerminal, Write};
use zeroize::Zeroizing;

/// Prompt printed to stdout before the password is read.
pub const PASSWORD_PROMPT: &str = "Enter the master database password:";

/// A channel that yields one raw, unvalidated password line.
pub trait PasswordSource {
    /// Prompts for and reads the password, without its line terminator.
    ///
    /// End of input with nothing read yields an empty string.
    fn read_password(&mut self) -> Result<Zeroizing<String>>;
}

fn write_prompt<W: Write>(out: &mut W) -> Result<()> {
    writeln!(out, "{}", PASSWORD_PROMPT)
        .and_then(|()| out.flush())
        .map_err(|e| ProvisionError::input_failed("Failed to write password prompt", e))
}

/// Removes one trailing `\n` or `\r\n`.
fn strip_line_ending(line: &mut String) {
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
}

/// Reads the password from the controlling terminal with echo disabled.
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl TerminalPrompt {
    /// Creates a terminal prompt.
    pub fn new() -> Self {
        Self
    }
}

impl PasswordSource for TerminalPrompt {
    fn read_password(&mut self) -> Result<Zeroizing<String>> {
        write_prompt(&mut io::stdout())?;
        let password = rpassword::read_password()
            .map_err(|e| ProvisionError::input_failed("Failed to read password from terminal", e))?;
        Ok(Zeroizing::new(password))
    }
}

/// Reads the password as one line from any buffered reader.
#[derive(Debug)]
pub struct LineReader<R, W> {
    reader: R,
    prompt_out: W,
}

impl<R: BufRead, W: Write> LineReader<R, W> {
    /// Creates a line reader that prompts on `prompt_out`.
    pub fn new(reader: R, prompt_out: W) -> Self {
        Self { reader, prompt_out }
    }

    /// Returns the prompt writer, so tests can inspect what was printed.
    pub fn into_prompt_output(self) -> W {
        self.prompt_out
    }
}

impl<R: BufRead, W: Write> PasswordSource for LineReader<R, W> {
    fn read_password(&mut self) -> Result<Zeroizing<String>> {
        write_prompt(&mut self.prompt_out)?;

        // Sized up front so typical passwords never trigger a reallocation
        // that would leave an unzeroed copy behind.
        let mut line = Zeroizing::new(String::with_capacity(256));
        self.reader
            .read_line(&mut line)
            .map_err(|e| ProvisionError::input_failed("Failed to read password line", e))?;
        strip_line_ending(&mut line);
        Ok(line)
    }
}

/// Picks the input channel for the process's stdin.
///
/// A terminal gets the non-echoing prompt; anything else is read as a line.
pub fn stdin_source() -> Box<dyn PasswordSource> {
    if io::stdin().is_terminal() {
        tracing::debug!("Reading password from terminal with echo disabled");
        Box::new(TerminalPrompt::new())
    } else {
        tracing::debug!("Reading password from non-interactive stdin");
        Box::new(LineReader::new(io::stdin().lock(), io::stdout()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn read(input: &str) -> (String, String) {
        let mut source = LineReader::new(Cursor::new(input.as_bytes().to_vec()), Vec::new());
        let password = source.read_password().unwrap();
        let prompt = String::from_utf8(source.into_prompt_output()).unwrap();
        (password.to_string(), prompt)
    }

    #[test]
    fn test_line_reader_strips_newline() {
        let (password, _) = read("exactly16chars!!\n");
        assert_eq!(password, "exactly16chars!!");
    }

    #[test]
    fn test_line_reader_strips_crlf() {
        let (password, _) = read("exactly16chars!!\r\n");
        assert_eq!(password, "exactly16chars!!");
    }

    #[test]
    fn test_line_reader_accepts_missing_final_newline() {
        let (password, _) = read("exactly16chars!!");
        assert_eq!(password, "exactly16chars!!");
    }

    #[test]
    fn test_line_reader_reads_only_first_line() {
        let (password, _) = read("first line\nsecond line\n");
        assert_eq!(password, "first line");
    }

    #[test]
    fn test_line_reader_eof_yields_empty() {
        let (password, _) = read("");
        assert!(password.is_empty());
    }

    #[test]
    fn test_line_reader_keeps_inner_whitespace() {
        let (password, _) = read("  padded  \n");
        assert_eq!(password, "  padded  ");
    }

    #[test]
    fn test_password_prompt_printed_without_echo() {
        let (_, prompt) = read("super_secret_password_123\n");
        assert_eq!(prompt, format!("{}\n", PASSWORD_PROMPT));
        assert!(!prompt.contains("super_secret"));
    }

    #[test]
    fn test_line_reader_invalid_utf8_is_input_error() {
        let mut source = LineReader::new(Cursor::new(vec![0xff, 0xfe, b'\n']), Vec::new());
        let error = source.read_password().unwrap_err();
        assert!(matches!(error, ProvisionError::Input { .. }));
    }
}
