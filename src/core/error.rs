//! Error types for the shell.
//!
//! Errors are split by how far they reach:
//!
//! - [`DispatchError`] - a line could not be turned into a handler call; printed, loop continues
//! - [`CoercionError`] - one argument could not be converted to its parameter type
//! - [`ArgError`] - a handler asked for an argument that does not match its declaration
//! - [`ShellError`] - the console itself failed; ends the session

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure to turn an input line into a handler invocation.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// First word does not name a registered command.
    #[error("Unknown command '{0}', try 'help'")]
    UnknownCommand(String),
    /// Supplied argument count differs from the declared parameter count.
    #[error("'{command}': Invalid number of arguments, got {got}, expected {expected}")]
    ArityMismatch {
        command: String,
        got: usize,
        expected: usize,
        /// Synthesized usage line, e.g. `Usage: append value`.
        usage: String,
    },
    #[error(transparent)]
    Coercion(#[from] CoercionError),
}

impl DispatchError {
    /// Lines to show the user for this error.
    pub fn report(&self) -> Vec<String> {
        match self {
            Self::ArityMismatch { usage, .. } => vec![self.to_string(), usage.clone()],
            _ => vec![self.to_string()],
        }
    }
}

/// Failure to convert a raw argument to its parameter type.
#[derive(Debug, Error)]
pub enum CoercionError {
    /// The user typed something that does not parse as the target type.
    #[error("Cannot parse '{raw}' to {target} for parameter {index}")]
    Input {
        raw: String,
        target: &'static str,
        index: usize,
    },
    /// No coercion is registered for the declared parameter type.
    #[error("Programming error, unable to assign string to {target}, parameter {index}")]
    Unsupported { target: &'static str, index: usize },
    /// The registered coercion for a custom type rejected the value.
    #[error("Programming error, unable to construct {target} from string, parameter {index}: {reason}")]
    Construct {
        target: &'static str,
        index: usize,
        reason: String,
    },
}

impl CoercionError {
    /// Whether the error points at the shell's declarations rather than the user's input.
    pub fn is_configuration(&self) -> bool {
        !matches!(self, Self::Input { .. })
    }
}

/// A handler requested an argument that its declaration does not provide.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArgError {
    #[error("argument {index} is out of range ({len} declared)")]
    OutOfRange { index: usize, len: usize },
    #[error("argument {index} was already taken")]
    AlreadyTaken { index: usize },
    #[error("argument {index} is not a {requested}")]
    TypeMismatch {
        index: usize,
        requested: &'static str,
    },
}

/// Unrecoverable failure that ends a shell session.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("line editor failure: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
    #[error("console I/O failure: {0}")]
    Io(#[from] io::Error),
    #[error("cannot read config {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_command_message() {
        let err = DispatchError::UnknownCommand("bogus".to_string());
        assert_eq!(err.report(), vec!["Unknown command 'bogus', try 'help'"]);
    }

    #[test]
    fn test_arity_report_includes_usage() {
        let err = DispatchError::ArityMismatch {
            command: "quit".to_string(),
            got: 1,
            expected: 0,
            usage: "Usage: quit".to_string(),
        };
        assert_eq!(
            err.report(),
            vec![
                "'quit': Invalid number of arguments, got 1, expected 0",
                "Usage: quit"
            ]
        );
    }

    #[test]
    fn test_coercion_flavors() {
        let input = CoercionError::Input {
            raw: "4x".to_string(),
            target: "i32",
            index: 0,
        };
        assert!(!input.is_configuration());
        assert_eq!(input.to_string(), "Cannot parse '4x' to i32 for parameter 0");

        let unsupported = CoercionError::Unsupported {
            target: "Color",
            index: 2,
        };
        assert!(unsupported.is_configuration());
    }
}
