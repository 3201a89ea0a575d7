//! Command line parsing.
//!
//! Splits raw input into words with [`Lexer`] and separates the command name
//! from its arguments.

mod lexer;

pub use lexer::Lexer;

// =============================================================================
// Parsed Representation
// =============================================================================

/// A command line split into its name and raw argument strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub name: String,
    pub args: Vec<String>,
}

// =============================================================================
// Parser
// =============================================================================

/// Split a line into argument strings.
pub fn tokenize(line: &str) -> Vec<String> {
    Lexer::new(line).tokenize()
}

/// Parse a line into a command name and arguments.
///
/// Returns `None` for lines without any word (empty or whitespace only).
pub fn parse_input(line: &str) -> Option<ParsedCommand> {
    let mut words = Lexer::new(line);
    let name = words.next()?;
    Some(ParsedCommand {
        name,
        args: words.collect(),
    })
}

// =============================================================================
// Tests
// =============================================================================
