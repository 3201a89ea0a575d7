//! Core machinery of the shell.
//!
//! This module provides:
//! - [`parser`] splitting input lines into words
//! - [`coerce`] converting words into typed handler arguments
//! - [`commands`] for the layered registry and command execution
//! - [`autocomplete`] for the completion chains built from the registry

pub mod autocomplete;
pub mod coerce;
pub mod commands;
pub mod error;
pub mod parser;

pub use autocomplete::{ArgumentCompleter, Completer, CompletionTree, build_completion_tree};
pub use coerce::Coercers;
pub use commands::{CommandSet, Context, Flow, Outcome, Registry, execute_command};
pub use parser::{ParsedCommand, parse_input, tokenize};
