//! Declaration types consumed by the shell.
//!
//! - [`Command`] - a named command with help text, handler and parameters
//! - [`Param`] - one positional parameter: display name, target type, completion hint
//! - [`Completion`] - how a parameter completes on Tab

mod command;

pub use command::{
    Command, Completion, CompletionKind, DelegateFn, Handler, Param, SnapshotFn, normalize_name,
};
