//! Declarative interactive command shells.
//!
//! Declare commands with their parameters and completion hints, hand them to
//! a [`Shell`], and get a read-eval-print loop with typed arguments, a `help`
//! command and context-sensitive Tab completion.
//!
//! ```no_run
//! use cmdshell::{Command, CommandSet, Context, Flow, Param, Shell, ShellState};
//!
//! struct Greeter;
//! impl ShellState for Greeter {}
//!
//! fn hello(_: &mut Greeter, ctx: &mut Context<'_, Greeter>) -> anyhow::Result<Flow> {
//!     let name: String = ctx.arg(0)?;
//!     ctx.println(&format!("Hello, {name}!"))?;
//!     Ok(Flow::Continue)
//! }
//!
//! let commands = CommandSet::new()
//!     .command(Command::new("hello", hello).param(Param::of::<String>().named("name")))
//!     .command(Command::new("quit", |_: &mut Greeter, _: &mut Context<'_, Greeter>| {
//!         Ok(Flow::exit("Goodbye."))
//!     }));
//!
//! Shell::builder(Greeter).commands(commands).build()?.run()?;
//! # Ok::<(), cmdshell::ShellError>(())
//! ```

pub mod config;
pub mod console;
pub mod core;
pub mod models;
mod shell;

pub use crate::config::{CompletionType, EditMode, ShellConfig};
pub use crate::console::{Console, RustylineConsole};
#[cfg(any(test, feature = "mock"))]
pub use crate::console::ScriptedConsole;
pub use crate::core::autocomplete::{
    ArgumentCompleter, Completer, CompletionTree, DelegatingCompleter, FilenameCompleter,
    NullCompleter, WordListCompleter,
};
pub use crate::core::coerce::Coercers;
pub use crate::core::commands::{Args, CommandSet, Context, Flow, Outcome, Registry};
pub use crate::core::error::{ArgError, CoercionError, DispatchError, ShellError};
pub use crate::core::parser::{ParsedCommand, parse_input, tokenize};
pub use crate::models::{Command, Completion, CompletionKind, Param};
pub use crate::shell::{Shell, ShellBuilder, ShellState, Step};
