//! Line-editing collaborators.
//!
//! The shell talks to its terminal only through [`Console`]:
//! - [`RustylineConsole`] - interactive editing, history and Tab completion
//! - `ScriptedConsole` - canned input and captured output (tests, `mock` feature)

mod line_editor;
#[cfg(any(test, feature = "mock"))]
mod scripted;

pub use line_editor::RustylineConsole;
#[cfg(any(test, feature = "mock"))]
pub use scripted::ScriptedConsole;

use std::io;

use crate::core::autocomplete::ArgumentCompleter;
use crate::core::error::ShellError;

/// Reads lines and prints text for one shell session.
pub trait Console {
    /// Read one line after showing `prompt`; `None` means input is exhausted.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, ShellError>;

    /// Print text without a newline.
    fn print(&mut self, text: &str) -> io::Result<()>;

    fn newline(&mut self) -> io::Result<()>;

    fn println(&mut self, text: &str) -> io::Result<()> {
        self.print(text)?;
        self.newline()
    }

    /// Register one positional completer chain.
    fn add_completer(&mut self, completer: ArgumentCompleter);
}
