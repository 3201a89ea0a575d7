//! Console fed from a script, for tests and headless runs.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;
use std::rc::Rc;

use crate::core::autocomplete::{ArgumentCompleter, Completer, CompletionTree};
use crate::core::error::ShellError;

use super::Console;

enum Input {
    Line(String),
    Failure(String),
}

#[derive(Default)]
struct Script {
    input: VecDeque<Input>,
    output: String,
    prompts: Vec<String>,
    tree: CompletionTree,
}

/// Console that replays queued lines and records everything printed.
///
/// Clones share the same script, so a test can keep one handle while the
/// shell owns another.
#[derive(Clone, Default)]
pub struct ScriptedConsole {
    inner: Rc<RefCell<Script>>,
}

impl ScriptedConsole {
    pub fn new<I, L>(lines: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        let console = Self::default();
        for line in lines {
            console.push_line(line);
        }
        console
    }

    pub fn push_line(&self, line: impl Into<String>) {
        self.inner
            .borrow_mut()
            .input
            .push_back(Input::Line(line.into()));
    }

    /// Queue a read failure, as if the terminal went away.
    pub fn push_failure(&self, message: impl Into<String>) {
        self.inner
            .borrow_mut()
            .input
            .push_back(Input::Failure(message.into()));
    }

    /// Everything printed so far.
    pub fn output(&self) -> String {
        self.inner.borrow().output.clone()
    }

    /// Printed output split into lines.
    pub fn output_lines(&self) -> Vec<String> {
        self.inner.borrow().output.lines().map(String::from).collect()
    }

    /// Prompts shown, one per read.
    pub fn prompts(&self) -> Vec<String> {
        self.inner.borrow().prompts.clone()
    }

    /// Number of registered completer chains.
    pub fn completer_count(&self) -> usize {
        self.inner.borrow().tree.len()
    }

    /// Run Tab completion for `buffer` with the cursor at `cursor`.
    pub fn complete(&self, buffer: &str, cursor: usize) -> Option<(usize, Vec<String>)> {
        let mut candidates = Vec::new();
        let start = self
            .inner
            .borrow()
            .tree
            .complete(buffer, cursor, &mut candidates)?;
        Some((start, candidates))
    }
}

impl Console for ScriptedConsole {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, ShellError> {
        let mut script = self.inner.borrow_mut();
        script.prompts.push(prompt.to_string());
        match script.input.pop_front() {
            Some(Input::Line(line)) => Ok(Some(line)),
            Some(Input::Failure(message)) => Err(io::Error::other(message).into()),
            None => Ok(None),
        }
    }

    fn print(&mut self, text: &str) -> io::Result<()> {
        self.inner.borrow_mut().output.push_str(text);
        Ok(())
    }

    fn newline(&mut self) -> io::Result<()> {
        self.inner.borrow_mut().output.push('\n');
        Ok(())
    }

    fn add_completer(&mut self, completer: ArgumentCompleter) {
        self.inner.borrow_mut().tree.push(completer);
    }
}
