//! Interactive console backed by `rustyline`.

use std::io::{self, Write};

use log::debug;
use rustyline::completion::Pair;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{Config, Editor};

use crate::config::{CompletionType, EditMode, ShellConfig};
use crate::core::autocomplete::{ArgumentCompleter, Completer, CompletionTree};
use crate::core::error::ShellError;

use super::Console;

// =============================================================================
// Editor Helper
// =============================================================================

/// Exposes the registered completer chains to rustyline.
#[derive(Default)]
struct ShellHelper {
    tree: CompletionTree,
}

impl rustyline::Helper for ShellHelper {}

impl rustyline::highlight::Highlighter for ShellHelper {}

impl rustyline::hint::Hinter for ShellHelper {
    type Hint = String;
}

impl rustyline::validate::Validator for ShellHelper {}

impl rustyline::completion::Completer for ShellHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let mut candidates = Vec::new();
        let Some(start) = self.tree.complete(line, pos, &mut candidates) else {
            return Ok((pos, Vec::new()));
        };

        let pairs = candidates
            .into_iter()
            .map(|candidate| Pair {
                display: candidate.trim_end().to_string(),
                replacement: candidate,
            })
            .collect();
        Ok((start, pairs))
    }
}

// =============================================================================
// Console
// =============================================================================

/// Terminal console with line editing, in-memory history and completion.
pub struct RustylineConsole {
    editor: Editor<ShellHelper, DefaultHistory>,
}

impl RustylineConsole {
    pub fn new(config: &ShellConfig) -> Result<Self, ShellError> {
        let editor_config = Config::builder()
            .max_history_size(config.history_size)?
            .auto_add_history(config.auto_add_history)
            .edit_mode(config.edit_mode.into())
            .completion_type(config.completion_type.into())
            .build();

        let mut editor = Editor::with_config(editor_config)?;
        editor.set_helper(Some(ShellHelper::default()));
        Ok(Self { editor })
    }
}

impl Console for RustylineConsole {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, ShellError> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(Some(line)),
            Err(ReadlineError::Eof) => Ok(None),
            // Ctrl-C drops the current line, like an empty one
            Err(ReadlineError::Interrupted) => {
                debug!("line interrupted");
                Ok(Some(String::new()))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn print(&mut self, text: &str) -> io::Result<()> {
        let mut out = io::stdout().lock();
        out.write_all(text.as_bytes())?;
        out.flush()
    }

    fn newline(&mut self) -> io::Result<()> {
        self.print("\n")
    }

    fn add_completer(&mut self, completer: ArgumentCompleter) {
        if let Some(helper) = self.editor.helper_mut() {
            helper.tree.push(completer);
        }
    }
}

impl From<EditMode> for rustyline::EditMode {
    fn from(mode: EditMode) -> Self {
        match mode {
            EditMode::Emacs => Self::Emacs,
            EditMode::Vi => Self::Vi,
        }
    }
}

impl From<CompletionType> for rustyline::CompletionType {
    fn from(kind: CompletionType) -> Self {
        match kind {
            CompletionType::List => Self::List,
            CompletionType::Circular => Self::Circular,
        }
    }
}
