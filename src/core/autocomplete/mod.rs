//! Tab completion for command names and arguments.
//!
//! This module provides:
//! - [`Completer`], the protocol every completer follows
//! - Leaf completers: fixed word lists, filesystem paths, delegation, nothing
//! - [`ArgumentCompleter`], one positional chain per command
//! - [`CompletionTree`], all chains of a shell merged behind one completer
//! - [`build_completion_tree`], which derives the chains from the registry
//!
//! A completer receives the buffer and cursor, appends candidates and returns
//! the offset in the buffer where the candidates start. `None` means it has
//! nothing to offer.

mod argument;
mod build;

pub use argument::{ArgumentCompleter, CompletionTree};
pub use build::build_completion_tree;

use std::cell::RefCell;
use std::path::MAIN_SEPARATOR;
use std::rc::{Rc, Weak};

use rustyline::completion::unescape;

use crate::models::DelegateFn;

// ============================================================================
// Protocol
// ============================================================================

/// Offers candidates for the text before the cursor.
pub trait Completer {
    fn complete(&self, buffer: &str, cursor: usize, candidates: &mut Vec<String>) -> Option<usize>;
}

impl<C: Completer + ?Sized> Completer for Box<C> {
    fn complete(&self, buffer: &str, cursor: usize, candidates: &mut Vec<String>) -> Option<usize> {
        (**self).complete(buffer, cursor, candidates)
    }
}

impl<C: Completer + ?Sized> Completer for Rc<C> {
    fn complete(&self, buffer: &str, cursor: usize, candidates: &mut Vec<String>) -> Option<usize> {
        (**self).complete(buffer, cursor, candidates)
    }
}

/// Text before the cursor, clamped to the buffer and to a char boundary.
fn before_cursor(buffer: &str, cursor: usize) -> &str {
    let mut end = cursor.min(buffer.len());
    while !buffer.is_char_boundary(end) {
        end -= 1;
    }
    &buffer[..end]
}

// ============================================================================
// Word Lists
// ============================================================================

/// Completes from a fixed, sorted set of words.
///
/// A lone match gets a trailing space so the cursor moves on to the next
/// argument.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordListCompleter {
    words: Vec<String>,
}

impl WordListCompleter {
    pub fn new<I, W>(words: I) -> Self
    where
        I: IntoIterator<Item = W>,
        W: Into<String>,
    {
        let mut words: Vec<String> = words.into_iter().map(Into::into).collect();
        words.sort();
        words.dedup();
        Self { words }
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }
}

impl Completer for WordListCompleter {
    fn complete(&self, buffer: &str, cursor: usize, candidates: &mut Vec<String>) -> Option<usize> {
        let prefix = before_cursor(buffer, cursor);
        let matches: Vec<&String> = self
            .words
            .iter()
            .filter(|word| word.starts_with(prefix))
            .collect();

        match matches.as_slice() {
            [] => return None,
            [only] => candidates.push(format!("{only} ")),
            _ => candidates.extend(matches.into_iter().cloned()),
        }
        Some(0)
    }
}

// ============================================================================
// Null
// ============================================================================

/// Never completes anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCompleter;

impl Completer for NullCompleter {
    fn complete(&self, _: &str, _: usize, _: &mut Vec<String>) -> Option<usize> {
        None
    }
}

// ============================================================================
// Filesystem Paths
// ============================================================================

/// Completes filesystem paths relative to the working directory.
pub struct FilenameCompleter {
    inner: rustyline::completion::FilenameCompleter,
}

impl Default for FilenameCompleter {
    fn default() -> Self {
        Self::new()
    }
}

impl FilenameCompleter {
    pub fn new() -> Self {
        Self {
            inner: rustyline::completion::FilenameCompleter::new(),
        }
    }
}

impl Completer for FilenameCompleter {
    fn complete(&self, buffer: &str, cursor: usize, candidates: &mut Vec<String>) -> Option<usize> {
        let text = before_cursor(buffer, cursor);
        let (start, pairs) = self.inner.complete_path(text, text.len()).ok()?;
        if pairs.is_empty() {
            return None;
        }
        let quoted = ends_in_quote(text);
        candidates.extend(
            pairs
                .into_iter()
                .map(|pair| quote_path(&pair.replacement, quoted)),
        );
        Some(start)
    }
}

/// Escape character rustyline puts before break characters outside quotes.
const ESCAPE_CHAR: Option<char> = if cfg!(unix) { Some('\\') } else { None };

/// Whether `text` ends inside a double-quoted segment.
fn ends_in_quote(text: &str) -> bool {
    let mut quoted = false;
    let mut prev = None;
    for c in text.chars() {
        if c == '"' && prev != Some('\\') {
            quoted = !quoted;
        }
        prev = Some(c);
    }
    quoted
}

/// Rewrite a rustyline path replacement so the lexer reads it back as one word.
///
/// Backslash escapes are removed and a path containing a space is wrapped in
/// double quotes. The quote is left open after a directory so the path can be
/// completed further.
fn quote_path(replacement: &str, quoted: bool) -> String {
    let escape = if quoted { Some('\\') } else { ESCAPE_CHAR };
    let path = unescape(replacement, escape);
    let open = !quoted && path.contains(' ');
    let close = (quoted || open) && !path.ends_with(MAIN_SEPARATOR);

    let mut word = String::with_capacity(path.len() + 2);
    if open {
        word.push('"');
    }
    word.push_str(&path);
    if close {
        word.push('"');
    }
    word
}

// ============================================================================
// Delegation
// ============================================================================

/// Asks the shell state for a completer each time completion runs.
///
/// Holds the state weakly; once the shell is gone, or while the state is
/// mutably borrowed, it offers nothing.
pub struct DelegatingCompleter<S> {
    state: Weak<RefCell<S>>,
    source: DelegateFn<S>,
}

impl<S> DelegatingCompleter<S> {
    pub fn new(state: Weak<RefCell<S>>, source: DelegateFn<S>) -> Self {
        Self { state, source }
    }
}

impl<S> Completer for DelegatingCompleter<S> {
    fn complete(&self, buffer: &str, cursor: usize, candidates: &mut Vec<String>) -> Option<usize> {
        let state = self.state.upgrade()?;
        let delegate = {
            let guard = state.try_borrow().ok()?;
            (self.source)(&*guard)?
        };
        delegate.complete(buffer, cursor, candidates)
    }
}

// ============================================================================
// Tests
// ============================================================================
