//! Positional completion: one completer per argument slot.

use crate::models::normalize_name;

use super::{Completer, before_cursor};

// ============================================================================
// Argument Splitting
// ============================================================================

/// The text before the cursor, split into finished arguments and the one
/// being typed.
struct ArgumentLine<'a> {
    /// Arguments left of the one under the cursor.
    done: Vec<&'a str>,
    /// Partial argument under the cursor (may be empty).
    current: &'a str,
    /// Byte offset of `current` in the buffer.
    current_start: usize,
}

impl<'a> ArgumentLine<'a> {
    /// Split at spaces outside double quotes.
    fn delimit(text: &'a str) -> Self {
        let mut done = Vec::new();
        let mut start: Option<usize> = None;
        let mut quoted = false;
        let mut prev = None;

        for (idx, c) in text.char_indices() {
            if c == '"' && prev != Some('\\') {
                quoted = !quoted;
            }
            if c == ' ' && !quoted {
                if let Some(s) = start.take() {
                    done.push(&text[s..idx]);
                }
            } else if start.is_none() {
                start = Some(idx);
            }
            prev = Some(c);
        }

        let (current, current_start) = match start {
            Some(s) => (&text[s..], s),
            None => ("", text.len()),
        };
        Self {
            done,
            current,
            current_start,
        }
    }

    /// Slot index of the argument under the cursor.
    fn cursor_index(&self) -> usize {
        self.done.len()
    }
}

/// Whether `completer` offers `word` itself as a candidate.
fn offers_exactly(completer: &dyn Completer, word: &str) -> bool {
    let mut candidates = Vec::new();
    completer.complete(word, word.len(), &mut candidates);
    candidates.iter().any(|candidate| candidate.trim_end() == word)
}

/// Whether `completer` offers a command name equal to `word` once both are
/// normalized, the way the registry looks names up.
fn offers_name(completer: &dyn Completer, word: &str) -> bool {
    let word = normalize_name(word);
    let mut candidates = Vec::new();
    completer.complete("", 0, &mut candidates);
    candidates
        .iter()
        .any(|candidate| normalize_name(candidate) == word)
}

// ============================================================================
// Argument Completer
// ============================================================================

/// Completes each argument position with its own completer.
///
/// Slot 0 holds the command name; positions past the last slot reuse it.
/// The first argument must name the command of slot 0, compared like registry
/// keys, before any later slot is consulted. In strict mode every other
/// argument left of the cursor must be offered verbatim by its slot.
pub struct ArgumentCompleter {
    slots: Vec<Box<dyn Completer>>,
    strict: bool,
}

impl ArgumentCompleter {
    /// A strict chain over `slots`.
    pub fn new(slots: Vec<Box<dyn Completer>>) -> Self {
        Self {
            slots,
            strict: true,
        }
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Number of slots, including the command name and the trailing slot.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl Completer for ArgumentCompleter {
    fn complete(&self, buffer: &str, cursor: usize, candidates: &mut Vec<String>) -> Option<usize> {
        let last = self.slots.len().checked_sub(1)?;
        let line = ArgumentLine::delimit(before_cursor(buffer, cursor));
        let index = line.cursor_index();

        let verified = if self.strict { index } else { index.min(1) };
        for (position, word) in line.done.iter().take(verified).enumerate() {
            let slot = self.slots[position.min(last)].as_ref();
            let offered = if position == 0 {
                offers_name(slot, word)
            } else {
                offers_exactly(slot, word)
            };
            if !offered {
                return None;
            }
        }

        let slot = &self.slots[index.min(last)];
        let offset = slot.complete(line.current, line.current.len(), candidates)?;
        Some(line.current_start + offset)
    }
}

// ============================================================================
// Completion Tree
// ============================================================================

/// All chains of a shell behind a single completer.
///
/// Chains are asked in registration order. The first answer fixes the offset;
/// later chains answering at the same offset add their candidates.
#[derive(Default)]
pub struct CompletionTree {
    chains: Vec<ArgumentCompleter>,
}

impl CompletionTree {
    pub fn new(chains: Vec<ArgumentCompleter>) -> Self {
        Self { chains }
    }

    pub fn push(&mut self, chain: ArgumentCompleter) {
        self.chains.push(chain);
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }
}

impl Completer for CompletionTree {
    fn complete(&self, buffer: &str, cursor: usize, candidates: &mut Vec<String>) -> Option<usize> {
        let mut found = None;

        for chain in &self.chains {
            let mut offered = Vec::new();
            let Some(start) = chain.complete(buffer, cursor, &mut offered) else {
                continue;
            };
            match found {
                None => found = Some(start),
                Some(first) if first != start => continue,
                Some(_) => {}
            }
            for candidate in offered {
                if !candidates.contains(&candidate) {
                    candidates.push(candidate);
                }
            }
        }

        found
    }
}

// ============================================================================
// Tests
// ============================================================================
