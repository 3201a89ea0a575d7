//! Lexer for splitting shell input into argument strings.
//!
//! Handles:
//! - Space-separated words
//! - Double-quoted segments (`"hello world"`)
//! - Escaped quotes inside a quoted segment (`\"`), kept verbatim

// =============================================================================
// Scanner State
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Between or inside unquoted words.
    Outside,
    /// After an opening `"`.
    Quoted,
}

// =============================================================================
// Lexer
// =============================================================================

/// Lexer producing one argument string per iteration.
///
/// Only the ASCII space separates words. A quote switches state without being
/// added to the word, so `a"b c"` yields the single argument `ab c`. Inside a
/// quoted segment a `"` directly preceded by `\` does not close the segment;
/// both characters are kept as typed. Empty words are never produced, which
/// also means `""` yields nothing.
pub struct Lexer<'a> {
    chars: std::str::Chars<'a>,
    state: State,
    prev: Option<char>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars(),
            state: State::Outside,
            prev: None,
        }
    }

    /// Tokenize the entire input into a vector
    pub fn tokenize(self) -> Vec<String> {
        self.collect()
    }
}

impl Iterator for Lexer<'_> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        let mut current = String::new();

        for c in self.chars.by_ref() {
            let prev = self.prev.replace(c);

            match self.state {
                State::Outside => match c {
                    '"' => self.state = State::Quoted,
                    ' ' => {
                        if !current.is_empty() {
                            return Some(current);
                        }
                    }
                    _ => current.push(c),
                },
                State::Quoted => {
                    if c == '"' && prev != Some('\\') {
                        self.state = State::Outside;
                        if !current.is_empty() {
                            return Some(current);
                        }
                    } else {
                        current.push(c);
                    }
                }
            }
        }

        // Unterminated quotes end up here too
        if current.is_empty() {
            None
        } else {
            Some(current)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
