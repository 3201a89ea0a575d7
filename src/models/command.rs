//! Command declarations: name, help, handler and parameter schema.

use std::any::TypeId;
use std::fmt;
use std::rc::Rc;

use crate::core::autocomplete::Completer;
use crate::core::coerce::short_type_name;
use crate::core::commands::{Context, Flow};

/// Handler invoked with the shell state and the coerced arguments.
pub type Handler<S> = Box<dyn Fn(&mut S, &mut Context<'_, S>) -> anyhow::Result<Flow>>;

/// Produces completion candidates from the shell state.
pub type SnapshotFn<S> = Rc<dyn Fn(&S) -> anyhow::Result<Vec<String>>>;

/// Produces a nested completer from the shell state.
pub type DelegateFn<S> = Rc<dyn Fn(&S) -> Option<Box<dyn Completer>>>;

// =============================================================================
// Completion Hints
// =============================================================================

/// How a parameter's value is completed on Tab.
pub enum Completion<S> {
    /// No completion at this position.
    None,
    /// A fixed list of candidates.
    Static(Vec<String>),
    /// Candidates computed once, when the completion tree is built.
    Snapshot(SnapshotFn<S>),
    /// A completer fetched from the state every time completion runs.
    Delegated(DelegateFn<S>),
    /// Filesystem paths.
    Filename,
}

/// Discriminant of [`Completion`], without the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionKind {
    None,
    StaticList,
    Snapshot,
    Delegated,
    Filename,
}

impl<S> Completion<S> {
    /// Fixed candidate list.
    pub fn words<I, W>(words: I) -> Self
    where
        I: IntoIterator<Item = W>,
        W: Into<String>,
    {
        Self::Static(words.into_iter().map(Into::into).collect())
    }

    /// Candidates computed from the state once, at startup.
    pub fn snapshot<F>(source: F) -> Self
    where
        F: Fn(&S) -> anyhow::Result<Vec<String>> + 'static,
    {
        Self::Snapshot(Rc::new(source))
    }

    /// Completion delegated to a completer the state hands out on demand.
    pub fn delegate<F>(source: F) -> Self
    where
        F: Fn(&S) -> Option<Box<dyn Completer>> + 'static,
    {
        Self::Delegated(Rc::new(source))
    }

    pub fn kind(&self) -> CompletionKind {
        match self {
            Self::None => CompletionKind::None,
            Self::Static(_) => CompletionKind::StaticList,
            Self::Snapshot(_) => CompletionKind::Snapshot,
            Self::Delegated(_) => CompletionKind::Delegated,
            Self::Filename => CompletionKind::Filename,
        }
    }
}

impl<S> Default for Completion<S> {
    fn default() -> Self {
        Self::None
    }
}

impl<S> Clone for Completion<S> {
    fn clone(&self) -> Self {
        match self {
            Self::None => Self::None,
            Self::Static(words) => Self::Static(words.clone()),
            Self::Snapshot(source) => Self::Snapshot(Rc::clone(source)),
            Self::Delegated(source) => Self::Delegated(Rc::clone(source)),
            Self::Filename => Self::Filename,
        }
    }
}

impl<S> fmt::Debug for Completion<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(words) => f.debug_tuple("Static").field(words).finish(),
            other => write!(f, "{:?}", other.kind()),
        }
    }
}

// =============================================================================
// Parameters
// =============================================================================

/// Declaration of one positional parameter.
pub struct Param<S> {
    name: Option<String>,
    type_id: TypeId,
    type_name: &'static str,
    completion: Completion<S>,
}

impl<S> Param<S> {
    /// A parameter of type `T` with no name and no completion.
    pub fn of<T: 'static>() -> Self {
        Self {
            name: None,
            type_id: TypeId::of::<T>(),
            type_name: short_type_name::<T>(),
            completion: Completion::None,
        }
    }

    /// Name shown in usage lines.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn completion(mut self, completion: Completion<S>) -> Self {
        self.completion = completion;
        self
    }

    /// Shorthand for a static completion list.
    pub fn words<I, W>(self, words: I) -> Self
    where
        I: IntoIterator<Item = W>,
        W: Into<String>,
    {
        self.completion(Completion::words(words))
    }

    /// Shorthand for filename completion.
    pub fn filename(self) -> Self {
        self.completion(Completion::Filename)
    }

    /// The declared name, or the type name when none was given.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(self.type_name)
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn completion_hint(&self) -> &Completion<S> {
        &self.completion
    }
}

impl<S> fmt::Debug for Param<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Param")
            .field("name", &self.display_name())
            .field("type", &self.type_name)
            .field("completion", &self.completion)
            .finish()
    }
}

// =============================================================================
// Commands
// =============================================================================

/// A named command with its handler and parameter schema.
pub struct Command<S> {
    name: String,
    help: Option<String>,
    params: Vec<Param<S>>,
    handler: Handler<S>,
}

impl<S> Command<S> {
    pub fn new<F>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&mut S, &mut Context<'_, S>) -> anyhow::Result<Flow> + 'static,
    {
        Self {
            name: name.into(),
            help: None,
            params: Vec::new(),
            handler: Box::new(handler),
        }
    }

    /// Attach help text shown by `help`.
    pub fn help(mut self, text: impl Into<String>) -> Self {
        self.help = Some(text.into());
        self
    }

    /// Append the next positional parameter.
    pub fn param(mut self, param: Param<S>) -> Self {
        self.params.push(param);
        self
    }

    /// Name as declared.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name as stored in the registry.
    pub fn key(&self) -> String {
        normalize_name(&self.name)
    }

    pub fn help_text(&self) -> Option<&str> {
        self.help.as_deref()
    }

    pub fn params(&self) -> &[Param<S>] {
        &self.params
    }

    /// Exact number of arguments the command takes.
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Usage line, e.g. `Usage: repeat count text`.
    pub fn usage(&self) -> String {
        let mut usage = format!("Usage: {}", self.name);
        for param in &self.params {
            usage.push(' ');
            usage.push_str(param.display_name());
        }
        usage
    }

    pub(crate) fn invoke(&self, state: &mut S, ctx: &mut Context<'_, S>) -> anyhow::Result<Flow> {
        (self.handler)(state, ctx)
    }
}

impl<S> fmt::Debug for Command<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("help", &self.help)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Registry key for a command name: trimmed and lowercased.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}
