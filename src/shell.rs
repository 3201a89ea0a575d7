//! The read-eval-print loop and its builder.

use std::cell::RefCell;
use std::fmt;
use std::iter;
use std::rc::Rc;
use std::str::FromStr;

use log::{debug, warn};

use crate::config::ShellConfig;
use crate::console::{Console, RustylineConsole};
use crate::core::autocomplete::build_completion_tree;
use crate::core::coerce::Coercers;
use crate::core::commands::{CommandSet, Outcome, Registry, builtin_commands, execute_command};
use crate::core::error::ShellError;
use crate::core::parser::parse_input;

// =============================================================================
// State Hooks
// =============================================================================

/// Application state driven by a shell.
///
/// Both hooks default to the configured text; override them to reflect the
/// state, e.g. a prompt showing the current directory.
pub trait ShellState: 'static {
    /// Prompt shown before every line.
    fn prompt(&self, config: &ShellConfig) -> String {
        config.prompt.clone()
    }

    /// Message printed once before the first prompt; `None` prints nothing.
    fn welcome(&self, config: &ShellConfig) -> Option<String> {
        config.welcome_message().map(String::from)
    }
}

/// Whether the loop goes on after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Continue,
    Exit,
}

// =============================================================================
// Shell
// =============================================================================

/// One interactive session over a state `S`.
pub struct Shell<S: ShellState> {
    state: Rc<RefCell<S>>,
    registry: Registry<S>,
    coercers: Coercers,
    console: Box<dyn Console>,
    config: ShellConfig,
}

impl<S: ShellState> Shell<S> {
    pub fn builder(state: S) -> ShellBuilder<S> {
        ShellBuilder::new(state)
    }

    /// Print the welcome message, then read and execute lines until input
    /// ends or a command asks to exit.
    pub fn run(&mut self) -> Result<(), ShellError> {
        let welcome = self.state.borrow().welcome(&self.config);
        if let Some(welcome) = welcome {
            self.console.println(&welcome)?;
        }

        loop {
            let prompt = self.state.borrow().prompt(&self.config);
            let Some(line) = self.console.read_line(&prompt)? else {
                debug!("end of input");
                return Ok(());
            };
            if self.execute_line(&line)? == Step::Exit {
                return Ok(());
            }
        }
    }

    /// Execute one line as if it had been typed, reporting the outcome.
    ///
    /// Only console failures are returned as errors; unknown commands, bad
    /// arguments and handler errors are printed.
    pub fn execute_line(&mut self, line: &str) -> Result<Step, ShellError> {
        let Some(parsed) = parse_input(line) else {
            return Ok(Step::Continue);
        };
        debug!("dispatching '{}' ({} args)", parsed.name, parsed.args.len());

        let outcome = {
            let mut state = self.state.borrow_mut();
            execute_command(
                &parsed,
                &mut *state,
                &self.registry,
                &self.coercers,
                self.console.as_mut(),
            )
        };

        match outcome {
            Outcome::Completed => Ok(Step::Continue),
            Outcome::Exit(message) => {
                if let Some(message) = message {
                    self.console.println(&message)?;
                }
                Ok(Step::Exit)
            }
            Outcome::Rejected(err) => {
                for line in err.report() {
                    self.console.println(&line)?;
                }
                Ok(Step::Continue)
            }
            Outcome::Failed(err) => {
                self.console.println(&format!("{err:?}"))?;
                Ok(Step::Continue)
            }
        }
    }

    /// Shared handle on the state, as seen by completers.
    pub fn state(&self) -> &Rc<RefCell<S>> {
        &self.state
    }

    pub fn registry(&self) -> &Registry<S> {
        &self.registry
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }
}

impl<S: ShellState> fmt::Debug for Shell<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shell")
            .field("commands", &self.registry.names().collect::<Vec<_>>())
            .field("coercers", &self.coercers)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Collects command layers, coercions and options for a [`Shell`].
pub struct ShellBuilder<S> {
    state: S,
    layers: Vec<CommandSet<S>>,
    coercers: Coercers,
    console: Option<Box<dyn Console>>,
    config: ShellConfig,
}

impl<S: ShellState> ShellBuilder<S> {
    pub fn new(state: S) -> Self {
        Self {
            state,
            layers: Vec::new(),
            coercers: Coercers::new(),
            console: None,
            config: ShellConfig::default(),
        }
    }

    pub fn config(mut self, config: ShellConfig) -> Self {
        self.config = config;
        self
    }

    /// Add a command layer. Layers added later override earlier ones.
    pub fn commands(mut self, layer: CommandSet<S>) -> Self {
        self.layers.push(layer);
        self
    }

    /// Replace the coercion table.
    pub fn coercers(mut self, coercers: Coercers) -> Self {
        self.coercers = coercers;
        self
    }

    /// Accept parameters of type `T` through its `FromStr` implementation.
    pub fn coerce_from_str<T>(mut self) -> Self
    where
        T: FromStr + 'static,
        T::Err: fmt::Display,
    {
        self.coercers.register_from_str::<T>();
        self
    }

    /// Accept parameters of type `T` through a conversion function.
    pub fn coerce_with<T, E, F>(mut self, convert: F) -> Self
    where
        T: 'static,
        E: fmt::Display,
        F: Fn(&str) -> Result<T, E> + 'static,
    {
        self.coercers.register(convert);
        self
    }

    /// Use `console` instead of an interactive terminal.
    pub fn console(mut self, console: impl Console + 'static) -> Self {
        self.console = Some(Box::new(console));
        self
    }

    /// Merge the layers, set up the console and register completion.
    pub fn build(self) -> Result<Shell<S>, ShellError> {
        let registry = Registry::discover(iter::once(builtin_commands()).chain(self.layers));

        for command in registry.iter() {
            for (index, param) in command.params().iter().enumerate() {
                if !self.coercers.supports(param.type_id()) {
                    warn!(
                        "command '{}' parameter {} has type {} with no coercion registered",
                        command.name(),
                        index,
                        param.type_name()
                    );
                }
            }
        }

        let state = Rc::new(RefCell::new(self.state));
        let mut console = match self.console {
            Some(console) => console,
            None => Box::new(RustylineConsole::new(&self.config)?),
        };
        for chain in build_completion_tree(&registry, &state, self.config.strict_completion) {
            console.add_completer(chain);
        }
        debug!("shell ready with {} commands", registry.len());

        Ok(Shell {
            state,
            registry,
            coercers: self.coercers,
            console,
            config: self.config,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
