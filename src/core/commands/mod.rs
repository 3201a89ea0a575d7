//! Command registration and execution.
//!
//! This module provides:
//! - `CommandSet` for declaring a layer of commands
//! - `Registry` for the merged, name-normalized command table
//! - `execute_command` for running one parsed line against the registry
//!
//! # Architecture
//!
//! A shell is built from layers of commands, base layers first. Each layer may
//! redeclare names from earlier layers; the last declaration wins. The merged
//! table is fixed once the shell is built.

mod builtin;
mod context;
mod execute;
mod result;

pub use builtin::builtin_commands;
pub use context::{Args, Context};
pub use execute::{bind_arguments, execute_command};
pub use result::{Flow, Outcome};

use std::collections::BTreeMap;

use log::debug;

use crate::models::{Command, normalize_name};

// =============================================================================
// Command Layers
// =============================================================================

/// An ordered layer of command declarations.
pub struct CommandSet<S> {
    commands: Vec<Command<S>>,
}

impl<S> Default for CommandSet<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> CommandSet<S> {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Add a command, builder style.
    pub fn command(mut self, command: Command<S>) -> Self {
        self.commands.push(command);
        self
    }

    pub fn add(&mut self, command: Command<S>) {
        self.commands.push(command);
    }

    /// Append the commands of `other` after this layer's.
    pub fn extend(mut self, other: CommandSet<S>) -> Self {
        self.commands.extend(other.commands);
        self
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Command<S>> {
        self.commands.iter()
    }
}

impl<S> IntoIterator for CommandSet<S> {
    type Item = Command<S>;
    type IntoIter = std::vec::IntoIter<Command<S>>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.into_iter()
    }
}

// =============================================================================
// Registry
// =============================================================================

/// Merged command table, keyed by normalized name.
pub struct Registry<S> {
    commands: BTreeMap<String, Command<S>>,
}

impl<S> Registry<S> {
    /// Merge layers in order; later declarations replace earlier ones.
    pub fn discover<I>(layers: I) -> Self
    where
        I: IntoIterator<Item = CommandSet<S>>,
    {
        let mut commands = BTreeMap::new();
        for (depth, layer) in layers.into_iter().enumerate() {
            for command in layer {
                let key = command.key();
                debug!(
                    "registering command '{}' ({} params) from layer {}",
                    key,
                    command.arity(),
                    depth
                );
                if let Some(previous) = commands.insert(key, command) {
                    debug!("command '{}' overridden", previous.name());
                }
            }
        }
        Self { commands }
    }

    /// Look up a command by user input, normalizing it first.
    pub fn get(&self, name: &str) -> Option<&Command<S>> {
        self.commands.get(&normalize_name(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Commands in normalized-name order.
    pub fn iter(&self) -> impl Iterator<Item = &Command<S>> {
        self.commands.values()
    }

    /// Normalized names in registry order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Greeter {
        said: Vec<&'static str>,
    }

    fn base_layer() -> CommandSet<Greeter> {
        CommandSet::new()
            .command(
                Command::new("greet", |g: &mut Greeter, _: &mut Context<'_, Greeter>| {
                    g.said.push("base");
                    Ok(Flow::Continue)
                })
                .help("base greeting"),
            )
            .command(Command::new("wave", |g: &mut Greeter, _: &mut Context<'_, Greeter>| {
                g.said.push("wave");
                Ok(Flow::Continue)
            }))
    }

    fn derived_layer() -> CommandSet<Greeter> {
        CommandSet::new().command(
            Command::new("Greet", |g: &mut Greeter, _: &mut Context<'_, Greeter>| {
                g.said.push("derived");
                Ok(Flow::Continue)
            })
            .help("derived greeting"),
        )
    }

    #[test]
    fn test_derived_layer_overrides_base() {
        let registry = Registry::discover([base_layer(), derived_layer()]);
        let greet = registry.get("greet").unwrap();
        assert_eq!(greet.help_text(), Some("derived greeting"));
        assert_eq!(greet.name(), "Greet");
        // Untouched base commands stay available
        assert!(registry.contains("wave"));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_layer_order_matters() {
        let registry = Registry::discover([derived_layer(), base_layer()]);
        assert_eq!(
            registry.get("greet").unwrap().help_text(),
            Some("base greeting")
        );
    }

    #[test]
    fn test_lookup_normalizes_input() {
        let registry = Registry::discover([base_layer()]);
        assert!(registry.get("  GREET ").is_some());
        assert!(registry.get("WaVe").is_some());
        assert!(registry.get("gree").is_none());
    }

    #[test]
    fn test_iteration_is_name_ordered() {
        let set = CommandSet::<Greeter>::new()
            .command(Command::new("zeta", |_: &mut Greeter, _: &mut Context<'_, Greeter>| {
                Ok(Flow::Continue)
            }))
            .extend(base_layer());
        assert_eq!(set.len(), 3);

        let registry = Registry::discover([set]);
        let names: Vec<_> = registry.names().collect();
        assert_eq!(names, vec!["greet", "wave", "zeta"]);
    }

    #[test]
    fn test_add_in_place() {
        let mut set = base_layer();
        set.add(Command::new("nod", |g: &mut Greeter, _: &mut Context<'_, Greeter>| {
            g.said.push("nod");
            Ok(Flow::Continue)
        }));
        assert_eq!(set.len(), 3);

        let registry = Registry::discover([set]);
        let names: Vec<_> = registry.names().collect();
        assert_eq!(names, vec!["greet", "nod", "wave"]);
    }

    #[test]
    fn test_same_layer_last_wins() {
        let set = base_layer().extend(derived_layer());
        let registry = Registry::discover([set]);
        assert_eq!(
            registry.get("greet").unwrap().help_text(),
            Some("derived greeting")
        );
    }
}
