//! Completion tree assembly from the command registry.

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, warn};

use crate::core::commands::Registry;
use crate::models::{Command, Completion, SnapshotFn};

use super::{
    ArgumentCompleter, Completer, DelegatingCompleter, FilenameCompleter, NullCompleter,
    WordListCompleter,
};

/// Build one positional chain per registered command, in registry order.
///
/// Snapshot completions are evaluated here, once; a failing snapshot leaves
/// its slot empty. Delegated completions keep a weak handle on `state` and
/// are resolved on every Tab.
pub fn build_completion_tree<S: 'static>(
    registry: &Registry<S>,
    state: &Rc<RefCell<S>>,
    strict: bool,
) -> Vec<ArgumentCompleter> {
    let chains: Vec<ArgumentCompleter> = registry
        .iter()
        .map(|command| build_chain(command, state).strict(strict))
        .collect();
    debug!(
        "built {} completion chains (strict: {})",
        chains.len(),
        strict
    );
    chains
}

fn build_chain<S: 'static>(command: &Command<S>, state: &Rc<RefCell<S>>) -> ArgumentCompleter {
    let mut slots: Vec<Box<dyn Completer>> = Vec::with_capacity(command.arity() + 2);
    slots.push(Box::new(WordListCompleter::new([command.name()])));

    for (index, param) in command.params().iter().enumerate() {
        let slot: Box<dyn Completer> = match param.completion_hint() {
            Completion::None => Box::new(NullCompleter),
            Completion::Static(words) => Box::new(WordListCompleter::new(words.iter().cloned())),
            Completion::Snapshot(source) => {
                Box::new(WordListCompleter::new(snapshot(command, index, source, state)))
            }
            Completion::Delegated(source) => Box::new(DelegatingCompleter::new(
                Rc::downgrade(state),
                Rc::clone(source),
            )),
            Completion::Filename => Box::new(FilenameCompleter::new()),
        };
        slots.push(slot);
    }

    slots.push(Box::new(NullCompleter));
    ArgumentCompleter::new(slots)
}

fn snapshot<S>(
    command: &Command<S>,
    index: usize,
    source: &SnapshotFn<S>,
    state: &Rc<RefCell<S>>,
) -> Vec<String> {
    let Ok(guard) = state.try_borrow() else {
        warn!(
            "state busy, no completion for '{}' parameter {}",
            command.name(),
            index
        );
        return Vec::new();
    };

    match source(&*guard) {
        Ok(words) => words,
        Err(err) => {
            warn!(
                "completion for '{}' parameter {} failed: {:#}",
                command.name(),
                index,
                err
            );
            Vec::new()
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
