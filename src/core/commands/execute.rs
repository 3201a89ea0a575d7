//! Command execution logic.
//!
//! Contains `execute_command`, which resolves a parsed line against the
//! registry, checks arity, coerces the arguments and runs the handler.

use std::any::Any;
use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;

use anyhow::anyhow;
use log::debug;

use crate::console::Console;
use crate::core::coerce::Coercers;
use crate::core::error::DispatchError;
use crate::core::parser::ParsedCommand;
use crate::models::Command;

use super::{Args, Context, Outcome, Registry};

/// Execute a parsed line and classify what happened.
///
/// Nothing is printed here except what the handler itself prints; the caller
/// reports the returned [`Outcome`].
///
/// # Arguments
///
/// * `parsed` - Command name and raw arguments
/// * `state` - Shell state handed to the handler
/// * `registry` - Command table to resolve the name against
/// * `coercers` - Conversion rules for the parameter types
/// * `console` - Output surface for the handler
pub fn execute_command<S>(
    parsed: &ParsedCommand,
    state: &mut S,
    registry: &Registry<S>,
    coercers: &Coercers,
    console: &mut dyn Console,
) -> Outcome {
    let Some(command) = registry.get(&parsed.name) else {
        return Outcome::Rejected(DispatchError::UnknownCommand(parsed.name.clone()));
    };

    let args = match bind_arguments(command, &parsed.args, coercers) {
        Ok(args) => args,
        Err(err) => return Outcome::Rejected(err),
    };

    debug!("invoking '{}' with {} args", command.name(), args.len());
    let mut ctx = Context::new(args, console, registry);
    install_panic_hook();
    let outer = IN_HANDLER.with(|flag| flag.replace(true));
    let result = panic::catch_unwind(AssertUnwindSafe(|| command.invoke(state, &mut ctx)));
    IN_HANDLER.with(|flag| flag.set(outer));

    match result {
        Ok(Ok(flow)) => flow.into(),
        Ok(Err(err)) => Outcome::Failed(err),
        Err(payload) => Outcome::Failed(anyhow!(
            "command '{}' panicked: {}",
            command.name(),
            panic_message(payload.as_ref())
        )),
    }
}

/// Check arity and coerce every raw argument, stopping at the first failure.
pub fn bind_arguments<S>(
    command: &Command<S>,
    raw: &[String],
    coercers: &Coercers,
) -> Result<Args, DispatchError> {
    if raw.len() != command.arity() {
        return Err(DispatchError::ArityMismatch {
            command: command.name().to_string(),
            got: raw.len(),
            expected: command.arity(),
            usage: command.usage(),
        });
    }

    let values = command
        .params()
        .iter()
        .zip(raw)
        .enumerate()
        .map(|(index, (param, raw))| {
            coercers.coerce(raw, param.type_id(), param.type_name(), index)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Args::new(values))
}

// =============================================================================
// Panic Reporting
// =============================================================================

thread_local! {
    /// Set while a handler runs on this thread.
    static IN_HANDLER: Cell<bool> = const { Cell::new(false) };
}

static PANIC_HOOK: Once = Once::new();

/// Route handler panics to the log instead of stderr.
///
/// The outcome already carries the panic message, so the default report would
/// print it twice in the middle of a session. Panics outside a handler still
/// reach the previous hook.
fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if IN_HANDLER.with(Cell::get) {
                debug!("handler {info}");
            } else {
                previous(info);
            }
        }));
    });
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "non-string panic payload"
    }
}

// =============================================================================
// Tests
// =============================================================================
