//! Commands every shell starts with.
//!
//! The built-in layer is merged before any user layer, so a shell may replace
//! `help` by declaring its own.

use crate::config::HELP_HEADER;
use crate::models::Command;

use super::{CommandSet, Context, Flow};

/// The root layer: just `help`.
pub fn builtin_commands<S: 'static>() -> CommandSet<S> {
    CommandSet::new().command(Command::new("help", help::<S>))
}

/// Print every command with its help text, one per line.
fn help<S>(_state: &mut S, ctx: &mut Context<'_, S>) -> anyhow::Result<Flow> {
    let lines: Vec<String> = ctx
        .commands()
        .map(|command| match command.help_text() {
            Some(help) => format!("{} - {}", command.name(), help),
            None => command.name().to_string(),
        })
        .collect();

    ctx.println(HELP_HEADER)?;
    for line in &lines {
        ctx.println(line)?;
    }
    Ok(Flow::Continue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::ScriptedConsole;
    use crate::core::coerce::Coercers;
    use crate::core::commands::{Outcome, Registry, execute_command};
    use crate::core::parser::parse_input;

    fn noop(_: &mut (), _: &mut Context<'_, ()>) -> anyhow::Result<Flow> {
        Ok(Flow::Continue)
    }

    #[test]
    fn test_help_lists_every_command() {
        let user = CommandSet::new()
            .command(Command::new("Zap", noop).help("Zap things"))
            .command(Command::new("add", noop));
        let registry = Registry::discover([builtin_commands(), user]);
        let mut console = ScriptedConsole::default();

        let parsed = parse_input("help").unwrap();
        let outcome = execute_command(&parsed, &mut (), &registry, &Coercers::new(), &mut console);

        assert!(matches!(outcome, Outcome::Completed));
        assert_eq!(
            console.output_lines(),
            vec![
                "Available commands:",
                "add",
                "help",
                "Zap - Zap things",
            ]
        );
    }
}
