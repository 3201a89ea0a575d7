//! End-to-end sessions driven through the scripted console.

use std::cell::RefCell;
use std::rc::Rc;
use std::str::FromStr;

use anyhow::bail;
use cmdshell::{
    Command, CommandSet, Completer, Completion, Context, Flow, Param, ScriptedConsole, Shell,
    ShellConfig, ShellError, ShellState, WordListCompleter,
};

// =============================================================================
// Fixture
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Case {
    Upper,
    Lower,
}

impl FromStr for Case {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upper" => Ok(Self::Upper),
            "lower" => Ok(Self::Lower),
            other => Err(format!("unknown case '{other}'")),
        }
    }
}

#[derive(Default)]
struct Notebook {
    text: String,
    echoed: Vec<String>,
    words: Vec<String>,
}

impl ShellState for Notebook {
    fn prompt(&self, _: &ShellConfig) -> String {
        format!("[{}]> ", self.text)
    }
}

type Ctx<'a> = Context<'a, Notebook>;

fn echo(book: &mut Notebook, ctx: &mut Ctx<'_>) -> anyhow::Result<Flow> {
    let text: String = ctx.arg(0)?;
    ctx.println(&text)?;
    book.echoed.push(text);
    Ok(Flow::Continue)
}

fn append(book: &mut Notebook, ctx: &mut Ctx<'_>) -> anyhow::Result<Flow> {
    book.text.push_str(&ctx.arg::<String>(0)?);
    Ok(Flow::Continue)
}

fn repeat(book: &mut Notebook, ctx: &mut Ctx<'_>) -> anyhow::Result<Flow> {
    let count: i32 = ctx.arg(0)?;
    let text: String = ctx.arg(1)?;
    if count < 0 {
        bail!("count must not be negative, got {count}");
    }
    book.text.push_str(&text.repeat(count as usize));
    Ok(Flow::Continue)
}

fn case(book: &mut Notebook, ctx: &mut Ctx<'_>) -> anyhow::Result<Flow> {
    book.text = match ctx.arg::<Case>(0)? {
        Case::Upper => book.text.to_uppercase(),
        Case::Lower => book.text.to_lowercase(),
    };
    Ok(Flow::Continue)
}

fn quit(_: &mut Notebook, _: &mut Ctx<'_>) -> anyhow::Result<Flow> {
    Ok(Flow::exit("Goodbye."))
}

fn commands() -> CommandSet<Notebook> {
    CommandSet::new()
        .command(Command::new("echo", echo).param(Param::of::<String>().named("text")))
        .command(
            Command::new("append", append)
                .help("Append text")
                .param(Param::of::<String>().named("value")),
        )
        .command(
            Command::new("repeat", repeat)
                .param(Param::of::<i32>().named("count"))
                .param(Param::of::<String>().named("text")),
        )
        .command(
            Command::new("case", case)
                .help("Change case")
                .param(Param::of::<Case>().words(["upper", "lower"])),
        )
        .command(
            Command::new("insert", append).param(Param::of::<String>().completion(
                Completion::delegate(|book: &Notebook| {
                    Some(Box::new(WordListCompleter::new(book.words.clone())) as Box<dyn Completer>)
                }),
            )),
        )
        .command(Command::new("quit", quit).help("Leave the shell"))
}

fn shell(console: &ScriptedConsole) -> Shell<Notebook> {
    Shell::builder(Notebook::default())
        .commands(commands())
        .coerce_from_str::<Case>()
        .console(console.clone())
        .build()
        .unwrap()
}

// =============================================================================
// Sessions
// =============================================================================

#[test]
fn test_echo_then_end_of_input() {
    let console = ScriptedConsole::new(["echo hello"]);
    let mut shell = shell(&console);
    shell.run().unwrap();

    assert_eq!(shell.state().borrow().echoed, vec!["hello"]);
    assert_eq!(
        console.output_lines(),
        vec!["Welcome. Type 'help' for help.", "hello"]
    );
    // One prompt per line plus the one that hit end of input
    assert_eq!(console.prompts().len(), 2);
}

#[test]
fn test_unknown_command_continues() {
    let console = ScriptedConsole::new(["bogus", "echo \"still here\""]);
    let mut shell = shell(&console);
    shell.run().unwrap();

    assert_eq!(
        console.output_lines(),
        vec![
            "Welcome. Type 'help' for help.",
            "Unknown command 'bogus', try 'help'",
            "still here",
        ]
    );
}

#[test]
fn test_quit_stops_reading() {
    let console = ScriptedConsole::new(["append a", "quit", "append b"]);
    let mut shell = shell(&console);
    shell.run().unwrap();

    let lines = console.output_lines();
    assert_eq!(lines.last().map(String::as_str), Some("Goodbye."));
    assert_eq!(shell.state().borrow().text, "a");
    assert_eq!(console.prompts(), vec!["[]> ", "[a]> "]);
}

#[test]
fn test_help_lists_commands() {
    let console = ScriptedConsole::new(["help"]);
    let mut shell = shell(&console);
    shell.run().unwrap();

    assert_eq!(
        console.output_lines(),
        vec![
            "Welcome. Type 'help' for help.",
            "Available commands:",
            "append - Append text",
            "case - Change case",
            "echo",
            "help",
            "insert",
            "quit - Leave the shell",
            "repeat",
        ]
    );
}

#[test]
fn test_quoted_argument_and_arity() {
    let console = ScriptedConsole::new([
        "append \"hello world\"",
        "append too many",
        "quit now",
    ]);
    let mut shell = shell(&console);
    shell.run().unwrap();

    assert_eq!(shell.state().borrow().text, "hello world");
    assert_eq!(
        &console.output_lines()[1..],
        [
            "'append': Invalid number of arguments, got 2, expected 1",
            "Usage: append value",
            "'quit': Invalid number of arguments, got 1, expected 0",
            "Usage: quit",
        ]
    );
}

#[test]
fn test_coercion_of_builtin_and_custom_types() {
    let console = ScriptedConsole::new(["repeat 3 ab", "case upper", "repeat x ab", "case title"]);
    let mut shell = shell(&console);
    shell.run().unwrap();

    assert_eq!(shell.state().borrow().text, "ABABAB");
    let output = console.output();
    assert!(output.contains("Cannot parse 'x' to i32 for parameter 0"));
    assert!(output.contains("unable to construct Case from string, parameter 0: unknown case 'title'"));
}

#[test]
fn test_handler_error_does_not_end_session() {
    let console = ScriptedConsole::new(["repeat -1 x", "append ok"]);
    let mut shell = shell(&console);
    shell.run().unwrap();

    assert!(console.output().contains("count must not be negative, got -1"));
    assert_eq!(shell.state().borrow().text, "ok");
}

#[test]
fn test_console_failure_ends_run_with_error() {
    let console = ScriptedConsole::new(["append a"]);
    console.push_failure("terminal vanished");
    console.push_line("append b");
    let mut shell = shell(&console);

    let err = shell.run().unwrap_err();
    assert!(matches!(err, ShellError::Io(_)));
    assert!(err.to_string().contains("terminal vanished"));
    assert_eq!(shell.state().borrow().text, "a");
}

#[test]
fn test_derived_layer_overrides_base() {
    let derived = CommandSet::new().command(
        Command::new("echo", |_: &mut Notebook, ctx: &mut Ctx<'_>| {
            let text: String = ctx.arg(0)?;
            ctx.println(&format!(">> {text}"))?;
            Ok(Flow::Continue)
        })
        .param(Param::of::<String>()),
    );
    let console = ScriptedConsole::new(["echo hi"]);
    let mut shell = Shell::builder(Notebook::default())
        .commands(commands())
        .commands(derived)
        .coerce_from_str::<Case>()
        .console(console.clone())
        .build()
        .unwrap();
    shell.run().unwrap();

    assert_eq!(console.output_lines().last().map(String::as_str), Some(">> hi"));
    assert!(shell.state().borrow().echoed.is_empty());
}

#[test]
fn test_help_can_be_replaced() {
    let custom = CommandSet::new().command(Command::new(
        "help",
        |_: &mut Notebook, ctx: &mut Ctx<'_>| {
            ctx.println("no help here")?;
            Ok(Flow::Continue)
        },
    ));
    let console = ScriptedConsole::new(["help"]);
    let mut shell = Shell::builder(Notebook::default())
        .commands(custom)
        .console(console.clone())
        .build()
        .unwrap();
    shell.run().unwrap();

    assert_eq!(console.output_lines().last().map(String::as_str), Some("no help here"));
}

// =============================================================================
// Completion
// =============================================================================

#[test]
fn test_completion_of_names_and_arguments() {
    let console = ScriptedConsole::default();
    let shell = shell(&console);
    assert_eq!(console.completer_count(), shell.registry().len());

    assert_eq!(
        console.complete("re", 2),
        Some((0, vec!["repeat ".to_string()]))
    );
    assert_eq!(
        console.complete("case ", 5),
        Some((5, vec!["lower".to_string(), "upper".to_string()]))
    );
    assert_eq!(
        console.complete("case u", 6),
        Some((5, vec!["upper ".to_string()]))
    );
    assert_eq!(console.complete("echo x", 6), None);
}

#[test]
fn test_completion_merges_command_names() {
    let console = ScriptedConsole::default();
    let _shell = shell(&console);
    assert_eq!(
        console.complete("e", 1),
        Some((0, vec!["echo ".to_string()]))
    );
    let (start, names) = console.complete("", 0).unwrap();
    assert_eq!(start, 0);
    assert_eq!(names.len(), 7);
}

#[test]
fn test_delegated_completion_follows_state() {
    let console = ScriptedConsole::default();
    let shell = shell(&console);
    assert_eq!(console.complete("insert ", 7), None);

    let state: &Rc<RefCell<Notebook>> = shell.state();
    state.borrow_mut().words = vec!["alpha".into(), "beta".into()];
    assert_eq!(
        console.complete("insert a", 8),
        Some((7, vec!["alpha ".to_string()]))
    );
}
