//! String builder shell.
//!
//! A small interactive editor for one line of text, showing every kind of
//! parameter and completion `cmdshell` supports.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

use anyhow::{Context as _, bail};
use clap::Parser;
use cmdshell::{
    Command, CommandSet, Completer, Completion, Context, Flow, Param, Shell, ShellConfig,
    ShellState, WordListCompleter,
};
use log::{debug, info};

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "cmdshell-demo")]
#[command(about = "Build a string one command at a time")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Shell configuration file (TOML)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Verbose logging output, repeat for more
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,
}

// =============================================================================
// State
// =============================================================================

struct StringBuilder {
    text: String,
    styles: Vec<String>,
}

impl StringBuilder {
    fn new() -> Self {
        Self {
            text: String::new(),
            styles: ["plain", "shout", "whisper"].map(String::from).to_vec(),
        }
    }

    /// Words of the current text, for `insert`.
    fn words(&self) -> Vec<String> {
        self.text.split_whitespace().map(String::from).collect()
    }
}

impl ShellState for StringBuilder {
    fn prompt(&self, _: &ShellConfig) -> String {
        format!("[{}]> ", self.text)
    }
}

#[derive(Debug, Clone, Copy)]
enum Case {
    Upper,
    Lower,
}

impl FromStr for Case {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "upper" => Ok(Self::Upper),
            "lower" => Ok(Self::Lower),
            _ => Err(format!("expected 'upper' or 'lower', got '{s}'")),
        }
    }
}

// =============================================================================
// Commands
// =============================================================================

type Ctx<'a> = Context<'a, StringBuilder>;

fn new(sb: &mut StringBuilder, _: &mut Ctx<'_>) -> anyhow::Result<Flow> {
    sb.text.clear();
    Ok(Flow::Continue)
}

fn append(sb: &mut StringBuilder, ctx: &mut Ctx<'_>) -> anyhow::Result<Flow> {
    sb.text.push_str(&ctx.arg::<String>(0)?);
    Ok(Flow::Continue)
}

fn repeat(sb: &mut StringBuilder, ctx: &mut Ctx<'_>) -> anyhow::Result<Flow> {
    let count: i32 = ctx.arg(0)?;
    let text: String = ctx.arg(1)?;
    let Ok(count) = usize::try_from(count) else {
        bail!("count must not be negative, got {count}");
    };
    sb.text.push_str(&text.repeat(count));
    Ok(Flow::Continue)
}

fn case(sb: &mut StringBuilder, ctx: &mut Ctx<'_>) -> anyhow::Result<Flow> {
    sb.text = match ctx.arg::<Case>(0)? {
        Case::Upper => sb.text.to_uppercase(),
        Case::Lower => sb.text.to_lowercase(),
    };
    Ok(Flow::Continue)
}

fn load(sb: &mut StringBuilder, ctx: &mut Ctx<'_>) -> anyhow::Result<Flow> {
    let path: String = ctx.arg(0)?;
    let content = fs::read_to_string(&path).with_context(|| format!("cannot load '{path}'"))?;
    debug!("loaded {} bytes from {}", content.len(), path);
    sb.text.push_str(content.trim_end());
    Ok(Flow::Continue)
}

fn insert(sb: &mut StringBuilder, ctx: &mut Ctx<'_>) -> anyhow::Result<Flow> {
    let word: String = ctx.arg(0)?;
    if !sb.text.is_empty() {
        sb.text.push(' ');
    }
    sb.text.push_str(&word);
    Ok(Flow::Continue)
}

fn style(sb: &mut StringBuilder, ctx: &mut Ctx<'_>) -> anyhow::Result<Flow> {
    let name: String = ctx.arg(0)?;
    sb.text = match name.as_str() {
        "plain" => sb.text.trim_end_matches('!').to_string(),
        "shout" => format!("{}!", sb.text.to_uppercase()),
        "whisper" => format!("({})", sb.text.to_lowercase()),
        other => bail!("unknown style '{other}', one of: {}", sb.styles.join(", ")),
    };
    Ok(Flow::Continue)
}

fn show(sb: &mut StringBuilder, ctx: &mut Ctx<'_>) -> anyhow::Result<Flow> {
    ctx.println(&sb.text)?;
    Ok(Flow::Continue)
}

fn quit(_: &mut StringBuilder, _: &mut Ctx<'_>) -> anyhow::Result<Flow> {
    Ok(Flow::exit("Goodbye."))
}

fn commands() -> CommandSet<StringBuilder> {
    CommandSet::new()
        .command(Command::new("new", new).help("Start over with an empty string"))
        .command(
            Command::new("append", append)
                .help("Append text")
                .param(Param::of::<String>().named("value")),
        )
        .command(
            Command::new("repeat", repeat)
                .help("Append text several times")
                .param(Param::of::<i32>().named("count"))
                .param(Param::of::<String>().named("text")),
        )
        .command(
            Command::new("case", case)
                .help("Change the case of the string")
                .param(Param::of::<Case>().named("case").words(["upper", "lower"])),
        )
        .command(
            Command::new("load", load)
                .help("Append the contents of a file")
                .param(Param::of::<String>().named("file").filename()),
        )
        .command(
            Command::new("insert", insert)
                .help("Append a word already in the string")
                .param(Param::of::<String>().named("word").completion(
                    Completion::delegate(|sb: &StringBuilder| {
                        Some(Box::new(WordListCompleter::new(sb.words())) as Box<dyn Completer>)
                    }),
                )),
        )
        .command(
            Command::new("style", style)
                .help("Restyle the string")
                .param(
                    Param::of::<String>()
                        .named("style")
                        .completion(Completion::snapshot(|sb: &StringBuilder| {
                            Ok(sb.styles.clone())
                        })),
                ),
        )
        .command(Command::new("show", show).help("Print the string"))
        .command(Command::new("quit", quit).help("Leave the shell"))
}

// =============================================================================
// Entry Point
// =============================================================================

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn try_main(cli: &Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => ShellConfig::load(path)?,
        None => ShellConfig::default(),
    };
    info!("starting shell (edit mode {:?})", config.edit_mode);

    let mut shell = Shell::builder(StringBuilder::new())
        .config(config)
        .commands(commands())
        .coerce_from_str::<Case>()
        .build()?;
    shell.run()?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match try_main(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("cmdshell-demo: {err:#}");
            ExitCode::FAILURE
        }
    }
}
