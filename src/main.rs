//! iruncode - Entry Point
//!
//! Local front end for the command pipeline. `run` and `inline` execute one
//! snippet, `langs` lists runtimes, and `repl` (the default) reads chat-style
//! commands such as `/run python print(1)` from the terminal.

use std::io::{self, BufRead, Read, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;

use iruncode::command::{parse, Command, CommandHandler, Reply};
use iruncode::core::config::BotConfig;
use iruncode::core::error::Result;
use iruncode::core::types::{RunResponse, RunResult, GENERIC_ERROR_MESSAGE};
use iruncode::piston::PistonClient;

const USAGE_MSG: &str = "Usage:
/run [language]
[your code]
...
/stdin [input text] (optional)
...

type /langs for list of supported languages.
End a line with \\ to continue the command on the next line.";

/// Run code snippets on a Piston sandbox
#[derive(Parser, Debug)]
#[command(name = "iruncode")]
#[command(about = "Run code snippets on a remote Piston sandbox")]
struct Args {
    /// TOML config file; environment variables override it
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Run `<language> <code> [/stdin <input>]`; reads stdin when TEXT is omitted
    Run { text: Vec<String> },
    /// Answer TEXT the way an inline query would be answered
    Inline { text: Vec<String> },
    /// List supported languages
    Langs,
    /// Interactive chat-style session (default)
    Repl,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("iruncode=info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => BotConfig::load_from_toml(path)?,
        None => BotConfig::default(),
    }
    .apply_env()?;

    let client = PistonClient::new(&config)?;
    if !client.is_authenticated() {
        tracing::warn!("No auth token configured - requests are rate limited");
    }
    let handler = CommandHandler::new(client, config.bot_username.clone());

    let rt = Runtime::new()?;

    match args.mode.unwrap_or(Mode::Repl) {
        Mode::Run { text } => {
            let text = text_or_stdin(text)?;
            match parse(&text) {
                Ok(request) => print_run(&rt.block_on(handler.client().execute(request))),
                Err(_) => println!("{}", USAGE_MSG),
            }
        }
        Mode::Inline { text } => {
            let text = text_or_stdin(text)?;
            let answer = rt.block_on(handler.answer_inline(&text));
            println!("[{}] {}", answer.title(), answer.description);
            if let Some(fork) = answer.fork_text() {
                println!("Fork: {:?}", fork);
            }
        }
        Mode::Langs => print_reply(&rt.block_on(handler.handle(Command::Langs))),
        Mode::Repl => repl(&rt, &handler)?,
    }

    Ok(())
}

fn text_or_stdin(words: Vec<String>) -> Result<String> {
    if !words.is_empty() {
        return Ok(words.join(" "));
    }
    let mut text = String::new();
    io::stdin().read_to_string(&mut text)?;
    Ok(text)
}

fn repl(rt: &Runtime, handler: &CommandHandler) -> Result<()> {
    println!("\n=== iruncode ===");
    println!("{}\n", USAGE_MSG);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let Some(input) = read_command(&mut lines)? else {
            break;
        };
        let input = input.trim_end();

        if input.is_empty() {
            continue;
        }
        if input == "quit" || input == "q" {
            break;
        }

        match rt.block_on(handler.handle_text(input)) {
            Some(reply) => print_reply(&reply),
            None => println!("Unknown command. Available: /run, /langs, /help, quit"),
        }
    }

    println!("\nGoodbye!");
    Ok(())
}

/// Read one logical command, joining lines that end with a backslash
fn read_command<B: BufRead>(lines: &mut io::Lines<B>) -> Result<Option<String>> {
    let mut command = String::new();
    loop {
        let Some(line) = lines.next().transpose()? else {
            return Ok((!command.is_empty()).then_some(command));
        };
        match line.strip_suffix('\\') {
            Some(partial) => {
                command.push_str(partial);
                command.push('\n');
            }
            None => {
                command.push_str(&line);
                return Ok(Some(command));
            }
        }
    }
}

fn print_reply(reply: &Reply) {
    match reply {
        Reply::Usage => println!("{}", USAGE_MSG),
        Reply::Run(response) => print_run(response),
        Reply::Languages(languages) => {
            println!("Supported languages:");
            for language in languages {
                println!("  {}", language);
            }
        }
        Reply::Failure => println!("{}", GENERIC_ERROR_MESSAGE),
    }
}

fn print_run(response: &RunResponse) {
    if response.result == RunResult::Unknown {
        println!("{}", GENERIC_ERROR_MESSAGE);
        return;
    }

    let request = &response.request;
    print_block("Language", request.language());
    print_block("Code", request.code());
    print_block("Stdin", request.stdin());
    match response.result {
        RunResult::Success => print_block("Output", &response.output),
        _ => print_block("Error", &response.output),
    }
    if let Some(fork) = response.fork_text() {
        println!("Fork: {:?}", fork);
    }
}

fn print_block(name: &str, text: &str) {
    if !text.is_empty() {
        println!("{}:\n{}\n", name, text.trim_end());
    }
}
