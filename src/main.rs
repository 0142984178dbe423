use std::{
    fs,
    io::{self, Write},
    process::ExitCode,
};

use calci::{error::Error, interpreter::session::Interpreter};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// calci is a small scripting language with closures, loops and shared
/// arrays.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Tells calci to look at a file instead of a script.
    #[arg(short, long)]
    file: bool,

    /// Pipe mode is a feature that automatically prints out the final value
    /// of a calci script.
    #[arg(short, long)]
    pipe_mode: bool,

    /// Starts an interactive session after running `contents`, if given.
    #[arg(short, long)]
    repl: bool,

    contents: Option<String>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("CALCI_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter)
                             .with_writer(io::stderr)
                             .init();
}

/// Prints `error` followed by the source line it was reported on.
fn report(error: &Error, source: &str) {
    eprintln!("{error}");
    if let Some(text) = error.line()
                             .and_then(|line| line.checked_sub(1))
                             .and_then(|index| source.lines().nth(index))
    {
        eprintln!("    | {}", text.trim());
    }
}

fn run_prompt(session: &mut Interpreter<io::Stdout>) {
    let mut input = String::new();
    let stdin = io::stdin();
    loop {
        input.clear();
        print!("> ");
        if let Err(e) = io::stdout().flush() {
            eprintln!("Failed flush: {e}");
        }
        match stdin.read_line(&mut input) {
            Ok(0) => {
                println!();
                break;
            },
            Ok(_) => {},
            Err(e) => {
                eprintln!("Failed read line: {e}");
                continue;
            },
        }
        match session.run(input.trim()) {
            Ok(value) if !value.is_unit() => println!("{value}"),
            Ok(_) => {},
            Err(e) => report(&e, input.trim()),
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing();

    let script = match (args.contents, args.file) {
        (Some(path), true) => match fs::read_to_string(&path) {
            Ok(script) => Some(script),
            Err(e) => {
                eprintln!("Failed to read the input file '{path}': {e}");
                return ExitCode::FAILURE;
            },
        },
        (contents, _) => contents,
    };

    let mut session = Interpreter::new(io::stdout());

    if let Some(script) = script {
        match session.run(&script) {
            Ok(value) => {
                if args.pipe_mode && !value.is_unit() {
                    println!("{value}");
                }
            },
            Err(e) => {
                report(&e, &script);
                if !args.repl {
                    return ExitCode::FAILURE;
                }
            },
        }
    } else if !args.repl {
        eprintln!("Nothing to run: pass a script, a file with --file, or --repl.");
        return ExitCode::FAILURE;
    }

    if args.repl {
        run_prompt(&mut session);
    }
    ExitCode::SUCCESS
}
