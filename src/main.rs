use std::{fs, io::{self, BufRead, Write}, path::PathBuf, process::ExitCode};

use anyhow::Context;
use clap::Parser;
use egg::{skip, Interpreter};

/// Runs programs written in Egg, a tiny expression language.
///
/// With neither a file nor `--eval`, reads programs from stdin one line at a
/// time. Set `RUST_LOG=egg=debug` (or `trace`) for interpreter logging.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Source file to run.
    file: Option<PathBuf>,

    /// Run this source text instead of a file.
    #[arg(short = 'e', long = "eval", conflicts_with = "file")]
    source: Option<String>,

    /// Don't echo the value the program evaluates to.
    #[arg(short, long)]
    quiet: bool,
}

fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    // Only install a subscriber when RUST_LOG is set
    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_level(true).with_writer(io::stderr))
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn repl(interpreter: &Interpreter) -> anyhow::Result<ExitCode> {
    let mut stdout = io::stdout();
    let mut lines = io::stdin().lock().lines();

    loop {
        stdout.write_all(b"> ")?;
        stdout.flush()?;
        let Some(line) = lines.next() else { break };
        let line = line?;
        if skip(&line).is_empty() { continue; }

        match interpreter.run(&line) {
            Ok(value) => println!("{}", value),
            Err(err) => println!("Error: {}", err),
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn main() -> anyhow::Result<ExitCode> {
    init_tracing();
    let args = Args::parse();
    let interpreter = Interpreter::new();

    let source = match (args.source, args.file) {
        (Some(source), _) => source,
        (None, Some(path)) => fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        (None, None) => return repl(&interpreter),
    };

    match interpreter.run(&source) {
        Ok(value) => {
            if !args.quiet { println!("{}", value); }
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            eprintln!("{}", err);
            Ok(ExitCode::FAILURE)
        }
    }
}
