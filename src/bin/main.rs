use anyhow::Context;
use clap::Parser;
use lox_scanner::{error::stderr_reporter, scan_all, StreamReporter, Token};
use std::{
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
};

/// Exit status for a script with lexical errors.
const EXIT_DATA_ERROR: i32 = 65;

/// Print the tokens of a Lox script.
#[derive(Parser, Debug)]
#[command(name = "lox-scan")]
#[command(version)]
struct Cli {
    /// Script to scan; starts an interactive prompt when omitted
    #[arg(value_name = "SCRIPT")]
    script: Option<PathBuf>,

    /// Print tokens as a JSON array
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match &cli.script {
        Some(path) => run_file(path, cli.json),
        None => {
            let stdin = io::stdin();
            run_prompt(stdin.lock(), &mut io::stdout(), &mut stderr_reporter(), cli.json)
        },
    }
}

fn run_file(path: &Path, json: bool) -> anyhow::Result<()> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("could not read {}", path.display()))?;

    let mut reporter = stderr_reporter();
    run(&contents, json, &mut reporter, &mut io::stdout())?;

    match exit_code(&reporter) {
        0 => Ok(()),
        code => std::process::exit(code),
    }
}

fn exit_code<E: Write>(reporter: &StreamReporter<E>) -> i32 {
    if reporter.had_error() { EXIT_DATA_ERROR } else { 0 }
}

fn run_prompt<I: BufRead, W: Write, E: Write>(
    mut input: I,
    out: &mut W,
    reporter: &mut StreamReporter<E>,
    json: bool,
) -> anyhow::Result<()> {
    let mut buffer = String::new();

    loop {
        write!(out, "> ")?;
        out.flush()?;

        buffer.clear();

        let num_bytes = input.read_line(&mut buffer)?;
        if num_bytes == 0 { break };

        run(buffer.as_str(), json, reporter, out)?;
        reporter.reset();
    }

    Ok(())
}

fn run<W: Write, E: Write>(
    source: &str,
    json: bool,
    reporter: &mut StreamReporter<E>,
    out: &mut W,
) -> anyhow::Result<()> {
    let tokens = scan_all(source, reporter);
    print_tokens(&tokens, json, out)
}

fn print_tokens<W: Write>(tokens: &[Token], json: bool, out: &mut W) -> anyhow::Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut *out, tokens)?;
        writeln!(out)?;
    } else {
        for token in tokens {
            writeln!(out, "{}", token)?;
        }
    }
    Ok(())
}
