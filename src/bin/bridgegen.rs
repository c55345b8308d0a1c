#![allow(clippy::print_stderr)]

use anyhow::{Context, Result};
use clap::Parser;
use std::io::IsTerminal;

use bridgegen::cli::args::CliArgs;
use bridgegen::cli::{driver, reporter::Reporter};

/// Every artifact was generated and no error was reported.
const EXIT_SUCCESS: i32 = 0;
/// At least one error was reported; affected namespaces produced no output.
const EXIT_DIAGNOSTICS_OUTPUTS_SKIPPED: i32 = 1;
/// The run itself failed (unreadable input, malformed document, I/O).
const EXIT_INTERNAL_FAILURE: i32 = 2;

fn main() {
    bridgegen::tracing_config::init_tracing();

    let args = CliArgs::parse();
    let code = match run(&args) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            EXIT_INTERNAL_FAILURE
        }
    };
    std::process::exit(code);
}

fn run(args: &CliArgs) -> Result<i32> {
    let cwd = std::env::current_dir().context("failed to resolve current directory")?;
    let result = driver::run(args, &cwd)?;

    let reporter = Reporter::new(args.pretty_output(std::io::stderr().is_terminal()));
    let generation = &result.generation;
    let diagnostics: Vec<_> = generation.diagnostics().collect();
    if !diagnostics.is_empty() {
        eprintln!("{}", reporter.render(diagnostics.iter().copied()));
    }
    if let Some(summary) = reporter.summary(generation.error_count(), generation.warning_count()) {
        eprintln!("\n{summary}");
    }

    if args.list_plans {
        for line in &result.plan_lines {
            println!("{line}");
        }
    } else if args.stdout {
        for artifact in generation.artifacts() {
            println!("// {}", artifact.file_name);
            print!("{}", artifact.text);
        }
    }

    Ok(if result.has_errors() {
        EXIT_DIAGNOSTICS_OUTPUTS_SKIPPED
    } else {
        EXIT_SUCCESS
    })
}
