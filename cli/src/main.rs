mod grammar;

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use clif_core::{CommandLineConfiguration, DEFAULT_APP_NAME, validate_configuration};
use clif_parser::{ParseSummary, Verbosity, format_command, format_error, format_with, parse};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::grammar::Grammar;

/// Exit status when the checked arguments do not match the grammar.
const EXIT_REJECTED: i32 = 2;

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Text,
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(name = "clif")]
#[command(about = "Check argument lists against declared command-line grammars")]
struct Cli {
    /// Log debug events to stderr (RUST_LOG takes precedence).
    #[arg(long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse an argument list against a grammar and print what matched.
    Check(CheckArgs),
    /// Print the usage text of a grammar or one of its commands.
    Usage(UsageArgs),
    /// Report grammar problems that loading does not reject.
    Lint(LintArgs),
}

#[derive(Debug, Args)]
struct CheckArgs {
    /// Grammar file (YAML, or JSON with a .json extension).
    #[arg(long)]
    grammar: PathBuf,
    /// Output format for the match summary.
    #[arg(long, default_value = "text")]
    format: CliOutputFormat,
    /// Arguments to check, given after `--`.
    #[arg(last = true)]
    args: Vec<String>,
}

#[derive(Debug, Args)]
struct UsageArgs {
    /// Grammar file (YAML, or JSON with a .json extension).
    #[arg(long)]
    grammar: PathBuf,
    /// Print the usage of this command instead of the root usage.
    #[arg(long)]
    command: Option<String>,
    /// Use long descriptions where the grammar has them.
    #[arg(long)]
    full: bool,
}

#[derive(Debug, Args)]
struct LintArgs {
    /// Grammar file (YAML, or JSON with a .json extension).
    #[arg(long)]
    grammar: PathBuf,
    /// Exit with an error when any finding is reported.
    #[arg(long)]
    deny_warnings: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Check(args) => run_check(args),
        Command::Usage(args) => run_usage(args).map(|()| true),
        Command::Lint(args) => run_lint(args).map(|()| true),
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(EXIT_REJECTED),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();
}

/// Returns `Ok(false)` when the arguments were rejected; the error and
/// usage are already on stderr then.
fn run_check(args: CheckArgs) -> Result<bool, String> {
    let config = load_configuration(&args.grammar)?;
    info!(arguments = args.args.len(), "Checking arguments");

    match parse(&config, &args.args) {
        Ok(result) => {
            let summary = result.to_summary();
            print_summary(&summary, args.format)?;
            Ok(true)
        }
        Err(err) => {
            debug!(error = %err, "Arguments rejected");
            eprint!("{}", format_error(&config, &err));
            Ok(false)
        }
    }
}

fn run_usage(args: UsageArgs) -> Result<(), String> {
    let config = load_configuration(&args.grammar)?;
    let verbosity = if args.full {
        Verbosity::Full
    } else {
        Verbosity::Short
    };

    let text = match &args.command {
        Some(keyword) => {
            let command = config
                .command(keyword)
                .ok_or_else(|| format!("Command '{keyword}' is not declared in the grammar"))?;
            format_command(&config, command, verbosity)
        }
        None => format_with(&config, verbosity),
    };
    print!("{text}");
    Ok(())
}

fn run_lint(args: LintArgs) -> Result<(), String> {
    let config = load_configuration(&args.grammar)?;
    let warnings = validate_configuration(&config);

    if warnings.is_empty() {
        println!("No findings in '{}'.", args.grammar.display());
        return Ok(());
    }
    for warning in &warnings {
        println!("warning: {warning}");
    }
    println!(
        "{} finding(s) in '{}'.",
        warnings.len(),
        args.grammar.display()
    );

    if args.deny_warnings {
        return Err(format!("{} lint finding(s) denied", warnings.len()));
    }
    Ok(())
}

fn load_configuration(path: &Path) -> Result<CommandLineConfiguration, String> {
    let fallback_name = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(DEFAULT_APP_NAME);
    Grammar::load(path)
        .and_then(|grammar| grammar.into_configuration(fallback_name))
        .map_err(|err| format!("Failed to load grammar '{}': {err}", path.display()))
}

fn print_summary(summary: &ParseSummary, format: CliOutputFormat) -> Result<(), String> {
    match format {
        CliOutputFormat::Json => {
            let raw = serde_json::to_string_pretty(summary)
                .map_err(|err| format!("Failed to serialize summary: {err}"))?;
            println!("{raw}");
        }
        CliOutputFormat::Yaml => {
            let raw = serde_yaml::to_string(summary)
                .map_err(|err| format!("Failed to serialize summary: {err}"))?;
            print!("{raw}");
        }
        CliOutputFormat::Text => {
            match &summary.command {
                Some(keyword) => println!("command: {keyword}"),
                None => println!("command: (root)"),
            }
            for input in &summary.options {
                match &input.value {
                    Some(value) => println!("option {}: {value}", input.identifier),
                    None => println!("option {}", input.identifier),
                }
            }
            for input in &summary.parameters {
                match &input.value {
                    Some(value) => println!("parameter {}: {value}", input.identifier),
                    None => println!("parameter {}", input.identifier),
                }
            }
        }
    }
    Ok(())
}
