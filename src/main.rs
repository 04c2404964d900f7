mod command_table;
mod commands;
mod config;
mod diagnostics;
mod error;
mod grammar;
mod graph;
mod logging;
mod paths;
mod scanner;
mod tokenizer;
mod types;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use crate::tokenizer::TokenizerKind;

/// Command-line interface.
#[derive(Parser)]
#[command(name = "shxref", version, about = "Cross-reference indexer for shell scripts")]
struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
    /// Treat every identifier as a local reference; skip the POSIX command table.
    #[arg(long, global = true)]
    plain: bool,
    /// Token backend, overriding `.shxref.toml`.
    #[arg(long, global = true, value_enum)]
    tokenizer: Option<TokenizerKind>,
    /// Log at debug level unless `SHXREF_LOG` says otherwise.
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Host-facing subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Read a source unit from stdin and list its dependencies
    Depresolve,
    /// Read source units from stdin and emit their defs and refs
    Graph,
    /// Find shell scripts under the current directory
    Scan,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    return match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            diagnostics::print_error(&e);
            ExitCode::FAILURE
        },
    };
}

/// Load config, apply CLI overrides, and dispatch.
///
/// # Errors
///
/// Returns any error from config loading or the selected command.
fn run(cli: &Cli) -> Result<(), error::Error> {
    let root: PathBuf = std::env::current_dir()?;
    let mut config = config::Config::load(&root)?;
    if cli.plain {
        config.resolve_external_commands = false;
    }
    if let Some(kind) = cli.tokenizer {
        config.tokenizer = kind;
    }

    return match cli.command {
        Commands::Depresolve => commands::depresolve(),
        Commands::Graph => commands::graph(&root, &config),
        Commands::Scan => commands::scan(&root, &config),
    };
}
