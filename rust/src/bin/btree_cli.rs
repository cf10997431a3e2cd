//! Binary entry point for the B-tree index command-line interface.
//!
//! Every invocation prints exactly one JSON envelope on stdout (`repl`
//! prints one per input line). Logs go to stderr.
#![forbid(unsafe_code)]

use std::error::Error;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use btree_index::{BTreeResult, Command, Dispatcher, EngineConfig, Key, Response, TreeSnapshot};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "btree-cli",
    version,
    about = "In-memory B-tree index driven by single commands or a REPL",
    disable_help_subcommand = true
)]
struct Cli {
    #[arg(
        long,
        global = true,
        value_name = "FILE",
        help = "Snapshot file restored before and saved after each command"
    )]
    state: Option<PathBuf>,

    #[arg(long, global = true, help = "Indent JSON output")]
    pretty: bool,

    #[arg(
        long,
        global = true,
        env = "RUST_LOG",
        value_name = "FILTER",
        help = "Tracing filter directive written to stderr"
    )]
    log: Option<String>,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand, Debug)]
enum CliCommand {
    /// Start a fresh tree, discarding any existing one
    Init {
        #[arg(allow_hyphen_values = true)]
        degree: Option<String>,
    },
    /// Insert a key
    Insert {
        #[arg(allow_hyphen_values = true)]
        key: String,
    },
    /// Look up a key and report the search path
    Search {
        #[arg(allow_hyphen_values = true)]
        key: String,
    },
    /// Delete a key
    Delete {
        #[arg(allow_hyphen_values = true)]
        key: String,
    },
    /// List every key in ascending order
    Traverse,
    /// Print the current tree structure level by level
    Show,
    /// Read one command per line from stdin
    Repl,
}

fn main() -> ExitCode {
    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(2)
        }
    }
}

/// Returns whether the command (or, for `repl`, the last line) produced a
/// success envelope.
fn run() -> Result<bool, Box<dyn Error>> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;
    init_logging(&config.log_filter)?;

    let mut dispatcher = match open_dispatcher(config.state_file.as_deref())? {
        Ok(dispatcher) => dispatcher,
        Err(err) => {
            emit(&Response::failure(&err), config.pretty)?;
            return Ok(false);
        }
    };

    // Arguments go through the dispatcher's parser so malformed keys come
    // back as `invalid_argument` envelopes.
    let words = match cli.command {
        CliCommand::Show => {
            let response = dispatcher.show();
            emit(&response, config.pretty)?;
            return Ok(response.success);
        }
        CliCommand::Repl => return repl(&mut dispatcher, &config),
        CliCommand::Init { degree } => vec![
            "init".to_string(),
            degree.unwrap_or_else(|| config.default_degree.to_string()),
        ],
        CliCommand::Insert { key } => vec!["insert".to_string(), key],
        CliCommand::Search { key } => vec!["search".to_string(), key],
        CliCommand::Delete { key } => vec!["delete".to_string(), key],
        CliCommand::Traverse => vec!["traverse".to_string()],
    };

    let command = match Command::parse(&words) {
        Ok(command) => command,
        Err(err) => {
            emit(&Response::failure(&err), config.pretty)?;
            return Ok(false);
        }
    };

    let response = dispatcher.respond(command);
    if response.success && !command.is_read_only() {
        save_state(&dispatcher, config.state_file.as_deref())?;
    }
    emit(&response, config.pretty)?;
    Ok(response.success)
}

fn resolve_config(cli: &Cli) -> Result<EngineConfig, Box<dyn Error>> {
    let mut config = EngineConfig::from_env()?;
    if let Some(state) = &cli.state {
        config.state_file = Some(state.clone());
    }
    if cli.pretty {
        config.pretty = true;
    }
    if let Some(filter) = cli.log.as_ref().filter(|filter| !filter.is_empty()) {
        config.log_filter = filter.clone();
    }
    Ok(config)
}

fn init_logging(filter: &str) -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(filter)?)
        .with_writer(io::stderr)
        .with_target(true)
        .try_init()
        .map_err(|err| err.to_string())?;
    Ok(())
}

// ============================================================================
// STATE FILE
// ============================================================================

/// Restore the dispatcher from the state file, if one exists.
///
/// I/O failures are returned as the outer error; a file that does not hold
/// a valid tree is returned as the inner error so it can be reported in the
/// envelope.
fn open_dispatcher(path: Option<&Path>) -> io::Result<BTreeResult<Dispatcher>> {
    let Some(path) = path else {
        return Ok(Ok(Dispatcher::new()));
    };
    let json = match fs::read_to_string(path) {
        Ok(json) => json,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no state file, starting uninitialized");
            return Ok(Ok(Dispatcher::new()));
        }
        Err(err) => return Err(err),
    };
    if json.trim().is_empty() {
        return Ok(Ok(Dispatcher::new()));
    }

    Ok(TreeSnapshot::<Key>::from_json(&json)
        .and_then(|snapshot| Dispatcher::from_snapshot(&snapshot)))
}

fn save_state(dispatcher: &Dispatcher, path: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let Some(path) = path else {
        return Ok(());
    };
    let json = dispatcher.snapshot()?.to_json_pretty()?;
    fs::write(path, json)?;
    tracing::debug!(path = %path.display(), "saved state file");
    Ok(())
}

// ============================================================================
// OUTPUT
// ============================================================================

fn emit(response: &Response, pretty: bool) -> Result<(), Box<dyn Error>> {
    let json = if pretty {
        response.to_json_pretty()?
    } else {
        response.to_json()?
    };
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{json}")?;
    stdout.flush()?;
    Ok(())
}

/// Returns whether the last executed line produced a success envelope.
fn repl(dispatcher: &mut Dispatcher, config: &EngineConfig) -> Result<bool, Box<dyn Error>> {
    tracing::debug!("repl started");
    let mut last_success = true;
    for line in io::stdin().lock().lines() {
        let line = line?;
        let line = line.trim();
        let response = match line {
            "" => continue,
            "exit" | "quit" => break,
            "show" => dispatcher.show(),
            _ => match line.parse::<Command>() {
                Ok(command) => {
                    let response = dispatcher.respond(command);
                    if response.success && !command.is_read_only() {
                        save_state(dispatcher, config.state_file.as_deref())?;
                    }
                    response
                }
                Err(err) => Response::failure(&err),
            },
        };
        last_success = response.success;
        // One envelope per line, regardless of --pretty.
        emit(&response, false)?;
    }
    Ok(last_success)
}
