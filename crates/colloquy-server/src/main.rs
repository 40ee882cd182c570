//! `colloquy-server` binary
//!
//! Refuses to start without an explicit configuration file: the built-in
//! test configuration carries a public signing secret and an in-memory
//! database.

use colloquy_server::{config::ServerConfig, start_server};
use std::process::ExitCode;

const USAGE: &str = "\
Colloquy - Q&A service with follows, votes and collections

USAGE:
    colloquy-server --config <path-to-config.toml>
    colloquy-server --help

CONFIG KEYS:
    bind_address        IP address to listen on (e.g. 127.0.0.1)
    bind_port           TCP port (e.g. 3000)
    jwt_secret          Secret used to sign session tokens
    token_expiry_secs   Session lifetime in seconds (default 86400)
    database_path       SQLite file (default colloquy.db)
    default_page_size   Page size for list endpoints (default 10)

Log verbosity follows RUST_LOG (default info).";

/// What the command line asked for
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Serve { config_path: String },
    Help,
}

fn parse_args(args: &[String]) -> Result<Command, String> {
    match args {
        [flag] if flag == "--help" || flag == "-h" => Ok(Command::Help),
        [flag, path] if flag == "--config" => Ok(Command::Serve {
            config_path: path.clone(),
        }),
        [flag] if flag == "--config" => Err("--config needs a file path".to_string()),
        [] => Err("no configuration file given".to_string()),
        [other, ..] => Err(format!("unexpected argument '{}'", other)),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let config_path = match parse_args(&args) {
        Ok(Command::Serve { config_path }) => config_path,
        Ok(Command::Help) => {
            println!("{}", USAGE);
            return ExitCode::SUCCESS;
        }
        Err(reason) => {
            eprintln!("error: {}\n\n{}", reason, USAGE);
            return ExitCode::from(2);
        }
    };

    let outcome = match ServerConfig::from_file(&config_path) {
        Ok(config) => start_server(config).await,
        Err(e) => Err(e.into()),
    };
    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
