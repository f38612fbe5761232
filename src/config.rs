//! Command-line and environment configuration.

use crate::logging::LogFormat;
use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_ADDR: &str = "127.0.0.1:5175";
pub const DEFAULT_STORE_FILE: &str = ".schema-graph/graph.json";

#[derive(Debug, Parser)]
#[command(
    name = "schemagraph",
    version,
    about = "Schema graph tooling - persistence endpoint and document utilities"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log output format.
    #[arg(long = "log-format", value_enum, default_value = "pretty", global = true)]
    pub log_format: LogFormat,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the saved document over HTTP for the viewer.
    Serve(ServeArgs),
    /// Validate a document file and print a summary.
    Check(CheckArgs),
    /// Write the saved (or bundled example) document as pretty JSON.
    Export(ExportArgs),
}

#[derive(Debug, Clone, Args)]
pub struct ServeArgs {
    /// Address to listen on.
    #[arg(long, env = "SCHEMA_GRAPH_ADDR", default_value = DEFAULT_ADDR)]
    pub addr: SocketAddr,

    /// File the document is persisted to.
    #[arg(long, env = "SCHEMA_GRAPH_FILE", default_value = DEFAULT_STORE_FILE)]
    pub file: PathBuf,
}

#[derive(Debug, Clone, Args)]
pub struct CheckArgs {
    /// Document to validate.
    #[arg(value_name = "PATH")]
    pub path: PathBuf,
}

#[derive(Debug, Clone, Args)]
pub struct ExportArgs {
    /// Saved document to read.
    #[arg(long, env = "SCHEMA_GRAPH_FILE", default_value = DEFAULT_STORE_FILE)]
    pub file: PathBuf,

    /// Output file (default: stdout).
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_serve_defaults() {
        let cli = Cli::try_parse_from(["schemagraph", "serve"]).unwrap();
        let Command::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.addr.port(), 5175);
        assert_eq!(args.file, PathBuf::from(DEFAULT_STORE_FILE));
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from([
            "schemagraph",
            "check",
            "graph.json",
            "-vv",
            "--log-format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.log_format, LogFormat::Json);
        assert!(matches!(cli.command, Command::Check(args) if args.path == PathBuf::from("graph.json")));
    }
}
