mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use digraph_scc::config::Config;

/// Strongly connected component queries over command scripts
#[derive(Debug, Parser)]
#[command(name = "digraph-scc", version, about, long_about = None)]
struct Cli {
    /// TOML file overriding output markers and limits
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG overrides.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run a command script and write its transcript
    Run {
        /// Script whose first line is the graph header
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Transcript destination (stdout when omitted)
        #[arg(value_name = "OUTPUT")]
        output: Option<PathBuf>,
    },

    /// List the strongly connected components of a script's header graph
    Scc {
        /// Script whose first line is the graph header
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Emit the graph and its partition as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .format_timestamp(None)
        .init();

    let config = Config::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Command::Run { input, output } => commands::run::run(&input, output.as_deref(), config),
        Command::Scc { input, json } => commands::scc::run(&input, json, config),
    }
}
