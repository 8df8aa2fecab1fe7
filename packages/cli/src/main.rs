mod commands;
mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    cascade, ids, init, reconcile, CascadeArgs, IdsArgs, InitArgs, ReconcileArgs,
};
use config::Config;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// gbn - reconcile builder fragments and publish their style cascade
#[derive(Parser, Debug)]
#[command(name = "gbn")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log decisions at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to ./gbn.config.json when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a default gbn.config.json
    Init(InitArgs),

    /// Prune and reorder fragments against a configuration map
    Reconcile(ReconcileArgs),

    /// Publish cascade settings onto the document's scope root
    Cascade(CascadeArgs),

    /// List fragments with their structural paths and identities
    Ids(IdsArgs),
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let cwd = std::env::current_dir().context("Cannot get current directory")?;

    let load = || Config::load(&cwd, cli.config.as_deref());

    match cli.command {
        Command::Init(args) => init(args, &cwd),
        Command::Reconcile(args) => reconcile(args, &load()?),
        Command::Cascade(args) => cascade(args, &load()?),
        Command::Ids(args) => ids(args, &load()?),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
