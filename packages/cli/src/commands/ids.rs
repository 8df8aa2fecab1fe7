use super::read_file;
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use gbn_markup::parse;
use gbn_reconciler::Reconciler;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct IdsArgs {
    /// Markup file to inspect
    pub input: PathBuf,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

/// List every fragment with its structural path and identities
pub fn ids(args: IdsArgs, config: &Config) -> Result<()> {
    let source = read_file(&args.input)?;
    let doc = parse(&source);

    let reconciler = Reconciler::new(&config.conventions);
    let fragments = reconciler.inspect(&doc, reconciler.scope_root(&doc))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&fragments)?);
        return Ok(());
    }

    for info in &fragments {
        let persisted = match info.persisted.as_deref() {
            None => "-".dimmed().to_string(),
            Some(id) if id == info.computed.as_str() => id.green().to_string(),
            // Moved since it was persisted; the stored identity still wins
            Some(id) => id.yellow().to_string(),
        };
        println!("{:<16} {:<48} {}", info.computed.as_str(), info.path, persisted);
    }
    eprintln!("  {} {} fragments", "✓".green(), fragments.len());
    Ok(())
}
