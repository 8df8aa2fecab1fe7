pub mod cascade;
pub mod ids;
pub mod init;
pub mod reconcile;

pub use cascade::{cascade, CascadeArgs};
pub use ids::{ids, IdsArgs};
pub use init::{init, InitArgs};
pub use reconcile::{reconcile, ReconcileArgs};

use anyhow::{Context, Result};
use colored::Colorize;
use gbn_markup::{format_diagnostics, ParseError};
use std::fs;
use std::path::Path;

pub(crate) fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Write to `output` when given, else stdout
pub(crate) fn emit(output: Option<&Path>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("  {} Wrote {}", "✓".green(), path.display());
        }
        None => println!("{}", content),
    }
    Ok(())
}

pub(crate) fn report_diagnostics(source: &str, path: &Path, diagnostics: &[ParseError]) {
    if diagnostics.is_empty() {
        return;
    }
    eprintln!(
        "{} {} recovered markup error(s)",
        "⚠️".yellow(),
        diagnostics.len()
    );
    eprint!(
        "{}",
        format_diagnostics(source, &path.display().to_string(), diagnostics)
    );
}
