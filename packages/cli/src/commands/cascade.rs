use super::{emit, read_file, report_diagnostics};
use crate::config::Config;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use gbn_markup::{parse_with, serialize, NodeId, ParseError, ParseOptions};
use gbn_style::{
    CascadeResolver, CascadeSettings, Delivery, StyleApplicator, StyleDeclaration,
    ThreadScheduler,
};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Debug, Args)]
pub struct CascadeArgs {
    /// Markup document to publish the cascade onto
    pub input: PathBuf,

    /// Cascade settings (page, colors, headings, kinds)
    #[arg(short, long)]
    pub settings: PathBuf,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also publish the variables as a stylesheet rule to this file
    #[arg(long)]
    pub stylesheet: Option<PathBuf>,
}

/// Writes published declarations as one rule scoped to the root marker
struct StylesheetApplicator {
    file: File,
    selector: String,
}

impl StyleApplicator for StylesheetApplicator {
    fn publish(&mut self, _root: NodeId, declarations: &StyleDeclaration) {
        let mut css = format!("{} {{\n", self.selector);
        for (name, value) in declarations.iter() {
            css.push_str(&format!("  {}: {};\n", name, value));
        }
        css.push_str("}\n");

        if let Err(err) = self.file.write_all(css.as_bytes()) {
            warn!("Failed to write stylesheet: {}", err);
        }
    }
}

pub fn cascade(args: CascadeArgs, config: &Config) -> Result<()> {
    let source = read_file(&args.input)?;
    let settings = CascadeSettings::from_json(&read_file(&args.settings)?)
        .with_context(|| format!("Invalid cascade settings {}", args.settings.display()))?;

    let options = if config.strict {
        ParseOptions::strict()
    } else {
        ParseOptions::default()
    };
    let mut diagnostics: Vec<ParseError> = Vec::new();
    let mut doc = parse_with(&source, options, &mut diagnostics)
        .with_context(|| format!("Failed to parse {}", args.input.display()))?;
    report_diagnostics(&source, &args.input, &diagnostics);

    let resolver = CascadeResolver::new(&config.conventions, &config.kinds)
        .with_default_unit(config.default_unit.clone());

    let outcome = match &args.stylesheet {
        Some(path) => {
            let mut applicators = stylesheet_source(path, &config.conventions.root_attribute);
            resolver.apply_cascade_with(
                &mut doc,
                &settings,
                &mut applicators,
                &mut ThreadScheduler,
                &config.retry,
            )?
        }
        None => resolver.apply_cascade(&mut doc, &settings)?,
    };

    emit(args.output.as_deref(), &serialize(&doc))?;

    let delivery = match outcome.delivery {
        Delivery::Direct => "inline".to_string(),
        Delivery::Applicator { attempts } => format!("stylesheet after {} attempt(s)", attempts),
        Delivery::Degraded { attempts } => {
            format!("inline only, stylesheet unavailable after {} attempt(s)", attempts)
                .yellow()
                .to_string()
        }
    };
    eprintln!(
        "  {} Published {} declarations ({})",
        "✓".green(),
        outcome.declarations.len(),
        delivery
    );
    Ok(())
}

/// The stylesheet becomes available once its file can be created
fn stylesheet_source<'p>(
    path: &'p Path,
    root_attribute: &str,
) -> impl FnMut() -> Option<StylesheetApplicator> + 'p {
    let selector = format!("[{}]", root_attribute);
    move || {
        File::create(path).ok().map(|file| StylesheetApplicator {
            file,
            selector: selector.clone(),
        })
    }
}
