use super::{emit, read_file, report_diagnostics};
use crate::config::Config;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use gbn_common::Conventions;
use gbn_markup::{parse_with, serialize_children, Document, NodeId, ParseError, ParseOptions};
use gbn_reconciler::{ConfigMap, Reconciler};
use gbn_style::{normalize_value, InlineStyleReconciler, StyleDeclaration};
use serde_json::Value;
use std::path::PathBuf;
use tracing::debug;

/// Property of a configuration entry holding the fragment's inline styles
const STYLES_PROPERTY: &str = "styles";

#[derive(Debug, Args)]
pub struct ReconcileArgs {
    /// Markup file to reconcile
    pub input: PathBuf,

    /// Configuration map (identity → {order, properties})
    #[arg(short, long)]
    pub entries: PathBuf,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Fail on the first markup error instead of recovering
    #[arg(long)]
    pub strict: bool,

    /// Apply each surviving fragment's configured `styles` to its inline style
    #[arg(long)]
    pub apply_styles: bool,
}

pub fn reconcile(args: ReconcileArgs, config: &Config) -> Result<()> {
    let source = read_file(&args.input)?;
    let entries = ConfigMap::from_json(&read_file(&args.entries)?)
        .with_context(|| format!("Invalid configuration map {}", args.entries.display()))?;

    let options = if args.strict || config.strict {
        ParseOptions::strict()
    } else {
        ParseOptions::default()
    };

    let mut diagnostics: Vec<ParseError> = Vec::new();
    let mut doc = parse_with(&source, options, &mut diagnostics)
        .with_context(|| format!("Failed to parse {}", args.input.display()))?;
    report_diagnostics(&source, &args.input, &diagnostics);

    let reconciler = Reconciler::new(&config.conventions);
    let scope = reconciler.scope_root(&doc);
    let report = reconciler.reconcile(&mut doc, scope, &entries)?;

    let styled = if args.apply_styles {
        apply_configured_styles(&mut doc, scope, &entries, config)?
    } else {
        0
    };

    emit(args.output.as_deref(), &serialize_children(&doc, scope))?;

    eprintln!(
        "  {} {} fragments, {} assigned, {} removed, {} reordered, {} styled",
        "✓".green(),
        report.fragments,
        report.assigned.len(),
        report.removed.len(),
        report.reordered_parents,
        styled
    );
    Ok(())
}

/// Run the inline style reconciler over every fragment whose entry carries styles
fn apply_configured_styles(
    doc: &mut Document,
    scope: NodeId,
    entries: &ConfigMap,
    config: &Config,
) -> Result<usize> {
    let conventions: &Conventions = &config.conventions;
    let reconciler = Reconciler::new(conventions);
    let mut inline = InlineStyleReconciler::new();
    let mut styled = 0;

    for node in reconciler.fragments(doc, scope) {
        let Some(identity) = doc
            .element(node)
            .and_then(|element| conventions.identity_of(element))
        else {
            continue;
        };
        let Some(styles) = entries
            .get(identity)
            .and_then(|entry| entry.properties.get(STYLES_PROPERTY))
            .and_then(Value::as_object)
        else {
            continue;
        };

        let declaration: StyleDeclaration = styles
            .iter()
            .filter_map(|(property, value)| {
                normalize_value(property, value, &config.default_unit)
                    .map(|text| (property.as_str(), text))
            })
            .collect();

        debug!(node = %node, identity = %identity, "Applying configured styles");
        inline.apply_styles(doc, node, &declaration)?;
        styled += 1;
    }

    Ok(styled)
}
