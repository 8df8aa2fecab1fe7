//! Diagnostics produced while parsing markup
//!
//! The parser never aborts on malformed input. Every recovery it performs is
//! described by a [`ParseError`] handed to a caller-supplied [`DiagnosticSink`].
//! In strict mode the first diagnostic is returned as the parse error instead.

use thiserror::Error;

/// Result type for parsing operations
pub type ParseResult<T> = Result<T, ParseError>;

/// Byte range into the source markup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceSpan {
    pub start: usize,
    pub end: usize,
}

impl SourceSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

impl From<std::ops::Range<usize>> for SourceSpan {
    fn from(range: std::ops::Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

/// A recoverable problem found in the markup
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Closing tag </{tag}> at {span:?} has no matching open element")]
    StrayClosingTag { span: SourceSpan, tag: String },

    #[error("Element <{tag}> opened at {span:?} was never closed")]
    UnclosedElement { span: SourceSpan, tag: String },

    #[error("Unterminated comment at {span:?}")]
    UnterminatedComment { span: SourceSpan },

    #[error("Unterminated tag <{tag}> at {span:?}")]
    UnterminatedTag { span: SourceSpan, tag: String },

    #[error("Unterminated attribute value at {span:?}")]
    UnterminatedAttributeValue { span: SourceSpan },

    #[error("Malformed attribute syntax at {span:?}")]
    MalformedAttribute { span: SourceSpan },

    #[error("Stray '<' at {span:?} kept as text")]
    StrayMarkup { span: SourceSpan },
}

impl ParseError {
    pub fn span(&self) -> SourceSpan {
        match self {
            ParseError::StrayClosingTag { span, .. }
            | ParseError::UnclosedElement { span, .. }
            | ParseError::UnterminatedComment { span }
            | ParseError::UnterminatedTag { span, .. }
            | ParseError::UnterminatedAttributeValue { span }
            | ParseError::MalformedAttribute { span }
            | ParseError::StrayMarkup { span } => *span,
        }
    }

    pub fn stray_closing_tag(span: impl Into<SourceSpan>, tag: impl Into<String>) -> Self {
        Self::StrayClosingTag {
            span: span.into(),
            tag: tag.into(),
        }
    }

    pub fn unclosed_element(span: impl Into<SourceSpan>, tag: impl Into<String>) -> Self {
        Self::UnclosedElement {
            span: span.into(),
            tag: tag.into(),
        }
    }

    pub fn unterminated_tag(span: impl Into<SourceSpan>, tag: impl Into<String>) -> Self {
        Self::UnterminatedTag {
            span: span.into(),
            tag: tag.into(),
        }
    }
}

/// Receiver for parse diagnostics
///
/// Pass a `Vec<ParseError>` to collect everything, or [`DiscardDiagnostics`]
/// when the caller has no use for them.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: ParseError);
}

impl DiagnosticSink for Vec<ParseError> {
    fn report(&mut self, diagnostic: ParseError) {
        self.push(diagnostic);
    }
}

/// Sink that drops every diagnostic
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscardDiagnostics;

impl DiagnosticSink for DiscardDiagnostics {
    fn report(&mut self, _diagnostic: ParseError) {}
}

/// Pretty-print diagnostics with source context using ariadne
#[cfg(feature = "pretty-errors")]
pub fn format_diagnostics(source: &str, filename: &str, diagnostics: &[ParseError]) -> String {
    use ariadne::{Color, Label, Report, ReportKind, Source};

    let mut output = Vec::new();

    for diagnostic in diagnostics {
        let span = diagnostic.span();
        let end = span.end.max(span.start + 1).min(source.len().max(1));
        let start = span.start.min(end.saturating_sub(1));

        let report = Report::build(ReportKind::Warning, filename, start)
            .with_message(diagnostic.to_string())
            .with_label(
                Label::new((filename, start..end))
                    .with_color(Color::Yellow)
                    .with_message(match diagnostic {
                        ParseError::StrayClosingTag { .. } => "ignored",
                        ParseError::UnclosedElement { .. } => "closed implicitly",
                        ParseError::UnterminatedComment { .. } => "comment runs to end of input",
                        ParseError::UnterminatedTag { .. } => "tag runs to end of input",
                        ParseError::UnterminatedAttributeValue { .. } => {
                            "value runs to end of input"
                        }
                        ParseError::MalformedAttribute { .. } => "skipped",
                        ParseError::StrayMarkup { .. } => "kept as text",
                    }),
            )
            .finish();

        if report
            .write((filename, Source::from(source)), &mut output)
            .is_err()
        {
            continue;
        }
    }

    String::from_utf8(output).unwrap_or_else(|_| "Diagnostic formatting failed".to_string())
}
