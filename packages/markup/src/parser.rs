use crate::error::{DiagnosticSink, DiscardDiagnostics, ParseError, ParseResult, SourceSpan};
use crate::lexer::{ContentToken, TagToken};
use crate::tree::{Attribute, Document, Element, NodeId};
use logos::{Lexer, Logos};
use tracing::{debug, instrument};

/// Elements that never have content or a closing tag
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements whose content is not parsed as markup
pub const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "textarea", "title"];

pub fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(tag))
}

pub fn is_raw_text_element(tag: &str) -> bool {
    RAW_TEXT_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(tag))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    /// Recover from every problem and report it to the sink
    #[default]
    Lenient,
    /// Same recovery, but the first diagnostic fails the parse
    Strict,
}

#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    pub mode: ParseMode,
}

impl ParseOptions {
    pub fn strict() -> Self {
        Self {
            mode: ParseMode::Strict,
        }
    }
}

/// Where an `=value` token lands
#[derive(Clone, Copy)]
enum ValueSlot {
    /// The attribute just named
    Last,
    /// A repeated attribute; the value is dropped
    Ignored,
    /// No attribute is waiting for a value
    Closed,
}

struct OpenElement {
    id: NodeId,
    tag: String,
    span: SourceSpan,
}

/// Tree builder for builder markup
pub struct Parser<'src, 'sink> {
    source: &'src str,
    options: ParseOptions,
    sink: &'sink mut dyn DiagnosticSink,
    doc: Document,
    open: Vec<OpenElement>,
    first_error: Option<ParseError>,
}

impl<'src, 'sink> Parser<'src, 'sink> {
    pub fn new(source: &'src str, options: ParseOptions, sink: &'sink mut dyn DiagnosticSink) -> Self {
        Self {
            source,
            options,
            sink,
            doc: Document::new(),
            open: Vec::new(),
            first_error: None,
        }
    }

    fn report(&mut self, diagnostic: ParseError) {
        debug!(%diagnostic, "Recovered from malformed markup");
        if self.first_error.is_none() {
            self.first_error = Some(diagnostic.clone());
        }
        self.sink.report(diagnostic);
    }

    fn current_parent(&self) -> NodeId {
        self.open.last().map(|open| open.id).unwrap_or(self.doc.root())
    }

    /// Parse the whole source into a document
    pub fn parse_document(mut self) -> ParseResult<Document> {
        let mut lexer = ContentToken::lexer(self.source);

        while let Some(token) = lexer.next() {
            let span: SourceSpan = lexer.span().into();
            match token {
                Ok(ContentToken::Text(text)) => {
                    let parent = self.current_parent();
                    self.doc.append_text(parent, text);
                }
                Ok(ContentToken::Comment(raw)) => self.comment(raw, span),
                Ok(ContentToken::Declaration(raw)) => {
                    let id = self.doc.create_declaration(raw);
                    let parent = self.current_parent();
                    self.doc.append_child(parent, id);
                }
                Ok(ContentToken::CloseTag(name)) => self.close_tag(name, span),
                Ok(ContentToken::OpenTag(name)) => {
                    lexer = self.open_tag(name, span, lexer);
                }
                Err(()) => {
                    self.report(ParseError::StrayMarkup { span });
                    let parent = self.current_parent();
                    self.doc.append_text(parent, lexer.slice());
                }
            }
        }

        while let Some(open) = self.open.pop() {
            self.report(ParseError::unclosed_element(open.span, open.tag));
        }

        match (self.options.mode, self.first_error) {
            (ParseMode::Strict, Some(error)) => Err(error),
            _ => Ok(self.doc),
        }
    }

    fn comment(&mut self, raw: &str, span: SourceSpan) {
        let body = match raw.strip_suffix("-->") {
            Some(inner) if raw.len() >= "<!---->".len() => &inner["<!--".len()..],
            _ => {
                self.report(ParseError::UnterminatedComment { span });
                &raw["<!--".len()..]
            }
        };
        let id = self.doc.create_comment(body);
        let parent = self.current_parent();
        self.doc.append_child(parent, id);
    }

    fn close_tag(&mut self, name: &str, span: SourceSpan) {
        let tag = name.to_ascii_lowercase();
        match self.open.iter().rposition(|open| open.tag == tag) {
            Some(index) => {
                while self.open.len() > index + 1 {
                    if let Some(open) = self.open.pop() {
                        self.report(ParseError::unclosed_element(open.span, open.tag));
                    }
                }
                self.open.pop();
            }
            None => self.report(ParseError::stray_closing_tag(span, tag)),
        }
    }

    fn open_tag<'a>(
        &mut self,
        name: &str,
        start: SourceSpan,
        lexer: Lexer<'a, ContentToken<'a>>,
    ) -> Lexer<'a, ContentToken<'a>> {
        let mut element = Element::new(name);
        let mut tag_lexer: Lexer<'a, TagToken<'a>> = lexer.morph();
        let mut self_closing = false;
        let mut terminated = false;
        let mut value_slot = ValueSlot::Closed;

        while let Some(token) = tag_lexer.next() {
            match token {
                Ok(TagToken::End) => {
                    terminated = true;
                    break;
                }
                Ok(TagToken::SelfClose) => {
                    self_closing = true;
                    terminated = true;
                    break;
                }
                Ok(TagToken::Slash) => value_slot = ValueSlot::Closed,
                Ok(TagToken::Name(attr)) => {
                    // Repeated attributes keep their first value
                    if element.has_attr(attr) {
                        value_slot = ValueSlot::Ignored;
                    } else {
                        element.attributes.push(Attribute {
                            name: attr.to_ascii_lowercase(),
                            value: None,
                        });
                        value_slot = ValueSlot::Last;
                    }
                }
                Ok(TagToken::Value(value)) => {
                    if !value.terminated {
                        self.report(ParseError::UnterminatedAttributeValue {
                            span: tag_lexer.span().into(),
                        });
                    }
                    match (value_slot, element.attributes.last_mut()) {
                        (ValueSlot::Last, Some(attr)) => {
                            attr.value = Some(value.text.to_string());
                        }
                        (ValueSlot::Ignored, _) => {}
                        _ => self.report(ParseError::MalformedAttribute {
                            span: tag_lexer.span().into(),
                        }),
                    }
                    value_slot = ValueSlot::Closed;
                }
                Err(()) => {
                    value_slot = ValueSlot::Closed;
                    self.report(ParseError::MalformedAttribute {
                        span: tag_lexer.span().into(),
                    });
                }
            }
        }

        let tag = element.tag.clone();
        let span = SourceSpan::new(start.start, tag_lexer.span().end);
        if !terminated {
            self.report(ParseError::unterminated_tag(span, tag.clone()));
        }

        let id = self.doc.create_element(element);
        let parent = self.current_parent();
        self.doc.append_child(parent, id);

        let mut lexer: Lexer<'a, ContentToken<'a>> = tag_lexer.morph();

        if self_closing || is_void_element(&tag) {
            return lexer;
        }

        if is_raw_text_element(&tag) {
            let rest = lexer.remainder();
            let needle = format!("</{}", tag);
            let end = rest
                .to_ascii_lowercase()
                .find(&needle)
                .unwrap_or(rest.len());
            if end > 0 {
                let text = self.doc.create_text(&rest[..end]);
                self.doc.append_child(id, text);
            }
            lexer.bump(end);
        }

        self.open.push(OpenElement { id, tag, span });
        lexer
    }
}

/// Parse markup leniently, discarding diagnostics
pub fn parse(source: &str) -> Document {
    let mut sink = DiscardDiagnostics;
    // Lenient parsing cannot fail
    Parser::new(source, ParseOptions::default(), &mut sink)
        .parse_document()
        .unwrap_or_default()
}

/// Parse markup with explicit options and diagnostic sink
#[instrument(skip_all, fields(bytes = source.len(), mode = ?options.mode))]
pub fn parse_with(
    source: &str,
    options: ParseOptions,
    sink: &mut dyn DiagnosticSink,
) -> ParseResult<Document> {
    Parser::new(source, options, sink).parse_document()
}
