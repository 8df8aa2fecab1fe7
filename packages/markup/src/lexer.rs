//! Lexer for builder markup using logos
//!
//! Two token sets share one source: [`ContentToken`] between tags and
//! [`TagToken`] inside an open tag. The parser morphs between them.

use logos::{Lexer, Logos};

/// Tokens outside of tags
#[derive(Logos, Debug, Clone, PartialEq, Eq)]
pub enum ContentToken<'src> {
    /// Full comment slice including delimiters; may be unterminated
    #[token("<!--", lex_comment)]
    Comment(&'src str),

    /// `<!DOCTYPE ...>`, `<![CDATA[...]>` and `<?...?>`
    #[regex(r"<![a-zA-Z\[][^>]*>", |lex| lex.slice())]
    #[regex(r"<\?[^>]*>", |lex| lex.slice())]
    Declaration(&'src str),

    /// Tag name of a closing tag
    #[regex(r"</[a-zA-Z][^>]*>", close_tag_name)]
    CloseTag(&'src str),

    /// Tag name of an opening tag; attributes follow in [`TagToken`]s
    #[regex(r"<[a-zA-Z][^\s/>]*", |lex| &lex.slice()[1..])]
    OpenTag(&'src str),

    #[regex(r"[^<]+", |lex| lex.slice())]
    Text(&'src str),
}

/// Tokens inside an opening tag
#[derive(Logos, Debug, Clone, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\x0C]+")]
pub enum TagToken<'src> {
    #[token(">")]
    End,

    #[token("/>")]
    SelfClose,

    #[token("/")]
    Slash,

    #[regex(r#"[^\s"'>/=]+"#, |lex| lex.slice())]
    Name(&'src str),

    /// `=` followed by a quoted or unquoted value
    #[token("=", lex_attr_value)]
    Value(AttrValue<'src>),
}

/// Raw attribute value as written in the source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttrValue<'src> {
    pub text: &'src str,
    pub terminated: bool,
}

fn lex_comment<'s>(lex: &mut Lexer<'s, ContentToken<'s>>) -> &'s str {
    let rest = lex.remainder();
    match rest.find("-->") {
        Some(end) => lex.bump(end + 3),
        None => lex.bump(rest.len()),
    }
    lex.slice()
}

fn close_tag_name<'s>(lex: &mut Lexer<'s, ContentToken<'s>>) -> &'s str {
    let slice = lex.slice();
    let inner = &slice[2..slice.len() - 1];
    let end = inner
        .find(|c: char| c.is_ascii_whitespace() || c == '/')
        .unwrap_or(inner.len());
    &inner[..end]
}

fn lex_attr_value<'s>(lex: &mut Lexer<'s, TagToken<'s>>) -> AttrValue<'s> {
    let rest = lex.remainder();
    let trimmed = rest.trim_start_matches(|c: char| c.is_ascii_whitespace());
    let skipped = rest.len() - trimmed.len();

    match trimmed.chars().next() {
        Some(quote @ ('"' | '\'')) => {
            let body = &trimmed[1..];
            match body.find(quote) {
                Some(end) => {
                    lex.bump(skipped + 1 + end + 1);
                    AttrValue {
                        text: &body[..end],
                        terminated: true,
                    }
                }
                None => {
                    lex.bump(rest.len());
                    AttrValue {
                        text: body,
                        terminated: false,
                    }
                }
            }
        }
        _ => {
            let end = trimmed
                .find(|c: char| c.is_ascii_whitespace() || c == '>')
                .unwrap_or(trimmed.len());
            lex.bump(skipped + end);
            AttrValue {
                text: &trimmed[..end],
                terminated: true,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Content tokens only, without morphing into tag mode
    fn tokenize_content(source: &str) -> Vec<(Result<ContentToken<'_>, ()>, std::ops::Range<usize>)> {
        ContentToken::lexer(source).spanned().collect()
    }

    #[test]
    fn test_content_tokens() {
        let tokens: Vec<_> = tokenize_content("<div>hi</div>")
            .into_iter()
            .map(|(t, _)| t)
            .collect();

        assert_eq!(tokens[0], Ok(ContentToken::OpenTag("div")));
        // The `>` of the open tag is lexed as text without morphing
        assert_eq!(tokens[1], Ok(ContentToken::Text(">hi")));
        assert_eq!(tokens[2], Ok(ContentToken::CloseTag("div")));
    }

    #[test]
    fn test_comment_spans_to_terminator() {
        let tokens = tokenize_content("<!-- a <b> -->x");
        assert_eq!(tokens[0].0, Ok(ContentToken::Comment("<!-- a <b> -->")));
        assert_eq!(tokens[1].0, Ok(ContentToken::Text("x")));
    }

    #[test]
    fn test_unterminated_comment_runs_to_end() {
        let tokens = tokenize_content("<!-- open");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].0, Ok(ContentToken::Comment("<!-- open")));
    }

    #[test]
    fn test_close_tag_with_whitespace() {
        let tokens = tokenize_content("</DIV >");
        assert_eq!(tokens[0].0, Ok(ContentToken::CloseTag("DIV")));
    }

    #[test]
    fn test_doctype_is_declaration() {
        let tokens = tokenize_content("<!DOCTYPE html>");
        assert_eq!(tokens[0].0, Ok(ContentToken::Declaration("<!DOCTYPE html>")));
    }

    #[test]
    fn test_attribute_values() {
        let mut lex = TagToken::lexer(r#" a="1" b='x y' c=plain d>"#);
        assert_eq!(lex.next(), Some(Ok(TagToken::Name("a"))));
        assert_eq!(
            lex.next(),
            Some(Ok(TagToken::Value(AttrValue {
                text: "1",
                terminated: true
            })))
        );
        assert_eq!(lex.next(), Some(Ok(TagToken::Name("b"))));
        assert_eq!(
            lex.next(),
            Some(Ok(TagToken::Value(AttrValue {
                text: "x y",
                terminated: true
            })))
        );
        assert_eq!(lex.next(), Some(Ok(TagToken::Name("c"))));
        assert_eq!(
            lex.next(),
            Some(Ok(TagToken::Value(AttrValue {
                text: "plain",
                terminated: true
            })))
        );
        assert_eq!(lex.next(), Some(Ok(TagToken::Name("d"))));
        assert_eq!(lex.next(), Some(Ok(TagToken::End)));
        assert_eq!(lex.next(), None);
    }

    #[test]
    fn test_unquoted_value_may_contain_slashes() {
        let mut lex = TagToken::lexer("href=/a/b>");
        assert_eq!(lex.next(), Some(Ok(TagToken::Name("href"))));
        assert_eq!(
            lex.next(),
            Some(Ok(TagToken::Value(AttrValue {
                text: "/a/b",
                terminated: true
            })))
        );
        assert_eq!(lex.next(), Some(Ok(TagToken::End)));
    }

    #[test]
    fn test_unterminated_quoted_value() {
        let mut lex = TagToken::lexer(r#"a="never"#);
        lex.next();
        assert_eq!(
            lex.next(),
            Some(Ok(TagToken::Value(AttrValue {
                text: "never",
                terminated: false
            })))
        );
        assert_eq!(lex.next(), None);
    }
}
