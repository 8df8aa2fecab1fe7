//! Malformed-input recovery: nothing here may panic or lose well-formed
//! siblings, and re-serializing a recovered tree must be a fixed point.

use crate::{parse, parse_with, serialize, ParseError, ParseOptions};

fn fixed_point(source: &str) -> String {
    let once = serialize(&parse(source));
    let twice = serialize(&parse(&once));
    assert_eq!(once, twice, "serialization not stable for {:?}", source);
    once
}

#[test]
fn test_garbage_inputs_do_not_panic() {
    let inputs = [
        "<",
        "</",
        "<>",
        "</>",
        "<<div>>",
        "<div",
        "<div a=",
        "<div a=\"",
        "<!--",
        "<!-->",
        "<!DOCTYPE",
        "<?xml",
        "</p></p></p>",
        "<a><b><c>",
        "<div =x>",
        "<div \"quoted\">",
        "text only",
        "<script>never closed",
        "<ÄÖÜ>unicode</ÄÖÜ>",
    ];

    for input in inputs {
        fixed_point(input);
    }
}

#[test]
fn test_well_formed_siblings_survive() {
    let output = fixed_point("<p>one</p></span><p>two</p>");
    assert_eq!(output, "<p>one</p><p>two</p>");
}

#[test]
fn test_diagnostics_are_reported_not_raised() {
    let mut diagnostics: Vec<ParseError> = Vec::new();
    let result = parse_with(
        "<div a=\"1\" a=\"2\" =bad><p></div></em>",
        ParseOptions::default(),
        &mut diagnostics,
    );

    let doc = result.expect("lenient parse never fails");
    let div = doc.find_element(|e| e.is("div")).unwrap();
    assert_eq!(doc.element(div).unwrap().attr("a"), Some("1"));
    assert!(diagnostics
        .iter()
        .any(|d| matches!(d, ParseError::MalformedAttribute { .. })));
    assert!(diagnostics
        .iter()
        .any(|d| matches!(d, ParseError::UnclosedElement { .. })));
    assert!(diagnostics
        .iter()
        .any(|d| matches!(d, ParseError::StrayClosingTag { .. })));
}

#[test]
fn test_unterminated_comment_is_recovered() {
    let mut diagnostics: Vec<ParseError> = Vec::new();
    let doc = parse_with("<p></p><!-- open", ParseOptions::default(), &mut diagnostics).unwrap();
    assert_eq!(doc.children(doc.root()).len(), 2);
    assert!(matches!(
        diagnostics[0],
        ParseError::UnterminatedComment { .. }
    ));
}

#[test]
fn test_fragment_is_not_normalized() {
    // No implied document wrappers, table sections or entity decoding
    let source = concat!(
        "<tr><td title=\"&lt;x&gt;\">a &amp; b&nbsp;</td></tr>",
        "<p><div>block in paragraph</div></p>",
        "<li>loose item</li>",
    );
    assert_eq!(fixed_point(source), source);

    let doc = parse(source);
    assert!(doc.find_element(|e| e.is("html") || e.is("body") || e.is("tbody")).is_none());
}
