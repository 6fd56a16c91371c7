//! Tests for serialization, text extraction and document accessors on
//! hand-built trees.

use wren_dom::{
    DocumentTypeData, DomTree, EscapeMode, NodeData, NodeId, OutputSettings, Syntax,
};

/// Helper to build `<html><head></head><body>...</body></html>`.
fn skeleton() -> (DomTree, NodeId) {
    let mut tree = DomTree::new();
    let body = tree.body();
    let _ = tree.head();
    (tree, body)
}

// ========== outer_html ==========

#[test]
fn test_pretty_printed_document() {
    let (mut tree, body) = skeleton();
    let p = tree.append_element(body, "p");
    let _ = tree.append_text(p, "Hello");

    assert_eq!(
        tree.outer_html(NodeId::ROOT),
        "<html>\n <head></head>\n <body>\n  <p>Hello</p>\n </body>\n</html>"
    );
}

#[test]
fn test_compact_output() {
    let (mut tree, body) = skeleton();
    let p = tree.append_element(body, "p");
    let _ = tree.append_text(p, "a  b");
    tree.output_settings_mut().pretty_print = false;

    assert_eq!(
        tree.outer_html(NodeId::ROOT),
        "<html><head></head><body><p>a  b</p></body></html>"
    );
}

#[test]
fn test_void_and_boolean_attributes() {
    let (mut tree, body) = skeleton();
    let input = tree.append_element(body, "input");
    tree.set_attr(input, "checked", "");
    tree.set_attr(input, "name", "x");
    let _ = tree.append_element(body, "br");

    let settings = OutputSettings::default().with_pretty_print(false);
    assert_eq!(
        tree.html_with(body, &settings),
        "<input checked name=\"x\"><br>"
    );

    let xml = settings.with_syntax(Syntax::Xml);
    assert_eq!(
        tree.html_with(body, &xml),
        "<input checked=\"\" name=\"x\" /><br />"
    );
}

#[test]
fn test_text_is_escaped_but_data_is_not() {
    let (mut tree, body) = skeleton();
    let p = tree.append_element(body, "p");
    let _ = tree.append_text(p, "1 < 2 & 3");
    let script = tree.append_element(body, "script");
    let _ = tree.set_text(script, "if (a < b) {}");

    let settings = OutputSettings::default().with_pretty_print(false);
    assert_eq!(
        tree.html_with(body, &settings),
        "<p>1 &lt; 2 &amp; 3</p><script>if (a < b) {}</script>"
    );
}

#[test]
fn test_doctype_and_comment() {
    let mut tree = DomTree::new();
    let doctype = tree.alloc(NodeData::DocumentType(DocumentTypeData {
        name: "html".into(),
        ..DocumentTypeData::default()
    }));
    tree.append_child(NodeId::ROOT, doctype);
    let html = tree.html_element();
    let comment = tree.alloc(NodeData::Comment(" hi ".into()));
    tree.append_child(html, comment);

    assert_eq!(
        tree.outer_html(NodeId::ROOT),
        "<!doctype html>\n<html>\n <!-- hi -->\n</html>"
    );
}

#[test]
fn test_escape_mode_and_charset() {
    let (mut tree, body) = skeleton();
    let p = tree.append_element(body, "p");
    let _ = tree.append_text(p, "© café");

    let ascii = OutputSettings::default()
        .with_pretty_print(false)
        .with_charset("US-ASCII");
    assert_eq!(tree.html_with(p, &ascii), "&copy; caf&eacute;");

    let xhtml = ascii.with_escape_mode(EscapeMode::Xhtml);
    assert_eq!(tree.html_with(p, &xhtml), "&#xa9; caf&#xe9;");
}

#[test]
fn test_outline_mode_indents_inline_elements() {
    let (mut tree, body) = skeleton();
    let p = tree.append_element(body, "p");
    let span = tree.append_element(p, "span");
    let _ = tree.append_text(span, "x");

    let settings = OutputSettings::default().with_outline(true);
    assert_eq!(
        tree.outer_html_with(p, &settings),
        "<p>\n <span>x</span>\n</p>"
    );
}

// ========== text ==========

#[test]
fn test_text_collapses_and_separates_blocks() {
    let (mut tree, body) = skeleton();
    let p1 = tree.append_element(body, "p");
    let _ = tree.append_text(p1, "  One\n two ");
    let p2 = tree.append_element(body, "p");
    let _ = tree.append_text(p2, "three");
    let _ = tree.append_element(p2, "br");
    let _ = tree.append_text(p2, "four");

    assert_eq!(tree.text(body), "One two three four");
    assert_eq!(tree.own_text(p2), "three four");
    assert_eq!(tree.whole_text(p1), "  One\n two ");
}

#[test]
fn test_text_preserves_pre() {
    let (mut tree, body) = skeleton();
    let pre = tree.append_element(body, "pre");
    let code = tree.append_element(pre, "code");
    let _ = tree.append_text(code, "a\n  b");

    assert_eq!(tree.text(pre), "a\n  b");
    assert!(tree.preserve_whitespace(code));
}

#[test]
fn test_has_text_and_data() {
    let (mut tree, body) = skeleton();
    let _ = tree.append_text(body, "   ");
    assert!(!tree.has_text(body));

    let style = tree.append_element(body, "style");
    let _ = tree.set_text(style, "p { color: red }");
    assert_eq!(tree.data_content(style), "p { color: red }");
    assert_eq!(tree.text(style), "");
}

// ========== document accessors ==========

#[test]
fn test_auto_vivified_skeleton() {
    let mut tree = DomTree::new();
    assert!(tree.find_body().is_none());

    let body = tree.body();
    let head = tree.head();
    let html = tree.html_element();

    assert_eq!(tree.children(html), &[head, body]);
    assert_eq!(tree.body(), body);
}

#[test]
fn test_title_round_trip() {
    let mut tree = DomTree::new();
    tree.set_title(" My  Page ");
    assert_eq!(tree.title(), "My Page");
    let head = tree.head();
    assert_eq!(tree.child_element_count(head), 1);
}

#[test]
fn test_normalise_moves_stray_text() {
    let mut tree = DomTree::new();
    let html = tree.html_element();
    let _ = tree.append_text(html, "stray");
    let body = tree.body();
    let p = tree.append_element(body, "p");
    let _ = tree.append_text(p, "kept");

    tree.normalise();

    assert_eq!(tree.text(body), "stray kept");
    assert!(tree.find_head().is_some());
}

#[test]
fn test_set_charset_updates_meta() {
    let mut tree = DomTree::new();
    tree.set_charset("ISO-8859-1");
    let head = tree.head();
    let meta = tree.element_children(head)[0];
    assert_eq!(tree.attr(meta, "charset").as_deref(), Some("ISO-8859-1"));
    assert_eq!(tree.charset(), "ISO-8859-1");
}

// ========== attributes and classes ==========

#[test]
fn test_class_manipulation() {
    let (mut tree, body) = skeleton();
    let div = tree.append_element(body, "div");
    tree.set_attr(div, "class", "a  b a");

    assert_eq!(tree.class_names(div), ["a", "b"]);
    assert!(tree.has_class(div, "B"));
    tree.add_class(div, "c");
    tree.remove_class(div, "a");
    tree.toggle_class(div, "b");
    assert_eq!(tree.class_name(div), "c");
}

#[test]
fn test_abs_url() {
    let mut tree = DomTree::with_base_uri("http://example.com/a/b.html");
    let body = tree.body();
    let link = tree.append_element(body, "a");
    tree.set_attr(link, "href", "../c.html");

    assert_eq!(tree.abs_url(link, "href"), "http://example.com/c.html");
    assert_eq!(
        tree.attr(link, "abs:href").as_deref(),
        Some("http://example.com/c.html")
    );
    assert!(tree.has_attr(link, "abs:href"));
    assert_eq!(tree.abs_url(link, "src"), "");
}
