//! Integration tests for HTML tree construction.

use wren_dom::{DomTree, NodeData, NodeId, QuirksMode};
use wren_html::{Parser, parse, parse_body_fragment, parse_fragment, parse_with_errors, parse_xml};

/// Helper to parse HTML and return the body's markup without pretty printing
fn body_html(html: &str) -> String {
    let mut tree = parse(html, "");
    tree.output_settings_mut().pretty_print = false;
    let body = tree.body();
    tree.html(body)
}

/// Helper to get the first element named `tag`, depth-first
fn find_element(tree: &DomTree, tag: &str) -> NodeId {
    tree.get_elements_by_tag(NodeId::ROOT, tag)
        .first()
        .copied()
        .unwrap_or_else(|| panic!("no <{tag}> in tree"))
}

// ========== document structure ==========

#[test]
fn test_empty_input_builds_skeleton() {
    let mut tree = parse("", "");
    tree.output_settings_mut().pretty_print = false;
    assert_eq!(
        tree.outer_html(NodeId::ROOT),
        "<html><head></head><body></body></html>"
    );
}

#[test]
fn test_text_lands_in_body() {
    assert_eq!(body_html("Hello World"), "Hello World");
}

#[test]
fn test_head_elements_go_to_head() {
    let mut tree = parse(
        "<title>Page</title><meta charset=utf-8><link rel=stylesheet href=a.css>Body",
        "",
    );
    let head = tree.head();
    let names: Vec<&str> = tree
        .element_children(head)
        .iter()
        .filter_map(|&id| tree.tag_name(id))
        .collect();
    assert_eq!(names, ["title", "meta", "link"]);
    assert_eq!(tree.title(), "Page");
    let body = tree.body();
    assert_eq!(tree.text(body), "Body");
}

#[test]
fn test_comment_before_html_is_document_child() {
    let tree = parse("<!-- top --><html><body></body></html>", "");
    let first = tree.children(NodeId::ROOT)[0];
    assert!(matches!(tree.data(first), NodeData::Comment(data) if data == " top "));
}

#[test]
fn test_comment_after_body_goes_to_html() {
    let tree = parse("<html><body></body><!-- end --></html>", "");
    let html = find_element(&tree, "html");
    let last = tree.last_child(html).unwrap();
    assert!(matches!(tree.data(last), NodeData::Comment(data) if data == " end "));
}

#[test]
fn test_tag_names_are_lower_cased() {
    assert_eq!(body_html("<DIV ID=main>x</DIV>"), "<div id=\"main\">x</div>");
}

#[test]
fn test_preserve_case_settings() {
    let mut tree = Parser::html()
        .settings(wren_dom::ParseSettings::preserve_case())
        .parse_input("<Widget dataKey=1>x</Widget>", "");
    tree.output_settings_mut().pretty_print = false;
    let body = tree.body();
    assert_eq!(tree.html(body), "<Widget dataKey=\"1\">x</Widget>");
}

// ========== doctype and quirks ==========

#[test]
fn test_html5_doctype_is_no_quirks() {
    let tree = parse("<!DOCTYPE html><p>x", "");
    assert_eq!(tree.quirks_mode(), QuirksMode::NoQuirks);
    let first = tree.children(NodeId::ROOT)[0];
    assert!(matches!(tree.data(first), NodeData::DocumentType(d) if d.name == "html"));
}

#[test]
fn test_legacy_doctype_is_quirks() {
    let tree = parse(
        "<!DOCTYPE HTML PUBLIC \"-//W3C//DTD HTML 3.2 Final//EN\"><p>x",
        "",
    );
    assert_eq!(tree.quirks_mode(), QuirksMode::Quirks);
}

#[test]
fn test_quirks_table_does_not_close_paragraph() {
    let quirks = "<!DOCTYPE HTML PUBLIC \"-//W3C//DTD HTML 3.2 Final//EN\"><p><table></table>";
    assert_eq!(body_html(quirks), "<p><table></table></p>");
    assert_eq!(
        body_html("<!DOCTYPE html><p><table></table>"),
        "<p></p><table></table>"
    );
}

// ========== in body ==========

#[test]
fn test_paragraphs_close_implicitly() {
    assert_eq!(body_html("<p>One<p>Two"), "<p>One</p><p>Two</p>");
}

#[test]
fn test_list_items_close_implicitly() {
    assert_eq!(
        body_html("<ul><li>One<li>Two</ul>"),
        "<ul><li>One</li><li>Two</li></ul>"
    );
}

#[test]
fn test_definition_items_close_implicitly() {
    assert_eq!(
        body_html("<dl><dt>A<dd>a<dt>B</dl>"),
        "<dl><dt>A</dt><dd>a</dd><dt>B</dt></dl>"
    );
}

#[test]
fn test_stray_end_br_becomes_start_tag() {
    assert_eq!(body_html("a</br>b"), "a<br>b");
}

#[test]
fn test_unknown_self_closing_tag() {
    assert_eq!(body_html("<foo/>bar"), "<foo />bar");
}

#[test]
fn test_known_non_void_self_closing_tag_closes_at_once() {
    assert_eq!(body_html("<div/>x"), "<div></div>x");

    let (_, errors) = parse_with_errors("<div/>x", "", 10);
    assert!(
        errors.iter().any(|e| e.message.contains("self closing")),
        "errors: {errors:?}"
    );
}

#[test]
fn test_void_elements_are_not_opened() {
    assert_eq!(
        body_html("<p>a<br>b<img src=x.png>c</p>"),
        "<p>a<br>b<img src=\"x.png\">c</p>"
    );
}

#[test]
fn test_image_is_renamed_img() {
    assert_eq!(body_html("<image src=x.png>"), "<img src=\"x.png\">");
}

#[test]
fn test_nested_anchor_closes_outer() {
    assert_eq!(
        body_html("<a href=1>one<a href=2>two</a>"),
        "<a href=\"1\">one</a><a href=\"2\">two</a>"
    );
}

#[test]
fn test_heading_closes_open_heading() {
    assert_eq!(body_html("<h1>One<h2>Two"), "<h1>One</h1><h2>Two</h2>");
}

#[test]
fn test_textarea_drops_leading_newline() {
    let tree = parse("<textarea>\nhello</textarea>", "");
    let textarea = find_element(&tree, "textarea");
    assert_eq!(tree.val(textarea), "hello");
}

#[test]
fn test_pre_drops_leading_newline() {
    let tree = parse("<pre>\n\nline</pre>", "");
    let pre = find_element(&tree, "pre");
    assert_eq!(tree.whole_text(pre), "\nline");
}

#[test]
fn test_script_content_is_raw_data() {
    let tree = parse("<script>if (a < b && c) { x = '</p>' }</script>", "");
    let script = find_element(&tree, "script");
    assert_eq!(tree.data_content(script), "if (a < b && c) { x = '</p>' }");
}

#[test]
fn test_title_is_rcdata() {
    let tree = parse("<title>a <b> &amp; c</title>", "");
    assert_eq!(tree.title(), "a <b> & c");
}

#[test]
fn test_plaintext_swallows_the_rest() {
    let tree = parse("<plaintext><b>not bold</b>", "");
    let plaintext = find_element(&tree, "plaintext");
    assert_eq!(tree.whole_text(plaintext), "<b>not bold</b>");
}

#[test]
fn test_null_characters_are_dropped_in_body() {
    assert_eq!(body_html("a\0b"), "ab");
}

#[test]
fn test_second_body_merges_attributes() {
    let mut tree = parse("<body class=a><p>x<body id=b class=c>", "");
    let body = tree.body();
    assert_eq!(tree.attr(body, "class").as_deref(), Some("a"));
    assert_eq!(tree.attr(body, "id").as_deref(), Some("b"));
}

// ========== formatting elements ==========

#[test]
fn test_adoption_agency_misnested_formatting() {
    assert_eq!(
        body_html("<b>1<i>2</b>3</i>"),
        "<b>1<i>2</i></b><i>3</i>"
    );
}

#[test]
fn test_adoption_agency_with_block_furthest_block() {
    assert_eq!(
        body_html("<b>1<p>2</b>3</p>"),
        "<b>1</b><p><b>2</b>3</p>"
    );
}

#[test]
fn test_formatting_reconstructed_in_new_paragraph() {
    assert_eq!(
        body_html("<p>1<b>2<p>3"),
        "<p>1<b>2</b></p><p><b>3</b></p>"
    );
}

#[test]
fn test_noahs_ark_limits_identical_entries() {
    assert_eq!(
        body_html("<p><b><b><b><b>x<p>y"),
        "<p><b><b><b><b>x</b></b></b></b></p><p><b><b><b>y</b></b></b></p>"
    );
}

// ========== tables ==========

#[test]
fn test_table_gets_implied_tbody() {
    assert_eq!(
        body_html("<table><tr><td>1</td></tr></table>"),
        "<table><tbody><tr><td>1</td></tr></tbody></table>"
    );
}

#[test]
fn test_text_in_table_is_foster_parented() {
    assert_eq!(
        body_html("<table>x<tr><td>y</td></tr></table>"),
        "x<table><tbody><tr><td>y</td></tr></tbody></table>"
    );
}

#[test]
fn test_element_in_table_is_foster_parented() {
    assert_eq!(
        body_html("<table><div>a</div><tr><td>b</td></tr></table>"),
        "<div>a</div><table><tbody><tr><td>b</td></tr></tbody></table>"
    );
}

#[test]
fn test_whitespace_in_table_stays_in_table() {
    assert_eq!(
        body_html("<table> <tr><td>1</td></tr></table>"),
        "<table> <tbody><tr><td>1</td></tr></tbody></table>"
    );
}

#[test]
fn test_cell_closes_previous_cell() {
    assert_eq!(
        body_html("<table><tr><td>1<td>2<tr><td>3</table>"),
        "<table><tbody><tr><td>1</td><td>2</td></tr><tr><td>3</td></tr></tbody></table>"
    );
}

#[test]
fn test_caption_and_colgroup() {
    assert_eq!(
        body_html("<table><caption>Cap</caption><col span=2><tr><td>x</td></tr></table>"),
        "<table><caption>Cap</caption><colgroup><col span=\"2\"></colgroup>\
         <tbody><tr><td>x</td></tr></tbody></table>"
    );
}

#[test]
fn test_hidden_input_stays_in_table() {
    assert_eq!(
        body_html("<table><input type=hidden name=t><tr><td>1</td></tr></table>"),
        "<table><input type=\"hidden\" name=\"t\"><tbody><tr><td>1</td></tr></tbody></table>"
    );
}

// ========== select ==========

#[test]
fn test_options_close_implicitly() {
    assert_eq!(
        body_html("<select><option>1<option>2</select>"),
        "<select><option>1</option><option>2</option></select>"
    );
}

#[test]
fn test_optgroup_closes_option_and_optgroup() {
    assert_eq!(
        body_html("<select><optgroup label=a><option>1<optgroup label=b><option>2</select>"),
        "<select><optgroup label=\"a\"><option>1</option></optgroup>\
         <optgroup label=\"b\"><option>2</option></optgroup></select>"
    );
}

#[test]
fn test_nested_select_closes_select() {
    assert_eq!(
        body_html("<select><option>1<select>after"),
        "<select><option>1</option></select>after"
    );
}

// ========== frameset ==========

#[test]
fn test_frameset_replaces_body() {
    let mut tree = parse("<frameset><frame src=a.html></frameset>", "");
    tree.output_settings_mut().pretty_print = false;
    assert_eq!(
        tree.outer_html(NodeId::ROOT),
        "<html><head></head><frameset><frame src=\"a.html\"></frameset></html>"
    );
    assert!(tree.get_elements_by_tag(NodeId::ROOT, "body").is_empty());
}

// ========== base uri and errors ==========

#[test]
fn test_base_href_sets_document_base() {
    let tree = parse(
        "<base href=\"https://example.com/docs/\"><a href=\"page.html\">x</a>",
        "https://other.org/",
    );
    let a = find_element(&tree, "a");
    assert_eq!(tree.abs_url(a, "href"), "https://example.com/docs/page.html");
}

#[test]
fn test_relative_urls_use_given_base() {
    let tree = parse("<img src=\"/logo.png\">", "https://example.com/a/b");
    let img = find_element(&tree, "img");
    assert_eq!(tree.abs_url(img, "src"), "https://example.com/logo.png");
}

#[test]
fn test_errors_not_tracked_by_default() {
    let mut parser = Parser::html();
    let _ = parser.parse_input("<p>x</b>", "");
    assert!(parser.errors().is_empty());
}

#[test]
fn test_errors_tracked_when_enabled() {
    let (_, errors) = parse_with_errors("<p>x</b></i>", "", 10);
    assert_eq!(errors.len(), 2);
    assert!(errors[0].position <= errors[1].position);
}

#[test]
fn test_error_capacity_is_honoured() {
    let (_, errors) = parse_with_errors("</a></b></i></u></s>", "", 2);
    assert_eq!(errors.len(), 2);
}

// ========== fragments ==========

#[test]
fn test_fragment_in_row_context() {
    let (tree, nodes) = parse_fragment("<td>1</td><td>2</td>", Some("tr"), "");
    assert_eq!(nodes.len(), 2);
    assert!(nodes.iter().all(|&n| tree.is_named(n, "td")));
    assert!(nodes.iter().all(|&n| tree.parent(n).is_none()));
}

#[test]
fn test_fragment_in_title_context_is_text() {
    let (tree, nodes) = parse_fragment("<b>x</b>", Some("title"), "");
    assert_eq!(nodes.len(), 1);
    assert_eq!(tree.as_text(nodes[0]), Some("<b>x</b>"));
}

#[test]
fn test_fragment_without_context_yields_head_and_body() {
    let (tree, nodes) = parse_fragment("<p>x", None, "");
    assert_eq!(nodes.len(), 2);
    assert!(tree.is_named(nodes[0], "head"));
    assert!(tree.is_named(nodes[1], "body"));
}

#[test]
fn test_body_fragment() {
    let mut tree = parse_body_fragment("<td>cell</td><p>para", "");
    tree.output_settings_mut().pretty_print = false;
    let body = tree.body();
    assert_eq!(tree.html(body), "cell<p>para</p>");
}

// ========== xml ==========

#[test]
fn test_xml_keeps_structure_and_case() {
    let mut tree = parse_xml("<Feed><Entry/><p><div>x</div></p></Feed>", "");
    tree.output_settings_mut().pretty_print = false;
    assert_eq!(
        tree.outer_html(NodeId::ROOT),
        "<Feed><Entry /><p><div>x</div></p></Feed>"
    );
}
