//! Integration tests for selector parsing and matching against parsed HTML.

use wren_dom::{DomTree, NodeId};
use wren_html::parse;
use wren_select::{Elements, SelectorParseError, closest, is, select, select_first};

const PAGE: &str = concat!(
    "<div id=main class=a>",
    "<p class=intro>One <b>bold</b></p>",
    "<p>Two</p>",
    "<span>Three</span>",
    "<p title='Hello World'>Four</p>",
    "</div>",
    "<ul><li>1<li>2<li>3<li>4<li>5</ul>",
    "<script>var greeting = \"Hello\";</script>",
);

fn page() -> DomTree {
    parse(PAGE, "")
}

/// Select from the document and return each element's text.
fn texts(tree: &DomTree, query: &str) -> Vec<String> {
    query_all(tree, query)
        .iter()
        .map(|element| tree.text(element))
        .collect()
}

fn query_all(tree: &DomTree, query: &str) -> Elements {
    select(tree, NodeId::ROOT, query).unwrap()
}

fn main_div(tree: &DomTree) -> NodeId {
    tree.get_element_by_id(NodeId::ROOT, "main").unwrap()
}

// ========== simple selectors ==========

#[test]
fn test_type_id_and_class() {
    let tree = page();
    assert_eq!(query_all(&tree, "p").len(), 3);
    assert_eq!(query_all(&tree, "P").len(), 3);
    assert_eq!(texts(&tree, "#main > span"), vec!["Three"]);
    assert_eq!(texts(&tree, ".intro"), vec!["One bold"]);
    assert_eq!(texts(&tree, ".INTRO"), vec!["One bold"]);
    assert!(query_all(&tree, "#MAIN").is_empty());
}

#[test]
fn test_compound_with_first_child() {
    let tree = page();
    assert_eq!(texts(&tree, "div.a > p:first-child"), vec!["One bold"]);
}

#[test]
fn test_universal_includes_the_root_element() {
    let tree = page();
    let div = main_div(&tree);
    let found = select(&tree, div, "*").unwrap();
    // div, three p, b, span
    assert_eq!(found.len(), 6);
    assert_eq!(found.first(), Some(div));
    assert_eq!(select(&tree, div, "div").unwrap().as_slice(), &[div]);
}

#[test]
fn test_escaped_id_and_namespaced_tags() {
    let tree = parse("<p id='a.b'>dot</p><svg:rect>r</svg:rect>", "");
    assert_eq!(texts(&tree, r"#a\.b"), vec!["dot"]);
    assert_eq!(texts(&tree, "svg|rect"), vec!["r"]);
    assert_eq!(texts(&tree, "*|rect"), vec!["r"]);
}

// ========== attributes ==========

#[test]
fn test_attribute_operators() {
    let tree = page();
    assert_eq!(texts(&tree, "[title]"), vec!["Four"]);
    assert_eq!(texts(&tree, "[^tit]"), vec!["Four"]);
    assert_eq!(texts(&tree, "[title='hello world']"), vec!["Four"]);
    assert_eq!(texts(&tree, "[title^=HELL]"), vec!["Four"]);
    assert_eq!(texts(&tree, "[title$=world]"), vec!["Four"]);
    assert_eq!(texts(&tree, "[title*=o w]"), vec!["Four"]);
    assert_eq!(texts(&tree, "p[title!=hello world]"), vec!["One bold", "Two"]);
    assert_eq!(query_all(&tree, "[id~=^ma]").first(), Some(main_div(&tree)));
    assert!(query_all(&tree, "[title=hello]").is_empty());
}

// ========== combinators ==========

#[test]
fn test_combinators() {
    let tree = page();
    assert_eq!(texts(&tree, "div b"), vec!["bold"]);
    assert!(query_all(&tree, "div > b").is_empty());
    assert_eq!(texts(&tree, "p + span"), vec!["Three"]);
    assert_eq!(texts(&tree, "p ~ p"), vec!["Two", "Four"]);
    assert_eq!(texts(&tree, "span ~ p"), vec!["Four"]);
    assert_eq!(texts(&tree, "span+p"), vec!["Four"]);
    assert_eq!(query_all(&tree, "ul li").len(), 5);
}

#[test]
fn test_union_is_in_document_order_without_duplicates() {
    let tree = parse("<p><b>1</b><a>2</a><b>3</b></p>", "");
    assert_eq!(query_all(&tree, "a, b").text(&tree), "1 2 3");
    assert_eq!(query_all(&tree, "b, p b, b").len(), 2);
}

#[test]
fn test_comma_binds_loosest() {
    let tree = page();
    // span OR (b inside div), not (span OR div) followed by b
    assert_eq!(texts(&tree, "span, div b"), vec!["bold", "Three"]);
    assert_eq!(texts(&tree, "li:eq(4), div > span"), vec!["Three", "5"]);
}

#[test]
fn test_leading_combinator_is_relative_to_the_root() {
    let tree = page();
    let div = main_div(&tree);
    assert_eq!(select(&tree, div, "> p").unwrap().len(), 3);
    assert!(select(&tree, div, "> b").unwrap().is_empty());
}

// ========== structural pseudo-classes ==========

#[test]
fn test_nth_child_family() {
    let tree = page();
    assert_eq!(query_all(&tree, "li:nth-child(odd)").text(&tree), "1 3 5");
    assert_eq!(query_all(&tree, "li:nth-child(even)").text(&tree), "2 4");
    assert_eq!(query_all(&tree, "li:nth-child(-n+2)").text(&tree), "1 2");
    assert_eq!(query_all(&tree, "li:nth-child(3n + 1)").text(&tree), "1 4");
    assert_eq!(query_all(&tree, "li:nth-last-child(2)").text(&tree), "4");
    assert_eq!(texts(&tree, "p:nth-of-type(2)"), vec!["Two"]);
    assert_eq!(texts(&tree, "p:nth-last-of-type(1)"), vec!["Four"]);
}

#[test]
fn test_index_pseudo_classes() {
    let tree = page();
    assert_eq!(query_all(&tree, "li:lt(2)").text(&tree), "1 2");
    assert_eq!(query_all(&tree, "li:gt(2)").text(&tree), "4 5");
    assert_eq!(query_all(&tree, "li:eq(0)").text(&tree), "1");
}

#[test]
fn test_first_last_only() {
    let tree = page();
    assert_eq!(texts(&tree, "p:first-of-type"), vec!["One bold"]);
    assert_eq!(texts(&tree, "p:last-of-type"), vec!["Four"]);
    assert_eq!(texts(&tree, "div > :last-child"), vec!["Four"]);
    assert_eq!(texts(&tree, "span:only-of-type"), vec!["Three"]);
    assert_eq!(texts(&tree, "b:only-child"), vec!["bold"]);
    assert!(query_all(&tree, "li:only-child").is_empty());
}

#[test]
fn test_document_children_have_no_sibling_position() {
    let tree = page();
    assert!(query_all(&tree, "html:first-child").is_empty());
    assert_eq!(query_all(&tree, "body:last-child").len(), 1);
}

#[test]
fn test_empty_ignores_comments_but_not_whitespace() {
    let tree = parse("<div><p></p><p> </p><p><!-- c --></p></div>", "");
    let empty = query_all(&tree, "p:empty");
    let all = query_all(&tree, "p");
    assert_eq!(empty.as_slice(), &[all.as_slice()[0], all.as_slice()[2]]);
}

#[test]
fn test_root_is_relative_to_the_query() {
    let tree = page();
    let html = tree.find_html().unwrap();
    assert_eq!(query_all(&tree, ":root").as_slice(), &[html]);
    let div = main_div(&tree);
    assert_eq!(select(&tree, div, ":root").unwrap().as_slice(), &[div]);
}

#[test]
fn test_has_and_not() {
    let tree = page();
    assert_eq!(texts(&tree, "p:has(b)"), vec!["One bold"]);
    assert_eq!(query_all(&tree, "div:has(> span)").len(), 1);
    assert!(query_all(&tree, "b:has(b)").is_empty());
    assert_eq!(texts(&tree, "p:not(.intro)"), vec!["Two", "Four"]);
    assert_eq!(texts(&tree, "div > :not(p)"), vec!["Three"]);
}

// ========== text pseudo-classes ==========

#[test]
fn test_contains_text() {
    let tree = page();
    assert_eq!(texts(&tree, "p:contains(BOLD)"), vec!["One bold"]);
    assert_eq!(texts(&tree, "p:containsOwn(one)"), vec!["One bold"]);
    assert!(query_all(&tree, "p:containsOwn(bold)").is_empty());
    assert_eq!(query_all(&tree, "script:containsData(hello)").len(), 1);
    assert!(query_all(&tree, "p:containsData(hello)").is_empty());
}

#[test]
fn test_contains_with_escaped_paren() {
    let tree = parse("<p>smile :)</p><p>frown :(</p>", "");
    assert_eq!(texts(&tree, r"p:contains(\))"), vec!["smile :)"]);
}

#[test]
fn test_matches_regex() {
    let tree = page();
    assert_eq!(texts(&tree, r"p:matches(^T\w+$)"), vec!["Two"]);
    assert_eq!(texts(&tree, "p:matchesOwn(^One$)"), vec!["One bold"]);
    assert_eq!(query_all(&tree, "li:matches([24])").text(&tree), "2 4");
}

// ========== free functions ==========

#[test]
fn test_select_first_is_and_closest() {
    let tree = page();
    let b = select_first(&tree, NodeId::ROOT, "b").unwrap().unwrap();
    let div = main_div(&tree);

    assert_eq!(select_first(&tree, NodeId::ROOT, "table").unwrap(), None);
    assert!(is(&tree, b, "div b").unwrap());
    assert!(!is(&tree, b, "div > b").unwrap());
    assert_eq!(closest(&tree, b, "div").unwrap(), Some(div));
    assert_eq!(closest(&tree, b, "b").unwrap(), Some(b));
    assert_eq!(closest(&tree, b, "table").unwrap(), None);
}

#[test]
fn test_invalid_queries() {
    let tree = page();
    assert!(matches!(
        select(&tree, NodeId::ROOT, ""),
        Err(SelectorParseError::Empty)
    ));
    assert!(matches!(
        select(&tree, NodeId::ROOT, "div:frob"),
        Err(SelectorParseError::UnexpectedToken { .. })
    ));
    assert!(matches!(
        select(&tree, NodeId::ROOT, "li:nth-child(x)"),
        Err(SelectorParseError::InvalidNth(_))
    ));
    assert!(matches!(
        select(&tree, NodeId::ROOT, "p:has(b"),
        Err(SelectorParseError::Unbalanced(_))
    ));
    let message = select(&tree, NodeId::ROOT, "div:frob").unwrap_err().to_string();
    assert_eq!(message, "could not parse query 'div:frob': unexpected token at ':frob'");
}

// ========== Elements ==========

#[test]
fn test_elements_accessors() {
    let tree = page();
    let items = query_all(&tree, "li");
    assert_eq!(items.each_text(&tree), vec!["1", "2", "3", "4", "5"]);
    assert_eq!(items.eq(1).text(&tree), "2");
    assert!(items.eq(9).is_empty());
    assert_eq!(items.first().map(|li| tree.text(li)).as_deref(), Some("1"));
    assert_eq!(items.last().map(|li| tree.text(li)).as_deref(), Some("5"));
    assert_eq!(items.html(&tree), "1\n2\n3\n4\n5");

    let paragraphs = query_all(&tree, "p");
    assert_eq!(paragraphs.attr(&tree, "title"), "Hello World");
    assert_eq!(paragraphs.attr(&tree, "missing"), "");
    assert_eq!(paragraphs.each_attr(&tree, "class"), vec!["intro"]);
    assert!(paragraphs.has_attr(&tree, "title"));
    assert!(paragraphs.has_class(&tree, "Intro"));
    assert!(paragraphs.has_text(&tree));
    assert_eq!(query_all(&tree, "b").outer_html(&tree), "<b>bold</b>");
}

#[test]
fn test_elements_filters() {
    let tree = page();
    let items = query_all(&tree, "li");
    assert!(items.is(&tree, ":nth-child(3)").unwrap());
    assert!(!items.is(&tree, "p").unwrap());
    assert_eq!(items.filter(&tree, ":nth-child(odd)").unwrap().len(), 3);
    assert_eq!(items.not(&tree, ":nth-child(odd)").unwrap().text(&tree), "2 4");

    let ul = query_all(&tree, "ul");
    assert_eq!(ul.parents(&tree).len(), 2);
    assert_eq!(items.parents(&tree).len(), 3);

    let divs = query_all(&tree, "div");
    assert_eq!(divs.select(&tree, "p").unwrap().len(), 3);
    assert!(divs.select(&tree, "p[").is_err());
}

#[test]
fn test_elements_mutation() {
    let mut tree = page();
    let paragraphs = query_all(&tree, "p");
    let _ = paragraphs.add_class(&mut tree, "x");
    assert_eq!(query_all(&tree, ".x").len(), 3);

    let _ = paragraphs.remove_attr(&mut tree, "title");
    assert!(query_all(&tree, "[title]").is_empty());

    let _ = paragraphs.toggle_class(&mut tree, "intro");
    assert_eq!(texts(&tree, ".intro"), vec!["Two", "Four"]);

    let items = query_all(&tree, "li");
    let _ = items.remove(&mut tree);
    assert!(query_all(&tree, "li").is_empty());
    let ul = query_all(&tree, "ul").first().unwrap();
    assert_eq!(tree.child_element_count(ul), 0);
}
