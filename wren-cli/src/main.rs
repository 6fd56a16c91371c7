//! wren: parse, query and re-serialize HTML and XML
//!
//! Usage:
//!   wren <file>                        Parse and print the normalised document
//!   wren --html '<p>Hi'                Parse a string instead of a file
//!   wren <file> --select 'a[href]'     Print the matching elements
//!   wren <file> --select h1 --text     Print their text instead
//!   wren --html '<td>x' --fragment tr  Parse as the children of a `<tr>`
//!   wren <file> --format tree          Show the parsed tree as an outline
//!   wren <file> --format json          Dump the tree as JSON
//!   wren <file> --errors 20            Also report up to 20 parse errors
//!
//! `RUST_LOG=wren=trace` shows the tokenizer and tree builder at work.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser as CliParser, ValueEnum};
use log::{debug, info};
use owo_colors::OwoColorize;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use wren_common::ParseErrorList;
use wren_dom::{DomTree, NodeData, NodeId, OutputSettings, ParseSettings};
use wren_html::{Parser, dump_tree};
use wren_select::Selector;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Serialized markup
    Html,
    /// Indented node outline
    Tree,
    /// Node tree as JSON
    Json,
}

#[derive(Debug, CliParser)]
#[command(name = "wren", version, about = "Parse, query and re-serialize HTML and XML")]
struct Args {
    /// File to parse
    #[arg(required_unless_present = "html", conflicts_with = "html")]
    file: Option<PathBuf>,

    /// Parse this markup instead of a file
    #[arg(long, value_name = "MARKUP")]
    html: Option<String>,

    /// Base URI for resolving relative links
    #[arg(long, value_name = "URI", default_value = "")]
    base_uri: String,

    /// Parse as a fragment in the context of this element, e.g. `tr`
    #[arg(long, value_name = "CONTEXT")]
    fragment: Option<String>,

    /// Use the XML tree builder
    #[arg(long)]
    xml: bool,

    /// Print only the elements matching this selector
    #[arg(short, long, value_name = "QUERY")]
    select: Option<String>,

    /// Print text rather than markup
    #[arg(short, long)]
    text: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Html)]
    format: OutputFormat,

    /// Disable pretty printing
    #[arg(long)]
    compact: bool,

    /// Indent every element, inline ones included
    #[arg(long)]
    outline: bool,

    /// Spaces per indent level
    #[arg(long, value_name = "N")]
    indent: Option<usize>,

    /// Output charset, e.g. `ascii`; decides which characters are escaped
    #[arg(long, value_name = "CHARSET")]
    charset: Option<String>,

    /// JSON file with `output` and `parse` settings
    #[arg(long, value_name = "FILE")]
    settings: Option<PathBuf>,

    /// Track and print up to N parse errors
    #[arg(long, value_name = "N", default_value_t = 0)]
    errors: usize,
}

/// Contents of a `--settings` file. Both sections are optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SettingsFile {
    output: Option<OutputSettings>,
    parse: Option<ParseSettings>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let settings = load_settings(args.settings.as_deref())?;
    let input = read_input(&args)?;

    let mut parser = if args.xml { Parser::xml() } else { Parser::html() };
    if let Some(parse_settings) = settings.parse {
        parser = parser.settings(parse_settings);
    }
    parser = parser.set_track_errors(args.errors);

    let (mut tree, root) = match &args.fragment {
        Some(context) => parse_fragment(&mut parser, &input, context, &args.base_uri),
        None => (parser.parse_input(&input, &args.base_uri), NodeId::ROOT),
    };
    info!(target: "wren::cli", "parsed {} bytes into {} nodes", input.len(), tree.len());

    apply_output_settings(&mut tree, settings.output, &args);

    let nodes: Vec<NodeId> = match &args.select {
        Some(query) => {
            let selector =
                Selector::parse(query).with_context(|| format!("invalid selector '{query}'"))?;
            debug!(target: "wren::cli", "selector '{query}' parsed as '{}'", selector.evaluator());
            selector.select(&tree, root).into()
        }
        None => vec![root],
    };

    print_nodes(&tree, root, &nodes, &args)?;
    if parser.is_track_errors() {
        report_errors(parser.errors());
    }
    Ok(())
}

fn load_settings(path: Option<&Path>) -> Result<SettingsFile> {
    let Some(path) = path else {
        return Ok(SettingsFile::default());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading settings file '{}'", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing settings file '{}'", path.display()))
}

fn read_input(args: &Args) -> Result<String> {
    if let Some(html) = &args.html {
        return Ok(html.clone());
    }
    let path = args
        .file
        .as_deref()
        .context("no input file or --html given")?;
    fs::read_to_string(path).with_context(|| format!("reading '{}'", path.display()))
}

/// Parse `input` as the children of a detached `context` element, which then
/// serves as the query root.
fn parse_fragment(parser: &mut Parser, input: &str, context: &str, base_uri: &str) -> (DomTree, NodeId) {
    let mut tree = DomTree::with_base_uri(base_uri);
    let context = tree.create_element(context);
    for node in parser.parse_fragment_input(&mut tree, input, Some(context)) {
        tree.append_child(context, node);
    }
    (tree, context)
}

/// Layer the settings file, then the command line flags, over the defaults
/// the tree builder chose.
fn apply_output_settings(tree: &mut DomTree, from_file: Option<OutputSettings>, args: &Args) {
    let output = tree.output_settings_mut();
    if let Some(from_file) = from_file {
        *output = from_file;
    }
    if args.compact {
        output.pretty_print = false;
    }
    if args.outline {
        output.outline = true;
    }
    if let Some(indent) = args.indent {
        output.indent_amount = indent;
    }
    if let Some(charset) = &args.charset {
        output.charset.clone_from(charset);
    }
}

fn print_nodes(tree: &DomTree, root: NodeId, nodes: &[NodeId], args: &Args) -> Result<()> {
    match args.format {
        OutputFormat::Json => {
            let value = if args.select.is_some() {
                Value::Array(nodes.iter().map(|&node| node_to_json(tree, node)).collect())
            } else {
                node_to_json(tree, root)
            };
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Tree => {
            for &node in nodes {
                print!("{}", dump_tree(tree, node));
            }
        }
        OutputFormat::Html => {
            for &node in nodes {
                if args.text {
                    println!("{}", tree.text(node));
                } else if node == root {
                    // The document, or a fragment's context element.
                    println!("{}", tree.html(node));
                } else {
                    println!("{}", tree.outer_html(node));
                }
            }
        }
    }
    if args.select.is_some() {
        eprintln!("{}", format!("{} matched", nodes.len()).dimmed());
    }
    Ok(())
}

fn node_to_json(tree: &DomTree, node: NodeId) -> Value {
    let mut obj = Map::new();

    match tree.data(node) {
        NodeData::Document(_) => {
            let _ = obj.insert("type".to_string(), json!("document"));
            let _ = obj.insert("quirksMode".to_string(), json!(tree.quirks_mode().to_string()));
        }
        NodeData::Element(data) => {
            let _ = obj.insert("type".to_string(), json!("element"));
            let _ = obj.insert("tagName".to_string(), json!(data.tag_name()));
            let attrs: Map<String, Value> = data
                .attrs
                .iter()
                .map(|attr| (attr.key.clone(), json!(attr.value)))
                .collect();
            let _ = obj.insert("attributes".to_string(), Value::Object(attrs));
        }
        NodeData::Text(text) => {
            let _ = obj.insert("type".to_string(), json!("text"));
            let _ = obj.insert("content".to_string(), json!(text));
        }
        NodeData::Data(data) => {
            let _ = obj.insert("type".to_string(), json!("data"));
            let _ = obj.insert("content".to_string(), json!(data));
        }
        NodeData::Comment(text) => {
            let _ = obj.insert("type".to_string(), json!("comment"));
            let _ = obj.insert("content".to_string(), json!(text));
        }
        NodeData::CData(text) => {
            let _ = obj.insert("type".to_string(), json!("cdata"));
            let _ = obj.insert("content".to_string(), json!(text));
        }
        NodeData::DocumentType(doctype) => {
            let _ = obj.insert("type".to_string(), json!("doctype"));
            let _ = obj.insert("name".to_string(), json!(doctype.name));
            let _ = obj.insert("publicId".to_string(), json!(doctype.public_id));
            let _ = obj.insert("systemId".to_string(), json!(doctype.system_id));
        }
        NodeData::XmlDeclaration(declaration) => {
            let _ = obj.insert("type".to_string(), json!("declaration"));
            let _ = obj.insert("name".to_string(), json!(declaration.name));
        }
    }

    let children = tree.children(node);
    if !children.is_empty() {
        let children: Vec<Value> = children.iter().map(|&child| node_to_json(tree, child)).collect();
        let _ = obj.insert("children".to_string(), Value::Array(children));
    }

    Value::Object(obj)
}

fn report_errors(errors: &ParseErrorList) {
    if errors.is_empty() {
        eprintln!("{}", "no parse errors".green());
        return;
    }
    eprintln!("{}", format!("{} parse errors:", errors.len()).yellow().bold());
    for error in errors {
        eprintln!("  {} {}", format!("@{}", error.position).cyan(), error.message);
    }
}
