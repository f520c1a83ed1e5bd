//! instructor-outline: print the instructor outline of a document, optionally relabelling it.
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

use clap::Parser;
use instructor_outline::config::Config;
use instructor_outline::edit_plan::TextEdit;
use instructor_outline::error::Result;
use instructor_outline::formats::markdown::MarkdownSymbols;
use instructor_outline::host::{Document, FileHost, StaticSymbols, SymbolSource};
use instructor_outline::label::Label;
use instructor_outline::render::{render_text, snapshot};
use instructor_outline::session::{OutlineSession, FLAG_COLOR};
use instructor_outline::symbol::Symbol;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "instructor-outline")]
#[command(about = "Labelled instructor outline of an annotated document", long_about = None)]
struct Args {
    /// Document to outline
    #[arg(value_name = "PATH")]
    path: PathBuf,

    /// JSON symbol tree to use instead of outlining Markdown headings
    #[arg(long, value_name = "JSON")]
    symbols: Option<PathBuf>,

    /// Language identifier, defaulting to the file extension
    #[arg(long, value_name = "ID")]
    language: Option<String>,

    /// Label a symbol, rewriting its annotation in the document
    #[arg(long = "set", value_name = "SYMBOL=LABEL", value_parser = parse_assignment)]
    assignments: Vec<(String, Label)>,

    /// Raise a flag on a section
    #[arg(long = "flag", value_name = "SECTION=NAME", value_parser = parse_flag)]
    flags: Vec<(String, String)>,

    /// Show only branches holding this label
    #[arg(long = "filter", value_name = "LABEL", value_parser = parse_label)]
    filters: Vec<Label>,

    /// Print a JSON snapshot instead of the text tree
    #[arg(long)]
    json: bool,

    /// Configuration file, defaulting to instructor-outline.toml
    #[arg(long, value_name = "TOML")]
    config: Option<PathBuf>,
}

/// Where symbols come from: the document's own headings or a precomputed tree.
enum Symbols {
    Markdown(MarkdownSymbols),
    Static(StaticSymbols),
}

impl SymbolSource for Symbols {
    fn symbols(&self, document: &Document) -> Vec<Symbol> {
        match self {
            Self::Markdown(source) => source.symbols(document),
            Self::Static(source) => source.symbols(document),
        }
    }

    fn edit_applied(&mut self, edit: &TextEdit) {
        match self {
            Self::Markdown(source) => source.edit_applied(edit),
            Self::Static(source) => source.edit_applied(edit),
        }
    }
}

fn parse_label(s: &str) -> std::result::Result<Label, String> {
    s.parse().map_err(|e| format!("{e}"))
}

fn split_pair(s: &str) -> std::result::Result<(&str, &str), String> {
    s.rsplit_once('=')
        .filter(|(key, value)| !key.is_empty() && !value.is_empty())
        .ok_or_else(|| format!("expected KEY=VALUE, got {s:?}"))
}

fn parse_assignment(s: &str) -> std::result::Result<(String, Label), String> {
    let (symbol, label) = split_pair(s)?;
    Ok((symbol.to_string(), parse_label(label)?))
}

fn parse_flag(s: &str) -> std::result::Result<(String, String), String> {
    let (section, name) = split_pair(s)?;
    Ok((section.to_string(), name.to_string()))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();
    let args = Args::parse();

    let cfg = match &args.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let source = match &args.symbols {
        Some(path) => Symbols::Static(StaticSymbols::from_json_file(path)?),
        None => Symbols::Markdown(MarkdownSymbols::markdown()),
    };

    let host = FileHost::new(args.path, args.language, source);
    let mut session = OutlineSession::new(host, cfg);

    for (symbol, label) in &args.assignments {
        match session.set_label(symbol, *label) {
            Ok(change) => log::info!("{symbol}: {change:?}"),
            Err(e) => eprintln!("Could not label {symbol} as {label}: {e}"),
        }
    }
    for (section, name) in &args.flags {
        session.add_flag(section, name, FLAG_COLOR, None);
    }
    if !args.filters.is_empty() {
        session.set_filter_labels(args.filters.iter().copied());
    }

    let snapshot = snapshot(&session);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print!("{}", render_text(&snapshot));
    }
    Ok(())
}
