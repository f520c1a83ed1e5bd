//! instructor-outline: an annotation-driven instructor outline over a document's symbol tree.
//!
//! Annotation comments such as `// #Hidden` are scanned out of the document, resolved onto the
//! symbols that follow them, and combined with session state (flags, bundled sections, filters)
//! into a labelled outline. Relabelling a section rewrites its annotation in place.
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

pub mod aggregate;
pub mod config;
pub mod edit_plan;
pub mod error;
pub mod formats;
pub mod host;
pub mod label;
pub mod outline;
pub mod render;
pub mod resolver;
pub mod rewriter;
pub mod scanner;
pub mod session;
pub mod store;
pub mod symbol;
