//! # REPOGRAPH
//!
//! Source-dependency graphs for JavaScript and TypeScript projects.
//!
//! REPOGRAPH collects a project's source files (from a remote repository
//! snapshot, falling back to a local directory walk), extracts import
//! specifiers, resolves relative ones to concrete files and emits a bounded
//! node/edge graph ready for a hierarchical layout.
//!
//! ## Pipeline
//!
//! - **Collect**: [`core::SourceCollector`] with retry and failure
//!   classification for the remote path
//! - **Extract**: [`parsers::ImportScanner`] for `import`, `require` and
//!   dynamic `import()` specifiers
//! - **Resolve**: [`core::PathResolver`], relative specifiers only
//! - **Build**: [`core::GraphBuilder`] with role classification and
//!   node/edge caps

pub mod config;
pub mod core;
pub mod formatters;
pub mod parsers;
pub mod remote;
pub mod server;

pub use crate::config::RepographConfig;
pub use crate::core::{build_graph, CodebaseAnalyzer, FileTable, GraphResult};
