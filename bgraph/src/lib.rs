//! Query and projection tools for resolved build graphs.
//!
//! A frontend produces a frozen graph of targets, toolchains and files; this
//! crate answers questions about it. `query` resolves build inputs to the
//! output files they produce, and `project` folds the graph into the crate
//! view a Rust language server consumes.

pub mod core;
pub mod project;
pub mod query;
pub mod toml;
pub mod utils;
