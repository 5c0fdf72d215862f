#![doc = include_str!("../README.md")]

/// Identifiers
pub mod names;
/// Module tree: scopes, item tables, declarations
pub mod tree;
/// Paths like `crate::a::b` and how to parse them
pub mod path;
/// Path resolution and visibility
pub mod resolve;
/// `use` declarations: explicit imports, re-exports, globs
pub mod imports;
/// Diagnostics (user-facing descriptions of errors) and logging
pub mod diagnostics;
/// Resolver configuration
pub mod config;
/// Project datastructure which goes through each phase
mod project;

pub use config::ResolverConfig;
pub use project::*;
