//! toyc-ast - Abstract Syntax Tree for the toy language backend
//!
//! The parser and symbol-table stage hand over a fully resolved tree: every
//! variable already knows whether it is a global, a global array, a parameter
//! or a local, and which frame slot it occupies. This crate owns that tree.
//!
//! - [`ast`] holds the node model.
//! - [`builder`] creates nodes with zeroed fields and releases whole trees.
//! - [`printer`] dumps a tree as indented text for debugging.

pub mod ast;
pub mod builder;
pub mod printer;

pub use ast::*;
pub use builder::destroy_tree;
pub use printer::{print_tree, TreePrinter};
