// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Parse tree types for Modula-2 (PIM, 4th edition).
//!
//! This crate defines the tokens and tree nodes shared between the lexer,
//! the parser and whatever tool consumes the tree (outline views, linters,
//! semantic analysis). Nodes own their children and are never mutated
//! after the parser returns them.

pub mod span;
pub mod token;
pub mod ident;
pub mod expr;
pub mod types;
pub mod decl;
pub mod module;
pub mod node;

pub use ident::{Ident, IdentList, Qualident};
pub use module::CompilationUnit;
pub use node::{NodeKind, NodeRef};
pub use span::{LineMap, Position, Span};

/// Unique identifier for tree nodes.
///
/// Assigned in parse order, so two parses of the same text produce the
/// same ids. Used by later passes to attach results to nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(pub u32);

impl NodeId {
    pub const DUMMY: NodeId = NodeId(u32::MAX);
}
