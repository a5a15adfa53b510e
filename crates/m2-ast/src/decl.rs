// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Declaration nodes.

use crate::expr::Expr;
use crate::types::Type;
use crate::{Ident, NodeId, Span};

/// A declaration group introduced by one keyword.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Declaration {
    pub id: NodeId,
    pub kind: DeclKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DeclKind {
    /// `CONST a = 1; b = a + 1;`
    Const(Vec<ConstDecl>),
    /// `TYPE T = ...; U = ...;`
    Type(Vec<TypeDecl>),
}

/// `ident = constExpression ;`
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConstDecl {
    pub name: Ident,
    pub value: Expr,
    pub span: Span,
}

/// `ident = type ;`
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TypeDecl {
    pub name: Ident,
    pub ty: Type,
    pub span: Span,
}
