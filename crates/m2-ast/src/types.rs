// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Type nodes: everything that can follow `=` in a type declaration.

use crate::expr::{Expr, RangeItem};
use crate::{Ident, IdentList, NodeId, Qualident, Span};

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Type {
    pub id: NodeId,
    pub kind: TypeKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TypeKind {
    /// Reference to a declared type (`INTEGER`, `Storage.Pool`)
    Named(Qualident),
    /// `(Red, Green, Blue)`; ordinal values follow declaration order
    Enumeration(IdentList),
    /// `[lo .. hi]`; bounds are kept unevaluated
    Subrange { from: Box<Expr>, to: Box<Expr> },
    /// `ARRAY index OF element`
    Array { index: Box<Type>, element: Box<Type> },
    Record(Vec<FieldList>),
    /// `SET OF base`
    Set(Box<Type>),
    /// `POINTER TO target`; the target may be declared later
    Pointer(Box<Type>),
    /// `PROCEDURE [(...) [: result]]`
    Procedure(Option<FormalTypeList>),
}

/// One entry of a record: plain fields or a variant part.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldList {
    pub kind: FieldListKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FieldListKind {
    /// `a, b: T`
    Fields { names: IdentList, ty: Type },
    /// `CASE tag: T OF ... END`
    Variant(VariantPart),
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VariantPart {
    /// Tag field name; absent for `CASE : T OF` and `CASE T OF`.
    pub tag: Option<Ident>,
    pub tag_type: Qualident,
    pub variants: Vec<Variant>,
    /// Fields of the `ELSE` arm.
    pub else_fields: Option<Vec<FieldList>>,
}

/// `labels : fields` arm of a variant part.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Variant {
    pub labels: Vec<RangeItem>,
    pub fields: Vec<FieldList>,
    pub span: Span,
}

/// Parameter list of a procedure type.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FormalTypeList {
    pub params: Vec<FormalTypeParam>,
    /// Present for function procedures.
    pub result: Option<Qualident>,
    pub span: Span,
}

/// `[VAR] [ARRAY OF] qualident`
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FormalTypeParam {
    pub is_var: bool,
    pub open_array: bool,
    pub ty: Qualident,
    pub span: Span,
}
