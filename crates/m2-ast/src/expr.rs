// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Expression nodes, shared by constant and runtime expressions.

use crate::token::IntLiteral;
use crate::{NodeId, Qualident, Span};

/// An expression in the tree.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Expr {
    pub id: NodeId,
    pub kind: ExprKind,
    pub span: Span,
}

/// The kind of expression.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExprKind {
    /// Integer literal in any of its forms
    Integer(IntLiteral),
    /// Real literal, as written
    Real(String),
    /// String literal, raw content between the quotes
    String(String),
    /// Named value (`x`, `M.x`)
    Designator(Qualident),
    /// Set constructor (`{1, 3..5}`, `CharSet{"a".."z"}`)
    Set {
        base: Option<Qualident>,
        elements: Vec<RangeItem>,
    },
    /// Logical negation
    Not(Box<Expr>),
    /// Leading sign of a simple expression
    Unary {
        op: Sign,
        operand: Box<Expr>,
    },
    /// Binary operation, including the single optional relation
    Binary {
        op: BinOp,
        op_span: Span,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

/// Either one expression or an inclusive `lhs .. rhs` range.
///
/// Used for set elements and for case labels of variant records.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RangeItem {
    pub lhs: Expr,
    pub rhs: Option<Expr>,
    pub span: Span,
}

impl RangeItem {
    pub fn is_range(&self) -> bool {
        self.rhs.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Sign {
    Plus,
    Minus,
}

/// Binary operators. Synonym spellings (`#`/`<>`, `AND`/`&`) share one variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BinOp {
    // Additive
    Add,
    Sub,
    Or,
    // Multiplicative
    Mul,
    RealDiv,
    Div,
    Mod,
    And,
    // Relations
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    In,
}

/// Precedence level of a binary operator, loosest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Precedence {
    Relational,
    Additive,
    Multiplicative,
}

impl BinOp {
    pub fn precedence(self) -> Precedence {
        match self {
            BinOp::Add | BinOp::Sub | BinOp::Or => Precedence::Additive,
            BinOp::Mul | BinOp::RealDiv | BinOp::Div | BinOp::Mod | BinOp::And => {
                Precedence::Multiplicative
            }
            BinOp::Eq | BinOp::Ne | BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge | BinOp::In => {
                Precedence::Relational
            }
        }
    }

    pub fn is_relation(self) -> bool {
        self.precedence() == Precedence::Relational
    }

    /// Canonical spelling.
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Or => "OR",
            BinOp::Mul => "*",
            BinOp::RealDiv => "/",
            BinOp::Div => "DIV",
            BinOp::Mod => "MOD",
            BinOp::And => "AND",
            BinOp::Eq => "=",
            BinOp::Ne => "#",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::In => "IN",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precedence_ordering() {
        assert!(BinOp::Mul.precedence() > BinOp::Add.precedence());
        assert!(BinOp::Add.precedence() > BinOp::Lt.precedence());
        assert_eq!(BinOp::And.precedence(), BinOp::Div.precedence());
        assert_eq!(BinOp::Or.precedence(), Precedence::Additive);
        assert!(BinOp::In.is_relation());
        assert!(!BinOp::Mod.is_relation());
    }
}
