// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Syntax error types.

use m2_ast::Span;
use m2_lexer::LexError;
use thiserror::Error;

/// What the parser expected and did not get.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxErrorKind {
    #[error("expected {expected}, found {found}")]
    Expected { expected: String, found: &'static str },

    #[error("expected expression, found {found}")]
    ExpectedExpression { found: &'static str },

    #[error("expected type, found {found}")]
    ExpectedType { found: &'static str },

    #[error("expected {closer} to close {construct}, found {found}")]
    UnterminatedConstruct {
        construct: &'static str,
        closer: &'static str,
        opened_at: Span,
        found: &'static str,
    },

    #[error("comparisons cannot be chained")]
    ChainedRelation,

    #[error("module '{module}' is missing its closing 'END {module}.'")]
    MissingFooter { module: String },

    #[error("{feature} are not supported")]
    NotSupported { feature: &'static str },
}

/// A syntax error with location, the construct being parsed, and an optional hint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{line}:{column}: {kind} (in {construct})")]
pub struct ParseError {
    pub kind: SyntaxErrorKind,
    pub span: Span,
    pub line: u32,
    pub column: u32,
    /// Grammar construct in progress, e.g. "record type".
    pub construct: &'static str,
    pub hint: Option<String>,
}

impl ParseError {
    pub(crate) fn with_hint(mut self, hint: Option<impl Into<String>>) -> Self {
        if let Some(hint) = hint {
            self.hint = Some(hint.into());
        }
        self
    }
}

/// Any error that stops a compilation unit from producing a tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Syntax(#[from] ParseError),
}

impl Error {
    pub fn span(&self) -> Span {
        match self {
            Error::Lex(e) => e.span,
            Error::Syntax(e) => e.span,
        }
    }

    /// 1-based (line, column) of the error.
    pub fn position(&self) -> (u32, u32) {
        match self {
            Error::Lex(e) => (e.line, e.column),
            Error::Syntax(e) => (e.line, e.column),
        }
    }

    pub fn hint(&self) -> Option<&str> {
        match self {
            Error::Lex(e) => e.hint(),
            Error::Syntax(e) => e.hint.as_deref(),
        }
    }

    pub fn as_syntax(&self) -> Option<&ParseError> {
        match self {
            Error::Syntax(e) => Some(e),
            Error::Lex(_) => None,
        }
    }
}
