// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Compilation units, module headers and imports.

use crate::decl::Declaration;
use crate::{Ident, IdentList, Span};

/// Root of every parse.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CompilationUnit {
    Definition(DefinitionModule),
    Program(ProgramModule),
}

impl CompilationUnit {
    /// Name given in the module header.
    pub fn name(&self) -> &Ident {
        match self {
            CompilationUnit::Definition(m) => &m.name,
            CompilationUnit::Program(m) => &m.name,
        }
    }

    /// Name repeated after the closing `END`.
    pub fn footer(&self) -> &Ident {
        match self {
            CompilationUnit::Definition(m) => &m.footer,
            CompilationUnit::Program(m) => &m.footer,
        }
    }

    pub fn declarations(&self) -> &[Declaration] {
        match self {
            CompilationUnit::Definition(m) => &m.decls,
            CompilationUnit::Program(m) => &m.block.decls,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            CompilationUnit::Definition(m) => m.span,
            CompilationUnit::Program(m) => m.span,
        }
    }
}

/// `DEFINITION MODULE name; {import} {declaration} END name.`
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DefinitionModule {
    pub name: Ident,
    pub imports: Vec<Import>,
    pub decls: Vec<Declaration>,
    pub footer: Ident,
    pub span: Span,
}

/// `[IMPLEMENTATION] MODULE name; {import} block name.`
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProgramModule {
    pub implementation: bool,
    pub name: Ident,
    pub imports: Vec<Import>,
    pub block: Block,
    pub footer: Ident,
    pub span: Span,
}

/// `{declaration} [BEGIN] END`
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Block {
    pub decls: Vec<Declaration>,
    /// Span of `BEGIN`, when the block has a body.
    pub body: Option<Span>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Import {
    pub kind: ImportKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ImportKind {
    /// `IMPORT A, B;` imports whole modules
    Qualified { modules: IdentList },
    /// `FROM M IMPORT a, b;` imports names from one module
    Unqualified { module: Ident, names: IdentList },
}
