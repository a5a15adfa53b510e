// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Uniform, read-only view over tree nodes.
//!
//! Tools that only need structure (outline views, linters, tree dumps) can
//! walk the tree through `NodeRef` without matching on every node type:
//! each node exposes its kind, span, ordered children and named fields
//! (`modulename`, `from`, `lhs`, ...).

use crate::decl::{ConstDecl, DeclKind, Declaration, TypeDecl};
use crate::expr::{Expr, ExprKind, RangeItem};
use crate::module::{Block, CompilationUnit, DefinitionModule, Import, ImportKind, ProgramModule};
use crate::types::{FieldList, FieldListKind, FormalTypeList, FormalTypeParam, Type, TypeKind, Variant};
use crate::{Ident, IdentList, Qualident, Span};

/// Node-kind discriminant, one per grammar nonterminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    CompilationUnit,
    DefinitionModule,
    ProgramModule,
    Block,
    QualifiedImport,
    UnqualifiedImport,
    Ident,
    Qualident,
    IdentList,
    ConstSection,
    TypeSection,
    ConstDeclaration,
    TypeDeclaration,
    NamedType,
    Enumeration,
    Subrange,
    ArrayType,
    RecordType,
    SetType,
    PointerType,
    ProcedureType,
    FieldList,
    VariantFieldList,
    Variant,
    CaseLabels,
    FormalTypeList,
    FormalTypeParam,
    IntegerLiteral,
    RealLiteral,
    StringLiteral,
    Designator,
    SetExpr,
    Element,
    Not,
    Unary,
    Binary,
}

/// Borrowed reference to any tree node.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    CompilationUnit(&'a CompilationUnit),
    DefinitionModule(&'a DefinitionModule),
    ProgramModule(&'a ProgramModule),
    Block(&'a Block),
    Import(&'a Import),
    Ident(&'a Ident),
    Qualident(&'a Qualident),
    IdentList(&'a IdentList),
    Declaration(&'a Declaration),
    ConstDecl(&'a ConstDecl),
    TypeDecl(&'a TypeDecl),
    Type(&'a Type),
    FieldList(&'a FieldList),
    Variant(&'a Variant),
    CaseLabels(&'a RangeItem),
    FormalTypeList(&'a FormalTypeList),
    FormalTypeParam(&'a FormalTypeParam),
    Expr(&'a Expr),
    Element(&'a RangeItem),
}

impl CompilationUnit {
    /// The root node. Its single child, field `module`, is the module itself.
    pub fn as_node(&self) -> NodeRef<'_> {
        NodeRef::CompilationUnit(self)
    }

    fn module_node(&self) -> NodeRef<'_> {
        match self {
            CompilationUnit::Definition(m) => NodeRef::DefinitionModule(m),
            CompilationUnit::Program(m) => NodeRef::ProgramModule(m),
        }
    }
}

impl<'a> NodeRef<'a> {
    pub fn kind(&self) -> NodeKind {
        match *self {
            NodeRef::CompilationUnit(_) => NodeKind::CompilationUnit,
            NodeRef::DefinitionModule(_) => NodeKind::DefinitionModule,
            NodeRef::ProgramModule(_) => NodeKind::ProgramModule,
            NodeRef::Block(_) => NodeKind::Block,
            NodeRef::Import(i) => match i.kind {
                ImportKind::Qualified { .. } => NodeKind::QualifiedImport,
                ImportKind::Unqualified { .. } => NodeKind::UnqualifiedImport,
            },
            NodeRef::Ident(_) => NodeKind::Ident,
            NodeRef::Qualident(_) => NodeKind::Qualident,
            NodeRef::IdentList(_) => NodeKind::IdentList,
            NodeRef::Declaration(d) => match d.kind {
                DeclKind::Const(_) => NodeKind::ConstSection,
                DeclKind::Type(_) => NodeKind::TypeSection,
            },
            NodeRef::ConstDecl(_) => NodeKind::ConstDeclaration,
            NodeRef::TypeDecl(_) => NodeKind::TypeDeclaration,
            NodeRef::Type(t) => match t.kind {
                TypeKind::Named(_) => NodeKind::NamedType,
                TypeKind::Enumeration(_) => NodeKind::Enumeration,
                TypeKind::Subrange { .. } => NodeKind::Subrange,
                TypeKind::Array { .. } => NodeKind::ArrayType,
                TypeKind::Record(_) => NodeKind::RecordType,
                TypeKind::Set(_) => NodeKind::SetType,
                TypeKind::Pointer(_) => NodeKind::PointerType,
                TypeKind::Procedure(_) => NodeKind::ProcedureType,
            },
            NodeRef::FieldList(f) => match f.kind {
                FieldListKind::Fields { .. } => NodeKind::FieldList,
                FieldListKind::Variant(_) => NodeKind::VariantFieldList,
            },
            NodeRef::Variant(_) => NodeKind::Variant,
            NodeRef::CaseLabels(_) => NodeKind::CaseLabels,
            NodeRef::FormalTypeList(_) => NodeKind::FormalTypeList,
            NodeRef::FormalTypeParam(_) => NodeKind::FormalTypeParam,
            NodeRef::Expr(e) => match e.kind {
                ExprKind::Integer(_) => NodeKind::IntegerLiteral,
                ExprKind::Real(_) => NodeKind::RealLiteral,
                ExprKind::String(_) => NodeKind::StringLiteral,
                ExprKind::Designator(_) => NodeKind::Designator,
                ExprKind::Set { .. } => NodeKind::SetExpr,
                ExprKind::Not(_) => NodeKind::Not,
                ExprKind::Unary { .. } => NodeKind::Unary,
                ExprKind::Binary { .. } => NodeKind::Binary,
            },
            NodeRef::Element(_) => NodeKind::Element,
        }
    }

    pub fn span(&self) -> Span {
        match *self {
            NodeRef::CompilationUnit(u) => u.span(),
            NodeRef::DefinitionModule(m) => m.span,
            NodeRef::ProgramModule(m) => m.span,
            NodeRef::Block(b) => b.span,
            NodeRef::Import(i) => i.span,
            NodeRef::Ident(i) => i.span,
            NodeRef::Qualident(q) => q.span,
            NodeRef::IdentList(l) => l.span,
            NodeRef::Declaration(d) => d.span,
            NodeRef::ConstDecl(c) => c.span,
            NodeRef::TypeDecl(t) => t.span,
            NodeRef::Type(t) => t.span,
            NodeRef::FieldList(f) => f.span,
            NodeRef::Variant(v) => v.span,
            NodeRef::CaseLabels(r) | NodeRef::Element(r) => r.span,
            NodeRef::FormalTypeList(f) => f.span,
            NodeRef::FormalTypeParam(p) => p.span,
            NodeRef::Expr(e) => e.span,
        }
    }

    /// Child nodes in source order.
    pub fn children(&self) -> Vec<NodeRef<'a>> {
        let mut out = Vec::new();
        match *self {
            NodeRef::CompilationUnit(u) => out.push(u.module_node()),
            NodeRef::DefinitionModule(m) => {
                out.push(NodeRef::Ident(&m.name));
                out.extend(m.imports.iter().map(NodeRef::Import));
                out.extend(m.decls.iter().map(NodeRef::Declaration));
                out.push(NodeRef::Ident(&m.footer));
            }
            NodeRef::ProgramModule(m) => {
                out.push(NodeRef::Ident(&m.name));
                out.extend(m.imports.iter().map(NodeRef::Import));
                out.push(NodeRef::Block(&m.block));
                out.push(NodeRef::Ident(&m.footer));
            }
            NodeRef::Block(b) => out.extend(b.decls.iter().map(NodeRef::Declaration)),
            NodeRef::Import(i) => match &i.kind {
                ImportKind::Qualified { modules } => out.push(NodeRef::IdentList(modules)),
                ImportKind::Unqualified { module, names } => {
                    out.push(NodeRef::Ident(module));
                    out.push(NodeRef::IdentList(names));
                }
            },
            NodeRef::Ident(_) => {}
            NodeRef::Qualident(q) => out.extend(q.parts().iter().map(NodeRef::Ident)),
            NodeRef::IdentList(l) => out.extend(l.idents().iter().map(NodeRef::Ident)),
            NodeRef::Declaration(d) => match &d.kind {
                DeclKind::Const(items) => out.extend(items.iter().map(NodeRef::ConstDecl)),
                DeclKind::Type(items) => out.extend(items.iter().map(NodeRef::TypeDecl)),
            },
            NodeRef::ConstDecl(c) => {
                out.push(NodeRef::Ident(&c.name));
                out.push(NodeRef::Expr(&c.value));
            }
            NodeRef::TypeDecl(t) => {
                out.push(NodeRef::Ident(&t.name));
                out.push(NodeRef::Type(&t.ty));
            }
            NodeRef::Type(t) => match &t.kind {
                TypeKind::Named(q) => out.push(NodeRef::Qualident(q)),
                TypeKind::Enumeration(ids) => out.push(NodeRef::IdentList(ids)),
                TypeKind::Subrange { from, to } => {
                    out.push(NodeRef::Expr(from));
                    out.push(NodeRef::Expr(to));
                }
                TypeKind::Array { index, element } => {
                    out.push(NodeRef::Type(index));
                    out.push(NodeRef::Type(element));
                }
                TypeKind::Record(fields) => out.extend(fields.iter().map(NodeRef::FieldList)),
                TypeKind::Set(base) => out.push(NodeRef::Type(base)),
                TypeKind::Pointer(target) => out.push(NodeRef::Type(target)),
                TypeKind::Procedure(params) => {
                    out.extend(params.iter().map(NodeRef::FormalTypeList));
                }
            },
            NodeRef::FieldList(f) => match &f.kind {
                FieldListKind::Fields { names, ty } => {
                    out.push(NodeRef::IdentList(names));
                    out.push(NodeRef::Type(ty));
                }
                FieldListKind::Variant(part) => {
                    out.extend(part.tag.iter().map(NodeRef::Ident));
                    out.push(NodeRef::Qualident(&part.tag_type));
                    out.extend(part.variants.iter().map(NodeRef::Variant));
                    for fields in &part.else_fields {
                        out.extend(fields.iter().map(NodeRef::FieldList));
                    }
                }
            },
            NodeRef::Variant(v) => {
                out.extend(v.labels.iter().map(NodeRef::CaseLabels));
                out.extend(v.fields.iter().map(NodeRef::FieldList));
            }
            NodeRef::CaseLabels(r) | NodeRef::Element(r) => {
                out.push(NodeRef::Expr(&r.lhs));
                out.extend(r.rhs.iter().map(NodeRef::Expr));
            }
            NodeRef::FormalTypeList(f) => {
                out.extend(f.params.iter().map(NodeRef::FormalTypeParam));
                out.extend(f.result.iter().map(NodeRef::Qualident));
            }
            NodeRef::FormalTypeParam(p) => out.push(NodeRef::Qualident(&p.ty)),
            NodeRef::Expr(e) => match &e.kind {
                ExprKind::Integer(_) | ExprKind::Real(_) | ExprKind::String(_) => {}
                ExprKind::Designator(q) => out.push(NodeRef::Qualident(q)),
                ExprKind::Set { base, elements } => {
                    out.extend(base.iter().map(NodeRef::Qualident));
                    out.extend(elements.iter().map(NodeRef::Element));
                }
                ExprKind::Not(operand) | ExprKind::Unary { operand, .. } => {
                    out.push(NodeRef::Expr(operand));
                }
                ExprKind::Binary { lhs, rhs, .. } => {
                    out.push(NodeRef::Expr(lhs));
                    out.push(NodeRef::Expr(rhs));
                }
            },
        }
        out
    }

    /// Look up a child by its grammar field name.
    pub fn field(&self, name: &str) -> Option<NodeRef<'a>> {
        match (*self, name) {
            (NodeRef::CompilationUnit(u), "module") => Some(u.module_node()),
            (NodeRef::DefinitionModule(m), "modulename") => Some(NodeRef::Ident(&m.name)),
            (NodeRef::DefinitionModule(m), "footer") => Some(NodeRef::Ident(&m.footer)),
            (NodeRef::ProgramModule(m), "modulename") => Some(NodeRef::Ident(&m.name)),
            (NodeRef::ProgramModule(m), "footer") => Some(NodeRef::Ident(&m.footer)),
            (NodeRef::ProgramModule(m), "block") => Some(NodeRef::Block(&m.block)),

            (NodeRef::Import(i), _) => match (&i.kind, name) {
                (ImportKind::Qualified { modules }, "impmodules") => Some(NodeRef::IdentList(modules)),
                (ImportKind::Unqualified { module, .. }, "impmodule") => Some(NodeRef::Ident(module)),
                (ImportKind::Unqualified { names, .. }, "idlist") => Some(NodeRef::IdentList(names)),
                _ => None,
            },

            (NodeRef::ConstDecl(c), "const_id") => Some(NodeRef::Ident(&c.name)),
            (NodeRef::ConstDecl(c), "value") => Some(NodeRef::Expr(&c.value)),
            (NodeRef::TypeDecl(t), "name") => Some(NodeRef::Ident(&t.name)),
            (NodeRef::TypeDecl(t), "type") => Some(NodeRef::Type(&t.ty)),

            (NodeRef::Type(t), _) => match (&t.kind, name) {
                (TypeKind::Named(q), "qualident") => Some(NodeRef::Qualident(q)),
                (TypeKind::Enumeration(ids), "idlist") => Some(NodeRef::IdentList(ids)),
                (TypeKind::Subrange { from, .. }, "from") => Some(NodeRef::Expr(from)),
                (TypeKind::Subrange { to, .. }, "to") => Some(NodeRef::Expr(to)),
                (TypeKind::Array { index, .. }, "index") => Some(NodeRef::Type(index)),
                (TypeKind::Array { element, .. }, "element") => Some(NodeRef::Type(element)),
                (TypeKind::Set(base), "base") => Some(NodeRef::Type(base)),
                (TypeKind::Pointer(target), "target") => Some(NodeRef::Type(target)),
                (TypeKind::Procedure(params), "params") => params.as_ref().map(NodeRef::FormalTypeList),
                _ => None,
            },

            (NodeRef::FieldList(f), _) => match (&f.kind, name) {
                (FieldListKind::Fields { names, .. }, "idlist") => Some(NodeRef::IdentList(names)),
                (FieldListKind::Fields { ty, .. }, "type") => Some(NodeRef::Type(ty)),
                (FieldListKind::Variant(part), "tag") => part.tag.as_ref().map(NodeRef::Ident),
                (FieldListKind::Variant(part), "tag_type") => Some(NodeRef::Qualident(&part.tag_type)),
                _ => None,
            },

            (NodeRef::CaseLabels(r) | NodeRef::Element(r), "lhs") => Some(NodeRef::Expr(&r.lhs)),
            (NodeRef::CaseLabels(r) | NodeRef::Element(r), "rhs") => r.rhs.as_ref().map(NodeRef::Expr),

            (NodeRef::FormalTypeList(f), "result") => f.result.as_ref().map(NodeRef::Qualident),
            (NodeRef::FormalTypeParam(p), "type") => Some(NodeRef::Qualident(&p.ty)),

            (NodeRef::Expr(e), _) => match (&e.kind, name) {
                (ExprKind::Designator(q), "qualident") => Some(NodeRef::Qualident(q)),
                (ExprKind::Set { base, .. }, "base") => base.as_ref().map(NodeRef::Qualident),
                (ExprKind::Not(operand), "operand") => Some(NodeRef::Expr(operand)),
                (ExprKind::Unary { operand, .. }, "operand") => Some(NodeRef::Expr(operand)),
                (ExprKind::Binary { lhs, .. }, "lhs") => Some(NodeRef::Expr(lhs)),
                (ExprKind::Binary { rhs, .. }, "rhs") => Some(NodeRef::Expr(rhs)),
                _ => None,
            },

            _ => None,
        }
    }

    /// Identifier text, for `Ident` nodes.
    pub fn ident(&self) -> Option<&'a str> {
        match *self {
            NodeRef::Ident(i) => Some(&i.name),
            _ => None,
        }
    }

    /// Pre-order traversal starting at (and including) this node.
    pub fn walk(self) -> Walk<'a> {
        Walk { stack: vec![self] }
    }
}

/// Pre-order iterator returned by [`NodeRef::walk`].
pub struct Walk<'a> {
    stack: Vec<NodeRef<'a>>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().into_iter().rev());
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{IntLiteral, Radix};
    use crate::NodeId;

    fn ident(name: &str, start: usize) -> Ident {
        Ident::new(name, Span::new(start, start + name.len()))
    }

    fn int(text: &str, start: usize) -> Expr {
        Expr {
            id: NodeId::DUMMY,
            kind: ExprKind::Integer(IntLiteral::new(Radix::Decimal, text)),
            span: Span::new(start, start + text.len()),
        }
    }

    #[test]
    fn subrange_fields() {
        // [1..10]
        let ty = Type {
            id: NodeId::DUMMY,
            kind: TypeKind::Subrange { from: Box::new(int("1", 1)), to: Box::new(int("10", 4)) },
            span: Span::new(0, 7),
        };
        let node = NodeRef::Type(&ty);
        assert_eq!(node.kind(), NodeKind::Subrange);
        assert_eq!(node.field("from").map(|n| n.span()), Some(Span::new(1, 2)));
        assert_eq!(node.field("to").map(|n| n.span()), Some(Span::new(4, 6)));
        assert!(node.field("lhs").is_none());
        assert_eq!(node.children().len(), 2);
    }

    #[test]
    fn unqualified_import_fields() {
        // FROM InOut IMPORT Write, WriteLn;
        let mut names = IdentList::new(ident("Write", 18));
        names.push(ident("WriteLn", 25));
        let import = Import {
            kind: ImportKind::Unqualified { module: ident("InOut", 5), names },
            span: Span::new(0, 33),
        };
        let node = NodeRef::Import(&import);
        assert_eq!(node.kind(), NodeKind::UnqualifiedImport);
        assert_eq!(node.field("impmodule").and_then(|n| n.ident()), Some("InOut"));
        let idlist = node.field("idlist").unwrap();
        let names: Vec<_> = idlist.children().iter().filter_map(|n| n.ident()).collect();
        assert_eq!(names, vec!["Write", "WriteLn"]);
        assert!(node.field("impmodules").is_none());
    }

    #[test]
    fn walk_is_preorder() {
        // a + b
        let expr = Expr {
            id: NodeId::DUMMY,
            kind: ExprKind::Binary {
                op: crate::expr::BinOp::Add,
                op_span: Span::new(2, 3),
                lhs: Box::new(Expr {
                    id: NodeId::DUMMY,
                    kind: ExprKind::Designator(Qualident::new(ident("a", 0))),
                    span: Span::new(0, 1),
                }),
                rhs: Box::new(Expr {
                    id: NodeId::DUMMY,
                    kind: ExprKind::Designator(Qualident::new(ident("b", 4))),
                    span: Span::new(4, 5),
                }),
            },
            span: Span::new(0, 5),
        };
        let kinds: Vec<_> = NodeRef::Expr(&expr).walk().map(|n| n.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                NodeKind::Binary,
                NodeKind::Designator,
                NodeKind::Qualident,
                NodeKind::Ident,
                NodeKind::Designator,
                NodeKind::Qualident,
                NodeKind::Ident,
            ]
        );
    }
}
