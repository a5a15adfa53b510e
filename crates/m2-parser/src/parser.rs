// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The parser implementation using Pratt parsing for expressions.

use m2_ast::decl::{ConstDecl, DeclKind, Declaration, TypeDecl};
use m2_ast::expr::{BinOp, Expr, ExprKind, Precedence, RangeItem, Sign};
use m2_ast::module::{Block, CompilationUnit, DefinitionModule, Import, ImportKind, ProgramModule};
use m2_ast::token::{Token, TokenKind};
use m2_ast::types::{FieldList, FieldListKind, FormalTypeList, FormalTypeParam, Type, TypeKind, Variant, VariantPart};
use m2_ast::{Ident, IdentList, NodeId, Qualident, Span};

use crate::error::{Error, ParseError, SyntaxErrorKind};
use crate::hints;
use crate::validate::{self, SemanticWarning};

/// Maximum number of errors to collect before stopping.
pub const MAX_ERRORS: usize = 20;

/// A sign is only allowed where an additive operand may start.
const SIGN_BP: u8 = 3;
/// Binding power of one term: multiplicative operators still apply.
const TERM_BP: u8 = 5;

/// How far the parser goes after an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Stop once this many errors have been collected.
    pub max_errors: usize,
    /// Resynchronize after an error and keep parsing.
    pub recover: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { max_errors: MAX_ERRORS, recover: true }
    }
}

impl ParseOptions {
    /// Stop at the first error.
    pub fn fail_fast() -> Self {
        Self { max_errors: 1, recover: false }
    }
}

/// The parser for Modula-2 compilation units.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    /// Collected errors during parsing
    errors: Vec<ParseError>,
    /// Counter for generating unique NodeIds
    next_node_id: u32,
    /// Constructs currently being parsed, innermost last
    context: Vec<&'static str>,
    options: ParseOptions,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self::with_options(tokens, ParseOptions::default())
    }

    pub fn with_options(mut tokens: Vec<Token>, options: ParseOptions) -> Self {
        if !matches!(tokens.last(), Some(t) if t.kind == TokenKind::Eof) {
            let (end, line, column) = tokens
                .last()
                .map(|t| (t.span.end, t.line, t.column))
                .unwrap_or((0, 1, 1));
            tokens.push(Token { kind: TokenKind::Eof, span: Span::new(end, end), line, column });
        }
        Self { tokens, pos: 0, errors: Vec::new(), next_node_id: 0, context: Vec::new(), options }
    }

    fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.next_node_id);
        self.next_node_id += 1;
        id
    }

    /// Record a recoverable error. Hands the error back when parsing should stop.
    fn record_error(&mut self, error: ParseError) -> Result<(), ParseError> {
        if !self.options.recover || self.errors.len() + 1 >= self.options.max_errors {
            return Err(error);
        }
        self.errors.push(error);
        Ok(())
    }

    /// Rewind to the start of a broken declaration or import and skip past it.
    ///
    /// Nesting is tracked so that a `;` inside a record or parameter list
    /// does not end the skip early.
    fn synchronize(&mut self, from: usize) {
        self.pos = from;
        self.advance();
        let mut depth = 0usize;

        while !self.at_end() {
            match self.current_kind() {
                TokenKind::Record | TokenKind::Case |
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => depth += 1,
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                    depth = depth.saturating_sub(1);
                }
                TokenKind::End if depth == 0 => return,
                TokenKind::End => depth -= 1,
                TokenKind::Semi if depth == 0 => {
                    self.advance();
                    return;
                }
                TokenKind::Const | TokenKind::Type | TokenKind::Var |
                TokenKind::Begin | TokenKind::Import | TokenKind::From if depth == 0 => return,
                _ => {}
            }
            self.advance();
        }
    }

    /// Skip a broken import up to and including its `;`.
    ///
    /// `IMPORT` and `FROM` do not end the skip, since a `FROM` import
    /// contains both.
    fn skip_import(&mut self, from: usize) {
        self.pos = from;
        self.advance();

        while !self.at_end() {
            match self.current_kind() {
                TokenKind::Semi => {
                    self.advance();
                    return;
                }
                TokenKind::Const | TokenKind::Type | TokenKind::Var | TokenKind::Procedure |
                TokenKind::Begin | TokenKind::End => return,
                _ => {}
            }
            self.advance();
        }
    }

    /// Does the current token start a declaration or a declaration section?
    fn at_declaration_start(&self) -> bool {
        match self.current_kind() {
            TokenKind::Ident(_) => matches!(self.peek(1), TokenKind::Eq),
            TokenKind::Const | TokenKind::Type | TokenKind::Var |
            TokenKind::Procedure | TokenKind::Begin => true,
            _ => false,
        }
    }

    // =========================================================================
    // Token Navigation
    // =========================================================================

    fn current(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn current_kind(&self) -> &TokenKind {
        &self.current().kind
    }

    fn peek(&self, n: usize) -> &TokenKind {
        self.tokens.get(self.pos + n).map(|t| &t.kind).unwrap_or(&TokenKind::Eof)
    }

    fn at_end(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Eof)
    }

    fn advance(&mut self) -> &Token {
        let taken = self.pos.min(self.tokens.len() - 1);
        if !self.at_end() {
            self.pos += 1;
        }
        &self.tokens[taken]
    }

    /// End offset of the last consumed token.
    fn prev_end(&self) -> usize {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map(|t| t.span.end)
            .unwrap_or(0)
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(self.current_kind()) == std::mem::discriminant(kind)
    }

    fn check_ident(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Ident(_))
    }

    fn match_token(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<&Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.expected(kind.display_name()))
        }
    }

    /// Expect the token that closes `construct`, which started at `open`.
    fn expect_closing(&mut self, kind: &TokenKind, construct: &'static str, open: &Token) -> Result<&Token, ParseError> {
        if self.check(kind) {
            return Ok(self.advance());
        }
        let error = self.error_here(SyntaxErrorKind::UnterminatedConstruct {
            construct,
            closer: kind.display_name(),
            opened_at: open.span,
            found: self.current_kind().display_name(),
        });
        let hint = format!("the {} starts at line {}, column {}", construct, open.line, open.column);
        Err(error.with_hint(Some(hint)))
    }

    fn expect_ident(&mut self) -> Result<Ident, ParseError> {
        if let TokenKind::Ident(name) = self.current_kind() {
            let ident = Ident::new(name.clone(), self.current().span);
            self.advance();
            Ok(ident)
        } else {
            Err(self.expected("a name"))
        }
    }

    /// Is the parser looking at `END name .` followed by end of file?
    fn at_module_footer(&self) -> bool {
        self.check(&TokenKind::End)
            && matches!(self.peek(1), TokenKind::Ident(_))
            && matches!(self.peek(2), TokenKind::Dot)
            && matches!(self.peek(3), TokenKind::Eof)
    }

    // =========================================================================
    // Errors
    // =========================================================================

    fn construct(&self) -> &'static str {
        self.context.last().copied().unwrap_or("compilation unit")
    }

    /// Run `parse` with `construct` as the innermost construct for error reports.
    fn within<T>(
        &mut self,
        construct: &'static str,
        parse: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        self.context.push(construct);
        let result = parse(self);
        self.context.pop();
        result
    }

    fn error_at(&self, kind: SyntaxErrorKind, token: &Token) -> ParseError {
        ParseError {
            kind,
            span: token.span,
            line: token.line,
            column: token.column,
            construct: self.construct(),
            hint: None,
        }
    }

    fn error_here(&self, kind: SyntaxErrorKind) -> ParseError {
        self.error_at(kind, self.current())
    }

    fn expected(&self, expected: &str) -> ParseError {
        let found = self.current_kind();
        self.error_here(SyntaxErrorKind::Expected {
            expected: expected.to_string(),
            found: found.display_name(),
        })
        .with_hint(hints::for_expected(expected, found))
    }

    fn not_supported(&self, feature: &'static str) -> ParseError {
        self.error_here(SyntaxErrorKind::NotSupported { feature })
            .with_hint(Some("only CONST and TYPE declarations are parsed"))
    }

    /// Running into end of file inside a module means its closing `END name.` is missing.
    fn footer_error(&self, error: ParseError, module: &Ident) -> ParseError {
        if !self.at_end() || matches!(error.kind, SyntaxErrorKind::UnterminatedConstruct { .. }) {
            return error;
        }
        self.error_here(SyntaxErrorKind::MissingFooter { module: module.name.clone() })
            .with_hint(Some(format!("add 'END {}.' after the last declaration", module.name)))
    }

    // =========================================================================
    // Compilation Units
    // =========================================================================

    /// Parse a whole compilation unit.
    ///
    /// The tree is returned only if no error was found. Module name
    /// mismatches are reported as warnings and do not suppress the tree.
    pub fn parse(&mut self) -> ParseResult {
        let unit = match self.parse_compilation_unit() {
            Ok(unit) => Some(unit),
            Err(e) => {
                self.errors.push(e);
                None
            }
        };
        let unit = unit.filter(|_| self.errors.is_empty());
        let warnings = unit.as_ref().map(validate::check_module_names).unwrap_or_default();

        ParseResult {
            unit,
            errors: std::mem::take(&mut self.errors).into_iter().map(Error::Syntax).collect(),
            warnings,
        }
    }

    fn parse_compilation_unit(&mut self) -> Result<CompilationUnit, ParseError> {
        let unit = match self.current_kind() {
            TokenKind::Definition => CompilationUnit::Definition(self.parse_definition_module()?),
            TokenKind::Implementation | TokenKind::Module => {
                CompilationUnit::Program(self.parse_program_module()?)
            }
            _ => return Err(self.expected("'DEFINITION', 'IMPLEMENTATION' or 'MODULE'")),
        };
        if !self.at_end() {
            return Err(self.expected("end of file"));
        }
        Ok(unit)
    }

    fn parse_definition_module(&mut self) -> Result<DefinitionModule, ParseError> {
        let start = self.current().span.start;
        let name = self.within("module header", |p| {
            p.expect(&TokenKind::Definition)?;
            p.expect(&TokenKind::Module)?;
            let name = p.expect_ident()?;
            p.expect(&TokenKind::Semi)?;
            Ok(name)
        })?;

        let imports = self.parse_imports().map_err(|e| self.footer_error(e, &name))?;
        let decls = self.parse_declarations(true).map_err(|e| self.footer_error(e, &name))?;
        let footer = self.parse_footer(&name)?;

        Ok(DefinitionModule { name, imports, decls, footer, span: Span::new(start, self.prev_end()) })
    }

    fn parse_program_module(&mut self) -> Result<ProgramModule, ParseError> {
        let start = self.current().span.start;
        let (implementation, name) = self.within("module header", |p| {
            let implementation = p.match_token(&TokenKind::Implementation);
            p.expect(&TokenKind::Module)?;
            let name = p.expect_ident()?;
            p.expect(&TokenKind::Semi)?;
            Ok((implementation, name))
        })?;

        let imports = self.parse_imports().map_err(|e| self.footer_error(e, &name))?;
        let block = self.parse_block().map_err(|e| self.footer_error(e, &name))?;
        let footer = self.parse_footer(&name)?;

        Ok(ProgramModule {
            implementation,
            name,
            imports,
            block,
            footer,
            span: Span::new(start, self.prev_end()),
        })
    }

    /// `END name .`
    fn parse_footer(&mut self, module: &Ident) -> Result<Ident, ParseError> {
        self.within("module footer", |p| {
            p.expect(&TokenKind::End)?;
            let footer = p.expect_ident()?;
            p.expect(&TokenKind::Dot)?;
            Ok(footer)
        })
        .map_err(|e| self.footer_error(e, module))
    }

    /// Declarations followed by an optional, empty `BEGIN`.
    fn parse_block(&mut self) -> Result<Block, ParseError> {
        let start = self.current().span.start;
        let decls = self.parse_declarations(false)?;

        let body = if self.check(&TokenKind::Begin) {
            let span = self.advance().span;
            if !self.check(&TokenKind::End) {
                let error = self
                    .error_here(SyntaxErrorKind::NotSupported { feature: "statement sequences" })
                    .with_hint(Some("only declarations are parsed; leave the module body empty"));
                self.record_error(error)?;
                while !self.at_end() && !self.at_module_footer() {
                    self.advance();
                }
            }
            Some(span)
        } else {
            None
        };

        Ok(Block { decls, body, span: Span::new(start, self.prev_end().max(start)) })
    }

    // =========================================================================
    // Imports
    // =========================================================================

    fn parse_imports(&mut self) -> Result<Vec<Import>, ParseError> {
        let mut imports = Vec::new();

        while matches!(self.current_kind(), TokenKind::Import | TokenKind::From) {
            let from = self.pos;
            match self.within("import", Self::parse_import) {
                Ok(import) => imports.push(import),
                Err(e) => {
                    if self.at_end() {
                        return Err(e);
                    }
                    self.record_error(e)?;
                    self.skip_import(from);
                }
            }
        }

        Ok(imports)
    }

    fn parse_import(&mut self) -> Result<Import, ParseError> {
        let start = self.current().span.start;

        let kind = if self.match_token(&TokenKind::From) {
            let module = self.expect_ident()?;
            self.expect(&TokenKind::Import)?;
            let names = self.parse_ident_list()?;
            ImportKind::Unqualified { module, names }
        } else {
            self.expect(&TokenKind::Import)?;
            ImportKind::Qualified { modules: self.parse_ident_list()? }
        };
        self.expect(&TokenKind::Semi)?;

        Ok(Import { kind, span: Span::new(start, self.prev_end()) })
    }

    // =========================================================================
    // Names
    // =========================================================================

    fn parse_ident_list(&mut self) -> Result<IdentList, ParseError> {
        let mut list = IdentList::new(self.expect_ident()?);
        while self.match_token(&TokenKind::Comma) {
            list.push(self.expect_ident()?);
        }
        Ok(list)
    }

    fn parse_qualident(&mut self) -> Result<Qualident, ParseError> {
        let mut name = Qualident::new(self.expect_ident()?);
        while self.check(&TokenKind::Dot) && matches!(self.peek(1), TokenKind::Ident(_)) {
            self.advance();
            name.push(self.expect_ident()?);
        }
        Ok(name)
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    /// Declaration sections up to `BEGIN` or `END`.
    ///
    /// Variable and procedure declarations are reported and skipped.
    fn parse_declarations(&mut self, in_definition: bool) -> Result<Vec<Declaration>, ParseError> {
        let mut decls = Vec::new();

        loop {
            let start = self.current().span.start;
            let kind = match self.current_kind() {
                TokenKind::Const => {
                    DeclKind::Const(self.parse_section("constant declaration", Self::parse_const_decl)?)
                }
                TokenKind::Type => {
                    DeclKind::Type(self.parse_section("type declaration", Self::parse_type_decl)?)
                }
                TokenKind::Var => {
                    let error = self.not_supported("variable declarations");
                    self.record_error(error)?;
                    self.skip_variable_section();
                    continue;
                }
                TokenKind::Procedure => {
                    let error = self.not_supported("procedure declarations");
                    self.record_error(error)?;
                    self.skip_procedure(in_definition);
                    continue;
                }
                _ => return Ok(decls),
            };
            decls.push(Declaration { id: self.next_id(), kind, span: Span::new(start, self.prev_end()) });
        }
    }

    /// `CONST` or `TYPE` followed by any number of `name = ... ;` items.
    fn parse_section<T>(
        &mut self,
        construct: &'static str,
        parse_item: fn(&mut Self) -> Result<T, ParseError>,
    ) -> Result<Vec<T>, ParseError> {
        self.advance();
        let mut items = Vec::new();

        while self.check_ident() {
            let from = self.pos;
            match self.within(construct, parse_item) {
                Ok(item) => items.push(item),
                Err(e) => {
                    if self.at_end() {
                        return Err(e);
                    }
                    self.record_error(e)?;
                    // An unclosed record stops right before the next declaration
                    if self.pos == from || !self.at_declaration_start() {
                        self.synchronize(from);
                    }
                }
            }
        }

        Ok(items)
    }

    fn parse_const_decl(&mut self) -> Result<ConstDecl, ParseError> {
        let name = self.expect_ident()?;
        self.expect(&TokenKind::Eq)?;
        let value = self.parse_expr()?;
        self.expect(&TokenKind::Semi)?;
        let span = name.span.to(value.span);
        Ok(ConstDecl { name, value, span })
    }

    fn parse_type_decl(&mut self) -> Result<TypeDecl, ParseError> {
        let name = self.expect_ident()?;
        self.expect(&TokenKind::Eq)?;
        let ty = self.parse_type()?;
        self.expect(&TokenKind::Semi)?;
        let span = name.span.to(ty.span);
        Ok(TypeDecl { name, ty, span })
    }

    /// Skip a `VAR` section without building nodes.
    fn skip_variable_section(&mut self) {
        self.advance();
        let mut depth = 0usize;

        while !self.at_end() {
            match self.current_kind() {
                TokenKind::Record | TokenKind::Case |
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => depth += 1,
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                    depth = depth.saturating_sub(1);
                }
                TokenKind::End if depth == 0 => return,
                TokenKind::End => depth -= 1,
                TokenKind::Const | TokenKind::Type | TokenKind::Var | TokenKind::Begin => return,
                // A procedure declaration, not a procedure type
                TokenKind::Procedure if matches!(self.peek(1), TokenKind::Ident(_)) => return,
                _ => {}
            }
            self.advance();
        }
    }

    /// Skip a procedure heading, and its body unless it is only a heading.
    fn skip_procedure(&mut self, heading_only: bool) {
        self.advance();
        let name = match self.current_kind() {
            TokenKind::Ident(name) => Some(name.clone()),
            _ => None,
        };

        let mut depth = 0usize;
        while !self.at_end() {
            match self.current_kind() {
                TokenKind::LParen => depth += 1,
                TokenKind::RParen => depth = depth.saturating_sub(1),
                TokenKind::Semi if depth == 0 => {
                    self.advance();
                    break;
                }
                _ => {}
            }
            self.advance();
        }
        if heading_only {
            return;
        }

        // The body ends with `END name ;`
        while !self.at_end() && !self.at_module_footer() {
            let closes = self.check(&TokenKind::End)
                && matches!((self.peek(1), &name), (TokenKind::Ident(n), Some(name)) if n == name)
                && matches!(self.peek(2), TokenKind::Semi);
            if closes {
                self.advance();
                self.advance();
                self.advance();
                return;
            }
            self.advance();
        }
    }

    // =========================================================================
    // Types
    // =========================================================================

    /// Parse a type: a simple type, or an array, record, set, pointer or procedure type.
    pub fn parse_type(&mut self) -> Result<Type, ParseError> {
        match self.current_kind() {
            TokenKind::Array => self.within("array type", Self::parse_array_type),
            TokenKind::Record => self.within("record type", Self::parse_record_type),
            TokenKind::Set => self.within("set type", Self::parse_set_type),
            TokenKind::Pointer => self.within("pointer type", Self::parse_pointer_type),
            TokenKind::Procedure => self.within("procedure type", Self::parse_procedure_type),
            _ => self.parse_simple_type(),
        }
    }

    /// Named type, enumeration or subrange.
    fn parse_simple_type(&mut self) -> Result<Type, ParseError> {
        let start = self.current().span.start;

        let kind = match self.current_kind() {
            TokenKind::Ident(_) => TypeKind::Named(self.parse_qualident()?),
            TokenKind::LParen => self.within("enumeration", |p| {
                let open = p.advance().clone();
                let names = p.parse_ident_list()?;
                p.expect_closing(&TokenKind::RParen, "enumeration", &open)?;
                Ok(TypeKind::Enumeration(names))
            })?,
            TokenKind::LBracket => self.within("subrange type", |p| {
                let open = p.advance().clone();
                let from = p.parse_expr()?;
                p.expect(&TokenKind::DotDot)?;
                let to = p.parse_expr()?;
                p.expect_closing(&TokenKind::RBracket, "subrange type", &open)?;
                Ok(TypeKind::Subrange { from: Box::new(from), to: Box::new(to) })
            })?,
            _ => return Err(self.type_error()),
        };

        Ok(Type { id: self.next_id(), kind, span: Span::new(start, self.prev_end()) })
    }

    fn type_error(&self) -> ParseError {
        let found = self.current_kind();
        self.error_here(SyntaxErrorKind::ExpectedType { found: found.display_name() })
            .with_hint(hints::for_type(found))
    }

    /// `ARRAY a, b OF t` is read as `ARRAY a OF ARRAY b OF t`.
    fn parse_array_type(&mut self) -> Result<Type, ParseError> {
        let start = self.current().span.start;
        self.expect(&TokenKind::Array)?;

        let mut indexes = vec![self.parse_simple_type()?];
        while self.match_token(&TokenKind::Comma) {
            indexes.push(self.parse_simple_type()?);
        }
        self.expect(&TokenKind::Of)?;
        let mut ty = self.parse_type()?;

        for (i, index) in indexes.into_iter().enumerate().rev() {
            let from = if i == 0 { start } else { index.span.start };
            let span = Span::new(from, ty.span.end);
            ty = Type {
                id: self.next_id(),
                kind: TypeKind::Array { index: Box::new(index), element: Box::new(ty) },
                span,
            };
        }
        Ok(ty)
    }

    fn parse_record_type(&mut self) -> Result<Type, ParseError> {
        let open = self.expect(&TokenKind::Record)?.clone();
        let fields = self.parse_field_list_sequence()?;
        self.expect_closing(&TokenKind::End, "record type", &open)?;

        Ok(Type {
            id: self.next_id(),
            kind: TypeKind::Record(fields),
            span: Span::new(open.span.start, self.prev_end()),
        })
    }

    /// `fieldList {";" fieldList}` with at most one trailing `;`.
    ///
    /// A declaration after the `;` means the enclosing `RECORD` or `CASE`
    /// was never closed; the caller reports it against the opening token.
    fn parse_field_list_sequence(&mut self) -> Result<Vec<FieldList>, ParseError> {
        let mut fields = vec![self.parse_field_list()?];
        while self.match_token(&TokenKind::Semi) {
            if matches!(self.current_kind(), TokenKind::End | TokenKind::Pipe | TokenKind::Else | TokenKind::Eof)
                || self.at_declaration_start()
            {
                break;
            }
            fields.push(self.parse_field_list()?);
        }
        Ok(fields)
    }

    fn parse_field_list(&mut self) -> Result<FieldList, ParseError> {
        if self.check(&TokenKind::Case) {
            return self.within("variant part", Self::parse_variant_part);
        }

        let names = self.parse_ident_list()?;
        self.expect(&TokenKind::Colon)?;
        let ty = self.parse_type()?;
        let span = names.span.to(ty.span);
        Ok(FieldList { kind: FieldListKind::Fields { names, ty }, span })
    }

    /// `CASE [tag] : T OF variant {| variant} [ELSE fields] END`.
    ///
    /// `CASE T OF` without a colon is also accepted, with no tag name.
    fn parse_variant_part(&mut self) -> Result<FieldList, ParseError> {
        let open = self.expect(&TokenKind::Case)?.clone();

        let (tag, tag_type) = if self.match_token(&TokenKind::Colon) {
            (None, self.parse_qualident()?)
        } else {
            let first_token = self.current().clone();
            let first = self.parse_qualident()?;
            if self.match_token(&TokenKind::Colon) {
                if first.is_qualified() {
                    let error = self.error_at(
                        SyntaxErrorKind::Expected { expected: "a tag name".to_string(), found: "a qualified name" },
                        &first_token,
                    );
                    return Err(error.with_hint(Some("the tag field name cannot be qualified")));
                }
                let tag = first.name().clone();
                (Some(tag), self.parse_qualident()?)
            } else {
                (None, first)
            }
        };
        self.expect(&TokenKind::Of)?;

        let mut variants = vec![self.parse_variant()?];
        while self.match_token(&TokenKind::Pipe) {
            variants.push(self.parse_variant()?);
        }
        let else_fields = if self.match_token(&TokenKind::Else) {
            Some(self.parse_field_list_sequence()?)
        } else {
            None
        };
        self.expect_closing(&TokenKind::End, "variant part", &open)?;

        Ok(FieldList {
            kind: FieldListKind::Variant(VariantPart { tag, tag_type, variants, else_fields }),
            span: Span::new(open.span.start, self.prev_end()),
        })
    }

    fn parse_variant(&mut self) -> Result<Variant, ParseError> {
        let start = self.current().span.start;
        let mut labels = vec![self.parse_range_item()?];
        while self.match_token(&TokenKind::Comma) {
            labels.push(self.parse_range_item()?);
        }
        self.expect(&TokenKind::Colon)?;
        let fields = self.parse_field_list_sequence()?;
        Ok(Variant { labels, fields, span: Span::new(start, self.prev_end()) })
    }

    fn parse_set_type(&mut self) -> Result<Type, ParseError> {
        let start = self.expect(&TokenKind::Set)?.span.start;
        self.expect(&TokenKind::Of)?;
        let base = self.parse_simple_type()?;
        let span = Span::new(start, base.span.end);
        Ok(Type { id: self.next_id(), kind: TypeKind::Set(Box::new(base)), span })
    }

    fn parse_pointer_type(&mut self) -> Result<Type, ParseError> {
        let start = self.expect(&TokenKind::Pointer)?.span.start;
        self.expect(&TokenKind::To)?;
        let target = self.parse_type()?;
        let span = Span::new(start, target.span.end);
        Ok(Type { id: self.next_id(), kind: TypeKind::Pointer(Box::new(target)), span })
    }

    fn parse_procedure_type(&mut self) -> Result<Type, ParseError> {
        let start = self.expect(&TokenKind::Procedure)?.span.start;
        let params = if self.check(&TokenKind::LParen) {
            Some(self.within("formal parameter list", Self::parse_formal_type_list)?)
        } else {
            None
        };
        Ok(Type { id: self.next_id(), kind: TypeKind::Procedure(params), span: Span::new(start, self.prev_end()) })
    }

    /// `( [param {, param}] ) [: qualident]`
    fn parse_formal_type_list(&mut self) -> Result<FormalTypeList, ParseError> {
        let open = self.expect(&TokenKind::LParen)?.clone();

        let mut params = Vec::new();
        if !self.check(&TokenKind::RParen) {
            params.push(self.parse_formal_type_param()?);
            while self.match_token(&TokenKind::Comma) {
                params.push(self.parse_formal_type_param()?);
            }
        }
        self.expect_closing(&TokenKind::RParen, "formal parameter list", &open)?;

        let result = if self.match_token(&TokenKind::Colon) {
            Some(self.parse_qualident()?)
        } else {
            None
        };

        Ok(FormalTypeList { params, result, span: Span::new(open.span.start, self.prev_end()) })
    }

    fn parse_formal_type_param(&mut self) -> Result<FormalTypeParam, ParseError> {
        let start = self.current().span.start;
        let is_var = self.match_token(&TokenKind::Var);
        let open_array = self.match_token(&TokenKind::Array);
        if open_array {
            self.expect(&TokenKind::Of)?;
        }
        let ty = self.parse_qualident()?;
        Ok(FormalTypeParam { is_var, open_array, ty, span: Span::new(start, self.prev_end()) })
    }

    // =========================================================================
    // Expression Parsing (Pratt Parser)
    // =========================================================================

    pub fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        self.parse_expr_bp(0)
    }

    fn parse_expr_bp(&mut self, min_bp: u8) -> Result<Expr, ParseError> {
        let start = self.current().span.start;
        let signed = min_bp <= SIGN_BP && matches!(self.current_kind(), TokenKind::Plus | TokenKind::Minus);
        let mut lhs = if signed { self.parse_signed_term()? } else { self.parse_factor()? };
        let mut seen_relation = false;

        while let Some(op) = binop_for(self.current_kind()) {
            let (l_bp, r_bp) = infix_bp(op);
            if l_bp < min_bp {
                break;
            }
            if op.is_relation() {
                if seen_relation {
                    return Err(self
                        .error_here(SyntaxErrorKind::ChainedRelation)
                        .with_hint(Some("join comparisons with AND: (a < b) AND (b < c)")));
                }
                seen_relation = true;
            }

            let op_span = self.advance().span;
            let rhs = self.parse_expr_bp(r_bp)?;
            let end = rhs.span.end;
            lhs = Expr {
                id: self.next_id(),
                kind: ExprKind::Binary { op, op_span, lhs: Box::new(lhs), rhs: Box::new(rhs) },
                span: Span::new(start, end),
            };
        }

        Ok(lhs)
    }

    /// A leading sign covers the whole first term: `-a * b` is `-(a * b)`.
    fn parse_signed_term(&mut self) -> Result<Expr, ParseError> {
        let start = self.current().span.start;
        let op = if self.match_token(&TokenKind::Minus) {
            Sign::Minus
        } else {
            self.advance();
            Sign::Plus
        };
        let operand = self.parse_expr_bp(TERM_BP)?;
        let span = Span::new(start, operand.span.end);
        Ok(Expr { id: self.next_id(), kind: ExprKind::Unary { op, operand: Box::new(operand) }, span })
    }

    fn parse_factor(&mut self) -> Result<Expr, ParseError> {
        let start = self.current().span.start;

        let kind = match self.current_kind().clone() {
            TokenKind::Integer(literal) => {
                self.advance();
                ExprKind::Integer(literal)
            }
            TokenKind::Real(text) => {
                self.advance();
                ExprKind::Real(text)
            }
            TokenKind::String(text) => {
                self.advance();
                ExprKind::String(text)
            }
            TokenKind::Ident(_) => {
                let name = self.parse_qualident()?;
                if self.check(&TokenKind::LBrace) {
                    return self.parse_set(Some(name), start);
                }
                ExprKind::Designator(name)
            }
            TokenKind::LBrace => return self.parse_set(None, start),
            TokenKind::LParen => {
                let open = self.advance().clone();
                // No node of its own; the inner expression takes the parentheses' span
                return self.within("parenthesized expression", |p| {
                    let mut inner = p.parse_expr()?;
                    p.expect_closing(&TokenKind::RParen, "parenthesized expression", &open)?;
                    inner.span = Span::new(start, p.prev_end());
                    Ok(inner)
                });
            }
            TokenKind::Not => {
                self.advance();
                ExprKind::Not(Box::new(self.parse_factor()?))
            }
            found => {
                return Err(self
                    .error_here(SyntaxErrorKind::ExpectedExpression { found: found.display_name() })
                    .with_hint(hints::for_expression(&found)));
            }
        };

        Ok(Expr { id: self.next_id(), kind, span: Span::new(start, self.prev_end()) })
    }

    /// `[qualident] { [element {, element}] }`
    fn parse_set(&mut self, base: Option<Qualident>, start: usize) -> Result<Expr, ParseError> {
        self.within("set constructor", |p| {
            let open = p.expect(&TokenKind::LBrace)?.clone();
            let mut elements = Vec::new();
            if !p.check(&TokenKind::RBrace) {
                elements.push(p.parse_range_item()?);
                while p.match_token(&TokenKind::Comma) {
                    elements.push(p.parse_range_item()?);
                }
            }
            p.expect_closing(&TokenKind::RBrace, "set constructor", &open)?;

            Ok(Expr {
                id: p.next_id(),
                kind: ExprKind::Set { base, elements },
                span: Span::new(start, p.prev_end()),
            })
        })
    }

    /// `expr [.. expr]`, used by set elements and case labels.
    fn parse_range_item(&mut self) -> Result<RangeItem, ParseError> {
        let lhs = self.parse_expr()?;
        let rhs = if self.match_token(&TokenKind::DotDot) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        let span = lhs.span.to(rhs.as_ref().map_or(lhs.span, |r| r.span));
        Ok(RangeItem { lhs, rhs, span })
    }
}

fn binop_for(kind: &TokenKind) -> Option<BinOp> {
    Some(match kind {
        TokenKind::Plus => BinOp::Add,
        TokenKind::Minus => BinOp::Sub,
        TokenKind::Or => BinOp::Or,
        TokenKind::Star => BinOp::Mul,
        TokenKind::Slash => BinOp::RealDiv,
        TokenKind::Div => BinOp::Div,
        TokenKind::Mod => BinOp::Mod,
        TokenKind::And | TokenKind::Amp => BinOp::And,
        TokenKind::Eq => BinOp::Eq,
        TokenKind::Hash | TokenKind::LtGt => BinOp::Ne,
        TokenKind::Lt => BinOp::Lt,
        TokenKind::LtEq => BinOp::Le,
        TokenKind::Gt => BinOp::Gt,
        TokenKind::GtEq => BinOp::Ge,
        TokenKind::In => BinOp::In,
        _ => return None,
    })
}

/// Left and right binding power. Every level is left-associative.
fn infix_bp(op: BinOp) -> (u8, u8) {
    match op.precedence() {
        Precedence::Relational => (1, 2),
        Precedence::Additive => (3, 4),
        Precedence::Multiplicative => (5, 6),
    }
}

/// Result of parsing one compilation unit.
#[derive(Debug)]
pub struct ParseResult {
    /// The tree, present only when there were no errors.
    pub unit: Option<CompilationUnit>,
    pub errors: Vec<Error>,
    pub warnings: Vec<SemanticWarning>,
}

impl ParseResult {
    /// Returns true if parsing completed without errors.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_result(self) -> Result<CompilationUnit, Vec<Error>> {
        if !self.errors.is_empty() {
            return Err(self.errors);
        }
        self.unit.ok_or_else(Vec::new)
    }
}
