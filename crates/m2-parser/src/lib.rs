//! Parser for Modula-2 (PIM, 4th edition).
//!
//! Transforms source text into a parse tree of one compilation unit:
//! module headers, imports, constant and type declarations, and
//! expressions. Statements, variables and procedure bodies are
//! reported as not supported.

mod error;
mod hints;
mod parser;
pub mod validate;

pub use error::{Error, ParseError, SyntaxErrorKind};
pub use parser::{ParseOptions, ParseResult, Parser, MAX_ERRORS};
pub use validate::{SemanticWarning, WarningKind};

use m2_lexer::Lexer;

/// Lex and parse one compilation unit with default options.
pub fn parse(source: &str) -> ParseResult {
    parse_with(source, ParseOptions::default())
}

/// Lex and parse one compilation unit.
///
/// Lexical errors stop before parsing; all of them are reported.
pub fn parse_with(source: &str, options: ParseOptions) -> ParseResult {
    let mut lex_result = Lexer::new(source).tokenize();
    if !lex_result.is_ok() {
        lex_result.errors.truncate(options.max_errors.max(1));
        return ParseResult {
            unit: None,
            errors: lex_result.errors.into_iter().map(Error::Lex).collect(),
            warnings: Vec::new(),
        };
    }
    Parser::with_options(lex_result.tokens, options).parse()
}
