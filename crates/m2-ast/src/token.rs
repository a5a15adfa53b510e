// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Token definitions for the lexer.

use crate::Span;

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    /// 1-based line of the first byte.
    pub line: u32,
    /// 1-based byte column of the first byte.
    pub column: u32,
}

/// How an integer literal was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Radix {
    /// `255`
    Decimal,
    /// `377B`
    Octal,
    /// `101C`, an octal character code
    Char,
    /// `0FFH`
    Hex,
    /// `1D`, hex digits tagged as a double-length constant
    Double,
}

impl Radix {
    pub fn base(self) -> u32 {
        match self {
            Radix::Decimal => 10,
            Radix::Octal | Radix::Char => 8,
            Radix::Hex | Radix::Double => 16,
        }
    }
}

/// An integer literal: digits without the suffix letter, plus the form it was written in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntLiteral {
    pub radix: Radix,
    pub digits: String,
}

impl IntLiteral {
    pub fn new(radix: Radix, digits: impl Into<String>) -> Self {
        Self { radix, digits: digits.into() }
    }

    /// Numeric value, or `None` if it does not fit in 64 bits.
    pub fn value(&self) -> Option<u64> {
        u64::from_str_radix(&self.digits, self.radix.base()).ok()
    }
}

/// The kind of token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    Integer(IntLiteral),
    Real(String),
    String(String),

    // Identifier
    Ident(String),

    // Reserved words
    Module,
    Definition,
    Implementation,
    Import,
    From,
    Const,
    Type,
    Array,
    Record,
    Set,
    Pointer,
    Procedure,
    Case,
    Else,
    Of,
    To,
    In,
    Or,
    And,
    Div,
    Mod,
    Not,
    Var,
    Begin,
    End,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Amp,
    Eq,
    Hash,
    LtGt,
    Lt,
    LtEq,
    Gt,
    GtEq,
    DotDot,
    ColonEq,
    Dot,
    Pipe,

    // Delimiters
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Semi,
    Colon,

    // Special
    Eof,
}

/// Reserved words, checked by the lexer for every identifier-shaped word.
/// Matching is exact and case-sensitive.
pub const RESERVED_WORDS: &[(&str, TokenKind)] = &[
    ("MODULE", TokenKind::Module),
    ("DEFINITION", TokenKind::Definition),
    ("IMPLEMENTATION", TokenKind::Implementation),
    ("IMPORT", TokenKind::Import),
    ("FROM", TokenKind::From),
    ("CONST", TokenKind::Const),
    ("TYPE", TokenKind::Type),
    ("ARRAY", TokenKind::Array),
    ("RECORD", TokenKind::Record),
    ("SET", TokenKind::Set),
    ("POINTER", TokenKind::Pointer),
    ("PROCEDURE", TokenKind::Procedure),
    ("CASE", TokenKind::Case),
    ("ELSE", TokenKind::Else),
    ("OF", TokenKind::Of),
    ("TO", TokenKind::To),
    ("IN", TokenKind::In),
    ("OR", TokenKind::Or),
    ("AND", TokenKind::And),
    ("DIV", TokenKind::Div),
    ("MOD", TokenKind::Mod),
    ("NOT", TokenKind::Not),
    ("VAR", TokenKind::Var),
    ("BEGIN", TokenKind::Begin),
    ("END", TokenKind::End),
];

impl TokenKind {
    /// Returns the reserved-word token for `word`, if it is one.
    pub fn keyword(word: &str) -> Option<TokenKind> {
        RESERVED_WORDS
            .iter()
            .find(|(spelling, _)| *spelling == word)
            .map(|(_, kind)| kind.clone())
    }

    pub fn is_keyword(&self) -> bool {
        RESERVED_WORDS.iter().any(|(_, kind)| kind == self)
    }

    /// Returns a human-readable name for this token kind.
    pub fn display_name(&self) -> &'static str {
        match self {
            // Literals
            TokenKind::Integer(_) => "an integer",
            TokenKind::Real(_) => "a real number",
            TokenKind::String(_) => "a string",

            // Identifier
            TokenKind::Ident(_) => "a name",

            // Reserved words
            TokenKind::Module => "'MODULE'",
            TokenKind::Definition => "'DEFINITION'",
            TokenKind::Implementation => "'IMPLEMENTATION'",
            TokenKind::Import => "'IMPORT'",
            TokenKind::From => "'FROM'",
            TokenKind::Const => "'CONST'",
            TokenKind::Type => "'TYPE'",
            TokenKind::Array => "'ARRAY'",
            TokenKind::Record => "'RECORD'",
            TokenKind::Set => "'SET'",
            TokenKind::Pointer => "'POINTER'",
            TokenKind::Procedure => "'PROCEDURE'",
            TokenKind::Case => "'CASE'",
            TokenKind::Else => "'ELSE'",
            TokenKind::Of => "'OF'",
            TokenKind::To => "'TO'",
            TokenKind::In => "'IN'",
            TokenKind::Or => "'OR'",
            TokenKind::And => "'AND'",
            TokenKind::Div => "'DIV'",
            TokenKind::Mod => "'MOD'",
            TokenKind::Not => "'NOT'",
            TokenKind::Var => "'VAR'",
            TokenKind::Begin => "'BEGIN'",
            TokenKind::End => "'END'",

            // Operators
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Star => "'*'",
            TokenKind::Slash => "'/'",
            TokenKind::Amp => "'&'",
            TokenKind::Eq => "'='",
            TokenKind::Hash => "'#'",
            TokenKind::LtGt => "'<>'",
            TokenKind::Lt => "'<'",
            TokenKind::LtEq => "'<='",
            TokenKind::Gt => "'>'",
            TokenKind::GtEq => "'>='",
            TokenKind::DotDot => "'..'",
            TokenKind::ColonEq => "':='",
            TokenKind::Dot => "'.'",
            TokenKind::Pipe => "'|'",

            // Delimiters
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::Comma => "','",
            TokenKind::Semi => "';'",
            TokenKind::Colon => "':'",

            // Special
            TokenKind::Eof => "end of file",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_lookup_is_case_sensitive() {
        assert_eq!(TokenKind::keyword("MODULE"), Some(TokenKind::Module));
        assert_eq!(TokenKind::keyword("END"), Some(TokenKind::End));
        assert_eq!(TokenKind::keyword("module"), None);
        assert_eq!(TokenKind::keyword("Module"), None);
        assert_eq!(TokenKind::keyword("INTEGER"), None);
    }

    #[test]
    fn every_reserved_word_is_a_keyword() {
        assert_eq!(RESERVED_WORDS.len(), 25);
        for (spelling, kind) in RESERVED_WORDS {
            assert!(kind.is_keyword());
            assert_eq!(kind.display_name(), format!("'{}'", spelling));
        }
        assert!(!TokenKind::Ident("X".to_string()).is_keyword());
    }

    #[test]
    fn integer_values_by_radix() {
        assert_eq!(IntLiteral::new(Radix::Decimal, "255").value(), Some(255));
        assert_eq!(IntLiteral::new(Radix::Octal, "377").value(), Some(255));
        assert_eq!(IntLiteral::new(Radix::Char, "101").value(), Some(65));
        assert_eq!(IntLiteral::new(Radix::Hex, "0FF").value(), Some(255));
        assert_eq!(IntLiteral::new(Radix::Double, "1").value(), Some(1));
        assert_eq!(IntLiteral::new(Radix::Decimal, "99999999999999999999999").value(), None);
    }
}
