// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The lexer implementation using logos.

use logos::Logos;
use m2_ast::token::{IntLiteral, Radix, Token, TokenKind};
use m2_ast::{LineMap, Span};
use thiserror::Error;

/// Raw token type for logos - literal values are built in a second pass.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
enum RawToken {
    // === Operators (longest match wins) ===
    #[token("<>")]
    LtGt,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("..")]
    DotDot,
    #[token(":=")]
    ColonEq,

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("&")]
    Amp,
    #[token("=")]
    Eq,
    #[token("#")]
    Hash,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token(".")]
    Dot,
    #[token("|")]
    Pipe,

    // === Delimiters ===
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(";")]
    Semi,
    #[token(":")]
    Colon,

    // === Comments ===
    // Skipped when closed; only an unterminated comment is emitted.
    #[token("(*", block_comment)]
    UnterminatedComment,

    // === Literals ===
    // Numbers are scanned by hand from the first digit so every form gets
    // maximal munch and `1..10` never reads as a real.
    #[regex(r"[0-9]", number)]
    Number(NumberShape),

    #[regex(r#""[^"\n]*""#)]
    #[regex(r"'[^'\n]*'")]
    String,

    #[regex(r#""[^"\n]*"#)]
    #[regex(r"'[^'\n]*")]
    UnterminatedString,

    // === Identifier or reserved word, resolved through RESERVED_WORDS ===
    #[regex(r"[a-zA-Z][a-zA-Z0-9]*")]
    Word,
}

/// Which literal form a scanned number turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumberShape {
    Integer(Radix),
    Real,
    /// Letters or digits glued to a number that no literal form accepts.
    Malformed,
}

/// Skip `(* ... *)` comments, handling nesting.
fn block_comment(lexer: &mut logos::Lexer<RawToken>) -> logos::Filter<()> {
    let mut depth = 1;
    let mut chars = lexer.remainder().chars().peekable();
    let mut consumed = 0;

    while depth > 0 {
        match chars.next() {
            Some('(') if chars.peek() == Some(&'*') => {
                chars.next();
                consumed += 2;
                depth += 1;
            }
            Some('*') if chars.peek() == Some(&')') => {
                chars.next();
                consumed += 2;
                depth -= 1;
            }
            Some(c) => consumed += c.len_utf8(),
            None => break,
        }
    }

    lexer.bump(consumed);
    if depth == 0 {
        logos::Filter::Skip
    } else {
        logos::Filter::Emit(())
    }
}

fn number(lexer: &mut logos::Lexer<RawToken>) -> NumberShape {
    let start = lexer.span().start;
    let (len, shape) = scan_number(&lexer.source().as_bytes()[start..]);
    lexer.bump(len - 1);
    shape
}

/// Scan a numeric literal at the start of `text` (which begins with a digit).
///
/// Returns the literal's length in bytes and its shape.
fn scan_number(text: &[u8]) -> (usize, NumberShape) {
    let decimal = count_while(text, 0, |b| b.is_ascii_digit());

    // digit{digit} "." {digit} [scale factor], but never eat the first dot of ".."
    if text.get(decimal) == Some(&b'.') && text.get(decimal + 1) != Some(&b'.') {
        let mut len = decimal + 1;
        len += count_while(text, len, |b| b.is_ascii_digit());
        if text.get(len) == Some(&b'E') {
            let mut exp = len + 1;
            if matches!(text.get(exp), Some(b'+' | b'-')) {
                exp += 1;
            }
            let digits = count_while(text, exp, |b| b.is_ascii_digit());
            if digits > 0 {
                len = exp + digits;
            }
        }
        return glued(text, len, NumberShape::Real);
    }

    let hex = count_while(text, 0, is_hex_digit);
    if text.get(hex) == Some(&b'H') {
        return glued(text, hex + 1, NumberShape::Integer(Radix::Hex));
    }
    if hex == decimal {
        return glued(text, decimal, NumberShape::Integer(Radix::Decimal));
    }

    // The hex-digit run ends in a letter: it has to be a B, C or D suffix.
    let body = &text[..hex - 1];
    let shape = match text[hex - 1] {
        b'B' if is_octal(body) => NumberShape::Integer(Radix::Octal),
        b'C' if is_octal(body) => NumberShape::Integer(Radix::Char),
        b'D' => NumberShape::Integer(Radix::Double),
        _ => NumberShape::Malformed,
    };
    glued(text, hex, shape)
}

/// A literal must not run straight into letters or digits.
fn glued(text: &[u8], len: usize, shape: NumberShape) -> (usize, NumberShape) {
    let extra = count_while(text, len, |b| b.is_ascii_alphanumeric());
    if extra > 0 {
        (len + extra, NumberShape::Malformed)
    } else {
        (len, shape)
    }
}

fn count_while(text: &[u8], from: usize, pred: impl Fn(u8) -> bool) -> usize {
    text.get(from..)
        .map(|rest| rest.iter().take_while(|&&b| pred(b)).count())
        .unwrap_or(0)
}

fn is_hex_digit(b: u8) -> bool {
    b.is_ascii_digit() || (b'A'..=b'F').contains(&b)
}

fn is_octal(digits: &[u8]) -> bool {
    !digits.is_empty() && digits.iter().all(|b| (b'0'..=b'7').contains(b))
}

/// Maximum number of errors to collect before stopping.
const MAX_ERRORS: usize = 20;

/// The lexer for Modula-2 source text.
///
/// Tokens can be pulled one at a time with [`Lexer::next_token`] /
/// [`Lexer::peek_token`], or all at once with [`Lexer::tokenize`].
pub struct Lexer<'a> {
    source: &'a str,
    raw: logos::Lexer<'a, RawToken>,
    line_map: LineMap,
    peeked: Option<Result<Token, LexError>>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            raw: RawToken::lexer(source),
            line_map: LineMap::new(source),
            peeked: None,
        }
    }

    /// Consume the next token. Returns `Eof` forever once the input is exhausted.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        match self.peeked.take() {
            Some(result) => result,
            None => self.scan(),
        }
    }

    /// Look at the next token without consuming it.
    pub fn peek_token(&mut self) -> Result<&Token, LexError> {
        let next = match self.peeked.take() {
            Some(result) => result,
            None => self.scan(),
        };
        match self.peeked.insert(next) {
            Ok(token) => Ok(&*token),
            Err(e) => Err(e.clone()),
        }
    }

    /// Tokenize the entire source, collecting multiple errors.
    ///
    /// The returned token vector always ends with `Eof`.
    pub fn tokenize(&mut self) -> LexResult {
        let mut tokens = Vec::new();
        let mut errors = Vec::new();

        loop {
            match self.next_token() {
                Ok(token) => {
                    let done = token.kind == TokenKind::Eof;
                    tokens.push(token);
                    if done {
                        break;
                    }
                }
                Err(e) => {
                    errors.push(e);
                    if errors.len() >= MAX_ERRORS {
                        tokens.push(self.eof_token());
                        break;
                    }
                }
            }
        }

        LexResult { tokens, errors }
    }

    fn scan(&mut self) -> Result<Token, LexError> {
        let Some(result) = self.raw.next() else {
            return Ok(self.eof_token());
        };
        let range = self.raw.span();
        let span = Span::new(range.start, range.end);
        let slice = self.raw.slice();

        match result {
            Ok(raw) => {
                let kind = self.convert_token(raw, slice, span)?;
                Ok(self.token(kind, span))
            }
            Err(()) => {
                let ch = self.source[span.start..].chars().next().unwrap_or('?');
                let span = Span::new(span.start, span.start + ch.len_utf8());
                Err(self.error(LexErrorKind::InvalidCharacter(ch), span))
            }
        }
    }

    fn token(&self, kind: TokenKind, span: Span) -> Token {
        let (line, column) = self.line_map.offset_to_line_col(span.start);
        Token { kind, span, line, column }
    }

    fn eof_token(&self) -> Token {
        let end = self.source.len();
        self.token(TokenKind::Eof, Span::new(end, end))
    }

    fn error(&self, kind: LexErrorKind, span: Span) -> LexError {
        let (line, column) = self.line_map.offset_to_line_col(span.start);
        LexError { kind, span, line, column }
    }

    /// Convert a raw logos token to our TokenKind, building literal values.
    fn convert_token(&self, raw: RawToken, slice: &str, span: Span) -> Result<TokenKind, LexError> {
        Ok(match raw {
            // Operators
            RawToken::LtGt => TokenKind::LtGt,
            RawToken::LtEq => TokenKind::LtEq,
            RawToken::GtEq => TokenKind::GtEq,
            RawToken::DotDot => TokenKind::DotDot,
            RawToken::ColonEq => TokenKind::ColonEq,
            RawToken::Plus => TokenKind::Plus,
            RawToken::Minus => TokenKind::Minus,
            RawToken::Star => TokenKind::Star,
            RawToken::Slash => TokenKind::Slash,
            RawToken::Amp => TokenKind::Amp,
            RawToken::Eq => TokenKind::Eq,
            RawToken::Hash => TokenKind::Hash,
            RawToken::Lt => TokenKind::Lt,
            RawToken::Gt => TokenKind::Gt,
            RawToken::Dot => TokenKind::Dot,
            RawToken::Pipe => TokenKind::Pipe,

            // Delimiters
            RawToken::LParen => TokenKind::LParen,
            RawToken::RParen => TokenKind::RParen,
            RawToken::LBracket => TokenKind::LBracket,
            RawToken::RBracket => TokenKind::RBracket,
            RawToken::LBrace => TokenKind::LBrace,
            RawToken::RBrace => TokenKind::RBrace,
            RawToken::Comma => TokenKind::Comma,
            RawToken::Semi => TokenKind::Semi,
            RawToken::Colon => TokenKind::Colon,

            // Literals
            RawToken::Number(NumberShape::Integer(Radix::Decimal)) => {
                TokenKind::Integer(IntLiteral::new(Radix::Decimal, slice))
            }
            RawToken::Number(NumberShape::Integer(radix)) => {
                // Drop the suffix letter.
                TokenKind::Integer(IntLiteral::new(radix, &slice[..slice.len() - 1]))
            }
            RawToken::Number(NumberShape::Real) => TokenKind::Real(slice.to_string()),
            RawToken::Number(NumberShape::Malformed) => {
                return Err(self.error(LexErrorKind::InvalidNumericSuffix(slice.to_string()), span));
            }
            RawToken::String => TokenKind::String(slice[1..slice.len() - 1].to_string()),
            RawToken::UnterminatedString => {
                return Err(self.error(LexErrorKind::UnterminatedString, span));
            }
            RawToken::UnterminatedComment => {
                return Err(self.error(LexErrorKind::UnterminatedComment, span));
            }
            RawToken::Word => TokenKind::keyword(slice).unwrap_or_else(|| TokenKind::Ident(slice.to_string())),
        })
    }
}

/// Result of lexing: tokens plus any errors found.
#[derive(Debug)]
pub struct LexResult {
    pub tokens: Vec<Token>,
    pub errors: Vec<LexError>,
}

impl LexResult {
    /// Returns true if lexing completed without errors.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// What went wrong while scanning.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexErrorKind {
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unexpected character '{0}'")]
    InvalidCharacter(char),
    #[error("malformed number '{0}'")]
    InvalidNumericSuffix(String),
    #[error("unterminated comment")]
    UnterminatedComment,
}

/// A lexer error with its location.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{line}:{column}: {kind}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
    pub line: u32,
    pub column: u32,
}

impl LexError {
    /// A short suggestion for fixing the error.
    pub fn hint(&self) -> Option<&'static str> {
        match self.kind {
            LexErrorKind::UnterminatedString => Some("close the string on the same line with the quote it started with"),
            LexErrorKind::InvalidCharacter(_) => None,
            LexErrorKind::InvalidNumericSuffix(_) => {
                Some("integer suffixes are B or C (octal), H (hex) and D; hex digits are uppercase")
            }
            LexErrorKind::UnterminatedComment => Some("every '(*' needs a matching '*)'"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        let result = Lexer::new(src).tokenize();
        assert!(result.is_ok(), "Lex errors: {:?}", result.errors);
        result.tokens.into_iter().map(|t| t.kind).collect()
    }

    fn single(src: &str) -> TokenKind {
        let toks = kinds(src);
        assert_eq!(toks.len(), 2, "expected one token for {:?}, got {:?}", src, toks);
        toks.into_iter().next().unwrap()
    }

    fn int(radix: Radix, digits: &str) -> TokenKind {
        TokenKind::Integer(IntLiteral::new(radix, digits))
    }

    fn first_error(src: &str) -> LexError {
        let result = Lexer::new(src).tokenize();
        result.errors.into_iter().next().expect("expected a lex error")
    }

    #[test]
    fn integer_forms() {
        assert_eq!(single("255"), int(Radix::Decimal, "255"));
        assert_eq!(single("377B"), int(Radix::Octal, "377"));
        assert_eq!(single("101C"), int(Radix::Char, "101"));
        assert_eq!(single("0FFH"), int(Radix::Hex, "0FF"));
        assert_eq!(single("1D"), int(Radix::Double, "1"));
    }

    #[test]
    fn longest_match_for_hex() {
        assert_eq!(single("123H"), int(Radix::Hex, "123"));
        assert_eq!(single("123"), int(Radix::Decimal, "123"));
        // B and C are hex digits too; the trailing H decides.
        assert_eq!(single("12BH"), int(Radix::Hex, "12B"));
        assert_eq!(single("7CH"), int(Radix::Hex, "7C"));
    }

    #[test]
    fn real_literals() {
        assert_eq!(single("3.14E+10"), TokenKind::Real("3.14E+10".to_string()));
        assert_eq!(single("3."), TokenKind::Real("3.".to_string()));
        assert_eq!(single("0.5E-3"), TokenKind::Real("0.5E-3".to_string()));
        assert_eq!(single("1.0E2"), TokenKind::Real("1.0E2".to_string()));
    }

    #[test]
    fn range_is_not_a_real() {
        assert_eq!(
            kinds("[1..10]"),
            vec![
                TokenKind::LBracket,
                int(Radix::Decimal, "1"),
                TokenKind::DotDot,
                int(Radix::Decimal, "10"),
                TokenKind::RBracket,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn malformed_numbers() {
        let e = first_error("19B");
        assert_eq!(e.kind, LexErrorKind::InvalidNumericSuffix("19B".to_string()));
        assert_eq!(e.span, Span::new(0, 3));

        assert!(matches!(first_error("12AF").kind, LexErrorKind::InvalidNumericSuffix(_)));
        assert!(matches!(first_error("1E5").kind, LexErrorKind::InvalidNumericSuffix(_)));
        assert!(matches!(first_error("0ffH").kind, LexErrorKind::InvalidNumericSuffix(_)));
        assert!(matches!(first_error("3.0X").kind, LexErrorKind::InvalidNumericSuffix(_)));
    }

    #[test]
    fn keywords_beat_identifiers() {
        assert_eq!(single("MODULE"), TokenKind::Module);
        assert_eq!(single("END"), TokenKind::End);
        assert_eq!(single("ENDE"), TokenKind::Ident("ENDE".to_string()));
        assert_eq!(single("module"), TokenKind::Ident("module".to_string()));
        assert_eq!(single("Of"), TokenKind::Ident("Of".to_string()));
        assert_eq!(single("x1y2"), TokenKind::Ident("x1y2".to_string()));
    }

    #[test]
    fn operators_and_punctuation() {
        assert_eq!(
            kinds("# <> <= >= < > = .. := . | & ; : ,"),
            vec![
                TokenKind::Hash,
                TokenKind::LtGt,
                TokenKind::LtEq,
                TokenKind::GtEq,
                TokenKind::Lt,
                TokenKind::Gt,
                TokenKind::Eq,
                TokenKind::DotDot,
                TokenKind::ColonEq,
                TokenKind::Dot,
                TokenKind::Pipe,
                TokenKind::Amp,
                TokenKind::Semi,
                TokenKind::Colon,
                TokenKind::Comma,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn strings_keep_raw_content() {
        assert_eq!(single(r#""it's""#), TokenKind::String("it's".to_string()));
        assert_eq!(single(r#"'say "hi"'"#), TokenKind::String(r#"say "hi""#.to_string()));
        assert_eq!(single(r#""a\n""#), TokenKind::String(r"a\n".to_string()));
        assert_eq!(single("''"), TokenKind::String(String::new()));
    }

    #[test]
    fn unterminated_string() {
        let e = first_error("CONST s = \"abc\n;");
        assert_eq!(e.kind, LexErrorKind::UnterminatedString);
        assert_eq!((e.line, e.column), (1, 11));
    }

    #[test]
    fn invalid_character() {
        let e = first_error("TYPE T = @;");
        assert_eq!(e.kind, LexErrorKind::InvalidCharacter('@'));
        assert_eq!(e.span, Span::new(9, 10));
        assert_eq!(e.to_string(), "1:10: unexpected character '@'");
    }

    #[test]
    fn nested_comments_are_skipped() {
        assert_eq!(
            kinds("(* outer (* inner *) still *) END"),
            vec![TokenKind::End, TokenKind::Eof]
        );
        assert_eq!(first_error("(* never closed").kind, LexErrorKind::UnterminatedComment);
    }

    #[test]
    fn positions_are_one_based() {
        let result = Lexer::new("MODULE M;\n  END M.").tokenize();
        let end = &result.tokens[3];
        assert_eq!(end.kind, TokenKind::End);
        assert_eq!((end.line, end.column), (2, 3));
        assert_eq!(end.span, Span::new(12, 15));
    }

    #[test]
    fn peek_does_not_consume() {
        let mut lexer = Lexer::new("FROM InOut");
        assert_eq!(lexer.peek_token().map(|t| t.kind.clone()), Ok(TokenKind::From));
        assert_eq!(lexer.peek_token().map(|t| t.kind.clone()), Ok(TokenKind::From));
        assert_eq!(lexer.next_token().map(|t| t.kind), Ok(TokenKind::From));
        assert_eq!(
            lexer.next_token().map(|t| t.kind),
            Ok(TokenKind::Ident("InOut".to_string()))
        );
        assert_eq!(lexer.next_token().map(|t| t.kind), Ok(TokenKind::Eof));
        assert_eq!(lexer.next_token().map(|t| t.kind), Ok(TokenKind::Eof));
    }

    #[test]
    fn errors_do_not_stop_the_scan() {
        let result = Lexer::new("a @ b $ c").tokenize();
        assert_eq!(result.errors.len(), 2);
        let idents = result
            .tokens
            .iter()
            .filter(|t| matches!(t.kind, TokenKind::Ident(_)))
            .count();
        assert_eq!(idents, 3);
        assert_eq!(result.tokens.last().map(|t| &t.kind), Some(&TokenKind::Eof));
    }
}
