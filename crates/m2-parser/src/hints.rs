// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Error hints - suggestions for fixing common mistakes.
//!
//! Kept separate from the main parser to avoid clutter.

use m2_ast::token::TokenKind;

/// Get a hint for an "expected X" error based on what was found.
pub fn for_expected(expected: &str, found: &TokenKind) -> Option<&'static str> {
    match (expected, found) {
        // Separators
        ("';'", TokenKind::Comma) => Some("declarations end with ';', lists use ','"),
        ("';'", _) => Some("imports and declarations end with ';'"),
        ("'='", TokenKind::Colon) => Some("use '=' for constants and types, ':' for fields"),
        ("'='", TokenKind::ColonEq) => Some("constants are declared with '=', not ':='"),
        ("':'", TokenKind::Eq) => Some("record fields are declared as 'name: Type'"),
        ("':'", _) => Some("syntax: name: Type"),

        // Keywords that complete a construct
        ("'OF'", _) => Some("syntax: ARRAY Index OF Element, SET OF Base, CASE tag: T OF"),
        ("'TO'", _) => Some("pointer types are written POINTER TO Type"),
        ("'IMPORT'", _) => Some("syntax: FROM Module IMPORT a, b;"),
        ("'MODULE'", _) => Some("a compilation unit starts with [DEFINITION | IMPLEMENTATION] MODULE"),
        ("'..'", _) => Some("subranges are written [low .. high]"),
        ("'END'", _) => Some("every RECORD, CASE and module body ends with 'END'"),

        // Module footer
        ("'.'", _) => Some("a module ends with 'END Name.'"),
        ("end of file", _) => Some("nothing may follow the closing 'END Name.'"),

        // Names
        ("a name", TokenKind::Integer(_) | TokenKind::Real(_)) => Some("names can't start with a digit"),
        ("a name", k) if k.is_keyword() => Some("reserved words can't be used as names"),
        ("a name", _) => Some("names start with a letter"),

        (s, _) if s.starts_with("'DEFINITION'") => {
            Some("start with 'MODULE Name;', 'DEFINITION MODULE Name;' or 'IMPLEMENTATION MODULE Name;'")
        }

        _ => None,
    }
}

/// Hint for a token that cannot start an expression.
pub fn for_expression(found: &TokenKind) -> Option<&'static str> {
    match found {
        TokenKind::Plus | TokenKind::Minus => {
            Some("a sign may only start an expression; use parentheses: a * (-b)")
        }
        TokenKind::Eof => Some("the expression is incomplete"),
        TokenKind::Semi => Some("put the value before ';'"),
        TokenKind::LBracket => Some("set constructors use braces: {1, 2..5}"),
        _ => Some("try a number, string, name, set {...} or parenthesized expression"),
    }
}

/// Hint for a token that cannot start a type.
pub fn for_type(found: &TokenKind) -> Option<&'static str> {
    match found {
        TokenKind::Integer(_) => Some("subrange types are written in brackets: [1 .. 10]"),
        TokenKind::Var => Some("VAR is only allowed in procedure parameter lists"),
        _ => Some("try a type name, (enumeration), [subrange], ARRAY, RECORD, SET, POINTER or PROCEDURE"),
    }
}
