// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Names: identifiers, qualified identifiers and identifier lists.

use std::fmt;

use crate::Span;

/// A single identifier with its location.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self { name: name.into(), span }
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A possibly qualified name such as `A.B.C`. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "serde_repr::Qualident"))]
pub struct Qualident {
    parts: Vec<Ident>,
    pub span: Span,
}

impl Qualident {
    pub fn new(first: Ident) -> Self {
        let span = first.span;
        Self { parts: vec![first], span }
    }

    /// Append a trailing segment (`A` + `B` -> `A.B`).
    pub fn push(&mut self, part: Ident) {
        self.span = self.span.to(part.span);
        self.parts.push(part);
    }

    pub fn parts(&self) -> &[Ident] {
        &self.parts
    }

    /// The last segment: the declared name being referenced.
    pub fn name(&self) -> &Ident {
        &self.parts[self.parts.len() - 1]
    }

    /// The leading segments naming the enclosing module(s).
    pub fn qualifier(&self) -> &[Ident] {
        &self.parts[..self.parts.len() - 1]
    }

    pub fn is_qualified(&self) -> bool {
        self.parts.len() > 1
    }

    /// The segment names, for comparisons in tests and tools.
    pub fn path(&self) -> Vec<&str> {
        self.parts.iter().map(|p| p.name.as_str()).collect()
    }
}

impl fmt::Display for Qualident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(&part.name)?;
        }
        Ok(())
    }
}

/// A comma-separated list of identifiers in source order. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "serde_repr::IdentList"))]
pub struct IdentList {
    idents: Vec<Ident>,
    pub span: Span,
}

impl IdentList {
    pub fn new(first: Ident) -> Self {
        let span = first.span;
        Self { idents: vec![first], span }
    }

    pub fn push(&mut self, ident: Ident) {
        self.span = self.span.to(ident.span);
        self.idents.push(ident);
    }

    pub fn idents(&self) -> &[Ident] {
        &self.idents
    }

    pub fn len(&self) -> usize {
        self.idents.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn names(&self) -> Vec<&str> {
        self.idents.iter().map(|i| i.name.as_str()).collect()
    }
}

/// Unchecked shapes that deserialization goes through, so an empty name
/// list is rejected instead of producing a tree that breaks `name()`.
#[cfg(feature = "serde")]
mod serde_repr {
    use super::{Ident, Span};

    #[derive(serde::Deserialize)]
    pub struct Qualident {
        parts: Vec<Ident>,
        span: Span,
    }

    #[derive(serde::Deserialize)]
    pub struct IdentList {
        idents: Vec<Ident>,
        span: Span,
    }

    impl TryFrom<Qualident> for super::Qualident {
        type Error = &'static str;

        fn try_from(raw: Qualident) -> Result<Self, Self::Error> {
            if raw.parts.is_empty() {
                return Err("a qualified name needs at least one part");
            }
            Ok(Self { parts: raw.parts, span: raw.span })
        }
    }

    impl TryFrom<IdentList> for super::IdentList {
        type Error = &'static str;

        fn try_from(raw: IdentList) -> Result<Self, Self::Error> {
            if raw.idents.is_empty() {
                return Err("an identifier list needs at least one name");
            }
            Ok(Self { idents: raw.idents, span: raw.span })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(name: &str, start: usize) -> Ident {
        Ident::new(name, Span::new(start, start + name.len()))
    }

    #[test]
    fn qualident_segments() {
        // Storage.ALLOCATE.x
        let mut q = Qualident::new(ident("Storage", 0));
        assert!(!q.is_qualified());
        q.push(ident("ALLOCATE", 8));
        q.push(ident("x", 17));
        assert!(q.is_qualified());
        assert_eq!(q.path(), vec!["Storage", "ALLOCATE", "x"]);
        assert_eq!(q.name().name, "x");
        assert_eq!(q.qualifier().len(), 2);
        assert_eq!(q.span, Span::new(0, 18));
        assert_eq!(q.to_string(), "Storage.ALLOCATE.x");
    }

    #[test]
    fn ident_list_keeps_order() {
        let mut list = IdentList::new(ident("Red", 1));
        list.push(ident("Green", 6));
        list.push(ident("Blue", 13));
        assert_eq!(list.names(), vec!["Red", "Green", "Blue"]);
        assert_eq!(list.len(), 3);
        assert_eq!(list.span, Span::new(1, 17));
    }
}
