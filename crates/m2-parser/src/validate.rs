// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Checks on a finished tree that do not affect whether it was parsed.

use m2_ast::{CompilationUnit, Span};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WarningKind {
    #[error("module '{header}' is closed with 'END {footer}.'")]
    ModuleNameMismatch { header: String, footer: String },
}

/// A warning attached to an otherwise well-formed tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct SemanticWarning {
    pub kind: WarningKind,
    /// Where the problem shows (the footer name for a mismatch).
    pub span: Span,
    /// The module name in the header.
    pub header_span: Span,
}

/// The name after the closing `END` must repeat the module name.
pub fn check_module_names(unit: &CompilationUnit) -> Vec<SemanticWarning> {
    let (header, footer) = (unit.name(), unit.footer());
    if header.name == footer.name {
        return Vec::new();
    }

    vec![SemanticWarning {
        kind: WarningKind::ModuleNameMismatch { header: header.name.clone(), footer: footer.name.clone() },
        span: footer.span,
        header_span: header.span,
    }]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(src: &str) -> CompilationUnit {
        let result = crate::parse(src);
        assert!(result.is_ok(), "Parse errors: {:?}", result.errors);
        result.unit.unwrap()
    }

    #[test]
    fn matching_names() {
        assert!(check_module_names(&unit("MODULE Hello; END Hello.")).is_empty());
        assert!(check_module_names(&unit("DEFINITION MODULE Lists; END Lists.")).is_empty());
    }

    #[test]
    fn mismatched_names() {
        let src = "DEFINITION MODULE Lists; END Queues.";
        let warnings = check_module_names(&unit(src));
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].span.text(src), "Queues");
        assert_eq!(warnings[0].header_span.text(src), "Lists");
        assert_eq!(warnings[0].to_string(), "module 'Lists' is closed with 'END Queues.'");
    }

    #[test]
    fn names_are_case_sensitive() {
        let warnings = check_module_names(&unit("MODULE Hello; END hello."));
        assert_eq!(
            warnings[0].kind,
            WarningKind::ModuleNameMismatch { header: "Hello".to_string(), footer: "hello".to_string() }
        );
    }
}
