//! Import alias tables and position-scoped lookup.
//!
//! Templates bind names to other templates (`{% import "forms.twig" as
//! forms %}`) at the document level and inside narrower lexical scopes.
//! Resolving an alias at a position therefore consults two ordered lists:
//! document-level aliases first, then the aliases of every scope containing
//! the position. Lookup takes the first name match, so a document-level
//! alias wins over a same-named scoped one. That precedence is pinned by
//! test; see `document_level_alias_wins_over_scoped`.
//!
//! This layer is stateless. Turning a matched alias path into a document is
//! [`crate::document::DocumentCache::resolve_import`]'s job.

use crate::template::Locals;
use serde::{Deserialize, Serialize};

/// The reserved alias naming the current document itself.
pub const SELF_ALIAS: &str = "_self";

/// A name bound inside a template to another template.
///
/// `path` is the namespaced reference of the target template; `None` marks
/// a self-referential alias (the binding points back at the document that
/// declares it).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportAlias {
    pub name: String,
    pub path: Option<String>,
}

impl ImportAlias {
    /// Creates an alias pointing at a namespaced template reference.
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self { name: name.into(), path: Some(path.into()) }
    }

    /// Creates an alias that refers back to its own document.
    pub fn self_referential(name: impl Into<String>) -> Self {
        Self { name: name.into(), path: None }
    }
}

/// Builds the ordered alias table applicable at `position`.
///
/// Document-level aliases come first; the aliases of each scope containing
/// the position are appended after them, in scope declaration order. With no
/// position, only the document-level table applies.
#[must_use]
pub fn imports_at(locals: &Locals, position: Option<usize>) -> Vec<&ImportAlias> {
    let mut table: Vec<&ImportAlias> = locals.imports.iter().collect();
    if let Some(offset) = position {
        for scope in locals.scopes.iter().filter(|scope| scope.contains(offset)) {
            table.extend(scope.imports.iter());
        }
    }
    table
}

/// Finds the alias bound to `name` at `position`, first match wins.
#[must_use]
pub fn find_alias<'a>(locals: &'a Locals, name: &str, position: Option<usize>) -> Option<&'a ImportAlias> {
    imports_at(locals, position).into_iter().find(|alias| alias.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::Scope;

    fn locals_with_scope() -> Locals {
        Locals {
            imports: vec![
                ImportAlias::new("forms", "@Acme/forms.twig"),
                ImportAlias::self_referential("this"),
            ],
            scopes: vec![
                Scope {
                    start: 100,
                    end: 200,
                    imports: vec![ImportAlias::new("widgets", "partials/widgets.twig")],
                    ..Scope::default()
                },
                Scope {
                    start: 150,
                    end: 180,
                    imports: vec![ImportAlias::new("inner", "partials/inner.twig")],
                    ..Scope::default()
                },
            ],
            ..Locals::default()
        }
    }

    #[test]
    fn document_level_imports_apply_without_position() {
        let locals = locals_with_scope();
        assert!(find_alias(&locals, "forms", None).is_some());
        assert!(find_alias(&locals, "widgets", None).is_none());
    }

    #[test]
    fn scoped_imports_apply_inside_their_range() {
        let locals = locals_with_scope();
        assert!(find_alias(&locals, "widgets", Some(120)).is_some());
        assert!(find_alias(&locals, "widgets", Some(250)).is_none());

        // Nested scopes both contribute at a position inside both.
        let table = imports_at(&locals, Some(160));
        let names: Vec<&str> = table.iter().map(|alias| alias.name.as_str()).collect();
        assert_eq!(names, vec!["forms", "this", "widgets", "inner"]);
    }

    #[test]
    fn document_level_alias_wins_over_scoped() {
        // Same name declared at document level and inside a scope: the
        // document-level binding is found first. This ordering is a pinned
        // design decision, not an accident of insertion order.
        let locals = Locals {
            imports: vec![ImportAlias::new("forms", "document/forms.twig")],
            scopes: vec![Scope {
                start: 0,
                end: 50,
                imports: vec![ImportAlias::new("forms", "scoped/forms.twig")],
                ..Scope::default()
            }],
            ..Locals::default()
        };

        let alias = find_alias(&locals, "forms", Some(10)).unwrap();
        assert_eq!(alias.path.as_deref(), Some("document/forms.twig"));
    }

    #[test]
    fn missing_alias_is_none() {
        let locals = locals_with_scope();
        assert!(find_alias(&locals, "nope", Some(120)).is_none());
    }
}
