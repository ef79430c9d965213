//! Seams for the external template services.
//!
//! The parser, the locals collector, and the type resolver are collaborators
//! this crate calls but does not implement. They are modeled as trait-object
//! capability handles threaded through [`crate::document::DocumentCache`]:
//!
//! - [`TemplateParser`] turns text into a [`SyntaxTree`]. Parsing is total:
//!   malformed input yields a best-effort, error-tolerant tree, never a
//!   failure.
//! - [`LocalsCollector`] walks a tree and produces the [`Locals`] table the
//!   import resolver consumes.
//! - [`TypeResolver`] is optional; collectors must treat its absence as a
//!   regular, fully-handled branch (symbols simply come out untyped).
//!
//! The tree itself is opaque to this crate: the cache stores it and hands it
//! back to the collector, but never inspects it. [`SyntaxTree`] type-erases
//! whatever representation the parser uses.

use crate::imports::ImportAlias;
use std::any::Any;
use std::fmt;

/// A parsed template, as produced by the external parser.
///
/// Type-erased so the cache can store trees without depending on the parser
/// crate. The producing side wraps its representation with
/// [`SyntaxTree::new`]; consumers that know the concrete type get it back
/// with [`SyntaxTree::downcast_ref`].
pub struct SyntaxTree(Box<dyn Any + Send + Sync>);

impl SyntaxTree {
    /// Wraps a parser-specific tree representation.
    pub fn new<T: Any + Send + Sync>(tree: T) -> Self {
        Self(Box::new(tree))
    }

    /// Recovers the concrete tree type, if it matches.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }
}

impl fmt::Debug for SyntaxTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SyntaxTree(..)")
    }
}

/// Parses template text into a syntax tree.
pub trait TemplateParser: Send + Sync {
    /// Pure and total over any input; malformed text yields an
    /// error-tolerant tree.
    fn parse(&self, text: &str) -> SyntaxTree;
}

/// Collects the local symbol table from a parsed tree.
pub trait LocalsCollector: Send + Sync {
    /// `types` is the optional external type computation capability; `None`
    /// means symbols are collected untyped.
    fn collect(&self, tree: &SyntaxTree, types: Option<&dyn TypeResolver>) -> Locals;
}

/// Optional capability for computing type information via an external
/// interpreter.
pub trait TypeResolver: Send + Sync {
    /// Best-effort type of an expression; `None` when the interpreter cannot
    /// tell.
    fn type_of(&self, expression: &str) -> Option<String>;
}

/// The symbol table collected from one document.
///
/// Everything the import resolver and downstream editor features need:
/// document-level variables and import aliases, plus position-ranged scopes
/// carrying their own narrower tables.
#[derive(Debug, Clone, Default)]
pub struct Locals {
    /// Document-level variables (`{% set %}` and friends).
    pub variables: Vec<Variable>,
    /// Document-level import aliases, in declaration order.
    pub imports: Vec<ImportAlias>,
    /// Lexical scopes (blocks, macro bodies) with their own locals.
    pub scopes: Vec<Scope>,
}

/// One local variable, optionally typed when a [`TypeResolver`] was
/// available at collection time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub name: String,
    pub ty: Option<String>,
}

/// A position-ranged lexical scope inside a document.
///
/// Offsets are byte offsets into the document text; the range is half-open.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    pub start: usize,
    pub end: usize,
    /// Aliases declared inside this scope only.
    pub imports: Vec<ImportAlias>,
    /// Variables declared inside this scope only.
    pub variables: Vec<Variable>,
}

impl Scope {
    /// Whether `offset` falls inside this scope.
    #[must_use]
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }
}
