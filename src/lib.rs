//! twigpath - template path resolution and document caching for Twig tooling
//!
//! This crate turns logical, namespaced template references (`@Acme/partial.twig`,
//! `partials/header.twig`) into concrete filesystem locations, and keeps an
//! in-memory cache of parsed template documents keyed by location. It is the
//! resolution core shared by editor features such as completion,
//! go-to-definition, and reference finding; the protocol plumbing around those
//! features lives elsewhere and calls into this crate in-process.
//!
//! # Architecture Overview
//!
//! Resolution is layered:
//! - Framework-reported namespace mappings (from introspecting the host
//!   framework) come first, user-configured mappings after them; order is
//!   precedence, later entries shadow by being consulted later.
//! - Each mapping directory is normalized against the workspace root with
//!   existence probes before use, so malformed or framework-relative paths
//!   degrade gracefully instead of failing.
//! - An optional *framework root* (e.g. `app/` inferred from the console
//!   entry-point path) is retried as a secondary search root on every miss.
//!
//! # Core Modules
//!
//! - [`config`] - Namespace mapping and framework environment payload types
//! - [`core`] - Error types shared across the crate
//! - [`document`] - The document cache and the namespaced-path resolver
//! - [`imports`] - Import alias tables and position-scoped lookup
//! - [`mapping`] - The memoized effective mapping table
//! - [`template`] - Seams for the external parser, locals collector, and
//!   type resolver
//! - [`utils`] - Path normalization heuristics and separator handling
//!
//! # Example
//!
//! ```rust,no_run
//! use twigpath::config::{FrameworkEnvironment, NamespaceMapping};
//! use twigpath::document::DocumentCache;
//! use twigpath::template::{LocalsCollector, TemplateParser};
//! use std::path::PathBuf;
//! use std::sync::Arc;
//!
//! # async fn example(parser: Arc<dyn TemplateParser>, collector: Arc<dyn LocalsCollector>) -> anyhow::Result<()> {
//! let mut cache = DocumentCache::new(PathBuf::from("/work/project"), parser, collector);
//! cache.configure(
//!     FrameworkEnvironment::default(),
//!     None,
//!     Some("app".to_string()),
//!     vec![NamespaceMapping::new("@Acme", "vendor/acme/templates")],
//! );
//!
//! if let Some(doc) = cache.resolve_by_namespaced_path("@Acme/partial.twig").await? {
//!     println!("resolved to {}", doc.uri());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Failure Model
//!
//! A reference that cannot be mapped to a file is an *absence*, not an error:
//! resolution returns `Ok(None)` and the caller decides what to surface.
//! The only hard failure in this crate is the disk read performed while
//! loading a document, which propagates as an [`anyhow::Error`] from the
//! loading entry points.

// Core functionality modules
pub mod core;
pub mod document;
pub mod mapping;

// Configuration inputs
pub mod config;

// External collaborator seams
pub mod template;

// Supporting modules
pub mod imports;
pub mod utils;
