//! The document cache and the namespaced-path resolver.
//!
//! [`DocumentCache`] owns every loaded template document and the mapping
//! table their references resolve through. A document comes into existence
//! the first time something refers to it, gets its text from the editor or
//! from disk, is parsed by the external [`TemplateParser`], has its locals
//! collected, and stays cached until a deletion notification evicts it.
//!
//! # Resolution
//!
//! [`DocumentCache::resolve_by_namespaced_path`] scans the effective mapping
//! table front-to-back. For each mapping whose namespace prefixes the
//! reference, the candidate location is probed first against the workspace
//! root, then against `workspace_root/framework_root` when a framework root
//! is configured. The first mapping whose candidate is already cached or
//! exists on disk wins; a matching namespace that fails its existence checks
//! does not block later mappings with the same prefix. An exhausted scan is
//! `Ok(None)` - "reference unresolved" is an answer, not an error.
//!
//! # Mutation discipline
//!
//! All mutation goes through `&mut self`, so no two operations overlap and
//! no locking is needed. The internal load step computes the new tree and
//! locals *before* assigning any field and performs no awaits in between, so
//! a reentrant read (resolving an import while its importer loads) only ever
//! sees fully-committed state.

use crate::config::{FrameworkEnvironment, NamespaceMapping};
use crate::core::TwigpathError;
use crate::imports::{self, SELF_ALIAS};
use crate::mapping::MappingTable;
use crate::template::{Locals, LocalsCollector, SyntaxTree, TemplateParser, TypeResolver};
use crate::utils::{lexical_join, normalize_separators};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Canonical location identifier for a document.
///
/// A forward-slash-normalized path string, identical for the same location
/// on every platform. This core never leaves the process, so a plain path
/// string is preferred over an RFC 3986 URI.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Uri(String);

impl Uri {
    /// Creates a uri from a raw location string, normalizing separators.
    pub fn new(location: impl Into<String>) -> Self {
        Self(normalize_separators(&location.into()))
    }

    /// Creates a uri from a filesystem path.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        Self::new(path.to_string_lossy().into_owned())
    }

    /// The canonical string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The filesystem location this uri denotes.
    #[must_use]
    pub fn to_path(&self) -> PathBuf {
        PathBuf::from(&self.0)
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One loaded template file.
///
/// Created empty on first reference, populated by the cache's load step,
/// mutated in place on text changes, evicted on deletion. Exclusively owned
/// by [`DocumentCache`]; callers only ever hold a borrow for the duration of
/// a request.
#[derive(Debug)]
pub struct Document {
    uri: Uri,
    text: Option<String>,
    tree: Option<SyntaxTree>,
    locals: Locals,
}

impl Document {
    fn new(uri: Uri) -> Self {
        Self { uri, text: None, tree: None, locals: Locals::default() }
    }

    /// The canonical location of this document.
    #[must_use]
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// The raw source text, `None` until the first load completes.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// The parsed syntax tree, `None` until the first load completes.
    #[must_use]
    pub fn tree(&self) -> Option<&SyntaxTree> {
        self.tree.as_ref()
    }

    /// The collected symbol table. Empty until the first load completes.
    #[must_use]
    pub fn locals(&self) -> &Locals {
        &self.locals
    }

    /// Whether a load has completed for this document.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.text.is_some()
    }
}

/// Owns loaded documents and resolves namespaced references to them.
pub struct DocumentCache {
    documents: HashMap<Uri, Document>,
    mappings: MappingTable,
    parser: Arc<dyn TemplateParser>,
    collector: Arc<dyn LocalsCollector>,
    type_resolver: Option<Arc<dyn TypeResolver>>,
}

impl DocumentCache {
    /// Creates an empty cache for `workspace_root`, wired to the external
    /// parser and locals collector.
    #[must_use]
    pub fn new(
        workspace_root: PathBuf,
        parser: Arc<dyn TemplateParser>,
        collector: Arc<dyn LocalsCollector>,
    ) -> Self {
        Self {
            documents: HashMap::new(),
            mappings: MappingTable::new(workspace_root),
            parser,
            collector,
            type_resolver: None,
        }
    }

    /// Replaces the resolution configuration.
    ///
    /// Called by the configuration-change handler whenever the framework
    /// environment, user mappings, or framework root change. Invalidates the
    /// mapping table; already-loaded documents stay cached.
    pub fn configure(
        &mut self,
        environment: FrameworkEnvironment,
        type_resolver: Option<Arc<dyn TypeResolver>>,
        framework_root: Option<String>,
        user_mappings: Vec<NamespaceMapping>,
    ) {
        tracing::debug!(
            framework_mappings = environment.template_mappings.len(),
            user_mappings = user_mappings.len(),
            framework_root = framework_root.as_deref().unwrap_or("<none>"),
            "reconfiguring document cache"
        );
        self.type_resolver = type_resolver;
        self.mappings.replace(&environment, user_mappings, framework_root);
    }

    /// Returns the cached document for `uri`, creating and loading it if
    /// absent.
    ///
    /// When `text` is provided, or the document has never been loaded, the
    /// content is (re)loaded from `text` or from disk. The returned document
    /// always has text and an up-to-date tree and locals.
    pub async fn get(&mut self, uri: &Uri, text: Option<String>) -> Result<&Document> {
        let loaded = self.documents.get(uri).is_some_and(Document::is_loaded);
        if text.is_some() || !loaded {
            self.set_text(uri, text).await?;
        }
        self.documents.get(uri).context("document missing after load")
    }

    /// Replaces a document's content with editor-provided text, reloading
    /// unconditionally.
    pub async fn update_text(&mut self, uri: &Uri, text: String) -> Result<&Document> {
        self.get(uri, Some(text)).await
    }

    /// Evicts the document at `uri`. Idempotent when absent.
    pub fn remove(&mut self, uri: &Uri) {
        if self.documents.remove(uri).is_some() {
            tracing::debug!(%uri, "evicted document");
        }
    }

    /// Reloads a cached document from disk.
    ///
    /// A uri that is not cached is a no-op, not an error: a change
    /// notification for a file nothing ever loaded carries no work.
    pub async fn refresh(&mut self, uri: &Uri) -> Result<()> {
        if self.documents.contains_key(uri) {
            self.set_text(uri, None).await?;
        }
        Ok(())
    }

    /// Resolves a namespaced template reference to a loaded document.
    ///
    /// See the module docs for the scan order. Returns `Ok(None)` when no
    /// mapping yields an existing file; the caller must treat that as
    /// "reference unresolved", not a failure.
    pub async fn resolve_by_namespaced_path(&mut self, reference: &str) -> Result<Option<&Document>> {
        let resolved = self.resolve_reference(reference).await?;
        Ok(resolved.and_then(|uri| self.documents.get(&uri)))
    }

    /// Resolves an import alias declared in the document at `uri`.
    ///
    /// The reserved alias `_self` names the importing document itself, as
    /// does any alias recorded without a target path. `position` widens the
    /// lookup to the lexical scope containing it; on a name collision the
    /// document-level alias wins (see [`crate::imports`]).
    pub async fn resolve_import(
        &mut self,
        uri: &Uri,
        alias_name: &str,
        position: Option<usize>,
    ) -> Result<Option<&Document>> {
        if alias_name == SELF_ALIAS {
            return Ok(self.documents.get(uri));
        }

        let alias = match self.documents.get(uri) {
            Some(document) => imports::find_alias(document.locals(), alias_name, position).cloned(),
            None => return Ok(None),
        };

        match alias {
            None => Ok(None),
            Some(alias) => match alias.path {
                // A pathless alias is a self-reference.
                None => Ok(self.documents.get(uri)),
                Some(path) => self.resolve_by_namespaced_path(&path).await,
            },
        }
    }

    /// The mapping-scan core of [`Self::resolve_by_namespaced_path`],
    /// yielding the uri of the winning document.
    async fn resolve_reference(&mut self, reference: &str) -> Result<Option<Uri>> {
        let mappings = self.mappings.effective_mappings();
        let workspace_root = self.mappings.workspace_root().to_path_buf();
        let framework_root = self.mappings.framework_root().map(str::to_string);

        for mapping in mappings.iter() {
            let Some(include_path) = include_path_for(mapping, reference) else {
                continue;
            };

            if let Some(uri) = self.probe(&workspace_root, &include_path).await? {
                tracing::debug!(reference, %uri, "resolved via workspace root");
                return Ok(Some(uri));
            }

            if let Some(root) = &framework_root {
                let framework_base = workspace_root.join(root);
                if let Some(uri) = self.probe(&framework_base, &include_path).await? {
                    tracing::debug!(reference, %uri, "resolved via framework root");
                    return Ok(Some(uri));
                }
            }
        }

        tracing::debug!(reference, "reference did not resolve under any mapping");
        Ok(None)
    }

    /// Probes one candidate location: cached document first, then the
    /// filesystem (loading on a hit).
    async fn probe(&mut self, root: &Path, include_path: &str) -> Result<Option<Uri>> {
        let location = lexical_join(root, include_path);
        let uri = Uri::from_path(&location);

        if self.documents.get(&uri).is_some_and(Document::is_loaded) {
            return Ok(Some(uri));
        }

        let is_file = tokio::fs::metadata(&location)
            .await
            .map(|metadata| metadata.is_file())
            .unwrap_or(false);
        if !is_file {
            return Ok(None);
        }

        self.set_text(&uri, None).await?;
        Ok(Some(uri))
    }

    /// The sole mutation point for document content.
    ///
    /// Reads from disk when no text is given - the one operation in this
    /// crate whose I/O error propagates. Text, tree, and locals are computed
    /// first and assigned together with no await in between, so partially
    /// reparsed state is never observable.
    async fn set_text(&mut self, uri: &Uri, text: Option<String>) -> Result<()> {
        let text = match text {
            Some(text) => text,
            None => {
                let path = uri.to_path();
                tokio::fs::read_to_string(&path)
                    .await
                    .map_err(|source| TwigpathError::DocumentRead { path, source })?
            }
        };

        let tree = self.parser.parse(&text);
        let locals = self.collector.collect(&tree, self.type_resolver.as_deref());

        let document =
            self.documents.entry(uri.clone()).or_insert_with(|| Document::new(uri.clone()));
        document.text = Some(text);
        document.tree = Some(tree);
        document.locals = locals;
        tracing::debug!(%uri, "loaded document");
        Ok(())
    }
}

impl fmt::Debug for DocumentCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentCache")
            .field("documents", &self.documents.len())
            .field("mappings", &self.mappings)
            .finish_non_exhaustive()
    }
}

/// Computes the include path for `reference` under `mapping`, or `None` when
/// the namespace does not prefix the reference.
///
/// The empty namespace joins the reference under the mapping directory; a
/// named namespace is textually replaced by it.
fn include_path_for(mapping: &NamespaceMapping, reference: &str) -> Option<String> {
    if mapping.is_default_namespace() {
        if mapping.directory.is_empty() {
            return Some(reference.to_string());
        }
        return Some(format!("{}/{}", mapping.directory, reference));
    }

    let rest = reference.strip_prefix(&mapping.namespace)?;
    Some(format!("{}{}", mapping.directory, rest))
}
