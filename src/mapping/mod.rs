//! The effective, normalized mapping table.
//!
//! [`MappingTable`] memoizes the concatenation of framework-reported and
//! user-declared namespace mappings, with every directory pushed through
//! [`crate::utils::normalize_directory`] exactly once per rebuild. The memo
//! is a pure cache, never a source of truth: any change to the inputs goes
//! through [`MappingTable::replace`], which drops the memo, and the next
//! [`MappingTable::effective_mappings`] call rebuilds lazily.
//!
//! Invalidation is funneled through a single entry point on purpose; there
//! is no staleness detection, so correctness rests on every configuration
//! mutation path calling it.

use crate::config::{FrameworkEnvironment, NamespaceMapping};
use crate::utils::normalize_directory;
use std::path::PathBuf;
use std::sync::Arc;

/// Ordered, normalized namespace mappings for the current configuration.
///
/// Framework mappings come first, user mappings after them. Callers scan
/// front-to-back and take the first namespace match, so ordering *is*
/// precedence; duplicate namespaces are legal and all duplicates get their
/// turn when earlier ones fail existence checks.
#[derive(Debug)]
pub struct MappingTable {
    workspace_root: PathBuf,
    framework_mappings: Vec<NamespaceMapping>,
    user_mappings: Vec<NamespaceMapping>,
    framework_root: Option<String>,
    effective: Option<Arc<[NamespaceMapping]>>,
}

impl MappingTable {
    /// Creates an empty table rooted at `workspace_root`.
    #[must_use]
    pub fn new(workspace_root: PathBuf) -> Self {
        Self {
            workspace_root,
            framework_mappings: Vec::new(),
            user_mappings: Vec::new(),
            framework_root: None,
            effective: None,
        }
    }

    /// Replaces every input at once and invalidates the memo.
    pub fn replace(
        &mut self,
        environment: &FrameworkEnvironment,
        user_mappings: Vec<NamespaceMapping>,
        framework_root: Option<String>,
    ) {
        self.framework_mappings = environment.template_mappings.clone();
        self.user_mappings = user_mappings;
        self.framework_root = framework_root;
        self.invalidate();
    }

    /// Drops the memoized table; the next lookup rebuilds it.
    pub fn invalidate(&mut self) {
        self.effective = None;
    }

    /// The configured framework root offset, if any.
    #[must_use]
    pub fn framework_root(&self) -> Option<&str> {
        self.framework_root.as_deref()
    }

    /// The workspace root the table normalizes against.
    #[must_use]
    pub fn workspace_root(&self) -> &std::path::Path {
        &self.workspace_root
    }

    /// Returns the effective mapping list, rebuilding it if the memo is
    /// empty.
    ///
    /// The list is shared behind an [`Arc`] so callers can iterate it while
    /// mutating the owning cache (loading documents mid-scan) without
    /// holding a borrow of the table.
    pub fn effective_mappings(&mut self) -> Arc<[NamespaceMapping]> {
        if let Some(effective) = &self.effective {
            return Arc::clone(effective);
        }

        let framework_root = self.framework_root.as_deref();
        let effective: Arc<[NamespaceMapping]> = self
            .framework_mappings
            .iter()
            .chain(self.user_mappings.iter())
            .map(|mapping| NamespaceMapping {
                namespace: mapping.namespace.clone(),
                directory: normalize_directory(
                    &mapping.directory,
                    &self.workspace_root,
                    framework_root,
                ),
            })
            .collect();

        tracing::debug!(mappings = effective.len(), "rebuilt effective mapping table");
        self.effective = Some(Arc::clone(&effective));
        effective
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn environment(mappings: Vec<NamespaceMapping>) -> FrameworkEnvironment {
        FrameworkEnvironment {
            template_mappings: mappings,
            routes: serde_json::Value::Null,
        }
    }

    #[test]
    fn framework_mappings_come_before_user_mappings() {
        let ws = TempDir::new().unwrap();
        let mut table = MappingTable::new(ws.path().to_path_buf());
        table.replace(
            &environment(vec![NamespaceMapping::new("@Acme", "framework/acme")]),
            vec![NamespaceMapping::new("@Acme", "user/acme")],
            None,
        );

        let effective = table.effective_mappings();
        assert_eq!(effective.len(), 2);
        assert_eq!(effective[0].directory, "framework/acme");
        assert_eq!(effective[1].directory, "user/acme");
    }

    #[test]
    fn directories_are_normalized_on_rebuild() {
        let ws = TempDir::new().unwrap();
        std::fs::create_dir_all(ws.path().join("app/views")).unwrap();
        let mut table = MappingTable::new(ws.path().to_path_buf());
        table.replace(
            &environment(vec![NamespaceMapping::new("", "/templates")]),
            vec![NamespaceMapping::new("@App", "views")],
            Some("app".to_string()),
        );

        let effective = table.effective_mappings();
        assert_eq!(effective[0].directory, "templates");
        assert_eq!(effective[1].directory, "app/views");
    }

    #[test]
    fn memo_is_reused_until_invalidated() {
        let ws = TempDir::new().unwrap();
        let mut table = MappingTable::new(ws.path().to_path_buf());
        table.replace(&environment(vec![NamespaceMapping::new("", "templates")]), vec![], None);

        let first = table.effective_mappings();
        let second = table.effective_mappings();
        // Same allocation: the second call did not rebuild or re-probe.
        assert!(Arc::ptr_eq(&first, &second));

        table.invalidate();
        let third = table.effective_mappings();
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(*first, *third);
    }

    #[test]
    fn replace_reflects_new_inputs_exactly() {
        let ws = TempDir::new().unwrap();
        let mut table = MappingTable::new(ws.path().to_path_buf());
        table.replace(&environment(vec![NamespaceMapping::new("@Old", "old")]), vec![], None);
        let before = table.effective_mappings();
        assert_eq!(before[0].namespace, "@Old");

        table.replace(
            &environment(vec![NamespaceMapping::new("@New", "new")]),
            vec![NamespaceMapping::new("", "templates")],
            None,
        );
        let after = table.effective_mappings();
        // No leaked prior mappings.
        assert_eq!(after.len(), 2);
        assert_eq!(after[0].namespace, "@New");
        assert_eq!(after[1].namespace, "");
    }
}
