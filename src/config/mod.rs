//! Configuration inputs for template resolution.
//!
//! Two layers feed the effective mapping table:
//!
//! 1. **Framework-reported mappings** - obtained by introspecting the host
//!    framework; they arrive as part of a JSON payload
//!    ([`FrameworkEnvironment`]) alongside data this crate stores but never
//!    interprets.
//! 2. **User-declared mappings** - typed into editor settings, either as an
//!    ordered list or as a `{namespace: directory}` map.
//!
//! Framework mappings are consulted first and user mappings after them;
//! within the effective table, precedence is purely positional. Namespaces
//! are *not* unique: two mappings may share a namespace and both will be
//! tried in order, which is how user overrides shadow framework defaults
//! without replacing them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One association between a template namespace and a directory on disk.
///
/// `namespace` is either the empty string (the default namespace, matched by
/// plain references like `partials/header.twig`) or a token beginning with
/// `@` (matched by references like `@Acme/partial.twig`). `directory` is a
/// workspace-relative or absolute path; it is normalized by the mapping
/// table before use, so raw values straight from introspection output or
/// user settings are acceptable here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceMapping {
    /// The symbolic prefix, e.g. `@Acme`, or `""` for the default namespace.
    #[serde(default)]
    pub namespace: String,
    /// The directory realizing the namespace on disk.
    pub directory: String,
}

impl NamespaceMapping {
    /// Creates a mapping from a namespace and a raw directory.
    pub fn new(namespace: impl Into<String>, directory: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            directory: directory.into(),
        }
    }

    /// Whether this mapping serves the default (empty) namespace.
    #[must_use]
    pub fn is_default_namespace(&self) -> bool {
        self.namespace.is_empty()
    }
}

/// The framework introspection payload.
///
/// Produced outside this crate by running the framework's debug tooling and
/// decoding its JSON output. Only `template_mappings` matters for
/// resolution; `routes` is carried opaquely for other consumers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrameworkEnvironment {
    /// Namespace mappings as reported by the framework, in declaration order.
    #[serde(default)]
    pub template_mappings: Vec<NamespaceMapping>,
    /// Route and environment data this core stores but never interprets.
    #[serde(default)]
    pub routes: serde_json::Value,
}

impl FrameworkEnvironment {
    /// Decodes an introspection payload from raw JSON text.
    pub fn from_json(payload: &str) -> Result<Self, crate::core::TwigpathError> {
        Ok(serde_json::from_str(payload)?)
    }
}

/// Converts an editor-style `{namespace: directory}` settings map into an
/// ordered mapping list.
///
/// JSON objects carry no reliable order, so the map is sorted by namespace
/// (the `BTreeMap` key order) to keep the resulting precedence deterministic
/// across sessions. Users needing a specific precedence between same-prefix
/// namespaces should declare mappings as a list instead.
#[must_use]
pub fn mappings_from_pairs(pairs: &BTreeMap<String, String>) -> Vec<NamespaceMapping> {
    pairs
        .iter()
        .map(|(namespace, directory)| NamespaceMapping::new(namespace.clone(), directory.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_decodes_mappings_and_keeps_routes_opaque() {
        let payload = r#"{
            "template_mappings": [
                {"namespace": "", "directory": "templates"},
                {"namespace": "@Acme", "directory": "vendor/acme/views"}
            ],
            "routes": {"app_index": {"path": "/"}}
        }"#;

        let env = FrameworkEnvironment::from_json(payload).unwrap();
        assert_eq!(env.template_mappings.len(), 2);
        assert!(env.template_mappings[0].is_default_namespace());
        assert_eq!(env.template_mappings[1].namespace, "@Acme");
        assert!(env.routes.get("app_index").is_some());
    }

    #[test]
    fn missing_fields_default() {
        let env = FrameworkEnvironment::from_json("{}").unwrap();
        assert!(env.template_mappings.is_empty());
        assert!(env.routes.is_null());
    }

    #[test]
    fn malformed_payload_is_an_error() {
        assert!(FrameworkEnvironment::from_json("{oops").is_err());
    }

    #[test]
    fn pairs_become_ordered_mappings() {
        let mut pairs = BTreeMap::new();
        pairs.insert("@Zeta".to_string(), "zeta/views".to_string());
        pairs.insert("@Acme".to_string(), "acme/views".to_string());

        let mappings = mappings_from_pairs(&pairs);
        assert_eq!(mappings[0], NamespaceMapping::new("@Acme", "acme/views"));
        assert_eq!(mappings[1], NamespaceMapping::new("@Zeta", "zeta/views"));
    }
}
