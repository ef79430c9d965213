//! Directory normalization heuristics.
//!
//! [`normalize_directory`] is a chain of existence-probed fallbacks, not a
//! guaranteed-correct resolver: the filesystem is the oracle, and when it has
//! no answer the function degrades to a best-effort relative path. Failures
//! surface later at lookup time, never here: the function always returns a
//! string and never errors.

use std::path::Path;

/// Converts all backslash separators to forward slashes.
///
/// Every path this crate stores or compares textually goes through this
/// first, so mapping tables and cache keys come out identical on Windows and
/// Unix.
///
/// # Examples
///
/// ```
/// use twigpath::utils::normalize_separators;
///
/// assert_eq!(normalize_separators("vendor\\acme\\views"), "vendor/acme/views");
/// assert_eq!(normalize_separators("templates/partials"), "templates/partials");
/// ```
#[must_use]
pub fn normalize_separators(raw: &str) -> String {
    raw.replace('\\', "/")
}

/// Normalizes one raw mapping directory against the workspace.
///
/// `raw` is a directory string as reported by framework introspection or
/// typed by a user. The result is a forward-slash path that is either
/// workspace-relative or a trusted external absolute path, chosen by probing
/// the filesystem:
///
/// 1. Separators are normalized; a leading separator on a path that is not
///    well-formed absolute for the host is treated as a mistake and stripped.
/// 2. A well-formed absolute path that exists is returned as-is, or made
///    workspace-relative when it sits inside `workspace_root`.
/// 3. A non-existing absolute path is retried with the leading separator
///    stripped, first under `workspace_root`, then under
///    `workspace_root/framework_root` when a framework root is configured.
/// 4. A relative path that is missing under `workspace_root` is retried under
///    the framework root the same way.
/// 5. Anything still unaccounted for is returned in its stripped relative
///    form regardless of existence.
///
/// # Examples
///
/// ```no_run
/// use twigpath::utils::normalize_directory;
/// use std::path::Path;
///
/// let ws = Path::new("/work/project");
/// // Framework reported "/templates" but meant the workspace-relative dir.
/// assert_eq!(normalize_directory("/templates", ws, None), "templates");
/// // User typed backslashes.
/// assert_eq!(normalize_directory("vendor\\templates", ws, None), "vendor/templates");
/// ```
#[must_use]
pub fn normalize_directory(raw: &str, workspace_root: &Path, framework_root: Option<&str>) -> String {
    let mut candidate = normalize_separators(raw);

    // A leading separator on a path the host does not consider absolute
    // (e.g. "\templates" on Windows after separator normalization) marks a
    // relative path mistakenly prefixed.
    if candidate.starts_with('/') && !Path::new(&candidate).is_absolute() {
        candidate = strip_leading_separators(&candidate);
    }

    if Path::new(&candidate).is_absolute() {
        return normalize_absolute(candidate, workspace_root, framework_root);
    }

    // Relative path missing under the workspace: the framework root is the
    // remaining place it could live.
    if !workspace_root.join(&candidate).exists() {
        if let Some(root) = framework_root {
            let under_framework = format!("{root}/{candidate}");
            if workspace_root.join(&under_framework).exists() {
                return under_framework;
            }
        }
    }

    candidate
}

/// Resolves a well-formed absolute directory candidate against the workspace.
fn normalize_absolute(candidate: String, workspace_root: &Path, framework_root: Option<&str>) -> String {
    if Path::new(&candidate).exists() {
        if let Some(relative) = strip_workspace_prefix(&candidate, workspace_root) {
            return relative;
        }
        // An existing absolute path outside the workspace is trusted as-is.
        return candidate;
    }

    // The absolute path does not exist; retry it as workspace-relative.
    let stripped = strip_leading_separators(&candidate);
    if workspace_root.join(&stripped).exists() {
        return stripped;
    }

    if let Some(root) = framework_root {
        let under_framework = format!("{root}/{stripped}");
        if workspace_root.join(&under_framework).exists() {
            return under_framework;
        }
    }

    tracing::warn!(
        directory = %candidate,
        "mapping directory not found under any search root, keeping best-effort relative form"
    );
    stripped
}

/// Makes `candidate` workspace-relative when it sits inside `workspace_root`,
/// by textual prefix match on the normalized forms.
fn strip_workspace_prefix(candidate: &str, workspace_root: &Path) -> Option<String> {
    let root = normalize_separators(&workspace_root.to_string_lossy());
    let root = root.trim_end_matches('/');
    let rest = candidate.strip_prefix(root)?;
    if rest.is_empty() {
        return Some(String::new());
    }
    // Reject sibling directories that merely share a textual prefix
    // ("/work/project" vs "/work/project-legacy").
    if !rest.starts_with('/') {
        return None;
    }
    Some(strip_leading_separators(rest))
}

fn strip_leading_separators(candidate: &str) -> String {
    candidate.trim_start_matches('/').to_string()
}

/// Joins a relative reference onto a root and normalizes the result
/// lexically.
///
/// `.` and `..` components are folded without touching the filesystem, so
/// two references spelling the same location produce the same path (and
/// therefore the same cache key). `..` at the root is dropped rather than
/// escaping it.
#[must_use]
pub fn lexical_join(root: &std::path::Path, reference: &str) -> std::path::PathBuf {
    use std::path::Component;

    let mut result = std::path::PathBuf::new();
    for component in root.join(normalize_separators(reference)).components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                result.pop();
            }
            other => result.push(other),
        }
    }
    result
}

/// Extracts the framework root offset from a console entry-point path.
///
/// A host framework is conventionally entered through `<root>/bin/console`;
/// when the workspace holds the framework in a subdirectory, `<root>` is the
/// offset every resolution fallback must also search. Returns `None` when the
/// path does not end in `bin/console` or the offset is empty.
///
/// # Examples
///
/// ```
/// use twigpath::utils::extract_framework_root;
///
/// assert_eq!(extract_framework_root("app/bin/console"), Some("app".to_string()));
/// assert_eq!(extract_framework_root("apps/main/bin/console"), Some("apps/main".to_string()));
/// assert_eq!(extract_framework_root("bin/console"), None);
/// assert_eq!(extract_framework_root("console.php"), None);
/// ```
#[must_use]
pub fn extract_framework_root(console_path: &str) -> Option<String> {
    let normalized = normalize_separators(console_path);
    let root = normalized.strip_suffix("bin/console")?;

    // "sbin/console" is not a bin/console entry point.
    if !root.is_empty() && !root.ends_with('/') {
        return None;
    }

    let root = root.trim_end_matches('/');
    let is_absolute = root.starts_with('/');

    // Fold "." segments so "app/./bin/console" yields "app", not "app/.".
    let segments: Vec<&str> =
        root.split('/').filter(|segment| !segment.is_empty() && *segment != ".").collect();
    if segments.is_empty() {
        return None;
    }

    let joined = segments.join("/");
    Some(if is_absolute { format!("/{joined}") } else { joined })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn separators_become_forward_slashes() {
        assert_eq!(normalize_separators("a\\b\\c"), "a/b/c");
        assert_eq!(normalize_separators("a/b/c"), "a/b/c");
        assert_eq!(normalize_separators(""), "");
    }

    #[test]
    fn existing_relative_directory_is_unchanged() {
        let ws = TempDir::new().unwrap();
        std::fs::create_dir_all(ws.path().join("templates")).unwrap();

        assert_eq!(normalize_directory("templates", ws.path(), None), "templates");
    }

    #[test]
    fn missing_absolute_path_falls_back_to_stripped_form() {
        let ws = TempDir::new().unwrap();

        // "/templates" is treated as absolute on Unix but does not exist,
        // and neither does ws/templates: best-effort stripped form.
        assert_eq!(normalize_directory("/templates", ws.path(), None), "templates");
    }

    #[test]
    fn backslashes_are_normalized() {
        let ws = TempDir::new().unwrap();

        assert_eq!(normalize_directory("vendor\\templates", ws.path(), None), "vendor/templates");
        assert_eq!(normalize_directory("/vendor\\templates", ws.path(), None), "vendor/templates");
    }

    #[test]
    fn missing_absolute_path_found_under_workspace() {
        let ws = TempDir::new().unwrap();
        std::fs::create_dir_all(ws.path().join("only_here/views")).unwrap();

        assert_eq!(
            normalize_directory("/only_here/views", ws.path(), None),
            "only_here/views"
        );
    }

    #[test]
    fn existing_absolute_path_inside_workspace_becomes_relative() {
        let ws = TempDir::new().unwrap();
        std::fs::create_dir_all(ws.path().join("templates")).unwrap();
        let absolute = ws.path().join("templates").to_string_lossy().to_string();

        assert_eq!(normalize_directory(&absolute, ws.path(), None), "templates");
    }

    #[test]
    fn existing_absolute_path_outside_workspace_is_trusted() {
        let ws = TempDir::new().unwrap();
        let external = TempDir::new().unwrap();
        std::fs::create_dir_all(external.path().join("shared")).unwrap();
        let absolute = external.path().join("shared").to_string_lossy().to_string();
        let normalized = normalize_separators(&absolute);

        assert_eq!(normalize_directory(&absolute, ws.path(), None), normalized);
    }

    #[test]
    fn sibling_workspace_prefix_is_not_stripped() {
        let ws = TempDir::new().unwrap();
        let sibling = ws.path().with_file_name(format!(
            "{}-legacy",
            ws.path().file_name().unwrap().to_string_lossy()
        ));
        std::fs::create_dir_all(sibling.join("views")).unwrap();
        let absolute = sibling.join("views").to_string_lossy().to_string();

        let result = normalize_directory(&absolute, ws.path(), None);
        assert_eq!(result, normalize_separators(&absolute));

        std::fs::remove_dir_all(&sibling).unwrap();
    }

    #[test]
    fn relative_path_falls_back_to_framework_root() {
        let ws = TempDir::new().unwrap();
        std::fs::create_dir_all(ws.path().join("app/views")).unwrap();

        assert_eq!(normalize_directory("views", ws.path(), Some("app")), "app/views");
        // Without the framework root the path stays best-effort relative.
        assert_eq!(normalize_directory("views", ws.path(), None), "views");
    }

    #[test]
    fn absolute_path_falls_back_to_framework_root() {
        let ws = TempDir::new().unwrap();
        std::fs::create_dir_all(ws.path().join("app/views")).unwrap();

        assert_eq!(normalize_directory("/views", ws.path(), Some("app")), "app/views");
    }

    #[test]
    fn direct_workspace_hit_beats_framework_root() {
        let ws = TempDir::new().unwrap();
        std::fs::create_dir_all(ws.path().join("views")).unwrap();
        std::fs::create_dir_all(ws.path().join("app/views")).unwrap();

        assert_eq!(normalize_directory("views", ws.path(), Some("app")), "views");
    }

    #[test]
    fn normalization_is_idempotent() {
        let ws = TempDir::new().unwrap();
        std::fs::create_dir_all(ws.path().join("templates")).unwrap();
        std::fs::create_dir_all(ws.path().join("app/views")).unwrap();

        for raw in ["templates", "/templates", "vendor\\missing", "views", "/views"] {
            let once = normalize_directory(raw, ws.path(), Some("app"));
            let twice = normalize_directory(&once, ws.path(), Some("app"));
            assert_eq!(once, twice, "normalize({raw}) is not idempotent");
        }
    }

    #[test]
    fn lexical_join_folds_dot_components() {
        use std::path::{Path, PathBuf};

        assert_eq!(
            lexical_join(Path::new("/work/project"), "templates/./partials/../header.twig"),
            PathBuf::from("/work/project/templates/header.twig")
        );
        assert_eq!(
            lexical_join(Path::new("/work/project"), "a\\b.twig"),
            PathBuf::from("/work/project/a/b.twig")
        );
    }

    #[test]
    fn framework_root_from_console_path() {
        assert_eq!(extract_framework_root("bin/console"), None);
        assert_eq!(extract_framework_root("./bin/console"), None);
        assert_eq!(extract_framework_root("app/bin/console"), Some("app".to_string()));
        assert_eq!(extract_framework_root("apps/main/bin/console"), Some("apps/main".to_string()));
        assert_eq!(extract_framework_root("app\\bin\\console"), Some("app".to_string()));
        assert_eq!(extract_framework_root(""), None);
        assert_eq!(extract_framework_root("console.php"), None);
        assert_eq!(extract_framework_root("sbin/console"), None);
    }

    #[test]
    fn framework_root_folds_dot_segments() {
        assert_eq!(extract_framework_root("app/./bin/console"), Some("app".to_string()));
        assert_eq!(extract_framework_root("././bin/console"), None);
        assert_eq!(extract_framework_root("./apps/./main/bin/console"), Some("apps/main".to_string()));
        assert_eq!(extract_framework_root("/srv/app/bin/console"), Some("/srv/app".to_string()));
    }
}
