//! Cross-platform path utilities.
//!
//! Mapping directories arrive from two unreliable sources: framework
//! introspection output (which reports paths relative to whatever the
//! framework considers its root, sometimes with a stray leading separator)
//! and user-typed editor settings (which may use backslashes or point at
//! directories that do not exist). This module reconciles both against
//! filesystem reality.
//!
//! All stored and compared paths use forward slashes regardless of platform,
//! so mapping tables and cache keys are identical across Windows and Unix.

pub mod paths;

pub use paths::{extract_framework_root, lexical_join, normalize_directory, normalize_separators};
