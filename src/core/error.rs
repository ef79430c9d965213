//! Error handling for twigpath
//!
//! The crate deliberately keeps its error surface narrow. Unresolved template
//! references and malformed mapping directories are *values* (`Ok(None)` and
//! best-effort normalized strings respectively), never errors: a typo in an
//! editor setting must not take down a whole request pipeline. What remains
//! fallible is:
//!
//! - reading a document from disk while loading it into the cache, and
//! - decoding a framework introspection payload handed in by the caller.
//!
//! Public entry points wrap these in [`anyhow::Error`] with call-site context;
//! [`TwigpathError`] is the typed layer underneath for callers that need to
//! match on the failure mode.

use std::path::PathBuf;
use thiserror::Error;

/// The error type for twigpath operations.
///
/// Each variant represents a specific failure mode.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TwigpathError {
    /// A document load read from disk and the read failed.
    ///
    /// This is the expected shape for "file vanished between discovery and
    /// read"; callers should treat the document as unavailable rather than
    /// abort the surrounding request.
    #[error("failed to read template at {path}: {source}")]
    DocumentRead {
        /// The filesystem location the cache tried to read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A framework introspection payload could not be decoded.
    #[error("invalid framework environment payload: {0}")]
    EnvironmentPayload(#[from] serde_json::Error),
}
