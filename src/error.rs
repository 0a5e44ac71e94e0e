use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced at the library boundary.
///
/// Rule-execution faults inside an analysis run are not errors in this
/// sense; they are reported out-of-band via [`crate::diagnostics::RuleFault`]
/// so that a single misbehaving rule never aborts the run.
#[derive(Debug, Error)]
pub enum Error {
    /// The source text could not be parsed into a Python module.
    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// A source file could not be read.
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
