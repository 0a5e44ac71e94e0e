//! Security and performance linter for Python source files.
//!
//! The library analyzes one already-parsed module at a time and reports
//! anti-patterns as structured [`Diagnostic`] records: dangerous calls,
//! risky imports, weak hashing, hard-coded secrets, unreachable code,
//! unused bindings, and loop-unfriendly idioms.
//!
//! ```
//! let analysis = pyaudit::analyze_source(
//!     "import os\nimport sys\nprint(os.getcwd())\n",
//!     "demo.py",
//! )
//! .unwrap();
//!
//! let rendered: Vec<String> = analysis.diagnostics.iter().map(|d| d.to_string()).collect();
//! assert_eq!(
//!     rendered,
//!     vec!["[Optimization] Line 2: Imported name 'sys' is never used.".to_string()]
//! );
//! ```

pub mod analyzer;
pub mod cli;
pub mod diagnostics;
pub mod error;
pub mod io;
pub mod parse;
pub mod rules;

pub use crate::analyzer::Analyzer;
pub use crate::diagnostics::{Analysis, Category, Diagnostic, RuleFault};
pub use crate::error::Error;
pub use crate::parse::{parse_module, LineIndex, ParsedModule};
pub use crate::rules::{RuleId, RuleSet};

/// Parse and analyze one source unit with the full rule set.
pub fn analyze_source(
    source: &str,
    path: impl AsRef<std::path::Path>,
) -> Result<Analysis, Error> {
    let parsed = parse_module(source, path)?;
    Ok(Analyzer::new().analyze_parsed(&parsed))
}
