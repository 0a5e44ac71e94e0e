//! Structured diagnostic records.
//!
//! Rules emit [`Diagnostic`] values rather than formatted strings; rendering
//! is deferred to the `Display` impl (and the output writers) so that tests
//! and tool consumers can match on structured fields.

use serde::Serialize;
use std::fmt;

/// The two diagnostic categories this tool reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    Security,
    Optimization,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Security => f.write_str("Security"),
            Category::Optimization => f.write_str("Optimization"),
        }
    }
}

/// One detected anti-pattern, immutable once created.
///
/// `code` is a fixed static reference tag carried by a few security rules
/// (e.g. a CVE identifier). `line` is the 1-based line of the triggering
/// node in the original source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub category: Category,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
    pub line: usize,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
}

impl Diagnostic {
    pub fn security(line: usize, message: impl Into<String>) -> Self {
        Self::new(Category::Security, line, message)
    }

    pub fn optimization(line: usize, message: impl Into<String>) -> Self {
        Self::new(Category::Optimization, line, message)
    }

    fn new(category: Category, line: usize, message: impl Into<String>) -> Self {
        Self {
            category,
            code: None,
            line,
            message: message.into(),
            remediation: None,
        }
    }

    pub fn with_code(mut self, code: &'static str) -> Self {
        self.code = Some(code);
        self
    }

    pub fn with_remediation(mut self, remediation: impl Into<String>) -> Self {
        self.remediation = Some(remediation.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    /// Renders as `[Category][code] Line N: message Remediation`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.category)?;
        if let Some(code) = self.code {
            write!(f, "[{code}]")?;
        }
        write!(f, " Line {}: {}", self.line, self.message)?;
        if let Some(remediation) = &self.remediation {
            write!(f, " {remediation}")?;
        }
        Ok(())
    }
}

/// A rule that failed mid-run.
///
/// Faults are kept out of the diagnostic stream; a faulted rule contributes
/// zero diagnostics for the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleFault {
    pub rule: &'static str,
    pub message: String,
}

/// The result of one `analyze` call.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Analysis {
    pub diagnostics: Vec<Diagnostic>,
    pub faults: Vec<RuleFault>,
}

impl Analysis {
    pub fn has_findings(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}
