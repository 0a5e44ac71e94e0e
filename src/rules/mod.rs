//! Rule registry.
//!
//! The rule set is closed and known at build time. `RuleId::ALL` fixes the
//! order in which per-rule diagnostics are concatenated into the final
//! report, so repeated runs on identical input produce identical output.

pub mod optimization;
pub mod security;

use crate::diagnostics::Category;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleId {
    DangerousCall,
    RiskyImport,
    ShellSubprocess,
    UnsafeDeserialization,
    UnsafeYamlLoad,
    HardcodedSecret,
    WeakHash,
    UnusedImport,
    UnreachableCode,
    StringConcatInLoop,
    LenCallInLoop,
    RangeLenPattern,
    AppendInLoop,
    UnusedVariable,
}

impl RuleId {
    /// Registry order; declaration order and discriminant order match.
    pub const ALL: [RuleId; 14] = [
        RuleId::DangerousCall,
        RuleId::RiskyImport,
        RuleId::ShellSubprocess,
        RuleId::UnsafeDeserialization,
        RuleId::UnsafeYamlLoad,
        RuleId::HardcodedSecret,
        RuleId::WeakHash,
        RuleId::UnusedImport,
        RuleId::UnreachableCode,
        RuleId::StringConcatInLoop,
        RuleId::LenCallInLoop,
        RuleId::RangeLenPattern,
        RuleId::AppendInLoop,
        RuleId::UnusedVariable,
    ];

    pub fn name(self) -> &'static str {
        match self {
            RuleId::DangerousCall => "dangerous-call",
            RuleId::RiskyImport => "risky-import",
            RuleId::ShellSubprocess => "shell-subprocess",
            RuleId::UnsafeDeserialization => "unsafe-deserialization",
            RuleId::UnsafeYamlLoad => "unsafe-yaml-load",
            RuleId::HardcodedSecret => "hardcoded-secret",
            RuleId::WeakHash => "weak-hash",
            RuleId::UnusedImport => "unused-import",
            RuleId::UnreachableCode => "unreachable-code",
            RuleId::StringConcatInLoop => "string-concat-in-loop",
            RuleId::LenCallInLoop => "len-call-in-loop",
            RuleId::RangeLenPattern => "range-len-pattern",
            RuleId::AppendInLoop => "append-in-loop",
            RuleId::UnusedVariable => "unused-variable",
        }
    }

    pub fn category(self) -> Category {
        match self {
            RuleId::DangerousCall
            | RuleId::RiskyImport
            | RuleId::ShellSubprocess
            | RuleId::UnsafeDeserialization
            | RuleId::UnsafeYamlLoad
            | RuleId::HardcodedSecret
            | RuleId::WeakHash => Category::Security,
            RuleId::UnusedImport
            | RuleId::UnreachableCode
            | RuleId::StringConcatInLoop
            | RuleId::LenCallInLoop
            | RuleId::RangeLenPattern
            | RuleId::AppendInLoop
            | RuleId::UnusedVariable => Category::Optimization,
        }
    }
}

/// Which rule categories an analysis run executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleSet {
    security: bool,
    optimization: bool,
}

impl RuleSet {
    pub fn all() -> Self {
        Self {
            security: true,
            optimization: true,
        }
    }

    pub fn security_only() -> Self {
        Self {
            security: true,
            optimization: false,
        }
    }

    pub fn optimization_only() -> Self {
        Self {
            security: false,
            optimization: true,
        }
    }

    pub fn enabled(self, rule: RuleId) -> bool {
        match rule.category() {
            Category::Security => self.security,
            Category::Optimization => self.optimization,
        }
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discriminants_match_registry_order() {
        for (index, rule) in RuleId::ALL.iter().enumerate() {
            assert_eq!(*rule as usize, index);
        }
    }

    #[test]
    fn rule_set_filters_by_category() {
        let security = RuleSet::security_only();
        assert!(security.enabled(RuleId::DangerousCall));
        assert!(!security.enabled(RuleId::UnusedImport));

        let optimization = RuleSet::optimization_only();
        assert!(!optimization.enabled(RuleId::WeakHash));
        assert!(optimization.enabled(RuleId::AppendInLoop));
    }
}
