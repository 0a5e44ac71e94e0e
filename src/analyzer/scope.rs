//! Definition/use tracking across the lexical scope chain.
//!
//! A scope frame is pushed for the module root and for every function body.
//! Bindings live in the innermost frame; reads walk the chain from the
//! innermost frame outwards. Unused symbols are drained when their frame is
//! popped.

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Module,
    Function,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    Import,
    Assignment,
}

#[derive(Debug)]
struct Symbol {
    definition_line: usize,
    used: bool,
    kind: BindingKind,
}

#[derive(Debug)]
struct Scope {
    #[allow(dead_code)]
    kind: ScopeKind,
    symbols: HashMap<String, Symbol>,
}

/// A symbol that was still unused when its scope was popped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnusedSymbol {
    pub name: String,
    pub definition_line: usize,
    pub kind: BindingKind,
}

#[derive(Debug, Default)]
pub struct ScopeTracker {
    scopes: Vec<Scope>,
}

impl ScopeTracker {
    pub fn new() -> Self {
        Self { scopes: Vec::new() }
    }

    pub fn enter_scope(&mut self, kind: ScopeKind) {
        self.scopes.push(Scope {
            kind,
            symbols: HashMap::new(),
        });
    }

    /// Create or overwrite a binding in the innermost scope.
    ///
    /// Rebinding updates the definition line but never resets `used`: a
    /// symbol that has been read stays used for the rest of its scope.
    pub fn bind(&mut self, name: &str, line: usize, kind: BindingKind) {
        let Some(scope) = self.scopes.last_mut() else {
            return;
        };
        scope
            .symbols
            .entry(name.to_string())
            .and_modify(|symbol| {
                symbol.definition_line = line;
                symbol.kind = kind;
            })
            .or_insert(Symbol {
                definition_line: line,
                used: false,
                kind,
            });
    }

    /// Resolve a read through the scope chain, innermost first.
    ///
    /// Unresolved names are not errors; builtins and externally provided
    /// names simply resolve to nothing.
    pub fn reference(&mut self, name: &str) {
        for scope in self.scopes.iter_mut().rev() {
            if let Some(symbol) = scope.symbols.get_mut(name) {
                symbol.used = true;
                return;
            }
        }
    }

    /// Pop the innermost scope, yielding its unused symbols in line order.
    ///
    /// Underscore-prefixed names are exempt from unused reporting.
    pub fn exit_scope(&mut self) -> Vec<UnusedSymbol> {
        let Some(scope) = self.scopes.pop() else {
            return Vec::new();
        };
        let mut unused: Vec<UnusedSymbol> = scope
            .symbols
            .into_iter()
            .filter(|(name, symbol)| !symbol.used && !name.starts_with('_'))
            .map(|(name, symbol)| UnusedSymbol {
                name,
                definition_line: symbol.definition_line,
                kind: symbol.kind,
            })
            .collect();
        unused.sort_by(|a, b| {
            (a.definition_line, a.name.as_str()).cmp(&(b.definition_line, b.name.as_str()))
        });
        unused
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn unused_names(tracker: &mut ScopeTracker) -> Vec<String> {
        tracker
            .exit_scope()
            .into_iter()
            .map(|symbol| symbol.name)
            .collect()
    }

    #[test]
    fn unreferenced_binding_is_reported() {
        let mut tracker = ScopeTracker::new();
        tracker.enter_scope(ScopeKind::Module);
        tracker.bind("x", 1, BindingKind::Assignment);
        tracker.bind("y", 2, BindingKind::Assignment);
        tracker.reference("x");
        assert_eq!(unused_names(&mut tracker), vec!["y"]);
    }

    #[test]
    fn rebinding_preserves_used_and_updates_line() {
        let mut tracker = ScopeTracker::new();
        tracker.enter_scope(ScopeKind::Module);
        tracker.bind("x", 1, BindingKind::Assignment);
        tracker.reference("x");
        tracker.bind("x", 5, BindingKind::Assignment);
        assert_eq!(tracker.exit_scope(), vec![]);
    }

    #[test]
    fn unused_rebinding_reports_last_line() {
        let mut tracker = ScopeTracker::new();
        tracker.enter_scope(ScopeKind::Module);
        tracker.bind("x", 1, BindingKind::Assignment);
        tracker.bind("x", 4, BindingKind::Assignment);
        let unused = tracker.exit_scope();
        assert_eq!(unused.len(), 1);
        assert_eq!(unused[0].definition_line, 4);
    }

    #[test]
    fn reads_resolve_through_the_chain() {
        let mut tracker = ScopeTracker::new();
        tracker.enter_scope(ScopeKind::Module);
        tracker.bind("outer", 1, BindingKind::Import);
        tracker.enter_scope(ScopeKind::Function);
        tracker.reference("outer");
        assert_eq!(tracker.exit_scope(), vec![]);
        assert_eq!(tracker.exit_scope(), vec![]);
    }

    #[test]
    fn inner_binding_shadows_outer() {
        let mut tracker = ScopeTracker::new();
        tracker.enter_scope(ScopeKind::Module);
        tracker.bind("x", 1, BindingKind::Assignment);
        tracker.enter_scope(ScopeKind::Function);
        tracker.bind("x", 3, BindingKind::Assignment);
        tracker.reference("x");
        assert_eq!(tracker.exit_scope(), vec![]);
        let outer = tracker.exit_scope();
        assert_eq!(outer.len(), 1);
        assert_eq!(outer[0].definition_line, 1);
    }

    #[test]
    fn underscore_names_are_exempt() {
        let mut tracker = ScopeTracker::new();
        tracker.enter_scope(ScopeKind::Module);
        tracker.bind("_scratch", 1, BindingKind::Assignment);
        tracker.bind("_", 2, BindingKind::Assignment);
        assert_eq!(tracker.exit_scope(), vec![]);
    }

    #[test]
    fn unresolved_reference_is_a_no_op() {
        let mut tracker = ScopeTracker::new();
        tracker.enter_scope(ScopeKind::Module);
        tracker.reference("print");
        tracker.bind("print", 3, BindingKind::Assignment);
        let unused = tracker.exit_scope();
        assert_eq!(unused.len(), 1);
        assert_eq!(unused[0].name, "print");
    }

    #[test]
    fn drain_is_sorted_by_line() {
        let mut tracker = ScopeTracker::new();
        tracker.enter_scope(ScopeKind::Module);
        tracker.bind("b", 4, BindingKind::Assignment);
        tracker.bind("a", 2, BindingKind::Import);
        tracker.bind("c", 4, BindingKind::Assignment);
        assert_eq!(unused_names(&mut tracker), vec!["a", "b", "c"]);
    }
}
