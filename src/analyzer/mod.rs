//! The aggregator: one traversal, shared state, per-rule isolation.
//!
//! `Analyzer` drives a single explicit work-stack descent over the module
//! in source order. The descent updates the loop-context and scope trackers,
//! runs every applicable matcher inline, and drains unused-symbol
//! diagnostics when scopes close. The reachability pass needs no shared
//! state and runs as its own traversal afterwards.
//!
//! Diagnostics accumulate in per-rule buckets and are concatenated in
//! registry order, so output for identical input is byte-identical across
//! runs. A rule that panics is disabled for the rest of the run and
//! reported out-of-band as a [`RuleFault`]; it never takes the other rules
//! down with it.

pub mod loop_context;
pub mod reachability;
pub mod scope;

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

use log::{debug, error};
use rustpython_parser::ast::{self, Expr, ExprContext, Stmt};

use crate::diagnostics::{Analysis, Diagnostic, RuleFault};
use crate::parse::{LineIndex, ParsedModule};
use crate::rules::{optimization, security, RuleId, RuleSet};

use loop_context::LoopContext;
use scope::{BindingKind, ScopeKind, ScopeTracker};

const RULE_COUNT: usize = RuleId::ALL.len();

pub struct Analyzer {
    rules: RuleSet,
}

impl Analyzer {
    pub fn new() -> Self {
        Self::with_rules(RuleSet::all())
    }

    pub fn with_rules(rules: RuleSet) -> Self {
        Self { rules }
    }

    /// Analyze one parsed module, returning the ordered diagnostic list
    /// plus any rule faults.
    ///
    /// Each call owns fresh scope and loop state, so independent callers
    /// may analyze different trees concurrently.
    pub fn analyze(&self, module: &ast::ModModule, lines: &LineIndex) -> Analysis {
        debug!(
            "analyzing module with {} top-level statements",
            module.body.len()
        );
        let mut run = Run::new(self.rules, lines);
        run.traverse(&module.body);
        run.run_reachability(&module.body);
        run.finish()
    }

    pub fn analyze_parsed(&self, parsed: &ParsedModule) -> Analysis {
        self.analyze(&parsed.module, &parsed.lines)
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Work items for the explicit traversal stack.
///
/// Scope and loop transitions are pushed as their own steps so that they
/// fire at the right point of the source order, e.g. a `for` iterable is
/// processed before the loop body opens.
enum Step<'a> {
    Stmt(&'a Stmt),
    Expr(&'a Expr),
    Bind {
        name: &'a str,
        line: usize,
        kind: BindingKind,
    },
    EnterScope(ScopeKind),
    ExitScope,
    EnterLoop,
    ExitLoop,
}

/// Mutable state of one `analyze` call.
struct Run<'a> {
    rules: RuleSet,
    lines: &'a LineIndex,
    scope: ScopeTracker,
    loops: LoopContext,
    buckets: Vec<Vec<Diagnostic>>,
    faulted: [bool; RULE_COUNT],
    faults: Vec<RuleFault>,
}

impl<'a> Run<'a> {
    fn new(rules: RuleSet, lines: &'a LineIndex) -> Self {
        Self {
            rules,
            lines,
            scope: ScopeTracker::new(),
            loops: LoopContext::new(),
            buckets: (0..RULE_COUNT).map(|_| Vec::new()).collect(),
            faulted: [false; RULE_COUNT],
            faults: Vec::new(),
        }
    }

    fn traverse(&mut self, body: &[Stmt]) {
        let mut stack: Vec<Step> = Vec::with_capacity(64);
        stack.push(Step::ExitScope);
        push_body(&mut stack, body);
        stack.push(Step::EnterScope(ScopeKind::Module));

        while let Some(step) = stack.pop() {
            match step {
                Step::Stmt(stmt) => self.visit_stmt(stmt, &mut stack),
                Step::Expr(expr) => self.visit_expr(expr, &mut stack),
                Step::Bind { name, line, kind } => {
                    self.scope_op(|scope| scope.bind(name, line, kind));
                }
                Step::EnterScope(kind) => {
                    self.scope_op(|scope| scope.enter_scope(kind));
                }
                Step::ExitScope => self.drain_scope(),
                Step::EnterLoop => self.loops.enter_loop(),
                Step::ExitLoop => self.loops.exit_loop(),
            }
        }
    }

    fn visit_stmt<'t>(&mut self, stmt: &'t Stmt, stack: &mut Vec<Step<'t>>) {
        match stmt {
            Stmt::Import(import) => {
                let line = self.lines.line_of(import);
                for alias in &import.names {
                    self.run_rule(RuleId::RiskyImport, || security::risky_import(alias, line));
                    let bound = alias
                        .asname
                        .as_ref()
                        .map(|name| name.as_str())
                        .unwrap_or_else(|| {
                            alias.name.as_str().split('.').next().unwrap_or_default()
                        });
                    self.scope_op(|scope| scope.bind(bound, line, BindingKind::Import));
                }
            }
            Stmt::ImportFrom(import) => {
                let line = self.lines.line_of(import);
                let module = import.module.as_ref().map(|module| module.as_str());
                self.run_rule(RuleId::RiskyImport, || {
                    security::risky_import_from(module, line)
                });
                for alias in &import.names {
                    let bound = alias.asname.as_ref().unwrap_or(&alias.name).as_str();
                    if bound != "*" {
                        self.scope_op(|scope| scope.bind(bound, line, BindingKind::Import));
                    }
                }
            }
            Stmt::Assign(assign) => {
                let line = self.lines.line_of(assign);
                let in_loop = self.loops.in_loop();
                self.run_rule(RuleId::HardcodedSecret, || {
                    security::hardcoded_secret(assign, line)
                });
                self.run_rule(RuleId::StringConcatInLoop, || {
                    optimization::string_concat_in_loop(assign, in_loop, line)
                });
                if let [Expr::Name(target)] = assign.targets.as_slice() {
                    stack.push(Step::Bind {
                        name: target.id.as_str(),
                        line,
                        kind: BindingKind::Assignment,
                    });
                } else {
                    push_exprs(stack, &assign.targets);
                }
                stack.push(Step::Expr(&assign.value));
            }
            Stmt::AugAssign(assign) => {
                let line = self.lines.line_of(assign);
                let in_loop = self.loops.in_loop();
                self.run_rule(RuleId::StringConcatInLoop, || {
                    optimization::augmented_concat_in_loop(assign, in_loop, line)
                });
                // An in-place update reads its target; it does not rebind.
                if let Expr::Name(target) = &*assign.target {
                    let name = target.id.as_str();
                    self.scope_op(|scope| scope.reference(name));
                } else {
                    stack.push(Step::Expr(&assign.target));
                }
                stack.push(Step::Expr(&assign.value));
            }
            Stmt::AnnAssign(assign) => {
                match (&*assign.target, assign.value.as_deref()) {
                    (Expr::Name(target), Some(_)) => {
                        stack.push(Step::Bind {
                            name: target.id.as_str(),
                            line: self.lines.line_of(assign),
                            kind: BindingKind::Assignment,
                        });
                    }
                    (Expr::Name(_), None) => {}
                    _ => stack.push(Step::Expr(&assign.target)),
                }
                stack.push(Step::Expr(&assign.annotation));
                if let Some(value) = assign.value.as_deref() {
                    stack.push(Step::Expr(value));
                }
            }
            Stmt::For(for_stmt) => {
                let line = self.lines.line_of(for_stmt);
                self.run_rule(RuleId::RangeLenPattern, || {
                    optimization::range_len_header(for_stmt, line)
                });
                push_loop(
                    stack,
                    &for_stmt.target,
                    &for_stmt.iter,
                    &for_stmt.body,
                    &for_stmt.orelse,
                );
            }
            Stmt::AsyncFor(for_stmt) => {
                push_loop(
                    stack,
                    &for_stmt.target,
                    &for_stmt.iter,
                    &for_stmt.body,
                    &for_stmt.orelse,
                );
            }
            Stmt::While(while_stmt) => {
                push_body(stack, &while_stmt.orelse);
                stack.push(Step::ExitLoop);
                push_body(stack, &while_stmt.body);
                stack.push(Step::EnterLoop);
                stack.push(Step::Expr(&while_stmt.test));
            }
            Stmt::If(if_stmt) => {
                push_body(stack, &if_stmt.orelse);
                push_body(stack, &if_stmt.body);
                stack.push(Step::Expr(&if_stmt.test));
            }
            Stmt::FunctionDef(def) => {
                stack.push(Step::ExitScope);
                push_body(stack, &def.body);
                stack.push(Step::EnterScope(ScopeKind::Function));
                push_function_interface(stack, &def.decorator_list, &def.args, def.returns.as_deref());
            }
            Stmt::AsyncFunctionDef(def) => {
                stack.push(Step::ExitScope);
                push_body(stack, &def.body);
                stack.push(Step::EnterScope(ScopeKind::Function));
                push_function_interface(stack, &def.decorator_list, &def.args, def.returns.as_deref());
            }
            Stmt::ClassDef(def) => {
                // Scopes are module/function only; a class body shares the
                // enclosing scope.
                push_body(stack, &def.body);
                for keyword in def.keywords.iter().rev() {
                    stack.push(Step::Expr(&keyword.value));
                }
                push_exprs(stack, &def.bases);
                push_exprs(stack, &def.decorator_list);
            }
            Stmt::Return(ret) => {
                if let Some(value) = ret.value.as_deref() {
                    stack.push(Step::Expr(value));
                }
            }
            Stmt::Raise(raise) => {
                if let Some(cause) = raise.cause.as_deref() {
                    stack.push(Step::Expr(cause));
                }
                if let Some(exc) = raise.exc.as_deref() {
                    stack.push(Step::Expr(exc));
                }
            }
            Stmt::Delete(delete) => push_exprs(stack, &delete.targets),
            Stmt::Assert(assert) => {
                if let Some(msg) = assert.msg.as_deref() {
                    stack.push(Step::Expr(msg));
                }
                stack.push(Step::Expr(&assert.test));
            }
            Stmt::Expr(expr_stmt) => stack.push(Step::Expr(&expr_stmt.value)),
            Stmt::With(with_stmt) => push_with(stack, &with_stmt.items, &with_stmt.body),
            Stmt::AsyncWith(with_stmt) => push_with(stack, &with_stmt.items, &with_stmt.body),
            Stmt::Try(try_stmt) => push_try(
                stack,
                &try_stmt.body,
                &try_stmt.handlers,
                &try_stmt.orelse,
                &try_stmt.finalbody,
            ),
            Stmt::TryStar(try_stmt) => push_try(
                stack,
                &try_stmt.body,
                &try_stmt.handlers,
                &try_stmt.orelse,
                &try_stmt.finalbody,
            ),
            Stmt::Match(match_stmt) => {
                for case in match_stmt.cases.iter().rev() {
                    push_body(stack, &case.body);
                    if let Some(guard) = case.guard.as_deref() {
                        stack.push(Step::Expr(guard));
                    }
                }
                stack.push(Step::Expr(&match_stmt.subject));
            }
            _ => {}
        }
    }

    fn visit_expr<'t>(&mut self, expr: &'t Expr, stack: &mut Vec<Step<'t>>) {
        match expr {
            Expr::Call(call) => {
                let line = self.lines.line_of(call);
                let in_loop = self.loops.in_loop();
                self.run_rule(RuleId::DangerousCall, || security::dangerous_call(call, line));
                self.run_rule(RuleId::ShellSubprocess, || {
                    security::shell_enabled_subprocess(call, line)
                });
                self.run_rule(RuleId::UnsafeDeserialization, || {
                    security::unsafe_deserialization(call, line)
                });
                self.run_rule(RuleId::UnsafeYamlLoad, || {
                    security::unsafe_yaml_load(call, line)
                });
                self.run_rule(RuleId::LenCallInLoop, || {
                    optimization::len_call_in_loop(call, in_loop, line)
                });
                self.run_rule(RuleId::AppendInLoop, || {
                    optimization::append_in_loop(call, in_loop, line)
                });
            }
            Expr::Attribute(attribute) => {
                let line = self.lines.line_of(attribute);
                self.run_rule(RuleId::WeakHash, || security::weak_hash(attribute, line));
            }
            Expr::Name(name) => {
                if matches!(name.ctx, ExprContext::Load) {
                    let id = name.id.as_str();
                    self.scope_op(|scope| scope.reference(id));
                }
                return;
            }
            _ => {}
        }
        push_expr_children(stack, expr);
    }

    /// Invoke one stateless matcher behind the per-rule panic guard.
    fn run_rule(&mut self, rule: RuleId, matcher: impl FnOnce() -> Option<Diagnostic>) {
        if !self.rules.enabled(rule) || self.faulted[rule as usize] {
            return;
        }
        match catch_unwind(AssertUnwindSafe(matcher)) {
            Ok(Some(diagnostic)) => self.buckets[rule as usize].push(diagnostic),
            Ok(None) => {}
            Err(payload) => self.record_fault(rule, payload),
        }
    }

    /// Run one scope-tracker operation behind the panic guard.
    ///
    /// The tracker underpins both unused rules, so a fault disables the
    /// pair for the rest of the run; the operation's result degrades to
    /// its default (nothing drained, nothing bound).
    fn scope_op<R: Default>(&mut self, op: impl FnOnce(&mut ScopeTracker) -> R) -> R {
        if self.scope_disabled() {
            return R::default();
        }
        let scope = &mut self.scope;
        match catch_unwind(AssertUnwindSafe(|| op(scope))) {
            Ok(result) => result,
            Err(payload) => {
                let message = panic_message(payload);
                for rule in [RuleId::UnusedImport, RuleId::UnusedVariable] {
                    if !self.faulted[rule as usize] {
                        error!("rule {} failed and was disabled for this run: {message}", rule.name());
                        self.faulted[rule as usize] = true;
                        self.buckets[rule as usize].clear();
                        self.faults.push(RuleFault {
                            rule: rule.name(),
                            message: message.clone(),
                        });
                    }
                }
                R::default()
            }
        }
    }

    fn scope_disabled(&self) -> bool {
        self.faulted[RuleId::UnusedImport as usize] && self.faulted[RuleId::UnusedVariable as usize]
    }

    fn drain_scope(&mut self) {
        for symbol in self.scope_op(ScopeTracker::exit_scope) {
            match symbol.kind {
                BindingKind::Import => self.emit(
                    RuleId::UnusedImport,
                    optimization::unused_import(&symbol.name, symbol.definition_line),
                ),
                BindingKind::Assignment => self.emit(
                    RuleId::UnusedVariable,
                    optimization::unused_variable(&symbol.name, symbol.definition_line),
                ),
            }
        }
    }

    fn emit(&mut self, rule: RuleId, diagnostic: Diagnostic) {
        if self.rules.enabled(rule) && !self.faulted[rule as usize] {
            self.buckets[rule as usize].push(diagnostic);
        }
    }

    fn run_reachability(&mut self, body: &[Stmt]) {
        let rule = RuleId::UnreachableCode;
        if !self.rules.enabled(rule) || self.faulted[rule as usize] {
            return;
        }
        let lines = self.lines;
        match catch_unwind(AssertUnwindSafe(|| reachability::check(body, lines))) {
            Ok(diagnostics) => self.buckets[rule as usize].extend(diagnostics),
            Err(payload) => self.record_fault(rule, payload),
        }
    }

    fn record_fault(&mut self, rule: RuleId, payload: Box<dyn Any + Send>) {
        let message = panic_message(payload);
        error!("rule {} failed and was disabled for this run: {message}", rule.name());
        self.faulted[rule as usize] = true;
        self.buckets[rule as usize].clear();
        self.faults.push(RuleFault {
            rule: rule.name(),
            message,
        });
    }

    fn finish(mut self) -> Analysis {
        let mut diagnostics = Vec::new();
        for rule in RuleId::ALL {
            if self.faulted[rule as usize] {
                continue;
            }
            let mut bucket = std::mem::take(&mut self.buckets[rule as usize]);
            bucket.sort_by_key(|diagnostic| diagnostic.line);
            diagnostics.append(&mut bucket);
        }
        Analysis {
            diagnostics,
            faults: self.faults,
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "rule panicked".to_string()
    }
}

fn push_body<'t>(stack: &mut Vec<Step<'t>>, body: &'t [Stmt]) {
    for stmt in body.iter().rev() {
        stack.push(Step::Stmt(stmt));
    }
}

fn push_exprs<'t>(stack: &mut Vec<Step<'t>>, exprs: &'t [Expr]) {
    for expr in exprs.iter().rev() {
        stack.push(Step::Expr(expr));
    }
}

/// Loop headers evaluate outside the body: iterable and target first, then
/// the loop context opens around the body, then the `else` clause runs
/// outside it again.
fn push_loop<'t>(
    stack: &mut Vec<Step<'t>>,
    target: &'t Expr,
    iter: &'t Expr,
    body: &'t [Stmt],
    orelse: &'t [Stmt],
) {
    push_body(stack, orelse);
    stack.push(Step::ExitLoop);
    push_body(stack, body);
    stack.push(Step::EnterLoop);
    stack.push(Step::Expr(target));
    stack.push(Step::Expr(iter));
}

/// Decorators, parameter defaults, and annotations evaluate in the
/// enclosing scope, before the function scope opens.
fn push_function_interface<'t>(
    stack: &mut Vec<Step<'t>>,
    decorators: &'t [Expr],
    args: &'t ast::Arguments,
    returns: Option<&'t Expr>,
) {
    if let Some(returns) = returns {
        stack.push(Step::Expr(returns));
    }
    for arg in args
        .posonlyargs
        .iter()
        .chain(&args.args)
        .chain(&args.kwonlyargs)
    {
        if let Some(annotation) = arg.def.annotation.as_deref() {
            stack.push(Step::Expr(annotation));
        }
        if let Some(default) = arg.default.as_deref() {
            stack.push(Step::Expr(default));
        }
    }
    if let Some(vararg) = &args.vararg {
        if let Some(annotation) = vararg.annotation.as_deref() {
            stack.push(Step::Expr(annotation));
        }
    }
    if let Some(kwarg) = &args.kwarg {
        if let Some(annotation) = kwarg.annotation.as_deref() {
            stack.push(Step::Expr(annotation));
        }
    }
    push_exprs(stack, decorators);
}

fn push_with<'t>(stack: &mut Vec<Step<'t>>, items: &'t [ast::WithItem], body: &'t [Stmt]) {
    push_body(stack, body);
    for item in items.iter().rev() {
        if let Some(vars) = item.optional_vars.as_deref() {
            stack.push(Step::Expr(vars));
        }
        stack.push(Step::Expr(&item.context_expr));
    }
}

fn push_try<'t>(
    stack: &mut Vec<Step<'t>>,
    body: &'t [Stmt],
    handlers: &'t [ast::ExceptHandler],
    orelse: &'t [Stmt],
    finalbody: &'t [Stmt],
) {
    push_body(stack, finalbody);
    push_body(stack, orelse);
    for handler in handlers.iter().rev() {
        let ast::ExceptHandler::ExceptHandler(handler) = handler;
        push_body(stack, &handler.body);
        if let Some(type_) = handler.type_.as_deref() {
            stack.push(Step::Expr(type_));
        }
    }
    push_body(stack, body);
}

fn push_expr_children<'t>(stack: &mut Vec<Step<'t>>, expr: &'t Expr) {
    match expr {
        Expr::BoolOp(op) => push_exprs(stack, &op.values),
        Expr::NamedExpr(named) => {
            stack.push(Step::Expr(&named.value));
            stack.push(Step::Expr(&named.target));
        }
        Expr::BinOp(op) => {
            stack.push(Step::Expr(&op.right));
            stack.push(Step::Expr(&op.left));
        }
        Expr::UnaryOp(op) => stack.push(Step::Expr(&op.operand)),
        Expr::Lambda(lambda) => {
            stack.push(Step::Expr(&lambda.body));
            for arg in lambda
                .args
                .posonlyargs
                .iter()
                .chain(&lambda.args.args)
                .chain(&lambda.args.kwonlyargs)
            {
                if let Some(default) = arg.default.as_deref() {
                    stack.push(Step::Expr(default));
                }
            }
        }
        Expr::IfExp(if_exp) => {
            stack.push(Step::Expr(&if_exp.orelse));
            stack.push(Step::Expr(&if_exp.body));
            stack.push(Step::Expr(&if_exp.test));
        }
        Expr::Dict(dict) => {
            for value in dict.values.iter().rev() {
                stack.push(Step::Expr(value));
            }
            for key in dict.keys.iter().rev().flatten() {
                stack.push(Step::Expr(key));
            }
        }
        Expr::Set(set) => push_exprs(stack, &set.elts),
        Expr::ListComp(comp) => {
            push_comprehensions(stack, &comp.generators);
            stack.push(Step::Expr(&comp.elt));
        }
        Expr::SetComp(comp) => {
            push_comprehensions(stack, &comp.generators);
            stack.push(Step::Expr(&comp.elt));
        }
        Expr::DictComp(comp) => {
            push_comprehensions(stack, &comp.generators);
            stack.push(Step::Expr(&comp.value));
            stack.push(Step::Expr(&comp.key));
        }
        Expr::GeneratorExp(comp) => {
            push_comprehensions(stack, &comp.generators);
            stack.push(Step::Expr(&comp.elt));
        }
        Expr::Await(await_expr) => stack.push(Step::Expr(&await_expr.value)),
        Expr::Yield(yield_expr) => {
            if let Some(value) = yield_expr.value.as_deref() {
                stack.push(Step::Expr(value));
            }
        }
        Expr::YieldFrom(yield_from) => stack.push(Step::Expr(&yield_from.value)),
        Expr::Compare(compare) => {
            for comparator in compare.comparators.iter().rev() {
                stack.push(Step::Expr(comparator));
            }
            stack.push(Step::Expr(&compare.left));
        }
        Expr::Call(call) => {
            for keyword in call.keywords.iter().rev() {
                stack.push(Step::Expr(&keyword.value));
            }
            push_exprs(stack, &call.args);
            stack.push(Step::Expr(&call.func));
        }
        Expr::FormattedValue(formatted) => {
            if let Some(format_spec) = formatted.format_spec.as_deref() {
                stack.push(Step::Expr(format_spec));
            }
            stack.push(Step::Expr(&formatted.value));
        }
        Expr::JoinedStr(joined) => push_exprs(stack, &joined.values),
        Expr::Constant(_) => {}
        Expr::Attribute(attribute) => stack.push(Step::Expr(&attribute.value)),
        Expr::Subscript(subscript) => {
            stack.push(Step::Expr(&subscript.slice));
            stack.push(Step::Expr(&subscript.value));
        }
        Expr::Starred(starred) => stack.push(Step::Expr(&starred.value)),
        Expr::Name(_) => {}
        Expr::List(list) => push_exprs(stack, &list.elts),
        Expr::Tuple(tuple) => push_exprs(stack, &tuple.elts),
        Expr::Slice(slice) => {
            if let Some(step) = slice.step.as_deref() {
                stack.push(Step::Expr(step));
            }
            if let Some(upper) = slice.upper.as_deref() {
                stack.push(Step::Expr(upper));
            }
            if let Some(lower) = slice.lower.as_deref() {
                stack.push(Step::Expr(lower));
            }
        }
    }
}

fn push_comprehensions<'t>(stack: &mut Vec<Step<'t>>, generators: &'t [ast::Comprehension]) {
    for generator in generators.iter().rev() {
        for if_clause in generator.ifs.iter().rev() {
            stack.push(Step::Expr(if_clause));
        }
        stack.push(Step::Expr(&generator.target));
        stack.push(Step::Expr(&generator.iter));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze_source;
    use pretty_assertions::assert_eq;

    #[test]
    fn repeated_runs_are_identical() {
        let source = concat!(
            "import os\n",
            "import sys\n",
            "API_KEY = 'abc'\n",
            "for i in range(len([1, 2])):\n",
            "    n = len([1, 2])\n",
        );
        let first = analyze_source(source, "test.py").unwrap();
        let second = analyze_source(source, "test.py").unwrap();
        assert_eq!(first.diagnostics, second.diagnostics);
    }

    #[test]
    fn rule_sets_restrict_categories() {
        let source = "import sys\neval('1')\n";
        let security = Analyzer::with_rules(RuleSet::security_only());
        let parsed = crate::parse::parse_module(source, "test.py").unwrap();
        let analysis = security.analyze_parsed(&parsed);
        assert_eq!(analysis.diagnostics.len(), 1);
        assert!(analysis.diagnostics[0].message.contains("eval"));

        let optimization = Analyzer::with_rules(RuleSet::optimization_only());
        let analysis = optimization.analyze_parsed(&parsed);
        assert_eq!(analysis.diagnostics.len(), 1);
        assert!(analysis.diagnostics[0].message.contains("sys"));
    }

    #[test]
    fn healthy_runs_report_no_faults() {
        let analysis = analyze_source("x = 1\nprint(x)\n", "test.py").unwrap();
        assert!(analysis.faults.is_empty());
        assert!(analysis.diagnostics.is_empty());
    }

    #[test]
    fn panic_payloads_are_rendered() {
        assert_eq!(panic_message(Box::new("boom")), "boom");
        assert_eq!(panic_message(Box::new(String::from("bang"))), "bang");
        assert_eq!(panic_message(Box::new(42_u32)), "rule panicked");
    }
}
