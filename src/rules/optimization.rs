//! Performance and dead-code matchers.
//!
//! The loop-dependent matchers take the current loop context as a plain
//! `in_loop` flag; they keep no state of their own. Unused-binding
//! diagnostics are built here but driven by the scope tracker drain.

use rustpython_parser::ast::{self, Expr, Operator};

use crate::diagnostics::Diagnostic;

/// Plain rebinding `name = name + <expr>` inside a loop.
///
/// The value may be a longer `+` chain (`s = s + a + b`); only the leftmost
/// operand has to be the rebound name.
pub fn string_concat_in_loop(
    assign: &ast::StmtAssign,
    in_loop: bool,
    line: usize,
) -> Option<Diagnostic> {
    if !in_loop {
        return None;
    }
    let [Expr::Name(target)] = assign.targets.as_slice() else {
        return None;
    };
    let Expr::BinOp(value) = &*assign.value else {
        return None;
    };
    if !matches!(value.op, Operator::Add) {
        return None;
    }
    let mut leftmost = &*value.left;
    while let Expr::BinOp(chain) = leftmost {
        if !matches!(chain.op, Operator::Add) {
            return None;
        }
        leftmost = &chain.left;
    }
    let Expr::Name(source) = leftmost else {
        return None;
    };
    if source.id != target.id {
        return None;
    }
    Some(
        Diagnostic::optimization(
            line,
            format!("String concatenation in loop for '{}'.", target.id.as_str()),
        )
        .with_remediation(
            "Consider using ''.join() or appending to a list and joining after the loop.",
        ),
    )
}

/// `name += <expr>` on a plain name inside a loop.
pub fn augmented_concat_in_loop(
    assign: &ast::StmtAugAssign,
    in_loop: bool,
    line: usize,
) -> Option<Diagnostic> {
    if !in_loop || !matches!(assign.op, Operator::Add) {
        return None;
    }
    let Expr::Name(target) = &*assign.target else {
        return None;
    };
    Some(
        Diagnostic::optimization(
            line,
            format!(
                "Augmented assignment '{} += ...' inside a loop.",
                target.id.as_str()
            ),
        )
        .with_remediation("Consider accumulating parts in a list and joining after the loop."),
    )
}

/// Any `len(...)` call evaluated inside a loop body.
pub fn len_call_in_loop(call: &ast::ExprCall, in_loop: bool, line: usize) -> Option<Diagnostic> {
    if !in_loop {
        return None;
    }
    if !matches!(&*call.func, Expr::Name(name) if name.id.as_str() == "len") {
        return None;
    }
    Some(
        Diagnostic::optimization(line, "Call to len() inside loop detected.").with_remediation(
            "Store the length in a variable before the loop if it does not change.",
        ),
    )
}

/// A `for` header whose iterable is exactly `range(len(<expr>))`.
pub fn range_len_header(for_stmt: &ast::StmtFor, line: usize) -> Option<Diagnostic> {
    let Expr::Call(range_call) = &*for_stmt.iter else {
        return None;
    };
    if !matches!(&*range_call.func, Expr::Name(name) if name.id.as_str() == "range") {
        return None;
    }
    if range_call.args.len() != 1 || !range_call.keywords.is_empty() {
        return None;
    }
    let Expr::Call(len_call) = &range_call.args[0] else {
        return None;
    };
    if !matches!(&*len_call.func, Expr::Name(name) if name.id.as_str() == "len") {
        return None;
    }
    if len_call.args.len() != 1 {
        return None;
    }
    Some(
        Diagnostic::optimization(line, "Loop over 'range(len(...))'.")
            .with_remediation("Consider using 'enumerate()' to iterate directly over the sequence."),
    )
}

/// `<expr>.append(...)` inside a loop body.
pub fn append_in_loop(call: &ast::ExprCall, in_loop: bool, line: usize) -> Option<Diagnostic> {
    if !in_loop {
        return None;
    }
    if !matches!(&*call.func, Expr::Attribute(attr) if attr.attr.as_str() == "append") {
        return None;
    }
    Some(
        Diagnostic::optimization(line, "Using list.append() inside a loop.")
            .with_remediation("Consider using a list comprehension for better performance."),
    )
}

pub fn unused_import(name: &str, line: usize) -> Diagnostic {
    Diagnostic::optimization(line, format!("Imported name '{name}' is never used."))
}

pub fn unused_variable(name: &str, line: usize) -> Diagnostic {
    Diagnostic::optimization(line, format!("Variable '{name}' is assigned but never used."))
}
