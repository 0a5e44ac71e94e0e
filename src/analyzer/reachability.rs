//! Dead-code detection after terminating statements.
//!
//! Reachability is computed independently per statement block: a block
//! starts alive, the first `return`/`raise`/`break`/`continue` kills it,
//! and every later sibling is reported once. Nested blocks always start
//! alive, even when their parent statement is itself dead, so the pass
//! descends into everything.

use rustpython_parser::ast::{self, Stmt};

use crate::diagnostics::Diagnostic;
use crate::parse::LineIndex;

pub fn check(body: &[Stmt], lines: &LineIndex) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let mut blocks: Vec<&[Stmt]> = vec![body];

    while let Some(block) = blocks.pop() {
        let mut alive = true;
        for stmt in block {
            if !alive {
                diagnostics.push(Diagnostic::optimization(
                    lines.line_of(stmt),
                    "This code is unreachable.",
                ));
            }
            push_nested_blocks(stmt, &mut blocks);
            if alive && is_terminator(stmt) {
                alive = false;
            }
        }
    }

    diagnostics.sort_by_key(|diag| diag.line);
    diagnostics
}

/// Statements that end straight-line flow in their own block.
///
/// `break`/`continue` terminate only the block they appear in; whether the
/// surrounding loop keeps running is a control-flow question this pass does
/// not ask.
fn is_terminator(stmt: &Stmt) -> bool {
    matches!(
        stmt,
        Stmt::Return(_) | Stmt::Raise(_) | Stmt::Break(_) | Stmt::Continue(_)
    )
}

fn push_nested_blocks<'a>(stmt: &'a Stmt, blocks: &mut Vec<&'a [Stmt]>) {
    match stmt {
        Stmt::FunctionDef(def) => blocks.push(&def.body),
        Stmt::AsyncFunctionDef(def) => blocks.push(&def.body),
        Stmt::ClassDef(def) => blocks.push(&def.body),
        Stmt::If(if_stmt) => {
            blocks.push(&if_stmt.body);
            blocks.push(&if_stmt.orelse);
        }
        Stmt::For(for_stmt) => {
            blocks.push(&for_stmt.body);
            blocks.push(&for_stmt.orelse);
        }
        Stmt::AsyncFor(for_stmt) => {
            blocks.push(&for_stmt.body);
            blocks.push(&for_stmt.orelse);
        }
        Stmt::While(while_stmt) => {
            blocks.push(&while_stmt.body);
            blocks.push(&while_stmt.orelse);
        }
        Stmt::With(with_stmt) => blocks.push(&with_stmt.body),
        Stmt::AsyncWith(with_stmt) => blocks.push(&with_stmt.body),
        Stmt::Try(try_stmt) => {
            blocks.push(&try_stmt.body);
            for handler in &try_stmt.handlers {
                let ast::ExceptHandler::ExceptHandler(handler) = handler;
                blocks.push(&handler.body);
            }
            blocks.push(&try_stmt.orelse);
            blocks.push(&try_stmt.finalbody);
        }
        Stmt::TryStar(try_stmt) => {
            blocks.push(&try_stmt.body);
            for handler in &try_stmt.handlers {
                let ast::ExceptHandler::ExceptHandler(handler) = handler;
                blocks.push(&handler.body);
            }
            blocks.push(&try_stmt.orelse);
            blocks.push(&try_stmt.finalbody);
        }
        Stmt::Match(match_stmt) => {
            for case in &match_stmt.cases {
                blocks.push(&case.body);
            }
        }
        _ => {}
    }
}
