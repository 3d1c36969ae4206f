// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Decomposition of a parsed expression into dispatchable sub-expressions.

use crate::error::ParseError;
use crate::parser::{parse, Ast};
use abacus_core::{ExprId, IdGen, Operand, SubExpression, SubId};

/// Result of decomposing an expression.
///
/// A bare literal has no binary operation to dispatch, so the caller
/// short-circuits it straight to a final result.
#[derive(Debug, Clone, PartialEq)]
pub enum SplitPlan {
    Literal(f64),
    /// One record per internal AST node, children before parents; the final
    /// record is the root and carries `is_last`.
    Graph(Vec<SubExpression>),
}

/// Parse `text` and lower it into sub-expression records for
/// `expression_id`. Identifiers come from `ids`; structure is deterministic
/// for identical input up to identifier assignment.
pub fn split(
    expression_id: &ExprId,
    text: &str,
    ids: &dyn IdGen,
    now_ms: u64,
) -> Result<SplitPlan, ParseError> {
    let ast = parse(text)?;
    match ast {
        Ast::Number(n) => Ok(SplitPlan::Literal(n)),
        Ast::BinOp { op, left, right } => {
            let mut out = Vec::new();
            let left = lower(*left, expression_id, ids, now_ms, &mut out);
            let right = lower(*right, expression_id, ids, now_ms, &mut out);
            let root = SubExpression::new(
                SubId::from_string(ids.next()),
                expression_id.clone(),
                op,
                left,
                right,
                true,
                now_ms,
            );
            out.push(root);
            Ok(SplitPlan::Graph(out))
        }
    }
}

/// Lower one subtree, pushing its internal nodes onto `out` post-order, and
/// return the operand the parent should use.
fn lower(
    ast: Ast,
    expression_id: &ExprId,
    ids: &dyn IdGen,
    now_ms: u64,
    out: &mut Vec<SubExpression>,
) -> Operand {
    match ast {
        Ast::Number(n) => Operand::literal(n),
        Ast::BinOp { op, left, right } => {
            let left = lower(*left, expression_id, ids, now_ms, out);
            let right = lower(*right, expression_id, ids, now_ms, out);
            let id = SubId::from_string(ids.next());
            out.push(SubExpression::new(
                id.clone(),
                expression_id.clone(),
                op,
                left,
                right,
                false,
                now_ms,
            ));
            Operand::reference(id)
        }
    }
}

#[cfg(test)]
#[path = "split_tests.rs"]
mod tests;
