// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test builders and helpers, enabled via the `test-support` feature for
//! other crates' tests.

use crate::id::{ExprId, IdGen, SubId};
use crate::operator::Operator;
use crate::sub_expression::{Operand, SubExpression};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Deterministic ID generator producing `prefix-1`, `prefix-2`, ...
/// Clones share the counter.
#[derive(Clone)]
pub struct SequentialIdGen {
    prefix: String,
    counter: Arc<AtomicU64>,
}

impl SequentialIdGen {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into(), counter: Arc::new(AtomicU64::new(0)) }
    }
}

impl IdGen for SequentialIdGen {
    fn next(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{}-{}", self.prefix, n)
    }
}

/// Shorthand builder for sub-expression records in tests.
pub fn sub_expression(
    id: &str,
    expression_id: &str,
    op: Operator,
    left: Operand,
    right: Operand,
    is_last: bool,
) -> SubExpression {
    SubExpression::new(
        SubId::from_string(id),
        ExprId::from_string(expression_id),
        op,
        left,
        right,
        is_last,
        1_000,
    )
}
