// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One binary node in an expression's dependency graph.
//!
//! Sub-expressions reference each other by id only; every navigation goes
//! through the repository so that reassignment can substitute an id globally
//! without chasing in-memory pointers.

use crate::id::{AgentId, ExprId, SubId};
use crate::operator::Operator;
use serde::{Deserialize, Serialize};

/// One operand slot: either a resolved literal value or a reference to the
/// sub-expression that will produce it. Exactly one of the two fields is set
/// until the dependency resolves, after which `value` is filled and
/// `depends_on` cleared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operand {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depends_on: Option<SubId>,
}

impl Operand {
    pub fn literal(value: f64) -> Self {
        Self { value: Some(value), depends_on: None }
    }

    pub fn reference(dep: SubId) -> Self {
        Self { value: None, depends_on: Some(dep) }
    }

    pub fn is_resolved(&self) -> bool {
        self.value.is_some()
    }

    /// Fill this slot if it references `dep`. Returns true when filled.
    fn resolve(&mut self, dep: &SubId, value: f64) -> bool {
        if self.depends_on.as_ref() == Some(dep) {
            self.value = Some(value);
            self.depends_on = None;
            true
        } else {
            false
        }
    }

    /// Rewrite the dependency reference from `old` to `new`, if present.
    fn retarget(&mut self, old: &SubId, new: &SubId) -> bool {
        if self.depends_on.as_ref() == Some(old) {
            self.depends_on = Some(new.clone());
            true
        } else {
            false
        }
    }
}

/// A single dispatchable binary operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubExpression {
    pub id: SubId,
    pub expression_id: ExprId,
    pub op: Operator,
    pub left: Operand,
    pub right: Operand,
    /// Computed value. Set exactly once by the aggregator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<f64>,
    /// Advisory: the agent that acknowledged pickup. Never blocks
    /// reassignment once liveness expires.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_agent: Option<AgentId>,
    /// True for the root of the expression's graph.
    pub is_last: bool,
    pub created_at_ms: u64,
    pub updated_at_ms: u64,
}

impl SubExpression {
    pub fn new(
        id: SubId,
        expression_id: ExprId,
        op: Operator,
        left: Operand,
        right: Operand,
        is_last: bool,
        now_ms: u64,
    ) -> Self {
        Self {
            id,
            expression_id,
            op,
            left,
            right,
            result: None,
            assigned_agent: None,
            is_last,
            created_at_ms: now_ms,
            updated_at_ms: now_ms,
        }
    }

    /// Eligible for dispatch: both operands resolved, result not yet written.
    pub fn is_ready(&self) -> bool {
        self.result.is_none() && self.left.is_resolved() && self.right.is_resolved()
    }

    /// Fill every operand slot that references `dep`. Returns true if any
    /// slot was filled.
    pub fn resolve_dependency(&mut self, dep: &SubId, value: f64) -> bool {
        // An expression like `x + x` can reference the same dependency twice.
        let l = self.left.resolve(dep, value);
        let r = self.right.resolve(dep, value);
        l || r
    }

    /// Rewrite operand references from `old` to `new`. Returns true if any
    /// slot was rewritten.
    pub fn retarget_dependency(&mut self, old: &SubId, new: &SubId) -> bool {
        let l = self.left.retarget(old, new);
        let r = self.right.retarget(old, new);
        l || r
    }

    pub fn depends_on(&self, dep: &SubId) -> bool {
        self.left.depends_on.as_ref() == Some(dep) || self.right.depends_on.as_ref() == Some(dep)
    }

    /// Copy of this node under a fresh id, unassigned and timestamped `now`.
    /// Used by dead-agent reassignment.
    pub fn clone_as(&self, id: SubId, now_ms: u64) -> Self {
        Self {
            id,
            expression_id: self.expression_id.clone(),
            op: self.op,
            left: self.left.clone(),
            right: self.right.clone(),
            result: self.result,
            assigned_agent: None,
            is_last: self.is_last,
            created_at_ms: now_ms,
            updated_at_ms: now_ms,
        }
    }
}

#[cfg(test)]
#[path = "sub_expression_tests.rs"]
mod tests;
