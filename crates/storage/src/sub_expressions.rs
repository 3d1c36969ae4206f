// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Sub-expression table operations.
//!
//! These carry the graph invariants: readiness is emitted on every
//! operand-fill transition, and reassignment rewrites dependent references
//! in the same critical section that swaps the row.

use crate::store::Store;
use abacus_core::{AgentId, ExprId, SubExpression, SubId};

impl Store {
    /// Batch-insert freshly decomposed records and emit the ones that are
    /// ready immediately (both operands literal).
    pub fn create_sub_expressions(&self, records: Vec<SubExpression>) {
        let ready = self.with(|t| {
            let mut ready = Vec::new();
            for record in records {
                if record.is_ready() {
                    ready.push(record.clone());
                }
                t.sub_expressions.insert(record.id.clone(), record);
            }
            ready
        });
        for sub in &ready {
            self.emit_ready(sub);
        }
    }

    /// Snapshot of every sub-expression row.
    pub fn list_sub_expressions(&self) -> Vec<SubExpression> {
        self.with(|t| t.sub_expressions.values().cloned().collect())
    }

    /// Record a computed value and propagate it into dependents, emitting
    /// any that become ready.
    ///
    /// Returns the completed row, or `None` when the row is missing or
    /// already resolved. Redelivered result messages land here and must be
    /// ignored, not double-propagated.
    pub fn write_result(&self, id: &SubId, value: f64, now_ms: u64) -> Option<SubExpression> {
        let (completed, newly_ready) = self.with(|t| {
            let row = match t.sub_expressions.get_mut(id) {
                Some(row) if row.result.is_none() => row,
                _ => return (None, Vec::new()),
            };
            row.result = Some(value);
            row.updated_at_ms = now_ms;
            let completed = row.clone();

            let mut newly_ready = Vec::new();
            for dep in t.sub_expressions.values_mut() {
                if dep.id != *id && dep.resolve_dependency(id, value) {
                    dep.updated_at_ms = now_ms;
                    if dep.is_ready() {
                        newly_ready.push(dep.clone());
                    }
                }
            }
            (Some(completed), newly_ready)
        });
        for sub in &newly_ready {
            self.emit_ready(sub);
        }
        completed
    }

    /// Advisory record of which agent picked the task up. Returns false when
    /// the row no longer exists (completed or reassigned in the meantime).
    pub fn set_assigned_agent(&self, id: &SubId, agent: &AgentId, now_ms: u64) -> bool {
        self.with(|t| match t.sub_expressions.get_mut(id) {
            Some(row) => {
                row.assigned_agent = Some(agent.clone());
                row.updated_at_ms = now_ms;
                true
            }
            None => false,
        })
    }

    /// Sub-expressions assigned to `agent` whose result is still unwritten.
    pub fn get_uncalculated_by_agent(&self, agent: &AgentId) -> Vec<SubExpression> {
        self.with(|t| {
            t.sub_expressions
                .values()
                .filter(|s| s.result.is_none() && s.assigned_agent.as_ref() == Some(agent))
                .cloned()
                .collect()
        })
    }

    /// Rewrite every operand reference from `old` to `new`. Returns the
    /// number of rows touched.
    pub fn replace_operand_refs(&self, old: &SubId, new: &SubId, now_ms: u64) -> usize {
        self.with(|t| Self::retarget_refs(t, old, new, now_ms))
    }

    pub fn delete_sub_expression(&self, id: &SubId) -> bool {
        self.with(|t| t.sub_expressions.remove(id).is_some())
    }

    pub fn delete_by_expression(&self, expression_id: &ExprId) -> usize {
        self.with(|t| {
            let before = t.sub_expressions.len();
            t.sub_expressions.retain(|_, s| &s.expression_id != expression_id);
            before - t.sub_expressions.len()
        })
    }

    /// Migrate a sub-expression away from a dead agent: clone it under
    /// `new_id` (unassigned), retarget every dependent reference, and drop
    /// the old row, all in one critical section. Concurrent readers see
    /// either the old id or the new one, never a dangling reference.
    ///
    /// Returns the replacement row, or `None` when the old row is already
    /// gone or resolved (e.g. a second dead agent raced us here).
    pub fn reassign_sub_expression(
        &self,
        old: &SubId,
        new_id: SubId,
        now_ms: u64,
    ) -> Option<SubExpression> {
        let replacement = self.with(|t| {
            let row = match t.sub_expressions.get(old) {
                Some(row) if row.result.is_none() => row,
                _ => return None,
            };
            let replacement = row.clone_as(new_id, now_ms);
            t.sub_expressions.insert(replacement.id.clone(), replacement.clone());
            Self::retarget_refs(t, old, &replacement.id, now_ms);
            t.sub_expressions.remove(old);
            Some(replacement)
        })?;
        if replacement.is_ready() {
            self.emit_ready(&replacement);
        }
        Some(replacement)
    }

    /// Re-emit ready rows that nobody is working on: unassigned, unresolved,
    /// and untouched for longer than `retry_after_ms`. Covers lost task
    /// publishes and tasks whose pickup ack never arrived.
    pub fn republish_stale_unassigned(&self, now_ms: u64, retry_after_ms: u64) -> usize {
        let stale = self.with(|t| {
            let mut stale = Vec::new();
            for row in t.sub_expressions.values_mut() {
                if row.is_ready()
                    && row.assigned_agent.is_none()
                    && now_ms.saturating_sub(row.updated_at_ms) > retry_after_ms
                {
                    // Stamp the republish so the next tick does not repeat it
                    row.updated_at_ms = now_ms;
                    stale.push(row.clone());
                }
            }
            stale
        });
        for sub in &stale {
            self.emit_ready(sub);
        }
        stale.len()
    }

    fn retarget_refs(
        t: &mut crate::store::Tables,
        old: &SubId,
        new: &SubId,
        now_ms: u64,
    ) -> usize {
        let mut touched = 0;
        for row in t.sub_expressions.values_mut() {
            if row.retarget_dependency(old, new) {
                row.updated_at_ms = now_ms;
                touched += 1;
            }
        }
        touched
    }
}

#[cfg(test)]
#[path = "sub_expressions_tests.rs"]
mod tests;
