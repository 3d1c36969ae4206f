// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Expression table operations.

use crate::error::StorageError;
use crate::store::Store;
use abacus_core::{ExprId, Expression, ExpressionState, UserId};

impl Store {
    /// Insert a new expression, or return the existing row when the caller
    /// already submitted this idempotency key. The bool is true when a row
    /// was created.
    pub fn create_expression(
        &self,
        user: &UserId,
        text: &str,
        idempotency_key: &str,
        now_ms: u64,
    ) -> (Expression, bool) {
        self.with(|t| {
            let key = (user.clone(), idempotency_key.to_string());
            if let Some(existing) = t
                .idempotency
                .get(&key)
                .and_then(|id| t.expressions.get(id))
            {
                return (existing.clone(), false);
            }
            let expression = Expression::new(
                ExprId::new(),
                user.clone(),
                text,
                idempotency_key,
                now_ms,
            );
            t.idempotency.insert(key, expression.id.clone());
            t.expressions.insert(expression.id.clone(), expression.clone());
            (expression, true)
        })
    }

    /// Look up an expression owned by `user`. An owner mismatch is reported
    /// as not-found so callers cannot probe for foreign ids.
    pub fn get_expression(&self, id: &ExprId, user: &UserId) -> Result<Expression, StorageError> {
        self.with(|t| {
            t.expressions
                .get(id)
                .filter(|e| &e.user_id == user)
                .cloned()
                .ok_or_else(|| StorageError::ExpressionNotFound(id.clone()))
        })
    }

    pub fn get_expression_by_key(&self, user: &UserId, idempotency_key: &str) -> Option<Expression> {
        self.with(|t| {
            t.idempotency
                .get(&(user.clone(), idempotency_key.to_string()))
                .and_then(|id| t.expressions.get(id))
                .filter(|e| &e.user_id == user)
                .cloned()
        })
    }

    /// All expressions of one user, oldest first.
    pub fn list_expressions(&self, user: &UserId) -> Vec<Expression> {
        self.with(|t| {
            let mut rows: Vec<_> = t
                .expressions
                .values()
                .filter(|e| &e.user_id == user)
                .cloned()
                .collect();
            rows.sort_by(|a, b| {
                a.created_at_ms
                    .cmp(&b.created_at_ms)
                    .then_with(|| a.id.as_str().cmp(b.id.as_str()))
            });
            rows
        })
    }

    /// Advance the lifecycle state. No-op when the row is already terminal
    /// or the transition would move backwards.
    pub fn update_state(&self, id: &ExprId, state: ExpressionState) -> Result<(), StorageError> {
        self.with(|t| {
            let row = t
                .expressions
                .get_mut(id)
                .ok_or_else(|| StorageError::ExpressionNotFound(id.clone()))?;
            if row.state.can_advance_to(state) {
                row.state = state;
            }
            Ok(())
        })
    }

    /// Record the final value and mark the expression done.
    pub fn set_expression_result(&self, id: &ExprId, value: f64) -> Result<(), StorageError> {
        self.with(|t| {
            let row = t
                .expressions
                .get_mut(id)
                .ok_or_else(|| StorageError::ExpressionNotFound(id.clone()))?;
            if row.state.can_advance_to(ExpressionState::Done) {
                row.result = Some(value);
                row.state = ExpressionState::Done;
            }
            Ok(())
        })
    }

    /// Remove the expression, its idempotency entry, and every sub-expression
    /// belonging to it.
    pub fn delete_expression(&self, id: &ExprId) {
        self.with(|t| {
            if let Some(row) = t.expressions.remove(id) {
                t.idempotency
                    .remove(&(row.user_id.clone(), row.idempotency_key.clone()));
            }
            t.sub_expressions.retain(|_, s| &s.expression_id != id);
        });
    }
}

#[cfg(test)]
#[path = "expressions_tests.rs"]
mod tests;
