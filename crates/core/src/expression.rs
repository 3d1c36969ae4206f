// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A user-submitted expression and its evaluation lifecycle.

use crate::id::{ExprId, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of an expression.
///
/// Transitions only move forward: `pending → in_progress → done | error`.
/// Terminal states are final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpressionState {
    Pending,
    InProgress,
    Done,
    Error,
}

impl ExpressionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ExpressionState::Done | ExpressionState::Error)
    }

    fn rank(&self) -> u8 {
        match self {
            ExpressionState::Pending => 0,
            ExpressionState::InProgress => 1,
            ExpressionState::Done | ExpressionState::Error => 2,
        }
    }

    /// Whether moving to `next` advances the lifecycle.
    pub fn can_advance_to(&self, next: ExpressionState) -> bool {
        !self.is_terminal() && next.rank() > self.rank()
    }
}

impl fmt::Display for ExpressionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpressionState::Pending => write!(f, "pending"),
            ExpressionState::InProgress => write!(f, "in_progress"),
            ExpressionState::Done => write!(f, "done"),
            ExpressionState::Error => write!(f, "error"),
        }
    }
}

/// Persistent record of one user submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expression {
    pub id: ExprId,
    pub user_id: UserId,
    /// Raw textual form, as submitted.
    pub text: String,
    /// Client-chosen token, unique per user.
    pub idempotency_key: String,
    pub state: ExpressionState,
    /// Final numeric value. Meaningful only in `Done`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<f64>,
    pub created_at_ms: u64,
}

impl Expression {
    pub fn new(
        id: ExprId,
        user_id: UserId,
        text: impl Into<String>,
        idempotency_key: impl Into<String>,
        created_at_ms: u64,
    ) -> Self {
        Self {
            id,
            user_id,
            text: text.into(),
            idempotency_key: idempotency_key.into(),
            state: ExpressionState::Pending,
            result: None,
            created_at_ms,
        }
    }
}

#[cfg(test)]
#[path = "expression_tests.rs"]
mod tests;
