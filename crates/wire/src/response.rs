// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use abacus_core::{AgentId, AgentRecord, ExprId, Expression, ExpressionState, Operator};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Transport status code attached to error responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusCode {
    InvalidArgument,
    NotFound,
    Unauthenticated,
    Internal,
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusCode::InvalidArgument => write!(f, "invalid_argument"),
            StatusCode::NotFound => write!(f, "not_found"),
            StatusCode::Unauthenticated => write!(f, "unauthenticated"),
            StatusCode::Internal => write!(f, "internal"),
        }
    }
}

/// One expression row as shown to its owner.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExpressionDetail {
    pub expression_id: ExprId,
    pub idempotency_key: String,
    /// Raw submitted text.
    pub expression: String,
    pub state: ExpressionState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<f64>,
}

impl From<&Expression> for ExpressionDetail {
    fn from(row: &Expression) -> Self {
        Self {
            expression_id: row.id.clone(),
            idempotency_key: row.idempotency_key.clone(),
            expression: row.text.clone(),
            state: row.state,
            result: row.result,
        }
    }
}

/// Administrative agent listing entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentEntry {
    pub id: AgentId,
    pub last_heartbeat_ms: u64,
}

impl From<&AgentRecord> for AgentEntry {
    fn from(row: &AgentRecord) -> Self {
        Self { id: row.id.clone(), last_heartbeat_ms: row.last_heartbeat_ms }
    }
}

/// One operator with its configured timeout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OperatorEntry {
    pub op: Operator,
    pub timeout_ms: u64,
}

/// Response from the daemon to a client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Response {
    /// Health check response
    Pong,

    /// Version handshake response
    Hello { version: String },

    /// Expression accepted (or deduplicated by idempotency key)
    ExpressionCreated { expression_id: ExprId },

    /// Single expression details
    Expression { expression: ExpressionDetail },

    /// The caller's expressions
    Expressions { expressions: Vec<ExpressionDetail> },

    /// All known agents
    Agents { agents: Vec<AgentEntry> },

    /// Operator timeouts
    Operators { operators: Vec<OperatorEntry> },

    /// Error response
    Error { code: StatusCode, message: String },
}

impl Response {
    pub fn error(code: StatusCode, message: impl Into<String>) -> Self {
        Response::Error { code, message: message.into() }
    }
}
