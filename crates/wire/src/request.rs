// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use serde::{Deserialize, Serialize};

/// Request from a client to the daemon.
///
/// Every method except `Ping` and `Hello` requires an authenticated
/// connection: the transport resolves the Hello token to a user id and
/// handlers run on that user's behalf.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Request {
    /// Health check ping, no auth required
    Ping,

    /// Version handshake carrying the caller's auth token
    Hello {
        version: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        token: Option<String>,
    },

    /// Submit an expression for evaluation
    CreateExpression {
        expression: String,
        idempotency_key: String,
    },

    /// Fetch one of the caller's expressions
    GetExpression { expression_id: String },

    /// List the caller's expressions
    GetExpressions,

    /// Administrative view of all known agents
    GetAgents,

    /// The four operators and their configured timeouts
    GetOperators,
}
