// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! JSON payloads carried on the bus channels.
//!
//! Field names are part of the agent-facing wire contract; the camelCase
//! renames below are load-bearing.

use abacus_core::{AgentId, ExprId, Operator, SubId};
use serde::{Deserialize, Serialize};

/// `tasks` channel: one ready sub-expression for an agent to evaluate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskMessage {
    pub id: SubId,
    pub op: Operator,
    pub a: f64,
    pub b: f64,
    pub is_last: bool,
    pub expression_id: ExprId,
    pub timeout_ms: u64,
}

/// `rpc-ack` channel: an agent picked up a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickupAck {
    pub id_sub_expression: SubId,
    pub id_agent: AgentId,
}

/// `results` channel: an agent finished (or failed) a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultMessage {
    pub id: SubId,
    pub expression_id: ExprId,
    /// Meaningless when `error` is set.
    #[serde(default)]
    pub result: f64,
    #[serde(default)]
    pub error: bool,
    pub is_last: bool,
}

/// `heartbeats` channel: an agent is alive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeartbeatMessage {
    pub id: AgentId,
}

#[cfg(test)]
#[path = "messages_tests.rs"]
mod tests;
