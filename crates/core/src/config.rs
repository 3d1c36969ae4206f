// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Orchestrator configuration.
//!
//! Passed into the orchestrator constructor and from there into the retry
//! controller and the operator-listing handler. Never read from a global.

use crate::operator::Operator;
use serde::Deserialize;
use std::time::Duration;

/// Per-operator timeouts, reported to agents in task payloads and to clients
/// via `GetOperators`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OperatorTimeouts {
    pub add_ms: u64,
    pub sub_ms: u64,
    pub mul_ms: u64,
    pub div_ms: u64,
}

impl Default for OperatorTimeouts {
    fn default() -> Self {
        Self { add_ms: 2_000, sub_ms: 2_000, mul_ms: 2_000, div_ms: 2_000 }
    }
}

impl OperatorTimeouts {
    pub fn for_op(&self, op: Operator) -> u64 {
        match op {
            Operator::Add => self.add_ms,
            Operator::Sub => self.sub_ms,
            Operator::Mul => self.mul_ms,
            Operator::Div => self.div_ms,
        }
    }

    /// All operators with their timeouts, in a stable order.
    pub fn entries(&self) -> [(Operator, u64); 4] {
        [
            (Operator::Add, self.add_ms),
            (Operator::Sub, self.sub_ms),
            (Operator::Mul, self.mul_ms),
            (Operator::Div, self.div_ms),
        ]
    }
}

/// Top-level orchestrator configuration with serde defaults throughout, so a
/// missing or partial TOML file still yields a runnable daemon.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// TCP listen port for the RPC surface.
    pub rpc_port: u16,
    /// Dead-agent threshold: an agent whose heartbeat is older than this is
    /// considered dead and its in-flight work is reassigned.
    pub retry_after_ms: u64,
    /// Period of the retry controller tick.
    pub tick_interval_ms: u64,
    pub timeouts: OperatorTimeouts,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            rpc_port: 7050,
            retry_after_ms: 10_000,
            tick_interval_ms: 1_000,
            timeouts: OperatorTimeouts::default(),
        }
    }
}

impl OrchestratorConfig {
    pub fn retry_after(&self) -> Duration {
        Duration::from_millis(self.retry_after_ms)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
