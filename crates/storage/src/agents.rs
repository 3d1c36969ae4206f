// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent table operations.

use crate::store::Store;
use abacus_core::{AgentId, AgentRecord};

impl Store {
    /// Create the agent on first heartbeat, advance its timestamp otherwise.
    /// Reordered heartbeats never move the timestamp backwards.
    pub fn upsert_heartbeat(&self, id: &AgentId, now_ms: u64) {
        self.with(|t| {
            t.agents
                .entry(id.clone())
                .or_insert_with(|| AgentRecord::new(id.clone(), now_ms))
                .observe_heartbeat(now_ms);
        });
    }

    /// All known agents, in stable id order.
    pub fn list_agents(&self) -> Vec<AgentRecord> {
        self.with(|t| {
            let mut rows: Vec<_> = t.agents.values().cloned().collect();
            rows.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));
            rows
        })
    }
}

#[cfg(test)]
#[path = "agents_tests.rs"]
mod tests;
