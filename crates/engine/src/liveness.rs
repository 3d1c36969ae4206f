// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Liveness tracking and dead-agent reassignment.

use crate::orchestrator::Orchestrator;
use abacus_bus::{channel, HeartbeatMessage};
use abacus_core::{Clock, SubId};
use std::sync::Arc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

impl<C: Clock> Orchestrator<C> {
    pub(crate) async fn run_heartbeat_consumer(this: Arc<Self>, shutdown: CancellationToken) {
        let mut heartbeats = match this.bus.subscribe(channel::HEARTBEATS).await {
            Ok(rx) => rx,
            Err(err) => {
                tracing::error!(error = %err, "heartbeat consumer failed to subscribe");
                return;
            }
        };
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                next = heartbeats.recv() => match next {
                    Some(payload) => this.handle_heartbeat(&payload),
                    None => break,
                },
            }
        }
        tracing::debug!("heartbeat consumer stopped");
    }

    pub(crate) fn handle_heartbeat(&self, payload: &[u8]) {
        let msg: HeartbeatMessage = match serde_json::from_slice(payload) {
            Ok(msg) => msg,
            Err(err) => {
                tracing::warn!(error = %err, "undecodable heartbeat dropped");
                return;
            }
        };
        self.store.upsert_heartbeat(&msg.id, self.clock.epoch_ms());
        tracing::trace!(agent = %msg.id, "heartbeat");
    }

    /// Fixed-interval reassignment tick.
    pub(crate) async fn run_retry_ticker(this: Arc<Self>, shutdown: CancellationToken) {
        let mut ticker = tokio::time::interval(this.config.tick_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => this.tick(),
            }
        }
        tracing::debug!("retry ticker stopped");
    }

    /// One reassignment pass.
    ///
    /// Every unresolved sub-expression assigned to a dead agent is migrated
    /// to a fresh id; the store rewrites dependent references in the same
    /// transaction, and the replacement re-enters the ready stream if its
    /// operands are filled. Ready rows that were never picked up (lost
    /// publish, lost ack) are republished once their age passes the same
    /// threshold.
    pub(crate) fn tick(&self) {
        let now = self.clock.epoch_ms();
        let retry_after_ms = self.config.retry_after_ms;

        for agent in self.store.list_agents() {
            if !agent.is_stale(now, retry_after_ms) {
                continue;
            }
            for sub in self.store.get_uncalculated_by_agent(&agent.id) {
                let replacement_id = SubId::from_string(self.ids.next());
                match self.store.reassign_sub_expression(&sub.id, replacement_id, now) {
                    Some(replacement) => tracing::info!(
                        agent = %agent.id,
                        old = %sub.id,
                        new = %replacement.id,
                        "reassigned sub-expression from dead agent"
                    ),
                    // Another dead agent's pass or a late result got here first
                    None => tracing::debug!(sub = %sub.id, "reassignment skipped, row gone"),
                }
            }
        }

        let republished = self.store.republish_stale_unassigned(now, retry_after_ms);
        if republished > 0 {
            tracing::info!(count = republished, "republished stale unassigned sub-expressions");
        }
    }
}

#[cfg(test)]
#[path = "liveness_tests.rs"]
mod tests;
