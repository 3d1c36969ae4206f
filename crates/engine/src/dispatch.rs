// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dispatcher: ready stream → task channel, plus pickup-ack recording.

use crate::orchestrator::Orchestrator;
use abacus_bus::{channel, PickupAck, TaskMessage};
use abacus_core::{Clock, ExpressionState, SubExpression};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

impl<C: Clock> Orchestrator<C> {
    /// Publish every sub-expression that becomes ready. Duplicates on the
    /// stream are acceptable: agents deduplicate on their side and the
    /// retry controller reconciles.
    pub(crate) async fn run_dispatcher(
        this: Arc<Self>,
        mut ready: abacus_storage::ReadyStream,
        shutdown: CancellationToken,
    ) {
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                next = ready.recv() => match next {
                    Some(sub) => this.publish_task(sub).await,
                    None => break,
                },
            }
        }
        tracing::debug!("dispatcher stopped");
    }

    async fn publish_task(&self, sub: SubExpression) {
        let (a, b) = match (sub.left.value, sub.right.value) {
            (Some(a), Some(b)) => (a, b),
            _ => {
                tracing::warn!(sub = %sub.id, "unready row on the ready stream, skipping");
                return;
            }
        };
        let task = TaskMessage {
            id: sub.id.clone(),
            op: sub.op,
            a,
            b,
            is_last: sub.is_last,
            expression_id: sub.expression_id.clone(),
            timeout_ms: self.config.timeouts.for_op(sub.op),
        };
        let payload = match serde_json::to_vec(&task) {
            Ok(payload) => payload,
            Err(err) => {
                tracing::error!(sub = %sub.id, error = %err, "task serialization failed");
                return;
            }
        };
        if let Err(err) = self.bus.publish(channel::TASKS, payload).await {
            // The row stays in the repository; the retry controller
            // republishes it after the liveness timeout.
            tracing::warn!(sub = %sub.id, error = %err, "task publish failed");
            return;
        }
        if let Err(err) = self.store.update_state(&sub.expression_id, ExpressionState::InProgress)
        {
            tracing::debug!(expression = %sub.expression_id, error = %err, "state advance skipped");
        }
        tracing::debug!(sub = %sub.id, op = %sub.op, "task published");
    }

    /// Record which agent picked each task up. The assignment is advisory
    /// metadata for the retry controller only.
    pub(crate) async fn run_ack_consumer(this: Arc<Self>, shutdown: CancellationToken) {
        let mut acks = match this.bus.subscribe(channel::RPC_ACK).await {
            Ok(rx) => rx,
            Err(err) => {
                tracing::error!(error = %err, "ack consumer failed to subscribe");
                return;
            }
        };
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                next = acks.recv() => match next {
                    Some(payload) => this.handle_pickup_ack(&payload),
                    None => break,
                },
            }
        }
        tracing::debug!("ack consumer stopped");
    }

    pub(crate) fn handle_pickup_ack(&self, payload: &[u8]) {
        let ack: PickupAck = match serde_json::from_slice(payload) {
            Ok(ack) => ack,
            Err(err) => {
                tracing::warn!(error = %err, "undecodable pickup ack dropped");
                return;
            }
        };
        let now = self.clock.epoch_ms();
        if self.store.set_assigned_agent(&ack.id_sub_expression, &ack.id_agent, now) {
            tracing::debug!(sub = %ack.id_sub_expression, agent = %ack.id_agent, "task picked up");
        } else {
            // Completed or reassigned before the ack arrived
            tracing::debug!(sub = %ack.id_sub_expression, "ack for missing row ignored");
        }
    }
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
