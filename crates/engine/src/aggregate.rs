// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Result aggregation: collapse completed sub-expressions back into their
//! parent expression.

use crate::orchestrator::Orchestrator;
use abacus_bus::{channel, ResultMessage};
use abacus_core::{Clock, ExpressionState};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

impl<C: Clock> Orchestrator<C> {
    pub(crate) async fn run_aggregator(this: Arc<Self>, shutdown: CancellationToken) {
        let mut results = match this.bus.subscribe(channel::RESULTS).await {
            Ok(rx) => rx,
            Err(err) => {
                tracing::error!(error = %err, "aggregator failed to subscribe");
                return;
            }
        };
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                next = results.recv() => match next {
                    Some(payload) => this.handle_result(&payload),
                    None => break,
                },
            }
        }
        tracing::debug!("aggregator stopped");
    }

    /// Apply one result message.
    ///
    /// Errors poison the whole expression: it is marked `error` and every
    /// remaining sub-expression is purged, so stray results for the same
    /// expression fall into the missing-row path below and are ignored.
    /// Successes write the value, which propagates into dependents inside
    /// the store; the root additionally finalises the expression.
    pub(crate) fn handle_result(&self, payload: &[u8]) {
        let msg: ResultMessage = match serde_json::from_slice(payload) {
            Ok(msg) => msg,
            Err(err) => {
                tracing::warn!(error = %err, "undecodable result message dropped");
                return;
            }
        };

        if msg.error {
            tracing::info!(
                expression = %msg.expression_id,
                sub = %msg.id,
                "agent reported a computation error"
            );
            if let Err(err) = self.store.update_state(&msg.expression_id, ExpressionState::Error)
            {
                tracing::debug!(expression = %msg.expression_id, error = %err, "error state skipped");
            }
            self.store.delete_by_expression(&msg.expression_id);
            return;
        }

        let now = self.clock.epoch_ms();
        let completed = match self.store.write_result(&msg.id, msg.result, now) {
            Some(row) => row,
            None => {
                // Redelivered or orphaned by an earlier error purge
                tracing::debug!(sub = %msg.id, "result for missing or resolved row ignored");
                return;
            }
        };

        if completed.is_last {
            if let Err(err) =
                self.store.set_expression_result(&completed.expression_id, msg.result)
            {
                tracing::warn!(
                    expression = %completed.expression_id,
                    error = %err,
                    "final result write failed"
                );
            }
            self.store.delete_by_expression(&completed.expression_id);
            tracing::info!(
                expression = %completed.expression_id,
                result = msg.result,
                "expression completed"
            );
        } else {
            self.store.delete_sub_expression(&completed.id);
            tracing::debug!(sub = %completed.id, result = msg.result, "sub-expression folded in");
        }
    }
}

#[cfg(test)]
#[path = "aggregate_tests.rs"]
mod tests;
