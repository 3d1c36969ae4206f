// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Orchestrator construction, worker supervision, and the submission path.

use crate::error::SubmitError;
use abacus_bus::Bus;
use abacus_core::{
    AgentRecord, Clock, ExprId, Expression, IdGen, Operator, OrchestratorConfig, UserId,
};
use abacus_expr::SplitPlan;
use abacus_storage::{ReadyStream, Store};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// The orchestration core. Shared by the RPC surface and the background
/// workers; all durable state lives in the store, so the struct itself is
/// stateless beyond its collaborators.
pub struct Orchestrator<C: Clock> {
    pub(crate) store: Store,
    pub(crate) bus: Arc<dyn Bus>,
    pub(crate) config: OrchestratorConfig,
    pub(crate) clock: C,
    pub(crate) ids: Arc<dyn IdGen>,
}

impl<C: Clock> Orchestrator<C> {
    pub fn new(
        store: Store,
        bus: Arc<dyn Bus>,
        config: OrchestratorConfig,
        clock: C,
        ids: Arc<dyn IdGen>,
    ) -> Self {
        Self { store, bus, config, clock, ids }
    }

    /// Launch the five background workers. Each stops on `shutdown`; bus
    /// subscriptions are released when the worker returns, on every exit
    /// path.
    pub fn spawn(
        self: &Arc<Self>,
        ready: ReadyStream,
        shutdown: CancellationToken,
    ) -> Vec<JoinHandle<()>> {
        vec![
            tokio::spawn(Self::run_dispatcher(Arc::clone(self), ready, shutdown.clone())),
            tokio::spawn(Self::run_ack_consumer(Arc::clone(self), shutdown.clone())),
            tokio::spawn(Self::run_aggregator(Arc::clone(self), shutdown.clone())),
            tokio::spawn(Self::run_heartbeat_consumer(Arc::clone(self), shutdown.clone())),
            tokio::spawn(Self::run_retry_ticker(Arc::clone(self), shutdown)),
        ]
    }

    /// Persist and decompose a submission.
    ///
    /// Resubmitting an idempotency key returns the existing id without
    /// creating anything. A bare literal needs no agent work and completes
    /// immediately. If decomposition fails after the row was written, every
    /// partial write is rolled back before the error is returned.
    pub fn create_expression(
        &self,
        user: &UserId,
        text: &str,
        idempotency_key: &str,
    ) -> Result<ExprId, SubmitError> {
        if !abacus_expr::validate(text) {
            return Err(SubmitError::InvalidExpression);
        }
        if let Some(existing) = self.store.get_expression_by_key(user, idempotency_key) {
            tracing::debug!(expression = %existing.id, "idempotent resubmission");
            return Ok(existing.id);
        }

        let now = self.clock.epoch_ms();
        let (expression, created) =
            self.store.create_expression(user, text, idempotency_key, now);
        if !created {
            return Ok(expression.id);
        }

        match abacus_expr::split(&expression.id, text, self.ids.as_ref(), now) {
            Ok(SplitPlan::Literal(value)) => {
                self.store.set_expression_result(&expression.id, value)?;
                tracing::info!(expression = %expression.id, value, "literal short-circuited");
                Ok(expression.id)
            }
            Ok(SplitPlan::Graph(subs)) => {
                tracing::info!(
                    expression = %expression.id,
                    nodes = subs.len(),
                    "expression decomposed"
                );
                self.store.create_sub_expressions(subs);
                Ok(expression.id)
            }
            Err(err) => {
                self.store.delete_expression(&expression.id);
                tracing::warn!(expression = %expression.id, error = %err, "split failed, rolled back");
                Err(err.into())
            }
        }
    }

    pub fn get_expression(
        &self,
        user: &UserId,
        id: &ExprId,
    ) -> Result<Expression, abacus_storage::StorageError> {
        self.store.get_expression(id, user)
    }

    pub fn list_expressions(&self, user: &UserId) -> Vec<Expression> {
        self.store.list_expressions(user)
    }

    pub fn list_agents(&self) -> Vec<AgentRecord> {
        self.store.list_agents()
    }

    /// The four operators with their configured timeouts.
    pub fn operators(&self) -> [(Operator, u64); 4] {
        self.config.timeouts.entries()
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Direct repository access, for wiring and tests.
    pub fn store(&self) -> &Store {
        &self.store
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
