// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The store handle and its tables.

use abacus_core::{AgentId, AgentRecord, ExprId, Expression, SubExpression, SubId, UserId};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Continuous feed of sub-expressions that became ready for dispatch.
pub type ReadyStream = mpsc::UnboundedReceiver<SubExpression>;

/// In-memory tables. One lock serialises all access.
#[derive(Default)]
pub(crate) struct Tables {
    pub expressions: HashMap<ExprId, Expression>,
    pub sub_expressions: HashMap<SubId, SubExpression>,
    pub agents: HashMap<AgentId, AgentRecord>,
    /// (user, idempotency key) → expression id.
    pub idempotency: HashMap<(UserId, String), ExprId>,
}

/// Cheap-to-clone repository handle shared by all workers.
#[derive(Clone)]
pub struct Store {
    tables: Arc<Mutex<Tables>>,
    ready_tx: mpsc::UnboundedSender<SubExpression>,
}

impl Store {
    /// Create an empty store together with its ready stream. The stream has
    /// a single consumer: the dispatcher.
    pub fn new() -> (Self, ReadyStream) {
        let (ready_tx, ready_rx) = mpsc::unbounded_channel();
        let store = Self {
            tables: Arc::new(Mutex::new(Tables::default())),
            ready_tx,
        };
        (store, ready_rx)
    }

    pub(crate) fn with<T>(&self, f: impl FnOnce(&mut Tables) -> T) -> T {
        let mut guard = self.tables.lock();
        f(&mut guard)
    }

    /// Emit a row on the ready stream. The send is lossless while the
    /// dispatcher lives; after shutdown the row simply stays in the tables.
    pub(crate) fn emit_ready(&self, sub: &SubExpression) {
        if self.ready_tx.send(sub.clone()).is_err() {
            tracing::warn!(sub = %sub.id, "ready stream consumer gone, row kept unpublished");
        }
    }
}
