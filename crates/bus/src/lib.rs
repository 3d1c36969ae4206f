// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! abacus-bus: the message-bus seam between the orchestrator and its agents.
//!
//! The broker itself is an external collaborator and is modelled as a
//! reliable at-least-once queue behind the [`Bus`] trait. [`InMemoryBus`]
//! is the in-process backend used by the daemon and by tests.

mod error;
mod memory;
mod messages;

pub use error::BusError;
pub use memory::InMemoryBus;
pub use messages::{HeartbeatMessage, PickupAck, ResultMessage, TaskMessage};

use async_trait::async_trait;
use tokio::sync::mpsc;

/// Logical channel names carried by the bus.
pub mod channel {
    /// Orchestrator → agents: ready sub-expressions.
    pub const TASKS: &str = "tasks";
    /// Agents → orchestrator: pickup acknowledgements.
    pub const RPC_ACK: &str = "rpc-ack";
    /// Agents → orchestrator: finished tasks.
    pub const RESULTS: &str = "results";
    /// Agents → orchestrator: liveness signals.
    pub const HEARTBEATS: &str = "heartbeats";
}

/// A connection to the message broker.
///
/// Publication blocks until the broker acknowledges the message. Each
/// channel has a single consumer; delivery is at-least-once, so consumers
/// must tolerate duplicates.
#[async_trait]
pub trait Bus: Send + Sync {
    async fn publish(&self, channel: &str, payload: Vec<u8>) -> Result<(), BusError>;

    async fn subscribe(&self, channel: &str) -> Result<mpsc::Receiver<Vec<u8>>, BusError>;
}
