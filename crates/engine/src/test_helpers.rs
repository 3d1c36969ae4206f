// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixtures for engine tests.

use crate::orchestrator::Orchestrator;
use abacus_bus::{Bus, InMemoryBus};
use abacus_core::{FakeClock, OrchestratorConfig, SequentialIdGen, SubExpression, UserId};
use abacus_storage::{ReadyStream, Store};
use std::sync::Arc;
use std::time::Duration;

pub(crate) struct Harness {
    pub orchestrator: Arc<Orchestrator<FakeClock>>,
    pub bus: Arc<InMemoryBus>,
    pub clock: FakeClock,
    pub ready: ReadyStream,
    pub user: UserId,
}

pub(crate) fn harness() -> Harness {
    harness_with(OrchestratorConfig::default())
}

pub(crate) fn harness_with(config: OrchestratorConfig) -> Harness {
    let (store, ready) = Store::new();
    let clock = FakeClock::new();
    let bus = Arc::new(InMemoryBus::new());
    let dyn_bus: Arc<dyn Bus> = bus.clone();
    let orchestrator = Arc::new(Orchestrator::new(
        store,
        dyn_bus,
        config,
        clock.clone(),
        Arc::new(SequentialIdGen::new("sub")),
    ));
    Harness { orchestrator, bus, clock, ready, user: UserId::new("7") }
}

pub(crate) fn drain(ready: &mut ReadyStream) -> Vec<SubExpression> {
    let mut out = Vec::new();
    while let Ok(sub) = ready.try_recv() {
        out.push(sub);
    }
    out
}

/// Poll until `cond` holds, failing the test after one second.
pub(crate) async fn wait_until(mut cond: impl FnMut() -> bool) {
    for _ in 0..100 {
        if cond() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not reached within 1s");
}
