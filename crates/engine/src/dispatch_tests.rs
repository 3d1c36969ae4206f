// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::test_helpers::{harness, wait_until};
use abacus_bus::{channel, Bus, TaskMessage};
use abacus_core::{AgentId, ExpressionState, Operator};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[tokio::test]
async fn dispatcher_publishes_ready_rows_with_configured_timeouts() {
    let h = harness();
    let mut tasks = h.bus.subscribe(channel::TASKS).await.unwrap();
    let shutdown = CancellationToken::new();
    let worker = tokio::spawn(crate::Orchestrator::run_dispatcher(
        Arc::clone(&h.orchestrator),
        h.ready,
        shutdown.clone(),
    ));

    let id = h.orchestrator.create_expression(&h.user, "2+2*2", "key").unwrap();

    let payload = tokio::time::timeout(Duration::from_secs(1), tasks.recv())
        .await
        .unwrap()
        .unwrap();
    let task: TaskMessage = serde_json::from_slice(&payload).unwrap();
    assert_eq!(task.op, Operator::Mul);
    assert_eq!(task.a, 2.0);
    assert_eq!(task.b, 2.0);
    assert!(!task.is_last);
    assert_eq!(task.expression_id, id);
    assert_eq!(task.timeout_ms, 2_000);

    // The expression advances once its first task is on the bus
    let orchestrator = Arc::clone(&h.orchestrator);
    let user = h.user.clone();
    wait_until(move || {
        orchestrator.get_expression(&user, &id).map(|e| e.state)
            == Ok(ExpressionState::InProgress)
    })
    .await;

    shutdown.cancel();
    worker.await.unwrap();
}

#[tokio::test]
async fn dispatcher_survives_publish_failure_and_leaves_the_row() {
    let h = harness();
    // Subscribe and drop: every publish to `tasks` now fails
    drop(h.bus.subscribe(channel::TASKS).await.unwrap());

    let shutdown = CancellationToken::new();
    let worker = tokio::spawn(crate::Orchestrator::run_dispatcher(
        Arc::clone(&h.orchestrator),
        h.ready,
        shutdown.clone(),
    ));

    h.orchestrator.create_expression(&h.user, "1+2", "key").unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    // Row still present and unassigned; the retry tick republishes it later
    let subs = h.orchestrator.store.list_sub_expressions();
    assert_eq!(subs.len(), 1);
    assert!(subs[0].assigned_agent.is_none());
    assert!(subs[0].result.is_none());

    shutdown.cancel();
    worker.await.unwrap();
}

#[tokio::test]
async fn ack_records_the_advisory_assignment() {
    let h = harness();
    h.orchestrator.create_expression(&h.user, "1+2", "key").unwrap();
    let sub_id = h.orchestrator.store.list_sub_expressions()[0].id.clone();

    let payload = format!(
        r#"{{"idSubExpression":"{}","idAgent":"agt-1"}}"#,
        sub_id.as_str()
    );
    h.orchestrator.handle_pickup_ack(payload.as_bytes());

    let agent = AgentId::from_string("agt-1");
    let assigned = h.orchestrator.store.get_uncalculated_by_agent(&agent);
    assert_eq!(assigned.len(), 1);
    assert_eq!(assigned[0].id, sub_id);
}

#[tokio::test]
async fn ack_for_unknown_row_and_garbage_are_ignored() {
    let h = harness();
    h.orchestrator
        .handle_pickup_ack(br#"{"idSubExpression":"sub-gone","idAgent":"agt-1"}"#);
    h.orchestrator.handle_pickup_ack(b"not json");
    assert!(h.orchestrator.store.list_sub_expressions().is_empty());
}
