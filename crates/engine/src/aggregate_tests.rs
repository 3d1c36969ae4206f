// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::test_helpers::{drain, harness, Harness};
use abacus_core::{ExpressionState, ExprId, Operator, SubId};

fn result_payload(id: &SubId, expression_id: &ExprId, result: f64, is_last: bool) -> Vec<u8> {
    format!(
        r#"{{"id":"{}","expressionId":"{}","result":{},"error":false,"isLast":{}}}"#,
        id.as_str(),
        expression_id.as_str(),
        result,
        is_last
    )
    .into_bytes()
}

fn error_payload(id: &SubId, expression_id: &ExprId) -> Vec<u8> {
    format!(
        r#"{{"id":"{}","expressionId":"{}","error":true,"isLast":false}}"#,
        id.as_str(),
        expression_id.as_str()
    )
    .into_bytes()
}

/// Submit `2+2*2` and return (harness, expression id, leaf id, root id).
fn submitted() -> (Harness, ExprId, SubId, SubId) {
    let mut h = harness();
    let id = h.orchestrator.create_expression(&h.user, "2+2*2", "key").unwrap();
    drain(&mut h.ready);
    let subs = h.orchestrator.store.list_sub_expressions();
    let leaf = subs.iter().find(|s| !s.is_last).map(|s| s.id.clone()).unwrap();
    let root = subs.iter().find(|s| s.is_last).map(|s| s.id.clone()).unwrap();
    (h, id, leaf, root)
}

#[test]
fn intermediate_result_propagates_and_deletes_the_row() {
    let (mut h, id, leaf, root) = submitted();

    h.orchestrator.handle_result(&result_payload(&leaf, &id, 4.0, false));

    let subs = h.orchestrator.store.list_sub_expressions();
    assert_eq!(subs.len(), 1);
    assert_eq!(subs[0].id, root);
    assert_eq!(subs[0].right.value, Some(4.0));

    // The root became ready and was emitted for dispatch
    let emitted = drain(&mut h.ready);
    assert_eq!(emitted.len(), 1);
    assert_eq!(emitted[0].id, root);
    assert_eq!(emitted[0].op, Operator::Add);
}

#[test]
fn final_result_completes_the_expression_and_purges_the_graph() {
    let (h, id, leaf, root) = submitted();

    h.orchestrator.handle_result(&result_payload(&leaf, &id, 4.0, false));
    h.orchestrator.handle_result(&result_payload(&root, &id, 6.0, true));

    let row = h.orchestrator.get_expression(&h.user, &id).unwrap();
    assert_eq!(row.state, ExpressionState::Done);
    assert_eq!(row.result, Some(6.0));
    assert!(h.orchestrator.store.list_sub_expressions().is_empty());
}

#[test]
fn error_result_poisons_the_expression() {
    let (h, id, leaf, _root) = submitted();

    h.orchestrator.handle_result(&error_payload(&leaf, &id));

    let row = h.orchestrator.get_expression(&h.user, &id).unwrap();
    assert_eq!(row.state, ExpressionState::Error);
    assert!(row.result.is_none());
    assert!(h.orchestrator.store.list_sub_expressions().is_empty());
}

#[test]
fn results_after_an_error_purge_are_ignored() {
    let (h, id, leaf, root) = submitted();

    h.orchestrator.handle_result(&error_payload(&leaf, &id));
    // The sibling's result arrives late, referencing a purged row
    h.orchestrator.handle_result(&result_payload(&root, &id, 6.0, true));

    let row = h.orchestrator.get_expression(&h.user, &id).unwrap();
    assert_eq!(row.state, ExpressionState::Error);
    assert!(row.result.is_none());
}

#[test]
fn duplicate_results_are_processed_once() {
    let (mut h, id, leaf, _root) = submitted();

    let payload = result_payload(&leaf, &id, 4.0, false);
    h.orchestrator.handle_result(&payload);
    h.orchestrator.handle_result(&payload);

    // One propagation, one emission: no double-fill of the dependent
    let subs = h.orchestrator.store.list_sub_expressions();
    assert_eq!(subs.len(), 1);
    assert_eq!(drain(&mut h.ready).len(), 1);
}

#[test]
fn undecodable_result_is_dropped() {
    let (h, id, _leaf, _root) = submitted();
    h.orchestrator.handle_result(b"garbage");
    let row = h.orchestrator.get_expression(&h.user, &id).unwrap();
    assert_eq!(row.state, ExpressionState::Pending);
    assert_eq!(h.orchestrator.store.list_sub_expressions().len(), 2);
}
