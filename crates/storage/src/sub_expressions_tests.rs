// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::store::{ReadyStream, Store};
use abacus_core::{sub_expression, AgentId, ExprId, Operand, Operator, SubExpression, SubId};

fn drain(ready: &mut ReadyStream) -> Vec<SubExpression> {
    let mut out = Vec::new();
    while let Ok(sub) = ready.try_recv() {
        out.push(sub);
    }
    out
}

/// 2+2*2 as two records: sub-1 = 2*2 (ready), sub-2 = 2 + sub-1 (root).
fn seed_chain(store: &Store) -> (SubId, SubId) {
    store.create_sub_expressions(vec![
        sub_expression(
            "sub-1",
            "exp-1",
            Operator::Mul,
            Operand::literal(2.0),
            Operand::literal(2.0),
            false,
        ),
        sub_expression(
            "sub-2",
            "exp-1",
            Operator::Add,
            Operand::literal(2.0),
            Operand::reference("sub-1".into()),
            true,
        ),
    ]);
    (SubId::from_string("sub-1"), SubId::from_string("sub-2"))
}

#[test]
fn create_emits_only_ready_rows() {
    let (store, mut ready) = Store::new();
    let (leaf, _root) = seed_chain(&store);

    let emitted = drain(&mut ready);
    assert_eq!(emitted.len(), 1);
    assert_eq!(emitted[0].id, leaf);
}

#[test]
fn write_result_propagates_and_emits_newly_ready_dependents() {
    let (store, mut ready) = Store::new();
    let (leaf, root) = seed_chain(&store);
    drain(&mut ready);

    let completed = store.write_result(&leaf, 4.0, 2_000).unwrap();
    assert_eq!(completed.result, Some(4.0));

    let emitted = drain(&mut ready);
    assert_eq!(emitted.len(), 1);
    assert_eq!(emitted[0].id, root);
    assert_eq!(emitted[0].left.value, Some(2.0));
    assert_eq!(emitted[0].right.value, Some(4.0));
    assert!(emitted[0].right.depends_on.is_none());
}

#[test]
fn duplicate_write_result_is_a_no_op() {
    let (store, mut ready) = Store::new();
    let (leaf, _root) = seed_chain(&store);
    drain(&mut ready);

    assert!(store.write_result(&leaf, 4.0, 2_000).is_some());
    // Redelivered result message: ignored, nothing re-emitted
    assert!(store.write_result(&leaf, 4.0, 3_000).is_none());
    assert!(drain(&mut ready).is_empty());
}

#[test]
fn write_result_for_missing_row_is_a_no_op() {
    let (store, mut ready) = Store::new();
    assert!(store
        .write_result(&SubId::from_string("sub-gone"), 1.0, 2_000)
        .is_none());
    assert!(drain(&mut ready).is_empty());
}

#[test]
fn assignment_is_advisory_and_queryable() {
    let (store, _ready) = Store::new();
    let (leaf, _root) = seed_chain(&store);
    let agent = AgentId::from_string("agt-1");

    assert!(store.set_assigned_agent(&leaf, &agent, 2_000));
    let pending = store.get_uncalculated_by_agent(&agent);
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, leaf);

    // Completed rows drop out of the uncalculated view
    store.write_result(&leaf, 4.0, 3_000);
    assert!(store.get_uncalculated_by_agent(&agent).is_empty());
}

#[test]
fn set_assigned_agent_on_missing_row_reports_false() {
    let (store, _ready) = Store::new();
    assert!(!store.set_assigned_agent(
        &SubId::from_string("sub-gone"),
        &AgentId::from_string("agt-1"),
        2_000
    ));
}

#[test]
fn replace_operand_refs_rewrites_dependents() {
    let (store, _ready) = Store::new();
    let (leaf, root) = seed_chain(&store);
    let fresh = SubId::from_string("sub-fresh");

    assert_eq!(store.replace_operand_refs(&leaf, &fresh, 2_000), 1);
    let rows = store.list_sub_expressions();
    let root_row = rows.iter().find(|s| s.id == root).unwrap();
    assert_eq!(root_row.right.depends_on, Some(fresh));
}

#[test]
fn reassign_swaps_id_atomically_and_emits_when_ready() {
    let (store, mut ready) = Store::new();
    let (leaf, root) = seed_chain(&store);
    drain(&mut ready);
    store.set_assigned_agent(&leaf, &AgentId::from_string("agt-dead"), 1_500);

    let replacement = store
        .reassign_sub_expression(&leaf, SubId::from_string("sub-fresh"), 2_000)
        .unwrap();
    assert_eq!(replacement.id, "sub-fresh");
    assert!(replacement.assigned_agent.is_none());

    let rows = store.list_sub_expressions();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|s| s.id != leaf));
    let root_row = rows.iter().find(|s| s.id == root).unwrap();
    assert!(root_row.depends_on(&replacement.id));

    // Ready again under its new id
    let emitted = drain(&mut ready);
    assert_eq!(emitted.len(), 1);
    assert_eq!(emitted[0].id, replacement.id);
}

#[test]
fn reassign_skips_missing_and_resolved_rows() {
    let (store, mut ready) = Store::new();
    let (leaf, _root) = seed_chain(&store);
    drain(&mut ready);

    store.write_result(&leaf, 4.0, 2_000);
    assert!(store
        .reassign_sub_expression(&leaf, SubId::from_string("sub-a"), 3_000)
        .is_none());
    assert!(store
        .reassign_sub_expression(&SubId::from_string("sub-gone"), SubId::from_string("sub-b"), 3_000)
        .is_none());
}

#[test]
fn unready_reassignment_is_not_emitted() {
    let (store, mut ready) = Store::new();
    store.create_sub_expressions(vec![sub_expression(
        "sub-blocked",
        "exp-1",
        Operator::Add,
        Operand::reference("sub-dep".into()),
        Operand::literal(1.0),
        false,
    )]);
    drain(&mut ready);

    // A blocked node can still be migrated off a dead agent; it must not be
    // published until its dependency resolves
    let replacement = store
        .reassign_sub_expression(
            &SubId::from_string("sub-blocked"),
            SubId::from_string("sub-fresh"),
            2_000,
        )
        .unwrap();
    assert!(!replacement.is_ready());
    assert!(drain(&mut ready).is_empty());
}

#[test]
fn republish_stale_unassigned_reemits_and_stamps() {
    let (store, mut ready) = Store::new();
    let (leaf, _root) = seed_chain(&store); // created at 1_000
    drain(&mut ready);

    // Not yet past the threshold
    assert_eq!(store.republish_stale_unassigned(5_000, 10_000), 0);
    // Past it: republished once, then quiet until the threshold lapses again
    assert_eq!(store.republish_stale_unassigned(12_000, 10_000), 1);
    let emitted = drain(&mut ready);
    assert_eq!(emitted.len(), 1);
    assert_eq!(emitted[0].id, leaf);
    assert_eq!(store.republish_stale_unassigned(13_000, 10_000), 0);
}

#[test]
fn republish_ignores_assigned_rows() {
    let (store, mut ready) = Store::new();
    let (leaf, _root) = seed_chain(&store);
    drain(&mut ready);
    store.set_assigned_agent(&leaf, &AgentId::from_string("agt-1"), 1_000);

    assert_eq!(store.republish_stale_unassigned(50_000, 10_000), 0);
    assert!(drain(&mut ready).is_empty());
}

#[test]
fn delete_by_expression_removes_only_that_graph() {
    let (store, _ready) = Store::new();
    seed_chain(&store);
    store.create_sub_expressions(vec![sub_expression(
        "sub-other",
        "exp-2",
        Operator::Sub,
        Operand::literal(1.0),
        Operand::literal(1.0),
        true,
    )]);

    assert_eq!(store.delete_by_expression(&ExprId::from_string("exp-1")), 2);
    let rows = store.list_sub_expressions();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, "sub-other");
}
