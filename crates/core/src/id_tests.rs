// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_support::SequentialIdGen;
use std::collections::HashMap;

#[test]
fn generated_ids_carry_prefix_and_are_unique() {
    let a = ExprId::new();
    let b = ExprId::new();
    assert!(a.as_str().starts_with("exp-"));
    assert_eq!(a.as_str().len(), "exp-".len() + ID_SUFFIX_LEN);
    assert_ne!(a, b);
}

#[test]
fn from_string_accepts_unprefixed_uuids() {
    let raw = "550e8400-e29b-41d4-a716-446655440000";
    let id = SubId::from_string(raw);
    assert_eq!(id.as_str(), raw);
}

#[test]
fn hash_map_lookup_by_str() {
    let mut map = HashMap::new();
    map.insert(AgentId::from_string("agt-k"), 42);
    assert_eq!(map.get("agt-k"), Some(&42));
}

#[test]
fn short_truncates() {
    let id = ExprId::from_string("exp-abcdefghijklmnop");
    assert_eq!(id.short(8), "exp-abcd");
    assert_eq!(id.short(100), "exp-abcdefghijklmnop");
}

#[test]
fn serde_is_transparent() {
    let id = SubId::from_string("sub-x1");
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, "\"sub-x1\"");
    let back: SubId = serde_json::from_str(&json).unwrap();
    assert_eq!(back, id);
}

#[test]
fn uuid_gen_creates_unique_ids() {
    let gen = UuidIdGen;
    let id1 = gen.next();
    let id2 = gen.next();
    assert_ne!(id1, id2);
    assert_eq!(id1.len(), 36); // UUID format
}

#[test]
fn sequential_gen_creates_predictable_ids() {
    let gen = SequentialIdGen::new("test");
    assert_eq!(gen.next(), "test-1");
    assert_eq!(gen.next(), "test-2");
    assert_eq!(gen.next(), "test-3");
}

#[test]
fn sequential_gen_is_cloneable_and_shared() {
    let gen1 = SequentialIdGen::new("shared");
    let gen2 = gen1.clone();
    assert_eq!(gen1.next(), "shared-1");
    assert_eq!(gen2.next(), "shared-2");
    assert_eq!(gen1.next(), "shared-3");
}

#[test]
fn user_id_round_trips() {
    let user = UserId::new("7");
    assert_eq!(user.as_str(), "7");
    assert_eq!(serde_json::to_string(&user).unwrap(), "\"7\"");
}
