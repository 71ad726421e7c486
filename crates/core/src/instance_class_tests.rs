// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn known_class_resolves_to_its_memory() {
    let table = InstanceClassTable::standard();
    assert_eq!(table.max_memory(Some("F1"), DEFAULT_MAX_MEMORY_MB), 128);
}

#[test]
fn unknown_class_falls_back_to_default() {
    let table = InstanceClassTable::standard();
    assert_eq!(
        table.max_memory(Some("not-a-class"), DEFAULT_MAX_MEMORY_MB),
        DEFAULT_MAX_MEMORY_MB
    );
}

#[test]
fn absent_class_falls_back_to_default() {
    let table = InstanceClassTable::standard();
    assert_eq!(table.max_memory(None, DEFAULT_MAX_MEMORY_MB), DEFAULT_MAX_MEMORY_MB);
}
