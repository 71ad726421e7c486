// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn parses_from_lowercase_json_strings() {
    let runtime: Runtime = serde_json::from_str("\"python27\"").unwrap();
    assert_eq!(runtime, Runtime::Python27);
    let runtime: Runtime = serde_json::from_str("\"java\"").unwrap();
    assert_eq!(runtime, Runtime::Java);
}

#[yare::parameterized(
    python27 = { Runtime::Python27, true },
    go = { Runtime::Go, true },
    php = { Runtime::Php, true },
    java = { Runtime::Java, false },
)]
fn shared_launcher_grouping(runtime: Runtime, expected: bool) {
    assert_eq!(runtime.uses_shared_launcher(), expected);
}

#[test]
fn display_matches_wire_representation() {
    assert_eq!(Runtime::Python27.to_string(), "python27");
    assert_eq!(Runtime::Go.to_string(), "go");
}
