//! Tests for the panicking assertion helpers.
//!
//! The helpers read `JSON_MATCHERS_SCHEMA_ROOT`, so everything that touches
//! the environment lives in a single test to avoid cross-test races.

use std::fs;
use std::panic::{catch_unwind, AssertUnwindSafe};

use json_matchers::{
    assert_response_schema, assert_response_schema_with, match_response_schema,
    refute_response_schema, MatcherOptions,
};
use serde_json::json;

fn panic_message(result: std::thread::Result<()>) -> String {
    let payload = result.expect_err("assertion should have panicked");
    if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        String::new()
    }
}

#[test]
fn named_schema_assertions() {
    let tmp = tempfile::tempdir().unwrap();
    fs::write(
        tmp.path().join("user.json"),
        r#"{"type": "object", "required": ["id"], "properties": {"id": {"type": "integer"}}, "additionalProperties": false}"#,
    )
    .unwrap();
    fs::write(tmp.path().join("broken.json"), "{").unwrap();

    std::env::set_var("JSON_MATCHERS_SCHEMA_ROOT", tmp.path());
    std::env::remove_var("JSON_MATCHERS_STRICT");

    let matcher = match_response_schema("user");
    assert_eq!(matcher.schema_path(), tmp.path().join("user.json").as_path());

    assert_response_schema("user", r#"{"id": 1}"#);
    assert_response_schema("user.json", &json!({"id": 2}));
    refute_response_schema("user", r#"{"id": "one"}"#);
    assert_response_schema_with(
        "user",
        &json!({"id": 3, "name": "extra"}),
        MatcherOptions::new().strict(false),
    );

    let message = panic_message(catch_unwind(AssertUnwindSafe(|| {
        assert_response_schema("user", &json!({"bar": 5}));
    })));
    assert!(message.contains(r#"{"bar":5}"#), "message: {message}");

    let message = panic_message(catch_unwind(AssertUnwindSafe(|| {
        refute_response_schema("user", &json!({"id": 1}));
    })));
    assert!(message.contains("not to match"), "message: {message}");

    let message = panic_message(catch_unwind(AssertUnwindSafe(|| {
        assert_response_schema("broken", "{}");
    })));
    assert!(message.contains("broken.json"), "message: {message}");

    std::env::set_var("JSON_MATCHERS_STRICT", "false");
    assert_response_schema("user", &json!({"id": 4, "name": "extra"}));

    std::env::remove_var("JSON_MATCHERS_STRICT");
    std::env::remove_var("JSON_MATCHERS_SCHEMA_ROOT");
}
