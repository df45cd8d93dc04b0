//! End-to-end tests over the documented example rule sets.
use remold::{TransformerFactory, execute_expressions, parse_expression};
use serde_json::{Value, json};
use std::fs;

fn parse(path: &str) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

fn run_example(name: &str) {
    let _ = env_logger::builder().is_test(true).try_init();
    let transformer = TransformerFactory::new()
        .from_file(format!("tests/fixtures/{}_transformer.json", name))
        .unwrap();
    let source = parse(&format!("tests/fixtures/{}_source.json", name));
    let expected = parse(&format!("tests/fixtures/{}_result.json", name));
    assert_eq!(transformer.transform(&source), expected, "example: {}", name);
}

#[test]
fn test_quick_start_example() {
    run_example("quick_start");
}

#[test]
fn test_merging_example() {
    run_example("merging");
}

#[test]
fn test_append_example() {
    run_example("append");
}

#[test]
fn test_functions_example() {
    run_example("functions");
}

#[test]
fn test_generate_uuid_shape() {
    let transformer = TransformerFactory::new()
        .from_json_str(r#"{"transformations": [{"expressions": ["generateUuid(/id)"]}]}"#)
        .unwrap();
    let first = transformer.transform(&json!({}));
    let id = first.pointer("/id").unwrap().as_str().unwrap().to_string();
    assert_eq!(id.len(), 36);
    for at in [8, 13, 18, 23] {
        assert_eq!(id.as_bytes()[at], b'-', "hyphen expected at {}", at);
    }
    assert_eq!(id.as_bytes()[14], b'4', "uuid version 4");
    let second = transformer.transform(&json!({}));
    assert_ne!(second.pointer("/id").unwrap().as_str().unwrap(), id);
}

#[test]
fn test_wrapper_function_delegates_to_inner_expression() {
    let transformer = TransformerFactory::new()
        .with_function("withLogger", |ctx, source, result, arg| {
            log::debug!("ctx -> {}", ctx.to_json());
            match parse_expression(arg) {
                Ok(inner) => execute_expressions(ctx, source, result, std::slice::from_ref(&inner)),
                Err(e) => {
                    log::error!("inner expression failed to parse: {}", e);
                    result.clone()
                }
            }
        })
        .from_json_str(r#"{"transformations": [{"expressions": ["withLogger(copy(/a, /b))"]}]}"#)
        .unwrap();
    assert_eq!(transformer.transform(&json!({ "a": 1 })), json!({ "b": 1 }));
}

#[test]
fn test_failing_rule_does_not_abort_later_rules() {
    // first rule hits the array-into-object shape conflict and degrades to
    // a no-op; the second still runs
    let transformer = TransformerFactory::new()
        .from_json_str(
            r#"{"transformations": [
                {"sourcePointer": "/meta", "resultPointer": "/slot"},
                {"sourcePointer": "/xs", "resultPointer": "/slot"},
                {"resultPointer": "/done", "expressions": ["\"yes\""]}
            ]}"#,
        )
        .unwrap();
    let out = transformer.transform(&json!({ "meta": { "k": 1 }, "xs": [1, 2] }));
    assert_eq!(out, json!({ "slot": { "k": 1 }, "done": "yes" }));
}
