// Test module - relaxed lint rules
#![allow(clippy::default_trait_access)]
#![allow(clippy::indexing_slicing)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::panic)]
#![allow(clippy::manual_assert)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(missing_docs)]

use std::fs;
use std::path::PathBuf;

use agent_message::params::find_references;
use agent_message::parser::{decode_command_message, encode_command_payload, parse_message_str};
use agent_message::{parse_message_with_params, CommandPayload, ErrorCode, MessageLog};
use serde_json::json;

fn testdata(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/testdata")
        .join(name)
}

fn load_file(name: &str) -> Vec<u8> {
    fs::read(testdata(name)).unwrap()
}

fn load_message_from_file(name: &str) -> CommandPayload {
    serde_json::from_slice(&load_file(name)).unwrap()
}

fn message(document_content: &serde_json::Value, parameters: &serde_json::Value) -> String {
    json!({
        "Parameters": parameters,
        "DocumentContent": document_content,
        "CommandId": "cmd-1",
        "DocumentName": "AWS-RunShellScript",
        "OutputS3KeyPrefix": "prefix",
        "OutputS3BucketName": "bucket"
    })
    .to_string()
}

// =============================================================================
// Sample Messages
// =============================================================================

#[test]
fn sample_message_matches_replaced_params_file() {
    let log = MessageLog::disabled();
    let parsed = parse_message_with_params(&log, &load_file("sample_msg.json")).unwrap();
    let expected = load_message_from_file("sample_msg_replaced_params.json");
    assert_eq!(parsed, expected);
}

#[test]
fn sample_message_fields_are_decoded() {
    let parsed =
        parse_message_with_params(&MessageLog::disabled(), &load_file("sample_msg.json")).unwrap();
    assert_eq!(parsed.command_id, "55e1c6c6-1fbe-41c3-9d9b-ba0c0a7c47f9");
    assert_eq!(parsed.document_name, "AWS-RunShellScript");
    assert_eq!(parsed.output_s3_bucket_name, "agent-output-bucket");
    assert_eq!(
        parsed.output_s3_key_prefix,
        "commands/55e1c6c6-1fbe-41c3-9d9b-ba0c0a7c47f9"
    );
    assert_eq!(
        parsed.parameters.get("commands"),
        Some(&["ls -la".to_string(), "echo done".to_string()][..])
    );
    assert_eq!(
        parsed.parameters.get("workingDirectory"),
        Some(&["/var/tmp".to_string()][..])
    );
    assert!(find_references(&parsed.document_content).is_empty());
}

#[test]
fn parsing_is_deterministic() {
    let raw = load_file("sample_msg.json");
    let log = MessageLog::disabled();
    let first = parse_message_with_params(&log, &raw).unwrap();
    let second = parse_message_with_params(&log, &raw).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        encode_command_payload(&first).unwrap(),
        encode_command_payload(&second).unwrap()
    );
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn substitutes_command_line_parameter() {
    let raw = message(
        &json!({"plugin": "aws:runShellScript", "parameters": {"commands": "{{commandLine}}"}}),
        &json!({"commandLine": ["echo hi"]}),
    );
    let parsed = parse_message_str(&MessageLog::disabled(), &raw).unwrap();
    assert_eq!(
        parsed.document_content,
        json!({"plugin": "aws:runShellScript", "parameters": {"commands": "echo hi"}})
    );
}

#[test]
fn missing_parameter_fails_the_parse() {
    let raw = message(
        &json!({"plugin": "aws:runShellScript", "parameters": {"commands": "{{missingParam}}"}}),
        &json!({"commandLine": ["echo hi"]}),
    );
    let err = parse_message_str(&MessageLog::disabled(), &raw).unwrap_err();
    assert_eq!(err.code(), ErrorCode::UnresolvedParameter);
}

#[test]
fn absent_parameters_section_is_empty() {
    let raw = json!({
        "DocumentContent": {"run": "static"},
        "CommandId": "cmd-2",
        "DocumentName": "Doc"
    })
    .to_string();
    let parsed = parse_message_str(&MessageLog::disabled(), &raw).unwrap();
    assert!(parsed.parameters.is_empty());
    assert_eq!(parsed.output_s3_bucket_name, "");
    assert_eq!(parsed.output_s3_key_prefix, "");
}

// =============================================================================
// Malformed Messages
// =============================================================================

#[test]
fn malformed_messages_are_rejected() {
    let log = MessageLog::disabled();
    let cases = vec![
        "not json".to_string(),
        "[]".to_string(),
        "\"text\"".to_string(),
        json!({"DocumentContent": {}, "DocumentName": "Doc"}).to_string(),
        json!({"CommandId": "c", "DocumentName": "Doc"}).to_string(),
        json!({"CommandId": 7, "DocumentContent": {}, "DocumentName": "Doc"}).to_string(),
        json!({"CommandId": "", "DocumentContent": {}, "DocumentName": "Doc"}).to_string(),
        json!({"CommandId": "c", "DocumentContent": "text", "DocumentName": "Doc"}).to_string(),
        json!({"CommandId": "c", "DocumentContent": {}, "DocumentName": "Doc", "Parameters": {"p": 1}}).to_string(),
        json!({"CommandId": "c", "DocumentContent": {}, "DocumentName": "Doc", "Parameters": {"p": ["a", 2]}}).to_string(),
        json!({"CommandId": "c", "DocumentContent": {}, "DocumentName": "Doc", "Parameters": []}).to_string(),
    ];
    for raw in cases {
        let err = parse_message_str(&log, &raw).unwrap_err();
        assert_eq!(err.code(), ErrorCode::MalformedMessage, "input: {raw}");
    }
}

#[test]
fn malformed_error_info_is_structured() {
    let err = parse_message_str(&MessageLog::disabled(), "{").unwrap_err();
    let info = err.to_error_info();
    assert_eq!(info.code, "E_MALFORMED_MESSAGE");
    assert!(info.message.starts_with("malformed message"));
    assert!(info.context.is_some());
}

// =============================================================================
// Encoding
// =============================================================================

#[test]
fn encoded_payload_uses_wire_field_names_in_order() {
    let parsed =
        parse_message_with_params(&MessageLog::disabled(), &load_file("sample_msg.json")).unwrap();
    let encoded = String::from_utf8(encode_command_payload(&parsed).unwrap()).unwrap();
    let positions: Vec<usize> = [
        "\"Parameters\"",
        "\"DocumentContent\"",
        "\"CommandId\"",
        "\"DocumentName\"",
        "\"OutputS3KeyPrefix\"",
        "\"OutputS3BucketName\"",
    ]
    .iter()
    .map(|field| encoded.find(field).unwrap())
    .collect();
    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn document_content_keeps_key_order() {
    let raw = message(&json!({"zeta": 1, "alpha": 2, "mid": "{{p}}"}), &json!({"p": "v"}));
    let parsed = parse_message_str(&MessageLog::disabled(), &raw).unwrap();
    let encoded = serde_json::to_string(&parsed.document_content).unwrap();
    assert_eq!(encoded, r#"{"zeta":1,"alpha":2,"mid":"v"}"#);
}

#[test]
fn encoded_payload_decodes_to_the_same_value() {
    let parsed =
        parse_message_with_params(&MessageLog::disabled(), &load_file("sample_msg.json")).unwrap();
    let encoded = encode_command_payload(&parsed).unwrap();
    let decoded: CommandPayload = serde_json::from_slice(&encoded).unwrap();
    assert_eq!(decoded, parsed);
}

#[test]
fn decode_only_leaves_references_in_place() {
    let raw = message(&json!({"run": "{{ missing }}"}), &json!({}));
    let decoded = decode_command_message(&MessageLog::disabled(), raw.as_bytes()).unwrap();
    assert_eq!(decoded.document_content, json!({"run": "{{ missing }}"}));
    assert_eq!(find_references(&decoded.document_content).len(), 1);
}

// =============================================================================
// Declared Defaults
// =============================================================================

fn declaring(defaults: &serde_json::Value, runtime: &serde_json::Value) -> serde_json::Value {
    json!({"schemaVersion": "1.2", "parameters": defaults, "runtimeConfig": runtime})
}

#[test]
fn omitted_parameter_takes_declared_default() {
    let content = declaring(
        &json!({"executionTimeout": {"type": "String", "default": "3600"}}),
        &json!({"t": "{{ executionTimeout }}"}),
    );
    let parsed = parse_message_str(&MessageLog::disabled(), &message(&content, &json!({}))).unwrap();
    assert_eq!(parsed.document_content["runtimeConfig"]["t"], "3600");
    assert_eq!(
        parsed.parameters.get("executionTimeout"),
        Some(&["3600".to_string()][..])
    );
}

#[test]
fn sent_value_wins_over_declared_default() {
    let content = declaring(
        &json!({"workingDirectory": {"default": ""}}),
        &json!({"cwd": "{{ workingDirectory }}"}),
    );
    let raw = message(&content, &json!({"workingDirectory": "/srv"}));
    let parsed = parse_message_str(&MessageLog::disabled(), &raw).unwrap();
    assert_eq!(parsed.document_content["runtimeConfig"]["cwd"], "/srv");
}

#[test]
fn list_default_supports_indexing_and_empty_string_default() {
    let content = declaring(
        &json!({
            "commands": {"type": "StringList", "default": ["ls", "pwd"]},
            "workingDirectory": {"type": "String", "default": ""}
        }),
        &json!({"run": "{{ commands[1] }}", "cwd": "{{ workingDirectory }}"}),
    );
    let parsed = parse_message_str(&MessageLog::disabled(), &message(&content, &json!({}))).unwrap();
    assert_eq!(parsed.document_content["runtimeConfig"]["run"], "pwd");
    assert_eq!(parsed.document_content["runtimeConfig"]["cwd"], "");
}

#[test]
fn non_string_default_is_not_used() {
    let content = declaring(
        &json!({"retries": {"default": 3}}),
        &json!({"n": "{{ retries }}"}),
    );
    let err = parse_message_str(&MessageLog::disabled(), &message(&content, &json!({}))).unwrap_err();
    assert_eq!(err.code(), ErrorCode::UnresolvedParameter);
}

#[test]
fn sample_message_without_optional_parameters_uses_defaults() {
    let mut raw: serde_json::Value = serde_json::from_slice(&load_file("sample_msg.json")).unwrap();
    let sent = raw["Parameters"].as_object_mut().unwrap();
    sent.remove("workingDirectory");
    sent.remove("executionTimeout");
    let parsed = parse_message_with_params(
        &MessageLog::disabled(),
        &serde_json::to_vec(&raw).unwrap(),
    )
    .unwrap();
    let properties = &parsed.document_content["runtimeConfig"]["aws:runShellScript"]["properties"][0];
    assert_eq!(properties["workingDirectory"], "");
    assert_eq!(properties["timeoutSeconds"], "3600");
    assert!(find_references(&parsed.document_content).is_empty());
}

#[test]
fn parameter_value_cannot_carry_an_undefined_reference() {
    let raw = message(&json!({"run": "{{p}}"}), &json!({"p": ["{{ missing }}"]}));
    let err = parse_message_str(&MessageLog::disabled(), &raw).unwrap_err();
    assert_eq!(err.code(), ErrorCode::UnresolvedParameter);
    assert_eq!(err.to_error_info().context.unwrap()["parameter"], "missing");
}
