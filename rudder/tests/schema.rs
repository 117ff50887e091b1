use garde::Validate;
use rudder::{ApiError, SchemaValidator, Source};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Deserialize, Serialize, Validate, JsonSchema)]
struct CreateUser {
    #[garde(length(min = 1))]
    name: String,
    #[garde(email)]
    email: String,
}

#[derive(Debug, Deserialize, Serialize, Validate, JsonSchema)]
struct Paging {
    #[garde(range(min = 1))]
    page: u32,
    #[garde(skip)]
    #[serde(default)]
    archived: bool,
    #[garde(skip)]
    #[serde(default)]
    tags: Vec<String>,
}

fn validation_field(err: &ApiError) -> (&str, &str) {
    match err {
        ApiError::Validation { field, message, .. } => (field.as_str(), message.as_str()),
        other => panic!("expected validation error, got {other}"),
    }
}

// ── Body validation ─────────────────────────────────────────────────────

#[test]
fn valid_body_is_replaced_with_the_parsed_value() {
    let validator = SchemaValidator::of::<CreateUser>(Source::Body);
    let out = validator
        .run(json!({ "name": "alice", "email": "alice@example.com" }))
        .unwrap();
    assert_eq!(out, json!({ "name": "alice", "email": "alice@example.com" }));
}

#[test]
fn garde_rejection_reports_first_field_and_message() {
    let validator = SchemaValidator::of::<CreateUser>(Source::Body);
    let err = validator
        .run(json!({ "name": "", "email": "alice@example.com" }))
        .unwrap_err();

    let (field, message) = validation_field(&err);
    assert_eq!(field, "name");
    assert!(!message.is_empty());
    assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
}

#[test]
fn missing_field_is_a_validation_error() {
    let validator = SchemaValidator::of::<CreateUser>(Source::Body);
    let err = validator.run(json!({ "name": "alice" })).unwrap_err();

    let (field, message) = validation_field(&err);
    assert_eq!(field, "body");
    assert!(message.contains("email"));
}

// ── Query coercion and defaults ─────────────────────────────────────────

#[test]
fn query_strings_coerce_to_schema_scalars() {
    let validator = SchemaValidator::of::<Paging>(Source::Query);
    let out = validator
        .run(json!({ "page": "3", "archived": "true" }))
        .unwrap();

    assert_eq!(out["page"], 3);
    assert_eq!(out["archived"], true);
}

#[test]
fn serde_defaults_appear_in_the_replaced_value() {
    let validator = SchemaValidator::of::<Paging>(Source::Query);
    let out = validator.run(json!({ "page": "1" })).unwrap();

    assert_eq!(out["archived"], false);
    assert_eq!(out["tags"], json!([]));
}

#[test]
fn single_value_for_array_field_is_wrapped() {
    let validator = SchemaValidator::of::<Paging>(Source::Query);
    let out = validator.run(json!({ "page": "1", "tags": "a" })).unwrap();
    assert_eq!(out["tags"], json!(["a"]));
}

#[test]
fn garde_runs_after_coercion() {
    let validator = SchemaValidator::of::<Paging>(Source::Query);
    let err = validator.run(json!({ "page": "0" })).unwrap_err();

    let (field, _) = validation_field(&err);
    assert_eq!(field, "page");
}

#[test]
fn uncoercible_string_is_a_validation_error() {
    let validator = SchemaValidator::of::<Paging>(Source::Query);
    let err = validator.run(json!({ "page": "lots" })).unwrap_err();
    assert!(matches!(err, ApiError::Validation { source: Source::Query, .. }));
}

// ── Captured schema info ────────────────────────────────────────────────

#[test]
fn validator_captures_name_and_schema() {
    let validator = SchemaValidator::of::<CreateUser>(Source::Body);
    let info = validator.info();

    assert_eq!(info.name, "CreateUser");
    assert_eq!(info.schema["properties"]["name"]["type"], "string");
}
