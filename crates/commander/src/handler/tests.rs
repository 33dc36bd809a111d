//! Unit tests for typed handler invocation through the erased box.

use std::collections::HashMap;
use std::error::Error as _;

use rstest::{fixture, rstest};
use serde::{Deserialize, Serialize};

use super::*;
use crate::command::CommandResponse;
use crate::validation::ValidationErrors;

#[derive(Debug, Default, Deserialize, Serialize)]
struct Greet {
    name: String,
}

impl Command for Greet {
    type Response = Greeting;

    fn command_type(&self) -> &str {
        "Greet"
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.name.chars().count() < 2 {
            errors.push("name", "must be at least 2 characters");
        }
        errors.into_result()
    }
}

#[derive(Debug, Default, Serialize)]
struct Greeting {
    message: String,
}

impl CommandResponse for Greeting {}

struct GreetHandler;

impl CommandHandler for GreetHandler {
    type Command = Greet;

    fn compatible_type(&self) -> &str {
        "Greet"
    }

    fn execute(&self, command: Greet) -> Result<Greeting, BoxError> {
        if command.name == "nobody" {
            return Err("nobody cannot be greeted".into());
        }
        Ok(Greeting {
            message: format!("Hello, {}", command.name),
        })
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct Pairs {}

impl Command for Pairs {
    type Response = PairTable;

    fn command_type(&self) -> &str {
        "Pairs"
    }
}

/// Maps with non-string keys cannot be rendered as JSON objects.
#[derive(Debug, Default, Serialize)]
struct PairTable {
    entries: HashMap<(i32, i32), String>,
}

impl CommandResponse for PairTable {}

struct PairsHandler;

impl CommandHandler for PairsHandler {
    type Command = Pairs;

    fn compatible_type(&self) -> &str {
        "Pairs"
    }

    fn execute(&self, _command: Pairs) -> Result<PairTable, BoxError> {
        let mut entries = HashMap::new();
        entries.insert((1, 2), "pair".to_owned());
        Ok(PairTable { entries })
    }
}

#[fixture]
fn greet() -> HandlerBox {
    HandlerBox::new(HandlerDescriptor::with_defaults(GreetHandler))
}

#[rstest]
fn invokes_handler_and_serialises_response(greet: HandlerBox) {
    let body = greet
        .invoke("Greet", br#"{"type":"Greet","name":"Ada"}"#)
        .expect("invoke greet");
    assert_eq!(body, r#"{"message":"Hello, Ada"}"#);
}

#[rstest]
fn unknown_fields_are_tolerated(greet: HandlerBox) {
    let body = greet
        .invoke("Greet", br#"{"type":"Greet","name":"Ada","mood":"sunny"}"#)
        .expect("invoke greet");
    assert!(body.contains("Hello, Ada"));
}

#[rstest]
#[case::wrong_field_type(br#"{"type":"Greet","name":7}"#.as_slice())]
#[case::missing_field(br#"{"type":"Greet"}"#.as_slice())]
fn mismatched_payload_reports_target_type(greet: HandlerBox, #[case] payload: &[u8]) {
    let err = greet.invoke("Greet", payload).expect_err("payload mismatch");
    match err {
        DispatchError::PayloadDeserialization {
            command_type,
            target,
            ..
        } => {
            assert_eq!(command_type, "Greet");
            assert!(target.ends_with("Greet"), "target was {target}");
        }
        other => panic!("expected PayloadDeserialization, got {other:?}"),
    }
}

#[rstest]
fn validation_runs_before_execution(greet: HandlerBox) {
    let err = greet
        .invoke("Greet", br#"{"type":"Greet","name":"A"}"#)
        .expect_err("name too short");
    match err {
        DispatchError::Validation { violations, .. } => {
            assert_eq!(violations.len(), 1);
            assert_eq!(violations.violations()[0].field(), "name");
        }
        other => panic!("expected Validation, got {other:?}"),
    }
}

#[rstest]
fn handler_errors_are_wrapped(greet: HandlerBox) {
    let err = greet
        .invoke("Greet", br#"{"type":"Greet","name":"nobody"}"#)
        .expect_err("handler refuses");
    assert!(matches!(err, DispatchError::HandlerExecution { .. }));
    let source = err.source().expect("handler error preserved");
    assert_eq!(source.to_string(), "nobody cannot be greeted");
}

#[test]
fn unserialisable_response_is_reported() {
    let pairs = HandlerBox::new(HandlerDescriptor::with_defaults(PairsHandler));
    let err = pairs
        .invoke("Pairs", br#"{"type":"Pairs"}"#)
        .expect_err("tuple keys cannot serialise");
    match err {
        DispatchError::ResponseSerialization { target, .. } => {
            assert!(target.ends_with("PairTable"), "target was {target}");
        }
        other => panic!("expected ResponseSerialization, got {other:?}"),
    }
}

#[rstest]
fn exposes_type_names(greet: HandlerBox) {
    assert_eq!(greet.compatible_type(), "Greet");
    assert!(greet.handler_type().ends_with("GreetHandler"));
    assert!(greet.command_type_name().ends_with("Greet"));
    assert!(greet.response_type_name().ends_with("Greeting"));
}

#[rstest]
fn samples_carry_the_discriminator(greet: HandlerBox) {
    let command = greet
        .sample_command()
        .expect("command factory present")
        .expect("sample serialises");
    assert_eq!(command, serde_json::json!({ "type": "Greet", "name": "" }));
    let response = greet
        .sample_response()
        .expect("response factory present")
        .expect("sample serialises");
    assert_eq!(response, serde_json::json!({ "message": "" }));
}

#[test]
fn descriptor_without_factories_has_no_samples() {
    let boxed = HandlerBox::from(HandlerDescriptor::new(GreetHandler));
    assert!(boxed.sample_command().is_none());
    assert!(boxed.sample_response().is_none());
}

#[rstest]
fn clones_share_the_handler(greet: HandlerBox) {
    let clone = greet.clone();
    assert!(clone.ptr_eq(&greet));
    let other = HandlerBox::new(HandlerDescriptor::with_defaults(GreetHandler));
    assert!(!other.ptr_eq(&greet));
}
