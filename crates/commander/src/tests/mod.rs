//! Crate-level integration and BDD tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};

use crate::command::{BoxError, Command, CommandResponse};
use crate::dispatcher::Dispatcher;
use crate::handler::{CommandHandler, HandlerBox, HandlerDescriptor};
use crate::registry::HandlerRegistry;
use crate::validation::ValidationErrors;

pub(crate) mod support;

#[derive(Debug, Default, Deserialize, Serialize)]
struct Echo {
    text: String,
}

impl Command for Echo {
    type Response = EchoResponse;

    fn command_type(&self) -> &str {
        "Echo"
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.text.is_empty() {
            errors.push("text", "must not be empty");
        }
        errors.into_result()
    }
}

#[derive(Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
struct EchoResponse {
    text: String,
}

impl CommandResponse for EchoResponse {}

#[derive(Debug, Default)]
struct EchoHandler {
    calls: Arc<AtomicUsize>,
}

impl CommandHandler for EchoHandler {
    type Command = Echo;

    fn compatible_type(&self) -> &str {
        "Echo"
    }

    fn execute(&self, command: Echo) -> Result<EchoResponse, BoxError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(EchoResponse { text: command.text })
    }
}

/// Command whose discriminator is chosen when the sample is built.
#[derive(Debug, Default, Deserialize, Serialize)]
struct Tagged {
    #[serde(skip)]
    tag: String,
}

impl Command for Tagged {
    type Response = ();

    fn command_type(&self) -> &str {
        &self.tag
    }
}

/// Handler declaring an arbitrary discriminator.
#[derive(Debug)]
struct TaggedHandler {
    declared: String,
}

impl CommandHandler for TaggedHandler {
    type Command = Tagged;

    fn compatible_type(&self) -> &str {
        &self.declared
    }

    fn execute(&self, _command: Tagged) -> Result<(), BoxError> {
        Ok(())
    }
}

/// Builds a handler declaring `declared` whose sample command reports
/// `reported`.
fn tagged_handler(declared: &str, reported: &str) -> HandlerBox {
    let reported = reported.to_owned();
    HandlerBox::new(
        HandlerDescriptor::new(TaggedHandler {
            declared: declared.to_owned(),
        })
        .with_command_factory(move || Tagged {
            tag: reported.clone(),
        })
        .with_response_factory(|| ()),
    )
}

#[test]
fn end_to_end_echo_dispatch() {
    let calls = Arc::new(AtomicUsize::new(0));
    let registry = HandlerRegistry::new();
    registry
        .register(HandlerBox::new(HandlerDescriptor::with_defaults(
            EchoHandler {
                calls: Arc::clone(&calls),
            },
        )))
        .expect("register echo");

    let dispatcher = Dispatcher::from(registry);
    let body = dispatcher
        .dispatch(r#"{"type":"Echo","text":"hi"}"#)
        .expect("dispatch echo");
    let response: EchoResponse = serde_json::from_str(&body).expect("response is JSON");
    assert_eq!(response, EchoResponse { text: "hi".into() });
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn tagged_handlers_register_when_tags_agree() {
    let registry = HandlerRegistry::new();
    registry
        .register(tagged_handler("X", "X"))
        .expect("consistent tags");
    assert!(registry.contains("X"));
}
