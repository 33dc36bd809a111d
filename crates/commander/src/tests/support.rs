//! Command and handler doubles shared by the crate's tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};

use crate::command::{BoxError, Command, CommandResponse};
use crate::handler::{CommandHandler, HandlerBox, HandlerDescriptor};
use crate::validation::ValidationErrors;

#[derive(Debug, Default, Deserialize, Serialize)]
pub(crate) struct Greet {
    pub(crate) greeting: String,
    pub(crate) name: String,
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
pub(crate) struct Greeting {
    pub(crate) message: String,
}

impl CommandResponse for Greeting {}

/// Greets by name and counts how often it ran.
#[derive(Debug, Default)]
pub(crate) struct GreetHandler {
    calls: Arc<AtomicUsize>,
}

impl CommandHandler for GreetHandler {
    type Command = Greet;

    fn compatible_type(&self) -> &str {
        "Greet"
    }

    fn execute(&self, command: Greet) -> Result<Greeting, BoxError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Greeting {
            message: format!("{} {}", command.greeting, command.name),
        })
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub(crate) struct Farewell {
    pub(crate) name: String,
}

impl Command for Farewell {
    type Response = Parting;

    fn command_type(&self) -> &str {
        "Farewell"
    }
}

#[derive(Debug, Default, Serialize)]
pub(crate) struct Parting {
    pub(crate) message: String,
}

impl CommandResponse for Parting {}

/// Says goodbye, refusing anyone called `nobody`.
#[derive(Debug, Default)]
pub(crate) struct FarewellHandler;

impl CommandHandler for FarewellHandler {
    type Command = Farewell;

    fn compatible_type(&self) -> &str {
        "Farewell"
    }

    fn execute(&self, command: Farewell) -> Result<Parting, BoxError> {
        if command.name == "nobody" {
            return Err("there is nobody to say goodbye to".into());
        }
        Ok(Parting {
            message: format!("Goodbye, {}", command.name),
        })
    }
}

/// Second handler for `Greet`, used to exercise duplicate rejection.
#[derive(Debug, Default)]
pub(crate) struct LoudGreetHandler;

impl CommandHandler for LoudGreetHandler {
    type Command = Greet;

    fn compatible_type(&self) -> &str {
        "Greet"
    }

    fn execute(&self, command: Greet) -> Result<Greeting, BoxError> {
        Ok(Greeting {
            message: format!("{} {}!", command.greeting, command.name).to_uppercase(),
        })
    }
}

/// Declares `Farewell` while bound to `Greet`.
#[derive(Debug, Default)]
pub(crate) struct MislabelledHandler;

impl CommandHandler for MislabelledHandler {
    type Command = Greet;

    fn compatible_type(&self) -> &str {
        "Farewell"
    }

    fn execute(&self, _command: Greet) -> Result<Greeting, BoxError> {
        Ok(Greeting::default())
    }
}

pub(crate) fn greet_handler() -> HandlerBox {
    counted_greet_handler().0
}

/// `Greet` handler plus the counter it bumps on every execution.
pub(crate) fn counted_greet_handler() -> (HandlerBox, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let handler = GreetHandler {
        calls: Arc::clone(&calls),
    };
    (
        HandlerBox::new(HandlerDescriptor::with_defaults(handler)),
        calls,
    )
}

pub(crate) fn farewell_handler() -> HandlerBox {
    HandlerBox::new(HandlerDescriptor::with_defaults(FarewellHandler))
}

pub(crate) fn loud_greet_handler() -> HandlerBox {
    HandlerBox::new(HandlerDescriptor::with_defaults(LoudGreetHandler))
}

pub(crate) fn mislabelled_handler() -> HandlerBox {
    HandlerBox::new(HandlerDescriptor::with_defaults(MislabelledHandler))
}

/// Handler without sample factories.
pub(crate) fn unverifiable_handler() -> HandlerBox {
    HandlerBox::new(HandlerDescriptor::new(FarewellHandler))
}
