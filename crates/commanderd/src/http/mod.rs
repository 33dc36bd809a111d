//! HTTP binding for the dispatcher.
//!
//! One route carries the whole command surface: `POST` hands the JSON body to
//! [`Dispatcher::dispatch`] and `GET` returns the catalogue of registered
//! commands. Dispatch runs on tokio's blocking pool so a slow handler cannot
//! stall the reactor.

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::Serialize;
use thiserror::Error;
use tokio::task::{self, JoinError};
use tracing::error;

use commander::{Catalogue, DispatchError, Dispatcher, ValidationErrors};
use commander_config::EndpointPath;

const HTTP_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::http");

/// Builds the router serving `endpoint`.
///
/// Bodies larger than `max_body_bytes` are refused with `413`.
#[must_use]
pub fn router(dispatcher: Dispatcher, endpoint: &EndpointPath, max_body_bytes: usize) -> Router {
    Router::new()
        .route(
            endpoint.as_str(),
            post(dispatch_command).get(describe_commands),
        )
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(dispatcher)
}

async fn dispatch_command(
    State(dispatcher): State<Dispatcher>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, HttpError> {
    ensure_json(&headers)?;
    let payload = body.map_err(|rejection| HttpError::Body {
        status: rejection.status(),
        message: rejection.body_text(),
    })?;

    let reply = task::spawn_blocking(move || dispatcher.dispatch(payload))
        .await
        .map_err(|source| HttpError::Worker { source })??;

    Ok(json_response(StatusCode::OK, reply))
}

async fn describe_commands(State(dispatcher): State<Dispatcher>) -> Json<Catalogue> {
    Json(dispatcher.catalogue())
}

fn ensure_json(headers: &HeaderMap) -> Result<(), HttpError> {
    let content_type = headers.get(header::CONTENT_TYPE);
    if content_type.is_some_and(is_json) {
        return Ok(());
    }
    Err(HttpError::UnsupportedMediaType {
        content_type: content_type
            .and_then(|value| value.to_str().ok())
            .map(ToOwned::to_owned),
    })
}

/// Accepts `application/json` and `application/*+json`, with parameters.
fn is_json(value: &HeaderValue) -> bool {
    let Ok(text) = value.to_str() else {
        return false;
    };
    let essence = text
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json"
        || essence
            .strip_prefix("application/")
            .is_some_and(|subtype| subtype.ends_with("+json"))
}

fn json_response(status: StatusCode, body: String) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))],
        body,
    )
        .into_response()
}

/// Failures surfaced by the HTTP binding.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The dispatcher refused or failed the command.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
    /// The request did not declare a JSON body.
    #[error("unsupported content type {content_type:?}; expected application/json")]
    UnsupportedMediaType {
        /// Content type sent by the client, if any.
        content_type: Option<String>,
    },
    /// The body could not be read, typically because it exceeded the limit.
    #[error("failed to read request body: {message}")]
    Body {
        /// Status reported by the body extractor.
        status: StatusCode,
        /// Extractor diagnostic.
        message: String,
    },
    /// The blocking dispatch task panicked or was cancelled.
    #[error("dispatch worker failed: {source}")]
    Worker {
        /// Join failure reported by tokio.
        #[source]
        source: JoinError,
    },
}

impl HttpError {
    /// Status code sent to the client.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Dispatch(error) => dispatch_status(error),
            Self::UnsupportedMediaType { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::Body { status, .. } => *status,
            Self::Worker { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable snake_case identifier included in the error body.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Dispatch(error) => error.code(),
            Self::UnsupportedMediaType { .. } => "unsupported_media_type",
            Self::Body { .. } => "invalid_body",
            Self::Worker { .. } => "internal",
        }
    }
}

/// Maps a dispatch failure onto an HTTP status.
#[must_use]
pub const fn dispatch_status(error: &DispatchError) -> StatusCode {
    match error {
        DispatchError::UnknownCommandType { .. } => StatusCode::NOT_FOUND,
        DispatchError::MalformedEnvelope { .. }
        | DispatchError::PayloadDeserialization { .. }
        | DispatchError::Validation { .. } => StatusCode::BAD_REQUEST,
        DispatchError::HandlerExecution { .. } | DispatchError::ResponseSerialization { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// JSON body returned for every failed request.
#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: String,
    code: &'static str,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    command_type: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    violations: Option<&'a ValidationErrors>,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(target: HTTP_TARGET, code = self.code(), error = %self, "request failed");
        }

        let (command_type, violations) = match &self {
            Self::Dispatch(DispatchError::Validation {
                command_type,
                violations,
            }) => (Some(command_type.as_str()), Some(violations)),
            Self::Dispatch(dispatch) => (dispatch.command_type(), None),
            _ => (None, None),
        };
        let body = ErrorBody {
            error: self.to_string(),
            code: self.code(),
            command_type,
            violations,
        };
        (status, Json(body)).into_response()
    }
}
