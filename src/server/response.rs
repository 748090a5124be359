//! Pretty-printed JSON responses.
//!
//! Every body the API produces for a query is JSON indented with two spaces,
//! so responses are stable enough to diff against golden files.

use axum::{
    body::Body,
    response::{IntoResponse, Response},
};
use http::{header, HeaderValue, StatusCode};
use serde::Serialize;
use tracing::error;

use crate::query::{QueryOutcome, ValidationErrors};

/// A JSON body serialized with `serde_json::to_string_pretty`.
#[derive(Debug, Clone)]
pub struct PrettyJson<T>(pub StatusCode, pub T);

impl<T: Serialize> IntoResponse for PrettyJson<T> {
    fn into_response(self) -> Response {
        let PrettyJson(status, value) = self;
        match serde_json::to_string_pretty(&value) {
            Ok(body) => {
                let mut response = (status, Body::from(body)).into_response();
                response.headers_mut().insert(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static("application/json"),
                );
                response
            }
            Err(err) => {
                error!("Failed to serialize response: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    [(header::CONTENT_TYPE, "application/json")],
                    r#"{"online": false, "error": "Failed to serialize response"}"#,
                )
                    .into_response()
            }
        }
    }
}

/// 400 with the list of rejected fields.
pub fn validation_response(errors: ValidationErrors) -> Response {
    PrettyJson(StatusCode::BAD_REQUEST, errors).into_response()
}

/// 200 with the server status, or 500 with the failure envelope.
pub fn outcome_response(outcome: QueryOutcome) -> Response {
    match outcome {
        QueryOutcome::Online(status) => PrettyJson(StatusCode::OK, status).into_response(),
        QueryOutcome::Offline(envelope) => {
            PrettyJson(StatusCode::INTERNAL_SERVER_ERROR, envelope).into_response()
        }
    }
}
