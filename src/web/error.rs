//! JSON error bodies for the API.

use actix_web::error::{InternalError, JsonPayloadError, PathError};
use actix_web::http::StatusCode;
use actix_web::{Error, HttpRequest, HttpResponse};

/// Builds an error that renders as `{"error": message}` with `status`.
pub fn json_error(status: StatusCode, message: impl Into<String>) -> Error {
    let message = message.into();
    let response = HttpResponse::build(status).json(serde_json::json!({ "error": &message }));
    InternalError::from_response(message, response).into()
}

pub fn bad_request(message: impl Into<String>) -> Error {
    json_error(StatusCode::BAD_REQUEST, message)
}

pub fn not_found(message: impl Into<String>) -> Error {
    json_error(StatusCode::NOT_FOUND, message)
}

/// Logs the cause and hides it from the client.
pub fn internal<E: std::fmt::Display>(e: E) -> Error {
    log::error!("Internal error: {}", e);
    json_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "An unexpected error occurred.",
    )
}

/// Handler for malformed or mistyped JSON bodies.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> Error {
    log::debug!("Rejected JSON payload: {}", err);
    bad_request(err.to_string())
}

/// Handler for path segments that fail to parse, e.g. `/restaurants/abc`.
pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> Error {
    not_found(err.to_string())
}
