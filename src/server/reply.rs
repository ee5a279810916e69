//! Turning operation outcomes into HTTP responses.

use crate::catalog_store::CatalogError;
use crate::subsonic::{Payload, ProtocolError, ResponseEnvelope, ResponseFormat};
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::error;

/// A protocol envelope on its way out, in the format the client asked for.
///
/// Protocol failures are still HTTP 200, only rendering failures become a
/// bare 500.
pub struct SubsonicReply {
    format: ResponseFormat,
    envelope: ResponseEnvelope,
}

impl SubsonicReply {
    pub fn ok(format: ResponseFormat, payload: Payload) -> SubsonicReply {
        SubsonicReply {
            format,
            envelope: ResponseEnvelope::ok(payload),
        }
    }

    pub fn error(format: ResponseFormat, error: ProtocolError) -> SubsonicReply {
        SubsonicReply {
            format,
            envelope: ResponseEnvelope::failed(error),
        }
    }

    pub fn from_result(format: ResponseFormat, result: Result<Payload, CatalogError>) -> SubsonicReply {
        match result {
            Ok(payload) => Self::ok(format, payload),
            Err(err) => Self::error(format, protocol_error(err)),
        }
    }
}

impl IntoResponse for SubsonicReply {
    fn into_response(self) -> Response {
        match self.envelope.render(self.format) {
            Ok(body) => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, self.format.content_type())],
                body,
            )
                .into_response(),
            Err(err) => {
                error!("Failed to render response: {}", err);
                internal_server_error()
            }
        }
    }
}

/// Maps a catalog failure to what the client gets to see. Internal details
/// only go to the log.
pub fn protocol_error(err: CatalogError) -> ProtocolError {
    match err {
        CatalogError::NotFound => ProtocolError::not_found("not found"),
        CatalogError::InvalidInput(message) => ProtocolError::missing_parameter(message),
        CatalogError::Internal(err) => {
            error!("Catalog failure: {:#}", err);
            ProtocolError::internal()
        }
    }
}

pub fn internal_server_error() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
}
