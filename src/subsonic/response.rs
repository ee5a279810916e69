use crate::catalog_store::{Album, Artist, IndexCollection, IndexGroup, Song};
use serde::Serialize;
use thiserror::Error;

pub const PROTOCOL_VERSION: &str = "1.10.0";
pub const PROTOCOL_NAMESPACE: &str = "http://subsonic.org/restapi";

/// Numeric error codes of the protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Generic = 0,
    MissingParameter = 10,
    WrongCredentials = 40,
    NotFound = 70,
}

impl Serialize for ErrorCode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(*self as u32)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProtocolError {
    pub code: ErrorCode,
    pub message: String,
}

impl ProtocolError {
    pub fn new<S: Into<String>>(code: ErrorCode, message: S) -> ProtocolError {
        ProtocolError {
            code,
            message: message.into(),
        }
    }

    pub fn missing_parameter<S: Into<String>>(message: S) -> ProtocolError {
        Self::new(ErrorCode::MissingParameter, message)
    }

    pub fn credentials_missing() -> ProtocolError {
        Self::missing_parameter("credentials missing")
    }

    pub fn wrong_credentials() -> ProtocolError {
        Self::new(ErrorCode::WrongCredentials, "wrong username or password")
    }

    pub fn not_found<S: Into<String>>(message: S) -> ProtocolError {
        Self::new(ErrorCode::NotFound, message)
    }

    pub fn internal() -> ProtocolError {
        Self::new(ErrorCode::Generic, "internal server error")
    }
}

/// The single payload of a response.
#[derive(Debug, Clone)]
pub enum Payload {
    Empty,
    Error(ProtocolError),
    ArtistIndex(Vec<IndexGroup>),
    Artist(Artist),
    Album(Album),
    Song(Song),
    Indexes(IndexCollection),
}

impl Payload {
    /// Element name in XML, key in JSON.
    pub(super) fn key(&self) -> Option<&'static str> {
        match self {
            Payload::Empty => None,
            Payload::Error(_) => Some("error"),
            Payload::ArtistIndex(_) => Some("artists"),
            Payload::Artist(_) => Some("artist"),
            Payload::Album(_) => Some("album"),
            Payload::Song(_) => Some("song"),
            Payload::Indexes(_) => Some("indexes"),
        }
    }
}

/// Top level protocol response. The status follows from the payload: error
/// payloads fail, everything else is ok.
#[derive(Debug, Clone)]
pub struct ResponseEnvelope {
    pub payload: Payload,
}

impl ResponseEnvelope {
    pub fn ok(payload: Payload) -> ResponseEnvelope {
        ResponseEnvelope { payload }
    }

    pub fn empty() -> ResponseEnvelope {
        Self::ok(Payload::Empty)
    }

    pub fn failed(error: ProtocolError) -> ResponseEnvelope {
        ResponseEnvelope {
            payload: Payload::Error(error),
        }
    }

    pub fn status(&self) -> &'static str {
        match self.payload {
            Payload::Error(_) => "failed",
            _ => "ok",
        }
    }

    pub fn render(&self, format: ResponseFormat) -> Result<Vec<u8>, SerializeError> {
        match format {
            ResponseFormat::Xml => super::xml_writer::render(self),
            ResponseFormat::Json => super::json_writer::render(self),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseFormat {
    #[default]
    Xml,
    Json,
}

impl ResponseFormat {
    /// `f=json` selects JSON, anything else XML.
    pub fn from_params(params: &[(String, String)]) -> ResponseFormat {
        match params.iter().find(|(k, _)| k == "f") {
            Some((_, v)) if v == "json" => ResponseFormat::Json,
            _ => ResponseFormat::Xml,
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ResponseFormat::Xml => "text/xml",
            ResponseFormat::Json => "text/json",
        }
    }
}

#[derive(Debug, Error)]
pub enum SerializeError {
    #[error("json encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("xml encoding failed")]
    Xml(#[from] std::fmt::Error),
}
