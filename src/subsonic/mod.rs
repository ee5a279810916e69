//! The versioned REST protocol spoken with clients: the response envelope
//! and its XML and JSON renderings.

mod json_writer;
mod response;
mod xml_writer;

pub use response::{
    ErrorCode, Payload, ProtocolError, ResponseEnvelope, ResponseFormat, SerializeError,
    PROTOCOL_NAMESPACE, PROTOCOL_VERSION,
};
