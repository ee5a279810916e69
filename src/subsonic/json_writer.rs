use super::response::{Payload, ResponseEnvelope, SerializeError, PROTOCOL_NAMESPACE, PROTOCOL_VERSION};
use serde_json::{json, Map, Value};

/// Renders the envelope as `{"subsonic-response": {...}}`. Collections are
/// plain arrays, there are no wrapper objects like in XML.
pub fn render(envelope: &ResponseEnvelope) -> Result<Vec<u8>, SerializeError> {
    let mut body = Map::new();
    body.insert("status".to_string(), json!(envelope.status()));
    body.insert("version".to_string(), json!(PROTOCOL_VERSION));
    body.insert("xmlns".to_string(), json!(PROTOCOL_NAMESPACE));

    let payload = match &envelope.payload {
        Payload::Empty => None,
        Payload::Error(error) => Some(serde_json::to_value(error)?),
        Payload::ArtistIndex(groups) => Some(serde_json::to_value(groups)?),
        Payload::Artist(artist) => Some(serde_json::to_value(artist)?),
        Payload::Album(album) => Some(serde_json::to_value(album)?),
        Payload::Song(song) => Some(serde_json::to_value(song)?),
        Payload::Indexes(indexes) => Some(serde_json::to_value(indexes)?),
    };
    if let (Some(key), Some(value)) = (envelope.payload.key(), payload) {
        body.insert(key.to_string(), value);
    }

    let mut document = Map::new();
    document.insert("subsonic-response".to_string(), Value::Object(body));
    Ok(serde_json::to_vec(&Value::Object(document))?)
}
