use crate::subsonic::{ProtocolError, ResponseFormat};

/// An authenticated protocol request, attached to the request extensions by
/// the gate before any operation runs.
#[derive(Clone, Debug)]
pub struct ApiRequest {
    pub params: Vec<(String, String)>,
    pub username: String,
    pub format: ResponseFormat,
}

impl ApiRequest {
    /// Value of a parameter that must appear exactly once.
    pub fn single(&self, key: &str) -> Option<&str> {
        let mut values = self.params.iter().filter(|(k, _)| k == key);
        match (values.next(), values.next()) {
            (Some((_, value)), None) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn id(&self) -> Result<&str, ProtocolError> {
        self.single("id")
            .ok_or_else(|| ProtocolError::missing_parameter("id parameter missing"))
    }
}
