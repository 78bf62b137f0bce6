//! JSON request/response helpers

use axum::{
    body::Bytes,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error};

/// JSON response with an indented body
pub struct PrettyJson<T>(pub T);

impl<T: Serialize> IntoResponse for PrettyJson<T> {
    fn into_response(self) -> Response {
        match serde_json::to_vec_pretty(&self.0) {
            Ok(body) => (
                [(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static("application/json; charset=utf-8"),
                )],
                body,
            )
                .into_response(),
            Err(e) => {
                error!("Failed to serialize response: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

/// Parse a request body leniently.
///
/// An empty body, a JSON `null`, or anything that fails to deserialize all
/// come back as `None`, leaving the status code to the handler.
pub fn parse_payload<T: DeserializeOwned>(body: &Bytes) -> Option<T> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return None;
    }
    match serde_json::from_slice::<Option<T>>(body) {
        Ok(payload) => payload,
        Err(e) => {
            debug!("Discarding unparseable payload: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Payload {
        title: String,
    }

    #[test]
    fn test_parse_payload() {
        assert_eq!(
            parse_payload::<Payload>(&Bytes::from_static(br#"{"title":"T"}"#)),
            Some(Payload { title: "T".to_string() })
        );
        assert_eq!(parse_payload::<Payload>(&Bytes::from_static(b"")), None);
        assert_eq!(parse_payload::<Payload>(&Bytes::from_static(b"  null ")), None);
        assert_eq!(parse_payload::<Payload>(&Bytes::from_static(b"{not json")), None);
    }
}
