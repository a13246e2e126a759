// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP response type

use std::collections::HashMap;

use bytes::Bytes;

use super::cookie::SessionStore;
use super::headers;

/// Parsed HTTP response.
///
/// The status code always comes from a successfully parsed status line;
/// a response without one is a protocol error, never a zero-value.
#[derive(Debug, Clone)]
pub struct Response {
    /// Status code from the status line
    pub status: u16,
    /// Header mapping; keys case-preserved, last write wins on duplicates
    pub headers: HashMap<String, String>,
    /// Cookies set by this response
    pub session: SessionStore,
    /// Body bytes
    pub body: Bytes,
}

impl Response {
    /// Check if status is success (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Check if status is a redirect the client resolves (301/302)
    pub fn is_redirect(&self) -> bool {
        self.status == 301 || self.status == 302
    }

    /// Check if status is client error (4xx)
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }

    /// Check if status is server error (5xx)
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }

    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// The redirect target, if any
    pub fn location(&self) -> Option<&str> {
        self.header(headers::LOCATION)
    }

    /// Declared content length, if parseable
    pub fn content_length(&self) -> Option<usize> {
        self.header(headers::CONTENT_LENGTH)
            .and_then(|value| value.parse().ok())
    }

    /// Get body as text, lossy conversion
    pub fn text_lossy(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Get body length
    pub fn body_len(&self) -> usize {
        self.body.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16) -> Response {
        Response {
            status,
            headers: HashMap::new(),
            session: SessionStore::new(),
            body: Bytes::new(),
        }
    }

    #[test]
    fn test_status_predicates() {
        assert!(response(200).is_success());
        assert!(response(302).is_redirect());
        assert!(!response(303).is_redirect());
        assert!(response(404).is_client_error());
        assert!(response(500).is_server_error());
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let mut resp = response(301);
        resp.headers
            .insert("Location".to_string(), "/next".to_string());
        assert_eq!(resp.header("location"), Some("/next"));
        assert_eq!(resp.location(), Some("/next"));
    }

    #[test]
    fn test_content_length() {
        let mut resp = response(200);
        resp.headers
            .insert("Content-Length".to_string(), "42".to_string());
        assert_eq!(resp.content_length(), Some(42));
    }
}
