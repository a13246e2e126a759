// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Error types for the rapu crawler
//!
//! The taxonomy separates fatal conditions from status-code policy:
//! 403/404 responses and bounded 5xx retries are handled by the crawl
//! engine and never surface here.

use thiserror::Error;

/// Result type alias for rapu operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the rapu crawler
#[derive(Error, Debug)]
pub enum Error {
    /// Transport-level connect failure
    #[error("connection refused by {host}:{port}: {source}")]
    ConnectionRefused {
        host: String,
        port: u16,
        #[source]
        source: std::io::Error,
    },

    /// TLS handshake or certificate failure
    #[error("TLS error for {host}: {reason}")]
    Tls { host: String, reason: String },

    /// Response bytes without a header/body separator or a parseable status line
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Caller-side request construction bug (e.g. POST without a body)
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Redirect target host outside the allowlist
    #[error("untrusted redirect to {host}")]
    UntrustedRedirect { host: String },

    /// Redirect chain exceeded the configured hop limit
    #[error("redirect limit of {limit} hops exceeded")]
    TooManyRedirects { limit: usize },

    /// Cookie header requested before the required cookie exists
    #[error("missing credential: no {0} cookie in session")]
    MissingCredential(&'static str),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// URL parsing failed
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// I/O failure mid-exchange
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a TLS error
    pub fn tls(host: impl Into<String>, reason: impl ToString) -> Self {
        Error::Tls {
            host: host.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a malformed-response error
    pub fn malformed(msg: impl Into<String>) -> Self {
        Error::MalformedResponse(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Check if this is a transport-level error
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Error::ConnectionRefused { .. } | Error::Tls { .. } | Error::Io(_)
        )
    }

    /// Check if this is a security-relevant failure
    pub fn is_security(&self) -> bool {
        matches!(self, Error::UntrustedRedirect { .. })
    }

    /// Check if this is a caller-side programming error
    pub fn is_caller_bug(&self) -> bool {
        matches!(self, Error::InvalidRequest(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untrusted_redirect_display() {
        let err = Error::UntrustedRedirect {
            host: "evil.example".to_string(),
        };
        assert_eq!(err.to_string(), "untrusted redirect to evil.example");
        assert!(err.is_security());
        assert!(!err.is_transport());
    }

    #[test]
    fn test_connection_refused_is_transport() {
        let err = Error::ConnectionRefused {
            host: "127.0.0.1".to_string(),
            port: 80,
            source: std::io::Error::from(std::io::ErrorKind::ConnectionRefused),
        };
        assert!(err.is_transport());
    }

    #[test]
    fn test_invalid_request_is_caller_bug() {
        let err = Error::InvalidRequest("POST without a body".to_string());
        assert!(err.is_caller_bug());
        assert!(!err.is_security());
    }

    #[test]
    fn test_missing_credential_display() {
        let err = Error::MissingCredential("sessionid");
        assert_eq!(
            err.to_string(),
            "missing credential: no sessionid cookie in session"
        );
    }
}
