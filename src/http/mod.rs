// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Hand-rolled HTTP/1.1 layer
//!
//! Builds request byte-strings, exchanges them over plain or TLS
//! connections, parses responses, and tracks cookie state across a login
//! flow. No HTTP library does the protocol work: every header, cookie
//! merge, and redirect hop is explicit state management.

mod client;
mod codec;
mod cookie;
mod response;
mod transport;

pub use client::{Credentials, HttpClient, HttpClientConfig};
pub use codec::{build_get, build_post, parse_response};
pub use cookie::{parse_set_cookie, Cookie, SessionStore, CSRF_COOKIE, SESSION_COOKIE};
pub use response::Response;
pub use transport::{connect, exchange, Connection};

/// Default user agent string (the one the target server expects)
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";

/// Header names as emitted on the wire
pub mod headers {
    pub const ACCEPT: &str = "Accept";
    pub const CONNECTION: &str = "Connection";
    pub const CONTENT_LENGTH: &str = "Content-Length";
    pub const CONTENT_TYPE: &str = "Content-Type";
    pub const COOKIE: &str = "Cookie";
    pub const HOST: &str = "Host";
    pub const LOCATION: &str = "Location";
    pub const SET_COOKIE: &str = "Set-Cookie";
    pub const USER_AGENT: &str = "User-Agent";
}
