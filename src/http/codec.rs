// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP/1.1 message codec
//!
//! Requests are assembled by hand into the exact byte-strings the target
//! server expects; responses are parsed back out of whatever bytes the
//! transport returned. The GET grammar carries one extra blank line after
//! the header terminator, a tolerance the server is known to accept.

use std::collections::HashMap;

use bytes::Bytes;

use super::cookie::{parse_set_cookie, SessionStore};
use super::headers;
use super::response::Response;
use crate::error::{Error, Result};

/// Build the byte-string for a GET request.
pub fn build_get(host: &str, path: &str, cookie: Option<&str>, user_agent: &str) -> Vec<u8> {
    let mut msg = String::with_capacity(256);
    msg.push_str(&format!("GET {} HTTP/1.1\r\n", path));
    msg.push_str(&format!("User-Agent: {}\r\n", user_agent));
    msg.push_str(&format!("Host: {}\r\n", host));
    if let Some(cookie) = cookie {
        msg.push_str(&format!("Cookie: {}\r\n", cookie));
    }
    msg.push_str("Connection: keep-alive\r\n");
    msg.push_str("Accept: */*\r\n");
    // terminator plus the extra blank line
    msg.push_str("\r\n\r\n");
    msg.into_bytes()
}

/// Build the byte-string for a url-encoded POST request.
///
/// `Content-Length` is the exact byte length of `body`. An empty body is
/// a caller bug and fails with `InvalidRequest`.
pub fn build_post(host: &str, path: &str, body: &str, cookie: Option<&str>) -> Result<Vec<u8>> {
    if body.is_empty() {
        return Err(Error::InvalidRequest(
            "POST request without a body".to_string(),
        ));
    }

    let mut msg = String::with_capacity(256 + body.len());
    msg.push_str(&format!("POST {} HTTP/1.1\r\n", path));
    msg.push_str(&format!("Host: {}\r\n", host));
    if let Some(cookie) = cookie {
        msg.push_str(&format!("Cookie: {}\r\n", cookie));
    }
    msg.push_str("Content-Type: application/x-www-form-urlencoded\r\n");
    msg.push_str(&format!("Content-Length: {}\r\n", body.len()));
    msg.push_str("\r\n");
    msg.push_str(body);
    Ok(msg.into_bytes())
}

/// Parse raw response bytes into a `Response`.
///
/// Splits on the first `\r\n\r\n`; everything before is the header block,
/// everything after is the body. Fails with `MalformedResponse` when no
/// separator exists.
pub fn parse_response(raw: &[u8]) -> Result<Response> {
    let body_start = find_header_end(raw)
        .ok_or_else(|| Error::malformed("no header/body separator in response"))?;

    let header_block = String::from_utf8_lossy(&raw[..body_start - 4]);
    let (status, headers, session) = parse_header_block(&header_block)?;
    let body = Bytes::copy_from_slice(&raw[body_start..]);

    Ok(Response {
        status,
        headers,
        session,
        body,
    })
}

/// Find the end of the header block, returning the offset just past `\r\n\r\n`.
pub(crate) fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n").map(|i| i + 4)
}

/// Parse the header block: status line, then `Key: Value` lines.
///
/// `Set-Cookie` lines are routed to cookie parsing and folded into the
/// session fragment rather than stored as plain headers.
fn parse_header_block(block: &str) -> Result<(u16, HashMap<String, String>, SessionStore)> {
    let mut lines = block.split("\r\n");
    let status_line = lines
        .next()
        .ok_or_else(|| Error::malformed("empty header block"))?;
    let status = parse_status_line(status_line)?;

    let mut headers = HashMap::new();
    let mut session = SessionStore::new();
    for line in lines {
        if line.is_empty() {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        let value = value.trim();

        if key.eq_ignore_ascii_case(headers::SET_COOKIE) {
            if let Some((name, cookie)) = parse_set_cookie(value) {
                session.insert(&name, cookie);
            }
            continue;
        }
        headers.insert(key.to_string(), value.to_string());
    }

    Ok((status, headers, session))
}

/// Extract the status code: the second whitespace-delimited token.
fn parse_status_line(line: &str) -> Result<u16> {
    let code = line
        .split_whitespace()
        .nth(1)
        .ok_or_else(|| Error::malformed(format!("status line {:?} has no code", line)))?;
    code.parse::<u16>()
        .map_err(|_| Error::malformed(format!("unparseable status code {:?}", code)))
}
