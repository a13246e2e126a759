// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Cookie parsing and session state
//!
//! The session is a fixed record around the two cookies that matter for
//! authentication (csrftoken, sessionid) plus a bag for anything else the
//! server sets. Session state only grows or updates across a run: merging
//! a fragment overwrites the names the fragment carries and leaves every
//! other name untouched.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// CSRF token cookie name
pub const CSRF_COOKIE: &str = "csrftoken";

/// Session identifier cookie name
pub const SESSION_COOKIE: &str = "sessionid";

/// A single cookie: primary value plus raw secondary attributes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    /// Cookie value
    pub value: String,
    /// Attributes as sent by the server, e.g. "Path=/" or "HttpOnly"
    pub attrs: Vec<String>,
}

impl Cookie {
    /// Create a new cookie with no attributes
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            attrs: Vec::new(),
        }
    }

    /// Append a raw attribute
    pub fn attr(mut self, attr: impl Into<String>) -> Self {
        self.attrs.push(attr.into());
        self
    }
}

/// Parse a Set-Cookie header value into a named cookie.
///
/// Format: `name=value; attr1=val1; attr2`. The first segment yields the
/// name and primary value; the remaining segments are kept verbatim.
/// Returns `None` when the first segment has no `=`.
pub fn parse_set_cookie(value: &str) -> Option<(String, Cookie)> {
    let mut segments = value.split(';');
    let first = segments.next()?.trim();
    let (name, value) = first.split_once('=')?;

    let mut cookie = Cookie::new(value.trim());
    for segment in segments {
        let segment = segment.trim();
        if !segment.is_empty() {
            cookie.attrs.push(segment.to_string());
        }
    }

    Some((name.trim().to_string(), cookie))
}

/// Cookie state carried across requests for one crawl run.
///
/// Named fields for the two well-known cookies, a map for the rest. Also
/// used as the per-response fragment the codec folds `Set-Cookie` lines
/// into.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionStore {
    csrftoken: Option<Cookie>,
    sessionid: Option<Cookie>,
    other: HashMap<String, Cookie>,
}

impl SessionStore {
    /// Create an empty session
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a cookie under its name
    pub fn insert(&mut self, name: &str, cookie: Cookie) {
        match name {
            CSRF_COOKIE => self.csrftoken = Some(cookie),
            SESSION_COOKIE => self.sessionid = Some(cookie),
            _ => {
                self.other.insert(name.to_string(), cookie);
            }
        }
    }

    /// Look up a cookie by name
    pub fn get(&self, name: &str) -> Option<&Cookie> {
        match name {
            CSRF_COOKIE => self.csrftoken.as_ref(),
            SESSION_COOKIE => self.sessionid.as_ref(),
            _ => self.other.get(name),
        }
    }

    /// The CSRF token value, if present
    pub fn csrf_token(&self) -> Option<&str> {
        self.csrftoken.as_ref().map(|c| c.value.as_str())
    }

    /// The session identifier value, if present
    pub fn session_id(&self) -> Option<&str> {
        self.sessionid.as_ref().map(|c| c.value.as_str())
    }

    /// Fold a response fragment into this store.
    ///
    /// Names present in the fragment overwrite the stored entry; names
    /// absent from the fragment are left untouched, so observed state is
    /// never erased by a response that omits a cookie.
    pub fn merge(&mut self, fragment: &SessionStore) {
        for (name, cookie) in fragment.iter() {
            self.insert(name, cookie.clone());
        }
    }

    /// Iterate over all stored cookies
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Cookie)> {
        self.csrftoken
            .iter()
            .map(|c| (CSRF_COOKIE, c))
            .chain(self.sessionid.iter().map(|c| (SESSION_COOKIE, c)))
            .chain(self.other.iter().map(|(k, v)| (k.as_str(), v)))
    }

    /// Number of stored cookies
    pub fn len(&self) -> usize {
        self.csrftoken.iter().count() + self.sessionid.iter().count() + self.other.len()
    }

    /// Check if the session holds no cookies
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Render the Cookie header value for authenticated requests.
    ///
    /// Produces exactly `csrftoken=<T>; sessionid=<S>`; fails with
    /// `MissingCredential` naming the first absent cookie.
    pub fn cookie_header(&self) -> Result<String> {
        let token = self
            .csrf_token()
            .ok_or(Error::MissingCredential(CSRF_COOKIE))?;
        let session = self
            .session_id()
            .ok_or(Error::MissingCredential(SESSION_COOKIE))?;
        Ok(format!(
            "{}={}; {}={}",
            CSRF_COOKIE, token, SESSION_COOKIE, session
        ))
    }

    /// Export the session as JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Import a session from JSON
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
