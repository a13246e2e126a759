// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP client with session and redirect management
//!
//! Ties the codec, transport, and session store together: every response's
//! cookie fragment is merged into the run's session, 301/302 responses are
//! resolved against a host allowlist with a hop cap, and the login flow
//! establishes the authenticated session the crawl engine relies on.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use super::codec;
use super::cookie::{SessionStore, CSRF_COOKIE, SESSION_COOKIE};
use super::response::Response;
use super::transport;
use super::DEFAULT_USER_AGENT;
use crate::error::{Error, Result};

/// HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpClientConfig {
    /// User agent string
    pub user_agent: String,
    /// Hosts a redirect is permitted to target
    pub allowed_hosts: Vec<String>,
    /// Maximum redirect hops before giving up
    pub max_redirects: usize,
    /// Receive buffer size for each read
    pub recv_buffer_size: usize,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            allowed_hosts: Vec::new(),
            max_redirects: 10,
            recv_buffer_size: 4096,
        }
    }
}

impl HttpClientConfig {
    /// Create a new client config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the user agent
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Add a host to the redirect allowlist
    pub fn allow_host(mut self, host: impl Into<String>) -> Self {
        self.allowed_hosts.push(host.into());
        self
    }

    /// Set the redirect hop limit
    pub fn max_redirects(mut self, max: usize) -> Self {
        self.max_redirects = max;
        self
    }

    /// Set the receive buffer size
    pub fn recv_buffer_size(mut self, size: usize) -> Self {
        self.recv_buffer_size = size;
        self
    }

    fn is_allowed(&self, host: &str) -> bool {
        self.allowed_hosts.iter().any(|allowed| allowed == host)
    }
}

/// Cookie handling mode for a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Credentials {
    /// Render the session cookies or fail with `MissingCredential`
    Required,
    /// Send the session cookies when both are present, omit otherwise
    #[default]
    IfAvailable,
    /// Never send cookies
    Omit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Method {
    Get,
    Post,
}

impl Method {
    fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// Resolved request target: where to connect and what path to ask for.
#[derive(Debug, Clone)]
struct Target {
    host: String,
    port: u16,
    path: String,
    tls: bool,
}

impl Target {
    /// Resolve an absolute URL. The scheme picks the port and TLS flag;
    /// the query string is not carried into the request target.
    fn resolve(url: &Url) -> Result<Self> {
        let host = url
            .host_str()
            .ok_or_else(|| Error::config(format!("URL {} has no host", url)))?
            .to_string();
        let tls = url.scheme() == "https";
        let port = url.port().unwrap_or(if tls { 443 } else { 80 });
        let path = if url.path().is_empty() {
            "/".to_string()
        } else {
            url.path().to_string()
        };
        Ok(Self {
            host,
            port,
            path,
            tls,
        })
    }
}

/// HTTP client owning the cookie session for a crawl run
pub struct HttpClient {
    config: HttpClientConfig,
    session: SessionStore,
}

impl HttpClient {
    /// Create a client with the given configuration and an empty session
    pub fn new(config: HttpClientConfig) -> Self {
        Self {
            config,
            session: SessionStore::new(),
        }
    }

    /// The current session state
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Replace the session, e.g. to resume from an exported one
    pub fn set_session(&mut self, session: SessionStore) {
        self.session = session;
    }

    /// Client configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Execute a GET request
    pub async fn get(&mut self, url: &str, credentials: Credentials) -> Result<Response> {
        let url = Url::parse(url)?;
        self.request(Method::Get, &url, None, credentials).await
    }

    /// Execute a POST request
    pub async fn post(
        &mut self,
        url: &str,
        body: &str,
        credentials: Credentials,
    ) -> Result<Response> {
        let url = Url::parse(url)?;
        self.request(Method::Post, &url, Some(body), credentials)
            .await
    }

    /// Execute a request, resolving permitted redirects.
    ///
    /// A 301/302 is followed with a GET through the full pipeline after
    /// the target host passes the allowlist; an off-list host aborts with
    /// `UntrustedRedirect` before any further request is issued.
    async fn request(
        &mut self,
        method: Method,
        url: &Url,
        body: Option<&str>,
        credentials: Credentials,
    ) -> Result<Response> {
        let mut current = url.clone();
        let mut method = method;
        let mut body = body;
        let mut credentials = credentials;
        let mut hops = 0usize;

        loop {
            let response = self.send_once(method, &current, body, credentials).await?;
            self.session.merge(&response.session);

            if response.is_redirect() {
                if hops >= self.config.max_redirects {
                    return Err(Error::TooManyRedirects {
                        limit: self.config.max_redirects,
                    });
                }
                let location = response.location().ok_or_else(|| {
                    Error::malformed(format!("{} response without Location", response.status))
                })?;
                let next = current.join(location)?;
                let host = next
                    .host_str()
                    .ok_or_else(|| Error::config(format!("redirect target {} has no host", next)))?;
                if !self.config.is_allowed(host) {
                    return Err(Error::UntrustedRedirect {
                        host: host.to_string(),
                    });
                }

                debug!(from = %current, to = %next, status = response.status, "following redirect");
                hops += 1;
                current = next;
                method = Method::Get;
                body = None;
                credentials = Credentials::IfAvailable;
                continue;
            }

            let mut response = response;
            if hops > 0 {
                self.reinject_session(&mut response);
            }
            return Ok(response);
        }
    }

    /// A redirect must never silently drop authentication: copy held
    /// well-known cookies into the resolved response's fragment when the
    /// fragment lacks them.
    fn reinject_session(&self, response: &mut Response) {
        for name in [SESSION_COOKIE, CSRF_COOKIE] {
            if response.session.get(name).is_none() {
                if let Some(held) = self.session.get(name) {
                    response.session.insert(name, held.clone());
                }
            }
        }
    }

    /// One connect-send-receive round trip, no redirect handling.
    async fn send_once(
        &mut self,
        method: Method,
        url: &Url,
        body: Option<&str>,
        credentials: Credentials,
    ) -> Result<Response> {
        let target = Target::resolve(url)?;
        let cookie = match credentials {
            Credentials::Required => Some(self.session.cookie_header()?),
            Credentials::IfAvailable => self.session.cookie_header().ok(),
            Credentials::Omit => None,
        };

        let message = match method {
            Method::Get => codec::build_get(
                &target.host,
                &target.path,
                cookie.as_deref(),
                &self.config.user_agent,
            ),
            Method::Post => {
                codec::build_post(&target.host, &target.path, body.unwrap_or(""), cookie.as_deref())?
            }
        };

        let mut conn = transport::connect(&target.host, target.port, target.tls).await?;
        let raw = transport::exchange(&mut conn, &message, self.config.recv_buffer_size).await?;
        let response = codec::parse_response(&raw)?;
        debug!(
            method = method.as_str(),
            path = %target.path,
            status = response.status,
            "request complete"
        );
        Ok(response)
    }

    /// Log in and establish the authenticated session.
    ///
    /// GETs the landing URL to collect the CSRF token, POSTs the
    /// url-encoded credentials to the login URL, follows the redirect,
    /// and verifies the session now carries a session identifier.
    pub async fn login(
        &mut self,
        landing_url: &str,
        login_url: &str,
        username: &str,
        password: &str,
    ) -> Result<()> {
        self.get(landing_url, Credentials::IfAvailable).await?;
        let token = self
            .session
            .csrf_token()
            .map(str::to_string)
            .ok_or(Error::MissingCredential(CSRF_COOKIE))?;

        let payload = login_form(username, password, &token);
        self.post(login_url, &payload, Credentials::IfAvailable)
            .await?;

        if self.session.session_id().is_none() {
            return Err(Error::MissingCredential(SESSION_COOKIE));
        }
        info!("login complete, session established");
        Ok(())
    }
}

/// Build the url-encoded login payload.
fn login_form(username: &str, password: &str, token: &str) -> String {
    format!(
        "username={}&password={}&csrfmiddlewaretoken={}",
        form_encode(username),
        form_encode(password),
        form_encode(token)
    )
}

/// Percent-encode a form value (application/x-www-form-urlencoded)
fn form_encode(s: &str) -> String {
    let mut result = String::new();
    for c in s.chars() {
        match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' | '.' | '~' => result.push(c),
            ' ' => result.push('+'),
            _ => {
                for byte in c.to_string().bytes() {
                    result.push_str(&format!("%{:02X}", byte));
                }
            }
        }
    }
    result
}
