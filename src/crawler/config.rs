// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Crawl run configuration
//!
//! Everything the engine and client consume is externalized here; the
//! defaults describe the reference deployment and every field can be
//! overridden from a JSON config file or through the builder methods.

use serde::{Deserialize, Serialize};

use super::extract::{DEFAULT_FLAG_PATTERN, DEFAULT_LINK_PATTERN, DEFAULT_LINK_PREFIX};
use crate::http::HttpClientConfig;

/// Configuration for a crawl run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    /// Absolute URL the crawl starts from; its host and path seed the run
    pub start_url: String,
    /// Absolute URL of the login form
    pub login_url: String,
    /// Stop once this many flags have been found
    pub flag_target: usize,
    /// Maximum identical retries when a page answers 500
    pub max_server_retries: usize,
    /// Path prefix a discovered link must carry to stay in scope
    pub link_prefix: String,
    /// Pattern whose first capture group yields candidate links
    pub link_pattern: String,
    /// Pattern whose first capture group yields flag tokens
    pub flag_pattern: String,
    /// HTTP layer configuration
    pub http: HttpClientConfig,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            start_url: "http://cs5700.ccs.neu.edu/fakebook/".to_string(),
            login_url: "http://cs5700.ccs.neu.edu/accounts/login/?next=/fakebook/".to_string(),
            flag_target: 5,
            max_server_retries: 25,
            link_prefix: DEFAULT_LINK_PREFIX.to_string(),
            link_pattern: DEFAULT_LINK_PATTERN.to_string(),
            flag_pattern: DEFAULT_FLAG_PATTERN.to_string(),
            http: HttpClientConfig::new().allow_host("cs5700.ccs.neu.edu"),
        }
    }
}

impl CrawlConfig {
    /// Create a new crawl config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the start URL
    pub fn start_url(mut self, url: impl Into<String>) -> Self {
        self.start_url = url.into();
        self
    }

    /// Set the login URL
    pub fn login_url(mut self, url: impl Into<String>) -> Self {
        self.login_url = url.into();
        self
    }

    /// Set the flag target count
    pub fn flag_target(mut self, target: usize) -> Self {
        self.flag_target = target;
        self
    }

    /// Set the 500-retry cap
    pub fn max_server_retries(mut self, retries: usize) -> Self {
        self.max_server_retries = retries;
        self
    }

    /// Set the in-scope link prefix
    pub fn link_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.link_prefix = prefix.into();
        self
    }

    /// Set the link extraction pattern
    pub fn link_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.link_pattern = pattern.into();
        self
    }

    /// Set the flag extraction pattern
    pub fn flag_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.flag_pattern = pattern.into();
        self
    }

    /// Set the HTTP layer configuration
    pub fn http(mut self, http: HttpClientConfig) -> Self {
        self.http = http;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = CrawlConfig::new()
            .flag_target(3)
            .max_server_retries(10)
            .link_prefix("/app");

        assert_eq!(config.flag_target, 3);
        assert_eq!(config.max_server_retries, 10);
        assert_eq!(config.link_prefix, "/app");
    }

    #[test]
    fn test_default_allowlist_covers_start_host() {
        let config = CrawlConfig::default();
        assert!(config.start_url.contains("cs5700.ccs.neu.edu"));
        assert_eq!(config.http.allowed_hosts, vec!["cs5700.ccs.neu.edu"]);
    }

    #[test]
    fn test_partial_json_overrides() {
        let config: CrawlConfig =
            serde_json::from_str(r#"{"flag_target": 2, "http": {"recv_buffer_size": 8192}}"#)
                .unwrap();
        assert_eq!(config.flag_target, 2);
        assert_eq!(config.http.recv_buffer_size, 8192);
        // untouched fields keep their defaults
        assert_eq!(config.max_server_retries, 25);
        assert_eq!(config.link_prefix, "/fakebook");
    }
}
