// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Link and flag extraction
//!
//! The patterns are configuration, not core logic: the engine hands each
//! 200 body to an `Extractor` and consumes whatever the patterns yield,
//! in document order.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{Error, Result};

/// Default link pattern: any double-quoted attribute value
pub const DEFAULT_LINK_PATTERN: &str = r#""([^"]*)""#;

/// Default flag pattern: the marker token after the FLAG prefix
pub const DEFAULT_FLAG_PATTERN: &str = r"FLAG: (\w+)";

/// Default in-scope path prefix
pub const DEFAULT_LINK_PREFIX: &str = "/fakebook";

lazy_static! {
    static ref DEFAULT_LINK_RE: Regex =
        Regex::new(DEFAULT_LINK_PATTERN).expect("default link pattern compiles");
    static ref DEFAULT_FLAG_RE: Regex =
        Regex::new(DEFAULT_FLAG_PATTERN).expect("default flag pattern compiles");
}

/// Compiled extraction rules for one crawl run
#[derive(Debug, Clone)]
pub struct Extractor {
    link_pattern: Regex,
    flag_pattern: Regex,
    link_prefix: String,
}

impl Extractor {
    /// Compile extraction rules; a bad pattern is a configuration error.
    ///
    /// Both patterns must carry a capture group: group 1 of the link
    /// pattern yields candidate paths, group 1 of the flag pattern yields
    /// the flag token.
    pub fn new(
        link_pattern: &str,
        flag_pattern: &str,
        link_prefix: impl Into<String>,
    ) -> Result<Self> {
        let link_pattern = Regex::new(link_pattern)
            .map_err(|e| Error::config(format!("bad link pattern: {}", e)))?;
        let flag_pattern = Regex::new(flag_pattern)
            .map_err(|e| Error::config(format!("bad flag pattern: {}", e)))?;
        Ok(Self {
            link_pattern,
            flag_pattern,
            link_prefix: link_prefix.into(),
        })
    }

    /// In-scope links in discovery order
    pub fn links<'a>(&'a self, body: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.link_pattern
            .captures_iter(body)
            .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
            .filter(move |link| link.starts_with(&self.link_prefix))
    }

    /// Flag tokens in discovery order, without the marker prefix
    pub fn flags<'a>(&'a self, body: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.flag_pattern
            .captures_iter(body)
            .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self {
            link_pattern: DEFAULT_LINK_RE.clone(),
            flag_pattern: DEFAULT_FLAG_RE.clone(),
            link_prefix: DEFAULT_LINK_PREFIX.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_links_filtered_by_prefix() {
        let body = r#"<a href="/fakebook/a/">A</a> <a href="/logout/">out</a> <a href="/fakebook/b/1/">B</a>"#;
        let extractor = Extractor::default();
        let links: Vec<&str> = extractor.links(body).collect();
        assert_eq!(links, vec!["/fakebook/a/", "/fakebook/b/1/"]);
    }

    #[test]
    fn test_flags_drop_marker_prefix() {
        let body = "<h2 class='secret_flag'>FLAG: abc123</h2>";
        let extractor = Extractor::default();
        let flags: Vec<&str> = extractor.flags(body).collect();
        assert_eq!(flags, vec!["abc123"]);
    }

    #[test]
    fn test_no_matches_yields_empty() {
        let extractor = Extractor::default();
        assert_eq!(extractor.links("plain text").count(), 0);
        assert_eq!(extractor.flags("no markers here").count(), 0);
    }

    #[test]
    fn test_custom_patterns() {
        let extractor = Extractor::new(r"href='([^']*)'", r"TOKEN\[(\d+)\]", "/app").unwrap();
        let body = "href='/app/x' TOKEN[42]";
        assert_eq!(extractor.links(body).collect::<Vec<_>>(), vec!["/app/x"]);
        assert_eq!(extractor.flags(body).collect::<Vec<_>>(), vec!["42"]);
    }

    #[test]
    fn test_bad_pattern_is_config_error() {
        let err = Extractor::new("(unclosed", DEFAULT_FLAG_PATTERN, "/x").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
