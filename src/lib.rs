// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! # Rapu - Authenticated Flag-Hunting Web Crawler
//!
//! A pure Rust crawler that logs into a single web application and
//! breadth-first crawls it for embedded marker tokens ("flags"). The
//! HTTP/1.1 protocol work is done by hand on raw TCP and TLS
//! connections - no HTTP library in the loop.
//!
//! ## Features
//!
//! - Hand-rolled HTTP/1.1 codec: request building and response parsing
//! - Plain TCP and rustls-wrapped transports with looped reads
//! - Cookie session tracking across the login flow
//! - Redirect resolution with host-allowlist enforcement
//! - Breadth-first frontier with per-status-code policy
//! - Pluggable regex extraction for links and flags
//!
//! ## Example
//!
//! ```rust,no_run
//! use rapu::{CrawlConfig, Crawler};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = CrawlConfig::new().flag_target(5);
//!     let mut crawler = Crawler::new(config)?;
//!
//!     let flags = crawler.run("username", "password").await?;
//!     println!("found {} flags", flags.len());
//!
//!     Ok(())
//! }
//! ```

pub mod crawler;
pub mod error;
pub mod http;

// Crawler
pub use crawler::{CrawlConfig, Crawler, Extractor};

// Errors
pub use error::{Error, Result};

// HTTP
pub use http::{
    Connection, Cookie, Credentials, HttpClient, HttpClientConfig, Response, SessionStore,
};

/// Rapu version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
