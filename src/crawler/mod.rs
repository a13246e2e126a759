// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Crawl engine, extraction rules, and run configuration

mod config;
mod engine;
mod extract;

pub use config::CrawlConfig;
pub use engine::Crawler;
pub use extract::{Extractor, DEFAULT_FLAG_PATTERN, DEFAULT_LINK_PATTERN, DEFAULT_LINK_PREFIX};
