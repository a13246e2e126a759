// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Breadth-first crawl engine
//!
//! Owns the frontier and visited set, drives authenticated GETs through
//! the HTTP client, applies the per-status-code policy, and stops when
//! the frontier drains or enough flags have been found.
//!
//! Status codes are policy, not errors: 500 retries the same path up to
//! the configured cap, 403/404 and anything else unrecognized drop the
//! frontier entry and move on. Only protocol and security failures abort
//! the run.

use std::collections::{HashSet, VecDeque};

use tracing::{debug, info, warn};
use url::Url;

use super::config::CrawlConfig;
use super::extract::Extractor;
use crate::error::{Error, Result};
use crate::http::{Credentials, HttpClient, Response};

/// Breadth-first crawler for one target site
pub struct Crawler {
    config: CrawlConfig,
    client: HttpClient,
    extractor: Extractor,
    /// Pending server-relative paths, FIFO
    frontier: VecDeque<String>,
    /// Every path ever enqueued; prevents re-enqueue for the whole run
    visited: HashSet<String>,
    flags: Vec<String>,
}

impl Crawler {
    /// Create a crawler from a crawl configuration
    pub fn new(config: CrawlConfig) -> Result<Self> {
        let extractor = Extractor::new(
            &config.link_pattern,
            &config.flag_pattern,
            config.link_prefix.clone(),
        )?;
        let client = HttpClient::new(config.http.clone());
        Ok(Self {
            config,
            client,
            extractor,
            frontier: VecDeque::new(),
            visited: HashSet::new(),
            flags: Vec::new(),
        })
    }

    /// Log in with the given credentials, then crawl to completion.
    ///
    /// Returns the discovered flags in discovery order.
    pub async fn run(&mut self, username: &str, password: &str) -> Result<Vec<String>> {
        self.client
            .login(
                &self.config.start_url,
                &self.config.login_url,
                username,
                password,
            )
            .await?;
        self.crawl().await
    }

    /// Crawl with whatever session the client already holds.
    pub async fn crawl(&mut self) -> Result<Vec<String>> {
        let start = Url::parse(&self.config.start_url)?;
        let base = origin(&start)?;
        self.enqueue(start.path().to_string());

        while let Some(path) = self.frontier.front().cloned() {
            if self.flags.len() >= self.config.flag_target {
                break;
            }

            let url = format!("{}{}", base, path);
            let response = self.fetch(&url).await?;
            match response.status {
                403 | 404 => {
                    debug!(path = %path, status = response.status, "skipping");
                    self.frontier.pop_front();
                }
                200 => {
                    self.frontier.pop_front();
                    let body = response.text_lossy();
                    self.harvest(&body);
                }
                status => {
                    debug!(path = %path, status, "unhandled status, skipping");
                    self.frontier.pop_front();
                }
            }
        }

        info!(
            flags = self.flags.len(),
            visited = self.visited.len(),
            "crawl finished"
        );
        Ok(self.flags.clone())
    }

    /// Flags found so far, in discovery order
    pub fn flags(&self) -> &[String] {
        &self.flags
    }

    /// Number of paths ever enqueued
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Number of paths still pending
    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    /// GET a page, retrying while the server answers 500, up to the cap.
    async fn fetch(&mut self, url: &str) -> Result<Response> {
        let mut response = self.client.get(url, Credentials::Required).await?;
        let mut attempts = 1usize;
        while response.status == 500 && attempts <= self.config.max_server_retries {
            debug!(url, attempts, "server error, retrying");
            response = self.client.get(url, Credentials::Required).await?;
            attempts += 1;
        }
        if response.status == 500 {
            warn!(url, attempts, "server error persisted past retry cap");
        }
        Ok(response)
    }

    /// Scan a page body for new links and flags.
    fn harvest(&mut self, body: &str) {
        let links: Vec<String> = self.extractor.links(body).map(str::to_string).collect();
        for link in links {
            self.enqueue(link);
        }

        let found: Vec<String> = self.extractor.flags(body).map(str::to_string).collect();
        for flag in found {
            info!(flag = %flag, "flag found");
            println!("{}", flag);
            self.flags.push(flag);
        }
    }

    /// Append a path to the frontier unless it was ever enqueued before.
    fn enqueue(&mut self, path: String) {
        if self.visited.insert(path.clone()) {
            self.frontier.push_back(path);
        }
    }
}

/// The scheme://host[:port] prefix paths are resolved against.
fn origin(url: &Url) -> Result<String> {
    let host = url
        .host_str()
        .ok_or_else(|| Error::config(format!("start URL {} has no host", url)))?;
    let mut origin = format!("{}://{}", url.scheme(), host);
    if let Some(port) = url.port() {
        origin.push_str(&format!(":{}", port));
    }
    Ok(origin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{Cookie, HttpClientConfig, SessionStore, CSRF_COOKIE, SESSION_COOKIE};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serve one canned response per accepted connection, in order.
    /// Resolves to the number of connections actually served.
    async fn serve_script(responses: Vec<String>) -> (std::net::SocketAddr, JoinHandle<usize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let mut served = 0;
            for response in responses {
                let (mut sock, _) = listener.accept().await.unwrap();
                let mut buf = vec![0u8; 8192];
                let _ = sock.read(&mut buf).await.unwrap();
                sock.write_all(response.as_bytes()).await.unwrap();
                sock.shutdown().await.unwrap();
                served += 1;
            }
            served
        });
        (addr, handle)
    }

    fn page(body: &str) -> String {
        format!(
            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\n\r\n{}",
            body.len(),
            body
        )
    }

    fn status(code: u16, reason: &str) -> String {
        format!("HTTP/1.1 {} {}\r\nContent-Length: 0\r\n\r\n", code, reason)
    }

    fn crawler_for(addr: std::net::SocketAddr, flag_target: usize) -> Crawler {
        let config = CrawlConfig::new()
            .start_url(format!("http://127.0.0.1:{}/fakebook/", addr.port()))
            .flag_target(flag_target)
            .max_server_retries(5)
            .http(HttpClientConfig::new().allow_host("127.0.0.1"));
        let mut crawler = Crawler::new(config).unwrap();

        let mut session = SessionStore::new();
        session.insert(CSRF_COOKIE, Cookie::new("T1"));
        session.insert(SESSION_COOKIE, Cookie::new("S1"));
        crawler.client.set_session(session);
        crawler
    }

    #[test]
    fn test_origin_with_port() {
        let url = Url::parse("http://127.0.0.1:8080/fakebook/").unwrap();
        assert_eq!(origin(&url).unwrap(), "http://127.0.0.1:8080");

        let url = Url::parse("https://example.com/x").unwrap();
        assert_eq!(origin(&url).unwrap(), "https://example.com");
    }

    #[test]
    fn test_enqueue_deduplicates() {
        let mut crawler = crawler_for("127.0.0.1:1".parse().unwrap(), 5);
        crawler.enqueue("/fakebook/a/".to_string());
        crawler.enqueue("/fakebook/b/".to_string());
        crawler.enqueue("/fakebook/a/".to_string());

        assert_eq!(crawler.frontier_len(), 2);
        assert_eq!(crawler.visited_count(), 2);
    }

    #[tokio::test]
    async fn test_harvest_scenario_one_flag_two_links() {
        let body = r#"<a href="/fakebook/a/">A</a> FLAG: abc123
                      <a href="/fakebook/b/">B</a> <a href="/elsewhere/">out</a>"#;
        let (addr, handle) = serve_script(vec![
            page(body),
            status(404, "Not Found"),
            status(404, "Not Found"),
        ])
        .await;

        let mut crawler = crawler_for(addr, 5);
        let flags = crawler.crawl().await.unwrap();

        assert_eq!(flags, vec!["abc123"]);
        // start page plus the two in-scope links, never the out-of-scope one
        assert_eq!(crawler.visited_count(), 3);
        assert_eq!(crawler.frontier_len(), 0);
        assert_eq!(handle.await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_500_retried_until_success() {
        let body = "no links here";
        let (addr, handle) = serve_script(vec![
            status(500, "Internal Server Error"),
            status(500, "Internal Server Error"),
            status(500, "Internal Server Error"),
            page(body),
        ])
        .await;

        let mut crawler = crawler_for(addr, 5);
        crawler.crawl().await.unwrap();

        // exactly four requests: three 500s, then the 200 that got processed
        assert_eq!(handle.await.unwrap(), 4);
        assert_eq!(crawler.visited_count(), 1);
    }

    #[tokio::test]
    async fn test_500_past_cap_drops_entry() {
        let responses: Vec<String> = (0..4)
            .map(|_| status(500, "Internal Server Error"))
            .collect();
        let (addr, handle) = serve_script(responses).await;

        let config = CrawlConfig::new()
            .start_url(format!("http://127.0.0.1:{}/fakebook/", addr.port()))
            .max_server_retries(3)
            .http(HttpClientConfig::new().allow_host("127.0.0.1"));
        let mut crawler = Crawler::new(config).unwrap();
        let mut session = SessionStore::new();
        session.insert(CSRF_COOKIE, Cookie::new("T1"));
        session.insert(SESSION_COOKIE, Cookie::new("S1"));
        crawler.client.set_session(session);

        let flags = crawler.crawl().await.unwrap();
        assert!(flags.is_empty());
        // initial attempt plus three retries, then the entry was dropped
        assert_eq!(handle.await.unwrap(), 4);
        assert_eq!(crawler.frontier_len(), 0);
    }

    #[tokio::test]
    async fn test_flag_target_stops_crawl_with_pending_frontier() {
        let body = r#"FLAG: first <a href="/fakebook/a/">A</a> <a href="/fakebook/b/">B</a>"#;
        let (addr, handle) = serve_script(vec![page(body)]).await;

        let mut crawler = crawler_for(addr, 1);
        let flags = crawler.crawl().await.unwrap();

        assert_eq!(flags, vec!["first"]);
        // the two discovered links were never fetched
        assert_eq!(crawler.frontier_len(), 2);
        assert_eq!(handle.await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_403_and_other_statuses_skip() {
        let body = r#"<a href="/fakebook/forbidden/">F</a> <a href="/fakebook/teapot/">T</a>"#;
        let (addr, handle) = serve_script(vec![
            page(body),
            status(403, "Forbidden"),
            status(418, "I'm a teapot"),
        ])
        .await;

        let mut crawler = crawler_for(addr, 5);
        let flags = crawler.crawl().await.unwrap();

        assert!(flags.is_empty());
        assert_eq!(crawler.frontier_len(), 0);
        assert_eq!(handle.await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_untrusted_redirect_aborts_crawl() {
        let (addr, handle) = serve_script(vec![
            "HTTP/1.1 302 Found\r\nLocation: http://evil.example/\r\nContent-Length: 0\r\n\r\n"
                .to_string(),
        ])
        .await;

        let mut crawler = crawler_for(addr, 5);
        let err = crawler.crawl().await.unwrap_err();
        assert!(matches!(err, Error::UntrustedRedirect { .. }));
        assert_eq!(handle.await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_full_run_with_login() {
        let listing = r#"<a href="/fakebook/1/">one</a>"#;
        let profile = "FLAG: deadbeef";
        let (addr, handle) = serve_script(vec![
            // login: landing GET, credential POST, post-login redirect GET
            "HTTP/1.1 200 OK\r\nSet-Cookie: csrftoken=T1; Path=/\r\nSet-Cookie: sessionid=anon\r\nContent-Length: 0\r\n\r\n"
                .to_string(),
            "HTTP/1.1 302 Found\r\nLocation: /fakebook/\r\nSet-Cookie: sessionid=S1\r\nContent-Length: 0\r\n\r\n"
                .to_string(),
            page("welcome"),
            // crawl: start page, then the discovered profile
            page(listing),
            page(profile),
        ])
        .await;

        let config = CrawlConfig::new()
            .start_url(format!("http://127.0.0.1:{}/fakebook/", addr.port()))
            .login_url(format!("http://127.0.0.1:{}/accounts/login/", addr.port()))
            .flag_target(5)
            .http(HttpClientConfig::new().allow_host("127.0.0.1"));
        let mut crawler = Crawler::new(config).unwrap();

        let flags = crawler.run("alice", "hunter2").await.unwrap();
        assert_eq!(flags, vec!["deadbeef"]);
        assert_eq!(handle.await.unwrap(), 5);
    }
}
