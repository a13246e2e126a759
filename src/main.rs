// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Rapu CLI - Authenticated Flag-Hunting Web Crawler
//!
//! Thin launcher over the rapu library: credential acquisition, optional
//! config-file loading, logging setup, and exit codes.

use std::env;
use std::process::ExitCode;

use anyhow::Context;
use rapu::{CrawlConfig, Crawler};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("rapu=info".parse().unwrap()),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return ExitCode::from(1);
    }

    match args[1].as_str() {
        "crawl" => {
            if args.len() < 4 {
                eprintln!("Usage: rapu crawl <username> <password> [config.json]");
                return ExitCode::from(1);
            }
            crawl_site(&args[2], &args[3], args.get(4).map(String::as_str)).await
        }
        "--help" | "-h" | "help" => {
            print_usage();
            ExitCode::SUCCESS
        }
        "--version" | "-v" | "version" => {
            println!("rapu {}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        cmd => {
            eprintln!("Unknown command: {}", cmd);
            print_usage();
            ExitCode::from(1)
        }
    }
}

fn print_usage() {
    println!(
        r#"Rapu - Authenticated Flag-Hunting Web Crawler

USAGE:
    rapu <COMMAND> [OPTIONS]

COMMANDS:
    crawl <username> <password> [config.json]
                    Log in and crawl the configured site for flags
    help            Show this help message
    version         Show version information

EXAMPLES:
    rapu crawl alice hunter2
    rapu crawl alice hunter2 target.json
    RUST_LOG=rapu=debug rapu crawl alice hunter2

Flags are printed to stdout, one per line, in discovery order.
"#
    );
}

async fn crawl_site(username: &str, password: &str, config_path: Option<&str>) -> ExitCode {
    match run_crawl(username, password, config_path).await {
        Ok(flags) => {
            println!("\nSummary: {} flags found", flags.len());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Crawl failed: {:#}", e);
            ExitCode::from(1)
        }
    }
}

async fn run_crawl(
    username: &str,
    password: &str,
    config_path: Option<&str>,
) -> anyhow::Result<Vec<String>> {
    let config = match config_path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading config file {}", path))?;
            serde_json::from_str(&raw).with_context(|| format!("parsing config file {}", path))?
        }
        None => CrawlConfig::default(),
    };

    let mut crawler = Crawler::new(config).context("building crawler")?;
    crawler
        .run(username, password)
        .await
        .context("crawling target site")
}
