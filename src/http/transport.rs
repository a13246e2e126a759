// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Transport connector
//!
//! Opens plain or TLS-wrapped TCP connections and exchanges raw bytes.
//! The read side loops until the response's declared Content-Length is
//! satisfied or the peer closes, so a page larger than one receive
//! buffer is never truncated.

use std::sync::Arc;

use bytes::Bytes;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio_rustls::client::TlsStream;
use tokio_rustls::rustls::pki_types::ServerName;
use tokio_rustls::rustls::{ClientConfig, RootCertStore};
use tokio_rustls::TlsConnector;
use tracing::{trace, warn};

use super::codec::find_header_end;
use crate::error::{Error, Result};

/// Cap on the header portion of a response
const MAX_HEADER_SIZE: usize = 64 * 1024;

/// A byte-stream connection to the target server
#[derive(Debug)]
pub enum Connection {
    /// Plain TCP
    Plain(TcpStream),
    /// TLS over TCP
    Tls(Box<TlsStream<TcpStream>>),
}

impl Connection {
    async fn write_all(&mut self, buf: &[u8]) -> std::io::Result<()> {
        match self {
            Connection::Plain(stream) => stream.write_all(buf).await,
            Connection::Tls(stream) => stream.write_all(buf).await,
        }
    }

    async fn flush(&mut self) -> std::io::Result<()> {
        match self {
            Connection::Plain(stream) => stream.flush().await,
            Connection::Tls(stream) => stream.flush().await,
        }
    }

    async fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self {
            Connection::Plain(stream) => stream.read(buf).await,
            Connection::Tls(stream) => stream.read(buf).await,
        }
    }
}

/// Open a connection to `host:port`, wrapping with TLS when requested.
///
/// TLS uses the platform's native root certificates and verifies the
/// certificate against `host`. A failed TCP connect is fatal for the run.
pub async fn connect(host: &str, port: u16, use_tls: bool) -> Result<Connection> {
    let stream = TcpStream::connect((host, port))
        .await
        .map_err(|source| Error::ConnectionRefused {
            host: host.to_string(),
            port,
            source,
        })?;

    if !use_tls {
        return Ok(Connection::Plain(stream));
    }

    let connector = tls_connector(host)?;
    let server_name =
        ServerName::try_from(host.to_string()).map_err(|e| Error::tls(host, e))?;
    let tls = connector
        .connect(server_name, stream)
        .await
        .map_err(|e| Error::tls(host, e))?;
    Ok(Connection::Tls(Box::new(tls)))
}

fn tls_connector(host: &str) -> Result<TlsConnector> {
    let native = rustls_native_certs::load_native_certs();
    if !native.errors.is_empty() {
        warn!(errors = native.errors.len(), "some native root certificates failed to load");
    }

    let mut roots = RootCertStore::empty();
    let (added, _ignored) = roots.add_parsable_certificates(native.certs);
    if added == 0 {
        return Err(Error::tls(host, "no usable root certificates on this system"));
    }

    let config = ClientConfig::builder()
        .with_root_certificates(roots)
        .with_no_client_auth();
    Ok(TlsConnector::from(Arc::new(config)))
}

/// Write the full request, then read the complete response.
///
/// Reads loop with a `recv_buffer_size` buffer: first until the header
/// terminator arrives, then until the declared Content-Length is
/// satisfied, or to connection close when no length is declared. A close
/// before the separator hands back whatever arrived; the codec reports
/// it as malformed.
pub async fn exchange(
    conn: &mut Connection,
    request: &[u8],
    recv_buffer_size: usize,
) -> Result<Bytes> {
    conn.write_all(request).await?;
    conn.flush().await?;

    let mut response: Vec<u8> = Vec::with_capacity(recv_buffer_size);
    let mut chunk = vec![0u8; recv_buffer_size.max(1)];

    let header_end = loop {
        if let Some(end) = find_header_end(&response) {
            break end;
        }
        if response.len() > MAX_HEADER_SIZE {
            return Err(Error::malformed("response header block exceeds 64KiB"));
        }
        let n = conn.read(&mut chunk).await?;
        if n == 0 {
            return Ok(Bytes::from(response));
        }
        response.extend_from_slice(&chunk[..n]);
    };

    match declared_content_length(&response[..header_end]) {
        Some(length) => {
            let total = header_end + length;
            while response.len() < total {
                let n = conn.read(&mut chunk).await?;
                if n == 0 {
                    break;
                }
                response.extend_from_slice(&chunk[..n]);
            }
        }
        None => loop {
            let n = conn.read(&mut chunk).await?;
            if n == 0 {
                break;
            }
            response.extend_from_slice(&chunk[..n]);
        },
    }

    trace!(bytes = response.len(), "exchange complete");
    Ok(Bytes::from(response))
}

/// Scan a raw header block for a Content-Length declaration.
fn declared_content_length(header_block: &[u8]) -> Option<usize> {
    let text = String::from_utf8_lossy(header_block);
    for line in text.split("\r\n").skip(1) {
        if let Some((key, value)) = line.split_once(':') {
            if key.trim().eq_ignore_ascii_case("Content-Length") {
                return value.trim().parse().ok();
            }
        }
    }
    None
}
