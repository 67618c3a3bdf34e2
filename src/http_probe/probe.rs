use std::io::ErrorKind;
use std::net::SocketAddr;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpStream, lookup_host};
use tokio_native_tls::{TlsConnector as TokioTlsConnector, TlsStream};
use trust_dns_resolver::TokioAsyncResolver;

use super::prelude::*;
use crate::config::probe_config::ProbeSettings;
use crate::target::Target;

const STATUS_CODE_OFFSET: std::ops::Range<usize> = 9..12;
const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Performs a single request/response exchange against a target.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, target: &Target) -> Result<RawResponse, ProbeError>;
}

/// Renders the request sent for every hop.
pub fn build_request(target: &Target) -> String {
    format!(
        "GET {} HTTP/1.0\r\nHost: {}\r\n\r\n",
        target.path, target.host
    )
}

/// Reads the status code at its fixed position in `HTTP/1.x NNN`.
///
/// The status line is not tokenized: whatever sits at that offset is the code, and bytes that
/// are not a number yield status `0`. Only a response too short to hold the code is an error.
pub fn parse_status_code(bytes: &[u8], host: &str) -> Result<u16, ProbeError> {
    let digits = bytes
        .get(STATUS_CODE_OFFSET)
        .ok_or_else(|| ProbeError::MalformedStatusLine {
            host: host.to_string(),
            line: first_line(bytes),
        })?;

    Ok(std::str::from_utf8(digits)
        .ok()
        .and_then(|digits| digits.parse::<u16>().ok())
        .unwrap_or(0))
}

fn first_line(bytes: &[u8]) -> String {
    let end = bytes
        .iter()
        .position(|b| *b == b'\n')
        .unwrap_or(bytes.len())
        .min(64);
    String::from_utf8_lossy(&bytes[..end]).trim_end().to_string()
}

/// Raw HTTP/1.0 over a fresh TLS connection per request.
pub struct TlsTransport {
    connector: TokioTlsConnector,
    resolver: Option<TokioAsyncResolver>,
    settings: ProbeSettings,
}

impl TlsTransport {
    pub fn new(
        connector: TokioTlsConnector,
        resolver: Option<TokioAsyncResolver>,
        settings: ProbeSettings,
    ) -> Self {
        Self {
            connector,
            resolver,
            settings,
        }
    }

    async fn resolve(&self, host: &str) -> Result<SocketAddr, ProbeError> {
        let port = self.settings.port;
        let resolve_error = |message: String| ProbeError::Resolve {
            host: host.to_string(),
            message,
        };

        let addr = match &self.resolver {
            Some(resolver) => {
                let lookup = resolver
                    .lookup_ip(host)
                    .await
                    .map_err(|e| resolve_error(e.to_string()))?;
                lookup.iter().next().map(|ip| SocketAddr::new(ip, port))
            }
            None => lookup_host((host, port))
                .await
                .map_err(|e| resolve_error(e.to_string()))?
                .next(),
        };

        let addr = addr.ok_or_else(|| resolve_error("no addresses found".to_string()))?;
        log::debug!("Resolved {host} to {addr}");
        Ok(addr)
    }

    async fn connect(&self, target: &Target) -> Result<TlsStream<TcpStream>, ProbeError> {
        let addr = self.resolve(&target.host).await?;

        let stream = TcpStream::connect(addr)
            .await
            .map_err(|source| ProbeError::Connect {
                host: target.host.clone(),
                port: self.settings.port,
                source,
            })?;

        self.connector
            .connect(&target.host, stream)
            .await
            .map_err(|source| ProbeError::Tls {
                host: target.host.clone(),
                source,
            })
    }

    async fn read_to_end(
        stream: &mut TlsStream<TcpStream>,
        host: &str,
    ) -> Result<Vec<u8>, ProbeError> {
        let mut bytes = Vec::new();
        let mut chunk = vec![0u8; READ_CHUNK_SIZE];

        loop {
            match stream.read(&mut chunk).await {
                Ok(0) => break,
                Ok(n) => bytes.extend_from_slice(&chunk[..n]),
                // Peers that close without close_notify still delivered a full HTTP/1.0 response
                Err(e) if e.kind() == ErrorKind::UnexpectedEof && !bytes.is_empty() => {
                    log::warn!("{host} closed the connection without TLS close_notify");
                    break;
                }
                Err(source) => {
                    return Err(ProbeError::Io {
                        host: host.to_string(),
                        source,
                    });
                }
            }
        }

        Ok(bytes)
    }
}

#[async_trait]
impl Transport for TlsTransport {
    async fn execute(&self, target: &Target) -> Result<RawResponse, ProbeError> {
        let timeout = self.settings.connect_timeout();
        let mut stream = tokio::time::timeout(timeout, self.connect(target))
            .await
            .map_err(|_| ProbeError::ConnectTimeout {
                host: target.host.clone(),
                port: self.settings.port,
                timeout,
            })??;

        let io_error = |source| ProbeError::Io {
            host: target.host.clone(),
            source,
        };
        stream
            .write_all(build_request(target).as_bytes())
            .await
            .map_err(io_error)?;
        stream.flush().await.map_err(io_error)?;

        let bytes = Self::read_to_end(&mut stream, &target.host).await?;
        let status_code = parse_status_code(&bytes, &target.host)?;
        log::debug!(
            "GET {target} -> {status_code} ({} bytes)",
            bytes.len()
        );

        Ok(RawResponse { bytes, status_code })
    }
}
